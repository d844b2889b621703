use serde::{Deserialize, Serialize};

/// Entity carrying nothing but a store-generated key.
///
/// `id` is `None` until the row has been loaded back from the store; inserting
/// never fills it in on the caller's value.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MinimalEntity {
    pub id: Option<i64>,
}

impl MinimalEntity {
    pub fn new() -> Self {
        Self::default()
    }
}
