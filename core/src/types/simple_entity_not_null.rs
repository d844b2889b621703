use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Mixed into the seed so neighbouring seeds do not share an RNG stream prefix.
const SEED_SALT: u64 = 0xDEAD_BEEF_CAFE_1337;

/// Longest generated `simple_byte_array`.
const MAX_BYTE_ARRAY_LEN: usize = 32;

/// Flat record with one column per scalar type. Every field is required.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SimpleEntityNotNull {
    pub id: i64,
    pub simple_boolean: bool,
    pub simple_byte: i8,
    pub simple_short: i16,
    pub simple_int: i32,
    pub simple_long: i64,
    pub simple_float: f32,
    pub simple_double: f64,
    pub simple_string: String,
    pub simple_byte_array: Vec<u8>,
}

impl SimpleEntityNotNull {
    /// Build an entity whose fields are all derived from `seed`.
    ///
    /// The seed doubles as the row key. Calling this twice with the same seed
    /// yields equal entities.
    pub fn from_seed(seed: i64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed as u64 ^ SEED_SALT);

        let array_len = rng.gen_range(0..=MAX_BYTE_ARRAY_LEN);
        let mut simple_byte_array = vec![0u8; array_len];
        rng.fill(simple_byte_array.as_mut_slice());

        Self {
            id: seed,
            simple_boolean: rng.gen_bool(0.5),
            simple_byte: rng.gen_range(i8::MIN..=i8::MAX),
            simple_short: rng.gen_range(i16::MIN..=i16::MAX),
            simple_int: rng.gen_range(i32::MIN..=i32::MAX),
            simple_long: rng.gen_range(i64::MIN..=i64::MAX),
            simple_float: rng.gen_range(-1.0e6f32..1.0e6f32),
            simple_double: rng.gen_range(-1.0e12f64..1.0e12f64),
            simple_string: format!("entity_{seed:06}"),
            simple_byte_array,
        }
    }

    /// Build `count` entities with seeds `0..count`.
    pub fn batch(count: usize) -> Vec<Self> {
        (0..count as i64).map(Self::from_seed).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_yields_equal_entities() {
        for seed in [0, 1, 42, 9_999] {
            assert_eq!(
                SimpleEntityNotNull::from_seed(seed),
                SimpleEntityNotNull::from_seed(seed)
            );
        }
    }

    #[test]
    fn seed_becomes_id() {
        let entity = SimpleEntityNotNull::from_seed(1234);
        assert_eq!(entity.id, 1234);
        assert_eq!(entity.simple_string, "entity_001234");
    }

    #[test]
    fn different_seeds_differ() {
        let a = SimpleEntityNotNull::from_seed(7);
        let b = SimpleEntityNotNull::from_seed(8);
        assert_ne!(a, b);
        assert_ne!(a.simple_long, b.simple_long);
    }

    #[test]
    fn byte_array_length_is_bounded() {
        for entity in SimpleEntityNotNull::batch(200) {
            assert!(entity.simple_byte_array.len() <= MAX_BYTE_ARRAY_LEN);
        }
    }

    #[test]
    fn batch_uses_sequential_seeds() {
        let list = SimpleEntityNotNull::batch(5);
        let ids: Vec<i64> = list.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(list[3], SimpleEntityNotNull::from_seed(3));
    }

    #[test]
    fn empty_batch() {
        assert!(SimpleEntityNotNull::batch(0).is_empty());
    }
}
