//! ORM CRUD Throughput Benchmark
//!
//! Measures how fast a thin data-access layer over embedded SQLite can insert,
//! update, load and read back a flat entity, both one row at a time and in
//! grouped transactions. Every timed phase is logged and reported raw; no
//! statistics are computed.
//!
//! A separate probe documents two properties of the layer: generated keys are
//! not written back into the inserted value, and loads never share instances.
//!
//! Run the benchmark: `cargo run --release`
//! Run tests: `cargo test`

pub mod config;
pub mod dao;
pub mod error;
pub mod mapping;
pub mod report;
pub mod runner;
pub mod store;
