//! Testing infrastructure for runstream tests.
//!
//! - `TestWorld`: isolated temp directory and config for CLI tests
//! - `fixtures`: envelope builders and canned event sequences
//! - `assertions`: checks over serialized snapshots and CLI JSON output

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use world::TestWorld;
