//! Test utilities for manager tests.

pub mod memory_store;

#[allow(unused_imports)]
pub use memory_store::{MemoryStore, StoreOp};
