//! Storage layer
//!
//! - [`store`]: generic id-keyed collections
//! - [`schemas`]: per-kind record types
//! - [`storage`]: the repository interface and its in-memory implementation
//! - [`seed`]: bundled sample catalogue

pub mod schemas;
pub mod seed;
pub mod storage;
pub mod store;

pub use storage::{MemStorage, Storage, StoreCounts};
pub use store::{Collection, EntityKind, Record};
