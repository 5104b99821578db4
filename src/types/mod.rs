//! Shared types

mod error;

pub use error::{ExplorerError, Result};
