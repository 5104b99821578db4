//! Solar Explorer - backend and client data layer for a solar system
//! learning app
//!
//! ## Components
//!
//! - **Store**: id-keyed in-memory collections, one per entity kind
//! - **Storage**: repository interface with filtered lookups over the store
//! - **Routes**: JSON REST handlers with a fixed `{"message"}` error shape
//! - **Server**: hyper accept loop and path dispatcher
//! - **Client**: query cache with request coalescing, typed API and session

pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod routes;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{ExplorerError, Result};
