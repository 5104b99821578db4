//! Client data layer
//!
//! - [`query`]: keyed cache and in-flight coalescing
//! - [`api`]: reqwest transport and typed endpoint methods
//! - [`session`]: signed-in user and per-user cache invalidation
//! - [`views`]: local filter/sort state for list pages

pub mod api;
pub mod query;
pub mod session;
pub mod views;

pub use api::{ApiClient, HomeContent, HttpFetcher};
pub use query::{Fetcher, QueryClient, QueryKey, QueryState};
pub use session::{Registration, Session};
pub use views::{MissionFacets, MissionFilter, MissionLayout, WorksheetFacets, WorksheetFilter};
