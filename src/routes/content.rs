//! Home page content: fun facts and explore cards

use super::{failed, ok, ApiResponse};
use crate::server::AppState;
use crate::types::Result;

pub async fn handle_fun_facts(state: &AppState) -> Result<ApiResponse> {
    let facts = state
        .storage
        .get_all_fun_facts()
        .await
        .map_err(failed("Failed to fetch fun facts"))?;
    ok(&facts)
}

pub async fn handle_explore_contents(state: &AppState) -> Result<ApiResponse> {
    let contents = state
        .storage
        .get_all_explore_contents()
        .await
        .map_err(failed("Failed to fetch explore contents"))?;
    ok(&contents)
}
