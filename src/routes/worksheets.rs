//! Printable worksheets

use super::{failed, found, ok, parse_id, ApiRequest, ApiResponse};
use crate::server::AppState;
use crate::types::Result;

/// GET /api/worksheets[?subject=..|?ageRange=..]
pub async fn handle_list_worksheets(state: &AppState, req: &ApiRequest) -> Result<ApiResponse> {
    let storage = state.storage.as_ref();

    let worksheets = if let Some(subject) = req.query_param("subject") {
        storage.get_worksheets_by_subject(&subject).await
    } else if let Some(age_range) = req.query_param("ageRange") {
        storage.get_worksheets_by_age_range(&age_range).await
    } else {
        storage.get_all_worksheets().await
    }
    .map_err(failed("Failed to fetch worksheets"))?;

    ok(&worksheets)
}

/// GET /api/worksheets/{id}
pub async fn handle_get_worksheet(state: &AppState, raw_id: &str) -> Result<ApiResponse> {
    let id = parse_id(raw_id, "Invalid worksheet ID")?;
    let worksheet = state
        .storage
        .get_worksheet(id)
        .await
        .map_err(failed("Failed to fetch worksheet"))?;
    ok(&found(worksheet, "Worksheet not found")?)
}
