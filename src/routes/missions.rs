//! Space missions

use super::{failed, found, ok, parse_id, ApiRequest, ApiResponse};
use crate::server::AppState;
use crate::types::Result;

/// GET /api/space-missions[?status=..|?target=..]
pub async fn handle_list_missions(state: &AppState, req: &ApiRequest) -> Result<ApiResponse> {
    let storage = state.storage.as_ref();

    let missions = if let Some(status) = req.query_param("status") {
        storage.get_space_missions_by_status(&status).await
    } else if let Some(target) = req.query_param("target") {
        storage.get_space_missions_by_target(&target).await
    } else {
        storage.get_all_space_missions().await
    }
    .map_err(failed("Failed to fetch space missions"))?;

    ok(&missions)
}

/// GET /api/space-missions/{id}
pub async fn handle_get_mission(state: &AppState, raw_id: &str) -> Result<ApiResponse> {
    let id = parse_id(raw_id, "Invalid mission ID")?;
    let mission = state
        .storage
        .get_space_mission(id)
        .await
        .map_err(failed("Failed to fetch space mission"))?;
    ok(&found(mission, "Space mission not found")?)
}
