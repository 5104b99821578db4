//! Moons, dwarf planets and other celestial objects

use super::{failed, found, ok, parse_id, ApiRequest, ApiResponse};
use crate::server::AppState;
use crate::types::Result;

/// GET /api/celestial-objects[?type=..|?parentId=..]
///
/// `type` wins when both filters are given.
pub async fn handle_list_objects(state: &AppState, req: &ApiRequest) -> Result<ApiResponse> {
    let storage = state.storage.as_ref();

    let objects = if let Some(object_type) = req.query_param("type") {
        storage.get_celestial_objects_by_type(&object_type).await
    } else if let Some(raw_parent) = req.query_param("parentId") {
        let parent_id = parse_id(&raw_parent, "Invalid parent ID")?;
        storage.get_celestial_objects_by_parent(parent_id).await
    } else {
        storage.get_all_celestial_objects().await
    }
    .map_err(failed("Failed to fetch celestial objects"))?;

    ok(&objects)
}

/// GET /api/celestial-objects/{id}
pub async fn handle_get_object(state: &AppState, raw_id: &str) -> Result<ApiResponse> {
    let id = parse_id(raw_id, "Invalid object ID")?;
    let object = state
        .storage
        .get_celestial_object(id)
        .await
        .map_err(failed("Failed to fetch celestial object"))?;
    ok(&found(object, "Celestial object not found")?)
}
