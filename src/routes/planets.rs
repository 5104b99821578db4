//! Planet catalogue

use super::{failed, found, ok, parse_id, ApiResponse};
use crate::server::AppState;
use crate::types::Result;

/// GET /api/planets, ordered by distance from the sun
pub async fn handle_list_planets(state: &AppState) -> Result<ApiResponse> {
    let planets = state
        .storage
        .get_all_planets()
        .await
        .map_err(failed("Failed to fetch planets"))?;
    ok(&planets)
}

/// GET /api/planets/{id}
pub async fn handle_get_planet(state: &AppState, raw_id: &str) -> Result<ApiResponse> {
    let id = parse_id(raw_id, "Invalid planet ID")?;
    let planet = state
        .storage
        .get_planet(id)
        .await
        .map_err(failed("Failed to fetch planet"))?;
    ok(&found(planet, "Planet not found")?)
}
