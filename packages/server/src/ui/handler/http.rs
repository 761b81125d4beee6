//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tsudoi_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    domain::{ConnectionRegistry, GroupName},
    infrastructure::dto::http::{ConnectionDto, GroupDto, HubSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Live connections and non-empty groups
pub async fn get_hub_summary(State(state): State<Arc<AppState>>) -> Json<HubSummaryDto> {
    let registry = state.hub.registry();

    let connections = registry
        .connections()
        .await
        .into_iter()
        .map(|info| ConnectionDto {
            connection_id: info.id.into_string(),
            state: info.state.to_string(),
            groups: info
                .groups
                .iter()
                .map(|g| g.as_str().to_string())
                .collect(),
            connected_at: timestamp_to_jst_rfc3339(info.connected_at.value()),
        })
        .collect();

    let groups = registry
        .groups()
        .await
        .into_iter()
        .map(|(name, members)| GroupDto {
            name: name.as_str().to_string(),
            members: members.into_iter().map(|id| id.into_string()).collect(),
        })
        .collect();

    Json(HubSummaryDto {
        connections,
        groups,
    })
}

/// Members of one group
pub async fn get_group_detail(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<GroupDto>, StatusCode> {
    let group = GroupName::new(name).map_err(|_| StatusCode::BAD_REQUEST)?;

    let members = state.hub.registry().members_of(&group).await;
    // Empty groups do not exist
    if members.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(Json(GroupDto {
        name: group.as_str().to_string(),
        members: members.into_iter().map(|id| id.into_string()).collect(),
    }))
}
