//! HTTP API response DTOs for the chat hub.

use serde::{Deserialize, Serialize};

/// Hub overview for the `/api/hub` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubSummaryDto {
    pub connections: Vec<ConnectionDto>,
    pub groups: Vec<GroupDto>,
}

/// One live connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionDto {
    pub connection_id: String,
    pub state: String,
    pub groups: Vec<String>,
    pub connected_at: String, // ISO 8601
}

/// One non-empty group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDto {
    pub name: String,
    pub members: Vec<String>,
}
