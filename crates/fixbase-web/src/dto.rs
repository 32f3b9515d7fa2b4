use serde::{Deserialize, Serialize};

use fixbase_core::storage::StorageKind;

/// Absolute upvote count computed by the client from the count it displayed.
#[derive(Debug, Deserialize)]
pub struct UpvoteRequest {
    pub upvotes: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsQuery {
    pub issue_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: StorageKind,
}
