use serde::{Deserialize, Serialize};

use crate::conversation::models::{ConversationGroup, ConversationUser};

/// Error body returned by the service on non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestError {
    pub error: String,
    #[serde(rename = "error_description", default)]
    pub description: Option<String>,
}

/// `{"id": ...}` envelope returned by draft creation and attachment upload.
#[derive(Debug, Clone, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaxDepthResponse {
    #[serde(rename = "max-depth")]
    pub max_depth: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisibleRecipients {
    #[serde(default)]
    pub groups: Vec<ConversationGroup>,
    #[serde(default)]
    pub users: Vec<ConversationUser>,
}

/// `{"id": [...]}` body shared by the bulk trash and restore calls.
#[derive(Debug, Serialize)]
pub struct MessageIdsRequest {
    pub id: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ToggleUnreadRequest {
    pub id: Vec<String>,
    pub unread: bool,
}
