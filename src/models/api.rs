use serde::{ Serialize, Deserialize };

/// Body of `POST /chat`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
}

/// Reply of `POST /chat`. `response` may reference a pronunciation asset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub response: String,
    pub timestamp: String,
}

/// One stored line as returned by `GET /history/{user_id}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub message: String,
    pub timestamp: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HistoryResponse {
    pub history: Vec<HistoryRecord>,
}
