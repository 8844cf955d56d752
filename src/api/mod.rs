mod http;

pub use http::HttpChatBackend;

use async_trait::async_trait;
use crate::error::ClientError;
use crate::models::api::{ ChatReply, HistoryRecord };

/// Backend surface consumed by the client.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn fetch_history(&self, user_id: &str) -> Result<Vec<HistoryRecord>, ClientError>;

    async fn send_message(&self, user_id: &str, message: &str) -> Result<ChatReply, ClientError>;

    async fn clear_history(&self, user_id: &str) -> Result<(), ClientError>;
}
