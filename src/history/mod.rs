pub mod codec;

use log::{ error, info, warn };
use crate::api::ChatBackend;
use crate::models::chat::Message;

/// Fetches and decodes the stored conversation of `user_id`.
///
/// Never fails: any backend error is logged and yields an empty history.
/// Lines that cannot be decoded are skipped individually.
pub async fn load_history(backend: &dyn ChatBackend, user_id: &str) -> Vec<Message> {
    let records = match backend.fetch_history(user_id).await {
        Ok(records) => records,
        Err(e) => {
            error!("Error fetching history for {}: {}", user_id, e);
            return Vec::new();
        }
    };

    let mut messages = Vec::with_capacity(records.len());
    for record in &records {
        match codec::decode_record(record) {
            Ok(msg) => messages.push(msg),
            Err(e) => warn!("Skipping history entry: {}", e),
        }
    }
    info!("Loaded {} history messages for {}", messages.len(), user_id);
    messages
}
