use chrono::{ DateTime, SecondsFormat, Utc };
use log::{ info, warn };

use super::state::ConversationState;
use crate::audio::find_pronunciation_asset;
use crate::models::api::ChatReply;
use crate::models::chat::Message;

/// Content of the Teacher message substituted for a failed send.
pub const FALLBACK_REPLY: &str = "Error processing your request.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Send(String),
    ReplySucceeded(ChatReply),
    ReplyFailed,
    HistoryLoaded(Vec<Message>),
    Clear,
    ClearSucceeded,
    ClearFailed,
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PostMessage {
        text: String,
    },
    DeleteHistory,
    PlayAudio {
        asset: String,
    },
}

pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Applies `event` to `state` and returns the effects to run.
pub fn transition(state: &mut ConversationState, event: Event, now: DateTime<Utc>) -> Vec<Effect> {
    match event {
        Event::Send(text) => {
            if text.trim().is_empty() {
                return Vec::new();
            }
            if state.is_processing() {
                warn!("Ignoring message while a reply is still pending");
                return Vec::new();
            }
            state.push(Message::user(text.clone(), timestamp(now)));
            state.set_processing(true);
            vec![Effect::PostMessage { text }]
        }
        Event::ReplySucceeded(reply) => {
            if !state.is_processing() {
                warn!("Dropping reply that arrived with no message in flight");
                return Vec::new();
            }
            let mut effects = Vec::new();
            if let Some(asset) = find_pronunciation_asset(&reply.response) {
                effects.push(Effect::PlayAudio { asset: asset.to_string() });
            }
            state.push(Message::teacher(reply.response, reply.timestamp));
            state.set_processing(false);
            effects
        }
        Event::ReplyFailed => {
            if !state.is_processing() {
                warn!("Dropping failure notice with no message in flight");
                return Vec::new();
            }
            state.push(Message::teacher(FALLBACK_REPLY, timestamp(now)));
            state.set_processing(false);
            Vec::new()
        }
        Event::HistoryLoaded(messages) => {
            if state.is_hydrated() {
                warn!("History already loaded or cleared, ignoring {} messages", messages.len());
                return Vec::new();
            }
            state.hydrate(messages);
            Vec::new()
        }
        Event::Clear => vec![Effect::DeleteHistory],
        Event::ClearSucceeded => {
            info!("Cleared {} messages", state.messages().len());
            state.clear_messages();
            Vec::new()
        }
        Event::ClearFailed => Vec::new(),
    }
}
