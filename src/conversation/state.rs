use crate::models::chat::Message;

/// Phase of the conversation, derived from `is_processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingReply,
}

/// Ordered message list plus the flag gating input while a reply is pending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    messages: Vec<Message>,
    is_processing: bool,
    hydrated: bool,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    pub fn phase(&self) -> Phase {
        if self.is_processing { Phase::AwaitingReply } else { Phase::Idle }
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub(crate) fn set_processing(&mut self, processing: bool) {
        self.is_processing = processing;
    }

    /// Also marks the state hydrated: history fetched before the clear is stale.
    pub(crate) fn clear_messages(&mut self) {
        self.messages.clear();
        self.hydrated = true;
    }

    /// Places loaded history ahead of anything appended since startup.
    pub(crate) fn hydrate(&mut self, mut history: Vec<Message>) {
        history.append(&mut self.messages);
        self.messages = history;
        self.hydrated = true;
    }
}
