use chrono::Utc;
use log::{ debug, error };
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::state::ConversationState;
use super::transition::{ transition, Effect, Event };
use crate::api::ChatBackend;
use crate::audio::AudioPlayer;
use crate::history::load_history;
use crate::models::chat::Message;
use crate::ui::theme::DisplayMode;

/// Drives the conversation state machine against the backend.
///
/// All mutation goes through `&mut self`, so transitions run one at a time
/// on the caller's task. Backend calls are awaited in place and always end
/// in a success or failure event.
pub struct ChatSession {
    user_id: String,
    state: ConversationState,
    display_mode: DisplayMode,
    backend: Arc<dyn ChatBackend>,
    audio: Arc<dyn AudioPlayer>,
    pending: VecDeque<Effect>,
}

impl ChatSession {
    pub fn new(
        user_id: String,
        display_mode: DisplayMode,
        backend: Arc<dyn ChatBackend>,
        audio: Arc<dyn AudioPlayer>
    ) -> Self {
        Self {
            user_id,
            state: ConversationState::new(),
            display_mode,
            backend,
            audio,
            pending: VecDeque::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn messages(&self) -> &[Message] {
        self.state.messages()
    }

    pub fn is_processing(&self) -> bool {
        self.state.is_processing()
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn toggle_theme(&mut self) -> DisplayMode {
        self.display_mode.toggle();
        self.display_mode
    }

    /// Spawns the one-time history fetch. The decoded messages arrive on the
    /// returned channel and should be passed to [`ChatSession::apply_history`].
    pub fn spawn_history_load(&self) -> (mpsc::Receiver<Vec<Message>>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(1);
        let backend = self.backend.clone();
        let user_id = self.user_id.clone();
        let handle = tokio::spawn(async move {
            let messages = load_history(backend.as_ref(), &user_id).await;
            if tx.send(messages).await.is_err() {
                debug!("Session ended before history arrived");
            }
        });
        (rx, handle)
    }

    pub async fn hydrate(&mut self) {
        let messages = load_history(self.backend.as_ref(), &self.user_id).await;
        self.apply_history(messages).await;
    }

    pub async fn apply_history(&mut self, messages: Vec<Message>) {
        self.apply(Event::HistoryLoaded(messages));
        self.run_pending().await;
    }

    /// Sends `text` and waits for the reply. Blank input is a no-op.
    pub async fn send(&mut self, text: &str) {
        if self.submit(text) {
            self.run_pending().await;
        }
    }

    /// Appends the optimistic user message without waiting for the backend.
    /// Returns false when the input was rejected. Follow up with
    /// [`ChatSession::run_pending`] to deliver it.
    pub fn submit(&mut self, text: &str) -> bool {
        let queued = self.pending.len();
        self.apply(Event::Send(text.to_string()));
        self.pending.len() > queued
    }

    /// Deletes the history on the backend, then locally. Returns whether the
    /// backend accepted the delete; on false the messages are untouched.
    pub async fn clear(&mut self) -> bool {
        self.apply(Event::Clear);
        let mut cleared = false;
        while let Some(effect) = self.pending.pop_front() {
            if let Some(event) = self.run_effect(effect).await {
                cleared |= event == Event::ClearSucceeded;
                self.apply(event);
            }
        }
        cleared
    }

    /// Runs queued effects until the machine settles.
    pub async fn run_pending(&mut self) {
        while let Some(effect) = self.pending.pop_front() {
            if let Some(event) = self.run_effect(effect).await {
                self.apply(event);
            }
        }
    }

    fn apply(&mut self, event: Event) {
        let effects = transition(&mut self.state, event, Utc::now());
        self.pending.extend(effects);
    }

    async fn run_effect(&self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::PostMessage { text } => {
                match self.backend.send_message(&self.user_id, &text).await {
                    Ok(reply) => Some(Event::ReplySucceeded(reply)),
                    Err(e) => {
                        error!("Error sending message: {}", e);
                        Some(Event::ReplyFailed)
                    }
                }
            }
            Effect::DeleteHistory => {
                match self.backend.clear_history(&self.user_id).await {
                    Ok(()) => Some(Event::ClearSucceeded),
                    Err(e) => {
                        error!("Error clearing history: {}", e);
                        Some(Event::ClearFailed)
                    }
                }
            }
            Effect::PlayAudio { asset } => {
                let audio = self.audio.clone();
                tokio::spawn(async move {
                    if let Err(e) = audio.play(&asset).await {
                        debug!("Audio playback of {} failed: {}", asset, e);
                    }
                });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::FALLBACK_REPLY;
    use crate::error::ClientError;
    use crate::models::api::{ ChatReply, HistoryRecord };
    use crate::models::chat::Speaker;
    use async_trait::async_trait;
    use std::error::Error;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct ScriptedBackend {
        history: Vec<HistoryRecord>,
        replies: Mutex<Vec<Result<ChatReply, ClientError>>>,
        clear_ok: bool,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedBackend {
        fn replying(replies: Vec<Result<ChatReply, ClientError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                clear_ok: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn fetch_history(&self, _user_id: &str) -> Result<Vec<HistoryRecord>, ClientError> {
            Ok(self.history.clone())
        }

        async fn send_message(&self, user_id: &str, message: &str) -> Result<ChatReply, ClientError> {
            self.sent.lock().unwrap().push((user_id.to_string(), message.to_string()));
            self.replies.lock().unwrap().remove(0)
        }

        async fn clear_history(&self, _user_id: &str) -> Result<(), ClientError> {
            if self.clear_ok {
                Ok(())
            } else {
                Err(ClientError::MalformedPayload("refused".into()))
            }
        }
    }

    #[derive(Default)]
    struct RecordingPlayer {
        played: Mutex<Vec<String>>,
        done: Notify,
        fail: bool,
    }

    #[async_trait]
    impl AudioPlayer for RecordingPlayer {
        async fn play(&self, asset: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
            self.played.lock().unwrap().push(asset.to_string());
            self.done.notify_one();
            if self.fail {
                Err("no audio device".into())
            } else {
                Ok(())
            }
        }
    }

    fn reply(text: &str) -> Result<ChatReply, ClientError> {
        Ok(ChatReply {
            response: text.to_string(),
            timestamp: "2024-05-01 09:30:02".to_string(),
        })
    }

    fn session(backend: ScriptedBackend, player: Arc<RecordingPlayer>) -> (ChatSession, Arc<ScriptedBackend>) {
        let backend = Arc::new(backend);
        let session = ChatSession::new("u-1".into(), DisplayMode::Dark, backend.clone(), player);
        (session, backend)
    }

    #[tokio::test]
    async fn successful_send_ends_idle_with_both_messages() {
        let (mut session, backend) = session(
            ScriptedBackend::replying(vec![reply("Guten Tag")]),
            Arc::default()
        );
        session.send("Hallo").await;

        assert!(!session.is_processing());
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[0].role, Speaker::User);
        assert_eq!(session.messages()[1], Message::teacher("Guten Tag", "2024-05-01 09:30:02"));
        assert_eq!(backend.sent.lock().unwrap().as_slice(), &[("u-1".to_string(), "Hallo".to_string())]);
    }

    #[tokio::test]
    async fn failed_send_appends_fallback() {
        let (mut session, _) = session(
            ScriptedBackend::replying(
                vec![
                    Err(ClientError::Status {
                        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                        url: "http://localhost:8000/chat".into(),
                    })
                ]
            ),
            Arc::default()
        );
        session.send("Hallo").await;

        assert!(!session.is_processing());
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].content, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn submit_is_optimistic() {
        let (mut session, backend) = session(
            ScriptedBackend::replying(vec![reply("Guten Tag")]),
            Arc::default()
        );
        assert!(session.submit("Hallo"));
        assert!(session.is_processing());
        assert_eq!(session.messages().len(), 1);
        assert!(backend.sent.lock().unwrap().is_empty());

        session.run_pending().await;
        assert!(!session.is_processing());
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn blank_send_never_reaches_backend() {
        let (mut session, backend) = session(ScriptedBackend::replying(Vec::new()), Arc::default());
        session.send("   ").await;
        assert!(session.messages().is_empty());
        assert!(backend.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_failure_keeps_messages() {
        let backend = ScriptedBackend {
            replies: Mutex::new(vec![reply("Hi")]),
            clear_ok: false,
            ..Default::default()
        };
        let (mut session, _) = session(backend, Arc::default());
        session.send("Hallo").await;
        assert!(!session.clear().await);
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn clear_failure_on_empty_conversation_is_reported() {
        let backend = ScriptedBackend { clear_ok: false, ..Default::default() };
        let (mut session, _) = session(backend, Arc::default());
        assert!(session.messages().is_empty());
        assert!(!session.clear().await);
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn clear_success_empties_messages() {
        let (mut session, _) = session(ScriptedBackend::replying(vec![reply("Hi")]), Arc::default());
        session.send("Hallo").await;
        assert!(session.clear().await);
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn history_landing_after_clear_stays_cleared() {
        let backend = ScriptedBackend {
            history: vec![HistoryRecord {
                message: "You: deleted".into(),
                timestamp: "t0".into(),
            }],
            replies: Mutex::new(vec![reply("Hi")]),
            clear_ok: true,
            ..Default::default()
        };
        let (mut session, _) = session(backend, Arc::default());
        let (mut rx, handle) = session.spawn_history_load();
        session.send("Hallo").await;
        assert!(session.clear().await);

        let messages = rx.recv().await.unwrap();
        handle.await.unwrap();
        session.apply_history(messages).await;
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn pronunciation_reply_plays_audio_and_failure_is_harmless() {
        let player = Arc::new(RecordingPlayer { fail: true, ..Default::default() });
        let (mut session, _) = session(
            ScriptedBackend::replying(vec![reply("Pronunciation audio generated: /static/pronunciation.mp3")]),
            player.clone()
        );
        session.send("pronounce Eichhörnchen").await;
        player.done.notified().await;

        assert_eq!(player.played.lock().unwrap().as_slice(), &["/static/pronunciation.mp3".to_string()]);
        assert!(!session.is_processing());
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn spawned_history_load_hydrates_once() {
        let backend = ScriptedBackend {
            history: vec![HistoryRecord {
                message: "You: hello: world".into(),
                timestamp: "t0".into(),
            }],
            ..Default::default()
        };
        let (mut session, _) = session(backend, Arc::default());
        let (mut rx, handle) = session.spawn_history_load();
        let messages = rx.recv().await.unwrap();
        handle.await.unwrap();
        session.apply_history(messages).await;

        assert_eq!(session.messages(), &[Message::user("hello: world", "t0")]);
        assert!(session.state().is_hydrated());
    }

    #[tokio::test]
    async fn theme_toggle_leaves_conversation_alone() {
        let (mut session, _) = session(ScriptedBackend::replying(Vec::new()), Arc::default());
        assert_eq!(session.toggle_theme(), DisplayMode::Light);
        assert_eq!(session.display_mode(), DisplayMode::Light);
        assert_eq!(session.state(), &ConversationState::new());
    }
}
