use log::{ error, info, warn };
use std::error::Error;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{ AsyncBufReadExt, BufReader };

use crate::api::HttpChatBackend;
use crate::audio::{ AudioPlayer, CommandAudioPlayer, NoopAudioPlayer };
use crate::cli::Args;
use crate::config::ClientConfig;
use crate::conversation::ChatSession;
use crate::identity::{ FileKeyValueStore, IdentityStore };
use crate::ui::message::{ format_fragment, processing_placeholder, render_message };
use crate::ui::sidebar::{ render_sidebar, SidebarAction };

const HELP: &str = "Commands: /history  /clear  /theme  /help  /quit\nAnything else is sent to your teacher.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Sidebar(SidebarAction),
    History,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return Command::Send(line.to_string());
    }
    match trimmed.to_lowercase().as_str() {
        "/history" => Command::History,
        "/clear" => Command::Sidebar(SidebarAction::Clear),
        "/theme" => Command::Sidebar(SidebarAction::ToggleTheme),
        "/help" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

/// Tracks which messages have already been written to the terminal.
#[derive(Debug, Default)]
pub struct Transcript {
    shown: usize,
    width: usize,
}

impl Transcript {
    pub fn new(width: usize) -> Self {
        Self { shown: 0, width }
    }

    /// Renders messages appended since the last call. If the list shrank or
    /// was reordered by hydration, call [`Transcript::reset`] first.
    pub fn render_new(&mut self, session: &ChatSession) -> Vec<String> {
        let messages = session.messages();
        let start = self.shown.min(messages.len());
        self.shown = messages.len();
        messages[start..]
            .iter()
            .map(|msg| format_fragment(&render_message(msg), self.width, session.display_mode()))
            .collect()
    }

    pub fn reset(&mut self) {
        self.shown = 0;
    }
}

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = ClientConfig::from_args(&args)?;

    info!("--- Client Configuration ---");
    info!("Backend URL: {}", config.base_url);
    info!("Request Timeout: {:?}", config.request_timeout);
    info!("Storage Path: {}", config.storage_path.display());
    info!("Display Mode: {}", config.display_mode);
    info!("Audio Player: {}", config.audio_player.as_deref().unwrap_or("disabled"));
    info!("----------------------------");

    let storage = Arc::new(FileKeyValueStore::new(&config.storage_path));
    let user_id = IdentityStore::new(storage).get_or_create_user_id().await;
    info!("Using user id {}", user_id);

    let backend = Arc::new(HttpChatBackend::new(config.base_url.clone(), config.request_timeout)?);
    let audio: Arc<dyn AudioPlayer> = match config.audio_player.as_deref() {
        Some(cmd) =>
            match CommandAudioPlayer::new(config.base_url.clone(), cmd, config.request_timeout) {
                Some(player) => Arc::new(player),
                None => {
                    warn!("Audio player '{}' could not be set up, audio disabled", cmd);
                    Arc::new(NoopAudioPlayer)
                }
            }
        None => Arc::new(NoopAudioPlayer),
    };

    let mut session = ChatSession::new(user_id, config.display_mode, backend, audio);
    let mut transcript = Transcript::new(config.width);
    let (mut history_rx, _history_task) = session.spawn_history_load();

    println!("German Buddy\n{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt();
        tokio::select! {
            Some(history) = history_rx.recv() => {
                session.apply_history(history).await;
                transcript.reset();
                print_lines(transcript.render_new(&session));
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                };
                match parse_command(&line) {
                    Command::Send(text) => {
                        if !session.submit(&text) {
                            continue;
                        }
                        print_lines(transcript.render_new(&session));
                        println!("{}", format_fragment(&processing_placeholder(), config.width, session.display_mode()));
                        session.run_pending().await;
                        print_lines(transcript.render_new(&session));
                    }
                    Command::Sidebar(SidebarAction::Clear) => {
                        if session.clear().await {
                            transcript.reset();
                            println!("History cleared.");
                        } else {
                            println!("Could not clear history, try again later.");
                        }
                    }
                    Command::Sidebar(SidebarAction::ToggleTheme) => {
                        let mode = session.toggle_theme();
                        println!("Display mode: {}", mode);
                    }
                    Command::History => {
                        println!("{}", render_sidebar(session.messages(), session.display_mode()));
                    }
                    Command::Help => println!("{}", HELP),
                    Command::Quit => break,
                    Command::Unknown(cmd) => println!("Unknown command {}. {}", cmd, HELP),
                }
            }
        }
    }

    info!("Goodbye");
    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn print_lines(lines: impl IntoIterator<Item = String>) {
    for line in lines {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_sent_verbatim() {
        assert_eq!(parse_command(" Wie geht's? "), Command::Send(" Wie geht's? ".into()));
    }

    #[test]
    fn slash_commands_map_to_actions() {
        assert_eq!(parse_command("/clear"), Command::Sidebar(SidebarAction::Clear));
        assert_eq!(parse_command("/THEME"), Command::Sidebar(SidebarAction::ToggleTheme));
        assert_eq!(parse_command("/history"), Command::History);
        assert_eq!(parse_command("/exit"), Command::Quit);
        assert_eq!(parse_command("/nope"), Command::Unknown("/nope".into()));
    }
}
