mod command;

pub use command::CommandAudioPlayer;

use async_trait::async_trait;
use std::error::Error;

/// Asset paths the backend embeds in a reply when it generated a clip.
pub const PRONUNCIATION_ASSETS: &[&str] = &["/static/pronunciation.mp3"];

/// Returns the first known pronunciation asset referenced by `text`.
pub fn find_pronunciation_asset(text: &str) -> Option<&'static str> {
    PRONUNCIATION_ASSETS.iter().copied().find(|asset| text.contains(asset))
}

/// Best-effort playback of a backend-hosted clip.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, asset: &str) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Used when no player command is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAudioPlayer;

#[async_trait]
impl AudioPlayer for NoopAudioPlayer {
    async fn play(&self, _asset: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
