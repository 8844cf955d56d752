use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use std::error::Error;
use std::time::Duration;
use tokio::process::Command;
use url::Url;

use super::AudioPlayer;

/// Downloads the clip into a temp file and hands it to an external player,
/// e.g. `mpv --really-quiet` or `afplay`.
#[derive(Debug, Clone)]
pub struct CommandAudioPlayer {
    http: HttpClient,
    base_url: Url,
    program: String,
    args: Vec<String>,
}

impl CommandAudioPlayer {
    /// Returns `None` when `command` has no program name.
    pub fn new(base_url: Url, command: &str, timeout: Option<Duration>) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().ok()?;
        Some(Self {
            http,
            base_url,
            program,
            args: parts.collect(),
        })
    }

    pub fn asset_url(&self, asset: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(asset.trim_start_matches('/'))
    }
}

#[async_trait]
impl AudioPlayer for CommandAudioPlayer {
    async fn play(&self, asset: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let url = self.asset_url(asset)?;
        let bytes = self.http.get(url.clone()).send().await?.error_for_status()?.bytes().await?;
        debug!("Fetched {} bytes of audio from {}", bytes.len(), url);

        let suffix = asset
            .rsplit_once('.')
            .map(|(_, ext)| format!(".{}", ext))
            .unwrap_or_default();
        let clip = tempfile::Builder::new().prefix("german-buddy-").suffix(&suffix).tempfile()?;
        let clip_path = clip.into_temp_path();
        tokio::fs::write(&clip_path, &bytes).await?;

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(clip_path.as_os_str())
            .status().await?;
        if !status.success() {
            return Err(format!("{} exited with {}", self.program, status).into());
        }
        Ok(())
    }
}
