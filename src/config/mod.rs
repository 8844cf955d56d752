use crate::cli::Args;
use crate::ui::theme::DisplayMode;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const APP_DIR: &str = "german-buddy";
const STORAGE_FILE: &str = "storage.json";

#[derive(Debug)]
pub enum ConfigError {
    InvalidUrl(String, url::ParseError),
    UnsupportedScheme(String),
    InvalidTheme(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidUrl(raw, e) => write!(f, "Invalid backend URL '{}': {}", raw, e),
            ConfigError::UnsupportedScheme(raw) =>
                write!(f, "Backend URL '{}' must use http or https", raw),
            ConfigError::InvalidTheme(raw) => write!(f, "{}", raw),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::InvalidUrl(_, e) => Some(e),
            _ => None,
        }
    }
}

/// Resolved client settings. Built once at startup and handed to the
/// components that need them.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub request_timeout: Option<Duration>,
    pub storage_path: PathBuf,
    pub display_mode: DisplayMode,
    pub width: usize,
    pub audio_player: Option<String>,
}

impl ClientConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&args.api_url)?;
        let request_timeout = if args.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(args.request_timeout_secs))
        };
        let storage_path = args.storage_path
            .as_ref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_storage_path);
        let display_mode = args.theme
            .parse::<DisplayMode>()
            .map_err(|e| ConfigError::InvalidTheme(e.to_string()))?;
        let audio_player = args.audio_player.clone().filter(|cmd| !cmd.trim().is_empty());

        Ok(Self {
            base_url,
            request_timeout,
            storage_path,
            display_mode,
            width: args.width.max(20),
            audio_player,
        })
    }
}

/// Parses the backend base URL. A trailing slash is enforced so that
/// relative joins keep any path prefix.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    let url = Url::parse(&normalized).map_err(|e| ConfigError::InvalidUrl(raw.to_string(), e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::UnsupportedScheme(raw.to_string())),
    }
}

pub fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(STORAGE_FILE)
}
