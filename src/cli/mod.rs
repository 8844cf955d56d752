use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Backend Args ---
    /// Base URL of the German Buddy backend (serves /chat, /history and /static)
    #[arg(long, env = "GERMAN_BUDDY_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Timeout in seconds applied to every backend request. 0 disables the timeout.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "60")]
    pub request_timeout_secs: u64,

    // --- Client Storage Args ---
    /// File holding the persisted user id. Defaults to <data dir>/german-buddy/storage.json
    #[arg(long, env = "STORAGE_PATH")]
    pub storage_path: Option<String>,

    // --- Display Args ---
    /// Initial display mode (dark, light)
    #[arg(long, env = "THEME", default_value = "dark")]
    pub theme: String,

    /// Terminal width used to right-align your own messages
    #[arg(long, env = "CHAT_WIDTH", default_value = "80")]
    pub width: usize,

    // --- Audio Args ---
    /// Command used to play pronunciation clips (e.g. "mpv --really-quiet").
    /// The downloaded clip path is appended as the last argument. Audio is disabled when unset.
    #[arg(long, env = "AUDIO_PLAYER")]
    pub audio_player: Option<String>,

    // --- General App Args ---
    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}
