use std::env;
use std::time::Duration;

/// Application configuration from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_timeout: Duration,
    pub startup_check: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);

        let spotify_client_id = credential("SPOTIFY_CLIENT_ID", "SPOTIPY_CLIENT_ID")?;
        let spotify_client_secret = credential("SPOTIFY_CLIENT_SECRET", "SPOTIPY_CLIENT_SECRET")?;

        let spotify_timeout = env::var("SPOTIFY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(5));

        let startup_check = env::var("STARTUP_CHECK")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        Ok(Self {
            port,
            spotify_client_id,
            spotify_client_secret,
            spotify_timeout,
            startup_check,
        })
    }
}

/// Reads `primary`, falling back to the spotipy-style `legacy` name.
fn credential(primary: &str, legacy: &str) -> anyhow::Result<String> {
    env::var(primary)
        .or_else(|_| env::var(legacy))
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("{} is required", primary))
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
