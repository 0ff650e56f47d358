//! Spotify Web API client.
//!
//! Uses Client Credentials flow for server-to-server authentication.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE: &str = "https://api.spotify.com/v1";

/// Track search against a music catalog.
#[async_trait]
pub trait TrackCatalog: Send + Sync {
    /// Returns up to `limit` tracks matching `query`, in catalog order.
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, String>;
}

/// Spotify API client with token caching.
#[derive(Clone)]
pub struct SpotifyClient {
    client: Client,
    client_id: String,
    client_secret: String,
    token: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: std::time::Instant,
}

impl SpotifyClient {
    pub fn new(client_id: String, client_secret: String, timeout: Duration) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("http client build failed: {}", e))?;

        Ok(Self {
            client,
            client_id,
            client_secret,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Fetches a fresh token to prove the credentials work.
    pub async fn verify_credentials(&self) -> Result<(), String> {
        let token = self.fetch_token().await?;
        let mut guard = self.token.write().await;
        *guard = Some(token);
        Ok(())
    }

    /// Ensures we have a valid access token, refreshing if needed.
    async fn ensure_token(&self) -> Result<String, String> {
        {
            let guard = self.token.read().await;
            if let Some(ref t) = *guard {
                if t.expires_at > std::time::Instant::now() {
                    return Ok(t.access_token.clone());
                }
            }
        }

        let token = self.fetch_token().await?;
        {
            let mut guard = self.token.write().await;
            *guard = Some(token.clone());
        }
        Ok(token.access_token)
    }

    async fn fetch_token(&self) -> Result<CachedToken, String> {
        let params = [
            ("grant_type", "client_credentials"),
        ];
        let auth = base64::engine::general_purpose::STANDARD.encode(
            format!("{}:{}", self.client_id, self.client_secret).as_bytes(),
        );

        let res = self
            .client
            .post(TOKEN_URL)
            .header("Authorization", format!("Basic {}", auth))
            .form(&params)
            .send()
            .await
            .map_err(|e| format!("token request failed: {}", e))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("token request failed: {} - {}", status, body));
        }

        let body: TokenResponse = res.json().await.map_err(|e| format!("token parse failed: {}", e))?;
        let expires_at = std::time::Instant::now() + Duration::from_secs(body.expires_in.saturating_sub(60));

        Ok(CachedToken {
            access_token: body.access_token,
            expires_at,
        })
    }
}

#[async_trait]
impl TrackCatalog for SpotifyClient {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, String> {
        let token = self.ensure_token().await?;

        let url = format!("{}/search?q={}&type=track&limit={}",
            API_BASE,
            urlencoding::encode(query),
            limit.clamp(1, 50),
        );

        let res = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| format!("search request failed: {}", e))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("Spotify API error {}: {}", status, body));
        }

        let body: SearchResponse = res.json().await.map_err(|e| format!("search parse failed: {}", e))?;
        Ok(body.tracks.items)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Deserialize)]
struct SearchResponse {
    tracks: TracksPage,
}

#[derive(Deserialize)]
struct TracksPage {
    items: Vec<Track>,
}

/// A Spotify track (simplified).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Track {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub album: Album,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct Artist {
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct Album {
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct Image {
    pub url: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}
