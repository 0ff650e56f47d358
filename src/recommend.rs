//! Sentiment-driven track recommendations.
//!
//! Each request scores the song text, then draws a couple of tracks by the
//! requested artist and a few mood-matched tracks from the catalog. A failing
//! catalog call only empties its own half of the list.

use std::sync::Arc;

use rand::seq::SliceRandom;
use serde::Serialize;

use crate::sentiment::{classify, scoring_text, PolarityScorer, SentimentLabel};
use crate::spotify::{Track, TrackCatalog};

const SAME_ARTIST_LIMIT: u32 = 5;
const SAME_ARTIST_PICKS: usize = 2;
const GENRE_LIMIT: u32 = 10;
const GENRE_PICKS: usize = 3;

/// Track as returned to API callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecommendedTrack {
    pub track_name: String,
    pub artist_name: String,
    pub album_cover: String,
    pub spotify_url: String,
}

impl TryFrom<&Track> for RecommendedTrack {
    type Error = String;

    fn try_from(t: &Track) -> Result<Self, Self::Error> {
        let artist = t
            .artists
            .first()
            .ok_or_else(|| format!("track '{}' has no artists", t.name))?;
        let spotify_url = t
            .external_urls
            .spotify
            .clone()
            .ok_or_else(|| format!("track '{}' has no spotify url", t.name))?;

        Ok(Self {
            track_name: t.name.clone(),
            artist_name: artist.name.clone(),
            album_cover: t
                .album
                .images
                .first()
                .and_then(|i| i.url.clone())
                .unwrap_or_default(),
            spotify_url,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Recommendation {
    pub sentiment: SentimentLabel,
    pub recommendations: Vec<RecommendedTrack>,
}

/// Shared, read-only recommendation engine.
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<dyn TrackCatalog>,
    scorer: Arc<dyn PolarityScorer>,
}

impl Recommender {
    pub fn new(catalog: Arc<dyn TrackCatalog>, scorer: Arc<dyn PolarityScorer>) -> Self {
        Self { catalog, scorer }
    }

    /// `song_name` must already be validated as non-empty. A blank
    /// `artist_name` counts as absent: no same-artist search and no filtering.
    pub async fn recommend(&self, song_name: &str, artist_name: Option<&str>) -> Recommendation {
        let artist_name = artist_name.map(str::trim).filter(|a| !a.is_empty());

        let score = self.scorer.polarity(&scoring_text(song_name, artist_name));
        let sentiment = classify(score);
        tracing::debug!(song = song_name, score, %sentiment, "classified request");

        let (mut recommendations, others) = tokio::join!(
            self.same_artist_tracks(artist_name),
            self.genre_tracks(sentiment, artist_name),
        );
        recommendations.extend(others);

        Recommendation {
            sentiment,
            recommendations,
        }
    }

    async fn same_artist_tracks(&self, artist_name: Option<&str>) -> Vec<RecommendedTrack> {
        let Some(artist) = artist_name else {
            return Vec::new();
        };

        let query = format!("artist:{}", artist);
        match self.sampled(&query, SAME_ARTIST_LIMIT, SAME_ARTIST_PICKS).await {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::error!(artist, "error fetching artist tracks: {}", e);
                Vec::new()
            }
        }
    }

    async fn genre_tracks(
        &self,
        sentiment: SentimentLabel,
        artist_name: Option<&str>,
    ) -> Vec<RecommendedTrack> {
        let query = sentiment.genre_query();
        match self.sampled(query, GENRE_LIMIT, GENRE_PICKS).await {
            Ok(tracks) => tracks
                .into_iter()
                .filter(|t| is_other_artist(&t.artist_name, artist_name))
                .collect(),
            Err(e) => {
                tracing::error!(query, "error fetching other tracks: {}", e);
                Vec::new()
            }
        }
    }

    /// Searches, then converts a random subset of up to `picks` results.
    /// Any malformed pick fails the whole batch.
    async fn sampled(&self, query: &str, limit: u32, picks: usize) -> Result<Vec<RecommendedTrack>, String> {
        let found = self.catalog.search_tracks(query, limit).await?;
        sample(&found, picks)
            .into_iter()
            .map(RecommendedTrack::try_from)
            .collect()
    }
}

/// Uniform sample without replacement of `min(n, items.len())` items.
fn sample<T>(items: &[T], n: usize) -> Vec<&T> {
    let mut rng = rand::thread_rng();
    items.choose_multiple(&mut rng, n).collect()
}

fn is_other_artist(candidate: &str, requested: Option<&str>) -> bool {
    match requested {
        Some(requested) => candidate.to_lowercase() != requested.to_lowercase(),
        None => true,
    }
}
