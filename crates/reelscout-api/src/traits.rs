//! Service trait and the domain types every movie metadata backend maps into.

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A movie metadata lookup service.
pub trait MovieService: Send + Sync {
    /// Search titles matching `query`. Only the first page is fetched.
    fn search(
        &self,
        key: &ApiKey,
        query: &str,
    ) -> impl Future<Output = Result<Lookup<SearchPage>, ApiError>> + Send;

    /// Fetch the full record for one title.
    fn detail(
        &self,
        key: &ApiKey,
        id: &str,
    ) -> impl Future<Output = Result<Lookup<DetailRecord>, ApiError>> + Send;
}

/// Static API credential. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, returning `None` for blank input.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Outcome of an API call that reached the service.
///
/// Upstream reports "nothing found" through a status flag in an otherwise
/// successful response, optionally with a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound { message: Option<String> },
}

/// First page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub items: Vec<SearchResultItem>,
    pub total_results: Option<u32>,
}

/// Kind of title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaKind {
    Movie,
    Series,
    Episode,
    /// Anything upstream reports that is not one of the above.
    Other(String),
}

impl MediaKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for MediaKind {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Self::Movie,
            "series" => Self::Series,
            "episode" => Self::Episode,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for MediaKind {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<MediaKind> for String {
    fn from(kind: MediaKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a search result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub id: String,
    pub title: String,
    pub year: String,
    pub kind: MediaKind,
    pub poster_url: Option<String>,
}

/// A rating from one source, kept as display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub source: String,
    pub value: String,
}

/// Full record for a single title. Absent upstream fields are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub id: String,
    pub title: String,
    pub year: Option<String>,
    pub kind: MediaKind,
    pub poster_url: Option<String>,
    pub rated: Option<String>,
    pub released: Option<String>,
    pub runtime: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub writer: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub awards: Option<String>,
    pub box_office: Option<String>,
    pub metascore: Option<String>,
    pub imdb_rating: Option<String>,
    pub imdb_votes: Option<String>,
    pub total_seasons: Option<String>,
    pub ratings: Vec<RatingEntry>,
}

impl DetailRecord {
    /// IMDb rating as a number on the 0–10 scale, if present and numeric.
    pub fn imdb_score(&self) -> Option<f32> {
        self.imdb_rating.as_deref()?.trim().parse().ok()
    }
}
