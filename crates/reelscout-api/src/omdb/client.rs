use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::{OmdbDetailResponse, OmdbEnvelope, OmdbSearchResponse};
use crate::body::{parse_text, read_text};
use crate::error::ApiError;
use crate::traits::{ApiKey, DetailRecord, Lookup, MovieService, SearchPage};
use crate::transport::Transport;
#[cfg(not(target_arch = "wasm32"))]
use crate::transport::HttpTransport;

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Length of the plot text requested for detail lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotMode {
    Short,
    #[default]
    Full,
}

impl PlotMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Full => "full",
        }
    }
}

/// OMDb client over a [`Transport`].
pub struct OmdbClient<T> {
    base_url: String,
    plot: PlotMode,
    transport: T,
}

#[cfg(not(target_arch = "wasm32"))]
impl OmdbClient<HttpTransport> {
    pub fn new() -> Self {
        Self::with_transport(HttpTransport::new(), DEFAULT_BASE_URL)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for OmdbClient<HttpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> OmdbClient<T> {
    pub fn with_transport(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            plot: PlotMode::default(),
            transport,
        }
    }

    pub fn with_plot(mut self, plot: PlotMode) -> Self {
        self.plot = plot;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET the API and parse the reply.
    ///
    /// A non-success status is only an error when the body is not an OMDb
    /// payload; otherwise the payload's own flag and message are used.
    async fn fetch<W: DeserializeOwned>(&self, query: &[(&str, String)]) -> Result<W, ApiError> {
        let reply = self.transport.get(&self.base_url, query).await?;
        let status = reply.status;
        let success = reply.is_success();
        let text = read_text(reply.body).await?;

        if !success && parse_text::<OmdbEnvelope>(&text).is_err() {
            warn!(status, "error status without an OMDb payload");
            return Err(ApiError::Api {
                status,
                message: text,
            });
        }
        parse_text(&text)
    }
}

impl<T: Transport> MovieService for OmdbClient<T> {
    async fn search(&self, key: &ApiKey, query: &str) -> Result<Lookup<SearchPage>, ApiError> {
        debug!(query, "searching titles");
        let resp: OmdbSearchResponse = self
            .fetch(&[
                ("apikey", key.expose().to_string()),
                ("s", query.to_string()),
            ])
            .await?;
        Ok(resp.into_lookup())
    }

    async fn detail(&self, key: &ApiKey, id: &str) -> Result<Lookup<DetailRecord>, ApiError> {
        debug!(id, plot = self.plot.as_str(), "fetching title details");
        let resp: OmdbDetailResponse = self
            .fetch(&[
                ("apikey", key.expose().to_string()),
                ("i", id.to_string()),
                ("plot", self.plot.as_str().to_string()),
            ])
            .await?;
        Ok(resp.into_lookup())
    }
}
