use futures::TryStreamExt;
use reqwest::Client;
use tracing::{debug, warn};

use super::{Reply, Transport};
use crate::body::ResponseBody;
use crate::error::ApiError;

/// reqwest-backed transport. Bodies are always delivered chunked.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Reply, ApiError> {
        // Query values carry the API key; only the base URL is logged.
        debug!(url, "GET");
        let resp = self.http.get(url).query(query).send().await?;
        let status = resp.status();
        if status.is_success() {
            debug!(
                status = status.as_u16(),
                content_length = ?resp.content_length(),
                "response headers received"
            );
        } else {
            warn!(status = status.as_u16(), "non-success status, reading body anyway");
        }

        Ok(Reply::new(
            status.as_u16(),
            ResponseBody::chunked(resp.bytes_stream().map_err(ApiError::from)),
        ))
    }
}
