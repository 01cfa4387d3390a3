use std::future::Future;

use crate::body::ResponseBody;
use crate::error::ApiError;

#[cfg(not(target_arch = "wasm32"))]
mod http;

#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpTransport;

/// Status code and body of one HTTP exchange.
///
/// The body is present for every status. OMDb sends some failures, such as a
/// rejected key, as a regular payload on a 4xx reply.
pub struct Reply {
    pub status: u16,
    pub body: ResponseBody,
}

impl Reply {
    pub fn new(status: u16, body: ResponseBody) -> Self {
        Self { status, body }
    }

    /// A `200 OK` reply.
    pub fn ok(body: ResponseBody) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can perform a GET request and hand back its reply.
pub trait Transport: Send + Sync {
    /// GET `url` with the given query parameters.
    fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> impl Future<Output = Result<Reply, ApiError>> + Send;
}
