pub mod body;
pub mod error;
pub mod omdb;
pub mod traits;
pub mod transport;

pub use error::ApiError;
pub use omdb::OmdbClient;
pub use transport::{Reply, Transport};

#[cfg(not(target_arch = "wasm32"))]
pub use transport::HttpTransport;
