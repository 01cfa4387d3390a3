pub mod client;
pub mod types;

pub use client::{OmdbClient, PlotMode, DEFAULT_BASE_URL};
