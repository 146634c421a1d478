pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Annotation, Clip};

pub use http::HttpClipApi;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Server-side rendering variant of the stream endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum StreamMode {
    #[default]
    Normal,
    Movement,
}

impl StreamMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamMode::Normal => "normal",
            StreamMode::Movement => "movement",
        }
    }
}

/// Backend collaborator: clip listing, per-clip annotations and stream URLs.
#[async_trait]
pub trait ClipApi: Send + Sync {
    async fn list_clips(&self) -> Result<Vec<Clip>, ApiError>;

    async fn fetch_annotations(&self, vid: &str) -> Result<Vec<Annotation>, ApiError>;

    fn stream_url(&self, vid: &str, mode: StreamMode) -> String;
}
