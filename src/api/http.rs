use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use super::{ApiError, ClipApi, StreamMode};
use crate::models::{Annotation, Clip};

const CONNECT_TIMEOUT_SECS: u64 = 5;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// `ClipApi` backed by the GardenEye HTTP server.
#[derive(Clone)]
pub struct HttpClipApi {
    client: Client,
    base: Url,
    videos_endpoint: Url,
    annotations_endpoint: Url,
    stream_endpoint: Url,
}

impl HttpClipApi {
    pub fn new(server_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|source| ApiError::Transport {
                url: server_url.to_string(),
                source,
            })?;
        Self::with_client(client, server_url)
    }

    pub fn with_client(client: Client, server_url: &str) -> Result<Self, ApiError> {
        // Relative joins replace the last path segment unless it ends in '/'.
        let mut base = Url::parse(server_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            client,
            videos_endpoint: base.join("api/videos")?,
            annotations_endpoint: base.join("api/annotations/")?,
            stream_endpoint: base.join("stream")?,
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute thumbnail URL for a clip, if the backend advertised one.
    /// Root-relative paths resolve under the base path like every endpoint.
    pub fn thumbnail_url(&self, clip: &Clip) -> Option<String> {
        let relative = clip.thumbnail_url.as_deref()?.trim_start_matches('/');
        self.base.join(relative).ok().map(String::from)
    }

    fn annotations_url(&self, vid: &str) -> Result<Url, ApiError> {
        let mut url = self.annotations_endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(vid);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let url_text = url.to_string();
        debug!("GET {url_text}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url_text.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url_text,
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| ApiError::Decode { url: url_text, source })
    }
}

#[async_trait]
impl ClipApi for HttpClipApi {
    async fn list_clips(&self) -> Result<Vec<Clip>, ApiError> {
        self.get_json(self.videos_endpoint.clone()).await
    }

    async fn fetch_annotations(&self, vid: &str) -> Result<Vec<Annotation>, ApiError> {
        let url = self.annotations_url(vid)?;
        self.get_json(url).await
    }

    fn stream_url(&self, vid: &str, mode: StreamMode) -> String {
        let mut url = self.stream_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("vid", vid)
            .append_pair("mode", mode.as_str());
        url.into()
    }
}
