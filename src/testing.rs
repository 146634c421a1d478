//! In-memory stand-ins for the host video element and the backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::{mpsc, Notify};
use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, ClipApi, StreamMode};
use crate::models::{Annotation, BoundingBox, Clip};
use crate::overlay::Size;
use crate::playback::{FrameReceiver, FrameSender, FrameTick, VideoSurface};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn clip(vid: &str, objects: &[&str]) -> Clip {
    let mut clip = Clip::new(vid, format!("{vid}.mp4"));
    clip.objects = objects.iter().map(|object| object.to_string()).collect();
    clip
}

pub fn annotation(frame_idx: u64, name: &str) -> Annotation {
    Annotation::new(frame_idx, BoundingBox::new(10.0, 10.0, 50.0, 50.0), name, 0.9)
}

#[derive(Debug)]
pub struct FakeVideoState {
    pub time: f64,
    pub paused: bool,
    pub ended: bool,
    pub source: Option<String>,
    pub sources_set: Vec<String>,
    pub intrinsic: Option<Size>,
    pub display: Size,
    pub frame_rate: Option<f64>,
    pub frame_callbacks: bool,
    pub frame_tx: Option<FrameSender>,
}

pub struct FakeVideo {
    state: Mutex<FakeVideoState>,
}

impl FakeVideo {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeVideoState {
                time: 0.0,
                paused: true,
                ended: false,
                source: None,
                sources_set: Vec::new(),
                intrinsic: Some(Size::new(640.0, 480.0)),
                display: Size::new(800.0, 600.0),
                frame_rate: None,
                frame_callbacks: false,
                frame_tx: None,
            }),
        }
    }

    pub fn with_frame_callbacks() -> Self {
        let video = Self::new();
        video.state().frame_callbacks = true;
        video
    }

    pub fn state(&self) -> MutexGuard<'_, FakeVideoState> {
        lock(&self.state)
    }

    pub fn set_time(&self, time: f64) {
        self.state().time = time;
    }

    /// Delivers a decoded-frame callback. Returns false with no subscriber.
    pub fn present_frame(&self, media_time: f64) -> bool {
        self.state()
            .frame_tx
            .as_ref()
            .is_some_and(|tx| tx.send(FrameTick { media_time }).is_ok())
    }
}

impl VideoSurface for FakeVideo {
    fn current_time(&self) -> f64 {
        self.state().time
    }

    fn seek(&self, secs: f64) {
        self.state().time = secs;
    }

    fn is_paused(&self) -> bool {
        self.state().paused
    }

    fn is_ended(&self) -> bool {
        self.state().ended
    }

    fn play(&self) {
        let mut state = self.state();
        state.paused = false;
        state.ended = false;
    }

    fn pause(&self) {
        self.state().paused = true;
    }

    fn set_source(&self, url: &str) {
        let mut state = self.state();
        state.source = Some(url.to_string());
        state.sources_set.push(url.to_string());
        state.time = 0.0;
        state.paused = true;
        state.ended = false;
    }

    fn clear_source(&self) {
        self.state().source = None;
    }

    fn intrinsic_size(&self) -> Option<Size> {
        self.state().intrinsic
    }

    fn display_size(&self) -> Size {
        self.state().display
    }

    fn frame_rate(&self) -> Option<f64> {
        self.state().frame_rate
    }

    fn subscribe_frames(&self) -> Option<FrameReceiver> {
        let mut state = self.state();
        if !state.frame_callbacks {
            return None;
        }
        let (tx, rx) = mpsc::unbounded_channel();
        state.frame_tx = Some(tx);
        Some(rx)
    }
}

#[derive(Default)]
pub struct FakeClipApi {
    clips: Mutex<Vec<Clip>>,
    clips_failure: Mutex<Option<u16>>,
    annotations: Mutex<HashMap<String, Result<Vec<Annotation>, u16>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    fetches: Mutex<Vec<String>>,
    watched_token: Mutex<Option<CancellationToken>>,
    token_cancelled_at_fetch: Mutex<Vec<(String, bool)>>,
}

impl FakeClipApi {
    pub fn new(clips: Vec<Clip>) -> Self {
        let api = Self::default();
        *lock(&api.clips) = clips;
        api
    }

    pub fn set_clips(&self, clips: Vec<Clip>) {
        *lock(&self.clips) = clips;
        *lock(&self.clips_failure) = None;
    }

    pub fn fail_clips(&self, status: u16) {
        *lock(&self.clips_failure) = Some(status);
    }

    pub fn set_annotations(&self, vid: &str, annotations: Vec<Annotation>) {
        lock(&self.annotations).insert(vid.to_string(), Ok(annotations));
    }

    pub fn fail_annotations(&self, vid: &str, status: u16) {
        lock(&self.annotations).insert(vid.to_string(), Err(status));
    }

    /// Holds fetches for `vid` until the returned gate is notified.
    pub fn gate(&self, vid: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.gates).insert(vid.to_string(), Arc::clone(&gate));
        gate
    }

    /// Records whether `token` was already cancelled whenever a fetch starts.
    pub fn watch_token(&self, token: CancellationToken) {
        *lock(&self.watched_token) = Some(token);
    }

    pub fn fetches(&self) -> Vec<String> {
        lock(&self.fetches).clone()
    }

    pub fn token_cancelled_at_fetch(&self) -> Vec<(String, bool)> {
        lock(&self.token_cancelled_at_fetch).clone()
    }

    /// Yields until a fetch for `vid` has started.
    pub async fn wait_for_fetch(&self, vid: &str) {
        for _ in 0..1000 {
            if self.fetches().iter().any(|fetched| fetched == vid) {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("no fetch for {vid} was issued");
    }
}

#[async_trait]
impl ClipApi for FakeClipApi {
    async fn list_clips(&self) -> Result<Vec<Clip>, ApiError> {
        if let Some(status) = *lock(&self.clips_failure) {
            return Err(ApiError::Status {
                url: "/api/videos".into(),
                status,
            });
        }
        Ok(lock(&self.clips).clone())
    }

    async fn fetch_annotations(&self, vid: &str) -> Result<Vec<Annotation>, ApiError> {
        lock(&self.fetches).push(vid.to_string());
        let watched = lock(&self.watched_token).clone();
        if let Some(token) = watched {
            lock(&self.token_cancelled_at_fetch).push((vid.to_string(), token.is_cancelled()));
        }

        let gate = lock(&self.gates).get(vid).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let result = lock(&self.annotations).get(vid).cloned();
        match result {
            Some(Ok(annotations)) => Ok(annotations),
            Some(Err(status)) => Err(ApiError::Status {
                url: format!("/api/annotations/{vid}"),
                status,
            }),
            None => Ok(Vec::new()),
        }
    }

    fn stream_url(&self, vid: &str, mode: StreamMode) -> String {
        format!("/stream?vid={vid}&mode={}", mode.as_str())
    }
}
