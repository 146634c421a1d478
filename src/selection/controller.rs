use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Result;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    api::{ClipApi, StreamMode},
    models::AnnotationSet,
    overlay::OverlayTarget,
    playback::{LoopContext, PlaybackDriver, PlaybackEvent, VideoSurface},
    settings::PlaybackConfig,
};

use super::{SelectionState, SelectionStatus};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectOutcome {
    Activated { annotation_count: usize },
    /// The clip was already loading or active.
    Unchanged,
    /// Another selection or a deselect happened while the fetch was out.
    Stale,
}

/// Drives the single active clip: annotation fetches, video source swaps and
/// the playback loop. Cheap to clone.
#[derive(Clone)]
pub struct SelectionController {
    state: Arc<Mutex<SelectionState>>,
    driver: Arc<Mutex<PlaybackDriver>>,
    api: Arc<dyn ClipApi>,
    video: Arc<dyn VideoSurface>,
    overlay: OverlayTarget,
    show_annotations: Arc<AtomicBool>,
    config: PlaybackConfig,
}

impl SelectionController {
    pub fn new(
        api: Arc<dyn ClipApi>,
        video: Arc<dyn VideoSurface>,
        overlay: OverlayTarget,
        config: PlaybackConfig,
        initial: SelectionState,
    ) -> Self {
        Self {
            show_annotations: Arc::new(AtomicBool::new(initial.show_annotations)),
            state: Arc::new(Mutex::new(initial)),
            driver: Arc::new(Mutex::new(PlaybackDriver::new(config.poll_interval))),
            api,
            video,
            overlay,
            config,
        }
    }

    pub async fn snapshot(&self) -> SelectionState {
        self.state.lock().await.clone()
    }

    pub async fn annotations(&self) -> Arc<AnnotationSet> {
        Arc::clone(&self.state.lock().await.annotations)
    }

    /// Token of the live playback loop, if one is running.
    pub async fn playback_token(&self) -> Option<CancellationToken> {
        self.driver.lock().await.cancel_token()
    }

    pub async fn is_playing(&self) -> bool {
        self.driver.lock().await.is_running()
    }

    /// Makes `vid` the active clip. The previous clip's loop is stopped
    /// before the new annotation fetch goes out. A failed fetch activates
    /// the clip with no annotations.
    pub async fn select(&self, vid: &str) -> Result<SelectOutcome> {
        match self.begin_select(vid).await? {
            Some(request_seq) => self.complete_select(vid, request_seq).await,
            None => Ok(SelectOutcome::Unchanged),
        }
    }

    /// First half of [`select`](Self::select): stops the running loop and
    /// enters `Loading`. Returns `None` when `vid` is already current.
    pub async fn begin_select(&self, vid: &str) -> Result<Option<u64>> {
        let request_seq = {
            let mut state = self.state.lock().await;
            if state.is_current(vid) {
                return Ok(None);
            }

            self.driver.lock().await.stop().await?;
            state.begin_loading(vid)
        };
        self.overlay.clear();
        Ok(Some(request_seq))
    }

    /// Second half of [`select`](Self::select): fetches annotations and
    /// attaches the stream unless the selection moved on meanwhile.
    pub async fn complete_select(&self, vid: &str, request_seq: u64) -> Result<SelectOutcome> {
        let annotations = match self.api.fetch_annotations(vid).await {
            Ok(annotations) => annotations,
            Err(err) => {
                log_warn!("annotations for clip {vid} unavailable, playing without overlay: {err}");
                Vec::new()
            }
        };
        let annotations = Arc::new(AnnotationSet::for_clip(vid, annotations));

        let mut state = self.state.lock().await;
        if !state.finish_loading(request_seq, Arc::clone(&annotations)) {
            log_info!("discarding annotations for clip {vid}: selection moved on");
            return Ok(SelectOutcome::Stale);
        }

        let was_paused = self.video.is_paused();
        self.video.set_source(&self.api.stream_url(vid, state.mode));
        self.video.seek(0.0);
        if !was_paused {
            self.video.play();
        }

        log_info!(
            "clip {vid} active with {} annotations ({} mode)",
            annotations.len(),
            state.mode.as_str()
        );
        Ok(SelectOutcome::Activated {
            annotation_count: annotations.len(),
        })
    }

    pub async fn deselect(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.driver.lock().await.stop().await?;

        if state.status != SelectionStatus::Idle {
            log_info!("deselecting clip {:?}", state.active_vid);
            self.video.pause();
            self.video.clear_source();
        }
        state.clear();
        self.overlay.clear();
        Ok(())
    }

    /// Switches between the normal and movement stream. The active clip keeps
    /// its position and paused state; annotations are not re-fetched.
    pub async fn set_mode(&self, mode: StreamMode) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.mode == mode {
            return Ok(());
        }
        state.mode = mode;

        if state.status == SelectionStatus::Active {
            if let Some(vid) = state.active_vid.as_deref() {
                self.swap_source(&self.api.stream_url(vid, mode));
            }
        }
        Ok(())
    }

    pub async fn set_show_annotations(&self, show: bool) {
        self.show_annotations.store(show, Ordering::Release);
        self.state.lock().await.show_annotations = show;
        if !show {
            self.overlay.clear();
        }
    }

    pub async fn handle_event(&self, event: PlaybackEvent) -> Result<()> {
        match event {
            PlaybackEvent::Play => {
                let state = self.state.lock().await;
                let Some(vid) = state.active_vid.clone() else {
                    return Ok(());
                };
                if state.status != SelectionStatus::Active {
                    return Ok(());
                }

                let ctx = LoopContext {
                    loop_id: Uuid::nil(),
                    vid,
                    video: Arc::clone(&self.video),
                    overlay: self.overlay.clone(),
                    annotations: Arc::clone(&state.annotations),
                    show_annotations: Arc::clone(&self.show_annotations),
                    fallback_fps: self.config.fallback_fps,
                };
                self.driver.lock().await.start(ctx).await?;
            }
            PlaybackEvent::Pause | PlaybackEvent::Ended => {
                let _state = self.state.lock().await;
                self.driver.lock().await.stop().await?;
                self.overlay.clear();
            }
            PlaybackEvent::Resized | PlaybackEvent::FullscreenChanged => {
                self.overlay.layout().mark_dirty();
            }
        }
        Ok(())
    }

    /// Reassigning a media source resets position and paused state, so both
    /// are read first and put back afterwards.
    fn swap_source(&self, url: &str) {
        let position = self.video.current_time();
        let paused = self.video.is_paused();

        self.video.set_source(url);
        self.video.seek(position);
        if paused {
            self.video.pause();
        } else {
            self.video.play();
        }
    }
}
