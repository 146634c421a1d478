use std::sync::Arc;

use anyhow::{bail, Result};
use serde::Serialize;
use tokio::sync::{watch, Mutex};

use crate::{
    api::{ClipApi, StreamMode},
    library::{ColumnSort, FilterSet, LibraryAction, LibraryState, SortKey},
    models::Clip,
    overlay::{OverlayTarget, SharedCanvas},
    playback::{PlaybackEvent, VideoSurface},
    selection::{SelectOutcome, SelectionController, SelectionState},
    settings::ViewerSettings,
};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Everything the review screen renders, published after every change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub visible: Vec<Clip>,
    pub total: usize,
    pub filters: FilterSet,
    pub sort: SortKey,
    pub column_sort: ColumnSort,
    pub load_error: Option<String>,
    pub selection: SelectionState,
    pub object_classes: Vec<String>,
}

/// Ties the clip library to the selection controller and publishes a
/// [`ViewSnapshot`] to subscribers whenever either side changes.
pub struct ReviewSession {
    api: Arc<dyn ClipApi>,
    library: Arc<Mutex<LibraryState>>,
    selection: SelectionController,
    snapshot_tx: watch::Sender<ViewSnapshot>,
}

impl ReviewSession {
    pub fn new(
        api: Arc<dyn ClipApi>,
        video: Arc<dyn VideoSurface>,
        canvas: SharedCanvas,
        settings: &ViewerSettings,
    ) -> Self {
        let library = LibraryState::new(settings.default_sort);
        let initial = SelectionState::new(settings.default_mode, settings.show_annotations);
        let selection = SelectionController::new(
            Arc::clone(&api),
            video,
            OverlayTarget::new(canvas, settings.overlay.clone()),
            settings.playback(),
            initial.clone(),
        );
        let (snapshot_tx, _) = watch::channel(build_snapshot(&library, initial));

        Self {
            api,
            library: Arc::new(Mutex::new(library)),
            selection,
            snapshot_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub async fn library(&self) -> LibraryState {
        self.library.lock().await.clone()
    }

    /// Fetches the clip list. On failure the library is emptied and the
    /// error recorded for display before it is returned. Either way an active
    /// clip that is no longer listed gets deselected.
    pub async fn load_library(&self) -> Result<usize> {
        let (action, outcome) = match self.api.list_clips().await {
            Ok(clips) => {
                let count = clips.len();
                (LibraryAction::Loaded(clips), Ok(count))
            }
            Err(err) => {
                log_warn!("failed to load clip library: {err}");
                (LibraryAction::LoadFailed(err.to_string()), Err(err))
            }
        };

        let orphaned = {
            let mut library = self.library.lock().await;
            *library = std::mem::take(&mut *library).reduce(action);
            let active = self.selection.snapshot().await.active_vid;
            active.filter(|vid| !library.contains(vid))
        };

        if let Some(vid) = orphaned {
            log_info!("active clip {vid} is gone from the library, deselecting");
            self.selection.deselect().await?;
        }
        self.publish().await;

        let count = outcome?;
        log_info!("library loaded with {count} clips");
        Ok(count)
    }

    pub async fn dispatch(&self, action: LibraryAction) {
        {
            let mut library = self.library.lock().await;
            *library = std::mem::take(&mut *library).reduce(action);
        }
        self.publish().await;
    }

    /// Selects a clip from the full list. The membership check and the
    /// switch to `Loading` happen under the library lock, so a concurrent
    /// reload either sees the new selection or runs before the check.
    pub async fn select(&self, vid: &str) -> Result<SelectOutcome> {
        let request_seq = {
            let library = self.library.lock().await;
            if !library.contains(vid) {
                bail!("clip {vid} is not in the library");
            }
            self.selection.begin_select(vid).await?
        };
        let Some(request_seq) = request_seq else {
            return Ok(SelectOutcome::Unchanged);
        };

        self.publish().await;
        let outcome = self.selection.complete_select(vid, request_seq).await?;
        self.publish().await;
        Ok(outcome)
    }

    pub async fn deselect(&self) -> Result<()> {
        self.selection.deselect().await?;
        self.publish().await;
        Ok(())
    }

    pub async fn set_mode(&self, mode: StreamMode) -> Result<()> {
        self.selection.set_mode(mode).await?;
        self.publish().await;
        Ok(())
    }

    pub async fn set_show_annotations(&self, show: bool) {
        self.selection.set_show_annotations(show).await;
        self.publish().await;
    }

    pub async fn handle_event(&self, event: PlaybackEvent) -> Result<()> {
        self.selection.handle_event(event).await
    }

    async fn publish(&self) {
        let selection = self.selection.snapshot().await;
        let snapshot = build_snapshot(&*self.library.lock().await, selection);
        self.snapshot_tx.send_replace(snapshot);
    }
}

fn build_snapshot(library: &LibraryState, selection: SelectionState) -> ViewSnapshot {
    ViewSnapshot {
        visible: library.visible().to_vec(),
        total: library.all().len(),
        filters: library.filters().clone(),
        sort: library.sort(),
        column_sort: library.column_sort(),
        load_error: library.load_error().map(str::to_string),
        selection,
        object_classes: library.object_classes(),
    }
}
