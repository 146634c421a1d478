use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::StreamMode;
use crate::models::AnnotationSet;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SelectionStatus {
    #[default]
    Idle,
    Loading,
    Active,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub status: SelectionStatus,
    pub active_vid: Option<String>,
    pub mode: StreamMode,
    pub show_annotations: bool,
    pub annotation_count: usize,
    /// Tags the in-flight annotation fetch; only the latest may land.
    #[serde(skip)]
    pub request_seq: u64,
    #[serde(skip)]
    pub annotations: Arc<AnnotationSet>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            status: SelectionStatus::Idle,
            active_vid: None,
            mode: StreamMode::Normal,
            show_annotations: true,
            annotation_count: 0,
            request_seq: 0,
            annotations: Arc::new(AnnotationSet::empty()),
        }
    }
}

impl SelectionState {
    pub fn new(mode: StreamMode, show_annotations: bool) -> Self {
        Self {
            mode,
            show_annotations,
            ..Self::default()
        }
    }

    pub fn is_current(&self, vid: &str) -> bool {
        self.status != SelectionStatus::Idle && self.active_vid.as_deref() == Some(vid)
    }

    /// Enters `Loading` for `vid`, dropping the previous clip's annotations.
    /// Returns the sequence number the fetch must present to land.
    pub fn begin_loading(&mut self, vid: &str) -> u64 {
        self.request_seq = self.request_seq.wrapping_add(1);
        self.status = SelectionStatus::Loading;
        self.active_vid = Some(vid.to_string());
        self.annotations = Arc::new(AnnotationSet::empty());
        self.annotation_count = 0;
        self.request_seq
    }

    /// Applies a completed fetch if it is still the one being waited on.
    pub fn finish_loading(&mut self, request_seq: u64, annotations: Arc<AnnotationSet>) -> bool {
        if self.status != SelectionStatus::Loading || self.request_seq != request_seq {
            return false;
        }
        if annotations.vid() != self.active_vid.as_deref() {
            return false;
        }

        self.annotation_count = annotations.len();
        self.annotations = annotations;
        self.status = SelectionStatus::Active;
        true
    }

    /// Back to `Idle`. Bumps the sequence so an in-flight fetch is rejected.
    pub fn clear(&mut self) {
        self.request_seq = self.request_seq.wrapping_add(1);
        self.status = SelectionStatus::Idle;
        self.active_vid = None;
        self.annotations = Arc::new(AnnotationSet::empty());
        self.annotation_count = 0;
    }
}
