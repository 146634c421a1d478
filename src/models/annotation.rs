use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Axis-aligned box in source-video pixel space, corners ordered so that
/// `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

#[derive(Deserialize)]
struct RawAnnotation {
    frame_idx: u64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    name: String,
    confidence: f64,
    #[serde(default)]
    class_id: Option<u32>,
}

/// One detector output tied to a frame of a clip.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawAnnotation")]
pub struct Annotation {
    pub frame_idx: u64,
    pub bbox: BoundingBox,
    pub name: String,
    pub confidence: f64,
    pub class_id: Option<u32>,
}

impl From<RawAnnotation> for Annotation {
    fn from(raw: RawAnnotation) -> Self {
        Self {
            frame_idx: raw.frame_idx,
            bbox: BoundingBox::new(raw.x1, raw.y1, raw.x2, raw.y2),
            name: raw.name,
            confidence: raw.confidence.clamp(0.0, 1.0),
            class_id: raw.class_id,
        }
    }
}

impl Annotation {
    pub fn new(frame_idx: u64, bbox: BoundingBox, name: impl Into<String>, confidence: f64) -> Self {
        Self {
            frame_idx,
            bbox,
            name: name.into(),
            confidence: confidence.clamp(0.0, 1.0),
            class_id: None,
        }
    }

    /// Chip text: class name plus confidence as a percentage, one decimal.
    pub fn label(&self) -> String {
        format!("{} {:.1}%", self.name, self.confidence * 100.0)
    }
}

/// All annotations of a single clip, bucketed by frame index.
#[derive(Debug, Clone, Default)]
pub struct AnnotationSet {
    vid: Option<String>,
    by_frame: HashMap<u64, Vec<Annotation>>,
    len: usize,
}

impl AnnotationSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn for_clip(vid: impl Into<String>, annotations: Vec<Annotation>) -> Self {
        let len = annotations.len();
        let mut by_frame: HashMap<u64, Vec<Annotation>> = HashMap::new();
        for annotation in annotations {
            by_frame.entry(annotation.frame_idx).or_default().push(annotation);
        }

        Self {
            vid: Some(vid.into()),
            by_frame,
            len,
        }
    }

    pub fn vid(&self) -> Option<&str> {
        self.vid.as_deref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Annotations whose frame index equals `frame` exactly.
    pub fn at_frame(&self, frame: u64) -> &[Annotation] {
        self.by_frame.get(&frame).map(Vec::as_slice).unwrap_or(&[])
    }
}
