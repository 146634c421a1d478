use serde::{Deserialize, Serialize};

use crate::models::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions finite and strictly positive.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Maps playback time to the annotation frame index: `floor(time * fps)`.
/// `None` for negative or non-finite input.
pub fn frame_index(time_secs: f64, fps: f64) -> Option<u64> {
    if !time_secs.is_finite() || !fps.is_finite() || time_secs < 0.0 || fps <= 0.0 {
        return None;
    }
    Some((time_secs * fps).floor() as u64)
}

/// Per-axis factors from detector pixel space to canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    /// `None` while the intrinsic video size is unknown or zero.
    pub fn between(video: Size, canvas: Size) -> Option<Self> {
        if !video.is_drawable() || !canvas.is_drawable() {
            return None;
        }
        Some(Self {
            x: canvas.width / video.width,
            y: canvas.height / video.height,
        })
    }

    pub fn map_box(&self, bbox: &BoundingBox) -> Rect {
        Rect {
            x: bbox.x1 * self.x,
            y: bbox.y1 * self.y,
            width: bbox.width() * self.x,
            height: bbox.height() * self.y,
        }
    }
}
