use std::sync::atomic::{AtomicBool, Ordering};

use super::canvas::OverlayCanvas;
use super::geometry::Size;

/// Remembers that a resize or fullscreen transition happened since the last
/// draw. Starts dirty so the first draw sizes the canvas.
#[derive(Debug)]
pub struct LayoutTracker {
    dirty: AtomicBool,
}

impl Default for LayoutTracker {
    fn default() -> Self {
        Self {
            dirty: AtomicBool::new(true),
        }
    }
}

impl LayoutTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Resizes `canvas` to `display` if a layout change is pending. Returns
    /// whether the canvas was resized. An undrawable display size keeps the
    /// tracker dirty so the next draw retries.
    pub fn sync(&self, canvas: &mut dyn OverlayCanvas, display: Size) -> bool {
        if !self.dirty.load(Ordering::Acquire) || !display.is_drawable() {
            return false;
        }
        self.dirty.store(false, Ordering::Release);

        if canvas.size() == display {
            return false;
        }
        canvas.resize(display);
        true
    }
}
