use std::sync::Arc;

use super::canvas::{lock_canvas, SharedCanvas};
use super::geometry::Size;
use super::layout::LayoutTracker;
use super::renderer::{render_overlay, OverlayFrame, OverlayStyle, RenderOutcome};

/// The canvas layered over the video together with its layout state and
/// drawing style.
#[derive(Clone)]
pub struct OverlayTarget {
    canvas: SharedCanvas,
    layout: Arc<LayoutTracker>,
    style: Arc<OverlayStyle>,
}

impl OverlayTarget {
    pub fn new(canvas: SharedCanvas, style: OverlayStyle) -> Self {
        Self {
            canvas,
            layout: Arc::new(LayoutTracker::new()),
            style: Arc::new(style),
        }
    }

    pub fn layout(&self) -> &LayoutTracker {
        &self.layout
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Brings the canvas up to the surface's `display` size if the layout
    /// changed, then renders `frame`.
    pub fn draw(&self, frame: &OverlayFrame<'_>, display: Size) -> RenderOutcome {
        let mut canvas = lock_canvas(&self.canvas);
        self.layout.sync(&mut *canvas, display);
        render_overlay(frame, &self.style, &mut *canvas)
    }

    pub fn clear(&self) {
        lock_canvas(&self.canvas).clear();
    }
}
