use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::geometry::{Rect, Size};

/// 2D drawing surface layered over the video, implemented by the host.
pub trait OverlayCanvas: Send {
    fn size(&self) -> Size;
    fn resize(&mut self, size: Size);
    fn clear(&mut self);
    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f64);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    /// `(x, y)` is the alphabetic baseline start of the text.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str, font: &str);
    fn measure_text(&self, text: &str, font: &str) -> f64;
}

pub type SharedCanvas = Arc<Mutex<dyn OverlayCanvas>>;

pub fn shared_canvas<C: OverlayCanvas + 'static>(canvas: C) -> SharedCanvas {
    Arc::new(Mutex::new(canvas))
}

/// A panic mid-draw leaves at worst a half-drawn frame; keep using the canvas.
pub fn lock_canvas(canvas: &SharedCanvas) -> MutexGuard<'_, dyn OverlayCanvas + 'static> {
    canvas.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize(Size),
    Clear,
    StrokeRect { rect: Rect, color: String, line_width: f64 },
    FillRect { rect: Rect, color: String },
    FillText { text: String, x: f64, y: f64, color: String },
}

/// Canvas that records draw calls instead of rasterizing. Used by headless
/// hosts and tests.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    size: Size,
    char_width: f64,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            char_width: 7.0,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    fn since_last_clear(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|command| matches!(command, DrawCommand::Clear))
            .map_or(0, |index| index + 1);
        &self.commands[start..]
    }

    /// Rectangles stroked since the most recent clear.
    pub fn visible_boxes(&self) -> Vec<Rect> {
        self.since_last_clear()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::StrokeRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn visible_labels(&self) -> Vec<String> {
        self.since_last_clear()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::FillText { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl OverlayCanvas for RecordingCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
        self.commands.push(DrawCommand::Resize(size));
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f64) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color: color.to_string(),
            line_width,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color: color.to_string(),
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: &str, _font: &str) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
            color: color.to_string(),
        });
    }

    fn measure_text(&self, text: &str, _font: &str) -> f64 {
        text.chars().count() as f64 * self.char_width
    }
}
