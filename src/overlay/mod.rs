pub mod canvas;
pub mod geometry;
pub mod layout;
pub mod renderer;
pub mod target;

pub use canvas::{lock_canvas, shared_canvas, DrawCommand, OverlayCanvas, RecordingCanvas, SharedCanvas};
pub use geometry::{frame_index, Rect, Scale, Size};
pub use layout::LayoutTracker;
pub use renderer::{render_overlay, ClearReason, OverlayFrame, OverlayStyle, RenderOutcome};
pub use target::OverlayTarget;
