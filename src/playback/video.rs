use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::overlay::Size;

/// A decoded frame handed to the compositor, stamped with its media time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    pub media_time: f64,
}

pub type FrameSender = mpsc::UnboundedSender<FrameTick>;
pub type FrameReceiver = mpsc::UnboundedReceiver<FrameTick>;

/// Media events the host forwards from its video element and window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackEvent {
    Play,
    Pause,
    Ended,
    Resized,
    FullscreenChanged,
}

/// The host's video element. Calls are cheap, synchronous reads and writes
/// of element state.
pub trait VideoSurface: Send + Sync {
    fn current_time(&self) -> f64;
    fn seek(&self, secs: f64);
    fn is_paused(&self) -> bool;
    fn is_ended(&self) -> bool;
    fn play(&self);
    fn pause(&self);
    /// Reassigning the source resets position and paused state.
    fn set_source(&self, url: &str);
    fn clear_source(&self);
    /// Pixel size of the decoded video; `None` until metadata has loaded.
    fn intrinsic_size(&self) -> Option<Size>;
    /// Current on-screen pixel size of the video surface.
    fn display_size(&self) -> Size;
    /// Frame rate reported by the playing track, when the host knows it.
    fn frame_rate(&self) -> Option<f64>;
    /// Decoded-frame notifications, `None` when the host cannot provide them.
    fn subscribe_frames(&self) -> Option<FrameReceiver>;
}
