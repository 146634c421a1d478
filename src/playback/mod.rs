pub mod clock;
pub mod driver;
pub mod loop_worker;
pub mod video;

pub use clock::{ClockKind, FrameClock};
pub use driver::PlaybackDriver;
pub use loop_worker::{playback_loop, render_step, LoopContext};
pub use video::{FrameReceiver, FrameSender, FrameTick, PlaybackEvent, VideoSurface};
