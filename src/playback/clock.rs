use std::sync::Arc;

use serde::Serialize;
use tokio::time::{self, Duration, Interval, MissedTickBehavior};

use super::video::{FrameReceiver, FrameTick, VideoSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClockKind {
    VideoFrames,
    AnimationPoll,
}

/// Source of render ticks for one playback loop. Picked once per loop by
/// what the host supports.
pub enum FrameClock {
    /// One tick per decoded frame, carrying the frame's media time.
    VideoFrames(FrameReceiver),
    /// Fixed-rate poll of the element's current time. Ends as soon as the
    /// element reports paused or ended.
    AnimationPoll {
        ticker: Interval,
        video: Arc<dyn VideoSurface>,
    },
}

impl FrameClock {
    pub fn select(video: &Arc<dyn VideoSurface>, poll_interval: Duration) -> Self {
        match video.subscribe_frames() {
            Some(frames) => FrameClock::VideoFrames(frames),
            None => {
                let mut ticker = time::interval(poll_interval);
                // A late poll only needs the newest time, not the missed ones.
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                FrameClock::AnimationPoll {
                    ticker,
                    video: Arc::clone(video),
                }
            }
        }
    }

    pub fn kind(&self) -> ClockKind {
        match self {
            FrameClock::VideoFrames(_) => ClockKind::VideoFrames,
            FrameClock::AnimationPoll { .. } => ClockKind::AnimationPoll,
        }
    }

    /// Waits for the next frame to draw. `None` ends the loop.
    pub async fn next_tick(&mut self) -> Option<FrameTick> {
        match self {
            FrameClock::VideoFrames(frames) => {
                let mut tick = frames.recv().await?;
                // Frames queued while the last step ran are already stale.
                while let Ok(newer) = frames.try_recv() {
                    tick = newer;
                }
                Some(tick)
            }
            FrameClock::AnimationPoll { ticker, video } => {
                ticker.tick().await;
                if video.is_paused() || video.is_ended() {
                    return None;
                }
                Some(FrameTick {
                    media_time: video.current_time(),
                })
            }
        }
    }
}
