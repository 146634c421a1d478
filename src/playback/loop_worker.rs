use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::clock::FrameClock;
use super::video::{FrameTick, VideoSurface};
use crate::models::AnnotationSet;
use crate::overlay::{OverlayFrame, OverlayTarget, RenderOutcome};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// State captured by one loop instance. The annotation set belongs to the
/// clip that was active when the loop started.
#[derive(Clone)]
pub struct LoopContext {
    pub loop_id: Uuid,
    pub vid: String,
    pub video: Arc<dyn VideoSurface>,
    pub overlay: OverlayTarget,
    pub annotations: Arc<AnnotationSet>,
    pub show_annotations: Arc<AtomicBool>,
    pub fallback_fps: f64,
}

impl LoopContext {
    pub fn fps(&self) -> f64 {
        self.video
            .frame_rate()
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .unwrap_or(self.fallback_fps)
    }
}

pub async fn playback_loop(ctx: LoopContext, mut clock: FrameClock, cancel_token: CancellationToken) {
    log_info!(
        "playback loop {} started for clip {} ({:?})",
        ctx.loop_id,
        ctx.vid,
        clock.kind()
    );
    let mut frames_drawn: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            tick = clock.next_tick() => {
                let Some(tick) = tick else { break };
                match render_step(&ctx, &cancel_token, tick) {
                    Some(RenderOutcome::Drew(_)) => frames_drawn += 1,
                    Some(RenderOutcome::Cleared(_)) => {}
                    None => break,
                }
            }
        }
    }

    ctx.overlay.clear();
    log_info!(
        "playback loop {} stopped for clip {} after {} annotated frames",
        ctx.loop_id,
        ctx.vid,
        frames_drawn
    );
}

/// One scheduled step. Returns `None` without touching the canvas once the
/// loop's token is cancelled.
pub fn render_step(
    ctx: &LoopContext,
    cancel_token: &CancellationToken,
    tick: FrameTick,
) -> Option<RenderOutcome> {
    if cancel_token.is_cancelled() {
        log_debug!("loop {} skipped a step after cancellation", ctx.loop_id);
        return None;
    }

    let frame = OverlayFrame {
        time_secs: tick.media_time,
        fps: ctx.fps(),
        annotations: &ctx.annotations,
        show_annotations: ctx.show_annotations.load(Ordering::Acquire),
        paused: ctx.video.is_paused(),
        video_size: ctx.video.intrinsic_size(),
    };
    Some(ctx.overlay.draw(&frame, ctx.video.display_size()))
}
