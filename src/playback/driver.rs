use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::clock::{ClockKind, FrameClock};
use super::loop_worker::{playback_loop, LoopContext};

const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// Owns the single live playback loop. Starting a loop always cancels and
/// joins the previous one first.
pub struct PlaybackDriver {
    poll_interval: Duration,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    loop_id: Option<Uuid>,
}

impl PlaybackDriver {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            handle: None,
            cancel_token: None,
            loop_id: None,
        }
    }

    pub async fn start(&mut self, mut ctx: LoopContext) -> Result<(Uuid, ClockKind)> {
        self.stop().await?;

        let clock = FrameClock::select(&ctx.video, self.poll_interval);
        let kind = clock.kind();
        let loop_id = Uuid::new_v4();
        ctx.loop_id = loop_id;

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(playback_loop(ctx, clock, cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        self.loop_id = Some(loop_id);
        Ok((loop_id, kind))
    }

    /// Cancels the live loop, if any, and waits for it to exit. Once this
    /// returns no step of that loop can run.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        let loop_id = self.loop_id.take();
        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("playback loop task failed to join")?;
            if let Some(loop_id) = loop_id {
                log_debug!("playback loop {loop_id} joined");
            }
        }
        Ok(())
    }

    /// True while a loop task exists and has not exited on its own.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn loop_id(&self) -> Option<Uuid> {
        self.loop_id
    }

    /// Token of the live loop.
    pub fn cancel_token(&self) -> Option<CancellationToken> {
        self.cancel_token.clone()
    }
}
