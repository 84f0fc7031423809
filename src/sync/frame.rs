//! Frame-synchronized scheduling.
//!
//! The poll loop runs one cycle per display frame rather than on a fixed
//! timer. Hosts with a real vsync source (display link, compositor frame
//! callback) feed it through `frame_channel`; everything else uses
//! `RefreshClock`, which ticks at the configured refresh rate.

use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

/// One display frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameTick {
    /// 1-based frame counter of the clock that produced it.
    pub index: u64,
    pub at: Instant,
}

/// Source of display frames.
pub trait FrameClock: Send + 'static {
    /// Wait for the next frame. `None` once the source has shut down.
    fn next_frame(&mut self) -> BoxFuture<'_, Option<FrameTick>>;
}

/// Frame clock running at a fixed refresh rate.
///
/// Late frames are skipped rather than bunched up, like a display that
/// missed a vsync.
pub struct RefreshClock {
    period: Duration,
    interval: Option<Interval>,
    index: u64,
}

impl RefreshClock {
    pub fn new(refresh_rate_hz: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / refresh_rate_hz.max(1),
            interval: None,
            index: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl FrameClock for RefreshClock {
    fn next_frame(&mut self) -> BoxFuture<'_, Option<FrameTick>> {
        Box::pin(async move {
            // Created on first use: tokio intervals need a running runtime
            let period = self.period;
            let interval = self.interval.get_or_insert_with(|| {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                interval
            });
            let at = interval.tick().await.into_std();
            self.index += 1;
            Some(FrameTick {
                index: self.index,
                at,
            })
        })
    }
}

/// Create a frame clock driven by the host's own refresh callback.
pub fn frame_channel() -> (FrameTrigger, ChannelClock) {
    let (tx, rx) = mpsc::unbounded_channel();
    (FrameTrigger { tx }, ChannelClock { rx, index: 0 })
}

/// Sending half of `frame_channel`. Cheap to clone, callable from any thread.
#[derive(Clone)]
pub struct FrameTrigger {
    tx: mpsc::UnboundedSender<Instant>,
}

impl FrameTrigger {
    /// Signal a new frame. Returns false once the clock is gone.
    pub fn tick(&self) -> bool {
        self.tx.send(Instant::now()).is_ok()
    }
}

/// Receiving half of `frame_channel`; ends when every trigger is dropped.
pub struct ChannelClock {
    rx: mpsc::UnboundedReceiver<Instant>,
    index: u64,
}

impl FrameClock for ChannelClock {
    fn next_frame(&mut self) -> BoxFuture<'_, Option<FrameTick>> {
        Box::pin(async move {
            let at = self.rx.recv().await?;
            self.index += 1;
            Some(FrameTick {
                index: self.index,
                at,
            })
        })
    }
}
