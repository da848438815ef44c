//! Periodic timers for the client actor
//!
//! A [`Ticker`] is a tokio task that reports ticks through a callback; it is
//! cancelled when dropped. The [`PollScheduler`] turns poll ticks into state
//! refresh requests while the channel is connected.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::protocol::OutboundCommand;

/// Which timer produced a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Reconnect,
    Poll,
}

/// Callback invoked on every tick
pub type TickCallback = Arc<dyn Fn(TimerKind) + Send + Sync>;

/// Fixed-interval timer task, aborted on drop
pub struct Ticker {
    kind: TimerKind,
    task: JoinHandle<()>,
}

impl Ticker {
    /// Tick first after `delay`, then every `period`
    pub fn spawn(
        kind: TimerKind,
        delay: Duration,
        period: Duration,
        on_tick: TickCallback,
    ) -> Self {
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + delay, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                on_tick(kind);
            }
        });
        Self { kind, task }
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    /// Stop ticking
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Fixed-interval poll loop with a stop flag honoured at the next tick
pub struct PollScheduler {
    period: Duration,
    on_tick: TickCallback,
    stopped: bool,
    ticker: Option<Ticker>,
}

impl PollScheduler {
    pub fn new(period: Duration, on_tick: TickCallback) -> Self {
        Self {
            period,
            on_tick,
            stopped: true,
            ticker: None,
        }
    }

    /// Clear the stop flag and start ticking (first tick immediately)
    ///
    /// A loop that is still alive is reused rather than duplicated.
    pub fn start(&mut self) {
        self.stopped = false;
        if self.ticker.is_none() {
            debug!("Poll loop started ({:?})", self.period);
            self.ticker = Some(Ticker::spawn(
                TimerKind::Poll,
                Duration::ZERO,
                self.period,
                self.on_tick.clone(),
            ));
        }
    }

    /// Set the stop flag; the loop ends at its next tick
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Whether poll ticks currently produce requests (when connected)
    pub fn is_running(&self) -> bool {
        !self.stopped && self.ticker.is_some()
    }

    /// Handle one poll tick
    ///
    /// Returns the requests to send: none once stopped (and the loop is
    /// cancelled), none while disconnected, else analog and pose refresh.
    pub fn on_tick(&mut self, connected: bool) -> Vec<OutboundCommand> {
        if self.stopped {
            if let Some(ticker) = self.ticker.take() {
                debug!("Poll loop stopped");
                ticker.cancel();
            }
            return Vec::new();
        }
        if !connected {
            return Vec::new();
        }
        vec![OutboundCommand::input_analog(), OutboundCommand::input_pose()]
    }
}
