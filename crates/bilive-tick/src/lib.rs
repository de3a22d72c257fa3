//! Periodic tick scheduler for bilive keep-alives.
//!
//! A chat session must send a heartbeat frame at a fixed interval (30 s on
//! the live service) for as long as it is open. [`TickScheduler`] owns that
//! cadence: it decides when the next tick is due and how a late wakeup
//! shifts the ones after it.
//!
//! # Integration
//!
//! The scheduler is designed to sit inside a `tokio::select!` loop next to
//! a cancellation branch:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         _ = cancel.cancelled() => break,
//!         info = scheduler.wait_for_tick() => {
//!             conn.send(&heartbeat).await?;
//!         }
//!     }
//! }
//! ```

use std::time::Duration;

use rand::Rng;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the tick scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickConfig {
    /// Time between ticks.
    pub interval: Duration,
    /// Random delay (0..max) added before the first tick so many sessions
    /// opened at once do not heartbeat in lock-step.
    pub initial_jitter: Duration,
    /// Fire the first tick immediately instead of one interval from now.
    pub fire_immediately: bool,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval: Self::HEARTBEAT_INTERVAL,
            initial_jitter: Duration::ZERO,
            fire_immediately: true,
        }
    }
}

impl TickConfig {
    /// Keep-alive cadence the live service expects.
    pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

    /// Shortest interval accepted by [`validated`](Self::validated).
    pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

    /// A config ticking every `interval`, otherwise default.
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`TickScheduler::new`]. Rules:
    /// - `interval` raised to [`Self::MIN_INTERVAL`].
    /// - `initial_jitter` capped to one `interval`.
    pub fn validated(mut self) -> Self {
        if self.interval < Self::MIN_INTERVAL {
            warn!(
                interval_ms = millis(self.interval),
                min_ms = millis(Self::MIN_INTERVAL),
                "tick interval below minimum, clamping"
            );
            self.interval = Self::MIN_INTERVAL;
        }
        if self.initial_jitter > self.interval {
            self.initial_jitter = self.interval;
        }
        self
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// A uniformly random delay in `0..max`, at nanosecond resolution.
fn sample_jitter(max: Duration) -> Duration {
    let max = u64::try_from(max.as_nanos()).unwrap_or(u64::MAX);
    if max == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos(rand::rng().random_range(0..max))
}

// ---------------------------------------------------------------------------
// Tick info (returned to caller each tick)
// ---------------------------------------------------------------------------

/// Information about a fired tick, returned by [`TickScheduler::wait_for_tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInfo {
    /// Monotonically increasing tick number (starts at 1).
    pub tick: u64,
    /// `true` if this tick fired more than a tenth of an interval late.
    pub overrun: bool,
    /// Whole intervals that passed unticked before this tick.
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Periodic tick scheduler. One per session.
///
/// A late tick is not replayed: the next one is scheduled one interval
/// after it fired, and the whole intervals missed are reported in
/// [`TickInfo::ticks_skipped`].
#[derive(Debug)]
pub struct TickScheduler {
    config: TickConfig,
    tick_count: u64,
    /// When the next tick should fire.
    next_tick: Instant,
}

impl TickScheduler {
    /// Create a new scheduler from config.
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();

        let jitter = sample_jitter(config.initial_jitter);
        let first = if config.fire_immediately {
            jitter
        } else {
            config.interval + jitter
        };

        debug!(
            interval_ms = millis(config.interval),
            jitter_ms = millis(jitter),
            fire_immediately = config.fire_immediately,
            "tick scheduler created"
        );

        Self {
            config,
            tick_count: 0,
            next_tick: Instant::now() + first,
        }
    }

    /// Create a scheduler ticking every `interval` with default settings.
    pub fn every(interval: Duration) -> Self {
        Self::new(TickConfig::every(interval))
    }

    /// Wait until the next tick is due. Returns [`TickInfo`] for the tick.
    ///
    /// Cancel-safe: dropping the future before it resolves leaves the
    /// schedule untouched.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let next = self.next_tick;
        let interval = self.config.interval;
        time::sleep_until(next).await;

        let now = Instant::now();
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(next);
        let overrun = late_by > interval / 10;
        let ticks_skipped = if overrun {
            u64::try_from(late_by.as_nanos() / interval.as_nanos()).unwrap_or(u64::MAX)
        } else {
            0
        };
        if ticks_skipped > 0 {
            warn!(
                tick = self.tick_count,
                skipped = ticks_skipped,
                late_ms = millis(late_by),
                "tick overrun, skipping ahead"
            );
        }
        self.next_tick = now + interval;

        trace!(tick = self.tick_count, overrun, "tick fired");

        TickInfo {
            tick: self.tick_count,
            overrun,
            ticks_skipped,
        }
    }

    /// Ticks fired so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn interval(&self) -> Duration {
        self.config.interval
    }
}
