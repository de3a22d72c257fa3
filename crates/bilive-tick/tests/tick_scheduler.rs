//! Integration tests for the tick scheduler.
//!
//! Uses `start_paused` so Tokio auto-advances the clock whenever every
//! task is idle; `sleep_until` resolves as soon as nothing else can run.

use std::time::Duration;

use bilive_tick::{TickConfig, TickScheduler};
use tokio::time::Instant;

// =========================================================================
// Helpers
// =========================================================================

fn every_30s() -> TickConfig {
    TickConfig::every(Duration::from_secs(30))
}

fn delayed(interval: Duration) -> TickConfig {
    TickConfig {
        fire_immediately: false,
        ..TickConfig::every(interval)
    }
}

// =========================================================================
// TickConfig
// =========================================================================

#[test]
fn test_default_config_is_heartbeat_cadence() {
    let cfg = TickConfig::default();
    assert_eq!(cfg.interval, Duration::from_secs(30));
    assert!(cfg.fire_immediately);
    assert_eq!(cfg.initial_jitter, Duration::ZERO);
}

#[test]
fn test_validated_clamps_interval_and_jitter() {
    let cfg = TickConfig {
        interval: Duration::from_millis(10),
        initial_jitter: Duration::from_secs(5),
        ..TickConfig::default()
    }
    .validated();
    assert_eq!(cfg.interval, TickConfig::MIN_INTERVAL);
    assert_eq!(cfg.initial_jitter, TickConfig::MIN_INTERVAL);
}

// =========================================================================
// Scheduler creation and accessors
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_scheduler_initial_state() {
    let s = TickScheduler::new(every_30s());
    assert_eq!(s.tick_count(), 0);
    assert_eq!(s.interval(), Duration::from_secs(30));
}

// =========================================================================
// Tick firing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_first_tick_is_immediate() {
    let start = Instant::now();
    let mut s = TickScheduler::new(every_30s());

    let info = s.wait_for_tick().await;
    assert_eq!(info.tick, 1);
    assert!(!info.overrun);
    assert_eq!(Instant::now() - start, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_delayed_first_tick_waits_one_interval() {
    let start = Instant::now();
    let mut s = TickScheduler::new(delayed(Duration::from_secs(30)));

    s.wait_for_tick().await;
    assert_eq!(Instant::now() - start, Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn test_ticks_follow_interval() {
    let start = Instant::now();
    let mut s = TickScheduler::new(every_30s());

    for expected in 1..=4u64 {
        let info = s.wait_for_tick().await;
        assert_eq!(info.tick, expected);
        assert_eq!(
            Instant::now() - start,
            Duration::from_secs(30 * (expected - 1))
        );
    }
    assert_eq!(s.tick_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_jitter_delays_first_tick_within_bound() {
    let start = Instant::now();
    let mut s = TickScheduler::new(TickConfig {
        initial_jitter: Duration::from_secs(2),
        ..every_30s()
    });

    s.wait_for_tick().await;
    assert!(Instant::now() - start < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_sub_microsecond_jitter() {
    let start = Instant::now();
    let mut s = TickScheduler::new(TickConfig {
        initial_jitter: Duration::from_nanos(500),
        ..every_30s()
    });

    let info = s.wait_for_tick().await;
    assert_eq!(info.tick, 1);
    assert!(Instant::now() - start < Duration::from_micros(1));
}

#[tokio::test(start_paused = true)]
async fn test_one_nanosecond_jitter_is_zero() {
    let start = Instant::now();
    let mut s = TickScheduler::new(TickConfig {
        initial_jitter: Duration::from_nanos(1),
        ..every_30s()
    });

    s.wait_for_tick().await;
    assert_eq!(Instant::now() - start, Duration::ZERO);
}

// =========================================================================
// Late ticks
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_late_tick_counts_missed_intervals() {
    let mut s = TickScheduler::new(every_30s());
    s.wait_for_tick().await;

    // Stall the caller for 2.5 intervals.
    tokio::time::advance(Duration::from_secs(75)).await;

    let info = s.wait_for_tick().await;
    assert!(info.overrun);
    assert_eq!(info.ticks_skipped, 1);

    // Next tick is one interval after the late one, not a catch-up burst.
    let late_at = Instant::now();
    let info = s.wait_for_tick().await;
    assert!(!info.overrun);
    assert_eq!(Instant::now() - late_at, Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn test_slightly_late_tick_is_not_overrun() {
    let mut s = TickScheduler::new(every_30s());
    s.wait_for_tick().await;

    tokio::time::advance(Duration::from_secs(32)).await;
    let info = s.wait_for_tick().await;
    assert!(!info.overrun);
    assert_eq!(info.ticks_skipped, 0);
}

// =========================================================================
// Integration: select! loop pattern (mirrors heartbeat usage)
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_select_loop_pattern() {
    let mut s = TickScheduler::new(every_30s());
    let (tx, mut rx) = tokio::sync::mpsc::channel::<&str>(1);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(95)).await;
        tx.send("stop").await.ok();
    });

    let mut ticks_fired = 0u64;
    loop {
        tokio::select! {
            Some(cmd) = rx.recv() => {
                assert_eq!(cmd, "stop");
                break;
            }
            info = s.wait_for_tick() => {
                ticks_fired += 1;
                assert_eq!(info.tick, ticks_fired);
            }
        }
    }

    // 0 s, 30 s, 60 s, 90 s.
    assert_eq!(ticks_fired, 4);
}
