use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::guard::Guard;
use crate::metrics::{SWEPT_KEYS, TRACKED_KEYS};

// Periodically drops lapsed buckets so idle callers do not pile up in memory.
// A zero interval means no sweeping, the task returns straight away.
pub async fn sweeper(guards: Vec<Guard>, every: Duration) {
    if every.is_zero() {
        warn!("sweep interval is zero, bucket sweeper not started");
        return;
    }

    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(interval = ?every, limiters = guards.len(), "bucket sweeper started");

    // first tick fires immediately, nothing to sweep yet
    ticker.tick().await;

    loop {
        ticker.tick().await;

        for guard in &guards {
            let limiter = guard.limiter();
            let removed = limiter.sweep_expired();
            let remaining = limiter.tracked_keys();

            SWEPT_KEYS
                .with_label_values(&[guard.scope()])
                .inc_by(removed as u64);
            TRACKED_KEYS
                .with_label_values(&[guard.scope()])
                .set(remaining as i64);

            if removed > 0 {
                debug!(scope = guard.scope(), removed, remaining, "swept expired buckets");
            }
        }
    }
}

pub fn spawn_sweeper(guards: Vec<Guard>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(sweeper(guards, every))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::LimitSettings;

    #[tokio::test]
    async fn background_sweep_clears_lapsed_buckets() {
        let guard = Guard::new(
            "sweeper_lapsed",
            LimitSettings::from_millis(30, 5).unwrap(),
        );
        for i in 0..4 {
            guard.check(&format!("ip:10.1.0.{i}"));
        }
        assert_eq!(guard.limiter().tracked_keys(), 4);

        let handle = spawn_sweeper(vec![guard.clone()], Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.abort();

        assert_eq!(guard.limiter().tracked_keys(), 0);
        assert_eq!(
            SWEPT_KEYS.with_label_values(&["sweeper_lapsed"]).get(),
            4
        );
        assert_eq!(
            TRACKED_KEYS.with_label_values(&["sweeper_lapsed"]).get(),
            0
        );
    }

    #[tokio::test]
    async fn background_sweep_keeps_live_buckets() {
        let guard = Guard::new(
            "sweeper_live",
            LimitSettings::from_millis(60_000, 5).unwrap(),
        );
        guard.check("ip:10.2.0.1");

        let handle = spawn_sweeper(vec![guard.clone()], Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(60)).await;
        handle.abort();

        assert_eq!(guard.limiter().tracked_keys(), 1);
        assert_eq!(SWEPT_KEYS.with_label_values(&["sweeper_live"]).get(), 0);
    }

    #[tokio::test]
    async fn zero_interval_returns_without_panicking() {
        let guard = Guard::new("sweeper_zero", LimitSettings::from_millis(1000, 1).unwrap());
        let handle = spawn_sweeper(vec![guard], Duration::ZERO);
        assert!(handle.await.is_ok());
    }
}
