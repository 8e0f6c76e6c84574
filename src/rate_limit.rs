use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::error::{ConfigError, QuotaExceeded};

// about 100 years, keeps reset_at well inside chrono's range
pub const MAX_WINDOW: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// window length and quota, validated once at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitSettings {
    window: TimeDelta,
    max: NonZeroU32,
}

impl LimitSettings {
    pub fn new(window: Duration, max: u32) -> Result<Self, ConfigError> {
        let max = NonZeroU32::new(max).ok_or(ConfigError::ZeroQuota)?;
        if window.is_zero() {
            return Err(ConfigError::ZeroWindow);
        }
        if window > MAX_WINDOW {
            return Err(ConfigError::WindowOutOfRange(window));
        }
        let window =
            TimeDelta::from_std(window).map_err(|_| ConfigError::WindowOutOfRange(window))?;
        Ok(Self { window, max })
    }

    pub fn from_millis(window_ms: u64, max: u32) -> Result<Self, ConfigError> {
        Self::new(Duration::from_millis(window_ms), max)
    }

    pub fn window(&self) -> TimeDelta {
        self.window
    }

    pub fn max(&self) -> u32 {
        self.max.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub count: u32,
    pub reset_at: DateTime<Utc>,
}

impl Bucket {
    fn open(now: DateTime<Utc>, window: TimeDelta) -> Self {
        Self {
            count: 1,
            reset_at: now
                .checked_add_signed(window)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Allowed {
        remaining: u32,
        reset_at: DateTime<Utc>,
    },
    Denied {
        reset_at: DateTime<Utc>,
    },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }

    pub fn reset_at(&self) -> DateTime<Utc> {
        match self {
            Decision::Allowed { reset_at, .. } | Decision::Denied { reset_at } => *reset_at,
        }
    }

    pub fn remaining(&self) -> Option<u32> {
        match self {
            Decision::Allowed { remaining, .. } => Some(*remaining),
            Decision::Denied { .. } => None,
        }
    }

    pub fn into_result(self) -> Result<Admission, QuotaExceeded> {
        match self {
            Decision::Allowed {
                remaining,
                reset_at,
            } => Ok(Admission {
                remaining,
                reset_at,
            }),
            Decision::Denied { reset_at } => Err(QuotaExceeded { reset_at }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

// Fixed-window counter keyed by an opaque caller identity. Each check runs
// under the DashMap entry's shard guard, so checks on one key are serialized.
// State is per instance: N processes grant up to N * max per window.
pub struct FixedWindowLimiter<C = SystemClock> {
    buckets: DashMap<String, Bucket>,
    settings: LimitSettings,
    clock: C,
}

impl FixedWindowLimiter<SystemClock> {
    pub fn new(settings: LimitSettings) -> Self {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> FixedWindowLimiter<C> {
    pub fn with_clock(settings: LimitSettings, clock: C) -> Self {
        Self {
            buckets: DashMap::new(),
            settings,
            clock,
        }
    }

    pub fn settings(&self) -> LimitSettings {
        self.settings
    }

    // denied requests are not counted
    pub fn check(&self, key: &str) -> Decision {
        let now = self.clock.now();
        let window = self.settings.window;
        let max = self.settings.max.get();

        match self.buckets.entry(key.to_string()) {
            Entry::Vacant(slot) => {
                let bucket = slot.insert(Bucket::open(now, window));
                Decision::Allowed {
                    remaining: max - 1,
                    reset_at: bucket.reset_at,
                }
            }
            Entry::Occupied(mut slot) => {
                let bucket = slot.get_mut();

                // window lapsed, start a fresh one
                if now > bucket.reset_at {
                    *bucket = Bucket::open(now, window);
                    return Decision::Allowed {
                        remaining: max - 1,
                        reset_at: bucket.reset_at,
                    };
                }

                if bucket.count >= max {
                    return Decision::Denied {
                        reset_at: bucket.reset_at,
                    };
                }

                bucket.count += 1;
                Decision::Allowed {
                    remaining: max - bucket.count,
                    reset_at: bucket.reset_at,
                }
            }
        }
    }

    pub fn admit(&self, key: &str) -> Result<Admission, QuotaExceeded> {
        self.check(key).into_result()
    }

    pub fn bucket(&self, key: &str) -> Option<Bucket> {
        self.buckets.get(key).map(|b| *b)
    }

    pub fn tracked_keys(&self) -> usize {
        self.buckets.len()
    }

    // returns how many buckets were dropped
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.buckets.retain(|_, bucket| {
            let live = now <= bucket.reset_at;
            if !live {
                removed += 1;
            }
            live
        });
        removed
    }
}
