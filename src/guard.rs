use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::QuotaExceeded;
use crate::identity::fingerprint;
use crate::metrics::{ADMISSION_ALLOWED, ADMISSION_DENIED, ADMISSION_REQUESTS, TRACKED_KEYS};
use crate::rate_limit::{Admission, Decision, FixedWindowLimiter, LimitSettings};

// limiter bound to one guarded action, metrics and logs go under its scope
#[derive(Clone)]
pub struct Guard {
    scope: &'static str,
    limiter: Arc<FixedWindowLimiter>,
}

impl Guard {
    pub fn new(scope: &'static str, settings: LimitSettings) -> Self {
        Self {
            scope,
            limiter: Arc::new(FixedWindowLimiter::new(settings)),
        }
    }

    pub fn scope(&self) -> &'static str {
        self.scope
    }

    pub fn limiter(&self) -> &Arc<FixedWindowLimiter> {
        &self.limiter
    }

    pub fn check(&self, key: &str) -> Decision {
        let decision = self.limiter.check(key);
        self.record(key, &decision);
        decision
    }

    pub fn admit(&self, key: &str) -> Result<Admission, QuotaExceeded> {
        self.check(key).into_result()
    }

    fn record(&self, key: &str, decision: &Decision) {
        ADMISSION_REQUESTS.with_label_values(&[self.scope]).inc();
        TRACKED_KEYS
            .with_label_values(&[self.scope])
            .set(self.limiter.tracked_keys() as i64);

        match decision {
            Decision::Allowed { remaining, .. } => {
                ADMISSION_ALLOWED.with_label_values(&[self.scope]).inc();
                debug!(scope = self.scope, key = %fingerprint(key), remaining, "admitted");
            }
            Decision::Denied { reset_at } => {
                ADMISSION_DENIED.with_label_values(&[self.scope]).inc();
                warn!(scope = self.scope, key = %fingerprint(key), %reset_at, "quota exceeded");
            }
        }
    }
}
