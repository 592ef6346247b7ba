//! Time source for tab timestamps and snapshot staleness checks.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

/// Supplies "now" to the workspace.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub type SharedClock = Arc<dyn Clock>;

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.with_now(|now| *now = instant);
    }

    pub fn advance(&self, by: Duration) {
        self.with_now(|now| *now += by);
    }

    fn with_now<R>(&self, f: impl FnOnce(&mut DateTime<Utc>) -> R) -> R {
        match self.now.lock() {
            Ok(mut now) => f(&mut now),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.with_now(|now| *now)
    }
}
