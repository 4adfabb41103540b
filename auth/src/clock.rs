use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

/// Time source abstraction.
///
/// Every component that reasons about token lifetimes reads time through an
/// injected clock instead of calling `Utc::now()` directly, so expiry policy
/// can be exercised deterministically in tests. Production code uses
/// [`SystemClock`]; tests drive a [`ManualClock`].
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Shared handle to a clock implementation.
pub type SharedClock = Arc<dyn Clock>;

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Shared handle to the system clock.
    pub fn shared() -> SharedClock {
        Arc::new(Self)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests.
///
/// Frozen at a fixed instant; only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Shared handle to a clock frozen at `start`.
    ///
    /// Returns the concrete type so callers can keep a handle for
    /// [`set`](Self::set)/[`advance`](Self::advance) while passing clones
    /// wherever a [`SharedClock`] is expected.
    pub fn shared(start: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self::new(start))
    }

    /// Move the clock to an absolute instant.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.guard() = to;
    }

    /// Advance the clock by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.guard();
        *now = *now + delta;
    }

    fn guard(&self) -> MutexGuard<'_, DateTime<Utc>> {
        // A poisoned lock still holds a perfectly usable timestamp.
        self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.guard()
    }
}
