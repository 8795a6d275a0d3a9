//! Time sources for the search budget.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic time source consulted before every search step.
pub trait Clock: Send + Sync {
    /// Time elapsed since a fixed, arbitrary origin.
    fn now(&self) -> Duration;
}

/// Wall-clock time measured from when the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Deterministic clock that advances by a fixed step on every reading.
///
/// Makes the termination contract testable without sleeping: a budget of
/// `k * step` expires on the `k`th reading after the one that started it.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use kurir_solver_ls::{Clock, TickClock};
///
/// let clock = TickClock::new(Duration::from_millis(5));
/// assert_eq!(clock.now(), Duration::ZERO);
/// assert_eq!(clock.now(), Duration::from_millis(5));
/// ```
#[derive(Debug, Default)]
pub struct TickClock {
    step_nanos: u64,
    elapsed_nanos: AtomicU64,
}

impl TickClock {
    /// Create a clock starting at zero that advances `step` per reading.
    #[must_use]
    pub fn new(step: Duration) -> Self {
        Self {
            step_nanos: u64::try_from(step.as_nanos()).unwrap_or(u64::MAX),
            elapsed_nanos: AtomicU64::new(0),
        }
    }

    /// Number of readings taken so far, for a non-zero step.
    #[must_use]
    pub fn readings(&self) -> u64 {
        self.elapsed_nanos
            .load(Ordering::Relaxed)
            .checked_div(self.step_nanos)
            .unwrap_or(0)
    }
}

impl Clock for TickClock {
    fn now(&self) -> Duration {
        let previous = self
            .elapsed_nanos
            .fetch_add(self.step_nanos, Ordering::Relaxed);
        Duration::from_nanos(previous)
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Point in clock time after which the search must stop.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    at: Option<Duration>,
}

impl Deadline {
    /// Start a budget on `clock`; budgets that overflow never expire.
    pub(crate) fn start(clock: &dyn Clock, budget: Duration) -> Self {
        Self {
            at: clock.now().checked_add(budget),
        }
    }

    /// Return `true` once the clock has reached the deadline.
    pub(crate) fn expired(self, clock: &dyn Clock) -> bool {
        self.at.is_some_and(|at| clock.now() >= at)
    }
}
