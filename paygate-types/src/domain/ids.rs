//! Clock-based merchant transaction and user identifiers.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::ports::IdGenerator;

pub const TRANSACTION_ID_PREFIX: &str = "MT";
pub const USER_ID_PREFIX: &str = "MUID";

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// High-water mark shared by every system-clock generator in the process.
static PROCESS_LAST_STAMP: AtomicI64 = AtomicI64::new(0);

enum HighWater {
    Process,
    Own(AtomicI64),
}

/// Issues `MT<stamp>` / `MUID<stamp>` identifiers from a microsecond clock.
///
/// Stamps are strictly increasing across every identifier handed out, so two
/// calls landing on the same clock tick still get distinct values. Generators
/// built with [`new`](Self::new) share one process-wide high-water mark, so
/// separate clients never issue the same identifier. A generator built with
/// [`with_clock`](Self::with_clock) keeps its own mark.
pub struct MonotonicIdGenerator {
    clock: Clock,
    last: HighWater,
}

impl MonotonicIdGenerator {
    /// Creates a generator backed by the system clock.
    pub fn new() -> Self {
        Self {
            clock: Box::new(|| Utc::now().timestamp_micros()),
            last: HighWater::Process,
        }
    }

    /// Creates a generator backed by a custom clock.
    pub fn with_clock(clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            last: HighWater::Own(AtomicI64::new(0)),
        }
    }

    fn high_water(&self) -> &AtomicI64 {
        match &self.last {
            HighWater::Process => &PROCESS_LAST_STAMP,
            HighWater::Own(last) => last,
        }
    }

    fn next_stamp(&self) -> i64 {
        let now = (self.clock)();
        let high_water = self.high_water();
        let mut last = high_water.load(Ordering::Acquire);
        loop {
            let next = if now > last { now } else { last + 1 };
            match high_water.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}

impl Default for MonotonicIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MonotonicIdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonotonicIdGenerator")
            .field("last", &self.high_water().load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl IdGenerator for MonotonicIdGenerator {
    fn transaction_id(&self) -> String {
        format!("{}{}", TRANSACTION_ID_PREFIX, self.next_stamp())
    }

    fn user_id(&self) -> String {
        format!("{}{}", USER_ID_PREFIX, self.next_stamp())
    }
}
