//! Scalar timestamps and the clocks that issue them.
//!
//! Every mutation of an [`LWWDict`](crate::LWWDict) is stamped with a
//! [`Timestamp`]: seconds since an epoch as a finite `f64`, fractional
//! precision allowed. Timestamps are totally ordered, so two records can
//! always be compared without consulting the replicas that wrote them.
//!
//! A [`Clock`] supplies "now" for the convenience mutations. Clock skew
//! between replicas is not corrected here; callers that need stronger
//! guarantees inject their own clock.
//!
//! # Example
//!
//! ```
//! use lww_dict::clock::{Clock, ManualClock, Timestamp};
//!
//! let mut clock = ManualClock::new(Timestamp::from_secs(10)).with_step_micros(500);
//!
//! let t1 = clock.now();
//! let t2 = clock.now();
//! assert!(t2 > t1);
//! assert_eq!(t1, Timestamp::from_secs(10));
//! ```

use core::cmp;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::Error;

/// A point in time, in seconds since an epoch.
///
/// Always finite. `-0.0` is stored as `0.0`, so timestamps that compare
/// equal are also bitwise equal and hash identically.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "f64", into = "f64")
)]
pub struct Timestamp(f64);

impl Timestamp {
    /// The epoch itself.
    pub const ZERO: Self = Self(0.0);

    /// Whole seconds since the epoch.
    pub fn from_secs(secs: u64) -> Self {
        Self(secs as f64)
    }

    /// Milliseconds since the epoch.
    pub fn from_millis(millis: u64) -> Self {
        Self(millis as f64 / 1_000.0)
    }

    /// Microseconds since the epoch.
    pub fn from_micros(micros: u64) -> Self {
        Self(micros as f64 / 1_000_000.0)
    }

    /// The current wall-clock time, as fractional seconds since the Unix epoch.
    ///
    /// This method requires the `std` feature.
    #[cfg(feature = "std")]
    pub fn now() -> Self {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        Self(secs)
    }

    /// Seconds since the epoch.
    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        self.0
    }

    fn offset_micros(self, micros: u64) -> Self {
        Self(self.0 + micros as f64 / 1_000_000.0)
    }
}

impl TryFrom<f64> for Timestamp {
    type Error = Error;

    fn try_from(secs: f64) -> Result<Self, Self::Error> {
        if !secs.is_finite() {
            return Err(Error::InvalidTimestamp(secs));
        }
        // -0.0 == 0.0 but their bit patterns differ
        Ok(Self(if secs == 0.0 { 0.0 } else { secs }))
    }
}

impl From<Timestamp> for f64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Timestamp {}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Timestamp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A source of timestamps for local mutations.
///
/// Any `FnMut() -> Timestamp` closure is a clock, which is handy for
/// injecting a custom time source in `no_std` environments.
pub trait Clock {
    /// Issue a timestamp for a local event.
    fn now(&mut self) -> Timestamp;
}

impl<F: FnMut() -> Timestamp> Clock for F {
    fn now(&mut self) -> Timestamp {
        self()
    }
}

/// Wall-clock time that never goes backward for a single instance.
///
/// If the system clock steps back, the last issued timestamp is repeated
/// until real time catches up.
///
/// This type requires the `std` feature.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    last: Timestamp,
}

#[cfg(feature = "std")]
impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&mut self) -> Timestamp {
        let pt = Timestamp::now();
        if pt > self.last {
            self.last = pt;
        }
        self.last
    }
}

/// A clock that only moves when told to.
///
/// Useful for tests and simulations that need deterministic timestamps.
/// With a step configured, every call to [`now`](Clock::now) returns the
/// current time and then advances by the step.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Timestamp,
    step_micros: u64,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: start,
            step_micros: 0,
        }
    }

    /// Advance automatically by `micros` after every issued timestamp.
    #[must_use]
    pub fn with_step_micros(mut self, micros: u64) -> Self {
        self.step_micros = micros;
        self
    }

    /// Jump to an arbitrary time, forward or backward.
    pub fn set(&mut self, ts: Timestamp) {
        self.current = ts;
    }

    /// Move forward by `micros`.
    pub fn advance_micros(&mut self, micros: u64) {
        self.current = self.current.offset_micros(micros);
    }

    /// The time the next call to `now` will return.
    #[must_use]
    pub fn peek(&self) -> Timestamp {
        self.current
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> Timestamp {
        let ts = self.current;
        self.current = self.current.offset_micros(self.step_micros);
        ts
    }
}
