//! Convenient re-exports for common usage.
//!
//! ```
//! use lww_dict::prelude::*;
//! ```

pub use crate::clock::{Clock, ManualClock, Timestamp};
#[cfg(feature = "std")]
pub use crate::clock::SystemClock;
pub use crate::Crdt;
pub use crate::DeltaCrdt;
pub use crate::LWWDict;
