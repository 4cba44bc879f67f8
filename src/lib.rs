//! # lww-dict
//!
//! A state-based last-write-wins element dictionary (LWW-Element-Dictionary).
//!
//! A CRDT (Conflict-free Replicated Data Type) is a data structure that can be
//! replicated across multiple devices and updated independently. When replicas
//! are merged, they are guaranteed to converge to the same state without
//! requiring coordination or consensus.
//!
//! [`LWWDict`] generalizes the LWW-Element-Set by attaching a value to every
//! present key. Each key keeps its latest add `(value, timestamp)` and its
//! latest remove timestamp; a key is present when its add is at least as
//! recent as its removal.
//!
//! ## `no_std` Support
//!
//! This crate supports `no_std` environments with the `alloc` crate.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! lww-dict = { version = "0.1", default-features = false }
//! ```
//!
//! Note: [`LWWDict::add`], [`LWWDict::remove`] and [`LWWDict::update`] require
//! the `std` feature for automatic timestamps via `SystemTime`. Without it,
//! pass timestamps explicitly or supply a [`Clock`](clock::Clock).
//!
//! ## Quick Start
//!
//! ```
//! use lww_dict::prelude::*;
//!
//! let mut phone = LWWDict::new();
//! phone.add_with_timestamp("milk", 1, Timestamp::from_secs(10));
//!
//! let mut laptop = LWWDict::new();
//! laptop.add_with_timestamp("eggs", 12, Timestamp::from_secs(11));
//! laptop.remove_with_timestamp("milk", Timestamp::from_secs(10));
//!
//! phone.merge(&laptop);
//! laptop.merge(&phone);
//!
//! assert_eq!(phone, laptop);
//! assert_eq!(phone.lookup(&"milk"), Some(&1)); // add wins a tie with remove
//! assert_eq!(phone.lookup(&"eggs"), Some(&12));
//! ```
//!
//! ## Sync styles
//!
//! - **State:** [`Crdt::merge`] in place, or [`Crdt::merged`] for a new value.
//! - **Delta:** [`DeltaCrdt::delta`] ships only what the other side lacks.
//! - **Ops:** [`events::OpCrdt`] replays [`events::DictOp`] logs in any order.
//!
//! Merge is idempotent and associative. It is commutative except when two
//! replicas added the same key at the exact same timestamp, in which case
//! the replica merged in last wins.
//!
//! ## Logging
//!
//! Mutations and merges emit `tracing` events at `trace` and `debug` level.
//! Install any subscriber to see them; keys and values are never logged.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod crdt;
mod dict;
mod error;
#[cfg(feature = "wasm")]
mod wasm;

pub mod clock;
pub mod events;
pub mod prelude;

pub use clock::Timestamp;
pub use crdt::{Crdt, DeltaCrdt};
pub use dict::{AddRecord, LWWDict, LWWDictDelta};
pub use error::{Error, Result};
