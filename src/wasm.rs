//! WebAssembly bindings for lww-dict.
//!
//! Enable with the `wasm` feature:
//!
//! ```toml
//! [dependencies]
//! lww-dict = { version = "0.1", features = ["wasm"] }
//! ```
//!
//! Keys and values are strings on the JavaScript side. Timestamps are
//! seconds as plain numbers; passing `NaN` or an infinity throws.

use wasm_bindgen::prelude::*;

use crate::{Crdt, LWWDict, Timestamp};

fn timestamp(secs: f64) -> Result<Timestamp, JsError> {
    Timestamp::try_from(secs).map_err(|e| JsError::new(&e.to_string()))
}

/// A last-write-wins dictionary of strings, for use from JavaScript.
#[wasm_bindgen(js_name = LWWDict)]
#[derive(Default)]
pub struct WasmLWWDict {
    inner: LWWDict<String, String>,
}

#[wasm_bindgen(js_class = LWWDict)]
impl WasmLWWDict {
    /// Create a new empty dictionary.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` under `key` at `ts` seconds.
    pub fn add(&mut self, key: &str, value: &str, ts: f64) -> Result<(), JsError> {
        self.inner
            .add_with_timestamp(key.to_string(), value.to_string(), timestamp(ts)?);
        Ok(())
    }

    /// Remove `key` at `ts` seconds.
    pub fn remove(&mut self, key: &str, ts: f64) -> Result<(), JsError> {
        self.inner.remove_with_timestamp(key.to_string(), timestamp(ts)?);
        Ok(())
    }

    /// Update `key` if it was added and never removed. Returns whether it applied.
    pub fn update(&mut self, key: &str, value: &str, ts: f64) -> Result<bool, JsError> {
        Ok(self
            .inner
            .update_with_timestamp(key.to_string(), value.to_string(), timestamp(ts)?))
    }

    /// Get the live value for `key`, or `undefined`.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.inner.lookup(&key.to_string()).cloned()
    }

    /// Check whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains(&key.to_string())
    }

    /// Number of present keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check whether no key is present.
    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Present keys, in order.
    pub fn keys(&self) -> js_sys::Array {
        self.inner.keys().map(|k| JsValue::from_str(k)).collect()
    }

    /// Merge another dictionary's state into this one.
    pub fn merge(&mut self, other: &WasmLWWDict) {
        self.inner.merge(&other.inner);
    }
}
