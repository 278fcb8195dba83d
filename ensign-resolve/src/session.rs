//! Stale-result guard for concurrent resolutions.

use parking_lot::Mutex;

/// Holds the result for the most recent input key only.
///
/// Results are offered together with the key they were computed for; an
/// offer for any key other than the current one is dropped.
#[derive(Debug)]
pub struct LatestSlot<T> {
    inner: Mutex<Slot<T>>,
}

#[derive(Debug)]
struct Slot<T> {
    key: String,
    value: Option<T>,
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Slot {
                key: String::new(),
                value: None,
            }),
        }
    }
}

impl<T: Clone> LatestSlot<T> {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `key` current; a previous key's value is discarded.
    pub fn set_key(&self, key: impl Into<String>) {
        let key = key.into();
        let mut slot = self.inner.lock();
        if slot.key != key {
            slot.key = key;
            slot.value = None;
        }
    }

    /// Stores `value` if `key` is current. Returns whether it was accepted.
    pub fn offer(&self, key: &str, value: T) -> bool {
        let mut slot = self.inner.lock();
        if slot.key != key {
            return false;
        }
        slot.value = Some(value);
        true
    }

    /// Returns the value for the current key, if any.
    pub fn get(&self) -> Option<T> {
        self.inner.lock().value.clone()
    }
}
