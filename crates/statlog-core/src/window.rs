//! Fixed-capacity sliding windows where every push evicts the oldest entry.
//!
//! [`shift_push`] works on a plain slice by shifting every element one slot
//! toward the front. [`SlidingWindow`] keeps the same observable order with
//! a head index over a fixed arena, so a push is O(1).

use crate::error::HistoryError;

/// Evict `window[0]`, shift the rest toward the front, store `item` last.
///
/// # Errors
///
/// Returns [`HistoryError::EmptyWindow`] if `window` has no slots; the
/// item is dropped and nothing else changes.
pub fn shift_push<T>(window: &mut [T], item: T) -> Result<T, HistoryError> {
    let Some(first) = window.first_mut() else {
        return Err(HistoryError::EmptyWindow);
    };
    let evicted = std::mem::replace(first, item);
    window.rotate_left(1);
    Ok(evicted)
}

/// Ring buffer with a fixed, non-zero capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidingWindow<T> {
    slots: Vec<T>,
    /// Index of the oldest element.
    head: usize,
}

impl<T> SlidingWindow<T> {
    /// Build a full window from its initial contents, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::EmptyWindow`] if `seed` is empty.
    pub fn new(seed: Vec<T>) -> Result<Self, HistoryError> {
        if seed.is_empty() {
            return Err(HistoryError::EmptyWindow);
        }
        Ok(Self {
            slots: seed,
            head: 0,
        })
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Store `item` as the newest element and return the evicted oldest one.
    pub fn push(&mut self, item: T) -> T {
        let evicted = std::mem::replace(&mut self.slots[self.head], item);
        self.head = (self.head + 1) % self.slots.len();
        evicted
    }

    /// Element at logical position `idx` (0 is the oldest).
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&T> {
        (idx < self.slots.len()).then(|| &self.slots[(self.head + idx) % self.slots.len()])
    }

    /// Elements from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer)
    }

    /// Consume the window, yielding its elements oldest first.
    #[must_use]
    pub fn into_vec(mut self) -> Vec<T> {
        self.slots.rotate_left(self.head);
        self.slots
    }
}
