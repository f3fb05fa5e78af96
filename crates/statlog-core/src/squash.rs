//! Cycle squashing for noisy status feeds.
//!
//! An agent that keeps flipping between the same few statuses (say
//! `executing "running update-status hook"` followed by `idle`) produces an
//! unbounded history that carries no new information. Squashing looks for a
//! cycle of `cycle_size` consecutive records that repeats back to back and
//! collapses the repetitions into one synthetic marker record:
//!
//! ```text
//! cycle_size = 2
//! in:  a b a b a b c d
//! out: a b <last 2 statuses repeated 2 times> c d
//! ```
//!
//! # Walk
//!
//! A [`SlidingWindow`] seeded with the first cycle serves as both the
//! comparison baseline and a one-cycle delay line. The rest of the input is
//! read in whole chunks of `cycle_size`:
//!
//! - a chunk equal to the window (see [`StatusRecord::same_status`]) bumps
//!   the repeat counter and is dropped;
//! - any other chunk is pushed through the window record by record, each
//!   evicted record goes to the output, and a pending repeat count is
//!   flushed as a marker right after them.
//!
//! The window is then drained, a final marker is added if repeats are still
//! pending, and a trailing partial chunk is copied verbatim.
//!
//! Squashing is lossy on purpose and is not idempotent: a marker can itself
//! line up with a later cycle boundary.

use chrono::{DateTime, Utc};

use crate::error::HistoryError;
use crate::model::{History, StatusRecord};
use crate::window::SlidingWindow;

/// Squash repeated cycles of `cycle_size` records, stamping markers with
/// the current time.
///
/// # Errors
///
/// Returns [`HistoryError::InvalidCycleSize`] when `cycle_size` is zero.
pub fn squash(statuses: &[StatusRecord], cycle_size: usize) -> Result<History, HistoryError> {
    squash_at(statuses, cycle_size, Utc::now())
}

/// Squash repeated cycles, stamping every marker with `now`.
///
/// Inputs no longer than one cycle come back unchanged.
///
/// # Errors
///
/// Returns [`HistoryError::InvalidCycleSize`] when `cycle_size` is zero.
pub fn squash_at(
    statuses: &[StatusRecord],
    cycle_size: usize,
    now: DateTime<Utc>,
) -> Result<History, HistoryError> {
    if cycle_size == 0 {
        return Err(HistoryError::InvalidCycleSize(cycle_size));
    }
    if statuses.len() <= cycle_size {
        return Ok(statuses.iter().cloned().collect());
    }

    let (seed, rest) = statuses.split_at(cycle_size);
    let mut window = SlidingWindow::new(seed.to_vec())?;
    let mut result = History::new();
    let mut repeat = 0usize;
    let mut markers = 0usize;

    let mut chunks = rest.chunks_exact(cycle_size);
    for chunk in chunks.by_ref() {
        let repetition = chunk
            .iter()
            .zip(window.iter())
            .all(|(next, seen)| next.same_status(seen));
        if repetition {
            repeat += 1;
            continue;
        }

        for record in chunk {
            result.push(window.push(record.clone()));
        }
        if repeat > 0 {
            result.push(StatusRecord::repeat_marker(cycle_size, repeat, now));
            markers += 1;
            repeat = 0;
        }
    }

    result.extend(window.into_vec());
    if repeat > 0 {
        result.push(StatusRecord::repeat_marker(cycle_size, repeat, now));
        markers += 1;
    }
    result.extend(chunks.remainder().iter().cloned());

    tracing::debug!(
        cycle_size,
        input = statuses.len(),
        output = result.len(),
        markers,
        "squashed status history"
    );
    Ok(result)
}

impl History {
    /// Collapse repeated cycles of `cycle_size` records into markers.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::InvalidCycleSize`] when `cycle_size` is zero.
    pub fn squash_logs(&self, cycle_size: usize) -> Result<Self, HistoryError> {
        squash(self, cycle_size)
    }

    /// [`History::squash_logs`] with a fixed marker timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::InvalidCycleSize`] when `cycle_size` is zero.
    pub fn squash_logs_at(
        &self,
        cycle_size: usize,
        now: DateTime<Utc>,
    ) -> Result<Self, HistoryError> {
        squash_at(self, cycle_size, now)
    }
}
