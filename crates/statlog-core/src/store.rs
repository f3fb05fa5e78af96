//! History source contracts and a bounded in-memory implementation.
//!
//! Sources return records oldest first with the filter's exclude set
//! already applied. The filter's shape is validated before any lookup.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::error::{ErrorCode, HistoryError};
use crate::filter::{FilterError, StatusHistoryFilter};
use crate::model::{History, StatusRecord};
use crate::window::shift_push;

/// Errors from fetching history out of a source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("no status history recorded for {0}")]
    NotFound(String),
}

impl StoreError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Filter(err) => err.code(),
            Self::NotFound(_) => ErrorCode::EntityNotFound,
        }
    }
}

/// Sources that can fetch the agent and workload history of an entity.
pub trait StatusHistoryGetter {
    /// # Errors
    ///
    /// Fails on an invalid filter or an unknown entity.
    fn status_history(
        &self,
        entity: &str,
        filter: &StatusHistoryFilter,
    ) -> Result<History, StoreError>;
}

/// Sources that can fetch the provider instance history of an entity.
pub trait InstanceStatusHistoryGetter {
    /// # Errors
    ///
    /// Fails on an invalid filter or an unknown entity.
    fn instance_status_history(
        &self,
        entity: &str,
        filter: &StatusHistoryFilter,
    ) -> Result<History, StoreError>;
}

/// Keeps the most recent `capacity` records per entity in memory.
#[derive(Debug, Clone)]
pub struct MemoryHistoryStore {
    capacity: usize,
    entities: BTreeMap<String, Vec<StatusRecord>>,
    clock: Option<DateTime<Utc>>,
}

impl MemoryHistoryStore {
    /// # Errors
    ///
    /// Returns [`HistoryError::EmptyWindow`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, HistoryError> {
        if capacity == 0 {
            return Err(HistoryError::EmptyWindow);
        }
        Ok(Self {
            capacity,
            entities: BTreeMap::new(),
            clock: None,
        })
    }

    /// Pin "now" for delta filters instead of reading the system clock.
    #[must_use]
    pub const fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    /// Append a record for `entity`, returning the record it pushed out
    /// once the entity's window is full.
    pub fn record(&mut self, entity: &str, record: StatusRecord) -> Option<StatusRecord> {
        let window = self.entities.entry(entity.to_string()).or_default();
        if window.len() < self.capacity {
            window.push(record);
            return None;
        }
        // Full windows hold `capacity >= 1` records, so the push cannot fail.
        match shift_push(window, record) {
            Ok(evicted) => {
                tracing::trace!(entity, "status window full, evicted oldest record");
                Some(evicted)
            }
            Err(_) => None,
        }
    }

    /// Entities with at least one record, in name order.
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    fn fetch(
        &self,
        entity: &str,
        filter: &StatusHistoryFilter,
        instance: bool,
    ) -> Result<History, StoreError> {
        filter.validate()?;
        let records = self
            .entities
            .get(entity)
            .ok_or_else(|| StoreError::NotFound(entity.to_string()))?;
        let now = self.clock.unwrap_or_else(Utc::now);

        let matching: Vec<&StatusRecord> = records
            .iter()
            .filter(|record| record.kind.is_some_and(|kind| kind.is_instance()) == instance)
            .filter(|record| filter.admits(record, now))
            .collect();
        let skip = if filter.size > 0 {
            matching.len().saturating_sub(filter.size)
        } else {
            0
        };

        tracing::debug!(
            entity,
            instance,
            stored = records.len(),
            matched = matching.len(),
            returned = matching.len() - skip,
            "fetched status history"
        );
        Ok(matching.into_iter().skip(skip).cloned().collect())
    }
}

impl StatusHistoryGetter for MemoryHistoryStore {
    fn status_history(
        &self,
        entity: &str,
        filter: &StatusHistoryFilter,
    ) -> Result<History, StoreError> {
        self.fetch(entity, filter, false)
    }
}

impl InstanceStatusHistoryGetter for MemoryHistoryStore {
    fn instance_status_history(
        &self,
        entity: &str,
        filter: &StatusHistoryFilter,
    ) -> Result<History, StoreError> {
        self.fetch(entity, filter, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HistoryKind, Status};
    use chrono::{Duration, TimeZone};

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, minute, 0).unwrap()
    }

    fn agent(status: Status, info: &str, minute: u32) -> StatusRecord {
        StatusRecord::new(status, info)
            .with_kind(HistoryKind::UnitAgent)
            .with_since(at(minute))
    }

    fn seeded() -> MemoryHistoryStore {
        let mut store = MemoryHistoryStore::new(10).unwrap().with_clock(at(30));
        store.record("mysql/0", agent(Status::Allocating, "", 0));
        store.record(
            "mysql/0",
            StatusRecord::new(Status::Pending, "")
                .with_kind(HistoryKind::MachineInstance)
                .with_since(at(1)),
        );
        store.record("mysql/0", agent(Status::Executing, "installing", 5));
        store.record("mysql/0", agent(Status::Idle, "", 10));
        store.record("mysql/0", agent(Status::Executing, "update-status", 25));
        store.record("mysql/0", agent(Status::Idle, "", 26));
        store
    }

    fn statuses(history: &History) -> Vec<Status> {
        history.iter().map(|r| r.status).collect()
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            MemoryHistoryStore::new(0),
            Err(HistoryError::EmptyWindow)
        ));
    }

    #[test]
    fn size_keeps_newest_records_oldest_first() {
        let store = seeded();
        let history = store
            .status_history("mysql/0", &StatusHistoryFilter::with_size(2))
            .unwrap();
        assert_eq!(statuses(&history), vec![Status::Executing, Status::Idle]);
        assert_eq!(history[0].info, "update-status");
    }

    #[test]
    fn exclude_is_applied_before_size() {
        let store = seeded();
        let filter = StatusHistoryFilter::with_size(2).excluding([Status::Idle]);
        let history = store.status_history("mysql/0", &filter).unwrap();
        assert_eq!(
            history.iter().map(|r| r.info.as_str()).collect::<Vec<_>>(),
            vec!["installing", "update-status"]
        );
    }

    #[test]
    fn date_and_delta_selectors() {
        let store = seeded();
        let from = store
            .status_history("mysql/0", &StatusHistoryFilter::with_from_date(at(10)))
            .unwrap();
        assert_eq!(from.len(), 3);

        let recent = store
            .status_history(
                "mysql/0",
                &StatusHistoryFilter::with_delta(Duration::minutes(6)),
            )
            .unwrap();
        assert_eq!(statuses(&recent), vec![Status::Executing, Status::Idle]);
    }

    #[test]
    fn instance_history_is_separate() {
        let store = seeded();
        let history = store
            .instance_status_history("mysql/0", &StatusHistoryFilter::with_size(10))
            .unwrap();
        assert_eq!(statuses(&history), vec![Status::Pending]);
    }

    #[test]
    fn kindless_records_count_as_agent_history() {
        let mut store = MemoryHistoryStore::new(4).unwrap();
        store.record("m/0", StatusRecord::new(Status::Idle, "bare").with_since(at(0)));
        let filter = StatusHistoryFilter::with_size(4);
        assert_eq!(store.status_history("m/0", &filter).unwrap().len(), 1);
        assert!(store.instance_status_history("m/0", &filter).unwrap().is_empty());
    }

    #[test]
    fn huge_delta_returns_everything_timed() {
        let store = seeded();
        let history = store
            .status_history(
                "mysql/0",
                &StatusHistoryFilter::with_delta(Duration::days(4_000_000_000)),
            )
            .unwrap();
        assert_eq!(history.len(), 5);
    }

    #[test]
    fn invalid_filter_fails_before_lookup() {
        let store = seeded();
        let err = store
            .status_history("nope/0", &StatusHistoryFilter::default())
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Filter(FilterError::InvalidFilter("missing filter parameters"))
        );
        assert_eq!(err.code(), ErrorCode::InvalidFilter);
    }

    #[test]
    fn unknown_entity_is_not_found() {
        let store = seeded();
        let err = store
            .status_history("nope/0", &StatusHistoryFilter::with_size(1))
            .unwrap_err();
        assert_eq!(err.to_string(), "no status history recorded for nope/0");
        assert_eq!(err.code(), ErrorCode::EntityNotFound);
    }

    #[test]
    fn full_window_evicts_oldest() {
        let mut store = MemoryHistoryStore::new(2).unwrap();
        assert!(store.record("m/0", agent(Status::Idle, "a", 0)).is_none());
        assert!(store.record("m/0", agent(Status::Idle, "b", 1)).is_none());
        let evicted = store.record("m/0", agent(Status::Idle, "c", 2)).unwrap();
        assert_eq!(evicted.info, "a");

        let history = store
            .status_history("m/0", &StatusHistoryFilter::with_size(5))
            .unwrap();
        assert_eq!(
            history.iter().map(|r| r.info.as_str()).collect::<Vec<_>>(),
            vec!["b", "c"]
        );
        assert_eq!(store.entities().collect::<Vec<_>>(), vec!["m/0"]);
    }
}
