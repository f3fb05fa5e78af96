//! Query filter for fetching a bounded slice of status history.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ErrorCode;
use crate::model::{Status, StatusRecord};

/// Arguments that narrow a status history backlog.
///
/// Exactly one selector (`size`, `from_date` or `delta`) must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryFilter {
    /// Maximum number of records to return, newest first wins.
    #[serde(default)]
    pub size: usize,
    /// Earliest timestamp to include.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_date: Option<DateTime<Utc>>,
    /// Maximum record age, relative to now.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "delta_seconds")]
    pub delta: Option<Duration>,
    /// Statuses to leave out of the result.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exclude: BTreeSet<Status>,
}

/// Error returned when a filter's selectors are unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("{0} not valid")]
    InvalidFilter(&'static str),
}

impl FilterError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidFilter(_) => ErrorCode::InvalidFilter,
        }
    }
}

impl StatusHistoryFilter {
    #[must_use]
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_from_date(from_date: DateTime<Utc>) -> Self {
        Self {
            from_date: Some(from_date),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_delta(delta: Duration) -> Self {
        Self {
            delta: Some(delta),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn excluding(mut self, statuses: impl IntoIterator<Item = Status>) -> Self {
        self.exclude.extend(statuses);
        self
    }

    /// Check that exactly one selector is set.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidFilter`] when no selector is set or when
    /// two or more are set; the message names the first conflicting pair.
    pub fn validate(&self) -> Result<(), FilterError> {
        let s = self.size > 0;
        let t = self.from_date.is_some();
        let d = self.delta.is_some();

        let reason = match (s, t, d) {
            (false, false, false) => "missing filter parameters",
            (true, true, _) => "Size and Date together",
            (true, _, true) => "Size and Delta together",
            (_, true, true) => "Date and Delta together",
            _ => return Ok(()),
        };
        tracing::warn!(reason, "rejected status history filter");
        Err(FilterError::InvalidFilter(reason))
    }

    /// Returns true if `record` survives the exclude set and the date
    /// selectors. The size selector is positional and applied by the caller.
    ///
    /// Records without a timestamp never match a date or delta selector.
    #[must_use]
    pub fn admits(&self, record: &StatusRecord, now: DateTime<Utc>) -> bool {
        if self.exclude.contains(&record.status) {
            return false;
        }
        // A delta reaching past the earliest representable time has no
        // lower bound.
        let earliest = match (self.from_date, self.delta) {
            (Some(from), _) => Some(from),
            (None, Some(delta)) => now.checked_sub_signed(delta),
            (None, None) => None,
        };
        match earliest {
            Some(earliest) => record.since.is_some_and(|since| since >= earliest),
            None => true,
        }
    }
}

mod delta_seconds {
    use chrono::Duration;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Duration>, ser: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(delta) => ser.serialize_some(&delta.num_seconds()),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Duration>, D::Error> {
        Option::<i64>::deserialize(de)?
            .map(|secs| {
                Duration::try_seconds(secs)
                    .ok_or_else(|| D::Error::custom(format!("delta out of range: {secs}s")))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, hour, 0, 0).unwrap()
    }

    fn reason(filter: &StatusHistoryFilter) -> &'static str {
        match filter.validate() {
            Err(FilterError::InvalidFilter(reason)) => reason,
            Ok(()) => "ok",
        }
    }

    #[test]
    fn single_selectors_validate() {
        assert!(StatusHistoryFilter::with_size(5).validate().is_ok());
        assert!(StatusHistoryFilter::with_from_date(at(1)).validate().is_ok());
        assert!(
            StatusHistoryFilter::with_delta(Duration::hours(2))
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn empty_filter_is_missing_parameters() {
        let filter = StatusHistoryFilter::default();
        assert_eq!(reason(&filter), "missing filter parameters");
        assert_eq!(
            filter.validate().unwrap_err().to_string(),
            "missing filter parameters not valid"
        );
    }

    #[test]
    fn zero_size_does_not_count_as_a_selector() {
        let filter = StatusHistoryFilter::with_size(0).excluding([Status::Idle]);
        assert_eq!(reason(&filter), "missing filter parameters");
    }

    #[test]
    fn conflicting_pairs_are_named() {
        let mut filter = StatusHistoryFilter::with_size(3);
        filter.from_date = Some(at(1));
        assert_eq!(reason(&filter), "Size and Date together");

        let mut filter = StatusHistoryFilter::with_size(3);
        filter.delta = Some(Duration::minutes(5));
        assert_eq!(reason(&filter), "Size and Delta together");

        let mut filter = StatusHistoryFilter::with_from_date(at(1));
        filter.delta = Some(Duration::minutes(5));
        assert_eq!(reason(&filter), "Date and Delta together");
    }

    #[test]
    fn all_three_reports_size_and_date() {
        let filter = StatusHistoryFilter {
            size: 1,
            from_date: Some(at(1)),
            delta: Some(Duration::minutes(1)),
            exclude: BTreeSet::new(),
        };
        assert_eq!(reason(&filter), "Size and Date together");
        assert_eq!(
            filter.validate().unwrap_err().code(),
            ErrorCode::InvalidFilter
        );
    }

    #[test]
    fn admits_applies_exclude_and_dates() {
        let record = StatusRecord::new(Status::Idle, "").with_since(at(5));
        let untimed = StatusRecord::new(Status::Active, "");

        let by_size = StatusHistoryFilter::with_size(1);
        assert!(by_size.admits(&record, at(6)));
        assert!(by_size.admits(&untimed, at(6)));
        assert!(!by_size.clone().excluding([Status::Idle]).admits(&record, at(6)));

        let from = StatusHistoryFilter::with_from_date(at(5));
        assert!(from.admits(&record, at(9)));
        assert!(!StatusHistoryFilter::with_from_date(at(6)).admits(&record, at(9)));
        assert!(!from.admits(&untimed, at(9)));

        let delta = StatusHistoryFilter::with_delta(Duration::hours(1));
        assert!(delta.admits(&record, at(6)));
        assert!(!delta.admits(&record, at(7)));
    }

    #[test]
    fn filter_json_roundtrip_keeps_delta_seconds() {
        let filter = StatusHistoryFilter::with_delta(Duration::minutes(90))
            .excluding([Status::Executing, Status::Idle]);
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["delta"], serde_json::json!(5400));
        let back: StatusHistoryFilter = serde_json::from_value(json).unwrap();
        assert_eq!(back, filter);
    }

    #[test]
    fn huge_delta_admits_every_timed_record() {
        let record = StatusRecord::new(Status::Idle, "").with_since(at(5));
        let filter = StatusHistoryFilter::with_delta(Duration::days(4_000_000_000));
        assert!(filter.validate().is_ok());
        assert!(filter.admits(&record, at(6)));
        assert!(!filter.admits(&StatusRecord::new(Status::Idle, ""), at(6)));
    }

    #[test]
    fn out_of_range_delta_is_a_parse_error() {
        let err = serde_json::from_str::<StatusHistoryFilter>(r#"{"delta": 9223372036854775807}"#)
            .unwrap_err();
        assert!(err.to_string().contains("delta out of range"), "{err}");
    }

    proptest! {
        #[test]
        fn prop_valid_iff_exactly_one_selector(
            size in 0usize..4,
            has_date in any::<bool>(),
            delta_secs in proptest::option::of(0i64..100_000),
        ) {
            let filter = StatusHistoryFilter {
                size,
                from_date: has_date.then(|| at(0)),
                delta: delta_secs.map(Duration::seconds),
                exclude: BTreeSet::new(),
            };
            let selectors = usize::from(size > 0)
                + usize::from(has_date)
                + usize::from(delta_secs.is_some());
            prop_assert_eq!(filter.validate().is_ok(), selectors == 1);
        }
    }
}
