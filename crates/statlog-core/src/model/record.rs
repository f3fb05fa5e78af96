use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::Deref;

use super::{HistoryKind, Status};

/// One observed status transition of a unit, machine or container.
///
/// Records are treated as immutable once observed; compaction reorders and
/// drops them but never edits one in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: Status,
    #[serde(default)]
    pub info: String,
    /// Auxiliary diagnostic attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, Value>,
    /// When the status became effective. Absent only on synthetic records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
    /// Stream that produced the record. Absent only on synthetic records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<HistoryKind>,
    /// Life-cycle stage of the owning entity when the record was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life: Option<String>,
    /// Error captured when the record stands for a failed lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

impl StatusRecord {
    pub fn new(status: Status, info: impl Into<String>) -> Self {
        Self {
            status,
            info: info.into(),
            data: BTreeMap::new(),
            since: None,
            kind: None,
            life: None,
            err: None,
        }
    }

    #[must_use]
    pub const fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: HistoryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_life(mut self, life: impl Into<String>) -> Self {
        self.life = Some(life.into());
        self
    }

    #[must_use]
    pub fn with_err(mut self, err: impl Into<String>) -> Self {
        self.err = Some(err.into());
        self
    }

    /// Cycle equality: same status and same info text.
    ///
    /// Timestamps, kind and diagnostic data are ignored so that cosmetic
    /// differences do not defeat repetition detection.
    #[must_use]
    pub fn same_status(&self, other: &Self) -> bool {
        self.status == other.status && self.info == other.info
    }

    /// Synthetic entry standing in for `repeat` collapsed copies of the last
    /// `cycle_size` records.
    pub(crate) fn repeat_marker(cycle_size: usize, repeat: usize, now: DateTime<Utc>) -> Self {
        Self::new(
            Status::Idle,
            format!("last {cycle_size} statuses repeated {repeat} times"),
        )
        .with_since(now)
    }
}

/// An ordered sequence of status records, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<StatusRecord>);

impl History {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, record: StatusRecord) {
        self.0.push(record);
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<StatusRecord> {
        self.0
    }
}

impl Deref for History {
    type Target = [StatusRecord];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<StatusRecord>> for History {
    fn from(records: Vec<StatusRecord>) -> Self {
        Self(records)
    }
}

impl FromIterator<StatusRecord> for History {
    fn from_iter<I: IntoIterator<Item = StatusRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<StatusRecord> for History {
    fn extend<I: IntoIterator<Item = StatusRecord>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for History {
    type Item = StatusRecord;
    type IntoIter = std::vec::IntoIter<StatusRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a StatusRecord;
    type IntoIter = std::slice::Iter<'a, StatusRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
