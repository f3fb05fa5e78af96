//! History kinds: which logical stream a status record belongs to.
//!
//! The set of kinds lives in one table, [`KINDS`]. Name lookup, parsing,
//! validity checks and the description map all read from it, so adding a
//! kind means adding one row (plus the enum variant the row points at).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, str::FromStr};

use super::ParseEnumError;

/// The stream a status history entry was recorded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HistoryKind {
    /// Agent and workload statuses of a unit, combined.
    Unit,
    /// The agent managing a unit.
    UnitAgent,
    /// A unit's workload.
    Workload,
    /// Provisioning of a machine instance.
    MachineInstance,
    /// The agent managing a machine.
    Machine,
    /// Provisioning of a container instance.
    ContainerInstance,
    /// The agent managing a container.
    Container,
}

/// One row of the kind table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindEntry {
    pub kind: HistoryKind,
    pub name: &'static str,
    pub description: &'static str,
}

/// Every valid history kind, indexed by enum discriminant.
pub static KINDS: [KindEntry; 7] = [
    KindEntry {
        kind: HistoryKind::Unit,
        name: "unit",
        description: "statuses for specified unit and its workload",
    },
    KindEntry {
        kind: HistoryKind::UnitAgent,
        name: "juju-unit",
        description: "statuses from the agent that is managing a unit",
    },
    KindEntry {
        kind: HistoryKind::Workload,
        name: "workload",
        description: "statuses for unit's workload",
    },
    KindEntry {
        kind: HistoryKind::MachineInstance,
        name: "machine",
        description: "statuses that occur due to provisioning of a machine",
    },
    KindEntry {
        kind: HistoryKind::Machine,
        name: "juju-machine",
        description: "status of the agent that is managing a machine",
    },
    KindEntry {
        kind: HistoryKind::ContainerInstance,
        name: "container",
        description: "statuses from the agent that is managing containers",
    },
    KindEntry {
        kind: HistoryKind::Container,
        name: "juju-container",
        description: "statuses from the containers only and not their host machines",
    },
];

impl HistoryKind {
    fn entry(self) -> &'static KindEntry {
        &KINDS[self as usize]
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.entry().name
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        self.entry().description
    }

    /// Returns true if `raw` names a known history kind.
    #[must_use]
    pub fn is_valid(raw: &str) -> bool {
        KINDS.iter().any(|entry| entry.name == raw)
    }

    /// All valid kinds mapped to their human-readable description.
    #[must_use]
    pub fn all_kinds() -> BTreeMap<Self, &'static str> {
        KINDS
            .iter()
            .map(|entry| (entry.kind, entry.description))
            .collect()
    }

    /// Instance kinds track provider provisioning rather than an agent.
    #[must_use]
    pub const fn is_instance(self) -> bool {
        matches!(self, Self::MachineInstance | Self::ContainerInstance)
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KINDS
            .iter()
            .find(|entry| entry.name == s)
            .map(|entry| entry.kind)
            .ok_or_else(|| ParseEnumError {
                expected: "history kind",
                got: s.to_string(),
            })
    }
}

impl TryFrom<String> for HistoryKind {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HistoryKind> for String {
    fn from(kind: HistoryKind) -> Self {
        kind.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{HistoryKind, KINDS};

    #[test]
    fn table_rows_follow_discriminant_order() {
        for (idx, entry) in KINDS.iter().enumerate() {
            assert_eq!(entry.kind as usize, idx, "row {idx} is out of place");
        }
    }

    #[test]
    fn validity_is_membership() {
        assert!(HistoryKind::is_valid("workload"));
        assert!(HistoryKind::is_valid("juju-container"));
        assert!(!HistoryKind::is_valid("bogus"));
        assert!(!HistoryKind::is_valid(""));
        assert!(!HistoryKind::is_valid("Workload"));
    }

    #[test]
    fn all_kinds_has_every_member_with_a_description() {
        let all = HistoryKind::all_kinds();
        assert_eq!(all.len(), 7);
        for entry in &KINDS {
            let description = all.get(&entry.kind).copied().unwrap_or_default();
            assert!(!description.is_empty(), "{} has no description", entry.name);
            assert!(HistoryKind::is_valid(entry.name));
        }
    }

    #[test]
    fn display_parse_roundtrips() {
        for entry in &KINDS {
            let parsed: HistoryKind = entry.kind.to_string().parse().unwrap();
            assert_eq!(parsed, entry.kind);
        }
        assert_eq!(HistoryKind::UnitAgent.as_str(), "juju-unit");
        assert_eq!(HistoryKind::MachineInstance.as_str(), "machine");
    }

    #[test]
    fn instance_kinds() {
        let instances: Vec<_> = KINDS
            .iter()
            .filter(|entry| entry.kind.is_instance())
            .map(|entry| entry.name)
            .collect();
        assert_eq!(instances, vec!["machine", "container"]);
    }

    #[test]
    fn json_uses_table_names() {
        assert_eq!(
            serde_json::to_string(&HistoryKind::Machine).unwrap(),
            "\"juju-machine\""
        );
        assert_eq!(
            serde_json::from_str::<HistoryKind>("\"workload\"").unwrap(),
            HistoryKind::Workload
        );
        assert!(serde_json::from_str::<HistoryKind>("\"bogus\"").is_err());
    }
}
