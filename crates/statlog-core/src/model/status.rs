use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{ParseEnumError, normalize};

/// Life-cycle status reported for a unit agent, workload, machine or
/// provider instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Status {
    // Agent statuses.
    Allocating,
    Rebooting,
    Executing,
    Idle,
    Failed,
    Lost,

    // Workload statuses.
    Maintenance,
    Terminated,
    Unknown,
    Waiting,
    Blocked,
    Active,

    // Machine agent statuses.
    Pending,
    Started,
    Stopped,
    Error,
    Down,

    // Provider instance statuses.
    Provisioning,
    ProvisioningError,
    Running,
    Empty,
}

impl Status {
    /// Every status value, in declaration order.
    pub const ALL: [Self; 21] = [
        Self::Allocating,
        Self::Rebooting,
        Self::Executing,
        Self::Idle,
        Self::Failed,
        Self::Lost,
        Self::Maintenance,
        Self::Terminated,
        Self::Unknown,
        Self::Waiting,
        Self::Blocked,
        Self::Active,
        Self::Pending,
        Self::Started,
        Self::Stopped,
        Self::Error,
        Self::Down,
        Self::Provisioning,
        Self::ProvisioningError,
        Self::Running,
        Self::Empty,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allocating => "allocating",
            Self::Rebooting => "rebooting",
            Self::Executing => "executing",
            Self::Idle => "idle",
            Self::Failed => "failed",
            Self::Lost => "lost",
            Self::Maintenance => "maintenance",
            Self::Terminated => "terminated",
            Self::Unknown => "unknown",
            Self::Waiting => "waiting",
            Self::Blocked => "blocked",
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Started => "started",
            Self::Stopped => "stopped",
            Self::Error => "error",
            Self::Down => "down",
            Self::Provisioning => "provisioning",
            Self::ProvisioningError => "provisioning error",
            Self::Running => "running",
            // Instances that have not reported yet carry no status text.
            Self::Empty => "",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseEnumError {
                expected: "status",
                got: s.to_string(),
            })
    }
}

impl TryFrom<String> for Status {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, ParseEnumError> {
        value.parse()
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}
