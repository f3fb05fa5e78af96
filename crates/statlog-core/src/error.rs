use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InputParseError,
    InvalidFilter,
    InvalidEnumValue,
    InvalidCycleSize,
    EmptyWindow,
    EntityNotFound,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InputParseError => "E1002",
            Self::InvalidFilter => "E2001",
            Self::InvalidEnumValue => "E2002",
            Self::InvalidCycleSize => "E2003",
            Self::EmptyWindow => "E2004",
            Self::EntityNotFound => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InputParseError => "Status record input parse error",
            Self::InvalidFilter => "Invalid status history filter",
            Self::InvalidEnumValue => "Invalid status/kind value",
            Self::InvalidCycleSize => "Invalid squash cycle size",
            Self::EmptyWindow => "Push into an empty window",
            Self::EntityNotFound => "Entity has no recorded history",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .statlog/config.toml and retry."),
            Self::InputParseError => {
                Some("Each input line must be one JSON status record with an `entity` field.")
            }
            Self::InvalidFilter => {
                Some("Pass exactly one of --size, --from-date, or --days/--hours.")
            }
            Self::InvalidEnumValue => {
                Some("Use a documented status value; run `statlog kinds` for kinds.")
            }
            Self::InvalidCycleSize => Some("Use a cycle size of at least 1."),
            Self::EmptyWindow | Self::EntityNotFound => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by the window and squash primitives.
///
/// Both variants signal a broken caller invariant rather than a runtime
/// condition; neither leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// `push` was called on a window with no slots.
    #[error("cannot push into an empty window")]
    EmptyWindow,

    /// Squashing needs a cycle of at least one record.
    #[error("cycle size must be at least 1, got {0}")]
    InvalidCycleSize(usize),
}

impl HistoryError {
    /// The machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyWindow => ErrorCode::EmptyWindow,
            Self::InvalidCycleSize(_) => ErrorCode::InvalidCycleSize,
        }
    }
}
