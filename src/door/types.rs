use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lock status of the door actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorState {
    #[default]
    Locked,
    Unlocked,
}

impl DoorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DoorState::Locked => "locked",
            DoorState::Unlocked => "unlocked",
        }
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown door state '{0}'")]
pub struct UnknownDoorState(pub String);

impl FromStr for DoorState {
    type Err = UnknownDoorState;

    /// Only the exact wire names are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "locked" => Ok(DoorState::Locked),
            "unlocked" => Ok(DoorState::Unlocked),
            other => Err(UnknownDoorState(other.to_string())),
        }
    }
}

/// Command issued through `/lock` or `/unlock`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockCommand {
    Lock,
    Unlock,
}

impl LockCommand {
    /// The door state this command drives the actuator to
    pub fn target_state(&self) -> DoorState {
        match self {
            LockCommand::Lock => DoorState::Locked,
            LockCommand::Unlock => DoorState::Unlocked,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LockCommand::Lock => "lock",
            LockCommand::Unlock => "unlock",
        }
    }
}

impl fmt::Display for LockCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The most recent lock/unlock command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRecord {
    pub command: LockCommand,
    pub issued_at: DateTime<Utc>,
    /// Position of this command in the order commands were applied
    pub sequence: u64,
}

/// Liveness of the remote device as seen through its status pushes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceStatus {
    pub reported: bool,
    pub last_report: Option<DateTime<Utc>>,
}

/// Owned copy of the whole door record, taken under the state lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub door: DoorState,
    pub last_command: Option<CommandRecord>,
    pub device: DeviceStatus,
}

/// What a device status push did to the door record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Payload carried a valid status which is now the door state
    Applied(DoorState),
    /// Payload was a JSON object without a status field
    NoStatus,
    /// Payload carried a status that is not a door state
    Rejected(String),
    /// Payload was not a JSON object
    Malformed(String),
}

impl ReportOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ReportOutcome::Applied(_))
    }
}

/// Result of handling a device status push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReport {
    pub received_at: DateTime<Utc>,
    pub outcome: ReportOutcome,
}
