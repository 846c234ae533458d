use super::types::{
    CommandRecord, DeviceReport, DeviceStatus, DoorState, LockCommand, ReportOutcome,
    StatusSnapshot,
};
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct DoorRecord {
    door: DoorState,
    last_command: Option<CommandRecord>,
    device: DeviceStatus,
    commands_applied: u64,
}

/// Single source of truth for door lock status and device liveness.
///
/// Every operation takes the inner lock exactly once and never holds it
/// across an await point, so callers on any runtime thread may interleave
/// freely.
#[derive(Debug, Default)]
pub struct DoorStateService {
    record: Mutex<DoorRecord>,
}

impl DoorStateService {
    /// Create a service in the startup state: locked, no command, device never seen
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current door and device status
    pub fn status(&self) -> StatusSnapshot {
        let record = self.record.lock();
        StatusSnapshot {
            door: record.door,
            last_command: record.last_command.clone(),
            device: record.device.clone(),
        }
    }

    pub fn door_state(&self) -> DoorState {
        self.record.lock().door
    }

    /// Apply a lock or unlock command and return the record it produced
    pub fn set_lock(&self, command: LockCommand) -> CommandRecord {
        let target = command.target_state();

        let (record, previous) = {
            let mut state = self.record.lock();
            state.commands_applied += 1;
            let record = CommandRecord {
                command,
                issued_at: Utc::now(),
                sequence: state.commands_applied,
            };
            let previous = std::mem::replace(&mut state.door, target);
            state.last_command = Some(record.clone());
            (record, previous)
        };

        if previous == target {
            debug!("Door already {}, refreshed {} command", target, command);
        }
        info!(
            "Door {} by {} command (sequence {})",
            target.as_str().to_uppercase(),
            command,
            record.sequence
        );

        record
    }

    /// Record a status push from the device.
    ///
    /// The device is marked as alive whatever the payload contains. The door
    /// state only changes when the payload is a JSON object whose `status`
    /// field names a valid door state.
    pub fn report_device_status(&self, payload: &[u8]) -> DeviceReport {
        self.record_report(decode_report(payload))
    }

    /// Record a status push whose body could not be read at all, e.g. one
    /// over the transport's size limit. Counts as a malformed push.
    pub fn report_unreadable_payload<S: Into<String>>(&self, reason: S) -> DeviceReport {
        self.record_report(ReportOutcome::Malformed(reason.into()))
    }

    fn record_report(&self, outcome: ReportOutcome) -> DeviceReport {
        let received_at = Utc::now();

        {
            let mut state = self.record.lock();
            state.device.reported = true;
            state.device.last_report = Some(received_at);
            if let ReportOutcome::Applied(door) = &outcome {
                state.door = *door;
            }
        }

        match &outcome {
            ReportOutcome::Applied(door) => {
                info!("Device status update received, door is {}", door)
            }
            ReportOutcome::NoStatus => info!("Device status update received without door status"),
            ReportOutcome::Rejected(value) => {
                warn!("Ignoring device status update with unknown door status {}", value)
            }
            ReportOutcome::Malformed(reason) => {
                warn!("Error parsing device status update: {}", reason)
            }
        }

        DeviceReport {
            received_at,
            outcome,
        }
    }
}

fn decode_report(payload: &[u8]) -> ReportOutcome {
    let fields: Map<String, Value> = match serde_json::from_slice(payload) {
        Ok(fields) => fields,
        Err(e) => return ReportOutcome::Malformed(e.to_string()),
    };
    debug!("Device payload: {:?}", fields);

    match fields.get("status") {
        None | Some(Value::Null) => ReportOutcome::NoStatus,
        Some(Value::String(raw)) => match raw.parse::<DoorState>() {
            Ok(door) => ReportOutcome::Applied(door),
            Err(_) => ReportOutcome::Rejected(format!("{:?}", raw)),
        },
        Some(other) => ReportOutcome::Rejected(other.to_string()),
    }
}
