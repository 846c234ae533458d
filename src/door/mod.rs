mod service;
mod types;
#[cfg(test)]
mod tests;

pub use service::DoorStateService;
pub use types::{
    CommandRecord, DeviceReport, DeviceStatus, DoorState, LockCommand, ReportOutcome,
    StatusSnapshot, UnknownDoorState,
};
