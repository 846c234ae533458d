pub mod app;
pub mod config;
pub mod door;
pub mod error;
pub mod web;

pub use app::{DoorlockApp, ShutdownReason};
pub use config::DoorlockConfig;
pub use door::{
    CommandRecord, DeviceReport, DeviceStatus, DoorState, DoorStateService, LockCommand,
    ReportOutcome, StatusSnapshot,
};
pub use error::{DoorlockError, Result};
pub use web::{DoorServer, DoorServerBuilder};
