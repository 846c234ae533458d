mod handlers;
mod server;

pub use handlers::{CommandResponse, DeviceStatusResponse, ErrorResponse};
pub use server::{DoorServer, DoorServerBuilder, DEVICE_PUSH_BODY_LIMIT};
