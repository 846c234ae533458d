use crate::door::{DoorState, LockCommand, StatusSnapshot};
use axum::{
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::server::ServerState;

/// Status page served verbatim; it reads state from `/api/car/state`
const STATUS_PAGE: &str = include_str!("../../assets/status.html");

/// Response to `/lock` and `/unlock`
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub result: &'static str,
    pub action: LockCommand,
    pub status: DoorState,
    pub timestamp: DateTime<Utc>,
}

/// Response to a device status push
#[derive(Debug, Serialize)]
pub struct DeviceStatusResponse {
    pub result: &'static str,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

fn apply_command(state: &ServerState, command: LockCommand) -> Json<CommandResponse> {
    let record = state.service.set_lock(command);

    Json(CommandResponse {
        result: "success",
        action: record.command,
        status: record.command.target_state(),
        timestamp: record.issued_at,
    })
}

pub async fn lock_handler(State(state): State<ServerState>) -> Json<CommandResponse> {
    apply_command(&state, LockCommand::Lock)
}

pub async fn unlock_handler(State(state): State<ServerState>) -> Json<CommandResponse> {
    apply_command(&state, LockCommand::Unlock)
}

/// Handler for status pushes from the device.
///
/// Always answers with success: the push itself arrived, even when the
/// payload could not be used or exceeded the body limit.
pub async fn device_status_handler(
    State(state): State<ServerState>,
    body: Result<Bytes, BytesRejection>,
) -> Json<DeviceStatusResponse> {
    let report = match body {
        Ok(body) => state.service.report_device_status(&body),
        Err(rejection) => state.service.report_unreadable_payload(rejection.body_text()),
    };
    debug!("Device status push handled: {:?}", report.outcome);

    Json(DeviceStatusResponse {
        result: "success",
        message: "Status received",
        timestamp: report.received_at,
    })
}

pub async fn state_handler(State(state): State<ServerState>) -> Json<StatusSnapshot> {
    Json(state.service.status())
}

pub async fn status_page_handler() -> Html<&'static str> {
    Html(STATUS_PAGE)
}

/// Unknown path, or a known path with the wrong method
pub async fn not_found_handler(method: Method, uri: Uri) -> Response {
    debug!("No endpoint for {} {}", method, uri);

    if method == Method::POST {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Invalid endpoint",
            }),
        )
            .into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
