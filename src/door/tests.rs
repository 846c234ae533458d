use super::*;
use std::sync::Arc;
use std::thread;

#[test]
fn test_initial_state() {
    let service = DoorStateService::new();
    let status = service.status();

    assert_eq!(status.door, DoorState::Locked);
    assert!(status.last_command.is_none());
    assert!(!status.device.reported);
    assert!(status.device.last_report.is_none());
}

#[test]
fn test_set_lock_reflects_latest_command() {
    let service = DoorStateService::new();
    let sequence = [
        LockCommand::Unlock,
        LockCommand::Lock,
        LockCommand::Lock,
        LockCommand::Unlock,
        LockCommand::Unlock,
        LockCommand::Lock,
    ];

    for command in sequence {
        let record = service.set_lock(command);
        let status = service.status();
        assert_eq!(status.door, command.target_state());
        assert_eq!(status.last_command, Some(record));
    }
}

#[test]
fn test_set_lock_is_idempotent() {
    let service = DoorStateService::new();

    let first = service.set_lock(LockCommand::Unlock);
    let second = service.set_lock(LockCommand::Unlock);

    assert_eq!(service.door_state(), DoorState::Unlocked);
    assert!(second.sequence > first.sequence);
    assert!(second.issued_at >= first.issued_at);
    assert_eq!(service.status().last_command.unwrap().sequence, second.sequence);
}

#[test]
fn test_set_lock_does_not_touch_device_status() {
    let service = DoorStateService::new();
    service.set_lock(LockCommand::Unlock);

    assert_eq!(service.status().device, DeviceStatus::default());
}

#[test]
fn test_report_with_status_updates_door() {
    let service = DoorStateService::new();

    let report = service.report_device_status(br#"{"status":"unlocked"}"#);

    assert_eq!(report.outcome, ReportOutcome::Applied(DoorState::Unlocked));
    let status = service.status();
    assert_eq!(status.door, DoorState::Unlocked);
    assert!(status.device.reported);
    assert_eq!(status.device.last_report, Some(report.received_at));
}

#[test]
fn test_report_without_status_keeps_door() {
    let service = DoorStateService::new();
    service.set_lock(LockCommand::Unlock);

    let report = service.report_device_status(br#"{"battery": 87, "rssi": -60}"#);

    assert_eq!(report.outcome, ReportOutcome::NoStatus);
    let status = service.status();
    assert_eq!(status.door, DoorState::Unlocked);
    assert!(status.device.reported);
}

#[test]
fn test_report_with_null_status_keeps_door() {
    let service = DoorStateService::new();

    let report = service.report_device_status(br#"{"status": null}"#);

    assert_eq!(report.outcome, ReportOutcome::NoStatus);
    assert_eq!(service.door_state(), DoorState::Locked);
}

#[test]
fn test_report_malformed_still_marks_device_alive() {
    let service = DoorStateService::new();

    let payloads: [&[u8]; 5] = [
        b"status=unlocked",
        b"",
        b"{\"status\":",
        b"[\"unlocked\"]",
        b"\"unlocked\"",
    ];

    for payload in payloads {
        let report = service.report_device_status(payload);
        assert!(
            matches!(report.outcome, ReportOutcome::Malformed(_)),
            "payload {:?} gave {:?}",
            String::from_utf8_lossy(payload),
            report.outcome
        );
    }

    let status = service.status();
    assert_eq!(status.door, DoorState::Locked);
    assert!(status.device.reported);
    assert!(status.device.last_report.is_some());
}

#[test]
fn test_report_rejects_unknown_status_values() {
    let service = DoorStateService::new();

    let report = service.report_device_status(br#"{"status":"ajar"}"#);
    assert!(matches!(report.outcome, ReportOutcome::Rejected(_)));

    let report = service.report_device_status(br#"{"status": 1}"#);
    assert_eq!(report.outcome, ReportOutcome::Rejected("1".to_string()));

    let status = service.status();
    assert_eq!(status.door, DoorState::Locked);
    assert!(status.device.reported);
}

#[test]
fn test_report_rejects_case_and_whitespace_variants() {
    let service = DoorStateService::new();

    for payload in [
        br#"{"status":"UNLOCKED"}"#.as_slice(),
        br#"{"status":" unlocked "}"#.as_slice(),
        br#"{"status":"Unlocked"}"#.as_slice(),
    ] {
        let report = service.report_device_status(payload);
        assert!(
            matches!(report.outcome, ReportOutcome::Rejected(_)),
            "{:?}",
            report.outcome
        );
    }

    assert_eq!(service.door_state(), DoorState::Locked);
    assert!(service.status().device.reported);
}

#[test]
fn test_unreadable_payload_marks_device_alive() {
    let service = DoorStateService::new();
    service.set_lock(LockCommand::Unlock);

    let report = service.report_unreadable_payload("length limit exceeded");

    assert_eq!(
        report.outcome,
        ReportOutcome::Malformed("length limit exceeded".to_string())
    );
    let status = service.status();
    assert_eq!(status.door, DoorState::Unlocked);
    assert!(status.device.reported);
    assert_eq!(status.device.last_report, Some(report.received_at));
}

#[test]
fn test_unlock_then_device_reports_locked() {
    let service = DoorStateService::new();
    assert_eq!(service.door_state(), DoorState::Locked);

    service.set_lock(LockCommand::Unlock);
    assert_eq!(service.status().door, DoorState::Unlocked);

    service.report_device_status(br#"{"status":"locked"}"#);
    let status = service.status();
    assert_eq!(status.door, DoorState::Locked);
    assert!(status.device.reported);
    // The push does not rewrite command history
    assert_eq!(status.last_command.unwrap().command, LockCommand::Unlock);
}

#[test]
fn test_concurrent_commands_keep_last_applied() {
    let service = Arc::new(DoorStateService::new());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let command = if i % 2 == 0 {
                    LockCommand::Lock
                } else {
                    LockCommand::Unlock
                };
                (0..50)
                    .map(|_| service.set_lock(command))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut records: Vec<CommandRecord> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    records.sort_by_key(|record| record.sequence);

    // Every command got its own slot, no update was lost
    assert_eq!(records.len(), 16 * 50);
    for (index, record) in records.iter().enumerate() {
        assert_eq!(record.sequence, index as u64 + 1);
    }

    let last = records.last().unwrap();
    let status = service.status();
    assert_eq!(status.door, last.command.target_state());
    assert_eq!(status.last_command.as_ref(), Some(last));
}

#[test]
fn test_door_state_parsing() {
    assert_eq!("locked".parse::<DoorState>(), Ok(DoorState::Locked));
    assert_eq!("unlocked".parse::<DoorState>(), Ok(DoorState::Unlocked));
    assert_eq!(
        " Unlocked ".parse::<DoorState>(),
        Err(UnknownDoorState(" Unlocked ".to_string()))
    );
    assert_eq!(
        "open".parse::<DoorState>(),
        Err(UnknownDoorState("open".to_string()))
    );
}

#[test]
fn test_snapshot_serialization() {
    let service = DoorStateService::new();
    service.set_lock(LockCommand::Unlock);

    let json = serde_json::to_value(service.status()).unwrap();

    assert_eq!(json["door"], "unlocked");
    assert_eq!(json["last_command"]["command"], "unlock");
    assert_eq!(json["last_command"]["sequence"], 1);
    assert_eq!(json["device"]["reported"], false);
    assert!(json["device"]["last_report"].is_null());
}
