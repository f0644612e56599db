/*!
 * Protocol Tests
 * Decoding dashboard frames into engine commands and back
 */

use gc_manager::{
    ClientMessage, CollectionPriority, Command, GcError, GcManager, GcSettings, ServerMessage,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn decode(value: Value) -> Result<ClientMessage, GcError> {
    ClientMessage::decode(&value.to_string())
}

#[test]
fn test_dashboard_settings_form() {
    let message = decode(json!({
        "command": "updateSettings",
        "settings": {
            "autoCollection": false,
            "memoryThreshold": 85,
            "timeInterval": 60,
            "backgroundCollection": true,
            "cpuLimit": 15,
            "collectionPriority": "memory"
        }
    }))
    .unwrap();

    let expected = GcSettings::default()
        .with_auto_collection(false)
        .with_memory_threshold(85)
        .with_time_interval(60)
        .with_cpu_limit(15)
        .with_priority(CollectionPriority::Memory);
    assert_eq!(
        message,
        ClientMessage::Command(Command::UpdateSettings { settings: expected })
    );
}

#[test]
fn test_priority_defaults_to_balanced() {
    for priority in [
        json!("balanced"),
        json!("fast"),
        json!(""),
        Value::Null,
        json!(5),
        json!({ "name": "memory" }),
    ] {
        let message = decode(json!({
            "command": "updateSettings",
            "settings": {
                "autoCollection": true,
                "memoryThreshold": 75,
                "timeInterval": 30,
                "backgroundCollection": true,
                "cpuLimit": 20,
                "collectionPriority": priority
            }
        }))
        .unwrap();
        let ClientMessage::Command(Command::UpdateSettings { settings }) = message else {
            panic!("expected updateSettings");
        };
        assert_eq!(settings.collection_priority, CollectionPriority::Balanced);
    }
}

#[test]
fn test_rejections_are_structured() {
    let err = decode(json!({ "command": "compact" })).unwrap_err();
    assert_eq!(err, GcError::UnknownCommand("compact".to_string()));

    let err = decode(json!({ "command": 7 })).unwrap_err();
    assert!(matches!(err, GcError::MalformedCommand(_)));

    let err = decode(json!({ "command": "updateAlgorithm", "id": 1 })).unwrap_err();
    assert!(matches!(err, GcError::MalformedCommand(_)));

    let frame: Value =
        serde_json::from_str(&ServerMessage::error(&err).encode().unwrap()).unwrap();
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["code"], "malformed_command");
}

#[test]
fn test_decoded_commands_drive_engine() {
    let manager = GcManager::builder()
        .with_total_memory(2 * 1024 * 1024)
        .with_seed(1)
        .with_settings(GcSettings::default().with_background_collection(false))
        .build()
        .unwrap();

    let frames = [
        json!({ "command": "optimizeMemory" }),
        json!({ "command": "updateAlgorithm", "id": 2, "enabled": false, "performanceScore": 10 }),
        json!({ "command": "runGc" }),
    ];
    for frame in frames {
        let ClientMessage::Command(command) = decode(frame).unwrap() else {
            panic!("expected a command");
        };
        let outcome = manager.handle_command(command.clone()).unwrap();
        let reply: Value =
            serde_json::from_str(&ServerMessage::result(&command, outcome).encode().unwrap())
                .unwrap();
        assert_eq!(reply["type"], "result");
        assert_eq!(reply["command"], command.name());
    }

    assert_eq!(manager.block_counts().fragmented, 0);
    assert!(!manager.get_algorithm(2).unwrap().enabled);
    assert_eq!(manager.stats().gc_runs_today, 1);
}
