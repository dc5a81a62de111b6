//! End-to-end export runs against a mocked Indico instance.

use indico_ics_core::output::INDEX_FILE_NAME;
use indico_ics_core::{
    ExportOptions, Exporter, FailurePolicy, IndicoClient, IndicoConfig, IndicoError,
};
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> IndicoConfig {
    IndicoConfig {
        indico_instance: server.uri(),
        api_token: "test-token".to_string(),
        start_date: "2024-03-01".to_string(),
        end_date: "2024-03-31".to_string(),
        request_timeout_secs: 5,
        only_public: false,
    }
}

fn exporter(server: &MockServer, dir: &TempDir, policy: FailurePolicy) -> Exporter {
    let config = config_for(server);
    let client = IndicoClient::new(&config).unwrap();
    let mut options = ExportOptions::from_config(&config, dir.path().join("icalendars"));
    options.failure_policy = policy;
    Exporter::new(client, options)
}

fn booking(start: &str, end: &str, reason: &str, name: &str) -> Value {
    json!({
        "start_dt": start,
        "end_dt": end,
        "reservation": {"booking_reason": reason, "booked_for_name": name}
    })
}

async fn mount_rooms(server: &MockServer, rooms: Value) {
    Mock::given(method("GET"))
        .and(path("/rooms/api/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rooms))
        .mount(server)
        .await;
}

async fn mount_bookings(server: &MockServer, room_id: u64, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/rooms/api/calendar"))
        .and(body_json(json!({"room_ids": [room_id]})))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_export_writes_feeds_and_sorted_index() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_rooms(
        &server,
        json!([{"id": 3, "full_name": "Lab A"}, {"id": 1, "full_name": "Office"}]),
    )
    .await;
    mount_bookings(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(json!([{
            "bookings": {
                "2024-03-01": [
                    booking("2024-03-01T09:00:00", "2024-03-01T10:00:00", "Seminar", "A. Example"),
                    booking("2024-03-01T13:00:00", "2024-03-01T14:00:00", "Group meeting", "B. Example")
                ],
                "2024-03-04": booking("2024-03-04T08:00:00", "2024-03-04T09:00:00", "Exam", "C. Example")
            }
        }])),
    )
    .await;
    mount_bookings(
        &server,
        3,
        ResponseTemplate::new(200).set_body_json(json!([{"bookings": {}}])),
    )
    .await;

    let report = exporter(&server, &dir, FailurePolicy::Abort).run().await.unwrap();

    let out = dir.path().join("icalendars");
    assert_eq!(report.written.len(), 2);
    assert!(report.skipped.is_empty());
    assert_eq!(report.total_events(), 3);

    let index = std::fs::read_to_string(out.join(INDEX_FILE_NAME)).unwrap();
    assert_eq!(index, "1: Office\n3: Lab A\n");

    let office = std::fs::read_to_string(out.join("1.ics")).unwrap();
    assert_eq!(office.matches("BEGIN:VEVENT").count(), 3);
    assert!(office.contains("DTSTART:20240301T090000Z"));
    assert!(office.contains("SUMMARY:Seminar"));
    assert!(office.contains("ORGANIZER:A. Example"));

    let lab = std::fs::read_to_string(out.join("3.ics")).unwrap();
    assert!(lab.contains("BEGIN:VCALENDAR"));
    assert!(!lab.contains("BEGIN:VEVENT"));
}

#[tokio::test]
async fn test_rerun_produces_identical_files() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_rooms(&server, json!([{"id": 7, "full_name": "Lecture Hall"}])).await;
    mount_bookings(
        &server,
        7,
        ResponseTemplate::new(200).set_body_json(json!([{
            "bookings": {
                "2024-03-05": [
                    booking("2024-03-05T10:00:00", "2024-03-05T12:00:00", "Lecture", "D. Example")
                ]
            }
        }])),
    )
    .await;

    let first = exporter(&server, &dir, FailurePolicy::Abort).run().await.unwrap();
    let feed_before = std::fs::read(&first.written[0].path).unwrap();
    let index_before = std::fs::read(&first.index_path).unwrap();

    let second = exporter(&server, &dir, FailurePolicy::Abort).run().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(std::fs::read(&second.written[0].path).unwrap(), feed_before);
    assert_eq!(std::fs::read(&second.index_path).unwrap(), index_before);
}

#[tokio::test]
async fn test_abort_keeps_earlier_feeds_and_drops_stale_index() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_rooms(
        &server,
        json!([{"id": 1, "full_name": "Office"}, {"id": 2, "full_name": "Broken"}]),
    )
    .await;
    mount_bookings(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(json!([{"bookings": {}}])),
    )
    .await;
    mount_bookings(
        &server,
        2,
        ResponseTemplate::new(200).set_body_string("Internal error, see logs"),
    )
    .await;

    let out = dir.path().join("icalendars");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join(INDEX_FILE_NAME), "1: Office\n2: Broken\n").unwrap();

    let err = exporter(&server, &dir, FailurePolicy::Abort)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, IndicoError::ApiResponse { .. }), "got: {err}");
    assert!(out.join("1.ics").exists());
    assert!(!out.join("2.ics").exists());
    assert!(!out.join(INDEX_FILE_NAME).exists());
}

#[tokio::test]
async fn test_skip_room_continues_with_remaining_rooms() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_rooms(
        &server,
        json!([
            {"id": 1, "full_name": "Office"},
            {"id": 2, "full_name": "Broken"},
            {"id": 3, "full_name": "Lab A"}
        ]),
    )
    .await;
    mount_bookings(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(json!([{"bookings": {}}])),
    )
    .await;
    mount_bookings(
        &server,
        2,
        ResponseTemplate::new(200).set_body_json(json!([{
            "bookings": {
                "2024-03-01": [booking("01.03.2024 09:00", "2024-03-01T10:00:00", "Bad date", "E. Example")]
            }
        }])),
    )
    .await;
    mount_bookings(
        &server,
        3,
        ResponseTemplate::new(200).set_body_json(json!([{"bookings": {}}])),
    )
    .await;

    let report = exporter(&server, &dir, FailurePolicy::SkipRoom)
        .run()
        .await
        .unwrap();

    let written: Vec<u64> = report.written.iter().map(|w| w.room_id).collect();
    assert_eq!(written, vec![1, 3]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].room_id, 2);
    assert!(report.skipped[0].reason.contains("01.03.2024 09:00"));

    let index = std::fs::read_to_string(&report.index_path).unwrap();
    assert_eq!(index, "1: Office\n3: Lab A\n");
}

#[tokio::test]
async fn test_error_payload_does_not_overwrite_feed() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_rooms(&server, json!([{"id": 1, "full_name": "Office"}])).await;
    mount_bookings(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(json!([{"error": "room not found"}])),
    )
    .await;

    let out = dir.path().join("icalendars");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("1.ics"), "previous feed").unwrap();

    let err = exporter(&server, &dir, FailurePolicy::Abort)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, IndicoError::ApiResponse { .. }), "got: {err}");
    assert_eq!(std::fs::read_to_string(out.join("1.ics")).unwrap(), "previous feed");
}

#[tokio::test]
async fn test_rejected_token_aborts_even_when_skipping() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_rooms(&server, json!([{"id": 1, "full_name": "Office"}])).await;
    mount_bookings(&server, 1, ResponseTemplate::new(403)).await;

    let err = exporter(&server, &dir, FailurePolicy::SkipRoom)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, IndicoError::Unauthorized { status: 403, .. }), "got: {err}");
}
