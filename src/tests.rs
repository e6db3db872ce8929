//! Integration tests for the shiftline backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::workflow::{RelayClient, WorkflowEngine};
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_psk(Some("test-api-key".to_string())).await
    }

    async fn with_psk(psk: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        // Workflow engine with no relays configured (local fallbacks)
        let relay = Arc::new(RelayClient::new(None, None));
        let workflow = Arc::new(WorkflowEngine::new(relay.clone(), relay));

        // Create config
        let config = Config {
            api_psk: psk.clone(),
            db_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            summary_endpoint: None,
            mail_endpoint: None,
        };

        let state = AppState {
            repo,
            workflow,
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let mut client_builder = Client::builder();
        if let Some(key) = psk {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("x-api-key", key.parse().unwrap());
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create_member(&self, email: &str, competence: i64, rate: f64) -> Value {
        let resp = self
            .client
            .post(self.url("/api/members"))
            .json(&json!({
                "email": email,
                "name": email.split('@').next().unwrap(),
                "competenceLevel": competence,
                "hourlyRate": rate
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_auth_missing_psk() {
    let fixture = TestFixture::with_psk(Some("secret-key".to_string())).await;

    // Request without API key
    let client = Client::new();
    let resp = client
        .get(fixture.url("/api/members"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_auth_invalid_psk() {
    let fixture = TestFixture::with_psk(Some("correct-key".to_string())).await;

    let client = Client::new();
    let resp = client
        .get(fixture.url("/api/members"))
        .header("x-api-key", "wrong-key")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_auth_valid_psk() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/revision"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["data"]["revisionId"].is_number());
}

#[tokio::test]
async fn test_member_crud() {
    let fixture = TestFixture::new().await;

    let create_body = fixture.create_member("alice@example.com", 2, 25.0).await;
    assert_eq!(create_body["success"], true);
    let member_id = create_body["data"]["id"].as_str().unwrap();
    assert_eq!(create_body["data"]["email"], "alice@example.com");
    assert_eq!(create_body["data"]["role"], "member");
    let revision_after_create = create_body["revisionId"].as_i64().unwrap();

    // Get member
    let get_resp = fixture
        .client
        .get(fixture.url(&format!("/api/members/{}", member_id)))
        .send()
        .await
        .unwrap();

    assert_eq!(get_resp.status(), 200);
    let get_body: Value = get_resp.json().await.unwrap();
    assert_eq!(get_body["data"]["competenceLevel"], 2);

    // Update member
    let update_resp = fixture
        .client
        .put(fixture.url(&format!("/api/members/{}", member_id)))
        .json(&json!({
            "name": "Alice Updated",
            "role": "admin",
            "expectedVersion": 1
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(update_resp.status(), 200);
    let update_body: Value = update_resp.json().await.unwrap();
    assert_eq!(update_body["data"]["name"], "Alice Updated");
    assert_eq!(update_body["data"]["role"], "admin");
    assert_eq!(update_body["data"]["version"], 2);
    let revision_after_update = update_body["revisionId"].as_i64().unwrap();
    assert!(revision_after_update > revision_after_create);

    // List members
    let list_resp = fixture
        .client
        .get(fixture.url("/api/members"))
        .send()
        .await
        .unwrap();

    assert_eq!(list_resp.status(), 200);
    let list_body: Value = list_resp.json().await.unwrap();
    assert!(list_body["data"].as_array().unwrap().len() >= 1);

    // Delete member
    let delete_resp = fixture
        .client
        .delete(fixture.url(&format!("/api/members/{}", member_id)))
        .send()
        .await
        .unwrap();

    assert_eq!(delete_resp.status(), 200);

    // Verify deleted
    let get_deleted_resp = fixture
        .client
        .get(fixture.url(&format!("/api/members/{}", member_id)))
        .send()
        .await
        .unwrap();

    assert_eq!(get_deleted_resp.status(), 404);
}

#[tokio::test]
async fn test_shift_crud_and_assignee_notification() {
    let fixture = TestFixture::new().await;
    fixture.create_member("bob@example.com", 1, 15.0).await;

    // Create shift
    let create_resp = fixture
        .client
        .post(fixture.url("/api/shifts"))
        .json(&json!({
            "assignedTo": "bob@example.com",
            "date": "2024-06-03",
            "startTime": "09:00",
            "endTime": "17:00",
            "shiftType": "regular",
            "createdBy": "admin@example.com"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(create_resp.status(), 200);
    let create_body: Value = create_resp.json().await.unwrap();
    let shift_id = create_body["data"]["id"].as_str().unwrap();
    assert_eq!(create_body["data"]["status"], "scheduled");

    // Assignee got an in-app notification
    let notif_resp = fixture
        .client
        .get(fixture.url("/api/notifications?recipient=bob@example.com"))
        .send()
        .await
        .unwrap();
    let notif_body: Value = notif_resp.json().await.unwrap();
    let notifications = notif_body["data"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["subject"], "New shift assigned");

    // Status transition
    let update_resp = fixture
        .client
        .put(fixture.url(&format!("/api/shifts/{}", shift_id)))
        .json(&json!({ "status": "completed", "expectedVersion": 1 }))
        .send()
        .await
        .unwrap();

    assert_eq!(update_resp.status(), 200);
    let update_body: Value = update_resp.json().await.unwrap();
    assert_eq!(update_body["data"]["status"], "completed");
    assert_eq!(update_body["data"]["version"], 2);

    // Filtered list
    let list_resp = fixture
        .client
        .get(fixture.url("/api/shifts?assignedTo=bob@example.com&from=2024-06-01&to=2024-06-30"))
        .send()
        .await
        .unwrap();
    let list_body: Value = list_resp.json().await.unwrap();
    assert_eq!(list_body["data"].as_array().unwrap().len(), 1);

    // Delete
    let delete_resp = fixture
        .client
        .delete(fixture.url(&format!("/api/shifts/{}", shift_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(delete_resp.status(), 200);
}

#[tokio::test]
async fn test_shift_rejects_non_canonical_date() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/shifts"))
        .json(&json!({
            "date": "2024-6-3",
            "startTime": "09:00",
            "endTime": "17:00",
            "createdBy": "admin@example.com"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_optimistic_concurrency_conflict() {
    let fixture = TestFixture::new().await;

    let create_body = fixture.create_member("carol@example.com", 1, 20.0).await;
    let member_id = create_body["data"]["id"].as_str().unwrap();

    // Update with wrong version
    let conflict_resp = fixture
        .client
        .put(fixture.url(&format!("/api/members/{}", member_id)))
        .json(&json!({
            "name": "Should Fail",
            "expectedVersion": 999
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(conflict_resp.status(), 409);
    let conflict_body: Value = conflict_resp.json().await.unwrap();
    assert_eq!(conflict_body["success"], false);
    assert_eq!(conflict_body["error"]["code"], "VERSION_MISMATCH");
    assert!(conflict_body["error"]["details"]["currentVersion"].is_number());
}

#[tokio::test]
async fn test_bulk_shift_generation_weekdays() {
    let fixture = TestFixture::new().await;
    fixture.create_member("dave@example.com", 1, 18.0).await;

    let before_resp = fixture
        .client
        .get(fixture.url("/api/revision"))
        .send()
        .await
        .unwrap();
    let before_body: Value = before_resp.json().await.unwrap();
    let revision_before = before_body["data"]["revisionId"].as_i64().unwrap();

    // Mon 2024-06-03 .. Sun 2024-06-09, weekdays 1-5 (Mon-Fri)
    let resp = fixture
        .client
        .post(fixture.url("/api/shifts/bulk"))
        .json(&json!({
            "startDate": "2024-06-03",
            "endDate": "2024-06-09",
            "weekdays": [1, 2, 3, 4, 5],
            "assignedTo": "dave@example.com",
            "startTime": "08:00",
            "endTime": "16:00",
            "shiftType": "regular",
            "createdBy": "admin@example.com"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let shifts = body["data"].as_array().unwrap();
    assert_eq!(shifts.len(), 5);
    assert_eq!(shifts[0]["date"], "2024-06-03");
    assert_eq!(shifts[4]["date"], "2024-06-07");

    // The whole batch bumps the revision exactly once
    let revision_after = body["revisionId"].as_i64().unwrap();
    assert_eq!(revision_after, revision_before + 1);
}

#[tokio::test]
async fn test_bulk_shift_generation_no_matching_days() {
    let fixture = TestFixture::new().await;

    // Tue 2024-06-04 .. Thu 2024-06-06 never contains a Sunday
    let resp = fixture
        .client
        .post(fixture.url("/api/shifts/bulk"))
        .json(&json!({
            "startDate": "2024-06-04",
            "endDate": "2024-06-06",
            "weekdays": [0],
            "assignedTo": "dave@example.com",
            "startTime": "08:00",
            "endTime": "16:00",
            "createdBy": "admin@example.com"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Nothing was inserted
    let list_resp = fixture
        .client
        .get(fixture.url("/api/shifts"))
        .send()
        .await
        .unwrap();
    let list_body: Value = list_resp.json().await.unwrap();
    assert!(list_body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_shift_stats_including_negative_overnight_duration() {
    let fixture = TestFixture::new().await;
    fixture.create_member("erin@example.com", 1, 10.0).await;

    for (date, start, end, status) in [
        ("2024-06-03", "09:00", "17:00", "completed"),
        ("2024-06-04", "22:00", "02:00", "completed"),
        ("2024-05-01", "09:00", "17:00", "completed"), // outside the week
    ] {
        let resp = fixture
            .client
            .post(fixture.url("/api/shifts"))
            .json(&json!({
                "assignedTo": "erin@example.com",
                "date": date,
                "startTime": start,
                "endTime": end,
                "status": status,
                "createdBy": "admin@example.com"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let resp = fixture
        .client
        .get(fixture.url("/api/shifts/stats?period=week&today=2024-06-06"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["periodStart"], "2024-06-03");
    assert_eq!(body["data"]["totalShifts"], 2);
    // 8 + (-20): the overnight shift counts as minus twenty hours
    assert_eq!(body["data"]["totalHours"], -12.0);
    assert_eq!(body["data"]["totalCost"], -120.0);
    assert_eq!(body["data"]["completionRate"], 1.0);

    let per_member = body["data"]["perMember"].as_array().unwrap();
    assert_eq!(per_member.len(), 1);
    assert_eq!(per_member[0]["email"], "erin@example.com");
    assert_eq!(per_member[0]["shiftCount"], 2);
}

#[tokio::test]
async fn test_availability_upsert_last_write_wins() {
    let fixture = TestFixture::new().await;

    for (available, notes) in [(true, "morning preferred"), (false, "out sick")] {
        let resp = fixture
            .client
            .put(fixture.url("/api/availability"))
            .json(&json!({
                "memberEmail": "frank@example.com",
                "date": "2024-06-05",
                "isAvailable": available,
                "notes": notes
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let list_resp = fixture
        .client
        .get(fixture.url("/api/availability?memberEmail=frank@example.com"))
        .send()
        .await
        .unwrap();
    let list_body: Value = list_resp.json().await.unwrap();
    let rows = list_body["data"].as_array().unwrap();

    // Exactly one row per (member, date), holding the last write
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["isAvailable"], false);
    assert_eq!(rows[0]["notes"], "out sick");
}

#[tokio::test]
async fn test_claim_available_shift() {
    let fixture = TestFixture::new().await;
    fixture.create_member("grace@example.com", 3, 30.0).await;
    fixture.create_member("henry@example.com", 1, 15.0).await;

    let create_resp = fixture
        .client
        .post(fixture.url("/api/available-shifts"))
        .json(&json!({
            "date": "2024-06-10",
            "startTime": "12:00",
            "endTime": "20:00",
            "competenceRequired": 2,
            "createdBy": "admin@example.com"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(create_resp.status(), 200);
    let create_body: Value = create_resp.json().await.unwrap();
    let shift_id = create_body["data"]["id"].as_str().unwrap();

    // Under-qualified claimer is rejected before the claim
    let low_resp = fixture
        .client
        .post(fixture.url(&format!("/api/available-shifts/{}/claim", shift_id)))
        .json(&json!({ "memberEmail": "henry@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(low_resp.status(), 400);

    // Qualified claimer wins
    let claim_resp = fixture
        .client
        .post(fixture.url(&format!("/api/available-shifts/{}/claim", shift_id)))
        .json(&json!({ "memberEmail": "grace@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(claim_resp.status(), 200);
    let claim_body: Value = claim_resp.json().await.unwrap();
    assert_eq!(claim_body["data"]["claimedBy"], "grace@example.com");

    // A second claim loses with a conflict
    fixture.create_member("iris@example.com", 5, 40.0).await;
    let second_resp = fixture
        .client
        .post(fixture.url(&format!("/api/available-shifts/{}/claim", shift_id)))
        .json(&json!({ "memberEmail": "iris@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(second_resp.status(), 409);

    // Claimed shifts disappear from the unclaimed-only listing
    let list_resp = fixture
        .client
        .get(fixture.url("/api/available-shifts?unclaimedOnly=true"))
        .send()
        .await
        .unwrap();
    let list_body: Value = list_resp.json().await.unwrap();
    assert!(list_body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_week_grid_cells_match_exact_dates() {
    let fixture = TestFixture::new().await;
    fixture.create_member("judy@example.com", 1, 12.0).await;

    for date in ["2024-06-03", "2024-06-03", "2024-06-05"] {
        fixture
            .client
            .post(fixture.url("/api/shifts"))
            .json(&json!({
                "assignedTo": "judy@example.com",
                "date": date,
                "startTime": "09:00",
                "endTime": "17:00",
                "createdBy": "admin@example.com"
            }))
            .send()
            .await
            .unwrap();
    }

    fixture
        .client
        .put(fixture.url("/api/availability"))
        .json(&json!({
            "memberEmail": "judy@example.com",
            "date": "2024-06-04",
            "isAvailable": true
        }))
        .send()
        .await
        .unwrap();

    let resp = fixture
        .client
        .get(fixture.url("/api/calendar/week?anchor=2024-06-06"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let cells = body["data"]["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 7);
    assert_eq!(cells[0]["date"], "2024-06-03");
    assert_eq!(cells[0]["shifts"].as_array().unwrap().len(), 2);
    assert_eq!(cells[1]["availability"].as_array().unwrap().len(), 1);
    assert_eq!(cells[2]["shifts"].as_array().unwrap().len(), 1);
    assert_eq!(cells[6]["date"], "2024-06-09");
    assert!(cells[6]["shifts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_month_grid_has_42_cells() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/calendar/month?anchor=2024-06-15"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let cells = body["data"]["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 42);
    assert_eq!(cells[0]["date"], "2024-05-27");
    assert_eq!(cells[0]["inMonth"], false);
    assert_eq!(cells[5]["date"], "2024-06-01");
    assert_eq!(cells[5]["inMonth"], true);
}

#[tokio::test]
async fn test_meeting_completed_workflow() {
    let fixture = TestFixture::new().await;

    let event_resp = fixture
        .client
        .post(fixture.url("/api/events"))
        .json(&json!({
            "title": "Sprint review",
            "date": "2024-06-05",
            "startTime": "10:00",
            "endTime": "11:00",
            "attendees": ["a@example.com", "b@example.com"],
            "notes": "Decided on the Q3 roadmap and owners.",
            "createdBy": "admin@example.com"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(event_resp.status(), 200);
    let event_body: Value = event_resp.json().await.unwrap();
    let event_id = event_body["data"]["id"].as_str().unwrap();

    let resp = fixture
        .client
        .post(fixture.url("/api/workflows/meeting-completed"))
        .json(&json!({ "eventId": event_id, "createFollowUpTask": true }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let results = body["data"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    for result in results {
        assert_eq!(result["status"], "completed", "action {:?}", result["action"]);
    }

    // Follow-up task was created
    let tasks_resp = fixture
        .client
        .get(fixture.url("/api/tasks"))
        .send()
        .await
        .unwrap();
    let tasks_body: Value = tasks_resp.json().await.unwrap();
    let tasks = tasks_body["data"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Follow up: Sprint review");

    // Both attendees were notified
    let notif_resp = fixture
        .client
        .get(fixture.url("/api/notifications"))
        .send()
        .await
        .unwrap();
    let notif_body: Value = notif_resp.json().await.unwrap();
    assert_eq!(notif_body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_meeting_completed_unknown_event() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/workflows/meeting-completed"))
        .json(&json!({ "eventId": "no-such-event" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_validation_errors() {
    let fixture = TestFixture::new().await;

    // Member with empty email
    let resp = fixture
        .client
        .post(fixture.url("/api/members"))
        .json(&json!({ "email": "", "name": "Nobody" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Shift with a bad time
    let resp2 = fixture
        .client
        .post(fixture.url("/api/shifts"))
        .json(&json!({
            "date": "2024-06-03",
            "startTime": "9am",
            "endTime": "17:00",
            "createdBy": "admin@example.com"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp2.status(), 400);

    // Stats with an unknown period
    let resp3 = fixture
        .client
        .get(fixture.url("/api/shifts/stats?period=fortnight"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp3.status(), 400);
}

#[tokio::test]
async fn test_not_found_errors() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/members/non-existent-id"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let resp2 = fixture
        .client
        .get(fixture.url("/api/shifts/non-existent-id"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp2.status(), 404);
}

#[tokio::test]
async fn test_revision_increments_on_writes() {
    let fixture = TestFixture::new().await;

    let initial_resp = fixture
        .client
        .get(fixture.url("/api/revision"))
        .send()
        .await
        .unwrap();
    let initial_body: Value = initial_resp.json().await.unwrap();
    let initial_revision = initial_body["data"]["revisionId"].as_i64().unwrap();

    let create_body = fixture.create_member("kate@example.com", 1, 22.0).await;
    let after_create = create_body["revisionId"].as_i64().unwrap();
    assert_eq!(after_create, initial_revision + 1);

    let member_id = create_body["data"]["id"].as_str().unwrap();

    let update_resp = fixture
        .client
        .put(fixture.url(&format!("/api/members/{}", member_id)))
        .json(&json!({ "name": "Kate Updated" }))
        .send()
        .await
        .unwrap();
    let update_body: Value = update_resp.json().await.unwrap();
    let after_update = update_body["revisionId"].as_i64().unwrap();
    assert_eq!(after_update, initial_revision + 2);

    let delete_resp = fixture
        .client
        .delete(fixture.url(&format!("/api/members/{}", member_id)))
        .send()
        .await
        .unwrap();
    let delete_body: Value = delete_resp.json().await.unwrap();
    let after_delete = delete_body["revisionId"].as_i64().unwrap();
    assert_eq!(after_delete, initial_revision + 3);
}
