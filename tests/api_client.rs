use complaint_desk::config::Config;
use complaint_desk::models::NewComplaint;
use complaint_desk::{ApiError, ComplaintClient, Priority, Status};
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ComplaintClient {
    ComplaintClient::new(&Config {
        api_url: format!("{}/api", server.uri()),
        ..Config::default()
    })
    .unwrap()
}

fn complaint_row(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "description": "Deep pothole near school gate, dangerous for cyclists",
        "image_path": "uploads/20251020_091500_hole.jpg",
        "category": "Pothole",
        "priority": "High",
        "location": "12.9716,77.5946",
        "status": status,
        "timestamp": "Mon, 20 Oct 2025 09:15:00 GMT",
        "anonymous": 0,
        "resolved_at": null
    })
}

#[tokio::test]
async fn lists_complaints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/complaints"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "complaints": [complaint_row("CMP202510200001", "Submitted"), complaint_row("CMP202510200002", "In Progress")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let complaints = client_for(&server).list_complaints().await.unwrap();
    assert_eq!(complaints.len(), 2);
    assert_eq!(complaints[1].status, Status::InProgress);
    assert_eq!(complaints[0].priority, Priority::High);
    assert!(complaints[0].created_at().is_some());
}

#[tokio::test]
async fn unreadable_rows_are_skipped_not_fatal() {
    let server = MockServer::start().await;
    let mut null_priority = complaint_row("CMP202510200002", "Submitted");
    null_priority["priority"] = json!(null);
    let mut odd_status = complaint_row("CMP202510200003", "Escalated");
    odd_status["priority"] = json!("Low");
    Mock::given(method("GET"))
        .and(path("/api/complaints"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "complaints": [complaint_row("CMP202510200001", "Resolved"), null_priority, odd_status]
        })))
        .mount(&server)
        .await;

    let complaints = client_for(&server).list_complaints().await.unwrap();
    let ids: Vec<&str> = complaints.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["CMP202510200001"]);
}

#[tokio::test]
async fn backend_failure_carries_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/complaints/CMP404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"success": false, "message": "Complaint not found"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).get_complaint("CMP404").await.unwrap_err();
    assert!(matches!(err, ApiError::Backend { status: 404, ref message } if message == "Complaint not found"), "got {:?}", err);
}

#[tokio::test]
async fn success_without_payload_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let err = client_for(&server).stats().await.unwrap_err();
    assert!(matches!(err, ApiError::MissingPayload("stats")), "got {:?}", err);
}

#[tokio::test]
async fn missing_success_flag_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/leaderboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"departments": []})))
        .mount(&server)
        .await;

    let err = client_for(&server).leaderboard().await.unwrap_err();
    assert!(matches!(err, ApiError::Backend { status: 200, .. }), "got {:?}", err);
}

#[tokio::test]
async fn non_json_error_page_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/leaderboard"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).leaderboard().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 502, .. }), "got {:?}", err);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // Grab a free port and release it so nothing is listening there.
    let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let client = ComplaintClient::new(&Config {
        api_url: format!("http://127.0.0.1:{}/api", port),
        ..Config::default()
    })
    .unwrap();

    let err = client.stats().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {:?}", err);
}

#[tokio::test]
async fn reads_stats_and_leaderboard() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "stats": {"total": 9, "submitted": 4, "in_progress": 3, "resolved": 2}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/leaderboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "departments": [
                {"name": "Street Lighting", "total_complaints": 4, "complaints_resolved": 3, "resolution_rate": 75.0},
                {"name": "Public Health", "total_complaints": 0, "complaints_resolved": 0, "resolution_rate": 0}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stats = client.stats().await.unwrap();
    assert_eq!((stats.total, stats.in_progress), (9, 3));
    let departments = client.leaderboard().await.unwrap();
    assert_eq!(departments[0].complaints_resolved, 3);
    assert_eq!(departments[1].resolution_rate, 0.0);
}

#[tokio::test]
async fn update_status_sends_display_name() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/complaints/CMP202510200001/status"))
        .and(body_json(json!({"status": "In Progress"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "Status updated successfully"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .update_status("CMP202510200001", Status::InProgress)
        .await
        .unwrap();
}

#[tokio::test]
async fn create_complaint_posts_multipart_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/complaints"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "complaint_id": "CMP202510207731",
            "category": "Garbage",
            "priority": "Medium",
            "message": "Complaint submitted successfully!"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut image = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    image.write_all(b"\xff\xd8\xff\xe0fake-jpeg").unwrap();

    let form = NewComplaint {
        description: "Garbage pile needs fix near market".to_string(),
        location: "Market Road".to_string(),
        latitude: "12.97".to_string(),
        longitude: "77.59".to_string(),
        anonymous: true,
        image: Some(image.path().to_path_buf()),
    };
    let created = client_for(&server).create_complaint(&form).await.unwrap();
    assert_eq!(created.complaint_id, "CMP202510207731");
    assert_eq!(created.priority, Some(Priority::Medium));

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"description\""));
    assert!(body.contains("Garbage pile needs fix near market"));
    assert!(body.contains("name=\"anonymous\""));
    assert!(body.contains("true"));
    assert!(body.contains("name=\"image\""));
    assert!(body.contains("fake-jpeg"));
}

#[tokio::test]
async fn unsupported_image_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let doc = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    let form = NewComplaint {
        description: "Streetlight out".to_string(),
        image: Some(doc.path().to_path_buf()),
        ..NewComplaint::default()
    };
    let err = client_for(&server).create_complaint(&form).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)), "got {:?}", err);
}

#[tokio::test]
async fn analyze_image_returns_category() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze-image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "category": "Pothole"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut image = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    image.write_all(b"\x89PNG").unwrap();

    let category = client_for(&server).analyze_image(image.path()).await.unwrap();
    assert_eq!(category, "Pothole");
}

#[tokio::test]
async fn blank_id_is_rejected_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server).get_complaint("   ").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}
