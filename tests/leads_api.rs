//! Integration tests for the leads HTTP API.
//! The full router runs over the in-memory store; Hunter is replaced by a wiremock server.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use leads_backend::{
    build_router,
    config::AppState,
    db::InMemoryLeadStore,
    services::hunter::HunterClient,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper: router wired to a fresh in-memory store and the given Hunter base URL
fn test_app(hunter_base_url: &str) -> Router {
    let hunter = HunterClient::new(hunter_base_url, "test_key").unwrap();
    build_router(AppState::new(Arc::new(InMemoryLeadStore::new()), hunter))
}

/// Helper: app whose Hunter URL is never reached
fn offline_app() -> Router {
    test_app("http://127.0.0.1:9")
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

fn lead_body(email: &str) -> Value {
    json!({
        "firstName": "Maria",
        "lastName": "Silva",
        "email": email,
        "phone": "555-123-4567",
        "company": "Acme",
        "source": "website",
        "notes": "Met at the fair"
    })
}

fn error_message(body: &Value) -> &str {
    body["error"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn test_health_check() {
    let app = offline_app();
    let (status, body) = send(&app, "GET", "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "message": "Server is running" }));
}

#[tokio::test]
async fn test_create_lead_normalizes_and_defaults_status() {
    let app = offline_app();
    let mut body = lead_body("  Maria.Silva@ACME.com ");
    body["firstName"] = json!("  Maria  ");

    let (status, body) = send(&app, "POST", "/api/leads", Some(body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let lead = &body["data"];
    assert_eq!(lead["firstName"], "Maria");
    assert_eq!(lead["email"], "maria.silva@acme.com");
    assert_eq!(lead["status"], "new");
    assert_eq!(lead["source"], "website");
    assert!(lead["id"].as_str().is_some());
    assert!(lead["createdAt"].as_str().is_some());
    assert!(lead["updatedAt"].as_str().is_some());
}

#[tokio::test]
async fn test_duplicate_email_rejected_until_first_deleted() {
    let app = offline_app();

    let (status, first) = send(&app, "POST", "/api/leads", Some(lead_body("dup@acme.com"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/api/leads", Some(lead_body("DUP@acme.com"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(error_message(&body).contains("already exists"));

    let id = first["data"]["id"].as_str().unwrap();
    let (status, body) = send(&app, "DELETE", &format!("/api/leads/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "data": {} }));

    let (status, _) = send(&app, "POST", "/api/leads", Some(lead_body("dup@acme.com"))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_lead_validation_errors() {
    let app = offline_app();

    let mut missing_source = lead_body("a@acme.com");
    missing_source.as_object_mut().unwrap().remove("source");
    let (status, body) = send(&app, "POST", "/api/leads", Some(missing_source)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("Lead source is required"));

    let mut bad_status = lead_body("b@acme.com");
    bad_status["status"] = json!("archived");
    let (status, body) = send(&app, "POST", "/api/leads", Some(bad_status)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, "POST", "/api/leads", Some(lead_body("not-an-email"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("Please add a valid email"));

    let (status, body) =
        send(&app, "POST", "/api/leads", Some(lead_body("józef@przykład.com"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("Please add a valid email"));

    let mut bad_phone = lead_body("c@acme.com");
    bad_phone["phone"] = json!("12-34");
    let (status, body) = send(&app, "POST", "/api/leads", Some(bad_phone)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("Please add a valid phone number"));

    let mut long_name = lead_body("d@acme.com");
    long_name["lastName"] = json!("x".repeat(51));
    let (status, body) = send(&app, "POST", "/api/leads", Some(long_name)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("Last name cannot be more than 50 characters"));

    // Nothing was stored
    let (_, body) = send(&app, "GET", "/api/leads", None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_malformed_json_is_a_client_error() {
    let app = offline_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/leads")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_list_returns_all_leads_in_creation_order() {
    let app = offline_app();
    for email in ["one@acme.com", "two@acme.com", "three@acme.com"] {
        send(&app, "POST", "/api/leads", Some(lead_body(email))).await;
    }

    let (status, body) = send(&app, "GET", "/api/leads", None).await;
    assert_eq!(status, StatusCode::OK);

    let emails: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["one@acme.com", "two@acme.com", "three@acme.com"]);
}

#[tokio::test]
async fn test_get_missing_lead_returns_not_found() {
    let app = offline_app();

    let random = uuid::Uuid::new_v4();
    let (status, body) = send(&app, "GET", &format!("/api/leads/{random}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "error": "Lead not found" }));

    let (status, _) = send(&app, "GET", "/api/leads/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_status_only_preserves_other_fields() {
    let app = offline_app();
    let (_, created) = send(&app, "POST", "/api/leads", Some(lead_body("keep@acme.com"))).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/leads/{id}"),
        Some(json!({ "status": "contacted" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let lead = &body["data"];
    assert_eq!(lead["status"], "contacted");
    for field in ["id", "firstName", "lastName", "email", "phone", "company", "source", "notes", "createdAt"] {
        assert_eq!(lead[field], created["data"][field], "field {field} changed");
    }

    let (_, fetched) = send(&app, "GET", &format!("/api/leads/{id}"), None).await;
    assert_eq!(fetched["data"]["status"], "contacted");
}

#[tokio::test]
async fn test_update_null_or_blank_clears_optional_fields() {
    let app = offline_app();
    let (_, created) = send(&app, "POST", "/api/leads", Some(lead_body("clear@acme.com"))).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/leads/{id}"),
        Some(json!({ "phone": null, "notes": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["phone"], Value::Null);
    assert_eq!(body["data"]["notes"], Value::Null);
    assert_eq!(body["data"]["company"], "Acme");

    let (_, fetched) = send(&app, "GET", &format!("/api/leads/{id}"), None).await;
    assert_eq!(fetched["data"]["phone"], Value::Null);
    assert_eq!(fetched["data"]["notes"], Value::Null);
}

#[tokio::test]
async fn test_update_errors() {
    let app = offline_app();

    let random = uuid::Uuid::new_v4();
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/leads/{random}"),
        Some(json!({ "status": "won" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, "POST", "/api/leads", Some(lead_body("taken@acme.com"))).await;
    let (_, created) = send(&app, "POST", "/api/leads", Some(lead_body("other@acme.com"))).await;
    let id = created["data"]["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/leads/{id}"),
        Some(json!({ "email": "bad-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("Please add a valid email"));

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/leads/{id}"),
        Some(json!({ "firstName": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("First name is required"));

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/leads/{id}"),
        Some(json!({ "email": "taken@acme.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_then_get_returns_not_found() {
    let app = offline_app();
    let (_, created) = send(&app, "POST", "/api/leads", Some(lead_body("bye@acme.com"))).await;
    let id = created["data"]["id"].as_str().unwrap();

    let (status, _) = send(&app, "DELETE", &format!("/api/leads/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/api/leads/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/api/leads/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---
// Search integration
// ---

async fn mock_hunter(server: &MockServer, company: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v2/domain-search"))
        .and(query_param("company", company))
        .and(query_param("limit", "5"))
        .and(query_param("type", "personal"))
        .and(query_param("api_key", "test_key"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_search_company_requires_company() {
    let app = offline_app();

    let (status, body) = send(&app, "POST", "/api/leads/search-company", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "error": "Please provide a company name" }));
}

#[tokio::test]
async fn test_search_company_without_contacts_returns_not_found() {
    let server = MockServer::start().await;
    mock_hunter(
        &server,
        "Ghost Inc",
        ResponseTemplate::new(200).set_body_json(json!({
            "data": { "organization": "Ghost Inc", "emails": [] },
            "meta": { "results": 0 }
        })),
    )
    .await;

    let app = test_app(&server.uri());
    let (status, body) = send(
        &app,
        "POST",
        "/api/leads/search-company",
        Some(json!({ "company": "Ghost Inc" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "No leads found for this company");
}

#[tokio::test]
async fn test_search_company_skips_failed_inserts() {
    let server = MockServer::start().await;
    mock_hunter(
        &server,
        "Acme",
        ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "organization": "Acme Corporation",
                "emails": [
                    {
                        "value": "jane@acme.com",
                        "first_name": "Jane",
                        "last_name": "Doe",
                        "position": "CTO",
                        "department": "engineering",
                        "seniority": "executive",
                        "phone_number": "415-555-0100"
                    },
                    { "value": "existing@acme.com", "first_name": "Old", "last_name": "Lead" },
                    { "value": "john@acme.com", "first_name": null, "last_name": "Roe" }
                ]
            }
        })),
    )
    .await;

    let app = test_app(&server.uri());

    // Pre-existing lead makes the second contact fail on the unique email
    let (status, _) = send(&app, "POST", "/api/leads", Some(lead_body("existing@acme.com"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/leads/search-company",
        Some(json!({ "company": "Acme" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["created"], 2);

    let leads = body["data"]["leads"].as_array().unwrap();
    assert_eq!(leads.len(), 2);

    let jane = &leads[0];
    assert_eq!(jane["email"], "jane@acme.com");
    assert_eq!(jane["source"], "external-search");
    assert_eq!(jane["status"], "new");
    assert_eq!(jane["company"], "Acme Corporation");
    assert_eq!(jane["phone"], "415-555-0100");
    assert_eq!(
        jane["notes"],
        "Position: CTO\nDepartment: engineering\nSeniority: executive"
    );

    let john = &leads[1];
    assert_eq!(john["email"], "john@acme.com");
    assert_eq!(john["firstName"], "Unknown");
    assert_eq!(
        john["notes"],
        "Position: Unknown\nDepartment: Unknown\nSeniority: Unknown"
    );

    let (_, all) = send(&app, "GET", "/api/leads", None).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_search_company_falls_back_to_input_company() {
    let server = MockServer::start().await;
    mock_hunter(
        &server,
        "Tiny Shop",
        ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "organization": null,
                "emails": [{ "value": "owner@tinyshop.io", "first_name": "Pat", "last_name": "Lee" }]
            }
        })),
    )
    .await;

    let app = test_app(&server.uri());
    let (status, body) = send(
        &app,
        "POST",
        "/api/leads/search-company",
        Some(json!({ "company": "Tiny Shop" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["created"], 1);
    assert_eq!(body["data"]["leads"][0]["company"], "Tiny Shop");
}

#[tokio::test]
async fn test_search_company_surfaces_provider_error() {
    let server = MockServer::start().await;
    mock_hunter(
        &server,
        "Acme",
        ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{
                "id": "authentication_failed",
                "code": 401,
                "details": "No user found for the API key supplied"
            }]
        })),
    )
    .await;

    let app = test_app(&server.uri());
    let (status, body) = send(
        &app,
        "POST",
        "/api/leads/search-company",
        Some(json!({ "company": "Acme" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "No user found for the API key supplied");
}

#[tokio::test]
async fn test_search_company_generic_error_without_provider_body() {
    let server = MockServer::start().await;
    mock_hunter(&server, "Acme", ResponseTemplate::new(503)).await;

    let app = test_app(&server.uri());
    let (status, body) = send(
        &app,
        "POST",
        "/api/leads/search-company",
        Some(json!({ "company": "Acme" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "Request failed with status code 503");
}

#[tokio::test]
async fn test_search_company_transport_error_hides_api_key() {
    // Nothing listens on that port, so the request fails before any response
    let app = offline_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/leads/search-company",
        Some(json!({ "company": "Acme" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = error_message(&body);
    assert!(!message.is_empty());
    assert!(!message.contains("test_key"), "api key leaked: {message}");
    assert!(!message.contains("api_key"), "query string leaked: {message}");
}

#[tokio::test]
async fn test_search_company_invalid_provider_json() {
    let server = MockServer::start().await;
    mock_hunter(&server, "Acme", ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;

    let app = test_app(&server.uri());
    let (status, body) = send(
        &app,
        "POST",
        "/api/leads/search-company",
        Some(json!({ "company": "Acme" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = error_message(&body);
    assert!(message.starts_with("Failed to parse Hunter response"), "{message}");
    assert!(!message.contains("test_key"));

    let (_, listed) = send(&app, "GET", "/api/leads", None).await;
    assert_eq!(listed["data"], json!([]));
}
