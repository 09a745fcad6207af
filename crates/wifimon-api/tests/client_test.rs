#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wifimon_api::{
    AlertDraft, AlertStatus, ApiClient, AuthState, Error, MemoryTokenStore, TokenStore,
};

// ── Helpers ─────────────────────────────────────────────────────────

const TOKEN: &str = "test-jwt";

async fn setup_with(tokens: MemoryTokenStore) -> (MockServer, ApiClient, Arc<MemoryTokenStore>) {
    let server = MockServer::start().await;
    let tokens = Arc::new(tokens);
    let client = ApiClient::from_reqwest(
        &format!("{}/api/v1", server.uri()),
        reqwest::Client::new(),
        tokens.clone(),
    )
    .unwrap();
    (server, client, tokens)
}

async fn setup() -> (MockServer, ApiClient, Arc<MemoryTokenStore>) {
    setup_with(MemoryTokenStore::with_token(TOKEN)).await
}

fn device_json(id: i64, hostname: &str) -> serde_json::Value {
    json!({
        "id": id,
        "owner_id": 1,
        "mac_address": format!("aa:bb:cc:dd:ee:{id:02x}"),
        "ip_address": "192.168.1.20",
        "hostname": hostname,
        "manufacturer": "Apple",
        "device_type": "smartphone",
        "first_seen": "2024-06-01T08:00:00",
        "last_seen": "2024-06-15T10:30:00",
        "is_active": true,
        "data_cap": null
    })
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_token() {
    let (server, client, tokens) = setup_with(MemoryTokenStore::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({ "email": "admin@example.com", "password": "hunter2" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "success", "access_token": "fresh" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut auth = client.subscribe_auth();
    assert_eq!(client.auth_state(), AuthState::Unauthenticated);

    let password = SecretString::from("hunter2".to_owned());
    client.login("admin@example.com", &password).await.unwrap();

    assert_eq!(tokens.load().unwrap().unwrap().expose_secret(), "fresh");
    assert!(auth.has_changed().unwrap());
    assert_eq!(*auth.borrow_and_update(), AuthState::Authenticated);
}

#[tokio::test]
async fn test_login_does_not_send_stale_token() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "success", "access_token": "t2" })),
        )
        .mount(&server)
        .await;

    let password = SecretString::from("pw".to_owned());
    client.login("a@b.c", &password).await.unwrap();
}

#[tokio::test]
async fn test_login_failure_is_authentication_error() {
    let (server, client, _) = setup_with(MemoryTokenStore::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "status": "error", "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let password = SecretString::from("wrong".to_owned());
    let result = client.login("admin@example.com", &password).await;

    match result {
        Err(Error::Authentication { message }) => assert_eq!(message, "Invalid credentials"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (server, client, _) = setup_with(MemoryTokenStore::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "status": "error", "message": "Email already registered" })),
        )
        .mount(&server)
        .await;

    let password = SecretString::from("pw".to_owned());
    let result = client.register("dup@example.com", &password).await;
    assert!(
        matches!(result, Err(Error::Authentication { ref message }) if message.contains("already")),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_me_sends_bearer_token() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .and(bearer_token(TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": { "id": 1, "email": "admin@example.com", "created_at": "2024-01-01T00:00:00" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client.me().await.unwrap();
    assert_eq!(user.email, "admin@example.com");
}

#[tokio::test]
async fn test_logout_clears_token() {
    let (_server, client, tokens) = setup().await;
    client.logout().unwrap();
    assert!(tokens.load().unwrap().is_none());
    assert_eq!(client.auth_state(), AuthState::Unauthenticated);
}

// ── 401 handling ────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_clears_token_and_notifies_once() {
    let (server, client, tokens) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "msg": "Token has expired" })))
        .mount(&server)
        .await;

    let mut auth = client.subscribe_auth();

    let (devices, agents) = tokio::join!(client.list_devices(), client.list_agents());
    assert!(matches!(devices, Err(Error::SessionExpired) | Err(Error::NotAuthenticated)));
    assert!(matches!(agents, Err(Error::SessionExpired) | Err(Error::NotAuthenticated)));

    assert!(tokens.load().unwrap().is_none());
    assert!(auth.has_changed().unwrap());
    assert_eq!(*auth.borrow_and_update(), AuthState::Unauthenticated);

    // Further rejections don't re-notify.
    let again = client.list_alerts().await;
    assert!(matches!(again, Err(Error::NotAuthenticated)));
    assert!(!auth.has_changed().unwrap());
}

#[tokio::test]
async fn test_unauthorized_with_token_is_session_expired() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired));
    assert!(err.is_auth_expired());
}

// ── Lists ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices"))
        .and(bearer_token(TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [device_json(1, "pixel"), device_json(2, "tv")]
        })))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].hostname.as_deref(), Some("pixel"));
    assert_eq!(devices[1].device_type.as_deref(), Some("smartphone"));
    assert!(devices[0].is_active);
    assert_eq!(devices[0].data_cap, None);
}

#[tokio::test]
async fn test_missing_or_null_data_is_empty_list() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/agents"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "success", "data": null })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/alerts/history"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/devices/9/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    assert!(client.list_devices().await.unwrap().is_empty());
    assert!(client.list_agents().await.unwrap().is_empty());
    assert!(client.list_alerts().await.unwrap().is_empty());
    assert!(client.alert_history(24).await.unwrap().is_empty());
    assert!(client.device_stats(9, 24).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_device_stats_passes_hours() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices/7/stats"))
        .and(query_param("hours", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [{
                "id": 1,
                "device_id": 7,
                "timestamp": "2024-06-15T10:00:00",
                "bytes_uploaded": 1_048_576,
                "bytes_downloaded": 2_097_152,
                "total_bytes": 3_145_728
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stats = client.device_stats(7, 6).await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].device_id, 7);
    assert_eq!(stats[0].total(), 3_145_728);
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_device_cap_sends_integer() {
    let (server, client, _) = setup().await;

    let mut updated = device_json(3, "laptop");
    updated["data_cap"] = json!(1_073_741_824_u64);

    Mock::given(method("PUT"))
        .and(path("/api/v1/devices/3"))
        .and(body_json(json!({ "data_cap": 1_073_741_824_u64 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "success", "data": updated })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let device = client.set_device_cap(3, Some(1_073_741_824)).await.unwrap();
    assert_eq!(device.data_cap, Some(1_073_741_824));
}

#[tokio::test]
async fn test_clear_device_cap_sends_null() {
    let (server, client, _) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/devices/3"))
        .and(body_json(json!({ "data_cap": null })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": device_json(3, "laptop")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let device = client.set_device_cap(3, None).await.unwrap();
    assert_eq!(device.data_cap, None);
}

#[tokio::test]
async fn test_delete_device_no_content() {
    let (server, client, _) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/devices/4"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_device(4).await.unwrap();
}

#[tokio::test]
async fn test_register_agent_returns_key() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/agents/register"))
        .and(body_json(json!({ "name": "Living Room WiFi" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "data": {
                "id": 5,
                "name": "Living Room WiFi",
                "owner_id": 1,
                "is_active": true,
                "last_sync": null,
                "created_at": "2024-06-15T10:30:00",
                "api_key": "ak_live_123"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registered = client.register_agent("Living Room WiFi").await.unwrap();
    assert_eq!(registered.agent.name, "Living Room WiFi");
    assert_eq!(registered.api_key, "ak_live_123");
    assert!(registered.agent.last_sync.is_none());
}

#[tokio::test]
async fn test_create_alert_sends_backend_fields() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/alerts"))
        .and(bearer_token(TOKEN))
        .and(body_json(json!({
            "alert_type": "usage_threshold",
            "threshold_value": 50,
            "device_id": 3
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "data": {
                "id": 7,
                "user_id": 1,
                "device_id": 3,
                "alert_type": "usage_threshold",
                "threshold_value": 50,
                "is_enabled": true,
                "created_at": "2024-06-15T10:30:00"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = AlertDraft {
        title: Some("usage_threshold".into()),
        threshold: Some(50),
        device_id: Some(3),
        ..AlertDraft::default()
    };
    let alert = client.create_alert(&draft).await.unwrap();
    assert_eq!(alert.id, 7);
    assert_eq!(alert.title, "usage_threshold");
    assert_eq!(alert.status, AlertStatus::Active);
}

#[tokio::test]
async fn test_update_alert_sends_only_set_fields() {
    let (server, client, _) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/alerts/2"))
        .and(body_json(json!({ "threshold_value": 20, "is_enabled": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {
                "id": 2,
                "alert_type": "Heavy upload",
                "threshold_value": 20,
                "is_enabled": false
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = AlertDraft {
        threshold: Some(20),
        status: Some(AlertStatus::Resolved),
        ..AlertDraft::default()
    };
    let alert = client.update_alert(2, &draft).await.unwrap();
    assert_eq!(alert.is_enabled, Some(false));
    assert_eq!(alert.title, "Heavy upload");
}

#[tokio::test]
async fn test_alert_history_passes_hours() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/alerts/history"))
        .and(query_param("hours", "48"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [{
                "id": 1,
                "alert_id": 2,
                "device_id": 3,
                "triggered_at": "2024-06-15T10:30:00",
                "resolved_at": null,
                "value_at_trigger": 87.5
            }]
        })))
        .mount(&server)
        .await;

    let history = client.alert_history(48).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].resolved_at.is_none());
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_not_found_carries_message() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices/99"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "status": "error", "message": "Device not found" })),
        )
        .mount(&server)
        .await;

    let err = client.get_device(99).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "API error (HTTP 404): Device not found");
}

#[tokio::test]
async fn test_non_json_body_is_deserialization_error() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let err = client.list_devices().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert!(body.contains("proxy error")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_health() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/system/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    assert_eq!(client.health().await.unwrap().status, "ok");
}
