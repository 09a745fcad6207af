#![allow(clippy::unwrap_used)]
// View and gate behaviour against a mocked backend.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wifimon_api::{ApiClient, AuthState, MemoryTokenStore, TokenStore};
use wifimon_core::{
    AgentsView, AuthGate, CoreError, DevicesView, GateDecision, OverviewView, Page, Route,
    format_cap,
};

// ── Helpers ─────────────────────────────────────────────────────────

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
    setup_with(MemoryTokenStore::with_token("jwt")).await
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "status": "success", "data": data }))
}

fn device(id: i64, active: bool, cap: Option<u64>) -> serde_json::Value {
    json!({
        "id": id,
        "mac_address": format!("aa:bb:cc:00:00:{id:02x}"),
        "hostname": format!("host-{id}"),
        "device_type": "laptop",
        "is_active": active,
        "data_cap": cap
    })
}

fn stat(device_id: i64, up: u64) -> serde_json::Value {
    json!({
        "device_id": device_id,
        "timestamp": "2024-06-15T10:00:00",
        "bytes_uploaded": up,
        "bytes_downloaded": 0
    })
}

// ── Overview ────────────────────────────────────────────────────────

#[tokio::test]
async fn overview_settles_each_list_independently() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices"))
        .respond_with(ok(json!([device(1, true, None), device(2, false, None)])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/agents"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let alerts: Vec<_> = (1..=7)
        .map(|i| {
            json!({
                "id": i,
                "title": format!("alert {i}"),
                "threshold": 10,
                "status": if i % 2 == 0 { "resolved" } else { "active" }
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/v1/alerts"))
        .respond_with(ok(json!(alerts)))
        .mount(&server)
        .await;

    let mut view = OverviewView::new();
    view.load(&client).await;

    assert!(!view.is_loading());
    let cards: Vec<_> = view.cards().iter().map(|c| c.value).collect();
    assert_eq!(cards, vec![1, 2, 0, 4]);
    assert_eq!(view.recent_alerts().len(), 5);
    assert_eq!(view.recent_alerts()[0].title, "alert 1");
}

#[tokio::test]
async fn overview_with_missing_data_is_all_zero() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .mount(&server)
        .await;

    let mut view = OverviewView::new();
    view.load(&client).await;

    assert!(view.cards().iter().all(|c| c.value == 0));
    assert!(view.devices().is_empty());
    assert!(view.recent_alerts().is_empty());
}

// ── Devices: selection race ─────────────────────────────────────────

#[tokio::test]
async fn late_stats_for_previous_selection_are_discarded() {
    let (server, client, _) = setup().await;

    // A answers slowly, B quickly.
    Mock::given(method("GET"))
        .and(path("/api/v1/devices/1/stats"))
        .respond_with(ok(json!([stat(1, 111)])).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/devices/2/stats"))
        .respond_with(ok(json!([stat(2, 222)])))
        .mount(&server)
        .await;

    let mut view = DevicesView::new();
    let ticket_a = view.select(1);
    let ticket_b = view.select(2);

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    for ticket in [ticket_a, ticket_b] {
        let client = client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = DevicesView::fetch_stats(&client, ticket, 24).await;
            let _ = tx.send((ticket, result));
        });
    }
    drop(tx);

    let mut applied = Vec::new();
    while let Some((ticket, result)) = rx.recv().await {
        applied.push((ticket.device_id, view.apply_stats(ticket, result)));
    }

    // B resolved first and was applied; A resolved last and was dropped.
    assert_eq!(applied, vec![(2, true), (1, false)]);
    assert_eq!(view.selected_id(), Some(2));
    assert_eq!(view.stats().len(), 1);
    assert_eq!(view.stats()[0].device_id, 2);
    assert_eq!(view.stats()[0].bytes_uploaded, 222);
}

#[test]
fn reselecting_same_device_only_keeps_latest_ticket() {
    let mut view = DevicesView::new();
    let first = view.select(1);
    let _other = view.select(2);
    let again = view.select(1);

    assert!(!view.apply_stats(first, Ok(vec![])));
    assert!(view.apply_stats(again, Ok(vec![])));
}

#[tokio::test]
async fn load_selects_first_device_and_fetches_its_stats() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices"))
        .respond_with(ok(json!([device(5, true, None), device(6, true, None)])))
        .mount(&server)
        .await;
    let samples: Vec<_> = (0..15).map(|i| stat(5, i)).collect();
    Mock::given(method("GET"))
        .and(path("/api/v1/devices/5/stats"))
        .and(query_param("hours", "24"))
        .respond_with(ok(json!(samples)))
        .expect(1)
        .mount(&server)
        .await;

    let mut view = DevicesView::new();
    view.load(&client, 24).await;

    assert_eq!(view.selected_id(), Some(5));
    assert_eq!(view.stats().len(), 15);
    let recent = view.recent_stats();
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].bytes_uploaded, 5);
    assert_eq!(recent[9].bytes_uploaded, 14);
}

// ── Devices: cap edit ───────────────────────────────────────────────

#[tokio::test]
async fn cap_is_written_as_integer_and_redisplayed() {
    let (server, client, _) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/devices/3"))
        .and(body_json(json!({ "data_cap": 1_073_741_824_u64 })))
        .respond_with(ok(device(3, true, Some(1_073_741_824))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/devices"))
        .respond_with(ok(json!([device(3, true, Some(1_073_741_824))])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/devices/3/stats"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;

    let mut view = DevicesView::new();
    let saved = view.save_cap(&client, 3, "1073741824", 24).await.unwrap();

    assert_eq!(saved.data_cap, Some(1_073_741_824));
    let shown = view.selected().unwrap();
    assert_eq!(format_cap(shown.data_cap), "1073741824 bytes");
}

#[tokio::test]
async fn empty_cap_clears_with_null() {
    let (server, client, _) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/devices/3"))
        .and(body_json(json!({ "data_cap": null })))
        .respond_with(ok(device(3, true, None)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;

    let mut view = DevicesView::new();
    let saved = view.save_cap(&client, 3, "", 24).await.unwrap();
    assert_eq!(saved.data_cap, None);
}

#[tokio::test]
async fn invalid_cap_never_reaches_the_backend() {
    let (server, client, _) = setup().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut view = DevicesView::new();
    for raw in ["-5", "abc"] {
        let err = view.save_cap(&client, 3, raw, 24).await.unwrap_err();
        assert!(
            matches!(err, CoreError::ValidationFailed { .. }),
            "{raw}: got {err:?}"
        );
    }
}

// ── Agents ──────────────────────────────────────────────────────────

#[tokio::test]
async fn registered_agent_shows_up_after_refresh() {
    let (server, client, _) = setup().await;

    let agent = json!({
        "id": 9,
        "name": "Living Room WiFi",
        "owner_id": 1,
        "is_active": true,
        "last_sync": null,
        "created_at": "2024-06-15T10:30:00"
    });

    Mock::given(method("GET"))
        .and(path("/api/v1/agents"))
        .respond_with(ok(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/agents"))
        .respond_with(ok(json!([agent.clone()])))
        .mount(&server)
        .await;

    let mut registered = agent;
    registered["api_key"] = json!("ak_once");
    Mock::given(method("POST"))
        .and(path("/api/v1/agents/register"))
        .and(body_json(json!({ "name": "Living Room WiFi" })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "status": "success", "data": registered })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut view = AgentsView::new();
    view.load(&client).await;
    assert!(view.agents().is_empty());

    view.form.open = true;
    view.form.name = "Living Room WiFi".into();
    let result = view.register(&client).await.unwrap();

    assert_eq!(result.api_key, "ak_once");
    assert!(!view.form.open);
    assert!(view.form.name.is_empty());
    assert_eq!(view.last_registered().unwrap().api_key, "ak_once");
    let names: Vec<_> = view.agents().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Living Room WiFi"]);
}

#[tokio::test]
async fn failed_registration_leaves_form_alone() {
    let (server, client, _) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/agents/register"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut view = AgentsView::new();
    view.form.open = true;
    view.form.name = "Garage".into();

    assert!(view.register(&client).await.is_err());
    assert!(view.form.open);
    assert_eq!(view.form.name, "Garage");
    assert!(view.last_registered().is_none());
}

// ── Auth gate ───────────────────────────────────────────────────────

#[tokio::test]
async fn gate_without_token() {
    let (_server, client, _) = setup_with(MemoryTokenStore::new()).await;
    let mut gate = AuthGate::new(client);

    assert_eq!(
        gate.check(Route::Dashboard(Page::Devices)).await,
        GateDecision::Redirect(Route::Login)
    );
    assert_eq!(gate.check(Route::Login).await, GateDecision::Stay);
    assert_eq!(gate.check(Route::Register).await, GateDecision::Stay);
}

#[tokio::test]
async fn gate_with_valid_token_leaves_login() {
    let (server, client, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ok(json!({ "id": 1, "email": "admin@example.com" })))
        .mount(&server)
        .await;

    let mut gate = AuthGate::new(client);
    assert_eq!(
        gate.check(Route::Login).await,
        GateDecision::Redirect(Route::HOME)
    );
    assert_eq!(gate.user().unwrap().email, "admin@example.com");
    assert_eq!(gate.check(Route::HOME).await, GateDecision::Stay);
}

#[tokio::test]
async fn rejected_token_is_cleared_and_login_signalled_once() {
    let (server, client, tokens) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut auth = client.subscribe_auth();

    // Several views hit the 401 at the same time.
    let mut overview = OverviewView::new();
    let mut agents = AgentsView::new();
    tokio::join!(overview.load(&client), agents.load(&client));

    assert!(tokens.load().unwrap().is_none());
    assert!(auth.has_changed().unwrap());
    assert_eq!(*auth.borrow_and_update(), AuthState::Unauthenticated);

    // The gate now sends everything protected to login, without re-signalling.
    let mut gate = AuthGate::new(client);
    assert_eq!(
        gate.check(Route::HOME).await,
        GateDecision::Redirect(Route::Login)
    );
    assert!(!auth.has_changed().unwrap());
}

#[tokio::test]
async fn sign_out_clears_token() {
    let (_server, client, tokens) = setup().await;
    let mut gate = AuthGate::new(client.clone());

    assert_eq!(gate.sign_out(), GateDecision::Redirect(Route::Login));
    assert!(tokens.load().unwrap().is_none());
    assert_eq!(client.auth_state(), AuthState::Unauthenticated);
}
