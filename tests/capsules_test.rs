//! Integration tests for time capsule sealing, lookup, and stats.

use chrono::{Duration, Utc};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Helper: start the server on a random port and return (base_url, db).
/// The DB handle lets tests plant rows the API cannot create (e.g. a
/// capsule whose unlock date is already in the past).
async fn start_test_server() -> (String, wishwall_server::db::DbPool) {
    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = tmp_dir.path().to_str().unwrap().to_string();

    let db = wishwall_server::db::init_db(&data_dir).expect("Failed to init DB");
    wishwall_server::polls::seed_poll_counters(&db).expect("Failed to seed poll counters");
    wishwall_server::quotes::seed::seed_default_quotes(&db).expect("Failed to seed quotes");

    let state = wishwall_server::state::AppState {
        db: db.clone(),
        wishes: Arc::new(wishwall_server::wishes::store::WishStore::new(50)),
        connections: wishwall_server::ws::new_connection_registry(),
        session_timeout_secs: 300,
        max_message_chars: 200,
        max_wishes: 50,
        cors_origins: "*".to_string(),
    };

    let app = wishwall_server::routes::build_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
        let _keep = tmp_dir;
    });

    (format!("http://{}", addr), db)
}

#[tokio::test]
async fn sealed_capsule_is_locked_until_its_date() {
    let (base_url, _db) = start_test_server().await;
    let client = reqwest::Client::new();

    let unlock_date = (Utc::now() + Duration::days(30)).to_rfc3339();
    let resp = client
        .post(format!("{}/capsule", base_url))
        .json(&json!({ "message": "see you next year", "unlock_date": unlock_date }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let sealed: serde_json::Value = resp.json().await.unwrap();
    let id = sealed["id"].as_str().unwrap();

    let view: serde_json::Value = client
        .get(format!("{}/capsule/{}", base_url, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(view["status"], "locked");
    assert!(view.get("message").is_none(), "locked capsule must hide its message");
    assert_eq!(view["days_remaining"], 30);
}

#[tokio::test]
async fn capsule_unlocks_after_its_date() {
    let (base_url, db) = start_test_server().await;

    // Plant a capsule whose unlock date has already passed
    let id = "test-past-capsule";
    {
        let conn = db.lock().unwrap();
        conn.execute(
            "INSERT INTO capsules (id, message, unlock_date, is_public, created_at) VALUES (?1, ?2, ?3, 1, ?4)",
            rusqlite::params![
                id,
                "greetings from the past",
                (Utc::now() - Duration::days(1)).to_rfc3339(),
                (Utc::now() - Duration::days(365)).to_rfc3339()
            ],
        )
        .unwrap();
    }

    let view: serde_json::Value = reqwest::get(format!("{}/capsule/{}", base_url, id))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(view["status"], "unlocked");
    assert_eq!(view["message"], "greetings from the past");
    assert!(view.get("days_remaining").is_none());
}

#[tokio::test]
async fn past_unlock_date_is_rejected() {
    let (base_url, _db) = start_test_server().await;

    let resp = reqwest::Client::new()
        .post(format!("{}/capsule", base_url))
        .json(&json!({
            "message": "too late",
            "unlock_date": (Utc::now() - Duration::hours(1)).to_rfc3339(),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn unknown_recovery_key_is_not_found() {
    let (base_url, _db) = start_test_server().await;

    let resp = reqwest::get(format!("{}/capsule/not-a-real-key", base_url))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn overlong_capsule_message_is_rejected() {
    let (base_url, _db) = start_test_server().await;

    let resp = reqwest::Client::new()
        .post(format!("{}/capsule", base_url))
        .json(&json!({
            "message": "x".repeat(501),
            "unlock_date": (Utc::now() + Duration::days(10)).to_rfc3339(),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn stats_count_sealed_capsules() {
    let (base_url, _db) = start_test_server().await;
    let client = reqwest::Client::new();

    let stats: serde_json::Value = client
        .get(format!("{}/capsule/stats", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["total_sealed"], 0);

    for i in 0..2 {
        let resp = client
            .post(format!("{}/capsule", base_url))
            .json(&json!({
                "message": format!("capsule {}", i),
                "unlock_date": (Utc::now() + Duration::days(5)).to_rfc3339(),
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
    }

    let stats: serde_json::Value = client
        .get(format!("{}/capsule/stats", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["total_sealed"], 2);
}
