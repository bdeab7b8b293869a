mod common;

use axum::body::Bytes;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{Value, json};

// ─── CREATE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_url_generates_code() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("creator").await;

    let body = app
        .create_url(&key, json!({ "original_url": "https://example.com/some/page?q=1" }))
        .await;

    let code = body["short_code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(
        body["short_url"].as_str().unwrap(),
        format!("{}/{}", common::BASE_URL, code)
    );
    assert_eq!(body["original_url"], "https://example.com/some/page?q=1");
    assert!(body["expires_at"].is_null());
}

#[tokio::test]
async fn test_create_same_url_twice_gives_distinct_codes() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("creator").await;
    let payload = json!({ "original_url": "https://example.com" });

    let first = app.create_url(&key, payload.clone()).await;
    let second = app.create_url(&key, payload).await;

    assert_ne!(first["short_code"], second["short_code"]);
    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn test_create_with_custom_code() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("creator").await;

    let body = app
        .create_url(
            &key,
            json!({ "original_url": "https://example.com", "short_code": "my-promo_1" }),
        )
        .await;

    assert_eq!(body["short_code"], "my-promo_1");
    assert_eq!(body["short_url"], format!("{}/my-promo_1", common::BASE_URL));
}

#[tokio::test]
async fn test_create_accepts_custom_code_alias() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("creator").await;

    let body = app
        .create_url(
            &key,
            json!({ "original_url": "https://example.com", "custom_code": "alias1" }),
        )
        .await;

    assert_eq!(body["short_code"], "alias1");
}

#[tokio::test]
async fn test_create_duplicate_custom_code_conflicts_across_keys() {
    let app = common::spawn_app();
    let (_, alice) = app.issue_key("alice").await;
    let (_, bob) = app.issue_key("bob").await;

    app.create_url(
        &alice,
        json!({ "original_url": "https://a.example", "short_code": "taken" }),
    )
    .await;

    let response = app
        .server
        .post("/api/urls")
        .add_header("X-API-Key", bob.as_str())
        .json(&json!({ "original_url": "https://b.example", "short_code": "taken" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(common::error_code(&body), "conflict");
}

#[tokio::test]
async fn test_create_rejects_reserved_code() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("creator").await;

    let response = app
        .server
        .post("/api/urls")
        .add_header("X-API-Key", key.as_str())
        .json(&json!({ "original_url": "https://example.com", "short_code": "API" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(common::error_code(&body), "validation_error");
}

#[tokio::test]
async fn test_create_rejects_invalid_urls() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("creator").await;

    for bad in [
        "",
        "not a url",
        "ftp://example.com/file",
        "javascript:alert(1)",
        "http://",
    ] {
        let response = app
            .server
            .post("/api/urls")
            .add_header("X-API-Key", key.as_str())
            .json(&json!({ "original_url": bad }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(common::error_code(&body), "validation_error", "url: {bad}");
    }
}

#[tokio::test]
async fn test_create_rejects_too_long_url() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("creator").await;
    let long = format!("https://example.com/{}", "a".repeat(2100));

    let response = app
        .server
        .post("/api/urls")
        .add_header("X-API-Key", key.as_str())
        .json(&json!({ "original_url": long }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_create_rejects_control_characters() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("creator").await;

    for bad in ["https://example.com/a\nb", "https://example.com/a\r\nX-Injected: 1"] {
        let response = app
            .server
            .post("/api/urls")
            .add_header("X-API-Key", key.as_str())
            .json(&json!({ "original_url": bad, "short_code": "ctl123" }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(common::error_code(&body), "validation_error", "url: {bad:?}");
    }

    // Nothing was stored under the requested code.
    app.server.get("/ctl123").await.assert_status_not_found();
}

#[tokio::test]
async fn test_update_rejects_control_characters() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("editor").await;

    let created = app
        .create_url(
            &key,
            json!({ "original_url": "https://example.com", "short_code": "ctl456" }),
        )
        .await;

    app.server
        .put(&format!("/api/urls/{}", created["id"]))
        .add_header("X-API-Key", key.as_str())
        .json(&json!({ "original_url": "https://example.com/\tx" }))
        .await
        .assert_status_bad_request();

    let redirect = app.server.get("/ctl456").await;
    redirect.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(redirect.header("location"), "https://example.com");
}

#[tokio::test]
async fn test_create_malformed_json() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("creator").await;

    let response = app
        .server
        .post("/api/urls")
        .add_header("X-API-Key", key.as_str())
        .bytes(Bytes::from_static(b"{ not json"))
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(common::error_code(&body), "validation_error");
}

#[tokio::test]
async fn test_create_missing_original_url() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("creator").await;

    let response = app
        .server
        .post("/api/urls")
        .add_header("X-API-Key", key.as_str())
        .json(&json!({ "short_code": "nourl" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_create_with_expiry() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("creator").await;

    let body = app
        .create_url(
            &key,
            json!({ "original_url": "https://example.com", "expires_at": "2099-01-01T00:00:00Z" }),
        )
        .await;

    assert_eq!(body["expires_at"], "2099-01-01T00:00:00Z");
}

// ─── READ ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_url_by_id_and_code() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("reader").await;

    let created = app
        .create_url(
            &key,
            json!({ "original_url": "https://example.com", "short_code": "lookup" }),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let by_id: Value = app
        .server
        .get(&format!("/api/urls/{id}"))
        .add_header("X-API-Key", key.as_str())
        .await
        .json();
    assert_eq!(by_id["short_code"], "lookup");

    let by_code: Value = app
        .server
        .get("/api/urls/code/lookup")
        .add_header("X-API-Key", key.as_str())
        .await
        .json();
    assert_eq!(by_code["id"], id);
}

#[tokio::test]
async fn test_other_keys_urls_look_missing() {
    let app = common::spawn_app();
    let (_, alice) = app.issue_key("alice").await;
    let (_, bob) = app.issue_key("bob").await;

    let created = app
        .create_url(
            &alice,
            json!({ "original_url": "https://example.com", "short_code": "alices" }),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    app.server
        .get(&format!("/api/urls/{id}"))
        .add_header("X-API-Key", bob.as_str())
        .await
        .assert_status_not_found();

    app.server
        .get("/api/urls/code/alices")
        .add_header("X-API-Key", bob.as_str())
        .await
        .assert_status_not_found();

    app.server
        .put(&format!("/api/urls/{id}"))
        .add_header("X-API-Key", bob.as_str())
        .json(&json!({ "original_url": "https://evil.example" }))
        .await
        .assert_status_not_found();

    app.server
        .delete(&format!("/api/urls/{id}"))
        .add_header("X-API-Key", bob.as_str())
        .await
        .assert_status_not_found();

    // Still intact for the owner.
    let body: Value = app
        .server
        .get(&format!("/api/urls/{id}"))
        .add_header("X-API-Key", alice.as_str())
        .await
        .json();
    assert_eq!(body["original_url"], "https://example.com");
}

#[tokio::test]
async fn test_get_non_numeric_id() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("reader").await;

    let response = app
        .server
        .get("/api/urls/abc")
        .add_header("X-API-Key", key.as_str())
        .await;

    response.assert_status_bad_request();
}

// ─── LIST ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_is_scoped_and_paginated() {
    let app = common::spawn_app();
    let (_, alice) = app.issue_key("alice").await;
    let (_, bob) = app.issue_key("bob").await;

    for i in 0..5 {
        app.create_url(
            &alice,
            json!({ "original_url": format!("https://example.com/{i}") }),
        )
        .await;
    }
    app.create_url(&bob, json!({ "original_url": "https://bob.example" }))
        .await;

    let page: Value = app
        .server
        .get("/api/urls")
        .add_query_param("page", 2)
        .add_query_param("page_size", 2)
        .add_header("X-API-Key", alice.as_str())
        .await
        .json();

    assert_eq!(page["total"], 5);
    assert_eq!(page["page"], 2);
    assert_eq!(page["page_size"], 2);
    let urls = page["urls"].as_array().unwrap();
    assert_eq!(urls.len(), 2);
    // Newest first: page 2 holds the 3rd and 2nd created.
    assert_eq!(urls[0]["original_url"], "https://example.com/2");
    assert_eq!(urls[1]["original_url"], "https://example.com/1");

    let bobs: Value = app
        .server
        .get("/api/urls")
        .add_header("X-API-Key", bob.as_str())
        .await
        .json();
    assert_eq!(bobs["total"], 1);
    assert_eq!(bobs["page_size"], 25);
}

#[tokio::test]
async fn test_list_rejects_bad_pagination() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("lister").await;

    for (name, value) in [("page", "0"), ("page_size", "0"), ("page_size", "1001"), ("page", "x")] {
        let response = app
            .server
            .get("/api/urls")
            .add_query_param(name, value)
            .add_header("X-API-Key", key.as_str())
            .await;

        response.assert_status_bad_request();
    }
}

// ─── UPDATE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_target_keeps_code() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("editor").await;

    let created = app
        .create_url(
            &key,
            json!({ "original_url": "https://old.example", "short_code": "stable" }),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .server
        .put(&format!("/api/urls/{id}"))
        .add_header("X-API-Key", key.as_str())
        .json(&json!({ "original_url": "https://new.example" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["short_code"], "stable");
    assert_eq!(body["original_url"], "https://new.example");

    let redirect = app.server.get("/stable").await;
    redirect.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(redirect.header("location"), "https://new.example");
}

#[tokio::test]
async fn test_update_expiry_set_and_clear() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("editor").await;

    let created = app
        .create_url(&key, json!({ "original_url": "https://example.com" }))
        .await;
    let id = created["id"].as_i64().unwrap();

    let set: Value = app
        .server
        .patch(&format!("/api/urls/{id}"))
        .add_header("X-API-Key", key.as_str())
        .json(&json!({ "expires_at": "2099-06-01T12:00:00Z" }))
        .await
        .json();
    assert_eq!(set["expires_at"], "2099-06-01T12:00:00Z");
    assert_eq!(set["original_url"], "https://example.com");

    // Omitting the field leaves the expiry alone.
    let untouched: Value = app
        .server
        .put(&format!("/api/urls/{id}"))
        .add_header("X-API-Key", key.as_str())
        .json(&json!({ "original_url": "https://example.com/2" }))
        .await
        .json();
    assert_eq!(untouched["expires_at"], "2099-06-01T12:00:00Z");

    let cleared: Value = app
        .server
        .put(&format!("/api/urls/{id}"))
        .add_header("X-API-Key", key.as_str())
        .json(&json!({ "expires_at": null }))
        .await
        .json();
    assert!(cleared["expires_at"].is_null());
}

#[tokio::test]
async fn test_update_rejects_invalid_url() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("editor").await;

    let created = app
        .create_url(&key, json!({ "original_url": "https://example.com" }))
        .await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .server
        .put(&format!("/api/urls/{id}"))
        .add_header("X-API-Key", key.as_str())
        .json(&json!({ "original_url": "mailto:someone@example.com" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_update_missing_url() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("editor").await;

    app.server
        .put("/api/urls/999")
        .add_header("X-API-Key", key.as_str())
        .json(&json!({ "original_url": "https://example.com" }))
        .await
        .assert_status_not_found();
}

// ─── DELETE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_url() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("deleter").await;

    let created = app
        .create_url(
            &key,
            json!({ "original_url": "https://example.com", "short_code": "gone" }),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    app.server
        .delete(&format!("/api/urls/{id}"))
        .add_header("X-API-Key", key.as_str())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .get(&format!("/api/urls/{id}"))
        .add_header("X-API-Key", key.as_str())
        .await
        .assert_status_not_found();

    app.server
        .delete(&format!("/api/urls/{id}"))
        .add_header("X-API-Key", key.as_str())
        .await
        .assert_status_not_found();

    app.server.get("/gone").await.assert_status_not_found();
}

#[tokio::test]
async fn test_deleted_code_can_be_reused() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("deleter").await;

    let created = app
        .create_url(
            &key,
            json!({ "original_url": "https://example.com", "short_code": "again" }),
        )
        .await;

    app.server
        .delete(&format!("/api/urls/{}", created["id"]))
        .add_header("X-API-Key", key.as_str())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.create_url(
        &key,
        json!({ "original_url": "https://other.example", "short_code": "again" }),
    )
    .await;
}

// ─── EXPIRY VISIBILITY ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_expired_url_still_visible_to_owner() {
    let app = common::spawn_app();
    let (_, key) = app.issue_key("owner").await;

    app.create_url(
        &key,
        json!({ "original_url": "https://example.com", "short_code": "stale" }),
    )
    .await;
    app.urls.modify("stale", |u| {
        u.expires_at = Some(Utc::now() - Duration::hours(1));
    });

    app.server
        .get("/api/urls/code/stale")
        .add_header("X-API-Key", key.as_str())
        .await
        .assert_status_ok();
}
