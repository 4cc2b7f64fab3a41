mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

const USER: &str = "user-1";

fn server_with_token(ctx: &common::TestContext) -> (TestServer, String) {
    let token = ctx.store.issue_token(USER);
    (ctx.server(), token)
}

// ─── Authentication ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let ctx = common::create_test_state();
    let server = ctx.server();

    let response = server.get("/api/links").await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let ctx = common::create_test_state();
    let server = ctx.server();

    let response = server
        .get("/api/links")
        .authorization_bearer("not-a-real-token")
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_revoked_token_is_unauthorized() {
    let ctx = common::create_test_state();
    let (server, token) = server_with_token(&ctx);
    ctx.store.revoke_tokens_of(USER);

    let response = server.get("/api/links").authorization_bearer(&token).await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_successful_auth_marks_token_used() {
    let ctx = common::create_test_state();
    let (server, token) = server_with_token(&ctx);

    server
        .get("/api/links")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    assert!(ctx.store.token_last_used(USER).is_some());
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_link_generates_code() {
    let ctx = common::create_test_state();
    let (server, token) = server_with_token(&ctx);

    let response = server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({ "title": "Docs", "url": "https://Example.com/docs#intro" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let code = body["short_code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert_eq!(body["original_url"], "https://example.com/docs");
    assert_eq!(body["custom_alias"], Value::Null);
    assert_eq!(body["short_url"], format!("{}/{code}", common::PUBLIC_BASE_URL));
    assert_eq!(body["clicks"], 0);
    assert!(ctx.store.is_reserved(code));
}

#[tokio::test]
async fn test_create_link_with_alias() {
    let ctx = common::create_test_state();
    let (server, token) = server_with_token(&ctx);

    let response = server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({
            "title": "Sale",
            "url": "https://example.com/sale",
            "custom_alias": "summer-sale"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["custom_alias"], "summer-sale");
    assert_eq!(body["short_url"], "https://lnk.test/summer-sale");
    assert_eq!(body["short_code"].as_str().unwrap().len(), 6);
}

#[tokio::test]
async fn test_create_link_empty_alias_means_none() {
    let ctx = common::create_test_state();
    let (server, token) = server_with_token(&ctx);

    let response = server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({ "title": "Docs", "url": "https://example.com", "custom_alias": "" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["custom_alias"], Value::Null);
}

#[tokio::test]
async fn test_create_link_alias_taken_by_link() {
    let ctx = common::create_test_state();
    ctx.store
        .seed_link("user-2", "abc123", Some("promo"), "https://example.com");
    let (server, token) = server_with_token(&ctx);

    let response = server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({ "title": "Mine", "url": "https://example.org", "custom_alias": "promo" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "This URL is already taken");
    assert_eq!(ctx.store.links().len(), 1);
}

#[tokio::test]
async fn test_create_link_alias_taken_by_linktree() {
    let ctx = common::create_test_state();
    ctx.store.seed_linktree("user-2", "janedoe", "Jane");
    let (server, token) = server_with_token(&ctx);

    let response = server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({ "title": "Mine", "url": "https://example.org", "custom_alias": "janedoe" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_link_alias_matching_generated_code_is_taken() {
    let ctx = common::create_test_state();
    ctx.store
        .seed_link("user-2", "xyz789", None, "https://example.com");
    let (server, token) = server_with_token(&ctx);

    let response = server
        .post("/api/links")
        .authorization_bearer(&token)
        .json(&json!({ "title": "Mine", "url": "https://example.org", "custom_alias": "xyz789" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_link_rejects_invalid_input() {
    let ctx = common::create_test_state();
    let (server, token) = server_with_token(&ctx);

    for payload in [
        json!({ "title": "", "url": "https://example.com" }),
        json!({ "title": "X", "url": "ftp://example.com/file" }),
        json!({ "title": "X", "url": "not a url" }),
        json!({ "title": "X", "url": "https://example.com", "custom_alias": "Has Spaces" }),
        json!({ "title": "X", "url": "https://example.com", "custom_alias": "api" }),
        json!({ "title": "X", "url": "https://example.com", "custom_alias": "ab" }),
    ] {
        let response = server
            .post("/api/links")
            .authorization_bearer(&token)
            .json(&payload)
            .await;

        response.assert_status_bad_request();
    }

    assert!(ctx.store.links().is_empty());
}

// ─── Read ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_links_only_own_with_click_totals() {
    let ctx = common::create_test_state();
    let mine = ctx
        .store
        .seed_link(USER, "mine01", None, "https://example.com/1");
    ctx.store
        .seed_link(USER, "mine02", None, "https://example.com/2");
    ctx.store
        .seed_link("user-2", "theirs", None, "https://example.com/3");
    ctx.store.seed_click(mine.id, "mobile", "France", "Paris");
    ctx.store.seed_click(mine.id, "desktop", "France", "Lyon");
    let (server, token) = server_with_token(&ctx);

    let response = server.get("/api/links").authorization_bearer(&token).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total"], 2);
    let items = body["items"].as_array().unwrap();
    // Newest first
    assert_eq!(items[0]["short_code"], "mine02");
    assert_eq!(items[0]["clicks"], 0);
    assert_eq!(items[1]["short_code"], "mine01");
    assert_eq!(items[1]["clicks"], 2);
}

#[tokio::test]
async fn test_get_link() {
    let ctx = common::create_test_state();
    let link = ctx
        .store
        .seed_link(USER, "abc123", Some("promo"), "https://example.com");
    let (server, token) = server_with_token(&ctx);

    let response = server
        .get(&format!("/api/links/{}", link.id))
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["short_code"], "abc123");
    assert_eq!(body["short_url"], "https://lnk.test/promo");
}

#[tokio::test]
async fn test_get_foreign_link_is_not_found() {
    let ctx = common::create_test_state();
    let link = ctx
        .store
        .seed_link("user-2", "abc123", None, "https://example.com");
    let (server, token) = server_with_token(&ctx);

    let response = server
        .get(&format!("/api/links/{}", link.id))
        .authorization_bearer(&token)
        .await;

    response.assert_status_not_found();
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_link_frees_codes() {
    let ctx = common::create_test_state();
    let link = ctx
        .store
        .seed_link(USER, "abc123", Some("promo"), "https://example.com");
    ctx.store.seed_click(link.id, "mobile", "France", "Paris");
    let (server, token) = server_with_token(&ctx);

    server
        .delete(&format!("/api/links/{}", link.id))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    assert!(ctx.store.links().is_empty());
    assert!(ctx.store.clicks().is_empty());
    assert!(!ctx.store.is_reserved("abc123"));
    assert!(!ctx.store.is_reserved("promo"));

    server.get("/promo").await.assert_status_not_found();
}

#[tokio::test]
async fn test_delete_twice_is_not_found() {
    let ctx = common::create_test_state();
    let link = ctx
        .store
        .seed_link(USER, "abc123", None, "https://example.com");
    let (server, token) = server_with_token(&ctx);
    let path = format!("/api/links/{}", link.id);

    server
        .delete(&path)
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete(&path)
        .authorization_bearer(&token)
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_foreign_link_is_not_found() {
    let ctx = common::create_test_state();
    let link = ctx
        .store
        .seed_link("user-2", "abc123", None, "https://example.com");
    let (server, token) = server_with_token(&ctx);

    server
        .delete(&format!("/api/links/{}", link.id))
        .authorization_bearer(&token)
        .await
        .assert_status_not_found();

    assert_eq!(ctx.store.links().len(), 1);
}

// ─── QR and stats ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_link_qr_is_svg() {
    let ctx = common::create_test_state();
    let link = ctx
        .store
        .seed_link(USER, "abc123", None, "https://example.com");
    let (server, token) = server_with_token(&ctx);

    let response = server
        .get(&format!("/api/links/{}/qr", link.id))
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/svg+xml");
    assert!(response.text().contains("<svg"));
}

#[tokio::test]
async fn test_link_stats_breakdowns() {
    let ctx = common::create_test_state();
    let link = ctx
        .store
        .seed_link(USER, "abc123", None, "https://example.com");
    ctx.store.seed_click(link.id, "mobile", "France", "Paris");
    ctx.store.seed_click(link.id, "mobile", "France", "Lyon");
    ctx.store.seed_click(link.id, "desktop", "Germany", "Berlin");
    let (server, token) = server_with_token(&ctx);

    let response = server
        .get(&format!("/api/links/{}/stats", link.id))
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_clicks"], 3);
    assert_eq!(body["by_device"]["mobile"], 2);
    assert_eq!(body["by_device"]["desktop"], 1);
    assert_eq!(body["by_country"]["France"], 2);
    assert_eq!(body["by_city"]["Berlin"], 1);
    assert_eq!(body["recent_clicks"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_link_stats_foreign_link_is_not_found() {
    let ctx = common::create_test_state();
    let link = ctx
        .store
        .seed_link("user-2", "abc123", None, "https://example.com");
    let (server, token) = server_with_token(&ctx);

    server
        .get(&format!("/api/links/{}/stats", link.id))
        .authorization_bearer(&token)
        .await
        .assert_status_not_found();
}

// ─── Availability ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_availability_free_code() {
    let ctx = common::create_test_state();
    let (server, token) = server_with_token(&ctx);

    let response = server
        .get("/api/availability/fresh-code")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["available"], true);
    assert_eq!(body["reason"], Value::Null);
}

#[tokio::test]
async fn test_availability_checks_every_namespace() {
    let ctx = common::create_test_state();
    ctx.store
        .seed_link("user-2", "abc123", Some("promo"), "https://example.com");
    ctx.store.seed_linktree("user-3", "janedoe", "Jane");
    let (server, token) = server_with_token(&ctx);

    for code in ["abc123", "promo", "janedoe"] {
        let response = server
            .get(&format!("/api/availability/{code}"))
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["available"], false, "{code} should be taken");
        assert_eq!(body["reason"], "This URL is already taken");
    }
}

#[tokio::test]
async fn test_availability_invalid_code() {
    let ctx = common::create_test_state();
    let (server, token) = server_with_token(&ctx);

    let response = server
        .get("/api/availability/-bad-")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["available"], false);
    assert!(body["reason"].as_str().unwrap().contains("hyphen"));
}
