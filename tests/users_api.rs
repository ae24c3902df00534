mod common;

use common::{ADMIN_KEY, API_KEY, app, get, send};
use serde_json::json;
use strata::Settings;

const USER: &str = r#"{"id":42,"name":"Ada","email":"ada@example.com"}"#;

#[tokio::test]
async fn public_pages_are_html() {
    let app = app();
    for path in ["/", "/about"] {
        let res = get(&app, path, &[]).await;
        assert_eq!(res.status, 200, "{path}");
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"), "{path}");
        assert!(res.text().contains("<h1>"), "{path}");
    }
}

#[tokio::test]
async fn probes_answer_without_credentials() {
    let app = app();
    assert_eq!(get(&app, "/healthz", &[]).await.text(), "ok");
    assert_eq!(get(&app, "/readyz", &[]).await.text(), "ready");
}

#[tokio::test]
async fn api_health_reports_version() {
    let res = get(&app(), "/api/health", &[API_KEY]).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.json(), json!({ "status": "healthy", "version": env!("CARGO_PKG_VERSION") }));
}

#[tokio::test]
async fn every_api_route_requires_the_api_key() {
    let app = app();
    let cases = [
        ("GET", "/api/health", ""),
        ("GET", "/api/users", ""),
        ("GET", "/api/users/1", ""),
        ("GET", "/api/users/anything", ""),
        ("POST", "/api/users", USER),
        ("PUT", "/api/users/9", USER),
        ("DELETE", "/api/users/9", ""),
        ("GET", "/api/admin", ""),
    ];
    for (method, path, body) in cases {
        let res = send(&app, method, path, &[ADMIN_KEY], body).await;
        assert_eq!(res.status, 401, "{method} {path}");
        assert_eq!(res.json(), json!({ "error": "API key required" }), "{method} {path}");
    }
}

#[tokio::test]
async fn blank_api_key_is_rejected() {
    let res = get(&app(), "/api/users", &[("X-API-Key", "  ")]).await;
    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn admin_routes_need_the_exact_secret() {
    let app = app();
    for admin in [None, Some("wrong"), Some("SUPERSECRET"), Some("")] {
        let mut headers = vec![API_KEY];
        if let Some(key) = admin {
            headers.push(("X-Admin-Key", key));
        }
        for (method, path) in [("GET", "/api/admin"), ("DELETE", "/api/users/5")] {
            let res = send(&app, method, path, &headers, "").await;
            assert_eq!(res.status, 403, "{method} {path} with {admin:?}");
            assert_eq!(res.json(), json!({ "error": "Admin access required" }));
        }
    }
}

#[tokio::test]
async fn admin_panel_with_both_keys() {
    let res = get(&app(), "/api/admin", &[API_KEY, ADMIN_KEY]).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.header("x-admin-panel"), Some("true"));
    assert_eq!(res.header("content-type"), Some("application/json"));
    assert_eq!(res.json()["total_users"], 100);
}

#[tokio::test]
async fn admin_secret_comes_from_settings() {
    let mut settings = Settings::default();
    settings.auth.admin_key = "rotated".into();
    let app = strata::users::app(&settings);

    assert_eq!(get(&app, "/api/admin", &[API_KEY, ADMIN_KEY]).await.status, 403);
    assert_eq!(get(&app, "/api/admin", &[API_KEY, ("X-Admin-Key", "rotated")]).await.status, 200);
}

#[tokio::test]
async fn listing_uses_defaults() {
    let res = get(&app(), "/api/users", &[API_KEY]).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.header("content-type"), Some("application/json"));

    let body = res.json();
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["sort"], "id");
    assert_eq!(body["total"], 100);
    assert!(body["users"].as_array().is_some_and(|u| !u.is_empty()));
}

#[tokio::test]
async fn listing_honours_query_overrides() {
    let body = get(&app(), "/api/users?page=5&limit=20&sort=email", &[API_KEY]).await.json();
    assert_eq!(body["page"], 5);
    assert_eq!(body["limit"], 20);
    assert_eq!(body["sort"], "email");
    assert_eq!(body["users"][0]["email"], "alice@example.com");
}

#[tokio::test]
async fn unparsable_query_values_fall_back() {
    let body = get(&app(), "/api/users?page=two&limit=-3", &[API_KEY]).await.json();
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 10);
}

#[tokio::test]
async fn default_limit_comes_from_settings() {
    let mut settings = Settings::default();
    settings.users.default_limit = 25;
    let body = get(&strata::users::app(&settings), "/api/users", &[API_KEY]).await.json();
    assert_eq!(body["limit"], 25);
}

#[tokio::test]
async fn repeated_gets_have_the_same_shape() {
    let app = app();
    let first = get(&app, "/api/users?sort=name", &[API_KEY]).await.json();
    let second = get(&app, "/api/users?sort=name", &[API_KEY]).await.json();
    assert_eq!(first, second);
}

#[tokio::test]
async fn user_detail_binds_the_path_id() {
    let body = get(&app(), "/api/users/123", &[API_KEY]).await.json();
    assert_eq!(
        body,
        json!({
            "id": "123",
            "name": "User 123",
            "email": "user123@example.com",
            "include_posts": false,
            "include_comments": false,
        })
    );
}

#[tokio::test]
async fn user_detail_reads_include_flags() {
    let body = get(&app(), "/api/users/789?include_posts=true", &[API_KEY]).await.json();
    assert_eq!(body["id"], "789");
    assert_eq!(body["include_posts"], true);
    assert_eq!(body["include_comments"], false);
}

#[tokio::test]
async fn create_returns_201_with_location() {
    let res = send(&app(), "POST", "/api/users", &[API_KEY], USER).await;
    assert_eq!(res.status, 201);
    assert_eq!(res.header("location"), Some("/api/users/42"));
    assert_eq!(res.json(), json!({ "id": 42, "status": "created" }));
}

#[tokio::test]
async fn create_rejects_malformed_bodies() {
    let app = app();
    for body in [r#"{"invalid":"json"}"#, "invalid json", "", r#"{"id":"x","name":"a","email":"b"}"#] {
        let res = send(&app, "POST", "/api/users", &[API_KEY], body).await;
        assert_eq!(res.status, 400, "{body:?}");
        let error = res.json()["error"].as_str().unwrap_or_default().to_owned();
        assert!(error.starts_with("invalid JSON: "), "{error}");
    }
}

#[tokio::test]
async fn update_returns_the_updated_user() {
    let res = send(&app(), "PUT", "/api/users/7", &[API_KEY], USER).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.json(), json!({ "id": 7, "name": "Ada", "email": "ada@example.com" }));
}

#[tokio::test]
async fn update_validates_id_and_body() {
    let app = app();
    assert_eq!(send(&app, "PUT", "/api/users/seven", &[API_KEY], USER).await.status, 400);
    assert_eq!(send(&app, "PUT", "/api/users/7", &[API_KEY], "{}").await.status, 400);
}

#[tokio::test]
async fn delete_with_both_keys_is_204_and_empty() {
    let res = send(&app(), "DELETE", "/api/users/5", &[API_KEY, ADMIN_KEY], "").await;
    assert_eq!(res.status, 204);
    assert!(res.body.is_empty());
    assert_eq!(res.header("content-type"), None);
}

#[tokio::test]
async fn unknown_paths_are_404_regardless_of_headers() {
    let app = app();
    for headers in [vec![], vec![API_KEY], vec![API_KEY, ADMIN_KEY]] {
        for path in ["/nonexistent", "/api/nonexistent", "/api/users/1/posts"] {
            let res = get(&app, path, &headers).await;
            assert_eq!(res.status, 404, "{path}");
            assert_eq!(res.json(), json!({ "error": "not found" }));
        }
    }
}

#[tokio::test]
async fn wrong_method_is_405_with_allow() {
    let res = send(&app(), "PATCH", "/api/users/5", &[API_KEY], "").await;
    assert_eq!(res.status, 405);
    assert_eq!(res.header("allow"), Some("GET, PUT, DELETE"));
    assert_eq!(res.json(), json!({ "error": "method not allowed" }));
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let app = app();
    assert!(get(&app, "/", &[]).await.header("x-request-id").is_some());
    assert!(get(&app, "/nonexistent", &[]).await.header("x-request-id").is_some());
    assert!(get(&app, "/api/users", &[]).await.header("x-request-id").is_some());

    let echoed = get(&app, "/", &[("X-Request-Id", "trace-me")]).await;
    assert_eq!(echoed.header("x-request-id"), Some("trace-me"));
}

#[tokio::test]
async fn maintenance_mode_answers_503_everywhere() {
    let mut settings = Settings::default();
    settings.maintenance = true;
    let app = strata::users::app(&settings);

    for path in ["/", "/api/users", "/nonexistent"] {
        let res = get(&app, path, &[API_KEY]).await;
        assert_eq!(res.status, 503, "{path}");
        assert_eq!(res.json(), json!({ "error": "service under maintenance" }));
        assert!(res.header("x-request-id").is_some());
    }
}

#[tokio::test]
async fn registered_routes_are_listed_with_full_paths() {
    let routes: Vec<String> = app()
        .router()
        .routes()
        .into_iter()
        .map(|(method, path)| format!("{method} {path}"))
        .collect();

    for expected in [
        "GET /",
        "GET /about",
        "GET /api/health",
        "GET /api/users",
        "POST /api/users",
        "GET /api/users/{id}",
        "PUT /api/users/{id}",
        "DELETE /api/users/{id}",
        "GET /api/admin",
    ] {
        assert!(routes.iter().any(|r| r == expected), "missing {expected}: {routes:?}");
    }
}
