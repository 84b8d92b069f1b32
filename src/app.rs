/*
 * Responsibility
 * - Config読み込み → 依存生成 (verifier / store) → Router 組み立て
 * - Middleware の適用順: http (timeout/trace) → boundary (context + error body) → cors
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::v1::handlers::fallback::route_not_found;
use crate::config::Config;
use crate::repos::{MemoryStore, PgStore, Store};
use crate::services::auth::build_identity_verifier;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,agenda_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics via tracing so they are not lost with stderr.
        tracing::error!(?info, "panic");

        // Development: crash immediately. Production: default hook, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let verifier = build_identity_verifier(config);

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => Arc::new(PgStore::connect(url).await?),
        None => {
            tracing::warn!("DATABASE_URL is not set; using the in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    Ok(AppState::new(verifier, store))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes())
        .fallback(route_not_found)
        .with_state(state.clone());

    apply_layers(router, state, config)
}

// Outermost last: CORS → boundary → timeout/trace/body limit → routes
fn apply_layers(router: Router, state: AppState, config: &Config) -> Router {
    let router = middleware::http::apply(router, config);
    let router = middleware::boundary::apply(router, state);
    middleware::cors::apply(router, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use jsonwebtoken::{Algorithm, EncodingKey, Header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const SECRET: &str = "scenario-secret";

    fn test_config(secret: Option<&str>) -> Config {
        let secret = secret.map(str::to_string);
        Config::from_lookup(move |key| match key {
            "AUTH_JWT_SECRET" => secret.clone(),
            "ACCESS_TOKEN_LEEWAY_SECONDS" => Some("0".to_string()),
            "REQUEST_TIMEOUT_SECONDS" => Some("1".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn test_state(config: &Config) -> AppState {
        AppState::new(
            build_identity_verifier(config),
            Arc::new(MemoryStore::new()),
        )
    }

    fn app_with(secret: Option<&str>) -> Router {
        let config = test_config(secret);
        build_router(test_state(&config), &config)
    }

    fn app() -> Router {
        app_with(Some(SECRET))
    }

    fn token(sub: &str, exp_offset: i64) -> String {
        let exp = chrono::Utc::now().timestamp() + exp_offset;
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({ "sub": sub, "exp": exp }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn get(uri: &str, auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn put(uri: &str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn post(uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
        post_raw(uri, auth, body.to_string())
    }

    fn post_raw(uri: &str, auth: Option<&str>, body: String) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Option<String>, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let request_id = res
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, request_id, body)
    }

    async fn create_event(app: &Router, owner: &str) -> String {
        let auth = format!("Bearer {}", token(owner, 600));
        let (status, _, body) = send(
            app,
            post(
                "/api/v1/events",
                Some(auth.as_str()),
                json!({ "title": "Team lunch", "price": 15.0, "date": "2026-12-01T12:00:00Z" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["createdAt"].is_string());
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn private_operation_without_credentials_is_unauthenticated() {
        let (status, request_id, body) = send(&app(), get("/api/v1/me", None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");
        assert_eq!(body["error"], "authentication required");
        assert!(body.get("details").is_none());
        assert_eq!(body["requestId"].as_str(), request_id.as_deref());
    }

    #[tokio::test]
    async fn private_operation_with_valid_token_proceeds() {
        let auth = format!("Bearer {}", token("user-123", 600));
        let (status, _, body) = send(&app(), get("/api/v1/me", Some(auth.as_str()))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "subjectId": "user-123" }));
    }

    #[tokio::test]
    async fn expired_or_malformed_credentials_are_anonymous() {
        let app = app();
        let valid = token("user-123", 600);
        let cases = [
            format!("Bearer {}", token("user-123", -3600)),
            format!("bearer {valid}"),
            format!("Bearer  {valid}"),
            valid,
        ];

        for auth in &cases {
            let (status, _, body) = send(&app, get("/api/v1/me", Some(auth.as_str()))).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "credential: {auth:?}");
            assert_eq!(body["code"], "UNAUTHENTICATED");
        }
    }

    #[tokio::test]
    async fn public_operation_ignores_invalid_credentials() {
        let (status, request_id, body) = send(
            &app(),
            get("/api/v1/events", Some("Bearer definitely-not-a-jwt")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
        assert!(request_id.is_some());
    }

    #[tokio::test]
    async fn missing_secret_fails_closed() {
        let auth = format!("Bearer {}", token("user-123", 600));
        let (status, _, body) = send(&app_with(None), get("/api/v1/me", Some(auth.as_str()))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn validation_failure_reports_issues() {
        let auth = format!("Bearer {}", token("user-123", 600));
        let (status, _, body) = send(
            &app(),
            post(
                "/api/v1/events",
                Some(auth.as_str()),
                json!({ "title": "Standup", "price": -5, "date": "2026-12-01T09:00:00Z" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_USER_INPUT");
        assert_eq!(
            body["details"],
            json!([{ "field": "price", "message": "must be positive" }])
        );
        assert!(body["error"].is_string());
        assert!(body["requestId"].is_string());
    }

    #[tokio::test]
    async fn guard_runs_before_validation() {
        let (status, _, body) = send(
            &app(),
            post("/api/v1/events", None, json!({ "title": "", "price": -1, "date": "x" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn guard_runs_before_body_parsing() {
        let (status, _, body) = send(
            &app(),
            post("/api/v1/events", None, json!({ "title": "Standup" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");

        let (status, _, body) = send(
            &app(),
            post_raw("/api/v1/events", None, "{\"title\": ".to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let app = app();
        let user = json!({ "email": "ada@example.com", "name": "Ada" });

        let (status, _, body) = send(&app, post("/api/v1/users", None, user.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "ada@example.com");
        assert!(body["createdAt"].is_string());

        let (status, _, body) = send(&app, post("/api/v1/users", None, user)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
        assert_eq!(body["details"], json!({ "email": "ada@example.com" }));
    }

    #[tokio::test]
    async fn malformed_json_is_bad_input() {
        let (status, _, body) = send(
            &app(),
            post_raw("/api/v1/users", None, "{\"email\": ".to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_USER_INPUT");
        assert!(body["requestId"].is_string());
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, _, body) = send(&app(), get("/api/v1/calendar", None)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["error"], "route not found");
    }

    #[tokio::test]
    async fn unsupported_method_is_not_found() {
        let (status, request_id, body) = send(&app(), put("/api/v1/me")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["error"], "route not found");
        assert_eq!(body["requestId"].as_str(), request_id.as_deref());
    }

    #[tokio::test]
    async fn slow_request_times_out_as_json() {
        let config = test_config(Some(SECRET));
        let slow = Router::new().route(
            "/slow",
            axum::routing::get(|| async {
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                "too late"
            }),
        );
        let app = apply_layers(slow, test_state(&config), &config);

        let (status, request_id, body) = send(&app, get("/slow", None)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "TIMEOUT");
        assert_eq!(body["error"], "request timed out");
        assert_eq!(body["requestId"].as_str(), request_id.as_deref());
    }

    #[tokio::test]
    async fn undecodable_event_id_is_bad_input_json() {
        let app = app();
        let guest = format!("Bearer {}", token("guest", 600));

        let res = app
            .clone()
            .oneshot(post("/api/v1/events/%FF/bookings", Some(guest.as_str()), json!({})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "BAD_USER_INPUT");
        assert!(body["requestId"].is_string());

        let (status, _, body) = send(
            &app,
            post("/api/v1/events/not-a-uuid/bookings", Some(guest.as_str()), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "event not found");

        let (status, _, body) =
            send(&app, post("/api/v1/events/%FF/bookings", None, json!({}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn booking_rules_map_to_taxonomy() {
        let app = app();
        let event_id = create_event(&app, "organizer").await;
        let uri = format!("/api/v1/events/{event_id}/bookings");

        let owner = format!("Bearer {}", token("organizer", 600));
        let (status, _, body) = send(&app, post(&uri, Some(owner.as_str()), json!({}))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");

        let guest = format!("Bearer {}", token("guest", 600));
        let (status, _, body) = send(&app, post(&uri, Some(guest.as_str()), json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["userId"], "guest");

        let (status, _, body) = send(&app, post(&uri, Some(guest.as_str()), json!({}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
        assert!(body["details"].get("user_id").is_some());

        let missing = format!("/api/v1/events/{}/bookings", uuid::Uuid::new_v4());
        let (status, _, body) = send(&app, post(&missing, Some(guest.as_str()), json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "event not found");
    }

    #[tokio::test]
    async fn every_response_carries_a_fresh_request_id() {
        let app = app();
        let (_, first, _) = send(&app, get("/api/v1/health", None)).await;
        let (_, second, _) = send(&app, get("/api/v1/health", None)).await;

        let (first, second) = (first.unwrap(), second.unwrap());
        assert!(!first.is_empty());
        assert_ne!(first, second);
    }
}
