use std::path::Path;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{self, TraceLayer},
};
use tracing::Level;

use crate::AppState;

pub mod api;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest(
            "/api/rest",
            Router::new().route("/roster", get(api::roster::get)),
        )
        .nest(
            "/api/ws",
            Router::new().route("/presence", get(api::ws::presence)),
        )
}

/// API routes plus the viewer pages from `public_path`, with permissive CORS
/// so pages served from another origin can reach the roster and the socket.
pub fn create_app(state: AppState, public_path: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(create_router())
        .route_service("/login", ServeFile::new(public_path.join("login.html")))
        .fallback_service(ServeDir::new(public_path))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::{env, fs, path::PathBuf};

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use uuid::Uuid;
    use tower::ServiceExt;

    use super::*;
    use crate::{config::Config, model::presence::ConnectionId};

    #[tokio::test]
    async fn roster_endpoint_lists_teachers() {
        let state = AppState::new(&Config::default());
        state
            .presence
            .lock()
            .await
            .login(ConnectionId::new(), "t@x.com", "x", Some("Mr. T"))
            .unwrap();

        let response = create_router()
            .with_state(state)
            .oneshot(
                Request::builder()
                    .uri("/api/rest/roster")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["teachers"][0]["displayName"], "Mr. T");
        assert_eq!(body["teachers"][0]["status"], "Available");
        assert_eq!(body["_metadata"]["totalCount"], 1);
    }

    fn public_dir_with_login_page() -> PathBuf {
        let dir = env::temp_dir().join(format!("staffroom-public-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("login.html"), "<form id=\"login-form\"></form>").unwrap();
        dir
    }

    #[tokio::test]
    async fn cross_origin_requests_are_allowed() {
        let public = public_dir_with_login_page();
        let app = create_app(AppState::new(&Config::default()), &public);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/rest/roster")
                    .header(header::ORIGIN, "http://dashboard.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        fs::remove_dir_all(public).unwrap();
    }

    #[tokio::test]
    async fn login_page_is_served_without_extension() {
        let public = public_dir_with_login_page();
        let app = create_app(AppState::new(&Config::default()), &public);

        let response = app
            .oneshot(Request::builder().uri("/login").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("login-form"));
        fs::remove_dir_all(public).unwrap();
    }
}
