use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{foods, goals, meals, summary};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(goals::router())
                .merge(meals::router())
                .merge(foods::router())
                .merge(summary::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtKeys;
    use axum::{
        body::Body,
        extract::FromRef,
        http::{header, Method, Request, StatusCode},
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    fn bearer(state: &AppState) -> String {
        let token = JwtKeys::from_ref(state).sign(Uuid::new_v4()).unwrap();
        format!("Bearer {token}")
    }

    async fn send(req: Request<Body>) -> StatusCode {
        let app = build_app(AppState::fake());
        app.oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn health_is_public() {
        let req = Request::get("/api/v1/health").body(Body::empty()).unwrap();
        assert_eq!(send(req).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn goal_routes_require_a_token() {
        let req = Request::get("/api/v1/goals").body(Body::empty()).unwrap();
        assert_eq!(send(req).await, StatusCode::UNAUTHORIZED);

        let req = Request::get("/api/v1/summary/2024-06-01")
            .header(header::AUTHORIZATION, "Bearer nope")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(req).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn goal_without_targets_is_rejected_before_touching_storage() {
        let state = AppState::fake();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/goals")
            .header(header::AUTHORIZATION, bearer(&state))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"start_date":"2024-06-01"}"#))
            .unwrap();
        assert_eq!(send(req).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bad_summary_date_is_a_bad_request() {
        let state = AppState::fake();
        let req = Request::get("/api/v1/summary/yesterday")
            .header(header::AUTHORIZATION, bearer(&state))
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(req).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn negative_quantity_is_a_bad_request() {
        let state = AppState::fake();
        let body = serde_json::json!({
            "meal_type": "lunch",
            "serving_id": Uuid::new_v4(),
            "quantity": -1.0
        });
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/meal-items")
            .header(header::AUTHORIZATION, bearer(&state))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        assert_eq!(send(req).await, StatusCode::BAD_REQUEST);
    }
}
