//! Route handlers
//!
//! Each handler records one span per request with the attributes the
//! trace tooling keys on; the guard closes the span on every exit path.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rand::Rng;
use serde_json::json;
use shop_core::User;

use crate::AppState;

pub(crate) async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "service": "user-service" }))
}

pub(crate) async fn get_users(State(state): State<AppState>) -> Json<Vec<User>> {
    let mut span = state.tracer.span("get_all_users");

    simulate_query(state.max_query_delay_ms).await;

    let users = state.store.all();
    span.set_attributes([
        ("user.count", json!(users.len())),
        ("operation.type", json!("read")),
    ]);
    span.set_status_ok();

    Json(users)
}

pub(crate) async fn get_user(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    let mut span = state.tracer.span("get_user_by_id");
    span.set_attributes([("user.id", json!(id)), ("operation.type", json!("read"))]);

    simulate_query(state.max_query_delay_ms).await;

    match state.store.get(id) {
        Some(user) => {
            span.set_status_ok();
            Json(user).into_response()
        }
        None => {
            span.set_status_error("User not found");
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "User not found" })),
            )
                .into_response()
        }
    }
}

/// Stand-in for a database query: sleep a random duration up to the
/// configured bound
async fn simulate_query(max_ms: u64) {
    if max_ms == 0 {
        return;
    }
    let delay = rand::thread_rng().gen_range(0..=max_ms);
    tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use shop_client::testing::TestServer;
    use shop_trace::{SpanStatus, Tracer};

    use super::*;
    use crate::{create_router, UserStore};

    async fn serve() -> TestServer {
        let state = AppState::new(UserStore::seeded(), Tracer::disabled("user-service"));
        TestServer::start(create_router(state)).await.unwrap()
    }

    #[tokio::test]
    async fn health_reports_the_service_name() {
        let server = serve().await;

        let body: serde_json::Value = reqwest::get(server.url("/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body, json!({ "status": "healthy", "service": "user-service" }));
    }

    #[tokio::test]
    async fn lists_the_seeded_users() {
        let server = serve().await;

        let response = reqwest::get(server.url("/users")).await.unwrap();
        assert_eq!(response.status(), 200);

        let users: Vec<User> = response.json().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "John Doe");
        assert_eq!(users[1].email, "jane@example.com");
    }

    #[tokio::test]
    async fn fetches_one_user_by_id() {
        let server = serve().await;

        let user: User = reqwest::get(server.url("/users/2"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(user.id, 2);
        assert_eq!(user.name, "Jane Smith");
    }

    #[tokio::test]
    async fn unknown_user_is_a_404() {
        let server = serve().await;

        let response = reqwest::get(server.url("/users/999")).await.unwrap();
        assert_eq!(response.status(), 404);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "User not found" }));
    }

    #[tokio::test]
    async fn spans_carry_the_read_attributes() {
        let (tracer, exporter) = Tracer::with_memory("user-service");
        let state = AppState::new(UserStore::seeded(), tracer);
        let server = TestServer::start(create_router(state)).await.unwrap();

        reqwest::get(server.url("/users")).await.unwrap();
        reqwest::get(server.url("/users/999")).await.unwrap();

        let spans = exporter.finished();
        assert_eq!(spans.len(), 2);

        assert_eq!(spans[0].name, "get_all_users");
        assert_eq!(spans[0].attributes["user.count"], json!(2));
        assert_eq!(spans[0].attributes["operation.type"], json!("read"));
        assert_eq!(spans[0].status, SpanStatus::Ok);

        assert_eq!(spans[1].name, "get_user_by_id");
        assert_eq!(spans[1].attributes["user.id"], json!(999));
        assert_eq!(spans[1].status, SpanStatus::Error);
        assert_eq!(spans[1].error.as_deref(), Some("User not found"));
    }
}
