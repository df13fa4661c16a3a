use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::handlers::{ai_handler, auth_handler, books_handler, AppState};
use crate::middleware::auth::require_auth;

/// Per-request timeout. Summary endpoints wait on the text-generation
/// gateway, so this must exceed the gateway timeout.
const REQUEST_TIMEOUT_SECS: u64 = 90;

pub fn build_routes(state: AppState) -> Router {
    // Everything below requires a valid access token.
    let protected = Router::new()
        .route(
            "/api/v1/books",
            post(books_handler::handle_create_book).get(books_handler::handle_list_books),
        )
        .route(
            "/api/v1/books/:book_id",
            get(books_handler::handle_get_book)
                .put(books_handler::handle_update_book)
                .delete(books_handler::handle_delete_book),
        )
        .route(
            "/api/v1/books/:book_id/reviews",
            post(books_handler::handle_create_review).get(books_handler::handle_list_reviews),
        )
        .route(
            "/api/v1/books/:book_id/summary",
            get(books_handler::handle_book_summary),
        )
        .route(
            "/api/v1/recommendations",
            get(books_handler::handle_recommendations),
        )
        .route(
            "/api/v1/generate-summary",
            post(ai_handler::handle_generate_summary),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        // Authentication endpoints
        .route("/api/v1/auth/register", post(auth_handler::handle_register))
        .route("/api/v1/auth/login", post(auth_handler::handle_login))
        // Health check
        .route("/health", get(health_check))
        .merge(protected)
        // Tracing and timeout middleware
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
