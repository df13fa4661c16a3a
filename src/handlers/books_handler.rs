//! Book and review endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::auth::{Identity, Role};
use crate::errors::CatalogError;
use crate::handlers::AppState;
use crate::models::{
    BookPatch, BookResponse, BookSummaryResponse, CreateBookRequest, CreateReviewRequest,
    ReviewResponse,
};
use crate::repositories::reviews;
use crate::services::book_service;

/// Maximum number of books returned by the list endpoint.
const BOOKS_LIST_LIMIT: i64 = 50;

/// Maximum number of reviews returned per book.
const REVIEWS_LIST_LIMIT: i64 = 100;

/// Add a new book to the catalog. Admin only.
///
/// POST /api/v1/books
pub async fn handle_create_book(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), CatalogError> {
    identity.require_role(Role::Admin)?;

    let book = book_service::create_book(&state.pool, state.generator.as_ref(), &payload).await?;
    Ok((StatusCode::CREATED, Json(BookResponse::from(book))))
}

/// List catalog books.
///
/// GET /api/v1/books
pub async fn handle_list_books(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookResponse>>, CatalogError> {
    let books = book_service::list_books(&state.pool, BOOKS_LIST_LIMIT).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// Fetch one book by id.
///
/// GET /api/v1/books/{book_id}
pub async fn handle_get_book(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
) -> Result<Json<BookResponse>, CatalogError> {
    let book = book_service::get_book(&state.pool, book_id).await?;
    Ok(Json(BookResponse::from(book)))
}

/// Partially update a book's descriptive fields. Admin only.
///
/// PUT /api/v1/books/{book_id}
pub async fn handle_update_book(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<BookPatch>,
) -> Result<Json<BookResponse>, CatalogError> {
    identity.require_role(Role::Admin)?;

    let book = book_service::update_book(&state.pool, book_id, &payload).await?;
    Ok(Json(BookResponse::from(book)))
}

/// Delete a book and its reviews. Admin only.
///
/// DELETE /api/v1/books/{book_id}
pub async fn handle_delete_book(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
    Extension(identity): Extension<Identity>,
) -> Result<StatusCode, CatalogError> {
    identity.require_role(Role::Admin)?;

    book_service::delete_book(&state.pool, book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a review for a book, attributed to the caller.
///
/// POST /api/v1/books/{book_id}/reviews
pub async fn handle_create_review(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), CatalogError> {
    payload.validate()?;

    // Reviews for nonexistent books are rejected up front.
    book_service::get_book(&state.pool, book_id).await?;

    let review = reviews::create_review(
        &state.pool,
        book_id,
        identity.id,
        payload.review_text.as_deref(),
        payload.rating,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(review))))
}

/// List reviews for a book.
///
/// GET /api/v1/books/{book_id}/reviews
pub async fn handle_list_reviews(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
) -> Result<Json<Vec<ReviewResponse>>, CatalogError> {
    let reviews = reviews::list_by_book(&state.pool, book_id, REVIEWS_LIST_LIMIT).await?;
    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}

/// Aggregate view: stored summary, rating average and count, and a
/// generated sentiment summary of recent reviews.
///
/// GET /api/v1/books/{book_id}/summary
pub async fn handle_book_summary(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
) -> Result<Json<BookSummaryResponse>, CatalogError> {
    let summary =
        book_service::get_summary_and_rating(&state.pool, state.generator.as_ref(), book_id)
            .await?;
    Ok(Json(summary))
}

/// Recommend books for the caller.
///
/// GET /api/v1/recommendations
pub async fn handle_recommendations(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookResponse>>, CatalogError> {
    let books = book_service::recommend_books(&state.pool).await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}
