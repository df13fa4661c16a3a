//! Review repository for database operations.

use crate::errors::CatalogError;
use crate::models::Review;
use sqlx::PgPool;

/// Rating statistics for one book: average (if any reviews exist) and
/// total review count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingStats {
    pub average: Option<f64>,
    pub count: i64,
}

/// Create a review. The rating has already been validated at intake;
/// the CHECK constraint is a backstop, not the primary gate.
pub async fn create_review(
    pool: &PgPool,
    book_id: i64,
    user_id: i64,
    review_text: Option<&str>,
    rating: i32,
) -> Result<Review, CatalogError> {
    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (book_id, user_id, review_text, rating)
        VALUES ($1, $2, $3, $4)
        RETURNING id, book_id, user_id, review_text, rating
        "#,
    )
    .bind(book_id)
    .bind(user_id)
    .bind(review_text)
    .bind(rating)
    .fetch_one(pool)
    .await
    .map_err(|e| CatalogError::Database(format!("Failed to create review: {}", e)))?;

    Ok(review)
}

/// List reviews for a book in insertion order, up to `limit`.
pub async fn list_by_book(
    pool: &PgPool,
    book_id: i64,
    limit: i64,
) -> Result<Vec<Review>, CatalogError> {
    let reviews = sqlx::query_as::<_, Review>(
        r#"
        SELECT id, book_id, user_id, review_text, rating
        FROM reviews
        WHERE book_id = $1
        ORDER BY id ASC
        LIMIT $2
        "#,
    )
    .bind(book_id)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(|e| CatalogError::Database(format!("Failed to list reviews: {}", e)))?;

    Ok(reviews)
}

/// Compute the rating average and review count for a book.
pub async fn rating_stats(pool: &PgPool, book_id: i64) -> Result<RatingStats, CatalogError> {
    let (average, count): (Option<f64>, i64) = sqlx::query_as(
        r#"
        SELECT AVG(rating)::float8, COUNT(id)
        FROM reviews
        WHERE book_id = $1
        "#,
    )
    .bind(book_id)
    .fetch_one(pool)
    .await
    .map_err(|e| CatalogError::Database(format!("Failed to compute rating stats: {}", e)))?;

    Ok(RatingStats { average, count })
}

/// Fetch the most recent non-empty review texts for a book.
///
/// Recency is approximated by descending id (insertion order), not a
/// timestamp.
pub async fn recent_review_texts(
    pool: &PgPool,
    book_id: i64,
    limit: i64,
) -> Result<Vec<String>, CatalogError> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT review_text
        FROM reviews
        WHERE book_id = $1
          AND review_text IS NOT NULL
          AND review_text <> ''
        ORDER BY id DESC
        LIMIT $2
        "#,
    )
    .bind(book_id)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(|e| CatalogError::Database(format!("Failed to fetch review texts: {}", e)))?;

    Ok(rows.into_iter().map(|(text,)| text).collect())
}
