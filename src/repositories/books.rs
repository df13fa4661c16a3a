//! Book repository for database operations.
//!
//! Owns the cascade invariant: deleting a book deletes its reviews in
//! the same transaction, so no review can reference a missing book.

use crate::errors::CatalogError;
use crate::models::{Book, BookPatch};
use sqlx::PgPool;

const BOOK_COLUMNS: &str = "id, title, author, genre, year_published, summary, created_at";

/// Create a book with an already-computed summary.
pub async fn create_book(
    pool: &PgPool,
    title: &str,
    author: &str,
    genre: Option<&str>,
    year_published: Option<i32>,
    summary: &str,
) -> Result<Book, CatalogError> {
    let book = sqlx::query_as::<_, Book>(
        r#"
        INSERT INTO books (title, author, genre, year_published, summary)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, title, author, genre, year_published, summary, created_at
        "#,
    )
    .bind(title)
    .bind(author)
    .bind(genre)
    .bind(year_published)
    .bind(summary)
    .fetch_one(pool)
    .await
    .map_err(|e| CatalogError::Database(format!("Failed to create book: {}", e)))?;

    Ok(book)
}

/// Get a book by id.
pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Book>, CatalogError> {
    let query = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);

    let book = sqlx::query_as::<_, Book>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| CatalogError::Database(format!("Failed to fetch book: {}", e)))?;

    Ok(book)
}

/// List books in insertion order, up to `limit`.
pub async fn list(pool: &PgPool, limit: i64) -> Result<Vec<Book>, CatalogError> {
    let query = format!(
        "SELECT {} FROM books ORDER BY id ASC LIMIT $1",
        BOOK_COLUMNS
    );

    let books = sqlx::query_as::<_, Book>(&query)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(|e| CatalogError::Database(format!("Failed to list books: {}", e)))?;

    Ok(books)
}

/// Apply a typed patch to a book.
///
/// COALESCE merge: present fields override, absent fields keep their
/// stored value. The summary column is deliberately untouched.
/// Returns `None` when the book does not exist.
pub async fn update_book(
    pool: &PgPool,
    id: i64,
    patch: &BookPatch,
) -> Result<Option<Book>, CatalogError> {
    let book = sqlx::query_as::<_, Book>(
        r#"
        UPDATE books
        SET
            title = COALESCE($2, title),
            author = COALESCE($3, author),
            genre = COALESCE($4, genre),
            year_published = COALESCE($5, year_published)
        WHERE id = $1
        RETURNING id, title, author, genre, year_published, summary, created_at
        "#,
    )
    .bind(id)
    .bind(patch.title.as_deref())
    .bind(patch.author.as_deref())
    .bind(patch.genre.as_deref())
    .bind(patch.year_published)
    .fetch_optional(pool)
    .await
    .map_err(|e| CatalogError::Database(format!("Failed to update book: {}", e)))?;

    Ok(book)
}

/// Delete a book and every review referencing it, atomically.
///
/// Returns `false` when the book does not exist (reviews of a missing
/// book cannot exist either, per the cascade invariant).
pub async fn delete_with_reviews(pool: &PgPool, id: i64) -> Result<bool, CatalogError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| CatalogError::Database(format!("Failed to begin transaction: {}", e)))?;

    sqlx::query("DELETE FROM reviews WHERE book_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| CatalogError::Database(format!("Failed to delete reviews: {}", e)))?;

    let result = sqlx::query("DELETE FROM books WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| CatalogError::Database(format!("Failed to delete book: {}", e)))?;

    tx.commit()
        .await
        .map_err(|e| CatalogError::Database(format!("Failed to commit delete: {}", e)))?;

    Ok(result.rows_affected() > 0)
}
