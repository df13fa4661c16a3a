//! Catalog operations: book lifecycle, rating aggregation, and
//! AI-assisted summaries.

use sqlx::PgPool;
use tracing::info;

use crate::errors::CatalogError;
use crate::models::{Book, BookPatch, BookSummaryResponse, CreateBookRequest};
use crate::repositories::{books, reviews};
use crate::services::llm_client::TextGenerator;

/// Summary stored when the generator produced no usable text.
const SUMMARY_FALLBACK: &str = "Summary generation failed or is pending.";

/// Genre used by the recommendation stub until per-user preferences exist.
const PREFERRED_GENRE: &str = "Fantasy";

/// Number of newest review texts fed to the review-sentiment prompt.
const REVIEW_SAMPLE_LIMIT: i64 = 20;

/// Separator between review texts in the sentiment prompt.
const REVIEW_SEPARATOR: &str = "\n---\n";

/// Create a book, generating its stored summary from the submitted content.
///
/// Generation happens inline before the insert. An empty generator output
/// falls back to a placeholder summary rather than failing the create.
pub async fn create_book(
    pool: &PgPool,
    generator: &dyn TextGenerator,
    request: &CreateBookRequest,
) -> Result<Book, CatalogError> {
    request.validate()?;

    let generated = generator
        .generate_book_summary(&request.content, &request.title)
        .await;
    let summary = if generated.is_empty() {
        SUMMARY_FALLBACK.to_string()
    } else {
        generated
    };

    let book = books::create_book(
        pool,
        &request.title,
        &request.author,
        request.genre.as_deref(),
        request.year_published,
        &summary,
    )
    .await?;

    info!(target: "catalog.services.book", book_id = book.id, "Created book");
    Ok(book)
}

/// Fetch a single book, or `NotFound` if no such id exists.
pub async fn get_book(pool: &PgPool, book_id: i64) -> Result<Book, CatalogError> {
    books::get_by_id(pool, book_id)
        .await?
        .ok_or_else(|| CatalogError::NotFound("Book not found".to_string()))
}

/// List books in insertion order, up to `limit`.
pub async fn list_books(pool: &PgPool, limit: i64) -> Result<Vec<Book>, CatalogError> {
    books::list(pool, limit).await
}

/// Apply a partial update to a book's descriptive fields.
///
/// The stored summary is never touched by updates.
pub async fn update_book(
    pool: &PgPool,
    book_id: i64,
    patch: &BookPatch,
) -> Result<Book, CatalogError> {
    patch.validate()?;

    // An all-absent patch has nothing to write; read instead.
    if !patch.has_changes() {
        return get_book(pool, book_id).await;
    }

    let book = books::update_book(pool, book_id, patch)
        .await?
        .ok_or_else(|| CatalogError::NotFound("Book not found".to_string()))?;

    info!(target: "catalog.services.book", book_id = book.id, "Updated book");
    Ok(book)
}

/// Delete a book and all of its reviews.
pub async fn delete_book(pool: &PgPool, book_id: i64) -> Result<(), CatalogError> {
    let deleted = books::delete_with_reviews(pool, book_id).await?;
    if !deleted {
        return Err(CatalogError::NotFound("Book not found".to_string()));
    }

    info!(target: "catalog.services.book", book_id, "Deleted book");
    Ok(())
}

/// Build the aggregate view of a book: stored summary, rating average,
/// review count, and a generated sentiment summary of recent reviews.
///
/// Books without any non-empty review text short-circuit to
/// "No reviews yet." and never reach the generator.
pub async fn get_summary_and_rating(
    pool: &PgPool,
    generator: &dyn TextGenerator,
    book_id: i64,
) -> Result<BookSummaryResponse, CatalogError> {
    let book = get_book(pool, book_id).await?;

    let stats = reviews::rating_stats(pool, book_id).await?;
    let aggregated_rating = match stats.average {
        Some(avg) => (avg * 100.0).round() / 100.0,
        None => 0.0,
    };

    let texts = reviews::recent_review_texts(pool, book_id, REVIEW_SAMPLE_LIMIT).await?;
    let review_sentiment_summary = if texts.is_empty() {
        "No reviews yet.".to_string()
    } else {
        generator
            .generate_review_summary(&texts.join(REVIEW_SEPARATOR))
            .await
    };

    Ok(BookSummaryResponse {
        title: book.title,
        author: book.author,
        book_summary: book.summary,
        aggregated_rating,
        review_count: stats.count,
        review_sentiment_summary,
    })
}

/// Recommend up to three books for the caller.
///
/// Prototype heuristic: prefer the first three catalog books in the
/// preferred genre; if none match, fall back to the first three overall.
/// Only the first twenty books are considered.
pub async fn recommend_books(pool: &PgPool) -> Result<Vec<Book>, CatalogError> {
    let candidates = books::list(pool, 20).await?;

    let preferred: Vec<Book> = candidates
        .iter()
        .filter(|b| b.genre.as_deref() == Some(PREFERRED_GENRE))
        .take(3)
        .cloned()
        .collect();

    if preferred.is_empty() {
        Ok(candidates.into_iter().take(3).collect())
    } else {
        Ok(preferred)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Canned generator that records which prompts it was asked to build.
    struct StubGenerator {
        book_summary: String,
        review_summary: String,
        review_inputs: Mutex<Vec<String>>,
    }

    impl StubGenerator {
        fn new(book_summary: &str, review_summary: &str) -> Self {
            Self {
                book_summary: book_summary.to_string(),
                review_summary: review_summary.to_string(),
                review_inputs: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate_book_summary(&self, _content: &str, _title: &str) -> String {
            self.book_summary.clone()
        }

        async fn generate_review_summary(&self, reviews_text: &str) -> String {
            self.review_inputs
                .lock()
                .expect("Lock should not be poisoned")
                .push(reviews_text.to_string());
            self.review_summary.clone()
        }
    }

    fn book_request(title: &str, genre: Option<&str>) -> CreateBookRequest {
        CreateBookRequest {
            title: title.to_string(),
            author: "Some Author".to_string(),
            genre: genre.map(str::to_string),
            year_published: Some(1999),
            content: "Full text of the book.".to_string(),
        }
    }

    #[sqlx::test]
    async fn test_create_book_stores_generated_summary(pool: PgPool) -> Result<(), CatalogError> {
        let generator = StubGenerator::new("A tale of adventure.", "");

        let book = create_book(&pool, &generator, &book_request("Voyage", None)).await?;
        assert_eq!(book.summary, "A tale of adventure.");

        Ok(())
    }

    #[sqlx::test]
    async fn test_create_book_empty_generation_falls_back(
        pool: PgPool,
    ) -> Result<(), CatalogError> {
        let generator = StubGenerator::new("", "");

        let book = create_book(&pool, &generator, &book_request("Voyage", None)).await?;
        assert_eq!(book.summary, SUMMARY_FALLBACK);

        Ok(())
    }

    #[sqlx::test]
    async fn test_summary_without_reviews_skips_generator(
        pool: PgPool,
    ) -> Result<(), CatalogError> {
        let generator = StubGenerator::new("stored", "should not appear");
        let book = create_book(&pool, &generator, &book_request("Quiet", None)).await?;

        let summary = get_summary_and_rating(&pool, &generator, book.id).await?;
        assert_eq!(summary.review_sentiment_summary, "No reviews yet.");
        assert_eq!(summary.aggregated_rating, 0.0);
        assert_eq!(summary.review_count, 0);
        assert!(generator
            .review_inputs
            .lock()
            .expect("Lock should not be poisoned")
            .is_empty());

        Ok(())
    }

    #[sqlx::test]
    async fn test_summary_aggregates_and_joins_reviews(pool: PgPool) -> Result<(), CatalogError> {
        let generator = StubGenerator::new("stored", "Readers mostly liked it.");
        let book = create_book(&pool, &generator, &book_request("Popular", None)).await?;

        reviews::create_review(&pool, book.id, 1, Some("great"), 5).await?;
        reviews::create_review(&pool, book.id, 2, Some("decent"), 4).await?;
        reviews::create_review(&pool, book.id, 3, None, 4).await?;

        let summary = get_summary_and_rating(&pool, &generator, book.id).await?;
        assert_eq!(summary.aggregated_rating, 4.33);
        assert_eq!(summary.review_count, 3);
        assert_eq!(summary.review_sentiment_summary, "Readers mostly liked it.");
        assert_eq!(summary.book_summary, "stored");

        let inputs = generator
            .review_inputs
            .lock()
            .expect("Lock should not be poisoned");
        assert_eq!(inputs.len(), 1);
        // Newest review text first, rating-only reviews skipped.
        assert_eq!(inputs[0], "decent\n---\ngreat");

        Ok(())
    }

    #[sqlx::test]
    async fn test_empty_patch_reads_without_writing(pool: PgPool) -> Result<(), CatalogError> {
        let generator = StubGenerator::new("stored", "");
        let book = create_book(&pool, &generator, &book_request("Static", None)).await?;

        let unchanged = update_book(&pool, book.id, &BookPatch::default()).await?;
        assert_eq!(unchanged.title, "Static");
        assert_eq!(unchanged.summary, "stored");

        // A missing id is still reported, even with nothing to write.
        let result = update_book(&pool, 424242, &BookPatch::default()).await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));

        Ok(())
    }

    #[sqlx::test]
    async fn test_recommendations_prefer_genre(pool: PgPool) -> Result<(), CatalogError> {
        let generator = StubGenerator::new("s", "");
        create_book(&pool, &generator, &book_request("A", Some("Horror"))).await?;
        create_book(&pool, &generator, &book_request("B", Some("Fantasy"))).await?;
        create_book(&pool, &generator, &book_request("C", Some("Fantasy"))).await?;
        create_book(&pool, &generator, &book_request("D", None)).await?;

        let picks = recommend_books(&pool).await?;
        assert_eq!(picks.len(), 2);
        assert!(picks.iter().all(|b| b.genre.as_deref() == Some("Fantasy")));

        Ok(())
    }

    #[sqlx::test]
    async fn test_recommendations_fall_back_to_first_books(
        pool: PgPool,
    ) -> Result<(), CatalogError> {
        let generator = StubGenerator::new("s", "");
        for title in ["A", "B", "C", "D"] {
            create_book(&pool, &generator, &book_request(title, Some("Horror"))).await?;
        }

        let picks = recommend_books(&pool).await?;
        assert_eq!(picks.len(), 3);
        assert_eq!(picks[0].title, "A");

        Ok(())
    }

    #[sqlx::test]
    async fn test_delete_missing_book_is_not_found(pool: PgPool) -> Result<(), CatalogError> {
        let result = delete_book(&pool, 9999).await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));

        Ok(())
    }
}
