//! Catalog data models.
//!
//! Database row types plus the request/response shapes used by the
//! HTTP layer. Request types own their own validation, applied before
//! any side effect.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::CatalogError;

/// Inclusive rating bounds enforced at intake.
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// Minimum password length for registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

// ============================================================================
// Database rows
// ============================================================================

/// User model (maps to users table)
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Book model (maps to books table)
#[derive(Debug, Clone, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year_published: Option<i32>,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

/// Review model (maps to reviews table)
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub review_text: Option<String>,
    pub rating: i32,
}

// ============================================================================
// Auth API models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Accepted for wire compatibility but ignored: self-registration
    /// always yields the "user" role.
    #[serde(default)]
    pub role: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !is_valid_email(&self.email) {
            return Err(CatalogError::Validation("Invalid email format".to_string()));
        }
        if self.password.len() < MIN_PASSWORD_LENGTH {
            return Err(CatalogError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        Ok(())
    }
}

/// OAuth2-style password form: `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub role: String,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
        }
    }
}

// ============================================================================
// Book API models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub year_published: Option<i32>,
    /// Raw book content handed to the gateway for summarization.
    pub content: String,
}

impl CreateBookRequest {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.title.trim().is_empty() {
            return Err(CatalogError::Validation("Title cannot be empty".to_string()));
        }
        if self.author.trim().is_empty() {
            return Err(CatalogError::Validation(
                "Author cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Typed patch for partial book updates.
///
/// Merge precedence: a present-and-non-null field overrides, an absent
/// field leaves the stored value unchanged. The stored summary is never
/// regenerated by an update.
#[derive(Debug, Default, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub year_published: Option<i32>,
}

impl BookPatch {
    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.author.is_some()
            || self.genre.is_some()
            || self.year_published.is_some()
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(CatalogError::Validation("Title cannot be empty".to_string()));
            }
        }
        if let Some(author) = &self.author {
            if author.trim().is_empty() {
                return Err(CatalogError::Validation(
                    "Author cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year_published: Option<i32>,
    pub summary: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            genre: book.genre,
            year_published: book.year_published,
            summary: book.summary,
        }
    }
}

// ============================================================================
// Review API models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub review_text: Option<String>,
    pub rating: i32,
}

impl CreateReviewRequest {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.rating < MIN_RATING || self.rating > MAX_RATING {
            return Err(CatalogError::Validation(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub review_text: Option<String>,
    pub rating: i32,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            book_id: review.book_id,
            user_id: review.user_id,
            review_text: review.review_text,
            rating: review.rating,
        }
    }
}

// ============================================================================
// Aggregation / AI API models
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct BookSummaryResponse {
    pub title: String,
    pub author: String,
    pub book_summary: String,
    pub aggregated_rating: f64,
    pub review_count: i64,
    pub review_sentiment_summary: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateSummaryRequest {
    pub title: String,
    pub content: String,
}

impl GenerateSummaryRequest {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.title.trim().is_empty() {
            return Err(CatalogError::Validation("Title must not be empty".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(CatalogError::Validation(
                "Content must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateSummaryResponse {
    pub summary: String,
}

// ============================================================================
// Helpers
// ============================================================================

/// Simple email validation: something@domain.tld with no empty parts.
pub fn is_valid_email(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let (local, domain) = match (parts.first(), parts.get(1)) {
        (Some(l), Some(d)) => (*l, *d),
        _ => return false,
    };

    if local.is_empty() {
        return false;
    }

    let domain_parts: Vec<&str> = domain.split('.').collect();
    if domain_parts.len() < 2 {
        return false;
    }

    domain_parts.iter().all(|p| !p.is_empty())
}
