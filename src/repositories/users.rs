//! User repository for database operations.

use crate::auth::Role;
use crate::errors::CatalogError;
use crate::models::User;
use sqlx::PgPool;

/// Get a user by email. Emails are globally unique.
pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, CatalogError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, role, is_active, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| CatalogError::Database(format!("Failed to fetch user by email: {}", e)))?;

    Ok(user)
}

/// Get a user by id.
pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, CatalogError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, role, is_active, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| CatalogError::Database(format!("Failed to fetch user by id: {}", e)))?;

    Ok(user)
}

/// Create a new user. Duplicate emails surface as `Conflict`.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<User, CatalogError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash, role)
        VALUES ($1, $2, $3)
        RETURNING id, email, password_hash, role, is_active, created_at
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            CatalogError::Conflict("The user with this email already exists.".to_string())
        } else {
            CatalogError::Database(format!("Failed to create user: {}", e))
        }
    })?;

    Ok(user)
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[sqlx::test]
    async fn test_create_and_get_user(pool: PgPool) -> Result<(), CatalogError> {
        let user = create_user(
            &pool,
            "test@example.com",
            "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYqExt7YD3a",
            Role::User,
        )
        .await?;

        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.role, "user");
        assert!(user.is_active);

        let fetched = get_by_email(&pool, "test@example.com").await?;
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().id, user.id);

        let by_id = get_by_id(&pool, user.id).await?;
        assert_eq!(by_id.unwrap().email, "test@example.com");

        Ok(())
    }

    #[sqlx::test]
    async fn test_duplicate_email_is_conflict(pool: PgPool) -> Result<(), CatalogError> {
        create_user(&pool, "dup@example.com", "hash1", Role::User).await?;

        let result = create_user(&pool, "dup@example.com", "hash2", Role::User).await;
        assert!(matches!(result, Err(CatalogError::Conflict(_))));

        Ok(())
    }

    #[sqlx::test]
    async fn test_get_nonexistent_user(pool: PgPool) -> Result<(), CatalogError> {
        assert!(get_by_id(&pool, 9999).await?.is_none());
        assert!(get_by_email(&pool, "nobody@example.com").await?.is_none());
        Ok(())
    }
}
