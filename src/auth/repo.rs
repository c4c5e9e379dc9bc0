use sqlx::PgPool;

use crate::auth::repo_types::User;
use crate::error::{AppError, Result};

const USER_COLUMNS: &str = r#"id, email, name, password_hash, avatar, is_active,
    is_email_verified, email_verification_token, password_reset_token,
    password_reset_expires, last_login_at, created_at, updated_at"#;

/// Postgres unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by id.
    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with an already hashed password.
    ///
    /// The unique constraint on `users.email` is the source of truth for
    /// duplicates: a concurrent insert between an existence check and this
    /// call still surfaces as `EmailInUse`.
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
        .map_err(|e| match e.as_database_error().and_then(|d| d.code()) {
            Some(code) if code == UNIQUE_VIOLATION => AppError::EmailInUse,
            _ => e.into(),
        })?;
        Ok(user)
    }

    /// Partial profile update; untouched fields keep their value.
    pub async fn update_profile(
        db: &PgPool,
        id: i64,
        name: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                avatar = COALESCE($3, avatar),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(avatar)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound("User"))?;
        Ok(user)
    }

    pub async fn set_password_hash(db: &PgPool, id: i64, password_hash: &str) -> Result<()> {
        let res = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(db)
        .await?;
        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("User"));
        }
        Ok(())
    }

    pub async fn touch_last_login(db: &PgPool, id: i64) -> Result<()> {
        sqlx::query("UPDATE users SET last_login_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
