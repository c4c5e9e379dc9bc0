use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use thinkcate::auth::repo_types::User;
use thinkcate::auth::service::AuthService;
use thinkcate::config::{AppConfig, JwtConfig, UploadConfig};
use thinkcate::error::AppError;
use thinkcate::state::AppState;

fn service(pool: PgPool) -> AuthService {
    // Minimal argon2 time cost keeps these flows fast.
    let config = Arc::new(AppConfig {
        database_url: String::new(),
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
        },
        hash_time_cost: 1,
        upload: UploadConfig {
            dir: std::env::temp_dir()
                .join("thinkcate-auth-tests")
                .to_string_lossy()
                .into_owned(),
            max_file_size: 1024,
            allowed_types: vec!["text/plain".into()],
        },
    });
    AuthService::from_ref(&AppState::from_parts(pool, config))
}

#[sqlx::test]
async fn register_then_login_roundtrip(pool: PgPool) {
    let svc = service(pool);

    let reg = svc
        .register("Ada", "ada@x.com", "first-secret")
        .await
        .expect("register");
    assert!(!reg.token.is_empty());
    assert_eq!(reg.user.email, "ada@x.com");

    let login = svc.login("ada@x.com", "first-secret").await.expect("login");
    assert_eq!(login.user.id, reg.user.id);
    assert!(!login.token.is_empty());
}

#[sqlx::test]
async fn duplicate_email_keeps_the_first_password(pool: PgPool) {
    let svc = service(pool);

    svc.register("Ada", "ada@x.com", "first-secret")
        .await
        .expect("first register");
    let err = svc
        .register("Eve", "ada@x.com", "second-secret")
        .await
        .expect_err("duplicate email");
    assert!(matches!(err, AppError::EmailInUse));

    // The stored hash is untouched by the rejected attempt.
    assert!(svc.login("ada@x.com", "first-secret").await.is_ok());
    let err = svc
        .login("ada@x.com", "second-secret")
        .await
        .expect_err("second password never stored");
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[sqlx::test]
async fn change_password_requires_the_current_one(pool: PgPool) {
    let svc = service(pool);
    let reg = svc
        .register("Ada", "ada@x.com", "old-secret")
        .await
        .expect("register");

    let err = svc
        .change_password(reg.user.id, "wrong-current", "new-secret")
        .await
        .expect_err("wrong current password");
    assert!(matches!(err, AppError::InvalidCurrentPassword));
    // Rejected attempt leaves the hash unchanged.
    assert!(svc.login("ada@x.com", "old-secret").await.is_ok());

    svc.change_password(reg.user.id, "old-secret", "new-secret")
        .await
        .expect("change password");
    let err = svc
        .login("ada@x.com", "old-secret")
        .await
        .expect_err("old password no longer verifies");
    assert!(matches!(err, AppError::InvalidCredentials));
    assert!(svc.login("ada@x.com", "new-secret").await.is_ok());
}

#[sqlx::test]
async fn login_stamps_last_login(pool: PgPool) {
    let svc = service(pool.clone());
    let reg = svc
        .register("Ada", "ada@x.com", "first-secret")
        .await
        .expect("register");

    let before = User::find_by_id(&pool, reg.user.id)
        .await
        .expect("query")
        .expect("user exists");
    assert!(before.last_login_at.is_none());

    svc.login("ada@x.com", "first-secret").await.expect("login");

    let after = User::find_by_id(&pool, reg.user.id)
        .await
        .expect("query")
        .expect("user exists");
    assert!(after.last_login_at.is_some());
}

#[sqlx::test]
async fn deactivated_account_is_rejected(pool: PgPool) {
    let svc = service(pool.clone());
    let reg = svc
        .register("Ada", "ada@x.com", "first-secret")
        .await
        .expect("register");

    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(reg.user.id)
        .execute(&pool)
        .await
        .expect("deactivate");

    let err = svc
        .validate_identity(reg.user.id)
        .await
        .expect_err("inactive user fails validation");
    assert!(matches!(err, AppError::Unauthorized(_)));

    // Correct password, disabled account.
    let err = svc
        .login("ada@x.com", "first-secret")
        .await
        .expect_err("disabled account cannot log in");
    assert!(matches!(err, AppError::AccountDisabled));
}
