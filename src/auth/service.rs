use axum::extract::FromRef;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::dto::{AuthResponse, MessageResponse, UserView};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::PasswordHasher;
use crate::auth::repo_types::User;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Business-level orchestration of the auth core. This is the only place
/// that combines the credential store, the password hasher and the token
/// issuer.
pub struct AuthService {
    db: PgPool,
    hasher: PasswordHasher,
    keys: JwtKeys,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            hasher: PasswordHasher::new(state.config.hash_time_cost),
            keys: JwtKeys::from_ref(state),
        }
    }
}

impl AuthService {
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthResponse> {
        if User::find_by_email(&self.db, email).await?.is_some() {
            warn!(email = %email, "email already registered");
            return Err(AppError::EmailInUse);
        }

        let hash = self.hasher.hash(password)?;
        // The store's unique constraint closes the race between the check
        // above and this insert.
        let user = User::create(&self.db, name, email, &hash).await?;
        let token = self.keys.sign(user.id, &user.email)?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(AuthResponse {
            user: UserView::from(&user),
            token,
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        // Unknown email and wrong password surface the same error so a
        // caller cannot probe which addresses exist.
        let Some(user) = User::find_by_email(&self.db, email).await? else {
            warn!(email = %email, "login unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash) {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            warn!(user_id = %user.id, "login on disabled account");
            return Err(AppError::AccountDisabled);
        }

        User::touch_last_login(&self.db, user.id).await?;
        let token = self.keys.sign(user.id, &user.email)?;

        info!(user_id = %user.id, email = %user.email, "user logged in");
        Ok(AuthResponse {
            user: UserView::from(&user),
            token,
        })
    }

    /// Resolve a token subject into a live account. Missing and inactive
    /// users are both masked as a generic unauthorized failure.
    pub async fn validate_identity(&self, user_id: i64) -> Result<User> {
        match User::find_by_id(&self.db, user_id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(AppError::Unauthorized("User not found or inactive".into())),
        }
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        name: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<UserView> {
        let user = User::update_profile(&self.db, user_id, name, avatar)
            .await
            .map_err(mask_not_found)?;
        info!(user_id = %user.id, "profile updated");
        Ok(UserView::from(&user))
    }

    pub async fn change_password(
        &self,
        user_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let Some(user) = User::find_by_id(&self.db, user_id).await? else {
            return Err(AppError::Unauthorized("User not found".into()));
        };

        if !self.hasher.verify(current_password, &user.password_hash) {
            warn!(user_id = %user.id, "change password with wrong current password");
            return Err(AppError::InvalidCurrentPassword);
        }

        let hash = self.hasher.hash(new_password)?;
        User::set_password_hash(&self.db, user.id, &hash)
            .await
            .map_err(mask_not_found)?;
        info!(user_id = %user.id, "password changed");
        Ok(())
    }

    /// Acknowledged no-op: the token stays valid until its natural expiry
    /// because there is no revocation list.
    pub async fn logout(&self, user_id: i64) -> Result<MessageResponse> {
        info!(user_id = %user_id, "user logged out");
        Ok(MessageResponse {
            message: "Logged out successfully".into(),
        })
    }
}

/// Store-level "record missing" must not leak account existence through
/// authenticated endpoints.
fn mask_not_found(err: AppError) -> AppError {
    match err {
        AppError::NotFound(_) => AppError::Unauthorized("User not found".into()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_masked_as_unauthorized() {
        let masked = mask_not_found(AppError::NotFound("User"));
        assert!(matches!(masked, AppError::Unauthorized(_)));
    }

    #[test]
    fn other_errors_pass_through() {
        let err = mask_not_found(AppError::EmailInUse);
        assert!(matches!(err, AppError::EmailInUse));
    }
}
