use std::sync::Arc;

use tracing::instrument;

use crate::data::user_repository::UserRepository;
use crate::domain::{error::DomainError, user::User};
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};

#[derive(Clone)]
pub struct AuthService<U: UserRepository + 'static> {
    users: Arc<U>,
    keys: JwtKeys,
}

impl<U> AuthService<U>
where
    U: UserRepository + 'static,
{
    pub fn new(users: Arc<U>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: String,
        name: String,
        password: String,
    ) -> Result<User, DomainError> {
        validate_registration(&email, &name, &password)?;
        let hash =
            hash_password(&password).map_err(|err| DomainError::Internal(err.to_string()))?;
        let user = User::new(email.trim().to_lowercase(), name, hash);
        self.users.create(user).await
    }

    /// A bad email, a bad password, and a disabled account are all the same
    /// `Unauthorized` to the caller.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), DomainError> {
        let user = self
            .users
            .find_by_email(&email.to_lowercase())
            .await?
            .ok_or(DomainError::Unauthorized)?;

        if !user.enabled {
            return Err(DomainError::Unauthorized);
        }

        let valid = verify_password(password, &user.password_hash)
            .map_err(|_| DomainError::Unauthorized)?;
        if !valid {
            return Err(DomainError::Unauthorized);
        }

        let token = self
            .keys
            .generate_token(&user.email)
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        Ok((user, token))
    }

    pub async fn current_user(&self, email: &str) -> Result<User, DomainError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(email.to_owned()))
    }
}

fn validate_registration(email: &str, name: &str, password: &str) -> Result<(), DomainError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::InvalidInput("a valid email is required".into()));
    }
    if name.trim().is_empty() || name.len() > 255 {
        return Err(DomainError::InvalidInput(
            "name is required and must not exceed 255 characters".into(),
        ));
    }
    if password.len() < 8 {
        return Err(DomainError::InvalidInput(
            "password must be at least 8 characters".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::data::user_repository::MockUserRepository;
    use crate::domain::error::DomainError;
    use crate::domain::user::User;
    use crate::infrastructure::security::{JwtKeys, hash_password};

    use super::AuthService;

    fn keys() -> JwtKeys {
        JwtKeys::new("test-secret".into(), 24)
    }

    #[tokio::test]
    async fn register_stores_a_hash_and_never_the_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .withf(|user: &User| {
                user.email == "a@x.com" && user.enabled && user.password_hash != "longenough"
            })
            .returning(|user| Ok(user));

        let service = AuthService::new(Arc::new(users), keys());
        let user = service
            .register("A@X.com".into(), "Ada".into(), "longenough".into())
            .await
            .unwrap();

        assert_eq!(user.email, "a@x.com");
    }

    #[tokio::test]
    async fn register_rejects_a_short_password() {
        let service = AuthService::new(Arc::new(MockUserRepository::new()), keys());
        let err = service
            .register("a@x.com".into(), "Ada".into(), "short".into())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn login_rejects_a_wrong_password() {
        let hash = hash_password("rightpassword").unwrap();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(User::new("a@x.com".into(), "Ada".into(), hash.clone()))));

        let service = AuthService::new(Arc::new(users), keys());
        let err = service.login("a@x.com", "wrongpassword").await.unwrap_err();

        assert!(matches!(err, DomainError::Unauthorized));
    }

    #[tokio::test]
    async fn login_rejects_a_disabled_account() {
        let hash = hash_password("rightpassword").unwrap();
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(move |_| {
            let mut user = User::new("a@x.com".into(), "Ada".into(), hash.clone());
            user.enabled = false;
            Ok(Some(user))
        });

        let service = AuthService::new(Arc::new(users), keys());
        let err = service.login("a@x.com", "rightpassword").await.unwrap_err();

        assert!(matches!(err, DomainError::Unauthorized));
    }

    #[tokio::test]
    async fn login_issues_a_token_for_the_principal_email() {
        let hash = hash_password("rightpassword").unwrap();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(User::new("a@x.com".into(), "Ada".into(), hash.clone()))));

        let service = AuthService::new(Arc::new(users), keys());
        let (user, token) = service.login("a@x.com", "rightpassword").await.unwrap();

        assert_eq!(user.email, "a@x.com");
        let claims = service.keys().verify_token(&token).unwrap();
        assert_eq!(claims.sub, "a@x.com");
    }
}
