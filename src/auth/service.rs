use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{Argon2Hasher, AuthError, TokenIssuer};
use crate::clients::UserClient;
use crate::domain::{Identity, Role, User, UserCreate, UserPatch};
use crate::user_actor::UserError;

#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by signup and login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Account registration, credential checks and token handling on top of the
/// user store.
#[derive(Clone)]
pub struct AuthService {
    users: UserClient,
    hasher: Argon2Hasher,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(users: UserClient, hasher: Argon2Hasher, tokens: TokenIssuer) -> Self {
        Self {
            users,
            hasher,
            tokens: Arc::new(tokens),
        }
    }

    /// Hashing is CPU heavy, so it runs off the async workers.
    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    async fn register(&self, request: SignupRequest, role: Role) -> Result<User, AuthError> {
        validate_signup(&request)?;
        let password_hash = self.hash_password(request.password).await?;
        let params = UserCreate {
            name: request.name,
            email: request.email,
            password_hash,
            role,
            phone: request.phone,
            address: request.address,
        };
        self.users.create_user(params).await.map_err(|e| match e {
            UserError::AlreadyExists(_) => AuthError::UserExists,
            UserError::ValidationError(msg) => AuthError::ValidationError(msg),
            other => AuthError::User(other),
        })
    }

    /// Self-service signup always creates a customer.
    #[instrument(skip(self, request), fields(user_email = %request.email))]
    pub async fn signup(&self, request: SignupRequest) -> Result<AuthSession, AuthError> {
        let user = self.register(request, Role::Customer).await?;
        let token = self.tokens.issue(&user)?;
        info!(user_id = user.id, "User signed up");
        Ok(AuthSession { token, user })
    }

    #[instrument(skip(self, request), fields(user_email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession, AuthError> {
        let Some(user) = self.users.find_by_email(&request.email).await? else {
            warn!("Login for unknown email");
            return Err(AuthError::InvalidCredentials);
        };
        if !self.verify_password(request.password, user.password_hash.clone()).await? {
            warn!(user_id = user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }
        let token = self.tokens.issue(&user)?;
        info!(user_id = user.id, "User logged in");
        Ok(AuthSession { token, user })
    }

    /// Creates the bootstrap admin unless an account with that email exists.
    #[instrument(skip(self, password))]
    pub async fn seed_admin(&self, name: &str, email: &str, password: &str) -> Result<Option<User>, AuthError> {
        if let Some(existing) = self.users.find_by_email(email).await? {
            if existing.role == Role::Admin {
                info!(user_id = existing.id, "Admin account already present");
            } else {
                warn!(user_id = existing.id, role = %existing.role, "Admin email belongs to a non-admin account, no admin seeded");
            }
            return Ok(None);
        }
        let request = SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            phone: None,
            address: None,
        };
        let admin = self.register(request, Role::Admin).await?;
        info!(user_id = admin.id, "Admin account seeded");
        Ok(Some(admin))
    }

    pub fn verify_token(&self, token: &str) -> Result<Identity, AuthError> {
        self.tokens.verify(token)
    }

    #[instrument(skip(self, identity), fields(user_id = identity.id))]
    pub async fn current_user(&self, identity: &Identity) -> Result<User, AuthError> {
        Ok(self.users.require_user(identity.id).await?)
    }

    #[instrument(skip(self, identity), fields(user_id = identity.id))]
    pub async fn update_profile(&self, identity: &Identity, patch: UserPatch) -> Result<User, AuthError> {
        self.users.update_profile(identity.id, patch).await.map_err(|e| match e {
            UserError::ValidationError(msg) => AuthError::ValidationError(msg),
            other => AuthError::User(other),
        })
    }
}

fn validate_signup(request: &SignupRequest) -> Result<(), AuthError> {
    if request.name.trim().is_empty() {
        return Err(AuthError::ValidationError("Name is required".to_string()));
    }
    if !request.email.contains('@') {
        return Err(AuthError::ValidationError("A valid email is required".to_string()));
    }
    if request.password.chars().count() < 6 {
        return Err(AuthError::ValidationError(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::{sequence, ResourceActor};
    use chrono::Duration;

    fn service() -> AuthService {
        let (actor, inner) = ResourceActor::<User>::new(8, sequence());
        tokio::spawn(actor.run());
        AuthService::new(
            UserClient::new(inner),
            Argon2Hasher::fast(),
            TokenIssuer::new(b"test-secret", Duration::hours(1)),
        )
    }

    fn signup(name: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            phone: None,
            address: None,
        }
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let auth = service();
        let session = auth.signup(signup("Ann", "Ann@Example.com", "secret1")).await.unwrap();
        assert_eq!(session.user.role, Role::Customer);
        assert_eq!(session.user.email, "ann@example.com");
        assert_eq!(auth.verify_token(&session.token).unwrap().id, session.user.id);

        let login = auth
            .login(LoginRequest { email: "ann@example.com".into(), password: "secret1".into() })
            .await
            .unwrap();
        assert_eq!(login.user.id, session.user.id);

        let json = serde_json::to_value(&login).unwrap();
        assert!(json["user"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_bad_credentials_and_duplicates() {
        let auth = service();
        auth.signup(signup("Ann", "ann@example.com", "secret1")).await.unwrap();

        let wrong = auth
            .login(LoginRequest { email: "ann@example.com".into(), password: "secret2".into() })
            .await;
        assert_eq!(wrong.unwrap_err(), AuthError::InvalidCredentials);

        let unknown = auth
            .login(LoginRequest { email: "bob@example.com".into(), password: "secret1".into() })
            .await;
        assert_eq!(unknown.unwrap_err(), AuthError::InvalidCredentials);

        let again = auth.signup(signup("Ann", "ANN@example.com", "secret1")).await;
        assert_eq!(again.unwrap_err(), AuthError::UserExists);
    }

    #[tokio::test]
    async fn test_signup_validation() {
        let auth = service();
        for request in [
            signup(" ", "a@example.com", "secret1"),
            signup("Ann", "not-an-email", "secret1"),
            signup("Ann", "a@example.com", "12345"),
        ] {
            assert!(matches!(auth.signup(request).await, Err(AuthError::ValidationError(_))));
        }
    }

    #[tokio::test]
    async fn test_seed_admin_runs_once() {
        let auth = service();
        let admin = auth.seed_admin("Root", "root@example.com", "rootpass").await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(auth.seed_admin("Root", "root@example.com", "rootpass").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seed_admin_leaves_customer_account_alone() {
        let auth = service();
        let session = auth.signup(signup("Ann", "ann@example.com", "secret1")).await.unwrap();

        assert!(auth.seed_admin("Root", "ANN@example.com", "rootpass").await.unwrap().is_none());
        let user = auth.current_user(&auth.verify_token(&session.token).unwrap()).await.unwrap();
        assert_eq!(user.role, Role::Customer);
    }
}
