use std::cmp::Reverse;

use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{normalize_email, User, UserCreate, UserPatch};
use crate::user_actor::UserError;

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, UserError, user);

impl UserClient {
    #[instrument(skip(self, params), fields(user_email = %params.email, role = %params.role))]
    pub async fn create_user(&self, params: UserCreate) -> Result<User, UserError> {
        debug!("Sending request");
        let id = self.inner.create(params).await?;
        info!(user_id = id, "User created");
        self.require_user(id).await
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        debug!("Sending request");
        let email = normalize_email(email);
        let mut found = self.inner.list(move |user| user.email == email).await?;
        Ok(found.pop())
    }

    #[instrument(skip(self))]
    pub async fn update_profile(&self, id: u64, patch: UserPatch) -> Result<User, UserError> {
        debug!("Sending request");
        let user = self.inner.update(id, patch).await?;
        info!(user_id = id, "Profile updated");
        Ok(user)
    }

    /// Every user, newest first.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, UserError> {
        debug!("Sending request");
        let mut users = self.inner.list(|_| true).await?;
        users.sort_by_key(|user| Reverse(user.id));
        Ok(users)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: u64) -> Result<(), UserError> {
        debug!("Sending request");
        self.inner.delete(id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }
}
