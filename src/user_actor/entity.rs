use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{normalize_email, Role, User, UserCreate, UserPatch};

impl Entity for User {
    type Id = u64;
    type CreateParams = UserCreate;
    type Patch = UserPatch;
    type Action = ();
    type ActionResult = ();

    const KIND: &'static str = "user";

    fn id(&self) -> &u64 {
        &self.id
    }

    /// Creates a new User from creation parameters.
    ///
    /// # Notes
    /// The email is normalized so that uniqueness ignores case.
    fn from_create_params(id: u64, params: UserCreate) -> Result<Self, String> {
        let name = params.name.trim().to_string();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }
        let email = normalize_email(&params.email);
        if !email.contains('@') {
            return Err(format!("Invalid email: {}", params.email));
        }
        let now = Utc::now();
        Ok(Self {
            id,
            name,
            email,
            password_hash: params.password_hash,
            role: params.role,
            phone: params.phone,
            address: params.address,
            created_at: now,
            updated_at: now,
        })
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.clone())
    }

    /// Updates the user's profile information.
    fn on_update(&mut self, patch: UserPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err("Name is required".to_string());
            }
            self.name = name;
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        if let Some(address) = patch.address {
            self.address = Some(address);
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    fn on_delete(&self) -> Result<(), String> {
        if self.role == Role::Admin {
            return Err("Cannot delete admin user".to_string());
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
