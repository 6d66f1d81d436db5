//! Registration, login and profile management.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Actor, User};
use crate::error::{DomainError, RepoError};
use crate::policy::{Denial, Outcome};
use crate::ports::{BaseRepository, PasswordService, UserRepository};
use crate::validation::{ProfileInput, SignupInput, ValidationErrors};

const USERNAME_TAKEN: &str = "A user with that username already exists.";

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Create a regular (non-staff) account. Only the password hash is stored.
    pub async fn register(&self, input: SignupInput) -> Result<User, DomainError> {
        input.validate()?;

        if self.users.find_by_username(&input.username).await?.is_some() {
            return Err(username_taken());
        }

        let password_hash = self
            .passwords
            .hash(&input.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut user = User::new(input.username, password_hash);
        user.email = input.email;
        user.first_name = input.first_name;
        user.last_name = input.last_name;

        let user = self.users.insert(user).await.map_err(unique_username)?;
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    /// Check credentials. `None` covers unknown users, wrong passwords and
    /// deactivated accounts alike.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            self.passwords.verify_decoy(password);
            tracing::debug!("Login failed: unknown username");
            return Ok(None);
        };

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid || !user.is_active {
            tracing::debug!(user_id = %user.id, "Login failed: bad password or inactive");
            return Ok(None);
        }

        tracing::info!(user_id = %user.id, "User authenticated");
        Ok(Some(user))
    }

    /// Who a session belongs to at this moment. The account is re-read, so a
    /// deleted or deactivated user is anonymous and the staff flag is the
    /// stored one.
    pub async fn resolve_actor(&self, user_id: Uuid) -> Result<Actor, DomainError> {
        match self.users.find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(Actor::from(&user)),
            Some(_) => {
                tracing::debug!(user_id = %user_id, "Session for inactive user ignored");
                Ok(Actor::Anonymous)
            }
            None => {
                tracing::debug!(user_id = %user_id, "Session for deleted user ignored");
                Ok(Actor::Anonymous)
            }
        }
    }

    /// The account behind `actor`.
    pub async fn profile(&self, actor: &Actor) -> Result<Outcome<User>, DomainError> {
        let Some(user_id) = actor.id() else {
            return Ok(Outcome::Denied(Denial::LoginRequired));
        };

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        Ok(Outcome::Applied(user))
    }

    /// Let the caller edit their own username, email and names.
    pub async fn update_profile(
        &self,
        actor: &Actor,
        input: ProfileInput,
    ) -> Result<Outcome<User>, DomainError> {
        let mut user = match self.profile(actor).await? {
            Outcome::Applied(user) => user,
            Outcome::Denied(denial) => return Ok(Outcome::Denied(denial)),
        };

        input.validate()?;

        if input.username != user.username {
            if let Some(other) = self.users.find_by_username(&input.username).await? {
                if other.id != user.id {
                    return Err(username_taken());
                }
            }
        }

        user.username = input.username;
        user.email = input.email;
        user.first_name = input.first_name;
        user.last_name = input.last_name;
        user.updated_at = Utc::now();

        let user = self.users.update(user).await.map_err(unique_username)?;
        tracing::info!(user_id = %user.id, "Profile updated");

        Ok(Outcome::Applied(user))
    }
}

fn username_taken() -> DomainError {
    let mut errors = ValidationErrors::new();
    errors.add("username", USERNAME_TAKEN);
    DomainError::Validation(errors)
}

/// A unique-constraint failure on write means someone else took the name
/// between our check and the insert.
fn unique_username(err: RepoError) -> DomainError {
    match err {
        RepoError::Constraint(_) => username_taken(),
        other => other.into(),
    }
}
