use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - an account known to the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Staff users may author posts.
    pub is_staff: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, active, non-staff user with generated ID and timestamps.
    pub fn new(username: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            password_hash,
            is_staff: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_staff(mut self, is_staff: bool) -> Self {
        self.is_staff = is_staff;
        self
    }
}

/// The authenticated half of an [`Actor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    pub is_staff: bool,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_staff: user.is_staff,
        }
    }
}

/// Whoever initiated the current request, possibly nobody.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Actor {
    #[default]
    Anonymous,
    User(Principal),
}

impl Actor {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::User(_))
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Actor::User(p) if p.is_staff)
    }

    pub fn id(&self) -> Option<Uuid> {
        self.principal().map(|p| p.id)
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Actor::User(principal) => Some(principal),
            Actor::Anonymous => None,
        }
    }
}

impl From<Principal> for Actor {
    fn from(principal: Principal) -> Self {
        Actor::User(principal)
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Actor::User(Principal::from(user))
    }
}
