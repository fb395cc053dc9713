//! Login against the fixed user table and the persisted session record.
//!
//! The session survives restarts as the sanitized user JSON under
//! `dentalUser`. Role checks are advisory; store operations do not enforce
//! them.

use serde::Serialize;

use crate::config::SESSION_USER_KEY;
use crate::db::{DatabaseError, KeyValueStore};
use crate::models::enums::UserRole;
use crate::models::User;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

struct Credential {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: UserRole,
}

impl Credential {
    fn sanitized(&self) -> User {
        User {
            id: self.id.to_string(),
            name: self.name.to_string(),
            email: self.email.to_string(),
            role: self.role,
        }
    }
}

const USERS: &[Credential] = &[
    Credential {
        id: "1",
        name: "Admin User",
        email: "admin@dental.com",
        password: "admin123",
        role: UserRole::Admin,
    },
    Credential {
        id: "2",
        name: "Patient One",
        email: "patient1@example.com",
        password: "patient123",
        role: UserRole::Patient,
    },
    Credential {
        id: "3",
        name: "Patient Two",
        email: "patient2@example.com",
        password: "patient123",
        role: UserRole::Patient,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoginOutcome {
    Success { user: User },
    Failure { message: String },
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Exact match on email and password. The returned user never carries the
/// password.
pub fn authenticate(email: &str, password: &str) -> LoginOutcome {
    match USERS
        .iter()
        .find(|c| c.email == email && c.password == password)
    {
        Some(credential) => LoginOutcome::Success {
            user: credential.sanitized(),
        },
        None => LoginOutcome::Failure {
            message: INVALID_CREDENTIALS.to_string(),
        },
    }
}

/// Current login, mirrored to the key-value backend.
pub struct Session<S: KeyValueStore> {
    backend: S,
    current: Option<User>,
}

impl<S: KeyValueStore> Session<S> {
    /// Pick up a session left by a previous run. An unreadable record is
    /// treated as logged out.
    pub fn restore(backend: S) -> Result<Self, DatabaseError> {
        let current = match backend.load(SESSION_USER_KEY)? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "Stored session could not be parsed, ignoring");
                    None
                }
            },
            None => None,
        };
        Ok(Self { backend, current })
    }

    /// Authenticate and, on success, persist the sanitized user.
    /// A failed attempt leaves any existing session untouched.
    pub fn login(&mut self, email: &str, password: &str) -> Result<LoginOutcome, DatabaseError> {
        let outcome = authenticate(email, password);
        if let LoginOutcome::Success { user } = &outcome {
            self.backend
                .save(SESSION_USER_KEY, &serde_json::to_string(user)?)?;
            tracing::info!(user_id = %user.id, role = %user.role, "Logged in");
            self.current = Some(user.clone());
        } else {
            tracing::debug!("Login rejected");
        }
        Ok(outcome)
    }

    pub fn logout(&mut self) -> Result<(), DatabaseError> {
        self.backend.remove(SESSION_USER_KEY)?;
        if let Some(user) = self.current.take() {
            tracing::info!(user_id = %user.id, "Logged out");
        }
        Ok(())
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.current.as_ref().is_some_and(|u| u.role == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(UserRole::Admin)
    }

    pub fn is_patient(&self) -> bool {
        self.has_role(UserRole::Patient)
    }
}
