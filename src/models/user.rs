use serde::{Deserialize, Serialize};

use super::enums::UserRole;

/// Authenticated user as kept in the session record. Never carries a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}
