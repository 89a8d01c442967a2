//! User domain types.

use serde::{Deserialize, Serialize};

use larkspur_core::{Email, UserId, UserRole};

/// A signed-in storefront user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Permission level.
    pub role: UserRole,
}
