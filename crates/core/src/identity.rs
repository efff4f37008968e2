//! User roles and account registration rules.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

pub const ROLE_CLIENT: &str = "CLIENT";
pub const ROLE_INSTRUCTOR: &str = "INSTRUCTOR";
pub const ROLE_ADMIN: &str = "ADMIN";

/// All valid role names, as stored in `users.role`.
pub const VALID_ROLES: &[&str] = &[ROLE_CLIENT, ROLE_INSTRUCTOR, ROLE_ADMIN];

/// Role selected at registration and carried by every session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Client,
    Instructor,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => ROLE_CLIENT,
            Role::Instructor => ROLE_INSTRUCTOR,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Parse a role name, accepting any letter case.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.to_ascii_uppercase().as_str() {
            ROLE_CLIENT => Ok(Role::Client),
            ROLE_INSTRUCTOR => Ok(Role::Instructor),
            ROLE_ADMIN => Ok(Role::Admin),
            _ => Err(CoreError::Validation(format!(
                "Invalid role '{value}'. Must be one of: {VALID_ROLES:?}"
            ))),
        }
    }
}

/// Fields a new account must provide.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAccount {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 120, message = "full_name must be 1-120 characters"))]
    pub full_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    /// Defaults to `CLIENT` when omitted.
    pub role: Option<String>,
}

impl NewAccount {
    /// Validate every field and resolve the role.
    pub fn validate_account(&self) -> Result<Role, CoreError> {
        self.validate()
            .map_err(|errors| CoreError::Validation(errors.to_string()))?;
        if self.username.chars().any(char::is_whitespace) {
            return Err(CoreError::Validation(
                "username must not contain whitespace".into(),
            ));
        }
        match self.role.as_deref() {
            None => Ok(Role::Client),
            Some(role) => Role::parse(role),
        }
    }
}
