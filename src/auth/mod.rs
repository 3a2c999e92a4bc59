pub mod gate;
pub mod jwt;
pub mod password;

use std::fmt;
use std::str::FromStr;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "client" => Ok(Role::Client),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role {other:?}")),
        }
    }
}

/// What a caller must prove before a route runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Public,
    Authenticated,
    Client,
    Admin,
}

impl Capability {
    pub fn admits(self, role: Role) -> bool {
        match self {
            Capability::Public | Capability::Authenticated => true,
            Capability::Client => role == Role::Client,
            Capability::Admin => role == Role::Admin,
        }
    }
}

/// The verified caller, attached to the request by [`gate::authorize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
    pub email: String,
    pub name: String,
    pub company: String,
    pub contact: String,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(AppError::unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_matrix() {
        assert!(Capability::Authenticated.admits(Role::Client));
        assert!(Capability::Authenticated.admits(Role::Admin));
        assert!(Capability::Client.admits(Role::Client));
        assert!(!Capability::Client.admits(Role::Admin));
        assert!(Capability::Admin.admits(Role::Admin));
        assert!(!Capability::Admin.admits(Role::Client));
    }

    #[test]
    fn role_text_roundtrip() {
        for role in [Role::Client, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("owner".parse::<Role>().is_err());
    }
}
