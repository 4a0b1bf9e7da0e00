//! Role Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, ErrorCode};

/// Access level of a logged-in employee
///
/// Stored as `gerente` / `mesero`; the English names are accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "gerente", alias = "manager")]
    Manager,
    /// Lowest privilege
    #[default]
    #[serde(rename = "mesero", alias = "server")]
    Server,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Manager, Role::Server];

    /// Stored value
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "gerente",
            Role::Server => "mesero",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Server => "server",
        }
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, Role::Manager)
    }

    /// The role given to users nobody provisioned
    pub fn lowest_privilege() -> Self {
        Role::Server
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gerente" | "manager" => Ok(Role::Manager),
            "mesero" | "server" => Ok(Role::Server),
            other => Err(AppError::with_message(
                ErrorCode::InvalidRole,
                format!("Unknown role '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_uses_stored_names() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"gerente\"");
        assert_eq!(serde_json::to_string(&Role::Server).unwrap(), "\"mesero\"");

        let role: Role = serde_json::from_str("\"manager\"").unwrap();
        assert_eq!(role, Role::Manager);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Gerente".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!(" server ".parse::<Role>().unwrap(), Role::Server);
        let err = "chef".parse::<Role>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRole);
    }

    #[test]
    fn test_default_is_lowest_privilege() {
        assert_eq!(Role::default(), Role::lowest_privilege());
        assert!(!Role::default().is_manager());
    }
}
