//! Employee Model

use serde::{Deserialize, Serialize};

use super::{Role, default_name};

/// Employee record, keyed by the identity provider uid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Identity uid (document id)
    #[serde(skip)]
    pub uid: String,
    #[serde(default = "default_name")]
    pub email: String,
    #[serde(rename = "rol", default)]
    pub role: Role,
}

impl Employee {
    pub fn new(uid: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            role,
        }
    }
}

/// Create employee payload
#[derive(Debug, Clone)]
pub struct EmployeeCreate {
    pub email: String,
    pub password: String,
    pub role: Role,
}
