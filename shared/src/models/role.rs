//! Role Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Staff role
///
/// Role ids match the rows of the `roles` reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Trainer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Staff, Role::Trainer];

    /// Role assigned by registration when none is given
    pub const DEFAULT: Role = Role::Staff;

    pub fn id(&self) -> i64 {
        match self {
            Role::Admin => 1,
            Role::Staff => 2,
            Role::Trainer => 3,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Trainer => "trainer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Row of the `roles` reference table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RoleInfo {
    pub role_id: i64,
    pub role_name: String,
    pub description: Option<String>,
}
