use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role. Stored and serialized as its lower-case code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Worker,
    Police,
    Admin,
}

impl UserRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Worker => "worker",
            Police => "police",
            Admin => "admin",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use UserRole::*;
        match code {
            "worker" => Some(Worker),
            "police" => Some(Police),
            "admin" => Some(Admin),
            _ => None,
        }
    }

    /// Roles an anonymous caller may sign up as. Admins are provisioned out of band.
    #[inline]
    pub const fn is_self_service(&self) -> bool {
        matches!(self, UserRole::Worker | UserRole::Police)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
