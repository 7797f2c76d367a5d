use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Database model for actor role enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "actor_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Admin,
    User,
    CtkCustodian,
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorRole::Admin => write!(f, "admin"),
            ActorRole::User => write!(f, "user"),
            ActorRole::CtkCustodian => write!(f, "ctk_custodian"),
        }
    }
}

impl FromStr for ActorRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(ActorRole::Admin),
            "user" => Ok(ActorRole::User),
            "ctk_custodian" => Ok(ActorRole::CtkCustodian),
            _ => Err(()),
        }
    }
}

/// Database model for Actor
/// A person allowed to take tools out of the crib. Read-only to the custody core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorModel {
    pub id: Uuid,

    /// Unique login name, also recorded as the holder of checked-out tools
    pub username: HeaplessString<128>,

    /// Unique badge scanned at the crib
    pub badge_id: HeaplessString<16>,

    pub first_name: HeaplessString<64>,
    pub last_name: HeaplessString<64>,
    pub department: HeaplessString<64>,
    pub role: ActorRole,
}

impl ActorModel {
    /// Badge comparison is exact; scanners emit the badge verbatim.
    pub fn badge_matches(&self, badge_id: &str) -> bool {
        self.badge_id.as_str() == badge_id
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
