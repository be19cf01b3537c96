use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform role carried by every user account.
///
/// Serialized in upper case, matching the backend's enum names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Submits solutions to tasks within a selected hackathon.
    Participant,
    /// Manages users, tasks and hackathons.
    Admin,
    /// Reviews submissions and may override scores.
    Judge,
}

impl Role {
    /// All roles, in the order the backend declares them.
    pub const ALL: &'static [Role] = &[Self::Participant, Self::Admin, Self::Judge];

    /// Returns the wire representation (upper case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Participant => "PARTICIPANT",
            Self::Admin => "ADMIN",
            Self::Judge => "JUDGE",
        }
    }

    /// Only participants are scoped to a selected hackathon.
    pub fn is_participant(&self) -> bool {
        matches!(self, Self::Participant)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid role string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Invalid role '{invalid}'. Valid values: {valid}",
    valid = Role::ALL.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ")
)]
pub struct ParseRoleError {
    invalid: String,
}

impl FromStr for Role {
    type Err = ParseRoleError;

    /// Case-insensitive, so `judge` and `JUDGE` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PARTICIPANT" => Ok(Self::Participant),
            "ADMIN" => Ok(Self::Admin),
            "JUDGE" => Ok(Self::Judge),
            _ => Err(ParseRoleError {
                invalid: s.to_string(),
            }),
        }
    }
}
