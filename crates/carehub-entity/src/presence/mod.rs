//! Presence domain entities.

use serde::{Deserialize, Serialize};

/// Presence status broadcast to every connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    /// User has a live connection and is active.
    Online,
    /// User is connected but idle.
    Away,
    /// User has no live connection.
    Offline,
}

impl PresenceStatus {
    /// Check if the user is considered online.
    pub fn is_online(&self) -> bool {
        !matches!(self, Self::Offline)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Away => "away",
            Self::Offline => "offline",
        }
    }
}

impl std::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresenceStatus {
    type Err = carehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "away" => Ok(Self::Away),
            "offline" => Ok(Self::Offline),
            _ => Err(carehub_core::AppError::validation(format!(
                "Invalid presence status: '{s}'"
            ))),
        }
    }
}
