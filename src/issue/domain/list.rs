//! List identities owned by every user.

use super::ParseListKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three lists kept for each user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    /// The user's actionable queue; the only list that can be popped.
    #[default]
    My,
    /// Issues received from other users that are still pending.
    In,
    /// Issues this user sent that are still pending at the receiver.
    Out,
}

impl ListKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::My => "my",
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl TryFrom<&str> for ListKind {
    type Error = ParseListKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "my" => Ok(Self::My),
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            _ => Err(ParseListKindError(value.to_owned())),
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
