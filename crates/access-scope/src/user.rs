//! Requesting user as seen by the visibility rules.

use serde::{Deserialize, Serialize};

use crate::scope::{Level, OrganizationalScope};

/// A user whose requests are subject to the visibility rules.
///
/// A level of 1 is the universal-access sentinel; no scope field is read for
/// such users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identity of the user record.
    pub id: u64,
    /// Privilege level.
    pub level: Level,
    /// Organisational assignment.
    #[serde(flatten)]
    pub scope: OrganizationalScope,
}

impl User {
    /// Build a user record.
    #[must_use]
    pub const fn new(id: u64, level: Level, scope: OrganizationalScope) -> Self {
        Self { id, level, scope }
    }

    /// Build an unrestricted user.
    #[must_use]
    pub const fn admin(id: u64) -> Self {
        Self::new(id, Level::ADMIN, OrganizationalScope {
            general_direction_id: None,
            direction_id: None,
            subdirectorate_id: None,
            department_id: None,
        })
    }

    /// Same user moved to another level.
    #[must_use]
    pub const fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}
