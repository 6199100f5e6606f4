//! Tiers of the organisational hierarchy and the scope a user is bound to.
//!
//! [`RequiredScope`] is the single place where a user's level is turned into
//! the set of units that bind them. Both the access predicate and the filter
//! builder start from it, so the tier thresholds cannot drift apart.

use std::fmt;

use serde::Serialize;

use crate::error::AccessError;
use crate::scope::{DirectionId, GeneralDirectionId, SubdirectorateId};
use crate::user::User;

/// One level of the hierarchy guarded by a level threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Guarded from level 2.
    GeneralDirection,
    /// Guarded from level 3.
    Direction,
    /// Guarded from level 4.
    Subdirectorate,
}

impl Tier {
    /// Tiers from the widest to the narrowest.
    pub const ALL: [Self; 3] = [Self::GeneralDirection, Self::Direction, Self::Subdirectorate];

    /// Lowest user level bound by this tier.
    #[must_use]
    pub const fn threshold(self) -> u8 {
        match self {
            Self::GeneralDirection => 2,
            Self::Direction => 3,
            Self::Subdirectorate => 4,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GeneralDirection => f.write_str("general direction"),
            Self::Direction => f.write_str("direction"),
            Self::Subdirectorate => f.write_str("subdirectorate"),
        }
    }
}

/// Units a user is bound to, one per tier their level reaches.
///
/// A `None` tier is not mandatory for the user; callers may still narrow it
/// with an explicit filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequiredScope {
    /// Mandatory general direction.
    pub general_direction: Option<GeneralDirectionId>,
    /// Mandatory direction.
    pub direction: Option<DirectionId>,
    /// Mandatory subdirectorate.
    pub subdirectorate: Option<SubdirectorateId>,
}

impl RequiredScope {
    /// Scope binding nobody: what an admin gets.
    pub const UNRESTRICTED: Self = Self {
        general_direction: None,
        direction: None,
        subdirectorate: None,
    };

    /// Resolve the mandatory units for `user`.
    ///
    /// Admins resolve to [`RequiredScope::UNRESTRICTED`] without any scope
    /// field being read.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::MissingScope`] when the user's level reaches a
    /// tier whose unit is absent from their record.
    pub fn for_user(user: &User) -> Result<Self, AccessError> {
        if user.level.is_admin() {
            return Ok(Self::UNRESTRICTED);
        }

        let scope = &user.scope;
        Ok(Self {
            general_direction: bind(user, Tier::GeneralDirection, scope.general_direction_id)?,
            direction: bind(user, Tier::Direction, scope.direction_id)?,
            subdirectorate: bind(user, Tier::Subdirectorate, scope.subdirectorate_id)?,
        })
    }

    /// Whether no tier is mandatory.
    #[must_use]
    pub const fn is_unrestricted(&self) -> bool {
        self.general_direction.is_none() && self.direction.is_none() && self.subdirectorate.is_none()
    }
}

fn bind<T>(user: &User, tier: Tier, unit: Option<T>) -> Result<Option<T>, AccessError> {
    if !user.level.reaches(tier) {
        return Ok(None);
    }
    unit.map(Some).ok_or(AccessError::MissingScope {
        user_id: user.id,
        level: user.level,
        tier,
    })
}
