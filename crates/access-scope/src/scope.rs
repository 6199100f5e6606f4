//! Organisational unit identifiers, privilege levels and scope assignments.
//!
//! Unit identifiers are distinct newtypes so a direction id can never be
//! compared against a general-direction id by accident. Unit `1` is the
//! "unassigned" placeholder the personnel records use for freshly imported
//! employees.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvalidLevel;
use crate::hierarchy::Tier;

/// Raw id of the placeholder unit given to employees without an assignment.
pub const UNASSIGNED_UNIT: u32 = 1;

macro_rules! define_unit_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Placeholder unit used for unassigned employees.
            pub const UNASSIGNED: Self = Self(UNASSIGNED_UNIT);

            /// Wrap a raw unit identifier.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Return the raw identifier.
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0
            }

            /// Whether this is the unassigned placeholder unit.
            #[must_use]
            pub const fn is_unassigned(self) -> bool {
                self.0 == UNASSIGNED_UNIT
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_unit_id! {
    /// Top-level organisational unit, guarded by the level-2 tier.
    GeneralDirectionId
}

define_unit_id! {
    /// Sub-unit of a general direction, guarded by the level-3 tier.
    DirectionId
}

define_unit_id! {
    /// Sub-unit of a direction, guarded by the level-4 tier.
    SubdirectorateId
}

define_unit_id! {
    /// Sub-unit of a subdirectorate. Never consulted by the visibility rules.
    DepartmentId
}

/// Numeric privilege rank of a user.
///
/// `1` grants unrestricted access; every higher value narrows the scope by
/// one more tier until the subdirectorate tier is reached.
///
/// # Examples
/// ```
/// use access_scope::{Level, Tier};
///
/// let level = Level::new(3).expect("valid level");
/// assert!(level.reaches(Tier::Direction));
/// assert!(!level.reaches(Tier::Subdirectorate));
/// assert!(Level::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    /// The universal-access level.
    pub const ADMIN: Self = Self(1);

    /// Validate and wrap a raw level.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidLevel`] when `value` is zero.
    pub const fn new(value: u8) -> Result<Self, InvalidLevel> {
        if value == 0 {
            return Err(InvalidLevel { value });
        }
        Ok(Self(value))
    }

    /// Return the raw level.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Whether this is the universal-access level.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        self.0 == Self::ADMIN.0
    }

    /// Whether a user at this level is bound by `tier`.
    #[must_use]
    pub const fn reaches(self, tier: Tier) -> bool {
        self.0 >= tier.threshold()
    }

    /// The next, more restricted level, if it fits.
    #[must_use]
    pub const fn narrower(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = InvalidLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(value: Level) -> Self {
        value.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Organisational assignment shared by users and employees.
///
/// Every field is optional: each one is only meaningful once the owning
/// record reaches the tier that governs it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationalScope {
    /// General direction assignment.
    pub general_direction_id: Option<GeneralDirectionId>,
    /// Direction assignment.
    pub direction_id: Option<DirectionId>,
    /// Subdirectorate assignment.
    pub subdirectorate_id: Option<SubdirectorateId>,
    /// Department assignment.
    pub department_id: Option<DepartmentId>,
}

impl OrganizationalScope {
    /// Scope assigned down to the subdirectorate tier.
    #[must_use]
    pub const fn new(
        general_direction_id: u32,
        direction_id: u32,
        subdirectorate_id: u32,
    ) -> Self {
        Self {
            general_direction_id: Some(GeneralDirectionId::new(general_direction_id)),
            direction_id: Some(DirectionId::new(direction_id)),
            subdirectorate_id: Some(SubdirectorateId::new(subdirectorate_id)),
            department_id: None,
        }
    }

    /// Scope assigned to a general direction only.
    #[must_use]
    pub const fn general_direction(general_direction_id: u32) -> Self {
        Self {
            general_direction_id: Some(GeneralDirectionId::new(general_direction_id)),
            direction_id: None,
            subdirectorate_id: None,
            department_id: None,
        }
    }

    /// Replace the general direction.
    #[must_use]
    pub const fn with_general_direction(mut self, id: Option<GeneralDirectionId>) -> Self {
        self.general_direction_id = id;
        self
    }

    /// Replace the direction.
    #[must_use]
    pub const fn with_direction(mut self, id: Option<DirectionId>) -> Self {
        self.direction_id = id;
        self
    }

    /// Replace the subdirectorate.
    #[must_use]
    pub const fn with_subdirectorate(mut self, id: Option<SubdirectorateId>) -> Self {
        self.subdirectorate_id = id;
        self
    }

    /// Replace the department.
    #[must_use]
    pub const fn with_department(mut self, id: Option<DepartmentId>) -> Self {
        self.department_id = id;
        self
    }

    /// Whether the general direction is missing or the placeholder unit.
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        self.general_direction_id
            .is_none_or(GeneralDirectionId::is_unassigned)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(1, false, false, false)]
    #[case(2, true, false, false)]
    #[case(3, true, true, false)]
    #[case(4, true, true, true)]
    #[case(9, true, true, true)]
    fn level_reaches_tiers_by_threshold(
        #[case] raw: u8,
        #[case] general_direction: bool,
        #[case] direction: bool,
        #[case] subdirectorate: bool,
    ) {
        let level = Level::new(raw).expect("valid level");
        assert_eq!(level.reaches(Tier::GeneralDirection), general_direction);
        assert_eq!(level.reaches(Tier::Direction), direction);
        assert_eq!(level.reaches(Tier::Subdirectorate), subdirectorate);
    }

    #[rstest]
    fn level_rejects_zero() {
        assert_eq!(Level::new(0), Err(InvalidLevel { value: 0 }));
    }

    #[rstest]
    fn level_deserialisation_validates() {
        let parsed: Result<Level, _> = serde_json::from_value(json!(0));
        assert!(parsed.is_err());
        let parsed: Level = serde_json::from_value(json!(4)).expect("level parses");
        assert_eq!(parsed.get(), 4);
    }

    #[rstest]
    fn narrower_saturates_at_the_top() {
        let top = Level::new(u8::MAX).expect("valid level");
        assert!(top.narrower().is_none());
        assert_eq!(Level::ADMIN.narrower().map(Level::get), Some(2));
    }

    #[rstest]
    #[case(OrganizationalScope::default(), true)]
    #[case(OrganizationalScope::general_direction(1), true)]
    #[case(OrganizationalScope::general_direction(18), false)]
    fn unassigned_scope_detection(#[case] scope: OrganizationalScope, #[case] expected: bool) {
        assert_eq!(scope.is_unassigned(), expected);
    }

    #[rstest]
    fn scope_deserialises_from_camel_case() {
        let scope: OrganizationalScope = serde_json::from_value(json!({
            "generalDirectionId": 5,
            "directionId": 2
        }))
        .expect("scope parses");
        assert_eq!(scope.general_direction_id, Some(GeneralDirectionId::new(5)));
        assert_eq!(scope.direction_id, Some(DirectionId::new(2)));
        assert!(scope.subdirectorate_id.is_none());
    }
}
