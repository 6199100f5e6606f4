//! Employee records and their business key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EmployeeNumberError;
use crate::scope::OrganizationalScope;

/// Leading digit prepended to an employee number to form its plantilla key.
pub const PLANTILLA_PREFIX: char = '1';

/// Stable numeric business key of an employee, distinct from any surrogate id.
///
/// Exception-group membership is keyed on this number.
///
/// # Examples
/// ```
/// use access_scope::EmployeeNumber;
///
/// let number: EmployeeNumber = " 20902 ".parse().expect("valid number");
/// assert_eq!(number.get(), 20902);
/// assert_eq!(number.plantilla_key(), "120902");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeNumber(u32);

impl EmployeeNumber {
    /// Wrap a raw employee number.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Return the raw number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Storage key: the number with [`PLANTILLA_PREFIX`] in front.
    #[must_use]
    pub fn plantilla_key(self) -> String {
        format!("{PLANTILLA_PREFIX}{}", self.0)
    }
}

impl From<u32> for EmployeeNumber {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl FromStr for EmployeeNumber {
    type Err = EmployeeNumberError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmployeeNumberError::Empty);
        }
        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(EmployeeNumberError::NotNumeric {
                value: trimmed.to_owned(),
            });
        }
        trimmed
            .parse::<u32>()
            .map(Self)
            .map_err(|_| EmployeeNumberError::OutOfRange {
                value: trimmed.to_owned(),
            })
    }
}

impl fmt::Display for EmployeeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An employee record subject to the visibility rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Business key.
    pub employee_number: EmployeeNumber,
    /// Full name, used for ordering and free-text search.
    pub name: String,
    /// Whether the employee is currently active.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Whether the employee is expected to clock in.
    #[serde(default)]
    pub can_check: bool,
    /// Organisational assignment.
    #[serde(flatten)]
    pub scope: OrganizationalScope,
}

const fn default_active() -> bool {
    true
}

impl Employee {
    /// Build an active employee record.
    #[must_use]
    pub fn new(
        employee_number: EmployeeNumber,
        name: impl Into<String>,
        scope: OrganizationalScope,
    ) -> Self {
        Self {
            employee_number,
            name: name.into(),
            active: true,
            can_check: false,
            scope,
        }
    }

    /// Same record with another activity flag.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}
