//! Per-record visibility decision.

use std::sync::Arc;

use serde::Serialize;

use crate::employee::Employee;
use crate::error::AccessError;
use crate::hierarchy::RequiredScope;
use crate::registry::{ExceptionRegistry, GeneralDirectionOutcome};
use crate::user::User;

/// Why a record is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    /// The user holds the universal-access level.
    Admin,
    /// The record sits inside every unit the user is bound to.
    Containment,
    /// The record's number is granted to the user's general direction.
    ExceptionGrant,
}

/// Why a record is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    /// The record's number is excluded from the user's general direction.
    ExceptionExclusion,
    /// The record belongs to another general direction.
    GeneralDirectionMismatch,
    /// The record belongs to another direction.
    DirectionMismatch,
    /// The record belongs to another subdirectorate.
    SubdirectorateMismatch,
}

/// Outcome of [`AccessPredicate::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum AccessDecision {
    /// The user may see the record.
    Allowed(Grant),
    /// The user may not see the record.
    Denied(Denial),
}

impl AccessDecision {
    /// Whether access is granted.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed(_))
    }

    /// Whether access is refused.
    #[must_use]
    pub const fn is_denied(self) -> bool {
        matches!(self, Self::Denied(_))
    }

    /// Reason for a refusal, if any.
    #[must_use]
    pub const fn denial(self) -> Option<Denial> {
        match self {
            Self::Denied(denial) => Some(denial),
            Self::Allowed(_) => None,
        }
    }
}

/// Decides whether a user may see a single employee record.
///
/// Evaluation is synchronous and reads only its arguments and the shared
/// registry.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use access_scope::{
///     AccessDecision, AccessPredicate, Denial, Employee, EmployeeNumber, ExceptionRegistry,
///     Level, OrganizationalScope, User,
/// };
///
/// let predicate = AccessPredicate::new(Arc::new(ExceptionRegistry::builtin()));
/// let user = User::new(7, Level::new(2)?, OrganizationalScope::general_direction(18));
/// let employee = Employee::new(
///     EmployeeNumber::new(20902),
///     "Legacy Employee",
///     OrganizationalScope::general_direction(18),
/// );
/// assert_eq!(
///     predicate.evaluate(&user, &employee)?,
///     AccessDecision::Denied(Denial::ExceptionExclusion)
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct AccessPredicate {
    registry: Arc<ExceptionRegistry>,
}

impl AccessPredicate {
    /// Build a predicate over the shared registry.
    #[must_use]
    pub const fn new(registry: Arc<ExceptionRegistry>) -> Self {
        Self { registry }
    }

    /// Decide whether `user` may see `employee`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::MissingScope`] when a non-admin user lacks the
    /// unit for a tier their level reaches.
    pub fn evaluate(&self, user: &User, employee: &Employee) -> Result<AccessDecision, AccessError> {
        if user.level.is_admin() {
            return Ok(AccessDecision::Allowed(Grant::Admin));
        }

        let required = RequiredScope::for_user(user)?;
        let mut grant = Grant::Containment;

        if let Some(general_direction) = required.general_direction {
            match self
                .registry
                .general_direction_rule(general_direction)
                .outcome(employee)
            {
                GeneralDirectionOutcome::Excluded => {
                    return Ok(AccessDecision::Denied(Denial::ExceptionExclusion));
                }
                GeneralDirectionOutcome::Outside => {
                    return Ok(AccessDecision::Denied(Denial::GeneralDirectionMismatch));
                }
                GeneralDirectionOutcome::Granted => grant = Grant::ExceptionGrant,
                GeneralDirectionOutcome::Contained => {}
            }
        }

        if let Some(direction) = required.direction
            && employee.scope.direction_id != Some(direction)
        {
            return Ok(AccessDecision::Denied(Denial::DirectionMismatch));
        }

        if let Some(subdirectorate) = required.subdirectorate
            && employee.scope.subdirectorate_id != Some(subdirectorate)
        {
            return Ok(AccessDecision::Denied(Denial::SubdirectorateMismatch));
        }

        Ok(AccessDecision::Allowed(grant))
    }

    /// Boolean form of [`AccessPredicate::evaluate`].
    ///
    /// # Errors
    ///
    /// Same as [`AccessPredicate::evaluate`].
    pub fn is_allowed(&self, user: &User, employee: &Employee) -> Result<bool, AccessError> {
        self.evaluate(user, employee).map(AccessDecision::is_allowed)
    }
}
