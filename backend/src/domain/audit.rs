//! Cross-check of the access predicate against the listing constraints.
//!
//! For one user and a roster of employees, every record is evaluated both
//! ways. Any record where the two disagree is reported.

use access_scope::{
    AccessError, AccessPredicate, Employee, EmployeeNumber, FilterBuilder, User,
};
use serde::Serialize;

/// One record on which the predicate and the constraints disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Disagreement {
    /// Record concerned.
    pub employee_number: EmployeeNumber,
    /// What the predicate decided.
    pub predicate_allows: bool,
    /// Whether the unfiltered constraint set selected the record.
    pub constraints_match: bool,
}

/// Outcome of auditing one user against a roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityAudit {
    /// Records the predicate allows, in roster order.
    pub visible: Vec<EmployeeNumber>,
    /// Records where the two views disagree.
    pub disagreements: Vec<Disagreement>,
}

impl VisibilityAudit {
    /// Audit `user` against `roster`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::MissingScope`] when the user's scope is
    /// incomplete for their level.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use access_scope::{
    ///     AccessPredicate, Employee, EmployeeNumber, ExceptionRegistry, FilterBuilder,
    ///     OrganizationalScope, User,
    /// };
    /// use personnel::domain::VisibilityAudit;
    ///
    /// let registry = Arc::new(ExceptionRegistry::builtin());
    /// let roster = [Employee::new(
    ///     EmployeeNumber::new(20902),
    ///     "Legacy Employee",
    ///     OrganizationalScope::general_direction(18),
    /// )];
    /// let audit = VisibilityAudit::run(
    ///     &AccessPredicate::new(Arc::clone(&registry)),
    ///     &FilterBuilder::new(registry),
    ///     &User::admin(1),
    ///     &roster,
    /// )?;
    /// assert!(audit.is_consistent());
    /// assert_eq!(audit.visible.len(), 1);
    /// # Ok::<(), access_scope::AccessError>(())
    /// ```
    pub fn run(
        predicate: &AccessPredicate,
        filters: &FilterBuilder,
        user: &User,
        roster: &[Employee],
    ) -> Result<Self, AccessError> {
        let constraints = filters.scope_constraints(user)?;
        let mut audit = Self::default();

        for employee in roster {
            let predicate_allows = predicate.is_allowed(user, employee)?;
            let constraints_match = constraints.matches(employee);
            if predicate_allows {
                audit.visible.push(employee.employee_number);
            }
            if predicate_allows != constraints_match {
                audit.disagreements.push(Disagreement {
                    employee_number: employee.employee_number,
                    predicate_allows,
                    constraints_match,
                });
            }
        }

        Ok(audit)
    }

    /// Whether both views agree on every record.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.disagreements.is_empty()
    }
}
