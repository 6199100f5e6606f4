//! Partial update of an employee record.
//!
//! The general direction is mandatory. Lower units left out of the update
//! fall back to the placeholder unit rather than keeping their old value, so
//! a move between general directions never leaves a stale direction behind.

use access_scope::{
    DepartmentId, DirectionId, Employee, GeneralDirectionId, OrganizationalScope, SubdirectorateId,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Requested changes to an employee record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeUpdate {
    /// New general direction. Required.
    pub general_direction_id: Option<GeneralDirectionId>,
    /// New direction; placeholder unit when absent.
    pub direction_id: Option<DirectionId>,
    /// New subdirectorate; placeholder unit when absent.
    pub subdirectorate_id: Option<SubdirectorateId>,
    /// New department; placeholder unit when absent.
    pub department_id: Option<DepartmentId>,
    /// New display name; unchanged when absent.
    pub name: Option<String>,
    /// Whether the employee clocks in; unchanged when absent.
    pub can_check: Option<bool>,
    /// Activity flag; unchanged when absent.
    pub active: Option<bool>,
}

/// Validation failures for [`EmployeeUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmployeeUpdateError {
    /// No general direction was supplied.
    #[error("general direction is required")]
    MissingGeneralDirection,
    /// The supplied name was blank.
    #[error("employee name must not be blank")]
    BlankName,
}

impl EmployeeUpdate {
    /// Update moving an employee to `general_direction`.
    #[must_use]
    pub fn to_general_direction(general_direction: u32) -> Self {
        Self {
            general_direction_id: Some(GeneralDirectionId::new(general_direction)),
            ..Self::default()
        }
    }

    /// Apply the update to `employee`.
    ///
    /// # Errors
    ///
    /// Returns [`EmployeeUpdateError`] when the general direction is missing
    /// or the name is blank.
    pub fn apply(self, employee: Employee) -> Result<Employee, EmployeeUpdateError> {
        let general_direction = self
            .general_direction_id
            .ok_or(EmployeeUpdateError::MissingGeneralDirection)?;
        let name = match self.name {
            Some(name) if name.trim().is_empty() => return Err(EmployeeUpdateError::BlankName),
            Some(name) => name.trim().to_owned(),
            None => employee.name,
        };

        let scope = OrganizationalScope {
            general_direction_id: Some(general_direction),
            direction_id: Some(self.direction_id.unwrap_or(DirectionId::UNASSIGNED)),
            subdirectorate_id: Some(
                self.subdirectorate_id
                    .unwrap_or(SubdirectorateId::UNASSIGNED),
            ),
            department_id: Some(self.department_id.unwrap_or(DepartmentId::UNASSIGNED)),
        };

        Ok(Employee {
            employee_number: employee.employee_number,
            name,
            active: self.active.unwrap_or(employee.active),
            can_check: self.can_check.unwrap_or(employee.can_check),
            scope,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for update validation and defaults.

    use access_scope::EmployeeNumber;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn stored() -> Employee {
        Employee::new(
            EmployeeNumber::new(7057),
            "Rosa Méndez",
            OrganizationalScope::new(18, 4, 6).with_department(Some(DepartmentId::new(3))),
        )
    }

    #[rstest]
    fn missing_general_direction_is_rejected(stored: Employee) {
        let result = EmployeeUpdate::default().apply(stored);
        assert_eq!(result, Err(EmployeeUpdateError::MissingGeneralDirection));
    }

    #[rstest]
    fn omitted_units_fall_back_to_the_placeholder(stored: Employee) {
        let updated = EmployeeUpdate::to_general_direction(28)
            .apply(stored)
            .expect("valid update");
        assert_eq!(
            updated.scope,
            OrganizationalScope::new(28, 1, 1).with_department(Some(DepartmentId::UNASSIGNED))
        );
        assert_eq!(updated.name, "Rosa Méndez");
        assert!(updated.active);
    }

    #[rstest]
    fn supplied_fields_replace_stored_values(stored: Employee) {
        let update = EmployeeUpdate {
            direction_id: Some(DirectionId::new(5)),
            name: Some("  Rosa Méndez Soto ".to_owned()),
            can_check: Some(true),
            active: Some(false),
            ..EmployeeUpdate::to_general_direction(18)
        };
        let updated = update.apply(stored).expect("valid update");
        assert_eq!(updated.scope.direction_id, Some(DirectionId::new(5)));
        assert_eq!(updated.name, "Rosa Méndez Soto");
        assert!(updated.can_check);
        assert!(!updated.active);
    }

    #[rstest]
    fn blank_names_are_rejected(stored: Employee) {
        let update = EmployeeUpdate {
            name: Some("   ".to_owned()),
            ..EmployeeUpdate::to_general_direction(18)
        };
        assert_eq!(update.apply(stored), Err(EmployeeUpdateError::BlankName));
    }
}
