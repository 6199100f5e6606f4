//! Driving port for employee write operations.

use access_scope::{Employee, EmployeeNumber, User};
use async_trait::async_trait;

use crate::domain::{EmployeeUpdate, Error};

/// Driving port for employee write operations.
///
/// Writes are refused with `forbidden` when the actor may not see the stored
/// record.
#[async_trait]
pub trait EmployeeCommand: Send + Sync {
    /// Apply `update` to the stored record and return the saved employee.
    async fn update_employee(
        &self,
        actor: &User,
        employee_number: EmployeeNumber,
        update: EmployeeUpdate,
    ) -> Result<Employee, Error>;

    /// Switch the activity flag of the stored record.
    async fn update_employee_status(
        &self,
        actor: &User,
        employee_number: EmployeeNumber,
        active: bool,
    ) -> Result<Employee, Error>;
}
