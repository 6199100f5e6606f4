//! Driving port for employee read operations.
//!
//! Every operation takes the acting user so the visibility rules apply
//! before anything leaves the domain.

use access_scope::{Employee, EmployeeFilters, EmployeeNumber, Page, PageRequest, User};
use async_trait::async_trait;

use crate::domain::Error;

/// Driving port for employee read operations.
#[async_trait]
pub trait EmployeeQuery: Send + Sync {
    /// List the employees `actor` may see, narrowed by `filters`.
    ///
    /// `total` counts every matching record before `page` is applied.
    async fn list_employees(
        &self,
        actor: &User,
        filters: &EmployeeFilters,
        page: PageRequest,
    ) -> Result<Page<Employee>, Error>;

    /// Every employee within the actor's mandatory scope, ordered by name.
    async fn employees_of_user(&self, actor: &User) -> Result<Vec<Employee>, Error>;

    /// Fetch one employee.
    ///
    /// A missing record yields `not_found`; a record outside the actor's
    /// scope yields `forbidden`.
    async fn get_employee(
        &self,
        actor: &User,
        employee_number: EmployeeNumber,
    ) -> Result<Employee, Error>;

    /// Employees without a general direction or still on the placeholder
    /// unit, ordered by name.
    async fn unassigned_employees(&self) -> Result<Vec<Employee>, Error>;
}
