//! Port for employee record persistence.
//!
//! Reads receive a fully resolved [`ConstraintSet`]; adapters execute it as a
//! single query and never apply visibility rules of their own.

use access_scope::{ConstraintSet, Employee, EmployeeNumber, PageRequest};
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by employee repository adapters.
    pub enum EmployeeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "employee repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "employee repository query failed: {message}",
    }
}

/// Port for employee lookup, listing and writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Count the records matching `constraints`, ignoring pagination.
    async fn count(&self, constraints: &ConstraintSet) -> Result<u64, EmployeeRepositoryError>;

    /// List the records matching `constraints`.
    ///
    /// When `page` is paginated, records are ordered by name then employee
    /// number before the window is applied.
    async fn list(
        &self,
        constraints: &ConstraintSet,
        page: PageRequest,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError>;

    /// Find one record by its employee number.
    async fn find_by_number(
        &self,
        employee_number: EmployeeNumber,
    ) -> Result<Option<Employee>, EmployeeRepositoryError>;

    /// Create or replace a record.
    async fn save(&self, employee: &Employee) -> Result<(), EmployeeRepositoryError>;
}
