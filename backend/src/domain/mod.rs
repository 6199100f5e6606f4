//! Domain services and ports for the employee directory.
//!
//! Purpose: expose employee read and write use cases that always go through
//! the organisational visibility rules. Services depend on driven ports only
//! and never on concrete adapters.
//!
//! Public surface:
//! - Error (alias to `error::DomainError`): transport-agnostic failure.
//! - ErrorCode: stable error identifier.
//! - EmployeeDirectoryService: implements `EmployeeQuery` and
//!   `EmployeeCommand`.
//! - EmployeeUpdate: validated partial update of an employee record.
//! - VisibilityAudit: cross-check of the predicate against the listing
//!   constraints over a roster.

mod audit;
mod employee_service;
mod employee_update;
pub mod error;
pub mod ports;

pub use self::audit::{Disagreement, VisibilityAudit};
pub use self::employee_service::EmployeeDirectoryService;
pub use self::employee_update::{EmployeeUpdate, EmployeeUpdateError};
pub use self::error::{DomainError, DomainError as Error, DomainErrorValidationError, ErrorCode};

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use personnel::domain::{DomainResult, Error};
///
/// fn lookup() -> DomainResult<()> {
///     Err(Error::not_found("employee 42 not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
