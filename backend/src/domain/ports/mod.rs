//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`EmployeeQuery`, `EmployeeCommand`) are what inbound
//! adapters call. The driven port (`EmployeeRepository`) is what storage
//! adapters implement. Each port exposes strongly typed errors.

mod macros;
pub(crate) use macros::define_port_error;

mod employee_command;
mod employee_query;
mod employee_repository;

pub use employee_command::EmployeeCommand;
pub use employee_query::EmployeeQuery;
#[cfg(test)]
pub use employee_repository::MockEmployeeRepository;
pub use employee_repository::{EmployeeRepository, EmployeeRepositoryError};
