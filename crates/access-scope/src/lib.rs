//! Row-level visibility rules for employee records.
//!
//! The crate decides which employees a user may see across the organisational
//! hierarchy (general direction, direction, subdirectorate). It offers two
//! faces of one rule:
//!
//! - [`AccessPredicate`] decides for a single record;
//! - [`FilterBuilder`] produces a [`ConstraintSet`] selecting every visible
//!   record, for listing queries.
//!
//! Both read the tiers a user is bound to from [`RequiredScope`] and the
//! exception groups from a shared [`ExceptionRegistry`], so with no requested
//! filters a record matches the constraint set exactly when the predicate
//! allows it.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use access_scope::{
//!     AccessPredicate, Employee, EmployeeFilters, EmployeeNumber, ExceptionRegistry,
//!     FilterBuilder, Level, OrganizationalScope, User,
//! };
//!
//! let registry = Arc::new(ExceptionRegistry::builtin());
//! let predicate = AccessPredicate::new(Arc::clone(&registry));
//! let filters = FilterBuilder::new(registry);
//!
//! let user = User::new(1, Level::new(2)?, OrganizationalScope::general_direction(28));
//! let employee = Employee::new(
//!     EmployeeNumber::new(20902),
//!     "Legacy Employee",
//!     OrganizationalScope::general_direction(18),
//! );
//!
//! let constraints = filters.build_constraints(&user, &EmployeeFilters::default())?;
//! assert!(predicate.is_allowed(&user, &employee)?);
//! assert!(constraints.matches(&employee));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod constraint;
mod employee;
mod error;
mod filter;
mod hierarchy;
mod pagination;
mod predicate;
mod registry;
mod scope;
mod search;
pub mod sql;
mod user;

pub use constraint::{Constraint, ConstraintSet};
pub use employee::{Employee, EmployeeNumber, PLANTILLA_PREFIX};
pub use error::{AccessError, EmployeeNumberError, InvalidLevel, RegistryError};
pub use filter::{EmployeeFilters, FilterBuilder};
pub use hierarchy::{RequiredScope, Tier};
pub use pagination::{Page, PageRequest, listing_order};
pub use predicate::{AccessDecision, AccessPredicate, Denial, Grant};
pub use registry::{
    ExceptionGroup, ExceptionRegistry, GeneralDirectionOutcome, GeneralDirectionRule,
    LEGACY_EMPLOYEE_NUMBERS, LEGACY_GROUP_NAME,
};
pub use scope::{
    DepartmentId, DirectionId, GeneralDirectionId, Level, OrganizationalScope, SubdirectorateId,
    UNASSIGNED_UNIT,
};
pub use search::SearchTerm;
pub use user::User;
