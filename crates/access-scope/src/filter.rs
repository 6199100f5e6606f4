//! Listing-time dual of the access predicate.
//!
//! [`FilterBuilder::build_constraints`] turns a user and the caller's
//! requested filters into a [`ConstraintSet`]. With no requested filters the
//! set selects exactly the records [`crate::AccessPredicate`] allows.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constraint::{Constraint, ConstraintSet};
use crate::error::AccessError;
use crate::hierarchy::RequiredScope;
use crate::registry::ExceptionRegistry;
use crate::scope::{DirectionId, GeneralDirectionId, SubdirectorateId};
use crate::search::SearchTerm;
use crate::user::User;

/// Filters a caller may request when listing employees.
///
/// Hierarchy filters only take effect on tiers the user is not already
/// bound to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeFilters {
    /// Requested general direction.
    pub general_direction_id: Option<GeneralDirectionId>,
    /// Requested direction.
    pub direction_id: Option<DirectionId>,
    /// Requested subdirectorate.
    pub subdirectorate_id: Option<SubdirectorateId>,
    /// Free-text search.
    pub search: Option<String>,
    /// Activity flag.
    pub active: Option<bool>,
}

impl EmployeeFilters {
    /// Request a general direction.
    #[must_use]
    pub const fn with_general_direction(mut self, id: u32) -> Self {
        self.general_direction_id = Some(GeneralDirectionId::new(id));
        self
    }

    /// Request a direction.
    #[must_use]
    pub const fn with_direction(mut self, id: u32) -> Self {
        self.direction_id = Some(DirectionId::new(id));
        self
    }

    /// Request a subdirectorate.
    #[must_use]
    pub const fn with_subdirectorate(mut self, id: u32) -> Self {
        self.subdirectorate_id = Some(SubdirectorateId::new(id));
        self
    }

    /// Request a free-text search.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Request an activity flag.
    #[must_use]
    pub const fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Whether nothing was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Builds listing constraints from the same rules as the access predicate.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use access_scope::{EmployeeFilters, ExceptionRegistry, FilterBuilder, User};
///
/// let builder = FilterBuilder::new(Arc::new(ExceptionRegistry::builtin()));
/// let unfiltered = builder.build_constraints(&User::admin(1), &EmployeeFilters::default())?;
/// assert!(unfiltered.is_unrestricted());
/// # Ok::<(), access_scope::AccessError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FilterBuilder {
    registry: Arc<ExceptionRegistry>,
}

impl FilterBuilder {
    /// Build a filter builder over the shared registry.
    #[must_use]
    pub const fn new(registry: Arc<ExceptionRegistry>) -> Self {
        Self { registry }
    }

    /// Constraint set for `user` listing with `filters`.
    ///
    /// Tiers the user's level reaches are keyed on the user's own units and
    /// ignore the requested value. Other tiers honour the request: the
    /// general direction goes through the exception expansion, direction and
    /// subdirectorate are plain equality. Search and activity filters are
    /// ANDed on top.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::MissingScope`] when a non-admin user lacks the
    /// unit for a tier their level reaches.
    pub fn build_constraints(
        &self,
        user: &User,
        filters: &EmployeeFilters,
    ) -> Result<ConstraintSet, AccessError> {
        let required = RequiredScope::for_user(user)?;
        let mut parts = Vec::new();

        if let Some(general_direction) = required
            .general_direction
            .or(filters.general_direction_id)
        {
            parts.push(
                self.registry
                    .general_direction_rule(general_direction)
                    .to_constraint(),
            );
        }
        if let Some(direction) = required.direction.or(filters.direction_id) {
            parts.push(Constraint::Direction(direction));
        }
        if let Some(subdirectorate) = required.subdirectorate.or(filters.subdirectorate_id) {
            parts.push(Constraint::Subdirectorate(subdirectorate));
        }
        if let Some(term) = filters.search.as_deref().and_then(SearchTerm::parse) {
            parts.push(Constraint::Search(term));
        }
        if let Some(active) = filters.active {
            parts.push(Constraint::Active(active));
        }

        Ok(ConstraintSet::new(Constraint::all(parts)))
    }

    /// Constraint set holding only the user's mandatory scope.
    ///
    /// # Errors
    ///
    /// Same as [`FilterBuilder::build_constraints`].
    pub fn scope_constraints(&self, user: &User) -> Result<ConstraintSet, AccessError> {
        self.build_constraints(user, &EmployeeFilters::default())
    }
}
