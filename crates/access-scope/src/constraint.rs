//! Declarative constraint tree over employee fields.
//!
//! A [`ConstraintSet`] is what the filter builder hands to the persistence
//! collaborator. It can be evaluated in memory with
//! [`ConstraintSet::matches`] or rendered to SQL with
//! [`ConstraintSet::to_sql`](crate::sql).

use std::collections::BTreeSet;

use serde::Serialize;

use crate::employee::{Employee, EmployeeNumber};
use crate::scope::{DirectionId, GeneralDirectionId, SubdirectorateId};
use crate::search::SearchTerm;

/// A node of the constraint tree.
///
/// `All(vec![])` is the neutral "match everything" node and `Any(vec![])`
/// matches nothing. Prefer the smart constructors, which flatten nesting and
/// collapse single-element groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Constraint {
    /// Conjunction.
    All(Vec<Constraint>),
    /// Disjunction.
    Any(Vec<Constraint>),
    /// Negation.
    Not(Box<Constraint>),
    /// Recorded general direction equals the id.
    GeneralDirection(GeneralDirectionId),
    /// Recorded direction equals the id.
    Direction(DirectionId),
    /// Recorded subdirectorate equals the id.
    Subdirectorate(SubdirectorateId),
    /// Employee number is one of the set.
    EmployeeNumberIn(BTreeSet<EmployeeNumber>),
    /// Activity flag equals the value.
    Active(bool),
    /// Free-text search.
    Search(SearchTerm),
    /// General direction missing or set to the placeholder unit.
    Unassigned,
}

impl Constraint {
    /// Constraint matching every employee.
    #[must_use]
    pub const fn always() -> Self {
        Self::All(Vec::new())
    }

    /// Constraint matching no employee.
    #[must_use]
    pub const fn never() -> Self {
        Self::Any(Vec::new())
    }

    /// Conjunction of `parts`, flattening nested conjunctions.
    #[must_use]
    pub fn all(parts: impl IntoIterator<Item = Self>) -> Self {
        let mut flat = Vec::new();
        for part in parts {
            match part {
                Self::All(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        collapse(flat, Self::All)
    }

    /// Disjunction of `parts`, flattening nested disjunctions.
    #[must_use]
    pub fn any(parts: impl IntoIterator<Item = Self>) -> Self {
        let mut flat = Vec::new();
        for part in parts {
            match part {
                Self::Any(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        collapse(flat, Self::Any)
    }

    /// Negation of `inner`; double negations cancel out.
    #[must_use]
    pub fn negate(inner: Self) -> Self {
        match inner {
            Self::Not(negated) => *negated,
            other => Self::Not(Box::new(other)),
        }
    }

    /// Membership constraint on the employee number.
    #[must_use]
    pub fn employee_number_in(numbers: impl IntoIterator<Item = EmployeeNumber>) -> Self {
        Self::EmployeeNumberIn(numbers.into_iter().collect())
    }

    /// Whether this node matches every employee.
    #[must_use]
    pub fn is_always(&self) -> bool {
        matches!(self, Self::All(parts) if parts.is_empty())
    }

    /// Evaluate the constraint against one record.
    #[must_use]
    pub fn matches(&self, employee: &Employee) -> bool {
        let scope = &employee.scope;
        match self {
            Self::All(parts) => parts.iter().all(|part| part.matches(employee)),
            Self::Any(parts) => parts.iter().any(|part| part.matches(employee)),
            Self::Not(inner) => !inner.matches(employee),
            Self::GeneralDirection(id) => scope.general_direction_id == Some(*id),
            Self::Direction(id) => scope.direction_id == Some(*id),
            Self::Subdirectorate(id) => scope.subdirectorate_id == Some(*id),
            Self::EmployeeNumberIn(numbers) => numbers.contains(&employee.employee_number),
            Self::Active(active) => employee.active == *active,
            Self::Search(term) => term.matches(employee),
            Self::Unassigned => scope.is_unassigned(),
        }
    }
}

fn collapse(mut parts: Vec<Constraint>, wrap: fn(Vec<Constraint>) -> Constraint) -> Constraint {
    if parts.len() == 1 {
        if let Some(single) = parts.pop() {
            return single;
        }
    }
    wrap(parts)
}

/// Root of a constraint tree produced for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConstraintSet {
    root: Constraint,
}

impl ConstraintSet {
    /// Wrap a constraint tree.
    #[must_use]
    pub const fn new(root: Constraint) -> Self {
        Self { root }
    }

    /// Set matching every employee.
    #[must_use]
    pub const fn unrestricted() -> Self {
        Self::new(Constraint::always())
    }

    /// Root node.
    #[must_use]
    pub const fn root(&self) -> &Constraint {
        &self.root
    }

    /// Whether the set restricts nothing.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.root.is_always()
    }

    /// Evaluate the set against one record.
    #[must_use]
    pub fn matches(&self, employee: &Employee) -> bool {
        self.root.matches(employee)
    }

    /// Keep the records matching the set.
    pub fn select<'a, I>(&'a self, employees: I) -> impl Iterator<Item = &'a Employee> + 'a
    where
        I: IntoIterator<Item = &'a Employee>,
        I::IntoIter: 'a,
    {
        employees
            .into_iter()
            .filter(move |employee| self.matches(employee))
    }
}
