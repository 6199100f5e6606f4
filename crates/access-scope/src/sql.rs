//! Rendering of constraint sets as PostgreSQL `WHERE` fragments.
//!
//! Values are never inlined: every literal becomes a positional `$n`
//! parameter. Search patterns are escaped so user input cannot inject
//! `LIKE` wildcards.
//!
//! A comparison against a `NULL` column is unknown in SQL but false in
//! [`ConstraintSet::matches`]. Negations therefore coalesce their operand to
//! `FALSE`, so a rendered set selects exactly the rows `matches` accepts.

use crate::constraint::{Constraint, ConstraintSet};
use crate::pagination::PageRequest;
use crate::scope::UNASSIGNED_UNIT;
use crate::search::SearchTerm;

/// Column holding the general-direction id.
pub const GENERAL_DIRECTION_COLUMN: &str = "general_direction_id";
/// Column holding the direction id.
pub const DIRECTION_COLUMN: &str = "direction_id";
/// Column holding the subdirectorate id.
pub const SUBDIRECTORATE_COLUMN: &str = "subdirectorate_id";
/// Column holding the employee number.
pub const EMPLOYEE_NUMBER_COLUMN: &str = "employee_number";
/// Column holding the plantilla key.
pub const PLANTILLA_COLUMN: &str = "plantilla_id";
/// Column holding the employee name.
pub const NAME_COLUMN: &str = "name";
/// Column holding the activity flag.
pub const ACTIVE_COLUMN: &str = "active";

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// Text value.
    Text(String),
    /// Integer array, compared with `= ANY(..)`.
    IntArray(Vec<i64>),
}

/// A rendered `WHERE` fragment with its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlPredicate {
    clause: String,
    params: Vec<SqlParam>,
}

impl SqlPredicate {
    /// Fragment to place after `WHERE`.
    #[must_use]
    pub fn clause(&self) -> &str {
        &self.clause
    }

    /// Parameters in placeholder order.
    #[must_use]
    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// Consume the predicate.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<SqlParam>) {
        (self.clause, self.params)
    }
}

impl ConstraintSet {
    /// Render the set as a `WHERE` fragment.
    ///
    /// # Examples
    /// ```
    /// use access_scope::{Constraint, ConstraintSet, GeneralDirectionId};
    /// use access_scope::sql::SqlParam;
    ///
    /// let set = ConstraintSet::new(Constraint::GeneralDirection(GeneralDirectionId::new(5)));
    /// let predicate = set.to_sql();
    /// assert_eq!(predicate.clause(), "general_direction_id = $1");
    /// assert_eq!(predicate.params(), [SqlParam::Int(5)]);
    /// ```
    #[must_use]
    pub fn to_sql(&self) -> SqlPredicate {
        let mut renderer = Renderer::default();
        let clause = renderer.render(self.root());
        SqlPredicate {
            clause,
            params: renderer.params,
        }
    }
}

impl PageRequest {
    /// Ordering and window suffix for a paginated select.
    ///
    /// Empty when the request is unpaginated.
    #[must_use]
    pub fn to_sql_suffix(self) -> String {
        if !self.is_paginated() {
            return String::new();
        }
        format!(
            "ORDER BY {NAME_COLUMN} ASC, {EMPLOYEE_NUMBER_COLUMN} ASC LIMIT {} OFFSET {}",
            self.take(),
            self.skip()
        )
    }
}

#[derive(Default)]
struct Renderer {
    params: Vec<SqlParam>,
}

impl Renderer {
    fn bind(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }

    fn render(&mut self, constraint: &Constraint) -> String {
        match constraint {
            Constraint::All(parts) if parts.is_empty() => "TRUE".to_owned(),
            Constraint::Any(parts) if parts.is_empty() => "FALSE".to_owned(),
            Constraint::All(parts) => self.join(parts, " AND "),
            Constraint::Any(parts) => self.join(parts, " OR "),
            Constraint::Not(inner) => format!("NOT COALESCE({}, FALSE)", self.render(inner)),
            Constraint::GeneralDirection(id) => {
                self.equals(GENERAL_DIRECTION_COLUMN, SqlParam::Int(i64::from(id.get())))
            }
            Constraint::Direction(id) => {
                self.equals(DIRECTION_COLUMN, SqlParam::Int(i64::from(id.get())))
            }
            Constraint::Subdirectorate(id) => {
                self.equals(SUBDIRECTORATE_COLUMN, SqlParam::Int(i64::from(id.get())))
            }
            Constraint::EmployeeNumberIn(numbers) => {
                let values = numbers.iter().map(|n| i64::from(n.get())).collect();
                let placeholder = self.bind(SqlParam::IntArray(values));
                format!("{EMPLOYEE_NUMBER_COLUMN} = ANY({placeholder})")
            }
            Constraint::Active(active) => self.equals(ACTIVE_COLUMN, SqlParam::Bool(*active)),
            Constraint::Search(term) => self.search(term),
            Constraint::Unassigned => {
                let placeholder = self.bind(SqlParam::Int(i64::from(UNASSIGNED_UNIT)));
                format!(
                    "({GENERAL_DIRECTION_COLUMN} IS NULL OR {GENERAL_DIRECTION_COLUMN} = {placeholder})"
                )
            }
        }
    }

    fn equals(&mut self, column: &str, param: SqlParam) -> String {
        let placeholder = self.bind(param);
        format!("{column} = {placeholder}")
    }

    fn join(&mut self, parts: &[Constraint], separator: &str) -> String {
        parts
            .iter()
            .map(|part| match part {
                Constraint::All(inner) | Constraint::Any(inner) if inner.len() > 1 => {
                    format!("({})", self.render(part))
                }
                _ => self.render(part),
            })
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn search(&mut self, term: &SearchTerm) -> String {
        let mut alternatives = Vec::new();
        for pattern in term.plantilla_patterns() {
            let placeholder = self.bind(SqlParam::Text(like_pattern(&pattern)));
            alternatives.push(format!("{PLANTILLA_COLUMN} LIKE {placeholder}"));
        }
        for pattern in term.name_patterns() {
            let placeholder = self.bind(SqlParam::Text(like_pattern(&pattern)));
            alternatives.push(format!("{NAME_COLUMN} ILIKE {placeholder}"));
        }
        format!("({})", alternatives.join(" OR "))
    }
}

/// Wrap `input` in `%` after escaping `LIKE` metacharacters.
fn like_pattern(input: &str) -> String {
    let escaped = input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
