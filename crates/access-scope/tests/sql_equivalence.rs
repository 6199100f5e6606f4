//! Rendered `WHERE` clauses select the same rows as in-memory evaluation.
//!
//! Each rendered set is evaluated row by row with SQL's three-valued logic:
//! a comparison against a `NULL` column is unknown, and a row is selected
//! only when the clause is true. Comparison values are read back from the
//! bound parameters in placeholder order, so escaping and binding are covered
//! as well as the clause shape.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::path::Path;
use std::slice;
use std::sync::Arc;

use access_scope::sql::SqlParam;
use access_scope::{
    Constraint, ConstraintSet, DirectionId, Employee, EmployeeFilters, EmployeeNumber,
    ExceptionRegistry, FilterBuilder, GeneralDirectionId, Level, OrganizationalScope,
    SubdirectorateId, User,
};
use rstest::rstest;

fn builtin() -> Arc<ExceptionRegistry> {
    Arc::new(ExceptionRegistry::builtin())
}

fn fixture() -> Arc<ExceptionRegistry> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/exception-registry.json");
    Arc::new(ExceptionRegistry::from_file(&path).expect("fixture registry loads"))
}

/// One table row seen through a rendered predicate.
struct Row<'a> {
    employee: &'a Employee,
    params: slice::Iter<'a, SqlParam>,
}

impl Row<'_> {
    fn int(&mut self) -> i64 {
        match self.params.next() {
            Some(SqlParam::Int(value)) => *value,
            other => panic!("expected an integer parameter, got {other:?}"),
        }
    }

    fn text(&mut self) -> String {
        match self.params.next() {
            Some(SqlParam::Text(value)) => value.clone(),
            other => panic!("expected a text parameter, got {other:?}"),
        }
    }

    /// SQL truth value of `constraint` for this row; `None` is unknown.
    fn truth(&mut self, constraint: &Constraint) -> Option<bool> {
        let scope = self.employee.scope;
        match constraint {
            Constraint::All(parts) => {
                let values: Vec<_> = parts.iter().map(|part| self.truth(part)).collect();
                conjunction(&values)
            }
            Constraint::Any(parts) => {
                let values: Vec<_> = parts.iter().map(|part| self.truth(part)).collect();
                disjunction(&values)
            }
            Constraint::Not(inner) => Some(!self.truth(inner).unwrap_or(false)),
            Constraint::GeneralDirection(_) => {
                let bound = self.int();
                scope
                    .general_direction_id
                    .map(|id| i64::from(id.get()) == bound)
            }
            Constraint::Direction(_) => {
                let bound = self.int();
                scope.direction_id.map(|id| i64::from(id.get()) == bound)
            }
            Constraint::Subdirectorate(_) => {
                let bound = self.int();
                scope.subdirectorate_id.map(|id| i64::from(id.get()) == bound)
            }
            Constraint::EmployeeNumberIn(_) => match self.params.next() {
                Some(SqlParam::IntArray(values)) => {
                    Some(values.contains(&i64::from(self.employee.employee_number.get())))
                }
                other => panic!("expected an array parameter, got {other:?}"),
            },
            Constraint::Active(_) => match self.params.next() {
                Some(SqlParam::Bool(active)) => Some(self.employee.active == *active),
                other => panic!("expected a boolean parameter, got {other:?}"),
            },
            Constraint::Search(term) => {
                let key = self.employee.employee_number.plantilla_key();
                let name = self.employee.name.to_lowercase();
                let mut values = Vec::new();
                for _ in 0..term.plantilla_patterns().len() {
                    values.push(Some(like(&key, &self.text())));
                }
                for _ in 0..term.name_patterns().len() {
                    values.push(Some(like(&name, &self.text().to_lowercase())));
                }
                disjunction(&values)
            }
            Constraint::Unassigned => {
                let bound = self.int();
                Some(
                    scope
                        .general_direction_id
                        .is_none_or(|id| i64::from(id.get()) == bound),
                )
            }
        }
    }
}

fn conjunction(values: &[Option<bool>]) -> Option<bool> {
    if values.contains(&Some(false)) {
        Some(false)
    } else if values.contains(&None) {
        None
    } else {
        Some(true)
    }
}

fn disjunction(values: &[Option<bool>]) -> Option<bool> {
    if values.contains(&Some(true)) {
        Some(true)
    } else if values.contains(&None) {
        None
    } else {
        Some(false)
    }
}

/// `value LIKE pattern` for the `%literal%` patterns the renderer binds.
fn like(value: &str, pattern: &str) -> bool {
    let body = pattern
        .strip_prefix('%')
        .and_then(|rest| rest.strip_suffix('%'))
        .expect("pattern is wrapped in wildcards");
    let mut literal = String::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => literal.extend(chars.next()),
            '%' | '_' => panic!("unescaped wildcard in {pattern}"),
            other => literal.push(other),
        }
    }
    value.contains(&literal)
}

/// Whether the rendered form of `set` selects `employee`.
fn selected_by_sql(set: &ConstraintSet, employee: &Employee) -> bool {
    let predicate = set.to_sql();
    let mut row = Row {
        employee,
        params: predicate.params().iter(),
    };
    let truth = row.truth(set.root());
    assert!(row.params.next().is_none(), "unused parameters for {set:?}");
    truth == Some(true)
}

fn roster() -> Vec<Employee> {
    let scopes = [
        OrganizationalScope::new(18, 4, 6),
        OrganizationalScope::new(28, 2, 9),
        OrganizationalScope::new(16, 5, 10),
        OrganizationalScope::new(5, 2, 9),
        OrganizationalScope::new(1, 1, 1),
        OrganizationalScope::general_direction(18),
        OrganizationalScope::general_direction(28).with_direction(Some(DirectionId::new(4))),
        OrganizationalScope::default(),
    ];
    let names = ["Ana Torres", "50% Ana_Lopez", "Luis Ortega", "ÁNGELA Ruiz"];
    let numbers = [20902, 31001, 32001, 7057, 500, 1209];

    let mut employees = Vec::new();
    for (index, number) in numbers.into_iter().enumerate() {
        for (offset, scope) in scopes.into_iter().enumerate() {
            let name = names
                .iter()
                .cycle()
                .nth(index + offset)
                .expect("names cycle");
            employees.push(
                Employee::new(EmployeeNumber::new(number), *name, scope)
                    .with_active(offset & 1 == 0),
            );
        }
    }
    employees
}

fn users() -> Vec<User> {
    let mut users = vec![User::admin(1)];
    let scopes = [
        OrganizationalScope::new(18, 4, 6),
        OrganizationalScope::new(28, 2, 9),
        OrganizationalScope::new(16, 5, 9),
        OrganizationalScope::new(5, 2, 9),
    ];
    for (id, scope) in (2_u64..).zip(scopes) {
        for level in 2..=5 {
            users.push(User::new(id, Level::new(level).expect("valid level"), scope));
        }
    }
    users
}

fn filters() -> Vec<EmployeeFilters> {
    vec![
        EmployeeFilters::default(),
        EmployeeFilters::default().with_general_direction(18),
        EmployeeFilters::default().with_general_direction(28),
        EmployeeFilters::default().with_direction(4),
        EmployeeFilters::default().with_subdirectorate(9),
        EmployeeFilters::default().with_search("ana"),
        EmployeeFilters::default().with_search("ángela"),
        EmployeeFilters::default().with_search("209"),
        EmployeeFilters::default().with_search("50%"),
        EmployeeFilters::default().with_search("_"),
        EmployeeFilters::default().with_active(false),
        EmployeeFilters::default()
            .with_general_direction(28)
            .with_search("ortega")
            .with_active(true),
    ]
}

#[rstest]
#[case::builtin(builtin())]
#[case::fixture(fixture())]
fn rendered_listing_constraints_select_the_matching_rows(
    #[case] registry: Arc<ExceptionRegistry>,
) {
    let builder = FilterBuilder::new(registry);
    let employees = roster();

    for user in users() {
        for requested in filters() {
            let set = builder
                .build_constraints(&user, &requested)
                .expect("constraints build");
            for employee in &employees {
                assert_eq!(
                    selected_by_sql(&set, employee),
                    set.matches(employee),
                    "rendered clause {:?} disagrees for {employee:?}",
                    set.to_sql().clause()
                );
            }
        }
    }
}

#[rstest]
#[case(Constraint::GeneralDirection(GeneralDirectionId::new(18)))]
#[case(Constraint::Direction(DirectionId::new(4)))]
#[case(Constraint::Subdirectorate(SubdirectorateId::new(9)))]
#[case(Constraint::all([
    Constraint::GeneralDirection(GeneralDirectionId::new(28)),
    Constraint::Direction(DirectionId::new(2)),
]))]
#[case(Constraint::any([
    Constraint::Subdirectorate(SubdirectorateId::new(6)),
    Constraint::Unassigned,
]))]
fn negations_over_nullable_columns_keep_rows_with_missing_units(#[case] inner: Constraint) {
    let set = ConstraintSet::new(Constraint::negate(inner));
    for employee in &roster() {
        assert_eq!(
            selected_by_sql(&set, employee),
            set.matches(employee),
            "rendered clause {:?} disagrees for {employee:?}",
            set.to_sql().clause()
        );
    }
}

fn collect_negations<'a>(constraint: &'a Constraint, found: &mut Vec<&'a Constraint>) {
    match constraint {
        Constraint::All(parts) | Constraint::Any(parts) => {
            for part in parts {
                collect_negations(part, found);
            }
        }
        Constraint::Not(inner) => {
            found.push(inner.as_ref());
            collect_negations(inner, found);
        }
        _ => {}
    }
}

#[rstest]
#[case::builtin(builtin())]
#[case::fixture(fixture())]
fn exception_rules_only_negate_employee_number_membership(
    #[case] registry: Arc<ExceptionRegistry>,
) {
    let governed: Vec<_> = registry.governed_general_directions().collect();
    assert!(governed.contains(&GeneralDirectionId::new(18)));

    for general_direction in governed {
        let rule = registry.general_direction_rule(general_direction);
        let constraint = rule.to_constraint();
        let mut negated = Vec::new();
        collect_negations(&constraint, &mut negated);
        assert!(
            negated
                .iter()
                .all(|inner| matches!(inner, Constraint::EmployeeNumberIn(_))),
            "rule for {general_direction} negates {negated:?}"
        );
    }
}
