//! Offset pagination applied after the constraint set has picked the
//! eligible records.
//!
//! Totals always describe the filtered set before truncation. Ordering is by
//! name, ascending, with the employee number as tie-break so pages are
//! deterministic.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::employee::Employee;

/// Requested page window. A `take` of zero means "no pagination".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageRequest {
    take: u32,
    skip: u32,
}

impl PageRequest {
    /// Request returning every eligible record.
    pub const UNBOUNDED: Self = Self { take: 0, skip: 0 };

    /// Window of `take` records after skipping `skip`.
    #[must_use]
    pub const fn new(take: u32, skip: u32) -> Self {
        Self { take, skip }
    }

    /// Page size; zero when unpaginated.
    #[must_use]
    pub const fn take(self) -> u32 {
        self.take
    }

    /// Number of records skipped.
    #[must_use]
    pub const fn skip(self) -> u32 {
        self.skip
    }

    /// Whether a window applies.
    #[must_use]
    pub const fn is_paginated(self) -> bool {
        self.take > 0
    }

    /// Apply the window to records already filtered by a constraint set.
    ///
    /// Paginated requests sort by [`listing_order`] first; unpaginated ones
    /// keep the input order untouched.
    #[must_use]
    pub fn apply(self, mut employees: Vec<Employee>) -> Vec<Employee> {
        if !self.is_paginated() {
            return employees;
        }
        employees.sort_by(listing_order);
        employees
            .into_iter()
            .skip(usize::try_from(self.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(self.take).unwrap_or(usize::MAX))
            .collect()
    }
}

/// Deterministic listing order: name ascending, then employee number.
#[must_use]
pub fn listing_order(left: &Employee, right: &Employee) -> Ordering {
    left.name
        .cmp(&right.name)
        .then_with(|| left.employee_number.cmp(&right.employee_number))
}

/// One page of results together with the size of the full filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Records in the requested window.
    pub items: Vec<T>,
    /// Number of records matching the constraints, before the window.
    pub total: u64,
}

impl<T> Page<T> {
    /// Build a page.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Transform every item, keeping the total.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::employee::EmployeeNumber;
    use crate::scope::OrganizationalScope;

    #[fixture]
    fn roster() -> Vec<Employee> {
        [(4, "Diego"), (2, "Ana"), (3, "Carla"), (1, "Ana"), (5, "Bruno")]
            .into_iter()
            .map(|(number, name)| {
                Employee::new(
                    EmployeeNumber::new(number),
                    name,
                    OrganizationalScope::general_direction(5),
                )
            })
            .collect()
    }

    fn numbers(employees: &[Employee]) -> Vec<u32> {
        employees.iter().map(|e| e.employee_number.get()).collect()
    }

    #[rstest]
    fn unbounded_requests_keep_input_order(roster: Vec<Employee>) {
        let page = PageRequest::UNBOUNDED.apply(roster);
        assert_eq!(numbers(&page), [4, 2, 3, 1, 5]);
    }

    #[rstest]
    #[case(PageRequest::new(2, 0), &[1, 2])]
    #[case(PageRequest::new(2, 2), &[5, 3])]
    #[case(PageRequest::new(10, 4), &[4])]
    #[case(PageRequest::new(3, 9), &[])]
    fn paginated_requests_sort_by_name_then_number(
        roster: Vec<Employee>,
        #[case] request: PageRequest,
        #[case] expected: &[u32],
    ) {
        assert_eq!(numbers(&request.apply(roster)), expected);
    }

    #[rstest]
    fn page_map_keeps_total() {
        let page = Page::new(vec![1, 2], 9).map(|n| n * 10);
        assert_eq!(page, Page::new(vec![10, 20], 9));
    }
}
