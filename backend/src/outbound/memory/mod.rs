//! In-memory `EmployeeRepository` adapter.
//!
//! Records live in a `BTreeMap` keyed by employee number behind a Tokio
//! `RwLock`. Constraint sets are evaluated record by record with
//! [`ConstraintSet::matches`], which selects the same rows as the SQL
//! rendering of the set.

use std::collections::BTreeMap;

use access_scope::{ConstraintSet, Employee, EmployeeNumber, PageRequest};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{EmployeeRepository, EmployeeRepositoryError};

/// Employee store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeRepository {
    employees: RwLock<BTreeMap<EmployeeNumber, Employee>>,
}

impl InMemoryEmployeeRepository {
    /// Build a store seeded with `employees`.
    ///
    /// Later records replace earlier ones with the same employee number.
    pub fn from_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let employees = employees
            .into_iter()
            .map(|employee| (employee.employee_number, employee))
            .collect();
        Self {
            employees: RwLock::new(employees),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.employees.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.employees.read().await.is_empty()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn count(&self, constraints: &ConstraintSet) -> Result<u64, EmployeeRepositoryError> {
        let employees = self.employees.read().await;
        let matching = constraints.select(employees.values()).count();
        u64::try_from(matching).map_err(|err| EmployeeRepositoryError::query(err.to_string()))
    }

    async fn list(
        &self,
        constraints: &ConstraintSet,
        page: PageRequest,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError> {
        let employees = self.employees.read().await;
        let matching = constraints.select(employees.values()).cloned().collect();
        Ok(page.apply(matching))
    }

    async fn find_by_number(
        &self,
        employee_number: EmployeeNumber,
    ) -> Result<Option<Employee>, EmployeeRepositoryError> {
        Ok(self.employees.read().await.get(&employee_number).cloned())
    }

    async fn save(&self, employee: &Employee) -> Result<(), EmployeeRepositoryError> {
        self.employees
            .write()
            .await
            .insert(employee.employee_number, employee.clone());
        Ok(())
    }
}
