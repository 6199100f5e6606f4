//! Employee directory service implementing the query and command ports.
//!
//! Reads and writes both go through the shared visibility rules: listings
//! hand a constraint set to the repository, single-record paths evaluate the
//! access predicate on the stored record.

use std::sync::Arc;

use access_scope::{
    AccessDecision, AccessError, AccessPredicate, Constraint, ConstraintSet, Employee,
    EmployeeFilters, EmployeeNumber, ExceptionRegistry, FilterBuilder, Page, PageRequest, User,
    listing_order,
};
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error, info};

use crate::domain::ports::{
    EmployeeCommand, EmployeeQuery, EmployeeRepository, EmployeeRepositoryError,
};
use crate::domain::{EmployeeUpdate, Error};

/// Employee directory service backed by an [`EmployeeRepository`].
#[derive(Clone)]
pub struct EmployeeDirectoryService<R> {
    repository: Arc<R>,
    predicate: AccessPredicate,
    filters: FilterBuilder,
}

impl<R> EmployeeDirectoryService<R> {
    /// Create a service over `repository` using the shared exception
    /// registry.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use access_scope::ExceptionRegistry;
    /// use personnel::domain::EmployeeDirectoryService;
    /// use personnel::outbound::memory::InMemoryEmployeeRepository;
    ///
    /// let service = EmployeeDirectoryService::new(
    ///     Arc::new(InMemoryEmployeeRepository::default()),
    ///     Arc::new(ExceptionRegistry::builtin()),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(repository: Arc<R>, registry: Arc<ExceptionRegistry>) -> Self {
        Self {
            repository,
            predicate: AccessPredicate::new(Arc::clone(&registry)),
            filters: FilterBuilder::new(registry),
        }
    }
}

fn map_repository_error(error: EmployeeRepositoryError) -> Error {
    match error {
        EmployeeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("employee repository unavailable: {message}"))
        }
        EmployeeRepositoryError::Query { message } => {
            Error::internal(format!("employee repository error: {message}"))
        }
    }
}

fn integrity_error(actor: &User) -> Error {
    Error::internal(format!("user record {} is incomplete", actor.id))
}

fn map_integrity_error(actor: &User, error: &AccessError) -> Error {
    error!(user_id = actor.id, level = %actor.level, %error, "user scope is incomplete");
    integrity_error(actor)
}

impl<R> EmployeeDirectoryService<R>
where
    R: EmployeeRepository,
{
    async fn load(&self, employee_number: EmployeeNumber) -> Result<Employee, Error> {
        self.repository
            .find_by_number(employee_number)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("employee {employee_number} not found")))
    }

    /// Load a record and check that `actor` may see it.
    async fn load_visible(
        &self,
        actor: &User,
        employee_number: EmployeeNumber,
    ) -> Result<Employee, Error> {
        let employee = self.load(employee_number).await?;
        let decision = self.predicate.evaluate(actor, &employee).map_err(|err| {
            error!(
                user_id = actor.id,
                level = %actor.level,
                %employee_number,
                error = %err,
                "user scope is incomplete"
            );
            integrity_error(actor)
        })?;

        match decision {
            AccessDecision::Allowed(grant) => {
                debug!(user_id = actor.id, %employee_number, ?grant, "employee visible");
                Ok(employee)
            }
            AccessDecision::Denied(denial) => {
                debug!(user_id = actor.id, %employee_number, ?denial, "employee hidden");
                Err(Error::forbidden(format!(
                    "employee {employee_number} is outside your scope"
                ))
                .with_details(json!({ "reason": denial })))
            }
        }
    }

    async fn list_sorted(&self, constraints: &ConstraintSet) -> Result<Vec<Employee>, Error> {
        let mut employees = self
            .repository
            .list(constraints, PageRequest::UNBOUNDED)
            .await
            .map_err(map_repository_error)?;
        employees.sort_by(listing_order);
        Ok(employees)
    }

    async fn store(&self, actor: &User, employee: Employee) -> Result<Employee, Error> {
        match self.repository.save(&employee).await {
            Ok(()) => {
                info!(
                    user_id = actor.id,
                    employee_number = %employee.employee_number,
                    "employee updated"
                );
                Ok(employee)
            }
            Err(err) => {
                error!(
                    user_id = actor.id,
                    employee_number = %employee.employee_number,
                    error = %err,
                    "employee update failed"
                );
                Err(map_repository_error(err))
            }
        }
    }
}

#[async_trait]
impl<R> EmployeeQuery for EmployeeDirectoryService<R>
where
    R: EmployeeRepository,
{
    async fn list_employees(
        &self,
        actor: &User,
        filters: &EmployeeFilters,
        page: PageRequest,
    ) -> Result<Page<Employee>, Error> {
        let constraints = self
            .filters
            .build_constraints(actor, filters)
            .map_err(|err| map_integrity_error(actor, &err))?;

        let total = self
            .repository
            .count(&constraints)
            .await
            .map_err(map_repository_error)?;
        let items = self
            .repository
            .list(&constraints, page)
            .await
            .map_err(map_repository_error)?;

        debug!(
            user_id = actor.id,
            total,
            returned = items.len(),
            take = page.take(),
            skip = page.skip(),
            "employees listed"
        );
        Ok(Page::new(items, total))
    }

    async fn employees_of_user(&self, actor: &User) -> Result<Vec<Employee>, Error> {
        let constraints = self
            .filters
            .scope_constraints(actor)
            .map_err(|err| map_integrity_error(actor, &err))?;
        self.list_sorted(&constraints).await
    }

    async fn get_employee(
        &self,
        actor: &User,
        employee_number: EmployeeNumber,
    ) -> Result<Employee, Error> {
        self.load_visible(actor, employee_number).await
    }

    async fn unassigned_employees(&self) -> Result<Vec<Employee>, Error> {
        self.list_sorted(&ConstraintSet::new(Constraint::Unassigned))
            .await
    }
}

#[async_trait]
impl<R> EmployeeCommand for EmployeeDirectoryService<R>
where
    R: EmployeeRepository,
{
    async fn update_employee(
        &self,
        actor: &User,
        employee_number: EmployeeNumber,
        update: EmployeeUpdate,
    ) -> Result<Employee, Error> {
        let stored = self.load_visible(actor, employee_number).await?;
        let updated = update
            .apply(stored)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.store(actor, updated).await
    }

    async fn update_employee_status(
        &self,
        actor: &User,
        employee_number: EmployeeNumber,
        active: bool,
    ) -> Result<Employee, Error> {
        let stored = self.load_visible(actor, employee_number).await?;
        self.store(actor, stored.with_active(active)).await
    }
}

#[cfg(test)]
#[path = "employee_service_tests.rs"]
mod tests;
