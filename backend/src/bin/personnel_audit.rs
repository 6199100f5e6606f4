//! Print the employees a user can see and cross-check the visibility rules.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use access_scope::{
    AccessPredicate, DirectionId, EmployeeFilters, FilterBuilder, GeneralDirectionId, Level,
    OrganizationalScope, PageRequest, SubdirectorateId, User,
};
use clap::Parser;
use ortho_config::OrthoConfig;
use personnel::config::AccessSettings;
use personnel::domain::ports::EmployeeQuery;
use personnel::domain::{EmployeeDirectoryService, VisibilityAudit};
use personnel::outbound::memory::InMemoryEmployeeRepository;
use personnel::startup::{load_exception_registry, load_roster};
use serde_json::json;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `personnel-audit` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "personnel-audit",
    about = "List the employees a user can see and check the visibility rules agree",
    version
)]
struct CliArgs {
    /// JSON array of employee records.
    #[arg(long, value_name = "path")]
    roster: PathBuf,
    /// Exception registry override. Falls back to `PERSONNEL_REGISTRY_PATH`.
    #[arg(long, value_name = "path")]
    registry: Option<PathBuf>,
    /// Identity of the requesting user.
    #[arg(long = "user-id", default_value_t = 0)]
    user_id: u64,
    /// Privilege level of the requesting user. Level 1 sees everything.
    #[arg(long, value_parser = parse_level)]
    level: Level,
    /// User's general direction.
    #[arg(long = "general-direction")]
    general_direction: Option<u32>,
    /// User's direction.
    #[arg(long)]
    direction: Option<u32>,
    /// User's subdirectorate.
    #[arg(long)]
    subdirectorate: Option<u32>,
    /// Requested general direction filter.
    #[arg(long = "filter-general-direction")]
    filter_general_direction: Option<u32>,
    /// Requested direction filter.
    #[arg(long = "filter-direction")]
    filter_direction: Option<u32>,
    /// Requested subdirectorate filter.
    #[arg(long = "filter-subdirectorate")]
    filter_subdirectorate: Option<u32>,
    /// Free-text search on name or employee number.
    #[arg(long)]
    search: Option<String>,
    /// Only active (`true`) or inactive (`false`) employees.
    #[arg(long)]
    active: Option<bool>,
    /// Page size. Falls back to `PERSONNEL_DEFAULT_PAGE_SIZE`.
    #[arg(long)]
    take: Option<u32>,
    /// Records to skip before the page.
    #[arg(long, default_value_t = 0)]
    skip: u32,
}

impl CliArgs {
    fn user(&self) -> User {
        let scope = OrganizationalScope {
            general_direction_id: self.general_direction.map(GeneralDirectionId::new),
            direction_id: self.direction.map(DirectionId::new),
            subdirectorate_id: self.subdirectorate.map(SubdirectorateId::new),
            department_id: None,
        };
        User::new(self.user_id, self.level, scope)
    }

    fn filters(&self) -> EmployeeFilters {
        EmployeeFilters {
            general_direction_id: self.filter_general_direction.map(GeneralDirectionId::new),
            direction_id: self.filter_direction.map(DirectionId::new),
            subdirectorate_id: self.filter_subdirectorate.map(SubdirectorateId::new),
            search: self.search.clone(),
            active: self.active,
        }
    }

    fn page(&self, settings: &AccessSettings) -> PageRequest {
        self.take.map_or_else(
            || settings.page_request(self.skip),
            |take| PageRequest::new(take, self.skip),
        )
    }
}

fn parse_level(raw: &str) -> Result<Level, String> {
    let value = raw
        .trim()
        .parse::<u8>()
        .map_err(|error| format!("failed to parse level: {error}"))?;
    Level::new(value).map_err(|error| error.to_string())
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let mut settings = AccessSettings::load_from_iter([OsString::from("personnel-audit")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    if let Some(path) = args.registry.clone() {
        settings.registry_path = Some(path);
    }

    let registry = load_exception_registry(&settings).map_err(io::Error::other)?;
    let roster = load_roster(&args.roster).map_err(io::Error::other)?;
    let user = args.user();

    let audit = VisibilityAudit::run(
        &AccessPredicate::new(Arc::clone(&registry)),
        &FilterBuilder::new(Arc::clone(&registry)),
        &user,
        &roster,
    )
    .map_err(io::Error::other)?;

    let repository = Arc::new(InMemoryEmployeeRepository::from_employees(roster));
    let service = EmployeeDirectoryService::new(repository, registry);
    let page = service
        .list_employees(&user, &args.filters(), args.page(&settings))
        .await
        .map_err(|error| io::Error::other(format!("list employees: {error}")))?;

    let report = json!({ "page": page, "audit": audit });
    let rendered = serde_json::to_string_pretty(&report).map_err(io::Error::other)?;
    writeln!(io::stdout().lock(), "{rendered}")?;

    if audit.is_consistent() {
        info!(user_id = user.id, visible = audit.visible.len(), "visibility audit passed");
        Ok(())
    } else {
        Err(io::Error::other(format!(
            "{} employees disagree between the access predicate and the listing constraints",
            audit.disagreements.len()
        )))
    }
}
