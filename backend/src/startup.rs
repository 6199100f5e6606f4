//! Startup loading of the exception registry and employee rosters.
//!
//! Files are opened through a capability handle on their parent directory.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use access_scope::{Employee, ExceptionRegistry, RegistryError};
use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;
use tracing::info;

use crate::config::AccessSettings;

/// Errors returned while loading startup inputs.
#[derive(Debug, Error)]
pub enum StartupError {
    /// An input file could not be read.
    #[error("failed to read {path}: {source}")]
    FileRead {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Registry parsing or validation failed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    /// Roster JSON could not be decoded.
    #[error("invalid roster at {path}: {source}")]
    Roster {
        /// Path to the roster file.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

/// Load the exception registry named by `settings`.
///
/// The builtin registry is returned when no path is configured.
///
/// # Errors
///
/// Returns [`StartupError`] when the configured file cannot be read or does
/// not hold a valid registry document.
///
/// # Examples
/// ```
/// use personnel::config::AccessSettings;
/// use personnel::startup::load_exception_registry;
///
/// let settings = AccessSettings {
///     registry_path: None,
///     default_page_size: 0,
/// };
/// let registry = load_exception_registry(&settings)?;
/// assert_eq!(registry.groups().len(), 1);
/// # Ok::<(), personnel::startup::StartupError>(())
/// ```
pub fn load_exception_registry(
    settings: &AccessSettings,
) -> Result<Arc<ExceptionRegistry>, StartupError> {
    let Some(path) = settings.registry_path.as_deref() else {
        info!(source = "builtin", "exception registry loaded");
        return Ok(Arc::new(ExceptionRegistry::builtin()));
    };

    let contents = read_file(path)?;
    let registry = ExceptionRegistry::from_json(&contents)?;
    info!(
        source = %path.display(),
        groups = registry.groups().len(),
        "exception registry loaded"
    );
    Ok(Arc::new(registry))
}

/// Load a JSON array of employee records.
///
/// # Errors
///
/// Returns [`StartupError`] when the file cannot be read or decoded.
pub fn load_roster(path: &Path) -> Result<Vec<Employee>, StartupError> {
    let contents = read_file(path)?;
    let employees: Vec<Employee> =
        serde_json::from_str(&contents).map_err(|source| StartupError::Roster {
            path: path.to_path_buf(),
            source,
        })?;
    info!(source = %path.display(), employees = employees.len(), "roster loaded");
    Ok(employees)
}

fn read_file(path: &Path) -> Result<String, StartupError> {
    let read_error = |source: io::Error| StartupError::FileRead {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "path must name a file",
        ))
    })?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let payload = dir.read(Path::new(file_name)).map_err(read_error)?;
    String::from_utf8(payload)
        .map_err(|source| read_error(io::Error::new(io::ErrorKind::InvalidData, source)))
}
