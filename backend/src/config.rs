//! Access settings loaded via OrthoConfig.

use std::path::PathBuf;

use access_scope::PageRequest;
use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Configuration for the visibility rules and listings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PERSONNEL")]
pub struct AccessSettings {
    /// Exception registry document. The builtin registry is used when unset.
    pub registry_path: Option<PathBuf>,
    /// Page size applied when a caller does not ask for one. Zero lists
    /// every record.
    #[ortho_config(default = 0, file_key = "page_size")]
    pub default_page_size: u32,
}

impl AccessSettings {
    /// Page request starting at `skip` using the configured page size.
    ///
    /// A page size of zero yields an unbounded request.
    ///
    /// # Examples
    /// ```
    /// use personnel::config::AccessSettings;
    ///
    /// let settings = AccessSettings {
    ///     registry_path: None,
    ///     default_page_size: 25,
    /// };
    /// let page = settings.page_request(50);
    /// assert_eq!((page.take(), page.skip()), (25, 50));
    /// ```
    #[must_use]
    pub fn page_request(&self, skip: u32) -> PageRequest {
        PageRequest::new(self.default_page_size, skip)
    }
}
