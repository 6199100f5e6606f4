//! Error types for the access-scope crate.
//!
//! Denials are not errors: the predicate reports them as
//! [`crate::AccessDecision::Denied`]. The enums here cover malformed input
//! only, following the project's `thiserror` conventions.

use std::path::PathBuf;

use thiserror::Error;

use crate::hierarchy::Tier;
use crate::scope::Level;

/// Data-integrity failures detected while resolving a user's scope.
///
/// These indicate malformed upstream records rather than a legitimate
/// access decision and must never be downgraded to a deny.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// A non-admin user reaches a tier but carries no unit for it.
    #[error("user {user_id} has level {level} but no {tier} assignment")]
    MissingScope {
        /// Identifier of the offending user record.
        user_id: u64,
        /// Level recorded on the user.
        level: Level,
        /// Tier whose unit is missing.
        tier: Tier,
    },
}

/// Rejected privilege level value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("privilege level must be at least 1, got {value}")]
pub struct InvalidLevel {
    /// The rejected raw value.
    pub value: u8,
}

/// Errors raised when parsing an employee number from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmployeeNumberError {
    /// Input was empty after trimming whitespace.
    #[error("employee number must not be empty")]
    Empty,
    /// Input contained something other than ASCII digits.
    #[error("employee number must be numeric, got '{value}'")]
    NotNumeric {
        /// The rejected input.
        value: String,
    },
    /// Input does not fit the employee number range.
    #[error("employee number '{value}' is out of range")]
    OutOfRange {
        /// The rejected input.
        value: String,
    },
}

/// Errors that can occur when loading or validating an exception registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read exception registry at '{path}': {message}")]
    IoError {
        /// Path to the registry file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The registry JSON is malformed or missing required fields.
    #[error("invalid exception registry JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The registry version is not supported.
    #[error("unsupported exception registry version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the document.
        actual: u32,
    },

    /// The registry document declares no groups.
    #[error("exception registry contains no groups")]
    EmptyGroups,

    /// A group name is blank.
    #[error("exception group at index {index} has an empty name")]
    EmptyGroupName {
        /// Position of the group in the document.
        index: usize,
    },

    /// Two groups share a name.
    #[error("exception group '{name}' is declared more than once")]
    DuplicateGroup {
        /// The repeated group name.
        name: String,
    },

    /// A group names neither a grantee nor an excluded general direction.
    #[error("exception group '{name}' must name a grantee or an excluded general direction")]
    UnanchoredGroup {
        /// The offending group name.
        name: String,
    },

    /// A group lists no employee numbers.
    #[error("exception group '{name}' lists no employee numbers")]
    EmptyMembers {
        /// The offending group name.
        name: String,
    },
}
