//! Employee directory services enforcing organisational visibility rules.
//!
//! The visibility rules themselves live in the `access-scope` crate. This
//! crate wraps them in use cases behind driving ports, talks to storage
//! through a driven repository port, and wires configuration and startup.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod startup;
