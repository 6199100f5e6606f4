//! Outbound adapters implementing domain ports.
//!
//! - **memory**: in-process employee store evaluating constraint sets
//!   directly, used by the audit tool and tests.
//!
//! Adapters are thin translators between domain types and their storage
//! representation. They contain no visibility logic of their own.

pub mod memory;
