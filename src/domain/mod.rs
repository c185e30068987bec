// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Planning Domain Models
//!
//! Value objects with validation invariants that the allocators and the
//! allow-list composer are built on.
//!
//! # Value Objects with Invariants
//!
//! - [`AddressRange`] - Inclusive IPv4 interval, CIDR-aware, `first <= last`
//! - [`UsableHosts`] - Lazy enumeration of assignable host addresses
//! - [`Fqdn`] - RFC 1123 domain name, lower-cased, optional leading wildcard

pub mod address_range;
pub mod fqdn;

// Re-export value objects
pub use address_range::{AddressRange, AddressRangeError, UsableHosts};
pub use fqdn::{Fqdn, FqdnError};
