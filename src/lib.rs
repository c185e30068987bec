// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network planning for multi-tenant cloud deployments
//!
//! This crate turns static declarations into a collision-free address plan,
//! unique rule priorities and sorted domain allow-lists. Every result is a
//! pure function of its inputs, so independent resource declarations can
//! reference them without negotiating with each other.
//!
//! - [`allocator`] - bump allocation of named, aligned subnets
//! - [`planner`] - per-environment address spaces sharded by index
//! - [`priority`] - rule priority bands with global uniqueness
//! - [`allowlist`] - domain categories resolved into flat allow-lists
//! - [`catalog`] - the built-in subnet, band and domain catalogs

pub mod allocator;
pub mod allowlist;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod planner;
pub mod priority;

// Re-export commonly used types
pub use allocator::{SubnetAllocation, SubnetAllocator, SubnetCatalog, SubnetRequest};
pub use allowlist::{CategoryDefinition, CategoryRegistry};
pub use config::{HostReservation, PlannerConfig};
pub use domain::{AddressRange, Fqdn};
pub use errors::{PlanningError, PlanningResult};
pub use planner::{EnvironmentAddressPlanner, EnvironmentIndex, EnvironmentPlan};
pub use priority::{PriorityBand, PriorityBandAllocator, PriorityBandTable};
