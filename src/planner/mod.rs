// Copyright (c) 2025 - Cowboy AI, Inc.
//! Environment Address Planning
//!
//! Shards a private address pool between the management network (index 0)
//! and tenant environments (indices `1..max_index`). Each environment's space
//! is a pure function of its index, so environments never overlap and never
//! need to coordinate.
//!
//! - [`index_offset_block`] - the closed-form `(pool, index) -> AddressRange` derivation
//! - [`EnvironmentAddressPlanner`] - validated configuration plus per-call planning
//! - [`EnvironmentPlan`] - named subnets and the DNS range of one environment

pub mod environment;
pub mod index;

pub use environment::{EnvironmentAddressPlanner, EnvironmentPlan};
pub use index::{ensure_unique_indices, index_offset_block, EnvironmentIndex};

use thiserror::Error;

use crate::allocator::AllocationError;
use crate::domain::AddressRangeError;

/// Planning failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlannerError {
    #[error("Environment index {index} is outside 1..{max_index}")]
    IndexOutOfBounds { index: u32, max_index: u32 },

    #[error("Unknown subnet: {0}")]
    UnknownSubnet(String),

    #[error("Environment index {index} is used by both {first} and {second}")]
    DuplicateIndex {
        index: u32,
        first: String,
        second: String,
    },

    #[error("Invalid planner configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    AddressRange(#[from] AddressRangeError),
}
