// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for network planning operations

use thiserror::Error;

use crate::allocator::AllocationError;
use crate::allowlist::AllowlistError;
use crate::domain::{AddressRangeError, FqdnError};
use crate::planner::PlannerError;
use crate::priority::PriorityError;

/// Errors that can occur anywhere in network planning
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanningError {
    /// Address range parsing or arithmetic error
    #[error("Address range error: {0}")]
    AddressRange(#[from] AddressRangeError),

    /// Domain name validation error
    #[error("Domain name error: {0}")]
    Fqdn(#[from] FqdnError),

    /// Subnet allocation error
    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),

    /// Environment planning error
    #[error("Planner error: {0}")]
    Planner(#[from] PlannerError),

    /// Rule priority error
    #[error("Priority error: {0}")]
    Priority(#[from] PriorityError),

    /// Allow-list composition error
    #[error("Allow-list error: {0}")]
    Allowlist(#[from] AllowlistError),
}

/// Result type for network planning operations
pub type PlanningResult<T> = Result<T, PlanningError>;
