// Copyright (c) 2025 - Cowboy AI, Inc.
//! Rule Priority Planning
//!
//! Cloud firewalls and network security groups need every rule priority in a
//! collection to be unique. Bands give the priority space a readable layout
//! ("platform services", "tenant-to-tenant", "internet egress") and the
//! allocator enforces uniqueness across all of them.

pub mod allocator;
pub mod band;

pub use allocator::{PriorityAssignment, PriorityBandAllocator};
pub use band::{PriorityBand, PriorityBandTable, PriorityError};
