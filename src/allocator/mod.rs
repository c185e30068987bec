// Copyright (c) 2025 - Cowboy AI, Inc.
//! Subnet Allocation
//!
//! Positional bump allocation of named subnets inside one parent
//! [`AddressRange`](crate::domain::AddressRange). Allocation is a pure function
//! of the parent range, the minimum subnet size and the ordered requests.

pub mod request;
pub mod subnet_allocator;

pub use request::{SubnetAllocation, SubnetCatalog, SubnetCatalogBuilder, SubnetRequest};
pub use subnet_allocator::{AllocationError, SubnetAllocator};
