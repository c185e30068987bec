// Copyright (c) 2025 - Cowboy AI, Inc.
//! Sequential bump allocator carving named subnets out of one parent range

use thiserror::Error;
use tracing::{debug, trace};

use super::request::{ensure_unique_names, SubnetAllocation, SubnetRequest};
use crate::domain::address_range::align_up;
use crate::domain::AddressRange;

/// Allocation failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error(
        "Address space exhausted allocating {request_name}: needs {requested} addresses, {remaining} remain"
    )]
    AddressSpaceExhausted {
        request_name: String,
        requested: u64,
        remaining: u64,
    },

    #[error("Duplicate subnet name: {0}")]
    DuplicateSubnet(String),
}

/// Bump allocator over a single parent range
///
/// The cursor only moves forward. Each request is rounded up to a power of
/// two (never below the minimum size), the cursor is aligned to that size and
/// the block is carved there. Alignment padding is skipped, never reused.
///
/// The allocator is consumed by [`SubnetAllocator::allocate`], so every run
/// starts from a fresh cursor.
///
/// # Examples
///
/// ```rust
/// use cim_network_planning::allocator::{SubnetAllocator, SubnetRequest};
/// use cim_network_planning::domain::AddressRange;
///
/// let parent: AddressRange = "10.0.0.0/24".parse().unwrap();
/// let allocations = SubnetAllocator::new(parent, 8)
///     .allocate(&[
///         SubnetRequest::new("a", 8),
///         SubnetRequest::new("b", 64),
///         SubnetRequest::new("c", 8),
///     ])
///     .unwrap();
///
/// let cidrs: Vec<String> = allocations.iter().map(|a| a.cidr()).collect();
/// assert_eq!(cidrs, vec!["10.0.0.0/29", "10.0.0.64/26", "10.0.0.128/29"]);
/// ```
#[derive(Debug)]
pub struct SubnetAllocator {
    parent: AddressRange,
    minimum_size: u64,
    // u64 so the cursor can sit one past 255.255.255.255
    cursor: u64,
}

impl SubnetAllocator {
    /// Create an allocator; `minimum_size` is rounded up to a power of two
    pub fn new(parent: AddressRange, minimum_size: u32) -> Self {
        Self {
            parent,
            minimum_size: u64::from(minimum_size.max(1)).next_power_of_two(),
            cursor: u64::from(parent.first()),
        }
    }

    pub fn parent(&self) -> AddressRange {
        self.parent
    }

    /// Block size a request occupies once rounded
    pub fn rounded_size(&self, host_count: u32) -> u64 {
        u64::from(host_count)
            .max(self.minimum_size)
            .next_power_of_two()
    }

    /// Addresses between the cursor and the end of the parent range
    pub fn remaining(&self) -> u64 {
        (u64::from(self.parent.last()) + 1).saturating_sub(self.cursor)
    }

    /// Carve every request in order
    ///
    /// Either every request is satisfied or an error is returned; no partial
    /// catalog ever escapes.
    pub fn allocate(
        mut self,
        requests: &[SubnetRequest],
    ) -> Result<Vec<SubnetAllocation>, AllocationError> {
        ensure_unique_names(requests)?;

        let mut allocations = Vec::with_capacity(requests.len());
        for request in requests {
            allocations.push(self.carve(request)?);
        }
        Ok(allocations)
    }

    fn carve(&mut self, request: &SubnetRequest) -> Result<SubnetAllocation, AllocationError> {
        let size = self.rounded_size(request.host_count);
        let start = align_up(self.cursor, size);
        let end = start + size - 1;

        if end > u64::from(self.parent.last()) {
            return Err(AllocationError::AddressSpaceExhausted {
                request_name: request.name.clone(),
                requested: size,
                remaining: self.remaining(),
            });
        }

        if start > self.cursor {
            trace!(
                subnet = %request.name,
                skipped = start - self.cursor,
                "Padding cursor to {}-address alignment",
                size
            );
        }

        // start and end are bounded by parent.last(), so both fit in u32
        let range = AddressRange::new(start as u32, end as u32).map_err(|_| {
            AllocationError::AddressSpaceExhausted {
                request_name: request.name.clone(),
                requested: size,
                remaining: self.remaining(),
            }
        })?;
        self.cursor = end + 1;

        debug!(
            subnet = %request.name,
            range = %range,
            size,
            "Allocated subnet"
        );

        Ok(SubnetAllocation {
            name: request.name.clone(),
            range,
        })
    }
}
