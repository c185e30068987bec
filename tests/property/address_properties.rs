// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Subnet Allocation and Environment Sharding

use cim_network_planning::{
    allocator::{AllocationError, SubnetAllocator, SubnetRequest},
    catalog::environment_subnet_catalog,
    config::PlannerConfig,
    domain::AddressRange,
    planner::{index_offset_block, EnvironmentAddressPlanner},
};
use proptest::prelude::*;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Host counts from a single address up to a /20
fn host_counts() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..4096, 0..24)
}

fn requests(counts: &[u32]) -> Vec<SubnetRequest> {
    counts
        .iter()
        .enumerate()
        .map(|(i, count)| SubnetRequest::new(format!("subnet-{}", i), *count))
        .collect()
}

fn parent() -> AddressRange {
    AddressRange::parse("10.20.0.0/16").unwrap()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Allocation is deterministic
    #[test]
    fn prop_allocation_is_deterministic(counts in host_counts()) {
        let requests = requests(&counts);
        let first = SubnetAllocator::new(parent(), 8).allocate(&requests);
        let second = SubnetAllocator::new(parent(), 8).allocate(&requests);
        prop_assert_eq!(first, second);
    }

    /// Property: Successful allocations are aligned, disjoint, increasing and inside the parent
    #[test]
    fn prop_allocations_are_aligned_and_disjoint(counts in host_counts()) {
        let requests = requests(&counts);
        if let Ok(allocations) = SubnetAllocator::new(parent(), 8).allocate(&requests) {
            prop_assert_eq!(allocations.len(), requests.len());

            for (allocation, request) in allocations.iter().zip(&requests) {
                let size = allocation.range.size();
                prop_assert!(size.is_power_of_two());
                prop_assert!(size >= u64::from(request.host_count.max(8)));
                prop_assert_eq!(u64::from(allocation.range.first()) % size, 0);
                prop_assert!(parent().encloses(&allocation.range));
                prop_assert_eq!(&allocation.name, &request.name);
            }
            for pair in allocations.windows(2) {
                prop_assert!(pair[0].range.last() < pair[1].range.first());
            }
        }
    }

    /// Property: Exhaustion names a request that genuinely does not fit
    #[test]
    fn prop_exhaustion_is_reported_honestly(counts in prop::collection::vec(8192u32..40000, 1..12)) {
        let requests = requests(&counts);
        match SubnetAllocator::new(parent(), 8).allocate(&requests) {
            Ok(allocations) => {
                let total: u64 = allocations.iter().map(|a| a.range.size()).sum();
                prop_assert!(total <= parent().size());
            }
            Err(AllocationError::AddressSpaceExhausted { request_name, requested, remaining }) => {
                let failed = requests.iter().position(|r| r.name == request_name).unwrap();
                let before = SubnetAllocator::new(parent(), 8).allocate(&requests[..failed]).unwrap();

                let end = u64::from(parent().last()) + 1;
                let cursor = before
                    .last()
                    .map(|a| u64::from(a.range.last()) + 1)
                    .unwrap_or_else(|| u64::from(parent().first()));
                let aligned = cursor.div_ceil(requested) * requested;

                prop_assert_eq!(remaining, end - cursor);
                prop_assert!(aligned + requested > end);
            }
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }

    /// Property: Distinct indices never produce overlapping blocks
    #[test]
    fn prop_index_offset_blocks_are_disjoint(i in 0u32..256, j in 0u32..256) {
        prop_assume!(i != j);
        let pool = AddressRange::parse("10.0.0.0/8").unwrap();
        let a = index_offset_block(&pool, 16, i).unwrap();
        let b = index_offset_block(&pool, 16, j).unwrap();
        prop_assert!(!a.overlaps(&b));
        prop_assert!(pool.encloses(&a));
    }

    /// Property: Two environments never share an address, and neither touches management
    #[test]
    fn prop_environment_plans_are_disjoint(i in 1u32..256, j in 1u32..256) {
        prop_assume!(i != j);
        let planner = EnvironmentAddressPlanner::new(PlannerConfig::default()).unwrap();
        let catalog = environment_subnet_catalog().unwrap();
        let a = planner.plan(i, &catalog).unwrap();
        let b = planner.plan(j, &catalog).unwrap();

        for left in a.allocations() {
            prop_assert!(!left.range.overlaps(&planner.management_range()));
            for right in b.allocations() {
                prop_assert!(!left.range.overlaps(&right.range));
            }
        }
        prop_assert!(!a.dns_range().overlaps(&b.dns_range()));
    }
}
