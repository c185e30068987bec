// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Rule Priority Bands

use cim_network_planning::priority::{PriorityBand, PriorityBandAllocator, PriorityError};
use proptest::prelude::*;
use std::collections::HashSet;

fn allocator() -> PriorityBandAllocator {
    PriorityBandAllocator::from_bands(vec![
        PriorityBand::new("platform", 100, 1000),
        PriorityBand::new("tenant", 1000, 3000),
        PriorityBand::new("internet", 3500, 4000),
    ])
    .unwrap()
}

/// (band, offset) pairs, some of them outside their band
fn requests() -> impl Strategy<Value = Vec<(&'static str, u32)>> {
    prop::collection::vec(
        (prop_oneof![Just("platform"), Just("tenant"), Just("internet")], 0u32..2500),
        0..64,
    )
}

proptest! {
    /// Property: Every priority handed out is unique and inside its band
    #[test]
    fn prop_assigned_priorities_are_unique(requests in requests()) {
        let mut allocator = allocator();
        let mut seen = HashSet::new();

        for (i, (band, offset)) in requests.into_iter().enumerate() {
            match allocator.assign(band, format!("rule-{}", i), offset) {
                Ok(priority) => {
                    prop_assert!(seen.insert(priority));
                    prop_assert!(allocator.table().band(band).unwrap().contains(priority));
                }
                Err(PriorityError::PriorityCollision { priority, .. }) => {
                    prop_assert!(seen.contains(&priority));
                }
                Err(PriorityError::OffsetOutOfRange { width, .. }) => {
                    prop_assert!(offset >= width);
                }
                Err(other) => prop_assert!(false, "unexpected error {}", other),
            }
        }

        prop_assert_eq!(allocator.assignments().len(), seen.len());
    }

    /// Property: Assignments read back in ascending priority order
    #[test]
    fn prop_assignments_are_sorted(requests in requests()) {
        let mut allocator = allocator();
        for (i, (band, offset)) in requests.into_iter().enumerate() {
            let _ = allocator.assign(band, format!("rule-{}", i), offset);
        }
        let priorities: Vec<u32> = allocator.assignments().iter().map(|a| a.priority).collect();
        prop_assert!(priorities.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// Property: Overlapping bands never form a table
    #[test]
    fn prop_overlapping_bands_rejected(lower in 0u32..1000, width in 1u32..500, shift in 0u32..500) {
        prop_assume!(shift < width);
        let result = PriorityBandAllocator::from_bands(vec![
            PriorityBand::new("first", lower, lower + width),
            PriorityBand::new("second", lower + shift, lower + shift + width),
        ]);
        prop_assert!(
            matches!(result, Err(PriorityError::BandOverlap { .. })),
            "expected BandOverlap"
        );
    }
}
