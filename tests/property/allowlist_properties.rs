// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Domain Allow-list Resolution

use cim_network_planning::allowlist::{resolve, AllowlistError, CategoryDefinition};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Property Test Strategies
// ============================================================================

fn domain() -> impl Strategy<Value = String> {
    ("[a-z]{1,8}", prop_oneof![Just("com"), Just("org"), Just("net")])
        .prop_map(|(label, tld)| format!("{}.{}", label, tld))
}

/// Acyclic registry: composite `C{i}` only references names created before it
fn acyclic_registry() -> impl Strategy<Value = BTreeMap<String, CategoryDefinition>> {
    (
        prop::collection::vec(prop::collection::vec(domain(), 1..5), 1..6),
        prop::collection::vec(prop::collection::vec(any::<prop::sample::Index>(), 1..4), 0..6),
    )
        .prop_map(|(leaves, composites)| {
            let mut registry = BTreeMap::new();
            let mut names = Vec::new();

            for (i, domains) in leaves.into_iter().enumerate() {
                let name = format!("L{}", i);
                registry.insert(name.clone(), CategoryDefinition::leaf(domains).unwrap());
                names.push(name);
            }
            for (i, members) in composites.into_iter().enumerate() {
                let name = format!("C{}", i);
                let members: Vec<String> =
                    members.iter().map(|index| index.get(&names).clone()).collect();
                registry.insert(name.clone(), CategoryDefinition::composite(members));
                names.push(name);
            }
            registry
        })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: A composite resolves to the sorted union of its members
    #[test]
    fn prop_composite_is_union_of_members(registry in acyclic_registry()) {
        for (name, definition) in &registry {
            let resolved = resolve(name, &registry).unwrap();

            let mut sorted = resolved.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(&resolved, &sorted);

            if let CategoryDefinition::Composite(members) = definition {
                let mut union = BTreeSet::new();
                for member in members {
                    union.extend(resolve(member, &registry).unwrap());
                }
                prop_assert_eq!(resolved, union.into_iter().collect::<Vec<_>>());
            }
        }
    }

    /// Property: Resolution is idempotent
    #[test]
    fn prop_resolution_is_repeatable(registry in acyclic_registry()) {
        for name in registry.keys() {
            prop_assert_eq!(resolve(name, &registry), resolve(name, &registry));
        }
    }

    /// Property: Closing a loop back to any composite is detected as a cycle
    #[test]
    fn prop_back_edge_is_a_cycle(registry in acyclic_registry()) {
        let composites: Vec<String> = registry
            .iter()
            .filter(|(_, definition)| !definition.is_leaf())
            .map(|(name, _)| name.clone())
            .collect();
        prop_assume!(!composites.is_empty());

        for target in composites {
            let mut looped = registry.clone();
            if let Some(CategoryDefinition::Composite(members)) = looped.get_mut(&target) {
                members.insert(target.clone());
            }
            prop_assert!(
                matches!(resolve(&target, &looped), Err(AllowlistError::CyclicCategory { .. })),
                "expected a cycle through {}",
                target
            );
        }
    }
}
