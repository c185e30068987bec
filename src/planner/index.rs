// Copyright (c) 2025 - Cowboy AI, Inc.
//! Environment indices and the index-offset address derivation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::net::Ipv4Addr;

use super::PlannerError;
use crate::domain::address_range::block_size;
use crate::domain::{AddressRange, AddressRangeError};

/// Index of a tenant environment
///
/// Index 0 is the shared management network. Tenant environments use
/// `1..max_index`, where `max_index` is derived from the planner configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EnvironmentIndex(u32);

impl EnvironmentIndex {
    pub const MANAGEMENT: EnvironmentIndex = EnvironmentIndex(0);

    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for EnvironmentIndex {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

impl fmt::Display for EnvironmentIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The `index`-th `/prefix_length` block of `pool`
///
/// `pool.first + index * 2^(32 - prefix_length)`, one block long. This closed
/// form is what keeps environments apart without any coordination: distinct
/// indices always produce disjoint blocks.
///
/// # Examples
///
/// ```rust
/// use cim_network_planning::domain::AddressRange;
/// use cim_network_planning::planner::index_offset_block;
///
/// let pool: AddressRange = "10.0.0.0/8".parse().unwrap();
/// let block = index_offset_block(&pool, 16, 7).unwrap();
/// assert_eq!(block.to_string(), "10.7.0.0/16");
/// ```
pub fn index_offset_block(
    pool: &AddressRange,
    prefix_length: u8,
    index: u32,
) -> Result<AddressRange, AddressRangeError> {
    if prefix_length > 32 {
        return Err(AddressRangeError::InvalidPrefixLength(prefix_length));
    }
    let size = block_size(prefix_length);
    let first = u64::from(pool.first()) + u64::from(index) * size;
    let last = first + size - 1;

    if last > u64::from(pool.last()) {
        return Err(AddressRangeError::BlockOutOfRange {
            start: Ipv4Addr::from(first.min(u64::from(u32::MAX)) as u32),
            size,
        });
    }
    AddressRange::new(first as u32, last as u32)
}

/// Reject two environments declaring the same index
pub fn ensure_unique_indices<N, I>(
    environments: impl IntoIterator<Item = (N, I)>,
) -> Result<(), PlannerError>
where
    N: Into<String>,
    I: Into<EnvironmentIndex>,
{
    let mut seen: HashMap<EnvironmentIndex, String> = HashMap::new();
    for (name, index) in environments {
        let name = name.into();
        let index = index.into();
        if let Some(first) = seen.get(&index) {
            return Err(PlannerError::DuplicateIndex {
                index: index.value(),
                first: first.clone(),
                second: name,
            });
        }
        seen.insert(index, name);
    }
    Ok(())
}
