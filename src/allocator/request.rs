// Copyright (c) 2025 - Cowboy AI, Inc.
//! Subnet requests, ordered catalogs and the allocations produced from them

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::AllocationError;
use crate::domain::AddressRange;

/// A named request for a block of addresses
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubnetRequest {
    pub name: String,
    /// Requested addresses; rounded up to a power of two when allocated
    pub host_count: u32,
}

impl SubnetRequest {
    pub fn new(name: impl Into<String>, host_count: u32) -> Self {
        Self {
            name: name.into(),
            host_count,
        }
    }
}

/// Ordered, duplicate-free list of subnet requests
///
/// Position is part of the contract: the Nth request always receives the Nth
/// slice of the parent range. Appending requests keeps every existing subnet
/// where it was; inserting or reordering moves every subnet after the change.
///
/// # Examples
///
/// ```rust
/// use cim_network_planning::allocator::SubnetCatalog;
///
/// let catalog = SubnetCatalog::builder()
///     .subnet("gateway", 256)
///     .subnet("workspaces", 256)
///     .build()
///     .unwrap();
/// assert_eq!(catalog.len(), 2);
/// assert!(catalog.contains("gateway"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubnetCatalog {
    requests: Vec<SubnetRequest>,
}

impl SubnetCatalog {
    /// Build a catalog, rejecting duplicate names
    pub fn new(requests: Vec<SubnetRequest>) -> Result<Self, AllocationError> {
        ensure_unique_names(&requests)?;
        Ok(Self { requests })
    }

    pub fn builder() -> SubnetCatalogBuilder {
        SubnetCatalogBuilder::default()
    }

    pub fn requests(&self) -> &[SubnetRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.requests.iter().any(|request| request.name == name)
    }

    /// Append a request at the end, the only change that keeps deployed layouts
    pub fn append(&mut self, request: SubnetRequest) -> Result<(), AllocationError> {
        if self.contains(&request.name) {
            return Err(AllocationError::DuplicateSubnet(request.name));
        }
        self.requests.push(request);
        Ok(())
    }
}

impl<'de> Deserialize<'de> for SubnetCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let requests = Vec::<SubnetRequest>::deserialize(deserializer)?;
        Self::new(requests).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a SubnetCatalog {
    type Item = &'a SubnetRequest;
    type IntoIter = std::slice::Iter<'a, SubnetRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.iter()
    }
}

/// Fluent builder for [`SubnetCatalog`]
#[derive(Debug, Default)]
pub struct SubnetCatalogBuilder {
    requests: Vec<SubnetRequest>,
}

impl SubnetCatalogBuilder {
    pub fn subnet(mut self, name: impl Into<String>, host_count: u32) -> Self {
        self.requests.push(SubnetRequest::new(name, host_count));
        self
    }

    pub fn build(self) -> Result<SubnetCatalog, AllocationError> {
        SubnetCatalog::new(self.requests)
    }
}

pub(crate) fn ensure_unique_names(requests: &[SubnetRequest]) -> Result<(), AllocationError> {
    let mut seen = HashSet::with_capacity(requests.len());
    for request in requests {
        if !seen.insert(request.name.as_str()) {
            return Err(AllocationError::DuplicateSubnet(request.name.clone()));
        }
    }
    Ok(())
}

/// A named, CIDR-aligned block carved for one request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubnetAllocation {
    pub name: String,
    pub range: AddressRange,
}

impl SubnetAllocation {
    /// CIDR notation of the allocated block
    pub fn cidr(&self) -> String {
        // allocated blocks are always aligned, so Display prints CIDR
        self.range.to_string()
    }
}

impl fmt::Display for SubnetAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.range)
    }
}
