// Copyright (c) 2025 - Cowboy AI, Inc.
//! Per-environment address planning

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::index::{index_offset_block, EnvironmentIndex};
use super::PlannerError;
use crate::allocator::{SubnetAllocation, SubnetAllocator, SubnetCatalog};
use crate::config::{HostReservation, PlannerConfig};
use crate::domain::{AddressRange, UsableHosts};

/// Derives each environment's address space and carves its subnets
///
/// The planner holds only validated configuration; every call builds its own
/// [`SubnetAllocator`], so one planner can serve many threads planning
/// different environments.
///
/// # Examples
///
/// ```rust
/// use cim_network_planning::allocator::SubnetCatalog;
/// use cim_network_planning::config::PlannerConfig;
/// use cim_network_planning::planner::EnvironmentAddressPlanner;
///
/// let planner = EnvironmentAddressPlanner::new(PlannerConfig::default()).unwrap();
/// let catalog = SubnetCatalog::builder()
///     .subnet("gateway", 256)
///     .subnet("workspaces", 256)
///     .build()
///     .unwrap();
///
/// let plan = planner.plan(3, &catalog).unwrap();
/// assert_eq!(plan.subnet("workspaces").unwrap().cidr(), "10.3.1.0/24");
/// assert_eq!(plan.dns_range().to_string(), "192.168.0.24/29");
/// ```
#[derive(Debug, Clone)]
pub struct EnvironmentAddressPlanner {
    config: PlannerConfig,
    max_index: u32,
    management: AddressRange,
}

impl EnvironmentAddressPlanner {
    /// Create a planner after validating the configuration
    pub fn new(config: PlannerConfig) -> Result<Self, PlannerError> {
        config.validate()?;
        let max_index = config.max_index();
        let management = index_offset_block(
            &config.environment_pool,
            config.environment_prefix_length,
            EnvironmentIndex::MANAGEMENT.value(),
        )?;
        Ok(Self {
            config,
            max_index,
            management,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Exclusive upper bound on environment indices
    pub fn max_index(&self) -> u32 {
        self.max_index
    }

    /// Address space of the shared management network (index 0)
    pub fn management_range(&self) -> AddressRange {
        self.management
    }

    /// Every valid environment index, in ascending order
    pub fn indices(&self) -> impl Iterator<Item = EnvironmentIndex> {
        (1..self.max_index).map(EnvironmentIndex::new)
    }

    fn check_index(&self, index: EnvironmentIndex) -> Result<(), PlannerError> {
        if index.value() < 1 || index.value() >= self.max_index {
            return Err(PlannerError::IndexOutOfBounds {
                index: index.value(),
                max_index: self.max_index,
            });
        }
        Ok(())
    }

    /// Private address space of one environment
    pub fn address_space(
        &self,
        index: impl Into<EnvironmentIndex>,
    ) -> Result<AddressRange, PlannerError> {
        let index = index.into();
        self.check_index(index)?;
        Ok(index_offset_block(
            &self.config.environment_pool,
            self.config.environment_prefix_length,
            index.value(),
        )?)
    }

    /// DNS-service range of one environment, taken from the separate DNS pool
    pub fn dns_range(&self, index: impl Into<EnvironmentIndex>) -> Result<AddressRange, PlannerError> {
        let index = index.into();
        self.check_index(index)?;
        Ok(index_offset_block(
            &self.config.dns_pool,
            self.config.dns_prefix_length,
            index.value(),
        )?)
    }

    /// Plan every subnet in `catalog` for one environment
    pub fn plan(
        &self,
        index: impl Into<EnvironmentIndex>,
        catalog: &SubnetCatalog,
    ) -> Result<EnvironmentPlan, PlannerError> {
        let index = index.into();
        let address_space = self.address_space(index)?;
        let dns_range = self.dns_range(index)?;

        let subnets = SubnetAllocator::new(address_space, self.config.minimum_subnet_size)
            .allocate(catalog.requests())?;

        debug!(
            environment = %index,
            address_space = %address_space,
            dns = %dns_range,
            subnets = subnets.len(),
            "Planned environment"
        );

        Ok(EnvironmentPlan {
            index,
            address_space,
            dns_range,
            subnets,
            reservation: self.config.reservation,
        })
    }

    /// The named subnet's range in every environment
    ///
    /// Used by management-network rules that must match a given subnet of
    /// all tenants at once.
    pub fn subnet_across_environments(
        &self,
        name: &str,
        catalog: &SubnetCatalog,
    ) -> Result<Vec<AddressRange>, PlannerError> {
        if !catalog.contains(name) {
            return Err(PlannerError::UnknownSubnet(name.to_string()));
        }
        self.indices()
            .map(|index| -> Result<AddressRange, PlannerError> {
                Ok(self.plan(index, catalog)?.subnet(name)?.range)
            })
            .collect()
    }
}

/// Address plan of one environment
///
/// Subnets keep catalog order; lookups are by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentPlan {
    index: EnvironmentIndex,
    address_space: AddressRange,
    dns_range: AddressRange,
    subnets: Vec<SubnetAllocation>,
    #[serde(skip)]
    reservation: HostReservation,
}

impl EnvironmentPlan {
    pub fn index(&self) -> EnvironmentIndex {
        self.index
    }

    pub fn address_space(&self) -> AddressRange {
        self.address_space
    }

    pub fn dns_range(&self) -> AddressRange {
        self.dns_range
    }

    /// Look up a subnet by name
    pub fn subnet(&self, name: &str) -> Result<&SubnetAllocation, PlannerError> {
        self.subnets
            .iter()
            .find(|allocation| allocation.name == name)
            .ok_or_else(|| PlannerError::UnknownSubnet(name.to_string()))
    }

    /// Allocations in catalog order
    pub fn allocations(&self) -> &[SubnetAllocation] {
        &self.subnets
    }

    /// Name-keyed view of the allocations
    pub fn subnets(&self) -> BTreeMap<&str, &SubnetAllocation> {
        self.subnets
            .iter()
            .map(|allocation| (allocation.name.as_str(), allocation))
            .collect()
    }

    /// Subnet name to CIDR string, the form resource declarations consume
    pub fn cidrs(&self) -> BTreeMap<String, String> {
        self.subnets
            .iter()
            .map(|allocation| (allocation.name.clone(), allocation.cidr()))
            .collect()
    }

    /// Assignable host addresses of a subnet after provider reservations
    pub fn usable_hosts(&self, name: &str) -> Result<UsableHosts, PlannerError> {
        Ok(self.subnet(name)?.range.usable_hosts_with(&self.reservation))
    }
}
