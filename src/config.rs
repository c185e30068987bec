// Copyright (c) 2025 - Cowboy AI, Inc.
//! Planner configuration
//!
//! Plain data with Azure defaults. The core never reads configuration files;
//! callers build a [`PlannerConfig`] themselves or deserialize one with serde.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use crate::domain::address_range::{block_size, AddressRange};
use crate::planner::PlannerError;

/// Addresses the cloud provider reserves in every subnet
///
/// Azure reserves the network address, the default gateway (`.1`), two
/// addresses mapping Azure DNS (`.2`, `.3`) and the broadcast address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostReservation {
    /// Reserved addresses at the start of each subnet
    pub leading: u32,
    /// Reserved addresses at the end of each subnet
    pub trailing: u32,
}

impl Default for HostReservation {
    fn default() -> Self {
        Self {
            leading: 4,
            trailing: 1,
        }
    }
}

/// Configuration for [`EnvironmentAddressPlanner`](crate::planner::EnvironmentAddressPlanner)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Private block shared by the management network (index 0) and all environments
    pub environment_pool: AddressRange,
    /// Prefix length of each environment's address space
    pub environment_prefix_length: u8,
    /// Block holding the per-environment DNS service ranges
    pub dns_pool: AddressRange,
    /// Prefix length of each environment's DNS range
    pub dns_prefix_length: u8,
    /// Smallest subnet the provider accepts
    pub minimum_subnet_size: u32,
    pub reservation: HostReservation,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            environment_pool: AddressRange::containing_block(Ipv4Addr::new(10, 0, 0, 0), 8),
            environment_prefix_length: 16,
            dns_pool: AddressRange::containing_block(Ipv4Addr::new(192, 168, 0, 0), 16),
            dns_prefix_length: 29,
            minimum_subnet_size: 8,
            reservation: HostReservation::default(),
        }
    }
}

impl PlannerConfig {
    /// Number of environment-sized blocks in the environment pool
    ///
    /// Block 0 is the management network, so valid environment indices are
    /// `1..max_index()`. With the defaults (`10.0.0.0/8` split into `/16`s)
    /// this is 256.
    pub fn max_index(&self) -> u32 {
        let blocks = self.environment_pool.size() / block_size(self.environment_prefix_length.min(32));
        u32::try_from(blocks).unwrap_or(u32::MAX)
    }

    /// Check the configuration for internal consistency
    pub fn validate(&self) -> Result<(), PlannerError> {
        check_pool("environment", &self.environment_pool, self.environment_prefix_length)?;
        check_pool("dns", &self.dns_pool, self.dns_prefix_length)?;

        if self.environment_pool.overlaps(&self.dns_pool) {
            return Err(PlannerError::Config(format!(
                "dns pool {} overlaps environment pool {}",
                self.dns_pool, self.environment_pool
            )));
        }

        let environment_blocks =
            self.environment_pool.size() / block_size(self.environment_prefix_length);
        if environment_blocks < 2 {
            return Err(PlannerError::Config(format!(
                "environment pool {} leaves no room for environments beside the management network",
                self.environment_pool
            )));
        }
        if environment_blocks > u64::from(u32::MAX) {
            return Err(PlannerError::Config(format!(
                "environment pool {} holds more than {} blocks",
                self.environment_pool,
                u32::MAX
            )));
        }

        let dns_blocks = self.dns_pool.size() / block_size(self.dns_prefix_length);
        if dns_blocks < environment_blocks {
            return Err(PlannerError::Config(format!(
                "dns pool {} holds {} blocks but {} environment indices are possible",
                self.dns_pool, dns_blocks, environment_blocks
            )));
        }

        let environment_size = block_size(self.environment_prefix_length);
        if self.minimum_subnet_size == 0 || u64::from(self.minimum_subnet_size) > environment_size {
            return Err(PlannerError::Config(format!(
                "minimum subnet size {} must be between 1 and {}",
                self.minimum_subnet_size, environment_size
            )));
        }

        Ok(())
    }

    /// Defaults overridden by `PLAN_*` environment variables
    ///
    /// Recognised variables: `PLAN_ENVIRONMENT_POOL`, `PLAN_ENVIRONMENT_PREFIX`,
    /// `PLAN_DNS_POOL`, `PLAN_DNS_PREFIX`, `PLAN_MINIMUM_SUBNET_SIZE`.
    pub fn from_env() -> Result<Self, PlannerError> {
        let mut config = Self::default();

        if let Ok(pool) = std::env::var("PLAN_ENVIRONMENT_POOL") {
            config.environment_pool = AddressRange::parse(&pool)?;
        }
        if let Ok(prefix) = std::env::var("PLAN_ENVIRONMENT_PREFIX") {
            config.environment_prefix_length = parse_number("PLAN_ENVIRONMENT_PREFIX", &prefix)?;
        }
        if let Ok(pool) = std::env::var("PLAN_DNS_POOL") {
            config.dns_pool = AddressRange::parse(&pool)?;
        }
        if let Ok(prefix) = std::env::var("PLAN_DNS_PREFIX") {
            config.dns_prefix_length = parse_number("PLAN_DNS_PREFIX", &prefix)?;
        }
        if let Ok(size) = std::env::var("PLAN_MINIMUM_SUBNET_SIZE") {
            config.minimum_subnet_size = parse_number("PLAN_MINIMUM_SUBNET_SIZE", &size)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn check_pool(label: &str, pool: &AddressRange, prefix_length: u8) -> Result<(), PlannerError> {
    if prefix_length > 32 {
        return Err(PlannerError::Config(format!(
            "{} prefix length {} exceeds 32",
            label, prefix_length
        )));
    }
    let size = block_size(prefix_length);
    if !pool.contains_aligned(size) || pool.size() % size != 0 {
        return Err(PlannerError::Config(format!(
            "{} pool {} cannot be split into /{} blocks",
            label, pool, prefix_length
        )));
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, PlannerError> {
    value
        .trim()
        .parse()
        .map_err(|_| PlannerError::Config(format!("{} is not a valid number: {}", name, value)))
}
