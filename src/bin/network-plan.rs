// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Plan Driver
//!
//! Plans one environment with the built-in catalogs and prints the result as
//! JSON: the address plan, NSG and firewall rule priorities, and the permitted
//! outbound domains per category.
//!
//! Run with: cargo run --bin network-plan
//!
//! Environment:
//! - `PLAN_ENVIRONMENT_INDEX` - environment to plan (default: 1)
//! - `PLAN_*` planner overrides, see `PlannerConfig::from_env`
//! - `RUST_LOG` - log filter, logs go to stderr

use anyhow::{Context, Result};
use cim_network_planning::{
    catalog,
    config::PlannerConfig,
    planner::{EnvironmentAddressPlanner, EnvironmentPlan},
    priority::PriorityAssignment,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Everything the provisioning layer needs for one environment
#[derive(Debug, Serialize)]
struct NetworkPlanReport {
    environment: EnvironmentPlan,
    management_range: String,
    networking_priorities: Vec<PriorityAssignment>,
    firewall_priorities: Vec<PriorityAssignment>,
    permitted_domains: BTreeMap<String, Vec<String>>,
}

fn environment_index() -> Result<u32> {
    match std::env::var("PLAN_ENVIRONMENT_INDEX") {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("PLAN_ENVIRONMENT_INDEX is not a valid index: {}", value)),
        Err(_) => Ok(1),
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let index = environment_index()?;
    let config = PlannerConfig::from_env().context("Invalid planner configuration")?;
    info!(
        environment_pool = %config.environment_pool,
        dns_pool = %config.dns_pool,
        "Configuration loaded"
    );

    let planner = EnvironmentAddressPlanner::new(config).context("Failed to create planner")?;
    let subnets = catalog::environment_subnet_catalog().context("Invalid subnet catalog")?;
    let environment = planner
        .plan(index, &subnets)
        .with_context(|| format!("Failed to plan environment {}", index))?;
    info!(
        environment = index,
        address_space = %environment.address_space(),
        subnets = environment.allocations().len(),
        "Planned environment"
    );

    let networking = catalog::assign_rules(
        catalog::networking_band_table().context("Invalid NSG band table")?,
        &catalog::networking_rule_offsets(),
    )
    .context("Failed to assign NSG rule priorities")?;
    let firewall = catalog::assign_rules(
        catalog::firewall_band_table().context("Invalid firewall band table")?,
        &catalog::firewall_rule_offsets(),
    )
    .context("Failed to assign firewall rule priorities")?;
    info!(
        nsg_rules = networking.assignments().len(),
        firewall_rules = firewall.assignments().len(),
        "Assigned rule priorities"
    );

    let permitted_domains = catalog::permitted_domain_registry()
        .context("Invalid permitted domain registry")?
        .resolve_all()
        .context("Failed to resolve permitted domains")?;

    let report = NetworkPlanReport {
        environment,
        management_range: planner.management_range().to_string(),
        networking_priorities: networking.assignments(),
        firewall_priorities: firewall.assignments(),
        permitted_domains,
    };

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize plan")?;
    println!("{}", json);
    Ok(())
}
