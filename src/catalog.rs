// Copyright (c) 2025 - Cowboy AI, Inc.
//! Built-in Catalogs
//!
//! The subnet layout, rule priority bands and domain categories a secure
//! research environment is deployed with. Every function builds a fresh,
//! validated value; nothing here is global or mutable.
//!
//! The subnet catalog order is a versioning contract: appending a subnet is
//! safe, reordering or inserting moves every later subnet of every deployed
//! environment.

use serde::Serialize;

use crate::allocator::{AllocationError, SubnetCatalog};
use crate::allowlist::{AllowlistError, CategoryRegistry};
use crate::priority::{PriorityBand, PriorityBandAllocator, PriorityBandTable, PriorityError};

/// Subnets of one tenant environment, in allocation order
///
/// # Examples
///
/// ```rust
/// use cim_network_planning::catalog::environment_subnet_catalog;
///
/// let catalog = environment_subnet_catalog().unwrap();
/// assert_eq!(catalog.len(), 15);
/// assert_eq!(catalog.requests()[0].name, "application_gateway");
/// ```
pub fn environment_subnet_catalog() -> Result<SubnetCatalog, AllocationError> {
    SubnetCatalog::builder()
        .subnet("application_gateway", 256)
        .subnet("apt_proxy_server", 8)
        .subnet("data_configuration", 8)
        .subnet("data_private", 8)
        .subnet("firewall", 64)
        .subnet("firewall_management", 64)
        .subnet("guacamole_containers", 8)
        .subnet("guacamole_containers_support", 8)
        .subnet("identity_containers", 8)
        .subnet("monitoring", 32)
        .subnet("user_services_containers", 8)
        .subnet("user_services_containers_support", 8)
        .subnet("user_services_databases", 8)
        .subnet("user_services_software_repositories", 8)
        .subnet("workspaces", 256)
        .build()
}

/// A named rule and its offset inside a band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleOffset {
    pub band: &'static str,
    pub rule: &'static str,
    pub offset: u32,
}

const fn rule(band: &'static str, rule: &'static str, offset: u32) -> RuleOffset {
    RuleOffset { band, rule, offset }
}

/// Lowest and one past the highest priority a network security group accepts
pub const NSG_PRIORITY_LIMITS: (u32, u32) = (100, 4097);

/// Lowest and one past the highest priority a firewall rule collection accepts
pub const FIREWALL_PRIORITY_LIMITS: (u32, u32) = (100, 65001);

/// Network security group bands
pub fn networking_band_table() -> Result<PriorityBandTable, PriorityError> {
    PriorityBandTable::with_limits(
        vec![
            PriorityBand::new("azure_services", 100, 1000),
            PriorityBand::new("shm_connections", 1000, 1300),
            PriorityBand::new("dns_connections", 1400, 1500),
            PriorityBand::new("sre_connections", 1500, 3000),
            PriorityBand::new("authorised_external", 3000, 3500),
            PriorityBand::new("internet", 3500, 4000),
            PriorityBand::new("deny_all", 4096, 4097),
        ],
        NSG_PRIORITY_LIMITS.0,
        NSG_PRIORITY_LIMITS.1,
    )
}

/// Network security group rules, each placed in a band of [`networking_band_table`]
pub fn networking_rule_offsets() -> Vec<RuleOffset> {
    vec![
        rule("azure_services", "AZURE_GATEWAY_MANAGER", 0),
        rule("azure_services", "AZURE_LOAD_BALANCER", 100),
        rule("azure_services", "AZURE_PLATFORM_DNS", 200),
        rule("shm_connections", "INTERNAL_SELF", 0),
        rule("shm_connections", "INTERNAL_SHM_MONITORING_TOOLS", 100),
        rule("dns_connections", "INTERNAL_SRE_DNS_SERVERS", 0),
        rule("sre_connections", "INTERNAL_SRE_APPLICATION_GATEWAY", 0),
        rule("sre_connections", "INTERNAL_SRE_APT_PROXY_SERVER", 100),
        rule("sre_connections", "INTERNAL_SRE_DATA_CONFIGURATION", 200),
        rule("sre_connections", "INTERNAL_SRE_DATA_PRIVATE", 300),
        rule("sre_connections", "INTERNAL_SRE_GUACAMOLE_CONTAINERS", 400),
        rule("sre_connections", "INTERNAL_SRE_GUACAMOLE_CONTAINERS_SUPPORT", 500),
        rule("sre_connections", "INTERNAL_SRE_IDENTITY_CONTAINERS", 600),
        rule("sre_connections", "INTERNAL_SRE_USER_SERVICES_CONTAINERS", 700),
        rule("sre_connections", "INTERNAL_SRE_USER_SERVICES_CONTAINERS_SUPPORT", 800),
        rule("sre_connections", "INTERNAL_SRE_USER_SERVICES_DATABASES", 900),
        rule("sre_connections", "INTERNAL_SRE_USER_SERVICES_SOFTWARE_REPOSITORIES", 1000),
        rule("sre_connections", "INTERNAL_SRE_WORKSPACES", 1100),
        rule("sre_connections", "INTERNAL_SRE_ANY", 1499),
        rule("authorised_external", "AUTHORISED_EXTERNAL_USER_IPS", 100),
        rule("authorised_external", "AUTHORISED_EXTERNAL_SSL_LABS_IPS", 200),
        rule("internet", "EXTERNAL_LINUX_UPDATES", 100),
        rule("internet", "EXTERNAL_INTERNET", 499),
        rule("deny_all", "ALL_OTHER", 0),
    ]
}

/// Firewall rule collection bands
pub fn firewall_band_table() -> Result<PriorityBandTable, PriorityError> {
    PriorityBandTable::with_limits(
        vec![
            PriorityBand::new("all_sources", 1000, 1100),
            PriorityBand::new("shm_sources", 2000, 3000),
            PriorityBand::new("sre_sources", 3000, 4000),
        ],
        FIREWALL_PRIORITY_LIMITS.0,
        FIREWALL_PRIORITY_LIMITS.1,
    )
}

/// Firewall rule collections, each placed in a band of [`firewall_band_table`]
pub fn firewall_rule_offsets() -> Vec<RuleOffset> {
    vec![
        rule("all_sources", "ALL", 0),
        rule("shm_sources", "SHM_IDENTITY_SERVERS", 0),
        rule("sre_sources", "SRE_APT_PROXY_SERVER", 0),
        rule("sre_sources", "SRE_GUACAMOLE_CONTAINERS", 100),
        rule("sre_sources", "SRE_IDENTITY_CONTAINERS", 200),
        rule("sre_sources", "SRE_USER_SERVICES_SOFTWARE_REPOSITORIES", 300),
        rule("sre_sources", "SRE_WORKSPACES", 400),
    ]
}

/// Allocator over `table` with every rule of `rules` already assigned
///
/// # Examples
///
/// ```rust
/// use cim_network_planning::catalog::{networking_band_table, networking_rule_offsets, assign_rules};
///
/// let allocator = assign_rules(networking_band_table().unwrap(), &networking_rule_offsets()).unwrap();
/// assert_eq!(allocator.priority_of("INTERNAL_SRE_WORKSPACES"), Some(2600));
/// assert_eq!(allocator.priority_of("ALL_OTHER"), Some(4096));
/// ```
pub fn assign_rules(
    table: PriorityBandTable,
    rules: &[RuleOffset],
) -> Result<PriorityBandAllocator, PriorityError> {
    let mut allocator = PriorityBandAllocator::new(table);
    allocator.assign_all(rules.iter().map(|rule| (rule.band, rule.rule, rule.offset)))?;
    Ok(allocator)
}

/// Private DNS zones Azure services resolve through
pub fn azure_dns_zone_registry() -> Result<CategoryRegistry, AllowlistError> {
    CategoryRegistry::builder()
        .leaf("AZURE_AUTOMATION", ["azure-automation.net"])
        .leaf(
            "AZURE_MONITOR",
            [
                "agentsvc.azure-automation.net",
                "blob.core.windows.net",
                "monitor.azure.com",
                "ods.opinsights.azure.com",
                "oms.opinsights.azure.com",
            ],
        )
        .leaf(
            "STORAGE_ACCOUNT",
            ["blob.core.windows.net", "file.core.windows.net"],
        )
        .composite("ALL", ["AZURE_AUTOMATION", "AZURE_MONITOR", "STORAGE_ACCOUNT"])
        .build()
}

/// Domains workloads may reach through the firewall
pub fn permitted_domain_registry() -> Result<CategoryRegistry, AllowlistError> {
    let azure_dns_zones = azure_dns_zone_registry()?.all_domains()?;

    CategoryRegistry::builder()
        .leaf(
            "APT_REPOSITORIES",
            [
                "archive.ubuntu.com",
                "azure.archive.ubuntu.com",
                "changelogs.ubuntu.com",
                "cloudapp.azure.com",
                "deb.debian.org",
                "packages.microsoft.com",
                "security.ubuntu.com",
            ],
        )
        .leaf("AZURE_DNS_ZONES", azure_dns_zones)
        .leaf(
            "CLAMAV_UPDATES",
            [
                "clamav.net",
                "current.cvd.clamav.net",
                "database.clamav.net.cdn.cloudflare.net",
                "database.clamav.net",
            ],
        )
        .leaf("MICROSOFT_GRAPH_API", ["graph.microsoft.com"])
        .leaf("MICROSOFT_LOGIN", ["login.microsoftonline.com"])
        .composite("MICROSOFT_IDENTITY", ["MICROSOFT_GRAPH_API", "MICROSOFT_LOGIN"])
        .leaf(
            "SOFTWARE_REPOSITORIES_PYTHON",
            ["files.pythonhosted.org", "pypi.org"],
        )
        .leaf("SOFTWARE_REPOSITORIES_R", ["cran.r-project.org"])
        .composite(
            "SOFTWARE_REPOSITORIES",
            ["SOFTWARE_REPOSITORIES_PYTHON", "SOFTWARE_REPOSITORIES_R"],
        )
        .leaf(
            "TIME_SERVERS",
            [
                "time.google.com",
                "time1.google.com",
                "time2.google.com",
                "time3.google.com",
                "time4.google.com",
            ],
        )
        .leaf("UBUNTU_KEYSERVER", ["keyserver.ubuntu.com"])
        .composite(
            "ALL",
            [
                "APT_REPOSITORIES",
                "AZURE_DNS_ZONES",
                "CLAMAV_UPDATES",
                "MICROSOFT_IDENTITY",
                "SOFTWARE_REPOSITORIES",
                "TIME_SERVERS",
                "UBUNTU_KEYSERVER",
            ],
        )
        .build()
}
