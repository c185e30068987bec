// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-network-planning
//!
//! Expected layouts for the built-in catalogs. Kept as literal tables so a
//! change in allocation order shows up as a readable diff.

#![allow(dead_code)]

use std::collections::BTreeMap;

/// Octet offsets (third, fourth) and prefix of every built-in subnet
pub const DEFAULT_LAYOUT: [(&str, u8, u8, u8); 15] = [
    ("application_gateway", 0, 0, 24),
    ("apt_proxy_server", 1, 0, 29),
    ("data_configuration", 1, 8, 29),
    ("data_private", 1, 16, 29),
    ("firewall", 1, 64, 26),
    ("firewall_management", 1, 128, 26),
    ("guacamole_containers", 1, 192, 29),
    ("guacamole_containers_support", 1, 200, 29),
    ("identity_containers", 1, 208, 29),
    ("monitoring", 1, 224, 27),
    ("user_services_containers", 2, 0, 29),
    ("user_services_containers_support", 2, 8, 29),
    ("user_services_databases", 2, 16, 29),
    ("user_services_software_repositories", 2, 24, 29),
    ("workspaces", 3, 0, 24),
];

/// Name to CIDR map the default planner produces for `index`
pub fn expected_layout(index: u8) -> BTreeMap<String, String> {
    DEFAULT_LAYOUT
        .iter()
        .map(|(name, third, fourth, prefix)| {
            (
                name.to_string(),
                format!("10.{}.{}.{}/{}", index, third, fourth, prefix),
            )
        })
        .collect()
}
