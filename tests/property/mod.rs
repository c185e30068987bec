// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! This module contains property-based tests using proptest to verify the
//! determinism and collision-freedom guarantees of network planning.

mod address_properties;
mod allowlist_properties;
mod priority_properties;
