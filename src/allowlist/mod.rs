// Copyright (c) 2025 - Cowboy AI, Inc.
//! Domain Allow-list Composition
//!
//! Egress rules permit traffic to named categories of domains. Leaves list
//! domains, composites union other categories and aliases repeat a category
//! under a second name. [`CategoryRegistry`] validates the whole graph once so
//! that resolving any registered name afterwards cannot fail on structure.

pub mod category;
pub mod registry;

pub use category::{resolve, AllowlistError, CategoryDefinition};
pub use registry::{CategoryRegistry, CategoryRegistryBuilder, ALL_CATEGORY};
