// Copyright (c) 2025 - Cowboy AI, Inc.
//! Validated category registry

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

use super::category::{check_all, resolve, walk, AllowlistError, CategoryDefinition};
use crate::domain::Fqdn;

/// Name of the category that must cover every leaf
pub const ALL_CATEGORY: &str = "ALL";

/// Category registry whose every entry is known to resolve
///
/// # Invariants
///
/// Checked once at construction, in this order:
/// 1. Every category resolves (no unknown references, no cycles)
/// 2. No two leaves hold the same domain set; repeated content must be an alias
/// 3. `ALL` exists and is a composite
/// 4. Every leaf is reachable from `ALL`
///
/// # Examples
///
/// ```rust
/// use cim_network_planning::allowlist::CategoryRegistry;
///
/// let registry = CategoryRegistry::builder()
///     .leaf("PYTHON", ["pypi.org", "files.pythonhosted.org"])
///     .leaf("CRAN", ["cran.r-project.org"])
///     .composite("SOFTWARE_REPOSITORIES", ["PYTHON", "CRAN"])
///     .composite("ALL", ["SOFTWARE_REPOSITORIES"])
///     .build()
///     .unwrap();
///
/// assert_eq!(registry.resolve("CRAN").unwrap(), vec!["cran.r-project.org"]);
/// assert_eq!(registry.resolve("ALL").unwrap().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, CategoryDefinition>",
    into = "BTreeMap<String, CategoryDefinition>"
)]
pub struct CategoryRegistry {
    definitions: BTreeMap<String, CategoryDefinition>,
}

impl CategoryRegistry {
    pub fn new(definitions: BTreeMap<String, CategoryDefinition>) -> Result<Self, AllowlistError> {
        check_all(&definitions)?;

        let mut leaves: HashMap<&BTreeSet<Fqdn>, &str> = HashMap::new();
        for (name, definition) in &definitions {
            if let CategoryDefinition::Leaf(domains) = definition {
                if let Some(first) = leaves.insert(domains, name.as_str()) {
                    return Err(AllowlistError::DuplicateDomainSet {
                        first: first.to_string(),
                        second: name.clone(),
                    });
                }
            }
        }

        match definitions.get(ALL_CATEGORY) {
            Some(CategoryDefinition::Composite(_)) => {}
            Some(_) => {
                return Err(AllowlistError::InvalidAllCategory(
                    "ALL must be a composite category".to_string(),
                ))
            }
            None => {
                return Err(AllowlistError::InvalidAllCategory(
                    "ALL is not defined".to_string(),
                ))
            }
        }

        let mut reachable: BTreeSet<&str> = BTreeSet::new();
        walk(ALL_CATEGORY, &definitions, &mut |leaf, _| {
            reachable.insert(leaf);
        })?;
        if let Some(missing) = definitions
            .iter()
            .filter(|(_, definition)| definition.is_leaf())
            .map(|(name, _)| name)
            .find(|name| !reachable.contains(name.as_str()))
        {
            return Err(AllowlistError::MissingFromAll {
                category: missing.clone(),
            });
        }

        debug!(categories = definitions.len(), "Validated category registry");
        Ok(Self { definitions })
    }

    pub fn builder() -> CategoryRegistryBuilder {
        CategoryRegistryBuilder::default()
    }

    /// Sorted, duplicate-free domains of a category
    pub fn resolve(&self, name: &str) -> Result<Vec<String>, AllowlistError> {
        resolve(name, &self.definitions)
    }

    /// Every domain in the registry
    pub fn all_domains(&self) -> Result<Vec<String>, AllowlistError> {
        self.resolve(ALL_CATEGORY)
    }

    pub fn definition(&self, name: &str) -> Option<&CategoryDefinition> {
        self.definitions.get(name)
    }

    pub fn definitions(&self) -> &BTreeMap<String, CategoryDefinition> {
        &self.definitions
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Category names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn leaf_names(&self) -> impl Iterator<Item = &str> {
        self.definitions
            .iter()
            .filter(|(_, definition)| definition.is_leaf())
            .map(|(name, _)| name.as_str())
    }

    /// Every category resolved, keyed by name
    pub fn resolve_all(&self) -> Result<BTreeMap<String, Vec<String>>, AllowlistError> {
        self.names()
            .map(|name| -> Result<(String, Vec<String>), AllowlistError> {
                Ok((name.to_string(), self.resolve(name)?))
            })
            .collect()
    }
}

impl TryFrom<BTreeMap<String, CategoryDefinition>> for CategoryRegistry {
    type Error = AllowlistError;

    fn try_from(definitions: BTreeMap<String, CategoryDefinition>) -> Result<Self, Self::Error> {
        Self::new(definitions)
    }
}

impl From<CategoryRegistry> for BTreeMap<String, CategoryDefinition> {
    fn from(registry: CategoryRegistry) -> Self {
        registry.definitions
    }
}

/// Fluent construction of a [`CategoryRegistry`]
///
/// Errors are held until [`build`](Self::build) so definitions chain freely.
#[derive(Debug, Default)]
pub struct CategoryRegistryBuilder {
    definitions: BTreeMap<String, CategoryDefinition>,
    error: Option<AllowlistError>,
}

impl CategoryRegistryBuilder {
    pub fn leaf<I, S>(self, name: impl Into<String>, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match CategoryDefinition::leaf(domains) {
            Ok(definition) => self.define(name, definition),
            Err(error) => self.fail(error.into()),
        }
    }

    pub fn composite<I, S>(self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.define(name, CategoryDefinition::composite(members))
    }

    pub fn alias(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.define(name, CategoryDefinition::alias(target))
    }

    pub fn define(mut self, name: impl Into<String>, definition: CategoryDefinition) -> Self {
        let name = name.into();
        if self.definitions.contains_key(&name) {
            return self.fail(AllowlistError::DuplicateCategory(name));
        }
        self.definitions.insert(name, definition);
        self
    }

    fn fail(mut self, error: AllowlistError) -> Self {
        self.error.get_or_insert(error);
        self
    }

    pub fn build(self) -> Result<CategoryRegistry, AllowlistError> {
        match self.error {
            Some(error) => Err(error),
            None => CategoryRegistry::new(self.definitions),
        }
    }
}
