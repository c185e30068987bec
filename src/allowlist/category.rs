// Copyright (c) 2025 - Cowboy AI, Inc.
//! Domain categories and depth-first resolution into flat allow-lists

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::domain::{Fqdn, FqdnError};

/// Allow-list composition failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllowlistError {
    #[error("Cyclic category reference: {}", .path.join(" -> "))]
    CyclicCategory { path: Vec<String> },

    #[error("Unknown category {name}{}", .referenced_by.as_ref().map(|parent| format!(" referenced by {}", parent)).unwrap_or_default())]
    UnknownCategory {
        name: String,
        referenced_by: Option<String>,
    },

    #[error("Duplicate category name: {0}")]
    DuplicateCategory(String),

    #[error("Leaf categories {first} and {second} have identical domains; declare one as an alias")]
    DuplicateDomainSet { first: String, second: String },

    #[error("Invalid ALL category: {0}")]
    InvalidAllCategory(String),

    #[error("Leaf category {category} is not reachable from ALL")]
    MissingFromAll { category: String },

    #[error(transparent)]
    InvalidDomain(#[from] FqdnError),
}

/// Definition of one named category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryDefinition {
    /// A literal set of domains
    Leaf(BTreeSet<Fqdn>),
    /// Union of other categories
    Composite(BTreeSet<String>),
    /// Same domains as another category, declared on purpose
    Alias(String),
}

impl CategoryDefinition {
    /// Leaf from domain strings, validating each one
    pub fn leaf<I, S>(domains: I) -> Result<Self, FqdnError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .map(Fqdn::new)
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self::Leaf(domains))
    }

    pub fn composite<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Composite(members.into_iter().map(Into::into).collect())
    }

    pub fn alias(target: impl Into<String>) -> Self {
        Self::Alias(target.into())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }
}

/// Resolve a category into a sorted, duplicate-free list of domains
///
/// Composites and aliases are followed depth-first. A reference back onto
/// the current path fails with [`AllowlistError::CyclicCategory`] instead of
/// looping.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use cim_network_planning::allowlist::{resolve, CategoryDefinition};
///
/// let mut registry = BTreeMap::new();
/// registry.insert("LOGIN".to_string(), CategoryDefinition::leaf(["login.microsoftonline.com"]).unwrap());
/// registry.insert("GRAPH".to_string(), CategoryDefinition::leaf(["graph.microsoft.com"]).unwrap());
/// registry.insert("IDENTITY".to_string(), CategoryDefinition::composite(["LOGIN", "GRAPH"]));
///
/// assert_eq!(
///     resolve("IDENTITY", &registry).unwrap(),
///     vec!["graph.microsoft.com", "login.microsoftonline.com"]
/// );
/// ```
pub fn resolve(
    name: &str,
    registry: &BTreeMap<String, CategoryDefinition>,
) -> Result<Vec<String>, AllowlistError> {
    let mut domains: BTreeSet<&Fqdn> = BTreeSet::new();
    walk(name, registry, &mut |_, leaf| domains.extend(leaf.iter()))?;
    Ok(domains.into_iter().map(|domain| domain.as_str().to_string()).collect())
}

/// Depth-first walk calling `visit` once with every leaf reachable from `name`
pub(crate) fn walk<'a>(
    name: &str,
    registry: &'a BTreeMap<String, CategoryDefinition>,
    visit: &mut dyn FnMut(&'a str, &'a BTreeSet<Fqdn>),
) -> Result<(), AllowlistError> {
    let mut walker = Walker::new(registry);
    walker.walk_from(name, visit)
}

/// Check that every category in `registry` resolves
///
/// Shares one record of expanded categories across all roots, so the whole
/// registry is checked in time linear in categories plus references.
pub(crate) fn check_all(registry: &BTreeMap<String, CategoryDefinition>) -> Result<(), AllowlistError> {
    let mut walker = Walker::new(registry);
    for name in registry.keys() {
        walker.walk_from(name, &mut |_, _| {})?;
    }
    Ok(())
}

struct Walker<'a> {
    registry: &'a BTreeMap<String, CategoryDefinition>,
    // categories on the current branch, for cycle reporting
    path: Vec<&'a str>,
    // categories fully expanded already; never walked twice
    done: BTreeSet<&'a str>,
}

impl<'a> Walker<'a> {
    fn new(registry: &'a BTreeMap<String, CategoryDefinition>) -> Self {
        Self {
            registry,
            path: Vec::new(),
            done: BTreeSet::new(),
        }
    }

    fn walk_from(
        &mut self,
        name: &str,
        visit: &mut dyn FnMut(&'a str, &'a BTreeSet<Fqdn>),
    ) -> Result<(), AllowlistError> {
        if self.done.contains(name) {
            return Ok(());
        }
        if let Some(start) = self.path.iter().position(|visited| *visited == name) {
            let mut cycle: Vec<String> = self.path[start..].iter().map(|s| s.to_string()).collect();
            cycle.push(name.to_string());
            return Err(AllowlistError::CyclicCategory { path: cycle });
        }

        let registry = self.registry;
        let (key, definition) =
            registry
                .get_key_value(name)
                .ok_or_else(|| AllowlistError::UnknownCategory {
                    name: name.to_string(),
                    referenced_by: self.path.last().map(|parent| parent.to_string()),
                })?;

        self.path.push(key.as_str());
        match definition {
            CategoryDefinition::Leaf(domains) => visit(key.as_str(), domains),
            CategoryDefinition::Composite(members) => {
                for member in members {
                    self.walk_from(member, visit)?;
                }
            }
            CategoryDefinition::Alias(target) => self.walk_from(target, visit)?,
        }
        self.path.pop();
        self.done.insert(key.as_str());
        Ok(())
    }
}
