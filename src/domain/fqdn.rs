// Copyright (c) 2025 - Cowboy AI, Inc.
//! Domain Name Value Object for Outbound Allow-Lists

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Domain name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FqdnError {
    #[error("Domain name is empty")]
    Empty,

    #[error("Domain name exceeds maximum length of 253 characters: {0}")]
    TooLong(usize),

    #[error("Empty label in domain name: {0}")]
    EmptyLabel(String),

    #[error("Label exceeds maximum length of 63 characters: {0}")]
    LabelTooLong(String),

    #[error("Invalid character {character:?} in domain name {domain}")]
    InvalidCharacter { domain: String, character: char },

    #[error("Label cannot start or end with hyphen: {0}")]
    InvalidLabelFormat(String),

    #[error("Top-level label cannot be all numeric: {0}")]
    NumericTopLevel(String),

    #[error("Wildcard is only allowed as the whole leftmost label: {0}")]
    MisplacedWildcard(String),
}

/// Permitted outbound domain name
///
/// Stored in canonical form: lower case, no trailing dot. Ordering is plain
/// lexicographic ordering of that form, which is what makes resolved
/// allow-lists byte-identical across runs.
///
/// Invariants:
/// - Total length ≤ 253 characters
/// - Each label 1-63 characters of `[a-z0-9-]`, no leading or trailing hyphen
/// - Top-level label not all numeric
/// - `*` only as a complete leftmost label (`*.blob.core.windows.net`)
///
/// # Examples
///
/// ```rust
/// use cim_network_planning::domain::Fqdn;
///
/// let domain = Fqdn::new("Graph.Microsoft.com.").unwrap();
/// assert_eq!(domain.as_str(), "graph.microsoft.com");
/// assert!(Fqdn::new("bad_domain.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fqdn(String);

impl Fqdn {
    pub const MAX_LENGTH: usize = 253;

    pub const MAX_LABEL_LENGTH: usize = 63;

    /// Validate and canonicalise a domain name
    pub fn new(domain: impl AsRef<str>) -> Result<Self, FqdnError> {
        let trimmed = domain.as_ref().trim();
        let canonical = trimmed.strip_suffix('.').unwrap_or(trimmed).to_ascii_lowercase();

        if canonical.is_empty() {
            return Err(FqdnError::Empty);
        }
        if canonical.len() > Self::MAX_LENGTH {
            return Err(FqdnError::TooLong(canonical.len()));
        }

        let labels: Vec<&str> = canonical.split('.').collect();
        for (position, label) in labels.iter().enumerate() {
            if *label == "*" {
                if position != 0 || labels.len() < 2 {
                    return Err(FqdnError::MisplacedWildcard(canonical.clone()));
                }
                continue;
            }
            Self::validate_label(label, &canonical)?;
        }

        if let Some(tld) = labels.last() {
            if tld.chars().all(|c| c.is_ascii_digit()) {
                return Err(FqdnError::NumericTopLevel(canonical.clone()));
            }
        }

        Ok(Self(canonical))
    }

    fn validate_label(label: &str, domain: &str) -> Result<(), FqdnError> {
        if label.is_empty() {
            return Err(FqdnError::EmptyLabel(domain.to_string()));
        }
        if label.len() > Self::MAX_LABEL_LENGTH {
            return Err(FqdnError::LabelTooLong(label.to_string()));
        }
        if let Some(character) = label
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
        {
            let error = if character == '*' {
                FqdnError::MisplacedWildcard(domain.to_string())
            } else {
                FqdnError::InvalidCharacter {
                    domain: domain.to_string(),
                    character,
                }
            };
            return Err(error);
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(FqdnError::InvalidLabelFormat(label.to_string()));
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.0.starts_with("*.")
    }

    /// Parent domain (everything after the leftmost label)
    pub fn parent(&self) -> Option<&str> {
        self.0.split_once('.').map(|(_, parent)| parent)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Fqdn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fqdn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Fqdn {
    type Err = FqdnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Fqdn {
    type Error = FqdnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Fqdn {
    type Error = FqdnError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Fqdn> for String {
    fn from(domain: Fqdn) -> Self {
        domain.0
    }
}
