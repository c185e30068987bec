// Copyright (c) 2025 - Cowboy AI, Inc.
//! Rule priority bands and validated band tables

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Rule priority planning failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PriorityError {
    #[error("Band {name} is empty: lower bound {lower_bound} is not below upper bound {upper_bound}")]
    InvalidBand {
        name: String,
        lower_bound: u32,
        upper_bound: u32,
    },

    #[error("Duplicate band name: {0}")]
    DuplicateBand(String),

    #[error("Bands {first} and {second} overlap")]
    BandOverlap { first: String, second: String },

    #[error("Band {name} lies outside the permitted priorities {lower_limit}..{upper_limit}")]
    BandOutsideLimits {
        name: String,
        lower_limit: u32,
        upper_limit: u32,
    },

    #[error("Unknown band: {0}")]
    UnknownBand(String),

    #[error("Offset {offset} is outside band {band} (width {width})")]
    OffsetOutOfRange { band: String, offset: u32, width: u32 },

    #[error("Priority {priority} is already assigned to rule {existing_rule_name}")]
    PriorityCollision {
        priority: u32,
        existing_rule_name: String,
    },
}

/// Named half-open interval `[lower_bound, upper_bound)` of rule priorities
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriorityBand {
    pub name: String,
    pub lower_bound: u32,
    /// Exclusive
    pub upper_bound: u32,
}

impl PriorityBand {
    pub fn new(name: impl Into<String>, lower_bound: u32, upper_bound: u32) -> Self {
        Self {
            name: name.into(),
            lower_bound,
            upper_bound,
        }
    }

    /// Number of priorities in the band
    pub fn width(&self) -> u32 {
        self.upper_bound.saturating_sub(self.lower_bound)
    }

    pub fn contains(&self, priority: u32) -> bool {
        self.lower_bound <= priority && priority < self.upper_bound
    }

    pub fn overlaps(&self, other: &PriorityBand) -> bool {
        self.lower_bound < other.upper_bound && other.lower_bound < self.upper_bound
    }
}

impl fmt::Display for PriorityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {})", self.name, self.lower_bound, self.upper_bound)
    }
}

/// Ordered set of pairwise-disjoint priority bands
///
/// Invariants, checked at construction:
/// - Every band is non-empty
/// - Band names are unique
/// - No two bands share a priority
/// - With limits, every band lies inside them
///
/// # Examples
///
/// ```rust
/// use cim_network_planning::priority::{PriorityBand, PriorityBandTable, PriorityError};
///
/// let table = PriorityBandTable::new(vec![
///     PriorityBand::new("platform", 100, 1000),
///     PriorityBand::new("tenant", 1000, 3000),
/// ])
/// .unwrap();
/// assert_eq!(table.band("tenant").unwrap().width(), 2000);
///
/// let overlap = PriorityBandTable::new(vec![
///     PriorityBand::new("platform", 100, 1000),
///     PriorityBand::new("tenant", 999, 3000),
/// ]);
/// assert!(matches!(overlap, Err(PriorityError::BandOverlap { .. })));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityBandTable {
    bands: Vec<PriorityBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limits: Option<(u32, u32)>,
}

impl PriorityBandTable {
    pub fn new(bands: Vec<PriorityBand>) -> Result<Self, PriorityError> {
        Self::validate(&bands)?;
        Ok(Self {
            bands,
            limits: None,
        })
    }

    /// Build a table whose bands must all lie inside `[lower_limit, upper_limit)`
    ///
    /// Azure NSG rules accept priorities 100-4096, firewall rule collections
    /// 100-65000.
    pub fn with_limits(
        bands: Vec<PriorityBand>,
        lower_limit: u32,
        upper_limit: u32,
    ) -> Result<Self, PriorityError> {
        Self::validate(&bands)?;
        if let Some(outside) = bands
            .iter()
            .find(|band| band.lower_bound < lower_limit || band.upper_bound > upper_limit)
        {
            return Err(PriorityError::BandOutsideLimits {
                name: outside.name.clone(),
                lower_limit,
                upper_limit,
            });
        }
        Ok(Self {
            bands,
            limits: Some((lower_limit, upper_limit)),
        })
    }

    fn validate(bands: &[PriorityBand]) -> Result<(), PriorityError> {
        let mut names = HashSet::with_capacity(bands.len());
        for band in bands {
            if band.lower_bound >= band.upper_bound {
                return Err(PriorityError::InvalidBand {
                    name: band.name.clone(),
                    lower_bound: band.lower_bound,
                    upper_bound: band.upper_bound,
                });
            }
            if !names.insert(band.name.as_str()) {
                return Err(PriorityError::DuplicateBand(band.name.clone()));
            }
        }

        let mut sorted: Vec<&PriorityBand> = bands.iter().collect();
        sorted.sort_by_key(|band| band.lower_bound);
        for pair in sorted.windows(2) {
            if pair[0].overlaps(pair[1]) {
                return Err(PriorityError::BandOverlap {
                    first: pair[0].name.clone(),
                    second: pair[1].name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Bands in declaration order
    pub fn bands(&self) -> &[PriorityBand] {
        &self.bands
    }

    pub fn band(&self, name: &str) -> Option<&PriorityBand> {
        self.bands.iter().find(|band| band.name == name)
    }

    pub fn limits(&self) -> Option<(u32, u32)> {
        self.limits
    }

    /// Band a given absolute priority falls into
    pub fn band_for(&self, priority: u32) -> Option<&PriorityBand> {
        self.bands.iter().find(|band| band.contains(priority))
    }
}
