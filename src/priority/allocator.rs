// Copyright (c) 2025 - Cowboy AI, Inc.
//! Assigns globally unique priorities to named rules inside bands

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::band::{PriorityBand, PriorityBandTable, PriorityError};

/// One rule's absolute priority
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriorityAssignment {
    pub rule_name: String,
    pub band_name: String,
    pub priority: u32,
}

/// Priority allocator for one rule collection
///
/// Every priority handed out by an instance is unique across all of its
/// bands. Create one allocator per rule collection (one NSG, one firewall)
/// and discard it afterwards.
///
/// # Examples
///
/// ```rust
/// use cim_network_planning::priority::{PriorityBand, PriorityBandAllocator};
///
/// let mut allocator = PriorityBandAllocator::from_bands(vec![
///     PriorityBand::new("platform", 100, 1000),
///     PriorityBand::new("tenant", 1000, 3000),
/// ])
/// .unwrap();
///
/// assert_eq!(allocator.assign("platform", "AllowGatewayManager", 0).unwrap(), 100);
/// assert_eq!(allocator.assign("tenant", "AllowWorkspaces", 0).unwrap(), 1000);
/// assert!(allocator.assign("tenant", "AllowAgain", 0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PriorityBandAllocator {
    table: PriorityBandTable,
    assigned: BTreeMap<u32, PriorityAssignment>,
}

impl PriorityBandAllocator {
    pub fn new(table: PriorityBandTable) -> Self {
        Self {
            table,
            assigned: BTreeMap::new(),
        }
    }

    /// Validate `bands` into a table and wrap it
    pub fn from_bands(bands: Vec<PriorityBand>) -> Result<Self, PriorityError> {
        Ok(Self::new(PriorityBandTable::new(bands)?))
    }

    pub fn table(&self) -> &PriorityBandTable {
        &self.table
    }

    /// Assign `rule_name` the priority `offset` places above the band's lower bound
    pub fn assign(
        &mut self,
        band_name: &str,
        rule_name: impl Into<String>,
        offset: u32,
    ) -> Result<u32, PriorityError> {
        let (band, priority) = self.place(band_name, offset)?;
        self.check_free(priority)?;

        let assignment = PriorityAssignment {
            rule_name: rule_name.into(),
            band_name: band,
            priority,
        };
        self.record(assignment);
        Ok(priority)
    }

    /// Assign a list of `(band, rule, offset)` triples as one unit
    ///
    /// Every triple is checked against the bands, the existing assignments and
    /// the rest of the batch before anything is recorded. On error the
    /// allocator is left exactly as it was.
    pub fn assign_all<B, R>(
        &mut self,
        rules: impl IntoIterator<Item = (B, R, u32)>,
    ) -> Result<Vec<PriorityAssignment>, PriorityError>
    where
        B: AsRef<str>,
        R: Into<String>,
    {
        let mut batch: BTreeMap<u32, String> = BTreeMap::new();
        let mut pending = Vec::new();

        for (band, rule, offset) in rules {
            let (band_name, priority) = self.place(band.as_ref(), offset)?;
            self.check_free(priority)?;

            let rule_name = rule.into();
            if let Some(existing) = batch.get(&priority) {
                return Err(PriorityError::PriorityCollision {
                    priority,
                    existing_rule_name: existing.clone(),
                });
            }
            batch.insert(priority, rule_name.clone());
            pending.push(PriorityAssignment {
                rule_name,
                band_name,
                priority,
            });
        }

        for assignment in &pending {
            self.record(assignment.clone());
        }
        Ok(pending)
    }

    /// Band name and absolute priority for `offset`, without recording anything
    fn place(&self, band_name: &str, offset: u32) -> Result<(String, u32), PriorityError> {
        let band = self
            .table
            .band(band_name)
            .ok_or_else(|| PriorityError::UnknownBand(band_name.to_string()))?;

        let priority = band
            .lower_bound
            .checked_add(offset)
            .filter(|priority| *priority < band.upper_bound)
            .ok_or_else(|| PriorityError::OffsetOutOfRange {
                band: band.name.clone(),
                offset,
                width: band.width(),
            })?;
        Ok((band.name.clone(), priority))
    }

    fn check_free(&self, priority: u32) -> Result<(), PriorityError> {
        match self.assigned.get(&priority) {
            Some(existing) => Err(PriorityError::PriorityCollision {
                priority,
                existing_rule_name: existing.rule_name.clone(),
            }),
            None => Ok(()),
        }
    }

    fn record(&mut self, assignment: PriorityAssignment) {
        debug!(
            band = %assignment.band_name,
            rule = %assignment.rule_name,
            priority = assignment.priority,
            "Assigned rule priority"
        );
        self.assigned.insert(assignment.priority, assignment);
    }

    /// Lowest priority given to a rule
    ///
    /// Rule names are not required to be unique; a name assigned in several
    /// bands reports its lowest priority here. Use [`priorities_of`](Self::priorities_of)
    /// to see every one.
    pub fn priority_of(&self, rule_name: &str) -> Option<u32> {
        self.priorities_of(rule_name).first().copied()
    }

    /// Every priority given to a rule, ascending
    pub fn priorities_of(&self, rule_name: &str) -> Vec<u32> {
        self.assigned
            .values()
            .filter(|assignment| assignment.rule_name == rule_name)
            .map(|assignment| assignment.priority)
            .collect()
    }

    /// Every assignment so far, ordered by priority
    pub fn assignments(&self) -> Vec<PriorityAssignment> {
        self.assigned.values().cloned().collect()
    }
}
