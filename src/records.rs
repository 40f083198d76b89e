// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS resource record types
//!
//! This module holds the records flowing between the control file and mmcmd:
//! - Records to add, with a fully qualified owner
//! - Deletion keys, where an empty type or data matches anything
//! - Records reported by `print -l <zone>`

use crate::names::{self, QualifiedName};
use crate::types::NameError;

/// A record to append to a zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionRecord {
    /// Fully qualified zone name
    pub zone: String,
    /// Fully qualified owner name
    pub owner: String,
    pub rtype: String,
    pub rdata: String,
}

impl AdditionRecord {
    /// Build a record from control-file fields, qualifying zone and owner
    pub fn new(zone: &str, owner: &str, rtype: &str, rdata: &str) -> Result<Self, NameError> {
        let QualifiedName { zone, owner } = names::qualify(zone, owner)?;
        Ok(Self {
            zone,
            owner,
            rtype: rtype.to_string(),
            rdata: rdata.to_string(),
        })
    }

    /// Resource record text as mmcmd expects it: "<owner> <type> <data>"
    pub fn to_rr(&self) -> String {
        format!("{} {} {}", self.owner, self.rtype, self.rdata)
    }
}

/// Which records to remove from a zone
///
/// The owner is kept as written in the control file because mmcmd reports
/// owners relative to the zone. Empty `rtype` and `rdata` match any record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionKey {
    /// Fully qualified zone name
    pub zone: String,
    pub owner: String,
    pub rtype: String,
    pub rdata: String,
}

impl DeletionKey {
    /// Key removing every record of an owner
    pub fn owner(zone: &str, owner: &str) -> Result<Self, NameError> {
        Self::new(zone, owner, "", "")
    }

    /// Key removing records of an owner with the given type and data
    pub fn new(zone: &str, owner: &str, rtype: &str, rdata: &str) -> Result<Self, NameError> {
        // qualification validates both names even though only the zone is kept
        let QualifiedName { zone, .. } = names::qualify(zone, owner)?;
        Ok(Self {
            zone,
            owner: owner.to_string(),
            rtype: rtype.to_string(),
            rdata: rdata.to_string(),
        })
    }

    /// Whether a record reported by mmcmd falls under this key
    ///
    /// Owners compare after apex resolution on both sides; all comparisons
    /// are exact and case-sensitive.
    pub fn matches(&self, record: &BackendRecord) -> bool {
        let key_owner = names::resolve_apex(&self.owner, &self.zone);
        let record_owner = names::resolve_apex(&record.owner, &self.zone);

        record_owner == key_owner
            && (self.rtype.is_empty() || record.rtype == self.rtype)
            && (self.rdata.is_empty() || record.rdata == self.rdata)
    }

    /// Select the records this key removes
    pub fn select<'a>(
        &'a self,
        records: &'a [BackendRecord],
    ) -> impl Iterator<Item = &'a BackendRecord> {
        records.iter().filter(move |r| self.matches(r))
    }
}

/// One record line of a `print -l <zone>` reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRecord {
    /// mmcmd-assigned position, only meaningful for `del`
    pub index: String,
    pub owner: String,
    pub ttl: String,
    pub class: String,
    pub rtype: String,
    /// Record data with whitespace runs collapsed
    pub rdata: String,
}

impl BackendRecord {
    /// "<owner> <type> <data>" with the apex resolved, for log messages
    pub fn describe(&self, zone_fqdn: &str) -> String {
        format!(
            "{} {} {}",
            names::resolve_apex(&self.owner, zone_fqdn),
            self.rtype,
            self.rdata
        )
    }
}
