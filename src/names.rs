// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone and owner name qualification
//!
//! Every name handed to mmcmd is fully qualified. The owner token `@` is the
//! zone apex and resolves to the zone name itself.

use crate::types::NameError;

/// Owner token denoting the zone apex
pub const APEX: &str = "@";

/// A zone and owner pair, both fully qualified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub zone: String,
    pub owner: String,
}

/// Append the root label if the name is relative
pub fn qualify_zone(zone: &str) -> Result<String, NameError> {
    if zone.is_empty() {
        return Err(NameError::EmptyZone);
    }
    if zone.ends_with('.') {
        Ok(zone.to_string())
    } else {
        Ok(format!("{}.", zone))
    }
}

/// Qualify a zone and an owner relative to that zone
///
/// # Examples
///
/// ```rust
/// use mmbatch::names::qualify;
///
/// let name = qualify("example.com", "www").unwrap();
/// assert_eq!(name.zone, "example.com.");
/// assert_eq!(name.owner, "www.example.com.");
///
/// let apex = qualify("example.net.", "@").unwrap();
/// assert_eq!(apex.owner, "example.net.");
/// ```
pub fn qualify(zone: &str, owner: &str) -> Result<QualifiedName, NameError> {
    let zone = qualify_zone(zone)?;
    let owner = if owner.is_empty() {
        return Err(NameError::EmptyOwner);
    } else if owner == APEX {
        zone.clone()
    } else if owner.ends_with('.') {
        owner.to_string()
    } else {
        format!("{}.{}", owner, zone)
    };

    Ok(QualifiedName { zone, owner })
}

/// Substitute the zone name for the apex token, leaving other owners as they are
///
/// Applied to both the deletion key and every owner reported by mmcmd so the
/// two sides compare on equal terms.
pub fn resolve_apex<'a>(owner: &'a str, zone_fqdn: &'a str) -> &'a str {
    if owner == APEX {
        zone_fqdn
    } else {
        owner
    }
}
