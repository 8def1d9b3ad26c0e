//! The schema registry: a static, version-parametric catalog of TLV and sub-TLV definitions.
//!
//! The registry is built once behind a [once_cell::sync::Lazy]. Once built the tables are
//! read-only and require no synchronization.

mod docsis;
mod packetcable;

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::value::ValueKind;
use crate::version::{DocsisVersion, PacketCableVersion};

/// The version family a [SchemaEntry] was introduced in, and the minimum version within that
/// family at which it is valid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IntroducedVersion {
    /// Valid at every version in both families (used for the generic vendor/unknown fallback
    /// entries, which carry no version-specific meaning).
    Always,
    Docsis(DocsisVersion),
    PacketCable(PacketCableVersion),
}

/// A version context to check a [SchemaEntry] against. Top-level DOCSIS lookups use
/// `Docsis`; sub-TLVs nested under the PacketCable MTA TLVs (64-85) use `PacketCable`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LookupVersion {
    Docsis(DocsisVersion),
    PacketCable(PacketCableVersion),
}

/// Which static table a compound TLV's sub-TLVs live in.
#[derive(Clone, Copy)]
pub enum SubtlvSchema {
    Docsis(&'static [SchemaEntry]),
    PacketCable(&'static [SchemaEntry]),
}

/// A schema entry: the registry's answer for a single `(type, version)` or
/// `(parent_type, subtype, version)` query.
#[derive(Clone)]
pub struct SchemaEntry {
    pub type_code: u16,
    pub name: &'static str,
    pub description: &'static str,
    pub introduced: IntroducedVersion,
    pub value_kind: ValueKind,
    pub max_length: usize,
    /// `(code, display name)` pairs, present when `value_kind` is `Enum`.
    pub enum_table: Option<&'static [(u32, &'static str)]>,
    pub subtlv_schema: Option<SubtlvSchema>,
    /// DOCSIS versions at which this TLV is mandatory at top level.
    pub required_in: &'static [DocsisVersion],
}

impl SchemaEntry {
    pub fn is_compound(&self) -> bool {
        matches!(self.value_kind, ValueKind::Compound) || matches!(self.value_kind, ValueKind::Vendor)
    }

    /// `true` if the entry is valid to use at the given lookup version, i.e. the lookup version
    /// is at or after the entry's `introduced` version, within the same version family.
    pub fn valid_at(&self, version: LookupVersion) -> bool {
        match (self.introduced, version) {
            (IntroducedVersion::Always, _) => true,
            (IntroducedVersion::Docsis(v), LookupVersion::Docsis(c)) => c >= v,
            (IntroducedVersion::PacketCable(v), LookupVersion::PacketCable(c)) => c >= v,
            _ => false,
        }
    }

    pub fn enum_map(&self) -> Option<crate::value::EnumMap> {
        self.enum_table.map(|pairs| crate::value::EnumMap::from_pairs(pairs))
    }
}

/// Generic fallback entry used for any type in 1..=85 that has no curated entry, and the
/// blanket vendor entries for 200..=255: value_kind vendor, compound-by-default unless the
/// inner bytes fail to parse as nested TLVs.
fn generic_entry(type_code: u16, vendor_range: bool) -> SchemaEntry {
    let name: &'static str = Box::leak(format!("Type {type_code}").into_boxed_str());
    let description: &'static str =
        Box::leak(format!("Unclassified TLV type {type_code}").into_boxed_str());
    SchemaEntry {
        type_code,
        name,
        description,
        introduced: IntroducedVersion::Always,
        value_kind: if vendor_range {
            ValueKind::Vendor
        } else {
            ValueKind::Binary
        },
        max_length: crate::types::MAX_EXTENDED_LENGTH,
        enum_table: None,
        subtlv_schema: None,
        required_in: &[],
    }
}

struct Registry {
    top: HashMap<u16, SchemaEntry>,
}

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let mut top = HashMap::new();
    for entry in docsis::DOCSIS_TOP.iter().cloned() {
        top.insert(entry.type_code, entry);
    }
    for entry in packetcable::PACKETCABLE_TOP_65_85.iter().cloned() {
        top.entry(entry.type_code).or_insert(entry);
    }
    // Fill the rest of 1..=85 with generic fallback entries so the registry never returns
    // NotFound inside the documented DOCSIS range.
    for type_code in 1u16..=85 {
        top.entry(type_code).or_insert_with(|| generic_entry(type_code, false));
    }
    // Vendor-specific blanket range.
    for type_code in 200u16..=255 {
        top.entry(type_code).or_insert_with(|| generic_entry(type_code, true));
    }
    Registry { top }
});

/// Look up the schema entry governing a top-level TLV type at a given DOCSIS version.
///
/// Returns `None` if the type is outside the registry's known ranges or was introduced after
/// `version`. Unknown types within 1..=85 and 200..=255 still resolve (to a generic fallback
/// entry); truly unrecognized types (e.g. 86..=199, 0) return `None` and callers must treat
/// the value as opaque binary.
pub fn lookup_top(type_code: u8, version: DocsisVersion) -> Option<&'static SchemaEntry> {
    let entry = REGISTRY.top.get(&(type_code as u16))?;
    entry.valid_at(LookupVersion::Docsis(version)).then(|| entry)
}

/// Look up the schema entry for a sub-TLV of a compound TLV.
pub fn lookup_sub(
    parent_type: u8,
    subtype: u8,
    version: LookupVersion,
) -> Option<&'static SchemaEntry> {
    let parent = REGISTRY.top.get(&(parent_type as u16))?;
    let table = match parent.subtlv_schema? {
        SubtlvSchema::Docsis(t) => t,
        SubtlvSchema::PacketCable(t) => t,
    };
    table
        .iter()
        .find(|e| e.type_code == subtype as u16 && e.valid_at(version))
}

/// All top-level types known to be valid at the given version.
pub fn supported_types(version: DocsisVersion) -> Vec<u8> {
    let mut types: Vec<u8> = REGISTRY
        .top
        .values()
        .filter(|e| e.valid_at(LookupVersion::Docsis(version)))
        .map(|e| e.type_code as u8)
        .collect();
    types.sort_unstable();
    types
}

pub fn is_valid_type(type_code: u8, version: DocsisVersion) -> bool {
    lookup_top(type_code, version).is_some()
}

pub fn is_compound(type_code: u8, version: DocsisVersion) -> bool {
    lookup_top(type_code, version)
        .map(|e| e.is_compound())
        .unwrap_or(false)
}

/// Required top-level TLVs for a given DOCSIS version.
pub fn required_types(version: DocsisVersion) -> Vec<u8> {
    let mut types: Vec<u8> = REGISTRY
        .top
        .values()
        .filter(|e| e.required_in.contains(&version))
        .map(|e| e.type_code as u8)
        .collect();
    types.sort_unstable();
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_types_in_the_documented_range_still_resolve() {
        // TLV 50 has no curated entry but must still resolve within 1..=85.
        assert!(lookup_top(50, DocsisVersion::V3_1).is_some());
    }

    #[test]
    fn vendor_range_blanket_entries_resolve() {
        let entry = lookup_top(201, DocsisVersion::V3_1).unwrap();
        assert!(matches!(entry.value_kind, ValueKind::Vendor));
    }

    #[test]
    fn types_outside_the_documented_range_are_not_found() {
        assert!(lookup_top(150, DocsisVersion::V3_1).is_none());
    }

    #[test]
    fn version_gating_is_monotonic() {
        // TLV 62 (OFDM profile) is a DOCSIS 3.1 addition.
        assert!(lookup_top(62, DocsisVersion::V3_0).is_none());
        assert!(lookup_top(62, DocsisVersion::V3_1).is_some());
    }

    #[test]
    fn network_access_control_is_required_from_docsis_1_0() {
        for v in DocsisVersion::ALL {
            assert!(required_types(v).contains(&3));
        }
    }
}
