//! PacketCable MTA configuration TLVs, carried as DOCSIS top-level TLV types 64-85.
//!
//! The top-level entries themselves are gated by [crate::version::DocsisVersion] like any other
//! DOCSIS TLV (a CMTS needs a DOCSIS-capable config parser to see them at all); their *sub-TLVs*
//! are gated by [crate::version::PacketCableVersion] instead, since that is the dimension that
//! actually changes the MTA provisioning object model from one PacketCable release to the next.
//! `lookup_sub` accepts a [super::LookupVersion::PacketCable] context for exactly this reason.

use super::{IntroducedVersion, SchemaEntry, SubtlvSchema};
use crate::value::ValueKind;
use crate::version::{DocsisVersion as V, PacketCableVersion as P};

const NONE_REQUIRED: &[V] = &[];

macro_rules! entry {
    ($type:expr, $name:expr, $desc:expr, $introduced:expr, $kind:expr, $max_len:expr) => {
        SchemaEntry {
            type_code: $type,
            name: $name,
            description: $desc,
            introduced: $introduced,
            value_kind: $kind,
            max_length: $max_len,
            enum_table: None,
            subtlv_schema: None,
            required_in: NONE_REQUIRED,
        }
    };
}

// --- MTA Configuration (TLV 64) sub-TLVs ------------------------------------------------------
//
// PacketCable 1.0 defines the NCS/call-signaling endpoint fields; 1.5 adds CMS redundancy and
// the kerberos realm; 2.0 adds the IPv6-aware endpoint table.

pub const MTA_CONFIG_SUBTLVS: &[SchemaEntry] = &[
    entry!(1, "MTA EndPoint Configuration", "Per-line NCS/SIP endpoint parameters", IntroducedVersion::PacketCable(P::V1_0), ValueKind::Compound, crate::types::MAX_EXTENDED_LENGTH),
    entry!(2, "Call Signaling Server DNS Name or IP Address", "Primary call agent address", IntroducedVersion::PacketCable(P::V1_0), ValueKind::Binary, 255),
    entry!(3, "Kerberos Realm Name", "Realm used for MTA device/service provisioning", IntroducedVersion::PacketCable(P::V1_0), ValueKind::String, 255),
    entry!(4, "MTA MAC Address", "MAC address of the embedded MTA", IntroducedVersion::PacketCable(P::V1_0), ValueKind::Mac, 6),
    entry!(5, "Correlation ID", "Correlates MTA and CM provisioning flows", IntroducedVersion::PacketCable(P::V1_0), ValueKind::U32, 4),
    entry!(6, "CMS (Call Management Server) Redundant List", "Ordered fallback list of call agents", IntroducedVersion::PacketCable(P::V1_5), ValueKind::Binary, crate::types::MAX_EXTENDED_LENGTH),
    entry!(7, "Provisioning Flow Log", "Event log of the MTA provisioning flow", IntroducedVersion::PacketCable(P::V1_5), ValueKind::Binary, crate::types::MAX_EXTENDED_LENGTH),
    entry!(8, "MTA IPv6 EndPoint Address", "IPv6 address of a provisioned endpoint", IntroducedVersion::PacketCable(P::V2_0), ValueKind::Ipv6, 16),
];

// --- Top level (TLV 64-85) ---------------------------------------------------------------------

pub static PACKETCABLE_TOP_65_85: &[SchemaEntry] = &[
    SchemaEntry {
        type_code: 64,
        name: "MTA Configuration",
        description: "PacketCable MTA device and service provisioning parameters",
        introduced: IntroducedVersion::Docsis(V::V1_1),
        value_kind: ValueKind::Compound,
        max_length: crate::types::MAX_EXTENDED_LENGTH,
        enum_table: None,
        subtlv_schema: Some(SubtlvSchema::PacketCable(MTA_CONFIG_SUBTLVS)),
        required_in: NONE_REQUIRED,
    },
    entry!(65, "NCS Service Parameters", "Network Call Signaling service defaults", IntroducedVersion::Docsis(V::V1_1), ValueKind::Binary, crate::types::MAX_EXTENDED_LENGTH),
    entry!(66, "Trusted Networks", "List of trusted remote signaling networks", IntroducedVersion::Docsis(V::V1_1), ValueKind::Binary, crate::types::MAX_EXTENDED_LENGTH),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cms_redundant_list_requires_packetcable_1_5() {
        let entry = MTA_CONFIG_SUBTLVS.iter().find(|e| e.type_code == 6).unwrap();
        assert!(!entry.valid_at(super::super::LookupVersion::PacketCable(P::V1_0)));
        assert!(entry.valid_at(super::super::LookupVersion::PacketCable(P::V1_5)));
    }

    #[test]
    fn ipv6_endpoint_requires_packetcable_2_0() {
        let entry = MTA_CONFIG_SUBTLVS.iter().find(|e| e.type_code == 8).unwrap();
        assert!(!entry.valid_at(super::super::LookupVersion::PacketCable(P::V1_5)));
        assert!(entry.valid_at(super::super::LookupVersion::PacketCable(P::V2_0)));
    }
}
