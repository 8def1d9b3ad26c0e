//! Curated DOCSIS top-level TLV definitions and their compound sub-TLV trees.
//!
//! This is not an exhaustive transcription of the DOCSIS MULPI specification; it covers the
//! well-known low-numbered TLVs (1-14, 17/18 legacy service flows, 22-25 classifiers and flows,
//! 43 vendor-specific, 62/63 OFDM/OFDMA profiles) plus enough of the range to exercise every
//! value kind. Types in 1..=85 with no entry here fall back to a generic entry (see
//! `super::generic_entry`); the registry never reports `NotFound` inside that range.

use super::{IntroducedVersion, SchemaEntry, SubtlvSchema};
use crate::value::{EnumWidth, ValueKind};
use crate::version::DocsisVersion as V;

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

// --- Class of Service (TLV 4, legacy DOCSIS 1.0) sub-TLVs -----------------------------------

pub const COS_SUBTLVS: &[SchemaEntry] = &[
    entry!(1, "Class ID", "Identifies the CoS being configured", IntroducedVersion::Docsis(V::V1_0), ValueKind::U8, 1),
    entry!(2, "Max Downstream Rate", "Maximum downstream bandwidth", IntroducedVersion::Docsis(V::V1_0), ValueKind::Bandwidth, 4),
    entry!(3, "Max Upstream Rate", "Maximum upstream bandwidth", IntroducedVersion::Docsis(V::V1_0), ValueKind::Bandwidth, 4),
    entry!(4, "Upstream Channel Priority", "Priority 0-7", IntroducedVersion::Docsis(V::V1_0), ValueKind::U8, 1),
    entry!(5, "Guaranteed Minimum Upstream Rate", "Minimum guaranteed upstream bandwidth", IntroducedVersion::Docsis(V::V1_0), ValueKind::Bandwidth, 4),
    entry!(6, "Maximum Upstream Channel Transmit Burst", "Max burst size in bytes", IntroducedVersion::Docsis(V::V1_0), ValueKind::U16, 2),
    entry!(7, "Class of Service Privacy Enable", "Enables BPI for this CoS", IntroducedVersion::Docsis(V::V1_0), ValueKind::Boolean, 1),
    entry!(8, "Vendor Specific Class of Service", "Vendor extension", IntroducedVersion::Docsis(V::V1_0), ValueKind::Vendor, crate::types::MAX_EXTENDED_LENGTH),
];

// --- Modem Capabilities (TLV 5) sub-TLVs -----------------------------------------------------

pub const MODEM_CAP_SUBTLVS: &[SchemaEntry] = &[
    entry!(1, "Concatenation Support", "CM supports concatenation", IntroducedVersion::Docsis(V::V1_0), ValueKind::Boolean, 1),
    entry!(2, "DOCSIS Version", "Highest DOCSIS version supported", IntroducedVersion::Docsis(V::V1_0), ValueKind::U8, 1),
    entry!(3, "Fragmentation Support", "CM supports upstream fragmentation", IntroducedVersion::Docsis(V::V1_1), ValueKind::Boolean, 1),
    entry!(4, "Payload Header Suppression Support", "CM supports PHS", IntroducedVersion::Docsis(V::V1_1), ValueKind::Boolean, 1),
    entry!(5, "IGMP Support", "CM supports IGMP forwarding", IntroducedVersion::Docsis(V::V1_1), ValueKind::Boolean, 1),
    entry!(6, "Baseline Privacy Support", "CM supports BPI", IntroducedVersion::Docsis(V::V1_0), ValueKind::Boolean, 1),
    entry!(8, "Number Of Downstream Channels", "Number of DS channels supported", IntroducedVersion::Docsis(V::V2_0), ValueKind::U8, 1),
    entry!(9, "Number Of Upstream Channels", "Number of US channels supported", IntroducedVersion::Docsis(V::V2_0), ValueKind::U8, 1),
];

// --- Upstream / Downstream Service Flow (TLV 17 / 18, legacy) sub-TLVs -----------------------

pub const SERVICE_FLOW_SUBTLVS: &[SchemaEntry] = &[
    entry!(1, "Service Flow Reference", "Reference ID local to the config file", IntroducedVersion::Docsis(V::V1_1), ValueKind::U16, 2),
    entry!(2, "Service Flow ID", "CMTS-assigned service flow ID", IntroducedVersion::Docsis(V::V1_1), ValueKind::U32, 4),
    entry!(3, "Service Class Name", "References a CMTS-provisioned service class", IntroducedVersion::Docsis(V::V1_1), ValueKind::String, 16),
    entry!(6, "QoS Parameter Set Type", "Which message types this parameter set applies to", IntroducedVersion::Docsis(V::V1_1), ValueKind::U8, 1),
    entry!(7, "Traffic Priority", "Relative priority, 0 (low) to 7 (high)", IntroducedVersion::Docsis(V::V1_1), ValueKind::U8, 1),
    entry!(8, "Maximum Sustained Traffic Rate", "Bits per second", IntroducedVersion::Docsis(V::V1_1), ValueKind::Bandwidth, 4),
    entry!(9, "Maximum Traffic Burst", "Bytes", IntroducedVersion::Docsis(V::V1_1), ValueKind::U32, 4),
    entry!(10, "Minimum Reserved Traffic Rate", "Bits per second", IntroducedVersion::Docsis(V::V1_1), ValueKind::Bandwidth, 4),
    entry!(15, "Maximum Concatenated Burst", "Bytes, upstream only", IntroducedVersion::Docsis(V::V1_1), ValueKind::U16, 2),
    entry!(19, "Nominal Polling Interval", "Microseconds, upstream only", IntroducedVersion::Docsis(V::V1_1), ValueKind::U32, 4),
];

// --- Packet Classification (TLV 22 / 23) sub-TLVs --------------------------------------------

pub const CLASSIFIER_SUBTLVS: &[SchemaEntry] = &[
    entry!(1, "Classifier Reference", "Reference ID local to the config file", IntroducedVersion::Docsis(V::V1_1), ValueKind::U8, 1),
    entry!(2, "Classifier Identifier", "CMTS-assigned classifier ID", IntroducedVersion::Docsis(V::V1_1), ValueKind::U16, 2),
    entry!(3, "Service Flow Reference", "Service flow this classifier feeds", IntroducedVersion::Docsis(V::V1_1), ValueKind::U16, 2),
    entry!(4, "Service Flow Identifier", "Service flow this classifier feeds", IntroducedVersion::Docsis(V::V1_1), ValueKind::U32, 4),
    entry!(5, "Rule Priority", "Higher values match first", IntroducedVersion::Docsis(V::V1_1), ValueKind::U8, 1),
    entry!(9, "IP Source Address", "Source address to match", IntroducedVersion::Docsis(V::V1_1), ValueKind::Ipv4, 4),
    entry!(10, "IP Source Mask", "Source address mask", IntroducedVersion::Docsis(V::V1_1), ValueKind::Ipv4, 4),
    entry!(11, "IP Destination Address", "Destination address to match", IntroducedVersion::Docsis(V::V1_1), ValueKind::Ipv4, 4),
    entry!(12, "IP Destination Mask", "Destination address mask", IntroducedVersion::Docsis(V::V1_1), ValueKind::Ipv4, 4),
    entry!(13, "TCP/UDP Source Port Start", "Lower bound, inclusive", IntroducedVersion::Docsis(V::V1_1), ValueKind::U16, 2),
    entry!(14, "TCP/UDP Source Port End", "Upper bound, inclusive", IntroducedVersion::Docsis(V::V1_1), ValueKind::U16, 2),
    entry!(15, "TCP/UDP Destination Port Start", "Lower bound, inclusive", IntroducedVersion::Docsis(V::V1_1), ValueKind::U16, 2),
    entry!(16, "TCP/UDP Destination Port End", "Upper bound, inclusive", IntroducedVersion::Docsis(V::V1_1), ValueKind::U16, 2),
];

// --- Upstream / Downstream Service Flow (TLV 24 / 25, DOCSIS 1.1+) sub-TLVs ------------------
// Same parameter namespace as the legacy TLV 17/18 service flow; DOCSIS 1.1 renumbered the
// top-level TLVs but kept the encoding of the inner parameter set.

pub use self::SERVICE_FLOW_SUBTLVS as SERVICE_FLOW_V1_1_SUBTLVS;

// --- Vendor Specific Information (TLV 43) sub-TLVs -------------------------------------------

pub const VENDOR_SUBTLVS: &[SchemaEntry] = &[
    entry!(1, "Vendor Identifier", "3-byte IEEE OUI of the vendor", IntroducedVersion::Docsis(V::V1_0), ValueKind::Oid, 3),
    entry!(2, "Vendor Specific Data", "Opaque vendor-defined payload", IntroducedVersion::Docsis(V::V1_0), ValueKind::Binary, crate::types::MAX_EXTENDED_LENGTH),
];

// --- OFDM Downstream Profile (TLV 62) sub-TLVs -----------------------------------------------

const SUBCARRIER_SPACING: &[(u32, &str)] = &[(0, "reserved"), (1, "50 kHz"), (2, "25 kHz")];

const CYCLIC_PREFIX: &[(u32, &str)] = &[
    (0, "192 samples"),
    (1, "256 samples"),
    (2, "384 samples"),
    (3, "512 samples"),
    (4, "640 samples"),
];

pub const OFDM_DS_SUBTLVS: &[SchemaEntry] = &[
    entry!(1, "Profile ID", "Downstream OFDM profile identifier", IntroducedVersion::Docsis(V::V3_1), ValueKind::U8, 1),
    entry!(2, "Configuration Change Count", "Increments on every profile change", IntroducedVersion::Docsis(V::V3_1), ValueKind::U8, 1),
    entry!(3, "Subcarrier Assignment Range", "First/last active subcarrier", IntroducedVersion::Docsis(V::V3_1), ValueKind::Binary, 6),
    SchemaEntry {
        type_code: 4,
        name: "Subcarrier Spacing",
        description: "OFDM subcarrier spacing",
        introduced: IntroducedVersion::Docsis(V::V3_1),
        value_kind: ValueKind::Enum(EnumWidth::U8),
        max_length: 1,
        enum_table: Some(SUBCARRIER_SPACING),
        subtlv_schema: None,
        required_in: NONE_REQUIRED,
    },
    SchemaEntry {
        type_code: 5,
        name: "Cyclic Prefix",
        description: "OFDM symbol cyclic prefix length",
        introduced: IntroducedVersion::Docsis(V::V3_1),
        value_kind: ValueKind::Enum(EnumWidth::U8),
        max_length: 1,
        enum_table: Some(CYCLIC_PREFIX),
        subtlv_schema: None,
        required_in: NONE_REQUIRED,
    },
    entry!(6, "Roll Off Period", "OFDM windowing roll-off", IntroducedVersion::Docsis(V::V3_1), ValueKind::U8, 1),
    entry!(7, "PLC Frequency", "Physical Link Channel center frequency", IntroducedVersion::Docsis(V::V3_1), ValueKind::Frequency, 4),
    entry!(8, "Time Interleaving Depth", "Number of interleaved symbols", IntroducedVersion::Docsis(V::V3_1), ValueKind::U8, 1),
    entry!(9, "Primary Capable", "Profile may carry MAC management messages", IntroducedVersion::Docsis(V::V3_1), ValueKind::Boolean, 1),
    entry!(10, "Subcarrier Modulation Vector", "Per-subcarrier bit loading", IntroducedVersion::Docsis(V::V3_1), ValueKind::Binary, crate::types::MAX_EXTENDED_LENGTH),
    entry!(11, "Profile Downstream Data Rate", "Estimated throughput", IntroducedVersion::Docsis(V::V3_1), ValueKind::Bandwidth, 4),
    entry!(12, "NCP Modulation", "Next Codeword Pointer modulation order", IntroducedVersion::Docsis(V::V3_1), ValueKind::U8, 1),
];

// --- OFDMA Upstream Profile (TLV 63) sub-TLVs ------------------------------------------------

pub const OFDM_US_SUBTLVS: &[SchemaEntry] = &[
    entry!(1, "Profile ID", "Upstream OFDMA profile identifier", IntroducedVersion::Docsis(V::V3_1), ValueKind::U8, 1),
    entry!(2, "Configuration Change Count", "Increments on every profile change", IntroducedVersion::Docsis(V::V3_1), ValueKind::U8, 1),
    entry!(3, "Subcarrier Assignment Range", "First/last active subcarrier", IntroducedVersion::Docsis(V::V3_1), ValueKind::Binary, 6),
    SchemaEntry {
        type_code: 4,
        name: "Subcarrier Spacing",
        description: "OFDMA subcarrier spacing",
        introduced: IntroducedVersion::Docsis(V::V3_1),
        value_kind: ValueKind::Enum(EnumWidth::U8),
        max_length: 1,
        enum_table: Some(SUBCARRIER_SPACING),
        subtlv_schema: None,
        required_in: NONE_REQUIRED,
    },
    SchemaEntry {
        type_code: 5,
        name: "Cyclic Prefix",
        description: "OFDMA symbol cyclic prefix length",
        introduced: IntroducedVersion::Docsis(V::V3_1),
        value_kind: ValueKind::Enum(EnumWidth::U8),
        max_length: 1,
        enum_table: Some(CYCLIC_PREFIX),
        subtlv_schema: None,
        required_in: NONE_REQUIRED,
    },
    entry!(6, "Guard Band", "Inter-symbol guard duration", IntroducedVersion::Docsis(V::V3_1), ValueKind::U8, 1),
    entry!(7, "Power Control: Target Receive Power", "dBmV in 0.25 dB steps", IntroducedVersion::Docsis(V::V3_1), ValueKind::I8, 1),
    entry!(8, "IUC Mapping", "Interval Usage Code to minislot mapping", IntroducedVersion::Docsis(V::V3_1), ValueKind::Binary, crate::types::MAX_EXTENDED_LENGTH),
    entry!(9, "Number of Symbols Per Frame", "OFDMA frame structure", IntroducedVersion::Docsis(V::V3_1), ValueKind::U8, 1),
    entry!(10, "Scrambler Seed", "Upstream scrambler initialization", IntroducedVersion::Docsis(V::V3_1), ValueKind::U16, 2),
    entry!(11, "Profile Upstream Data Rate", "Estimated throughput", IntroducedVersion::Docsis(V::V3_1), ValueKind::Bandwidth, 4),
    entry!(12, "Fine Ranging Modulation", "Modulation used during fine ranging", IntroducedVersion::Docsis(V::V3_1), ValueKind::U8, 1),
    entry!(13, "HCS Interleaver Depth", "Header Check Sequence interleaver depth", IntroducedVersion::Docsis(V::V3_1), ValueKind::U8, 1),
];

// --- Top level ---------------------------------------------------------------------------------

macro_rules! compound {
    ($type:expr, $name:expr, $desc:expr, $introduced:expr, $subtlvs:expr) => {
        SchemaEntry {
            type_code: $type,
            name: $name,
            description: $desc,
            introduced: $introduced,
            value_kind: ValueKind::Compound,
            max_length: crate::types::MAX_EXTENDED_LENGTH,
            enum_table: None,
            subtlv_schema: Some(SubtlvSchema::Docsis($subtlvs)),
            required_in: NONE_REQUIRED,
        }
    };
}

pub static DOCSIS_TOP: &[SchemaEntry] = &[
    entry!(1, "Downstream Frequency", "Center frequency of the downstream channel, Hz", IntroducedVersion::Docsis(V::V1_0), ValueKind::Frequency, 4),
    entry!(2, "Upstream Channel ID", "Upstream channel the CM should use", IntroducedVersion::Docsis(V::V1_0), ValueKind::U8, 1),
    SchemaEntry {
        required_in: &[V::V1_0, V::V1_1, V::V2_0, V::V3_0, V::V3_1],
        ..entry!(3, "Network Access Control", "Enables/disables the CM's network access", IntroducedVersion::Docsis(V::V1_0), ValueKind::Boolean, 1)
    },
    compound!(4, "Class of Service", "Legacy DOCSIS 1.0 Class of Service configuration", IntroducedVersion::Docsis(V::V1_0), COS_SUBTLVS),
    compound!(5, "Modem Capabilities", "Capability negotiation bits", IntroducedVersion::Docsis(V::V1_0), MODEM_CAP_SUBTLVS),
    entry!(6, "CM MIC", "Message Integrity Check computed by the provisioning source", IntroducedVersion::Docsis(V::V1_0), ValueKind::Binary, 16),
    entry!(7, "CMTS MIC", "Message Integrity Check validated by the CMTS", IntroducedVersion::Docsis(V::V1_0), ValueKind::Binary, 16),
    entry!(8, "Vendor ID", "3-byte IEEE OUI identifying the config generator", IntroducedVersion::Docsis(V::V1_0), ValueKind::Oid, crate::types::MAX_EXTENDED_LENGTH),
    entry!(9, "Software Upgrade Filename", "Filename to request from the TFTP server", IntroducedVersion::Docsis(V::V1_0), ValueKind::String, 127),
    compound!(10, "SNMP Write-Access Control", "Per-OID write access rules", IntroducedVersion::Docsis(V::V1_0), &[]),
    compound!(11, "SNMP MIB Object", "SNMP object to set during provisioning", IntroducedVersion::Docsis(V::V1_0), &[]),
    entry!(12, "Modem IP Address", "IP address the CM should use", IntroducedVersion::Docsis(V::V1_0), ValueKind::Ipv4, 4),
    compound!(13, "Service Not Available Response", "Response code when a requested service class is unavailable", IntroducedVersion::Docsis(V::V1_0), &[]),
    entry!(14, "Software Upgrade TFTP Server", "Server to fetch the upgrade image from", IntroducedVersion::Docsis(V::V1_0), ValueKind::Ipv4, 4),
    compound!(17, "Upstream Service Flow (legacy)", "DOCSIS 1.0 upstream QoS parameter set", IntroducedVersion::Docsis(V::V1_0), SERVICE_FLOW_SUBTLVS),
    compound!(18, "Downstream Service Flow (legacy)", "DOCSIS 1.0 downstream QoS parameter set", IntroducedVersion::Docsis(V::V1_0), SERVICE_FLOW_SUBTLVS),
    compound!(22, "Upstream Packet Classification", "Upstream classifier definitions", IntroducedVersion::Docsis(V::V1_1), CLASSIFIER_SUBTLVS),
    compound!(23, "Downstream Packet Classification", "Downstream classifier definitions", IntroducedVersion::Docsis(V::V1_1), CLASSIFIER_SUBTLVS),
    compound!(24, "Upstream Service Flow", "DOCSIS 1.1+ upstream QoS parameter set", IntroducedVersion::Docsis(V::V1_1), SERVICE_FLOW_SUBTLVS),
    compound!(25, "Downstream Service Flow", "DOCSIS 1.1+ downstream QoS parameter set", IntroducedVersion::Docsis(V::V1_1), SERVICE_FLOW_SUBTLVS),
    compound!(43, "Vendor Specific Information", "Vendor-defined extension fields", IntroducedVersion::Docsis(V::V1_0), VENDOR_SUBTLVS),
    compound!(62, "Downstream OFDM Profile", "DOCSIS 3.1 downstream OFDM profile", IntroducedVersion::Docsis(V::V3_1), OFDM_DS_SUBTLVS),
    compound!(63, "Upstream OFDMA Profile", "DOCSIS 3.1 upstream OFDMA profile", IntroducedVersion::Docsis(V::V3_1), OFDM_US_SUBTLVS),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ofdm_profile_has_expected_subtlv_count() {
        assert_eq!(OFDM_DS_SUBTLVS.len(), 12);
        assert_eq!(OFDM_US_SUBTLVS.len(), 13);
    }

    #[test]
    fn cyclic_prefix_enum_has_384_and_512_sample_entries() {
        assert!(CYCLIC_PREFIX.iter().any(|(_, name)| *name == "384 samples"));
        assert!(CYCLIC_PREFIX.iter().any(|(_, name)| *name == "512 samples"));
    }
}
