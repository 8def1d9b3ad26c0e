//! `docsis_tlv` parses, validates, and generates DOCSIS and PacketCable MTA cable modem
//! configuration files: the TLV (Type-Length-Value) binary format served to cable modems and
//! embedded MTAs during provisioning.
//!
//! # Usage
//!
//! Add the following to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! docsis-tlv = "0.4.0"
//! ```
//!
//! ## Parsing and re-generating a binary configuration file
//!
//! ```
//! use docsis_tlv::{parse, generate, DocsisVersion, PacketCableVersion};
//!
//! let bytes = [0x03, 0x01, 0x01, 0xFF];
//! let doc = parse(&bytes, DocsisVersion::V3_1, PacketCableVersion::V2_0).unwrap();
//! assert_eq!(generate(&doc).unwrap(), bytes);
//! ```
//!
//! ## Looking up what a TLV means
//!
//! ```
//! use docsis_tlv::{lookup_tlv, DocsisVersion};
//!
//! let entry = lookup_tlv(3, DocsisVersion::V3_1).unwrap();
//! assert_eq!(entry.name, "Network Access Control");
//! ```
//!
//! # TLV format
//!
//! A DOCSIS configuration file is a flat or nested sequence of TLV records: a one byte type, a
//! length field (either a single byte `0..=254`, or the marker byte `0xFF` followed by a
//! big-endian `u16` for longer values), and that many bytes of value, terminated by a trailing
//! `0xFF` end-of-data marker. Whether a TLV's value is itself a nested TLV stream ("compound")
//! or an opaque leaf is decided by consulting the [registry] for the type at that position; a
//! schema-declared compound whose bytes don't actually parse as a clean nested stream still
//! demotes to a leaf rather than failing the whole parse. See [types] for the wire-level details
//! and [codec] for the parse/generate entry points.
//!
//! # Schema registry
//!
//! [registry] is a static, version-gated catalog of what every top-level TLV and (for compound
//! TLVs) sub-TLV means: its name, description, value kind, and the DOCSIS or PacketCable version
//! it requires. [lookup_tlv] and [lookup_subtlv] are the public entry points into it; the
//! [validate] module and the [structured] and [config_text] surface syntaxes all consult it to
//! turn raw bytes into something a human can read and edit.
//!
//! # Value formatting
//!
//! [value] converts between a leaf's raw bytes and a human-editable scalar (integers, IP
//! addresses, MAC addresses, enumerated names, booleans, or a hex string as the universal
//! fallback). A hex-formatted value always wins when re-encoding, which is what lets an
//! unrecognized or schema-violating leaf round-trip untouched.
//!
//! # MIC (message integrity check)
//!
//! [mic] computes and validates the HMAC-MD5 CM MIC (TLV 6) and CMTS MIC (TLV 7) that authenticate
//! a configuration file against a shared secret. See [validate::MicCheck] for wiring MIC checks
//! into a [validate] pass.
//!
//! # Error handling
//!
//! Every fallible operation in this crate returns a typed [error::Result], never panics on
//! malformed input. [error::Error] carries both a structured [error::ErrorKind] and an
//! [error::ErrorLocation] (byte offset, JSON/YAML path, or TLV tree path) to make failures
//! actionable without re-parsing.

pub mod codec;
pub mod config_text;
pub mod error;
pub mod mic;
pub mod record;
pub mod registry;
pub mod structured;
pub mod types;
pub mod validate;
pub mod value;
pub mod version;

pub use codec::{generate, parse};
pub use record::{Compound, Document, Leaf, Record};
pub use registry::SchemaEntry;
pub use validate::{validate, Diagnostic, Diagnostics, MicCheck, Severity, ValidateOptions};
pub use version::{DocsisVersion, PacketCableVersion};

/// Look up the schema entry for a top-level TLV type at a given DOCSIS version.
///
/// This is a thin convenience wrapper around [registry::lookup_top].
pub fn lookup_tlv(type_code: u8, version: DocsisVersion) -> Option<&'static SchemaEntry> {
    registry::lookup_top(type_code, version)
}

/// Look up the schema entry for a sub-TLV of a compound TLV.
///
/// This is a thin convenience wrapper around [registry::lookup_sub].
pub fn lookup_subtlv(
    parent_type: u8,
    subtype: u8,
    version: registry::LookupVersion,
) -> Option<&'static SchemaEntry> {
    registry::lookup_sub(parent_type, subtype, version)
}

/// Parse a config text document directly into a [Document].
pub fn parse_config_text(
    text: &str,
    docsis_version: DocsisVersion,
    packetcable_version: PacketCableVersion,
    policy: config_text::UnknownIdentifierPolicy,
) -> error::Result<Document> {
    config_text::parse(text, docsis_version, packetcable_version, policy)
}

/// Convert a [Document] to canonical config text.
pub fn generate_config_text(
    doc: &Document,
    docsis_version: DocsisVersion,
    packetcable_version: PacketCableVersion,
) -> String {
    config_text::emit(doc, docsis_version, packetcable_version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_binary_roundtrip_with_mic() {
        let mut doc = Document::new();
        doc.push(Record::leaf(3, vec![0x01]));
        mic::generate_mics(&mut doc, b"shared-secret", b"shared-secret").unwrap();
        let bytes = generate(&doc).unwrap();
        let reparsed = parse(&bytes, DocsisVersion::V3_1, PacketCableVersion::V2_0).unwrap();
        mic::validate_cm_mic(&reparsed, b"shared-secret").unwrap();
        mic::validate_cmts_mic(&reparsed, b"shared-secret").unwrap();
    }

    #[test]
    fn config_text_and_binary_agree() {
        let mut doc = Document::new();
        doc.push(Record::leaf(3, vec![0x01]));
        let text = generate_config_text(&doc, DocsisVersion::V3_1, PacketCableVersion::V2_0);
        let reparsed = parse_config_text(
            &text,
            DocsisVersion::V3_1,
            PacketCableVersion::V2_0,
            config_text::UnknownIdentifierPolicy::Strict,
        )
        .unwrap();
        assert_eq!(reparsed, doc);
    }
}
