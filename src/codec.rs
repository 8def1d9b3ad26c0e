//! The TLV codec: binary bytes <-> [Document] tree.
//!
//! Whether a TLV is a [Compound] or a [Leaf] is decided by the schema registry, not by trial
//! parsing: `parse_records` asks [registry::lookup_top]/[registry::lookup_sub] whether the type
//! at this position is compound for the given versions, and only then attempts the recursive
//! nested parse. A schema-declared compound whose value bytes don't actually parse as a clean
//! nested TLV stream (truncation, length overrun) still demotes to an opaque [Leaf] rather than
//! failing the whole parse, which is what lets a malformed or vendor-specific compound round-trip
//! untouched. A type the registry doesn't mark compound is never trial-parsed, so a scalar leaf
//! whose bytes happen to tokenize as valid nested TLVs (e.g. a `U16` value of `0x0100`) is never
//! misclassified.

use crate::error::{Error, ErrorKind, ParseErrorDetail};
use crate::record::{Document, Record};
use crate::registry::{self, LookupVersion};
use crate::types::{TlvLength, END_OF_DATA};
use crate::version::{DocsisVersion, PacketCableVersion};

/// Parse a complete configuration file's bytes into a [Document].
///
/// A top-level type byte equal to [END_OF_DATA] (`0xFF`) ends the stream; any bytes after it
/// (conventionally more `0xFF` padding) are ignored. `docsis_version` gates top-level TLVs and
/// sub-TLVs nested under plain DOCSIS compounds; `packetcable_version` gates sub-TLVs nested
/// under the PacketCable MTA configuration tree (TLV 64 and below it).
pub fn parse(
    bytes: &[u8],
    docsis_version: DocsisVersion,
    packetcable_version: PacketCableVersion,
) -> crate::error::Result<Document> {
    tracing::debug!(bytes = bytes.len(), %docsis_version, %packetcable_version, "parsing TLV stream");
    let records = parse_records(bytes, true, None, docsis_version, packetcable_version)?;
    tracing::debug!(records = records.len(), "parsed TLV stream");
    Ok(Document { records })
}

fn is_compound_at(
    type_byte: u8,
    parent: Option<u8>,
    docsis_version: DocsisVersion,
    packetcable_version: PacketCableVersion,
) -> bool {
    match parent {
        None => registry::is_compound(type_byte, docsis_version),
        Some(p) => registry::lookup_sub(p, type_byte, LookupVersion::Docsis(docsis_version))
            .or_else(|| registry::lookup_sub(p, type_byte, LookupVersion::PacketCable(packetcable_version)))
            .map(|e| e.is_compound())
            .unwrap_or(false),
    }
}

fn parse_records(
    bytes: &[u8],
    allow_eof_marker: bool,
    parent: Option<u8>,
    docsis_version: DocsisVersion,
    packetcable_version: PacketCableVersion,
) -> crate::error::Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut offset = 0usize;
    while offset < bytes.len() {
        let type_byte = bytes[offset];
        if allow_eof_marker && type_byte == END_OF_DATA {
            break;
        }
        let header_offset = offset;
        offset += 1;
        let (length, consumed) = TlvLength::read(&bytes[offset..])?;
        offset += consumed;
        let value_len = length.value();
        if offset + value_len > bytes.len() {
            return Err(Error::at_offset(
                ErrorKind::Parse(ParseErrorDetail::LengthOverrun {
                    length: value_len,
                    offset: header_offset,
                }),
                header_offset,
            ));
        }
        let value = bytes[offset..offset + value_len].to_vec();
        offset += value_len;
        let record = if value.is_empty() {
            Record::leaf(type_byte, value)
        } else if is_compound_at(type_byte, parent, docsis_version, packetcable_version) {
            match parse_records(&value, false, Some(type_byte), docsis_version, packetcable_version) {
                Ok(children) => Record::compound(type_byte, children),
                Err(_) => {
                    tracing::warn!(type_byte, "schema-declared compound did not parse as nested TLVs, demoting to leaf");
                    Record::leaf(type_byte, value)
                }
            }
        } else {
            Record::leaf(type_byte, value)
        };
        records.push(record);
    }
    Ok(records)
}

/// Serialize a [Document] back to bytes, choosing the minimal length encoding for every record
/// and appending the mandatory `0xFF` end-of-data marker after the top-level stream.
pub fn generate(doc: &Document) -> crate::error::Result<Vec<u8>> {
    tracing::debug!(records = doc.records.len(), "serializing TLV stream");
    let mut out = Vec::new();
    for record in &doc.records {
        write_record(record, &mut out)?;
    }
    out.push(END_OF_DATA);
    Ok(out)
}

fn write_record(record: &Record, out: &mut Vec<u8>) -> crate::error::Result<()> {
    match record {
        Record::Leaf(leaf) => {
            out.push(leaf.type_code);
            TlvLength::minimal(leaf.bytes.len())?.write(out);
            out.extend_from_slice(&leaf.bytes);
        }
        Record::Compound(compound) => {
            let mut inner = Vec::new();
            for child in &compound.children {
                write_record(child, &mut inner)?;
            }
            out.push(compound.type_code);
            TlvLength::minimal(inner.len())?.write(out);
            out.extend_from_slice(&inner);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_default(bytes: &[u8]) -> crate::error::Result<Document> {
        parse(bytes, DocsisVersion::default(), PacketCableVersion::default())
    }

    #[test]
    fn minimal_config_roundtrips() {
        // Scenario 1: TLV 3 (Network Access Control), boolean true.
        let bytes = [0x03, 0x01, 0x01];
        let doc = parse_default(&bytes).unwrap();
        assert_eq!(doc.records.len(), 1);
        assert_eq!(doc.records[0].as_leaf().unwrap().bytes, vec![0x01]);
        let mut expected = bytes.to_vec();
        expected.push(END_OF_DATA);
        assert_eq!(generate(&doc).unwrap(), expected);
    }

    #[test]
    fn generate_appends_the_end_of_data_marker() {
        let mut doc = Document::new();
        doc.push(Record::leaf(3, vec![0x01]));
        let out = generate(&doc).unwrap();
        assert_eq!(out.last(), Some(&END_OF_DATA));
        assert_eq!(out, vec![0x03, 0x01, 0x01, END_OF_DATA]);
    }

    #[test]
    fn extended_length_value_parses_and_reemits_with_extended_form() {
        // Scenario 2: an 18-byte value forces the 0xFF extended-length encoding.
        let value: Vec<u8> = (0..18).collect();
        let mut bytes = vec![0x08, END_OF_DATA, 0x00, 0x12];
        bytes.extend_from_slice(&value);
        let doc = parse_default(&bytes).unwrap();
        assert_eq!(doc.records[0].as_leaf().unwrap().bytes, value);
        let mut expected = bytes.clone();
        expected.push(END_OF_DATA);
        assert_eq!(generate(&doc).unwrap(), expected);
    }

    #[test]
    fn malformed_nested_tlv_demotes_to_leaf() {
        // Scenario 3: type 201 (vendor range, compound by default) with a 6-byte payload that
        // cannot parse as a nested TLV stream (inner type 0xDE, inner length 0xAD = 173, which
        // overruns the remaining 4 bytes), so it demotes to an opaque leaf.
        let bytes = [0xC9, 0x06, 0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE];
        let doc = parse_default(&bytes).unwrap();
        assert_eq!(doc.records.len(), 1);
        let leaf = doc.records[0].as_leaf().expect("should demote to a leaf");
        assert_eq!(leaf.bytes, vec![0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]);
        let mut expected = bytes.to_vec();
        expected.push(END_OF_DATA);
        assert_eq!(generate(&doc).unwrap(), expected);
    }

    #[test]
    fn a_leaf_schema_type_is_never_trial_parsed_into_a_compound() {
        // TLV 2 (Upstream Channel ID) is a plain u8 leaf; feed it a 2-byte value that would
        // tokenize as a valid nested TLV stream (type 0x01, length 0x00) if trial-parsed, and
        // confirm the registry-driven classifier still leaves it as a leaf.
        let bytes = [0x02, 0x02, 0x01, 0x00];
        let doc = parse_default(&bytes).unwrap();
        assert_eq!(doc.records.len(), 1);
        assert!(doc.records[0].as_leaf().is_some());
        assert_eq!(doc.records[0].as_leaf().unwrap().bytes, vec![0x01, 0x00]);
    }

    #[test]
    fn genuine_compound_parses_into_nested_records() {
        // TLV 4 (Class of Service) wrapping sub-TLV 1 (Class ID) = 1.
        let bytes = [0x04, 0x03, 0x01, 0x01, 0x01];
        let doc = parse_default(&bytes).unwrap();
        let compound = doc.records[0].as_compound().expect("should parse as compound");
        assert_eq!(compound.children.len(), 1);
        assert_eq!(compound.children[0].type_code(), 1);
        let mut expected = bytes.to_vec();
        expected.push(END_OF_DATA);
        assert_eq!(generate(&doc).unwrap(), expected);
    }

    #[test]
    fn duplicate_top_level_records_are_preserved_in_order() {
        // Scenario 6: the same TLV type appears twice at top level.
        let bytes = [0x09, 0x01, 0x01, 0x09, 0x01, 0x02];
        let doc = parse_default(&bytes).unwrap();
        assert_eq!(doc.find_all(9).len(), 2);
        let mut expected = bytes.to_vec();
        expected.push(END_OF_DATA);
        assert_eq!(generate(&doc).unwrap(), expected);
    }

    #[test]
    fn trailing_eof_marker_and_padding_are_ignored() {
        let bytes = [0x03, 0x01, 0x01, END_OF_DATA, END_OF_DATA, END_OF_DATA];
        let doc = parse_default(&bytes).unwrap();
        assert_eq!(doc.records.len(), 1);
    }

    #[test]
    fn truncated_value_is_a_parse_error() {
        let bytes = [0x03, 0x05, 0x01];
        let err = parse_default(&bytes).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::Parse(ParseErrorDetail::LengthOverrun { .. })
        ));
    }
}
