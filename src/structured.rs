//! JSON/YAML bindings for a [Document].
//!
//! A [StructuredDoc] mirrors the TLV tree with registry-derived advisory fields (`name`,
//! `description`, `value_type`) alongside the raw `value` (hex) and a human-editable
//! `formatted_value`. Advisory fields are purely informational: on the way back in, the
//! registry always wins over whatever a hand-edited document claims `name`/`description` to be,
//! and `formatted_value` wins over `value` whenever both are present and the registry resolves a
//! schema for the TLV.

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, ParseErrorDetail};
use crate::record::{Document, Record};
use crate::registry::{self, LookupVersion, SchemaEntry};
use crate::value::{self, FormattedValue, ValueKind};
use crate::version::{DocsisVersion, PacketCableVersion};

/// Top-level structured document: schema versions plus the TLV tree.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StructuredDoc {
    pub docsis_version: DocsisVersion,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub packetcable_version: Option<PacketCableVersion>,
    pub tlvs: Vec<TlvNode>,
}

/// A single node of the structured tree, leaf or compound.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TlvNode {
    #[serde(rename = "type")]
    pub type_code: u8,
    pub length: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub formatted_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtlvs: Vec<TlvNode>,
}

pub(crate) fn resolve_schema(
    type_code: u8,
    parent: Option<u8>,
    docsis_version: DocsisVersion,
    packetcable_version: PacketCableVersion,
) -> Option<&'static SchemaEntry> {
    match parent {
        None => registry::lookup_top(type_code, docsis_version),
        Some(p) => registry::lookup_sub(p, type_code, LookupVersion::Docsis(docsis_version))
            .or_else(|| registry::lookup_sub(p, type_code, LookupVersion::PacketCable(packetcable_version))),
    }
}

fn value_type_name(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::U8 => "u8",
        ValueKind::U16 => "u16",
        ValueKind::U32 => "u32",
        ValueKind::U64 => "u64",
        ValueKind::I8 => "i8",
        ValueKind::String => "string",
        ValueKind::Binary => "binary",
        ValueKind::Ipv4 => "ipv4",
        ValueKind::Ipv6 => "ipv6",
        ValueKind::Mac => "mac",
        ValueKind::Oid => "oid",
        ValueKind::Frequency => "frequency",
        ValueKind::Bandwidth => "bandwidth",
        ValueKind::Duration => "duration",
        ValueKind::Boolean => "boolean",
        ValueKind::Enum(_) => "enum",
        ValueKind::Compound => "compound",
        ValueKind::Vendor => "vendor",
    }
}

fn node_from_record(
    record: &Record,
    parent: Option<u8>,
    docsis_version: DocsisVersion,
    packetcable_version: PacketCableVersion,
) -> TlvNode {
    let type_code = record.type_code();
    let schema = resolve_schema(type_code, parent, docsis_version, packetcable_version);
    match record {
        Record::Leaf(leaf) => {
            let formatted = schema.and_then(|s| {
                value::decode(s.value_kind, &leaf.bytes, s.enum_map().as_ref()).ok()
            });
            TlvNode {
                type_code,
                length: leaf.bytes.len(),
                name: schema.map(|s| s.name.to_string()),
                description: schema.map(|s| s.description.to_string()),
                value: Some(hex::encode_upper(&leaf.bytes)),
                formatted_value: formatted.map(|f| f.to_string()),
                value_type: schema.map(|s| value_type_name(s.value_kind).to_string()),
                subtlvs: Vec::new(),
            }
        }
        Record::Compound(compound) => TlvNode {
            type_code,
            length: record.byte_len(),
            name: schema.map(|s| s.name.to_string()),
            description: schema.map(|s| s.description.to_string()),
            value: None,
            formatted_value: None,
            value_type: Some("compound".to_string()),
            subtlvs: compound
                .children
                .iter()
                .map(|child| node_from_record(child, Some(type_code), docsis_version, packetcable_version))
                .collect(),
        },
    }
}

/// Build a [StructuredDoc] from a parsed [Document], resolving names/descriptions/formatted
/// values against the registry for the given versions.
pub fn to_structured(
    doc: &Document,
    docsis_version: DocsisVersion,
    packetcable_version: Option<PacketCableVersion>,
) -> StructuredDoc {
    let pc = packetcable_version.unwrap_or_default();
    StructuredDoc {
        docsis_version,
        packetcable_version,
        tlvs: doc
            .records
            .iter()
            .map(|r| node_from_record(r, None, docsis_version, pc))
            .collect(),
    }
}

fn formatted_value_for_encode(kind: ValueKind, text: &str) -> FormattedValue {
    match kind {
        ValueKind::Binary | ValueKind::Vendor | ValueKind::Oid => FormattedValue::Hex(text.to_string()),
        _ => FormattedValue::Text(text.to_string()),
    }
}

fn record_from_node(
    node: &TlvNode,
    parent: Option<u8>,
    docsis_version: DocsisVersion,
    packetcable_version: PacketCableVersion,
) -> crate::error::Result<Record> {
    if !node.subtlvs.is_empty() {
        let children = node
            .subtlvs
            .iter()
            .map(|child| record_from_node(child, Some(node.type_code), docsis_version, packetcable_version))
            .collect::<crate::error::Result<Vec<_>>>()?;
        return Ok(Record::compound(node.type_code, children));
    }

    let schema = resolve_schema(node.type_code, parent, docsis_version, packetcable_version);
    let path = format!("tlvs[type={}]", node.type_code);

    if let (Some(schema), Some(formatted_text)) = (schema, node.formatted_value.as_deref()) {
        let candidate = formatted_value_for_encode(schema.value_kind, formatted_text);
        if let Ok(bytes) = value::encode(schema.value_kind, &candidate, schema.enum_map().as_ref()) {
            return Ok(Record::leaf(node.type_code, bytes));
        }
    }

    let hex_str = node.value.as_deref().ok_or_else(|| {
        Error::at_path(
            ErrorKind::Parse(ParseErrorDetail::InvalidDocument(format!(
                "TLV {} has neither a usable formatted_value nor a raw value",
                node.type_code
            ))),
            path.clone(),
        )
    })?;
    let bytes = value::encode(ValueKind::Binary, &FormattedValue::Hex(hex_str.to_string()), None)
        .map_err(|_| Error::at_path(ErrorKind::Parse(ParseErrorDetail::InvalidHex(hex_str.to_string())), path))?;
    Ok(Record::leaf(node.type_code, bytes))
}

/// Reconstruct a [Document] from a [StructuredDoc].
pub fn from_structured(doc: &StructuredDoc) -> crate::error::Result<Document> {
    let pc = doc.packetcable_version.unwrap_or_default();
    let mut out = Document::new();
    for node in &doc.tlvs {
        out.push(record_from_node(node, None, doc.docsis_version, pc)?);
    }
    Ok(out)
}

pub fn to_json(doc: &StructuredDoc) -> crate::error::Result<String> {
    serde_json::to_string_pretty(doc).map_err(|e| {
        Error::unlocated(ErrorKind::Parse(ParseErrorDetail::InvalidDocument(e.to_string())))
    })
}

pub fn from_json(text: &str) -> crate::error::Result<StructuredDoc> {
    serde_json::from_str(text).map_err(|e| {
        Error::unlocated(ErrorKind::Parse(ParseErrorDetail::InvalidDocument(e.to_string())))
    })
}

pub fn to_yaml(doc: &StructuredDoc) -> crate::error::Result<String> {
    serde_yaml::to_string(doc).map_err(|e| {
        Error::unlocated(ErrorKind::Parse(ParseErrorDetail::InvalidDocument(e.to_string())))
    })
}

pub fn from_yaml(text: &str) -> crate::error::Result<StructuredDoc> {
    serde_yaml::from_str(text).map_err(|e| {
        Error::unlocated(ErrorKind::Parse(ParseErrorDetail::InvalidDocument(e.to_string())))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_roundtrips_with_name_and_formatted_value() {
        let mut doc = Document::new();
        doc.push(Record::leaf(3, vec![0x01]));
        let structured = to_structured(&doc, DocsisVersion::V3_1, None);
        let node = &structured.tlvs[0];
        assert_eq!(node.name.as_deref(), Some("Network Access Control"));
        assert_eq!(node.formatted_value.as_deref(), Some("enabled"));

        let rebuilt = from_structured(&structured).unwrap();
        assert_eq!(rebuilt, doc);
    }

    #[test]
    fn formatted_value_wins_over_stale_raw_value_on_the_way_in() {
        let structured = StructuredDoc {
            docsis_version: DocsisVersion::V3_1,
            packetcable_version: None,
            tlvs: vec![TlvNode {
                type_code: 3,
                length: 1,
                name: None,
                description: None,
                value: Some("00".to_string()),
                formatted_value: Some("enabled".to_string()),
                value_type: None,
                subtlvs: vec![],
            }],
        };
        let doc = from_structured(&structured).unwrap();
        assert_eq!(doc.records[0].as_leaf().unwrap().bytes, vec![0x01]);
    }

    #[test]
    fn unknown_tlv_falls_back_to_raw_hex_value() {
        let structured = StructuredDoc {
            docsis_version: DocsisVersion::V3_1,
            packetcable_version: None,
            tlvs: vec![TlvNode {
                type_code: 201,
                length: 6,
                name: None,
                description: None,
                value: Some("DEADBEEFCAFE".to_string()),
                formatted_value: None,
                value_type: None,
                subtlvs: vec![],
            }],
        };
        let doc = from_structured(&structured).unwrap();
        assert_eq!(
            doc.records[0].as_leaf().unwrap().bytes,
            vec![0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
        );
    }

    #[test]
    fn compound_roundtrips_through_subtlvs() {
        let mut doc = Document::new();
        doc.push(Record::compound(4, vec![Record::leaf(1, vec![7])]));
        let structured = to_structured(&doc, DocsisVersion::V3_1, None);
        assert_eq!(structured.tlvs[0].subtlvs.len(), 1);
        let rebuilt = from_structured(&structured).unwrap();
        assert_eq!(rebuilt, doc);
    }

    #[test]
    fn json_roundtrip_preserves_structure() {
        let mut doc = Document::new();
        doc.push(Record::leaf(12, vec![10, 0, 0, 1]));
        let structured = to_structured(&doc, DocsisVersion::V3_1, None);
        let json = to_json(&structured).unwrap();
        let back = from_json(&json).unwrap();
        assert_eq!(from_structured(&back).unwrap(), doc);
    }
}
