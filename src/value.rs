//! Bidirectional mapping between raw TLV value bytes and human-editable "formatted values".
//!
//! [`decode`] and [`encode`] are meant to satisfy the bijection property: for every
//! schema-known leaf `(kind, bytes)` in range, `encode(kind, decode(kind, bytes)) == bytes`.

use std::collections::BTreeMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::{Error, ErrorKind, ValueErrorDetail};

/// The interpretation to apply to a leaf TLV's raw bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    U8,
    U16,
    U32,
    U64,
    I8,
    String,
    Binary,
    Ipv4,
    Ipv6,
    Mac,
    Oid,
    /// u32 Hz, stored as a decimal integer (not scaled to MHz/GHz for display).
    Frequency,
    /// u32 bits per second.
    Bandwidth,
    /// Duration in seconds, stored as u32.
    Duration,
    Boolean,
    Enum(EnumWidth),
    Compound,
    Vendor,
}

/// The underlying integer width backing an `enum` value kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EnumWidth {
    U8,
    U16,
    U32,
}

/// A bidirectional code <-> display-name table for an `enum` value kind.
///
/// Reverse lookup accepts the canonical display name (case-insensitive) or a plain integer
/// literal.
#[derive(Clone, Debug, Default)]
pub struct EnumMap {
    forward: BTreeMap<u32, &'static str>,
}

impl EnumMap {
    pub const fn new() -> Self {
        Self {
            forward: BTreeMap::new(),
        }
    }

    pub fn from_pairs(pairs: &[(u32, &'static str)]) -> Self {
        Self {
            forward: pairs.iter().copied().collect(),
        }
    }

    pub fn name_for(&self, code: u32) -> Option<&'static str> {
        self.forward.get(&code).copied()
    }

    /// Resolve a display name back to its integer code. Accepts the canonical name
    /// case-insensitively, or a bare integer literal (decimal or `0x`-prefixed hex).
    pub fn code_for(&self, name: &str) -> Option<u32> {
        if let Some(code) = self
            .forward
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(code, _)| *code)
        {
            return Some(code);
        }
        if let Some(hex) = name.strip_prefix("0x").or_else(|| name.strip_prefix("0X")) {
            return u32::from_str_radix(hex, 16).ok();
        }
        name.parse::<u32>().ok()
    }
}

/// A human-editable scalar value decoded from (or to be encoded to) a leaf TLV's raw bytes.
#[derive(Clone, Debug, PartialEq)]
pub enum FormattedValue {
    Integer(i64),
    UInt(u64),
    Bool(bool),
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    Mac([u8; 6]),
    Text(String),
    /// Uppercase hex string without separators; used for the `binary`/`vendor` fallback and for
    /// any leaf whose bytes could not be interpreted per its nominal kind.
    Hex(String),
    /// Display-only summary string for a compound TLV, e.g. `"compound (3 sub-TLVs)"`.
    Compound(String),
}

impl FormattedValue {
    pub fn as_hex(&self) -> Option<&str> {
        match self {
            FormattedValue::Hex(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FormattedValue::Integer(_) => "integer",
            FormattedValue::UInt(_) => "uinteger",
            FormattedValue::Bool(_) => "boolean",
            FormattedValue::Ipv4(_) => "ipv4",
            FormattedValue::Ipv6(_) => "ipv6",
            FormattedValue::Mac(_) => "mac",
            FormattedValue::Text(_) => "string",
            FormattedValue::Hex(_) => "hex",
            FormattedValue::Compound(_) => "compound",
        }
    }
}

impl fmt::Display for FormattedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormattedValue::Integer(v) => write!(f, "{v}"),
            FormattedValue::UInt(v) => write!(f, "{v}"),
            FormattedValue::Bool(v) => write!(f, "{}", if *v { "enabled" } else { "disabled" }),
            FormattedValue::Ipv4(v) => write!(f, "{v}"),
            FormattedValue::Ipv6(v) => write!(f, "{v}"),
            FormattedValue::Mac(v) => write!(
                f,
                "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
                v[0], v[1], v[2], v[3], v[4], v[5]
            ),
            FormattedValue::Text(v) => f.write_str(v),
            FormattedValue::Hex(v) => f.write_str(v),
            FormattedValue::Compound(v) => f.write_str(v),
        }
    }
}

/// Decode raw TLV value bytes into a [FormattedValue] according to the given [ValueKind].
///
/// Resilient by design: most value kinds fail closed to a typed [ValueErrorDetail]; callers that
/// want the "demote to hex on error" behavior described for the codec should catch the error and
/// fall back to [hex_fallback] themselves, since only the caller knows whether it is mid-parse
/// (demote) or mid-edit (propagate).
pub fn decode(kind: ValueKind, bytes: &[u8], enum_map: Option<&EnumMap>) -> crate::error::Result<FormattedValue> {
    use ValueKind::*;
    match kind {
        U8 => Ok(FormattedValue::UInt(*bytes.first().ok_or_else(|| {
            kind_mismatch("u8", "empty")
        })? as u64)),
        U16 => Ok(FormattedValue::UInt(read_be(bytes, 2)? as u64)),
        U32 | Frequency | Bandwidth | Duration => Ok(FormattedValue::UInt(read_be(bytes, 4)?)),
        U64 => Ok(FormattedValue::UInt(read_be(bytes, 8)?)),
        I8 => {
            let b = *bytes.first().ok_or_else(|| kind_mismatch("i8", "empty"))?;
            Ok(FormattedValue::Integer(b as i8 as i64))
        }
        String => match std::str::from_utf8(bytes) {
            Ok(s) => Ok(FormattedValue::Text(s.to_string())),
            Err(_) => Ok(hex_fallback(bytes)),
        },
        Binary | Vendor | Oid => Ok(hex_fallback(bytes)),
        Ipv4 => {
            if bytes.len() != 4 {
                return Err(value_err(ValueErrorDetail::MalformedIpv4(format!(
                    "expected 4 bytes, got {}",
                    bytes.len()
                ))));
            }
            Ok(FormattedValue::Ipv4(Ipv4Addr::new(
                bytes[0], bytes[1], bytes[2], bytes[3],
            )))
        }
        Ipv6 => {
            if bytes.len() != 16 {
                return Err(value_err(ValueErrorDetail::MalformedIpv6(format!(
                    "expected 16 bytes, got {}",
                    bytes.len()
                ))));
            }
            let mut octets = [0u8; 16];
            octets.copy_from_slice(bytes);
            Ok(FormattedValue::Ipv6(Ipv6Addr::from(octets)))
        }
        Mac => {
            if bytes.len() != 6 {
                return Err(value_err(ValueErrorDetail::MalformedMac(format!(
                    "expected 6 bytes, got {}",
                    bytes.len()
                ))));
            }
            let mut mac = [0u8; 6];
            mac.copy_from_slice(bytes);
            Ok(FormattedValue::Mac(mac))
        }
        Boolean => {
            let b = *bytes.first().ok_or_else(|| kind_mismatch("boolean", "empty"))?;
            match b {
                0 => Ok(FormattedValue::Bool(false)),
                1 => Ok(FormattedValue::Bool(true)),
                _ => Ok(hex_fallback(bytes)),
            }
        }
        Enum(width) => {
            let code = match width {
                EnumWidth::U8 => *bytes.first().ok_or_else(|| kind_mismatch("enum", "empty"))? as u32,
                EnumWidth::U16 => read_be(bytes, 2)? as u32,
                EnumWidth::U32 => read_be(bytes, 4)? as u32,
            };
            match enum_map.and_then(|m| m.name_for(code)) {
                Some(name) => Ok(FormattedValue::Text(name.to_string())),
                None => Ok(FormattedValue::Text(code.to_string())),
            }
        }
        Compound => Ok(FormattedValue::Compound(format!(
            "compound ({} byte(s))",
            bytes.len()
        ))),
    }
}

/// Encode a [FormattedValue] back into raw TLV value bytes for the given [ValueKind].
/// A [FormattedValue::Hex] value always wins regardless of the nominal kind, which is what lets
/// an unrecognized or hand-edited leaf round-trip untouched.
pub fn encode(
    kind: ValueKind,
    value: &FormattedValue,
    enum_map: Option<&EnumMap>,
) -> crate::error::Result<Vec<u8>> {
    use ValueKind::*;

    // A hex formatted value always wins regardless of nominal kind: it represents either a
    // demoted leaf or an explicit hex edit, and must round-trip byte-for-byte.
    if let FormattedValue::Hex(s) = value {
        return decode_hex(s);
    }

    match kind {
        U8 => Ok(vec![as_u64(value)?.try_into().map_err(|_| {
            value_err(ValueErrorDetail::IntegerOutOfRange {
                value: as_u64(value)? as i64,
                bits: 8,
            })
        })?]),
        U16 => encode_be(as_u64(value)?, 2, 16),
        U32 | Frequency | Bandwidth | Duration => encode_be(as_u64(value)?, 4, 32),
        U64 => encode_be(as_u64(value)?, 8, 64),
        I8 => {
            let v = as_i64(value)?;
            let b: i8 = v.try_into().map_err(|_| {
                value_err(ValueErrorDetail::IntegerOutOfRange { value: v, bits: 8 })
            })?;
            Ok(vec![b as u8])
        }
        String => match value {
            FormattedValue::Text(s) => Ok(s.as_bytes().to_vec()),
            other => Err(kind_mismatch("string", other.type_name())),
        },
        Binary | Vendor | Oid => Err(kind_mismatch("hex", value.type_name())),
        Ipv4 => match value {
            FormattedValue::Ipv4(addr) => Ok(addr.octets().to_vec()),
            FormattedValue::Text(s) => {
                let addr_str = s.split('/').next().unwrap_or(s);
                let addr: Ipv4Addr = addr_str
                    .parse()
                    .map_err(|_| value_err(ValueErrorDetail::MalformedIpv4(s.clone())))?;
                Ok(addr.octets().to_vec())
            }
            other => Err(kind_mismatch("ipv4", other.type_name())),
        },
        Ipv6 => match value {
            FormattedValue::Ipv6(addr) => Ok(addr.octets().to_vec()),
            FormattedValue::Text(s) => {
                let addr: Ipv6Addr = s
                    .parse()
                    .map_err(|_| value_err(ValueErrorDetail::MalformedIpv6(s.clone())))?;
                Ok(addr.octets().to_vec())
            }
            other => Err(kind_mismatch("ipv6", other.type_name())),
        },
        Mac => match value {
            FormattedValue::Mac(mac) => Ok(mac.to_vec()),
            FormattedValue::Text(s) => Ok(parse_mac(s)?.to_vec()),
            other => Err(kind_mismatch("mac", other.type_name())),
        },
        Boolean => {
            let b = match value {
                FormattedValue::Bool(b) => *b,
                FormattedValue::Text(s) => parse_bool_text(s)?,
                other => return Err(kind_mismatch("boolean", other.type_name())),
            };
            Ok(vec![b as u8])
        }
        Enum(width) => {
            let code = match value {
                FormattedValue::Text(name) => enum_map
                    .and_then(|m| m.code_for(name))
                    .ok_or_else(|| value_err(ValueErrorDetail::UnknownEnumName(name.clone())))?,
                FormattedValue::UInt(v) => *v as u32,
                FormattedValue::Integer(v) => *v as u32,
                other => return Err(kind_mismatch("enum", other.type_name())),
            };
            match width {
                EnumWidth::U8 => Ok(vec![code as u8]),
                EnumWidth::U16 => Ok((code as u16).to_be_bytes().to_vec()),
                EnumWidth::U32 => Ok(code.to_be_bytes().to_vec()),
            }
        }
        Compound => Err(kind_mismatch("compound", value.type_name())),
    }
}

fn as_u64(value: &FormattedValue) -> crate::error::Result<u64> {
    match value {
        FormattedValue::UInt(v) => Ok(*v),
        FormattedValue::Integer(v) if *v >= 0 => Ok(*v as u64),
        FormattedValue::Text(s) => s
            .parse::<u64>()
            .map_err(|_| value_err(ValueErrorDetail::IntegerOutOfRange { value: 0, bits: 64 })),
        other => Err(kind_mismatch("integer", other.type_name())),
    }
}

fn as_i64(value: &FormattedValue) -> crate::error::Result<i64> {
    match value {
        FormattedValue::Integer(v) => Ok(*v),
        FormattedValue::UInt(v) => Ok(*v as i64),
        FormattedValue::Text(s) => s
            .parse::<i64>()
            .map_err(|_| value_err(ValueErrorDetail::IntegerOutOfRange { value: 0, bits: 64 })),
        other => Err(kind_mismatch("integer", other.type_name())),
    }
}

fn encode_be(value: u64, width: usize, bits: u8) -> crate::error::Result<Vec<u8>> {
    let max = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
    if value > max {
        return Err(value_err(ValueErrorDetail::IntegerOutOfRange {
            value: value as i64,
            bits,
        }));
    }
    let full = value.to_be_bytes();
    Ok(full[8 - width..].to_vec())
}

fn read_be(bytes: &[u8], width: usize) -> crate::error::Result<u64> {
    if bytes.len() != width {
        return Err(kind_mismatch(
            "fixed-width integer",
            if bytes.is_empty() { "empty" } else { "wrong length" },
        ));
    }
    let mut buf = [0u8; 8];
    buf[8 - width..].copy_from_slice(bytes);
    Ok(u64::from_be_bytes(buf))
}

fn parse_mac(s: &str) -> crate::error::Result<[u8; 6]> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_hexdigit())
        .collect();
    if cleaned.len() != 12 {
        return Err(value_err(ValueErrorDetail::MalformedMac(s.to_string())));
    }
    let mut mac = [0u8; 6];
    for i in 0..6 {
        mac[i] = u8::from_str_radix(&cleaned[i * 2..i * 2 + 2], 16)
            .map_err(|_| value_err(ValueErrorDetail::MalformedMac(s.to_string())))?;
    }
    Ok(mac)
}

fn parse_bool_text(s: &str) -> crate::error::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "enabled" | "on" | "yes" | "true" | "1" => Ok(true),
        "disabled" | "off" | "no" | "false" | "0" => Ok(false),
        _ => Err(kind_mismatch("boolean", "text")),
    }
}

/// Uppercase hex string without separators, used for the binary/vendor fallback.
pub fn hex_fallback(bytes: &[u8]) -> FormattedValue {
    FormattedValue::Hex(hex::encode_upper(bytes))
}

fn decode_hex(s: &str) -> crate::error::Result<Vec<u8>> {
    let cleaned: String = s
        .trim_start_matches("0x")
        .trim_start_matches("0X")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    if cleaned.len() % 2 != 0 {
        return Err(Error::unlocated(ErrorKind::Value(
            ValueErrorDetail::OddHexDigits(s.to_string()),
        )));
    }
    hex::decode(&cleaned)
        .map_err(|_| Error::unlocated(ErrorKind::Parse(crate::error::ParseErrorDetail::InvalidHex(s.to_string()))))
}

fn kind_mismatch(expected: &'static str, actual: &'static str) -> Error {
    value_err(ValueErrorDetail::KindMismatch { expected, actual })
}

fn value_err(detail: ValueErrorDetail) -> Error {
    Error::unlocated(ErrorKind::Value(detail))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(kind: ValueKind, bytes: &[u8], enum_map: Option<&EnumMap>) {
        let formatted = decode(kind, bytes, enum_map).unwrap();
        let back = encode(kind, &formatted, enum_map).unwrap();
        assert_eq!(back, bytes, "roundtrip failed for {formatted:?}");
    }

    #[test]
    fn u8_roundtrips() {
        roundtrip(ValueKind::U8, &[42], None);
    }

    #[test]
    fn u32_roundtrips() {
        roundtrip(ValueKind::U32, &[0, 0, 1, 0], None);
    }

    #[test]
    fn ipv4_roundtrips_including_zero() {
        roundtrip(ValueKind::Ipv4, &[0, 0, 0, 0], None);
        roundtrip(ValueKind::Ipv4, &[192, 168, 0, 1], None);
    }

    #[test]
    fn ipv4_accepts_cidr_suffix_on_encode() {
        let bytes = encode(
            ValueKind::Ipv4,
            &FormattedValue::Text("10.0.0.1/32".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(bytes, vec![10, 0, 0, 1]);
    }

    #[test]
    fn ipv6_roundtrips_including_unspecified() {
        roundtrip(ValueKind::Ipv6, &[0u8; 16], None);
    }

    #[test]
    fn mac_roundtrips_and_accepts_mixed_separators() {
        roundtrip(ValueKind::Mac, &[0x00, 0x11, 0x22, 0x33, 0x44, 0x55], None);
        for input in ["00:11:22:33:44:55", "00-11-22-33-44-55", "0011.2233.4455", "00:11:22:33:44:55".to_uppercase().as_str()] {
            let mac = parse_mac(input).unwrap();
            assert_eq!(mac, [0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        }
    }

    #[test]
    fn boolean_roundtrips() {
        roundtrip(ValueKind::Boolean, &[0], None);
        roundtrip(ValueKind::Boolean, &[1], None);
    }

    #[test]
    fn enum_unknown_code_decodes_to_numeric_literal() {
        let map = EnumMap::from_pairs(&[(1, "on"), (2, "off")]);
        let decoded = decode(ValueKind::Enum(EnumWidth::U8), &[99], Some(&map)).unwrap();
        assert_eq!(decoded, FormattedValue::Text("99".to_string()));
    }

    #[test]
    fn enum_reverse_lookup_accepts_case_insensitive_name_and_numeric_literal() {
        let map = EnumMap::from_pairs(&[(1, "Enabled"), (2, "Disabled")]);
        assert_eq!(map.code_for("enabled"), Some(1));
        assert_eq!(map.code_for("DISABLED"), Some(2));
        assert_eq!(map.code_for("1"), Some(1));
        assert_eq!(map.code_for("0x02"), Some(2));
    }

    #[test]
    fn string_falls_back_to_hex_on_invalid_utf8() {
        let bytes = [0xFF, 0xFE, 0x00];
        let decoded = decode(ValueKind::String, &bytes, None).unwrap();
        assert!(matches!(decoded, FormattedValue::Hex(_)));
    }

    #[test]
    fn hex_encode_requires_even_digit_count() {
        let err = decode_hex("ABC").unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::Value(ValueErrorDetail::OddHexDigits(_))
        ));
    }

    #[test]
    fn hex_formatted_value_always_wins_on_encode() {
        let bytes = encode(ValueKind::U32, &FormattedValue::Hex("DEADBEEF".to_string()), None).unwrap();
        assert_eq!(bytes, vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }
}
