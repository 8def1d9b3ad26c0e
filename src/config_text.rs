//! The brace-delimited DOCSIS/MTA configuration text dialect: a human-editable surface syntax
//! for a [Document], sitting alongside the binary codec and the JSON/YAML bridge.
//!
//! ```text
//! NetworkAccessControl enabled;
//! ClassOfService {
//!     ClassID 1;
//!     MaxDownstreamRate 10000000;
//! }
//! TlvCode 201 DEADBEEFCAFE;
//! ```
//!
//! Identifiers are the registry's TLV/sub-TLV names with whitespace stripped, matched
//! case-insensitively. Any TLV not known to the registry (or a known one a caller wants to set
//! verbatim) uses the `TlvCode <type> <hex>;` escape hatch.

use crate::error::{Error, ErrorKind, ParseErrorDetail};
use crate::record::{Document, Record};
use crate::registry::{self, LookupVersion, SchemaEntry};
use crate::structured::resolve_schema;
use crate::value::{self, FormattedValue, ValueKind};
use crate::version::{DocsisVersion, PacketCableVersion};

fn identifier_for(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

fn formatted_value_for_encode(kind: ValueKind, text: &str) -> FormattedValue {
    match kind {
        ValueKind::Binary | ValueKind::Vendor | ValueKind::Oid => FormattedValue::Hex(text.to_string()),
        _ => FormattedValue::Text(text.to_string()),
    }
}

// --- Tokenizer ----------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LBrace,
    RBrace,
    Semi,
    Word(String),
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current = String::new();
    while let Some(&c) = chars.peek() {
        match c {
            '#' => {
                while let Some(&c2) = chars.peek() {
                    if c2 == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '/' => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    while let Some(&c2) = chars.peek() {
                        if c2 == '\n' {
                            break;
                        }
                        chars.next();
                    }
                } else {
                    current.push('/');
                }
            }
            '{' | '}' | ';' => {
                if !current.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut current)));
                }
                tokens.push(match c {
                    '{' => Token::LBrace,
                    '}' => Token::RBrace,
                    _ => Token::Semi,
                });
                chars.next();
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut current)));
                }
                chars.next();
            }
            _ => {
                current.push(c);
                chars.next();
            }
        }
    }
    if !current.is_empty() {
        tokens.push(Token::Word(current));
    }
    tokens
}

// --- Parser --------------------------------------------------------------------------------------

/// Unknown-identifier handling: `Strict` rejects a config text document that references a TLV
/// name the registry does not recognize; `Permissive` silently drops the offending statement
/// (block body and all) and keeps parsing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnknownIdentifierPolicy {
    Strict,
    Permissive,
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    docsis_version: DocsisVersion,
    packetcable_version: PacketCableVersion,
    policy: UnknownIdentifierPolicy,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn expect_word(&mut self) -> crate::error::Result<String> {
        match self.advance() {
            Some(Token::Word(w)) => Ok(w.clone()),
            other => Err(self.syntax_err(format!("expected an identifier or value, found {other:?}"))),
        }
    }

    fn expect_semi(&mut self) -> crate::error::Result<()> {
        match self.advance() {
            Some(Token::Semi) => Ok(()),
            other => Err(self.syntax_err(format!("expected ';', found {other:?}"))),
        }
    }

    fn expect_rbrace(&mut self) -> crate::error::Result<()> {
        match self.advance() {
            Some(Token::RBrace) => Ok(()),
            other => Err(self.syntax_err(format!("expected '}}', found {other:?}"))),
        }
    }

    fn peek_is_lbrace(&self) -> bool {
        matches!(self.peek(), Some(Token::LBrace))
    }

    fn peek_is_rbrace(&self) -> bool {
        matches!(self.peek(), Some(Token::RBrace))
    }

    fn syntax_err(&self, msg: String) -> Error {
        Error::unlocated(ErrorKind::Parse(ParseErrorDetail::InvalidConfigSyntax(msg)))
    }

    fn unknown_identifier(&self, word: &str) -> Error {
        Error::unlocated(ErrorKind::Parse(ParseErrorDetail::UnknownIdentifier(word.to_string())))
    }

    fn resolve_top(&self, word: &str) -> Option<&'static SchemaEntry> {
        registry::supported_types(self.docsis_version)
            .into_iter()
            .find_map(|t| {
                registry::lookup_top(t, self.docsis_version)
                    .filter(|e| identifier_for(e.name).eq_ignore_ascii_case(word))
            })
    }

    fn resolve_sub(&self, parent: u8, word: &str) -> Option<&'static SchemaEntry> {
        for subtype in 0u8..=255 {
            if let Some(e) = registry::lookup_sub(parent, subtype, LookupVersion::Docsis(self.docsis_version)) {
                if identifier_for(e.name).eq_ignore_ascii_case(word) {
                    return Some(e);
                }
            }
            if let Some(e) = registry::lookup_sub(parent, subtype, LookupVersion::PacketCable(self.packetcable_version)) {
                if identifier_for(e.name).eq_ignore_ascii_case(word) {
                    return Some(e);
                }
            }
            if subtype == 255 {
                break;
            }
        }
        None
    }

    /// Skip a single already-consumed-identifier statement's remainder: either `value;` or a
    /// brace-delimited block, used when a permissive parse drops an unrecognized identifier.
    fn skip_statement_body(&mut self) -> crate::error::Result<()> {
        if self.peek_is_lbrace() {
            self.advance();
            let mut depth = 1;
            while depth > 0 {
                match self.advance() {
                    Some(Token::LBrace) => depth += 1,
                    Some(Token::RBrace) => depth -= 1,
                    Some(_) => {}
                    None => return Err(self.syntax_err("unterminated block".to_string())),
                }
            }
            Ok(())
        } else {
            self.expect_word()?;
            self.expect_semi()
        }
    }

    fn parse_tlv_code(&mut self) -> crate::error::Result<Record> {
        let type_str = self.expect_word()?;
        let type_code: u8 = type_str
            .parse()
            .map_err(|_| self.syntax_err(format!("invalid TLV type '{type_str}' after TlvCode")))?;
        let hex_str = self.expect_word()?;
        self.expect_semi()?;
        let bytes = value::encode(ValueKind::Binary, &FormattedValue::Hex(hex_str.clone()), None)
            .map_err(|_| self.syntax_err(format!("invalid hex payload '{hex_str}' for TlvCode {type_code}")))?;
        Ok(Record::leaf(type_code, bytes))
    }

    fn parse_statement(&mut self, parent: Option<u8>) -> crate::error::Result<Option<Record>> {
        let word = self.expect_word()?;
        if parent.is_none() && word.eq_ignore_ascii_case("TlvCode") {
            return Ok(Some(self.parse_tlv_code()?));
        }

        let schema = match parent {
            None => self.resolve_top(&word),
            Some(p) => self.resolve_sub(p, &word),
        };

        let schema = match schema {
            Some(s) => s,
            None => {
                return match self.policy {
                    UnknownIdentifierPolicy::Strict => Err(self.unknown_identifier(&word)),
                    UnknownIdentifierPolicy::Permissive => {
                        self.skip_statement_body()?;
                        Ok(None)
                    }
                };
            }
        };

        if self.peek_is_lbrace() {
            self.advance();
            let mut children = Vec::new();
            while !self.peek_is_rbrace() {
                if let Some(child) = self.parse_statement(Some(schema.type_code as u8))? {
                    children.push(child);
                }
            }
            self.expect_rbrace()?;
            Ok(Some(Record::compound(schema.type_code as u8, children)))
        } else {
            let value_text = self.expect_word()?;
            self.expect_semi()?;
            let candidate = formatted_value_for_encode(schema.value_kind, &value_text);
            let bytes = value::encode(schema.value_kind, &candidate, schema.enum_map().as_ref())?;
            Ok(Some(Record::leaf(schema.type_code as u8, bytes)))
        }
    }
}

/// Parse a config text document into a [Document].
pub fn parse(
    text: &str,
    docsis_version: DocsisVersion,
    packetcable_version: PacketCableVersion,
    policy: UnknownIdentifierPolicy,
) -> crate::error::Result<Document> {
    let tokens = tokenize(text);
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        docsis_version,
        packetcable_version,
        policy,
    };
    let mut doc = Document::new();
    while parser.peek().is_some() {
        if let Some(record) = parser.parse_statement(None)? {
            doc.push(record);
        }
    }
    Ok(doc)
}

// --- Emitter -------------------------------------------------------------------------------------

/// Emit a [Document] as canonical config text: registry names where known, `TlvCode` fallback
/// otherwise.
pub fn emit(doc: &Document, docsis_version: DocsisVersion, packetcable_version: PacketCableVersion) -> String {
    let mut out = String::new();
    for record in &doc.records {
        emit_record(record, None, docsis_version, packetcable_version, 0, &mut out);
    }
    out
}

fn emit_record(
    record: &Record,
    parent: Option<u8>,
    docsis_version: DocsisVersion,
    packetcable_version: PacketCableVersion,
    indent: usize,
    out: &mut String,
) {
    let pad = "    ".repeat(indent);
    let type_code = record.type_code();
    let schema = resolve_schema(type_code, parent, docsis_version, packetcable_version);
    match record {
        Record::Leaf(leaf) => match schema {
            Some(s) => {
                let formatted = value::decode(s.value_kind, &leaf.bytes, s.enum_map().as_ref())
                    .unwrap_or_else(|_| value::hex_fallback(&leaf.bytes));
                out.push_str(&format!("{pad}{} {};\n", identifier_for(s.name), formatted));
            }
            None => {
                out.push_str(&format!("{pad}TlvCode {} {};\n", type_code, hex::encode_upper(&leaf.bytes)));
            }
        },
        Record::Compound(compound) => {
            let name = schema
                .map(|s| identifier_for(s.name))
                .unwrap_or_else(|| format!("TlvType{type_code}"));
            out.push_str(&format!("{pad}{name} {{\n"));
            for child in &compound.children {
                emit_record(child, Some(type_code), docsis_version, packetcable_version, indent + 1, out);
            }
            out.push_str(&format!("{pad}}}\n"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_leaf_statement() {
        let doc = parse(
            "NetworkAccessControl enabled;",
            DocsisVersion::V3_1,
            PacketCableVersion::V2_0,
            UnknownIdentifierPolicy::Strict,
        )
        .unwrap();
        assert_eq!(doc.records[0].as_leaf().unwrap().bytes, vec![0x01]);
    }

    #[test]
    fn hash_and_slash_slash_comments_are_both_stripped() {
        let doc = parse(
            "# a full-line comment\nNetworkAccessControl enabled; // trailing comment\n",
            DocsisVersion::V3_1,
            PacketCableVersion::V2_0,
            UnknownIdentifierPolicy::Strict,
        )
        .unwrap();
        assert_eq!(doc.records.len(), 1);
        assert_eq!(doc.records[0].as_leaf().unwrap().bytes, vec![0x01]);
    }

    #[test]
    fn parses_a_compound_block() {
        let doc = parse(
            "ClassOfService { ClassID 1; }",
            DocsisVersion::V3_1,
            PacketCableVersion::V2_0,
            UnknownIdentifierPolicy::Strict,
        )
        .unwrap();
        let compound = doc.records[0].as_compound().unwrap();
        assert_eq!(compound.children[0].as_leaf().unwrap().bytes, vec![1]);
    }

    #[test]
    fn parses_tlvcode_fallback() {
        let doc = parse(
            "TlvCode 201 DEADBEEFCAFE;",
            DocsisVersion::V3_1,
            PacketCableVersion::V2_0,
            UnknownIdentifierPolicy::Strict,
        )
        .unwrap();
        assert_eq!(doc.records[0].type_code(), 201);
        assert_eq!(
            doc.records[0].as_leaf().unwrap().bytes,
            vec![0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
        );
    }

    #[test]
    fn strict_mode_rejects_unknown_identifier() {
        let err = parse(
            "ThisIdentifierDoesNotExist 1;",
            DocsisVersion::V3_1,
            PacketCableVersion::V2_0,
            UnknownIdentifierPolicy::Strict,
        )
        .unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::Parse(ParseErrorDetail::UnknownIdentifier(_))
        ));
    }

    #[test]
    fn permissive_mode_drops_unknown_identifier_and_continues() {
        let doc = parse(
            "ThisIdentifierDoesNotExist 1;\nNetworkAccessControl enabled;",
            DocsisVersion::V3_1,
            PacketCableVersion::V2_0,
            UnknownIdentifierPolicy::Permissive,
        )
        .unwrap();
        assert_eq!(doc.records.len(), 1);
        assert_eq!(doc.records[0].type_code(), 3);
    }

    #[test]
    fn emit_then_parse_roundtrips() {
        let mut doc = Document::new();
        doc.push(Record::leaf(3, vec![1]));
        doc.push(Record::compound(4, vec![Record::leaf(1, vec![1])]));
        let text = emit(&doc, DocsisVersion::V3_1, PacketCableVersion::V2_0);
        let reparsed = parse(&text, DocsisVersion::V3_1, PacketCableVersion::V2_0, UnknownIdentifierPolicy::Strict).unwrap();
        assert_eq!(reparsed, doc);
    }
}
