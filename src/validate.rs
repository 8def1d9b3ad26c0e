//! The layered validation framework: structural/schema/required/range checks against a
//! [Document], plus an optional MIC pass and pluggable cross-TLV rules.
//!
//! Every check appends [Diagnostic]s rather than failing fast, so a single `validate` call
//! reports everything wrong with a configuration in one pass. Whether warnings make the overall
//! result invalid is controlled by `strict`, which escalates warnings to errors.

use crate::mic;
use crate::record::{Document, Record};
use crate::registry::{self, LookupVersion};
use crate::value;
use crate::version::{DocsisVersion, PacketCableVersion};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub path: String,
}

#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.severity == Severity::Warning)
    }

    /// Whether the checked document is acceptable. In non-strict mode only `Error`-severity
    /// diagnostics count; in strict mode any diagnostic at all, including warnings, fails it.
    pub fn is_valid(&self, strict: bool) -> bool {
        if strict {
            self.items.is_empty()
        } else {
            self.errors().next().is_none()
        }
    }
}

/// How the MIC pass should treat a mismatch.
#[derive(Clone, Debug)]
pub enum MicCheck {
    /// Don't check MICs at all.
    Off,
    /// Check MICs; a mismatch is reported as a warning.
    NonStrict { cm_secret: Vec<u8>, cmts_secret: Vec<u8> },
    /// Check MICs; a mismatch is reported as an error.
    Strict { cm_secret: Vec<u8>, cmts_secret: Vec<u8> },
}

/// A cross-TLV rule: inspects the whole document and reports whatever it finds. Used for checks
/// that don't fit the single-record schema/range walk, e.g. "CMTS MIC requires a CM MIC".
pub type CrossTlvRule = fn(&Document) -> Vec<Diagnostic>;

#[derive(Clone)]
pub struct ValidateOptions {
    pub docsis_version: DocsisVersion,
    pub packetcable_version: PacketCableVersion,
    pub strict: bool,
    pub mic_check: MicCheck,
    pub extra_rules: Vec<CrossTlvRule>,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            docsis_version: DocsisVersion::default(),
            packetcable_version: PacketCableVersion::default(),
            strict: false,
            mic_check: MicCheck::Off,
            extra_rules: vec![cmts_mic_requires_cm_mic],
        }
    }
}

/// Built-in cross-TLV rule: a CMTS MIC (TLV 7) with no CM MIC (TLV 6) is nonsensical, since the
/// CMTS MIC preimage is defined to include the CM MIC.
fn cmts_mic_requires_cm_mic(doc: &Document) -> Vec<Diagnostic> {
    if doc.find(7).is_some() && doc.find(6).is_none() {
        vec![Diagnostic {
            severity: Severity::Error,
            code: "cmts-mic-without-cm-mic",
            message: "TLV 7 (CMTS MIC) is present without a TLV 6 (CM MIC)".to_string(),
            path: "/".to_string(),
        }]
    } else {
        Vec::new()
    }
}

pub fn validate(doc: &Document, options: &ValidateOptions) -> Diagnostics {
    tracing::debug!(
        records = doc.records.len(),
        docsis_version = %options.docsis_version,
        strict = options.strict,
        "validating document"
    );
    let mut diags = Diagnostics::default();
    check_required(doc, options, &mut diags);
    for (i, record) in doc.records.iter().enumerate() {
        check_record(record, None, &format!("[{i}]"), options, &mut diags);
    }
    check_mic(doc, options, &mut diags);
    for rule in &options.extra_rules {
        diags.items.extend(rule(doc));
    }
    if diags.errors().next().is_some() {
        tracing::warn!(errors = diags.errors().count(), "validation found errors");
    }
    diags
}

fn check_required(doc: &Document, options: &ValidateOptions, diags: &mut Diagnostics) {
    for required in registry::required_types(options.docsis_version) {
        if doc.find(required).is_none() {
            diags.push(Diagnostic {
                severity: Severity::Error,
                code: "required-tlv-missing",
                message: format!("required TLV {required} is missing"),
                path: "/".to_string(),
            });
        }
    }
}

fn check_record(
    record: &Record,
    parent: Option<u8>,
    path: &str,
    options: &ValidateOptions,
    diags: &mut Diagnostics,
) {
    let type_code = record.type_code();
    let schema = match parent {
        None => registry::lookup_top(type_code, options.docsis_version),
        Some(p) => registry::lookup_sub(p, type_code, LookupVersion::Docsis(options.docsis_version))
            .or_else(|| registry::lookup_sub(p, type_code, LookupVersion::PacketCable(options.packetcable_version))),
    };

    let schema = match schema {
        Some(s) => s,
        None => {
            diags.push(Diagnostic {
                severity: Severity::Warning,
                code: "unknown-tlv",
                message: format!("TLV {type_code} is not defined for this version"),
                path: path.to_string(),
            });
            if let Record::Compound(compound) = record {
                for (i, child) in compound.children.iter().enumerate() {
                    check_record(child, Some(type_code), &format!("{path}.{i}"), options, diags);
                }
            }
            return;
        }
    };

    match record {
        Record::Leaf(leaf) => {
            if leaf.bytes.len() > schema.max_length {
                diags.push(Diagnostic {
                    severity: Severity::Error,
                    code: "length-out-of-range",
                    message: format!(
                        "TLV {type_code} value is {} byte(s), maximum is {}",
                        leaf.bytes.len(),
                        schema.max_length
                    ),
                    path: path.to_string(),
                });
            }
            if let Err(e) = value::decode(schema.value_kind, &leaf.bytes, schema.enum_map().as_ref()) {
                diags.push(Diagnostic {
                    severity: Severity::Error,
                    code: "malformed-value",
                    message: format!("TLV {type_code}: {e}"),
                    path: path.to_string(),
                });
            }
            if schema.is_compound() {
                diags.push(Diagnostic {
                    severity: Severity::Warning,
                    code: "compound-parsed-as-leaf",
                    message: format!(
                        "TLV {type_code} is defined as compound but its bytes did not parse as nested TLVs"
                    ),
                    path: path.to_string(),
                });
            }
        }
        Record::Compound(compound) => {
            if !schema.is_compound() {
                diags.push(Diagnostic {
                    severity: Severity::Error,
                    code: "leaf-parsed-as-compound",
                    message: format!("TLV {type_code} is defined as a leaf but was parsed as compound"),
                    path: path.to_string(),
                });
            }
            for (i, child) in compound.children.iter().enumerate() {
                check_record(child, Some(type_code), &format!("{path}.{i}"), options, diags);
            }
        }
    }
}

fn check_mic(doc: &Document, options: &ValidateOptions, diags: &mut Diagnostics) {
    let (cm_secret, cmts_secret, severity) = match &options.mic_check {
        MicCheck::Off => return,
        MicCheck::NonStrict { cm_secret, cmts_secret } => (cm_secret, cmts_secret, Severity::Warning),
        MicCheck::Strict { cm_secret, cmts_secret } => (cm_secret, cmts_secret, Severity::Error),
    };
    if let Err(e) = mic::validate_cm_mic(doc, cm_secret) {
        diags.push(Diagnostic {
            severity,
            code: "cm-mic-invalid",
            message: e.to_string(),
            path: "/".to_string(),
        });
    }
    if let Err(e) = mic::validate_cmts_mic(doc, cmts_secret) {
        diags.push(Diagnostic {
            severity,
            code: "cmts-mic-invalid",
            message: e.to_string(),
            path: "/".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Document;

    #[test]
    fn missing_required_tlv_is_an_error() {
        let doc = Document::new();
        let diags = validate(&doc, &ValidateOptions::default());
        assert!(diags.errors().any(|d| d.code == "required-tlv-missing"));
        assert!(!diags.is_valid(false));
    }

    #[test]
    fn minimal_valid_config_passes() {
        let mut doc = Document::new();
        doc.push(Record::leaf(3, vec![1]));
        let diags = validate(&doc, &ValidateOptions::default());
        assert!(diags.is_valid(false));
    }

    #[test]
    fn unknown_tlv_is_a_warning_not_an_error() {
        let mut doc = Document::new();
        doc.push(Record::leaf(3, vec![1]));
        doc.push(Record::leaf(150, vec![1, 2, 3]));
        let diags = validate(&doc, &ValidateOptions::default());
        assert!(diags.is_valid(false));
        assert!(!diags.is_valid(true));
        assert!(diags.warnings().any(|d| d.code == "unknown-tlv"));
    }

    #[test]
    fn cmts_mic_without_cm_mic_is_an_error() {
        let mut doc = Document::new();
        doc.push(Record::leaf(3, vec![1]));
        doc.push(Record::leaf(7, vec![0u8; 16]));
        let diags = validate(&doc, &ValidateOptions::default());
        assert!(diags.errors().any(|d| d.code == "cmts-mic-without-cm-mic"));
    }

    #[test]
    fn strict_mic_mismatch_is_an_error_non_strict_is_a_warning() {
        let mut doc = Document::new();
        doc.push(Record::leaf(3, vec![1]));
        crate::mic::generate_mics(&mut doc, b"right-secret", b"right-secret").unwrap();

        let non_strict = ValidateOptions {
            mic_check: MicCheck::NonStrict {
                cm_secret: b"wrong-secret".to_vec(),
                cmts_secret: b"wrong-secret".to_vec(),
            },
            ..ValidateOptions::default()
        };
        let diags = validate(&doc, &non_strict);
        assert!(diags.is_valid(false));
        assert!(diags.warnings().any(|d| d.code == "cm-mic-invalid"));

        let strict = ValidateOptions {
            mic_check: MicCheck::Strict {
                cm_secret: b"wrong-secret".to_vec(),
                cmts_secret: b"wrong-secret".to_vec(),
            },
            ..ValidateOptions::default()
        };
        let diags = validate(&doc, &strict);
        assert!(!diags.is_valid(false));
    }

    #[test]
    fn value_out_of_range_length_is_an_error() {
        let mut doc = Document::new();
        doc.push(Record::leaf(3, vec![1]));
        doc.push(Record::leaf(2, vec![1, 2, 3, 4, 5])); // Upstream Channel ID is a u8, max_length 1
        let diags = validate(&doc, &ValidateOptions::default());
        assert!(diags.errors().any(|d| d.code == "length-out-of-range"));
    }
}
