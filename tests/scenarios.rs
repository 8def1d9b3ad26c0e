//! End-to-end scenarios spanning the codec, schema registry, value formatter, MIC engine,
//! structured bridge, and config text dialect together, rather than any one module in isolation.

use docsis_tlv::config_text::UnknownIdentifierPolicy;
use docsis_tlv::record::{Document, Record};
use docsis_tlv::validate::{MicCheck, ValidateOptions};
use docsis_tlv::{config_text, generate, mic, parse, structured, validate, DocsisVersion, PacketCableVersion};

#[test]
fn scenario_minimal_config_with_mic() {
    let mut doc = Document::new();
    doc.push(Record::leaf(3, vec![0x01]));
    mic::generate_mics(&mut doc, b"topsecret", b"topsecret").unwrap();

    let bytes = generate(&doc).unwrap();
    let reparsed = parse(&bytes, DocsisVersion::V3_1, PacketCableVersion::V2_0).unwrap();

    mic::validate_cm_mic(&reparsed, b"topsecret").unwrap();
    mic::validate_cmts_mic(&reparsed, b"topsecret").unwrap();

    let options = ValidateOptions {
        mic_check: MicCheck::Strict {
            cm_secret: b"topsecret".to_vec(),
            cmts_secret: b"topsecret".to_vec(),
        },
        ..ValidateOptions::default()
    };
    assert!(validate::validate(&reparsed, &options).is_valid(false));
}

#[test]
fn scenario_extended_length_value_survives_every_surface() {
    let value: Vec<u8> = (0u8..18).collect();
    let mut doc = Document::new();
    doc.push(Record::leaf(3, vec![0x01]));
    doc.push(Record::leaf(8, value.clone()));

    let bytes = generate(&doc).unwrap();
    // 0xFF marker + big-endian u16 length for the 18-byte value.
    assert!(bytes.windows(3).any(|w| w == [0xFF, 0x00, 0x12]));

    let structured_doc = structured::to_structured(&doc, DocsisVersion::V3_1, None);
    let json = structured::to_json(&structured_doc).unwrap();
    let rebuilt = structured::from_structured(&structured::from_json(&json).unwrap()).unwrap();
    assert_eq!(rebuilt, doc);

    let text = config_text::emit(&doc, DocsisVersion::V3_1, PacketCableVersion::V2_0);
    let reparsed_text = config_text::parse(
        &text,
        DocsisVersion::V3_1,
        PacketCableVersion::V2_0,
        UnknownIdentifierPolicy::Strict,
    )
    .unwrap();
    assert_eq!(reparsed_text, doc);
}

#[test]
fn scenario_unknown_tlv_falls_back_to_hex_everywhere() {
    let bytes = [0xC9, 0x06, 0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE];
    let doc = parse(&bytes, DocsisVersion::V3_1, PacketCableVersion::V2_0).unwrap();
    assert!(doc.records[0].as_leaf().is_some());

    let structured_doc = structured::to_structured(&doc, DocsisVersion::V3_1, None);
    assert_eq!(structured_doc.tlvs[0].value.as_deref(), Some("DEADBEEFCAFE"));

    let text = config_text::emit(&doc, DocsisVersion::V3_1, PacketCableVersion::V2_0);
    assert!(text.contains("TlvCode 201 DEADBEEFCAFE;"));

    let options = ValidateOptions::default();
    let diags = validate::validate(&doc, &options);
    assert!(diags.warnings().any(|d| d.code == "unknown-tlv"));
}

#[test]
fn scenario_ofdm_profile_subtlv_edit_round_trips() {
    let mut doc = Document::new();
    doc.push(Record::leaf(3, vec![0x01]));
    doc.push(Record::compound(
        62,
        vec![
            Record::leaf(1, vec![7]),
            Record::leaf(4, vec![1]), // Subcarrier Spacing = 50 kHz
            Record::leaf(5, vec![2]), // Cyclic Prefix = 384 samples
        ],
    ));

    let structured_doc = structured::to_structured(&doc, DocsisVersion::V3_1, None);
    let profile = &structured_doc.tlvs[1];
    assert_eq!(profile.subtlvs[1].formatted_value.as_deref(), Some("50 kHz"));
    assert_eq!(profile.subtlvs[2].formatted_value.as_deref(), Some("384 samples"));

    // Edit the cyclic prefix by name and re-encode.
    let mut edited = structured_doc.clone();
    edited.tlvs[1].subtlvs[2].formatted_value = Some("512 samples".to_string());
    let rebuilt = structured::from_structured(&edited).unwrap();
    let compound = rebuilt.records[1].as_compound().unwrap();
    assert_eq!(compound.children[2].as_leaf().unwrap().bytes, vec![3]);
}

#[test]
fn scenario_mic_mismatch_is_detected() {
    let mut doc = Document::new();
    doc.push(Record::leaf(3, vec![0x01]));
    mic::generate_mics(&mut doc, b"correct-secret", b"correct-secret").unwrap();

    let err = mic::validate_cm_mic(&doc, b"wrong-secret").unwrap_err();
    assert!(matches!(
        err.kind(),
        docsis_tlv::error::ErrorKind::Mic(docsis_tlv::error::MicErrorDetail::CmInvalid { .. })
    ));

    let options = ValidateOptions {
        mic_check: MicCheck::Strict {
            cm_secret: b"wrong-secret".to_vec(),
            cmts_secret: b"wrong-secret".to_vec(),
        },
        ..ValidateOptions::default()
    };
    assert!(!validate::validate(&doc, &options).is_valid(false));
}

#[test]
fn scenario_duplicate_top_level_tlvs_are_preserved() {
    let mut doc = Document::new();
    doc.push(Record::leaf(9, b"first.bin".to_vec()));
    doc.push(Record::leaf(9, b"second.bin".to_vec()));

    let bytes = generate(&doc).unwrap();
    let reparsed = parse(&bytes, DocsisVersion::V3_1, PacketCableVersion::V2_0).unwrap();
    assert_eq!(reparsed.find_all(9).len(), 2);
    assert_eq!(reparsed.records[0].as_leaf().unwrap().bytes, b"first.bin");
    assert_eq!(reparsed.records[1].as_leaf().unwrap().bytes, b"second.bin");
}

#[test]
fn minimal_length_encoding_is_chosen_on_every_generate() {
    // 254 bytes uses the short form, 255 requires the extended form.
    let mut doc = Document::new();
    doc.push(Record::leaf(43, vec![0u8; 254]));
    let bytes = generate(&doc).unwrap();
    assert_eq!(bytes[1], 254);

    let mut doc = Document::new();
    doc.push(Record::leaf(43, vec![0u8; 255]));
    let bytes = generate(&doc).unwrap();
    assert_eq!(bytes[1], 0xFF);
    assert_eq!(u16::from_be_bytes([bytes[2], bytes[3]]), 255);
}

#[test]
fn config_text_identifiers_are_case_and_whitespace_insensitive_against_registry_names() {
    let doc = config_text::parse(
        "networkaccesscontrol enabled;",
        DocsisVersion::V3_1,
        PacketCableVersion::V2_0,
        UnknownIdentifierPolicy::Strict,
    )
    .unwrap();
    assert_eq!(doc.records[0].as_leaf().unwrap().bytes, vec![0x01]);
}

#[test]
fn schema_version_gating_affects_validation_required_set() {
    let doc = Document::new();
    // TLV 3 is required at every DOCSIS version, so an empty document fails at both.
    let old = ValidateOptions {
        docsis_version: DocsisVersion::V1_0,
        ..ValidateOptions::default()
    };
    let new = ValidateOptions {
        docsis_version: DocsisVersion::V3_1,
        ..ValidateOptions::default()
    };
    assert!(!validate::validate(&doc, &old).is_valid(false));
    assert!(!validate::validate(&doc, &new).is_valid(false));
}
