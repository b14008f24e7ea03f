//! End-to-end strip and transcode behavior through the public API

use bom_core::{strip, BomError, BomType, BomTypeSet, StripOptions};

fn run(input: &[u8], opts: &StripOptions) -> bom_core::Result<(BomType, Vec<u8>)> {
    let mut reader = input;
    let mut output = Vec::new();
    let bom = strip(&mut reader, &mut output, opts)?;
    Ok((bom, output))
}

fn convert_opts() -> StripOptions {
    StripOptions {
        to_utf8: true,
        ..StripOptions::default()
    }
}

/// Build a marked stream: signature, then `text` in the mark's encoding
fn encode(bom: BomType, text: &str) -> Vec<u8> {
    let mut out = bom.signature().to_vec();
    match bom {
        BomType::Utf8 => out.extend_from_slice(text.as_bytes()),
        BomType::Utf16Be => {
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_be_bytes());
            }
        }
        BomType::Utf16Le => {
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
        }
        BomType::Utf32Be => {
            for ch in text.chars() {
                out.extend_from_slice(&u32::from(ch).to_be_bytes());
            }
        }
        BomType::Utf32Le => {
            for ch in text.chars() {
                out.extend_from_slice(&u32::from(ch).to_le_bytes());
            }
        }
        _ => panic!("no encoder for {}", bom.name()),
    }
    out
}

#[test]
fn utf_family_transcodes_to_utf8() {
    let text = "it is \u{2603} outside \u{1F600}";
    for bom in [
        BomType::Utf8,
        BomType::Utf16Be,
        BomType::Utf16Le,
        BomType::Utf32Be,
        BomType::Utf32Le,
    ] {
        // A UTF-32LE stream opens FF FE 00 00, which resolves as UTF-16LE
        // unless prefer32 is set.
        let opts = StripOptions {
            prefer32: bom == BomType::Utf32Le,
            ..convert_opts()
        };
        let (detected, out) = run(&encode(bom, text), &opts).unwrap();
        assert_eq!(detected, bom, "wrong type for {}", bom.name());
        assert_eq!(out, text.as_bytes(), "wrong output for {}", bom.name());
    }
}

#[test]
fn utf7_transcodes_to_utf8() {
    // Direct characters plus a shifted run for U+263A.
    let mut input = BomType::Utf7.signature().to_vec();
    input.extend_from_slice(b"Hi Mom -+Jjo--!");
    let (bom, out) = run(&input, &convert_opts()).unwrap();
    assert_eq!(bom, BomType::Utf7);
    assert_eq!(out, "Hi Mom -\u{263A}-!".as_bytes());
}

#[test]
fn gb18030_transcodes_to_utf8() {
    let mut input = BomType::Gb18030.signature().to_vec();
    input.extend_from_slice(&[0xC4, 0xE3, 0xBA, 0xC3]);
    let (bom, out) = run(&input, &convert_opts()).unwrap();
    assert_eq!(bom, BomType::Gb18030);
    assert_eq!(out, "\u{4F60}\u{597D}".as_bytes());
}

#[test]
fn strip_without_conversion_copies_raw_bytes() {
    let text = "caf\u{E9}";
    for bom in [BomType::Utf8, BomType::Utf16Be, BomType::Utf32Be] {
        let input = encode(bom, text);
        let (detected, out) = run(&input, &StripOptions::default()).unwrap();
        assert_eq!(detected, bom);
        assert_eq!(out, &input[bom.len()..]);
    }
}

#[test]
fn unmarked_binary_input_is_untouched() {
    let input: Vec<u8> = (0u8..=255).cycle().skip(1).take(4096).collect();
    assert_ne!(input[0], 0xEF);
    let (bom, out) = run(&input, &convert_opts()).unwrap();
    assert_eq!(bom, BomType::None);
    assert_eq!(out, input);
}

#[test]
fn empty_input_produces_empty_output() {
    let (bom, out) = run(b"", &convert_opts()).unwrap();
    assert_eq!(bom, BomType::None);
    assert!(out.is_empty());

    // A bare signature with no body also produces nothing.
    let (bom, out) = run(&encode(BomType::Utf16Be, ""), &convert_opts()).unwrap();
    assert_eq!(bom, BomType::Utf16Be);
    assert!(out.is_empty());
}

#[test]
fn strict_conversion_fails_on_illegal_sequences() {
    // 0xD800 is an unpaired surrogate in UTF-32BE.
    let mut input = BomType::Utf32Be.signature().to_vec();
    input.extend_from_slice(&[0x00, 0x00, 0xD8, 0x00]);
    let err = run(&input, &convert_opts()).unwrap_err();
    match err {
        BomError::IllegalBytes { encoding, offset } => {
            assert_eq!(encoding, "UTF-32BE");
            assert_eq!(offset, 4);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn lenient_conversion_drops_illegal_sequences() {
    let mut input = encode(BomType::Utf32Be, "a");
    input.extend_from_slice(&[0x00, 0x00, 0xD8, 0x00]);
    input.extend_from_slice(&encode(BomType::Utf32Be, "b")[BomType::Utf32Be.len()..]);

    let opts = StripOptions {
        lenient: true,
        ..convert_opts()
    };
    let (_, out) = run(&input, &opts).unwrap();
    assert_eq!(out, b"ab");
}

#[test]
fn truncated_tail_fails_strict_only() {
    let mut input = encode(BomType::Utf16Be, "ok");
    input.push(0x00);

    assert!(matches!(
        run(&input, &convert_opts()),
        Err(BomError::IllegalBytes { .. })
    ));

    let opts = StripOptions {
        lenient: true,
        ..convert_opts()
    };
    let (_, out) = run(&input, &opts).unwrap();
    assert_eq!(out, b"ok");
}

#[test]
fn unexpected_type_fails_before_any_output() {
    let opts = StripOptions {
        expect: BomTypeSet::from(BomType::Utf8),
        ..StripOptions::default()
    };
    let err = run(&encode(BomType::Utf16Le, "data"), &opts).unwrap_err();
    assert!(matches!(err, BomError::UnexpectedType(BomType::Utf16Le)));
}

#[test]
fn long_streams_survive_buffer_refills() {
    let text = "0123456789".repeat(1000);
    for bom in [BomType::Utf16Le, BomType::Utf32Be] {
        let (_, out) = run(&encode(bom, &text), &convert_opts()).unwrap();
        assert_eq!(out, text.as_bytes());
    }
}
