//! Error path and encoding behavior.

use semgo::{parse, ByteSpan, Location, NodeKind, ParseError};

#[test]
fn unsupported_encoding_is_rejected_before_parsing() {
    let err = parse(b"package main\n", "ISO-8859-1").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnsupportedEncoding("ISO-8859-1".to_string())
    );
}

#[test]
fn encoding_name_is_case_insensitive() {
    assert!(parse(b"package main\n", "utf-8").is_ok());
    assert!(parse(b"package main\n", "windows-1252").is_ok());
}

// An empty buffer is a successful call with a degraded one-error tree, not
// a failure.
#[test]
fn empty_source_yields_degraded_file() {
    let file = parse(b"", "UTF-8").unwrap();

    assert_eq!(file.location_span.start, Location::new(1, 0));
    assert_eq!(file.location_span.end, Location::new(1, 0));
    assert_eq!(file.footer_span, ByteSpan::EMPTY);
    assert!(file.children.is_empty());
    assert_eq!(file.parsing_errors.len(), 1);
    assert_eq!(file.parsing_errors[0].location, Location::new(1, 0));
    assert_eq!(
        file.parsing_errors[0].message,
        "1:1: expected 'package', found 'EOF'"
    );
}

#[test]
fn syntax_error_yields_degraded_file() {
    let file = parse(b"package main\n\nfunc main( {\n", "UTF-8").unwrap();

    assert!(file.has_errors());
    assert!(file.children.is_empty());
    assert_eq!(file.parsing_errors.len(), 1);
    assert_eq!(file.parsing_errors[0].location, Location::new(1, 0));
}

#[test]
fn missing_package_clause_is_a_syntax_error() {
    let file = parse(b"var x = 1\n", "UTF-8").unwrap();

    assert!(file.has_errors());
    assert!(file.children.is_empty());
}

#[test]
fn invalid_utf8_yields_degraded_file() {
    let file = parse(b"package main\xff\n", "UTF-8").unwrap();

    assert!(file.has_errors());
    assert!(file.children.is_empty());
    assert!(file.parsing_errors[0].message.contains("invalid UTF-8"));
}

#[test]
fn windows_1252_source_is_transcoded() {
    let file = parse(
        b"package main\n\n// caf\xe9 notes\nfunc F() {\n}\n",
        "WINDOWS-1252",
    )
    .unwrap();

    assert!(!file.has_errors());
    let kinds: Vec<NodeKind> = file.children.iter().map(|n| n.kind()).collect();
    assert_eq!(kinds, vec![NodeKind::Package, NodeKind::Function]);
    assert_eq!(file.children[1].name(), "F");
}
