use std::path::Path;

use super::source::{Source, load_source};

#[test]
fn inline_text_wins() {
    let source = load_source(Some("1 + 2"), Some(Path::new("ignored.ex"))).unwrap();
    assert_eq!(
        source,
        Source {
            name: "<inline>".to_string(),
            text: "1 + 2".to_string(),
        }
    );
}

#[test]
fn reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.ex");
    std::fs::write(&path, "x").unwrap();

    let source = load_source(None, Some(&path)).unwrap();
    assert_eq!(source.text, "x");
    assert!(source.name.ends_with("a.ex"));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.ex");
    let err = load_source(None, Some(&path)).unwrap_err();
    assert!(err.starts_with("failed to read"));
    assert!(err.contains("missing.ex"));
}

#[test]
fn source_is_required() {
    let err = load_source(None, None).unwrap_err();
    insta::assert_snapshot!(err, @"source is required: use positional argument or -s/--source");
}
