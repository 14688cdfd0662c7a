use indoc::indoc;

use super::output::parse_output;
use super::{BuildMessage, MessageKind};

fn render(output: &str) -> String {
    parse_output(output)
        .iter()
        .map(BuildMessage::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn compile_error_with_line() {
    let messages = parse_output("** (CompileError) lib/a.ex:3: undefined function foo/0\n");
    assert_eq!(messages.len(), 1);
    let message = &messages[0];
    assert_eq!(message.kind, MessageKind::Error);
    assert_eq!(message.file.as_deref(), Some(std::path::Path::new("lib/a.ex")));
    assert_eq!(message.line, Some(3));
    assert_eq!(message.text, "undefined function foo/0");
}

#[test]
fn errors_with_column_and_without_location() {
    let output = indoc! {"
        ** (SyntaxError) lib/a.ex:2:7: syntax error before: ')'
        ** (CompileError) lib/b.ex: cannot compile module B
        ** (Mix) Could not compile dependency :x
    "};
    insta::assert_snapshot!(render(output), @r"
    error: lib/a.ex:2: syntax error before: ')'
    error: lib/b.ex: cannot compile module B
    error: Could not compile dependency :x
    ");
}

#[test]
fn warning_with_indented_location() {
    let output = indoc! {r#"
        warning: variable "x" is unused
          lib/a.ex:3: A.run/0

    "#};
    insta::assert_snapshot!(render(output), @r#"warning: lib/a.ex:3: variable "x" is unused"#);
}

#[test]
fn warning_with_boxed_location() {
    let output = indoc! {r#"
        warning: variable "x" is unused
            │
          3 │   x = 1
            │   ~
            │
            └─ lib/a.ex:3:3: A.run/0

        error: undefined variable "y"
            │
            └─ test/a_test.exs:9:5: ATest."test run"/1
    "#};
    let messages = parse_output(output);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].file.as_deref(), Some(std::path::Path::new("test/a_test.exs")));
    insta::assert_snapshot!(render(output), @r#"
    warning: lib/a.ex:3: variable "x" is unused
    error: test/a_test.exs:9: undefined variable "y"
    "#);
}

#[test]
fn single_line_warning() {
    insta::assert_snapshot!(
        render("lib/a.ex:1: warning: redefining module A (current version loaded from ebin)"),
        @"warning: lib/a.ex:1: redefining module A (current version loaded from ebin)"
    );
}

#[test]
fn progress_lines_are_info() {
    let output = indoc! {"
        Compiling 2 files (.ex)
        Generated app app
        ==> deps
    "};
    let messages = parse_output(output);
    assert!(messages.iter().all(|m| m.kind == MessageKind::Info));
    insta::assert_snapshot!(render(output), @r"
    info: Compiling 2 files (.ex)
    info: Generated app app
    ");
}

#[test]
fn header_without_location_is_kept() {
    let output = "warning: deprecated config\nCompiling 1 file (.ex)\n";
    insta::assert_snapshot!(render(output), @r"
    warning: deprecated config
    info: Compiling 1 file (.ex)
    ");
}

#[test]
fn pending_header_at_end_of_output() {
    let messages = parse_output("warning: trailing");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].file, None);
}

#[test]
fn serializes_to_json() {
    let messages = parse_output("** (CompileError) lib/a.ex:3: boom");
    let json = serde_json::to_string(&messages).unwrap();
    insta::assert_snapshot!(json, @r#"[{"kind":"error","file":"lib/a.ex","line":3,"text":"boom"}]"#);
}
