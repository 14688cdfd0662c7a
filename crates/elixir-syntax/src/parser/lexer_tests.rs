use crate::parser::cst::SyntaxKind;
use crate::parser::lexer::{
    Group, GroupKind, Lexer, LexicalState, StateStack, Terminator, lex, token_text,
};

/// Format tokens without trivia (default for most tests)
fn snapshot(input: &str) -> String {
    format_tokens(input, false)
}

/// Format tokens with trivia included
fn snapshot_raw(input: &str) -> String {
    format_tokens(input, true)
}

fn format_tokens(input: &str, include_trivia: bool) -> String {
    let tokens = lex(input);
    let mut out = String::new();
    for token in tokens {
        if include_trivia || !token.kind.is_trivia() {
            out.push_str(&format!(
                "{:?} {:?}\n",
                token.kind,
                token_text(input, &token)
            ));
        }
    }
    out
}

/// Last token kind and the state on top of the stack once input is exhausted.
fn last_token_and_state(input: &str) -> (SyntaxKind, LexicalState) {
    let mut lexer = Lexer::new(input);
    let mut last = None;
    for token in lexer.by_ref() {
        last = Some(token.kind);
    }
    let kind = last.expect("input produces at least one token");
    (kind, lexer.state().top())
}

#[test]
fn identifiers_and_aliases() {
    insta::assert_snapshot!(snapshot("foo Bar baz? qux! _x A"), @r#"
    Identifier "foo"
    Alias "Bar"
    Identifier "baz?"
    Identifier "qux!"
    Identifier "_x"
    Alias "A"
    "#);
}

#[test]
fn unicode_identifiers() {
    insta::assert_snapshot!(snapshot("café π_val naïve: :ñ"), @r#"
    Identifier "café"
    Identifier "π_val"
    KeywordKey "naïve:"
    Atom ":ñ"
    "#);
}

#[test]
fn reserved_words() {
    insta::assert_snapshot!(snapshot("fn do end else when and or not in true false nil"), @r#"
    KwFn "fn"
    KwDo "do"
    KwEnd "end"
    KwElse "else"
    KwWhen "when"
    KwAnd "and"
    KwOr "or"
    KwNot "not"
    KwIn "in"
    KwTrue "true"
    KwFalse "false"
    KwNil "nil"
    "#);
}

#[test]
fn keyword_keys() {
    insta::assert_snapshot!(snapshot("[a: 1, do: x]"), @r#"
    BracketOpen "["
    KeywordKey "a:"
    Integer "1"
    Comma ","
    KeywordKey "do:"
    Identifier "x"
    BracketClose "]"
    "#);
}

#[test]
fn quoted_keyword_keys() {
    insta::assert_snapshot!(snapshot(r#"["foo bar": 1, 'x': 2]"#), @r#"
    BracketOpen "["
    DoubleQuote "\""
    Fragment "foo bar"
    QuotedKeyClose "\":"
    Integer "1"
    Comma ","
    SingleQuote "'"
    Fragment "x"
    QuotedKeyClose "':"
    Integer "2"
    BracketClose "]"
    "#);
}

#[test]
fn string_before_type_operator_is_not_a_key() {
    insta::assert_snapshot!(snapshot(r#"<<"a"::binary>>"#), @r#"
    BinaryOpen "<<"
    DoubleQuote "\""
    Fragment "a"
    DoubleQuote "\""
    DoubleColon "::"
    Identifier "binary"
    BinaryClose ">>"
    "#);
}

#[test]
fn keyword_key_without_space_is_resplit() {
    insta::assert_snapshot!(snapshot("a:b foo::bar"), @r#"
    Identifier "a"
    Atom ":b"
    Identifier "foo"
    DoubleColon "::"
    Identifier "bar"
    "#);
}

#[test]
fn atoms() {
    insta::assert_snapshot!(snapshot(r#":ok :"quoted" :+ :foo?"#), @r#"
    Atom ":ok"
    AtomQuote ":\""
    Fragment "quoted"
    DoubleQuote "\""
    Atom ":+"
    Atom ":foo?"
    "#);
}

#[test]
fn numbers() {
    insta::assert_snapshot!(snapshot(r"1_000 0x1F 0o17 0b101 1.5e-3 ?a ?\n"), @r#"
    Integer "1_000"
    HexInteger "0x1F"
    OctalInteger "0o17"
    BinaryInteger "0b101"
    Float "1.5e-3"
    Char "?a"
    Char "?\\n"
    "#);
}

#[test]
fn operators() {
    insta::assert_snapshot!(snapshot(r"|> <> ++ -> => <- \\ :: .. === !="), @r#"
    PipeRight "|>"
    Concat "<>"
    PlusPlus "++"
    Arrow "->"
    FatArrow "=>"
    LeftArrow "<-"
    DefaultArg "\\\\"
    DoubleColon "::"
    DotDot ".."
    EqEqEq "==="
    NotEq "!="
    "#);
}

#[test]
fn stepped_range() {
    insta::assert_snapshot!(snapshot("1..10//2"), @r#"
    Integer "1"
    DotDot ".."
    Integer "10"
    SlashSlash "//"
    Integer "2"
    "#);
}

#[test]
fn line_breaks_are_eol_tokens() {
    insta::assert_snapshot!(snapshot_raw("a\nb\r\nc;d e"), @r#"
    Identifier "a"
    Eol "\n"
    Identifier "b"
    Eol "\r\n"
    Identifier "c"
    Eol ";"
    Identifier "d"
    Whitespace " "
    Identifier "e"
    "#);
}

#[test]
fn eol_keeps_initial_state() {
    for input in ["\n", "\r\n", ";"] {
        assert_eq!(
            last_token_and_state(input),
            (SyntaxKind::Eol, LexicalState::Initial),
            "input {input:?}"
        );
    }
    assert_eq!(
        last_token_and_state(" "),
        (SyntaxKind::Whitespace, LexicalState::Initial)
    );
}

#[test]
fn comments_and_continuations_are_trivia() {
    insta::assert_snapshot!(snapshot_raw("a # hi\nb \\\nc"), @r##"
    Identifier "a"
    Whitespace " "
    Comment "# hi"
    Eol "\n"
    Identifier "b"
    Whitespace " "
    Whitespace "\\\n"
    Identifier "c"
    "##);
}

#[test]
fn sigil_with_modifiers() {
    insta::assert_snapshot!(snapshot("~r/abc/giu"), @r#"
    Tilde "~"
    SigilName "r"
    SigilOpen "/"
    Fragment "abc"
    SigilClose "/"
    SigilModifier "g"
    SigilModifier "i"
    SigilModifier "u"
    "#);
    assert_eq!(
        last_token_and_state("~r/abc/giu"),
        (SyntaxKind::SigilModifier, LexicalState::Initial)
    );
}

#[test]
fn sigil_modifier_state_table() {
    let cases = [
        (" ", SyntaxKind::Whitespace, LexicalState::Initial),
        (";", SyntaxKind::Eol, LexicalState::Initial),
        ("A", SyntaxKind::Alias, LexicalState::Initial),
        ("\n", SyntaxKind::Eol, LexicalState::Initial),
        ("\r\n", SyntaxKind::Eol, LexicalState::Initial),
    ];
    for (suffix, kind, state) in cases {
        let input = format!("~r{{}}{suffix}");
        assert_eq!(
            last_token_and_state(&input),
            (kind, state),
            "suffix {suffix:?}"
        );
    }

    // A lowercase letter stays in the modifier state until something else shows up.
    let mut lexer = Lexer::new("~r{}a ");
    let kinds: Vec<_> = lexer.by_ref().take(5).map(|t| t.kind).collect();
    assert_eq!(kinds.last(), Some(&SyntaxKind::SigilModifier));
    assert_eq!(lexer.state().top(), LexicalState::SigilModifiers);
}

#[test]
fn uppercase_sigil_keeps_backslashes() {
    insta::assert_snapshot!(snapshot(r"~S(a\nb)"), @r#"
    Tilde "~"
    SigilName "S"
    SigilOpen "("
    Fragment "a\\nb"
    SigilClose ")"
    "#);
}

#[test]
fn sigil_interpolation_inside_braces() {
    insta::assert_snapshot!(snapshot("~s{a#{1}}"), @r##"
    Tilde "~"
    SigilName "s"
    SigilOpen "{"
    Fragment "a"
    InterpolationStart "#{"
    Integer "1"
    InterpolationEnd "}"
    SigilClose "}"
    "##);
}

#[test]
fn string_with_interpolation() {
    insta::assert_snapshot!(snapshot(r#""a#{b}c""#), @r##"
    DoubleQuote "\""
    Fragment "a"
    InterpolationStart "#{"
    Identifier "b"
    InterpolationEnd "}"
    Fragment "c"
    DoubleQuote "\""
    "##);
}

#[test]
fn map_inside_interpolation() {
    insta::assert_snapshot!(snapshot(r##""#{%{a: 1}}""##), @r##"
    DoubleQuote "\""
    InterpolationStart "#{"
    Percent "%"
    BraceOpen "{"
    KeywordKey "a:"
    Integer "1"
    BraceClose "}"
    InterpolationEnd "}"
    DoubleQuote "\""
    "##);
}

#[test]
fn string_escapes() {
    insta::assert_snapshot!(snapshot(r#""a\n\x41""#), @r#"
    DoubleQuote "\""
    Fragment "a"
    EscapeSequence "\\n"
    EscapeSequence "\\x41"
    DoubleQuote "\""
    "#);
}

#[test]
fn charlist() {
    insta::assert_snapshot!(snapshot("'ab'"), @r#"
    SingleQuote "'"
    Fragment "ab"
    SingleQuote "'"
    "#);
}

#[test]
fn heredoc() {
    let input = "x = \"\"\"\n  hello\n  \"\"\"\n";
    insta::assert_snapshot!(snapshot(input), @r#"
    Identifier "x"
    Eq "="
    HeredocOpen "\"\"\"\n"
    Fragment "  hello\n"
    HeredocClose "  \"\"\""
    Eol "\n"
    "#);
}

#[test]
fn heredoc_closer_only_at_line_start() {
    let input = "\"\"\"\na \"\"\" b\n\"\"\"";
    insta::assert_snapshot!(snapshot(input), @r#"
    HeredocOpen "\"\"\"\n"
    Fragment "a \"\"\" b\n"
    HeredocClose "\"\"\""
    "#);
}

#[test]
fn garbage_coalesces() {
    insta::assert_snapshot!(snapshot("a $$ b €"), @r#"
    Identifier "a"
    Garbage "$$"
    Identifier "b"
    Garbage "€"
    "#);
}

#[test]
fn unterminated_bodies_run_to_end_of_input() {
    insta::assert_snapshot!(snapshot("\"abc"), @r#"
    DoubleQuote "\""
    Unterminated "abc"
    "#);
    insta::assert_snapshot!(snapshot("~r/ab\ncd"), @r#"
    Tilde "~"
    SigilName "r"
    SigilOpen "/"
    Unterminated "ab\ncd"
    "#);
}

#[test]
fn restart_in_modifier_state() {
    let source = "~r/x/iu";
    let stack = StateStack::try_from(vec![LexicalState::Initial, LexicalState::SigilModifiers])
        .expect("valid stack");
    let kinds: Vec<_> = Lexer::restart(source, 5, stack).map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![SyntaxKind::SigilModifier, SyntaxKind::SigilModifier]
    );
}

#[test]
fn resume_inside_interpolation() {
    let source = r#""a#{b}c" <> d"#;
    let full = lex(source);

    let mut lexer = Lexer::new(source);
    let head: Vec<_> = lexer.by_ref().take(3).collect();
    let checkpoint = lexer.checkpoint();
    assert_eq!(checkpoint.offset, 4);
    assert_eq!(
        checkpoint.stack.as_slice(),
        &[
            LexicalState::Initial,
            LexicalState::Group(Group::new(GroupKind::String, Terminator::DoubleQuote, true)),
            LexicalState::Interpolation,
        ]
    );

    let tail: Vec<_> = Lexer::resume(source, checkpoint).collect();
    assert_eq!([head, tail].concat(), full);
}

#[test]
fn state_stack_validation() {
    assert!(StateStack::try_from(Vec::<LexicalState>::new()).is_err());
    assert!(StateStack::try_from(vec![LexicalState::Braces]).is_err());
    assert!(StateStack::try_from(vec![LexicalState::Initial, LexicalState::Initial]).is_err());
    assert!(StateStack::try_from(vec![LexicalState::Initial, LexicalState::Braces]).is_ok());
}

#[test]
fn state_stack_serializes_as_list() {
    let stack = StateStack::try_from(vec![LexicalState::Initial, LexicalState::Interpolation])
        .expect("valid stack");
    let json = serde_json::to_string(&stack).expect("serializable");
    insta::assert_snapshot!(json, @r#"["Initial","Interpolation"]"#);

    let back: StateStack = serde_json::from_str(&json).expect("deserializable");
    assert_eq!(back, stack);
    assert!(serde_json::from_str::<StateStack>("[]").is_err());
    assert!(serde_json::from_str::<StateStack>(r#"["Braces"]"#).is_err());
}

#[test]
#[should_panic(expected = "bottom lexical state")]
fn popping_the_bottom_state_panics() {
    let mut stack = StateStack::new();
    stack.pop();
}
