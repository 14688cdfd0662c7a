use indoc::indoc;

use crate::Error;
use crate::diagnostics::DiagnosticKind;
use crate::parser::{ParseOptions, parse, parse_with, token_kinds};
use crate::parser::cst::SyntaxKind;

fn filtered_kinds(source: &str) -> Vec<DiagnosticKind> {
    let parse = parse(source).expect("parses within default limits");
    parse
        .diagnostics()
        .filtered()
        .iter()
        .map(|d| d.kind())
        .collect()
}

#[test]
fn binary_precedence() {
    let parse = parse("1 + 2 * 3").unwrap();
    insta::assert_snapshot!(parse.dump_cst(), @r#"
    File
      BinaryOperation
        Number
          Integer "1"
        Plus "+"
        BinaryOperation
          Number
            Integer "2"
          Star "*"
          Number
            Integer "3"
    "#);
}

#[test]
fn call_with_trailing_keywords() {
    let parse = parse("foo(a, b: 1)").unwrap();
    insta::assert_snapshot!(parse.dump_cst(), @r#"
    File
      Call
        Identifier "foo"
        CallArguments
          ParenOpen "("
          Variable
            Identifier "a"
          Comma ","
          Keywords
            KeywordPair
              KeywordKey "b:"
              Number
                Integer "1"
          ParenClose ")"
    "#);
}

#[test]
fn remote_call_on_alias_chain() {
    let parse = parse("Foo.Bar.baz(1)").unwrap();
    insta::assert_snapshot!(parse.dump_cst(), @r#"
    File
      RemoteCall
        Aliases
          Alias "Foo"
          Dot "."
          Alias "Bar"
        Dot "."
        Identifier "baz"
        CallArguments
          ParenOpen "("
          Number
            Integer "1"
          ParenClose ")"
    "#);
}

#[test]
fn anonymous_function() {
    let parse = parse("fn x -> x end").unwrap();
    insta::assert_snapshot!(parse.dump_cst(), @r#"
    File
      AnonymousFunction
        KwFn "fn"
        Stab
          StabClause
            StabParameters
              Variable
                Identifier "x"
            Arrow "->"
            StabBody
              Variable
                Identifier "x"
        KwEnd "end"
    "#);
}

#[test]
fn do_block_with_else() {
    let source = indoc! {"
        if a do
          b
        else
          c
        end
    "};
    let parse = parse(source).unwrap();
    assert!(parse.diagnostics().is_empty());
    insta::assert_snapshot!(parse.dump_cst(), @r#"
    File
      Call
        Identifier "if"
        NoParensArguments
          Variable
            Identifier "a"
        DoBlock
          KwDo "do"
          EndOfExpression
            Eol "\n"
          Variable
            Identifier "b"
          EndOfExpression
            Eol "\n"
          BlockItem
            KwElse "else"
            EndOfExpression
              Eol "\n"
            Variable
              Identifier "c"
            EndOfExpression
              Eol "\n"
          KwEnd "end"
      EndOfExpression
        Eol "\n"
    "#);
}

#[test]
fn map_with_associations_and_keywords() {
    let parse = parse("%{a => 1, b: 2}").unwrap();
    insta::assert_snapshot!(parse.dump_cst(), @r#"
    File
      MapOperation
        Percent "%"
        MapArguments
          BraceOpen "{"
          Associations
            Association
              Variable
                Identifier "a"
              FatArrow "=>"
              Number
                Integer "1"
          Comma ","
          Keywords
            KeywordPair
              KeywordKey "b:"
              Number
                Integer "2"
          BraceClose "}"
    "#);
}

#[test]
fn struct_update() {
    let parse = parse(r#"%User{u | name: "x"}"#).unwrap();
    insta::assert_snapshot!(parse.dump_cst(), @r#"
    File
      StructOperation
        Percent "%"
        Aliases
          Alias "User"
        MapArguments
          BraceOpen "{"
          MapUpdateArguments
            Variable
              Identifier "u"
            Bar "|"
            Keywords
              KeywordPair
                KeywordKey "name:"
                StringLiteral
                  DoubleQuote "\""
                  Fragment "x"
                  DoubleQuote "\""
          BraceClose "}"
    "#);
}

#[test]
fn pipe_continues_across_line_break() {
    let parse = parse("a\n|> b()").unwrap();
    insta::assert_snapshot!(parse.dump_cst(), @r#"
    File
      BinaryOperation
        Variable
          Identifier "a"
        Eol "\n"
        PipeRight "|>"
        Call
          Identifier "b"
          CallArguments
            ParenOpen "("
            ParenClose ")"
    "#);
}

#[test]
fn not_in_is_one_operator() {
    let parse = parse("a not in b").unwrap();
    insta::assert_snapshot!(parse.dump_cst(), @r#"
    File
      BinaryOperation
        Variable
          Identifier "a"
        KwNot "not"
        KwIn "in"
        Variable
          Identifier "b"
    "#);
}

#[test]
fn not_in_across_extra_spaces() {
    let parse = parse("a not  in b").unwrap();
    assert!(!parse.diagnostics().has_errors());
    assert_eq!(
        token_kinds(&parse.syntax()),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::KwNot,
            SyntaxKind::KwIn,
            SyntaxKind::Identifier,
        ]
    );
}

#[test]
fn stepped_range_nests_the_range() {
    let parse = parse("1..10//2").unwrap();
    insta::assert_snapshot!(parse.dump_cst(), @r#"
    File
      BinaryOperation
        BinaryOperation
          Number
            Integer "1"
          DotDot ".."
          Number
            Integer "10"
        SlashSlash "//"
        Number
          Integer "2"
    "#);
}

#[test]
fn step_needs_a_range() {
    assert_eq!(
        filtered_kinds("x // 2"),
        vec![DiagnosticKind::RangeStepWithoutRange]
    );
    assert!(filtered_kinds("a..b//c").is_empty());
}

#[test]
fn quoted_keyword_key() {
    let parse = parse(r#"["foo bar": 1]"#).unwrap();
    insta::assert_snapshot!(parse.dump_cst(), @r#"
    File
      List
        BracketOpen "["
        Keywords
          KeywordPair
            QuotedKey
              DoubleQuote "\""
              Fragment "foo bar"
              QuotedKeyClose "\":"
            Number
              Integer "1"
        BracketClose "]"
    "#);
}

#[test]
fn quoted_keys_follow_bare_keys() {
    assert!(filtered_kinds(r#"foo(a: 1, "b c": 2)"#).is_empty());
    assert!(filtered_kinds(r#"%{"a#{x}": 1, b: 2}"#).is_empty());
    assert!(filtered_kinds(r#"foo "bar": 1"#).is_empty());
}

#[test]
fn quoted_key_outside_keywords() {
    assert_eq!(
        filtered_kinds(r#"x = "a": 1"#).first(),
        Some(&DiagnosticKind::KeywordsNotLast)
    );
}

#[test]
fn multi_alias() {
    let parse = parse("alias Foo.{Bar, Baz}").unwrap();
    insta::assert_snapshot!(parse.dump_cst(), @r#"
    File
      Call
        Identifier "alias"
        NoParensArguments
          MultiAlias
            Aliases
              Alias "Foo"
            Dot "."
            Tuple
              BraceOpen "{"
              Aliases
                Alias "Bar"
              Comma ","
              Aliases
                Alias "Baz"
              BraceClose "}"
    "#);
}

#[test]
fn capture_argument_binds_before_dot() {
    let parse = parse("& &1.name").unwrap();
    insta::assert_snapshot!(parse.dump_cst(), @r#"
    File
      UnaryOperation
        Ampersand "&"
        RemoteCall
          UnaryOperation
            Ampersand "&"
            Number
              Integer "1"
          Dot "."
          Identifier "name"
    "#);
}

#[test]
fn module_attribute_with_argument() {
    let parse = parse(r#"@doc "hi""#).unwrap();
    insta::assert_snapshot!(parse.dump_cst(), @r#"
    File
      UnaryOperation
        At "@"
        Call
          Identifier "doc"
          NoParensArguments
            StringLiteral
              DoubleQuote "\""
              Fragment "hi"
              DoubleQuote "\""
    "#);
}

#[test]
fn string_interpolation_node() {
    let parse = parse(r#""a#{b}""#).unwrap();
    insta::assert_snapshot!(parse.dump_cst(), @r##"
    File
      StringLiteral
        DoubleQuote "\""
        Fragment "a"
        Interpolation
          InterpolationStart "#{"
          Variable
            Identifier "b"
          InterpolationEnd "}"
        DoubleQuote "\""
    "##);
}

#[test]
fn sigil_node() {
    let parse = parse("~r/a/i").unwrap();
    insta::assert_snapshot!(parse.dump_cst(), @r#"
    File
      Sigil
        Tilde "~"
        SigilName "r"
        SigilOpen "/"
        Fragment "a"
        SigilClose "/"
        SigilModifier "i"
    "#);
}

#[test]
fn tuple_token_kinds() {
    let parse = parse("{1, :a}").unwrap();
    assert_eq!(
        token_kinds(&parse.syntax()),
        vec![
            SyntaxKind::BraceOpen,
            SyntaxKind::Integer,
            SyntaxKind::Comma,
            SyntaxKind::Atom,
            SyntaxKind::BraceClose,
        ]
    );
}

#[test]
fn trivia_is_kept_in_the_tree() {
    let parse = parse("a # note").unwrap();
    insta::assert_snapshot!(parse.dump_cst_full(), @r##"
    File
      Variable
        Identifier "a"
      Whitespace " "
      Comment "# note"
    "##);
}

#[test]
fn printer_spans() {
    let parse = parse("x").unwrap();
    insta::assert_snapshot!(parse.printer().with_spans(true).dump(), @r#"
    File [0..1]
      Variable [0..1]
        Identifier [0..1] "x"
    "#);
}

#[test]
fn unclosed_paren() {
    assert_eq!(filtered_kinds("foo(1,"), vec![DiagnosticKind::UnclosedParen]);
}

#[test]
fn unclosed_messages_name_the_opener() {
    let parse = parse("foo(1,").unwrap();
    insta::assert_snapshot!(parse.dump_messages(), @r#"missing terminator: ) (for "(" starting at line 1)"#);

    let parse = crate::parser::parse("x =\n\"abc").unwrap();
    insta::assert_snapshot!(parse.dump_messages(), @r#"missing terminator: " (for string starting at line 2)"#);
}

#[test]
fn missing_arrow_in_fn() {
    assert_eq!(filtered_kinds("fn x end"), vec![DiagnosticKind::ExpectedArrow]);
}

#[test]
fn missing_comma_in_list_recovers() {
    let source = "[1 2]";
    let parse = parse(source).unwrap();
    assert_eq!(filtered_kinds(source), vec![DiagnosticKind::UnexpectedToken]);
    assert!(
        parse
            .syntax()
            .descendants()
            .any(|n| n.kind() == SyntaxKind::Error)
    );
    assert_eq!(parse.syntax().text().to_string(), source);
}

#[test]
fn invalid_character_then_statement() {
    assert_eq!(filtered_kinds("$\n1"), vec![DiagnosticKind::InvalidCharacter]);
}

#[test]
fn end_outside_block() {
    assert_eq!(
        filtered_kinds("end"),
        vec![DiagnosticKind::BlockKeywordOutsideBlock]
    );
}

#[test]
fn keywords_must_come_last() {
    assert_eq!(
        filtered_kinds("foo(a: 1, 2)"),
        vec![DiagnosticKind::KeywordsNotLast]
    );
}

#[test]
fn unterminated_string() {
    let source = "\"abc";
    assert_eq!(
        filtered_kinds(source),
        vec![DiagnosticKind::UnterminatedLiteral]
    );
    let parse = parse(source).unwrap();
    insta::assert_snapshot!(parse.dump_cst(), @r#"
    File
      StringLiteral
        DoubleQuote "\""
        Error
          Unterminated "abc"
    "#);
}

#[test]
fn single_quoted_charlist_warns() {
    let parse = parse("'abc'").unwrap();
    let diagnostics = parse.diagnostics();
    assert!(!diagnostics.has_errors());
    assert!(diagnostics.has_warnings());
    assert_eq!(
        diagnostics.iter().next().map(|d| d.kind()),
        Some(DiagnosticKind::SingleQuotedCharList)
    );
}

#[test]
fn tree_text_is_lossless_with_errors() {
    let source = "foo(1, [2,\n%{a => }\n\"#{x\n";
    let parse = parse(source).unwrap();
    assert!(parse.diagnostics().has_errors());
    assert_eq!(parse.syntax().text().to_string(), source);
}

#[test]
fn recursion_fuel() {
    let options = ParseOptions::new().recursion_fuel(Some(3));
    let result = parse_with("[[[[1]]]]", options);
    assert!(matches!(result, Err(Error::RecursionLimitExceeded)));

    let options = ParseOptions::new().recursion_fuel(Some(8));
    assert!(parse_with("[[[[1]]]]", options).is_ok());
}

#[test]
fn exec_fuel() {
    let options = ParseOptions::new().exec_fuel(Some(2));
    let result = parse_with("a + b + c", options);
    assert!(matches!(result, Err(Error::ExecFuelExhausted)));

    let options = ParseOptions::new().exec_fuel(Some(100));
    let parse = parse_with("a + b", options).unwrap();
    assert!(parse.exec_fuel_consumed() >= 3);
}
