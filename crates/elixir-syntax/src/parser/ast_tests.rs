use indoc::indoc;

use crate::parser::ast::*;
use crate::parser::cst::SyntaxKind;
use crate::parser::parse;

fn first_expr(source: &str) -> Expr {
    parse(source)
        .unwrap()
        .file()
        .statements()
        .next()
        .expect("source has a statement")
}

fn texts(tokens: impl Iterator<Item = crate::parser::SyntaxToken>) -> Vec<String> {
    tokens.map(|t| t.text().to_string()).collect()
}

#[test]
fn binary_operation_accessors() {
    let Expr::BinaryOperation(op) = first_expr("a + b") else {
        panic!("expected a binary operation");
    };
    assert!(matches!(op.lhs(), Ok(Expr::Variable(_))));
    assert!(matches!(op.rhs(), Ok(Expr::Variable(_))));
    assert_eq!(op.operator().map(|t| t.kind()), Some(SyntaxKind::Plus));
    assert!(!op.is_not_in());
}

#[test]
fn not_in_operators() {
    let Expr::BinaryOperation(op) = first_expr("a not in b") else {
        panic!("expected a binary operation");
    };
    assert!(op.is_not_in());
    assert_eq!(texts(op.operators()), ["not", "in"]);
}

#[test]
fn missing_right_operand() {
    let Expr::BinaryOperation(op) = first_expr("1 +") else {
        panic!("expected a binary operation");
    };
    let err = op.rhs().unwrap_err();
    assert_eq!(err.parent, SyntaxKind::BinaryOperation);
    assert_eq!(err.child, "right operand");
}

#[test]
fn required_child_on_empty_file() {
    let file = parse("").unwrap().file();
    let err = file.required_child::<Expr>().unwrap_err();
    assert_eq!(err.parent, SyntaxKind::File);
    assert_eq!(err.child, "expression");
    assert!(err.range.is_empty());
}

#[test]
fn descendants_exclude_self() {
    let file = parse("[[1]]").unwrap().file();
    assert_eq!(file.descendants::<List>().count(), 2);

    let outer = file.child::<List>().unwrap();
    let inner: Vec<List> = outer.descendants().collect();
    assert_eq!(inner.len(), 1);
    assert_ne!(inner[0], outer);
    assert_eq!(outer.descendants::<Number>().count(), 1);
}

#[test]
fn children_are_direct_only() {
    let file = parse("[[1]]").unwrap().file();
    let outer = file.child::<List>().unwrap();
    assert_eq!(outer.children::<Number>().count(), 0);
    assert_eq!(outer.children::<List>().count(), 1);
}

#[test]
fn anonymous_function_with_guard() {
    let Expr::AnonymousFunction(func) = first_expr("fn x, y when x > y -> x end") else {
        panic!("expected fn");
    };
    let stab = func.stab().unwrap();
    let clauses: Vec<_> = stab.clauses().collect();
    assert_eq!(clauses.len(), 1);

    let clause = &clauses[0];
    assert_eq!(clause.parameters().unwrap().elements().count(), 2);
    let guard = clause.guard().expect("clause has a guard");
    assert!(matches!(guard.condition(), Ok(Expr::BinaryOperation(_))));
    assert_eq!(clause.body().unwrap().statements().count(), 1);
}

#[test]
fn multi_clause_function() {
    let source = indoc! {"
        fn
          1 -> :a
          2 -> :b
        end
    "};
    let Expr::AnonymousFunction(func) = first_expr(source) else {
        panic!("expected fn");
    };
    assert_eq!(func.end_of_expressions().count(), 1);
    assert_eq!(func.stab().unwrap().clauses().count(), 2);
}

#[test]
fn call_elements_split_keywords() {
    let Expr::Call(call) = first_expr("foo(a, b: 1, c: 2)") else {
        panic!("expected call");
    };
    assert_eq!(call.name().unwrap().text(), "foo");
    assert!(call.no_parens_arguments().is_none());
    assert!(call.do_block().is_none());

    let elements: Vec<_> = call.arguments().unwrap().elements().collect();
    assert_eq!(elements.len(), 2);
    assert!(matches!(elements[0], Element::Expr(Expr::Variable(_))));
    let Element::Keywords(keywords) = &elements[1] else {
        panic!("expected trailing keywords");
    };
    let keys: Vec<_> = keywords.pairs().filter_map(|p| p.key_name()).collect();
    assert_eq!(keys, ["b", "c"]);
}

#[test]
fn quoted_keyword_key() {
    let Expr::List(list) = first_expr(r#"[a: 1, "b c": 2]"#) else {
        panic!("expected list");
    };
    let Some(Element::Keywords(keywords)) = list.elements().next() else {
        panic!("expected keywords");
    };
    let pairs: Vec<_> = keywords.pairs().collect();
    assert_eq!(pairs.len(), 2);
    assert!(pairs[0].quoted_key().is_none());

    assert_eq!(pairs[1].key_name(), None);
    let key = pairs[1].quoted_key().unwrap();
    assert!(matches!(
        key.parts().collect::<Vec<_>>().as_slice(),
        [StringPart::Fragment(t)] if t.text() == "b c"
    ));
    assert!(matches!(pairs[1].value(), Ok(Expr::Number(_))));
}

#[test]
fn multi_alias_accessors() {
    let Expr::MultiAlias(alias) = first_expr("Foo.{Bar, Baz}") else {
        panic!("expected multi-alias");
    };
    assert!(matches!(alias.receiver(), Ok(Expr::Aliases(_))));
    assert_eq!(alias.dot().map(|t| t.kind()), Some(SyntaxKind::Dot));
    assert_eq!(alias.aliases().unwrap().elements().count(), 2);
}

#[test]
fn do_block_items() {
    let source = indoc! {"
        if a do
          b
        else
          c
        end
    "};
    let Expr::Call(call) = first_expr(source) else {
        panic!("expected call");
    };
    assert_eq!(call.no_parens_arguments().unwrap().elements().count(), 1);

    let block = call.do_block().unwrap();
    assert!(block.stab().is_none());
    assert_eq!(block.statements().count(), 1);

    let items: Vec<_> = block.items().collect();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].keyword().unwrap().kind(), SyntaxKind::KwElse);
    assert_eq!(items[0].statements().count(), 1);
}

#[test]
fn remote_call_receiver() {
    let Expr::RemoteCall(call) = first_expr("Enum.map(xs, f)") else {
        panic!("expected remote call");
    };
    let Ok(Expr::Aliases(aliases)) = call.receiver() else {
        panic!("expected alias receiver");
    };
    assert_eq!(texts(aliases.segments()), ["Enum"]);
    assert_eq!(call.name().unwrap().text(), "map");
    assert_eq!(call.arguments().unwrap().elements().count(), 2);
}

#[test]
fn map_arguments() {
    let Expr::MapOperation(map) = first_expr("%{a => 1, b: 2}") else {
        panic!("expected map");
    };
    let args = map.arguments().unwrap();
    assert!(args.update().is_none());

    let assocs: Vec<_> = args.associations().unwrap().associations().collect();
    assert_eq!(assocs.len(), 1);
    assert!(matches!(assocs[0].key(), Ok(Expr::Variable(_))));
    assert!(matches!(assocs[0].value(), Ok(Expr::Number(_))));

    let keywords = args.keywords().unwrap();
    assert_eq!(keywords.pairs().count(), 1);
}

#[test]
fn struct_update_arguments() {
    let Expr::StructOperation(structure) = first_expr(r#"%User{u | name: "x"}"#) else {
        panic!("expected struct");
    };
    assert!(matches!(structure.name(), Ok(Expr::Aliases(_))));

    let update = structure.arguments().unwrap().update().unwrap();
    assert!(matches!(update.base(), Ok(Expr::Variable(_))));
    assert!(update.associations().is_none());
    let pair = update.keywords().unwrap().pairs().next().unwrap();
    assert_eq!(pair.key_name().as_deref(), Some("name"));
    assert!(matches!(pair.value(), Ok(Expr::StringLiteral(_))));
}

#[test]
fn string_parts() {
    let Expr::StringLiteral(string) = first_expr(r#""a#{b}\n""#) else {
        panic!("expected string");
    };
    assert!(!string.is_heredoc());
    let parts: Vec<_> = string.parts().collect();
    assert_eq!(parts.len(), 3);
    assert!(matches!(&parts[0], StringPart::Fragment(t) if t.text() == "a"));
    assert!(matches!(&parts[1], StringPart::Interpolation(i) if i.statements().count() == 1));
    assert!(matches!(&parts[2], StringPart::Escape(t) if t.text() == "\\n"));
    assert_eq!(string.closing_token().unwrap().text_range().start(), rowan::TextSize::from(8));
}

#[test]
fn sigil_accessors() {
    let Expr::Sigil(sigil) = first_expr("~r/a+/iu") else {
        panic!("expected sigil");
    };
    assert_eq!(sigil.name().unwrap().text(), "r");
    assert_eq!(texts(sigil.modifiers()), ["i", "u"]);
    assert_eq!(sigil.closing_token().unwrap().text(), "/");
    assert_eq!(sigil.parts().count(), 1);
}

#[test]
fn heredoc_string() {
    let source = indoc! {r#"
        """
          text
          """
    "#};
    let Expr::StringLiteral(string) = first_expr(source) else {
        panic!("expected string");
    };
    assert!(string.is_heredoc());
    assert_eq!(
        string.closing_token().unwrap().kind(),
        SyntaxKind::HeredocClose
    );
}

#[test]
fn unary_and_access() {
    let Expr::UnaryOperation(op) = first_expr("-x[0]") else {
        panic!("expected unary operation");
    };
    assert_eq!(op.operator().unwrap().kind(), SyntaxKind::Minus);
    let Ok(Expr::AccessExpression(access)) = op.operand() else {
        panic!("expected access operand");
    };
    assert!(matches!(access.receiver(), Ok(Expr::Variable(_))));
    assert!(matches!(access.key(), Ok(Expr::Number(_))));
}
