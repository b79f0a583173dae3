//! FILENAME: expr/src/tests.rs
//! PURPOSE: Consolidated unit tests for the lexer, parser and AST.

use crate::ast::Expression;
use crate::lexer::Lexer;
use crate::parser::parse;
use crate::token::Token;
use model::Value;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn hash_of(expr: &Expression) -> u64 {
    let mut hasher = DefaultHasher::new();
    expr.hash(&mut hasher);
    hasher.finish()
}

// ========================================
// LEXER TESTS
// ========================================

#[test]
fn lexer_tokenizes_field_access() {
    let mut lexer = Lexer::new("row.cells[\"First name\"]");

    assert_eq!(lexer.next_token(), Token::Identifier("row".to_string()));
    assert_eq!(lexer.next_token(), Token::Dot);
    assert_eq!(lexer.next_token(), Token::Identifier("cells".to_string()));
    assert_eq!(lexer.next_token(), Token::LBracket);
    assert_eq!(lexer.next_token(), Token::String("First name".to_string()));
    assert_eq!(lexer.next_token(), Token::RBracket);
    assert_eq!(lexer.next_token(), Token::EOF);
}

#[test]
fn lexer_tokenizes_numbers() {
    let mut lexer = Lexer::new("42 2.5 7.trim");

    assert_eq!(lexer.next_token(), Token::Integer(42));
    assert_eq!(lexer.next_token(), Token::Float(2.5));
    assert_eq!(lexer.next_token(), Token::Integer(7));
    assert_eq!(lexer.next_token(), Token::Dot);
    assert_eq!(lexer.next_token(), Token::Identifier("trim".to_string()));
}

#[test]
fn lexer_handles_quotes_and_escapes() {
    let mut lexer = Lexer::new(r#"'it\'s' "a\"b" 'open"#);

    assert_eq!(lexer.next_token(), Token::String("it's".to_string()));
    assert_eq!(lexer.next_token(), Token::String("a\"b".to_string()));
    assert_eq!(lexer.next_token(), Token::Illegal('\''));
}

#[test]
fn lexer_keywords_are_case_sensitive() {
    let mut lexer = Lexer::new("true False null");

    assert_eq!(lexer.next_token(), Token::Boolean(true));
    assert_eq!(lexer.next_token(), Token::Identifier("False".to_string()));
    assert_eq!(lexer.next_token(), Token::Null);
}

// ========================================
// PARSER TESTS
// ========================================

#[test]
fn parser_builds_field_access_chain() {
    let expr = parse("cells.Name.value").unwrap();

    assert_eq!(
        expr,
        Expression::field(
            Expression::field(Expression::variable("cells"), "Name"),
            "value"
        )
    );
}

#[test]
fn parser_bracket_string_is_field_access() {
    let bracket = parse("cells[\"Name\"]").unwrap();
    let dotted = parse("cells.Name").unwrap();
    assert_eq!(bracket, dotted);

    let indexed = parse("value[0]").unwrap();
    assert_eq!(
        indexed,
        Expression::call(
            "get",
            vec![Expression::variable("value"), Expression::literal(0i64)]
        )
    );
}

#[test]
fn parser_method_call_sugar() {
    let method = parse("value.trim()").unwrap();
    let plain = parse("trim(value)").unwrap();
    assert_eq!(method, plain);

    let chained = parse("cells.A.value.coalesce('x', null)").unwrap();
    assert_eq!(
        chained,
        Expression::call(
            "coalesce",
            vec![
                parse("cells.A.value").unwrap(),
                Expression::literal("x"),
                Expression::Literal(Value::Null),
            ]
        )
    );
}

#[test]
fn parser_handles_parentheses() {
    assert_eq!(parse("(cells).A").unwrap(), parse("cells.A").unwrap());
}

#[test]
fn parser_rejects_malformed_input() {
    assert!(parse("").is_err());
    assert!(parse("cells.").is_err());
    assert!(parse("cells[\"A\"").is_err());
    assert!(parse("trim(value").is_err());
    assert!(parse("value value").is_err());
    assert!(parse("value + 1").is_err());
    assert!(parse("cells.'A'").is_err());
}

// ========================================
// AST TESTS
// ========================================

#[test]
fn display_is_structural() {
    let cases = [
        "cells.Name",
        "cells[\"First name\"].value",
        "trim(value)",
        "coalesce(cells.A.value, \"n/a\", null, 3, true)",
    ];
    for text in cases {
        assert_eq!(parse(text).unwrap().to_string(), text);
    }
    assert_eq!(parse("value.trim()").unwrap().to_string(), "trim(value)");
    assert_eq!(parse("'single'").unwrap().to_string(), "\"single\"");
}

#[test]
fn printed_literals_parse_back_to_the_same_tree() {
    let cases = [
        "coalesce(value, 1.0)",
        "coalesce(value, 2.5, 100000000000000000000.0, 7)",
        "coalesce(value, \"a\u{1}b\")",
        "coalesce(value, \"tab\\there\", \"quote\\\"d\", \"back\\\\slash\", \"line\\nbreak\")",
        "cells[\"odd \\\"name\\\"\"].value",
    ];
    for text in cases {
        let tree = parse(text).unwrap();
        let printed = tree.to_string();
        assert_eq!(parse(&printed).unwrap(), tree, "{} printed as {}", text, printed);
    }
    assert_eq!(parse("coalesce(value, 1.0)").unwrap().to_string(), "coalesce(value, 1.0)");
    assert_eq!(
        parse("\"a\u{1}b\"").unwrap(),
        Expression::literal(Value::from("a\u{1}b"))
    );
}

#[test]
fn identical_text_gives_equal_trees_with_equal_hashes() {
    let a = parse("row.cells[\"Name\"].value.toUppercase()").unwrap();
    let b = parse("row . cells.Name.value.toUppercase( )").unwrap();

    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn different_trees_need_not_be_equal() {
    let a = parse("value").unwrap();
    let b = parse("cell.value").unwrap();
    assert_ne!(a, b);
}

#[test]
fn cells_root_recognition() {
    assert!(parse("cells").unwrap().is_cells_root());
    assert!(parse("row.cells").unwrap().is_cells_root());
    assert!(parse("row[\"cells\"]").unwrap().is_cells_root());
    assert!(!parse("row").unwrap().is_cells_root());
    assert!(!parse("\"cells\"").unwrap().is_cells_root());
    assert!(!parse("cells.A").unwrap().is_cells_root());
}
