//! Lexer edge case tests.
//!
//! Boundary behaviors that sit between the individual sub-lexer tests:
//! empty input, the float/slice dot ambiguity, `V`/`VV` against adjacent
//! identifiers, and stream-level invariants checked by property tests.

use foobc_util::Handler;
use proptest::prelude::*;

use crate::token::TokenKind;
use crate::tokenize;

fn kinds(source: &str) -> Vec<TokenKind> {
    let handler = Handler::new();
    tokenize(source, &handler)
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn whitespace_only_source() {
    assert_eq!(kinds("  \t\r\n  "), vec![TokenKind::Eof]);
}

#[test]
fn comment_only_source() {
    assert_eq!(kinds("// nothing here\n/* or here */"), vec![TokenKind::Eof]);
}

#[test]
fn float_followed_by_member_access() {
    // "x[2].length": the dot after ] is member access, not a slice
    let k = kinds("x[2].length");
    assert_eq!(k[4], TokenKind::Dot);
    assert_eq!(k[5], TokenKind::Ident("length".into()));
}

#[test]
fn slice_inside_brackets() {
    let k = kinds("a[0 ., n]");
    assert_eq!(
        k,
        vec![
            TokenKind::Ident("a".into()),
            TokenKind::LBracket,
            TokenKind::Number(0),
            TokenKind::SliceIncExc,
            TokenKind::Ident("n".into()),
            TokenKind::RBracket,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn v_operator_before_paren() {
    let k = kinds("(a V b)");
    assert_eq!(k[2], TokenKind::Or);
}

#[test]
fn vv_operator_before_identifier_is_identifier() {
    // "VVx" continues into an identifier, it is not XOR followed by x
    assert_eq!(kinds("VVx")[0], TokenKind::Ident("VVx".into()));
}

#[test]
fn lone_v_at_eof() {
    assert_eq!(kinds("V")[0], TokenKind::Or);
    assert_eq!(kinds("VV")[0], TokenKind::Xor);
}

#[test]
fn crlf_line_endings() {
    let handler = Handler::new();
    let tokens = tokenize("a\r\nb", &handler);
    assert_eq!((tokens[1].line, tokens[1].column), (2, 1));
}

proptest! {
    /// Every token stream ends in exactly one Eof, with no earlier Eof.
    #[test]
    fn stream_ends_in_single_eof(source in "\\PC{0,200}") {
        let handler = Handler::new();
        let tokens = tokenize(&source, &handler);
        prop_assert!(!tokens.is_empty());
        prop_assert_eq!(&tokens.last().unwrap().kind, &TokenKind::Eof);
        let eof_count = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        prop_assert_eq!(eof_count, 1);
    }

    /// Identifier tokens separated by single spaces sit at the expected
    /// 1-based columns.
    #[test]
    fn column_positions_track_lexemes(names in proptest::collection::vec("[a-z]{1,8}", 1..6)) {
        let source = names.join(" ");
        let handler = Handler::new();
        let tokens = tokenize(&source, &handler);

        let mut col = 1u32;
        for (token, name) in tokens.iter().zip(&names) {
            prop_assert_eq!(token.line, 1);
            prop_assert_eq!(token.column, col);
            col += name.len() as u32 + 1;
        }
    }
}
