//! foobc-lex - Lexical analyzer for FOOBAR source code.
//!
//! Transforms a `.foob` character stream into a stream of position-annotated
//! tokens. The lexer is direct-coded: each token category has its own lexing
//! method, split across the `lexer` submodules. Lexical errors (unterminated
//! strings or block comments, unknown characters) are reported to the shared
//! [`Handler`](foobc_util::Handler) with their 1-based line/column; the
//! driver aborts the pipeline once lexing finishes with errors recorded.

pub mod cursor;
pub mod lexer;
pub mod token;

#[cfg(test)]
mod edge_cases;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};

use foobc_util::Handler;

/// Tokenizes an entire source string.
///
/// Convenience wrapper that drives [`Lexer::next_token`] to exhaustion and
/// appends the terminating [`TokenKind::Eof`]. The returned stream always
/// ends in exactly one `Eof` token, even for empty input.
pub fn tokenize(source: &str, handler: &Handler) -> Vec<Token> {
    let mut lexer = Lexer::new(source, handler);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_yields_single_eof() {
        let handler = Handler::new();
        let tokens = tokenize("", &handler);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_hello_main() {
        let handler = Handler::new();
        let tokens = tokenize(
            r#"Main() { CONSOLE.Print("Hello"); return true; }"#,
            &handler,
        );
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident("Main".into()),
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Ident("CONSOLE".into()),
                TokenKind::Dot,
                TokenKind::Ident("Print".into()),
                TokenKind::LParen,
                TokenKind::Str("Hello".into()),
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::Return,
                TokenKind::True,
                TokenKind::Semicolon,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_positions_are_one_based() {
        let handler = Handler::new();
        let tokens = tokenize("x\n  y", &handler);
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
    }
}
