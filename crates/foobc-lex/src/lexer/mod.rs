//! Core lexer implementation.
//!
//! This module contains the main [`Lexer`] struct and the `next_token`
//! dispatch. The per-category lexing methods live in sibling modules:
//! identifiers/keywords, numbers, strings, operators, and comments.

mod comment;
mod identifier;
mod number;
mod operator;
mod string;

use foobc_util::{Diagnostic, Handler, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Lexer for FOOBAR source code.
///
/// Transforms source text into a stream of tokens. Whitespace and comments
/// are discarded; every produced token carries the line/column of the first
/// character of its lexeme.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    pub(crate) cursor: Cursor<'a>,

    /// Error handler for reporting lexical errors.
    handler: &'a Handler,

    /// Byte offset where the current token starts.
    pub(crate) token_start: usize,

    /// Line where the current token starts (1-based).
    token_line: u32,

    /// Column where the current token starts (1-based).
    token_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over the given source code.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_line: 1,
            token_column: 1,
        }
    }

    /// Returns the next token from the source code.
    ///
    /// Skips whitespace and comments, then dispatches on the first
    /// character of the token. Unknown characters are reported and skipped
    /// so that a single bad character yields one diagnostic, not a cascade.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace_and_comments();

            self.token_start = self.cursor.position();
            self.token_line = self.cursor.line();
            self.token_column = self.cursor.column();

            if self.cursor.is_at_end() {
                return self.make(TokenKind::Eof);
            }

            let c = self.cursor.current_char();

            if c.is_ascii_digit() {
                return self.lex_number();
            }

            if c == '"' || c == '\'' {
                return self.lex_string();
            }

            // `V` is the OR operator and `VV` is XOR, unless the V starts a
            // longer identifier. This must be checked before identifiers.
            if c == 'V' {
                let next = self.cursor.peek_char(1);
                if !(next.is_ascii_alphanumeric() || next == '_') {
                    self.cursor.advance();
                    return self.make(TokenKind::Or);
                }
                if next == 'V' {
                    let after = self.cursor.peek_char(2);
                    if !(after.is_ascii_alphanumeric() || after == '_') {
                        self.cursor.advance();
                        self.cursor.advance();
                        return self.make(TokenKind::Xor);
                    }
                }
                // part of an identifier, handled below
            }

            if c.is_ascii_alphabetic() || c == '_' {
                return self.lex_identifier();
            }

            match c {
                '-' => return self.lex_minus(),
                '+' => return self.lex_plus(),
                '=' => return self.lex_equals(),
                '>' => return self.lex_greater(),
                '<' => return self.lex_less(),
                '.' => return self.lex_dot(),
                ',' => return self.lex_comma(),
                '*' => {
                    self.cursor.advance();
                    return self.make(TokenKind::Star);
                },
                '/' => {
                    self.cursor.advance();
                    return self.make(TokenKind::Slash);
                },
                '%' => {
                    self.cursor.advance();
                    return self.make(TokenKind::Percent);
                },
                '^' => {
                    self.cursor.advance();
                    return self.make(TokenKind::Caret);
                },
                '&' => {
                    self.cursor.advance();
                    return self.make(TokenKind::And);
                },
                '(' => {
                    self.cursor.advance();
                    return self.make(TokenKind::LParen);
                },
                ')' => {
                    self.cursor.advance();
                    return self.make(TokenKind::RParen);
                },
                '{' => {
                    self.cursor.advance();
                    return self.make(TokenKind::LBrace);
                },
                '}' => {
                    self.cursor.advance();
                    return self.make(TokenKind::RBrace);
                },
                '[' => {
                    self.cursor.advance();
                    return self.make(TokenKind::LBracket);
                },
                ']' => {
                    self.cursor.advance();
                    return self.make(TokenKind::RBracket);
                },
                ';' => {
                    self.cursor.advance();
                    return self.make(TokenKind::Semicolon);
                },
                _ => {
                    self.report_error_with_hint(
                        format!("unexpected character '{}'", c),
                        "This character is not recognized by FOOBAR. \
                         Check for typos or invalid symbols.",
                    );
                    self.cursor.advance();
                    // skip it and keep scanning
                },
            }
        }
    }

    /// Builds a token stamped with the current token-start position.
    pub(crate) fn make(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.token_line, self.token_column)
    }

    /// Span of the current token's first character.
    pub(crate) fn token_span(&self) -> Span {
        Span::new(self.token_line, self.token_column)
    }

    /// Reports a lexical error at the current token start.
    pub(crate) fn report_error(&mut self, message: String) {
        self.handler.error(message, self.token_span());
    }

    /// Reports a lexical error at an explicit position.
    pub(crate) fn error_at(&mut self, message: String, span: Span) {
        self.handler.error(message, span);
    }

    /// Reports a lexical error with an attached hint line.
    pub(crate) fn report_error_with_hint(&mut self, message: String, hint: &str) {
        self.handler
            .emit(Diagnostic::error(message, self.token_span()).with_hint(hint));
    }
}
