//! foobc-par - Recursive-descent parser for FOOBAR.
//!
//! Consumes the token stream of one source file and produces a
//! [`Program`]. Grammar errors are reported to the shared
//! [`Handler`](foobc_util::Handler) as expected/received diagnostics with
//! targeted hints; parsing stops at the first error (nothing is recovered
//! beyond that point, the pipeline is aborted by the driver).
//!
//! Module layout mirrors the grammar: `items` for top-level declarations
//! and class bodies, `stmt` for statements, `expr` for the expression
//! precedence cascade, `types` for type references.

pub mod ast;
mod expr;
mod items;
mod stmt;
mod types;

#[cfg(test)]
mod edge_cases;

pub use ast::*;

use foobc_lex::{Token, TokenKind};
use foobc_util::{Diagnostic, Handler, Span};

/// Parses a token stream into a [`Program`].
///
/// Convenience wrapper over [`Parser`].
pub fn parse(tokens: Vec<Token>, handler: &Handler) -> Program {
    Parser::new(tokens, handler).parse()
}

/// Recursive-descent parser over a lexed token stream.
pub struct Parser<'a> {
    /// Token stream, terminated by `Eof`.
    tokens: Vec<Token>,

    /// Current position in the token stream.
    pos: usize,

    /// Error handler.
    handler: &'a Handler,

    /// Counter backing parser-assigned lambda ids.
    lambda_counter: u32,
}

impl<'a> Parser<'a> {
    /// Creates a parser over the given tokens.
    ///
    /// The stream is expected to end with `Eof` (as produced by
    /// `foobc_lex::tokenize`); an empty stream is treated as empty input.
    pub fn new(tokens: Vec<Token>, handler: &'a Handler) -> Self {
        let tokens = if tokens.is_empty() {
            vec![Token::new(TokenKind::Eof, 1, 1)]
        } else {
            tokens
        };
        Self {
            tokens,
            pos: 0,
            handler,
            lambda_counter: 0,
        }
    }

    /// Parses a complete source file.
    pub fn parse(&mut self) -> Program {
        let mut program = Program::default();

        while !self.check(&TokenKind::Eof) {
            if self.check(&TokenKind::Import) {
                match self.parse_import() {
                    Some(import) => program.imports.push(import),
                    None => break,
                }
                continue;
            }

            match self.parse_declaration() {
                Some(decl) => program.declarations.push(decl),
                None => break,
            }
        }

        program
    }

    // =========================================================================
    // Token stream helpers
    // =========================================================================

    /// The current token. The stream is `Eof`-terminated, so this is total.
    pub(crate) fn current(&self) -> &Token {
        if self.pos >= self.tokens.len() {
            self.tokens.last().expect("token stream is never empty")
        } else {
            &self.tokens[self.pos]
        }
    }

    /// The token `offset` positions ahead.
    pub(crate) fn peek(&self, offset: usize) -> &Token {
        let pos = self.pos + offset;
        if pos >= self.tokens.len() {
            self.tokens.last().expect("token stream is never empty")
        } else {
            &self.tokens[pos]
        }
    }

    /// Advances past the current token, never past `Eof`.
    pub(crate) fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    /// Current cursor position, for save/rewind lookahead.
    pub(crate) fn save_pos(&self) -> usize {
        self.pos
    }

    /// Rewinds to a previously saved position.
    pub(crate) fn rewind(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// True if the current token has the same kind as `kind` (payloads are
    /// ignored).
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    /// True if the current token is the identifier `name`.
    pub(crate) fn check_ident(&self, name: &str) -> bool {
        matches!(&self.current().kind, TokenKind::Ident(s) if s == name)
    }

    /// Span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.current().span()
    }

    /// Consumes the current token if it matches `kind`; otherwise reports
    /// an expected/received diagnostic (with a targeted hint for the common
    /// cases) and returns `None`.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(&kind) {
            let token = self.current().clone();
            self.advance();
            return Some(token);
        }

        let token = self.current();
        let mut diag = Diagnostic::error(
            format!(
                "expected {}, but got {}",
                kind.describe(),
                token.kind.describe()
            ),
            token.span(),
        );

        diag = match kind {
            TokenKind::Semicolon => {
                diag.with_hint("Did you forget a semicolon (;) at the end of the statement?")
            },
            TokenKind::RParen => diag.with_hint("Did you forget a closing parenthesis )?"),
            TokenKind::RBrace => diag.with_hint("Did you forget a closing brace }?"),
            TokenKind::Ident(_) => diag.with_hint("Expected a variable or function name here."),
            _ => diag,
        };

        self.handler.emit(diag);
        None
    }

    /// Consumes an identifier token and returns its name.
    pub(crate) fn expect_ident(&mut self) -> Option<String> {
        match self.expect(TokenKind::Ident(String::new()))?.kind {
            TokenKind::Ident(name) => Some(name),
            _ => unreachable!("expect() matched an identifier"),
        }
    }

    /// Consumes a string literal token and returns its decoded value.
    pub(crate) fn expect_string(&mut self) -> Option<String> {
        match self.expect(TokenKind::Str(String::new()))?.kind {
            TokenKind::Str(value) => Some(value),
            _ => unreachable!("expect() matched a string literal"),
        }
    }

    /// Reports a free-form parse error at the current token.
    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.handler.error(message, self.current_span());
    }

    /// Allocates the next lambda id.
    pub(crate) fn next_lambda_id(&mut self) -> u32 {
        let id = self.lambda_counter;
        self.lambda_counter += 1;
        id
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;

    /// Lex and parse a source snippet, asserting no diagnostics.
    pub fn parse_ok(source: &str) -> Program {
        let handler = Handler::new();
        let tokens = foobc_lex::tokenize(source, &handler);
        let program = parse(tokens, &handler);
        if handler.has_errors() {
            let diags: Vec<String> = handler.take().iter().map(|d| d.to_string()).collect();
            panic!("unexpected parse errors:\n{}", diags.join("\n"));
        }
        program
    }

    /// Lex and parse a snippet expected to fail; returns the diagnostics.
    pub fn parse_err(source: &str) -> Vec<String> {
        let handler = Handler::new();
        let tokens = foobc_lex::tokenize(source, &handler);
        let _ = parse(tokens, &handler);
        assert!(handler.has_errors(), "expected parse errors for: {source}");
        handler.take().iter().map(|d| d.to_string()).collect()
    }
}
