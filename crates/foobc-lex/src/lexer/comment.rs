//! Whitespace and comment handling.

use foobc_util::Span;

use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Skips whitespace and comments before the next token.
    ///
    /// Whitespace is space, tab, CR, and LF. Line comments run from `//`
    /// to end of line; block comments run from `/*` to `*/` and may span
    /// lines. Block comments do not nest.
    pub(crate) fn skip_whitespace_and_comments(&mut self) {
        loop {
            if self.cursor.is_at_end() {
                return;
            }

            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.cursor.advance();
                },
                '/' => {
                    let next = self.cursor.peek_char(1);
                    if next == '/' {
                        self.skip_line_comment();
                    } else if next == '*' {
                        self.skip_block_comment();
                    } else {
                        return;
                    }
                },
                _ => return,
            }
        }
    }

    /// Skips a line comment (from `//` to end of line).
    fn skip_line_comment(&mut self) {
        self.cursor.advance();
        self.cursor.advance();

        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    /// Skips a block comment. An unterminated block comment is a fatal
    /// lexical error reported at the opening `/*`.
    fn skip_block_comment(&mut self) {
        let start = Span::new(self.cursor.line(), self.cursor.column());
        self.cursor.advance();
        self.cursor.advance();

        while !self.cursor.is_at_end() {
            if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                self.cursor.advance();
                self.cursor.advance();
                return;
            }
            self.cursor.advance();
        }

        // token_start has not been stamped yet while skipping trivia, so
        // report at the recorded opening position.
        self.error_at("unclosed multi-line comment".to_string(), start);
    }
}

#[cfg(test)]
mod tests {
    use crate::token::TokenKind;
    use crate::tokenize;
    use foobc_util::Handler;

    #[test]
    fn test_skip_line_comment() {
        let handler = Handler::new();
        let tokens = tokenize("// a comment\nfoo", &handler);
        assert_eq!(tokens[0].kind, TokenKind::Ident("foo".into()));
        assert_eq!(tokens[0].line, 2);
    }

    #[test]
    fn test_skip_block_comment() {
        let handler = Handler::new();
        let tokens = tokenize("/* a\n   multi-line\n   comment */ foo", &handler);
        assert_eq!(tokens[0].kind, TokenKind::Ident("foo".into()));
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_line_comment_at_eof() {
        let handler = Handler::new();
        let tokens = tokenize("foo // trailing", &handler);
        assert_eq!(tokens.len(), 2);
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_unterminated_block_comment_reports() {
        let handler = Handler::new();
        let _ = tokenize("foo /* never closed", &handler);
        assert!(handler.has_errors());
    }
}
