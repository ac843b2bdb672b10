//! String literal lexing.
//!
//! FOOBAR strings are delimited by `"` or `'`; the same delimiter closes
//! the literal. Supported escapes are `\n`, `\t`, `\\`, and the escaped
//! delimiter; any other escaped character is emitted verbatim.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a string literal, decoding escape sequences.
    ///
    /// An unterminated string is a fatal lexical error reported at the
    /// opening delimiter.
    pub(crate) fn lex_string(&mut self) -> Token {
        let quote = self.cursor.current_char();
        self.cursor.advance();

        let mut content = String::new();
        let mut terminated = false;

        while !self.cursor.is_at_end() {
            let c = self.cursor.current_char();

            if c == quote {
                self.cursor.advance();
                terminated = true;
                break;
            }

            if c == '\\' {
                self.cursor.advance();
                if self.cursor.is_at_end() {
                    break;
                }
                let escaped = self.cursor.current_char();
                match escaped {
                    'n' => content.push('\n'),
                    't' => content.push('\t'),
                    '\\' => content.push('\\'),
                    c if c == quote => content.push(quote),
                    // unknown escapes keep the escaped character as-is
                    other => content.push(other),
                }
                self.cursor.advance();
            } else {
                content.push(c);
                self.cursor.advance();
            }
        }

        if !terminated {
            self.report_error_with_hint(
                "unterminated string literal".to_string(),
                &format!("Strings must be closed with a matching quote ({}).", quote),
            );
        }

        self.make(TokenKind::Str(content))
    }
}

#[cfg(test)]
mod tests {
    use crate::token::TokenKind;
    use crate::Lexer;
    use foobc_util::Handler;

    fn lex_str(source: &str) -> (TokenKind, bool) {
        let handler = Handler::new();
        let kind = {
            let mut lexer = Lexer::new(source, &handler);
            lexer.next_token().kind
        };
        let errored = handler.has_errors();
        (kind, errored)
    }

    #[test]
    fn test_double_quoted() {
        let (kind, err) = lex_str("\"hello\"");
        assert_eq!(kind, TokenKind::Str("hello".into()));
        assert!(!err);
    }

    #[test]
    fn test_single_quoted() {
        let (kind, err) = lex_str("'hello'");
        assert_eq!(kind, TokenKind::Str("hello".into()));
        assert!(!err);
    }

    #[test]
    fn test_newline_and_tab_escapes() {
        let (kind, _) = lex_str("\"a\\nb\\tc\"");
        assert_eq!(kind, TokenKind::Str("a\nb\tc".into()));
    }

    #[test]
    fn test_backslash_escape() {
        let (kind, _) = lex_str("\"a\\\\b\"");
        assert_eq!(kind, TokenKind::Str("a\\b".into()));
    }

    #[test]
    fn test_escaped_delimiter() {
        let (kind, _) = lex_str("\"say \\\"hi\\\"\"");
        assert_eq!(kind, TokenKind::Str("say \"hi\"".into()));
    }

    #[test]
    fn test_other_delimiter_needs_no_escape() {
        let (kind, _) = lex_str("\"it's\"");
        assert_eq!(kind, TokenKind::Str("it's".into()));
    }

    #[test]
    fn test_unknown_escape_passes_through() {
        let (kind, _) = lex_str("\"a\\qb\"");
        assert_eq!(kind, TokenKind::Str("aqb".into()));
    }

    #[test]
    fn test_unterminated_string_reports() {
        let (_, err) = lex_str("\"oops");
        assert!(err);
    }
}
