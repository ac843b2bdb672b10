//! Number literal lexing.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a numeric literal.
    ///
    /// A literal is a run of digits, optionally containing exactly one `.`.
    /// A `.` followed by `.` or `,` belongs to a slice operator (`..`,
    /// `.,`) and terminates the number instead. A literal containing a `.`
    /// is floating-point; otherwise it is an integer.
    pub(crate) fn lex_number(&mut self) -> Token {
        let mut has_dot = false;

        loop {
            let c = self.cursor.current_char();
            if c.is_ascii_digit() {
                self.cursor.advance();
                continue;
            }
            if c == '.' {
                let next = self.cursor.peek_char(1);
                if next == '.' || next == ',' {
                    break;
                }
                if has_dot {
                    break;
                }
                has_dot = true;
                self.cursor.advance();
                continue;
            }
            break;
        }

        let text = self.cursor.slice_from(self.token_start);

        if has_dot {
            match text.parse::<f64>() {
                Ok(value) => self.make(TokenKind::FloatNumber(value)),
                Err(e) => {
                    self.report_error(format!("invalid floating point literal '{}': {}", text, e));
                    self.make(TokenKind::FloatNumber(0.0))
                },
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => self.make(TokenKind::Number(value)),
                Err(e) => {
                    self.report_error(format!("integer literal overflow: {}", e));
                    self.make(TokenKind::Number(0))
                },
            }
        }
    }
}
