//! Multi-character operator lexing.
//!
//! Longest match first: `->`, `++`, `--`, `==`, `>=`, `<=`, and the slice
//! operators `.,`, `..`, `,,`.

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes minus, arrow, or decrement.
    pub(crate) fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        match self.cursor.current_char() {
            '>' => {
                self.cursor.advance();
                self.make(TokenKind::Arrow)
            },
            '-' => {
                self.cursor.advance();
                self.make(TokenKind::MinusMinus)
            },
            _ => self.make(TokenKind::Minus),
        }
    }

    /// Lexes plus or increment.
    pub(crate) fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == '+' {
            self.cursor.advance();
            self.make(TokenKind::PlusPlus)
        } else {
            self.make(TokenKind::Plus)
        }
    }

    /// Lexes assignment or equality.
    pub(crate) fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            self.make(TokenKind::EqEq)
        } else {
            self.make(TokenKind::Assign)
        }
    }

    /// Lexes greater-than or greater-or-equal.
    pub(crate) fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            self.make(TokenKind::GreaterEq)
        } else {
            self.make(TokenKind::Greater)
        }
    }

    /// Lexes less-than or less-or-equal.
    pub(crate) fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            self.make(TokenKind::LessEq)
        } else {
            self.make(TokenKind::Less)
        }
    }

    /// Lexes dot, the `.,` slice, or the `..` slice.
    pub(crate) fn lex_dot(&mut self) -> Token {
        self.cursor.advance();
        match self.cursor.current_char() {
            ',' => {
                self.cursor.advance();
                self.make(TokenKind::SliceIncExc)
            },
            '.' => {
                self.cursor.advance();
                self.make(TokenKind::SliceIncInc)
            },
            _ => self.make(TokenKind::Dot),
        }
    }

    /// Lexes comma or the `,,` slice.
    pub(crate) fn lex_comma(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == ',' {
            self.cursor.advance();
            self.make(TokenKind::SliceExcExc)
        } else {
            self.make(TokenKind::Comma)
        }
    }
}
