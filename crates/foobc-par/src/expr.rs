//! Expression parsing.
//!
//! A recursive-descent cascade, one method per precedence level
//! (low → high):
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | assignment | `=` | Right |
//! | xor | `VV` | Left |
//! | or | `V` | Left |
//! | and | `&` | Left |
//! | comparison | `isa`, `==`, `>`, `<`, `>=`, `<=` | Left |
//! | additive | `+`, `-` | Left |
//! | multiplicative | `*`, `/`, `%` | Left |
//! | power | `^` | Right |
//! | unary | `not(..)`, prefix `++`/`--` | - |
//! | postfix | index, slice, member, call, `++`/`--` | Left |
//!
//! Lambdas are contextual: inside a method-call argument position, a
//! leading `Identifier ->` or balanced `( ... ) ->` is a lambda. The
//! multi-parameter form requires scanning ahead over balanced parentheses
//! and rewinding the cursor.

use foobc_lex::TokenKind;

use crate::ast::{
    ArrayAccess, ArraySlice, Assignment, BinOp, BinaryExpr, Expression, IsA, Lambda, Literal,
    MemberAccess, MethodCall, NewInstance, SliceKind, UnOp, UnaryExpr,
};
use crate::Parser;

/// Member names that are properties, never methods, even when written
/// with empty parentheses.
const PROPERTIES: &[&str] = &["length"];

impl<'a> Parser<'a> {
    /// Parses a full expression.
    pub(crate) fn parse_expression(&mut self) -> Option<Expression> {
        self.parse_assignment()
    }

    /// `assignment := xor ('=' assignment)?`, right-associative.
    fn parse_assignment(&mut self) -> Option<Expression> {
        let expr = self.parse_xor()?;

        if self.check(&TokenKind::Assign) {
            self.advance();
            let value = self.parse_expression()?;
            return Some(Expression::Assignment(Box::new(Assignment {
                target: expr,
                value,
            })));
        }

        Some(expr)
    }

    /// `xor := or ('VV' or)*`
    ///
    /// Exposed to the unary level: `not ( ... )` parses its operand at
    /// this level so the closing parenthesis stays with `not`.
    pub(crate) fn parse_xor(&mut self) -> Option<Expression> {
        let mut left = self.parse_or()?;

        while self.check(&TokenKind::Xor) {
            self.advance();
            let right = self.parse_or()?;
            left = binary(left, BinOp::Xor, right);
        }

        Some(left)
    }

    /// `or := and ('V' and)*`
    fn parse_or(&mut self) -> Option<Expression> {
        let mut left = self.parse_and()?;

        while self.check(&TokenKind::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = binary(left, BinOp::Or, right);
        }

        Some(left)
    }

    /// `and := cmp ('&' cmp)*`
    fn parse_and(&mut self) -> Option<Expression> {
        let mut left = self.parse_comparison()?;

        while self.check(&TokenKind::And) {
            self.advance();
            let right = self.parse_comparison()?;
            left = binary(left, BinOp::And, right);
        }

        Some(left)
    }

    /// `cmp := add ('isa' Ident | (== > < >= <=) add)*`
    fn parse_comparison(&mut self) -> Option<Expression> {
        let mut left = self.parse_additive()?;

        // isa binds here and terminates the comparison chain
        if self.check(&TokenKind::Isa) {
            self.advance();
            let class_name = self.expect_ident()?;
            return Some(Expression::IsA(Box::new(IsA {
                object: left,
                class_name,
            })));
        }

        loop {
            let op = match self.current().kind {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::Greater => BinOp::Greater,
                TokenKind::Less => BinOp::Less,
                TokenKind::GreaterEq => BinOp::GreaterEq,
                TokenKind::LessEq => BinOp::LessEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(left, op, right);
        }

        Some(left)
    }

    /// `add := mul ((+|-) mul)*`
    fn parse_additive(&mut self) -> Option<Expression> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(left, op, right);
        }

        Some(left)
    }

    /// `mul := pow ((*|/|%) pow)*`
    fn parse_multiplicative(&mut self) -> Option<Expression> {
        let mut left = self.parse_power()?;

        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_power()?;
            left = binary(left, op, right);
        }

        Some(left)
    }

    /// `pow := unary ('^' pow)?`, right-associative.
    fn parse_power(&mut self) -> Option<Expression> {
        let left = self.parse_unary()?;

        if self.check(&TokenKind::Caret) {
            self.advance();
            let right = self.parse_power()?;
            return Some(binary(left, BinOp::Pow, right));
        }

        Some(left)
    }

    /// `unary := 'not' '(' xor ')' | ('++'|'--') postfix | postfix`
    fn parse_unary(&mut self) -> Option<Expression> {
        if self.check(&TokenKind::Not) {
            self.advance();
            self.expect(TokenKind::LParen)?;
            let operand = self.parse_xor()?;
            self.expect(TokenKind::RParen)?;
            return Some(Expression::Unary(Box::new(UnaryExpr {
                op: UnOp::Not,
                operand,
                is_prefix: true,
            })));
        }

        let op = match self.current().kind {
            TokenKind::PlusPlus => Some(UnOp::Increment),
            TokenKind::MinusMinus => Some(UnOp::Decrement),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_postfix()?;
            return Some(Expression::Unary(Box::new(UnaryExpr {
                op,
                operand,
                is_prefix: true,
            })));
        }

        self.parse_postfix()
    }

    /// `postfix := primary (index | slice | member | call | '++' | '--')*`
    fn parse_postfix(&mut self) -> Option<Expression> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.check(&TokenKind::LBracket) {
                self.advance();
                expr = self.parse_index_or_slice(expr)?;
                continue;
            }

            if self.check(&TokenKind::Dot) {
                self.advance();
                expr = self.parse_member(expr)?;
                continue;
            }

            let op = match self.current().kind {
                TokenKind::PlusPlus => Some(UnOp::Increment),
                TokenKind::MinusMinus => Some(UnOp::Decrement),
                _ => None,
            };
            if let Some(op) = op {
                self.advance();
                expr = Expression::Unary(Box::new(UnaryExpr {
                    op,
                    operand: expr,
                    is_prefix: false,
                }));
                continue;
            }

            break;
        }

        Some(expr)
    }

    /// Parses the inside of `[...]`: plain index, `start <op> end` slice,
    /// or a slice with implicit start 0 when the operator comes first.
    fn parse_index_or_slice(&mut self, array: Expression) -> Option<Expression> {
        if let Some(kind) = self.slice_kind() {
            self.advance();
            let end = self.parse_expression()?;
            self.expect(TokenKind::RBracket)?;
            return Some(Expression::ArraySlice(Box::new(ArraySlice {
                array,
                start: Expression::Literal(Literal::Integer(0)),
                end,
                kind,
            })));
        }

        let index = self.parse_expression()?;

        if let Some(kind) = self.slice_kind() {
            self.advance();
            let end = self.parse_expression()?;
            self.expect(TokenKind::RBracket)?;
            return Some(Expression::ArraySlice(Box::new(ArraySlice {
                array,
                start: index,
                end,
                kind,
            })));
        }

        self.expect(TokenKind::RBracket)?;
        Some(Expression::ArrayAccess(Box::new(ArrayAccess {
            array,
            index,
        })))
    }

    fn slice_kind(&self) -> Option<SliceKind> {
        match self.current().kind {
            TokenKind::SliceIncExc => Some(SliceKind::IncExc),
            TokenKind::SliceExcExc => Some(SliceKind::ExcExc),
            TokenKind::SliceIncInc => Some(SliceKind::IncInc),
            _ => None,
        }
    }

    /// Parses the member or method-call after a `.`.
    fn parse_member(&mut self, object: Expression) -> Option<Expression> {
        let member_name = self.expect_ident()?;

        // `length` is a property; empty parens are tolerated and ignored.
        if PROPERTIES.contains(&member_name.as_str()) {
            if self.check(&TokenKind::LParen) {
                self.advance();
                self.expect(TokenKind::RParen)?;
            }
            return Some(Expression::MemberAccess(Box::new(MemberAccess {
                object,
                member_name,
            })));
        }

        if self.check(&TokenKind::LParen) {
            self.advance();
            let arguments = self.parse_call_arguments()?;
            self.expect(TokenKind::RParen)?;
            return Some(Expression::MethodCall(Box::new(MethodCall {
                object: Some(object),
                method_name: member_name,
                arguments,
            })));
        }

        Some(Expression::MemberAccess(Box::new(MemberAccess {
            object,
            member_name,
        })))
    }

    /// Parses method-call arguments, detecting lambdas contextually.
    fn parse_call_arguments(&mut self) -> Option<Vec<Expression>> {
        let mut arguments = Vec::new();

        while !self.check(&TokenKind::RParen) {
            if self.check(&TokenKind::Eof) {
                return Some(arguments);
            }

            if self.at_lambda() {
                arguments.push(self.parse_lambda()?);
            } else {
                arguments.push(self.parse_expression()?);
            }

            if self.check(&TokenKind::Comma) {
                self.advance();
            }
        }

        Some(arguments)
    }

    /// Lambda lookahead: `Ident ->` directly, or a balanced `( ... )`
    /// followed by `->`. The paren scan saves the cursor, skims over
    /// balanced parens, and restores it.
    fn at_lambda(&mut self) -> bool {
        if matches!(self.current().kind, TokenKind::Ident(_))
            && self.peek(1).kind == TokenKind::Arrow
        {
            return true;
        }

        if self.check(&TokenKind::LParen) {
            let saved = self.save_pos();
            self.advance();
            let mut depth = 1u32;
            while depth > 0 && !self.check(&TokenKind::Eof) {
                match self.current().kind {
                    TokenKind::LParen => depth += 1,
                    TokenKind::RParen => depth -= 1,
                    _ => {},
                }
                self.advance();
            }
            let is_lambda = self.check(&TokenKind::Arrow);
            self.rewind(saved);
            return is_lambda;
        }

        false
    }

    /// Parses `x -> expr` or `(x, y) -> expr`.
    fn parse_lambda(&mut self) -> Option<Expression> {
        let mut parameters = Vec::new();

        if self.check(&TokenKind::LParen) {
            self.advance();
            while !self.check(&TokenKind::RParen) {
                if self.check(&TokenKind::Eof) {
                    break;
                }
                parameters.push(self.expect_ident()?);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                }
            }
            self.expect(TokenKind::RParen)?;
        } else {
            parameters.push(self.expect_ident()?);
        }

        self.expect(TokenKind::Arrow)?;
        let body = self.parse_expression()?;
        let id = self.next_lambda_id();

        Some(Expression::Lambda(Box::new(Lambda {
            parameters,
            body,
            id,
        })))
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Option<Expression> {
        match self.current().kind.clone() {
            TokenKind::New => {
                self.advance();
                let class_name = self.expect_ident()?;
                self.expect(TokenKind::LParen)?;
                let arguments = self.parse_plain_arguments()?;
                self.expect(TokenKind::RParen)?;
                Some(Expression::NewInstance(NewInstance {
                    class_name,
                    arguments,
                }))
            },
            TokenKind::ThisClass => {
                self.advance();
                Some(Expression::ThisClass)
            },
            TokenKind::Parent => {
                self.advance();
                Some(Expression::Parent)
            },
            TokenKind::True => {
                self.advance();
                Some(Expression::Literal(Literal::Boolean(true)))
            },
            TokenKind::False => {
                self.advance();
                Some(Expression::Literal(Literal::Boolean(false)))
            },
            TokenKind::Number(value) => {
                self.advance();
                Some(Expression::Literal(Literal::Integer(value)))
            },
            TokenKind::FloatNumber(value) => {
                self.advance();
                Some(Expression::Literal(Literal::Float(value)))
            },
            TokenKind::Str(value) => {
                self.advance();
                Some(Expression::Literal(Literal::Str(value)))
            },
            TokenKind::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                while !self.check(&TokenKind::RBracket) {
                    if self.check(&TokenKind::Eof) {
                        break;
                    }
                    elements.push(self.parse_expression()?);
                    if self.check(&TokenKind::Comma) {
                        self.advance();
                    }
                }
                self.expect(TokenKind::RBracket)?;
                Some(Expression::ArrayLiteral(elements))
            },
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Some(expr)
            },
            TokenKind::Ident(name) => {
                self.advance();
                if self.check(&TokenKind::LParen) {
                    self.advance();
                    let arguments = self.parse_plain_arguments()?;
                    self.expect(TokenKind::RParen)?;
                    return Some(Expression::MethodCall(Box::new(MethodCall {
                        object: None,
                        method_name: name,
                        arguments,
                    })));
                }
                Some(Expression::Identifier(name))
            },
            other => {
                self.error(format!("unexpected token {}", other.describe()));
                None
            },
        }
    }

    /// Parses a comma-separated argument list without lambda detection
    /// (constructor calls and standalone function calls).
    fn parse_plain_arguments(&mut self) -> Option<Vec<Expression>> {
        let mut arguments = Vec::new();
        while !self.check(&TokenKind::RParen) {
            if self.check(&TokenKind::Eof) {
                break;
            }
            arguments.push(self.parse_expression()?);
            if self.check(&TokenKind::Comma) {
                self.advance();
            }
        }
        Some(arguments)
    }
}

fn binary(left: Expression, op: BinOp, right: Expression) -> Expression {
    Expression::Binary(Box::new(BinaryExpr { left, op, right }))
}
