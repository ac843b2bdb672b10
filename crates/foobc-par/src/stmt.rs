//! Statement and block parsing.

use foobc_lex::TokenKind;

use crate::ast::{Block, IfStmt, LoopForStmt, LoopUntilStmt, Statement, VarDecl};
use crate::types::is_var_decl_type_token;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses `{ statement* }`.
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        self.expect(TokenKind::LBrace)?;

        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Eof) {
                self.expect(TokenKind::RBrace)?;
                return None;
            }
            statements.push(self.parse_statement()?);
        }

        self.expect(TokenKind::RBrace)?;
        Some(Block { statements })
    }

    /// Parses a single statement.
    pub(crate) fn parse_statement(&mut self) -> Option<Statement> {
        if self.check(&TokenKind::Return) {
            self.advance();
            let value = if self.check(&TokenKind::Semicolon) {
                None
            } else {
                Some(self.parse_expression()?)
            };
            self.expect(TokenKind::Semicolon)?;
            return Some(Statement::Return(value));
        }

        if self.check(&TokenKind::If) {
            return self.parse_if().map(Statement::If);
        }

        if self.check(&TokenKind::Loop) {
            return self.parse_loop();
        }

        if self.starts_var_decl() {
            let var_type = self.parse_type()?;
            let name = self.expect_ident()?;

            let mut initial_value = None;
            if self.check(&TokenKind::Assign) {
                self.advance();
                initial_value = Some(self.parse_expression()?);
            }

            self.expect(TokenKind::Semicolon)?;
            return Some(Statement::VarDecl(VarDecl {
                name,
                var_type,
                initial_value,
            }));
        }

        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;
        Some(Statement::Expression(expr))
    }

    /// Decides whether the statement at the cursor is a variable
    /// declaration.
    ///
    /// A primitive type token always starts one. An identifier starts one
    /// only when followed by another identifier (`Dog d`) or by an empty
    /// bracket pair (`Dog[] d`); `arr[0] = ...` stays an expression.
    fn starts_var_decl(&self) -> bool {
        if is_var_decl_type_token(&self.current().kind) {
            return true;
        }
        if matches!(self.current().kind, TokenKind::Ident(_)) {
            if matches!(self.peek(1).kind, TokenKind::Ident(_)) {
                return true;
            }
            if self.peek(1).kind == TokenKind::LBracket
                && self.peek(2).kind == TokenKind::RBracket
            {
                return true;
            }
        }
        false
    }

    /// Parses `if (c) {} (elseif (c) {})* (else () {})?`.
    ///
    /// `else` requires empty parentheses; that shape is part of the
    /// grammar.
    fn parse_if(&mut self) -> Option<IfStmt> {
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let then_block = self.parse_block()?;

        let mut elseif_parts = Vec::new();
        while self.check(&TokenKind::ElseIf) {
            self.advance();
            self.expect(TokenKind::LParen)?;
            let cond = self.parse_expression()?;
            self.expect(TokenKind::RParen)?;
            let block = self.parse_block()?;
            elseif_parts.push((cond, block));
        }

        let mut else_block = None;
        if self.check(&TokenKind::Else) {
            self.advance();
            self.expect(TokenKind::LParen)?;
            self.expect(TokenKind::RParen)?;
            else_block = Some(self.parse_block()?);
        }

        Some(IfStmt {
            condition,
            then_block,
            elseif_parts,
            else_block,
        })
    }

    /// Parses `loop for (count) block` or `loop until (condition) block`.
    fn parse_loop(&mut self) -> Option<Statement> {
        self.expect(TokenKind::Loop)?;

        if self.check(&TokenKind::For) {
            self.advance();
            self.expect(TokenKind::LParen)?;
            let count = self.parse_expression()?;
            self.expect(TokenKind::RParen)?;
            let body = self.parse_block()?;
            return Some(Statement::LoopFor(LoopForStmt { count, body }));
        }

        if self.check(&TokenKind::Until) {
            self.advance();
            self.expect(TokenKind::LParen)?;
            let condition = self.parse_expression()?;
            self.expect(TokenKind::RParen)?;
            let body = self.parse_block()?;
            return Some(Statement::LoopUntil(LoopUntilStmt { condition, body }));
        }

        self.error("expected 'for' or 'until' after 'loop'");
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Declaration, Expression, Statement};
    use crate::test_util::{parse_err, parse_ok};

    fn main_statements(body: &str) -> Vec<Statement> {
        let source = format!("Main() {{ {} }}", body);
        let program = parse_ok(&source);
        match program.declarations.into_iter().next().unwrap() {
            Declaration::Method(m) => m.body.statements,
            other => panic!("expected method, got {:?}", other),
        }
    }

    #[test]
    fn test_var_decl_with_initializer() {
        let stmts = main_statements("integer x = 42;");
        match &stmts[0] {
            Statement::VarDecl(v) => {
                assert_eq!(v.name, "x");
                assert_eq!(v.var_type.name, "integer");
                assert!(v.initial_value.is_some());
            },
            other => panic!("expected var decl, got {:?}", other),
        }
    }

    #[test]
    fn test_class_typed_var_decl() {
        let stmts = main_statements("Dog d = new Dog();");
        assert!(matches!(&stmts[0], Statement::VarDecl(v) if v.var_type.name == "Dog"));
    }

    #[test]
    fn test_array_element_assignment_is_expression() {
        let stmts = main_statements("arr[0] = 5;");
        match &stmts[0] {
            Statement::Expression(Expression::Assignment(_)) => {},
            other => panic!("expected assignment expression, got {:?}", other),
        }
    }

    #[test]
    fn test_if_elseif_else_chain() {
        let stmts = main_statements(
            "if (a > 1) { return true; } elseif (a > 0) { return false; } else () { return true; }",
        );
        match &stmts[0] {
            Statement::If(stmt) => {
                assert_eq!(stmt.elseif_parts.len(), 1);
                assert!(stmt.else_block.is_some());
            },
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_else_is_rejected() {
        let diags = parse_err("Main() { if (x) { } else { } }");
        assert!(diags.iter().any(|d| d.contains("'('")), "{diags:?}");
    }

    #[test]
    fn test_loop_for() {
        let stmts = main_statements("loop for (10) { x++; }");
        assert!(matches!(&stmts[0], Statement::LoopFor(_)));
    }

    #[test]
    fn test_loop_until() {
        let stmts = main_statements("loop until (x > 10) { x++; }");
        assert!(matches!(&stmts[0], Statement::LoopUntil(_)));
    }

    #[test]
    fn test_loop_without_keyword_fails() {
        let diags = parse_err("Main() { loop (10) { } }");
        assert!(
            diags.iter().any(|d| d.contains("'for' or 'until'")),
            "{diags:?}"
        );
    }

    #[test]
    fn test_bare_return() {
        let stmts = main_statements("return;");
        assert!(matches!(&stmts[0], Statement::Return(None)));
    }
}
