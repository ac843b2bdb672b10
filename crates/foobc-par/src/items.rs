//! Top-level declaration and class body parsing.

use foobc_lex::TokenKind;

use crate::ast::{
    ClassDecl, ClassMember, Declaration, EnumDecl, FieldDecl, ImportDecl, MethodDecl, Parameter,
};
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses `import "path";`.
    pub(crate) fn parse_import(&mut self) -> Option<ImportDecl> {
        let span = self.current_span();
        self.expect(TokenKind::Import)?;
        let filepath = self.expect_string()?;
        self.expect(TokenKind::Semicolon)?;
        Some(ImportDecl { filepath, span })
    }

    /// Parses one top-level declaration: a class, an enumeration, or a
    /// method (optionally preceded by `public`/`private`).
    pub(crate) fn parse_declaration(&mut self) -> Option<Declaration> {
        if self.check(&TokenKind::Class) {
            return self.parse_class().map(Declaration::Class);
        }
        if self.check(&TokenKind::Enumerated) {
            return self.parse_enum().map(Declaration::Enum);
        }

        let is_public = self.parse_visibility();
        self.parse_method(is_public).map(Declaration::Method)
    }

    /// Consumes an optional `public`/`private` modifier.
    ///
    /// Returns true for `public`; `private` is the default.
    fn parse_visibility(&mut self) -> bool {
        if self.check(&TokenKind::Public) {
            self.advance();
            true
        } else {
            if self.check(&TokenKind::Private) {
                self.advance();
            }
            false
        }
    }

    /// Parses `class Name (inherits A, B)? { member* }`.
    fn parse_class(&mut self) -> Option<ClassDecl> {
        let span = self.current_span();
        self.expect(TokenKind::Class)?;
        let name = self.expect_ident()?;

        let mut parent_classes = Vec::new();
        if self.check(&TokenKind::Inherits) {
            self.advance();
            parent_classes.push(self.expect_ident()?);
            while self.check(&TokenKind::Comma) {
                self.advance();
                parent_classes.push(self.expect_ident()?);
            }
        }

        self.expect(TokenKind::LBrace)?;

        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Eof) {
                self.expect(TokenKind::RBrace)?;
                return None;
            }
            members.push(self.parse_class_member()?);
        }

        self.expect(TokenKind::RBrace)?;
        Some(ClassDecl {
            name,
            parent_classes,
            members,
            span,
        })
    }

    /// Parses one class member: a field, a method, or the `Initialize`
    /// constructor.
    ///
    /// Fields and methods both start with a type, so the classifier parses
    /// a type speculatively, peeks for `Ident (`, then rewinds and commits.
    /// Bounded lookahead only; no backtracking inside bodies.
    fn parse_class_member(&mut self) -> Option<ClassMember> {
        let is_public = self.parse_visibility();

        // `Initialize` is the constructor: no return type.
        if self.check_ident("Initialize") {
            let span = self.current_span();
            let name = self.expect_ident()?;
            self.expect(TokenKind::LParen)?;
            let parameters = self.parse_parameter_list()?;
            self.expect(TokenKind::RParen)?;
            let body = self.parse_block()?;
            return Some(ClassMember::Method(MethodDecl {
                name,
                return_type: None,
                parameters,
                body,
                is_public,
                span,
            }));
        }

        let saved = self.save_pos();
        if self.try_parse_type().is_some() {
            let is_method = self.check(&TokenKind::Ident(String::new()))
                && self.peek(1).kind == TokenKind::LParen;
            self.rewind(saved);

            if is_method {
                return self.parse_method(is_public).map(ClassMember::Method);
            }
            return self.parse_field(is_public).map(ClassMember::Field);
        }

        self.rewind(saved);
        self.error(format!(
            "expected class member, but got {}",
            self.current().kind.describe()
        ));
        None
    }

    /// Parses `type name (= expr)? ;`.
    fn parse_field(&mut self, is_public: bool) -> Option<FieldDecl> {
        let field_type = self.parse_type()?;
        let name = self.expect_ident()?;

        let mut initial_value = None;
        if self.check(&TokenKind::Assign) {
            self.advance();
            initial_value = Some(self.parse_expression()?);
        }

        self.expect(TokenKind::Semicolon)?;
        Some(FieldDecl {
            name,
            field_type,
            is_public,
            initial_value,
        })
    }

    /// Parses `enumerated Name { A, B, C };`.
    fn parse_enum(&mut self) -> Option<EnumDecl> {
        let span = self.current_span();
        self.expect(TokenKind::Enumerated)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LBrace)?;

        let mut values = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Eof) {
                self.expect(TokenKind::RBrace)?;
                return None;
            }
            values.push(self.expect_ident()?);
            if self.check(&TokenKind::Comma) {
                self.advance();
            }
        }

        self.expect(TokenKind::RBrace)?;
        self.expect(TokenKind::Semicolon)?;
        Some(EnumDecl { name, values, span })
    }

    /// Parses a method declaration.
    ///
    /// `Main` is special: it takes no parameters and declares no return
    /// type. Every other method is `type Name(params) block`.
    pub(crate) fn parse_method(&mut self, is_public: bool) -> Option<MethodDecl> {
        if self.check_ident("Main") {
            let span = self.current_span();
            let name = self.expect_ident()?;
            self.expect(TokenKind::LParen)?;
            self.expect(TokenKind::RParen)?;
            let body = self.parse_block()?;
            return Some(MethodDecl {
                name,
                return_type: None,
                parameters: Vec::new(),
                body,
                is_public,
                span,
            });
        }

        let span = self.current_span();
        let return_type = self.parse_type()?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let parameters = self.parse_parameter_list()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;

        Some(MethodDecl {
            name,
            return_type: Some(return_type),
            parameters,
            body,
            is_public,
            span,
        })
    }

    /// Parses a comma-separated parameter list, stopping before `)`.
    fn parse_parameter_list(&mut self) -> Option<Vec<Parameter>> {
        let mut parameters = Vec::new();
        while !self.check(&TokenKind::RParen) {
            if self.check(&TokenKind::Eof) {
                return Some(parameters);
            }
            let param_type = self.parse_type()?;
            let name = self.expect_ident()?;
            parameters.push(Parameter { name, param_type });

            if self.check(&TokenKind::Comma) {
                self.advance();
            }
        }
        Some(parameters)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{ClassMember, Declaration};
    use crate::test_util::{parse_err, parse_ok};

    #[test]
    fn test_class_with_fields_and_methods() {
        let program = parse_ok(
            r#"
            class Dog {
                public string name;
                private integer age = 3;

                public string Speak() {
                    return "Woof";
                }
            }
            "#,
        );
        let class = match &program.declarations[0] {
            Declaration::Class(c) => c,
            other => panic!("expected class, got {:?}", other),
        };
        assert_eq!(class.name, "Dog");
        assert_eq!(class.members.len(), 3);
        match &class.members[0] {
            ClassMember::Field(f) => {
                assert_eq!(f.name, "name");
                assert!(f.is_public);
                assert!(f.initial_value.is_none());
            },
            other => panic!("expected field, got {:?}", other),
        }
        match &class.members[1] {
            ClassMember::Field(f) => {
                assert!(!f.is_public);
                assert!(f.initial_value.is_some());
            },
            other => panic!("expected field, got {:?}", other),
        }
        match &class.members[2] {
            ClassMember::Method(m) => {
                assert_eq!(m.name, "Speak");
                assert_eq!(m.return_type.as_ref().unwrap().name, "string");
            },
            other => panic!("expected method, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_inheritance_list() {
        let program = parse_ok("class C inherits A, B {}");
        match &program.declarations[0] {
            Declaration::Class(c) => {
                assert_eq!(c.parent_classes, vec!["A".to_string(), "B".to_string()]);
            },
            other => panic!("expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_initialize_has_no_return_type() {
        let program = parse_ok(
            r#"
            class Point {
                integer x;
                Initialize(integer ax) {
                    thisclass.x = ax;
                }
            }
            "#,
        );
        let class = match &program.declarations[0] {
            Declaration::Class(c) => c,
            other => panic!("expected class, got {:?}", other),
        };
        match &class.members[1] {
            ClassMember::Method(m) => {
                assert_eq!(m.name, "Initialize");
                assert!(m.return_type.is_none());
                assert_eq!(m.parameters.len(), 1);
            },
            other => panic!("expected method, got {:?}", other),
        }
    }

    #[test]
    fn test_constructor_overloads_parse() {
        let program = parse_ok(
            r#"
            class Point {
                integer x;
                Initialize() { thisclass.x = 0; }
                Initialize(integer ax) { thisclass.x = ax; }
            }
            "#,
        );
        match &program.declarations[0] {
            Declaration::Class(c) => assert_eq!(c.members.len(), 3),
            other => panic!("expected class, got {:?}", other),
        }
    }

    #[test]
    fn test_enum_declaration() {
        let program = parse_ok("enumerated Color { Red, Green, Blue };");
        match &program.declarations[0] {
            Declaration::Enum(e) => {
                assert_eq!(e.name, "Color");
                assert_eq!(e.values, vec!["Red", "Green", "Blue"]);
            },
            other => panic!("expected enum, got {:?}", other),
        }
    }

    #[test]
    fn test_enum_requires_trailing_semicolon() {
        let diags = parse_err("enumerated Color { Red }");
        assert!(diags.iter().any(|d| d.contains("';'")), "{diags:?}");
    }

    #[test]
    fn test_free_function_with_parameters() {
        let program = parse_ok("integer Add(integer a, integer b) { return a + b; }");
        match &program.declarations[0] {
            Declaration::Method(m) => {
                assert_eq!(m.name, "Add");
                assert_eq!(m.parameters.len(), 2);
                assert_eq!(m.parameters[0].name, "a");
            },
            other => panic!("expected method, got {:?}", other),
        }
    }

    #[test]
    fn test_array_typed_field_and_method() {
        let program = parse_ok(
            r#"
            class Bag {
                integer[] items;
                integer[] All() { return thisclass.items; }
            }
            "#,
        );
        let class = match &program.declarations[0] {
            Declaration::Class(c) => c,
            other => panic!("expected class, got {:?}", other),
        };
        match &class.members[0] {
            ClassMember::Field(f) => assert!(f.field_type.is_array),
            other => panic!("expected field, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_class_member_reports() {
        let diags = parse_err("class C { 42; }");
        assert!(diags.iter().any(|d| d.contains("class member")), "{diags:?}");
    }
}
