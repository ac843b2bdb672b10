//! Type reference parsing.

use foobc_lex::TokenKind;

use crate::ast::TypeRef;
use crate::Parser;

/// True for token kinds that may start a variable declaration's type.
///
/// `void` is a valid return type but never a variable type, so it is
/// excluded here.
pub(crate) fn is_var_decl_type_token(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Boolean
            | TokenKind::Integer
            | TokenKind::LongInteger
            | TokenKind::Float
            | TokenKind::LongFloat
            | TokenKind::StringType
            | TokenKind::Character
    )
}

impl<'a> Parser<'a> {
    /// Attempts to parse a type reference without reporting on failure.
    ///
    /// Consumes `primitive | Identifier`, then an optional `[]` suffix.
    /// Returns `None` (without advancing) when the current token cannot
    /// start a type; used by the class-member classifier, which rewinds
    /// and retries.
    pub(crate) fn try_parse_type(&mut self) -> Option<TypeRef> {
        let name = match &self.current().kind {
            TokenKind::Boolean => "boolean".to_string(),
            TokenKind::Integer => "integer".to_string(),
            TokenKind::LongInteger => "longinteger".to_string(),
            TokenKind::Float => "float".to_string(),
            TokenKind::LongFloat => "longfloat".to_string(),
            TokenKind::StringType => "string".to_string(),
            TokenKind::Character => "character".to_string(),
            TokenKind::Void => "void".to_string(),
            TokenKind::Ident(name) => name.clone(),
            _ => return None,
        };
        self.advance();

        let mut is_array = false;
        if self.check(&TokenKind::LBracket) {
            self.advance();
            self.expect(TokenKind::RBracket)?;
            is_array = true;
        }

        Some(TypeRef::new(name, is_array))
    }

    /// Parses a type reference, reporting a diagnostic on failure.
    pub(crate) fn parse_type(&mut self) -> Option<TypeRef> {
        if let Some(ty) = self.try_parse_type() {
            return Some(ty);
        }

        let got = self.current().kind.describe();
        self.error(format!(
            "expected a type (like integer, boolean, string, or a class name), but got {}",
            got
        ));
        None
    }
}
