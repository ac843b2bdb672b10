//! Light type inference.
//!
//! Just enough typing to pick the correct C emission: string operators,
//! array runtime calls, constructor and method dispatch. Anything the
//! table below cannot answer returns `None` and the emission falls back
//! to pass-through C, leaving the final word to the host compiler.

use foobc_par::{Expression, Literal};

use crate::CGenerator;

impl<'p> CGenerator<'p> {
    /// Infers the FOOBAR type name of an expression, `[]`-suffixed for
    /// arrays. Returns `None` when the type cannot be determined.
    pub(crate) fn infer_expression_type(&self, expr: &Expression) -> Option<String> {
        match expr {
            Expression::Literal(literal) => Some(
                match literal {
                    Literal::Boolean(_) => "boolean",
                    Literal::Integer(_) => "integer",
                    Literal::Float(_) => "float",
                    Literal::Str(_) => "string",
                }
                .to_string(),
            ),

            Expression::Identifier(name) => self.scopes.get(name).map(str::to_string),

            Expression::NewInstance(new) => Some(new.class_name.clone()),

            Expression::ThisClass => self.current_class.clone(),

            Expression::MethodCall(call) => {
                let object = call.object.as_ref()?;
                let obj_type = self.infer_expression_type(object)?;

                if obj_type.contains("[]") {
                    match call.method_name.as_str() {
                        // transformations keep the array type
                        "map" | "filter" | "sort" | "unique" => return Some(obj_type),
                        // folds produce the element type
                        "reduce" | "find" => return Some(obj_type.replace("[]", "")),
                        _ => {},
                    }
                }

                self.method_signatures
                    .get(&(obj_type, call.method_name.clone()))
                    .cloned()
            },

            Expression::Binary(binary) => {
                let left = self.infer_expression_type(&binary.left);
                let right = self.infer_expression_type(&binary.right);
                if let Some(left) = left {
                    if left.contains("[]") {
                        return Some(left);
                    }
                }
                if let Some(right) = right {
                    if right.contains("[]") {
                        return Some(right);
                    }
                }
                Some("integer".to_string())
            },

            Expression::ArrayLiteral(elements) => {
                if let Some(first) = elements.first() {
                    if let Some(elem_type) = self.infer_expression_type(first) {
                        return Some(format!("{}[]", elem_type));
                    }
                }
                Some("integer[]".to_string())
            },

            _ => None,
        }
    }
}
