//! Name mangling and overload selection.
//!
//! C has no overloading, so every FOOBAR method lowers to a function whose
//! name encodes its class, name, and parameter types:
//! `Class_Method_<slug>_<slug>` where each slug is the parameter's C type
//! with `*` replaced by `ptr` and spaces by `_`. Zero-parameter methods
//! mangle as `Class_Method_void`; constructors use the method name `new`.

use foobc_par::{ClassMember, MethodDecl, Parameter, TypeRef};

use crate::CGenerator;

/// The C array struct name for a FOOBAR element type.
pub(crate) fn array_type_name(base_type: &str) -> &'static str {
    match base_type {
        "integer" => "IntArray",
        "float" => "FloatArray",
        "longfloat" => "LongFloatArray",
        "longinteger" => "LongIntArray",
        "boolean" => "BoolArray",
        "character" => "CharArray",
        "string" => "StringArray",
        _ => "ObjectArray",
    }
}

/// The C element type stored in an array of the given FOOBAR type.
pub(crate) fn c_element_type(base_type: &str) -> &'static str {
    match base_type {
        "boolean" => "bool",
        "integer" => "int",
        "longinteger" => "long long",
        "float" => "float",
        "longfloat" => "double",
        "string" => "char*",
        "character" => "char",
        _ => "void*",
    }
}

impl<'p> CGenerator<'p> {
    /// Maps a FOOBAR type reference to its C spelling.
    ///
    /// User-defined class types become pointers; array types become
    /// pointers to the per-element array struct.
    pub(crate) fn c_type(&self, ty: &TypeRef) -> String {
        if ty.is_array {
            return format!("{}*", array_type_name(&ty.name));
        }

        if self.classes.contains_key(&ty.name) {
            return format!("{}*", ty.name);
        }

        match ty.name.as_str() {
            "boolean" => "bool".to_string(),
            "integer" => "int".to_string(),
            "longinteger" => "long long".to_string(),
            "float" => "float".to_string(),
            "longfloat" => "double".to_string(),
            "string" => "char*".to_string(),
            "character" => "char".to_string(),
            "void" => "void".to_string(),
            // enums and unknown names pass through unchanged
            other => other.to_string(),
        }
    }

    /// Mangles a method name with its class and parameter types.
    pub(crate) fn mangle_method_name(
        &self,
        class_name: &str,
        method_name: &str,
        parameters: &[Parameter],
    ) -> String {
        if parameters.is_empty() {
            return format!("{}_{}_void", class_name, method_name);
        }

        let type_suffix = parameters
            .iter()
            .map(|p| self.c_type(&p.param_type).replace('*', "ptr").replace(' ', "_"))
            .collect::<Vec<_>>()
            .join("_");

        format!("{}_{}_{}", class_name, method_name, type_suffix)
    }

    /// Selects the overload for a call `obj.method(args)` on class
    /// `class_name` and returns the mangled function name.
    ///
    /// Selection is by arity only: a unique arity match wins, ties go to
    /// the first declared overload, misses walk the parent classes in
    /// declaration order (the wrapper emitted on the subclass carries the
    /// subclass's mangled name). The unmangled `Class_method` is the
    /// best-effort fallback.
    pub(crate) fn find_method_overload(
        &self,
        class_name: &str,
        method_name: &str,
        arg_count: usize,
    ) -> String {
        let fallback = format!("{}_{}", class_name, method_name);

        let Some(class) = self.classes.get(class_name).copied() else {
            return fallback;
        };

        let matching: Vec<&MethodDecl> = class
            .members
            .iter()
            .filter_map(|member| match member {
                ClassMember::Method(m)
                    if m.name == method_name && m.parameters.len() == arg_count =>
                {
                    Some(m)
                },
                _ => None,
            })
            .collect();

        if let Some(first) = matching.first() {
            return self.mangle_method_name(class_name, method_name, &first.parameters);
        }

        // not defined here: walk parents in declaration order
        for parent_name in &class.parent_classes {
            let Some(parent) = self.classes.get(parent_name).copied() else {
                continue;
            };
            let parent_result = self.find_method_overload(parent_name, method_name, arg_count);
            if parent_result == format!("{}_{}", parent_name, method_name) {
                continue;
            }
            for member in &parent.members {
                if let ClassMember::Method(m) = member {
                    if m.name == method_name && m.parameters.len() == arg_count {
                        return self.mangle_method_name(class_name, method_name, &m.parameters);
                    }
                }
            }
        }

        fallback
    }
}

#[cfg(test)]
mod tests {
    use crate::test_util::parse_program;
    use foobc_par::{Parameter, TypeRef};

    use super::{array_type_name, c_element_type};

    #[test]
    fn test_array_type_names() {
        assert_eq!(array_type_name("integer"), "IntArray");
        assert_eq!(array_type_name("longfloat"), "LongFloatArray");
        assert_eq!(array_type_name("string"), "StringArray");
        assert_eq!(array_type_name("Dog"), "ObjectArray");
    }

    #[test]
    fn test_element_types() {
        assert_eq!(c_element_type("boolean"), "bool");
        assert_eq!(c_element_type("longinteger"), "long long");
        assert_eq!(c_element_type("Dog"), "void*");
    }

    #[test]
    fn test_c_type_mapping() {
        let program = parse_program("Main() { return true; }");
        let generator = crate::CGenerator::new(&program);
        assert_eq!(generator.c_type(&TypeRef::new("integer", false)), "int");
        assert_eq!(generator.c_type(&TypeRef::new("string", false)), "char*");
        assert_eq!(generator.c_type(&TypeRef::new("integer", true)), "IntArray*");
        assert_eq!(generator.c_type(&TypeRef::new("longfloat", false)), "double");
    }

    #[test]
    fn test_class_types_are_pointers() {
        let program = parse_program("class Dog {}\nMain() { return true; }");
        let generator = crate::CGenerator::new(&program);
        assert_eq!(generator.c_type(&TypeRef::new("Dog", false)), "Dog*");
    }

    #[test]
    fn test_mangle_zero_params() {
        let program = parse_program("Main() { return true; }");
        let generator = crate::CGenerator::new(&program);
        assert_eq!(
            generator.mangle_method_name("Dog", "Speak", &[]),
            "Dog_Speak_void"
        );
    }

    #[test]
    fn test_mangle_with_params() {
        let program = parse_program("Main() { return true; }");
        let generator = crate::CGenerator::new(&program);
        let params = vec![
            Parameter {
                name: "s".into(),
                param_type: TypeRef::new("string", false),
            },
            Parameter {
                name: "n".into(),
                param_type: TypeRef::new("longinteger", false),
            },
        ];
        assert_eq!(
            generator.mangle_method_name("Dog", "Rename", &params),
            "Dog_Rename_charptr_long_long"
        );
    }

    #[test]
    fn test_overload_selection_by_arity() {
        let source = r#"
            class Calc {
                integer Add(integer a) { return a; }
                integer Add(integer a, integer b) { return a + b; }
            }
            Main() { return true; }
        "#;
        let program = parse_program(source);
        let generator = crate::CGenerator::new(&program);
        assert_eq!(
            generator.find_method_overload("Calc", "Add", 1),
            "Calc_Add_int"
        );
        assert_eq!(
            generator.find_method_overload("Calc", "Add", 2),
            "Calc_Add_int_int"
        );
    }

    #[test]
    fn test_inherited_method_uses_caller_class_name() {
        let source = r#"
            class Animal {
                string Speak() { return "..."; }
            }
            class Dog inherits Animal {}
            Main() { return true; }
        "#;
        let program = parse_program(source);
        let generator = crate::CGenerator::new(&program);
        assert_eq!(
            generator.find_method_overload("Dog", "Speak", 0),
            "Dog_Speak_void"
        );
    }

    #[test]
    fn test_unknown_method_falls_back_unmangled() {
        let program = parse_program("class Dog {}\nMain() { return true; }");
        let generator = crate::CGenerator::new(&program);
        assert_eq!(
            generator.find_method_overload("Dog", "Mystery", 0),
            "Dog_Mystery"
        );
    }
}
