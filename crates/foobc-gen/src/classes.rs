//! Class lowering: struct layout, constructors, methods, inherited-method
//! wrappers, enumerations, and the forward-declaration section.
//!
//! A class struct inlines its grandparent fields, then its parent fields,
//! then its own, followed by the runtime type tags (`_class_name` and up
//! to four `_parent_class_i` slots) that answer `isa` queries without a
//! vtable.

use foobc_par::{ClassDecl, ClassMember, Declaration, FieldDecl, MethodDecl};

use crate::CGenerator;

/// Maximum number of parent-class tag slots in an object header.
const MAX_PARENT_SLOTS: usize = 4;

impl<'p> CGenerator<'p> {
    /// Emits the full forward-declaration section: `Main_internal`, array
    /// struct typedefs, class typedefs, constructor and method prototypes
    /// (wrappers included), and free-function prototypes.
    pub(crate) fn emit_forward_declarations(&mut self) {
        self.emit("// Forward declarations".to_string());
        self.emit("bool Main_internal(void);".to_string());

        self.emit("typedef struct IntArray_s IntArray;".to_string());
        self.emit("typedef struct FloatArray_s FloatArray;".to_string());
        self.emit("typedef struct LongFloatArray_s LongFloatArray;".to_string());
        self.emit("typedef struct LongIntArray_s LongIntArray;".to_string());
        self.emit("typedef struct BoolArray_s BoolArray;".to_string());
        self.emit("typedef struct CharArray_s CharArray;".to_string());
        self.emit("typedef struct StringArray_s StringArray;".to_string());
        self.emit_blank();

        let classes: Vec<&'p ClassDecl> = self.classes.values().copied().collect();

        for class in &classes {
            self.emit(format!("typedef struct {0}_s {0};", class.name));
        }

        for class in &classes {
            self.emit_class_prototypes(class);
        }

        let program = self.program;
        for decl in &program.declarations {
            if let Declaration::Method(method) = decl {
                if method.name != "Main" {
                    self.emit_function_forward_decl(method);
                }
            }
        }

        self.emit_blank();
    }

    fn emit_class_prototypes(&mut self, class: &'p ClassDecl) {
        let init_methods = initialize_overloads(class);

        for init in &init_methods {
            let mangled = self.mangle_method_name(&class.name, "new", &init.parameters);
            let params = self.param_list(init);
            if params.is_empty() {
                self.emit(format!("{}* {}(void);", class.name, mangled));
            } else {
                self.emit(format!("{}* {}({});", class.name, mangled, params));
            }
        }

        if init_methods.is_empty() {
            self.emit(format!("{0}* {0}_new_void(void);", class.name));
        }

        for member in &class.members {
            if let ClassMember::Method(method) = member {
                let signature = self.class_method_signature(&class.name, method);
                self.emit(format!("{};", signature));
            }
        }

        // wrapper prototypes for inherited, non-overridden methods
        for parent_name in &class.parent_classes {
            let Some(parent) = self.classes.get(parent_name).copied() else {
                continue;
            };
            for parent_member in &parent.members {
                if let ClassMember::Method(method) = parent_member {
                    if method.name == "Initialize" || overrides(class, &method.name) {
                        continue;
                    }
                    let signature = self.class_method_signature(&class.name, method);
                    self.emit(format!("{};", signature));
                }
            }
        }
    }

    /// `ret Class_Method_slugs(Class* thisclass, params)` without the
    /// trailing `;` or body brace.
    fn class_method_signature(&self, class_name: &str, method: &MethodDecl) -> String {
        let return_type = method
            .return_type
            .as_ref()
            .map(|t| self.c_type(t))
            .unwrap_or_else(|| "void".to_string());

        let mut params = vec![format!("{}* thisclass", class_name)];
        for param in &method.parameters {
            params.push(format!("{} {}", self.c_type(&param.param_type), param.name));
        }

        let mangled = self.mangle_method_name(class_name, &method.name, &method.parameters);
        format!("{} {}({})", return_type, mangled, params.join(", "))
    }

    fn param_list(&self, method: &MethodDecl) -> String {
        method
            .parameters
            .iter()
            .map(|p| format!("{} {}", self.c_type(&p.param_type), p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Emits a class: struct definition, constructors, methods, and
    /// inherited-method wrappers.
    pub(crate) fn generate_class(&mut self, class: &'p ClassDecl) {
        self.emit(format!("// Class {}", class.name));
        if !class.parent_classes.is_empty() {
            self.emit(format!(
                "// Inherits from: {}",
                class.parent_classes.join(", ")
            ));
        }

        self.emit(format!("typedef struct {}_s {{", class.name));
        self.indent();

        for parent_name in &class.parent_classes {
            let Some(parent) = self.classes.get(parent_name).copied() else {
                continue;
            };
            self.emit(format!("// Fields from parent {}", parent_name));
            for grandparent_name in &parent.parent_classes {
                if let Some(grandparent) = self.classes.get(grandparent_name).copied() {
                    for field in fields(grandparent) {
                        let rendered = format!("{} {};", self.c_type(&field.field_type), field.name);
                        self.emit(rendered);
                    }
                }
            }
            for field in fields(parent) {
                let rendered = format!("{} {};", self.c_type(&field.field_type), field.name);
                self.emit(rendered);
            }
        }

        for field in fields(class) {
            let rendered = format!("{} {};", self.c_type(&field.field_type), field.name);
            self.emit(rendered);
        }

        self.emit("const char* _class_name;".to_string());
        for i in 0..class.parent_classes.len().min(MAX_PARENT_SLOTS) {
            self.emit(format!("const char* _parent_class_{};", i));
        }

        self.dedent();
        self.emit(format!("}} {};", class.name));
        self.emit_blank();

        self.generate_constructors(class);

        self.current_class = Some(class.name.clone());
        for member in &class.members {
            if let ClassMember::Method(method) = member {
                self.generate_class_method(&class.name, method);
            }
        }

        for parent_name in &class.parent_classes {
            let Some(parent) = self.classes.get(parent_name).copied() else {
                continue;
            };
            for parent_member in &parent.members {
                if let ClassMember::Method(method) = parent_member {
                    if method.name == "Initialize" || overrides(class, &method.name) {
                        continue;
                    }
                    self.generate_inherited_method_wrapper(&class.name, parent_name, method);
                }
            }
        }

        self.current_class = None;
    }

    /// One constructor per `Initialize` overload, or a default `_new_void`
    /// when the class has none. Every constructor stamps the type tags and
    /// applies field initializers (parent fields first) before delegating
    /// to `Initialize`.
    fn generate_constructors(&mut self, class: &'p ClassDecl) {
        let init_methods = initialize_overloads(class);

        if init_methods.is_empty() {
            self.emit(format!("{0}* {0}_new_void(void) {{", class.name));
            self.indent();
            self.emit_constructor_body(class);
            self.emit("return obj;".to_string());
            self.dedent();
            self.emit("}".to_string());
            self.emit_blank();
            return;
        }

        for init in init_methods {
            let mangled = self.mangle_method_name(&class.name, "new", &init.parameters);
            let params = self.param_list(init);
            if params.is_empty() {
                self.emit(format!("{}* {}(void) {{", class.name, mangled));
            } else {
                self.emit(format!("{}* {}({}) {{", class.name, mangled, params));
            }
            self.indent();
            self.emit_constructor_body(class);

            let mangled_init =
                self.mangle_method_name(&class.name, "Initialize", &init.parameters);
            let mut args = vec!["obj".to_string()];
            args.extend(init.parameters.iter().map(|p| p.name.clone()));
            self.emit(format!("{}({});", mangled_init, args.join(", ")));

            self.emit("return obj;".to_string());
            self.dedent();
            self.emit("}".to_string());
            self.emit_blank();
        }
    }

    /// Shared constructor prologue: allocation, type tags, and field
    /// initializers.
    fn emit_constructor_body(&mut self, class: &'p ClassDecl) {
        self.emit(format!(
            "{0}* obj = GC_MALLOC(sizeof({0}));",
            class.name
        ));
        self.emit(format!("obj->_class_name = \"{}\";", class.name));
        for (i, parent) in class
            .parent_classes
            .iter()
            .take(MAX_PARENT_SLOTS)
            .enumerate()
        {
            self.emit(format!("obj->_parent_class_{} = \"{}\";", i, parent));
        }

        for parent_name in &class.parent_classes {
            if let Some(parent) = self.classes.get(parent_name).copied() {
                self.emit_field_initializers(parent);
            }
        }
        self.emit_field_initializers(class);
    }

    fn emit_field_initializers(&mut self, class: &'p ClassDecl) {
        for member in &class.members {
            if let ClassMember::Field(field) = member {
                if let Some(init) = &field.initial_value {
                    let rendered = self.generate_expression(init);
                    self.emit(format!("obj->{} = {};", field.name, rendered));
                }
            }
        }
    }

    /// Emits one class method under its mangled name, with `thisclass` as
    /// the leading parameter.
    fn generate_class_method(&mut self, class_name: &str, method: &MethodDecl) {
        let signature = self.class_method_signature(class_name, method);
        self.emit(format!("{} {{", signature));
        self.indent();

        self.current_class = Some(class_name.to_string());

        self.scopes.push();
        self.scopes.add("thisclass", class_name);
        for param in &method.parameters {
            self.scopes
                .add(param.name.clone(), param.param_type.type_name());
        }

        self.collect_lambdas_from_block(&method.body);
        self.generate_block(&method.body);

        self.scopes.pop();

        self.dedent();
        self.emit("}".to_string());
        self.emit_blank();
    }

    /// Emits a wrapper that gives the subclass its own dispatch name for
    /// an inherited method: cast the receiver to the parent pointer type
    /// and delegate.
    fn generate_inherited_method_wrapper(
        &mut self,
        class_name: &str,
        parent_name: &str,
        method: &MethodDecl,
    ) {
        let signature = self.class_method_signature(class_name, method);
        self.emit(format!("{} {{", signature));
        self.indent();

        let parent_mangled =
            self.mangle_method_name(parent_name, &method.name, &method.parameters);
        let mut args = vec![format!("({}*)thisclass", parent_name)];
        args.extend(method.parameters.iter().map(|p| p.name.clone()));

        let is_void = method
            .return_type
            .as_ref()
            .map(|t| self.c_type(t) == "void")
            .unwrap_or(true);

        if is_void {
            self.emit(format!("{}({});", parent_mangled, args.join(", ")));
        } else {
            self.emit(format!("return {}({});", parent_mangled, args.join(", ")));
        }

        self.dedent();
        self.emit("}".to_string());
        self.emit_blank();
    }

    /// Emits `typedef enum { Name_Value, ... } Name;`.
    pub(crate) fn generate_enum(&mut self, decl: &foobc_par::EnumDecl) {
        self.emit(format!("// Enum {}", decl.name));
        self.emit("typedef enum {".to_string());
        self.indent();
        for (i, value) in decl.values.iter().enumerate() {
            let comma = if i < decl.values.len() - 1 { "," } else { "" };
            self.emit(format!("{}_{}{}", decl.name, value, comma));
        }
        self.dedent();
        self.emit(format!("}} {};", decl.name));
        self.emit_blank();
    }
}

/// The `Initialize` overloads of a class, in declaration order.
fn initialize_overloads<'c>(class: &'c ClassDecl) -> Vec<&'c MethodDecl> {
    class
        .members
        .iter()
        .filter_map(|member| match member {
            ClassMember::Method(m) if m.name == "Initialize" => Some(m),
            _ => None,
        })
        .collect()
}

/// The field members of a class, in declaration order.
fn fields(class: &ClassDecl) -> impl Iterator<Item = &FieldDecl> {
    class.members.iter().filter_map(|member| match member {
        ClassMember::Field(field) => Some(field),
        _ => None,
    })
}

/// True when `class` declares a method named `name` itself.
fn overrides(class: &ClassDecl, name: &str) -> bool {
    class.members.iter().any(|member| match member {
        ClassMember::Method(m) => m.name == name,
        _ => false,
    })
}
