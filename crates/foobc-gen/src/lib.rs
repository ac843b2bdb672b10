//! foobc-gen - C code generator.
//!
//! Lowers a merged [`Program`] to a single self-contained C99 translation
//! unit. Emission is one pass over the declarations after three cheap
//! preparatory steps: the class index, the forward-declaration section,
//! and per-method lambda hoisting. The embedded runtime (collections,
//! strings, math, console and file I/O, date/time, random, isa check) is
//! part of every output.
//!
//! The generator never fails: expressions it cannot lower become a
//! `/* UNIMPLEMENTED EXPRESSION */` marker and the host C compiler
//! surfaces the error.

mod classes;
mod expr;
mod infer;
mod mangle;
mod runtime;
mod scope;
mod stmt;

pub use scope::ScopeStack;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use foobc_par::{ClassDecl, ClassMember, Declaration, Program};

/// Generates the C translation unit for a merged program.
pub fn generate(program: &Program) -> String {
    CGenerator::new(program).generate()
}

/// Single-use C emitter for one merged program.
pub struct CGenerator<'p> {
    program: &'p Program,

    /// Class index in declaration order.
    pub(crate) classes: IndexMap<String, &'p ClassDecl>,

    /// `(class, method)` to declared return type name.
    pub(crate) method_signatures: IndexMap<(String, String), String>,

    /// Symbol scopes for type inference.
    pub(crate) scopes: ScopeStack,

    /// Class whose method body is currently being emitted.
    pub(crate) current_class: Option<String>,

    /// Emitted lines.
    out: Vec<String>,

    /// Current indent level (four spaces per level).
    indent: usize,

    /// Hoisted lambda definitions, spliced into the reserved section at
    /// the end of generation.
    pub(crate) lambda_defs: Vec<String>,

    /// Lambda id to generated function name.
    pub(crate) lambda_names: FxHashMap<u32, String>,

    pub(crate) lambda_counter: u32,

    /// Counter behind `_loop_<n>` and other fresh names.
    pub(crate) temp_counter: u32,
}

impl<'p> CGenerator<'p> {
    /// Indexes the program's classes and method signatures.
    pub fn new(program: &'p Program) -> Self {
        let mut classes: IndexMap<String, &'p ClassDecl> = IndexMap::new();
        let mut method_signatures: IndexMap<(String, String), String> = IndexMap::new();

        for decl in &program.declarations {
            if let Declaration::Class(class) = decl {
                classes.insert(class.name.clone(), class);
                for member in &class.members {
                    if let ClassMember::Method(method) = member {
                        let return_type = method
                            .return_type
                            .as_ref()
                            .map(|t| t.name.clone())
                            .unwrap_or_else(|| "void".to_string());
                        method_signatures
                            .insert((class.name.clone(), method.name.clone()), return_type);
                    }
                }
            }
        }

        Self {
            program,
            classes,
            method_signatures,
            scopes: ScopeStack::new(),
            current_class: None,
            out: Vec::new(),
            indent: 0,
            lambda_defs: Vec::new(),
            lambda_names: FxHashMap::default(),
            lambda_counter: 0,
            temp_counter: 0,
        }
    }

    /// Runs the full emission and returns the C source text.
    pub fn generate(mut self) -> String {
        self.emit_prelude();
        self.emit_forward_declarations();

        self.emit("// Lambda functions".to_string());
        let lambda_section = self.out.len();
        self.emit_blank();

        self.emit_library_runtime();
        self.emit_array_runtime();

        let program = self.program;
        for decl in &program.declarations {
            match decl {
                Declaration::Class(class) => self.generate_class(class),
                Declaration::Enum(decl_enum) => self.generate_enum(decl_enum),
                Declaration::Method(method) if method.name != "Main" => {
                    self.generate_function(method)
                },
                Declaration::Method(_) => {},
            }
        }

        // Main comes last so every mangled name it references exists
        for decl in &program.declarations {
            if let Declaration::Method(method) = decl {
                if method.name == "Main" {
                    self.generate_main(method);
                }
            }
        }

        let defs = std::mem::take(&mut self.lambda_defs);
        self.out.splice(lambda_section..lambda_section, defs);

        let mut text = self.out.join("\n");
        text.push('\n');
        text
    }

    fn emit_prelude(&mut self) {
        self.emit("#include <stdio.h>".to_string());
        self.emit("#include <stdlib.h>".to_string());
        self.emit("#include <stdbool.h>".to_string());
        self.emit("#include <string.h>".to_string());
        self.emit("#include <math.h>".to_string());
        self.emit("#include <time.h>".to_string());
        self.emit("#include <ctype.h>".to_string());
        self.emit_blank();
        self.emit("// Simple GC replacement (no actual GC)".to_string());
        self.emit("#define GC_INIT()".to_string());
        self.emit("#define GC_MALLOC malloc".to_string());
        self.emit_blank();
    }

    // =========================================================================
    // Emission helpers
    // =========================================================================

    pub(crate) fn emit(&mut self, line: String) {
        if line.is_empty() {
            self.out.push(String::new());
        } else {
            self.out.push(format!("{}{}", "    ".repeat(self.indent), line));
        }
    }

    pub(crate) fn emit_blank(&mut self) {
        self.out.push(String::new());
    }

    /// Emits preformatted C text verbatim, line by line.
    pub(crate) fn emit_raw(&mut self, text: &str) {
        for line in text.lines() {
            self.out.push(line.to_string());
        }
        self.out.push(String::new());
    }

    pub(crate) fn indent(&mut self) {
        self.indent += 1;
    }

    pub(crate) fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use foobc_par::Program;
    use foobc_util::Handler;

    /// Lexes and parses a snippet, asserting it is error-free.
    pub fn parse_program(source: &str) -> Program {
        let handler = Handler::new();
        let tokens = foobc_lex::tokenize(source, &handler);
        let program = foobc_par::parse(tokens, &handler);
        if handler.has_errors() {
            let diags: Vec<String> = handler.take().iter().map(|d| d.to_string()).collect();
            panic!("unexpected errors in test source:\n{}", diags.join("\n"));
        }
        program
    }

    /// Full pipeline for one source string: parse then generate C.
    pub fn generate_source(source: &str) -> String {
        super::generate(&parse_program(source))
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::generate_source;

    #[test]
    fn test_output_is_deterministic() {
        let source = r#"
            class A { integer x; }
            class B inherits A { integer y; }
            Main() { B b = new B(); return b isa A; }
        "#;
        assert_eq!(generate_source(source), generate_source(source));
    }

    #[test]
    fn test_section_ordering() {
        let c = generate_source(
            "Main() { integer[] a = [1, 2]; integer[] b = a.map(x -> x + 1); return true; }",
        );
        let includes = c.find("#include <stdio.h>").unwrap();
        let forward = c.find("// Forward declarations").unwrap();
        let lambdas = c.find("// Lambda functions").unwrap();
        let lambda_def = c.find("static int lambda_0(int x) {").unwrap();
        let runtime = c.find("// STANDARD LIBRARY IMPLEMENTATION").unwrap();
        let main_fn = c.find("int main(void) {").unwrap();

        assert!(includes < forward);
        assert!(forward < lambdas);
        assert!(lambdas < lambda_def);
        assert!(lambda_def < runtime);
        assert!(runtime < main_fn);
    }

    #[test]
    fn test_forward_declarations_cover_classes() {
        let c = generate_source(
            r#"
            class Dog {
                string Speak() { return "Woof"; }
            }
            Main() { return true; }
            "#,
        );
        assert!(c.contains("typedef struct Dog_s Dog;"), "{c}");
        assert!(c.contains("Dog* Dog_new_void(void);"), "{c}");
        assert!(c.contains("char* Dog_Speak_void(Dog* thisclass);"), "{c}");
        assert!(c.contains("bool Main_internal(void);"), "{c}");
    }

    #[test]
    fn test_hello_scenario() {
        let c = generate_source("Main() { CONSOLE.Print(\"Hello\"); return true; }");
        assert!(c.contains("CONSOLE_Print(\"Hello\");"), "{c}");
        assert!(c.contains("return true;"), "{c}");
    }

    #[test]
    fn test_power_scenario() {
        let c = generate_source(
            "Main() { integer x = 2 ^ 10; CONSOLE.PrintInteger(x); return true; }",
        );
        assert!(c.contains("int x = pow(2, 10);"), "{c}");
        assert!(c.contains("CONSOLE_PrintInteger(x);"), "{c}");
    }

    #[test]
    fn test_inheritance_isa_scenario() {
        let c = generate_source(
            r#"
            class A {}
            class B inherits A {}
            Main() {
                B b = new B();
                CONSOLE.PrintBoolean(b isa A);
                return true;
            }
            "#,
        );
        assert!(c.contains("B* b = B_new_void();"), "{c}");
        assert!(
            c.contains(
                "CONSOLE_PrintBoolean(_isa_check(b->_class_name, b->_parent_class_0, NULL, NULL, NULL, \"A\"));"
            ),
            "{c}"
        );
    }

    #[test]
    fn test_array_pipeline_scenario() {
        let c = generate_source(
            "Main() { integer[] a = [1, 2, 3, 4]; integer s = a.filter(x -> x > 1).map(x -> x * 2).reduce((acc, x) -> acc + x, 0); CONSOLE.PrintInteger(s); return true; }",
        );
        assert!(c.contains("IntArray* a = IntArray_from_literal((int[]){1, 2, 3, 4}, 4);"), "{c}");
        assert!(c.contains("static int lambda_0(int acc, int x) {"), "{c}");
        assert!(c.contains("    return (acc + x);"), "{c}");
        assert!(
            c.contains("int s = IntArray_reduce(IntArray_map(IntArray_filter(a, lambda_2), lambda_1), lambda_0, 0);"),
            "{c}"
        );
    }

    #[test]
    fn test_lambdas_from_two_methods_share_the_section() {
        let c = generate_source(
            r#"
            integer Double(integer[] xs) { return xs.reduce((a, b) -> a + b, 0); }
            Main() { integer[] a = [1]; integer[] b = a.map(x -> x * 2); return true; }
            "#,
        );
        assert!(c.contains("static int lambda_0(int a, int b) {"), "{c}");
        assert!(c.contains("static int lambda_1(int x) {"), "{c}");
        let section = c.find("// Lambda functions").unwrap();
        let runtime = c.find("// STANDARD LIBRARY IMPLEMENTATION").unwrap();
        let first = c.find("static int lambda_0").unwrap();
        let second = c.find("static int lambda_1").unwrap();
        assert!(section < first && first < second && second < runtime);
    }

    #[test]
    fn test_unknown_expression_marker() {
        let c = generate_source(
            "Main() { integer[] a = [1, 2, 3]; integer[] b = a[0 ., 2]; return true; }",
        );
        assert!(c.contains("/* UNIMPLEMENTED EXPRESSION */"), "{c}");
    }
}
