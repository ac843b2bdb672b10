//! Statement lowering, free functions, and the program entry point.

use foobc_par::{Block, Expression, MethodDecl, Statement, VarDecl};

use crate::mangle::{array_type_name, c_element_type};
use crate::CGenerator;

impl<'p> CGenerator<'p> {
    /// Emits every statement of a block at the current indent level.
    pub(crate) fn generate_block(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.generate_statement(stmt);
        }
    }

    fn generate_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::VarDecl(var) => self.generate_var_decl(var),

            Statement::Expression(expr) => {
                let rendered = self.generate_expression(expr);
                self.emit(format!("{};", rendered));
            },

            Statement::Return(value) => match value {
                Some(expr) => {
                    let rendered = self.generate_expression(expr);
                    self.emit(format!("return {};", rendered));
                },
                None => self.emit("return;".to_string()),
            },

            Statement::If(stmt) => {
                let condition = self.generate_expression(&stmt.condition);
                self.emit(format!("if ({}) {{", condition));
                self.indented_scoped_block(&stmt.then_block);
                self.emit("}".to_string());

                for (cond, block) in &stmt.elseif_parts {
                    let rendered = self.generate_expression(cond);
                    self.emit(format!("else if ({}) {{", rendered));
                    self.indented_scoped_block(block);
                    self.emit("}".to_string());
                }

                if let Some(block) = &stmt.else_block {
                    self.emit("else {".to_string());
                    self.indented_scoped_block(block);
                    self.emit("}".to_string());
                }
            },

            Statement::LoopFor(stmt) => {
                let count = self.generate_expression(&stmt.count);
                let loop_var = format!("_loop_{}", self.temp_counter);
                self.temp_counter += 1;
                self.emit(format!(
                    "for (int {var} = 0; {var} < {count}; {var}++) {{",
                    var = loop_var,
                    count = count
                ));
                self.indented_scoped_block(&stmt.body);
                self.emit("}".to_string());
            },

            Statement::LoopUntil(stmt) => {
                let condition = self.generate_expression(&stmt.condition);
                self.emit(format!("while (!({})) {{", condition));
                self.indented_scoped_block(&stmt.body);
                self.emit("}".to_string());
            },
        }
    }

    fn indented_scoped_block(&mut self, block: &Block) {
        self.indent();
        self.scopes.push();
        self.generate_block(block);
        self.scopes.pop();
        self.dedent();
    }

    fn generate_var_decl(&mut self, var: &VarDecl) {
        self.scopes.add(var.name.clone(), var.var_type.type_name());

        let c_type = self.c_type(&var.var_type);

        match &var.initial_value {
            Some(init) => {
                // an empty array literal takes its element type from the
                // declaration instead of the integer default
                let rendered = match init {
                    Expression::ArrayLiteral(elements)
                        if var.var_type.is_array && elements.is_empty() =>
                    {
                        format!(
                            "{}_from_literal(({}[]){{}}, 0)",
                            array_type_name(&var.var_type.name),
                            c_element_type(&var.var_type.name)
                        )
                    },
                    other => self.generate_expression(other),
                };
                self.emit(format!("{} {} = {};", c_type, var.name, rendered));
            },
            None => self.emit(format!("{} {};", c_type, var.name)),
        }
    }

    /// Emits a free (top-level) function.
    pub(crate) fn generate_function(&mut self, method: &MethodDecl) {
        let return_type = method
            .return_type
            .as_ref()
            .map(|t| self.c_type(t))
            .unwrap_or_else(|| "bool".to_string());

        let params = if method.parameters.is_empty() {
            "void".to_string()
        } else {
            method
                .parameters
                .iter()
                .map(|p| format!("{} {}", self.c_type(&p.param_type), p.name))
                .collect::<Vec<_>>()
                .join(", ")
        };

        self.emit(format!("{} {}({}) {{", return_type, method.name, params));
        self.indent();

        self.scopes.push();
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

    /// Emits the free-function prototype used in the forward-declaration
    /// section.
    pub(crate) fn emit_function_forward_decl(&mut self, method: &MethodDecl) {
        let return_type = method
            .return_type
            .as_ref()
            .map(|t| self.c_type(t))
            .unwrap_or_else(|| "bool".to_string());

        let params = if method.parameters.is_empty() {
            "void".to_string()
        } else {
            method
                .parameters
                .iter()
                .map(|p| format!("{} {}", self.c_type(&p.param_type), p.name))
                .collect::<Vec<_>>()
                .join(", ")
        };

        self.emit(format!("{} {}({});", return_type, method.name, params));
    }

    /// Emits the program entry point: a C `main` delegating to
    /// `Main_internal`, which exits 0 on `true` and 1 on `false`.
    pub(crate) fn generate_main(&mut self, method: &MethodDecl) {
        self.emit("int main(void) {".to_string());
        self.indent();
        self.emit("GC_INIT();".to_string());
        self.emit("bool result = Main_internal();".to_string());
        self.emit("return result ? 0 : 1;".to_string());
        self.dedent();
        self.emit("}".to_string());
        self.emit_blank();

        self.emit("bool Main_internal(void) {".to_string());
        self.indent();

        self.scopes.push();
        self.collect_lambdas_from_block(&method.body);
        self.generate_block(&method.body);
        self.scopes.pop();

        self.dedent();
        self.emit("}".to_string());
    }
}
