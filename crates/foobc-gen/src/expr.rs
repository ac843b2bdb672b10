//! Expression lowering and lambda hoisting.
//!
//! Lambdas capture nothing, so each one lowers to a free `static` C
//! function collected into a reserved section near the top of the output.
//! A collection pass runs per method (after its parameters are in scope)
//! so that array element types are known when the lambda's C signature is
//! chosen; the emission pass then refers to the hoisted names.

use foobc_par::{
    BinOp, Block, Expression, Lambda, Literal, MethodCall, Statement, UnOp,
};

use crate::mangle::{array_type_name, c_element_type};
use crate::CGenerator;

/// Library fixtures resolved without consulting the class table.
const STATIC_CLASSES: &[&str] = &[
    "CONSOLE", "MATH", "STRING", "ARRAY", "DATETIME", "RANDOM", "FILE",
];

/// Array methods that take a callback argument.
const CALLBACK_METHODS: &[&str] = &["map", "filter", "reduce", "find"];

/// The full array-runtime method set.
const ARRAY_METHODS: &[&str] = &["map", "filter", "reduce", "sort", "unique", "find", "print"];

impl<'p> CGenerator<'p> {
    // =========================================================================
    // Lambda collection
    // =========================================================================

    /// Walks a method body and hoists every lambda it contains.
    pub(crate) fn collect_lambdas_from_block(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.collect_lambdas_from_statement(stmt);
        }
    }

    fn collect_lambdas_from_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::VarDecl(var) => {
                // bind the variable first so inference sees it while
                // typing lambdas in the initializer
                self.scopes.add(var.name.clone(), var.var_type.type_name());
                if let Some(init) = &var.initial_value {
                    self.collect_lambdas_from_expression(init, None);
                }
            },
            Statement::Expression(expr) => self.collect_lambdas_from_expression(expr, None),
            Statement::Return(Some(expr)) => self.collect_lambdas_from_expression(expr, None),
            Statement::Return(None) => {},
            Statement::If(stmt) => {
                self.collect_lambdas_from_expression(&stmt.condition, None);
                self.collect_lambdas_from_block(&stmt.then_block);
                for (cond, block) in &stmt.elseif_parts {
                    self.collect_lambdas_from_expression(cond, None);
                    self.collect_lambdas_from_block(block);
                }
                if let Some(block) = &stmt.else_block {
                    self.collect_lambdas_from_block(block);
                }
            },
            Statement::LoopFor(stmt) => {
                self.collect_lambdas_from_expression(&stmt.count, None);
                self.collect_lambdas_from_block(&stmt.body);
            },
            Statement::LoopUntil(stmt) => {
                self.collect_lambdas_from_expression(&stmt.condition, None);
                self.collect_lambdas_from_block(&stmt.body);
            },
        }
    }

    /// Hoists lambdas inside an expression. `context_type` is the array
    /// element type when the expression sits in an array-operation
    /// argument, which determines the lambda's C signature.
    fn collect_lambdas_from_expression(&mut self, expr: &Expression, context_type: Option<&str>) {
        match expr {
            Expression::Lambda(lambda) => match context_type {
                Some(base) => {
                    let elem = c_element_type(base);
                    self.generate_lambda_definition(lambda, elem, elem);
                },
                None => self.generate_lambda_definition(lambda, "int", "int"),
            },

            Expression::MethodCall(call) => self.collect_lambdas_from_call(call, context_type),

            Expression::Binary(binary) => {
                self.collect_lambdas_from_expression(&binary.left, None);
                self.collect_lambdas_from_expression(&binary.right, None);
            },
            Expression::Unary(unary) => {
                self.collect_lambdas_from_expression(&unary.operand, None);
            },
            Expression::Assignment(assign) => {
                self.collect_lambdas_from_expression(&assign.target, None);
                self.collect_lambdas_from_expression(&assign.value, None);
            },
            Expression::ArrayLiteral(elements) => {
                for element in elements {
                    self.collect_lambdas_from_expression(element, None);
                }
            },
            Expression::ArrayAccess(access) => {
                self.collect_lambdas_from_expression(&access.array, None);
                self.collect_lambdas_from_expression(&access.index, None);
            },
            Expression::MemberAccess(member) => {
                self.collect_lambdas_from_expression(&member.object, None);
            },
            _ => {},
        }
    }

    fn collect_lambdas_from_call(&mut self, call: &MethodCall, context_type: Option<&str>) {
        let array_op = call.object.as_ref().and_then(|object| {
            let obj_type = self.infer_expression_type(object)?;
            if obj_type.contains("[]") && CALLBACK_METHODS.contains(&call.method_name.as_str()) {
                Some(obj_type.replace("[]", ""))
            } else {
                None
            }
        });

        if let Some(base) = array_op {
            let elem = c_element_type(&base);
            for (i, arg) in call.arguments.iter().enumerate() {
                if let Expression::Lambda(lambda) = arg {
                    match call.method_name.as_str() {
                        "map" => self.collect_lambdas_from_expression(arg, Some(&base)),
                        // predicates return int (C's bool-in-disguise)
                        "filter" | "find" => self.generate_lambda_definition(lambda, elem, "int"),
                        "reduce" if i == 0 => self.generate_lambda_definition(lambda, elem, elem),
                        _ => self.collect_lambdas_from_expression(arg, context_type),
                    }
                } else {
                    self.collect_lambdas_from_expression(arg, context_type);
                }
            }
            if let Some(object) = &call.object {
                self.collect_lambdas_from_expression(object, context_type);
            }
            return;
        }

        if let Some(object) = &call.object {
            self.collect_lambdas_from_expression(object, context_type);
        }
        for arg in &call.arguments {
            self.collect_lambdas_from_expression(arg, context_type);
        }
    }

    /// Emits one hoisted lambda definition and records its name.
    pub(crate) fn generate_lambda_definition(
        &mut self,
        lambda: &Lambda,
        param_type: &str,
        return_type: &str,
    ) {
        if self.lambda_names.contains_key(&lambda.id) {
            return;
        }

        let name = format!("lambda_{}", self.lambda_counter);
        self.lambda_counter += 1;

        let params = lambda
            .parameters
            .iter()
            .map(|p| format!("{} {}", param_type, p))
            .collect::<Vec<_>>()
            .join(", ");

        let body = self.generate_expression(&lambda.body);

        self.lambda_defs
            .push(format!("static {} {}({}) {{", return_type, name, params));
        self.lambda_defs.push(format!("    return {};", body));
        self.lambda_defs.push("}".to_string());
        self.lambda_defs.push(String::new());

        self.lambda_names.insert(lambda.id, name);
    }

    // =========================================================================
    // Expression emission
    // =========================================================================

    /// Lowers an expression to its C source text.
    pub(crate) fn generate_expression(&mut self, expr: &Expression) -> String {
        match expr {
            Expression::Literal(literal) => generate_literal(literal),

            Expression::Identifier(name) => name.clone(),

            Expression::Binary(binary) => {
                let left = self.generate_expression(&binary.left);
                let right = self.generate_expression(&binary.right);

                let left_type = self.infer_expression_type(&binary.left);
                let right_type = self.infer_expression_type(&binary.right);

                let is_string = left_type.as_deref() == Some("string")
                    || right_type.as_deref() == Some("string");
                if is_string {
                    match binary.op {
                        BinOp::Eq => return format!("string_equals({}, {})", left, right),
                        BinOp::Add => return format!("string_concat({}, {})", left, right),
                        BinOp::Less => return format!("string_less_than({}, {})", left, right),
                        BinOp::Greater => {
                            return format!("string_greater_than({}, {})", left, right)
                        },
                        BinOp::LessEq => {
                            return format!("(!string_greater_than({}, {}))", left, right)
                        },
                        BinOp::GreaterEq => {
                            return format!("(!string_less_than({}, {}))", left, right)
                        },
                        _ => {},
                    }
                }

                let has_array = left_type.as_deref().is_some_and(|t| t.contains("[]"))
                    || right_type.as_deref().is_some_and(|t| t.contains("[]"));
                if has_array && binary.op == BinOp::Add {
                    let base = left_type
                        .or(right_type)
                        .unwrap_or_default()
                        .replace("[]", "");
                    return format!("{}_concat({}, {})", array_type_name(&base), left, right);
                }

                if binary.op == BinOp::Pow {
                    return format!("pow({}, {})", left, right);
                }

                let op = match binary.op {
                    BinOp::Add => "+",
                    BinOp::Sub => "-",
                    BinOp::Mul => "*",
                    BinOp::Div => "/",
                    BinOp::Mod => "%",
                    BinOp::Eq => "==",
                    BinOp::Greater => ">",
                    BinOp::Less => "<",
                    BinOp::GreaterEq => ">=",
                    BinOp::LessEq => "<=",
                    BinOp::And => "&&",
                    BinOp::Or => "||",
                    // bitwise XOR in C
                    BinOp::Xor => "^",
                    BinOp::Pow => unreachable!("handled above"),
                };
                format!("({} {} {})", left, op, right)
            },

            Expression::Unary(unary) => {
                let operand = self.generate_expression(&unary.operand);
                match unary.op {
                    UnOp::Not => format!("(!{})", operand),
                    UnOp::Increment if unary.is_prefix => format!("++{}", operand),
                    UnOp::Increment => format!("{}++", operand),
                    UnOp::Decrement if unary.is_prefix => format!("--{}", operand),
                    UnOp::Decrement => format!("{}--", operand),
                }
            },

            Expression::Assignment(assign) => {
                let target = self.generate_expression(&assign.target);
                let value = self.generate_expression(&assign.value);
                format!("{} = {}", target, value)
            },

            Expression::ArrayLiteral(elements) => self.generate_array_literal(elements),

            Expression::ArrayAccess(access) => {
                let array = self.generate_expression(&access.array);
                let index = self.generate_expression(&access.index);
                format!("{}->data[{}]", array, index)
            },

            Expression::MethodCall(call) => self.generate_method_call(call),

            Expression::MemberAccess(member) => {
                let object = self.generate_expression(&member.object);
                let obj_type = self.infer_expression_type(&member.object);

                if member.member_name == "length" {
                    if obj_type.as_deref() == Some("string") {
                        return format!("STRING_Length({})", object);
                    }
                    if obj_type.as_deref().is_some_and(|t| t.contains("[]")) {
                        return format!("{}->length", object);
                    }
                }

                let is_pointer = obj_type
                    .as_deref()
                    .is_some_and(|t| self.classes.contains_key(t) || t.contains("[]"));
                if is_pointer {
                    format!("{}->{}", object, member.member_name)
                } else {
                    format!("{}.{}", object, member.member_name)
                }
            },

            Expression::Lambda(lambda) => {
                if let Some(name) = self.lambda_names.get(&lambda.id) {
                    return name.clone();
                }
                // not seen by the collection pass; hoist it now with the
                // default signature
                self.generate_lambda_definition(lambda, "int", "int");
                self.lambda_names[&lambda.id].clone()
            },

            Expression::NewInstance(new) => {
                let args = self.generate_arguments(&new.arguments);
                let name = self.constructor_name(&new.class_name, new.arguments.len());
                format!("{}({})", name, args)
            },

            Expression::ThisClass => "thisclass".to_string(),

            // bare `parent` in expression position is still this object;
            // the enclosing call decides the cast
            Expression::Parent => "thisclass".to_string(),

            Expression::IsA(isa) => {
                let object = self.generate_expression(&isa.object);
                let obj_type = self.infer_expression_type(&isa.object);

                let mut parent_args =
                    vec!["NULL".to_string(), "NULL".to_string(), "NULL".to_string(), "NULL".to_string()];
                if let Some(class) = obj_type.as_deref().and_then(|t| self.classes.get(t).copied()) {
                    for i in 0..class.parent_classes.len().min(4) {
                        parent_args[i] = format!("{}->_parent_class_{}", object, i);
                    }
                }

                format!(
                    "_isa_check({}->_class_name, {}, \"{}\")",
                    object,
                    parent_args.join(", "),
                    isa.class_name
                )
            },

            Expression::ArraySlice(_) => "/* UNIMPLEMENTED EXPRESSION */".to_string(),
        }
    }

    fn generate_array_literal(&mut self, elements: &[Expression]) -> String {
        if elements.is_empty() {
            return "IntArray_from_literal((int[]){}, 0)".to_string();
        }

        let elem_type = self
            .infer_expression_type(&elements[0])
            .unwrap_or_else(|| "integer".to_string());
        let struct_name = array_type_name(&elem_type);
        let c_elem = c_element_type(&elem_type);

        let rendered = elements
            .iter()
            .map(|e| self.generate_expression(e))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{}_from_literal(({}[]){{{}}}, {})",
            struct_name,
            c_elem,
            rendered,
            elements.len()
        )
    }

    fn generate_arguments(&mut self, arguments: &[Expression]) -> String {
        arguments
            .iter()
            .map(|a| self.generate_expression(a))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Resolves `new Class(args)` to the constructor overload matching the
    /// argument count.
    fn constructor_name(&self, class_name: &str, arg_count: usize) -> String {
        let Some(class) = self.classes.get(class_name).copied() else {
            return format!("{}_new", class_name);
        };

        let matching_init = class.members.iter().find_map(|member| match member {
            foobc_par::ClassMember::Method(m)
                if m.name == "Initialize" && m.parameters.len() == arg_count =>
            {
                Some(m)
            },
            _ => None,
        });

        match matching_init {
            Some(init) => self.mangle_method_name(class_name, "new", &init.parameters),
            None => format!("{}_new_void", class_name),
        }
    }

    fn generate_method_call(&mut self, call: &MethodCall) -> String {
        // static library fixtures bypass the class table
        if let Some(Expression::Identifier(object_name)) = call.object.as_ref() {
            if STATIC_CLASSES.contains(&object_name.as_str()) {
                let args = self.generate_arguments(&call.arguments);

                if object_name == "CONSOLE" {
                    // literal arguments pick the Print overload directly
                    if let Some(Expression::Literal(literal)) = call.arguments.first() {
                        match literal {
                            Literal::Str(_) => return format!("CONSOLE_Print({})", args),
                            Literal::Boolean(_) => {
                                return format!("CONSOLE_PrintBoolean({})", args)
                            },
                            Literal::Integer(_) => {
                                return format!("CONSOLE_PrintInteger({})", args)
                            },
                            Literal::Float(_) => {},
                        }
                    }
                    return format!("CONSOLE_{}({})", call.method_name, args);
                }

                // FILE maps to FILECLS to avoid the host C FILE type
                if object_name == "FILE" {
                    return format!("FILECLS_{}({})", call.method_name, args);
                }

                return format!("{}_{}({})", object_name, call.method_name, args);
            }
        }

        let Some(object) = call.object.as_ref() else {
            // standalone function call
            let args = self.generate_arguments(&call.arguments);
            return format!("{}({})", call.method_name, args);
        };

        let obj = self.generate_expression(object);
        let obj_type = self.infer_expression_type(object);

        // instance methods on primitives
        if obj_type.as_deref() == Some("string") {
            const STRING_METHODS: &[&str] = &[
                "length", "substring", "toUpper", "toLower", "replace", "trim", "toInteger",
                "toFloat",
            ];
            if STRING_METHODS.contains(&call.method_name.as_str()) {
                let c_name = if call.method_name == "toInteger" {
                    "toInt"
                } else {
                    call.method_name.as_str()
                };
                let args = self.generate_arguments(&call.arguments);
                if args.is_empty() {
                    return format!("string_{}({})", c_name, obj);
                }
                return format!("string_{}({}, {})", c_name, obj, args);
            }
        }

        if obj_type.as_deref() == Some("integer") {
            if call.method_name == "toString" {
                return format!("int_toString({})", obj);
            }
            if call.method_name == "toFloat" {
                return format!("int_toFloat({})", obj);
            }
        }

        if obj_type.as_deref() == Some("float") {
            if call.method_name == "toString" {
                return format!("float_toString({})", obj);
            }
            if call.method_name == "toInteger" {
                return format!("float_toInteger({})", obj);
            }
        }

        // array runtime calls
        if obj_type.as_deref().is_some_and(|t| t.contains("[]"))
            && ARRAY_METHODS.contains(&call.method_name.as_str())
        {
            let base = obj_type.as_deref().unwrap_or_default().replace("[]", "");
            let struct_name = array_type_name(&base);

            // hoisted lambdas render as their generated names
            let rendered_args: Vec<String> = call
                .arguments
                .iter()
                .map(|arg| self.generate_expression(arg))
                .collect();

            let needs_callback =
                matches!(call.method_name.as_str(), "map" | "filter" | "reduce" | "find");
            if needs_callback && rendered_args.is_empty() {
                return "/* UNIMPLEMENTED EXPRESSION */".to_string();
            }

            return match call.method_name.as_str() {
                "map" => format!("{}_map({}, {})", struct_name, obj, rendered_args[0]),
                "filter" => format!("{}_filter({}, {})", struct_name, obj, rendered_args[0]),
                "reduce" => {
                    if rendered_args.len() > 1 {
                        format!(
                            "{}_reduce({}, {}, {})",
                            struct_name, obj, rendered_args[0], rendered_args[1]
                        )
                    } else {
                        format!("{}_reduce({}, {}, 0)", struct_name, obj, rendered_args[0])
                    }
                },
                "sort" => format!("{}_sort({})", struct_name, obj),
                "unique" => format!("{}_unique({})", struct_name, obj),
                "find" => format!("{}_find({}, {})", struct_name, obj, rendered_args[0]),
                "print" => format!("{}_print({})", struct_name, obj),
                _ => unreachable!("ARRAY_METHODS is exhaustive"),
            };
        }

        // parent.Method(...) delegates to the first parent class
        if matches!(object, Expression::Parent) {
            if let Some(current) = self.current_class.clone() {
                if let Some(class) = self.classes.get(&current).copied() {
                    if let Some(parent_class) = class.parent_classes.first() {
                        let mangled = self.find_method_overload(
                            parent_class,
                            &call.method_name,
                            call.arguments.len(),
                        );
                        let mut args = vec![format!("({}*)thisclass", parent_class)];
                        for arg in &call.arguments {
                            args.push(self.generate_expression(arg));
                        }
                        return format!("{}({})", mangled, args.join(", "));
                    }
                }
            }
            return format!("/* ERROR: Cannot resolve parent.{}() */", call.method_name);
        }

        // class instance dispatch through the mangled overload
        if let Some(class_name) = obj_type.as_deref() {
            if self.classes.contains_key(class_name) {
                let mangled =
                    self.find_method_overload(class_name, &call.method_name, call.arguments.len());
                let mut args = vec![obj];
                for arg in &call.arguments {
                    args.push(self.generate_expression(arg));
                }
                return format!("{}({})", mangled, args.join(", "));
            }
        }

        // unknown receiver type: best-effort member call
        let args = self.generate_arguments(&call.arguments);
        format!("{}->{}({})", obj, call.method_name, args)
    }
}

fn generate_literal(literal: &Literal) -> String {
    match literal {
        Literal::Boolean(true) => "true".to_string(),
        Literal::Boolean(false) => "false".to_string(),
        Literal::Integer(value) => value.to_string(),
        // {:?} keeps the decimal point on round values (2.0, not 2)
        Literal::Float(value) => format!("{:?}", value),
        Literal::Str(value) => c_string_literal(value),
    }
}

/// Re-encodes a decoded string value as a C string literal.
fn c_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
