//! Parser edge case tests.

use crate::ast::*;
use crate::test_util::{parse_err, parse_ok};

#[test]
fn import_mixed_with_declarations() {
    let program = parse_ok(
        r#"
        import "animals";
        class Zoo {}
        import "keepers";
        Main() { return true; }
        "#,
    );
    assert_eq!(program.imports.len(), 2);
    assert_eq!(program.declarations.len(), 2);
}

#[test]
fn user_typed_field_vs_method_disambiguation() {
    let program = parse_ok(
        r#"
        class Kennel {
            Dog resident;
            Dog Fetch() { return thisclass.resident; }
        }
        "#,
    );
    let class = match &program.declarations[0] {
        Declaration::Class(c) => c,
        other => panic!("expected class, got {:?}", other),
    };
    assert!(matches!(&class.members[0], ClassMember::Field(f) if f.field_type.name == "Dog"));
    assert!(matches!(&class.members[1], ClassMember::Method(m) if m.name == "Fetch"));
}

#[test]
fn isa_composes_with_logical_and() {
    let program = parse_ok("Main() { boolean b = x isa A & y isa B; return b; }");
    let method = match &program.declarations[0] {
        Declaration::Method(m) => m,
        other => panic!("expected method, got {:?}", other),
    };
    match &method.body.statements[0] {
        Statement::VarDecl(v) => match v.initial_value.as_ref().unwrap() {
            Expression::Binary(b) => {
                assert_eq!(b.op, BinOp::And);
                assert!(matches!(b.left, Expression::IsA(_)));
                assert!(matches!(b.right, Expression::IsA(_)));
            },
            other => panic!("expected binary, got {:?}", other),
        },
        other => panic!("expected var decl, got {:?}", other),
    }
}

#[test]
fn else_with_empty_parens_only() {
    // the required shape parses
    parse_ok("Main() { if (x) { } else () { } }");
    // a condition inside the else parens does not
    let diags = parse_err("Main() { if (x) { } else (y) { } }");
    assert!(diags.iter().any(|d| d.contains("')'")), "{diags:?}");
}

#[test]
fn empty_class_body() {
    let program = parse_ok("class Marker {}");
    assert!(matches!(
        &program.declarations[0],
        Declaration::Class(c) if c.members.is_empty()
    ));
}

#[test]
fn lambda_in_second_argument_position() {
    let program = parse_ok("Main() { integer x = a.reduce((acc, n) -> acc + n, 100); return true; }");
    let method = match &program.declarations[0] {
        Declaration::Method(m) => m,
        other => panic!("expected method, got {:?}", other),
    };
    match &method.body.statements[0] {
        Statement::VarDecl(v) => match v.initial_value.as_ref().unwrap() {
            Expression::MethodCall(call) => {
                assert!(matches!(call.arguments[0], Expression::Lambda(_)));
                assert!(matches!(
                    call.arguments[1],
                    Expression::Literal(Literal::Integer(100))
                ));
            },
            other => panic!("expected call, got {:?}", other),
        },
        other => panic!("expected var decl, got {:?}", other),
    }
}

#[test]
fn unterminated_class_reports_missing_brace() {
    let diags = parse_err("class Dog { integer age;");
    assert!(diags.iter().any(|d| d.contains("'}'")), "{diags:?}");
}

#[test]
fn missing_main_parens_reports() {
    let diags = parse_err("Main { return true; }");
    assert!(diags.iter().any(|d| d.contains("'('")), "{diags:?}");
}

#[test]
fn float_literals_parse_in_expressions() {
    let program = parse_ok("Main() { float f = 2.5 + 0.5; return true; }");
    assert_eq!(program.declarations.len(), 1);
}
