//! Unit tests for the parser module.
//!
//! This module contains tests for parsing floyd constructs including:
//! - Variable and function declarations
//! - Classes and verbs
//! - Control flow statements
//! - Expressions and operator precedence
//! - Scoping, reservation and deferred name resolution
//! - Error recovery

use crate::{
    ast::{
        ast::{Node, NodeKind, Statements},
        declarations::{Initializer, ValueType},
    },
    config::ParseOptions,
    errors::errors::{Diagnostic, Severity},
    Position, Span,
};

use super::{
    lookups::{create_grammar, BindingPower, Grammar, GRAMMAR},
    parser::{parse, parse_with},
    scope::ScopeId,
};

fn span(line: u32, start: u32, end: u32) -> Span {
    Span::new(Position::new(line, start), Position::new(line, end))
}

fn assert_no_diagnostics(source: &str) {
    let result = parse(source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics for {:?}: {:?}",
        source,
        result.diagnostics
    );
}

fn errors(diagnostics: &[Diagnostic]) -> Vec<&Diagnostic> {
    diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.severity == Severity::Error)
        .collect()
}

/// Value of the first declarator of the `index`th top-level statement.
fn initializer(ast: &Statements, index: usize) -> &Node {
    match &ast.as_slice()[index].kind {
        NodeKind::Declaration { declarators, .. } => match &declarators[0].value {
            Some(Initializer::Expression(value)) => value,
            other => panic!("expected an initializer expression, got {:?}", other),
        },
        other => panic!("expected a declaration, got {:?}", other),
    }
}

fn binary(node: &Node) -> (&Node, &Node) {
    match &node.kind {
        NodeKind::Binary { left, right } => (left, right),
        other => panic!("expected a binary node, got {:?}", other),
    }
}

#[test]
fn test_parse_integer_declarations() {
    for source in [
        "int x;",
        "int x = 0;",
        "int x, y, z;",
        "int x = 0, y, z = 1;",
        "int x = 0; x += 1; x -= 1; x /= 1; x *= 1; x %= 2; x++; x--;",
    ] {
        assert_no_diagnostics(source);
    }
}

#[test]
fn test_parse_string_and_object_declarations() {
    for source in [
        "string s;",
        "string s = \"Hello World\";",
        "string a, b, c;",
        "string a = \"Foo\", b, c = \"Bar\";",
        "object x;",
        "object o = NULL;",
    ] {
        assert_no_diagnostics(source);
    }
}

#[test]
fn test_parse_array_declaration() {
    let result = parse("int a[3] = (1, 2, 3), b[];");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    match &result.ast.as_slice()[0].kind {
        NodeKind::Declaration { value_type, declarators } => {
            assert_eq!(*value_type, ValueType::Int);
            assert_eq!(declarators.len(), 2);

            assert!(declarators[0].array);
            assert_eq!(declarators[0].size.as_ref().map(|size| size.value.as_str()), Some("3"));
            match &declarators[0].value {
                Some(Initializer::List(values)) => assert_eq!(values.len(), 3),
                other => panic!("expected a list initializer, got {:?}", other),
            }

            assert!(declarators[1].array);
            assert!(declarators[1].size.is_none());
            assert!(declarators[1].value.is_none());
        }
        other => panic!("expected a declaration, got {:?}", other),
    }
}

#[test]
fn test_redefinition_reported_at_first_definition() {
    let result = parse("int x, x, y;");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "Already defined");
    assert_eq!(result.diagnostics[0].severity, Severity::Warning);
    assert_eq!(result.diagnostics[0].range, span(0, 4, 5));

    let result = parse("string a, a, b;");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].range, span(0, 7, 8));
}

#[test]
fn test_variable_clashing_with_function() {
    let result = parse("void test() {} int test;");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "Already defined");
    assert_eq!(result.diagnostics[0].range, span(0, 5, 9));
}

#[test]
fn test_redefining_keyword_is_an_error() {
    let result = parse("int int;");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "Already reserved");
    assert_eq!(result.diagnostics[0].severity, Severity::Error);
    assert_eq!(result.diagnostics[0].range, span(0, 0, 3));
}

#[test]
fn test_parse_functions() {
    for source in [
        "void test() {}",
        "void test(int x) {}",
        "void test(int x, string s, object o) {}",
        "void test(int x) {} int x = 0;",
        "int add(int a, int b) { return a + b; }",
        "string name() { return \"lamp\"; }",
    ] {
        assert_no_diagnostics(source);
    }
}

#[test]
fn test_function_parameters_and_locals_share_a_scope() {
    let result = parse("void f(int a) { int b; }");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let root = result.root_scope();
    let function = root.get("f").map(|definition| definition.value_type);
    assert_eq!(function, Some(Some(ValueType::Void)));

    assert_eq!(result.scopes.len(), 2);
    let body = result.scopes.get(ScopeId(1)).map(|scope| (scope.declares("a"), scope.declares("b")));
    assert_eq!(body, Some((true, true)));

    let result = parse("void f(int a) { int a; }");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].range, span(0, 11, 12));
}

#[test]
fn test_function_node_shape() {
    let result = parse("int add(int a, b) { return a; }");

    match &result.ast.as_slice()[0].kind {
        NodeKind::Function {
            return_type,
            parameters,
            body,
        } => {
            assert_eq!(*return_type, ValueType::Int);
            assert_eq!(parameters.len(), 2);
            assert_eq!(parameters[0].value_type, Some(ValueType::Int));
            assert_eq!(parameters[1].value_type, None);
            assert_eq!(parameters[1].name.value, "b");
            assert_eq!(body.len(), 1);
        }
        other => panic!("expected a function, got {:?}", other),
    }

    let errors = errors(&result.diagnostics);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        "Invalid parameter type 'b'. Use either int, string or object."
    );
    assert_eq!(errors[0].range, span(0, 15, 16));
}

#[test]
fn test_parse_classes() {
    assert_no_diagnostics("class Test {}");
    assert_no_diagnostics("class Parent {} class Test : Parent {}");
    assert_no_diagnostics("class Test : Parent {} class Parent {}");

    let result = parse("class abstract Test { int x; void f() {} }");
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    match &result.ast.as_slice()[0].kind {
        NodeKind::Class {
            is_abstract,
            superclass,
            body,
        } => {
            assert!(*is_abstract);
            assert!(superclass.is_none());
            assert_eq!(body.len(), 2);
        }
        other => panic!("expected a class, got {:?}", other),
    }
    assert_eq!(result.ast.as_slice()[0].value, "Test");
}

#[test]
fn test_unknown_superclass_is_reported_after_parse() {
    let result = parse("class Test:Parent {}");

    assert!(errors(&result.diagnostics).is_empty());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "'Parent' is undefined");
    assert_eq!(result.diagnostics[0].range, span(0, 11, 17));
}

#[test]
fn test_parse_verbs() {
    assert_no_diagnostics("verb(\"links\", D_WEST, 0);");
    assert_no_diagnostics("verb(\"take\", take, 1); void take() {}");

    let result = parse("verb(\"take\", take_item, 0);");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "'take_item' is undefined");

    let result = parse("verb(take, 5, \"x\");");
    let messages: Vec<&str> = result.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert!(messages.contains(&"Expected string literal"));
    assert!(messages.contains(&"Expected action identifier"));
    assert!(messages.contains(&"Expected integer literal"));
}

#[test]
fn test_parse_control_flow() {
    for source in [
        "void test() { return; }",
        "void test() { return 0; }",
        "void test() { return (0 || test.property); }",
        "void test() {\n  int i = 0;\n  while(i < 5) {}\n}",
        "void test() {\n  int i = 0;\n  do { i++; } while(i < 5);\n}",
        "void test() {\n  int i;\n  for(i = 0; i < 10; i++) {}\n}",
        "void test() {\n  for(;;) { break; }\n}",
        "void test() {\n  int i = 0;\n  if (i < 10) {}\n}",
        "void test() {\n  int i = 0;\n  if (i < 10) {}\n  else {}\n}",
        "void test() {\n  int i = 0;\n  if (i < 10) {} else if (i < 20) {} else {}\n}",
        "void test() {\n  object o;\n  fetch (o) { quit; }\n  with (o) { halt; }\n}",
    ] {
        assert_no_diagnostics(source);
    }
}

#[test]
fn test_parse_nested_if_else() {
    assert_no_diagnostics(
        "void test() {
          int i = 0;
          if (i < 10) {
            if (i < 5) {}
            else {}
          }
          else {
            if (i > 20) {}
            else {}
          }
        }",
    );
}

#[test]
fn test_parse_switch() {
    assert_no_diagnostics(
        "void test() {
          int i = 0;
          switch(i) {
            case(-1);
            case(0);
              i += 1;
              break;
            case(1);
              i += 2;
              return;
            default;
              i = 0;
          }
        }",
    );
}

#[test]
fn test_else_if_nests_an_if_statement() {
    let result = parse("int i; if (i) {} else if (i) {}");

    match &result.ast.as_slice()[1].kind {
        NodeKind::If { otherwise: Some(otherwise), .. } => {
            assert_eq!(otherwise.len(), 1);
            assert_eq!(otherwise.as_slice()[0].id, "if");
        }
        other => panic!("expected an if with an else branch, got {:?}", other),
    }
}

#[test]
fn test_return_before_more_code_is_unreachable() {
    let result = parse("void f() { return; int x; }");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "Unreachable code");
    assert_eq!(result.diagnostics[0].severity, Severity::Warning);
    assert_eq!(result.diagnostics[0].range, span(0, 11, 17));
}

#[test]
fn test_parse_invocations() {
    for source in [
        "void test() {} test();",
        "void test(int x) {} test(10);",
        "void test(int x, string s, int y) {} test(10, \"Hello\", 0);",
        "object o; o.take(1);",
        "object o; o.items[2].drop();",
        "object o; (o.handler)(1);",
    ] {
        assert_no_diagnostics(source);
    }
}

#[test]
fn test_member_call_is_one_node() {
    let result = parse("object o; o.take(1, 2);");

    match &result.ast.as_slice()[1].kind {
        NodeKind::MethodCall {
            object,
            member,
            arguments,
        } => {
            assert_eq!(object.value, "o");
            assert_eq!(member.value, "take");
            assert_eq!(member.kind, NodeKind::Literal);
            assert_eq!(arguments.len(), 2);
        }
        other => panic!("expected a method call, got {:?}", other),
    }
}

#[test]
fn test_call_needs_a_callable() {
    let result = parse("5(1);");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "Expected a variable name");
    assert_eq!(result.diagnostics[0].range, span(0, 0, 1));
}

#[test]
fn test_precedence() {
    let result = parse("int x = 1 + 2 * 3;");
    let root = initializer(&result.ast, 0);

    assert_eq!(root.id, "+");
    let (left, right) = binary(root);
    assert_eq!(left.value, "1");
    assert_eq!(right.id, "*");

    let result = parse("int x = (1 + 2) * 3;");
    let root = initializer(&result.ast, 0);
    assert_eq!(root.id, "*");
    let (left, _) = binary(root);
    assert_eq!(left.id, "+");
    assert!(left.parenthesized);
}

#[test]
fn test_associativity() {
    let result = parse("int a, b; a = b = 1;");
    let root = &result.ast.as_slice()[1];
    assert_eq!(root.id, "=");
    let (left, right) = binary(root);
    assert_eq!(left.value, "a");
    assert_eq!(right.id, "=");

    let result = parse("int x = 1 - 2 - 3;");
    let root = initializer(&result.ast, 0);
    let (left, right) = binary(root);
    assert_eq!(left.id, "-");
    assert_eq!(right.value, "3");

    let result = parse("int a, b, c; int x = a && b && c;");
    let root = initializer(&result.ast, 1);
    let (left, right) = binary(root);
    assert_eq!(left.value, "a");
    assert_eq!(right.id, "&&");
}

#[test]
fn test_unary_and_ternary() {
    let result = parse("int a, b; int x = -a * b; int y = a ? b : -1;");

    let root = initializer(&result.ast, 1);
    assert_eq!(root.id, "*");
    let (left, _) = binary(root);
    assert!(matches!(left.kind, NodeKind::Unary { .. }));

    let root = initializer(&result.ast, 2);
    match &root.kind {
        NodeKind::Ternary { condition, then, otherwise } => {
            assert_eq!(condition.value, "a");
            assert_eq!(then.value, "b");
            assert_eq!(otherwise.id, "-");
        }
        other => panic!("expected a ternary, got {:?}", other),
    }
}

#[test]
fn test_bad_left_value() {
    let result = parse("int x; 1 = x;");
    let errors = errors(&result.diagnostics);

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Bad left value");
    assert_eq!(errors[0].range, span(0, 7, 8));
}

#[test]
fn test_bad_expression_statement() {
    let result = parse("int x; x + 1;");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "Bad expression statement");
    assert_eq!(result.diagnostics[0].severity, Severity::Warning);
    assert_eq!(result.diagnostics[0].range, span(0, 9, 10));
}

#[test]
fn test_missing_semicolon_recovery() {
    let result = parse("int x = 0 int y = 1;");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "Missing ';'");
    assert_eq!(result.diagnostics[0].range, span(0, 8, 9));

    assert_eq!(result.ast.len(), 2);
    assert!(result.root_scope().declares("x"));
    assert!(result.root_scope().declares("y"));
}

#[test]
fn test_expected_token_is_reported() {
    let result = parse("int x = 1 ? 2 3;");

    assert_eq!(result.diagnostics[0].message, "Expected ':'");
    assert_eq!(result.diagnostics[0].range, span(0, 14, 15));
}

#[test]
fn test_forward_reference_is_not_undefined() {
    assert_no_diagnostics("void a() { b(); } void b() {}");
}

#[test]
fn test_undefined_name_is_warned() {
    let result = parse("void a() { b(); }");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "'b' is undefined");
    assert_eq!(result.diagnostics[0].severity, Severity::Warning);
    assert_eq!(result.diagnostics[0].range, span(0, 11, 12));
}

#[test]
fn test_block_locals_do_not_leak() {
    assert_no_diagnostics("{ int x; } int x;");

    let result = parse("{ int x; } x = 1;");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "'x' is undefined");
}

#[test]
fn test_intrinsics_are_not_undefined() {
    assert_no_diagnostics("void a() { print(\"x\"); move(D_NORTH); }");

    let options = ParseOptions {
        intrinsics: vec!["lamp".to_string()],
        ..ParseOptions::default()
    };
    let result = parse_with("void a() { lamp(); print(1); }", &GRAMMAR, &options);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "'print' is undefined");
}

#[test]
fn test_analysis_can_be_deferred() {
    let result = parse_with("void a() { b(); }", &GRAMMAR, &ParseOptions::without_analysis());

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.occurrences.len(), 1);
    assert_eq!(result.occurrences[0].name, "b");
    assert_eq!(result.occurrences[0].scope, ScopeId(1));
}

#[test]
fn test_balanced_scopes() {
    for source in [
        "void test(int x) { { int y; } }",
        "class A { void f() { if (1) {} else { while (1) {} } } }",
        "int x; { { { } } }",
        "void test() { do { } while (1); for (;;) {} switch (1) { case (1); } }",
    ] {
        let result = parse(source);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert_eq!(result.scopes.pushes(), result.scopes.pops(), "{}", source);
    }
}

#[test]
fn test_grammar_initialization_is_idempotent() {
    let source = "class A : B { int x = 1 + 2 * 3; void f(int y) { return y; } } verb(\"go\", go, 0); go();";
    let options = ParseOptions::default();

    let first_grammar = create_grammar();
    let second_grammar = create_grammar();
    let first = parse_with(source, &first_grammar, &options);
    let second = parse_with(source, &second_grammar, &options);

    assert_eq!(first_grammar.len(), second_grammar.len());
    assert_eq!(first.ast, second.ast);
    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(parse(source).ast, first.ast);
}

#[test]
fn test_binding_powers() {
    let lbp = |id: &str| GRAMMAR.get(id).map(|symbol| symbol.denotations.lbp);

    assert_eq!(lbp("="), Some(BindingPower(10)));
    assert_eq!(lbp("++"), Some(BindingPower(10)));
    assert_eq!(lbp("?"), Some(BindingPower(20)));
    assert_eq!(lbp("&&"), Some(BindingPower(30)));
    assert_eq!(lbp("=="), Some(BindingPower(40)));
    assert_eq!(lbp("+"), Some(BindingPower(50)));
    assert_eq!(lbp("*"), Some(BindingPower(60)));
    assert_eq!(lbp("("), Some(BindingPower(80)));
    assert_eq!(lbp("}"), Some(BindingPower(0)));
}

#[test]
fn test_binding_power_never_decreases() {
    let mut grammar = Grammar::new();
    grammar.symbol("+", BindingPower::ADDITIVE);
    grammar.symbol("+", BindingPower::ASSIGNMENT);

    assert_eq!(
        grammar.get("+").map(|symbol| symbol.denotations.lbp),
        Some(BindingPower::ADDITIVE)
    );

    grammar.symbol("+", BindingPower::MEMBER);
    assert_eq!(
        grammar.get("+").map(|symbol| symbol.denotations.lbp),
        Some(BindingPower::MEMBER)
    );
}

#[test]
fn test_unknown_operator() {
    let result = parse_with("+", &Grammar::new(), &ParseOptions::default());

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "Unknown operator '+'");
    assert_eq!(result.diagnostics[0].range, span(0, 0, 1));
}

#[test]
fn test_invalid_character_is_skipped() {
    let result = parse("int @x;");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "Invalid character '@'");
    assert_eq!(result.diagnostics[0].range, span(0, 4, 5));
    assert!(result.root_scope().declares("x"));
}

#[test]
fn test_unterminated_string() {
    let result = parse("string s = \"abc");
    let errors = errors(&result.diagnostics);

    assert_eq!(errors[0].message, "Unterminated string literal");
    assert_eq!(errors[0].range, span(0, 11, 15));
}

#[test]
fn test_stray_closing_brace() {
    let result = parse("} int x;");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "Unexpected token '}'");
    assert_eq!(result.diagnostics[0].range, span(0, 0, 1));
    assert!(result.root_scope().declares("x"));
}

#[test]
fn test_statement_resync() {
    let result = parse(") ] ; int y;");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "Unexpected token ')'");
    assert_eq!(result.ast.len(), 1);
    assert!(result.root_scope().declares("y"));
}

#[test]
fn test_includes_are_collected() {
    let result = parse("#include \"room.fl\"\n#include <std.fl>\n#define A 1\nint x;");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.imports, ["room.fl", "std.fl"]);
}

#[test]
fn test_nesting_limit() {
    let depth = 500;
    let source = format!("int x = {}1{};", "(".repeat(depth), ")".repeat(depth));
    let result = parse(&source);

    let nesting: Vec<&Diagnostic> = result
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.message == "Nesting deeper than 200 levels")
        .collect();
    assert_eq!(nesting.len(), 1);

    let options = ParseOptions {
        max_depth: 3,
        ..ParseOptions::default()
    };
    let result = parse_with("int x = ((1));", &GRAMMAR, &options);
    assert_eq!(errors(&result.diagnostics)[0].message, "Nesting deeper than 3 levels");
}

#[test]
fn test_positions_span_lines() {
    let result = parse("int x;\n\n  int x;");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].range, span(0, 4, 5));

    let result = parse("/* a\n comment */ void a() {\n  b();\n}");
    assert_eq!(result.diagnostics[0].range, span(2, 2, 3));
}

#[test]
fn test_walk_visits_every_node() {
    let result = parse("int x = 1 + 2; void f(int a) { if (a) { x = a; } }");

    let mut ids = vec![];
    result.ast.walk(&mut |node| ids.push(node.id));

    assert!(ids.contains(&"+"));
    assert!(ids.contains(&"if"));
    assert!(ids.contains(&"="));
    assert_eq!(ids.iter().filter(|id| **id == "(literal)").count(), 2);
}
