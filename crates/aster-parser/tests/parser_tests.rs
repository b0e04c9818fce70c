//! Parser integration tests.
//!
//! Each test runs source through canonicalize -> lex -> parse and inspects
//! the AST shape. Error tests assert the code and position of the first
//! structural failure.

use aster_common::{Capability, ErrorCode, TokenKind};
use aster_lexer::{canonicalize, tokenize, translate_keywords};
use aster_lexicon::Lexicon;
use aster_parser::ast::{
    Backoff, DeclKind, ExprKind, FieldConstraint, LambdaBody, PatternKind, StmtKind, TypeExprKind,
};
use aster_parser::{ast, parse};

fn parse_source(source: &str) -> ast::Module {
    try_parse(source).unwrap()
}

fn try_parse(source: &str) -> Result<ast::Module, aster_common::CompileError> {
    let lexicon = Lexicon::english();
    let canonical = canonicalize(source, &lexicon, None);
    let tokens = tokenize(&canonical, &lexicon)?;
    parse(&tokens)
}

fn only_func(module: &ast::Module) -> &ast::FuncDecl {
    module
        .decls
        .iter()
        .find_map(|d| match &d.kind {
            DeclKind::Func(f) => Some(f),
            _ => None,
        })
        .expect("module should contain a function")
}

// ── Module headers ─────────────────────────────────────────────────────

#[test]
fn module_header_long_form() {
    let module = parse_source("This module is demo.\n");
    assert_eq!(module.name.as_deref(), Some("demo"));
}

#[test]
fn module_header_short_form() {
    let module = parse_source("Module acme.billing.\n");
    assert_eq!(module.name.as_deref(), Some("acme.billing"));
}

#[test]
fn module_header_optional() {
    let module = parse_source("Define R as one of A, B.\n");
    assert_eq!(module.name, None);
    assert_eq!(module.decls.len(), 1);
}

// ── Declarations ───────────────────────────────────────────────────────

#[test]
fn data_declaration_with_fields() {
    let module = parse_source("Define User with name: Text and age: Int.\n");
    match &module.decls[0].kind {
        DeclKind::Data { name, fields } => {
            assert_eq!(name, "User");
            assert_eq!(fields.len(), 2);
            assert_eq!(fields[0].name, "name");
            assert!(matches!(fields[1].ty.kind, TypeExprKind::Name(ref n) if n == "Int"));
        }
        other => panic!("expected data, got {other:?}"),
    }
}

#[test]
fn data_field_constraints() {
    let module = parse_source(
        "Define User with name: Text required and age: Int between 0 and 150 and code: Text matching pattern \"[A-Z]+\".\n",
    );
    match &module.decls[0].kind {
        DeclKind::Data { fields, .. } => {
            assert_eq!(fields[0].constraints, vec![FieldConstraint::Required]);
            assert_eq!(fields[1].constraints, vec![FieldConstraint::Between(0, 150)]);
            assert_eq!(
                fields[2].constraints,
                vec![FieldConstraint::Matching("[A-Z]+".into())]
            );
        }
        other => panic!("expected data, got {other:?}"),
    }
}

#[test]
fn enum_declaration() {
    let module = parse_source("Define Status as one of Active, Paused or Closed.\n");
    match &module.decls[0].kind {
        DeclKind::Enum { name, variants } => {
            assert_eq!(name, "Status");
            assert_eq!(variants, &["Active", "Paused", "Closed"]);
        }
        other => panic!("expected enum, got {other:?}"),
    }
}

#[test]
fn import_with_alias() {
    let module = parse_source("use acme.billing as billing.\n");
    match &module.decls[0].kind {
        DeclKind::Import { name, as_name } => {
            assert_eq!(name, "acme.billing");
            assert_eq!(as_name.as_deref(), Some("billing"));
        }
        other => panic!("expected import, got {other:?}"),
    }
}

// ── Functions ──────────────────────────────────────────────────────────

#[test]
fn greet_function_shape() {
    let source = "This module is demo.\nRule greet given name: Text, produce Text:\n  Return \"Hello, \" plus name.\n";
    let module = parse_source(source);
    assert_eq!(module.name.as_deref(), Some("demo"));
    let func = only_func(&module);
    assert_eq!(func.name, "greet");
    assert_eq!(func.params.len(), 1);
    assert!(!func.params[0].type_inferred);
    assert_eq!(func.body.stmts.len(), 1);
    match &func.body.stmts[0].kind {
        StmtKind::Return(expr) => match &expr.kind {
            ExprKind::Call { target, args } => {
                assert!(matches!(&target.kind, ExprKind::Name(n) if n == "+"));
                assert_eq!(args.len(), 2);
                assert!(matches!(&args[0].kind, ExprKind::Str(s) if s == "Hello, "));
                assert!(matches!(&args[1].kind, ExprKind::Name(n) if n == "name"));
            }
            other => panic!("expected call, got {other:?}"),
        },
        other => panic!("expected return, got {other:?}"),
    }
}

#[test]
fn effect_clause_with_capabilities() {
    let source = "Rule fetch, produce Text. It performs io with Http:\n  Return Http.get(\"/\").\n";
    let func_module = parse_source(source);
    let func = only_func(&func_module);
    assert_eq!(func.effects, vec!["io"]);
    assert_eq!(func.effect_caps, vec![Capability::Http]);
    assert!(func.effect_caps_explicit);
}

#[test]
fn effect_clause_bracket_capabilities() {
    let source = "Rule sync, produce Int. It performs io and cpu [Http, Sql].\n";
    let module = parse_source(source);
    let func = only_func(&module);
    assert_eq!(func.effects, vec!["io", "cpu"]);
    assert_eq!(func.effect_caps, vec![Capability::Http, Capability::Sql]);
    assert!(func.effect_caps_explicit);
    assert!(func.body.stmts.is_empty());
}

#[test]
fn bare_io_has_implicit_empty_capabilities() {
    let source = "Rule log, produce Unit. It performs io.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    assert_eq!(func.effects, vec!["io"]);
    assert!(func.effect_caps.is_empty());
    assert!(!func.effect_caps_explicit);
}

#[test]
fn effect_variables_in_declared_effects() {
    let source = "Rule apply given f: function with Int produce Int of E1, produce Int. It performs E1.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    assert_eq!(func.effect_params, vec!["E1"]);
    assert!(func.effects.is_empty());
    assert_eq!(func.declared_effects.len(), 1);
    assert!(func.declared_effects[0].is_var);
    assert_eq!(func.declared_effects[0].name, "E1");
}

#[test]
fn type_params_declared_with_of_clause() {
    let source = "Rule swap of T and U given x: T and y: U, produce T:\n  Return x.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    assert_eq!(func.type_params, vec!["T", "U"]);
    assert!(matches!(func.params[0].ty.kind, TypeExprKind::Var(ref v) if v == "T"));
}

#[test]
fn inferred_parameter_type_flagged() {
    let source = "Rule id given x, produce Unknown:\n  Return x.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    assert!(func.params[0].type_inferred);
}

// ── Statements ─────────────────────────────────────────────────────────

#[test]
fn let_set_return() {
    let source = "Rule f, produce Int:\n  Let x be 1.\n  Set x to 2.\n  Return x.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    let kinds: Vec<&str> = func
        .body
        .stmts
        .iter()
        .map(|s| match &s.kind {
            StmtKind::Let { .. } => "let",
            StmtKind::Set { .. } => "set",
            StmtKind::Return(_) => "return",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["let", "set", "return"]);
}

#[test]
fn if_otherwise_inline() {
    let source = "Rule sign given x: Int, produce Int:\n  If x greater than 0: Return 1. Otherwise: Return 0.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    match &func.body.stmts[0].kind {
        StmtKind::If {
            cond,
            then_block,
            else_block,
        } => {
            assert!(matches!(&cond.kind, ExprKind::Call { target, .. }
                if matches!(&target.kind, ExprKind::Name(n) if n == ">")));
            assert_eq!(then_block.stmts.len(), 1);
            assert_eq!(else_block.as_ref().unwrap().stmts.len(), 1);
        }
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn if_otherwise_indented() {
    let source = "Rule sign given x: Int, produce Int:\n  If x greater than 0:\n    Return 1.\n  Otherwise:\n    Return 0.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    assert!(matches!(
        &func.body.stmts[0].kind,
        StmtKind::If { else_block: Some(_), .. }
    ));
}

#[test]
fn match_arms_with_nested_patterns() {
    let source = "Rule f given v: Result<Int, Text>, produce Int:\n  Match v: When Ok(n), Return n. When Err(e), Return 0.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    match &func.body.stmts[0].kind {
        StmtKind::Match { arms, .. } => {
            assert_eq!(arms.len(), 2);
            match &arms[0].pattern.kind {
                PatternKind::Ctor { type_name, args, .. } => {
                    assert_eq!(type_name, "Ok");
                    assert!(matches!(&args[0].kind, PatternKind::Name(n) if n == "n"));
                }
                other => panic!("expected ctor pattern, got {other:?}"),
            }
        }
        other => panic!("expected match, got {other:?}"),
    }
}

#[test]
fn nested_ctor_pattern() {
    let source = "Rule f given v: Option<Result<Int, Text>>, produce Int:\n  Match v:\n    When Some(Ok(n)), Return n.\n    When x, Return 0.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    match &func.body.stmts[0].kind {
        StmtKind::Match { arms, .. } => {
            match &arms[0].pattern.kind {
                PatternKind::Ctor { type_name, args, .. } => {
                    assert_eq!(type_name, "Some");
                    assert!(matches!(
                        &args[0].kind,
                        PatternKind::Ctor { type_name, .. } if type_name == "Ok"
                    ));
                }
                other => panic!("expected ctor, got {other:?}"),
            }
            assert!(matches!(&arms[1].pattern.kind, PatternKind::Name(n) if n == "x"));
        }
        other => panic!("expected match, got {other:?}"),
    }
}

#[test]
fn start_and_wait() {
    let source = "Rule f, produce Unit:\n  Start a as async Http.get(\"/\").\n  Start b as async Http.get(\"/x\").\n  Wait for a and b.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    assert!(matches!(&func.body.stmts[0].kind, StmtKind::Start { name, .. } if name == "a"));
    match &func.body.stmts[2].kind {
        StmtKind::Wait { names } => assert_eq!(names, &["a", "b"]),
        other => panic!("expected wait, got {other:?}"),
    }
}

#[test]
fn within_scope_block() {
    let source = "Rule f, produce Unit:\n  Within scope:\n    Let x be 1.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    assert!(matches!(&func.body.stmts[0].kind, StmtKind::WithinScope(b) if b.stmts.len() == 1));
}

// ── Workflow ───────────────────────────────────────────────────────────

#[test]
fn workflow_steps_retry_timeout() {
    let source = "Rule run, produce Unit:\n  workflow:\n    step first:\n      Let x be 1.\n    step second depends on [\"first\"]:\n      Set x to 2.\n    retry:\n      max attempts 3.\n      backoff exponential.\n    timeout: 30 seconds.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    match &func.body.stmts[0].kind {
        StmtKind::Workflow(wf) => {
            assert_eq!(wf.steps.len(), 2);
            assert_eq!(wf.steps[0].name, "first");
            assert_eq!(wf.steps[0].dependencies, None);
            assert_eq!(
                wf.steps[1].dependencies,
                Some(vec!["first".to_string()])
            );
            let retry = wf.retry.as_ref().unwrap();
            assert_eq!(retry.max_attempts, 3);
            assert_eq!(retry.backoff, Backoff::Exponential);
            assert_eq!(wf.timeout.as_ref().unwrap().seconds, 30);
        }
        other => panic!("expected workflow, got {other:?}"),
    }
}

#[test]
fn workflow_step_with_compensate() {
    let source = "Rule run, produce Unit:\n  workflow:\n    step charge:\n      Let r be Payment.charge(\"c1\", 100).\n    compensate:\n      Let x be Payment.refund(\"c1\", 100).\n";
    let module = parse_source(source);
    let func = only_func(&module);
    match &func.body.stmts[0].kind {
        StmtKind::Workflow(wf) => {
            assert!(wf.steps[0].compensate.is_some());
        }
        other => panic!("expected workflow, got {other:?}"),
    }
}

// ── Expressions ────────────────────────────────────────────────────────

#[test]
fn precedence_multiplicative_over_additive() {
    // 1 plus 2 times 3 => 1 + (2 * 3)
    let source = "Rule f, produce Int:\n  Return 1 plus 2 times 3.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    match &func.body.stmts[0].kind {
        StmtKind::Return(expr) => match &expr.kind {
            ExprKind::Call { target, args } => {
                assert!(matches!(&target.kind, ExprKind::Name(n) if n == "+"));
                assert!(matches!(&args[1].kind, ExprKind::Call { target, .. }
                    if matches!(&target.kind, ExprKind::Name(n) if n == "*")));
            }
            other => panic!("expected call, got {other:?}"),
        },
        other => panic!("expected return, got {other:?}"),
    }
}

#[test]
fn chained_comparison_left_associative() {
    // a less than b less than c => (a < b) < c
    let source = "Rule f given a: Int and b: Int and c: Int, produce Bool:\n  Return a less than b less than c.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    match &func.body.stmts[0].kind {
        StmtKind::Return(expr) => match &expr.kind {
            ExprKind::Call { target, args } => {
                assert!(matches!(&target.kind, ExprKind::Name(n) if n == "<"));
                assert!(matches!(&args[0].kind, ExprKind::Call { .. }));
            }
            other => panic!("expected call, got {other:?}"),
        },
        other => panic!("expected return, got {other:?}"),
    }
}

#[test]
fn not_binds_weakest() {
    let source = "Rule f given a: Int, produce Bool:\n  Return not a less than 1.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    match &func.body.stmts[0].kind {
        StmtKind::Return(expr) => match &expr.kind {
            ExprKind::Call { target, args } => {
                assert!(matches!(&target.kind, ExprKind::Name(n) if n == "not"));
                assert!(matches!(&args[0].kind, ExprKind::Call { .. }));
            }
            other => panic!("expected call, got {other:?}"),
        },
        other => panic!("expected return, got {other:?}"),
    }
}

#[test]
fn construct_expression() {
    let source = "Rule f, produce Point:\n  Return Point with x = 1 and y = 2.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    match &func.body.stmts[0].kind {
        StmtKind::Return(expr) => match &expr.kind {
            ExprKind::Construct { type_name, fields } => {
                assert_eq!(type_name, "Point");
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].0, "x");
            }
            other => panic!("expected construct, got {other:?}"),
        },
        other => panic!("expected return, got {other:?}"),
    }
}

#[test]
fn result_and_option_constructors() {
    let source = "Rule f given x: Int, produce Result<Int, Text>:\n  Return ok of x.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    assert!(matches!(
        &func.body.stmts[0].kind,
        StmtKind::Return(e) if matches!(&e.kind, ExprKind::OkOf(_))
    ));
}

#[test]
fn await_expression() {
    let source = "Rule f given h: Option<Int>, produce Int:\n  Return await(h).\n";
    let module = parse_source(source);
    let func = only_func(&module);
    assert!(matches!(
        &func.body.stmts[0].kind,
        StmtKind::Return(e) if matches!(&e.kind, ExprKind::Await(_))
    ));
}

#[test]
fn short_lambda() {
    let source = "Rule f, produce Unit:\n  Let add be (x: Int, y: Int) => x plus y.\n";
    let module = parse_source(source);
    let func = only_func(&module);
    match &func.body.stmts[0].kind {
        StmtKind::Let { value, .. } => match &value.kind {
            ExprKind::Lambda(lambda) => {
                assert_eq!(lambda.params.len(), 2);
                assert!(lambda.ret.is_none());
                assert!(matches!(lambda.body, LambdaBody::Expr(_)));
            }
            other => panic!("expected lambda, got {other:?}"),
        },
        other => panic!("expected let, got {other:?}"),
    }
}

#[test]
fn block_lambda() {
    let source = "Rule f, produce Unit:\n  Let double be function with x: Int produce Int:\n    Return x times 2.\n  Return double(2).\n";
    let module = parse_source(source);
    let func = only_func(&module);
    match &func.body.stmts[0].kind {
        StmtKind::Let { value, .. } => match &value.kind {
            ExprKind::Lambda(lambda) => {
                assert!(lambda.ret.is_some());
                assert!(matches!(lambda.body, LambdaBody::Block(_)));
            }
            other => panic!("expected lambda, got {other:?}"),
        },
        other => panic!("expected let, got {other:?}"),
    }
}

#[test]
fn keyword_namespaces_parse_as_dotted_calls() {
    // `Map` and `map` are keyword words, but `Map.get(...)` is a call.
    let source = "Rule f given m: Map<Text, Int>, produce Option<Int>:\n  Return Map.get(m, \"k\").\n";
    let module = parse_source(source);
    let func = only_func(&module);
    match &func.body.stmts[0].kind {
        StmtKind::Return(e) => match &e.kind {
            ExprKind::Call { target, args } => {
                assert!(matches!(&target.kind, ExprKind::Name(n) if n == "Map.get"));
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected call, got {other:?}"),
        },
        other => panic!("expected return, got {other:?}"),
    }
}

#[test]
fn dotted_call_keeps_sentence_period() {
    let source = "Rule f, produce Text:\n  Return Http.get(\"/\").\n";
    let module = parse_source(source);
    let func = only_func(&module);
    match &func.body.stmts[0].kind {
        StmtKind::Return(e) => match &e.kind {
            ExprKind::Call { target, args } => {
                assert!(matches!(&target.kind, ExprKind::Name(n) if n == "Http.get"));
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected call, got {other:?}"),
        },
        other => panic!("expected return, got {other:?}"),
    }
}

// ── Types ──────────────────────────────────────────────────────────────

#[test]
fn bracket_and_prose_type_styles_agree() {
    let bracket = parse_source("Rule f given x: Option<Text>, produce Option<Text>:\n  Return x.\n");
    let prose = parse_source("Rule f given x: option of Text, produce option of Text:\n  Return x.\n");
    let fb = only_func(&bracket);
    let fp = only_func(&prose);
    assert!(matches!(fb.params[0].ty.kind, TypeExprKind::Option(_)));
    assert!(matches!(fp.params[0].ty.kind, TypeExprKind::Option(_)));
}

#[test]
fn pii_type_parses() {
    let module =
        parse_source("Rule f given email: Pii<Text, L2, email>, produce Text:\n  Return email.\n");
    let func = only_func(&module);
    match &func.params[0].ty.kind {
        TypeExprKind::Pii {
            base,
            sensitivity,
            category,
        } => {
            assert!(matches!(base.kind, TypeExprKind::Name(ref n) if n == "Text"));
            assert_eq!(*sensitivity, aster_common::PiiSensitivity::L2);
            assert_eq!(category, "email");
        }
        other => panic!("expected pii type, got {other:?}"),
    }
}

#[test]
fn generic_app_type() {
    let module = parse_source("Rule f given w: Workflow<Int, E1>, produce Int:\n  Return 0.\n");
    let func = only_func(&module);
    match &func.params[0].ty.kind {
        TypeExprKind::App { base, args } => {
            assert_eq!(base, "Workflow");
            assert_eq!(args.len(), 2);
            assert!(matches!(args[1].kind, TypeExprKind::EffectVar(ref v) if v == "E1"));
        }
        other => panic!("expected app type, got {other:?}"),
    }
}

// ── Errors ─────────────────────────────────────────────────────────────

#[test]
fn missing_period_reports_expect_period() {
    let err = try_parse("Define R as one of A, B\nDefine S as one of C.\n").unwrap_err();
    assert_eq!(err.code, ErrorCode::EXPECT_PERIOD);
}

#[test]
fn missing_colon_reports_expect_colon() {
    let err = try_parse("Rule f, produce Int:\n  If 1 less than 2 Return 1.\n").unwrap_err();
    assert_eq!(err.code, ErrorCode::EXPECT_COLON);
}

#[test]
fn unknown_capability_is_rejected() {
    let err = try_parse("Rule f, produce Int. It performs io with Disk.\n").unwrap_err();
    assert_eq!(err.code, ErrorCode::UNEXPECTED_TOKEN);
    assert!(err.message.contains("Disk"));
}

#[test]
fn stray_top_level_token_reports_expect_keyword() {
    let err = try_parse("banana.\n").unwrap_err();
    assert_eq!(err.code, ErrorCode::EXPECT_KEYWORD);
}

#[test]
fn error_position_points_at_failure() {
    let err = try_parse("Rule f, produce Int:\n  Let be 1.\n").unwrap_err();
    assert_eq!(err.code, ErrorCode::EXPECT_IDENT);
    assert_eq!(err.span.start.line, 2);
}

// ── Comment invisibility ───────────────────────────────────────────────

#[test]
fn comments_do_not_change_parse() {
    let lexicon = Lexicon::english();
    let source = "# heading\nRule f, produce Int: # trailing\n  Return 1. // done\n";
    let canonical = canonicalize(source, &lexicon, None);
    let tokens = tokenize(&canonical, &lexicon).unwrap();
    let stripped: Vec<aster_common::Token> = tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Comment)
        .cloned()
        .collect();
    assert_eq!(parse(&tokens).unwrap(), parse(&stripped).unwrap());
}

#[test]
fn german_source_parses_after_translation() {
    let lexicon = Lexicon::german();
    let source = "dieses modul ist demo.\nregel gruss gegeben name: Text, erzeuge Text:\n  gib zur\u{00fc}ck \"Hallo, \" plus name.\n";
    let canonical = canonicalize(source, &lexicon, None);
    let tokens = tokenize(&canonical, &lexicon).unwrap();
    let tokens = translate_keywords(tokens, &lexicon);
    let module = parse(&tokens).unwrap();
    assert_eq!(module.name.as_deref(), Some("demo"));
    let func = only_func(&module);
    assert_eq!(func.name, "gruss");
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    /// Well-formed programs assembled from a small grammar.
    fn arb_program() -> impl Strategy<Value = String> {
        let decl = prop::sample::select(vec![
            "Define User with name: Text and age: Int.",
            "Define Status as one of Active, Paused or Closed.",
            "Rule f given x: Int, produce Int:\n  Return x plus 1.",
            "Rule g, produce Text:\n  Return \"ok\".",
            "use acme.billing as billing.",
        ]);
        prop::collection::vec(decl, 0..6).prop_map(|decls| {
            let mut out = String::from("This module is demo.\n");
            for d in decls {
                out.push_str(d);
                out.push('\n');
            }
            out
        })
    }

    proptest! {
        #[test]
        fn round_trip_preserves_module_name(src in arb_program()) {
            let lexicon = Lexicon::english();
            let canonical = canonicalize(&src, &lexicon, None);
            let tokens = tokenize(&canonical, &lexicon).unwrap();
            let module = parse(&tokens).unwrap();
            prop_assert_eq!(module.name.as_deref(), Some("demo"));
        }

        #[test]
        fn removing_comments_never_changes_the_parse(src in arb_program()) {
            let lexicon = Lexicon::english();
            let canonical = canonicalize(&src, &lexicon, None);
            let tokens = tokenize(&canonical, &lexicon).unwrap();
            let stripped: Vec<aster_common::Token> = tokens
                .iter()
                .filter(|t| t.kind != TokenKind::Comment)
                .cloned()
                .collect();
            let a = parse(&tokens).unwrap();
            let b = parse(&stripped).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
