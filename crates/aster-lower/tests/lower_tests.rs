//! Lowering integration tests: pipeline source -> canonicalize -> lex ->
//! parse -> lower, then inspect the Core IR.

use aster_common::{Capability, Effect, ErrorCode, PiiSensitivity};
use aster_core::{CoreDeclKind, CoreExprKind, CoreModule, CoreStmtKind, Type};
use aster_lexer::{canonicalize, tokenize};
use aster_lexicon::Lexicon;
use aster_lower::lower;
use aster_parser::parse;

fn lower_source(source: &str) -> CoreModule {
    try_lower(source).unwrap()
}

fn try_lower(source: &str) -> Result<CoreModule, aster_common::CompileError> {
    let lexicon = Lexicon::english();
    let canonical = canonicalize(source, &lexicon, None);
    let tokens = tokenize(&canonical, &lexicon)?;
    let module = parse(&tokens)?;
    lower(&module, Some("test.aster"))
}

fn only_func(module: &CoreModule) -> &aster_core::CoreFunc {
    module
        .decls
        .iter()
        .find_map(|d| match &d.kind {
            CoreDeclKind::Func(f) => Some(f),
            _ => None,
        })
        .expect("module should contain a function")
}

// ── Greet scenario ─────────────────────────────────────────────────────

#[test]
fn greet_lowers_to_expected_core_shape() {
    let core = lower_source(
        "This module is demo.\nRule greet given name: Text, produce Text:\n  Return \"Hello, \" plus name.\n",
    );
    assert_eq!(core.name, "demo");
    let func = only_func(&core);
    assert_eq!(func.name, "greet");
    assert_eq!(func.body.stmts.len(), 1);
    match &func.body.stmts[0].kind {
        CoreStmtKind::Return { value } => match &value.kind {
            CoreExprKind::Call { target, args } => {
                assert!(matches!(&target.kind, CoreExprKind::Name { name } if name == "+"));
                assert!(matches!(&args[0].kind, CoreExprKind::Str { value } if value == "Hello, "));
                assert!(matches!(&args[1].kind, CoreExprKind::Name { name } if name == "name"));
            }
            other => panic!("expected call, got {other:?}"),
        },
        other => panic!("expected return, got {other:?}"),
    }
}

#[test]
fn origins_point_back_at_the_source() {
    let core = lower_source("This module is demo.\nRule f, produce Int:\n  Return 1.\n");
    let func_decl = &core.decls[0];
    assert_eq!(func_decl.origin.file.as_deref(), Some("test.aster"));
    assert_eq!(func_decl.origin.start.line, 2);
    let func = only_func(&core);
    assert_eq!(func.body.stmts[0].origin.start.line, 3);
}

#[test]
fn unnamed_module_lowers_as_main() {
    let core = lower_source("Rule f, produce Int:\n  Return 1.\n");
    assert_eq!(core.name, "main");
}

// ── Effects ────────────────────────────────────────────────────────────

#[test]
fn effect_strings_parse_into_the_lattice() {
    let core = lower_source("Rule f, produce Int. It performs io and cpu.\n");
    let func = only_func(&core);
    assert_eq!(func.effects, vec![Effect::Io, Effect::Cpu]);
    // declared_effects stays aligned: every concrete effect appears in
    // effects.
    assert_eq!(func.declared_effects.len(), 2);
}

#[test]
fn unknown_effect_fails_fatally_naming_the_recognized_set() {
    let err = try_lower("Rule f, produce Int. It performs network.\n").unwrap_err();
    assert_eq!(err.code, ErrorCode::UNKNOWN_EFFECT);
    assert!(err.message.contains("network"));
    assert!(err.message.contains("io, cpu, pure"));
}

#[test]
fn effect_variables_survive_lowering() {
    let core =
        lower_source("Rule apply given f: function with Int produce Int of E1, produce Int. It performs E1.\n");
    let func = only_func(&core);
    assert!(func.effects.is_empty());
    assert_eq!(func.effect_params, vec!["E1"]);
    assert!(matches!(
        &func.declared_effects[0],
        aster_core::EffectRef::Var { name } if name == "E1"
    ));
}

// ── Literals and constructors ──────────────────────────────────────────

#[test]
fn short_lambda_body_wraps_in_return_block() {
    let core = lower_source("Rule f, produce Unit:\n  Let add be (x: Int, y: Int) => x plus y.\n");
    let func = only_func(&core);
    match &func.body.stmts[0].kind {
        CoreStmtKind::Let { value, .. } => match &value.kind {
            CoreExprKind::Lambda { ret, body, .. } => {
                assert_eq!(*ret, Type::int());
                assert_eq!(body.stmts.len(), 1);
                assert!(matches!(&body.stmts[0].kind, CoreStmtKind::Return { .. }));
            }
            other => panic!("expected lambda, got {other:?}"),
        },
        other => panic!("expected let, got {other:?}"),
    }
}

#[test]
fn lambda_captures_exclude_params_and_dotted_names() {
    let core = lower_source(
        "Rule f given base: Int, produce Unit:\n  Let add be (x: Int) => x plus base plus Time.now().\n",
    );
    let func = only_func(&core);
    match &func.body.stmts[0].kind {
        CoreStmtKind::Let { value, .. } => match &value.kind {
            CoreExprKind::Lambda { captures, .. } => {
                assert_eq!(captures, &["base"]);
            }
            other => panic!("expected lambda, got {other:?}"),
        },
        other => panic!("expected let, got {other:?}"),
    }
}

// ── Workflow ───────────────────────────────────────────────────────────

#[test]
fn workflow_implicit_sequencing() {
    let core = lower_source(
        "Rule run, produce Unit:\n  workflow:\n    step first:\n      Let a be 1.\n    step second:\n      Let b be 2.\n    step third:\n      Let c be 3.\n",
    );
    let func = only_func(&core);
    match &func.body.stmts[0].kind {
        CoreStmtKind::Workflow(wf) => {
            let deps: Vec<&[String]> =
                wf.steps.iter().map(|s| s.dependencies.as_slice()).collect();
            assert_eq!(deps[0], &[] as &[String]);
            assert_eq!(deps[1], &["first".to_string()]);
            assert_eq!(deps[2], &["second".to_string()]);
        }
        other => panic!("expected workflow, got {other:?}"),
    }
}

#[test]
fn explicit_dependencies_used_verbatim() {
    let core = lower_source(
        "Rule run, produce Unit:\n  workflow:\n    step a:\n      Let x be 1.\n    step b depends on [\"a\"]:\n      Let y be 2.\n",
    );
    let func = only_func(&core);
    match &func.body.stmts[0].kind {
        CoreStmtKind::Workflow(wf) => {
            assert_eq!(wf.steps[1].dependencies, vec!["a"]);
        }
        other => panic!("expected workflow, got {other:?}"),
    }
}

#[test]
fn step_capabilities_inferred_from_call_prefixes() {
    let core = lower_source(
        "Rule run, produce Unit:\n  workflow:\n    step pull:\n      Let r be Http.get(\"/api\").\n      Let rows be Db.query(\"select 1\").\n    compensate:\n      Let x be Files.write(\"log\", \"undo\").\n",
    );
    let func = only_func(&core);
    match &func.body.stmts[0].kind {
        CoreStmtKind::Workflow(wf) => {
            assert_eq!(
                wf.steps[0].effect_caps,
                vec![Capability::Http, Capability::Sql, Capability::Files]
            );
            assert_eq!(
                wf.effect_caps,
                vec![Capability::Http, Capability::Sql, Capability::Files]
            );
        }
        other => panic!("expected workflow, got {other:?}"),
    }
}

#[test]
fn unresolved_prefixes_contribute_no_capability() {
    let core = lower_source(
        "Rule run, produce Unit:\n  workflow:\n    step notify:\n      Let r be Mailer.send(\"hi\").\n",
    );
    let func = only_func(&core);
    match &func.body.stmts[0].kind {
        CoreStmtKind::Workflow(wf) => assert!(wf.steps[0].effect_caps.is_empty()),
        other => panic!("expected workflow, got {other:?}"),
    }
}

#[test]
fn timeout_converts_to_milliseconds() {
    let core = lower_source(
        "Rule run, produce Unit:\n  workflow:\n    step a:\n      Let x be 1.\n    timeout: 30 seconds.\n",
    );
    let func = only_func(&core);
    match &func.body.stmts[0].kind {
        CoreStmtKind::Workflow(wf) => {
            assert_eq!(wf.timeout.as_ref().unwrap().milliseconds, 30_000);
        }
        other => panic!("expected workflow, got {other:?}"),
    }
}

// ── PII ────────────────────────────────────────────────────────────────

#[test]
fn function_pii_summary_aggregates_params_and_return() {
    let core = lower_source(
        "Rule send given email: Pii<Text, L2, email> and ssn: Pii<Text, L3, ssn>, produce Text:\n  Return email.\n",
    );
    let func = only_func(&core);
    let pii = func.pii.as_ref().unwrap();
    assert_eq!(pii.sensitivity, PiiSensitivity::L3);
    assert_eq!(pii.categories, vec!["email", "ssn"]);
}

#[test]
fn pii_free_function_has_no_summary() {
    let core = lower_source("Rule f given x: Int, produce Int:\n  Return x.\n");
    assert!(only_func(&core).pii.is_none());
}

// ── Scope ──────────────────────────────────────────────────────────────

#[test]
fn within_scope_lowers_to_scope_stmt() {
    let core = lower_source("Rule f, produce Unit:\n  Within scope:\n    Let x be 1.\n");
    let func = only_func(&core);
    assert!(matches!(&func.body.stmts[0].kind, CoreStmtKind::Scope { body } if body.stmts.len() == 1));
}

// ── Envelope round-trip over lowered modules ───────────────────────────

#[test]
fn lowered_module_round_trips_through_the_envelope() {
    let core = lower_source(
        "This module is demo.\nDefine User with name: Text and age: Int between 0 and 150.\nDefine Status as one of Active, Closed.\nRule f given v: Result<Int, Text>, produce Int:\n  Match v: When Ok(n), Return n. When Err(e), Return 0.\n",
    );
    let envelope = aster_core::Envelope::new(core.clone(), "demo.aster");
    let json = envelope.to_json();
    let back = aster_core::Envelope::from_json(&json).unwrap();
    assert_eq!(back.module, core);
}
