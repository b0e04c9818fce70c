//! Workflow DAG validation.

use aster_common::{Diagnostic, ErrorCode, Severity};
use aster_lexer::{canonicalize, tokenize};
use aster_lexicon::Lexicon;
use aster_typeck::{typecheck, TypecheckOptions, WorkflowPolicy};

fn check(source: &str) -> Vec<Diagnostic> {
    check_with(source, &TypecheckOptions::default())
}

fn check_with(source: &str, options: &TypecheckOptions) -> Vec<Diagnostic> {
    let lexicon = Lexicon::english();
    let canonical = canonicalize(source, &lexicon, None);
    let tokens = tokenize(&canonical, &lexicon).expect("lexing should succeed");
    let module = aster_parser::parse(&tokens).expect("parsing should succeed");
    let core = aster_lower::lower(&module, Some("test.aster")).expect("lowering should succeed");
    typecheck(&core, options)
}

fn codes(diags: &[Diagnostic]) -> Vec<ErrorCode> {
    diags.iter().map(|d| d.code).collect()
}

#[test]
fn dependency_cycle_is_reported() {
    let diags = check(
        "Rule run, produce Unit:\n  workflow:\n    step a depends on [\"c\"]:\n      Let x be 1.\n    step b depends on [\"a\"]:\n      Let y be 2.\n    step c depends on [\"b\"]:\n      Let z be 3.\n",
    );
    assert_eq!(codes(&diags), vec![ErrorCode::WORKFLOW_CIRCULAR_DEPENDENCY]);
    assert!(diags[0].message.contains("->"));
}

#[test]
fn self_dependency_is_a_cycle() {
    let diags = check(
        "Rule run, produce Unit:\n  workflow:\n    step a depends on [\"a\"]:\n      Let x be 1.\n",
    );
    assert_eq!(codes(&diags), vec![ErrorCode::WORKFLOW_CIRCULAR_DEPENDENCY]);
}

#[test]
fn linear_workflow_is_clean() {
    let diags = check(
        "Rule run, produce Unit:\n  workflow:\n    step first:\n      Let a be 1.\n    step second:\n      Let b be 2.\n    step third:\n      Let c be 3.\n",
    );
    assert!(diags.is_empty(), "expected no diagnostics, got {diags:?}");
}

#[test]
fn unknown_dependency_is_reported() {
    let diags = check(
        "Rule run, produce Unit:\n  workflow:\n    step b depends on [\"ghost\"]:\n      Let y be 2.\n",
    );
    assert_eq!(
        codes(&diags),
        vec![ErrorCode::WORKFLOW_UNKNOWN_STEP_DEPENDENCY]
    );
    assert!(diags[0].message.contains("ghost"));
}

#[test]
fn io_step_without_compensate_warns() {
    let diags = check(
        "Rule run, produce Unit. It performs io:\n  workflow:\n    step charge:\n      Let r be Payment.charge(\"c1\", 100).\n",
    );
    assert_eq!(codes(&diags), vec![ErrorCode::WORKFLOW_COMPENSATE_MISSING]);
    assert_eq!(diags[0].severity, Severity::Warning);
}

#[test]
fn io_step_with_compensate_is_clean() {
    let diags = check(
        "Rule run, produce Unit. It performs io:\n  workflow:\n    step charge:\n      Let r be Payment.charge(\"c1\", 100).\n    compensate:\n      Let u be Payment.refund(\"c1\", 100).\n",
    );
    assert!(diags.is_empty(), "expected no diagnostics, got {diags:?}");
}

#[test]
fn retry_bounds_are_enforced() {
    let diags = check(
        "Rule run, produce Unit:\n  workflow:\n    step a:\n      Let x be 1.\n    retry:\n      max attempts 50.\n      backoff exponential.\n",
    );
    assert_eq!(codes(&diags), vec![ErrorCode::WORKFLOW_RETRY_TOO_MANY]);
}

#[test]
fn retry_bound_is_configurable() {
    let options = TypecheckOptions {
        workflow_policy: WorkflowPolicy {
            max_retry_attempts: 100,
            max_timeout_ms: 86_400_000,
        },
        ..Default::default()
    };
    let diags = check_with(
        "Rule run, produce Unit:\n  workflow:\n    step a:\n      Let x be 1.\n    retry:\n      max attempts 50.\n      backoff exponential.\n",
        &options,
    );
    assert!(diags.is_empty(), "expected no diagnostics, got {diags:?}");
}

#[test]
fn timeout_out_of_range_is_reported() {
    let options = TypecheckOptions {
        workflow_policy: WorkflowPolicy {
            max_retry_attempts: 10,
            max_timeout_ms: 60_000,
        },
        ..Default::default()
    };
    let diags = check_with(
        "Rule run, produce Unit:\n  workflow:\n    step a:\n      Let x be 1.\n    timeout: 120 seconds.\n",
        &options,
    );
    assert_eq!(codes(&diags), vec![ErrorCode::WORKFLOW_TIMEOUT_OUT_OF_RANGE]);
}

#[test]
fn valid_retry_and_timeout_are_clean() {
    let diags = check(
        "Rule run, produce Unit:\n  workflow:\n    step a:\n      Let x be 1.\n    retry:\n      max attempts 3.\n      backoff linear.\n    timeout: 30 seconds.\n",
    );
    assert!(diags.is_empty(), "expected no diagnostics, got {diags:?}");
}

mod properties {
    use super::*;
    use aster_common::{Pos, Span};
    use aster_core::{
        CoreBlock, CoreDecl, CoreDeclKind, CoreFunc, CoreModule, CoreStep, CoreStmt,
        CoreStmtKind, CoreWorkflow, Origin, Type,
    };
    use proptest::prelude::*;

    fn origin() -> Origin {
        Origin::from_span(None, Span::point(Pos::new(1, 1)))
    }

    /// Build a module containing one rule whose body is a workflow with
    /// the given dependency edges (step i depends on steps `deps[i]`).
    fn module_with_workflow(deps: &[Vec<usize>]) -> CoreModule {
        let steps = deps
            .iter()
            .enumerate()
            .map(|(i, ds)| CoreStep {
                name: format!("s{i}"),
                body: CoreBlock { stmts: Vec::new(), origin: origin() },
                dependencies: ds.iter().map(|d| format!("s{d}")).collect(),
                effect_caps: Vec::new(),
                compensate: None,
            })
            .collect();
        let workflow = CoreWorkflow {
            steps,
            effect_caps: Vec::new(),
            retry: None,
            timeout: None,
        };
        let body = CoreBlock {
            stmts: vec![CoreStmt {
                kind: CoreStmtKind::Workflow(workflow),
                origin: origin(),
            }],
            origin: origin(),
        };
        CoreModule {
            name: "prop".into(),
            decls: vec![CoreDecl {
                kind: CoreDeclKind::Func(CoreFunc {
                    name: "run".into(),
                    type_params: Vec::new(),
                    effect_params: Vec::new(),
                    params: Vec::new(),
                    ret: Type::unit(),
                    effects: Vec::new(),
                    declared_effects: Vec::new(),
                    effect_caps: Vec::new(),
                    effect_caps_explicit: false,
                    pii: None,
                    body,
                }),
                origin: origin(),
            }],
            origin: origin(),
        }
    }

    /// Independent cycle oracle: Kahn's algorithm over the induced graph.
    fn has_cycle(deps: &[Vec<usize>]) -> bool {
        let n = deps.len();
        let mut out_degree: Vec<usize> = deps.iter().map(|ds| ds.len()).collect();
        let mut processed = 0;
        let mut ready: Vec<usize> = (0..n).filter(|&i| out_degree[i] == 0).collect();
        while let Some(node) = ready.pop() {
            processed += 1;
            for (i, ds) in deps.iter().enumerate() {
                if ds.contains(&node) {
                    out_degree[i] -= ds.iter().filter(|&&d| d == node).count();
                    if out_degree[i] == 0 {
                        ready.push(i);
                    }
                }
            }
        }
        processed < n
    }

    fn arb_deps() -> impl Strategy<Value = Vec<Vec<usize>>> {
        (1usize..=5).prop_flat_map(|n| {
            prop::collection::vec(prop::collection::vec(0..n, 0..3), n)
        })
    }

    proptest! {
        #[test]
        fn circular_dependency_reported_iff_a_cycle_exists(deps in arb_deps()) {
            // Dedup edges so the oracle's degree bookkeeping stays simple.
            let deps: Vec<Vec<usize>> = deps
                .into_iter()
                .map(|mut ds| {
                    ds.sort_unstable();
                    ds.dedup();
                    ds
                })
                .collect();
            let module = module_with_workflow(&deps);
            let diags = typecheck(&module, &TypecheckOptions::default());
            let reported = diags
                .iter()
                .any(|d| d.code == ErrorCode::WORKFLOW_CIRCULAR_DEPENDENCY);
            prop_assert_eq!(reported, has_cycle(&deps));
        }
    }
}
