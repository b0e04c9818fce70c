//! Effect inference and declaration checking.

use aster_common::{Diagnostic, ErrorCode, Severity};
use aster_lexer::{canonicalize, tokenize};
use aster_lexicon::Lexicon;
use aster_typeck::{typecheck, TypecheckOptions};

fn check(source: &str) -> Vec<Diagnostic> {
    let lexicon = Lexicon::english();
    let canonical = canonicalize(source, &lexicon, None);
    let tokens = tokenize(&canonical, &lexicon).expect("lexing should succeed");
    let module = aster_parser::parse(&tokens).expect("parsing should succeed");
    let core = aster_lower::lower(&module, Some("test.aster")).expect("lowering should succeed");
    typecheck(&core, &TypecheckOptions::default())
}

fn codes(diags: &[Diagnostic]) -> Vec<ErrorCode> {
    diags.iter().map(|d| d.code).collect()
}

#[test]
fn undeclared_io_call_reports_missing_io() {
    let diags = check(
        "This module is demo.io.\nRule ping, produce Text:\n  Return Http.get(\"/\").\n",
    );
    assert_eq!(codes(&diags), vec![ErrorCode::EFF_MISSING_IO]);
    assert!(diags[0].message.contains("Http.get"));
}

#[test]
fn missing_io_message_names_the_callee_and_rule() {
    let diags = check(
        "This module is demo.io.\nRule ping, produce Text:\n  Return Http.get(\"/\").\n",
    );
    insta::assert_snapshot!(
        diags[0].message,
        @"call to `Http.get` performs `io` but rule `ping` does not declare it"
    );
}

#[test]
fn missing_io_is_reported_once_per_rule() {
    let diags = check(
        "Rule f, produce Text:\n  Let a be Http.get(\"/a\").\n  Let b be Http.get(\"/b\").\n  Return a.\n",
    );
    assert_eq!(codes(&diags), vec![ErrorCode::EFF_MISSING_IO]);
}

#[test]
fn declared_io_call_is_clean() {
    let diags = check(
        "Rule ping, produce Text. It performs io:\n  Return Http.get(\"/\").\n",
    );
    assert!(diags.is_empty(), "expected no diagnostics, got {diags:?}");
}

#[test]
fn superfluous_io_declaration_warns() {
    let diags = check("Rule f, produce Int. It performs io:\n  Return 1.\n");
    assert_eq!(codes(&diags), vec![ErrorCode::EFF_SUPERFLUOUS_IO]);
    assert_eq!(diags[0].severity, Severity::Warning);
}

#[test]
fn superfluous_cpu_declaration_warns() {
    let diags = check("Rule f, produce Int. It performs cpu:\n  Return 1.\n");
    assert_eq!(codes(&diags), vec![ErrorCode::EFF_SUPERFLUOUS_CPU]);
}

#[test]
fn pure_builtins_require_no_declaration() {
    let diags = check(
        "Rule f given s: Text, produce Int:\n  Return Text.length(s).\n",
    );
    assert!(diags.is_empty(), "expected no diagnostics, got {diags:?}");
}

#[test]
fn effects_flow_through_user_rules() {
    // fetch declares io; caller of fetch must declare io too.
    let diags = check(
        "Rule fetch, produce Text. It performs io:\n  Return Http.get(\"/\").\nRule run, produce Text:\n  Return fetch().\n",
    );
    assert_eq!(codes(&diags), vec![ErrorCode::EFF_MISSING_IO]);
    assert!(diags[0].message.contains("fetch"));
}

#[test]
fn declared_caller_of_io_rule_is_clean() {
    let diags = check(
        "Rule fetch, produce Text. It performs io:\n  Return Http.get(\"/\").\nRule run, produce Text. It performs io:\n  Return fetch().\n",
    );
    assert!(diags.is_empty(), "expected no diagnostics, got {diags:?}");
}
