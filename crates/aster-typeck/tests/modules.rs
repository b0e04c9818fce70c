//! Cross-module resolution through the module cache.

use std::path::PathBuf;
use std::sync::Arc;

use aster_common::{Diagnostic, ErrorCode};
use aster_lexer::{canonicalize, tokenize};
use aster_lexicon::Lexicon;
use aster_typeck::{
    typecheck, MemorySource, ModuleCache, ModuleLoadError, TypecheckOptions,
};

fn check_with(source: &str, options: &TypecheckOptions) -> Vec<Diagnostic> {
    let lexicon = Lexicon::english();
    let canonical = canonicalize(source, &lexicon, None);
    let tokens = tokenize(&canonical, &lexicon).expect("lexing should succeed");
    let module = aster_parser::parse(&tokens).expect("parsing should succeed");
    let core = aster_lower::lower(&module, Some("app.aster")).expect("lowering should succeed");
    typecheck(&core, options)
}

fn codes(diags: &[Diagnostic]) -> Vec<ErrorCode> {
    diags.iter().map(|d| d.code).collect()
}

fn options_with(source: Arc<MemorySource>) -> (TypecheckOptions, Arc<ModuleCache>) {
    let cache = Arc::new(ModuleCache::new());
    let options = TypecheckOptions {
        module_cache: Some(Arc::clone(&cache)),
        file_source: source,
        module_search_paths: vec![PathBuf::from("/lib")],
        ..Default::default()
    };
    (options, cache)
}

const BILLING: &str = "This module is acme.billing.\nRule invoice given id: Text, produce Text. It performs io with Http:\n  Return Http.get(id).\n";

#[test]
fn imported_rule_effects_flow_to_the_caller() {
    let source = Arc::new(MemorySource::new());
    source.put("/lib/acme/billing.aster", BILLING);
    let (options, _cache) = options_with(source);
    let diags = check_with(
        "This module is app.\nuse acme.billing as billing.\nRule run, produce Text:\n  Return billing.invoice(\"42\").\n",
        &options,
    );
    assert_eq!(codes(&diags), vec![ErrorCode::EFF_MISSING_IO]);
}

#[test]
fn declared_caller_of_imported_rule_is_clean() {
    let source = Arc::new(MemorySource::new());
    source.put("/lib/acme/billing.aster", BILLING);
    let (options, _cache) = options_with(source);
    let diags = check_with(
        "This module is app.\nuse acme.billing as billing.\nRule run, produce Text. It performs io:\n  Return billing.invoice(\"42\").\n",
        &options,
    );
    assert!(diags.is_empty(), "expected no diagnostics, got {diags:?}");
}

#[test]
fn import_without_alias_uses_the_last_segment() {
    let source = Arc::new(MemorySource::new());
    source.put("/lib/acme/billing.aster", BILLING);
    let (options, _cache) = options_with(source);
    let diags = check_with(
        "This module is app.\nuse acme.billing.\nRule run, produce Text. It performs io:\n  Return billing.invoice(\"42\").\n",
        &options,
    );
    assert!(diags.is_empty(), "expected no diagnostics, got {diags:?}");
}

#[test]
fn unresolved_module_reports_undefined_module() {
    let source = Arc::new(MemorySource::new());
    let (options, _cache) = options_with(source);
    let diags = check_with(
        "This module is app.\nuse acme.billing as billing.\nRule run, produce Text. It performs io:\n  Return billing.invoice(\"42\").\n",
        &options,
    );
    assert_eq!(codes(&diags), vec![ErrorCode::UNDEFINED_MODULE]);
}

#[test]
fn missing_cache_reports_undefined_module_not_silence() {
    let diags = check_with(
        "This module is app.\nuse acme.billing as billing.\nRule run, produce Text. It performs io:\n  Return billing.invoice(\"42\").\n",
        &TypecheckOptions::default(),
    );
    assert_eq!(codes(&diags), vec![ErrorCode::UNDEFINED_MODULE]);
}

#[test]
fn unknown_rule_in_imported_module() {
    let source = Arc::new(MemorySource::new());
    source.put("/lib/acme/billing.aster", BILLING);
    let (options, _cache) = options_with(source);
    let diags = check_with(
        "This module is app.\nuse acme.billing as billing.\nRule run, produce Text. It performs io:\n  Return billing.refund(\"42\").\n",
        &options,
    );
    assert_eq!(codes(&diags), vec![ErrorCode::UNDEFINED_VARIABLE]);
    assert!(diags[0].message.contains("refund"));
}

#[test]
fn import_cycles_are_reported() {
    let source = Arc::new(MemorySource::new());
    source.put(
        "/lib/alpha.aster",
        "This module is alpha.\nuse beta.\nRule a, produce Int:\n  Return 1.\n",
    );
    source.put(
        "/lib/beta.aster",
        "This module is beta.\nuse alpha.\nRule b, produce Int:\n  Return 2.\n",
    );
    let (options, _cache) = options_with(source);
    let diags = check_with(
        "This module is app.\nuse alpha.\nRule run, produce Int:\n  Return alpha.a().\n",
        &options,
    );
    assert_eq!(codes(&diags), vec![ErrorCode::MODULE_CYCLE]);
    assert!(diags[0].message.contains("alpha"));
    assert!(diags[0].message.contains("beta"));
}

// ── Cache behavior ─────────────────────────────────────────────────────

#[test]
fn cache_reuses_entries_and_recompiles_on_change() {
    let source = Arc::new(MemorySource::new());
    source.put(
        "/lib/util.aster",
        "This module is util.\nRule f, produce Int:\n  Return 1.\n",
    );
    let cache = ModuleCache::new();
    let mem: &MemorySource = &source;
    let paths = vec![PathBuf::from("/lib")];
    let lexicon = Lexicon::english();

    let first = cache
        .load("util", &paths, mem, &lexicon, &mut Vec::new())
        .unwrap();
    assert!(first.func("f").is_some());

    // Same fingerprint: the cached module is shared.
    let second = cache
        .load("util", &paths, mem, &lexicon, &mut Vec::new())
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // New contents bump the fingerprint and force a recompile.
    source.put(
        "/lib/util.aster",
        "This module is util.\nRule g, produce Int:\n  Return 2.\n",
    );
    let third = cache
        .load("util", &paths, mem, &lexicon, &mut Vec::new())
        .unwrap();
    assert!(third.func("g").is_some());
    assert!(third.func("f").is_none());
}

#[test]
fn invalidation_drops_transitive_importers() {
    let source = Arc::new(MemorySource::new());
    source.put(
        "/lib/base.aster",
        "This module is base.\nRule f, produce Int:\n  Return 1.\n",
    );
    source.put(
        "/lib/mid.aster",
        "This module is mid.\nuse base.\nRule g, produce Int:\n  Return base.f().\n",
    );
    source.put(
        "/lib/top.aster",
        "This module is top.\nuse mid.\nRule h, produce Int:\n  Return mid.g().\n",
    );
    let cache = ModuleCache::new();
    let mem: &MemorySource = &source;
    let paths = vec![PathBuf::from("/lib")];
    let lexicon = Lexicon::english();

    cache
        .load("top", &paths, mem, &lexicon, &mut Vec::new())
        .unwrap();
    let base_path = PathBuf::from("/lib/base.aster");
    let mid_path = PathBuf::from("/lib/mid.aster");
    let top_path = PathBuf::from("/lib/top.aster");
    assert!(cache.contains(&base_path));
    assert!(cache.contains(&mid_path));
    assert!(cache.contains(&top_path));

    cache.invalidate(&base_path);
    assert!(!cache.contains(&base_path));
    assert!(!cache.contains(&mid_path), "importers drop transitively");
    assert!(!cache.contains(&top_path), "transitive importers drop too");
}

#[test]
fn unresolvable_module_load_error_shape() {
    let cache = ModuleCache::new();
    let source = MemorySource::new();
    let err = cache
        .load(
            "ghost",
            &[PathBuf::from("/lib")],
            &source,
            &Lexicon::english(),
            &mut Vec::new(),
        )
        .unwrap_err();
    assert!(matches!(err, ModuleLoadError::NotFound { name } if name == "ghost"));
}
