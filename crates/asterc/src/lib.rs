//! The Aster compile pipeline.
//!
//! Composes the stages (`canonicalize` -> `lex` -> `translate` -> `parse`
//! -> `lower` -> `typecheck`) behind two convenience entry points. Fatal
//! front-end errors surface as a single-element diagnostic list with
//! `success = false`; typecheck diagnostics are appended after.

pub mod render;

use aster_common::{Diagnostic, Severity};
use aster_core::CoreModule;
use aster_lexicon::{DomainTable, Lexicon, LexiconRegistry};
use aster_typeck::TypecheckOptions;

/// Options for one compile.
pub struct CompileOptions {
    /// Lexicon locale: `en`, `de`, or `zh`.
    pub locale: String,
    /// Optional domain identifier table for the canonicalizer.
    pub domain: Option<DomainTable>,
    /// Source file name recorded in origins and diagnostics.
    pub file: Option<String>,
    /// Options threaded into the type checker.
    pub typecheck: TypecheckOptions,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            domain: None,
            file: None,
            typecheck: TypecheckOptions::default(),
        }
    }
}

/// The outcome of a compile: on success the Core IR, otherwise the fatal
/// diagnostic; after typechecking, the accumulated diagnostics in source
/// order.
pub struct CompileResult {
    pub success: bool,
    pub core: Option<CoreModule>,
    pub diagnostics: Vec<Diagnostic>,
}

fn lexicon_for(locale: &str) -> Lexicon {
    LexiconRegistry::builtin()
        .get(locale)
        .cloned()
        .unwrap_or_else(Lexicon::english)
}

/// Run the front-end stages: canonicalize, lex, keyword-translate, parse,
/// lower.
pub fn compile(source: &str, options: &CompileOptions) -> CompileResult {
    let lexicon = lexicon_for(&options.locale);
    let canonical = aster_lexer::canonicalize(source, &lexicon, options.domain.as_ref());

    let stages = || -> Result<CoreModule, aster_common::CompileError> {
        let tokens = aster_lexer::tokenize(&canonical, &lexicon)?;
        let tokens = aster_lexer::translate_keywords(tokens, &lexicon);
        let module = aster_parser::parse(&tokens)?;
        aster_lower::lower(&module, options.file.as_deref())
    };

    match stages() {
        Ok(core) => CompileResult {
            success: true,
            core: Some(core),
            diagnostics: Vec::new(),
        },
        Err(error) => CompileResult {
            success: false,
            core: None,
            diagnostics: vec![error.into_diagnostic()],
        },
    }
}

/// Compile and type-check. The result carries both the Core IR (when the
/// front-end succeeded) and every diagnostic; `success` means no
/// error-severity diagnostic remained.
pub fn compile_and_typecheck(source: &str, options: &CompileOptions) -> CompileResult {
    let mut result = compile(source, options);
    if let Some(core) = &result.core {
        let mut diags = aster_typeck::typecheck(core, &options.typecheck);
        result.diagnostics.append(&mut diags);
    }
    result.success = !result
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Error);
    result
}
