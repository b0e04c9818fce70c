// Aster type checker -- type and effect inference over Core IR.
//
// The checker accumulates structured diagnostics and never throws for
// ordinary user errors; errors invalidate the compile for code generation,
// warnings do not. Imports are resolved through a shared module cache.

mod builtins;
mod capability;
mod check;
mod effects;
mod exhaustive;
mod modules;
mod solve;
mod symbols;
mod unify;
mod workflow;

pub use capability::{AllowList, CapabilityManifest};
pub use effects::{unify_rows, EffectRow, EffectSet, EffectTable};
pub use modules::{FileSource, FsSource, MemorySource, ModuleCache, ModuleLoadError};
pub use solve::{solve, Constraint};
pub use symbols::{ScopeKind, Symbol, SymbolKind, SymbolTable};
pub use unify::{contains_pii, expand_alias, is_subtype, substitute, types_equal, unify, Bindings};
pub use workflow::WorkflowPolicy;

use std::path::PathBuf;
use std::sync::Arc;

use aster_common::Diagnostic;
use aster_core::CoreModule;

/// Configuration threaded through a type check. No process-global state:
/// lexicons, manifests, policy bounds, and enforcement toggles all live
/// here.
#[derive(Clone)]
pub struct TypecheckOptions {
    /// External capability manifest; violations land on the advisory
    /// channel.
    pub manifest: Option<CapabilityManifest>,
    /// Cache for imported modules. Without one, dotted calls through
    /// imports report `UNDEFINED_MODULE`.
    pub module_cache: Option<Arc<ModuleCache>>,
    /// Where imported module files come from.
    pub file_source: Arc<dyn FileSource>,
    /// Directories searched for `<dotted-as-path>.aster` candidates.
    pub module_search_paths: Vec<PathBuf>,
    /// Lexicon locale used to compile imported modules.
    pub locale: String,
    /// Whether PII flow analysis reports leaks.
    pub enforce_pii: bool,
    pub workflow_policy: WorkflowPolicy,
}

impl Default for TypecheckOptions {
    fn default() -> Self {
        Self {
            manifest: None,
            module_cache: None,
            file_source: Arc::new(FsSource),
            module_search_paths: Vec::new(),
            locale: "en".to_string(),
            enforce_pii: true,
            workflow_policy: WorkflowPolicy::default(),
        }
    }
}

/// Type-check a Core module. Returns diagnostics sorted by source
/// position; the module itself is never mutated.
pub fn typecheck(module: &CoreModule, options: &TypecheckOptions) -> Vec<Diagnostic> {
    let mut checker = check::Checker::new(module, options);
    checker.run();
    let mut diags = checker.diags;
    diags.sort_by_key(|d| d.span.start);
    diags
}
