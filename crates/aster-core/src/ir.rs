//! Core IR node families.
//!
//! Every node wraps its kind sum with the shared [`Origin`]; back-ends and
//! the type checker traverse with exhaustive matches. The IR is immutable
//! after lowering: the checker reads it and produces diagnostics on the
//! side.

use aster_common::{Capability, Effect, PiiSensitivity};
use serde::{Deserialize, Serialize};

pub use crate::origin::Origin;
use crate::ty::{EffectRef, Type};

/// A lowered module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename = "Module")]
pub struct CoreModule {
    pub name: String,
    pub decls: Vec<CoreDecl>,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreDecl {
    #[serde(flatten)]
    pub kind: CoreDeclKind,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CoreDeclKind {
    Import {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        as_name: Option<String>,
    },
    Data {
        name: String,
        fields: Vec<CoreField>,
    },
    Enum {
        name: String,
        variants: Vec<String>,
    },
    Func(CoreFunc),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreField {
    pub name: String,
    pub ty: Type,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub constraints: Vec<CoreConstraint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CoreConstraint {
    Required,
    Between { lo: i64, hi: i64 },
    AtLeast { n: i64 },
    AtMost { n: i64 },
    Matching { pattern: String },
}

/// A lowered function.
///
/// `effects` and `declared_effects` are kept aligned: every concrete effect
/// in `declared_effects` also appears in `effects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreFunc {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub type_params: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub effect_params: Vec<String>,
    pub params: Vec<CoreParam>,
    pub ret: Type,
    pub effects: Vec<Effect>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub declared_effects: Vec<EffectRef>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub effect_caps: Vec<Capability>,
    pub effect_caps_explicit: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pii: Option<PiiSummary>,
    pub body: CoreBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreParam {
    pub name: String,
    pub ty: Type,
}

/// Aggregated PII metadata for a function: the highest sensitivity and the
/// union of categories seen in its parameter and return types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiiSummary {
    pub sensitivity: PiiSensitivity,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreBlock {
    pub stmts: Vec<CoreStmt>,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreStmt {
    #[serde(flatten)]
    pub kind: CoreStmtKind,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CoreStmtKind {
    Let {
        name: String,
        value: CoreExpr,
    },
    Set {
        name: String,
        value: CoreExpr,
    },
    Return {
        value: CoreExpr,
    },
    If {
        cond: CoreExpr,
        then_block: CoreBlock,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        else_block: Option<CoreBlock>,
    },
    Match {
        scrutinee: CoreExpr,
        arms: Vec<CoreArm>,
    },
    Workflow(CoreWorkflow),
    Start {
        name: String,
        value: CoreExpr,
    },
    Wait {
        names: Vec<String>,
    },
    Scope {
        body: CoreBlock,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreArm {
    pub pattern: CorePattern,
    pub body: CoreBlock,
}

/// A workflow: a DAG of named steps with retry/timeout policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreWorkflow {
    pub steps: Vec<CoreStep>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub effect_caps: Vec<Capability>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub retry: Option<CoreRetry>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timeout: Option<CoreTimeout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreStep {
    pub name: String,
    pub body: CoreBlock,
    /// Step names this step depends on. Filled by lowering: an omitted
    /// `depends on` defaults to the previous step for legacy linear
    /// semantics.
    pub dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub effect_caps: Vec<Capability>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub compensate: Option<CoreBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreRetry {
    pub max_attempts: i64,
    pub backoff: CoreBackoff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreBackoff {
    Exponential,
    Linear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreTimeout {
    pub milliseconds: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreExpr {
    #[serde(flatten)]
    pub kind: CoreExprKind,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CoreExprKind {
    Name {
        name: String,
    },
    Bool {
        value: bool,
    },
    Int {
        value: i64,
    },
    Long {
        value: i64,
    },
    Float {
        value: f64,
    },
    Str {
        value: String,
    },
    Null,
    Call {
        target: Box<CoreExpr>,
        args: Vec<CoreExpr>,
    },
    Construct {
        type_name: String,
        fields: Vec<CoreFieldInit>,
    },
    Ok {
        value: Box<CoreExpr>,
    },
    Err {
        value: Box<CoreExpr>,
    },
    Some {
        value: Box<CoreExpr>,
    },
    None,
    Await {
        value: Box<CoreExpr>,
    },
    Lambda {
        params: Vec<CoreParam>,
        ret: Type,
        body: CoreBlock,
        /// Free variables captured from the enclosing scope.
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        captures: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreFieldInit {
    pub name: String,
    pub value: CoreExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorePattern {
    #[serde(flatten)]
    pub kind: CorePatternKind,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CorePatternKind {
    Null,
    Int {
        value: i64,
    },
    Name {
        name: String,
    },
    /// `names` is the legacy flat-bindings form; `args` supports nesting.
    /// Lowering produces `args`; readers tolerate both.
    Ctor {
        type_name: String,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        names: Vec<String>,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        args: Vec<CorePattern>,
    },
}

impl CorePattern {
    /// The variable names this pattern binds, whichever form carries them.
    pub fn bindings(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.kind {
            CorePatternKind::Null | CorePatternKind::Int { .. } => {}
            CorePatternKind::Name { name } => out.push(name),
            CorePatternKind::Ctor { names, args, .. } => {
                for name in names {
                    out.push(name);
                }
                for arg in args {
                    arg.collect(out);
                }
            }
        }
    }
}

impl CoreModule {
    /// Look up a function declaration by name.
    pub fn func(&self, name: &str) -> Option<&CoreFunc> {
        self.decls.iter().find_map(|d| match &d.kind {
            CoreDeclKind::Func(f) if f.name == name => Some(f),
            _ => None,
        })
    }
}
