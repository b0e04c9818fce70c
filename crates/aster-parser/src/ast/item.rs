//! Declarations, statements, and workflow nodes.

use aster_common::{Capability, Span};
use serde::Serialize;

use super::expr::Expr;
use super::pat::Pattern;
use super::types::TypeExpr;

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DeclKind {
    /// `use dotted.name [as alias].`
    Import { name: String, as_name: Option<String> },
    /// `Define T with f: T1 and g: T2.`
    Data { name: String, fields: Vec<FieldDef> },
    /// `Define T as one of A, B or C.`
    Enum { name: String, variants: Vec<String> },
    /// `Rule name given ..., produce R. It performs ...:`
    Func(FuncDecl),
}

/// A data field with optional constraints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeExpr,
    pub constraints: Vec<FieldConstraint>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldConstraint {
    Required,
    Between(i64, i64),
    AtLeast(i64),
    AtMost(i64),
    /// `matching pattern "re"`
    Matching(String),
}

/// A function declaration.
///
/// `effects` holds the concrete surface effect words in declaration order;
/// `declared_effects` holds the full list including effect variables. Every
/// concrete entry of `declared_effects` also appears in `effects`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuncDecl {
    pub name: String,
    pub type_params: Vec<String>,
    pub effect_params: Vec<String>,
    pub params: Vec<Param>,
    pub ret: TypeExpr,
    pub effects: Vec<String>,
    pub declared_effects: Vec<EffectExpr>,
    pub effect_caps: Vec<Capability>,
    /// Whether the author wrote a capability list (bare `io` implies an
    /// empty list without marking it explicit).
    pub effect_caps_explicit: bool,
    pub body: Block,
}

/// A surface effect mention: a concrete word (`io`) or an effect variable
/// (`E1`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectExpr {
    pub name: String,
    pub is_var: bool,
    pub span: Span,
}

/// A function or lambda parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub ty: TypeExpr,
    pub constraints: Vec<FieldConstraint>,
    /// True when the author wrote no annotation and the type is inferred.
    pub type_inferred: bool,
    pub span: Span,
}

/// A sequence of statements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    /// `Let name be expr.`
    Let { name: String, value: Expr },
    /// `Set name to expr.`
    Set { name: String, value: Expr },
    /// `Return expr.`
    Return(Expr),
    /// `If cond: ... [Otherwise: ...]`
    If {
        cond: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },
    /// `Match expr: When pat, stmts. ...`
    Match { scrutinee: Expr, arms: Vec<MatchArm> },
    Workflow(WorkflowStmt),
    /// `Start name as async expr.`
    Start { name: String, value: Expr },
    /// `Wait for a and b.`
    Wait { names: Vec<String> },
    /// `Within scope: ...`
    WithinScope(Block),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowStmt {
    pub steps: Vec<StepDef>,
    pub retry: Option<RetryPolicy>,
    pub timeout: Option<TimeoutPolicy>,
    pub span: Span,
}

/// A workflow step. `dependencies` is `None` when the author omitted
/// `depends on`; lowering fills in the implicit linear dependency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepDef {
    pub name: String,
    pub dependencies: Option<Vec<String>>,
    pub body: Block,
    pub compensate: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetryPolicy {
    pub max_attempts: i64,
    pub backoff: Backoff,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    Exponential,
    Linear,
}

/// A workflow timeout, in surface seconds; lowering converts to
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeoutPolicy {
    pub seconds: i64,
    pub span: Span,
}
