//! The surface AST.
//!
//! Each node family is a tagged sum wrapped in a struct carrying the shared
//! span, so traversals match exhaustively while spans stay in one place.
//! The AST preserves surface detail the Core IR drops (inferred-type
//! markers, explicit-capability flags, raw effect words); lowering erases
//! it.

pub mod expr;
pub mod item;
pub mod pat;
pub mod types;

pub use expr::{Expr, ExprKind, LambdaBody, LambdaExpr};
pub use item::{
    Backoff, Block, Decl, DeclKind, EffectExpr, FieldConstraint, FieldDef, FuncDecl, MatchArm,
    Param, RetryPolicy, StepDef, Stmt, StmtKind, TimeoutPolicy, WorkflowStmt,
};
pub use pat::{Pattern, PatternKind};
pub use types::{TypeExpr, TypeExprKind};

use aster_common::Span;
use serde::Serialize;

/// A parsed module: optional header name plus declarations in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    pub name: Option<String>,
    pub decls: Vec<Decl>,
    pub span: Span,
}
