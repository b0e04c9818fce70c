//! Expression nodes.

use aster_common::Span;
use serde::Serialize;

use super::item::{Block, Param};
use super::types::TypeExpr;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    /// A possibly-dotted name: `total`, `IO.read`, `user.email`.
    Name(String),
    Bool(bool),
    Int(i64),
    Long(i64),
    Float(f64),
    Str(String),
    Null,
    /// A call. Arithmetic and comparison keywords also parse into calls
    /// with operator names (`+`, `<`, ...); there is no operator node.
    Call { target: Box<Expr>, args: Vec<Expr> },
    /// `T with f = e and g = e`
    Construct {
        type_name: String,
        fields: Vec<(String, Expr)>,
    },
    /// `ok of e`
    OkOf(Box<Expr>),
    /// `err of e`
    ErrOf(Box<Expr>),
    /// `some of e`
    SomeOf(Box<Expr>),
    /// `none`
    NoneLit,
    /// `await(e)`
    Await(Box<Expr>),
    Lambda(LambdaExpr),
}

/// A lambda: the short form `(x: T) => expr` or the block form
/// `a function with x: T produce R: ...`.
///
/// The capture list is not recorded here; lowering computes free variables
/// and attaches them to the Core IR lambda.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LambdaExpr {
    pub params: Vec<Param>,
    /// Declared return type; `None` for short-form lambdas, which infer it.
    pub ret: Option<TypeExpr>,
    pub body: LambdaBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Block),
}

impl Expr {
    /// Shorthand for a name expression.
    pub fn name(text: impl Into<String>, span: Span) -> Expr {
        Expr {
            kind: ExprKind::Name(text.into()),
            span,
        }
    }

    /// Shorthand for a call on a named target.
    pub fn call_named(target: impl Into<String>, args: Vec<Expr>, span: Span) -> Expr {
        Expr {
            kind: ExprKind::Call {
                target: Box::new(Expr::name(target, span)),
                args,
            },
            span,
        }
    }
}
