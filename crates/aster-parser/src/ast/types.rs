//! Surface type expressions.

use aster_common::{PiiSensitivity, Span};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeExprKind {
    /// A named type: `Int`, `Text`, `Driver`.
    Name(String),
    /// A single-uppercase-letter type variable: `T`, `U`.
    Var(String),
    /// An effect variable: `E`, `E1`.
    EffectVar(String),
    Maybe(Box<TypeExpr>),
    Option(Box<TypeExpr>),
    Result(Box<TypeExpr>, Box<TypeExpr>),
    List(Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
    /// A generic application with no dedicated variant: `Workflow<R, E>`.
    App { base: String, args: Vec<TypeExpr> },
    /// `function with T1 and T2 produce R`
    Func {
        params: Vec<TypeExpr>,
        ret: Box<TypeExpr>,
    },
    /// `Pii<Text, L2, email>`
    Pii {
        base: Box<TypeExpr>,
        sensitivity: PiiSensitivity,
        category: String,
    },
}

impl TypeExpr {
    /// Shorthand for a named type at a span.
    pub fn named(name: impl Into<String>, span: Span) -> TypeExpr {
        TypeExpr {
            kind: TypeExprKind::Name(name.into()),
            span,
        }
    }

    /// The `Unknown` placeholder used for inferred parameter types.
    pub fn unknown(span: Span) -> TypeExpr {
        TypeExpr::named("Unknown", span)
    }
}
