//! Core IR types.
//!
//! The type language covers named types, type and effect variables, the
//! built-in containers, generic applications, function types with effect
//! rows, and PII decorators. `Unknown` is the permissive top: it compares
//! equal to every type unless strict comparison is requested.

use aster_common::{Effect, PiiSensitivity};
use serde::{Deserialize, Serialize};

/// A declared effect mention on a function type: a concrete lattice point
/// or an effect variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum EffectRef {
    Effect { effect: Effect },
    Var { name: String },
}

/// A Core IR type.
///
/// For any `Pii`, `base` is never itself `Pii`; lowering flattens nested
/// decorations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Type {
    Name { name: String },
    Var { name: String },
    EffectVar { name: String },
    Maybe { inner: Box<Type> },
    Option { inner: Box<Type> },
    Result { ok: Box<Type>, err: Box<Type> },
    List { inner: Box<Type> },
    Map { key: Box<Type>, value: Box<Type> },
    App { base: String, args: Vec<Type> },
    Func {
        params: Vec<Type>,
        ret: Box<Type>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        declared_effects: Option<Vec<EffectRef>>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        effect_params: Option<Vec<String>>,
    },
    Pii {
        base: Box<Type>,
        sensitivity: PiiSensitivity,
        category: String,
    },
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Name { name } | Type::Var { name } | Type::EffectVar { name } => {
                f.write_str(name)
            }
            Type::Maybe { inner } => write!(f, "Maybe<{inner}>"),
            Type::Option { inner } => write!(f, "Option<{inner}>"),
            Type::Result { ok, err } => write!(f, "Result<{ok}, {err}>"),
            Type::List { inner } => write!(f, "List<{inner}>"),
            Type::Map { key, value } => write!(f, "Map<{key}, {value}>"),
            Type::App { base, args } => {
                write!(f, "{base}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")
            }
            Type::Func { params, ret, .. } => {
                write!(f, "(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {ret}")
            }
            Type::Pii {
                base,
                sensitivity,
                category,
            } => write!(f, "Pii<{base}, {sensitivity}, {category}>"),
        }
    }
}

impl Type {
    pub fn name(name: impl Into<String>) -> Type {
        Type::Name { name: name.into() }
    }

    pub fn unknown() -> Type {
        Type::name("Unknown")
    }

    pub fn unit() -> Type {
        Type::name("Unit")
    }

    pub fn int() -> Type {
        Type::name("Int")
    }

    pub fn long() -> Type {
        Type::name("Long")
    }

    pub fn double() -> Type {
        Type::name("Double")
    }

    pub fn bool() -> Type {
        Type::name("Bool")
    }

    pub fn text() -> Type {
        Type::name("Text")
    }

    pub fn maybe(inner: Type) -> Type {
        Type::Maybe { inner: Box::new(inner) }
    }

    pub fn option(inner: Type) -> Type {
        Type::Option { inner: Box::new(inner) }
    }

    pub fn result(ok: Type, err: Type) -> Type {
        Type::Result {
            ok: Box::new(ok),
            err: Box::new(err),
        }
    }

    pub fn list(inner: Type) -> Type {
        Type::List { inner: Box::new(inner) }
    }

    pub fn map(key: Type, value: Type) -> Type {
        Type::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn func(params: Vec<Type>, ret: Type) -> Type {
        Type::Func {
            params,
            ret: Box::new(ret),
            declared_effects: None,
            effect_params: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Name { name } if name == "Unknown")
    }

    /// Strip a PII decorator, if present.
    pub fn without_pii(&self) -> &Type {
        match self {
            Type::Pii { base, .. } => base,
            other => other,
        }
    }
}
