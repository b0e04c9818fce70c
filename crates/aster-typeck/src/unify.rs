//! Structural equality, subtyping, unification, and alias expansion over
//! Core IR types.
//!
//! Unification binds type variables into a [`Bindings`] map and never
//! mutates its inputs. `Unknown` is the permissive top: it compares equal
//! to every type unless strict comparison is requested.

use aster_common::Effect;
use aster_core::Type;
use rustc_hash::{FxHashMap, FxHashSet};

/// Type-variable bindings accumulated during unification.
pub type Bindings = FxHashMap<String, Type>;

/// Structural equality. With `strict` false, `Unknown` equals any type.
/// `FuncType` compares declared effects and effect params element-wise,
/// treating `None` and an empty list as equivalent.
pub fn types_equal(a: &Type, b: &Type, strict: bool) -> bool {
    if !strict && (a.is_unknown() || b.is_unknown()) {
        return true;
    }
    match (a, b) {
        (Type::Name { name: na }, Type::Name { name: nb }) => na == nb,
        (Type::Var { name: na }, Type::Var { name: nb }) => na == nb,
        (Type::EffectVar { name: na }, Type::EffectVar { name: nb }) => na == nb,
        (Type::Maybe { inner: ia }, Type::Maybe { inner: ib })
        | (Type::Option { inner: ia }, Type::Option { inner: ib })
        | (Type::List { inner: ia }, Type::List { inner: ib }) => types_equal(ia, ib, strict),
        (Type::Result { ok: oa, err: ea }, Type::Result { ok: ob, err: eb }) => {
            types_equal(oa, ob, strict) && types_equal(ea, eb, strict)
        }
        (Type::Map { key: ka, value: va }, Type::Map { key: kb, value: vb }) => {
            types_equal(ka, kb, strict) && types_equal(va, vb, strict)
        }
        (Type::App { base: ba, args: aa }, Type::App { base: bb, args: ab }) => {
            ba == bb
                && aa.len() == ab.len()
                && aa.iter().zip(ab).all(|(x, y)| types_equal(x, y, strict))
        }
        (
            Type::Func {
                params: pa,
                ret: ra,
                declared_effects: da,
                effect_params: ea,
            },
            Type::Func {
                params: pb,
                ret: rb,
                declared_effects: db,
                effect_params: eb,
            },
        ) => {
            pa.len() == pb.len()
                && pa.iter().zip(pb).all(|(x, y)| types_equal(x, y, strict))
                && types_equal(ra, rb, strict)
                && effects_equal(da, db)
                && params_equal(ea, eb)
        }
        (
            Type::Pii {
                base: ba,
                sensitivity: sa,
                category: ca,
            },
            Type::Pii {
                base: bb,
                sensitivity: sb,
                category: cb,
            },
        ) => sa == sb && ca == cb && types_equal(ba, bb, strict),
        _ => false,
    }
}

fn effects_equal(
    a: &Option<Vec<aster_core::EffectRef>>,
    b: &Option<Vec<aster_core::EffectRef>>,
) -> bool {
    // Undefined and empty are equivalent.
    let ea = a.as_deref().unwrap_or(&[]);
    let eb = b.as_deref().unwrap_or(&[]);
    ea == eb
}

fn params_equal(a: &Option<Vec<String>>, b: &Option<Vec<String>>) -> bool {
    a.as_deref().unwrap_or(&[]) == b.as_deref().unwrap_or(&[])
}

/// Subtyping. `Maybe<T>` and `Option<T>` are interchangeable; `Result` is
/// invariant except for `Unknown`; PII decorators are transparent (the
/// leak analysis is separate); `Workflow<R, E>` requires `R` equality and
/// a lattice check on the effect slot.
pub fn is_subtype(sub: &Type, sup: &Type) -> bool {
    if sub.is_unknown() || sup.is_unknown() {
        return true;
    }
    match (sub, sup) {
        // PII is transparent to the type relation.
        (Type::Pii { base, .. }, _) => is_subtype(base, sup),
        (_, Type::Pii { base, .. }) => is_subtype(sub, base),

        // Maybe and Option are interchangeable in both directions.
        (Type::Maybe { inner: a }, Type::Option { inner: b })
        | (Type::Option { inner: a }, Type::Maybe { inner: b })
        | (Type::Maybe { inner: a }, Type::Maybe { inner: b })
        | (Type::Option { inner: a }, Type::Option { inner: b }) => is_subtype(a, b),

        (Type::Result { ok: oa, err: ea }, Type::Result { ok: ob, err: eb }) => {
            invariant(oa, ob) && invariant(ea, eb)
        }
        (Type::List { inner: a }, Type::List { inner: b }) => invariant(a, b),
        (Type::Map { key: ka, value: va }, Type::Map { key: kb, value: vb }) => {
            invariant(ka, kb) && invariant(va, vb)
        }

        (Type::App { base: ba, args: aa }, Type::App { base: bb, args: ab })
            if ba == "Workflow" && bb == "Workflow" =>
        {
            aa.len() == ab.len()
                && aa.first().zip(ab.first()).is_some_and(|(x, y)| types_equal(x, y, false))
                && workflow_effect_fits(aa.get(1), ab.get(1))
        }

        (
            Type::Func {
                params: pa,
                ret: ra,
                ..
            },
            Type::Func {
                params: pb,
                ret: rb,
                ..
            },
        ) => {
            pa.len() == pb.len()
                && pa.iter().zip(pb).all(|(x, y)| invariant(x, y))
                && is_subtype(ra, rb)
        }

        _ => types_equal(sub, sup, false),
    }
}

fn invariant(a: &Type, b: &Type) -> bool {
    is_subtype(a, b) && is_subtype(b, a)
}

/// The effect slot of a `Workflow<R, E>` fits when the subject's effect
/// sits at or below the bound on the lattice; variables fit anything.
fn workflow_effect_fits(sub: Option<&Type>, sup: Option<&Type>) -> bool {
    let (Some(sub), Some(sup)) = (sub, sup) else {
        return sub.is_none() && sup.is_none();
    };
    match (effect_of(sub), effect_of(sup)) {
        (Some(a), Some(b)) => a.rank() <= b.rank(),
        _ => true,
    }
}

fn effect_of(ty: &Type) -> Option<Effect> {
    match ty {
        Type::Name { name } => Effect::parse(&name.to_lowercase()),
        _ => None,
    }
}

/// Bidirectional unification. Binds type variables in `bindings`,
/// recursively unifying arguments; `TypeApp` must match base and arity,
/// `FuncType` must match arity. Returns success; inputs are never mutated.
pub fn unify(a: &Type, b: &Type, bindings: &mut Bindings) -> bool {
    match (a, b) {
        (Type::Var { name }, other) | (other, Type::Var { name }) => {
            if let Some(bound) = bindings.get(name).cloned() {
                return unify(&bound, other, bindings);
            }
            if let Type::Var { name: other_name } = other {
                if other_name == name {
                    return true;
                }
            }
            bindings.insert(name.clone(), other.clone());
            true
        }
        (Type::EffectVar { name }, other) | (other, Type::EffectVar { name }) => {
            if let Some(bound) = bindings.get(name).cloned() {
                return types_equal(&bound, other, false);
            }
            bindings.insert(name.clone(), other.clone());
            true
        }
        _ if a.is_unknown() || b.is_unknown() => true,
        (Type::Name { name: na }, Type::Name { name: nb }) => na == nb,
        (Type::Maybe { inner: ia }, Type::Maybe { inner: ib })
        | (Type::Option { inner: ia }, Type::Option { inner: ib })
        | (Type::Maybe { inner: ia }, Type::Option { inner: ib })
        | (Type::Option { inner: ia }, Type::Maybe { inner: ib })
        | (Type::List { inner: ia }, Type::List { inner: ib }) => unify(ia, ib, bindings),
        (Type::Result { ok: oa, err: ea }, Type::Result { ok: ob, err: eb }) => {
            unify(oa, ob, bindings) && unify(ea, eb, bindings)
        }
        (Type::Map { key: ka, value: va }, Type::Map { key: kb, value: vb }) => {
            unify(ka, kb, bindings) && unify(va, vb, bindings)
        }
        (Type::App { base: ba, args: aa }, Type::App { base: bb, args: ab }) => {
            ba == bb
                && aa.len() == ab.len()
                && aa.iter().zip(ab).all(|(x, y)| unify(x, y, bindings))
        }
        (
            Type::Func {
                params: pa,
                ret: ra,
                ..
            },
            Type::Func {
                params: pb,
                ret: rb,
                ..
            },
        ) => {
            pa.len() == pb.len()
                && pa.iter().zip(pb).all(|(x, y)| unify(x, y, bindings))
                && unify(ra, rb, bindings)
        }
        (Type::Pii { base, .. }, other) | (other, Type::Pii { base, .. }) => {
            unify(base, other, bindings)
        }
        _ => false,
    }
}

/// Apply accumulated bindings to a type.
pub fn substitute(ty: &Type, bindings: &Bindings) -> Type {
    match ty {
        Type::Var { name } | Type::EffectVar { name } => match bindings.get(name) {
            Some(bound) => substitute(bound, bindings),
            None => ty.clone(),
        },
        Type::Maybe { inner } => Type::maybe(substitute(inner, bindings)),
        Type::Option { inner } => Type::option(substitute(inner, bindings)),
        Type::List { inner } => Type::list(substitute(inner, bindings)),
        Type::Result { ok, err } => {
            Type::result(substitute(ok, bindings), substitute(err, bindings))
        }
        Type::Map { key, value } => {
            Type::map(substitute(key, bindings), substitute(value, bindings))
        }
        Type::App { base, args } => Type::App {
            base: base.clone(),
            args: args.iter().map(|a| substitute(a, bindings)).collect(),
        },
        Type::Func {
            params,
            ret,
            declared_effects,
            effect_params,
        } => Type::Func {
            params: params.iter().map(|p| substitute(p, bindings)).collect(),
            ret: Box::new(substitute(ret, bindings)),
            declared_effects: declared_effects.clone(),
            effect_params: effect_params.clone(),
        },
        Type::Pii {
            base,
            sensitivity,
            category,
        } => Type::Pii {
            base: Box::new(substitute(base, bindings)),
            sensitivity: *sensitivity,
            category: category.clone(),
        },
        Type::Name { .. } => ty.clone(),
    }
}

/// Expand type aliases recursively. A visited set stops self-referential
/// aliases; expansion descends into all child types.
pub fn expand_alias(ty: &Type, aliases: &FxHashMap<String, Type>) -> Type {
    let mut visited = FxHashSet::default();
    expand(ty, aliases, &mut visited)
}

fn expand(ty: &Type, aliases: &FxHashMap<String, Type>, visited: &mut FxHashSet<String>) -> Type {
    match ty {
        Type::Name { name } => match aliases.get(name) {
            Some(target) if !visited.contains(name) => {
                visited.insert(name.clone());
                let out = expand(target, aliases, visited);
                visited.remove(name);
                out
            }
            _ => ty.clone(),
        },
        Type::Maybe { inner } => Type::maybe(expand(inner, aliases, visited)),
        Type::Option { inner } => Type::option(expand(inner, aliases, visited)),
        Type::List { inner } => Type::list(expand(inner, aliases, visited)),
        Type::Result { ok, err } => Type::result(
            expand(ok, aliases, visited),
            expand(err, aliases, visited),
        ),
        Type::Map { key, value } => Type::map(
            expand(key, aliases, visited),
            expand(value, aliases, visited),
        ),
        Type::App { base, args } => Type::App {
            base: base.clone(),
            args: args.iter().map(|a| expand(a, aliases, visited)).collect(),
        },
        Type::Func {
            params,
            ret,
            declared_effects,
            effect_params,
        } => Type::Func {
            params: params.iter().map(|p| expand(p, aliases, visited)).collect(),
            ret: Box::new(expand(ret, aliases, visited)),
            declared_effects: declared_effects.clone(),
            effect_params: effect_params.clone(),
        },
        Type::Pii {
            base,
            sensitivity,
            category,
        } => Type::Pii {
            base: Box::new(expand(base, aliases, visited)),
            sensitivity: *sensitivity,
            category: category.clone(),
        },
        Type::Var { .. } | Type::EffectVar { .. } => ty.clone(),
    }
}

/// Whether a type carries a PII decoration anywhere.
pub fn contains_pii(ty: &Type) -> bool {
    match ty {
        Type::Pii { .. } => true,
        Type::Maybe { inner } | Type::Option { inner } | Type::List { inner } => {
            contains_pii(inner)
        }
        Type::Result { ok, err } => contains_pii(ok) || contains_pii(err),
        Type::Map { key, value } => contains_pii(key) || contains_pii(value),
        Type::App { args, .. } => args.iter().any(contains_pii),
        Type::Func { params, ret, .. } => params.iter().any(contains_pii) || contains_pii(ret),
        Type::Name { .. } | Type::Var { .. } | Type::EffectVar { .. } => false,
    }
}
