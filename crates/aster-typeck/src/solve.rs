//! Constraint solver.
//!
//! Collects `Equals` and `Subtype` constraints and solves them by iterated
//! unification and subtype checks over a bindings map. Returns `None` on
//! the first conflict.

use aster_core::Type;

use crate::unify::{is_subtype, substitute, unify, Bindings};

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Equals(Type, Type),
    Subtype(Type, Type),
}

/// Solve a constraint set. Equality constraints bind type variables;
/// subtype constraints are checked after substitution.
pub fn solve(constraints: &[Constraint]) -> Option<Bindings> {
    let mut bindings = Bindings::default();
    for constraint in constraints {
        if let Constraint::Equals(a, b) = constraint {
            if !unify(a, b, &mut bindings) {
                return None;
            }
        }
    }
    for constraint in constraints {
        if let Constraint::Subtype(sub, sup) = constraint {
            let sub = substitute(sub, &bindings);
            let sup = substitute(sup, &bindings);
            if !is_subtype(&sub, &sup) {
                return None;
            }
        }
    }
    Some(bindings)
}
