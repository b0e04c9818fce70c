//! Function-level PII aggregation.
//!
//! Collects PII decorations across parameter and return types, flattening
//! through every container. The summary keeps the highest sensitivity and
//! the union of categories.

use std::collections::BTreeSet;

use aster_common::PiiSensitivity;
use aster_core::{PiiSummary, Type};

/// Aggregate PII metadata over a function signature. Returns `None` when no
/// PII type occurs anywhere.
pub fn summarize(param_types: &[&Type], ret: &Type) -> Option<PiiSummary> {
    let mut highest: Option<PiiSensitivity> = None;
    let mut categories = BTreeSet::new();
    for ty in param_types {
        collect(ty, &mut highest, &mut categories);
    }
    collect(ret, &mut highest, &mut categories);
    highest.map(|sensitivity| PiiSummary {
        sensitivity,
        categories: categories.into_iter().collect(),
    })
}

fn collect(ty: &Type, highest: &mut Option<PiiSensitivity>, categories: &mut BTreeSet<String>) {
    match ty {
        Type::Pii {
            base,
            sensitivity,
            category,
        } => {
            *highest = Some(match *highest {
                Some(current) => current.max(*sensitivity),
                None => *sensitivity,
            });
            categories.insert(category.clone());
            collect(base, highest, categories);
        }
        Type::Maybe { inner } | Type::Option { inner } | Type::List { inner } => {
            collect(inner, highest, categories);
        }
        Type::Result { ok, err } => {
            collect(ok, highest, categories);
            collect(err, highest, categories);
        }
        Type::Map { key, value } => {
            collect(key, highest, categories);
            collect(value, highest, categories);
        }
        Type::App { args, .. } => {
            for arg in args {
                collect(arg, highest, categories);
            }
        }
        Type::Func { params, ret, .. } => {
            for param in params {
                collect(param, highest, categories);
            }
            collect(ret, highest, categories);
        }
        Type::Name { .. } | Type::Var { .. } | Type::EffectVar { .. } => {}
    }
}
