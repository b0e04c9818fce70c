//! Match exhaustiveness checking.

use aster_common::{Diagnostic, ErrorCode, Span};
use aster_core::{CoreArm, CorePatternKind, Type};
use rustc_hash::FxHashMap;

/// Check one match statement for coverage. Returns at most one diagnostic.
///
/// - Enum scrutinees need every variant or a binding wildcard.
/// - `Result` needs `Ok` and `Err`; `Option`/`Maybe` need `Some` and
///   `None`.
/// - Integer matches without a wildcard get a warning.
pub fn check_match(
    scrutinee_ty: &Type,
    arms: &[CoreArm],
    enums: &FxHashMap<String, Vec<String>>,
    span: Span,
) -> Option<Diagnostic> {
    let has_wildcard = arms.iter().any(|arm| {
        matches!(arm.pattern.kind, CorePatternKind::Name { .. })
    });
    if has_wildcard {
        return None;
    }

    let ctor_names: Vec<&str> = arms
        .iter()
        .filter_map(|arm| match &arm.pattern.kind {
            CorePatternKind::Ctor { type_name, .. } => Some(type_name.as_str()),
            _ => None,
        })
        .collect();

    match scrutinee_ty.without_pii() {
        Type::Name { name } => {
            if let Some(variants) = enums.get(name) {
                let missing: Vec<&str> = variants
                    .iter()
                    .map(|v| v.as_str())
                    .filter(|v| !ctor_names.contains(v))
                    .collect();
                if !missing.is_empty() {
                    return Some(Diagnostic::error(
                        ErrorCode::MATCH_NONEXHAUSTIVE,
                        format!(
                            "match on `{name}` is not exhaustive; missing variants: {}",
                            missing.join(", ")
                        ),
                        span,
                    ));
                }
            } else if name == "Int" || name == "Long" {
                return int_warning(arms, span);
            }
            None
        }
        Type::Result { .. } => {
            require_ctors(&ctor_names, &["Ok", "Err"], "Result", span)
        }
        Type::Option { .. } | Type::Maybe { .. } => {
            require_ctors(&ctor_names, &["Some", "None"], "Option", span)
        }
        _ => None,
    }
}

fn require_ctors(
    present: &[&str],
    needed: &[&str],
    what: &str,
    span: Span,
) -> Option<Diagnostic> {
    let missing: Vec<&str> = needed
        .iter()
        .copied()
        .filter(|n| !present.contains(n))
        .collect();
    if missing.is_empty() {
        None
    } else {
        Some(Diagnostic::error(
            ErrorCode::MATCH_NONEXHAUSTIVE,
            format!(
                "match on `{what}` is not exhaustive; missing constructors: {}",
                missing.join(", ")
            ),
            span,
        ))
    }
}

fn int_warning(arms: &[CoreArm], span: Span) -> Option<Diagnostic> {
    let all_ints = arms
        .iter()
        .all(|arm| matches!(arm.pattern.kind, CorePatternKind::Int { .. }));
    if all_ints && !arms.is_empty() {
        Some(Diagnostic::warning(
            ErrorCode::MATCH_INT_NO_WILDCARD,
            "integer match has no wildcard arm; unmatched values fall through",
            span,
        ))
    } else {
        None
    }
}
