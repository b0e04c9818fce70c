//! Surface type expressions to Core IR types.

use aster_core::Type;
use aster_parser::ast::{TypeExpr, TypeExprKind};

/// Lower a surface type. Nested PII decorators are flattened so a `Pii`
/// base is never itself `Pii`; the outer category wins and the higher
/// sensitivity survives.
pub fn lower_type(ty: &TypeExpr) -> Type {
    match &ty.kind {
        TypeExprKind::Name(name) => Type::Name { name: name.clone() },
        TypeExprKind::Var(name) => Type::Var { name: name.clone() },
        TypeExprKind::EffectVar(name) => Type::EffectVar { name: name.clone() },
        TypeExprKind::Maybe(inner) => Type::maybe(lower_type(inner)),
        TypeExprKind::Option(inner) => Type::option(lower_type(inner)),
        TypeExprKind::Result(ok, err) => Type::result(lower_type(ok), lower_type(err)),
        TypeExprKind::List(inner) => Type::list(lower_type(inner)),
        TypeExprKind::Map(key, value) => Type::map(lower_type(key), lower_type(value)),
        TypeExprKind::App { base, args } => Type::App {
            base: base.clone(),
            args: args.iter().map(lower_type).collect(),
        },
        TypeExprKind::Func { params, ret } => {
            Type::func(params.iter().map(lower_type).collect(), lower_type(ret))
        }
        TypeExprKind::Pii {
            base,
            sensitivity,
            category,
        } => {
            let lowered = lower_type(base);
            let (flat_base, sensitivity) = match lowered {
                Type::Pii {
                    base: inner_base,
                    sensitivity: inner_sens,
                    ..
                } => (*inner_base, (*sensitivity).max(inner_sens)),
                other => (other, *sensitivity),
            };
            Type::Pii {
                base: Box::new(flat_base),
                sensitivity,
                category: category.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aster_common::{PiiSensitivity, Pos, Span};

    fn at() -> Span {
        Span::point(Pos::new(1, 1))
    }

    fn pii(base: TypeExpr, sensitivity: PiiSensitivity, category: &str) -> TypeExpr {
        TypeExpr {
            kind: TypeExprKind::Pii {
                base: Box::new(base),
                sensitivity,
                category: category.into(),
            },
            span: at(),
        }
    }

    #[test]
    fn nested_pii_flattens() {
        let nested = pii(
            pii(TypeExpr::named("Text", at()), PiiSensitivity::L3, "ssn"),
            PiiSensitivity::L1,
            "id",
        );
        match lower_type(&nested) {
            Type::Pii {
                base,
                sensitivity,
                category,
            } => {
                assert_eq!(*base, Type::text());
                assert_eq!(sensitivity, PiiSensitivity::L3);
                assert_eq!(category, "id");
            }
            other => panic!("expected pii, got {other:?}"),
        }
    }

    #[test]
    fn containers_lower_structurally() {
        let ty = TypeExpr {
            kind: TypeExprKind::Result(
                Box::new(TypeExpr::named("Int", at())),
                Box::new(TypeExpr::named("Text", at())),
            ),
            span: at(),
        };
        assert_eq!(lower_type(&ty), Type::result(Type::int(), Type::text()));
    }
}
