//! The built-in function table.
//!
//! Dotted standard-library names with their signatures, effect sets, and
//! capabilities. Collection builtins use `Unknown` in element positions;
//! `Unknown` compatibility keeps them permissive while arity and
//! capability checks stay strict.

use aster_common::{Capability, Effect, ErrorCode};
use aster_core::Type;

/// A built-in function signature.
#[derive(Debug, Clone)]
pub struct BuiltinSig {
    pub params: Vec<Type>,
    pub ret: Type,
    pub effects: Vec<Effect>,
    pub capability: Option<Capability>,
    /// Whether PII may flow into this callee without a leak diagnostic.
    pub pii_safe: bool,
}

impl BuiltinSig {
    fn pure(params: Vec<Type>, ret: Type) -> Self {
        Self {
            params,
            ret,
            effects: Vec::new(),
            capability: None,
            pii_safe: true,
        }
    }

    fn io(params: Vec<Type>, ret: Type, capability: Option<Capability>) -> Self {
        Self {
            params,
            ret,
            effects: vec![Effect::Io],
            capability,
            pii_safe: false,
        }
    }
}

/// Look up a built-in by its dotted name.
pub fn lookup(name: &str) -> Option<BuiltinSig> {
    use Capability as Cap;
    let text = Type::text;
    let sig = match name {
        // Text
        "Text.length" => BuiltinSig::pure(vec![text()], Type::int()),
        "Text.concat" => BuiltinSig::pure(vec![text(), text()], text()),
        "Text.upper" | "Text.lower" | "Text.trim" => BuiltinSig::pure(vec![text()], text()),
        "Text.replace" => BuiltinSig::pure(vec![text(), text(), text()], text()),
        "Text.contains" | "Text.startsWith" | "Text.endsWith" => {
            BuiltinSig::pure(vec![text(), text()], Type::bool())
        }

        // List
        "List.length" => BuiltinSig::pure(vec![Type::list(Type::unknown())], Type::int()),
        "List.append" => BuiltinSig::pure(
            vec![Type::list(Type::unknown()), Type::unknown()],
            Type::list(Type::unknown()),
        ),
        "List.get" => BuiltinSig::pure(
            vec![Type::list(Type::unknown()), Type::int()],
            Type::option(Type::unknown()),
        ),
        "List.map" => BuiltinSig::pure(
            vec![
                Type::list(Type::unknown()),
                Type::func(vec![Type::unknown()], Type::unknown()),
            ],
            Type::list(Type::unknown()),
        ),

        // Map
        "Map.get" => BuiltinSig::pure(
            vec![Type::map(Type::unknown(), Type::unknown()), Type::unknown()],
            Type::option(Type::unknown()),
        ),
        "Map.put" => BuiltinSig::pure(
            vec![
                Type::map(Type::unknown(), Type::unknown()),
                Type::unknown(),
                Type::unknown(),
            ],
            Type::map(Type::unknown(), Type::unknown()),
        ),
        "Map.size" => BuiltinSig::pure(
            vec![Type::map(Type::unknown(), Type::unknown())],
            Type::int(),
        ),

        "UUID.randomUUID" => BuiltinSig::pure(vec![], text()),

        // IO (the logging channel for PII purposes)
        "IO.print" | "IO.println" | "IO.log" => BuiltinSig::io(vec![text()], Type::unit(), None),
        "IO.read" => BuiltinSig::io(vec![], text(), None),

        // Http
        "Http.get" => BuiltinSig::io(vec![text()], text(), Some(Cap::Http)),
        "Http.post" => BuiltinSig::io(vec![text(), text()], text(), Some(Cap::Http)),

        // Sql
        "Db.query" | "Sql.query" => {
            BuiltinSig::io(vec![text()], Type::list(Type::unknown()), Some(Cap::Sql))
        }
        "Db.execute" | "Sql.execute" => BuiltinSig::io(vec![text()], Type::int(), Some(Cap::Sql)),

        // Files
        "Files.read" | "Fs.read" => BuiltinSig::io(vec![text()], text(), Some(Cap::Files)),
        "Files.write" | "Fs.write" => {
            BuiltinSig::io(vec![text(), text()], Type::unit(), Some(Cap::Files))
        }

        "Secrets.get" => BuiltinSig::io(vec![text()], text(), Some(Cap::Secrets)),

        "Time.now" | "Clock.now" => BuiltinSig::io(vec![], Type::long(), Some(Cap::Time)),

        "Ai.complete" => BuiltinSig::io(vec![text()], text(), Some(Cap::AiModel)),

        "Payment.charge" | "Payment.refund" => BuiltinSig::io(
            vec![text(), Type::int()],
            Type::result(text(), text()),
            Some(Cap::Payment),
        ),

        "Inventory.reserve" | "Inventory.release" => BuiltinSig::io(
            vec![text(), Type::int()],
            Type::result(Type::bool(), text()),
            Some(Cap::Inventory),
        ),

        _ => return None,
    };
    Some(sig)
}

/// The PII leak code for a call-target prefix.
pub fn leak_code_for_prefix(prefix: &str) -> Option<ErrorCode> {
    match prefix {
        "Http" => Some(ErrorCode::PII_LEAK_HTTP),
        "Db" | "Sql" => Some(ErrorCode::PII_LEAK_SQL),
        "Files" | "Fs" => Some(ErrorCode::PII_LEAK_FILES),
        "IO" => Some(ErrorCode::PII_LEAK_LOG),
        _ => None,
    }
}

/// The PII leak code for a capability carried by a user-defined callee.
pub fn leak_code_for_capability(cap: Capability) -> ErrorCode {
    match cap {
        Capability::Http => ErrorCode::PII_LEAK_HTTP,
        Capability::Sql => ErrorCode::PII_LEAK_SQL,
        Capability::Files => ErrorCode::PII_LEAK_FILES,
        _ => ErrorCode::PII_LEAK_LOG,
    }
}
