//! The versioned JSON envelope wrapping a Core module.
//!
//! ```json
//! { "version": "1.0",
//!   "module": { "kind": "Module", "name": "...", "decls": [...] },
//!   "metadata": { "generatedAt": "...", "source": "...", "compilerVersion": "..." } }
//! ```
//!
//! Deserialization rejects unsupported versions, a missing `module`, a
//! non-array `module.decls`, and `module.kind != "Module"`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ir::CoreModule;

/// The envelope version this build reads and writes.
pub const ENVELOPE_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub version: String,
    pub module: CoreModule,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "generatedAt")]
    pub generated_at: String,
    pub source: String,
    #[serde(rename = "compilerVersion")]
    pub compiler_version: String,
}

/// Why an envelope failed to deserialize.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeError {
    UnsupportedVersion(String),
    MissingModule,
    BadModuleKind(String),
    DeclsNotArray,
    Malformed(String),
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeError::UnsupportedVersion(v) => {
                write!(f, "unsupported envelope version `{v}`, expected `{ENVELOPE_VERSION}`")
            }
            EnvelopeError::MissingModule => write!(f, "envelope is missing `module`"),
            EnvelopeError::BadModuleKind(k) => {
                write!(f, "module kind must be `Module`, found `{k}`")
            }
            EnvelopeError::DeclsNotArray => write!(f, "`module.decls` must be an array"),
            EnvelopeError::Malformed(msg) => write!(f, "malformed envelope: {msg}"),
        }
    }
}

impl std::error::Error for EnvelopeError {}

impl EnvelopeError {
    /// The stable diagnostic code for this failure.
    pub fn code(&self) -> aster_common::ErrorCode {
        match self {
            EnvelopeError::UnsupportedVersion(_) => aster_common::ErrorCode::UNSUPPORTED_VERSION,
            _ => aster_common::ErrorCode::MALFORMED_ENVELOPE,
        }
    }
}

impl Envelope {
    /// Wrap a module, stamping generation metadata.
    pub fn new(module: CoreModule, source: impl Into<String>) -> Self {
        Self {
            version: ENVELOPE_VERSION.to_string(),
            module,
            metadata: Metadata {
                generated_at: chrono::Utc::now().to_rfc3339(),
                source: source.into(),
                compiler_version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("envelope serialization cannot fail")
    }

    /// Parse and validate an envelope.
    pub fn from_json(text: &str) -> Result<Envelope, EnvelopeError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| EnvelopeError::Malformed(e.to_string()))?;

        let version = value
            .get("version")
            .and_then(|v| v.as_str())
            .ok_or_else(|| EnvelopeError::Malformed("missing `version`".into()))?;
        if version != ENVELOPE_VERSION {
            return Err(EnvelopeError::UnsupportedVersion(version.to_string()));
        }

        let module = value.get("module").ok_or(EnvelopeError::MissingModule)?;
        if module.is_null() {
            return Err(EnvelopeError::MissingModule);
        }
        let kind = module.get("kind").and_then(|k| k.as_str()).unwrap_or("");
        if kind != "Module" {
            return Err(EnvelopeError::BadModuleKind(kind.to_string()));
        }
        match module.get("decls") {
            Some(decls) if decls.is_array() => {}
            _ => return Err(EnvelopeError::DeclsNotArray),
        }

        serde_json::from_value(value).map_err(|e| EnvelopeError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Origin;
    use aster_common::{Pos, Span};

    fn sample_module() -> CoreModule {
        CoreModule {
            name: "demo".into(),
            decls: Vec::new(),
            origin: Origin::from_span(
                Some("demo.aster"),
                Span::new(Pos::new(1, 1), Pos::new(1, 20)),
            ),
        }
    }

    #[test]
    fn round_trip_preserves_envelope() {
        let env = Envelope::new(sample_module(), "demo.aster");
        let json = env.to_json();
        let back = Envelope::from_json(&json).unwrap();
        assert_eq!(env, back);
    }

    #[test]
    fn module_serializes_with_kind_tag() {
        let env = Envelope::new(sample_module(), "demo.aster");
        let value: serde_json::Value = serde_json::from_str(&env.to_json()).unwrap();
        assert_eq!(value["module"]["kind"], "Module");
        assert_eq!(value["version"], ENVELOPE_VERSION);
    }

    #[test]
    fn rejects_unsupported_version() {
        let env = Envelope::new(sample_module(), "demo.aster");
        let json = env.to_json().replace("\"version\": \"1.0\"", "\"version\": \"9.9\"");
        assert_eq!(
            Envelope::from_json(&json),
            Err(EnvelopeError::UnsupportedVersion("9.9".into()))
        );
    }

    #[test]
    fn rejects_missing_module() {
        let json = format!("{{\"version\": \"{ENVELOPE_VERSION}\"}}");
        assert_eq!(Envelope::from_json(&json), Err(EnvelopeError::MissingModule));
    }

    #[test]
    fn rejects_wrong_module_kind() {
        let json = format!(
            "{{\"version\": \"{ENVELOPE_VERSION}\", \"module\": {{\"kind\": \"Program\", \"decls\": []}}}}"
        );
        assert_eq!(
            Envelope::from_json(&json),
            Err(EnvelopeError::BadModuleKind("Program".into()))
        );
    }

    #[test]
    fn rejects_non_array_decls() {
        let json = format!(
            "{{\"version\": \"{ENVELOPE_VERSION}\", \"module\": {{\"kind\": \"Module\", \"decls\": 5}}}}"
        );
        assert_eq!(Envelope::from_json(&json), Err(EnvelopeError::DeclsNotArray));
    }

    #[test]
    fn errors_map_to_stable_codes() {
        assert_eq!(
            EnvelopeError::UnsupportedVersion("9.9".into()).code(),
            aster_common::ErrorCode::UNSUPPORTED_VERSION
        );
        assert_eq!(
            EnvelopeError::MissingModule.code(),
            aster_common::ErrorCode::MALFORMED_ENVELOPE
        );
    }
}
