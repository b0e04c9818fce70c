//! Structured diagnostics.
//!
//! The type checker accumulates [`Diagnostic`] records instead of aborting;
//! the earlier pipeline stages raise a single fatal [`crate::CompileError`]
//! which the library boundary converts into a one-element diagnostic list.
//! Every diagnostic carries a stable [`ErrorCode`] so tooling can match on
//! codes rather than message text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// Stable machine-readable identifiers for every diagnostic the compiler
/// can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ErrorCode {
    // Lexer
    UNEXPECTED_CHARACTER,
    INDENTATION_ERROR,
    UNTERMINATED_STRING,
    // Parser
    EXPECT_PERIOD,
    EXPECT_COLON,
    EXPECT_KEYWORD,
    EXPECT_IDENT,
    UNEXPECTED_TOKEN,
    // Lowering
    UNKNOWN_EFFECT,
    UNKNOWN_DECL_KIND,
    UNKNOWN_STMT_KIND,
    UNKNOWN_EXPR_KIND,
    UNKNOWN_PATTERN_KIND,
    UNKNOWN_TYPE_KIND,
    // Symbols and types
    DUPLICATE_SYMBOL,
    UNDEFINED_VARIABLE,
    TYPE_MISMATCH_ASSIGN,
    RETURN_TYPE_MISMATCH,
    MATCH_BRANCH_MISMATCH,
    MATCH_NONEXHAUSTIVE,
    MATCH_INT_NO_WILDCARD,
    AWAIT_TYPE,
    UNKNOWN_TYPE,
    UNKNOWN_FIELD,
    FIELD_TYPE_MISMATCH,
    MISSING_REQUIRED_FIELD,
    TYPE_VAR_UNDECLARED,
    TYPEVAR_LIKE_UNDECLARED,
    TYPE_PARAM_UNUSED,
    EFFECT_VAR_UNDECLARED,
    CALL_ARITY,
    CALL_ARG_TYPE,
    // Effects
    EFF_MISSING_IO,
    EFF_MISSING_CPU,
    EFF_SUPERFLUOUS_IO,
    EFF_SUPERFLUOUS_CPU,
    // Capabilities
    CAPABILITY_NOT_DECLARED,
    CAPABILITY_NOT_ALLOWED,
    // PII
    PII_LEAK_HTTP,
    PII_LEAK_SQL,
    PII_LEAK_FILES,
    PII_LEAK_LOG,
    // Workflow
    WORKFLOW_UNKNOWN_STEP_DEPENDENCY,
    WORKFLOW_CIRCULAR_DEPENDENCY,
    WORKFLOW_COMPENSATE_MISSING,
    WORKFLOW_RETRY_TOO_MANY,
    WORKFLOW_TIMEOUT_OUT_OF_RANGE,
    // Modules
    UNDEFINED_MODULE,
    MODULE_CYCLE,
    // Envelope
    UNSUPPORTED_VERSION,
    MALFORMED_ENVELOPE,
}

impl ErrorCode {
    /// The stable string form of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UNEXPECTED_CHARACTER => "UNEXPECTED_CHARACTER",
            ErrorCode::INDENTATION_ERROR => "INDENTATION_ERROR",
            ErrorCode::UNTERMINATED_STRING => "UNTERMINATED_STRING",
            ErrorCode::EXPECT_PERIOD => "EXPECT_PERIOD",
            ErrorCode::EXPECT_COLON => "EXPECT_COLON",
            ErrorCode::EXPECT_KEYWORD => "EXPECT_KEYWORD",
            ErrorCode::EXPECT_IDENT => "EXPECT_IDENT",
            ErrorCode::UNEXPECTED_TOKEN => "UNEXPECTED_TOKEN",
            ErrorCode::UNKNOWN_EFFECT => "UNKNOWN_EFFECT",
            ErrorCode::UNKNOWN_DECL_KIND => "UNKNOWN_DECL_KIND",
            ErrorCode::UNKNOWN_STMT_KIND => "UNKNOWN_STMT_KIND",
            ErrorCode::UNKNOWN_EXPR_KIND => "UNKNOWN_EXPR_KIND",
            ErrorCode::UNKNOWN_PATTERN_KIND => "UNKNOWN_PATTERN_KIND",
            ErrorCode::UNKNOWN_TYPE_KIND => "UNKNOWN_TYPE_KIND",
            ErrorCode::DUPLICATE_SYMBOL => "DUPLICATE_SYMBOL",
            ErrorCode::UNDEFINED_VARIABLE => "UNDEFINED_VARIABLE",
            ErrorCode::TYPE_MISMATCH_ASSIGN => "TYPE_MISMATCH_ASSIGN",
            ErrorCode::RETURN_TYPE_MISMATCH => "RETURN_TYPE_MISMATCH",
            ErrorCode::MATCH_BRANCH_MISMATCH => "MATCH_BRANCH_MISMATCH",
            ErrorCode::MATCH_NONEXHAUSTIVE => "MATCH_NONEXHAUSTIVE",
            ErrorCode::MATCH_INT_NO_WILDCARD => "MATCH_INT_NO_WILDCARD",
            ErrorCode::AWAIT_TYPE => "AWAIT_TYPE",
            ErrorCode::UNKNOWN_TYPE => "UNKNOWN_TYPE",
            ErrorCode::UNKNOWN_FIELD => "UNKNOWN_FIELD",
            ErrorCode::FIELD_TYPE_MISMATCH => "FIELD_TYPE_MISMATCH",
            ErrorCode::MISSING_REQUIRED_FIELD => "MISSING_REQUIRED_FIELD",
            ErrorCode::TYPE_VAR_UNDECLARED => "TYPE_VAR_UNDECLARED",
            ErrorCode::TYPEVAR_LIKE_UNDECLARED => "TYPEVAR_LIKE_UNDECLARED",
            ErrorCode::TYPE_PARAM_UNUSED => "TYPE_PARAM_UNUSED",
            ErrorCode::EFFECT_VAR_UNDECLARED => "EFFECT_VAR_UNDECLARED",
            ErrorCode::CALL_ARITY => "CALL_ARITY",
            ErrorCode::CALL_ARG_TYPE => "CALL_ARG_TYPE",
            ErrorCode::EFF_MISSING_IO => "EFF_MISSING_IO",
            ErrorCode::EFF_MISSING_CPU => "EFF_MISSING_CPU",
            ErrorCode::EFF_SUPERFLUOUS_IO => "EFF_SUPERFLUOUS_IO",
            ErrorCode::EFF_SUPERFLUOUS_CPU => "EFF_SUPERFLUOUS_CPU",
            ErrorCode::CAPABILITY_NOT_DECLARED => "CAPABILITY_NOT_DECLARED",
            ErrorCode::CAPABILITY_NOT_ALLOWED => "CAPABILITY_NOT_ALLOWED",
            ErrorCode::PII_LEAK_HTTP => "PII_LEAK_HTTP",
            ErrorCode::PII_LEAK_SQL => "PII_LEAK_SQL",
            ErrorCode::PII_LEAK_FILES => "PII_LEAK_FILES",
            ErrorCode::PII_LEAK_LOG => "PII_LEAK_LOG",
            ErrorCode::WORKFLOW_UNKNOWN_STEP_DEPENDENCY => "WORKFLOW_UNKNOWN_STEP_DEPENDENCY",
            ErrorCode::WORKFLOW_CIRCULAR_DEPENDENCY => "WORKFLOW_CIRCULAR_DEPENDENCY",
            ErrorCode::WORKFLOW_COMPENSATE_MISSING => "WORKFLOW_COMPENSATE_MISSING",
            ErrorCode::WORKFLOW_RETRY_TOO_MANY => "WORKFLOW_RETRY_TOO_MANY",
            ErrorCode::WORKFLOW_TIMEOUT_OUT_OF_RANGE => "WORKFLOW_TIMEOUT_OUT_OF_RANGE",
            ErrorCode::UNDEFINED_MODULE => "UNDEFINED_MODULE",
            ErrorCode::MODULE_CYCLE => "MODULE_CYCLE",
            ErrorCode::UNSUPPORTED_VERSION => "UNSUPPORTED_VERSION",
            ErrorCode::MALFORMED_ENVELOPE => "MALFORMED_ENVELOPE",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic severity. Errors invalidate the compile for code generation;
/// warnings do not; info and hints are advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

/// Extra context attached to a diagnostic, pointing at a related location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Related {
    pub span: Span,
    pub message: String,
}

/// A single structured diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub related: Vec<Related>,
}

impl Diagnostic {
    pub fn error(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            span,
            origin: None,
            related: Vec::new(),
        }
    }

    pub fn warning(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, message, span)
        }
    }

    pub fn info(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Info,
            ..Self::error(code, message, span)
        }
    }

    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.related.push(Related { span, message: message.into() });
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} at {}", self.code, self.message, self.span)
    }
}

/// Accumulates diagnostics for one compile.
///
/// One builder is acquired per pipeline run and released when the pipeline
/// returns. `finish()` sorts stably by span start so diagnostic order always
/// follows source order regardless of which checker pass emitted them.
#[derive(Debug, Default)]
pub struct DiagnosticsBuilder {
    diags: Vec<Diagnostic>,
}

impl DiagnosticsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diag: Diagnostic) {
        self.diags.push(diag);
    }

    pub fn error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        self.push(Diagnostic::error(code, message, span));
    }

    pub fn warning(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        self.push(Diagnostic::warning(code, message, span));
    }

    pub fn info(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        self.push(Diagnostic::info(code, message, span));
    }

    pub fn has_errors(&self) -> bool {
        self.diags.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn len(&self) -> usize {
        self.diags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diags.is_empty()
    }

    /// Sort stably by span start and return the accumulated diagnostics.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.diags.sort_by_key(|d| d.span.start);
        self.diags
    }
}
