//! Fatal compile errors.
//!
//! The lexer, parser, and lowering abort on the first structural failure
//! with a positioned [`CompileError`]. The library boundary surfaces one of
//! these as a single-element diagnostic list with `success = false`.

use std::fmt;

use serde::Serialize;

use crate::diag::{Diagnostic, ErrorCode};
use crate::span::Span;

/// A fatal, positioned error raised by the canonicalize/lex/parse/lower
/// stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl CompileError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
        }
    }

    /// Convert into the diagnostic record the library boundary reports.
    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::error(self.code, self.message, self.span)
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} at {}", self.code, self.message, self.span)
    }
}

impl std::error::Error for CompileError {}
