// Aster common -- shared types used by every compiler stage.

pub mod diag;
pub mod error;
pub mod lang;
pub mod span;
pub mod token;

pub use diag::{Diagnostic, DiagnosticsBuilder, ErrorCode, Related, Severity};
pub use error::CompileError;
pub use lang::{Capability, Effect, PiiSensitivity};
pub use span::{Pos, Span};
pub use token::{Channel, CommentPlacement, Token, TokenKind};
