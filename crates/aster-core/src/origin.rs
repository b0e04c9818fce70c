//! Source origins for Core IR nodes.

use aster_common::{Pos, Span};
use serde::{Deserialize, Serialize};

/// Points a Core IR node back at the source that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file: Option<String>,
    pub start: Pos,
    pub end: Pos,
}

impl Origin {
    pub fn from_span(file: Option<&str>, span: Span) -> Self {
        Self {
            file: file.map(|f| f.to_string()),
            start: span.start,
            end: span.end,
        }
    }

    /// The covered source range as a span.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}
