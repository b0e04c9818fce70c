//! Pattern nodes.

use aster_common::Span;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PatternKind {
    Null,
    Int(i64),
    /// A bare identifier: binds the scrutinee (acts as a wildcard).
    Name(String),
    /// A constructor pattern: `Ok(n)`, `Some(Point(x, y))`, or a bare
    /// variant `A`.
    ///
    /// `args` carries nested patterns; `names` is the legacy flat-bindings
    /// form. The parser only produces `args`, but readers tolerate both.
    Ctor {
        type_name: String,
        names: Vec<String>,
        args: Vec<Pattern>,
    },
}

impl Pattern {
    /// The variable names this pattern binds, in order.
    pub fn bindings(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_bindings(&mut out);
        out
    }

    fn collect_bindings<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.kind {
            PatternKind::Null | PatternKind::Int(_) => {}
            PatternKind::Name(name) => out.push(name),
            PatternKind::Ctor { names, args, .. } => {
                for name in names {
                    out.push(name);
                }
                for arg in args {
                    arg.collect_bindings(out);
                }
            }
        }
    }
}
