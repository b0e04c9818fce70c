//! Diagnostic rendering for the CLI.
//!
//! The core produces structured diagnostics; rendering stays at the driver
//! boundary. Line/column spans are mapped to byte offsets for ariadne.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use aster_common::{Diagnostic, Pos, Severity};

/// Maps 1-based line/column positions to byte offsets in a source text.
struct LineIndex {
    /// Byte offset of the start of each line.
    line_starts: Vec<usize>,
    len: usize,
    lines: Vec<String>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: source.len(),
            lines: source.split('\n').map(|l| l.to_string()).collect(),
        }
    }

    fn offset(&self, pos: Pos) -> usize {
        let line = (pos.line as usize).saturating_sub(1);
        let Some(start) = self.line_starts.get(line).copied() else {
            return self.len;
        };
        let col = (pos.col as usize).saturating_sub(1);
        let line_text = self.lines.get(line).map(|l| l.as_str()).unwrap_or("");
        let byte_in_line = line_text
            .char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(line_text.len());
        (start + byte_in_line).min(self.len)
    }
}

fn report_kind(severity: Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Info | Severity::Hint => ReportKind::Advice,
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Info | Severity::Hint => Color::Cyan,
    }
}

/// Render one diagnostic to a string.
pub fn render_diagnostic(
    diag: &Diagnostic,
    source: &str,
    file: &str,
    color: bool,
) -> String {
    let index = LineIndex::new(source);
    let start = index.offset(diag.span.start);
    let end = index.offset(diag.span.end).max(start + 1);
    let id = file.to_string();

    let mut builder = Report::build(report_kind(diag.severity), (id.clone(), start..end))
        .with_config(Config::default().with_color(color))
        .with_code(diag.code.as_str())
        .with_message(&diag.message)
        .with_label(
            Label::new((id.clone(), start..end))
                .with_message(&diag.message)
                .with_color(severity_color(diag.severity)),
        );
    for related in &diag.related {
        let r_start = index.offset(related.span.start);
        let r_end = index.offset(related.span.end).max(r_start + 1);
        builder = builder.with_label(
            Label::new((id.clone(), r_start..r_end)).with_message(&related.message),
        );
    }

    let mut out = Vec::new();
    builder
        .finish()
        .write((id, Source::from(source)), &mut out)
        .expect("writing a report to a Vec cannot fail");
    String::from_utf8_lossy(&out).into_owned()
}

/// Render every diagnostic, in order.
pub fn render_all(diags: &[Diagnostic], source: &str, file: &str, color: bool) -> String {
    diags
        .iter()
        .map(|d| render_diagnostic(d, source, file, color))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use aster_common::{ErrorCode, Span};

    #[test]
    fn renders_code_and_message() {
        let source = "Rule f, produce Int:\n  Return x.\n";
        let diag = Diagnostic::error(
            ErrorCode::UNDEFINED_VARIABLE,
            "`x` is not defined",
            Span::new(Pos::new(2, 10), Pos::new(2, 11)),
        );
        let out = render_diagnostic(&diag, source, "test.aster", false);
        assert!(out.contains("UNDEFINED_VARIABLE"));
        assert!(out.contains("`x` is not defined"));
        assert!(out.contains("test.aster"));
    }

    #[test]
    fn line_index_maps_multibyte_columns() {
        let index = LineIndex::new("ab\n\u{6a21}\u{5757} x\n");
        // Line 2, column 3 is the space after the two CJK characters.
        assert_eq!(index.offset(Pos::new(2, 3)), 3 + 6);
    }
}
