//! Source canonicalization.
//!
//! Normalizes prose source before lexing: line endings, smart quotes,
//! interior whitespace, multi-word keyword casing, removable function words
//! (English articles), and optional domain identifier substitution.
//!
//! String literals and comment bodies are protected regions: the word-level
//! transformations never alter them. Canonicalization is idempotent and
//! never fails.

use aster_lexicon::{DomainTable, Lexicon};

/// Canonicalize `source` for the given lexicon and optional domain table.
pub fn canonicalize(source: &str, lexicon: &Lexicon, domain: Option<&DomainTable>) -> String {
    let text = normalize_endings_and_quotes(source);
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&canonicalize_line(line, lexicon, domain));
    }
    out
}

fn normalize_endings_and_quotes(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            _ => out.push(c),
        }
    }
    out
}

/// A run of line text that is either open to transformation or protected
/// (string literal or comment).
struct Segment {
    text: String,
    protected: bool,
}

fn canonicalize_line(line: &str, lexicon: &Lexicon, domain: Option<&DomainTable>) -> String {
    let body_start = line
        .char_indices()
        .find(|(_, c)| *c != ' ' && *c != '\t')
        .map(|(i, _)| i)
        .unwrap_or(line.len());
    let (leading, body) = line.split_at(body_start);

    let mut out = String::with_capacity(line.len());
    out.push_str(leading);
    for segment in split_protected(body) {
        if segment.protected {
            out.push_str(&segment.text);
        } else {
            let mut text = collapse_spaces(&segment.text);
            text = strip_space_before_punct(&text);
            text = lowercase_phrases(&text, lexicon.multiword_phrases());
            text = remove_articles(&text, lexicon);
            if let Some(table) = domain {
                text = substitute_domain(&text, table);
            }
            out.push_str(&text);
        }
    }
    out
}

/// Split a line body into protected (string/comment) and open segments.
fn split_protected(body: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars().peekable();
    loop {
        match chars.peek().copied() {
            None => break,
            Some('"') => {
                if !current.is_empty() {
                    segments.push(Segment { text: std::mem::take(&mut current), protected: false });
                }
                // Consume the whole string literal, escapes included. An
                // unterminated literal protects the rest of the line; the
                // lexer reports it.
                let mut lit = String::new();
                lit.push(chars.next().unwrap());
                while let Some(c) = chars.next() {
                    lit.push(c);
                    if c == '\\' {
                        if let Some(esc) = chars.next() {
                            lit.push(esc);
                        }
                    } else if c == '"' {
                        break;
                    }
                }
                segments.push(Segment { text: lit, protected: true });
            }
            Some('#') => {
                if !current.is_empty() {
                    segments.push(Segment { text: std::mem::take(&mut current), protected: false });
                }
                segments.push(Segment { text: chars.by_ref().collect(), protected: true });
            }
            Some('/') => {
                let mut ahead = chars.clone();
                ahead.next();
                if ahead.peek() == Some(&'/') {
                    if !current.is_empty() {
                        segments.push(Segment { text: std::mem::take(&mut current), protected: false });
                    }
                    segments.push(Segment { text: chars.by_ref().collect(), protected: true });
                } else {
                    current.push(chars.next().unwrap());
                }
            }
            Some(_) => current.push(chars.next().unwrap()),
        }
    }
    if !current.is_empty() {
        segments.push(Segment { text: current, protected: false });
    }
    segments
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c == ' ' || c == '\t' {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

fn strip_space_before_punct(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '.' | ',' | ':') && out.ends_with(' ') {
            out.pop();
        }
        out.push(c);
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lowercase each occurrence of the given multi-word phrases in place,
/// case-insensitively, greedily longest-first, on word boundaries.
fn lowercase_phrases(text: &str, phrases: &[String]) -> String {
    let mut out = text.to_string();
    for phrase in phrases {
        let lower: Vec<char> = out.to_lowercase().chars().collect();
        let phrase_chars: Vec<char> = phrase.chars().collect();
        let original: Vec<char> = out.chars().collect();
        // Guard: lowercasing must not change the character count for the
        // in-place splice below to line up.
        if lower.len() != original.len() {
            continue;
        }
        let mut result: Vec<char> = Vec::with_capacity(original.len());
        let mut i = 0;
        while i < original.len() {
            if matches_at(&lower, i, &phrase_chars)
                && boundary_before(&lower, i)
                && boundary_after(&lower, i + phrase_chars.len())
            {
                result.extend(phrase_chars.iter());
                i += phrase_chars.len();
            } else {
                result.push(original[i]);
                i += 1;
            }
        }
        out = result.into_iter().collect();
    }
    out
}

fn matches_at(haystack: &[char], at: usize, needle: &[char]) -> bool {
    haystack.len() >= at + needle.len() && &haystack[at..at + needle.len()] == needle
}

fn boundary_before(chars: &[char], at: usize) -> bool {
    at == 0 || !is_word_char(chars[at - 1])
}

fn boundary_after(chars: &[char], at: usize) -> bool {
    at >= chars.len() || !is_word_char(chars[at])
}

/// Remove the removable function words (articles) as whole words,
/// case-insensitively, merging the surrounding whitespace.
///
/// Single-letter names collide with the article "a", so an article is only
/// dropped when the following word is a plain (non-keyword) word: `a value`
/// loses its article while `step a depends on`, `Wait for a and b`, and
/// `Let a be 1` keep theirs. The keyword `function` is the one exception,
/// so `a function with ...` still sheds its article.
fn remove_articles(text: &str, lexicon: &Lexicon) -> String {
    let removable = lexicon.removable_words();
    if removable.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        let word_len = rest.chars().take_while(|c| is_word_char(*c)).count();
        if word_len == 0 {
            let mut chars = rest.chars();
            let c = chars.next().unwrap();
            // Merge a space that would double up after a removed word.
            if !(c == ' ' && out.ends_with(' ')) {
                out.push(c);
            }
            rest = chars.as_str();
            continue;
        }
        let split = rest
            .char_indices()
            .nth(word_len)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (word, tail) = rest.split_at(split);
        let lower = word.to_lowercase();
        if removable.iter().any(|r| r == &lower) && article_position(tail, lexicon) {
            // Drop the word and one following space, if any.
            rest = tail.strip_prefix(' ').unwrap_or(tail);
            // Also avoid leaving a trailing space before punctuation.
            if rest.starts_with(['.', ',', ':']) && out.ends_with(' ') {
                out.pop();
            }
        } else {
            out.push_str(word);
            rest = tail;
        }
    }
    out
}

/// Whether the text after a candidate article reads like an article
/// position: the next word must be a plain word, not a keyword (except
/// `function`). Punctuation or end of line means the candidate is a name.
fn article_position(tail: &str, lexicon: &Lexicon) -> bool {
    let after = tail.trim_start_matches(' ');
    let next: String = after.chars().take_while(|c| is_word_char(*c)).collect();
    if next.is_empty() {
        return false;
    }
    let lower = next.to_lowercase();
    lower == "function" || !lexicon.is_keyword(&lower)
}

/// Substitute localized domain identifiers with their canonical names,
/// matching whole word runs.
fn substitute_domain(text: &str, table: &DomainTable) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        let word_len = rest.chars().take_while(|c| is_word_char(*c)).count();
        if word_len == 0 {
            let mut chars = rest.chars();
            out.push(chars.next().unwrap());
            rest = chars.as_str();
            continue;
        }
        let split = rest
            .char_indices()
            .nth(word_len)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (word, tail) = rest.split_at(split);
        match table.get(word) {
            Some(canonical) => out.push_str(canonical),
            None => out.push_str(word),
        }
        rest = tail;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(s: &str) -> String {
        canonicalize(s, &Lexicon::english(), None)
    }

    #[test]
    fn normalizes_line_endings_and_quotes() {
        assert_eq!(canon("x\r\ny\rz"), "x\ny\nz");
        assert_eq!(canon("\u{201C}hi\u{201D}"), "\"hi\"");
    }

    #[test]
    fn collapses_interior_whitespace_preserving_leading() {
        assert_eq!(canon("  Return   1 ."), "  Return 1.");
    }

    #[test]
    fn lowercases_multiword_phrases() {
        assert_eq!(canon("Define R As One Of A, B."), "Define R as one of A, B.");
        assert_eq!(canon("It Performs io."), "it performs io.");
    }

    #[test]
    fn removes_articles_as_whole_words() {
        assert_eq!(canon("Return the value."), "Return value.");
        // "Theory" must not lose its prefix.
        assert_eq!(canon("Return Theory."), "Return Theory.");
    }

    #[test]
    fn single_letter_names_survive_article_removal() {
        assert_eq!(canon("step a depends on"), "step a depends on");
        assert_eq!(canon("Wait for a and b."), "Wait for a and b.");
        assert_eq!(canon("Let a be 1."), "Let a be 1.");
        assert_eq!(canon("step a:"), "step a:");
    }

    #[test]
    fn article_before_function_is_removed() {
        assert_eq!(
            canon("Let f be a function with x: Int produce Int:"),
            "Let f be function with x: Int produce Int:"
        );
    }

    #[test]
    fn protects_string_literals() {
        assert_eq!(
            canon("Return \"the  quick answer\"."),
            "Return \"the  quick answer\"."
        );
    }

    #[test]
    fn protects_comments() {
        assert_eq!(canon("# the answer"), "# the answer");
        assert_eq!(canon("Return 1. // the end"), "Return 1. // the end");
    }

    #[test]
    fn substitutes_domain_identifiers() {
        let mut table = DomainTable::new();
        table.insert("\u{9a7e}\u{9a76}\u{5458}", "Driver");
        let out = canonicalize(
            "Define \u{9a7e}\u{9a76}\u{5458} with name: Text.",
            &Lexicon::english(),
            Some(&table),
        );
        assert_eq!(out, "Define Driver with name: Text.");
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "This Module Is demo.\nRule f given x: Int, produce Int:\n  Return x plus 1.",
            "Define R as one of A, B or C.",
            "Return \"a  b\" . # the comment",
        ];
        for input in inputs {
            let once = canon(input);
            assert_eq!(canon(&once), once, "not idempotent for {input:?}");
        }
    }
}
