//! Token types produced by the Aster lexer.
//!
//! Tokens carry their original source text (casing preserved, so tooling can
//! echo the source), a span, and a channel tag. Comments ride the trivia
//! channel and never reach the parser's significant stream.

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// The closed set of token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// A word recognized by the active lexicon's keyword table.
    Keyword,
    /// A lowercase-initial identifier.
    Ident,
    /// A capitalized identifier (type or module segment).
    TypeIdent,
    Int,
    Long,
    Float,
    Str,
    Bool,
    Null,
    Dot,
    Colon,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Equals,
    Lt,
    Gt,
    Newline,
    Indent,
    Dedent,
    Comment,
    Eof,
}

/// Which stream a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    Main,
    Trivia,
}

/// Whether a comment shares its line with preceding code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentPlacement {
    /// A non-trivia token preceded the comment on the same line.
    Inline,
    /// The comment is the first thing on its line.
    Standalone,
}

/// A single lexed token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Original source text. Empty for synthetic tokens (Indent/Dedent/Eof).
    pub text: String,
    pub span: Span,
    pub channel: Channel,
    /// Set only for Comment tokens.
    pub placement: Option<CommentPlacement>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            channel: Channel::Main,
            placement: None,
        }
    }

    /// A comment token on the trivia channel.
    pub fn comment(text: impl Into<String>, span: Span, placement: CommentPlacement) -> Self {
        Self {
            kind: TokenKind::Comment,
            text: text.into(),
            span,
            channel: Channel::Trivia,
            placement: Some(placement),
        }
    }

    /// Whether the token is on the trivia channel.
    pub fn is_trivia(&self) -> bool {
        self.channel == Channel::Trivia
    }

    /// The token text lowercased, for keyword comparisons.
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }

    /// Whether this is a keyword token matching `word` case-insensitively.
    pub fn is_kw(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.lower() == word
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{Pos, Span};

    fn span() -> Span {
        Span::new(Pos::new(1, 1), Pos::new(1, 5))
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let tok = Token::new(TokenKind::Keyword, "Return", span());
        assert!(tok.is_kw("return"));
        assert!(!tok.is_kw("define"));
    }

    #[test]
    fn comment_rides_trivia_channel() {
        let tok = Token::comment("# note", span(), CommentPlacement::Standalone);
        assert!(tok.is_trivia());
        assert_eq!(tok.placement, Some(CommentPlacement::Standalone));
    }

    #[test]
    fn plain_tokens_are_main_channel() {
        let tok = Token::new(TokenKind::Ident, "name", span());
        assert!(!tok.is_trivia());
        assert_eq!(tok.placement, None);
    }
}
