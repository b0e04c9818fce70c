//! Recursive-descent parser for the Aster controlled natural language.
//!
//! The parser consumes the main-channel token stream (comments never reach
//! it) and produces a span-annotated AST. It does not recover: the first
//! structural failure aborts with a positioned [`CompileError`].
//!
//! # Sentence discipline
//!
//! Declarations and statements end with a period unless they open a block
//! with a colon. After a colon, either a newline plus INDENT opens an
//! indented block, or statements continue inline on the same line until the
//! line ends. `Return` tolerates a missing period at newline/dedent/EOF.

pub(crate) mod expressions;
pub(crate) mod items;
pub(crate) mod patterns;
pub(crate) mod types;

use aster_common::{Channel, CompileError, ErrorCode, Span, Token, TokenKind};

use crate::ast;

/// Parse a token stream into a module AST.
pub fn parse(tokens: &[Token]) -> Result<ast::Module, CompileError> {
    let main: Vec<Token> = tokens
        .iter()
        .filter(|t| t.channel == Channel::Main)
        .cloned()
        .collect();
    let mut parser = Parser::new(main);
    parser.parse_module()
}

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Type parameters declared by the rule currently being parsed; a
    /// name in this list parses as a type variable rather than a type
    /// name.
    pub(crate) type_params: Vec<String>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof)));
        Self {
            tokens,
            pos: 0,
            type_params: Vec::new(),
        }
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn kind(&self) -> TokenKind {
        self.current().kind
    }

    pub(crate) fn nth_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    pub(crate) fn at_kw(&self, word: &str) -> bool {
        self.current().is_kw(word)
    }

    /// Whether the token after the current one is the given keyword.
    pub(crate) fn next_is_kw(&self, word: &str) -> bool {
        self.tokens
            .get(self.pos + 1)
            .is_some_and(|t| t.is_kw(word))
    }

    pub(crate) fn cur_span(&self) -> Span {
        self.current().span
    }

    pub(crate) fn prev_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    // ── Consumption ────────────────────────────────────────────────────

    pub(crate) fn bump(&mut self) -> Token {
        let tok = self.current().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_kw(&mut self, word: &str) -> bool {
        if self.at_kw(word) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(
        &mut self,
        kind: TokenKind,
        code: ErrorCode,
        what: &str,
    ) -> Result<Token, CompileError> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.err(code, format!("expected {what}, found `{}`", self.describe())))
        }
    }

    pub(crate) fn expect_kw(&mut self, word: &str) -> Result<Token, CompileError> {
        if self.at_kw(word) {
            Ok(self.bump())
        } else {
            Err(self.err(
                ErrorCode::EXPECT_KEYWORD,
                format!("expected `{word}`, found `{}`", self.describe()),
            ))
        }
    }

    pub(crate) fn expect_period(&mut self) -> Result<(), CompileError> {
        if self.eat(TokenKind::Dot) {
            Ok(())
        } else {
            Err(self.err(
                ErrorCode::EXPECT_PERIOD,
                format!("expected `.`, found `{}`", self.describe()),
            ))
        }
    }

    pub(crate) fn expect_colon(&mut self) -> Result<(), CompileError> {
        if self.eat(TokenKind::Colon) {
            Ok(())
        } else {
            Err(self.err(
                ErrorCode::EXPECT_COLON,
                format!("expected `:`, found `{}`", self.describe()),
            ))
        }
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.at(TokenKind::Newline) {
            self.bump();
        }
    }

    pub(crate) fn err(&self, code: ErrorCode, message: impl Into<String>) -> CompileError {
        CompileError::new(code, message, self.cur_span())
    }

    fn describe(&self) -> String {
        let tok = self.current();
        match tok.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Newline => "end of line".to_string(),
            TokenKind::Indent => "indent".to_string(),
            TokenKind::Dedent => "dedent".to_string(),
            _ => tok.text.clone(),
        }
    }

    // ── Names ──────────────────────────────────────────────────────────

    /// An identifier (lowercase-initial word).
    pub(crate) fn ident(&mut self, what: &str) -> Result<Token, CompileError> {
        self.expect(TokenKind::Ident, ErrorCode::EXPECT_IDENT, what)
    }

    /// A type name: a `TypeIdent`, or a capitalized keyword word (`Set`,
    /// `Workflow`) reclaimed as a name in type position.
    pub(crate) fn type_name(&mut self) -> Result<Token, CompileError> {
        if self.at(TokenKind::TypeIdent) {
            return Ok(self.bump());
        }
        if self.at(TokenKind::Keyword)
            && self
                .current()
                .text
                .chars()
                .next()
                .is_some_and(|c| c.is_uppercase())
        {
            return Ok(self.bump());
        }
        Err(self.err(
            ErrorCode::EXPECT_IDENT,
            format!("expected a type name, found `{}`", self.describe()),
        ))
    }

    /// A dotted name: `demo`, `acme.billing`, `Map.get`. A trailing period
    /// is left in place: the dot is only consumed when a plain word
    /// follows, or a keyword word directly followed by `(` (so `List.map(`
    /// reads as a call while `x. Set y` keeps its sentence period).
    pub(crate) fn dotted_name(&mut self) -> Result<(String, Span), CompileError> {
        let capitalized_kw = self.at(TokenKind::Keyword)
            && self
                .current()
                .text
                .chars()
                .next()
                .is_some_and(|c| c.is_uppercase());
        let first = if self.at(TokenKind::Ident) || self.at(TokenKind::TypeIdent) || capitalized_kw
        {
            self.bump()
        } else {
            return Err(self.err(
                ErrorCode::EXPECT_IDENT,
                format!("expected a name, found `{}`", self.describe()),
            ));
        };
        let mut text = first.text.clone();
        let mut span = first.span;
        while self.at(TokenKind::Dot) {
            let take = match self.nth_kind(1) {
                TokenKind::Ident | TokenKind::TypeIdent => true,
                TokenKind::Keyword => self.nth_kind(2) == TokenKind::LParen,
                _ => false,
            };
            if !take {
                break;
            }
            self.bump(); // dot
            let seg = self.bump();
            text.push('.');
            text.push_str(&seg.text);
            span = span.cover(seg.span);
        }
        Ok((text, span))
    }

    /// An integer literal value.
    pub(crate) fn int_lit(&mut self) -> Result<(i64, Span), CompileError> {
        let tok = self.expect(TokenKind::Int, ErrorCode::UNEXPECTED_TOKEN, "an integer")?;
        let value = tok.text.parse::<i64>().map_err(|_| {
            CompileError::new(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("integer literal `{}` out of range", tok.text),
                tok.span,
            )
        })?;
        Ok((value, tok.span))
    }

    // ── Module ─────────────────────────────────────────────────────────

    fn parse_module(&mut self) -> Result<ast::Module, CompileError> {
        let start = self.cur_span();
        self.skip_newlines();

        let name = if self.at_kw("module") {
            self.bump();
            let (name, _) = self.dotted_name()?;
            self.expect_period()?;
            Some(name)
        } else if self.at_kw("this") {
            self.bump();
            self.expect_kw("module")?;
            self.expect_kw("is")?;
            let (name, _) = self.dotted_name()?;
            self.expect_period()?;
            Some(name)
        } else {
            None
        };

        let mut decls = Vec::new();
        loop {
            self.skip_newlines();
            if self.at(TokenKind::Eof) {
                break;
            }
            decls.push(self.parse_decl()?);
        }

        Ok(ast::Module {
            name,
            decls,
            span: start.cover(self.prev_span()),
        })
    }
}
