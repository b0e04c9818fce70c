//! Pattern parsing.

use aster_common::{CompileError, ErrorCode, TokenKind};

use super::Parser;
use crate::ast::{Pattern, PatternKind};

impl Parser {
    pub(crate) fn parse_pattern(&mut self) -> Result<Pattern, CompileError> {
        let tok = self.current().clone();
        match tok.kind {
            TokenKind::Null => {
                self.bump();
                Ok(Pattern { kind: PatternKind::Null, span: tok.span })
            }
            TokenKind::Int => {
                self.bump();
                let value = tok.text.parse::<i64>().map_err(|_| {
                    CompileError::new(
                        ErrorCode::UNEXPECTED_TOKEN,
                        format!("integer literal `{}` out of range", tok.text),
                        tok.span,
                    )
                })?;
                Ok(Pattern { kind: PatternKind::Int(value), span: tok.span })
            }
            TokenKind::Keyword => {
                // `Ok`, `Err`, `Some`, `None` lex as keywords; in pattern
                // position they name the built-in constructors.
                let ctor = match tok.lower().as_str() {
                    "ok" => "Ok",
                    "err" => "Err",
                    "some" => "Some",
                    "none" => "None",
                    _ => {
                        return Err(self.err(ErrorCode::UNEXPECTED_TOKEN, "expected a pattern"));
                    }
                };
                self.bump();
                let args = self.parse_ctor_args()?;
                Ok(Pattern {
                    kind: PatternKind::Ctor {
                        type_name: ctor.to_string(),
                        names: Vec::new(),
                        args,
                    },
                    span: tok.span.cover(self.prev_span()),
                })
            }
            TokenKind::TypeIdent => {
                self.bump();
                let args = self.parse_ctor_args()?;
                Ok(Pattern {
                    kind: PatternKind::Ctor {
                        type_name: tok.text,
                        names: Vec::new(),
                        args,
                    },
                    span: tok.span.cover(self.prev_span()),
                })
            }
            TokenKind::Ident => {
                self.bump();
                Ok(Pattern { kind: PatternKind::Name(tok.text), span: tok.span })
            }
            _ => Err(self.err(ErrorCode::UNEXPECTED_TOKEN, "expected a pattern")),
        }
    }

    /// Nested constructor arguments: `(p1, p2, ...)` or nothing.
    fn parse_ctor_args(&mut self) -> Result<Vec<Pattern>, CompileError> {
        if !self.at(TokenKind::LParen) {
            return Ok(Vec::new());
        }
        self.bump();
        let mut args = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                args.push(self.parse_pattern()?);
                if self.eat(TokenKind::Comma) {
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RParen, ErrorCode::UNEXPECTED_TOKEN, "`)`")?;
        Ok(args)
    }
}
