//! Expression parsing.
//!
//! Precedence, weakest to strongest: `not`, comparisons (`less than`,
//! `greater than`, `equals to`, `at least`, `at most`, chained
//! left-associatively), additive (`plus`, `minus`), multiplicative
//! (`times`, `divided by`), primary. Operator keywords parse directly into
//! calls on operator names; there is no operator node.

use aster_common::{CompileError, ErrorCode, TokenKind};

use super::Parser;
use crate::ast::{Expr, ExprKind, LambdaBody, LambdaExpr, Param, TypeExpr};

impl Parser {
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, CompileError> {
        self.parse_not()
    }

    fn parse_not(&mut self) -> Result<Expr, CompileError> {
        if self.at_kw("not") {
            let start = self.bump().span;
            let operand = self.parse_not()?;
            let span = start.cover(operand.span);
            return Ok(Expr::call_named("not", vec![operand], span));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = if self.at_kw("less") && self.next_is_kw("than") {
                "<"
            } else if self.at_kw("greater") && self.next_is_kw("than") {
                ">"
            } else if self.at_kw("equals") && self.next_is_kw("to") {
                "=="
            } else if self.at_kw("at") && self.next_is_kw("least") {
                ">="
            } else if self.at_kw("at") && self.next_is_kw("most") {
                "<="
            } else {
                break;
            };
            self.bump();
            self.bump();
            let rhs = self.parse_additive()?;
            let span = lhs.span.cover(rhs.span);
            lhs = Expr::call_named(op, vec![lhs, rhs], span);
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = if self.at_kw("plus") {
                "+"
            } else if self.at_kw("minus") {
                "-"
            } else {
                break;
            };
            self.bump();
            let rhs = self.parse_multiplicative()?;
            let span = lhs.span.cover(rhs.span);
            lhs = Expr::call_named(op, vec![lhs, rhs], span);
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_primary()?;
        loop {
            let op = if self.at_kw("times") {
                "*"
            } else if self.at_kw("divided") && self.next_is_kw("by") {
                self.bump();
                "/"
            } else {
                break;
            };
            self.bump();
            let rhs = self.parse_primary()?;
            let span = lhs.span.cover(rhs.span);
            lhs = Expr::call_named(op, vec![lhs, rhs], span);
        }
        Ok(lhs)
    }

    fn parse_primary(&mut self) -> Result<Expr, CompileError> {
        let tok = self.current().clone();
        match tok.kind {
            TokenKind::Int => {
                self.bump();
                let value = tok.text.parse::<i64>().map_err(|_| {
                    CompileError::new(
                        ErrorCode::UNEXPECTED_TOKEN,
                        format!("integer literal `{}` out of range", tok.text),
                        tok.span,
                    )
                })?;
                Ok(Expr { kind: ExprKind::Int(value), span: tok.span })
            }
            TokenKind::Long => {
                self.bump();
                let digits = tok.text.trim_end_matches('L');
                let value = digits.parse::<i64>().map_err(|_| {
                    CompileError::new(
                        ErrorCode::UNEXPECTED_TOKEN,
                        format!("long literal `{}` out of range", tok.text),
                        tok.span,
                    )
                })?;
                Ok(Expr { kind: ExprKind::Long(value), span: tok.span })
            }
            TokenKind::Float => {
                self.bump();
                let value = tok.text.parse::<f64>().map_err(|_| {
                    CompileError::new(
                        ErrorCode::UNEXPECTED_TOKEN,
                        format!("malformed float literal `{}`", tok.text),
                        tok.span,
                    )
                })?;
                Ok(Expr { kind: ExprKind::Float(value), span: tok.span })
            }
            TokenKind::Str => {
                self.bump();
                Ok(Expr { kind: ExprKind::Str(tok.text), span: tok.span })
            }
            TokenKind::Bool => {
                self.bump();
                let value = tok.text.to_lowercase() == "true";
                Ok(Expr { kind: ExprKind::Bool(value), span: tok.span })
            }
            TokenKind::Null => {
                self.bump();
                Ok(Expr { kind: ExprKind::Null, span: tok.span })
            }
            TokenKind::Keyword => self.parse_keyword_primary(),
            TokenKind::LParen => {
                if self.lambda_ahead() {
                    self.parse_short_lambda()
                } else {
                    self.bump();
                    let inner = self.parse_expr()?;
                    self.expect(TokenKind::RParen, ErrorCode::UNEXPECTED_TOKEN, "`)`")?;
                    Ok(inner)
                }
            }
            TokenKind::TypeIdent => {
                if self.next_is_kw("with") && self.construct_ahead() {
                    self.parse_construct()
                } else {
                    self.parse_name_or_call()
                }
            }
            TokenKind::Ident => self.parse_name_or_call(),
            _ => Err(self.err(ErrorCode::UNEXPECTED_TOKEN, "expected an expression")),
        }
    }

    fn parse_keyword_primary(&mut self) -> Result<Expr, CompileError> {
        let tok = self.current().clone();
        let lower = tok.lower();
        match lower.as_str() {
            "ok" | "err" | "some" if self.next_is_kw("of") => {
                self.bump();
                self.bump();
                let inner = self.parse_expr()?;
                let span = tok.span.cover(inner.span);
                let kind = match lower.as_str() {
                    "ok" => ExprKind::OkOf(Box::new(inner)),
                    "err" => ExprKind::ErrOf(Box::new(inner)),
                    _ => ExprKind::SomeOf(Box::new(inner)),
                };
                Ok(Expr { kind, span })
            }
            "none" => {
                self.bump();
                Ok(Expr { kind: ExprKind::NoneLit, span: tok.span })
            }
            "await" => {
                self.bump();
                self.expect(TokenKind::LParen, ErrorCode::UNEXPECTED_TOKEN, "`(` after `await`")?;
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, ErrorCode::UNEXPECTED_TOKEN, "`)`")?;
                let span = tok.span.cover(self.prev_span());
                Ok(Expr { kind: ExprKind::Await(Box::new(inner)), span })
            }
            "function" => self.parse_block_lambda(),
            _ => {
                // A capitalized keyword word starting a dotted path names a
                // builtin namespace: `Map.get(...)`, `Set.size(...)`.
                let capitalized = tok.text.chars().next().is_some_and(|c| c.is_uppercase());
                if capitalized && self.nth_kind(1) == TokenKind::Dot {
                    return self.parse_name_or_call();
                }
                Err(self.err(ErrorCode::UNEXPECTED_TOKEN, "expected an expression"))
            }
        }
    }

    /// `function with x: Int and y: Int produce Int: <block>`
    fn parse_block_lambda(&mut self) -> Result<Expr, CompileError> {
        let start = self.expect_kw("function")?.span;
        let mut params = Vec::new();
        if self.eat_kw("with") {
            loop {
                let name_tok = self.ident("a parameter name")?;
                let (ty, inferred) = if self.eat(TokenKind::Colon) {
                    (self.parse_type()?, false)
                } else {
                    (TypeExpr::unknown(name_tok.span), true)
                };
                params.push(Param {
                    name: name_tok.text,
                    span: name_tok.span.cover(self.prev_span()),
                    ty,
                    constraints: Vec::new(),
                    type_inferred: inferred,
                });
                if self.eat_kw("and") || self.eat(TokenKind::Comma) {
                    continue;
                }
                break;
            }
        }
        self.expect_kw("produce")?;
        let ret = self.parse_type()?;
        self.expect_colon()?;
        let body = self.parse_block()?;
        let span = start.cover(self.prev_span());
        Ok(Expr {
            kind: ExprKind::Lambda(LambdaExpr {
                params,
                ret: Some(ret),
                body: LambdaBody::Block(body),
            }),
            span,
        })
    }

    /// Whether the parenthesized group starting here is a short lambda:
    /// scan to the matching `)` and look for `=` `>` after it.
    fn lambda_ahead(&self) -> bool {
        let mut depth = 0usize;
        let mut i = 0usize;
        loop {
            match self.nth_kind(i) {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return self.nth_kind(i + 1) == TokenKind::Equals
                            && self.nth_kind(i + 2) == TokenKind::Gt;
                    }
                }
                TokenKind::Eof | TokenKind::Newline => return false,
                _ => {}
            }
            i += 1;
        }
    }

    /// `(x: T, y: T) => expr`
    fn parse_short_lambda(&mut self) -> Result<Expr, CompileError> {
        let start = self.bump().span; // (
        let mut params = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                let name_tok = self.ident("a parameter name")?;
                let (ty, inferred) = if self.eat(TokenKind::Colon) {
                    (self.parse_type()?, false)
                } else {
                    (TypeExpr::unknown(name_tok.span), true)
                };
                params.push(Param {
                    name: name_tok.text,
                    span: name_tok.span.cover(self.prev_span()),
                    ty,
                    constraints: Vec::new(),
                    type_inferred: inferred,
                });
                if self.eat(TokenKind::Comma) {
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RParen, ErrorCode::UNEXPECTED_TOKEN, "`)`")?;
        self.expect(TokenKind::Equals, ErrorCode::UNEXPECTED_TOKEN, "`=>`")?;
        self.expect(TokenKind::Gt, ErrorCode::UNEXPECTED_TOKEN, "`=>`")?;
        let body = self.parse_expr()?;
        let span = start.cover(body.span);
        Ok(Expr {
            kind: ExprKind::Lambda(LambdaExpr {
                params,
                ret: None,
                body: LambdaBody::Expr(Box::new(body)),
            }),
            span,
        })
    }

    /// Whether `T with` here begins a construction (`T with f = e`), as
    /// opposed to some other use of `with`.
    fn construct_ahead(&self) -> bool {
        self.nth_kind(2) == TokenKind::Ident && self.nth_kind(3) == TokenKind::Equals
    }

    /// `T with f = e and g = e`
    fn parse_construct(&mut self) -> Result<Expr, CompileError> {
        let name_tok = self.bump(); // TypeIdent
        self.expect_kw("with")?;
        let mut fields = Vec::new();
        loop {
            let field = self.ident("a field name")?.text;
            self.expect(TokenKind::Equals, ErrorCode::UNEXPECTED_TOKEN, "`=`")?;
            let value = self.parse_expr()?;
            fields.push((field, value));
            if self.eat_kw("and") {
                continue;
            }
            break;
        }
        let span = name_tok.span.cover(self.prev_span());
        Ok(Expr {
            kind: ExprKind::Construct {
                type_name: name_tok.text,
                fields,
            },
            span,
        })
    }

    /// A dotted name, optionally followed by a parenthesized argument list.
    fn parse_name_or_call(&mut self) -> Result<Expr, CompileError> {
        let (name, span) = self.dotted_name()?;
        let target = Expr::name(name, span);
        if self.at(TokenKind::LParen) {
            self.bump();
            let mut args = Vec::new();
            if !self.at(TokenKind::RParen) {
                loop {
                    args.push(self.parse_expr()?);
                    if self.eat(TokenKind::Comma) {
                        continue;
                    }
                    break;
                }
            }
            self.expect(TokenKind::RParen, ErrorCode::UNEXPECTED_TOKEN, "`)`")?;
            let call_span = span.cover(self.prev_span());
            return Ok(Expr {
                kind: ExprKind::Call {
                    target: Box::new(target),
                    args,
                },
                span: call_span,
            });
        }
        Ok(target)
    }
}
