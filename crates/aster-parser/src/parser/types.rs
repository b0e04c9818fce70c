//! Type expression parsing.
//!
//! Two surface styles are accepted: the bracket style (`List<Int>`,
//! `Result<Int, Text>`, `Pii<Text, L2, email>`) and the prose style
//! (`list of Int`, `result of Int and Text`, `option of Text`).

use aster_common::{CompileError, ErrorCode, PiiSensitivity, TokenKind};

use super::items::is_effect_var_name;
use super::Parser;
use crate::ast::{TypeExpr, TypeExprKind};

impl Parser {
    pub(crate) fn parse_type(&mut self) -> Result<TypeExpr, CompileError> {
        let tok = self.current().clone();

        if tok.kind == TokenKind::Keyword {
            let lower = tok.lower();
            match lower.as_str() {
                "option" | "maybe" | "list" if self.next_is_kw("of") => {
                    self.bump();
                    self.bump();
                    let inner = self.parse_type()?;
                    let span = tok.span.cover(inner.span);
                    let kind = match lower.as_str() {
                        "option" => TypeExprKind::Option(Box::new(inner)),
                        "maybe" => TypeExprKind::Maybe(Box::new(inner)),
                        _ => TypeExprKind::List(Box::new(inner)),
                    };
                    return Ok(TypeExpr { kind, span });
                }
                "map" | "result" if self.next_is_kw("of") => {
                    self.bump();
                    self.bump();
                    let first = self.parse_type()?;
                    self.expect_kw("and")?;
                    let second = self.parse_type()?;
                    let span = tok.span.cover(second.span);
                    let kind = if lower == "map" {
                        TypeExprKind::Map(Box::new(first), Box::new(second))
                    } else {
                        TypeExprKind::Result(Box::new(first), Box::new(second))
                    };
                    return Ok(TypeExpr { kind, span });
                }
                "function" => {
                    self.bump();
                    let mut params = Vec::new();
                    if self.eat_kw("with") {
                        loop {
                            params.push(self.parse_type()?);
                            if self.eat_kw("and") || self.eat(TokenKind::Comma) {
                                continue;
                            }
                            break;
                        }
                    }
                    self.expect_kw("produce")?;
                    let ret = self.parse_type()?;
                    let span = tok.span.cover(ret.span);
                    return Ok(TypeExpr {
                        kind: TypeExprKind::Func {
                            params,
                            ret: Box::new(ret),
                        },
                        span,
                    });
                }
                _ => {}
            }
        }

        // Named types, including capitalized keyword words (`Set`,
        // `Workflow`) reclaimed as names in type position.
        let name_tok = self.type_name()?;
        let name = name_tok.text.clone();

        if name == "Pii" && self.at(TokenKind::Lt) {
            self.bump();
            let base = self.parse_type()?;
            self.expect(TokenKind::Comma, ErrorCode::UNEXPECTED_TOKEN, "`,`")?;
            let level_tok = self.type_name()?;
            let sensitivity = PiiSensitivity::parse(&level_tok.text).ok_or_else(|| {
                CompileError::new(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected L1, L2, or L3, found `{}`", level_tok.text),
                    level_tok.span,
                )
            })?;
            self.expect(TokenKind::Comma, ErrorCode::UNEXPECTED_TOKEN, "`,`")?;
            let category = if self.at(TokenKind::Ident) || self.at(TokenKind::TypeIdent) {
                self.bump().text
            } else if self.at(TokenKind::Keyword) {
                self.bump().lower()
            } else {
                return Err(self.err(ErrorCode::UNEXPECTED_TOKEN, "expected a PII category"));
            };
            self.expect(TokenKind::Gt, ErrorCode::UNEXPECTED_TOKEN, "`>`")?;
            return Ok(TypeExpr {
                kind: TypeExprKind::Pii {
                    base: Box::new(base),
                    sensitivity,
                    category: category.to_lowercase(),
                },
                span: name_tok.span.cover(self.prev_span()),
            });
        }

        if self.at(TokenKind::Lt) {
            self.bump();
            let mut args = Vec::new();
            loop {
                args.push(self.parse_type()?);
                if self.eat(TokenKind::Comma) {
                    continue;
                }
                break;
            }
            self.expect(TokenKind::Gt, ErrorCode::UNEXPECTED_TOKEN, "`>`")?;
            let span = name_tok.span.cover(self.prev_span());
            let arity = args.len();
            let kind = if name == "Maybe" && arity == 1 {
                TypeExprKind::Maybe(Box::new(args.remove(0)))
            } else if name == "Option" && arity == 1 {
                TypeExprKind::Option(Box::new(args.remove(0)))
            } else if name == "List" && arity == 1 {
                TypeExprKind::List(Box::new(args.remove(0)))
            } else if name == "Result" && arity == 2 {
                let err = args.pop().expect("arity checked");
                let ok = args.pop().expect("arity checked");
                TypeExprKind::Result(Box::new(ok), Box::new(err))
            } else if name == "Map" && arity == 2 {
                let value = args.pop().expect("arity checked");
                let key = args.pop().expect("arity checked");
                TypeExprKind::Map(Box::new(key), Box::new(value))
            } else {
                TypeExprKind::App { base: name, args }
            };
            return Ok(TypeExpr { kind, span });
        }

        // `E`/`E1`-style names are reserved for effect variables; other
        // names are type variables only when the enclosing rule declared
        // them, so a single-letter enum still parses as a plain name.
        let kind = if is_effect_var_name(&name) {
            TypeExprKind::EffectVar(name)
        } else if self.type_params.contains(&name) {
            TypeExprKind::Var(name)
        } else {
            TypeExprKind::Name(name)
        };
        Ok(TypeExpr { kind, span: name_tok.span })
    }
}
