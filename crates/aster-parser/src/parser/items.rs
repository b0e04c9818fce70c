//! Declaration, statement, and workflow parsing.

use aster_common::{Capability, CompileError, ErrorCode, TokenKind};

use super::Parser;
use crate::ast::{
    Backoff, Block, Decl, DeclKind, EffectExpr, FieldConstraint, FieldDef, FuncDecl, MatchArm,
    Param, RetryPolicy, StepDef, Stmt, StmtKind, TimeoutPolicy, TypeExpr, WorkflowStmt,
};
use crate::ast::{Expr, ExprKind, LambdaBody, LambdaExpr};

/// Keywords that can begin a statement.
const STMT_STARTERS: &[&str] = &[
    "let", "set", "return", "if", "match", "workflow", "start", "wait", "within",
];

impl Parser {
    pub(crate) fn parse_decl(&mut self) -> Result<Decl, CompileError> {
        if self.at_kw("use") {
            self.parse_import()
        } else if self.at_kw("define") {
            self.parse_define()
        } else if self.at_kw("rule") {
            self.parse_rule()
        } else {
            Err(self.err(
                ErrorCode::EXPECT_KEYWORD,
                "expected a declaration (`Define`, `Rule`, or `use`)",
            ))
        }
    }

    // ── Imports ────────────────────────────────────────────────────────

    fn parse_import(&mut self) -> Result<Decl, CompileError> {
        let start = self.bump().span; // use
        let (name, _) = self.dotted_name()?;
        let as_name = if self.eat_kw("as") {
            Some(self.ident("an alias name")?.text)
        } else {
            None
        };
        self.expect_period()?;
        Ok(Decl {
            kind: DeclKind::Import { name, as_name },
            span: start.cover(self.prev_span()),
        })
    }

    // ── Data and enum definitions ──────────────────────────────────────

    fn parse_define(&mut self) -> Result<Decl, CompileError> {
        let start = self.bump().span; // define
        let name = self.type_name()?.text;

        if self.eat_kw("with") || self.eat_kw("has") {
            let fields = self.parse_fields()?;
            Ok(Decl {
                kind: DeclKind::Data { name, fields },
                span: start.cover(self.prev_span()),
            })
        } else if self.at_kw("as") {
            self.bump();
            self.expect_kw("one")?;
            self.expect_kw("of")?;
            let variants = self.parse_variants()?;
            Ok(Decl {
                kind: DeclKind::Enum { name, variants },
                span: start.cover(self.prev_span()),
            })
        } else {
            Err(self.err(
                ErrorCode::EXPECT_KEYWORD,
                "expected `with`, `has`, or `as one of` after the type name",
            ))
        }
    }

    fn parse_fields(&mut self) -> Result<Vec<FieldDef>, CompileError> {
        let mut fields = Vec::new();
        loop {
            self.skip_newlines();
            let name_tok = self.ident("a field name")?;
            self.expect_colon()?;
            let ty = self.parse_type()?;
            let constraints = self.parse_constraints()?;
            fields.push(FieldDef {
                name: name_tok.text,
                span: name_tok.span.cover(self.prev_span()),
                ty,
                constraints,
            });
            if self.eat(TokenKind::Comma) || self.eat_kw("and") {
                continue;
            }
            self.expect_period()?;
            break;
        }
        Ok(fields)
    }

    fn parse_variants(&mut self) -> Result<Vec<String>, CompileError> {
        let mut variants = Vec::new();
        loop {
            self.skip_newlines();
            variants.push(self.type_name()?.text);
            if self.eat(TokenKind::Comma) || self.eat_kw("or") {
                continue;
            }
            self.expect_period()?;
            break;
        }
        Ok(variants)
    }

    pub(crate) fn parse_constraints(&mut self) -> Result<Vec<FieldConstraint>, CompileError> {
        let mut constraints = Vec::new();
        loop {
            if self.eat_kw("required") {
                constraints.push(FieldConstraint::Required);
            } else if self.at_kw("between") {
                self.bump();
                let (lo, _) = self.int_lit()?;
                self.expect_kw("and")?;
                let (hi, _) = self.int_lit()?;
                constraints.push(FieldConstraint::Between(lo, hi));
            } else if self.at_kw("at") && (self.next_is_kw("least") || self.next_is_kw("most")) {
                self.bump();
                if self.eat_kw("least") {
                    let (n, _) = self.int_lit()?;
                    constraints.push(FieldConstraint::AtLeast(n));
                } else {
                    self.expect_kw("most")?;
                    let (n, _) = self.int_lit()?;
                    constraints.push(FieldConstraint::AtMost(n));
                }
            } else if self.at_kw("matching") {
                self.bump();
                self.expect_kw("pattern")?;
                let re = self.expect(TokenKind::Str, ErrorCode::UNEXPECTED_TOKEN, "a pattern string")?;
                constraints.push(FieldConstraint::Matching(re.text));
            } else {
                break;
            }
        }
        Ok(constraints)
    }

    // ── Rules ──────────────────────────────────────────────────────────

    fn parse_rule(&mut self) -> Result<Decl, CompileError> {
        let start = self.bump().span; // rule
        let name = self.ident("a rule name")?.text;

        let mut type_params = Vec::new();
        let mut effect_params = Vec::new();
        if self.eat_kw("of") {
            self.parse_of_params(&mut type_params, &mut effect_params)?;
        }
        self.type_params = type_params.clone();

        let mut params = Vec::new();
        if self.eat_kw("given") {
            loop {
                self.skip_newlines();
                let p = self.parse_param()?;
                params.push(p);
                if self.eat_kw("and") {
                    continue;
                }
                break;
            }
            // Inline effect parameter clause: `given ... of E1, E2`.
            if self.eat_kw("of") {
                self.parse_of_params(&mut type_params, &mut effect_params)?;
            }
        }

        self.expect(TokenKind::Comma, ErrorCode::UNEXPECTED_TOKEN, "`,` before `produce`")?;
        self.expect_kw("produce")?;
        let ret = self.parse_type()?;

        let mut effects: Vec<String> = Vec::new();
        let mut declared_effects: Vec<EffectExpr> = Vec::new();
        let mut effect_caps: Vec<Capability> = Vec::new();
        let mut effect_caps_explicit = false;
        let body;

        if self.eat(TokenKind::Colon) {
            body = self.parse_block()?;
        } else {
            self.expect_period()?;
            self.skip_newlines();
            if self.at_kw("it") {
                self.bump();
                self.expect_kw("performs")?;
                loop {
                    let tok = self.current().clone();
                    match tok.kind {
                        TokenKind::Ident => {
                            self.bump();
                            effects.push(tok.text.clone());
                            declared_effects.push(EffectExpr {
                                name: tok.text,
                                is_var: false,
                                span: tok.span,
                            });
                        }
                        TokenKind::TypeIdent => {
                            self.bump();
                            declared_effects.push(EffectExpr {
                                name: tok.text,
                                is_var: true,
                                span: tok.span,
                            });
                        }
                        _ => {
                            return Err(self.err(
                                ErrorCode::UNEXPECTED_TOKEN,
                                "expected an effect name after `it performs`",
                            ));
                        }
                    }
                    if self.eat_kw("and") {
                        continue;
                    }
                    break;
                }

                if self.eat_kw("with") {
                    effect_caps_explicit = true;
                    loop {
                        effect_caps.push(self.capability_name()?);
                        if self.eat_kw("and") || self.eat(TokenKind::Comma) {
                            continue;
                        }
                        break;
                    }
                } else if self.eat(TokenKind::LBracket) {
                    effect_caps_explicit = true;
                    if !self.at(TokenKind::RBracket) {
                        loop {
                            effect_caps.push(self.capability_name()?);
                            if self.eat(TokenKind::Comma) {
                                continue;
                            }
                            break;
                        }
                    }
                    self.expect(TokenKind::RBracket, ErrorCode::UNEXPECTED_TOKEN, "`]`")?;
                }

                if self.eat(TokenKind::Colon) {
                    body = self.parse_block()?;
                } else {
                    self.expect_period()?;
                    body = Block {
                        stmts: Vec::new(),
                        span: self.prev_span(),
                    };
                }
            } else {
                body = Block {
                    stmts: Vec::new(),
                    span: self.prev_span(),
                };
            }
        }

        self.type_params.clear();
        Ok(Decl {
            kind: DeclKind::Func(FuncDecl {
                name,
                type_params,
                effect_params,
                params,
                ret,
                effects,
                declared_effects,
                effect_caps,
                effect_caps_explicit,
                body,
            }),
            span: start.cover(self.prev_span()),
        })
    }

    /// Type/effect parameter names after `of`. A comma only continues the
    /// list when a further name follows; the comma before `produce` is left
    /// for the signature.
    fn parse_of_params(
        &mut self,
        type_params: &mut Vec<String>,
        effect_params: &mut Vec<String>,
    ) -> Result<(), CompileError> {
        loop {
            let tok = self.type_name()?;
            if is_effect_var_name(&tok.text) {
                effect_params.push(tok.text);
            } else {
                type_params.push(tok.text);
            }
            if self.eat_kw("and") {
                continue;
            }
            if self.at(TokenKind::Comma) && self.nth_kind(1) == TokenKind::TypeIdent {
                self.bump();
                continue;
            }
            break;
        }
        Ok(())
    }

    fn parse_param(&mut self) -> Result<Param, CompileError> {
        let name_tok = self.ident("a parameter name")?;
        let (ty, type_inferred) = if self.eat(TokenKind::Colon) {
            (self.parse_type()?, false)
        } else {
            (TypeExpr::unknown(name_tok.span), true)
        };
        let constraints = self.parse_constraints()?;
        Ok(Param {
            name: name_tok.text,
            span: name_tok.span.cover(self.prev_span()),
            ty,
            constraints,
            type_inferred,
        })
    }

    fn capability_name(&mut self) -> Result<Capability, CompileError> {
        let tok = self.type_name()?;
        Capability::parse(&tok.text).ok_or_else(|| {
            CompileError::new(
                ErrorCode::UNEXPECTED_TOKEN,
                format!(
                    "unknown capability `{}`; expected one of Http, Sql, Files, Secrets, Time, AiModel, Payment, Inventory, Cpu",
                    tok.text
                ),
                tok.span,
            )
        })
    }

    // ── Blocks and statements ──────────────────────────────────────────

    /// Parse a block after its opening colon has been consumed: either an
    /// indented block (newline + INDENT ... DEDENT) or inline statements to
    /// the end of the line.
    pub(crate) fn parse_block(&mut self) -> Result<Block, CompileError> {
        let start = self.cur_span();
        let mut stmts = Vec::new();
        if self.at(TokenKind::Newline) {
            self.skip_newlines();
            self.expect(TokenKind::Indent, ErrorCode::UNEXPECTED_TOKEN, "an indented block")?;
            loop {
                self.skip_newlines();
                if self.eat(TokenKind::Dedent) || self.at(TokenKind::Eof) {
                    break;
                }
                stmts.push(self.parse_stmt()?);
            }
        } else {
            loop {
                stmts.push(self.parse_stmt()?);
                if !self.starts_statement() {
                    break;
                }
            }
        }
        Ok(Block {
            stmts,
            span: start.cover(self.prev_span()),
        })
    }

    pub(crate) fn starts_statement(&self) -> bool {
        self.at(TokenKind::Keyword) && STMT_STARTERS.contains(&self.current().lower().as_str())
    }

    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, CompileError> {
        let start = self.cur_span();
        let lower = self.current().lower();
        if !self.at(TokenKind::Keyword) {
            return Err(self.err(ErrorCode::UNEXPECTED_TOKEN, "expected a statement"));
        }
        let kind = match lower.as_str() {
            "let" => {
                self.bump();
                let name = self.ident("a variable name")?.text;
                self.expect_kw("be")?;
                let value = self.parse_expr()?;
                self.end_value_stmt(&value)?;
                StmtKind::Let { name, value }
            }
            "set" => {
                self.bump();
                let name = self.ident("a variable name")?.text;
                self.expect_kw("to")?;
                let value = self.parse_expr()?;
                self.end_value_stmt(&value)?;
                StmtKind::Set { name, value }
            }
            "return" => {
                self.bump();
                let value = self.parse_expr()?;
                // A period is tolerated absent at line, block, or file end.
                if !self.eat(TokenKind::Dot)
                    && !matches!(
                        self.kind(),
                        TokenKind::Newline | TokenKind::Dedent | TokenKind::Eof
                    )
                {
                    return Err(self.err(ErrorCode::EXPECT_PERIOD, "expected `.` after `Return`"));
                }
                StmtKind::Return(value)
            }
            "if" => {
                self.bump();
                let cond = self.parse_expr()?;
                self.expect_colon()?;
                let then_block = self.parse_block()?;
                self.skip_newlines();
                let else_block = if self.eat_kw("otherwise") {
                    self.expect_colon()?;
                    Some(self.parse_block()?)
                } else {
                    None
                };
                StmtKind::If {
                    cond,
                    then_block,
                    else_block,
                }
            }
            "match" => {
                self.bump();
                let scrutinee = self.parse_expr()?;
                self.expect_colon()?;
                let mut arms = Vec::new();
                if self.at(TokenKind::Newline) {
                    self.skip_newlines();
                    self.expect(TokenKind::Indent, ErrorCode::UNEXPECTED_TOKEN, "an indented block")?;
                    loop {
                        self.skip_newlines();
                        if self.eat(TokenKind::Dedent) || self.at(TokenKind::Eof) {
                            break;
                        }
                        arms.push(self.parse_match_arm()?);
                    }
                } else {
                    while self.at_kw("when") {
                        arms.push(self.parse_match_arm()?);
                    }
                }
                StmtKind::Match { scrutinee, arms }
            }
            "workflow" => StmtKind::Workflow(self.parse_workflow()?),
            "start" => {
                self.bump();
                let name = self.ident("a handle name")?.text;
                self.expect_kw("as")?;
                self.expect_kw("async")?;
                let value = self.parse_expr()?;
                self.expect_period()?;
                StmtKind::Start { name, value }
            }
            "wait" => {
                self.bump();
                self.expect_kw("for")?;
                let mut names = Vec::new();
                loop {
                    names.push(self.ident("a handle name")?.text);
                    if self.eat_kw("and") || self.eat(TokenKind::Comma) {
                        continue;
                    }
                    break;
                }
                self.expect_period()?;
                StmtKind::Wait { names }
            }
            "within" => {
                self.bump();
                self.expect_kw("scope")?;
                self.expect_colon()?;
                StmtKind::WithinScope(self.parse_block()?)
            }
            _ => {
                return Err(self.err(ErrorCode::UNEXPECTED_TOKEN, "expected a statement"));
            }
        };
        Ok(Stmt {
            kind,
            span: start.cover(self.prev_span()),
        })
    }

    /// Terminate a `Let`/`Set`/... statement. The period is required unless
    /// the value ended with a block lambda, whose DEDENT already closed the
    /// sentence.
    fn end_value_stmt(&mut self, value: &Expr) -> Result<(), CompileError> {
        let block_valued = matches!(
            &value.kind,
            ExprKind::Lambda(LambdaExpr {
                body: LambdaBody::Block(_),
                ..
            })
        );
        if block_valued {
            // The lambda's DEDENT already closed the sentence; a period is
            // tolerated but not required.
            self.eat(TokenKind::Dot);
            return Ok(());
        }
        if self.eat(TokenKind::Dot) {
            return Ok(());
        }
        Err(self.err(ErrorCode::EXPECT_PERIOD, "expected `.` to end the statement"))
    }

    fn parse_match_arm(&mut self) -> Result<MatchArm, CompileError> {
        let start = self.expect_kw("when")?.span;
        let pattern = self.parse_pattern()?;
        self.expect(TokenKind::Comma, ErrorCode::UNEXPECTED_TOKEN, "`,` after the pattern")?;
        let mut stmts = Vec::new();
        loop {
            stmts.push(self.parse_stmt()?);
            // An arm body continues while a further statement follows,
            // possibly on the next line; `When` starts the next arm.
            let mut look = 0;
            while self.nth_kind(look) == TokenKind::Newline {
                look += 1;
            }
            let continues = self.tokens.get(self.pos + look).is_some_and(|t| {
                t.kind == TokenKind::Keyword && STMT_STARTERS.contains(&t.lower().as_str())
            });
            if !continues {
                break;
            }
            for _ in 0..look {
                self.bump();
            }
        }
        let body_span = stmts
            .first()
            .map(|s: &Stmt| s.span)
            .unwrap_or(start)
            .cover(self.prev_span());
        Ok(MatchArm {
            pattern,
            body: Block {
                stmts,
                span: body_span,
            },
            span: start.cover(self.prev_span()),
        })
    }

    // ── Workflow ───────────────────────────────────────────────────────

    fn parse_workflow(&mut self) -> Result<WorkflowStmt, CompileError> {
        let start = self.expect_kw("workflow")?.span;
        self.expect_colon()?;
        if !self.at(TokenKind::Newline) {
            return Err(self.err(
                ErrorCode::UNEXPECTED_TOKEN,
                "expected a newline after `workflow:`",
            ));
        }
        self.skip_newlines();
        self.expect(TokenKind::Indent, ErrorCode::UNEXPECTED_TOKEN, "an indented block")?;

        let mut steps = Vec::new();
        let mut retry = None;
        let mut timeout = None;
        loop {
            self.skip_newlines();
            if self.eat(TokenKind::Dedent) || self.at(TokenKind::Eof) {
                break;
            }
            if self.at_kw("step") {
                steps.push(self.parse_step()?);
            } else if self.at_kw("retry") {
                retry = Some(self.parse_retry()?);
            } else if self.at_kw("timeout") {
                timeout = Some(self.parse_timeout()?);
            } else {
                return Err(self.err(
                    ErrorCode::UNEXPECTED_TOKEN,
                    "expected `step`, `retry`, `timeout`, or the end of the workflow",
                ));
            }
        }
        // Tolerated terminating period after the workflow's dedent.
        self.eat(TokenKind::Dot);

        Ok(WorkflowStmt {
            steps,
            retry,
            timeout,
            span: start.cover(self.prev_span()),
        })
    }

    fn parse_step(&mut self) -> Result<StepDef, CompileError> {
        let start = self.expect_kw("step")?.span;
        let name = self.ident("a step name")?.text;
        let dependencies = if self.at_kw("depends") {
            self.bump();
            self.expect_kw("on")?;
            self.expect(TokenKind::LBracket, ErrorCode::UNEXPECTED_TOKEN, "`[`")?;
            let mut deps = Vec::new();
            if !self.at(TokenKind::RBracket) {
                loop {
                    let s = self.expect(TokenKind::Str, ErrorCode::UNEXPECTED_TOKEN, "a step name string")?;
                    deps.push(s.text);
                    if self.eat(TokenKind::Comma) {
                        continue;
                    }
                    break;
                }
            }
            self.expect(TokenKind::RBracket, ErrorCode::UNEXPECTED_TOKEN, "`]`")?;
            Some(deps)
        } else {
            None
        };
        self.expect_colon()?;
        let body = self.parse_block()?;
        self.skip_newlines();
        let compensate = if self.eat_kw("compensate") {
            self.expect_colon()?;
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(StepDef {
            name,
            dependencies,
            body,
            compensate,
            span: start.cover(self.prev_span()),
        })
    }

    fn parse_retry(&mut self) -> Result<RetryPolicy, CompileError> {
        let start = self.expect_kw("retry")?.span;
        self.expect_colon()?;
        let indented = if self.at(TokenKind::Newline) {
            self.skip_newlines();
            self.expect(TokenKind::Indent, ErrorCode::UNEXPECTED_TOKEN, "an indented block")?;
            true
        } else {
            false
        };
        self.skip_newlines();
        self.expect_kw("max")?;
        self.expect_kw("attempts")?;
        let (max_attempts, _) = self.int_lit()?;
        self.expect_period()?;
        self.skip_newlines();
        self.expect_kw("backoff")?;
        let backoff = if self.eat_kw("exponential") {
            Backoff::Exponential
        } else if self.eat_kw("linear") {
            Backoff::Linear
        } else {
            return Err(self.err(
                ErrorCode::UNEXPECTED_TOKEN,
                "expected `exponential` or `linear`",
            ));
        };
        self.expect_period()?;
        if indented {
            self.skip_newlines();
            self.expect(TokenKind::Dedent, ErrorCode::UNEXPECTED_TOKEN, "the end of the retry block")?;
        }
        Ok(RetryPolicy {
            max_attempts,
            backoff,
            span: start.cover(self.prev_span()),
        })
    }

    fn parse_timeout(&mut self) -> Result<TimeoutPolicy, CompileError> {
        let start = self.expect_kw("timeout")?.span;
        self.expect_colon()?;
        let (seconds, _) = self.int_lit()?;
        self.expect_kw("seconds")?;
        self.expect_period()?;
        Ok(TimeoutPolicy {
            seconds,
            span: start.cover(self.prev_span()),
        })
    }
}

/// Whether a declared parameter name denotes an effect variable (`E`, `E1`)
/// rather than a type variable.
pub(crate) fn is_effect_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('E') && chars.clone().all(|c| c.is_ascii_digit())
}
