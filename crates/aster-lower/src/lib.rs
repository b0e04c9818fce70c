// Aster lowering -- AST to Core IR.
//
// Desugars surface forms (short lambdas, workflow step defaults, PII
// decorations) into the minimal representation the type checker and
// back-ends consume. Lowering throws only when the AST violates an
// invariant that has no recoverable diagnostic: unknown effect strings.

mod lambda;
mod pii;
mod types;
mod workflow;

pub use types::lower_type;
pub use workflow::capability_for_prefix;

use aster_common::{CompileError, Effect, ErrorCode};
use aster_core::{
    CoreArm, CoreBackoff, CoreBlock, CoreConstraint, CoreDecl, CoreDeclKind, CoreExpr,
    CoreExprKind, CoreField, CoreFieldInit, CoreFunc, CoreModule, CoreParam, CorePattern,
    CorePatternKind, CoreRetry, CoreStep, CoreStmt, CoreStmtKind, CoreTimeout, CoreWorkflow,
    EffectRef, Origin, Type,
};
use aster_parser::ast;

/// Lower a parsed module to Core IR, attaching origins that point back at
/// `file`.
pub fn lower(module: &ast::Module, file: Option<&str>) -> Result<CoreModule, CompileError> {
    let ctx = Lower { file };
    let mut decls = Vec::with_capacity(module.decls.len());
    for decl in &module.decls {
        decls.push(ctx.lower_decl(decl)?);
    }
    Ok(CoreModule {
        name: module.name.clone().unwrap_or_else(|| "main".to_string()),
        decls,
        origin: Origin::from_span(file, module.span),
    })
}

struct Lower<'a> {
    file: Option<&'a str>,
}

impl<'a> Lower<'a> {
    fn origin(&self, span: aster_common::Span) -> Origin {
        Origin::from_span(self.file, span)
    }

    fn lower_decl(&self, decl: &ast::Decl) -> Result<CoreDecl, CompileError> {
        let kind = match &decl.kind {
            ast::DeclKind::Import { name, as_name } => CoreDeclKind::Import {
                name: name.clone(),
                as_name: as_name.clone(),
            },
            ast::DeclKind::Data { name, fields } => CoreDeclKind::Data {
                name: name.clone(),
                fields: fields
                    .iter()
                    .map(|f| CoreField {
                        name: f.name.clone(),
                        ty: lower_type(&f.ty),
                        constraints: f.constraints.iter().map(lower_constraint).collect(),
                    })
                    .collect(),
            },
            ast::DeclKind::Enum { name, variants } => CoreDeclKind::Enum {
                name: name.clone(),
                variants: variants.clone(),
            },
            ast::DeclKind::Func(func) => CoreDeclKind::Func(self.lower_func(func)?),
        };
        Ok(CoreDecl {
            kind,
            origin: self.origin(decl.span),
        })
    }

    fn lower_func(&self, func: &ast::FuncDecl) -> Result<CoreFunc, CompileError> {
        let mut declared_effects = Vec::with_capacity(func.declared_effects.len());
        let mut effects = Vec::new();
        for item in &func.declared_effects {
            if item.is_var {
                declared_effects.push(EffectRef::Var {
                    name: item.name.clone(),
                });
                continue;
            }
            match Effect::parse(&item.name) {
                Some(effect) => {
                    declared_effects.push(EffectRef::Effect { effect });
                    if !effects.contains(&effect) {
                        effects.push(effect);
                    }
                }
                None if func.effect_params.contains(&item.name) => {
                    declared_effects.push(EffectRef::Var {
                        name: item.name.clone(),
                    });
                }
                None => {
                    return Err(CompileError::new(
                        ErrorCode::UNKNOWN_EFFECT,
                        format!(
                            "unknown effect `{}`; recognized effects are io, cpu, pure",
                            item.name
                        ),
                        item.span,
                    ));
                }
            }
        }

        let params: Vec<CoreParam> = func
            .params
            .iter()
            .map(|p| CoreParam {
                name: p.name.clone(),
                ty: lower_type(&p.ty),
            })
            .collect();
        let ret = lower_type(&func.ret);
        let param_tys: Vec<&Type> = params.iter().map(|p| &p.ty).collect();
        let pii = pii::summarize(&param_tys, &ret);

        Ok(CoreFunc {
            name: func.name.clone(),
            type_params: func.type_params.clone(),
            effect_params: func.effect_params.clone(),
            params,
            ret,
            effects,
            declared_effects,
            effect_caps: func.effect_caps.clone(),
            effect_caps_explicit: func.effect_caps_explicit,
            pii,
            body: self.lower_block(&func.body)?,
        })
    }

    fn lower_block(&self, block: &ast::Block) -> Result<CoreBlock, CompileError> {
        let mut stmts = Vec::with_capacity(block.stmts.len());
        for stmt in &block.stmts {
            stmts.push(self.lower_stmt(stmt)?);
        }
        Ok(CoreBlock {
            stmts,
            origin: self.origin(block.span),
        })
    }

    fn lower_stmt(&self, stmt: &ast::Stmt) -> Result<CoreStmt, CompileError> {
        let kind = match &stmt.kind {
            ast::StmtKind::Let { name, value } => CoreStmtKind::Let {
                name: name.clone(),
                value: self.lower_expr(value)?,
            },
            ast::StmtKind::Set { name, value } => CoreStmtKind::Set {
                name: name.clone(),
                value: self.lower_expr(value)?,
            },
            ast::StmtKind::Return(value) => CoreStmtKind::Return {
                value: self.lower_expr(value)?,
            },
            ast::StmtKind::If {
                cond,
                then_block,
                else_block,
            } => CoreStmtKind::If {
                cond: self.lower_expr(cond)?,
                then_block: self.lower_block(then_block)?,
                else_block: else_block.as_ref().map(|b| self.lower_block(b)).transpose()?,
            },
            ast::StmtKind::Match { scrutinee, arms } => CoreStmtKind::Match {
                scrutinee: self.lower_expr(scrutinee)?,
                arms: arms
                    .iter()
                    .map(|arm| {
                        Ok(CoreArm {
                            pattern: self.lower_pattern(&arm.pattern),
                            body: self.lower_block(&arm.body)?,
                        })
                    })
                    .collect::<Result<_, CompileError>>()?,
            },
            ast::StmtKind::Workflow(wf) => CoreStmtKind::Workflow(self.lower_workflow(wf)?),
            ast::StmtKind::Start { name, value } => CoreStmtKind::Start {
                name: name.clone(),
                value: self.lower_expr(value)?,
            },
            ast::StmtKind::Wait { names } => CoreStmtKind::Wait {
                names: names.clone(),
            },
            ast::StmtKind::WithinScope(block) => CoreStmtKind::Scope {
                body: self.lower_block(block)?,
            },
        };
        Ok(CoreStmt {
            kind,
            origin: self.origin(stmt.span),
        })
    }

    fn lower_workflow(&self, wf: &ast::WorkflowStmt) -> Result<CoreWorkflow, CompileError> {
        let mut steps: Vec<CoreStep> = Vec::with_capacity(wf.steps.len());
        for (index, step) in wf.steps.iter().enumerate() {
            let dependencies = match &step.dependencies {
                Some(deps) => deps.clone(),
                None => workflow::implicit_dependencies(
                    index,
                    index.checked_sub(1).map(|i| wf.steps[i].name.as_str()),
                ),
            };
            let mut lowered = CoreStep {
                name: step.name.clone(),
                body: self.lower_block(&step.body)?,
                dependencies,
                effect_caps: Vec::new(),
                compensate: step.compensate.as_ref().map(|b| self.lower_block(b)).transpose()?,
            };
            lowered.effect_caps = workflow::infer_step_caps(&lowered);
            steps.push(lowered);
        }

        let mut effect_caps = Vec::new();
        for step in &steps {
            for cap in &step.effect_caps {
                if !effect_caps.contains(cap) {
                    effect_caps.push(*cap);
                }
            }
        }

        Ok(CoreWorkflow {
            steps,
            effect_caps,
            retry: wf.retry.as_ref().map(|r| CoreRetry {
                max_attempts: r.max_attempts,
                backoff: match r.backoff {
                    ast::Backoff::Exponential => CoreBackoff::Exponential,
                    ast::Backoff::Linear => CoreBackoff::Linear,
                },
            }),
            timeout: wf.timeout.as_ref().map(|t| CoreTimeout {
                milliseconds: t.seconds * 1000,
            }),
        })
    }

    fn lower_pattern(&self, pattern: &ast::Pattern) -> CorePattern {
        let kind = match &pattern.kind {
            ast::PatternKind::Null => CorePatternKind::Null,
            ast::PatternKind::Int(value) => CorePatternKind::Int { value: *value },
            ast::PatternKind::Name(name) => CorePatternKind::Name { name: name.clone() },
            ast::PatternKind::Ctor {
                type_name,
                names,
                args,
            } => CorePatternKind::Ctor {
                type_name: type_name.clone(),
                // Empty legacy binding lists are elided.
                names: names.clone(),
                args: args.iter().map(|p| self.lower_pattern(p)).collect(),
            },
        };
        CorePattern {
            kind,
            origin: self.origin(pattern.span),
        }
    }

    fn lower_expr(&self, expr: &ast::Expr) -> Result<CoreExpr, CompileError> {
        let kind = match &expr.kind {
            ast::ExprKind::Name(name) => CoreExprKind::Name { name: name.clone() },
            ast::ExprKind::Bool(value) => CoreExprKind::Bool { value: *value },
            ast::ExprKind::Int(value) => CoreExprKind::Int { value: *value },
            ast::ExprKind::Long(value) => CoreExprKind::Long { value: *value },
            ast::ExprKind::Float(value) => CoreExprKind::Float { value: *value },
            ast::ExprKind::Str(value) => CoreExprKind::Str {
                value: value.clone(),
            },
            ast::ExprKind::Null => CoreExprKind::Null,
            ast::ExprKind::Call { target, args } => CoreExprKind::Call {
                target: Box::new(self.lower_expr(target)?),
                args: args
                    .iter()
                    .map(|a| self.lower_expr(a))
                    .collect::<Result<_, _>>()?,
            },
            ast::ExprKind::Construct { type_name, fields } => CoreExprKind::Construct {
                type_name: type_name.clone(),
                fields: fields
                    .iter()
                    .map(|(name, value)| {
                        Ok(CoreFieldInit {
                            name: name.clone(),
                            value: self.lower_expr(value)?,
                        })
                    })
                    .collect::<Result<_, CompileError>>()?,
            },
            ast::ExprKind::OkOf(inner) => CoreExprKind::Ok {
                value: Box::new(self.lower_expr(inner)?),
            },
            ast::ExprKind::ErrOf(inner) => CoreExprKind::Err {
                value: Box::new(self.lower_expr(inner)?),
            },
            ast::ExprKind::SomeOf(inner) => CoreExprKind::Some {
                value: Box::new(self.lower_expr(inner)?),
            },
            ast::ExprKind::NoneLit => CoreExprKind::None,
            ast::ExprKind::Await(inner) => CoreExprKind::Await {
                value: Box::new(self.lower_expr(inner)?),
            },
            ast::ExprKind::Lambda(lambda) => self.lower_lambda(lambda, expr)?,
        };
        Ok(CoreExpr {
            kind,
            origin: self.origin(expr.span),
        })
    }

    fn lower_lambda(
        &self,
        lambda: &ast::LambdaExpr,
        expr: &ast::Expr,
    ) -> Result<CoreExprKind, CompileError> {
        let params: Vec<CoreParam> = lambda
            .params
            .iter()
            .map(|p| CoreParam {
                name: p.name.clone(),
                ty: lower_type(&p.ty),
            })
            .collect();
        let param_names: Vec<String> = lambda.params.iter().map(|p| p.name.clone()).collect();
        let captures = lambda::captures(&lambda.body, &param_names);

        let (ret, body) = match &lambda.body {
            ast::LambdaBody::Block(block) => {
                let ret = lambda
                    .ret
                    .as_ref()
                    .map(lower_type)
                    .unwrap_or_else(Type::unknown);
                (ret, self.lower_block(block)?)
            }
            ast::LambdaBody::Expr(body_expr) => {
                // A short-form body becomes a single-return block; the
                // return type is inferred statically.
                let ret = lambda::infer_short_ret(body_expr);
                let value = self.lower_expr(body_expr)?;
                let origin = self.origin(expr.span);
                let body = CoreBlock {
                    stmts: vec![CoreStmt {
                        kind: CoreStmtKind::Return { value },
                        origin: self.origin(body_expr.span),
                    }],
                    origin,
                };
                (ret, body)
            }
        };

        Ok(CoreExprKind::Lambda {
            params,
            ret,
            body,
            captures,
        })
    }
}

fn lower_constraint(constraint: &ast::FieldConstraint) -> CoreConstraint {
    match constraint {
        ast::FieldConstraint::Required => CoreConstraint::Required,
        ast::FieldConstraint::Between(lo, hi) => CoreConstraint::Between { lo: *lo, hi: *hi },
        ast::FieldConstraint::AtLeast(n) => CoreConstraint::AtLeast { n: *n },
        ast::FieldConstraint::AtMost(n) => CoreConstraint::AtMost { n: *n },
        ast::FieldConstraint::Matching(pattern) => CoreConstraint::Matching {
            pattern: pattern.clone(),
        },
    }
}
