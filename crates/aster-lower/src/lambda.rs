//! Lambda desugaring support: free-variable capture analysis and static
//! return-type inference for short-form lambdas.

use aster_core::Type;
use aster_parser::ast::{Block, Expr, ExprKind, LambdaBody, Stmt, StmtKind};
use rustc_hash::FxHashSet;

/// Collect the free variables of a lambda body in first-use order,
/// excluding the lambda's own parameters, locally-bound names, and dotted
/// references (module and field paths are not captures).
pub fn captures(body: &LambdaBody, params: &[String]) -> Vec<String> {
    let mut bound: FxHashSet<String> = params.iter().cloned().collect();
    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    match body {
        LambdaBody::Expr(expr) => walk_expr(expr, &mut bound, &mut seen, &mut out),
        LambdaBody::Block(block) => walk_block(block, &mut bound, &mut seen, &mut out),
    }
    out
}

fn walk_block(
    block: &Block,
    bound: &mut FxHashSet<String>,
    seen: &mut FxHashSet<String>,
    out: &mut Vec<String>,
) {
    for stmt in &block.stmts {
        walk_stmt(stmt, bound, seen, out);
    }
}

fn walk_stmt(
    stmt: &Stmt,
    bound: &mut FxHashSet<String>,
    seen: &mut FxHashSet<String>,
    out: &mut Vec<String>,
) {
    match &stmt.kind {
        StmtKind::Let { name, value } => {
            walk_expr(value, bound, seen, out);
            bound.insert(name.clone());
        }
        StmtKind::Set { name, value } => {
            walk_expr(value, bound, seen, out);
            record(name, bound, seen, out);
        }
        StmtKind::Return(value) => walk_expr(value, bound, seen, out),
        StmtKind::If {
            cond,
            then_block,
            else_block,
        } => {
            walk_expr(cond, bound, seen, out);
            walk_block(then_block, bound, seen, out);
            if let Some(b) = else_block {
                walk_block(b, bound, seen, out);
            }
        }
        StmtKind::Match { scrutinee, arms } => {
            walk_expr(scrutinee, bound, seen, out);
            for arm in arms {
                let mut inner = bound.clone();
                for binding in arm.pattern.bindings() {
                    inner.insert(binding.to_string());
                }
                walk_block(&arm.body, &mut inner, seen, out);
            }
        }
        StmtKind::Workflow(wf) => {
            for step in &wf.steps {
                walk_block(&step.body, bound, seen, out);
                if let Some(c) = &step.compensate {
                    walk_block(c, bound, seen, out);
                }
            }
        }
        StmtKind::Start { name, value } => {
            walk_expr(value, bound, seen, out);
            bound.insert(name.clone());
        }
        StmtKind::Wait { names } => {
            for name in names {
                record(name, bound, seen, out);
            }
        }
        StmtKind::WithinScope(block) => walk_block(block, bound, seen, out),
    }
}

fn walk_expr(
    expr: &Expr,
    bound: &mut FxHashSet<String>,
    seen: &mut FxHashSet<String>,
    out: &mut Vec<String>,
) {
    match &expr.kind {
        ExprKind::Name(name) => {
            // Dotted references are module or field paths, never captures.
            if !name.contains('.') {
                record(name, bound, seen, out);
            }
        }
        ExprKind::Call { target, args } => {
            // Operator names like `+` resolve to builtins, not captures.
            if let ExprKind::Name(name) = &target.kind {
                if !name.contains('.') && name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                    record(name, bound, seen, out);
                }
            } else {
                walk_expr(target, bound, seen, out);
            }
            for arg in args {
                walk_expr(arg, bound, seen, out);
            }
        }
        ExprKind::Construct { fields, .. } => {
            for (_, value) in fields {
                walk_expr(value, bound, seen, out);
            }
        }
        ExprKind::OkOf(inner)
        | ExprKind::ErrOf(inner)
        | ExprKind::SomeOf(inner)
        | ExprKind::Await(inner) => walk_expr(inner, bound, seen, out),
        ExprKind::Lambda(lambda) => {
            let mut inner = bound.clone();
            for param in &lambda.params {
                inner.insert(param.name.clone());
            }
            match &lambda.body {
                LambdaBody::Expr(e) => walk_expr(e, &mut inner, seen, out),
                LambdaBody::Block(b) => walk_block(b, &mut inner, seen, out),
            }
        }
        ExprKind::Bool(_)
        | ExprKind::Int(_)
        | ExprKind::Long(_)
        | ExprKind::Float(_)
        | ExprKind::Str(_)
        | ExprKind::Null
        | ExprKind::NoneLit => {}
    }
}

fn record(
    name: &str,
    bound: &FxHashSet<String>,
    seen: &mut FxHashSet<String>,
    out: &mut Vec<String>,
) {
    if !bound.contains(name) && seen.insert(name.to_string()) {
        out.push(name.to_string());
    }
}

/// Statically infer a short-form lambda's return type from its body
/// expression: arithmetic yields `Int`, comparisons and `not` yield
/// `Bool`, `Text.*` calls yield their known results, literals their own
/// types, and everything else `Unknown`.
pub fn infer_short_ret(expr: &Expr) -> Type {
    match &expr.kind {
        ExprKind::Int(_) => Type::int(),
        ExprKind::Long(_) => Type::long(),
        ExprKind::Float(_) => Type::double(),
        ExprKind::Str(_) => Type::text(),
        ExprKind::Bool(_) => Type::bool(),
        ExprKind::Null => Type::maybe(Type::unknown()),
        ExprKind::NoneLit => Type::option(Type::unknown()),
        ExprKind::OkOf(inner) => Type::result(infer_short_ret(inner), Type::unknown()),
        ExprKind::ErrOf(inner) => Type::result(Type::unknown(), infer_short_ret(inner)),
        ExprKind::SomeOf(inner) => Type::option(infer_short_ret(inner)),
        ExprKind::Call { target, .. } => match &target.kind {
            ExprKind::Name(op) => match op.as_str() {
                "+" | "-" | "*" | "/" => Type::int(),
                "<" | ">" | "==" | ">=" | "<=" | "not" => Type::bool(),
                name => text_builtin_result(name).unwrap_or_else(Type::unknown),
            },
            _ => Type::unknown(),
        },
        _ => Type::unknown(),
    }
}

/// Result types of the `Text.*` builtins known to static inference.
fn text_builtin_result(name: &str) -> Option<Type> {
    match name {
        "Text.length" => Some(Type::int()),
        "Text.concat" | "Text.upper" | "Text.lower" | "Text.trim" | "Text.replace" => {
            Some(Type::text())
        }
        "Text.contains" | "Text.startsWith" | "Text.endsWith" => Some(Type::bool()),
        _ => None,
    }
}
