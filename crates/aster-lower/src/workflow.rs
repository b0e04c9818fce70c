//! Workflow lowering: implicit step dependencies and per-step capability
//! inference.

use aster_common::Capability;
use aster_core::{CoreBlock, CoreExpr, CoreExprKind, CoreStep, CoreStmt, CoreStmtKind};

/// Map a call-target prefix to the capability it exercises. Unresolved
/// prefixes yield no capability; nothing is assumed silently.
pub fn capability_for_prefix(prefix: &str) -> Option<Capability> {
    match prefix {
        "Http" => Some(Capability::Http),
        "Db" | "Sql" => Some(Capability::Sql),
        "Files" | "Fs" => Some(Capability::Files),
        "Secrets" => Some(Capability::Secrets),
        "Time" | "Clock" => Some(Capability::Time),
        "Ai" => Some(Capability::AiModel),
        "Payment" => Some(Capability::Payment),
        "Inventory" => Some(Capability::Inventory),
        _ => None,
    }
}

/// Derive a step's capabilities by walking its body and compensate block,
/// inferring one capability per known call-target prefix. Order of first
/// use is preserved.
pub fn infer_step_caps(step: &CoreStep) -> Vec<Capability> {
    let mut caps = Vec::new();
    collect_block(&step.body, &mut caps);
    if let Some(compensate) = &step.compensate {
        collect_block(compensate, &mut caps);
    }
    caps
}

/// Fill in implicit dependencies: a step without `depends on` depends on
/// the step before it (legacy linear semantics); the first step on nothing.
pub fn implicit_dependencies(index: usize, prev_name: Option<&str>) -> Vec<String> {
    if index == 0 {
        Vec::new()
    } else {
        prev_name.map(|n| vec![n.to_string()]).unwrap_or_default()
    }
}

fn collect_block(block: &CoreBlock, caps: &mut Vec<Capability>) {
    for stmt in &block.stmts {
        collect_stmt(stmt, caps);
    }
}

fn collect_stmt(stmt: &CoreStmt, caps: &mut Vec<Capability>) {
    match &stmt.kind {
        CoreStmtKind::Let { value, .. }
        | CoreStmtKind::Set { value, .. }
        | CoreStmtKind::Return { value }
        | CoreStmtKind::Start { value, .. } => collect_expr(value, caps),
        CoreStmtKind::If {
            cond,
            then_block,
            else_block,
        } => {
            collect_expr(cond, caps);
            collect_block(then_block, caps);
            if let Some(b) = else_block {
                collect_block(b, caps);
            }
        }
        CoreStmtKind::Match { scrutinee, arms } => {
            collect_expr(scrutinee, caps);
            for arm in arms {
                collect_block(&arm.body, caps);
            }
        }
        CoreStmtKind::Workflow(wf) => {
            for step in &wf.steps {
                collect_block(&step.body, caps);
                if let Some(c) = &step.compensate {
                    collect_block(c, caps);
                }
            }
        }
        CoreStmtKind::Scope { body } => collect_block(body, caps),
        CoreStmtKind::Wait { .. } => {}
    }
}

fn collect_expr(expr: &CoreExpr, caps: &mut Vec<Capability>) {
    match &expr.kind {
        CoreExprKind::Call { target, args } => {
            if let CoreExprKind::Name { name } = &target.kind {
                if let Some((prefix, _)) = name.split_once('.') {
                    if let Some(cap) = capability_for_prefix(prefix) {
                        if !caps.contains(&cap) {
                            caps.push(cap);
                        }
                    }
                }
            }
            collect_expr(target, caps);
            for arg in args {
                collect_expr(arg, caps);
            }
        }
        CoreExprKind::Construct { fields, .. } => {
            for field in fields {
                collect_expr(&field.value, caps);
            }
        }
        CoreExprKind::Ok { value }
        | CoreExprKind::Err { value }
        | CoreExprKind::Some { value }
        | CoreExprKind::Await { value } => collect_expr(value, caps),
        CoreExprKind::Lambda { body, .. } => collect_block(body, caps),
        CoreExprKind::Name { .. }
        | CoreExprKind::Bool { .. }
        | CoreExprKind::Int { .. }
        | CoreExprKind::Long { .. }
        | CoreExprKind::Float { .. }
        | CoreExprKind::Str { .. }
        | CoreExprKind::Null
        | CoreExprKind::None => {}
    }
}
