//! Workflow DAG validation.
//!
//! Checks that every declared dependency names a known step, that the
//! dependency graph is acyclic (a self-dependency counts as a cycle), that
//! IO-capable steps carry a compensate block, and that retry/timeout
//! policies sit inside the configured bounds.

use aster_common::{Diagnostic, ErrorCode, Span};
use aster_core::CoreWorkflow;
use rustc_hash::{FxHashMap, FxHashSet};

/// Policy bounds for workflow validation.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowPolicy {
    pub max_retry_attempts: i64,
    pub max_timeout_ms: i64,
}

impl Default for WorkflowPolicy {
    fn default() -> Self {
        Self {
            max_retry_attempts: 10,
            max_timeout_ms: 86_400_000,
        }
    }
}

/// Validate one workflow, appending diagnostics.
pub fn check_workflow(
    wf: &CoreWorkflow,
    policy: &WorkflowPolicy,
    span: Span,
    diags: &mut Vec<Diagnostic>,
) {
    let known: FxHashSet<&str> = wf.steps.iter().map(|s| s.name.as_str()).collect();

    for step in &wf.steps {
        for dep in &step.dependencies {
            if !known.contains(dep.as_str()) {
                diags.push(Diagnostic::error(
                    ErrorCode::WORKFLOW_UNKNOWN_STEP_DEPENDENCY,
                    format!("step `{}` depends on unknown step `{dep}`", step.name),
                    step.body.origin.span(),
                ));
            }
        }
    }

    if let Some(chain) = find_cycle(wf) {
        diags.push(Diagnostic::error(
            ErrorCode::WORKFLOW_CIRCULAR_DEPENDENCY,
            format!("workflow steps form a dependency cycle: {}", chain.join(" -> ")),
            span,
        ));
    }

    for step in &wf.steps {
        if !step.effect_caps.is_empty() && step.compensate.is_none() {
            diags.push(Diagnostic::warning(
                ErrorCode::WORKFLOW_COMPENSATE_MISSING,
                format!(
                    "step `{}` performs IO but has no compensate block",
                    step.name
                ),
                step.body.origin.span(),
            ));
        }
    }

    if let Some(retry) = &wf.retry {
        if retry.max_attempts <= 0 {
            diags.push(Diagnostic::error(
                ErrorCode::WORKFLOW_RETRY_TOO_MANY,
                format!("retry max attempts must be positive, found {}", retry.max_attempts),
                span,
            ));
        } else if retry.max_attempts > policy.max_retry_attempts {
            diags.push(Diagnostic::error(
                ErrorCode::WORKFLOW_RETRY_TOO_MANY,
                format!(
                    "retry max attempts {} exceeds the policy bound {}",
                    retry.max_attempts, policy.max_retry_attempts
                ),
                span,
            ));
        }
    }

    if let Some(timeout) = &wf.timeout {
        if timeout.milliseconds < 0 || timeout.milliseconds > policy.max_timeout_ms {
            diags.push(Diagnostic::error(
                ErrorCode::WORKFLOW_TIMEOUT_OUT_OF_RANGE,
                format!(
                    "timeout {} ms is outside the allowed range 0..={} ms",
                    timeout.milliseconds, policy.max_timeout_ms
                ),
                span,
            ));
        }
    }
}

/// Depth-first cycle search over the dependency edges. Returns the cycle
/// path (first node repeated at the end) when one exists.
fn find_cycle(wf: &CoreWorkflow) -> Option<Vec<String>> {
    let deps: FxHashMap<&str, &[String]> = wf
        .steps
        .iter()
        .map(|s| (s.name.as_str(), s.dependencies.as_slice()))
        .collect();

    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    let mut colors: FxHashMap<&str, Color> =
        wf.steps.iter().map(|s| (s.name.as_str(), Color::White)).collect();
    let mut path: Vec<&str> = Vec::new();

    fn visit<'a>(
        node: &'a str,
        deps: &FxHashMap<&'a str, &'a [String]>,
        colors: &mut FxHashMap<&'a str, Color>,
        path: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        colors.insert(node, Color::Gray);
        path.push(node);
        for dep in deps.get(node).copied().unwrap_or(&[]) {
            match colors.get(dep.as_str()) {
                Some(Color::Gray) => {
                    // Trim the path to the cycle portion and close it.
                    let start = path.iter().position(|n| *n == dep.as_str()).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|s| s.to_string()).collect();
                    cycle.push(dep.clone());
                    return Some(cycle);
                }
                Some(Color::White) => {
                    if let Some(cycle) = visit(dep.as_str(), deps, colors, path) {
                        return Some(cycle);
                    }
                }
                _ => {}
            }
        }
        path.pop();
        colors.insert(node, Color::Black);
        None
    }

    for step in &wf.steps {
        if colors.get(step.name.as_str()) == Some(&Color::White) {
            if let Some(cycle) = visit(step.name.as_str(), &deps, &mut colors, &mut path) {
                return Some(cycle);
            }
        }
    }
    None
}
