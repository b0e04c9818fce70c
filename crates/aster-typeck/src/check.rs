//! The type checker passes.
//!
//! The checker walks a Core module in declaration-and-statement order,
//! accumulating diagnostics; it never throws for ordinary user errors and
//! never mutates the IR. After one error it continues wherever further
//! feedback is still meaningful.

use std::sync::Arc;

use aster_common::{Capability, Diagnostic, Effect, ErrorCode, Span};
use aster_core::{
    CoreBlock, CoreDeclKind, CoreExpr, CoreExprKind, CoreField, CoreFunc, CoreModule, CorePattern,
    CorePatternKind, CoreStmt, CoreStmtKind, EffectRef, Type,
};
use aster_lexicon::Lexicon;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::builtins::{self, BuiltinSig};
use crate::effects::EffectSet;
use crate::exhaustive;
use crate::modules::ModuleLoadError;
use crate::symbols::{ScopeKind, Symbol, SymbolKind, SymbolTable};
use crate::unify::{contains_pii, is_subtype, substitute, unify, Bindings};
use crate::workflow;
use crate::TypecheckOptions;

/// Type names the checker accepts without a declaration.
const BUILTIN_TYPES: &[&str] = &[
    "Int", "Long", "Double", "Bool", "Text", "Unit", "Unknown", "Result", "Option", "Maybe",
    "List", "Map", "Set", "Workflow",
];

/// A resolved callee signature.
struct CalleeSig {
    params: Vec<Type>,
    ret: Type,
    effects: Vec<Effect>,
    caps: Vec<Capability>,
    pii_safe: bool,
    leak_code: Option<ErrorCode>,
}

impl CalleeSig {
    fn from_builtin(name: &str, sig: BuiltinSig) -> Self {
        let prefix = name.split('.').next().unwrap_or("");
        CalleeSig {
            params: sig.params,
            ret: sig.ret,
            effects: sig.effects,
            caps: sig.capability.into_iter().collect(),
            pii_safe: sig.pii_safe,
            leak_code: builtins::leak_code_for_prefix(prefix),
        }
    }

    fn from_func(func: &CoreFunc) -> Self {
        let leak_code = func
            .effect_caps
            .first()
            .map(|cap| builtins::leak_code_for_capability(*cap));
        CalleeSig {
            params: func.params.iter().map(|p| p.ty.clone()).collect(),
            ret: func.ret.clone(),
            effects: func.effects.clone(),
            caps: func.effect_caps.clone(),
            pii_safe: func.effect_caps.is_empty() && func.effects.is_empty(),
            leak_code,
        }
    }
}

/// Per-function checking state.
struct FnState {
    name: String,
    ret: Type,
    declared: EffectSet,
    summary: EffectSet,
    /// Missing-effect codes already reported for this function.
    reported: EffectSet,
    caps: Vec<Capability>,
    enforce_caps: bool,
}

pub(crate) struct Checker<'a> {
    module: &'a CoreModule,
    options: &'a TypecheckOptions,
    lexicon: Lexicon,
    pub(crate) diags: Vec<Diagnostic>,
    symbols: SymbolTable,
    datas: FxHashMap<String, &'a Vec<CoreField>>,
    enums: FxHashMap<String, Vec<String>>,
    /// Enum variant name -> owning enum name.
    variant_owners: FxHashMap<String, String>,
    /// Import prefix (alias or dotted name) -> dotted module name.
    imports: FxHashMap<String, String>,
    current: Option<FnState>,
}

impl<'a> Checker<'a> {
    pub(crate) fn new(module: &'a CoreModule, options: &'a TypecheckOptions) -> Self {
        let lexicon = aster_lexicon::LexiconRegistry::builtin()
            .get(&options.locale)
            .cloned()
            .unwrap_or_else(Lexicon::english);
        Self {
            module,
            options,
            lexicon,
            diags: Vec::new(),
            symbols: SymbolTable::new(),
            datas: FxHashMap::default(),
            enums: FxHashMap::default(),
            variant_owners: FxHashMap::default(),
            imports: FxHashMap::default(),
            current: None,
        }
    }

    pub(crate) fn run(&mut self) {
        self.collect_decls();
        let module = self.module;
        for decl in &module.decls {
            if let CoreDeclKind::Func(func) = &decl.kind {
                self.check_func(func, decl.origin.span());
            }
        }
    }

    fn error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        self.diags.push(Diagnostic::error(code, message, span));
    }

    fn warning(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        self.diags.push(Diagnostic::warning(code, message, span));
    }

    // ── Pass 1: collect declarations ───────────────────────────────────

    fn collect_decls(&mut self) {
        let module = self.module;
        for decl in &module.decls {
            let span = decl.origin.span();
            match &decl.kind {
                CoreDeclKind::Import { name, as_name } => {
                    let key = as_name
                        .clone()
                        .unwrap_or_else(|| name.rsplit('.').next().unwrap_or(name).to_string());
                    self.imports.insert(key, name.clone());
                    self.imports.insert(name.clone(), name.clone());
                }
                CoreDeclKind::Data { name, fields } => {
                    self.datas.insert(name.clone(), fields);
                    self.define(name, Type::name(name), SymbolKind::Type, span);
                }
                CoreDeclKind::Enum { name, variants } => {
                    self.enums.insert(name.clone(), variants.clone());
                    for variant in variants {
                        self.variant_owners.insert(variant.clone(), name.clone());
                    }
                    self.define(name, Type::name(name), SymbolKind::Enum, span);
                }
                CoreDeclKind::Func(func) => {
                    let ty = Type::Func {
                        params: func.params.iter().map(|p| p.ty.clone()).collect(),
                        ret: Box::new(func.ret.clone()),
                        declared_effects: if func.declared_effects.is_empty() {
                            None
                        } else {
                            Some(func.declared_effects.clone())
                        },
                        effect_params: if func.effect_params.is_empty() {
                            None
                        } else {
                            Some(func.effect_params.clone())
                        },
                    };
                    self.define(&func.name, ty, SymbolKind::Func, span);
                }
            }
        }

        let options = self.options;
        if let Some(manifest) = &options.manifest {
            if let Some(allowed) = manifest.allowed_for(&module.name) {
                for decl in &module.decls {
                    if let CoreDeclKind::Func(func) = &decl.kind {
                        for cap in &func.effect_caps {
                            if !allowed.contains(cap) {
                                self.diags.push(Diagnostic::info(
                                    ErrorCode::CAPABILITY_NOT_ALLOWED,
                                    format!(
                                        "rule `{}` declares capability {cap} which the manifest does not allow for `{}`",
                                        func.name, module.name
                                    ),
                                    decl.origin.span(),
                                ));
                            }
                        }
                    }
                }
            }
        }
    }

    fn define(&mut self, name: &str, ty: Type, kind: SymbolKind, span: Span) {
        let result = self.symbols.define(Symbol {
            name: name.to_string(),
            ty,
            kind,
            def_span: span,
        });
        if let Err(existing) = result {
            self.diags.push(
                Diagnostic::error(
                    ErrorCode::DUPLICATE_SYMBOL,
                    format!("`{name}` is already defined in this scope"),
                    span,
                )
                .with_related(existing, "previous definition is here"),
            );
        }
    }

    // ── Pass 2: functions ──────────────────────────────────────────────

    fn check_func(&mut self, func: &'a CoreFunc, span: Span) {
        self.symbols.push(ScopeKind::Function);

        self.check_signature_types(func, span);

        for param in &func.params {
            self.define(&param.name, param.ty.clone(), SymbolKind::Param, span);
        }

        self.current = Some(FnState {
            name: func.name.clone(),
            ret: func.ret.clone(),
            declared: EffectSet::of(&func.effects),
            summary: EffectSet::empty(),
            reported: EffectSet::empty(),
            caps: func.effect_caps.clone(),
            enforce_caps: func.effect_caps_explicit || !func.effect_caps.is_empty(),
        });

        self.check_block(&func.body);

        let state = self.current.take().expect("function state set above");
        for effect in [Effect::Io, Effect::Cpu] {
            if state.declared.contains(effect) && !state.summary.contains(effect) {
                let code = match effect {
                    Effect::Io => ErrorCode::EFF_SUPERFLUOUS_IO,
                    _ => ErrorCode::EFF_SUPERFLUOUS_CPU,
                };
                self.warning(
                    code,
                    format!("rule `{}` declares `{effect}` but never performs it", state.name),
                    span,
                );
            }
        }

        self.symbols.pop();
    }

    /// Signature validation: unknown type names, undeclared type/effect
    /// variables, unused declared parameters.
    fn check_signature_types(&mut self, func: &CoreFunc, span: Span) {
        for effect_ref in &func.declared_effects {
            if let EffectRef::Var { name } = effect_ref {
                if !func.effect_params.contains(name) {
                    self.error(
                        ErrorCode::EFFECT_VAR_UNDECLARED,
                        format!("effect variable `{name}` is not declared by rule `{}`", func.name),
                        span,
                    );
                }
            }
        }

        let mut used_type_vars = FxHashSet::default();
        let mut used_effect_vars = FxHashSet::default();
        for param in &func.params {
            self.check_type_names(&param.ty, func, span, &mut used_type_vars, &mut used_effect_vars);
        }
        self.check_type_names(&func.ret, func, span, &mut used_type_vars, &mut used_effect_vars);

        for tp in &func.type_params {
            if !used_type_vars.contains(tp.as_str()) {
                self.warning(
                    ErrorCode::TYPE_PARAM_UNUSED,
                    format!("type parameter `{tp}` is not used by rule `{}`", func.name),
                    span,
                );
            }
        }
        let declared_vars: FxHashSet<&str> = func
            .declared_effects
            .iter()
            .filter_map(|e| match e {
                EffectRef::Var { name } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        for ep in &func.effect_params {
            if !declared_vars.contains(ep.as_str()) && !used_effect_vars.contains(ep.as_str()) {
                self.warning(
                    ErrorCode::TYPE_PARAM_UNUSED,
                    format!("effect parameter `{ep}` is not used by rule `{}`", func.name),
                    span,
                );
            }
        }
    }

    fn check_type_names(
        &mut self,
        ty: &Type,
        func: &CoreFunc,
        span: Span,
        used_type_vars: &mut FxHashSet<String>,
        used_effect_vars: &mut FxHashSet<String>,
    ) {
        match ty {
            Type::Name { name } => {
                let known = BUILTIN_TYPES.contains(&name.as_str())
                    || self.datas.contains_key(name)
                    || self.enums.contains_key(name);
                if !known {
                    if name.chars().count() == 1
                        && name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
                    {
                        self.error(
                            ErrorCode::TYPEVAR_LIKE_UNDECLARED,
                            format!("`{name}` looks like a type variable but is not declared"),
                            span,
                        );
                    } else {
                        self.error(
                            ErrorCode::UNKNOWN_TYPE,
                            format!("unknown type `{name}`"),
                            span,
                        );
                    }
                }
            }
            Type::Var { name } => {
                used_type_vars.insert(name.clone());
                if !func.type_params.contains(name) {
                    self.error(
                        ErrorCode::TYPE_VAR_UNDECLARED,
                        format!("type variable `{name}` is not declared by rule `{}`", func.name),
                        span,
                    );
                }
            }
            Type::EffectVar { name } => {
                used_effect_vars.insert(name.clone());
                if !func.effect_params.contains(name) {
                    self.error(
                        ErrorCode::EFFECT_VAR_UNDECLARED,
                        format!("effect variable `{name}` is not declared by rule `{}`", func.name),
                        span,
                    );
                }
            }
            Type::Maybe { inner } | Type::Option { inner } | Type::List { inner } => {
                self.check_type_names(inner, func, span, used_type_vars, used_effect_vars);
            }
            Type::Result { ok, err } => {
                self.check_type_names(ok, func, span, used_type_vars, used_effect_vars);
                self.check_type_names(err, func, span, used_type_vars, used_effect_vars);
            }
            Type::Map { key, value } => {
                self.check_type_names(key, func, span, used_type_vars, used_effect_vars);
                self.check_type_names(value, func, span, used_type_vars, used_effect_vars);
            }
            Type::App { args, .. } => {
                for arg in args {
                    self.check_type_names(arg, func, span, used_type_vars, used_effect_vars);
                }
            }
            Type::Func { params, ret, declared_effects, .. } => {
                for param in params {
                    self.check_type_names(param, func, span, used_type_vars, used_effect_vars);
                }
                self.check_type_names(ret, func, span, used_type_vars, used_effect_vars);
                for effect_ref in declared_effects.as_deref().unwrap_or(&[]) {
                    if let EffectRef::Var { name } = effect_ref {
                        used_effect_vars.insert(name.clone());
                    }
                }
            }
            Type::Pii { base, .. } => {
                self.check_type_names(base, func, span, used_type_vars, used_effect_vars);
            }
        }
    }

    // ── Statements ─────────────────────────────────────────────────────

    /// Check a block; returns the type of its trailing `Return`, when one
    /// is statically known.
    fn check_block(&mut self, block: &CoreBlock) -> Option<Type> {
        let mut ret_ty = None;
        for stmt in &block.stmts {
            if let Some(t) = self.check_stmt(stmt) {
                ret_ty = Some(t);
            }
        }
        ret_ty
    }

    fn check_stmt(&mut self, stmt: &CoreStmt) -> Option<Type> {
        let span = stmt.origin.span();
        match &stmt.kind {
            CoreStmtKind::Let { name, value } => {
                let ty = self.expr_type(value);
                self.define(name, ty, SymbolKind::Var, span);
                None
            }
            CoreStmtKind::Set { name, value } => {
                let value_ty = self.expr_type(value);
                match self.symbols.lookup(name).map(|s| s.ty.clone()) {
                    Some(target_ty) => {
                        if !is_subtype(&value_ty, &target_ty) {
                            self.error(
                                ErrorCode::TYPE_MISMATCH_ASSIGN,
                                format!(
                                    "cannot set `{name}` of type `{target_ty}` to a value of type `{value_ty}`"
                                ),
                                span,
                            );
                        }
                    }
                    None => {
                        self.error(
                            ErrorCode::UNDEFINED_VARIABLE,
                            format!("`{name}` is not defined"),
                            span,
                        );
                    }
                }
                None
            }
            CoreStmtKind::Return { value } => {
                let ty = self.expr_type(value);
                if let Some(state) = &self.current {
                    let ret = state.ret.clone();
                    if !is_subtype(&ty, &ret) {
                        let name = state.name.clone();
                        self.error(
                            ErrorCode::RETURN_TYPE_MISMATCH,
                            format!(
                                "rule `{name}` produces `{ret}` but this returns `{ty}`"
                            ),
                            span,
                        );
                    }
                }
                Some(ty)
            }
            CoreStmtKind::If {
                cond,
                then_block,
                else_block,
            } => {
                self.expr_type(cond);
                self.symbols.push(ScopeKind::Block);
                let then_ty = self.check_block(then_block);
                self.symbols.pop();
                let else_ty = else_block.as_ref().and_then(|b| {
                    self.symbols.push(ScopeKind::Block);
                    let t = self.check_block(b);
                    self.symbols.pop();
                    t
                });
                if let (Some(a), Some(b)) = (&then_ty, &else_ty) {
                    if !compatible(a, b) {
                        self.error(
                            ErrorCode::MATCH_BRANCH_MISMATCH,
                            format!("branches return incompatible types `{a}` and `{b}`"),
                            span,
                        );
                    }
                }
                then_ty.or(else_ty)
            }
            CoreStmtKind::Match { scrutinee, arms } => {
                let scrutinee_ty = self.expr_type(scrutinee);
                let mut first_arm_ty: Option<Type> = None;
                for arm in arms {
                    self.symbols.push(ScopeKind::MatchArm);
                    self.bind_pattern(&arm.pattern, &scrutinee_ty);
                    let arm_ty = self.check_block(&arm.body);
                    self.symbols.pop();
                    if let Some(t) = arm_ty {
                        match &first_arm_ty {
                            Some(first) if !compatible(first, &t) => {
                                self.error(
                                    ErrorCode::MATCH_BRANCH_MISMATCH,
                                    format!(
                                        "match arms return incompatible types `{first}` and `{t}`"
                                    ),
                                    arm.pattern.origin.span(),
                                );
                            }
                            None => first_arm_ty = Some(t),
                            _ => {}
                        }
                    }
                }
                if let Some(diag) =
                    exhaustive::check_match(&scrutinee_ty, arms, &self.enums, span)
                {
                    self.diags.push(diag);
                }
                first_arm_ty
            }
            CoreStmtKind::Workflow(wf) => {
                workflow::check_workflow(wf, &self.options.workflow_policy, span, &mut self.diags);
                for step in &wf.steps {
                    self.symbols.push(ScopeKind::Block);
                    self.check_block(&step.body);
                    if let Some(compensate) = &step.compensate {
                        self.check_block(compensate);
                    }
                    self.symbols.pop();
                }
                None
            }
            CoreStmtKind::Start { name, value } => {
                let ty = self.expr_type(value);
                self.define(name, ty, SymbolKind::Var, span);
                None
            }
            CoreStmtKind::Wait { names } => {
                for name in names {
                    if self.symbols.lookup(name).is_none() {
                        self.error(
                            ErrorCode::UNDEFINED_VARIABLE,
                            format!("`{name}` is not defined"),
                            span,
                        );
                    }
                }
                None
            }
            CoreStmtKind::Scope { body } => {
                self.symbols.push(ScopeKind::Block);
                let t = self.check_block(body);
                self.symbols.pop();
                t
            }
        }
    }

    fn bind_pattern(&mut self, pattern: &CorePattern, scrutinee_ty: &Type) {
        let span = pattern.origin.span();
        match &pattern.kind {
            CorePatternKind::Null | CorePatternKind::Int { .. } => {}
            CorePatternKind::Name { name } => {
                self.define(name, scrutinee_ty.clone(), SymbolKind::Var, span);
            }
            CorePatternKind::Ctor {
                type_name,
                names,
                args,
            } => {
                let component_tys = self.ctor_components(type_name, scrutinee_ty, args.len());
                for (arg, ty) in args.iter().zip(component_tys) {
                    self.bind_pattern(arg, &ty);
                }
                // Legacy flat bindings carry no type information.
                for name in names {
                    self.define(name, Type::unknown(), SymbolKind::Var, span);
                }
            }
        }
    }

    /// Component types for a constructor pattern against the scrutinee.
    fn ctor_components(&self, ctor: &str, scrutinee: &Type, arity: usize) -> Vec<Type> {
        let scrutinee = scrutinee.without_pii();
        let component = match (ctor, scrutinee) {
            ("Ok", Type::Result { ok, .. }) => Some((**ok).clone()),
            ("Err", Type::Result { err, .. }) => Some((**err).clone()),
            ("Some", Type::Option { inner }) | ("Some", Type::Maybe { inner }) => {
                Some((**inner).clone())
            }
            _ => None,
        };
        if let Some(ty) = component {
            return std::iter::repeat(ty).take(arity).collect();
        }
        if let Type::Name { name } = scrutinee {
            if let Some(fields) = self.datas.get(name) {
                return fields
                    .iter()
                    .take(arity)
                    .map(|f| f.ty.clone())
                    .chain(std::iter::repeat(Type::unknown()))
                    .take(arity)
                    .collect();
            }
        }
        vec![Type::unknown(); arity]
    }

    // ── Expressions ────────────────────────────────────────────────────

    fn expr_type(&mut self, expr: &CoreExpr) -> Type {
        let span = expr.origin.span();
        match &expr.kind {
            CoreExprKind::Name { name } => self.name_type(name, span),
            CoreExprKind::Bool { .. } => Type::bool(),
            CoreExprKind::Int { .. } => Type::int(),
            CoreExprKind::Long { .. } => Type::long(),
            CoreExprKind::Float { .. } => Type::double(),
            CoreExprKind::Str { .. } => Type::text(),
            CoreExprKind::Null => Type::maybe(Type::unknown()),
            CoreExprKind::Ok { value } => Type::result(self.expr_type(value), Type::unknown()),
            CoreExprKind::Err { value } => Type::result(Type::unknown(), self.expr_type(value)),
            CoreExprKind::Some { value } => Type::option(self.expr_type(value)),
            CoreExprKind::None => Type::option(Type::unknown()),
            CoreExprKind::Await { value } => {
                let inner_ty = self.expr_type(value);
                match inner_ty.without_pii() {
                    Type::Maybe { inner } | Type::Option { inner } => (**inner).clone(),
                    Type::Result { ok, .. } => (**ok).clone(),
                    other if other.is_unknown() => Type::unknown(),
                    other => {
                        self.error(
                            ErrorCode::AWAIT_TYPE,
                            format!(
                                "await requires Maybe, Option, or Result, found `{other}`"
                            ),
                            span,
                        );
                        Type::unknown()
                    }
                }
            }
            CoreExprKind::Construct { type_name, fields } => {
                self.check_construct(type_name, fields, span)
            }
            CoreExprKind::Lambda {
                params, ret, body, ..
            } => {
                self.symbols.push(ScopeKind::Lambda);
                for param in params {
                    self.define(&param.name, param.ty.clone(), SymbolKind::Param, span);
                }
                self.check_block(body);
                self.symbols.pop();
                Type::func(params.iter().map(|p| p.ty.clone()).collect(), ret.clone())
            }
            CoreExprKind::Call { target, args } => self.check_call(target, args, span),
        }
    }

    /// The type of a (possibly dotted) name in expression position.
    fn name_type(&mut self, name: &str, span: Span) -> Type {
        if let Some((first, rest)) = name.split_once('.') {
            // A dotted name rooted at a local symbol is a field path.
            if let Some(root_ty) = self.symbols.lookup(first).map(|s| s.ty.clone()) {
                return self.field_path_type(root_ty, rest, span);
            }
            // Otherwise it names a module or builtin function; calls
            // resolve those, and as a bare value its type is unknown.
            return Type::unknown();
        }
        if let Some(symbol) = self.symbols.lookup(name) {
            return symbol.ty.clone();
        }
        if let Some(owner) = self.variant_owners.get(name) {
            return Type::name(owner);
        }
        self.error(
            ErrorCode::UNDEFINED_VARIABLE,
            format!("`{name}` is not defined"),
            span,
        );
        Type::unknown()
    }

    fn field_path_type(&mut self, root: Type, path: &str, span: Span) -> Type {
        let mut current = root;
        for segment in path.split('.') {
            let lookup = current.without_pii().clone();
            let Type::Name { name } = &lookup else {
                return Type::unknown();
            };
            let Some(fields) = self.datas.get(name).copied() else {
                return Type::unknown();
            };
            match fields.iter().find(|f| f.name == segment) {
                Some(field) => current = field.ty.clone(),
                None => {
                    self.error(
                        ErrorCode::UNKNOWN_FIELD,
                        format!("type `{name}` has no field `{segment}`"),
                        span,
                    );
                    return Type::unknown();
                }
            }
        }
        current
    }

    fn check_construct(
        &mut self,
        type_name: &str,
        fields: &[aster_core::CoreFieldInit],
        span: Span,
    ) -> Type {
        let Some(decl_fields) = self.datas.get(type_name).copied() else {
            self.error(
                ErrorCode::UNKNOWN_TYPE,
                format!("unknown type `{type_name}` in construction"),
                span,
            );
            for field in fields {
                self.expr_type(&field.value);
            }
            return Type::unknown();
        };

        for field in fields {
            let value_ty = self.expr_type(&field.value);
            match decl_fields.iter().find(|f| f.name == field.name) {
                Some(decl) => {
                    if !is_subtype(&value_ty, &decl.ty) {
                        self.error(
                            ErrorCode::FIELD_TYPE_MISMATCH,
                            format!(
                                "field `{}` of `{type_name}` expects `{}`, found `{value_ty}`",
                                field.name, decl.ty
                            ),
                            field.value.origin.span(),
                        );
                    }
                }
                None => {
                    self.error(
                        ErrorCode::UNKNOWN_FIELD,
                        format!("type `{type_name}` has no field `{}`", field.name),
                        field.value.origin.span(),
                    );
                }
            }
        }

        for decl in decl_fields {
            let required = decl
                .constraints
                .iter()
                .any(|c| matches!(c, aster_core::CoreConstraint::Required));
            if required && !fields.iter().any(|f| f.name == decl.name) {
                self.error(
                    ErrorCode::MISSING_REQUIRED_FIELD,
                    format!("required field `{}` of `{type_name}` is missing", decl.name),
                    span,
                );
            }
        }

        Type::name(type_name)
    }

    // ── Calls ──────────────────────────────────────────────────────────

    fn check_call(&mut self, target: &CoreExpr, args: &[CoreExpr], span: Span) -> Type {
        let CoreExprKind::Name { name } = &target.kind else {
            // Calls always target names in the surface language.
            for arg in args {
                self.expr_type(arg);
            }
            return Type::unknown();
        };
        let name = name.clone();

        if let Some(ty) = self.check_operator(&name, args, span) {
            return ty;
        }

        let arg_tys: Vec<(Type, Span)> = args
            .iter()
            .map(|a| (self.expr_type(a), a.origin.span()))
            .collect();

        let Some(sig) = self.resolve_callee(&name, span) else {
            return Type::unknown();
        };

        if args.len() != sig.params.len() {
            self.error(
                ErrorCode::CALL_ARITY,
                format!(
                    "`{name}` expects {} argument(s), found {}",
                    sig.params.len(),
                    args.len()
                ),
                span,
            );
        }

        let mut bindings = Bindings::default();
        for ((arg_ty, arg_span), param_ty) in arg_tys.iter().zip(&sig.params) {
            let fits = if matches!(param_ty, Type::Var { .. }) || has_type_var(param_ty) {
                unify(param_ty, arg_ty, &mut bindings)
            } else {
                is_subtype(arg_ty, param_ty)
            };
            if !fits {
                self.error(
                    ErrorCode::CALL_ARG_TYPE,
                    format!(
                        "argument to `{name}` expects `{param_ty}`, found `{arg_ty}`"
                    ),
                    *arg_span,
                );
            }
        }

        self.record_effects(&name, &sig.effects, span);
        self.enforce_capabilities(&name, &sig.caps, span);

        if self.options.enforce_pii && !sig.pii_safe {
            if let Some(code) = sig.leak_code {
                for (arg_ty, arg_span) in &arg_tys {
                    if contains_pii(arg_ty) {
                        self.error(
                            code,
                            format!("PII value flows into `{name}`"),
                            *arg_span,
                        );
                    }
                }
            }
        }

        substitute(&sig.ret, &bindings)
    }

    /// Arithmetic, comparison, and logical operator calls.
    fn check_operator(&mut self, name: &str, args: &[CoreExpr], span: Span) -> Option<Type> {
        let arity = match name {
            "not" => 1,
            "+" | "-" | "*" | "/" | "<" | ">" | "==" | ">=" | "<=" => 2,
            _ => return None,
        };
        if args.len() != arity {
            self.error(
                ErrorCode::CALL_ARITY,
                format!("`{name}` expects {arity} argument(s), found {}", args.len()),
                span,
            );
        }
        let arg_tys: Vec<Type> = args.iter().map(|a| self.expr_type(a)).collect();

        match name {
            "not" => Some(Type::bool()),
            "<" | ">" | "==" | ">=" | "<=" => Some(Type::bool()),
            _ => {
                let mut saw_text = false;
                let mut saw_double = false;
                let mut saw_long = false;
                for ty in &arg_tys {
                    match ty.without_pii() {
                        Type::Name { name: n } if n == "Text" => saw_text = true,
                        Type::Name { name: n } if n == "Double" => saw_double = true,
                        Type::Name { name: n } if n == "Long" => saw_long = true,
                        Type::Name { name: n } if n == "Int" || n == "Unknown" => {}
                        Type::Var { .. } => {}
                        other => {
                            self.error(
                                ErrorCode::CALL_ARG_TYPE,
                                format!("operator `{name}` cannot be applied to `{other}`"),
                                span,
                            );
                        }
                    }
                }
                if saw_text {
                    if name != "+" {
                        self.error(
                            ErrorCode::CALL_ARG_TYPE,
                            format!("operator `{name}` cannot be applied to `Text`"),
                            span,
                        );
                    }
                    Some(Type::text())
                } else if saw_double {
                    Some(Type::double())
                } else if saw_long {
                    Some(Type::long())
                } else {
                    Some(Type::int())
                }
            }
        }
    }

    fn resolve_callee(&mut self, name: &str, span: Span) -> Option<CalleeSig> {
        if let Some((qual, func_name)) = name.rsplit_once('.') {
            if let Some(module_name) = self.imports.get(qual).cloned() {
                return self.resolve_import_call(&module_name, func_name, span);
            }
            if let Some(sig) = builtins::lookup(name) {
                return Some(CalleeSig::from_builtin(name, sig));
            }
            // A dotted call rooted at a local record value; permissive.
            if self.symbols.lookup(qual.split('.').next().unwrap_or(qual)).is_some() {
                return None;
            }
            self.error(
                ErrorCode::UNDEFINED_VARIABLE,
                format!("unknown function `{name}`"),
                span,
            );
            return None;
        }

        if let Some(func) = self.module.func(name) {
            return Some(CalleeSig::from_func(func));
        }
        match self.symbols.lookup(name).map(|s| s.ty.clone()) {
            Some(Type::Func { params, ret, .. }) => Some(CalleeSig {
                params,
                ret: *ret,
                effects: Vec::new(),
                caps: Vec::new(),
                pii_safe: true,
                leak_code: None,
            }),
            Some(ty) if ty.is_unknown() => None,
            Some(ty) => {
                self.error(
                    ErrorCode::CALL_ARG_TYPE,
                    format!("`{name}` of type `{ty}` is not callable"),
                    span,
                );
                None
            }
            None => {
                self.error(
                    ErrorCode::UNDEFINED_VARIABLE,
                    format!("`{name}` is not defined"),
                    span,
                );
                None
            }
        }
    }

    fn resolve_import_call(
        &mut self,
        module_name: &str,
        func_name: &str,
        span: Span,
    ) -> Option<CalleeSig> {
        let Some(cache) = self.options.module_cache.as_ref().map(Arc::clone) else {
            self.error(
                ErrorCode::UNDEFINED_MODULE,
                format!("cannot resolve module `{module_name}`: no module cache configured"),
                span,
            );
            return None;
        };
        let mut visiting = vec![self.module.name.clone()];
        let loaded = cache.load(
            module_name,
            &self.options.module_search_paths,
            self.options.file_source.as_ref(),
            &self.lexicon,
            &mut visiting,
        );
        match loaded {
            Result::Ok(core) => match core.func(func_name) {
                Some(func) => Some(CalleeSig::from_func(func)),
                None => {
                    self.error(
                        ErrorCode::UNDEFINED_VARIABLE,
                        format!("module `{module_name}` has no rule `{func_name}`"),
                        span,
                    );
                    None
                }
            },
            Result::Err(ModuleLoadError::NotFound { name }) => {
                self.error(
                    ErrorCode::UNDEFINED_MODULE,
                    format!("module `{name}` was not found on the search paths"),
                    span,
                );
                None
            }
            Result::Err(ModuleLoadError::Cycle { chain }) => {
                self.error(
                    ErrorCode::MODULE_CYCLE,
                    format!("module imports form a cycle: {}", chain.join(" -> ")),
                    span,
                );
                None
            }
            Result::Err(ModuleLoadError::Compile { name, error }) => {
                self.error(
                    error.code,
                    format!("in module `{name}`: {}", error.message),
                    span,
                );
                None
            }
        }
    }

    fn record_effects(&mut self, callee: &str, effects: &[Effect], span: Span) {
        let mut pending: Vec<(ErrorCode, String)> = Vec::new();
        if let Some(state) = self.current.as_mut() {
            for effect in effects {
                state.summary.insert(*effect);
                if !state.declared.contains(*effect) && !state.reported.contains(*effect) {
                    state.reported.insert(*effect);
                    let code = match effect {
                        Effect::Io => ErrorCode::EFF_MISSING_IO,
                        Effect::Cpu => ErrorCode::EFF_MISSING_CPU,
                        _ => continue,
                    };
                    pending.push((
                        code,
                        format!(
                            "call to `{callee}` performs `{effect}` but rule `{}` does not declare it",
                            state.name
                        ),
                    ));
                }
            }
        }
        for (code, message) in pending {
            self.error(code, message, span);
        }
    }

    fn enforce_capabilities(&mut self, callee: &str, caps: &[Capability], span: Span) {
        let Some(state) = self.current.as_ref() else {
            return;
        };
        if !state.enforce_caps {
            return;
        }
        let missing: Vec<Capability> = caps
            .iter()
            .copied()
            .filter(|cap| !state.caps.contains(cap))
            .collect();
        let name = state.name.clone();
        for cap in missing {
            self.error(
                ErrorCode::CAPABILITY_NOT_DECLARED,
                format!(
                    "call to `{callee}` requires capability {cap}, which rule `{name}` does not declare"
                ),
                span,
            );
        }
    }
}

fn compatible(a: &Type, b: &Type) -> bool {
    is_subtype(a, b) || is_subtype(b, a)
}

fn has_type_var(ty: &Type) -> bool {
    match ty {
        Type::Var { .. } => true,
        Type::EffectVar { .. } => false,
        Type::Maybe { inner } | Type::Option { inner } | Type::List { inner } => {
            has_type_var(inner)
        }
        Type::Result { ok, err } => has_type_var(ok) || has_type_var(err),
        Type::Map { key, value } => has_type_var(key) || has_type_var(value),
        Type::App { args, .. } => args.iter().any(has_type_var),
        Type::Func { params, ret, .. } => params.iter().any(has_type_var) || has_type_var(ret),
        Type::Pii { base, .. } => has_type_var(base),
        Type::Name { .. } => false,
    }
}
