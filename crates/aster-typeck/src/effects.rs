//! Effect rows over the `PURE < CPU < IO < WORKFLOW` lattice.
//!
//! An effect row is a bitset of concrete lattice points plus a list of
//! effect variables. Row unification is bitset union plus variable binding
//! through an `ena` union-find table; a variable unifies once, and
//! re-binding it to a different concrete effect fails.

use std::fmt;

use aster_common::Effect;
use ena::unify::{InPlaceUnificationTable, UnifyKey, UnifyValue};
use rustc_hash::FxHashMap;

/// A set of concrete effects, one bit per lattice point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectSet(u8);

impl EffectSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn of(effects: &[Effect]) -> Self {
        let mut set = Self::empty();
        for e in effects {
            set.insert(*e);
        }
        set
    }

    pub fn insert(&mut self, effect: Effect) {
        self.0 |= 1 << effect.rank();
    }

    pub fn contains(&self, effect: Effect) -> bool {
        self.0 & (1 << effect.rank()) != 0
    }

    pub fn union(&self, other: EffectSet) -> EffectSet {
        EffectSet(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The highest lattice point present, if any.
    pub fn peak(&self) -> Option<Effect> {
        self.iter().max()
    }

    pub fn iter(&self) -> impl Iterator<Item = Effect> + '_ {
        [Effect::Pure, Effect::Cpu, Effect::Io, Effect::Workflow]
            .into_iter()
            .filter(|e| self.contains(*e))
    }
}

impl fmt::Display for EffectSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|e| e.as_str()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// An effect row: concrete effects plus unresolved effect variables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectRow {
    pub concrete: EffectSet,
    pub vars: Vec<String>,
}

impl EffectRow {
    pub fn concrete(effects: &[Effect]) -> Self {
        Self {
            concrete: EffectSet::of(effects),
            vars: Vec::new(),
        }
    }
}

/// Union-find key for effect variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffVar(u32);

impl UnifyKey for EffVar {
    type Value = EffBinding;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        EffVar(u)
    }

    fn tag() -> &'static str {
        "EffVar"
    }
}

/// The value carried by an effect variable: unbound, or a concrete effect.
#[derive(Debug, Clone, PartialEq)]
pub struct EffBinding(pub Option<Effect>);

/// A conflicting re-binding of an effect variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffConflict(pub Effect, pub Effect);

impl fmt::Display for EffConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect variable already bound to `{}`, cannot bind `{}`", self.0, self.1)
    }
}

impl UnifyValue for EffBinding {
    type Error = EffConflict;

    fn unify_values(a: &Self, b: &Self) -> Result<Self, EffConflict> {
        match (a.0, b.0) {
            (None, other) | (other, None) => Ok(EffBinding(other)),
            (Some(x), Some(y)) if x == y => Ok(EffBinding(Some(x))),
            (Some(x), Some(y)) => Err(EffConflict(x, y)),
        }
    }
}

/// Interns named effect variables and tracks their bindings.
pub struct EffectTable {
    table: InPlaceUnificationTable<EffVar>,
    names: FxHashMap<String, EffVar>,
}

impl Default for EffectTable {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectTable {
    pub fn new() -> Self {
        Self {
            table: InPlaceUnificationTable::new(),
            names: FxHashMap::default(),
        }
    }

    /// The key for a named variable, interning it on first use.
    pub fn var(&mut self, name: &str) -> EffVar {
        if let Some(key) = self.names.get(name) {
            return *key;
        }
        let key = self.table.new_key(EffBinding(None));
        self.names.insert(name.to_string(), key);
        key
    }

    /// Bind a named variable to a concrete effect. Binding the same effect
    /// twice is a no-op; a different effect is a conflict.
    pub fn bind(&mut self, name: &str, effect: Effect) -> Result<(), EffConflict> {
        let key = self.var(name);
        self.table.unify_var_value(key, EffBinding(Some(effect)))
    }

    /// Unify two named variables.
    pub fn unify_vars(&mut self, a: &str, b: &str) -> Result<(), EffConflict> {
        let ka = self.var(a);
        let kb = self.var(b);
        self.table.unify_var_var(ka, kb)
    }

    /// The concrete effect a named variable resolved to, if bound.
    pub fn resolve(&mut self, name: &str) -> Option<Effect> {
        let key = self.var(name);
        self.table.probe_value(key).0
    }
}

/// Unify two rows: union the concrete sets and unify the variable lists
/// pairwise into the table. Surplus variables on either side stay free.
pub fn unify_rows(
    a: &EffectRow,
    b: &EffectRow,
    table: &mut EffectTable,
) -> Result<EffectRow, EffConflict> {
    for (va, vb) in a.vars.iter().zip(b.vars.iter()) {
        table.unify_vars(va, vb)?;
    }
    let mut vars: Vec<String> = a.vars.clone();
    for v in &b.vars {
        if !vars.contains(v) {
            vars.push(v.clone());
        }
    }
    Ok(EffectRow {
        concrete: a.concrete.union(b.concrete),
        vars,
    })
}
