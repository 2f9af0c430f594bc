//! Function identifiers and the externally-provided function catalog.
//!
//! The catalog is configuration, not something the core computes: the host
//! registers which identifiers are aggregate functions (and their
//! aggregate-operator forms), which are transparent wrappers the aggregate
//! search may look through, and which identifier is the generic
//! sequence-building operator.

use std::borrow::Cow;
use std::fmt;

use grove_data::AtomicType;
use indexmap::{IndexMap, IndexSet};

/// Declared argument count of a function.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize)]
pub enum Arity {
    Exact(u8),
    Variadic,
}

/// Stable identifier of a function or operator.
///
/// Identity is the name plus arity; two ids with the same name and arity
/// denote the same function everywhere (plan, catalog, evaluator registry).
#[derive(Clone, PartialEq, Eq, Hash, Debug, serde::Serialize)]
pub struct FunctionId {
    name: Cow<'static, str>,
    arity: Arity,
}

impl FunctionId {
    pub const fn new(name: &'static str, arity: Arity) -> Self {
        Self {
            name: Cow::Borrowed(name),
            arity,
        }
    }

    pub fn named(name: String, arity: Arity) -> Self {
        Self {
            name: Cow::Owned(name),
            arity,
        }
    }

    /// The `op:castable-as-<type>` family member for `target`.
    pub fn castable_as(target: AtomicType) -> Self {
        Self::named(format!("op:castable-as-{}", target.name()), Arity::Exact(1))
    }

    /// The `op:cast-as-<type>` family member for `target`.
    pub fn cast_as(target: AtomicType) -> Self {
        Self::named(format!("op:cast-as-{}", target.name()), Arity::Exact(1))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn arity(&self) -> Arity {
        self.arity
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Well-known builtin identifiers.
pub mod builtins {
    use super::{Arity, FunctionId};

    /// Generic sequence construction (what an Aggregate reduces with before
    /// consolidation picks a specific aggregate).
    pub const SEQUENCE: FunctionId = FunctionId::new("op:sequence", Arity::Variadic);
    pub const COUNT: FunctionId = FunctionId::new("fn:count", Arity::Exact(1));
    pub const COUNT_AGGREGATE: FunctionId = FunctionId::new("fn:count-aggregate", Arity::Exact(1));
    pub const AVG: FunctionId = FunctionId::new("fn:avg", Arity::Exact(1));
    pub const AVG_AGGREGATE: FunctionId = FunctionId::new("fn:avg-aggregate", Arity::Exact(1));
    /// Type assertion wrapper; transparent to the aggregate search.
    pub const TREAT: FunctionId = FunctionId::new("op:treat", Arity::Exact(1));
    /// Numeric promotion wrapper; transparent to the aggregate search.
    pub const PROMOTE: FunctionId = FunctionId::new("op:promote", Arity::Exact(1));
    pub const COLLECTION: FunctionId = FunctionId::new("fn:collection", Arity::Exact(1));
    pub const BOOLEAN: FunctionId = FunctionId::new("fn:boolean", Arity::Exact(1));
}

/// Host-provided function configuration consulted by rewrite rules.
#[derive(Debug, Clone)]
pub struct FunctionCatalog {
    /// Scalar aggregate id -> its aggregate-operator form.
    aggregates: IndexMap<FunctionId, FunctionId>,
    /// Wrappers the aggregate-detection search may look through.
    transparent: IndexSet<FunctionId>,
    /// `op:castable-as-*` member -> target type.
    castable: IndexMap<FunctionId, AtomicType>,
    /// The generic sequence-building operator.
    sequence: FunctionId,
}

impl Default for FunctionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionCatalog {
    pub fn new() -> Self {
        Self {
            aggregates: IndexMap::new(),
            transparent: IndexSet::new(),
            castable: IndexMap::new(),
            sequence: builtins::SEQUENCE,
        }
    }

    /// Catalog wired with the builtin identifiers.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register_aggregate(builtins::COUNT, builtins::COUNT_AGGREGATE);
        catalog.register_aggregate(builtins::AVG, builtins::AVG_AGGREGATE);
        catalog.register_transparent(builtins::TREAT);
        catalog.register_transparent(builtins::PROMOTE);
        for atomic in AtomicType::ALL {
            catalog.register_castable(FunctionId::castable_as(atomic), atomic);
        }
        catalog
    }

    pub fn register_aggregate(&mut self, scalar: FunctionId, aggregate: FunctionId) {
        self.aggregates.insert(scalar, aggregate);
    }

    pub fn register_transparent(&mut self, id: FunctionId) {
        self.transparent.insert(id);
    }

    pub fn register_castable(&mut self, id: FunctionId, target: AtomicType) {
        self.castable.insert(id, target);
    }

    /// The aggregate-operator form of a scalar aggregate identifier.
    pub fn aggregate_form(&self, id: &FunctionId) -> Option<&FunctionId> {
        self.aggregates.get(id)
    }

    /// Whether the aggregate search may look through a call to `id`.
    pub fn is_transparent(&self, id: &FunctionId) -> bool {
        self.transparent.contains(id)
    }

    /// The castability target of an `op:castable-as-*` member.
    pub fn castable_target(&self, id: &FunctionId) -> Option<AtomicType> {
        self.castable.get(id).copied()
    }

    /// The generic sequence-building operator.
    pub fn sequence_op(&self) -> &FunctionId {
        &self.sequence
    }
}
