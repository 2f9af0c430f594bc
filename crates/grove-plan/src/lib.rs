//! Logical plan algebra and rewrite rule engine for Grove.
//!
//! The front end hands this crate a DAG of algebraic operators over
//! expressions; the rewrite engine applies a catalog of conservative,
//! pattern-matching rules to a fixed point; a lowering stage then binds
//! function identifiers to evaluator factories (grove-runtime).
//!
//! Operators live in an arena addressed by stable `OpId`s with owned edge
//! lists. Rewrites splice edge ids instead of mutating shared pointers, so
//! acyclicity and rule footprints are checkable by id-set operations.

pub mod algebra;
pub mod catalog;
pub mod rewrite;
pub mod snapshot;


pub use algebra::{
    ConstantValue, Expression, ItemType, LogicalPlan, NestedPlan, OpId, Operator, OperatorKind,
    Quantifier, SequenceType, VariableId,
};
pub use catalog::{Arity, FunctionCatalog, FunctionId, builtins};
pub use rewrite::{
    ConsolidateAssignAggregateRule, EliminateDeadAssignRule, FoldCastableConstantRule,
    RewriteContext, RewriteEngine, RewriteError, RewriteRule, RewriteStats,
};
