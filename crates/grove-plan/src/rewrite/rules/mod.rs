//! The rule catalog.

mod consolidate_aggregate;
mod eliminate_dead_assign;
mod fold_castable;

pub use consolidate_aggregate::ConsolidateAssignAggregateRule;
pub use eliminate_dead_assign::EliminateDeadAssignRule;
pub use fold_castable::FoldCastableConstantRule;
