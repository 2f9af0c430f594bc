//! The rewrite rule engine.
//!
//! Rules are conservative pattern matchers: a rule either finds its exact
//! pattern, performs local graph surgery and reports `true`, or leaves the
//! plan byte-for-byte unchanged and reports `false`. The engine drives the
//! catalog to a fixed point and re-verifies plan invariants after every
//! applied rewrite.

mod engine;
mod rules;

#[cfg(test)]
mod engine_tests;
#[cfg(test)]
mod rules_tests;

pub use engine::{RewriteContext, RewriteEngine, RewriteError, RewriteRule, RewriteStats};
pub use rules::{
    ConsolidateAssignAggregateRule, EliminateDeadAssignRule, FoldCastableConstantRule,
};
