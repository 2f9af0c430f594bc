//! Fixed-point rewrite driver.

use std::collections::HashSet;

use crate::algebra::{LogicalPlan, OpId};
use crate::catalog::FunctionCatalog;

/// Rewrite failure. A failing rule aborts compilation; nothing is caught or
/// retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
    /// A rule's preconditions appeared satisfied but the plan failed
    /// post-mutation verification. Compilation must abort rather than hand
    /// an unverified plan to lowering.
    #[error("rewrite invariant violation after rule {rule}: {detail}")]
    InvariantViolation { rule: &'static str, detail: String },
}

/// Shared state handed to every rule invocation.
pub struct RewriteContext<'a> {
    pub catalog: &'a FunctionCatalog,
}

/// A plan-to-plan transformation rule.
///
/// `rewrite_pre` fires during the top-down visit, `rewrite_post` during the
/// bottom-up visit. Both return whether the plan was mutated. Rules must
/// validate every precondition before the first mutation.
pub trait RewriteRule {
    fn name(&self) -> &'static str;

    fn rewrite_pre(
        &self,
        plan: &mut LogicalPlan,
        op: OpId,
        ctx: &RewriteContext<'_>,
    ) -> Result<bool, RewriteError> {
        let _ = (plan, op, ctx);
        Ok(false)
    }

    fn rewrite_post(
        &self,
        plan: &mut LogicalPlan,
        op: OpId,
        ctx: &RewriteContext<'_>,
    ) -> Result<bool, RewriteError> {
        let _ = (plan, op, ctx);
        Ok(false)
    }
}

/// Outcome of an engine run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Completed passes, the final all-quiet pass included.
    pub passes: usize,
    /// Total applied rewrites.
    pub applications: usize,
    /// Whether a pass with zero rewrites was reached (vs. the pass bound).
    pub fixed_point: bool,
}

/// Drives a rule catalog over a plan until a fixed point.
///
/// Each pass runs every rule's pre phase over a fresh pre-order of the
/// reachable graph, then its post phase over a fresh post-order. The pass
/// bound guarantees termination against non-confluent rule interactions.
pub struct RewriteEngine {
    rules: Vec<Box<dyn RewriteRule>>,
    max_passes: usize,
}

const MAX_PASSES: usize = 64;

impl RewriteEngine {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            max_passes: MAX_PASSES,
        }
    }

    /// Engine loaded with the standard rule catalog.
    pub fn with_default_rules() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(super::rules::FoldCastableConstantRule));
        engine.add_rule(Box::new(super::rules::ConsolidateAssignAggregateRule));
        engine.add_rule(Box::new(super::rules::EliminateDeadAssignRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Box<dyn RewriteRule>) {
        self.rules.push(rule);
    }

    /// Override the pass bound.
    pub fn max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Run to fixed point (or the pass bound).
    pub fn run(
        &self,
        plan: &mut LogicalPlan,
        catalog: &FunctionCatalog,
    ) -> Result<RewriteStats, RewriteError> {
        let ctx = RewriteContext { catalog };
        let mut stats = RewriteStats::default();

        for _ in 0..self.max_passes {
            let mut applied = 0;
            for rule in &self.rules {
                applied += self.sweep(plan, &ctx, rule.as_ref(), Phase::Pre)?;
                applied += self.sweep(plan, &ctx, rule.as_ref(), Phase::Post)?;
            }
            stats.passes += 1;
            stats.applications += applied;
            if applied == 0 {
                stats.fixed_point = true;
                return Ok(stats);
            }
        }
        Ok(stats)
    }

    /// Visit every reachable operator once with one rule phase.
    ///
    /// The visit order is computed up front; nodes a previous application
    /// detached are skipped by re-checking reachability.
    fn sweep(
        &self,
        plan: &mut LogicalPlan,
        ctx: &RewriteContext<'_>,
        rule: &dyn RewriteRule,
        phase: Phase,
    ) -> Result<usize, RewriteError> {
        let order = match phase {
            Phase::Pre => plan.pre_order(),
            Phase::Post => plan.post_order(),
        };
        let mut reachable: HashSet<OpId> = order.iter().copied().collect();
        let mut applied = 0;

        for op in order {
            if !reachable.contains(&op) {
                continue;
            }
            let fired = match phase {
                Phase::Pre => rule.rewrite_pre(plan, op, ctx)?,
                Phase::Post => rule.rewrite_post(plan, op, ctx)?,
            };
            if fired {
                applied += 1;
                verify(plan, rule.name())?;
                reachable = plan.pre_order().into_iter().collect();
            }
        }
        Ok(applied)
    }
}

impl Default for RewriteEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
enum Phase {
    Pre,
    Post,
}

/// Post-mutation invariants: the reachable graph stays acyclic and no
/// variable reference dangles.
fn verify(plan: &LogicalPlan, rule: &'static str) -> Result<(), RewriteError> {
    if !plan.is_acyclic() {
        return Err(RewriteError::InvariantViolation {
            rule,
            detail: "plan graph contains a cycle".to_owned(),
        });
    }
    let defined = plan.defined_variables();
    let referenced = plan.referenced_variables();
    if let Some(dangling) = referenced.difference(&defined).next() {
        return Err(RewriteError::InvariantViolation {
            rule,
            detail: format!("variable {dangling} is referenced but has no producer"),
        });
    }
    Ok(())
}
