//! Dead assign elimination.
//!
//! Bottom-up: an Assign whose bound variable has no remaining consumer is
//! spliced out by redirecting its consumers to its input. Plan roots and
//! nested-plan roots are never removed; they produce results regardless of
//! variable consumption.

use crate::algebra::{LogicalPlan, OpId, OperatorKind};
use crate::rewrite::engine::{RewriteContext, RewriteError, RewriteRule};

pub struct EliminateDeadAssignRule;

impl RewriteRule for EliminateDeadAssignRule {
    fn name(&self) -> &'static str {
        "eliminate-dead-assign"
    }

    fn rewrite_post(
        &self,
        plan: &mut LogicalPlan,
        op: OpId,
        _ctx: &RewriteContext<'_>,
    ) -> Result<bool, RewriteError> {
        if plan.roots().contains(&op) || is_nested_root(plan, op) {
            return Ok(false);
        }
        let variable = {
            let OperatorKind::Assign { variable, .. } = &plan.operator(op).kind else {
                return Ok(false);
            };
            *variable
        };
        if plan.operator(op).inputs.len() != 1 {
            return Ok(false);
        }
        if plan.referenced_variables().contains(&variable) {
            return Ok(false);
        }
        let consumers = plan.consumers(op);
        if consumers.is_empty() {
            return Ok(false);
        }

        let replacement = plan.operator(op).inputs[0];
        for consumer in consumers {
            for input in &mut plan.operator_mut(consumer).inputs {
                if *input == op {
                    *input = replacement;
                }
            }
        }
        Ok(true)
    }
}

/// Whether `op` is a nested-plan root of any reachable Subplan.
fn is_nested_root(plan: &LogicalPlan, op: OpId) -> bool {
    plan.pre_order().into_iter().any(|id| {
        if let OperatorKind::Subplan { plans } = &plan.operator(id).kind {
            plans.iter().any(|nested| nested.roots.contains(&op))
        } else {
            false
        }
    })
}
