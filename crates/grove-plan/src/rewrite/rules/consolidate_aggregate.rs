//! Aggregate consolidation.
//!
//! Pattern, top-down:
//! 1. an Assign whose expression calls a recognized scalar aggregate
//!    (e.g. `fn:count`) over a variable, possibly wrapped in transparent
//!    calls (`op:treat`, `op:promote`);
//! 2. that variable is produced — possibly through Subplan boundaries — by
//!    an Aggregate reducing with the generic `op:sequence` operator.
//!
//! Surgery: the Aggregate is repointed to the specific aggregate identifier
//! with the outer call's argument chain transplanted onto it, the outer
//! Assign becomes a pass-through of the aggregate's variable, and a
//! synthesized boolean-true Assign is inserted directly under the Aggregate
//! as its partitioning-variable source.
//!
//! Every precondition is validated before the first mutation; a non-match
//! leaves the plan untouched.

use std::collections::HashSet;

use crate::algebra::{ConstantValue, Expression, LogicalPlan, OpId, OperatorKind, VariableId};
use crate::catalog::FunctionCatalog;
use crate::rewrite::engine::{RewriteContext, RewriteError, RewriteRule};

pub struct ConsolidateAssignAggregateRule;

impl RewriteRule for ConsolidateAssignAggregateRule {
    fn name(&self) -> &'static str {
        "consolidate-assign-aggregate"
    }

    fn rewrite_pre(
        &self,
        plan: &mut LogicalPlan,
        op: OpId,
        ctx: &RewriteContext<'_>,
    ) -> Result<bool, RewriteError> {
        // Assign over a recognized scalar aggregate call.
        let outer_call = {
            let OperatorKind::Assign { expr, .. } = &plan.operator(op).kind else {
                return Ok(false);
            };
            expr.clone()
        };
        let Some((outer_fn, outer_args)) = outer_call.as_call() else {
            return Ok(false);
        };
        let Some(aggregate_id) = ctx.catalog.aggregate_form(outer_fn).cloned() else {
            return Ok(false);
        };
        let Some(first_arg) = outer_args.first() else {
            return Ok(false);
        };

        // Unwrap transparent wrappers down to the consumed variable.
        let Some((depth, variable)) = unwrap_to_variable(first_arg, ctx.catalog) else {
            return Ok(false);
        };

        // Search upward for the producing sequence-building Aggregate.
        let Some(&search_start) = plan.operator(op).inputs.first() else {
            return Ok(false);
        };
        let Some(found) = find_sequence_aggregate(plan, search_start, variable, ctx.catalog)
        else {
            return Ok(false);
        };

        // All preconditions hold; mutate.
        //
        // The Aggregate's new reduction: the specific aggregate over the outer
        // call's argument chain, its innermost variable replaced by the
        // sequence operator's original argument.
        let mut transplanted = first_arg.clone();
        replace_at_depth(&mut transplanted, depth, found.sequence_arg);
        {
            let OperatorKind::Aggregate { exprs, .. } = &mut plan.operator_mut(found.id).kind
            else {
                return Ok(false);
            };
            exprs[0] = Expression::call(aggregate_id, vec![transplanted]);
        }

        // The outer Assign forwards the now-aggregated variable.
        {
            let OperatorKind::Assign { expr, .. } = &mut plan.operator_mut(op).kind else {
                return Ok(false);
            };
            *expr = Expression::variable(variable);
        }

        // Partitioning source: a fresh boolean-true Assign directly under the
        // Aggregate.
        let true_var = plan.new_variable();
        let true_assign = plan.add_operator(
            OperatorKind::Assign {
                variable: true_var,
                expr: Expression::constant(ConstantValue::boolean_true()),
            },
            vec![found.first_input],
        );
        {
            let aggregate = plan.operator_mut(found.id);
            aggregate.inputs[0] = true_assign;
            let OperatorKind::Aggregate {
                partitioning_variable,
                ..
            } = &mut aggregate.kind
            else {
                return Ok(false);
            };
            *partitioning_variable = Some(true_var);
        }

        Ok(true)
    }
}

/// Walk `expr` through transparent single-argument wrappers to a variable
/// reference. Returns the wrapper depth and the variable.
fn unwrap_to_variable(
    expr: &Expression,
    catalog: &FunctionCatalog,
) -> Option<(usize, VariableId)> {
    let mut depth = 0;
    let mut cur = expr;
    loop {
        match cur {
            Expression::Variable(v) => return Some((depth, *v)),
            Expression::FunctionCall { function, args }
                if catalog.is_transparent(function) && args.len() == 1 =>
            {
                depth += 1;
                cur = &args[0];
            }
            _ => return None,
        }
    }
}

/// Replace the expression `depth` levels down the first-argument chain.
fn replace_at_depth(expr: &mut Expression, depth: usize, replacement: Expression) {
    if depth == 0 {
        *expr = replacement;
        return;
    }
    if let Expression::FunctionCall { args, .. } = expr {
        replace_at_depth(&mut args[0], depth - 1, replacement);
    }
}

/// A matched sequence-building Aggregate.
struct FoundAggregate {
    id: OpId,
    /// The `op:sequence` call's argument.
    sequence_arg: Expression,
    /// The Aggregate's current first input.
    first_input: OpId,
}

/// Search upward from `start` for the Aggregate producing `variable` with a
/// generic `op:sequence` reduction.
///
/// Policy, matching the conservative contract: descend first-input chains;
/// at a Subplan, search the first nested plan's first root before resuming
/// below it; stop at source operators. The worklist plus visited set makes
/// termination structural.
fn find_sequence_aggregate(
    plan: &LogicalPlan,
    start: OpId,
    variable: VariableId,
    catalog: &FunctionCatalog,
) -> Option<FoundAggregate> {
    let mut worklist = vec![start];
    let mut visited = HashSet::new();

    while let Some(mut cur) = worklist.pop() {
        loop {
            if !visited.insert(cur) {
                break;
            }
            let op = plan.operator(cur);
            match &op.kind {
                OperatorKind::Aggregate { .. } => {
                    if let Some(found) = match_sequence_aggregate(plan, cur, variable, catalog) {
                        return Some(found);
                    }
                }
                OperatorKind::Subplan { plans } => {
                    // Resume below the subplan after the nested search.
                    if let Some(&below) = op.inputs.first() {
                        worklist.push(below);
                    }
                    if let Some(&root) = plans.first().and_then(|p| p.roots.first()) {
                        cur = root;
                        continue;
                    }
                }
                OperatorKind::EmptySource | OperatorKind::NestedSource => break,
                _ => {}
            }
            match plan.operator(cur).inputs.first() {
                Some(&next) => cur = next,
                None => break,
            }
        }
    }
    None
}

/// Check one Aggregate against the full pattern, extracting the pieces the
/// surgery needs.
fn match_sequence_aggregate(
    plan: &LogicalPlan,
    id: OpId,
    variable: VariableId,
    catalog: &FunctionCatalog,
) -> Option<FoundAggregate> {
    let op = plan.operator(id);
    let OperatorKind::Aggregate {
        variables, exprs, ..
    } = &op.kind
    else {
        return None;
    };
    if variables.first() != Some(&variable) {
        return None;
    }
    let (function, args) = exprs.first()?.as_call()?;
    if function != catalog.sequence_op() || args.len() != 1 {
        return None;
    }
    let first_input = *op.inputs.first()?;
    Some(FoundAggregate {
        id,
        sequence_arg: args[0].clone(),
        first_input,
    })
}
