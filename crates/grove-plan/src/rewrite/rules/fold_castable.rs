//! Static castability folding.
//!
//! Top-down: an `op:castable-as-<type>` call over a constant of statically
//! known atomic type is the matrix answer, so the call is replaced with the
//! boolean constant the matrix produces. Rewrites work on a rebuilt copy of
//! the expression, so an unmatched operator keeps its expressions untouched.

use grove_data::{AtomicType, castability};

use crate::algebra::{ConstantValue, Expression, LogicalPlan, OpId, OperatorKind, SequenceType};
use crate::catalog::FunctionCatalog;
use crate::rewrite::engine::{RewriteContext, RewriteError, RewriteRule};

pub struct FoldCastableConstantRule;

impl RewriteRule for FoldCastableConstantRule {
    fn name(&self) -> &'static str {
        "fold-castable-constant"
    }

    fn rewrite_pre(
        &self,
        plan: &mut LogicalPlan,
        op: OpId,
        ctx: &RewriteContext<'_>,
    ) -> Result<bool, RewriteError> {
        let folded = match &plan.operator(op).kind {
            OperatorKind::Assign { expr, .. } => {
                fold_expr(expr, ctx.catalog).map(|e| vec![e])
            }
            OperatorKind::Select { condition } => {
                fold_expr(condition, ctx.catalog).map(|e| vec![e])
            }
            OperatorKind::Aggregate { exprs, .. } => fold_all(exprs, ctx.catalog),
            _ => None,
        };
        let Some(folded) = folded else {
            return Ok(false);
        };

        match &mut plan.operator_mut(op).kind {
            OperatorKind::Assign { expr, .. } => *expr = into_single(folded),
            OperatorKind::Select { condition } => *condition = into_single(folded),
            OperatorKind::Aggregate { exprs, .. } => *exprs = folded,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

fn into_single(mut exprs: Vec<Expression>) -> Expression {
    exprs.swap_remove(0)
}

/// Fold a whole expression list; `None` when nothing changed.
fn fold_all(exprs: &[Expression], catalog: &FunctionCatalog) -> Option<Vec<Expression>> {
    let mut changed = false;
    let folded: Vec<Expression> = exprs
        .iter()
        .map(|e| match fold_expr(e, catalog) {
            Some(f) => {
                changed = true;
                f
            }
            None => e.clone(),
        })
        .collect();
    changed.then_some(folded)
}

/// Fold one expression tree; `None` when nothing changed.
fn fold_expr(expr: &Expression, catalog: &FunctionCatalog) -> Option<Expression> {
    let Expression::FunctionCall { function, args } = expr else {
        return None;
    };

    if let Some(target) = catalog.castable_target(function)
        && args.len() == 1
        && let Some(constant) = args[0].as_constant()
        && let Some(source) = constant.static_type().single_atomic()
    {
        let answer = castability::castable_value(source.tag(), target.tag());
        return Some(Expression::constant(ConstantValue::new(
            answer,
            SequenceType::atomic(AtomicType::Boolean),
        )));
    }

    let folded_args = fold_all(args, catalog)?;
    Some(Expression::call(function.clone(), folded_args))
}
