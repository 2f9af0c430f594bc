use grove_data::AtomicType;
use grove_data::value::OwnedValue;

use crate::algebra::{
    ConstantValue, Expression, LogicalPlan, OpId, OperatorKind, SequenceType,
};
use crate::catalog::{FunctionCatalog, builtins};
use crate::snapshot;

use super::engine::{RewriteContext, RewriteEngine, RewriteError, RewriteRule};

fn long_const(v: i64) -> Expression {
    Expression::constant(ConstantValue::new(
        OwnedValue::long(v),
        SequenceType::atomic(AtomicType::Long),
    ))
}

fn count_over_sequence_plan() -> LogicalPlan {
    let mut plan = LogicalPlan::new();
    let item = plan.new_variable();
    let agg_var = plan.new_variable();
    let out = plan.new_variable();

    let src = plan.add_operator(OperatorKind::EmptySource, vec![]);
    let item_assign = plan.add_operator(
        OperatorKind::Assign {
            variable: item,
            expr: long_const(1),
        },
        vec![src],
    );
    let agg = plan.add_operator(
        OperatorKind::Aggregate {
            variables: vec![agg_var],
            exprs: vec![Expression::call(
                builtins::SEQUENCE,
                vec![Expression::variable(item)],
            )],
            partitioning_variable: None,
        },
        vec![item_assign],
    );
    let root = plan.add_operator(
        OperatorKind::Assign {
            variable: out,
            expr: Expression::call(builtins::COUNT, vec![Expression::variable(agg_var)]),
        },
        vec![agg],
    );
    plan.add_root(root);
    plan
}

#[test]
fn fixed_point_on_stable_plan() {
    let mut plan = LogicalPlan::new();
    let v = plan.new_variable();
    let src = plan.add_operator(OperatorKind::EmptySource, vec![]);
    let root = plan.add_operator(
        OperatorKind::Assign {
            variable: v,
            expr: long_const(1),
        },
        vec![src],
    );
    plan.add_root(root);

    let catalog = FunctionCatalog::with_builtins();
    let before = snapshot::fingerprint(&plan);
    let stats = RewriteEngine::with_default_rules()
        .run(&mut plan, &catalog)
        .unwrap();
    assert!(stats.fixed_point);
    assert_eq!(stats.passes, 1);
    assert_eq!(stats.applications, 0);
    assert_eq!(snapshot::fingerprint(&plan), before);
}

#[test]
fn engine_consolidates_and_converges() {
    let mut plan = count_over_sequence_plan();
    let catalog = FunctionCatalog::with_builtins();

    let stats = RewriteEngine::with_default_rules()
        .run(&mut plan, &catalog)
        .unwrap();
    assert!(stats.fixed_point);
    assert_eq!(stats.applications, 1);
    assert_eq!(stats.passes, 2);

    // Running again finds nothing: the whole catalog is idempotent.
    let after = snapshot::fingerprint(&plan);
    let stats = RewriteEngine::with_default_rules()
        .run(&mut plan, &catalog)
        .unwrap();
    assert!(stats.fixed_point);
    assert_eq!(stats.applications, 0);
    assert_eq!(snapshot::fingerprint(&plan), after);
}

/// A deliberately broken rule: reports an application that introduces a
/// dangling variable reference.
struct DanglingReferenceRule;

impl RewriteRule for DanglingReferenceRule {
    fn name(&self) -> &'static str {
        "dangling-reference"
    }

    fn rewrite_pre(
        &self,
        plan: &mut LogicalPlan,
        op: OpId,
        _ctx: &RewriteContext<'_>,
    ) -> Result<bool, RewriteError> {
        let orphan = plan.new_variable();
        let OperatorKind::Assign { expr, .. } = &mut plan.operator_mut(op).kind else {
            return Ok(false);
        };
        *expr = Expression::variable(orphan);
        Ok(true)
    }
}

#[test]
fn invariant_violation_aborts() {
    let mut plan = count_over_sequence_plan();
    let catalog = FunctionCatalog::with_builtins();

    let mut engine = RewriteEngine::new();
    engine.add_rule(Box::new(DanglingReferenceRule));
    let err = engine.run(&mut plan, &catalog).unwrap_err();
    assert!(matches!(
        err,
        RewriteError::InvariantViolation {
            rule: "dangling-reference",
            ..
        }
    ));
}

/// A rule that always claims to have fired without reaching a fixed point.
struct NeverQuietRule;

impl RewriteRule for NeverQuietRule {
    fn name(&self) -> &'static str {
        "never-quiet"
    }

    fn rewrite_pre(
        &self,
        plan: &mut LogicalPlan,
        op: OpId,
        _ctx: &RewriteContext<'_>,
    ) -> Result<bool, RewriteError> {
        // Only fire on the root to keep the sweep count predictable.
        Ok(plan.roots().first() == Some(&op))
    }
}

#[test]
fn pass_bound_guarantees_termination() {
    let mut plan = count_over_sequence_plan();
    let catalog = FunctionCatalog::with_builtins();

    let mut engine = RewriteEngine::new().max_passes(3);
    engine.add_rule(Box::new(NeverQuietRule));
    let stats = engine.run(&mut plan, &catalog).unwrap();
    assert!(!stats.fixed_point);
    assert_eq!(stats.passes, 3);
    assert_eq!(stats.applications, 3);
}
