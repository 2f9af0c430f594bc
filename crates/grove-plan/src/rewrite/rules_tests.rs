use grove_data::AtomicType;
use grove_data::value::OwnedValue;

use crate::algebra::{
    ConstantValue, Expression, LogicalPlan, NestedPlan, OpId, OperatorKind, SequenceType,
    VariableId,
};
use crate::catalog::{FunctionCatalog, FunctionId, builtins};
use crate::snapshot;

use super::engine::{RewriteContext, RewriteRule};
use super::rules::{
    ConsolidateAssignAggregateRule, EliminateDeadAssignRule, FoldCastableConstantRule,
};

fn long_const(v: i64) -> Expression {
    Expression::constant(ConstantValue::new(
        OwnedValue::long(v),
        SequenceType::atomic(AtomicType::Long),
    ))
}

/// `count(treat($agg_var))` over a sequence-building Aggregate, no Subplan.
///
/// Returns (plan, aggregate op, root assign, item var, aggregate var).
fn count_over_sequence_plan() -> (LogicalPlan, OpId, OpId, VariableId, VariableId) {
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
            expr: Expression::call(
                builtins::COUNT,
                vec![Expression::call(
                    builtins::TREAT,
                    vec![Expression::variable(agg_var)],
                )],
            ),
        },
        vec![agg],
    );
    plan.add_root(root);
    (plan, agg, root, item, agg_var)
}

#[test]
fn consolidates_simple_chain() {
    let (mut plan, agg, root, item, agg_var) = count_over_sequence_plan();
    let catalog = FunctionCatalog::with_builtins();
    let ctx = RewriteContext { catalog: &catalog };

    let fired = ConsolidateAssignAggregateRule
        .rewrite_pre(&mut plan, root, &ctx)
        .unwrap();
    assert!(fired);

    // The Aggregate now reduces with the specific aggregate form over the
    // transplanted argument chain.
    let OperatorKind::Aggregate {
        exprs,
        partitioning_variable,
        ..
    } = &plan.operator(agg).kind
    else {
        panic!("aggregate replaced");
    };
    let (function, args) = exprs[0].as_call().unwrap();
    assert_eq!(function, &builtins::COUNT_AGGREGATE);
    assert_eq!(args.len(), 1);
    let (wrapper, inner) = args[0].as_call().unwrap();
    assert_eq!(wrapper, &builtins::TREAT);
    assert_eq!(inner[0].as_variable(), Some(item));

    // A synthesized boolean-true Assign feeds the partitioning variable.
    let part = partitioning_variable.expect("partitioning variable set");
    let true_assign = plan.operator(agg).inputs[0];
    let OperatorKind::Assign { variable, expr } = &plan.operator(true_assign).kind else {
        panic!("expected partitioning assign");
    };
    assert_eq!(*variable, part);
    let constant = expr.as_constant().unwrap();
    assert!(constant.pointable().unwrap().as_boolean().unwrap().value());

    // The outer Assign forwards the aggregate's variable.
    let OperatorKind::Assign { expr, .. } = &plan.operator(root).kind else {
        panic!("root replaced");
    };
    assert_eq!(expr.as_variable(), Some(agg_var));

    // Exactly one Aggregate remains reachable.
    let aggregates = plan
        .pre_order()
        .into_iter()
        .filter(|&id| matches!(plan.operator(id).kind, OperatorKind::Aggregate { .. }))
        .count();
    assert_eq!(aggregates, 1);
}

#[test]
fn consolidates_through_subplan() {
    let mut plan = LogicalPlan::new();
    let item = plan.new_variable();
    let agg_var = plan.new_variable();
    let out = plan.new_variable();

    let outer_src = plan.add_operator(OperatorKind::EmptySource, vec![]);
    let nts = plan.add_operator(OperatorKind::NestedSource, vec![]);
    let item_assign = plan.add_operator(
        OperatorKind::Assign {
            variable: item,
            expr: long_const(7),
        },
        vec![nts],
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
    let sub = plan.add_operator(
        OperatorKind::Subplan {
            plans: vec![NestedPlan { roots: vec![agg] }],
        },
        vec![outer_src],
    );
    let root = plan.add_operator(
        OperatorKind::Assign {
            variable: out,
            expr: Expression::call(builtins::COUNT, vec![Expression::variable(agg_var)]),
        },
        vec![sub],
    );
    plan.add_root(root);

    let catalog = FunctionCatalog::with_builtins();
    let ctx = RewriteContext { catalog: &catalog };
    let fired = ConsolidateAssignAggregateRule
        .rewrite_pre(&mut plan, root, &ctx)
        .unwrap();
    assert!(fired);

    let OperatorKind::Aggregate {
        exprs,
        partitioning_variable,
        ..
    } = &plan.operator(agg).kind
    else {
        panic!("aggregate replaced");
    };
    assert!(partitioning_variable.is_some());
    let (function, args) = exprs[0].as_call().unwrap();
    assert_eq!(function, &builtins::COUNT_AGGREGATE);
    // Without wrappers, the sequence's argument lands directly.
    assert_eq!(args[0].as_variable(), Some(item));

    // The synthesized assign sits between the aggregate and its old input.
    let true_assign = plan.operator(agg).inputs[0];
    assert_eq!(plan.operator(true_assign).inputs, vec![item_assign]);
}

#[test]
fn conservative_on_non_aggregate_assign() {
    let mut plan = LogicalPlan::new();
    let v = plan.new_variable();
    let src = plan.add_operator(OperatorKind::EmptySource, vec![]);
    let root = plan.add_operator(
        OperatorKind::Assign {
            variable: v,
            expr: Expression::call(builtins::BOOLEAN, vec![long_const(1)]),
        },
        vec![src],
    );
    plan.add_root(root);

    let catalog = FunctionCatalog::with_builtins();
    let ctx = RewriteContext { catalog: &catalog };
    let before = snapshot::fingerprint(&plan);
    for op in plan.pre_order() {
        let fired = ConsolidateAssignAggregateRule
            .rewrite_pre(&mut plan, op, &ctx)
            .unwrap();
        assert!(!fired);
    }
    assert_eq!(snapshot::fingerprint(&plan), before);
}

#[test]
fn conservative_when_aggregate_is_not_sequence() {
    let (mut plan, agg, root, _, _) = count_over_sequence_plan();
    // Replace the generic sequence reduction with something else.
    let OperatorKind::Aggregate { exprs, .. } = &mut plan.operator_mut(agg).kind else {
        unreachable!();
    };
    let arg = exprs[0].as_call().unwrap().1[0].clone();
    exprs[0] = Expression::call(builtins::AVG_AGGREGATE, vec![arg]);

    let catalog = FunctionCatalog::with_builtins();
    let ctx = RewriteContext { catalog: &catalog };
    let before = snapshot::fingerprint(&plan);
    let fired = ConsolidateAssignAggregateRule
        .rewrite_pre(&mut plan, root, &ctx)
        .unwrap();
    assert!(!fired);
    assert_eq!(snapshot::fingerprint(&plan), before);
}

#[test]
fn conservative_on_variable_mismatch() {
    let (mut plan, agg, root, _, _) = count_over_sequence_plan();
    // The aggregate produces a different variable than the count consumes.
    let other = plan.new_variable();
    let OperatorKind::Aggregate { variables, .. } = &mut plan.operator_mut(agg).kind else {
        unreachable!();
    };
    variables[0] = other;

    let catalog = FunctionCatalog::with_builtins();
    let ctx = RewriteContext { catalog: &catalog };
    let before = snapshot::fingerprint(&plan);
    let fired = ConsolidateAssignAggregateRule
        .rewrite_pre(&mut plan, root, &ctx)
        .unwrap();
    assert!(!fired);
    assert_eq!(snapshot::fingerprint(&plan), before);
}

#[test]
fn consolidation_is_idempotent() {
    let (mut plan, _, root, _, _) = count_over_sequence_plan();
    let catalog = FunctionCatalog::with_builtins();
    let ctx = RewriteContext { catalog: &catalog };

    assert!(
        ConsolidateAssignAggregateRule
            .rewrite_pre(&mut plan, root, &ctx)
            .unwrap()
    );
    let after_first = snapshot::fingerprint(&plan);

    for op in plan.pre_order() {
        let fired = ConsolidateAssignAggregateRule
            .rewrite_pre(&mut plan, op, &ctx)
            .unwrap();
        assert!(!fired, "second application must report no match");
    }
    assert_eq!(snapshot::fingerprint(&plan), after_first);
}

#[test]
fn dead_assign_is_spliced_out() {
    let mut plan = LogicalPlan::new();
    let unused = plan.new_variable();
    let out = plan.new_variable();
    let src = plan.add_operator(OperatorKind::EmptySource, vec![]);
    let dead = plan.add_operator(
        OperatorKind::Assign {
            variable: unused,
            expr: long_const(1),
        },
        vec![src],
    );
    let root = plan.add_operator(
        OperatorKind::Assign {
            variable: out,
            expr: long_const(2),
        },
        vec![dead],
    );
    plan.add_root(root);

    let catalog = FunctionCatalog::with_builtins();
    let ctx = RewriteContext { catalog: &catalog };
    let fired = EliminateDeadAssignRule
        .rewrite_post(&mut plan, dead, &ctx)
        .unwrap();
    assert!(fired);
    assert_eq!(plan.operator(root).inputs, vec![src]);

    // Detached now; a second application finds nothing to do.
    let fired = EliminateDeadAssignRule
        .rewrite_post(&mut plan, dead, &ctx)
        .unwrap();
    assert!(!fired);
}

#[test]
fn dead_assign_keeps_roots_and_referenced_assigns() {
    let mut plan = LogicalPlan::new();
    let used = plan.new_variable();
    let out = plan.new_variable();
    let src = plan.add_operator(OperatorKind::EmptySource, vec![]);
    let producer = plan.add_operator(
        OperatorKind::Assign {
            variable: used,
            expr: long_const(1),
        },
        vec![src],
    );
    let root = plan.add_operator(
        OperatorKind::Assign {
            variable: out,
            expr: Expression::variable(used),
        },
        vec![producer],
    );
    plan.add_root(root);

    let catalog = FunctionCatalog::with_builtins();
    let ctx = RewriteContext { catalog: &catalog };
    assert!(
        !EliminateDeadAssignRule
            .rewrite_post(&mut plan, producer, &ctx)
            .unwrap()
    );
    assert!(
        !EliminateDeadAssignRule
            .rewrite_post(&mut plan, root, &ctx)
            .unwrap()
    );
}

#[test]
fn fold_castable_to_true_and_false() {
    let mut plan = LogicalPlan::new();
    let yes = plan.new_variable();
    let no = plan.new_variable();
    let src = plan.add_operator(OperatorKind::EmptySource, vec![]);
    let yes_assign = plan.add_operator(
        OperatorKind::Assign {
            variable: yes,
            expr: Expression::call(
                FunctionId::castable_as(AtomicType::String),
                vec![long_const(5)],
            ),
        },
        vec![src],
    );
    let no_assign = plan.add_operator(
        OperatorKind::Assign {
            variable: no,
            expr: Expression::call(
                FunctionId::castable_as(AtomicType::Date),
                vec![long_const(5)],
            ),
        },
        vec![yes_assign],
    );
    plan.add_root(no_assign);

    let catalog = FunctionCatalog::with_builtins();
    let ctx = RewriteContext { catalog: &catalog };
    assert!(
        FoldCastableConstantRule
            .rewrite_pre(&mut plan, yes_assign, &ctx)
            .unwrap()
    );
    assert!(
        FoldCastableConstantRule
            .rewrite_pre(&mut plan, no_assign, &ctx)
            .unwrap()
    );

    let OperatorKind::Assign { expr, .. } = &plan.operator(yes_assign).kind else {
        unreachable!();
    };
    assert!(
        expr.as_constant()
            .unwrap()
            .pointable()
            .unwrap()
            .as_boolean()
            .unwrap()
            .value()
    );

    let OperatorKind::Assign { expr, .. } = &plan.operator(no_assign).kind else {
        unreachable!();
    };
    assert!(
        !expr
            .as_constant()
            .unwrap()
            .pointable()
            .unwrap()
            .as_boolean()
            .unwrap()
            .value()
    );

    // Fully folded: nothing left to do.
    assert!(
        !FoldCastableConstantRule
            .rewrite_pre(&mut plan, yes_assign, &ctx)
            .unwrap()
    );
}

#[test]
fn fold_castable_inside_nested_call() {
    let mut plan = LogicalPlan::new();
    let v = plan.new_variable();
    let src = plan.add_operator(OperatorKind::EmptySource, vec![]);
    let root = plan.add_operator(
        OperatorKind::Assign {
            variable: v,
            expr: Expression::call(
                builtins::BOOLEAN,
                vec![Expression::call(
                    FunctionId::castable_as(AtomicType::Double),
                    vec![long_const(3)],
                )],
            ),
        },
        vec![src],
    );
    plan.add_root(root);

    let catalog = FunctionCatalog::with_builtins();
    let ctx = RewriteContext { catalog: &catalog };
    assert!(
        FoldCastableConstantRule
            .rewrite_pre(&mut plan, root, &ctx)
            .unwrap()
    );

    let OperatorKind::Assign { expr, .. } = &plan.operator(root).kind else {
        unreachable!();
    };
    let (function, args) = expr.as_call().unwrap();
    assert_eq!(function, &builtins::BOOLEAN);
    assert!(
        args[0]
            .as_constant()
            .unwrap()
            .pointable()
            .unwrap()
            .as_boolean()
            .unwrap()
            .value()
    );
}

#[test]
fn fold_castable_leaves_non_constants_alone() {
    let mut plan = LogicalPlan::new();
    let input = plan.new_variable();
    let v = plan.new_variable();
    let src = plan.add_operator(OperatorKind::EmptySource, vec![]);
    let input_assign = plan.add_operator(
        OperatorKind::Assign {
            variable: input,
            expr: long_const(1),
        },
        vec![src],
    );
    let root = plan.add_operator(
        OperatorKind::Assign {
            variable: v,
            expr: Expression::call(
                FunctionId::castable_as(AtomicType::String),
                vec![Expression::variable(input)],
            ),
        },
        vec![input_assign],
    );
    plan.add_root(root);

    let catalog = FunctionCatalog::with_builtins();
    let ctx = RewriteContext { catalog: &catalog };
    let before = snapshot::fingerprint(&plan);
    assert!(
        !FoldCastableConstantRule
            .rewrite_pre(&mut plan, root, &ctx)
            .unwrap()
    );
    assert_eq!(snapshot::fingerprint(&plan), before);
}
