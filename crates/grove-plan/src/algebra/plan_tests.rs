use grove_data::AtomicType;
use grove_data::value::OwnedValue;

use super::expression::{ConstantValue, Expression};
use super::operator::{NestedPlan, OperatorKind};
use super::plan::LogicalPlan;
use super::types::SequenceType;
use crate::catalog::builtins;

fn long_const(v: i64) -> Expression {
    Expression::constant(ConstantValue::new(
        OwnedValue::long(v),
        SequenceType::atomic(AtomicType::Long),
    ))
}

#[test]
fn variables_are_unique() {
    let mut plan = LogicalPlan::new();
    let a = plan.new_variable();
    let b = plan.new_variable();
    assert_ne!(a, b);
    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
}

#[test]
fn traversal_orders() {
    let mut plan = LogicalPlan::new();
    let v0 = plan.new_variable();
    let v1 = plan.new_variable();
    let src = plan.add_operator(OperatorKind::EmptySource, vec![]);
    let a = plan.add_operator(
        OperatorKind::Assign {
            variable: v0,
            expr: long_const(1),
        },
        vec![src],
    );
    let b = plan.add_operator(
        OperatorKind::Assign {
            variable: v1,
            expr: long_const(2),
        },
        vec![a],
    );
    plan.add_root(b);

    assert_eq!(plan.pre_order(), vec![b, a, src]);
    assert_eq!(plan.post_order(), vec![src, a, b]);
    assert!(plan.is_acyclic());
}

#[test]
fn subplan_edges_cover_nested_roots() {
    let mut plan = LogicalPlan::new();
    let v0 = plan.new_variable();
    let outer_src = plan.add_operator(OperatorKind::EmptySource, vec![]);
    let nts = plan.add_operator(OperatorKind::NestedSource, vec![]);
    let inner = plan.add_operator(
        OperatorKind::Assign {
            variable: v0,
            expr: long_const(1),
        },
        vec![nts],
    );
    let sub = plan.add_operator(
        OperatorKind::Subplan {
            plans: vec![NestedPlan { roots: vec![inner] }],
        },
        vec![outer_src],
    );
    plan.add_root(sub);

    assert_eq!(plan.edges(sub), vec![outer_src, inner]);
    let order = plan.pre_order();
    assert!(order.contains(&inner));
    assert!(order.contains(&nts));
}

#[test]
fn cycle_is_detected() {
    let mut plan = LogicalPlan::new();
    let v0 = plan.new_variable();
    let a = plan.add_operator(
        OperatorKind::Assign {
            variable: v0,
            expr: long_const(1),
        },
        vec![],
    );
    let b = plan.add_operator(OperatorKind::Select {
        condition: Expression::constant(ConstantValue::boolean_true()),
    }, vec![a]);
    plan.add_root(b);
    assert!(plan.is_acyclic());

    // Splice a back-edge: a -> b.
    plan.operator_mut(a).inputs.push(b);
    assert!(!plan.is_acyclic());
}

#[test]
fn defined_and_referenced_variables() {
    let mut plan = LogicalPlan::new();
    let v0 = plan.new_variable();
    let v1 = plan.new_variable();
    let part = plan.new_variable();
    let src = plan.add_operator(OperatorKind::EmptySource, vec![]);
    let part_assign = plan.add_operator(
        OperatorKind::Assign {
            variable: part,
            expr: Expression::constant(ConstantValue::boolean_true()),
        },
        vec![src],
    );
    let a = plan.add_operator(
        OperatorKind::Assign {
            variable: v0,
            expr: long_const(1),
        },
        vec![part_assign],
    );
    let agg = plan.add_operator(
        OperatorKind::Aggregate {
            variables: vec![v1],
            exprs: vec![Expression::call(
                builtins::SEQUENCE,
                vec![Expression::variable(v0)],
            )],
            partitioning_variable: Some(part),
        },
        vec![a],
    );
    plan.add_root(agg);

    let defined = plan.defined_variables();
    assert!(defined.contains(&v0));
    assert!(defined.contains(&v1));
    assert!(defined.contains(&part));

    let referenced = plan.referenced_variables();
    assert!(referenced.contains(&v0));
    assert!(referenced.contains(&part));
    assert!(!referenced.contains(&v1));
}

#[test]
fn consumers_follow_input_edges() {
    let mut plan = LogicalPlan::new();
    let v0 = plan.new_variable();
    let src = plan.add_operator(OperatorKind::EmptySource, vec![]);
    let a = plan.add_operator(
        OperatorKind::Assign {
            variable: v0,
            expr: long_const(1),
        },
        vec![src],
    );
    plan.add_root(a);

    assert_eq!(plan.consumers(src), vec![a]);
    assert!(plan.consumers(a).is_empty());
}
