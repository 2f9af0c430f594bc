use grove_data::AtomicType;
use grove_data::value::OwnedValue;

use super::expression::{ConstantValue, Expression};
use super::plan::LogicalPlan;
use super::types::SequenceType;
use crate::catalog::builtins;

#[test]
fn display_variable_and_call() {
    let mut plan = LogicalPlan::new();
    let v = plan.new_variable();
    let expr = Expression::call(
        builtins::COUNT,
        vec![Expression::call(
            builtins::TREAT,
            vec![Expression::variable(v)],
        )],
    );
    assert_eq!(expr.to_string(), "fn:count(op:treat($0))");
}

#[test]
fn display_constants() {
    let b = Expression::constant(ConstantValue::boolean_true());
    assert_eq!(b.to_string(), "const true");

    let n = Expression::constant(ConstantValue::new(
        OwnedValue::long(42),
        SequenceType::atomic(AtomicType::Long),
    ));
    assert_eq!(n.to_string(), "const 42");

    let s = Expression::constant(ConstantValue::new(
        OwnedValue::string("x"),
        SequenceType::atomic(AtomicType::String),
    ));
    assert_eq!(s.to_string(), "const \"x\"");
}

#[test]
fn boolean_true_constant() {
    let c = ConstantValue::boolean_true();
    assert_eq!(
        c.static_type(),
        SequenceType::atomic(AtomicType::Boolean)
    );
    assert!(c.pointable().unwrap().as_boolean().unwrap().value());
}

#[test]
fn for_each_variable_visits_whole_tree() {
    let mut plan = LogicalPlan::new();
    let a = plan.new_variable();
    let b = plan.new_variable();
    let expr = Expression::call(
        builtins::SEQUENCE,
        vec![
            Expression::variable(a),
            Expression::constant(ConstantValue::boolean_true()),
            Expression::call(builtins::TREAT, vec![Expression::variable(b)]),
        ],
    );
    let mut seen = Vec::new();
    expr.for_each_variable(&mut |v| seen.push(v));
    assert_eq!(seen, vec![a, b]);
}

#[test]
fn single_atomic_static_type() {
    let one = SequenceType::atomic(AtomicType::Long);
    assert_eq!(one.single_atomic(), Some(AtomicType::Long));

    let many = SequenceType::zero_or_more(super::types::ItemType::Atomic(AtomicType::Long));
    assert_eq!(many.single_atomic(), None);

    let node = SequenceType::one(super::types::ItemType::Node);
    assert_eq!(node.single_atomic(), None);
}
