use std::sync::Arc;

use grove_data::value::{TaggedValuePointable, ValueStorage};

use super::context::{
    CollectionProvider, FragmentIdProvider, StaticCollectionProvider, TaskContext,
};
use super::error::RuntimeError;
use super::evaluator::{ArgumentEvaluator, BoxedEvaluator, ScalarEvaluator, TaggedValueKernel};
use crate::register::{CallStackFrame, GlobalRegistersBuilder};

fn empty_frame() -> CallStackFrame {
    CallStackFrame::new(Arc::new(GlobalRegistersBuilder::new(0).seal()), 0)
}

/// Test evaluator emitting a fixed long.
struct EmitLong(i64);

impl ScalarEvaluator for EmitLong {
    fn evaluate(
        &mut self,
        _frame: &CallStackFrame,
        result: &mut ValueStorage,
    ) -> Result<(), RuntimeError> {
        result.write_long(self.0);
        Ok(())
    }
}

/// Test evaluator that always fails.
struct AlwaysFails;

impl ScalarEvaluator for AlwaysFails {
    fn evaluate(
        &mut self,
        _frame: &CallStackFrame,
        _result: &mut ValueStorage,
    ) -> Result<(), RuntimeError> {
        Err(RuntimeError::UnboundRegister { index: 9 })
    }
}

/// Kernel summing integer arguments.
struct SumKernel;

impl TaggedValueKernel for SumKernel {
    fn invoke(
        &mut self,
        args: &[TaggedValuePointable<'_>],
        out: &mut ValueStorage,
    ) -> Result<(), RuntimeError> {
        let mut sum = 0;
        for arg in args {
            sum += arg.as_long().map(|l| l.value()).unwrap_or(0);
        }
        out.write_long(sum);
        Ok(())
    }
}

#[test]
fn arguments_are_decoded_and_passed() {
    let args: Vec<BoxedEvaluator> = vec![Box::new(EmitLong(2)), Box::new(EmitLong(3))];
    let mut eval = ArgumentEvaluator::new(args, SumKernel);
    let frame = empty_frame();

    let mut result = ValueStorage::new();
    eval.evaluate(&frame, &mut result).unwrap();
    assert_eq!(result.pointable().unwrap().as_long().unwrap().value(), 5);

    // Scratch is reset per call: a second invocation sees fresh arguments.
    result.reset();
    eval.evaluate(&frame, &mut result).unwrap();
    assert_eq!(result.pointable().unwrap().as_long().unwrap().value(), 5);
}

#[test]
fn argument_errors_propagate() {
    let args: Vec<BoxedEvaluator> = vec![Box::new(EmitLong(1)), Box::new(AlwaysFails)];
    let mut eval = ArgumentEvaluator::new(args, SumKernel);
    let frame = empty_frame();

    let mut result = ValueStorage::new();
    let err = eval.evaluate(&frame, &mut result).unwrap_err();
    assert_eq!(err, RuntimeError::UnboundRegister { index: 9 });
}

#[test]
fn fragment_ids_are_partition_namespaced() {
    let mut p0 = FragmentIdProvider::new(0);
    let mut p2 = FragmentIdProvider::new(2);

    assert_eq!(p0.next_id(), 0);
    assert_eq!(p0.next_id(), 1);
    assert_eq!(p2.next_id(), 2 << 16);
    assert_eq!(p2.next_id(), (2 << 16) + 1);
}

#[test]
fn task_context_exposes_partition() {
    let ctx = TaskContext::new(7, Arc::new(StaticCollectionProvider::new()));
    assert_eq!(ctx.partition(), 7);
    let mut ids = ctx.fragment_ids();
    assert_eq!(ids.next_id(), 7 << 16);
}

#[test]
fn static_provider_lookup() {
    let mut provider = StaticCollectionProvider::new();
    provider.insert("docs", vec![grove_data::value::OwnedValue::long(1)]);

    assert_eq!(provider.open("docs").unwrap().count(), 1);
    assert!(provider.open("missing").is_none());
}
