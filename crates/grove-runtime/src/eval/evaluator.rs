//! Evaluator and factory traits, plus the tagged-argument adapter most
//! builtin functions are written against.

use grove_data::value::{TaggedValuePointable, ValueStorage};

use super::context::TaskContext;
use super::error::RuntimeError;
use crate::register::CallStackFrame;

pub type BoxedEvaluator = Box<dyn ScalarEvaluator>;

/// A per-partition evaluator instance.
///
/// One instance is invoked many times (once per tuple). It may keep scratch
/// buffers across calls, but must reset any output accumulator at the start
/// of each call. The encoded result is appended to `result`; the caller
/// owns resetting that buffer between calls.
pub trait ScalarEvaluator {
    fn evaluate(
        &mut self,
        frame: &CallStackFrame,
        result: &mut ValueStorage,
    ) -> Result<(), RuntimeError>;
}

/// Constructed once per compiled expression node; stateless with respect to
/// execution. `create_evaluator` binds any factory-level scratch to one
/// partition.
pub trait ScalarEvaluatorFactory: Send + Sync {
    fn create_evaluator(
        &self,
        ctx: &TaskContext,
        args: Vec<BoxedEvaluator>,
    ) -> Result<BoxedEvaluator, RuntimeError>;
}

/// The body of a function over decoded tagged arguments.
pub trait TaggedValueKernel {
    fn invoke(
        &mut self,
        args: &[TaggedValuePointable<'_>],
        out: &mut ValueStorage,
    ) -> Result<(), RuntimeError>;
}

/// Adapter running argument sub-evaluators into per-argument scratch
/// buffers, decoding each as a tagged value and handing the views to a
/// kernel.
pub struct ArgumentEvaluator<K> {
    args: Vec<BoxedEvaluator>,
    scratch: Vec<ValueStorage>,
    kernel: K,
}

impl<K: TaggedValueKernel> ArgumentEvaluator<K> {
    pub fn new(args: Vec<BoxedEvaluator>, kernel: K) -> Self {
        let scratch = args.iter().map(|_| ValueStorage::new()).collect();
        Self {
            args,
            scratch,
            kernel,
        }
    }

    /// Box up as a `ScalarEvaluator`.
    pub fn boxed(args: Vec<BoxedEvaluator>, kernel: K) -> BoxedEvaluator
    where
        K: 'static,
    {
        Box::new(Self::new(args, kernel))
    }
}

impl<K: TaggedValueKernel> ScalarEvaluator for ArgumentEvaluator<K> {
    fn evaluate(
        &mut self,
        frame: &CallStackFrame,
        result: &mut ValueStorage,
    ) -> Result<(), RuntimeError> {
        for (arg, storage) in self.args.iter_mut().zip(self.scratch.iter_mut()) {
            storage.reset();
            arg.evaluate(frame, storage)?;
        }
        let views = self
            .scratch
            .iter()
            .map(|s| s.pointable())
            .collect::<Result<Vec<_>, _>>()?;
        self.kernel.invoke(&views, result)
    }
}
