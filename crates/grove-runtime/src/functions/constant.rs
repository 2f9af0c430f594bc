//! Embedded constant evaluator.

use grove_data::value::{OwnedValue, ValueStorage};

use crate::eval::{
    BoxedEvaluator, RuntimeError, ScalarEvaluator, ScalarEvaluatorFactory, TaskContext,
};
use crate::register::CallStackFrame;

/// Emits one pre-encoded constant.
pub struct ConstantEvaluatorFactory {
    value: OwnedValue,
}

impl ConstantEvaluatorFactory {
    pub fn new(value: OwnedValue) -> Self {
        Self { value }
    }
}

impl ScalarEvaluatorFactory for ConstantEvaluatorFactory {
    fn create_evaluator(
        &self,
        _ctx: &TaskContext,
        args: Vec<BoxedEvaluator>,
    ) -> Result<BoxedEvaluator, RuntimeError> {
        super::expect_args("constant", 0, args.len())?;
        Ok(Box::new(ConstantEvaluator {
            value: self.value.clone(),
        }))
    }
}

struct ConstantEvaluator {
    value: OwnedValue,
}

impl ScalarEvaluator for ConstantEvaluator {
    fn evaluate(
        &mut self,
        _frame: &CallStackFrame,
        result: &mut ValueStorage,
    ) -> Result<(), RuntimeError> {
        result.append(self.value.bytes());
        Ok(())
    }
}
