//! Variable reference evaluator: reads a local register through a fixed
//! accessor.

use grove_data::value::ValueStorage;

use crate::eval::{
    BoxedEvaluator, RuntimeError, ScalarEvaluator, ScalarEvaluatorFactory, TaskContext,
};
use crate::register::{CallStackFrame, LocalRegisterAccessor};

pub struct VariableEvaluatorFactory {
    register: LocalRegisterAccessor,
}

impl VariableEvaluatorFactory {
    /// Factory over the register index lowering assigned to the variable.
    pub fn new(index: usize) -> Self {
        Self {
            register: LocalRegisterAccessor::new(index),
        }
    }
}

impl ScalarEvaluatorFactory for VariableEvaluatorFactory {
    fn create_evaluator(
        &self,
        _ctx: &TaskContext,
        args: Vec<BoxedEvaluator>,
    ) -> Result<BoxedEvaluator, RuntimeError> {
        super::expect_args("variable reference", 0, args.len())?;
        Ok(Box::new(VariableEvaluator {
            register: self.register,
        }))
    }
}

struct VariableEvaluator {
    register: LocalRegisterAccessor,
}

impl ScalarEvaluator for VariableEvaluator {
    fn evaluate(
        &mut self,
        frame: &CallStackFrame,
        result: &mut ValueStorage,
    ) -> Result<(), RuntimeError> {
        match self.register.get(frame)? {
            Some(slot) => match slot.as_value() {
                Some(value) => {
                    result.append(value.bytes());
                    Ok(())
                }
                None => Err(RuntimeError::TypeMismatch {
                    context: "variable reference",
                    expected: "encoded value register",
                    found: "opaque object".to_owned(),
                }),
            },
            None => Err(RuntimeError::UnboundRegister {
                index: self.register.index(),
            }),
        }
    }
}
