//! Runtime `castable as` evaluator.
//!
//! Consults the castability matrix and writes the boolean-tagged answer.
//! Legality queries never fail: an unsupported pair is `false`, not an
//! error.

use grove_data::value::{TaggedValuePointable, ValueStorage};
use grove_data::{AtomicType, castability};

use crate::eval::{
    ArgumentEvaluator, BoxedEvaluator, RuntimeError, ScalarEvaluatorFactory, TaggedValueKernel,
    TaskContext,
};

pub struct CastableAsEvaluatorFactory {
    target: AtomicType,
}

impl CastableAsEvaluatorFactory {
    pub fn new(target: AtomicType) -> Self {
        Self { target }
    }
}

impl ScalarEvaluatorFactory for CastableAsEvaluatorFactory {
    fn create_evaluator(
        &self,
        _ctx: &TaskContext,
        args: Vec<BoxedEvaluator>,
    ) -> Result<BoxedEvaluator, RuntimeError> {
        super::expect_args("castable-as", 1, args.len())?;
        Ok(ArgumentEvaluator::boxed(
            args,
            CastableKernel {
                target: self.target,
            },
        ))
    }
}

struct CastableKernel {
    target: AtomicType,
}

impl TaggedValueKernel for CastableKernel {
    fn invoke(
        &mut self,
        args: &[TaggedValuePointable<'_>],
        out: &mut ValueStorage,
    ) -> Result<(), RuntimeError> {
        out.write_boolean(castability::castable(args[0].tag(), self.target.tag()));
        Ok(())
    }
}
