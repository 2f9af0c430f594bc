//! Sequence construction and the scalar functions over sequences.

use grove_data::value::{SequenceBuilder, TaggedValuePointable, ValueStorage, ValueTag};

use crate::eval::{
    ArgumentEvaluator, BoxedEvaluator, RuntimeError, ScalarEvaluatorFactory, TaggedValueKernel,
    TaskContext,
};

/// `op:sequence` — one sequence from all arguments, flattening argument
/// sequences one level.
pub struct SequenceEvaluatorFactory;

impl ScalarEvaluatorFactory for SequenceEvaluatorFactory {
    fn create_evaluator(
        &self,
        _ctx: &TaskContext,
        args: Vec<BoxedEvaluator>,
    ) -> Result<BoxedEvaluator, RuntimeError> {
        Ok(ArgumentEvaluator::boxed(
            args,
            SequenceKernel {
                builder: SequenceBuilder::new(),
            },
        ))
    }
}

struct SequenceKernel {
    builder: SequenceBuilder,
}

impl TaggedValueKernel for SequenceKernel {
    fn invoke(
        &mut self,
        args: &[TaggedValuePointable<'_>],
        out: &mut ValueStorage,
    ) -> Result<(), RuntimeError> {
        self.builder.reset();
        for arg in args {
            match arg.as_sequence() {
                Some(seq) => {
                    for item in seq.iter() {
                        self.builder.add_item(&item?);
                    }
                }
                None => self.builder.add_item(arg),
            }
        }
        self.builder.finish_into(out);
        Ok(())
    }
}

/// `fn:count` — item count of the argument sequence; a non-sequence value
/// counts as one item.
pub struct CountEvaluatorFactory;

impl ScalarEvaluatorFactory for CountEvaluatorFactory {
    fn create_evaluator(
        &self,
        _ctx: &TaskContext,
        args: Vec<BoxedEvaluator>,
    ) -> Result<BoxedEvaluator, RuntimeError> {
        super::expect_args("fn:count", 1, args.len())?;
        Ok(ArgumentEvaluator::boxed(args, CountKernel))
    }
}

struct CountKernel;

impl TaggedValueKernel for CountKernel {
    fn invoke(
        &mut self,
        args: &[TaggedValuePointable<'_>],
        out: &mut ValueStorage,
    ) -> Result<(), RuntimeError> {
        let count = match args[0].as_sequence() {
            Some(seq) => seq.count() as i64,
            None => 1,
        };
        out.write_long(count);
        Ok(())
    }
}

/// `fn:boolean` — effective boolean value.
pub struct BooleanEvaluatorFactory;

impl ScalarEvaluatorFactory for BooleanEvaluatorFactory {
    fn create_evaluator(
        &self,
        _ctx: &TaskContext,
        args: Vec<BoxedEvaluator>,
    ) -> Result<BoxedEvaluator, RuntimeError> {
        super::expect_args("fn:boolean", 1, args.len())?;
        Ok(ArgumentEvaluator::boxed(args, BooleanKernel))
    }
}

struct BooleanKernel;

impl TaggedValueKernel for BooleanKernel {
    fn invoke(
        &mut self,
        args: &[TaggedValuePointable<'_>],
        out: &mut ValueStorage,
    ) -> Result<(), RuntimeError> {
        let value = &args[0];
        let ebv = if let Some(b) = value.as_boolean() {
            b.value()
        } else if let Some(i) = value.as_long() {
            i.value() != 0
        } else if let Some(d) = value.as_double() {
            let v = d.value();
            v != 0.0 && !v.is_nan()
        } else if let Some(s) = value.as_string() {
            !s.raw().is_empty()
        } else if value.tag() == ValueTag::Node {
            true
        } else if let Some(seq) = value.as_sequence() {
            match seq.item(0)? {
                None => false,
                Some(first) if first.tag() == ValueTag::Node => true,
                Some(first) => {
                    return Err(RuntimeError::TypeMismatch {
                        context: "fn:boolean",
                        expected: "empty sequence or node-first sequence",
                        found: format!("{:?}", first.tag()),
                    });
                }
            }
        } else {
            return Err(RuntimeError::TypeMismatch {
                context: "fn:boolean",
                expected: "value with an effective boolean value",
                found: format!("{:?}", value.tag()),
            });
        };
        out.write_boolean(ebv);
        Ok(())
    }
}
