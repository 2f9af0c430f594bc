//! `fn:collection` — folds a named collection's documents into one encoded
//! sequence.
//!
//! Document loading is the collection provider's job; this evaluator only
//! consumes the provider's stream. The sequence builder is partition-local
//! scratch reset at the start of every call.

use std::sync::Arc;

use grove_data::value::{SequenceBuilder, TaggedValuePointable, ValueStorage, ValueTag};

use crate::eval::{
    ArgumentEvaluator, BoxedEvaluator, CollectionProvider, RuntimeError, ScalarEvaluatorFactory,
    TaggedValueKernel, TaskContext,
};

pub struct CollectionEvaluatorFactory;

impl ScalarEvaluatorFactory for CollectionEvaluatorFactory {
    fn create_evaluator(
        &self,
        ctx: &TaskContext,
        args: Vec<BoxedEvaluator>,
    ) -> Result<BoxedEvaluator, RuntimeError> {
        super::expect_args("fn:collection", 1, args.len())?;
        Ok(ArgumentEvaluator::boxed(
            args,
            CollectionKernel {
                provider: Arc::clone(ctx.collections()),
                builder: SequenceBuilder::new(),
            },
        ))
    }
}

struct CollectionKernel {
    provider: Arc<dyn CollectionProvider>,
    builder: SequenceBuilder,
}

impl TaggedValueKernel for CollectionKernel {
    fn invoke(
        &mut self,
        args: &[TaggedValuePointable<'_>],
        out: &mut ValueStorage,
    ) -> Result<(), RuntimeError> {
        let name_arg = &args[0];
        let view = match name_arg.as_string() {
            Some(view) if name_arg.tag() == ValueTag::String => view,
            _ => {
                return Err(RuntimeError::TypeMismatch {
                    context: "fn:collection",
                    expected: "string collection name",
                    found: format!("{:?}", name_arg.tag()),
                });
            }
        };
        let name = view.text()?;

        let Some(documents) = self.provider.open(name) else {
            return Err(RuntimeError::ResourceNotFound {
                kind: "collection",
                name: name.to_owned(),
            });
        };

        self.builder.reset();
        for document in documents {
            self.builder.add_owned(&document);
        }
        self.builder.finish_into(out);
        Ok(())
    }
}
