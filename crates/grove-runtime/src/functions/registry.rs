//! The evaluator factory registry.
//!
//! A stable, host-provided mapping from function identifier to factory.
//! The mapping may be many-to-one: after consolidation an aggregate-form
//! identifier resolves through the aggregate side table instead of the
//! scalar one.

use std::sync::Arc;

use grove_data::AtomicType;
use grove_plan::{FunctionId, builtins};
use indexmap::IndexMap;

use super::aggregate::{
    AggregateEvaluatorFactory, AvgAggregateFactory, CountAggregateFactory,
};
use super::cast::CastAsEvaluatorFactory;
use super::castable::CastableAsEvaluatorFactory;
use super::collection::CollectionEvaluatorFactory;
use super::sequence::{BooleanEvaluatorFactory, CountEvaluatorFactory, SequenceEvaluatorFactory};
use crate::eval::ScalarEvaluatorFactory;

#[derive(Default)]
pub struct EvaluatorRegistry {
    scalars: IndexMap<FunctionId, Arc<dyn ScalarEvaluatorFactory>>,
    aggregates: IndexMap<FunctionId, Arc<dyn AggregateEvaluatorFactory>>,
}

impl EvaluatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry wired with the builtin factories.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_scalar(builtins::SEQUENCE, Arc::new(SequenceEvaluatorFactory));
        registry.register_scalar(builtins::COUNT, Arc::new(CountEvaluatorFactory));
        registry.register_scalar(builtins::BOOLEAN, Arc::new(BooleanEvaluatorFactory));
        registry.register_scalar(builtins::COLLECTION, Arc::new(CollectionEvaluatorFactory));

        for atomic in AtomicType::ALL {
            registry.register_scalar(
                FunctionId::castable_as(atomic),
                Arc::new(CastableAsEvaluatorFactory::new(atomic)),
            );
        }
        // Cast is registered for the families the kernel implements; other
        // targets resolve through dedicated parsing collaborators.
        for atomic in [
            AtomicType::Boolean,
            AtomicType::Byte,
            AtomicType::Short,
            AtomicType::Int,
            AtomicType::Long,
            AtomicType::Float,
            AtomicType::Double,
            AtomicType::Decimal,
            AtomicType::String,
            AtomicType::Untyped,
            AtomicType::AnyUri,
        ] {
            registry.register_scalar(
                FunctionId::cast_as(atomic),
                Arc::new(CastAsEvaluatorFactory::new(atomic)),
            );
        }

        registry.register_aggregate(builtins::COUNT_AGGREGATE, Arc::new(CountAggregateFactory));
        registry.register_aggregate(builtins::AVG_AGGREGATE, Arc::new(AvgAggregateFactory));
        registry
    }

    pub fn register_scalar(
        &mut self,
        id: FunctionId,
        factory: Arc<dyn ScalarEvaluatorFactory>,
    ) {
        self.scalars.insert(id, factory);
    }

    pub fn register_aggregate(
        &mut self,
        id: FunctionId,
        factory: Arc<dyn AggregateEvaluatorFactory>,
    ) {
        self.aggregates.insert(id, factory);
    }

    pub fn scalar(&self, id: &FunctionId) -> Option<Arc<dyn ScalarEvaluatorFactory>> {
        self.scalars.get(id).cloned()
    }

    pub fn aggregate(&self, id: &FunctionId) -> Option<Arc<dyn AggregateEvaluatorFactory>> {
        self.aggregates.get(id).cloned()
    }
}
