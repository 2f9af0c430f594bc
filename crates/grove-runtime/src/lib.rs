//! Per-partition execution runtime for Grove.
//!
//! A lowered plan binds function identifiers to evaluator factories; at
//! execution each partition owns a call-stack frame of local registers,
//! shares the sealed global register set read-only, and runs evaluator
//! instances that read and write encoded tagged values.

pub mod eval;
pub mod functions;
pub mod register;

pub use eval::{
    ArgumentEvaluator, BoxedEvaluator, CollectionProvider, FragmentIdProvider, RuntimeError,
    ScalarEvaluator, ScalarEvaluatorFactory, StaticCollectionProvider, TaggedValueKernel,
    TaskContext,
};
pub use functions::{
    AggregateEvaluator, AggregateEvaluatorFactory, AvgAggregateFactory, BooleanEvaluatorFactory,
    CastAsEvaluatorFactory, CastableAsEvaluatorFactory, CollectionEvaluatorFactory,
    ConstantEvaluatorFactory, CountAggregateFactory, CountEvaluatorFactory, EvaluatorRegistry,
    SequenceEvaluatorFactory, VariableEvaluatorFactory,
};
pub use register::{
    CallStackFrame, GlobalRegisterAccessor, GlobalRegisters, GlobalRegistersBuilder,
    LocalRegisterAccessor, RegisterSet, RegisterValue,
};
