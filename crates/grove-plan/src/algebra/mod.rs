//! The logical plan algebra: operators, expressions and static types.

mod expression;
mod operator;
mod plan;
mod types;

#[cfg(test)]
mod expression_tests;
#[cfg(test)]
mod plan_tests;

pub use expression::{ConstantValue, Expression, VariableId};
pub use operator::{NestedPlan, OpId, Operator, OperatorKind};
pub use plan::LogicalPlan;
pub use types::{ItemType, Quantifier, SequenceType};
