//! Plan operators.
//!
//! Operators are arena nodes addressed by `OpId`. Each node owns its ordered
//! input edge list; sharing happens through ids, never through pointers.

use super::expression::{Expression, VariableId};

/// Stable arena id of an operator node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, serde::Serialize)]
pub struct OpId(pub(crate) u32);

impl OpId {
    /// Raw index, for dumps and serialization.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// One nested plan owned by a Subplan operator: one or more roots executed
/// per input tuple.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize)]
pub struct NestedPlan {
    pub roots: Vec<OpId>,
}

/// Operator variants.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize)]
pub enum OperatorKind {
    /// Source producing one empty tuple.
    EmptySource,
    /// Source importing the enclosing Subplan's input tuple.
    NestedSource,
    /// Binds one expression result to one variable.
    Assign {
        variable: VariableId,
        expr: Expression,
    },
    /// Filters tuples by a boolean condition.
    Select { condition: Expression },
    /// Reduces the input into one tuple of aggregate results.
    Aggregate {
        variables: Vec<VariableId>,
        exprs: Vec<Expression>,
        /// Boolean-valued input controlling grouping/parallel reduction.
        partitioning_variable: Option<VariableId>,
    },
    /// Owns nested plans executed per input tuple.
    Subplan { plans: Vec<NestedPlan> },
}

impl OperatorKind {
    /// Short name for dumps.
    pub fn name(&self) -> &'static str {
        match self {
            Self::EmptySource => "empty-source",
            Self::NestedSource => "nested-source",
            Self::Assign { .. } => "assign",
            Self::Select { .. } => "select",
            Self::Aggregate { .. } => "aggregate",
            Self::Subplan { .. } => "subplan",
        }
    }

    /// Whether this is a source operator (no inputs by construction).
    pub fn is_source(&self) -> bool {
        matches!(self, Self::EmptySource | Self::NestedSource)
    }
}

/// An operator node: variant plus ordered input edges.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize)]
pub struct Operator {
    pub kind: OperatorKind,
    pub inputs: Vec<OpId>,
}

impl Operator {
    /// Visit every expression owned by this operator.
    pub fn for_each_expression(&self, visit: &mut impl FnMut(&Expression)) {
        match &self.kind {
            OperatorKind::Assign { expr, .. } => visit(expr),
            OperatorKind::Select { condition } => visit(condition),
            OperatorKind::Aggregate { exprs, .. } => {
                for e in exprs {
                    visit(e);
                }
            }
            OperatorKind::EmptySource | OperatorKind::NestedSource | OperatorKind::Subplan { .. } => {}
        }
    }

    /// Variables this operator defines for its consumers.
    pub fn defined_variables(&self) -> Vec<VariableId> {
        match &self.kind {
            OperatorKind::Assign { variable, .. } => vec![*variable],
            OperatorKind::Aggregate { variables, .. } => variables.clone(),
            _ => Vec::new(),
        }
    }
}
