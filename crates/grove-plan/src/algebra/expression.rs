//! Logical expressions: function calls, variable references, constants.
//!
//! Expressions are owned trees (no sharing); the operator graph is where
//! structure is shared. Constants embed their encoded tagged-value bytes so
//! rewrite rules can construct and inspect them without a runtime.

use std::fmt;

use grove_data::value::{DataError, OwnedValue, TaggedValuePointable, decode_value};

use super::types::SequenceType;
use crate::catalog::FunctionId;

/// Identifier of a plan variable, unique within one plan for its lifetime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, serde::Serialize)]
pub struct VariableId(u32);

impl VariableId {
    /// Raw index, for dumps and serialization.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    /// Rebuild from a raw index. Only the owning plan hands these out.
    pub(crate) fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// A constant: encoded tagged-value bytes plus the static type they carry.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize)]
pub struct ConstantValue {
    bytes: Vec<u8>,
    static_type: SequenceType,
}

impl ConstantValue {
    pub fn new(value: OwnedValue, static_type: SequenceType) -> Self {
        Self {
            bytes: value.bytes().to_vec(),
            static_type,
        }
    }

    /// The canonical boolean-true constant rewrite rules synthesize.
    pub fn boolean_true() -> Self {
        Self::new(
            OwnedValue::boolean(true),
            SequenceType::atomic(grove_data::AtomicType::Boolean),
        )
    }

    #[inline]
    pub fn static_type(&self) -> SequenceType {
        self.static_type
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode the embedded value.
    pub fn pointable(&self) -> Result<TaggedValuePointable<'_>, DataError> {
        decode_value(&self.bytes, 0)
    }
}

/// A logical expression tree.
#[derive(Clone, PartialEq, Eq, Debug, serde::Serialize)]
pub enum Expression {
    /// Call of a registered function over ordered arguments.
    FunctionCall {
        function: FunctionId,
        args: Vec<Expression>,
    },
    /// Reference to a producing Assign/Aggregate's output variable.
    Variable(VariableId),
    /// Embedded encoded constant.
    Constant(ConstantValue),
}

impl Expression {
    pub fn call(function: FunctionId, args: Vec<Expression>) -> Self {
        Self::FunctionCall { function, args }
    }

    pub fn variable(var: VariableId) -> Self {
        Self::Variable(var)
    }

    pub fn constant(value: ConstantValue) -> Self {
        Self::Constant(value)
    }

    /// The call parts, when this is a function call.
    pub fn as_call(&self) -> Option<(&FunctionId, &[Expression])> {
        match self {
            Self::FunctionCall { function, args } => Some((function, args)),
            _ => None,
        }
    }

    /// The variable id, when this is a variable reference.
    pub fn as_variable(&self) -> Option<VariableId> {
        match self {
            Self::Variable(v) => Some(*v),
            _ => None,
        }
    }

    /// The constant, when this is a constant.
    pub fn as_constant(&self) -> Option<&ConstantValue> {
        match self {
            Self::Constant(c) => Some(c),
            _ => None,
        }
    }

    /// Visit every variable reference in the tree.
    pub fn for_each_variable(&self, visit: &mut impl FnMut(VariableId)) {
        match self {
            Self::Variable(v) => visit(*v),
            Self::FunctionCall { args, .. } => {
                for arg in args {
                    arg.for_each_variable(visit);
                }
            }
            Self::Constant(_) => {}
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(v) => write!(f, "{v}"),
            Self::Constant(c) => write!(f, "{}", format_constant(c)),
            Self::FunctionCall { function, args } => {
                write!(f, "{}(", function.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Render a constant for dumps: the decoded value where the kind has a
/// short lexical form, otherwise just the tag.
fn format_constant(c: &ConstantValue) -> String {
    let Ok(tvp) = c.pointable() else {
        return "const <malformed>".to_owned();
    };
    if let Some(b) = tvp.as_boolean() {
        return format!("const {}", b.value());
    }
    if let Some(i) = tvp.as_long() {
        return format!("const {}", i.value());
    }
    if let Some(d) = tvp.as_double() {
        return format!("const {}", d.value());
    }
    if let Some(s) = tvp.as_string() {
        if let Ok(text) = s.text() {
            return format!("const \"{text}\"");
        }
    }
    format!("const <{:?}>", tvp.tag())
}
