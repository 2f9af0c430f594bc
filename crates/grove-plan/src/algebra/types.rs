//! Static sequence types: what an expression is known to produce at
//! compile time.

use grove_data::AtomicType;

/// Occurrence indicator for a sequence type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize)]
pub enum Quantifier {
    One,
    ZeroOrOne,
    ZeroOrMore,
    OneOrMore,
}

/// Item kind of a sequence type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize)]
pub enum ItemType {
    Atomic(AtomicType),
    Node,
    AnyItem,
}

/// Static type of an expression: item kind plus occurrence.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize)]
pub struct SequenceType {
    pub item: ItemType,
    pub quantifier: Quantifier,
}

impl SequenceType {
    /// Exactly one item of `item`.
    pub fn one(item: ItemType) -> Self {
        Self {
            item,
            quantifier: Quantifier::One,
        }
    }

    /// Exactly one atomic item.
    pub fn atomic(atomic: AtomicType) -> Self {
        Self::one(ItemType::Atomic(atomic))
    }

    /// Zero or more items of `item`.
    pub fn zero_or_more(item: ItemType) -> Self {
        Self {
            item,
            quantifier: Quantifier::ZeroOrMore,
        }
    }

    /// The atomic kind, when this type is exactly one atomic item.
    pub fn single_atomic(&self) -> Option<AtomicType> {
        match (self.item, self.quantifier) {
            (ItemType::Atomic(a), Quantifier::One) => Some(a),
            _ => None,
        }
    }
}
