//! Tagged binary value model for Grove.
//!
//! Every runtime value is a self-describing byte range: a one-byte type tag
//! followed by a payload whose layout is fully determined by the tag. This
//! crate contains:
//! - Tag enumeration and payload layouts (`ValueTag`)
//! - Zero-copy views over encoded values (`TaggedValuePointable` and the
//!   per-family views)
//! - Append-only storage and builders (`ValueStorage`, `SequenceBuilder`)
//! - The atomic type lattice and the castability matrix

pub mod atomic;
pub mod castability;
pub mod value;


pub use atomic::AtomicType;
pub use castability::{castable, castable_value};
pub use value::{
    BinaryPointable, BooleanPointable, DataError, DatePointable, DateTimePointable,
    DecimalPointable, DoublePointable, DurationPointable, LongPointable, NodePointable,
    OwnedValue, SequenceBuilder, SequencePointable, StringPointable, TaggedValuePointable,
    TimePointable, ValueStorage, ValueTag, decode_value,
};
