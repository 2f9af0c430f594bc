//! The castability matrix.
//!
//! A total function over (source, target) tag pairs answering whether a cast
//! is statically legal. Legality queries never fail: unlisted pairs and any
//! structural operand answer false. Entries are independent — castability is
//! not transitively closed.
//!
//! String-like sources answer true for every atomic target; whether a
//! particular string actually parses as the target type is a runtime
//! question for the cast evaluator, not the matrix.

use crate::atomic::AtomicType;
use crate::value::{OwnedValue, ValueTag};

/// Whether a value of `source` may be cast to `target`.
pub fn castable(source: ValueTag, target: ValueTag) -> bool {
    match (AtomicType::from_tag(source), AtomicType::from_tag(target)) {
        (Some(src), Some(dst)) => atomic_castable(src, dst),
        _ => false,
    }
}

/// `castable`, answered as an encoded boolean value.
pub fn castable_value(source: ValueTag, target: ValueTag) -> OwnedValue {
    OwnedValue::boolean(castable(source, target))
}

fn atomic_castable(src: AtomicType, dst: AtomicType) -> bool {
    use AtomicType::*;

    if src == dst {
        return true;
    }
    // Every atomic value has a lexical form.
    if matches!(dst, String | Untyped) {
        return true;
    }
    match src {
        String | Untyped => true,
        AnyUri => false,
        Boolean => dst.is_numeric(),
        Byte | Short | Int | Long | Float | Double | Decimal => {
            dst.is_numeric() || dst == Boolean
        }
        DateTime => matches!(
            dst,
            Date | Time | GDay | GMonth | GMonthDay | GYear | GYearMonth
        ),
        Date => matches!(dst, DateTime | GDay | GMonth | GMonthDay | GYear | GYearMonth),
        Time | GDay | GMonth | GMonthDay | GYear | GYearMonth => false,
        Duration | DurationYearMonth | DurationDayTime => dst.is_duration(),
        HexBinary => dst == Base64Binary,
        Base64Binary => dst == HexBinary,
    }
}
