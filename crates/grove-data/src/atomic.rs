//! The atomic type lattice.
//!
//! `AtomicType` is the dense enumeration of atomic value kinds, one per
//! atomic `ValueTag`. Static typing and the castability matrix work over
//! this enum; the structural kinds (Node, Sequence) are deliberately
//! excluded.

use crate::value::ValueTag;

/// Atomic value kinds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize)]
pub enum AtomicType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    String,
    Untyped,
    AnyUri,
    Date,
    Time,
    DateTime,
    GDay,
    GMonth,
    GMonthDay,
    GYear,
    GYearMonth,
    Duration,
    DurationYearMonth,
    DurationDayTime,
    HexBinary,
    Base64Binary,
}

impl AtomicType {
    /// Map a value tag to its atomic type. Structural tags return `None`.
    pub fn from_tag(tag: ValueTag) -> Option<Self> {
        match tag {
            ValueTag::Boolean => Some(Self::Boolean),
            ValueTag::Byte => Some(Self::Byte),
            ValueTag::Short => Some(Self::Short),
            ValueTag::Int => Some(Self::Int),
            ValueTag::Long => Some(Self::Long),
            ValueTag::Float => Some(Self::Float),
            ValueTag::Double => Some(Self::Double),
            ValueTag::Decimal => Some(Self::Decimal),
            ValueTag::String => Some(Self::String),
            ValueTag::Untyped => Some(Self::Untyped),
            ValueTag::AnyUri => Some(Self::AnyUri),
            ValueTag::Date => Some(Self::Date),
            ValueTag::Time => Some(Self::Time),
            ValueTag::DateTime => Some(Self::DateTime),
            ValueTag::GDay => Some(Self::GDay),
            ValueTag::GMonth => Some(Self::GMonth),
            ValueTag::GMonthDay => Some(Self::GMonthDay),
            ValueTag::GYear => Some(Self::GYear),
            ValueTag::GYearMonth => Some(Self::GYearMonth),
            ValueTag::Duration => Some(Self::Duration),
            ValueTag::DurationYearMonth => Some(Self::DurationYearMonth),
            ValueTag::DurationDayTime => Some(Self::DurationDayTime),
            ValueTag::HexBinary => Some(Self::HexBinary),
            ValueTag::Base64Binary => Some(Self::Base64Binary),
            ValueTag::Node | ValueTag::Sequence => None,
        }
    }

    /// The value tag carrying this atomic type.
    pub fn tag(self) -> ValueTag {
        match self {
            Self::Boolean => ValueTag::Boolean,
            Self::Byte => ValueTag::Byte,
            Self::Short => ValueTag::Short,
            Self::Int => ValueTag::Int,
            Self::Long => ValueTag::Long,
            Self::Float => ValueTag::Float,
            Self::Double => ValueTag::Double,
            Self::Decimal => ValueTag::Decimal,
            Self::String => ValueTag::String,
            Self::Untyped => ValueTag::Untyped,
            Self::AnyUri => ValueTag::AnyUri,
            Self::Date => ValueTag::Date,
            Self::Time => ValueTag::Time,
            Self::DateTime => ValueTag::DateTime,
            Self::GDay => ValueTag::GDay,
            Self::GMonth => ValueTag::GMonth,
            Self::GMonthDay => ValueTag::GMonthDay,
            Self::GYear => ValueTag::GYear,
            Self::GYearMonth => ValueTag::GYearMonth,
            Self::Duration => ValueTag::Duration,
            Self::DurationYearMonth => ValueTag::DurationYearMonth,
            Self::DurationDayTime => ValueTag::DurationDayTime,
            Self::HexBinary => ValueTag::HexBinary,
            Self::Base64Binary => ValueTag::Base64Binary,
        }
    }

    /// Canonical lowercase name, used in function identifiers and dumps.
    pub fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Untyped => "untyped",
            Self::AnyUri => "any-uri",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "date-time",
            Self::GDay => "g-day",
            Self::GMonth => "g-month",
            Self::GMonthDay => "g-month-day",
            Self::GYear => "g-year",
            Self::GYearMonth => "g-year-month",
            Self::Duration => "duration",
            Self::DurationYearMonth => "duration-year-month",
            Self::DurationDayTime => "duration-day-time",
            Self::HexBinary => "hex-binary",
            Self::Base64Binary => "base64-binary",
        }
    }

    /// Every atomic kind, in tag order.
    pub const ALL: [AtomicType; 24] = [
        Self::Boolean,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Decimal,
        Self::String,
        Self::Untyped,
        Self::AnyUri,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::GDay,
        Self::GMonth,
        Self::GMonthDay,
        Self::GYear,
        Self::GYearMonth,
        Self::Duration,
        Self::DurationYearMonth,
        Self::DurationDayTime,
        Self::HexBinary,
        Self::Base64Binary,
    ];

    /// Integer, floating-point and decimal kinds.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Byte
                | Self::Short
                | Self::Int
                | Self::Long
                | Self::Float
                | Self::Double
                | Self::Decimal
        )
    }

    /// Kinds carrying UTF-8 text.
    pub fn is_string_like(self) -> bool {
        matches!(self, Self::String | Self::Untyped | Self::AnyUri)
    }

    /// Calendar kinds (Date, Time, DateTime and the G* kinds).
    pub fn is_calendar(self) -> bool {
        matches!(
            self,
            Self::Date
                | Self::Time
                | Self::DateTime
                | Self::GDay
                | Self::GMonth
                | Self::GMonthDay
                | Self::GYear
                | Self::GYearMonth
        )
    }

    /// Duration kinds.
    pub fn is_duration(self) -> bool {
        matches!(
            self,
            Self::Duration | Self::DurationYearMonth | Self::DurationDayTime
        )
    }

    /// Binary kinds.
    pub fn is_binary(self) -> bool {
        matches!(self, Self::HexBinary | Self::Base64Binary)
    }
}
