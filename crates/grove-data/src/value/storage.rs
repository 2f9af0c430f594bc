//! Append-only backing storage and owned encoded values.
//!
//! `ValueStorage` is the growable buffer every builder and evaluator writes
//! into. Encoded regions are never edited in place; a writer appends a new
//! region or resets the whole buffer. This is what makes concurrent read
//! sharing of finished buffers across partitions safe.

use super::error::DataError;
use super::pointable::{TaggedValuePointable, decode_value};
use super::tag::ValueTag;

/// Growable, append-only byte buffer for encoded values.
#[derive(Debug, Clone, Default)]
pub struct ValueStorage {
    data: Vec<u8>,
}

impl ValueStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Discard all content, keeping the allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.data.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Append raw, already-encoded bytes.
    #[inline]
    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Append a copy of an encoded value.
    #[inline]
    pub fn write_value(&mut self, value: &TaggedValuePointable<'_>) {
        self.data.extend_from_slice(value.bytes());
    }

    /// Decode the value at the start of the buffer.
    pub fn pointable(&self) -> Result<TaggedValuePointable<'_>, DataError> {
        decode_value(&self.data, 0)
    }

    pub fn write_boolean(&mut self, v: bool) {
        self.data.push(ValueTag::Boolean.to_u8());
        self.data.push(v as u8);
    }

    pub fn write_byte(&mut self, v: i8) {
        self.data.push(ValueTag::Byte.to_u8());
        self.data.push(v as u8);
    }

    pub fn write_short(&mut self, v: i16) {
        self.data.push(ValueTag::Short.to_u8());
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_int(&mut self, v: i32) {
        self.data.push(ValueTag::Int.to_u8());
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_long(&mut self, v: i64) {
        self.data.push(ValueTag::Long.to_u8());
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_float(&mut self, v: f32) {
        self.data.push(ValueTag::Float.to_u8());
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_double(&mut self, v: f64) {
        self.data.push(ValueTag::Double.to_u8());
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_decimal(&mut self, unscaled: i64, scale: i8) {
        self.data.push(ValueTag::Decimal.to_u8());
        self.data.extend_from_slice(&unscaled.to_le_bytes());
        self.data.push(scale as u8);
    }

    /// Append a string-like value (String, Untyped, AnyUri).
    pub fn write_text(&mut self, tag: ValueTag, text: &str) {
        assert!(tag.is_string_like(), "write_text with non-text tag {tag:?}");
        self.data.push(tag.to_u8());
        self.data
            .extend_from_slice(&(text.len() as u32).to_le_bytes());
        self.data.extend_from_slice(text.as_bytes());
    }

    /// Append a binary-like value (HexBinary, Base64Binary).
    pub fn write_binary(&mut self, tag: ValueTag, bytes: &[u8]) {
        assert!(
            tag.is_binary_like(),
            "write_binary with non-binary tag {tag:?}"
        );
        self.data.push(tag.to_u8());
        self.data
            .extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        self.data.extend_from_slice(bytes);
    }

    /// Append a date-family value (Date or one of the G* kinds).
    pub fn write_date(&mut self, tag: ValueTag, year: i32, month: u8, day: u8, tz_minutes: i16) {
        assert!(
            matches!(
                tag,
                ValueTag::Date
                    | ValueTag::GDay
                    | ValueTag::GMonth
                    | ValueTag::GMonthDay
                    | ValueTag::GYear
                    | ValueTag::GYearMonth
            ),
            "write_date with non-date tag {tag:?}"
        );
        self.data.push(tag.to_u8());
        self.data.extend_from_slice(&year.to_le_bytes());
        self.data.push(month);
        self.data.push(day);
        self.data.extend_from_slice(&tz_minutes.to_le_bytes());
    }

    pub fn write_time(&mut self, millis_of_day: u32, tz_minutes: i16) {
        self.data.push(ValueTag::Time.to_u8());
        self.data.extend_from_slice(&millis_of_day.to_le_bytes());
        self.data.extend_from_slice(&tz_minutes.to_le_bytes());
    }

    pub fn write_datetime(&mut self, epoch_millis: i64, tz_minutes: i16) {
        self.data.push(ValueTag::DateTime.to_u8());
        self.data.extend_from_slice(&epoch_millis.to_le_bytes());
        self.data.extend_from_slice(&tz_minutes.to_le_bytes());
    }

    pub fn write_duration(&mut self, months: i32, millis: i64) {
        self.data.push(ValueTag::Duration.to_u8());
        self.data.extend_from_slice(&months.to_le_bytes());
        self.data.extend_from_slice(&millis.to_le_bytes());
    }

    pub fn write_duration_year_month(&mut self, months: i32) {
        self.data.push(ValueTag::DurationYearMonth.to_u8());
        self.data.extend_from_slice(&months.to_le_bytes());
    }

    pub fn write_duration_day_time(&mut self, millis: i64) {
        self.data.push(ValueTag::DurationDayTime.to_u8());
        self.data.extend_from_slice(&millis.to_le_bytes());
    }

    pub fn write_node(&mut self, fragment_id: u32, content: &[u8]) {
        self.data.push(ValueTag::Node.to_u8());
        self.data.extend_from_slice(&fragment_id.to_le_bytes());
        self.data
            .extend_from_slice(&(content.len() as u32).to_le_bytes());
        self.data.extend_from_slice(content);
    }
}

/// An owned encoded value: the `[tag][payload]` bytes boxed for constants
/// and values that cross scope or partition boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnedValue {
    bytes: Box<[u8]>,
}

impl OwnedValue {
    /// Take ownership of encoded bytes. The caller is responsible for the
    /// bytes being a single well-formed value; `pointable` re-validates.
    pub fn from_encoded(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// Copy one encoded value out of a larger buffer.
    pub fn from_pointable(value: &TaggedValuePointable<'_>) -> Self {
        Self {
            bytes: value.bytes().into(),
        }
    }

    pub fn boolean(v: bool) -> Self {
        let mut s = ValueStorage::with_capacity(2);
        s.write_boolean(v);
        Self::from_encoded(s.data)
    }

    pub fn long(v: i64) -> Self {
        let mut s = ValueStorage::with_capacity(9);
        s.write_long(v);
        Self::from_encoded(s.data)
    }

    pub fn double(v: f64) -> Self {
        let mut s = ValueStorage::with_capacity(9);
        s.write_double(v);
        Self::from_encoded(s.data)
    }

    pub fn string(text: &str) -> Self {
        let mut s = ValueStorage::with_capacity(5 + text.len());
        s.write_text(ValueTag::String, text);
        Self::from_encoded(s.data)
    }

    /// The canonical empty sequence.
    pub fn empty_sequence() -> Self {
        Self::from_encoded(vec![ValueTag::Sequence.to_u8(), 0, 0, 0, 0])
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode as a pointable view.
    pub fn pointable(&self) -> Result<TaggedValuePointable<'_>, DataError> {
        decode_value(&self.bytes, 0)
    }
}
