//! Zero-copy views over encoded values.
//!
//! A pointable is a non-owning `(buffer, start, length)` triple typed to one
//! tag family. Construction goes through `decode_value`, which validates that
//! the buffer holds the tag's full payload; the typed projections after that
//! only reinterpret already-validated bytes.

use super::error::DataError;
use super::tag::{PayloadLayout, ValueTag};

/// Decode the value starting at `offset`.
///
/// Validates the tag byte and that the buffer covers the full payload,
/// recursing into sequence items. Fails with `DataError::MalformedEncoding`
/// on a short buffer and `DataError::UnknownTag` on a byte outside the
/// enumeration.
pub fn decode_value(buf: &[u8], offset: usize) -> Result<TaggedValuePointable<'_>, DataError> {
    if offset >= buf.len() {
        return Err(DataError::MalformedEncoding {
            offset,
            needed: 1,
            available: buf.len().saturating_sub(offset),
        });
    }
    let tag = ValueTag::from_u8(buf[offset]).ok_or(DataError::UnknownTag {
        tag: buf[offset],
        offset,
    })?;

    let payload_start = offset + 1;
    let payload_len = payload_size(tag, buf, payload_start)?;

    Ok(TaggedValuePointable {
        buf,
        start: offset,
        len: 1 + payload_len,
        tag,
    })
}

/// Compute the payload size for `tag` at `payload_start`, validating bounds.
fn payload_size(tag: ValueTag, buf: &[u8], payload_start: usize) -> Result<usize, DataError> {
    let available = buf.len().saturating_sub(payload_start);
    let need = |needed: usize| -> Result<(), DataError> {
        if available < needed {
            Err(DataError::MalformedEncoding {
                offset: payload_start,
                needed,
                available,
            })
        } else {
            Ok(())
        }
    };

    match tag.layout() {
        PayloadLayout::Fixed(size) => {
            need(size)?;
            Ok(size)
        }
        PayloadLayout::LengthPrefixed { header } => {
            need(header + 4)?;
            let body = read_u32(buf, payload_start + header) as usize;
            need(header + 4 + body)?;
            Ok(header + 4 + body)
        }
        PayloadLayout::Sequence => {
            need(4)?;
            let count = read_u32(buf, payload_start);
            let mut cursor = payload_start + 4;
            for _ in 0..count {
                let item = decode_value(buf, cursor)?;
                cursor += item.len();
            }
            Ok(cursor - payload_start)
        }
    }
}

#[inline]
fn read_u16(buf: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([buf[pos], buf[pos + 1]])
}

#[inline]
fn read_u32(buf: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]])
}

#[inline]
fn read_u64(buf: &[u8], pos: usize) -> u64 {
    u64::from_le_bytes([
        buf[pos],
        buf[pos + 1],
        buf[pos + 2],
        buf[pos + 3],
        buf[pos + 4],
        buf[pos + 5],
        buf[pos + 6],
        buf[pos + 7],
    ])
}

/// View over one encoded value: tag byte plus payload.
#[derive(Clone, Copy, Debug)]
pub struct TaggedValuePointable<'a> {
    buf: &'a [u8],
    start: usize,
    len: usize,
    tag: ValueTag,
}

impl<'a> TaggedValuePointable<'a> {
    /// The value's tag.
    #[inline]
    pub fn tag(&self) -> ValueTag {
        self.tag
    }

    /// Offset of the tag byte in the underlying buffer.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Total encoded length, tag byte included.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// The full `[tag][payload]` byte range.
    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        &self.buf[self.start..self.start + self.len]
    }

    /// The payload byte range (tag byte excluded).
    #[inline]
    pub fn payload(&self) -> &'a [u8] {
        &self.buf[self.start + 1..self.start + self.len]
    }

    /// Project to a boolean view. `None` if the tag is not Boolean.
    pub fn as_boolean(&self) -> Option<BooleanPointable<'a>> {
        (self.tag == ValueTag::Boolean).then(|| BooleanPointable {
            payload: self.payload(),
        })
    }

    /// Project to an integer view (Byte, Short, Int, Long widen to i64).
    pub fn as_long(&self) -> Option<LongPointable<'a>> {
        matches!(
            self.tag,
            ValueTag::Byte | ValueTag::Short | ValueTag::Int | ValueTag::Long
        )
        .then(|| LongPointable {
            payload: self.payload(),
            tag: self.tag,
        })
    }

    /// Project to a floating-point view (Float widens to f64).
    pub fn as_double(&self) -> Option<DoublePointable<'a>> {
        matches!(self.tag, ValueTag::Float | ValueTag::Double).then(|| DoublePointable {
            payload: self.payload(),
            tag: self.tag,
        })
    }

    /// Project to a decimal view.
    pub fn as_decimal(&self) -> Option<DecimalPointable<'a>> {
        (self.tag == ValueTag::Decimal).then(|| DecimalPointable {
            payload: self.payload(),
        })
    }

    /// Project to a text view (String, Untyped, AnyUri).
    pub fn as_string(&self) -> Option<StringPointable<'a>> {
        self.tag.is_string_like().then(|| StringPointable {
            payload: self.payload(),
            start: self.start + 1,
        })
    }

    /// Project to a binary view (HexBinary, Base64Binary).
    pub fn as_binary(&self) -> Option<BinaryPointable<'a>> {
        self.tag.is_binary_like().then(|| BinaryPointable {
            payload: self.payload(),
        })
    }

    /// Project to a date view (Date and the G* kinds share the layout).
    pub fn as_date(&self) -> Option<DatePointable<'a>> {
        matches!(
            self.tag,
            ValueTag::Date
                | ValueTag::GDay
                | ValueTag::GMonth
                | ValueTag::GMonthDay
                | ValueTag::GYear
                | ValueTag::GYearMonth
        )
        .then(|| DatePointable {
            payload: self.payload(),
        })
    }

    /// Project to a time-of-day view.
    pub fn as_time(&self) -> Option<TimePointable<'a>> {
        (self.tag == ValueTag::Time).then(|| TimePointable {
            payload: self.payload(),
        })
    }

    /// Project to a date-time view.
    pub fn as_datetime(&self) -> Option<DateTimePointable<'a>> {
        (self.tag == ValueTag::DateTime).then(|| DateTimePointable {
            payload: self.payload(),
        })
    }

    /// Project to a duration view (all three duration kinds).
    pub fn as_duration(&self) -> Option<DurationPointable<'a>> {
        matches!(
            self.tag,
            ValueTag::Duration | ValueTag::DurationYearMonth | ValueTag::DurationDayTime
        )
        .then(|| DurationPointable {
            payload: self.payload(),
            tag: self.tag,
        })
    }

    /// Project to a node view.
    pub fn as_node(&self) -> Option<NodePointable<'a>> {
        (self.tag == ValueTag::Node).then(|| NodePointable {
            payload: self.payload(),
        })
    }

    /// Project to a sequence view.
    pub fn as_sequence(&self) -> Option<SequencePointable<'a>> {
        (self.tag == ValueTag::Sequence).then(|| SequencePointable {
            buf: self.buf,
            payload_start: self.start + 1,
            payload_len: self.len - 1,
        })
    }
}

/// Boolean payload: one byte, zero is false.
#[derive(Clone, Copy, Debug)]
pub struct BooleanPointable<'a> {
    payload: &'a [u8],
}

impl BooleanPointable<'_> {
    #[inline]
    pub fn value(&self) -> bool {
        self.payload[0] != 0
    }
}

/// Integer payloads (Byte, Short, Int, Long), widened to i64.
#[derive(Clone, Copy, Debug)]
pub struct LongPointable<'a> {
    payload: &'a [u8],
    tag: ValueTag,
}

impl LongPointable<'_> {
    pub fn value(&self) -> i64 {
        match self.tag {
            ValueTag::Byte => self.payload[0] as i8 as i64,
            ValueTag::Short => read_u16(self.payload, 0) as i16 as i64,
            ValueTag::Int => read_u32(self.payload, 0) as i32 as i64,
            ValueTag::Long => read_u64(self.payload, 0) as i64,
            _ => unreachable!("LongPointable over non-integer tag"),
        }
    }
}

/// Floating-point payloads (Float, Double), widened to f64.
#[derive(Clone, Copy, Debug)]
pub struct DoublePointable<'a> {
    payload: &'a [u8],
    tag: ValueTag,
}

impl DoublePointable<'_> {
    pub fn value(&self) -> f64 {
        match self.tag {
            ValueTag::Float => f32::from_le_bytes([
                self.payload[0],
                self.payload[1],
                self.payload[2],
                self.payload[3],
            ]) as f64,
            ValueTag::Double => f64::from_le_bytes([
                self.payload[0],
                self.payload[1],
                self.payload[2],
                self.payload[3],
                self.payload[4],
                self.payload[5],
                self.payload[6],
                self.payload[7],
            ]),
            _ => unreachable!("DoublePointable over non-float tag"),
        }
    }
}

/// Decimal payload: i64 unscaled value + i8 scale.
#[derive(Clone, Copy, Debug)]
pub struct DecimalPointable<'a> {
    payload: &'a [u8],
}

impl DecimalPointable<'_> {
    #[inline]
    pub fn unscaled(&self) -> i64 {
        read_u64(self.payload, 0) as i64
    }

    #[inline]
    pub fn scale(&self) -> i8 {
        self.payload[8] as i8
    }
}

/// Text payloads: u32 length prefix + UTF-8 bytes.
#[derive(Clone, Copy, Debug)]
pub struct StringPointable<'a> {
    payload: &'a [u8],
    start: usize,
}

impl<'a> StringPointable<'a> {
    /// The raw text bytes (length prefix stripped).
    #[inline]
    pub fn raw(&self) -> &'a [u8] {
        &self.payload[4..]
    }

    /// The text as UTF-8. A non-UTF-8 payload is a malformed encoding.
    pub fn text(&self) -> Result<&'a str, DataError> {
        std::str::from_utf8(self.raw()).map_err(|e| DataError::MalformedEncoding {
            offset: self.start + 4 + e.valid_up_to(),
            needed: 1,
            available: 0,
        })
    }
}

/// Binary payloads: u32 length prefix + raw bytes.
#[derive(Clone, Copy, Debug)]
pub struct BinaryPointable<'a> {
    payload: &'a [u8],
}

impl<'a> BinaryPointable<'a> {
    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        &self.payload[4..]
    }
}

/// Date payload, shared with the G* kinds: year i32, month u8, day u8, tz i16.
#[derive(Clone, Copy, Debug)]
pub struct DatePointable<'a> {
    payload: &'a [u8],
}

impl DatePointable<'_> {
    #[inline]
    pub fn year(&self) -> i32 {
        read_u32(self.payload, 0) as i32
    }

    #[inline]
    pub fn month(&self) -> u8 {
        self.payload[4]
    }

    #[inline]
    pub fn day(&self) -> u8 {
        self.payload[5]
    }

    #[inline]
    pub fn tz_offset_minutes(&self) -> i16 {
        read_u16(self.payload, 6) as i16
    }
}

/// Time payload: millis-of-day u32 + tz i16.
#[derive(Clone, Copy, Debug)]
pub struct TimePointable<'a> {
    payload: &'a [u8],
}

impl TimePointable<'_> {
    #[inline]
    pub fn millis_of_day(&self) -> u32 {
        read_u32(self.payload, 0)
    }

    #[inline]
    pub fn tz_offset_minutes(&self) -> i16 {
        read_u16(self.payload, 4) as i16
    }
}

/// DateTime payload: epoch millis i64 + tz i16.
#[derive(Clone, Copy, Debug)]
pub struct DateTimePointable<'a> {
    payload: &'a [u8],
}

impl DateTimePointable<'_> {
    #[inline]
    pub fn epoch_millis(&self) -> i64 {
        read_u64(self.payload, 0) as i64
    }

    #[inline]
    pub fn tz_offset_minutes(&self) -> i16 {
        read_u16(self.payload, 8) as i16
    }
}

/// Duration payloads. The year-month kind has no millis part and the
/// day-time kind has no months part; missing parts read as zero.
#[derive(Clone, Copy, Debug)]
pub struct DurationPointable<'a> {
    payload: &'a [u8],
    tag: ValueTag,
}

impl DurationPointable<'_> {
    pub fn months(&self) -> i32 {
        match self.tag {
            ValueTag::Duration | ValueTag::DurationYearMonth => read_u32(self.payload, 0) as i32,
            _ => 0,
        }
    }

    pub fn millis(&self) -> i64 {
        match self.tag {
            ValueTag::Duration => read_u64(self.payload, 4) as i64,
            ValueTag::DurationDayTime => read_u64(self.payload, 0) as i64,
            _ => 0,
        }
    }
}

/// Node payload: u32 fragment id, u32 length prefix, opaque fragment bytes.
#[derive(Clone, Copy, Debug)]
pub struct NodePointable<'a> {
    payload: &'a [u8],
}

impl<'a> NodePointable<'a> {
    /// Per-partition-namespaced fragment id.
    #[inline]
    pub fn fragment_id(&self) -> u32 {
        read_u32(self.payload, 0)
    }

    /// The opaque fragment interior.
    #[inline]
    pub fn content(&self) -> &'a [u8] {
        &self.payload[8..]
    }
}

/// Sequence payload: u32 item count + tag-prefixed items.
#[derive(Clone, Copy, Debug)]
pub struct SequencePointable<'a> {
    buf: &'a [u8],
    payload_start: usize,
    payload_len: usize,
}

impl<'a> SequencePointable<'a> {
    /// Number of items.
    #[inline]
    pub fn count(&self) -> usize {
        read_u32(self.buf, self.payload_start) as usize
    }

    /// Decode the `index`-th item. `None` past the end.
    ///
    /// Items are laid out back to back, so this walks from the front; prefer
    /// `iter` for full scans.
    pub fn item(&self, index: usize) -> Result<Option<TaggedValuePointable<'a>>, DataError> {
        if index >= self.count() {
            return Ok(None);
        }
        let mut cursor = self.payload_start + 4;
        let mut item = decode_value(self.buf, cursor)?;
        for _ in 0..index {
            cursor += item.len();
            item = decode_value(self.buf, cursor)?;
        }
        Ok(Some(item))
    }

    /// Iterate the items front to back.
    pub fn iter(&self) -> SequenceIter<'a> {
        SequenceIter {
            buf: self.buf,
            cursor: self.payload_start + 4,
            end: self.payload_start + self.payload_len,
            remaining: self.count(),
        }
    }
}

/// Iterator over sequence items.
pub struct SequenceIter<'a> {
    buf: &'a [u8],
    cursor: usize,
    end: usize,
    remaining: usize,
}

impl<'a> Iterator for SequenceIter<'a> {
    type Item = Result<TaggedValuePointable<'a>, DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.cursor >= self.end {
            return None;
        }
        self.remaining -= 1;
        match decode_value(self.buf, self.cursor) {
            Ok(item) => {
                self.cursor += item.len();
                Some(Ok(item))
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }
}
