//! Incremental sequence construction.

use super::pointable::TaggedValuePointable;
use super::storage::{OwnedValue, ValueStorage};
use super::tag::ValueTag;

/// Builds one contiguous encoded sequence by appending items into a
/// growable scratch buffer.
///
/// The builder is restartable: `reset` discards accumulated items so one
/// instance can be reused across evaluator calls. Callers that keep a
/// builder across calls must reset it at the start of each call; `finish_into`
/// deliberately does not reset, so a forgotten reset is observable as leaked
/// items rather than silent truncation.
#[derive(Debug, Clone, Default)]
pub struct SequenceBuilder {
    items: ValueStorage,
    count: u32,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard accumulated items.
    pub fn reset(&mut self) {
        self.items.reset();
        self.count = 0;
    }

    /// Number of items appended since the last reset.
    #[inline]
    pub fn count(&self) -> usize {
        self.count as usize
    }

    /// Append a copy of an encoded value as the next item.
    pub fn add_item(&mut self, value: &TaggedValuePointable<'_>) {
        self.items.write_value(value);
        self.count += 1;
    }

    /// Append an owned encoded value as the next item.
    pub fn add_owned(&mut self, value: &OwnedValue) {
        self.items.append(value.bytes());
        self.count += 1;
    }

    /// Append the finished sequence value to `out`.
    pub fn finish_into(&self, out: &mut ValueStorage) {
        let mut header = [0u8; 5];
        header[0] = ValueTag::Sequence.to_u8();
        header[1..5].copy_from_slice(&self.count.to_le_bytes());
        out.append(&header);
        out.append(self.items.as_slice());
    }
}
