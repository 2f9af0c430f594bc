//! Decode errors. Always fatal to the decode call; never silently truncated.

/// Error raised while decoding an encoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    /// Buffer shorter than the tag's payload requires.
    #[error("malformed encoding: value at offset {offset} needs {needed} bytes, buffer has {available}")]
    MalformedEncoding {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Byte outside the closed tag enumeration.
    #[error("malformed encoding: unknown value tag {tag:#04x} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },
}
