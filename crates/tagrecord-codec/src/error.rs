/// Errors that can occur during record encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// A byte that is not a known type tag appeared where a tag was expected.
    #[error("invalid type tag {0} in record stream")]
    InvalidTag(u8),

    /// The stream ended before the `0xFF` terminator was read.
    #[error("record stream truncated (terminator not found)")]
    Truncated,

    /// An array entry declared a negative element count.
    #[error("invalid array length {0}")]
    InvalidArrayLength(i16),

    /// A name or string payload was not valid UTF-8.
    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    /// A name or string value does not fit the 2-byte length prefix.
    #[error("string too long ({len} bytes, max {max})", max = crate::codec::MAX_STRING_LEN)]
    StringTooLong { len: usize },

    /// An array value does not fit the signed 2-byte element count.
    #[error("array too long ({len} elements, max {max})", max = crate::codec::MAX_ARRAY_LEN)]
    ArrayTooLong { len: usize },

    /// The record exceeds the configured maximum size.
    #[error("record too large ({size} bytes, max {max})")]
    RecordTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing records.
    #[error("record I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecordError {
    /// True for errors caused by malformed input bytes rather than the transport.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            RecordError::InvalidTag(_)
                | RecordError::Truncated
                | RecordError::InvalidArrayLength(_)
                | RecordError::InvalidUtf8
        )
    }
}

pub type Result<T> = std::result::Result<T, RecordError>;
