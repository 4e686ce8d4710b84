//! Type tags.
//!
//! Tags 0-9 are scalar kinds and 10-19 are the matching array kinds
//! (`array = scalar + 10`). Tags 4-9 and 14-19 are reserved for future kinds.
//! `0xFF` terminates a record.

/// End-of-record marker (`-1` as a signed byte).
pub const TERMINATOR: u8 = 0xFF;

/// Offset between a scalar tag and its array tag.
pub const ARRAY_OFFSET: u8 = 10;

/// The eight value kinds a record can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Tag {
    Boolean = 0,
    Integer = 1,
    Double = 2,
    String = 3,
    BooleanArray = 10,
    IntegerArray = 11,
    DoubleArray = 12,
    StringArray = 13,
}

impl Tag {
    /// All tags in wire emission order.
    pub const ALL: [Tag; 8] = [
        Tag::Boolean,
        Tag::Integer,
        Tag::Double,
        Tag::String,
        Tag::BooleanArray,
        Tag::IntegerArray,
        Tag::DoubleArray,
        Tag::StringArray,
    ];

    /// Parse a tag byte. Returns `None` for the terminator, reserved and unknown values.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Tag::Boolean),
            1 => Some(Tag::Integer),
            2 => Some(Tag::Double),
            3 => Some(Tag::String),
            10 => Some(Tag::BooleanArray),
            11 => Some(Tag::IntegerArray),
            12 => Some(Tag::DoubleArray),
            13 => Some(Tag::StringArray),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn is_array(self) -> bool {
        self.as_byte() >= ARRAY_OFFSET
    }

    /// The scalar kind of this tag (identity for scalar tags).
    pub fn element(self) -> Tag {
        match self {
            Tag::BooleanArray => Tag::Boolean,
            Tag::IntegerArray => Tag::Integer,
            Tag::DoubleArray => Tag::Double,
            Tag::StringArray => Tag::String,
            scalar => scalar,
        }
    }

    /// Human-readable name used by tooling output.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Boolean => "boolean",
            Tag::Integer => "integer",
            Tag::Double => "double",
            Tag::String => "string",
            Tag::BooleanArray => "boolean[]",
            Tag::IntegerArray => "integer[]",
            Tag::DoubleArray => "double[]",
            Tag::StringArray => "string[]",
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns true if the byte falls in a range held back for future kinds.
pub fn is_reserved(byte: u8) -> bool {
    matches!(byte, 4..=9 | 14..=19)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_roundtrip_through_bytes() {
        for tag in Tag::ALL {
            assert_eq!(Tag::from_byte(tag.as_byte()), Some(tag));
        }
    }

    #[test]
    fn reserved_and_terminator_are_not_tags() {
        for byte in (4..=9).chain(14..=19) {
            assert!(is_reserved(byte));
            assert_eq!(Tag::from_byte(byte), None);
        }
        assert_eq!(Tag::from_byte(TERMINATOR), None);
        assert!(!is_reserved(TERMINATOR));
    }

    #[test]
    fn array_tags_map_to_their_element() {
        assert!(Tag::StringArray.is_array());
        assert!(!Tag::String.is_array());
        assert_eq!(Tag::IntegerArray.element(), Tag::Integer);
        assert_eq!(Tag::Double.element(), Tag::Double);
        assert_eq!(
            Tag::BooleanArray.as_byte(),
            Tag::Boolean.as_byte() + ARRAY_OFFSET
        );
    }
}
