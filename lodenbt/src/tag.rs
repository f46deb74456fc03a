use std::convert::TryFrom;
use std::fmt;

/// An NBT tag id. This does not carry the value or the name of the data.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Tag {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64.
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents an array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other tags, all sharing one element type.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents an array of Int (i32).
    IntArray = 11,
    /// Represents an array of Long (i64).
    LongArray = 12,
}

// Crates exist to generate this code for us, but would add to our compile
// times, so we instead write it out manually, the tags will very rarely
// change so isn't a massive burden.
impl TryFrom<u8> for Tag {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use Tag::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as u8
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Tag {
    /// True for the fixed-size scalar tags Byte through Double.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Tag::Byte | Tag::Short | Tag::Int | Tag::Long | Tag::Float | Tag::Double
        )
    }

    /// Payload size in bytes for numeric tags, element size for arrays.
    /// End, String, List and Compound have no fixed size and return 0.
    pub(crate) fn payload_size(self) -> usize {
        match self {
            Tag::Byte | Tag::ByteArray => 1,
            Tag::Short => 2,
            Tag::Int | Tag::Float | Tag::IntArray => 4,
            Tag::Long | Tag::Double | Tag::LongArray => 8,
            _ => 0,
        }
    }
}
