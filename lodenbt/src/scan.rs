//! Scanning turns a byte buffer into a flat index of tag descriptors
//! without materializing any values, so the higher-level API can unpack
//! tags lazily.
//!
//! The scanner is an explicit stack machine rather than recursive descent:
//! the caller supplies the stack memory, which bounds the maximum nesting
//! allowed, and the descriptors land pre-ordered in one contiguous vector.
//! That layout is cache-friendly and lets a reader skip a whole subtree,
//! since the next sibling of the tag at index `i` lives at
//! `i + children + 1`.

use std::borrow::Cow;
use std::fmt;

use crate::error::{Error, Result};
use crate::{mutf8, Endian, Tag};

// Operations are represented by tag id values, to signify that a tag of a
// specific type should be emitted, with additional op values in a disjoint
// range for handling tag names and collecting nested tags. The ops for
// extending list and compound tags carry extra arguments, pushed just
// below the op itself.
const OP_SET_NAME: u32 = 1 << 8;
const OP_EXTEND_LIST: u32 = 2 << 8;
const OP_EXTEND_COMPOUND: u32 = 3 << 8;

const TAG_END: u32 = 0;
const TAG_DOUBLE: u32 = 6;
const TAG_BYTE_ARRAY: u32 = 7;
const TAG_STRING: u32 = 8;
const TAG_LIST: u32 = 9;
const TAG_COMPOUND: u32 = 10;
const TAG_INT_ARRAY: u32 = 11;
const TAG_LONG_ARRAY: u32 = 12;

/// Payload sizes of the fixed-size tags, indexed by tag id. Index 0 covers
/// the End sentinel, which has no payload.
const NUMERIC_SIZES: [usize; 13] = [0, 1, 2, 4, 8, 4, 8, 1, 0, 0, 0, 4, 8];

/// One entry in the scanner's flat pre-order index.
///
/// The meaning of `children` depends on the tag type. Compound tags and
/// lists of dynamically-sized tags store the total number of nested tags,
/// immediate and recursive, which doubles as the offset to the tag's next
/// sibling. Lists of numeric tags, strings and arrays store their element
/// count. The field is unused for numeric scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagDesc {
    /// Byte offset of the tag's payload in the scanned buffer.
    pub payload: u32,
    pub children: u32,
    /// Length of the tag's name in bytes, 0 for unnamed tags.
    pub name_len: u16,
    /// One of the twelve tag ids.
    pub tag: u8,
}

/// Errors produced by [`scan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// A read would run past the end of the buffer.
    UnexpectedEof,
    /// The buffer contained an invalid tag id, possibly because it is
    /// being read with the wrong byte order.
    InvalidType(u32),
    /// The caller-supplied stack was exhausted.
    DepthExceeded,
    /// The tag index could not be grown.
    OutOfMemory,
}

impl ScanError {
    /// Whether retrying the scan with the opposite byte order makes sense.
    /// Exhausting the stack or the allocator is not a byte-order symptom.
    pub fn is_order_sensitive(self) -> bool {
        matches!(self, ScanError::UnexpectedEof | ScanError::InvalidType(_))
    }
}

impl std::error::Error for ScanError {}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::UnexpectedEof => f.write_str("eof: unexpectedly ran out of input"),
            ScanError::InvalidType(t) => write!(f, "invalid nbt tag value: {}", t),
            ScanError::DepthExceeded => f.write_str("nbt input is too deeply nested"),
            ScanError::OutOfMemory => f.write_str("failed to grow the tag index"),
        }
    }
}

/// The tag index emitted by the scanner. Borrows the scanned buffer for
/// the lifetime of its payload offsets.
pub struct Index<'a> {
    pub(crate) buffer: &'a [u8],
    pub(crate) order: Endian,
    pub(crate) tags: Vec<TagDesc>,
}

impl<'a> Index<'a> {
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn desc(&self, i: usize) -> Option<&TagDesc> {
        self.tags.get(i)
    }

    pub fn descs(&self) -> &[TagDesc] {
        &self.tags
    }

    pub fn order(&self) -> Endian {
        self.order
    }

    /// Whether decoded multibyte values are already in host order.
    pub fn native(&self) -> bool {
        self.order.is_native()
    }

    /// The decoded name of the tag at index `i`. Unnamed tags, including
    /// list elements and a root written with an empty name, decode to the
    /// empty string.
    pub fn name(&self, i: usize) -> Option<Cow<'a, str>> {
        let desc = self.tags.get(i)?;
        let name_end = desc.payload as usize - header_extra(desc.tag);
        let start = name_end - desc.name_len as usize;
        Some(mutf8::decode(&self.buffer[start..name_end]))
    }
}

/// Bytes between the end of a tag's name and the start of its recorded
/// payload: the length prefix for strings and arrays, the element type
/// plus length for lists.
pub(crate) fn header_extra(tag: u8) -> usize {
    match tag as u32 {
        TAG_STRING => 2,
        TAG_BYTE_ARRAY | TAG_INT_ARRAY | TAG_LONG_ARRAY => 4,
        TAG_LIST => 5,
        _ => 0,
    }
}

/// The fixed-size op stack, backed by caller memory.
struct OpStack<'s> {
    slots: &'s mut [u32],
    len: usize,
}

impl OpStack<'_> {
    fn push(&mut self, op: u32) -> std::result::Result<(), ScanError> {
        if self.len == self.slots.len() {
            return Err(ScanError::DepthExceeded);
        }
        self.slots[self.len] = op;
        self.len += 1;
        Ok(())
    }

    fn pop(&mut self) -> Option<u32> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.slots[self.len])
    }

    /// Pop an argument that was pushed together with the op currently
    /// being handled. The push protocol guarantees it is present.
    fn pop_arg(&mut self) -> u32 {
        self.len -= 1;
        self.slots[self.len]
    }
}

fn need(buffer: &[u8], at: usize, n: usize) -> std::result::Result<(), ScanError> {
    if at + n > buffer.len() {
        Err(ScanError::UnexpectedEof)
    } else {
        Ok(())
    }
}

fn push_tag(tags: &mut Vec<TagDesc>, desc: TagDesc) -> std::result::Result<(), ScanError> {
    if tags.len() == tags.capacity() {
        let additional = if tags.capacity() == 0 {
            32
        } else {
            tags.capacity()
        };
        tags.try_reserve_exact(additional)
            .map_err(|_| ScanError::OutOfMemory)?;
    }
    tags.push(desc);
    Ok(())
}

/// Scan a buffer holding one named tag and produce its index.
///
/// `stack` is the working memory of the stack machine; its length bounds
/// the deepest nesting the scan will accept. A flat file needs only a
/// handful of slots, each level of list or compound nesting costs a few
/// more. Exceeding the budget fails with [`ScanError::DepthExceeded`]
/// instead of recursing.
///
/// On failure nothing is returned: the partially-built index is dropped.
pub fn scan<'a>(
    buffer: &'a [u8],
    stack: &mut [u32],
    order: Endian,
) -> std::result::Result<Index<'a>, ScanError> {
    // Payload offsets are stored as u32.
    if buffer.len() > u32::MAX as usize {
        return Err(ScanError::OutOfMemory);
    }

    let mut tags: Vec<TagDesc> = Vec::new();
    let mut ops = OpStack {
        slots: stack,
        len: 0,
    };

    // Running index for reading data from the buffer.
    let mut i: usize = 0;

    let mut current = TagDesc {
        payload: 0,
        children: 0,
        name_len: 0,
        tag: 0,
    };

    // Start by processing one standalone named tag.
    ops.push(OP_SET_NAME)?;

    while let Some(op) = ops.pop() {
        match op {
            // Numeric tags just record the payload and skip it.
            1..=TAG_DOUBLE => {
                current.payload = i as u32;
                current.children = 0;
                i += NUMERIC_SIZES[op as usize];
            }

            TAG_STRING => {
                need(buffer, i, 2)?;
                let len = order.read_u16(&buffer[i..i + 2]);

                current.payload = (i + 2) as u32;
                current.children = len as u32;

                i += 2 + len as usize;
            }

            // The length of arrays is supposed to be a signed 32-bit
            // integer, but because it can't be negative in practice it is
            // read as unsigned.
            TAG_BYTE_ARRAY | TAG_INT_ARRAY | TAG_LONG_ARRAY => {
                need(buffer, i, 4)?;
                let len = order.read_u32(&buffer[i..i + 4]);

                current.payload = (i + 4) as u32;
                current.children = len;

                i = (len as usize)
                    .checked_mul(NUMERIC_SIZES[op as usize])
                    .and_then(|total| total.checked_add(i + 4))
                    .ok_or(ScanError::UnexpectedEof)?;
            }

            TAG_LIST => {
                need(buffer, i, 5)?;
                let subtype = buffer[i] as u32;
                let len = order.read_u32(&buffer[i + 1..i + 5]);

                current.payload = (i + 5) as u32;

                if subtype == TAG_END {
                    // A list of End is taken as empty whatever its declared
                    // length claims; there are no payloads to skip.
                    current.children = 0;
                    i += 5;
                } else if subtype <= TAG_DOUBLE {
                    // Lists of numeric tags don't need nested descriptors:
                    // the subtype and length are enough to unpack any
                    // element, so the whole payload is skipped in one step.
                    current.children = len;
                    i = (len as usize)
                        .checked_mul(NUMERIC_SIZES[subtype as usize])
                        .and_then(|total| total.checked_add(i + 5))
                        .ok_or(ScanError::UnexpectedEof)?;
                } else {
                    current.children = 0;
                    i += 5;

                    ops.push(tags.len() as u32)?;
                    ops.push(subtype)?;
                    ops.push(len)?;
                    ops.push(OP_EXTEND_LIST)?;
                }
            }

            // Lists of dynamically sized tags are assembled with repeated
            // extend ops. Below the op the stack holds the remaining
            // element count, the element type, and the index of the list's
            // own descriptor.
            OP_EXTEND_LIST => {
                let remaining = ops.pop_arg();
                let subtype = ops.pop_arg();

                if remaining == 0 {
                    let parent = ops.pop_arg() as usize;
                    tags[parent].children = (tags.len() - parent - 1) as u32;
                } else {
                    // List elements have no name.
                    current.name_len = 0;

                    ops.push(subtype)?;
                    ops.push(remaining - 1)?;
                    ops.push(OP_EXTEND_LIST)?;
                    ops.push(subtype)?;
                }
                continue;
            }

            // The payload of a compound is formed by other tags, so the
            // extend op is pushed immediately.
            TAG_COMPOUND => {
                current.payload = i as u32;
                current.children = 0;

                ops.push(tags.len() as u32)?;
                ops.push(OP_EXTEND_COMPOUND)?;
            }

            OP_EXTEND_COMPOUND => {
                need(buffer, i, 1)?;

                if buffer[i] as u32 == TAG_END {
                    let parent = ops.pop_arg() as usize;
                    tags[parent].children = (tags.len() - parent - 1) as u32;
                    i += 1;
                } else {
                    ops.push(OP_EXTEND_COMPOUND)?;
                    ops.push(OP_SET_NAME)?;
                }
                continue;
            }

            // Extract the tag id and the name, then dispatch on the id by
            // pushing it.
            OP_SET_NAME => {
                need(buffer, i, 3)?;

                let tag_type = buffer[i] as u32;
                let name_len = order.read_u16(&buffer[i + 1..i + 3]);

                current.name_len = name_len;
                i += 3 + name_len as usize;

                ops.push(tag_type)?;
                continue;
            }

            // Not a tag id and not an op: the buffer contained an invalid
            // tag id that was pushed onto the stack.
            other => return Err(ScanError::InvalidType(other)),
        }

        // Every arm that didn't `continue` produced a concrete tag. Make
        // sure the skips above didn't run past the end of the buffer
        // before emitting it.
        if i > buffer.len() {
            return Err(ScanError::UnexpectedEof);
        }

        current.tag = op as u8;
        push_tag(&mut tags, current)?;
    }

    Ok(Index {
        buffer,
        order,
        tags,
    })
}

impl fmt::Debug for Index<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Index")
            .field("tags", &self.tags.len())
            .field("order", &self.order)
            .finish()
    }
}

impl Index<'_> {
    /// Bounds-checked view into the scanned buffer.
    pub(crate) fn slice(&self, at: usize, n: usize) -> Result<&[u8]> {
        self.buffer
            .get(at..at + n)
            .ok_or_else(Error::unexpected_eof)
    }
}
