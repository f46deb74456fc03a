//! Materializing turns scanner descriptors into owned [`Value`] trees.
//!
//! Unpacking walks the pre-ordered index, so a whole subtree can be
//! produced from any descriptor, not just the root. Materialized trees own
//! their storage and are independent of the scanned buffer.

use std::convert::TryFrom;

use crate::error::{Error, Result};
use crate::scan::{header_extra, Index, TagDesc};
use crate::{Compound, List, Tag, Value};

impl<'a> Index<'a> {
    /// Unpack the root tag, returning its name alongside the tree.
    pub fn unpack_root(&self) -> Result<(String, Value)> {
        if self.is_empty() {
            return Err(Error::unexpected_eof());
        }
        let name = self
            .name(0)
            .ok_or_else(Error::unexpected_eof)?
            .into_owned();
        Ok((name, self.unpack(0)?))
    }

    /// Unpack the subtree rooted at descriptor `i`.
    ///
    /// Unpacking any descriptor of a successfully scanned index yields the
    /// same tree a full materialization would contain at that position.
    pub fn unpack(&self, i: usize) -> Result<Value> {
        if i >= self.len() {
            return Err(Error::bespoke(format!(
                "tag index {} out of range for {} scanned tags",
                i,
                self.len()
            )));
        }
        let mut cursor = i;
        self.unpack_at(&mut cursor)
    }

    fn unpack_at(&self, cursor: &mut usize) -> Result<Value> {
        let desc = *self
            .descs()
            .get(*cursor)
            .ok_or_else(Error::unexpected_eof)?;
        *cursor += 1;

        let at = desc.payload as usize;
        let order = self.order();

        Ok(match desc.tag {
            1 => Value::Byte(self.slice(at, 1)?[0] as i8),
            2 => Value::Short(order.read_i16(self.slice(at, 2)?)),
            3 => Value::Int(order.read_i32(self.slice(at, 4)?)),
            4 => Value::Long(order.read_i64(self.slice(at, 8)?)),
            5 => Value::Float(order.read_f32(self.slice(at, 4)?)),
            6 => Value::Double(order.read_f64(self.slice(at, 8)?)),
            7 => {
                let raw = self.slice(at, desc.children as usize)?;
                Value::ByteArray(raw.iter().map(|&b| b as i8).collect())
            }
            8 => {
                let raw = self.slice(at, desc.children as usize)?;
                Value::String(crate::mutf8::decode(raw).into_owned())
            }
            11 => {
                let n = desc.children as usize;
                let raw = self.slice(at, n * 4)?;
                Value::IntArray((0..n).map(|k| order.read_i32(&raw[k * 4..])).collect())
            }
            12 => {
                let n = desc.children as usize;
                let raw = self.slice(at, n * 8)?;
                Value::LongArray((0..n).map(|k| order.read_i64(&raw[k * 8..])).collect())
            }
            9 => Value::List(self.unpack_list(&desc, cursor)?),
            10 => {
                let end = *cursor + desc.children as usize;
                let mut compound = Compound::new();
                while *cursor < end {
                    let name = self
                        .name(*cursor)
                        .ok_or_else(Error::unexpected_eof)?
                        .into_owned();
                    let child = self.unpack_at(cursor)?;
                    compound.insert(name, child);
                }
                Value::Compound(compound)
            }
            other => return Err(Error::invalid_tag(other)),
        })
    }

    fn unpack_list(&self, desc: &TagDesc, cursor: &mut usize) -> Result<List> {
        // The element type byte sits at the start of the list header,
        // right before the length field and the recorded payload.
        let at = desc.payload as usize;
        let subtype_byte = self.slice(at - header_extra(desc.tag), 1)?[0];
        let subtype = Tag::try_from(subtype_byte).map_err(|_| Error::invalid_tag(subtype_byte))?;
        let order = self.order();

        if subtype == Tag::End {
            return Ok(List::new());
        }

        let mut list = List::with_tag(subtype);

        if subtype.is_numeric() {
            // Elements of numeric lists have no descriptors of their own;
            // they decode straight out of the recorded payload.
            let size = subtype.payload_size();
            let n = desc.children as usize;
            let raw = self.slice(at, n * size)?;
            for k in 0..n {
                let elem = &raw[k * size..];
                let value = match subtype {
                    Tag::Byte => Value::Byte(elem[0] as i8),
                    Tag::Short => Value::Short(order.read_i16(elem)),
                    Tag::Int => Value::Int(order.read_i32(elem)),
                    Tag::Long => Value::Long(order.read_i64(elem)),
                    Tag::Float => Value::Float(order.read_f32(elem)),
                    _ => Value::Double(order.read_f64(elem)),
                };
                list.try_push(value)?;
            }
        } else {
            // `children` counts every descendant. Each pass of the loop
            // consumes one direct child together with its own subtree, so
            // the loop ends exactly at the list's next sibling.
            let end = *cursor + desc.children as usize;
            while *cursor < end {
                let child = self.unpack_at(cursor)?;
                list.try_push(child)?;
            }
        }

        Ok(list)
    }
}
