//! Serializing values back to binary NBT.
//!
//! The outer form of a file is one named tag: discriminator byte, length
//! prefixed name, payload. [`write_named`] emits that form; inside
//! compounds each entry repeats it, while list elements are bare payloads.

use std::convert::TryInto;
use std::io::Write;

use byteorder::WriteBytesExt;

use crate::error::{Error, Result};
use crate::{mutf8, Endian, Tag, Value};

pub(crate) trait WriteNbt: Write + Sized {
    fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.write_u8(tag as u8)?;
        Ok(())
    }

    fn write_size_prefixed_str(&mut self, s: &str, order: Endian) -> Result<()> {
        let encoded = mutf8::encode(s);
        let len: u16 = encoded
            .len()
            .try_into()
            .map_err(|_| Error::bespoke(format!("string of {} bytes is too long", encoded.len())))?;
        order.write_u16(self, len)?;
        self.write_all(&encoded)?;
        Ok(())
    }

    fn write_len(&mut self, len: usize, order: Endian) -> Result<()> {
        let len: i32 = len
            .try_into()
            .map_err(|_| Error::bespoke(format!("length {} does not fit a list header", len)))?;
        order.write_i32(self, len)?;
        Ok(())
    }
}

impl<T> WriteNbt for T where T: Write {}

/// Write one named tag: the form files and compound entries use.
pub fn write_named<W: Write>(
    writer: &mut W,
    name: &str,
    value: &Value,
    order: Endian,
) -> Result<()> {
    writer.write_tag(value.tag())?;
    writer.write_size_prefixed_str(name, order)?;
    write_payload(writer, value, order)
}

/// Write a tag's payload alone: the form list elements use.
pub fn write_payload<W: Write>(writer: &mut W, value: &Value, order: Endian) -> Result<()> {
    match value {
        Value::Byte(v) => writer.write_i8(*v)?,
        Value::Short(v) => order.write_i16(writer, *v)?,
        Value::Int(v) => order.write_i32(writer, *v)?,
        Value::Long(v) => order.write_i64(writer, *v)?,
        Value::Float(v) => order.write_f32(writer, *v)?,
        Value::Double(v) => order.write_f64(writer, *v)?,
        Value::String(s) => writer.write_size_prefixed_str(s, order)?,
        Value::ByteArray(arr) => {
            writer.write_len(arr.len(), order)?;
            for v in arr {
                writer.write_i8(*v)?;
            }
        }
        Value::IntArray(arr) => {
            writer.write_len(arr.len(), order)?;
            for v in arr {
                order.write_i32(writer, *v)?;
            }
        }
        Value::LongArray(arr) => {
            writer.write_len(arr.len(), order)?;
            for v in arr {
                order.write_i64(writer, *v)?;
            }
        }
        Value::List(list) => {
            writer.write_tag(list.element_tag())?;
            writer.write_len(list.len(), order)?;
            for v in list {
                write_payload(writer, v, order)?;
            }
        }
        Value::Compound(compound) => {
            for (key, v) in compound.iter() {
                write_named(writer, key, v, order)?;
            }
            // The End byte closes the compound body. It terminates the
            // outermost compound of a file as well, which readers require.
            writer.write_tag(Tag::End)?;
        }
    }
    Ok(())
}

/// Serialize a value as a named tag with an empty name, the usual form of
/// a file root.
pub fn to_bytes(value: &Value, order: Endian) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_named(&mut out, "", value, order)?;
    Ok(out)
}
