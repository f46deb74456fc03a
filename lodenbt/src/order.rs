use std::io::Write;

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};

use crate::error::Result;

/// Byte order of multibyte values in a binary NBT buffer.
///
/// Java Edition files are big-endian, Bedrock Edition files are
/// little-endian. The order is chosen per file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

impl Default for Endian {
    fn default() -> Self {
        Endian::Big
    }
}

impl Endian {
    /// Whether decoded multibyte values are already in host order.
    pub fn is_native(self) -> bool {
        match self {
            Endian::Big => cfg!(target_endian = "big"),
            Endian::Little => cfg!(target_endian = "little"),
        }
    }

    /// The opposite byte order, used when retrying a scan on an unmarked
    /// file.
    pub fn flipped(self) -> Self {
        match self {
            Endian::Big => Endian::Little,
            Endian::Little => Endian::Big,
        }
    }

    pub(crate) fn read_u16(self, buf: &[u8]) -> u16 {
        match self {
            Endian::Big => BigEndian::read_u16(buf),
            Endian::Little => LittleEndian::read_u16(buf),
        }
    }

    pub(crate) fn read_i16(self, buf: &[u8]) -> i16 {
        match self {
            Endian::Big => BigEndian::read_i16(buf),
            Endian::Little => LittleEndian::read_i16(buf),
        }
    }

    pub(crate) fn read_u32(self, buf: &[u8]) -> u32 {
        match self {
            Endian::Big => BigEndian::read_u32(buf),
            Endian::Little => LittleEndian::read_u32(buf),
        }
    }

    pub(crate) fn read_i32(self, buf: &[u8]) -> i32 {
        match self {
            Endian::Big => BigEndian::read_i32(buf),
            Endian::Little => LittleEndian::read_i32(buf),
        }
    }

    pub(crate) fn read_i64(self, buf: &[u8]) -> i64 {
        match self {
            Endian::Big => BigEndian::read_i64(buf),
            Endian::Little => LittleEndian::read_i64(buf),
        }
    }

    pub(crate) fn read_f32(self, buf: &[u8]) -> f32 {
        match self {
            Endian::Big => BigEndian::read_f32(buf),
            Endian::Little => LittleEndian::read_f32(buf),
        }
    }

    pub(crate) fn read_f64(self, buf: &[u8]) -> f64 {
        match self {
            Endian::Big => BigEndian::read_f64(buf),
            Endian::Little => LittleEndian::read_f64(buf),
        }
    }

    pub(crate) fn write_u16<W: Write>(self, w: &mut W, v: u16) -> Result<()> {
        match self {
            Endian::Big => w.write_u16::<BigEndian>(v)?,
            Endian::Little => w.write_u16::<LittleEndian>(v)?,
        }
        Ok(())
    }

    pub(crate) fn write_i16<W: Write>(self, w: &mut W, v: i16) -> Result<()> {
        match self {
            Endian::Big => w.write_i16::<BigEndian>(v)?,
            Endian::Little => w.write_i16::<LittleEndian>(v)?,
        }
        Ok(())
    }

    pub(crate) fn write_i32<W: Write>(self, w: &mut W, v: i32) -> Result<()> {
        match self {
            Endian::Big => w.write_i32::<BigEndian>(v)?,
            Endian::Little => w.write_i32::<LittleEndian>(v)?,
        }
        Ok(())
    }

    pub(crate) fn write_i64<W: Write>(self, w: &mut W, v: i64) -> Result<()> {
        match self {
            Endian::Big => w.write_i64::<BigEndian>(v)?,
            Endian::Little => w.write_i64::<LittleEndian>(v)?,
        }
        Ok(())
    }

    pub(crate) fn write_f32<W: Write>(self, w: &mut W, v: f32) -> Result<()> {
        match self {
            Endian::Big => w.write_f32::<BigEndian>(v)?,
            Endian::Little => w.write_f32::<LittleEndian>(v)?,
        }
        Ok(())
    }

    pub(crate) fn write_f64<W: Write>(self, w: &mut W, v: f64) -> Result<()> {
        match self {
            Endian::Big => w.write_f64::<BigEndian>(v)?,
            Endian::Little => w.write_f64::<LittleEndian>(v)?,
        }
        Ok(())
    }
}
