//! The file container associates a root compound with its framing: the
//! compression in use, the byte order, and the outer name, which is
//! commonly empty but preserved on round-trip.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression as Flate;
use log::debug;

use crate::error::{Error, Result};
use crate::scan::{scan, Index};
use crate::write::write_named;
use crate::{Compound, Endian, Tag, Value};

/// Stack slots handed to the scanner when loading a file. Worth about a
/// thousand levels of nesting, far beyond anything the game produces.
const SCAN_STACK_SLOTS: usize = 4096;

/// Compression framing of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Zlib,
}

impl Compression {
    /// Sniff the framing from the first bytes of a file. Gzip is detected
    /// by its magic number, zlib by its header byte; anything else is
    /// taken as raw NBT.
    pub fn detect(data: &[u8]) -> Compression {
        match data {
            [0x1f, 0x8b, ..] => Compression::Gzip,
            [0x78, ..] => Compression::Zlib,
            _ => Compression::None,
        }
    }
}

/// A compound nbt file.
///
/// ```no_run
/// use lodenbt::file::NbtFile;
/// use lodenbt::Value;
///
/// # fn main() -> lodenbt::error::Result<()> {
/// let mut file = NbtFile::load("hello_world.nbt")?;
/// file.root_mut().insert("counter", Value::Int(1));
/// file.save()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NbtFile {
    root: Compound,
    root_name: String,
    compression: Compression,
    order: Endian,
    path: Option<PathBuf>,
}

impl NbtFile {
    /// A new uncompressed, big-endian file with an empty outer name.
    pub fn new(root: Compound) -> Self {
        NbtFile {
            root,
            root_name: String::new(),
            compression: Compression::None,
            order: Endian::Big,
            path: None,
        }
    }

    pub fn root(&self) -> &Compound {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Compound {
        &mut self.root
    }

    pub fn into_root(self) -> Compound {
        self.root
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    pub fn set_root_name(&mut self, name: impl Into<String>) {
        self.root_name = name.into();
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn set_compression(&mut self, compression: Compression) {
        self.compression = compression;
    }

    pub fn order(&self) -> Endian {
        self.order
    }

    pub fn set_order(&mut self, order: Endian) {
        self.order = order;
    }

    /// Load a file, sniffing the compression and trying both byte orders.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(path, None, None)
    }

    /// Load a file with explicit framing. `None` means sniff the
    /// compression from the magic number, or try big-endian first and
    /// retry little-endian.
    pub fn load_with(
        path: impl AsRef<Path>,
        compression: Option<Compression>,
        order: Option<Endian>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let mut file = Self::from_bytes(&data, compression, order)?;
        file.path = Some(path.to_owned());
        Ok(file)
    }

    /// Parse a file image held in memory. See [`NbtFile::load_with`] for
    /// the meaning of the `None` arguments.
    pub fn from_bytes(
        data: &[u8],
        compression: Option<Compression>,
        order: Option<Endian>,
    ) -> Result<Self> {
        let compression = compression.unwrap_or_else(|| {
            let detected = Compression::detect(data);
            debug!("detected {:?} framing", detected);
            detected
        });

        let payload;
        let nbt: &[u8] = match compression {
            Compression::None => data,
            Compression::Gzip => {
                let mut decoder = GzDecoder::new(data);
                let mut buf = Vec::new();
                decoder.read_to_end(&mut buf)?;
                payload = buf;
                &payload
            }
            Compression::Zlib => {
                let mut decoder = ZlibDecoder::new(data);
                let mut buf = Vec::new();
                decoder.read_to_end(&mut buf)?;
                payload = buf;
                &payload
            }
        };

        let (index, order) = scan_with_order(nbt, order)?;

        let root_desc = index.desc(0).ok_or_else(Error::unexpected_eof)?;
        if root_desc.tag != Tag::Compound as u8 {
            let found = Tag::try_from(root_desc.tag).map_err(|_| Error::invalid_tag(root_desc.tag))?;
            return Err(Error::no_root_compound(found));
        }

        let (root_name, root) = index.unpack_root()?;
        let root = match root {
            Value::Compound(c) => c,
            // unreachable in practice, the descriptor was checked above
            other => return Err(Error::no_root_compound(other.tag())),
        };

        Ok(NbtFile {
            root,
            root_name,
            compression,
            order,
            path: None,
        })
    }

    /// Serialize the file, including its compression framing.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut nbt = Vec::new();
        write_named(
            &mut nbt,
            &self.root_name,
            &Value::Compound(self.root.clone()),
            self.order,
        )?;

        Ok(match self.compression {
            Compression::None => nbt,
            Compression::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Flate::default());
                encoder.write_all(&nbt)?;
                encoder.finish()?
            }
            Compression::Zlib => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Flate::default());
                encoder.write_all(&nbt)?;
                encoder.finish()?
            }
        })
    }

    /// Write the file back to the location it was loaded from.
    pub fn save(&self) -> Result<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| Error::bespoke("no filename specified"))?;
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Write the file to the given location, which also becomes the
    /// target of later [`save`][`NbtFile::save`] calls.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_bytes()?)?;
        self.path = Some(path.to_owned());
        Ok(())
    }

    /// Load a file, apply `f` to it, and write it back only if `f`
    /// succeeds. On an error path the file on disk is untouched.
    pub fn edit<F>(path: impl AsRef<Path>, f: F) -> Result<()>
    where
        F: FnOnce(&mut NbtFile) -> Result<()>,
    {
        let path = path.as_ref();
        let mut file = Self::load(path)?;
        f(&mut file)?;
        file.save_as(path)
    }
}

/// Scan with a declared order, or try big-endian and fall back to
/// little-endian. The retry only happens for errors a wrong byte order
/// can cause: a bad tag id or running off the end of the buffer.
fn scan_with_order(nbt: &[u8], order: Option<Endian>) -> Result<(Index<'_>, Endian)> {
    let mut stack = vec![0u32; SCAN_STACK_SLOTS];

    match order {
        Some(order) => Ok((scan(nbt, &mut stack, order)?, order)),
        None => match scan(nbt, &mut stack, Endian::Big) {
            Ok(index) => Ok((index, Endian::Big)),
            Err(e) if e.is_order_sensitive() => {
                debug!("big-endian scan failed ({}), retrying little-endian", e);
                Ok((scan(nbt, &mut stack, Endian::Little)?, Endian::Little))
            }
            Err(e) => Err(e.into()),
        },
    }
}
