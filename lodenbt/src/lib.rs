//! lodenbt reads, edits and writes NBT data, the binary format used by
//! *Minecraft: Java Edition* for world data, player inventories and
//! structure files.
//!
//! The crate is built around a two-phase decoder:
//!
//! * [`scan`][`scan::scan`] runs a stack machine over a byte buffer and
//!   produces a flat, pre-ordered [`Index`][`scan::Index`] of tag
//!   descriptors without materializing any values. Nesting depth is bounded
//!   by a caller-supplied stack, so adversarial input cannot blow the call
//!   stack.
//! * [`Index::unpack`][`scan::Index::unpack`] turns descriptors into owned
//!   [`Value`] trees on demand, or all at once via
//!   [`Index::unpack_root`][`scan::Index::unpack_root`].
//!
//! Writing goes through [`write::write_named`], and whole files through
//! [`NbtFile`][`file::NbtFile`], which handles gzip/zlib framing and both
//! byte orders.
//!
//! ```no_run
//! use lodenbt::file::NbtFile;
//!
//! fn main() -> lodenbt::error::Result<()> {
//!     let file = NbtFile::load("level.dat")?;
//!     println!("root name: {:?}", file.root_name());
//!     file.save()?;
//!     Ok(())
//! }
//! ```
//!
//! The textual form of the same data model lives in the sibling `lodesnbt`
//! crate.

pub mod error;
pub mod file;
pub mod scan;
pub mod schema;
pub mod write;

mod compound;
mod list;
mod mutf8;
mod order;
mod tag;
mod unpack;
mod value;

pub use compound::Compound;
pub use list::List;
pub use order::Endian;
pub use tag::Tag;
pub use value::Value;

#[cfg(test)]
mod test;
