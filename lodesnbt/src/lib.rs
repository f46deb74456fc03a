//! lodesnbt handles sNBT, the textual notation for NBT data that Minecraft
//! uses in commands. It round-trips the [`lodenbt::Value`] data model:
//!
//! * [`from_str`] parses a literal into a value tree, reporting errors
//!   with line and column positions.
//! * [`to_string`], [`to_string_compact`] and [`to_string_pretty`] emit
//!   the textual form back.
//! * [`Path`][`path::Path`] addresses sets of tags inside a tree with
//!   expressions like `foo[0].bar{id: 1}`.
//!
//! ```
//! use lodenbt::Value;
//!
//! # fn main() -> lodesnbt::error::Result<()> {
//! let tree = lodesnbt::from_str(r#"{count: 3b, name: "slime"}"#)?;
//! assert_eq!(
//!     tree.as_compound().unwrap().get("count"),
//!     Some(&Value::Byte(3)),
//! );
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod path;

mod parse;
mod scalar;
mod ser;

use error::Result;
use lodenbt::Value;

#[cfg(test)]
mod tests;

/// Parse a complete sNBT literal. Trailing input that is not whitespace is
/// an error.
pub fn from_str(input: &str) -> Result<Value> {
    parse::from_str(input)
}

/// Serialize with a single space after `:` and `,`.
pub fn to_string(value: &Value) -> String {
    ser::to_string(value, ser::Style::Default)
}

/// Serialize with no whitespace at all, the canonical form.
pub fn to_string_compact(value: &Value) -> String {
    ser::to_string(value, ser::Style::Compact)
}

/// Serialize with every compound, list and array entry on its own line,
/// nested entries indented by one more copy of `indent` per level.
pub fn to_string_pretty(value: &Value, indent: &str) -> String {
    ser::to_string(value, ser::Style::Pretty(indent))
}
