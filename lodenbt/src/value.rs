use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::{Error, Result};
use crate::{Compound, List, Tag};

/// A complete NBT value. It owns its data.
///
/// Unlike a `serde_json`-style value this distinguishes Lists of numeric
/// tags from the dense Array tags, since the binary format does.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Value {
    /// The tag id of this value.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Byte(_) => Tag::Byte,
            Value::Short(_) => Tag::Short,
            Value::Int(_) => Tag::Int,
            Value::Long(_) => Tag::Long,
            Value::Float(_) => Tag::Float,
            Value::Double(_) => Tag::Double,
            Value::ByteArray(_) => Tag::ByteArray,
            Value::String(_) => Tag::String,
            Value::List(_) => Tag::List,
            Value::Compound(_) => Tag::Compound,
            Value::IntArray(_) => Tag::IntArray,
            Value::LongArray(_) => Tag::LongArray,
        }
    }

    /// The integer value of any of the integral tags, widened to i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(*v as i64),
            Value::Short(v) => Some(*v as i64),
            Value::Int(v) => Some(*v as i64),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// The value of either floating point tag, widened to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Value::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Value::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// Whether this value satisfies a compound filter.
    ///
    /// A compound matches a filter when every key of the filter is present
    /// with a matching value. Compound values in the filter are themselves
    /// treated as filters, lists match pairwise in order, everything else
    /// must be tag-equal: `Byte(1)` does not match `Int(1)`.
    pub fn matches(&self, filter: &Value) -> bool {
        match (self, filter) {
            (Value::Compound(c), Value::Compound(f)) => f
                .iter()
                .all(|(key, want)| c.get(key).map_or(false, |have| have.matches(want))),
            (Value::List(l), Value::List(f)) => {
                l.len() == f.len() && l.iter().zip(f.iter()).all(|(a, b)| a.matches(b))
            }
            _ => self == filter,
        }
    }

    /// Coerce this value to the given tag type using constructor
    /// semantics: integer casts mask to the target width, float/integer
    /// conversions truncate, and lists of a matching numeric type convert
    /// to arrays (and back). Anything else fails with a cast error.
    pub fn coerce(self, target: Tag) -> Result<Value> {
        let found = self.tag();
        if found == target {
            return Ok(self);
        }

        let cast_err = || Error::cast(found, target);

        match target {
            Tag::Byte | Tag::Short | Tag::Int | Tag::Long => {
                let wide = match self {
                    Value::Float(v) => v as i64,
                    Value::Double(v) => v as i64,
                    ref other => other.as_i64().ok_or_else(cast_err)?,
                };
                Ok(match target {
                    Tag::Byte => Value::Byte(wide as i8),
                    Tag::Short => Value::Short(wide as i16),
                    Tag::Int => Value::Int(wide as i32),
                    _ => Value::Long(wide),
                })
            }
            Tag::Float | Tag::Double => {
                let wide = self
                    .as_f64()
                    .or_else(|| self.as_i64().map(|v| v as f64))
                    .ok_or_else(cast_err)?;
                Ok(match target {
                    Tag::Float => Value::Float(wide as f32),
                    _ => Value::Double(wide),
                })
            }
            Tag::ByteArray => match self {
                Value::List(list) if list.element_tag() == Tag::Byte => Ok(Value::ByteArray(
                    list.iter()
                        .map(|v| match v {
                            Value::Byte(b) => *b,
                            _ => 0,
                        })
                        .collect(),
                )),
                Value::List(list) if list.is_empty() => Ok(Value::ByteArray(Vec::new())),
                _ => Err(cast_err()),
            },
            Tag::IntArray => match self {
                Value::List(list) if list.element_tag() == Tag::Int => Ok(Value::IntArray(
                    list.iter()
                        .map(|v| match v {
                            Value::Int(i) => *i,
                            _ => 0,
                        })
                        .collect(),
                )),
                Value::List(list) if list.is_empty() => Ok(Value::IntArray(Vec::new())),
                _ => Err(cast_err()),
            },
            Tag::LongArray => match self {
                Value::List(list) if list.element_tag() == Tag::Long => Ok(Value::LongArray(
                    list.iter()
                        .map(|v| match v {
                            Value::Long(l) => *l,
                            _ => 0,
                        })
                        .collect(),
                )),
                Value::List(list) if list.is_empty() => Ok(Value::LongArray(Vec::new())),
                _ => Err(cast_err()),
            },
            Tag::List => match self {
                Value::ByteArray(arr) => Ok(Value::List(
                    List::from_values(arr.into_iter().map(Value::Byte))?,
                )),
                Value::IntArray(arr) => Ok(Value::List(
                    List::from_values(arr.into_iter().map(Value::Int))?,
                )),
                Value::LongArray(arr) => Ok(Value::List(
                    List::from_values(arr.into_iter().map(Value::Long))?,
                )),
                _ => Err(cast_err()),
            },
            _ => Err(cast_err()),
        }
    }
}

/// The JSON projection of a value.
///
/// Numeric tags become plain numbers, arrays and lists become sequences
/// and compounds become maps in insertion order, so serializing through
/// `serde_json` yields the natural JSON form of the data. Tag type
/// information is lost in this direction, and Long and LongArray values
/// beyond 2^53 lose precision in consumers that read JSON numbers as
/// doubles.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Byte(v) => serializer.serialize_i8(*v),
            Value::Short(v) => serializer.serialize_i16(*v),
            Value::Int(v) => serializer.serialize_i32(*v),
            Value::Long(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f32(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::String(v) => serializer.serialize_str(v),
            Value::ByteArray(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::IntArray(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::LongArray(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::List(list) => {
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for v in list {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::Compound(compound) => {
                let mut map = serializer.serialize_map(Some(compound.len()))?;
                for (k, v) in compound.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
