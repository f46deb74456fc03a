//! Schemas constrain which tag type backs which key of a compound.
//!
//! Binding a schema to a compound saves callers from sprinkling manual
//! conversions over recurring structures: assignments are coerced to the
//! expected tag type as they happen. A strict schema additionally rejects
//! keys it does not define.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::{Compound, Tag, Value};

/// The expected shape of one schema key.
#[derive(Debug, Clone)]
pub enum SchemaType {
    /// Coerce assignments to this tag type.
    Tag(Tag),
    /// The key holds a compound validated by a nested schema.
    Compound(Schema),
}

/// A mapping from keys to expected tag types.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: HashMap<String, SchemaType>,
    strict: bool,
}

impl Schema {
    pub fn new() -> Self {
        Schema::default()
    }

    /// Expect `key` to hold a tag of type `tag`.
    pub fn field(mut self, key: impl Into<String>, tag: Tag) -> Self {
        self.fields.insert(key.into(), SchemaType::Tag(tag));
        self
    }

    /// Expect `key` to hold a compound following `schema`.
    pub fn nested(mut self, key: impl Into<String>, schema: Schema) -> Self {
        self.fields.insert(key.into(), SchemaType::Compound(schema));
        self
    }

    /// Reject keys the schema does not define.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Bind the schema to an existing compound, coercing every entry it
    /// already holds.
    pub fn bind(&self, compound: Compound) -> Result<SchemaCompound<'_>> {
        let mut bound = SchemaCompound {
            schema: self,
            inner: Compound::new(),
        };
        for (key, value) in compound {
            bound.insert(key, value)?;
        }
        Ok(bound)
    }

    fn coerce(&self, key: &str, value: Value) -> Result<Value> {
        match self.fields.get(key) {
            Some(SchemaType::Tag(tag)) => value.coerce(*tag),
            Some(SchemaType::Compound(schema)) => match value {
                Value::Compound(compound) => {
                    Ok(Value::Compound(schema.bind(compound)?.into_inner()))
                }
                other => Err(Error::cast(other.tag(), Tag::Compound)),
            },
            None if self.strict => Err(Error::unknown_key(key)),
            None => Ok(value),
        }
    }
}

/// A compound whose mutations are validated against a [`Schema`].
#[derive(Debug, Clone)]
pub struct SchemaCompound<'s> {
    schema: &'s Schema,
    inner: Compound,
}

impl<'s> SchemaCompound<'s> {
    /// Insert a value, coercing it to the type the schema expects for the
    /// key. Unknown keys pass through unless the schema is strict.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<Option<Value>> {
        let key = key.into();
        let value = self.schema.coerce(&key, value)?;
        Ok(self.inner.insert(key, value))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    pub fn as_compound(&self) -> &Compound {
        &self.inner
    }

    pub fn into_inner(self) -> Compound {
        self.inner
    }
}
