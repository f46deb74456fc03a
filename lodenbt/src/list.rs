use crate::error::{Error, Result};
use crate::{Tag, Value};

/// An ordered sequence of identically-typed, unnamed tags.
///
/// The binary format declares a single element type up front, so pushing a
/// value of a different type is an error rather than a silent widening. An
/// empty list declares the element type [`Tag::End`]; the first push
/// settles the type.
#[derive(Debug, Clone)]
pub struct List {
    tag: Tag,
    items: Vec<Value>,
}

impl Default for List {
    fn default() -> Self {
        List::new()
    }
}

impl List {
    pub fn new() -> Self {
        List {
            tag: Tag::End,
            items: Vec::new(),
        }
    }

    /// An empty list with a declared element type.
    pub fn with_tag(tag: Tag) -> Self {
        List {
            tag,
            items: Vec::new(),
        }
    }

    /// Build a list from values, inferring the element type from the first
    /// one. Fails with an incompatible-item error on the first mismatch.
    pub fn from_values<I: IntoIterator<Item = Value>>(values: I) -> Result<Self> {
        let mut list = List::new();
        for value in values {
            list.try_push(value)?;
        }
        Ok(list)
    }

    /// The declared element type. [`Tag::End`] for lists that are still
    /// empty.
    pub fn element_tag(&self) -> Tag {
        self.tag
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    /// Append a value, settling the element type if the list was empty.
    pub fn try_push(&mut self, value: Value) -> Result<()> {
        if self.tag == Tag::End {
            self.tag = value.tag();
        } else if value.tag() != self.tag {
            return Err(Error::incompatible_item(self.tag, value.tag()));
        }
        self.items.push(value);
        Ok(())
    }

    /// Replace the element at `index`. The replacement must match the
    /// element type.
    pub fn try_set(&mut self, index: usize, value: Value) -> Result<()> {
        if value.tag() != self.tag {
            return Err(Error::incompatible_item(self.tag, value.tag()));
        }
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::bespoke(format!(
                "list index {} out of range for length {}",
                index,
                self.items.len()
            ))),
        }
    }

    /// Remove and return the element at `index`, shifting later elements.
    pub fn remove(&mut self, index: usize) -> Value {
        self.items.remove(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Value> {
        self.items.iter_mut()
    }
}

// Lists compare by their elements alone. The declared element type of an
// empty list is a wire-level detail: an empty list read back from disk
// reports End regardless of what it was written with.
impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl IntoIterator for List {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
