use crate::Value;

/// An insertion-ordered mapping from names to tags.
///
/// The binary format writes compound entries in sequence, and canonical
/// output must preserve that order, so entries are kept in the order they
/// were first inserted. Order is not significant for equality: two
/// compounds are equal when they hold the same name/value pairs.
///
/// Compounds in NBT files rarely exceed a few dozen entries, so lookups
/// walk the entry list directly.
#[derive(Debug, Clone, Default)]
pub struct Compound {
    entries: Vec<(String, Value)>,
}

impl Compound {
    pub fn new() -> Self {
        Compound::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert a value, returning the previous value for the key if any.
    /// Replacing an existing key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove a key, shifting later entries up, and return its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Recursively merge entries from another compound.
    ///
    /// Keys present in `other` replace the existing value, except that a
    /// compound merging into a compound recurses instead of replacing.
    /// Keys only present in `self` are preserved.
    pub fn merge(&mut self, other: &Compound) {
        for (key, value) in other.iter() {
            match (self.get_mut(key), value) {
                (Some(Value::Compound(existing)), Value::Compound(patch)) => {
                    existing.merge(patch);
                }
                _ => {
                    self.insert(key, value.clone());
                }
            }
        }
    }

    /// Return a copy of this compound with entries from `defaults` filled
    /// in for any keys it does not define itself. Nested compounds are
    /// combined the same way.
    pub fn with_defaults(&self, defaults: &Compound) -> Compound {
        let mut merged = self.clone();
        for (key, default) in defaults.iter() {
            match (merged.get_mut(key), default) {
                (Some(Value::Compound(existing)), Value::Compound(inner)) => {
                    *existing = existing.with_defaults(inner);
                }
                (Some(_), _) => {}
                (None, _) => {
                    merged.insert(key, default.clone());
                }
            }
        }
        merged
    }
}

impl PartialEq for Compound {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |o| o == v))
    }
}

impl FromIterator<(String, Value)> for Compound {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut compound = Compound::new();
        for (k, v) in iter {
            compound.insert(k, v);
        }
        compound
    }
}

impl IntoIterator for Compound {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
