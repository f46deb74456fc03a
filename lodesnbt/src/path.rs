//! NBT path expressions address sets of tags inside a tree.
//!
//! A path is a sequence of accessors: compound keys (`name`, `"quoted
//! name"`), element selectors (`[]`, `[2]`, `[-1]`), and compound filters
//! (`{id: 1b}`), which retain only compounds matching their entries.
//! `foo[{id: 1b}].bar` reads every element of the list `foo` whose
//! compound has `id` equal to `Byte(1)` and descends into its `bar` key.
//!
//! Evaluation is forgiving: an accessor that does not apply to the node it
//! reaches contributes no matches and mutates nothing. Only malformed path
//! expressions are errors.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use lodenbt::{Compound, Value};

use crate::parse::parse_prefix;
use crate::scalar;

/// One element of a path expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Accessor {
    /// Descend into a compound key.
    Name(String),
    /// Select one element of a list or array, negative values counting
    /// from the back.
    Index(i32),
    /// Select every element of a list or array.
    AllElements,
    /// Retain the current node only if it is a compound matching the
    /// filter.
    Filter(Compound),
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    accessors: Vec<Accessor>,
}

/// Raised when a path expression is malformed. Inapplicable accessors at
/// evaluation time are empty selections, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    msg: String,
}

impl PathError {
    fn new(msg: impl Into<String>) -> Self {
        PathError { msg: msg.into() }
    }
}

impl std::error::Error for PathError {}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid path: {}", self.msg)
    }
}

fn is_bare_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-')
}

impl Path {
    /// The empty path, which selects the root itself.
    pub fn new() -> Self {
        Path::default()
    }

    pub fn accessors(&self) -> &[Accessor] {
        &self.accessors
    }

    /// Append a compound key accessor.
    pub fn key(mut self, name: impl Into<String>) -> Path {
        self.accessors.push(Accessor::Name(name.into()));
        self
    }

    /// Append an element index accessor.
    pub fn index(mut self, index: i32) -> Path {
        self.accessors.push(Accessor::Index(index));
        self
    }

    /// Append an every-element accessor.
    pub fn all(mut self) -> Path {
        self.accessors.push(Accessor::AllElements);
        self
    }

    /// Append a compound filter. Consecutive filters collapse into one,
    /// and a filter directly after a single-element index is rejected.
    pub fn filter(mut self, filter: Compound) -> Result<Path, PathError> {
        self.extend(Accessor::Filter(filter))?;
        Ok(self)
    }

    /// Concatenate two paths, applying the same normalization as parsing.
    pub fn concat(&self, other: &Path) -> Result<Path, PathError> {
        let mut combined = self.clone();
        for accessor in &other.accessors {
            combined.extend(accessor.clone())?;
        }
        Ok(combined)
    }

    fn extend(&mut self, accessor: Accessor) -> Result<(), PathError> {
        if let Accessor::Filter(new) = &accessor {
            match self.accessors.last_mut() {
                Some(Accessor::Filter(prev)) => {
                    *prev = new.with_defaults(prev);
                    return Ok(());
                }
                Some(Accessor::Index(i)) => {
                    return Err(PathError::new(format!(
                        "can't match a compound on the single element selected by [{}]",
                        i
                    )));
                }
                _ => {}
            }
        }
        self.accessors.push(accessor);
        Ok(())
    }

    /// Parse a path expression.
    pub fn parse(input: &str) -> Result<Path, PathError> {
        let mut path = Path::new();
        let mut at = 0;

        while at < input.len() {
            let rest = &input[at..];
            let c = match rest.chars().next() {
                Some(c) => c,
                None => break,
            };

            // Dots separate named keys; redundant dots and stray
            // whitespace are ignored.
            if c == '.' || c.is_whitespace() {
                at += c.len_utf8();
                continue;
            }

            match c {
                '[' => {
                    at += 1;
                    at += whitespace_len(&input[at..]);

                    if input[at..].starts_with(']') {
                        at += 1;
                        path.extend(Accessor::AllElements)?;
                    } else if input[at..].starts_with('{') {
                        let filter = parse_filter(input, &mut at)?;
                        at += whitespace_len(&input[at..]);
                        if !input[at..].starts_with(']') {
                            return Err(PathError::new(format!(
                                "expected ']' at offset {}",
                                at
                            )));
                        }
                        at += 1;
                        path.extend(Accessor::AllElements)?;
                        path.extend(Accessor::Filter(filter))?;
                    } else {
                        let rest = &input[at..];
                        let n = rest
                            .find(|c: char| !matches!(c, '0'..='9' | '+' | '-'))
                            .unwrap_or(rest.len());
                        let index = rest[..n].parse::<i32>().map_err(|_| {
                            PathError::new(format!(
                                "brackets at offset {} should contain an index or a compound",
                                at
                            ))
                        })?;
                        at += n;
                        at += whitespace_len(&input[at..]);
                        if !input[at..].starts_with(']') {
                            return Err(PathError::new(format!(
                                "expected ']' at offset {}",
                                at
                            )));
                        }
                        at += 1;
                        path.extend(Accessor::Index(index))?;
                    }
                }
                '{' => {
                    let filter = parse_filter(input, &mut at)?;
                    path.extend(Accessor::Filter(filter))?;
                }
                '"' | '\'' => match scalar::quoted_string(&input[at..]) {
                    Ok((consumed, key)) => {
                        at += consumed;
                        path.extend(Accessor::Name(key))?;
                    }
                    Err((offset, msg)) => {
                        return Err(PathError::new(format!(
                            "{} at offset {}",
                            msg,
                            at + offset
                        )));
                    }
                },
                _ => {
                    let rest = &input[at..];
                    let n = rest
                        .find(|c: char| !is_bare_path_char(c))
                        .unwrap_or(rest.len());
                    if n == 0 {
                        return Err(PathError::new(format!(
                            "unexpected character '{}' at offset {}",
                            c, at
                        )));
                    }
                    path.extend(Accessor::Name(rest[..n].to_owned()))?;
                    at += n;
                }
            }
        }

        Ok(path)
    }

    /// Every tag the path selects, in document order.
    pub fn get_all(&self, root: &Value) -> Vec<Value> {
        self.resolve(root)
            .iter()
            .filter_map(|addr| lookup(root, addr))
            .collect()
    }

    /// The first match anywhere in the tree: the path is evaluated at the
    /// root and then at every nested tag in pre-order until something
    /// matches.
    pub fn find(&self, root: &Value) -> Option<Value> {
        if let Some(first) = self.get_all(root).into_iter().next() {
            return Some(first);
        }
        match root {
            Value::Compound(compound) => {
                for (_, child) in compound.iter() {
                    if let Some(found) = self.find(child) {
                        return Some(found);
                    }
                }
            }
            Value::List(list) => {
                for child in list {
                    if let Some(found) = self.find(child) {
                        return Some(found);
                    }
                }
            }
            _ => {}
        }
        None
    }

    /// Replace every selected tag with a copy of `value`, returning how
    /// many were replaced. Branches where the path does not fully apply
    /// are left untouched.
    pub fn set_all(&self, root: &mut Value, value: &Value) -> usize {
        let addrs = self.resolve(root);
        let mut count = 0;
        for addr in &addrs {
            if set_at(root, addr, value) {
                count += 1;
            }
        }
        count
    }

    /// Remove every selected tag from its parent, returning how many were
    /// removed. Matches are processed in reverse document order so element
    /// indices stay valid while deleting.
    pub fn delete_all(&self, root: &mut Value) -> usize {
        let addrs = self.resolve(root);
        let mut count = 0;
        for addr in addrs.iter().rev() {
            if delete_at(root, addr) {
                count += 1;
            }
        }
        count
    }

    /// Addresses of every slot the path selects, in document order.
    fn resolve(&self, root: &Value) -> Vec<Vec<Step>> {
        let mut out = Vec::new();
        let mut addr = Vec::new();
        resolve_into(&self.accessors, root, &mut addr, &mut out);
        out
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments: Vec<String> = vec![String::new()];

        for accessor in &self.accessors {
            match accessor {
                Accessor::Name(key) => {
                    let segment = if !key.is_empty()
                        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                    {
                        key.clone()
                    } else {
                        let mut quoted = String::from('"');
                        for c in key.chars() {
                            if c == '"' || c == '\\' {
                                quoted.push('\\');
                            }
                            quoted.push(c);
                        }
                        quoted.push('"');
                        quoted
                    };
                    segments.push(segment);
                }
                Accessor::Index(i) => {
                    if let Some(last) = segments.last_mut() {
                        last.push_str(&format!("[{}]", i));
                    }
                }
                Accessor::AllElements => {
                    if let Some(last) = segments.last_mut() {
                        last.push_str("[]");
                    }
                }
                Accessor::Filter(filter) => {
                    let literal = crate::to_string_compact(&Value::Compound(filter.clone()));
                    if let Some(last) = segments.last_mut() {
                        // A filter straight after `[]` belongs inside the
                        // brackets.
                        if last.ends_with("[]") {
                            last.truncate(last.len() - 2);
                            last.push('[');
                            last.push_str(&literal);
                            last.push(']');
                        } else {
                            last.push_str(&literal);
                        }
                    }
                }
            }
        }

        let joined = segments
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&joined)
    }
}

fn whitespace_len(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

/// Parse the compound filter starting at `input[*at..]` and advance past
/// it.
fn parse_filter(input: &str, at: &mut usize) -> Result<Compound, PathError> {
    let (value, consumed) = parse_prefix(&input[*at..])
        .map_err(|e| PathError::new(format!("invalid filter at offset {}: {}", at, e)))?;
    *at += consumed;
    match value {
        Value::Compound(compound) => Ok(compound),
        // parse_prefix saw '{' so this cannot be anything else
        _ => Err(PathError::new("filter is not a compound")),
    }
}

/// One step of a resolved address: either a compound key or an element
/// position.
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Key(String),
    Element(usize),
}

fn matches_filter(node: &Value, filter: &Compound) -> bool {
    match node.as_compound() {
        Some(compound) => filter
            .iter()
            .all(|(key, want)| compound.get(key).map_or(false, |have| have.matches(want))),
        None => false,
    }
}

fn seq_len(node: &Value) -> Option<usize> {
    match node {
        Value::List(list) => Some(list.len()),
        Value::ByteArray(arr) => Some(arr.len()),
        Value::IntArray(arr) => Some(arr.len()),
        Value::LongArray(arr) => Some(arr.len()),
        _ => None,
    }
}

fn normalize_index(index: i32, len: usize) -> Option<usize> {
    if index >= 0 {
        let index = index as usize;
        (index < len).then(|| index)
    } else {
        len.checked_sub(index.unsigned_abs() as usize)
    }
}

/// The element of a list or array as a value. Array elements are
/// synthesized on the fly.
fn element_at(node: &Value, index: usize) -> Option<Cow<'_, Value>> {
    match node {
        Value::List(list) => list.get(index).map(Cow::Borrowed),
        Value::ByteArray(arr) => arr.get(index).map(|v| Cow::Owned(Value::Byte(*v))),
        Value::IntArray(arr) => arr.get(index).map(|v| Cow::Owned(Value::Int(*v))),
        Value::LongArray(arr) => arr.get(index).map(|v| Cow::Owned(Value::Long(*v))),
        _ => None,
    }
}

fn resolve_into(
    accessors: &[Accessor],
    node: &Value,
    addr: &mut Vec<Step>,
    out: &mut Vec<Vec<Step>>,
) {
    let (first, rest) = match accessors.split_first() {
        None => {
            out.push(addr.clone());
            return;
        }
        Some(split) => split,
    };

    match first {
        Accessor::Name(key) => {
            if let Some(child) = node.as_compound().and_then(|c| c.get(key)) {
                addr.push(Step::Key(key.clone()));
                resolve_into(rest, child, addr, out);
                addr.pop();
            }
        }
        Accessor::Index(index) => {
            if let Some(len) = seq_len(node) {
                if let Some(index) = normalize_index(*index, len) {
                    if let Some(child) = element_at(node, index) {
                        addr.push(Step::Element(index));
                        resolve_into(rest, &child, addr, out);
                        addr.pop();
                    }
                }
            }
        }
        Accessor::AllElements => {
            if let Some(len) = seq_len(node) {
                for index in 0..len {
                    if let Some(child) = element_at(node, index) {
                        addr.push(Step::Element(index));
                        resolve_into(rest, &child, addr, out);
                        addr.pop();
                    }
                }
            }
        }
        Accessor::Filter(filter) => {
            if matches_filter(node, filter) {
                resolve_into(rest, node, addr, out);
            }
        }
    }
}

fn lookup(root: &Value, addr: &[Step]) -> Option<Value> {
    let mut node = Cow::Borrowed(root);
    for step in addr {
        node = match step {
            Step::Key(key) => match node {
                Cow::Borrowed(value) => Cow::Borrowed(value.as_compound()?.get(key)?),
                Cow::Owned(value) => Cow::Owned(value.as_compound()?.get(key)?.clone()),
            },
            Step::Element(index) => match node {
                Cow::Borrowed(value) => element_at(value, *index)?,
                Cow::Owned(value) => Cow::Owned(element_at(&value, *index)?.into_owned()),
            },
        };
    }
    Some(node.into_owned())
}

fn step_into<'v>(node: &'v mut Value, step: &Step) -> Option<&'v mut Value> {
    match step {
        Step::Key(key) => node.as_compound_mut()?.get_mut(key),
        // Arrays hold scalars, which never have children, so a non-final
        // step only ever passes through compounds and lists.
        Step::Element(index) => node.as_list_mut()?.get_mut(*index),
    }
}

fn set_at(root: &mut Value, addr: &[Step], value: &Value) -> bool {
    let (last, parents) = match addr.split_last() {
        Some(split) => split,
        // The empty address is the root itself, which has no parent slot.
        None => return false,
    };

    let mut node = root;
    for step in parents {
        node = match step_into(node, step) {
            Some(next) => next,
            None => return false,
        };
    }

    match (last, node) {
        (Step::Key(key), Value::Compound(compound)) => {
            compound.insert(key.clone(), value.clone());
            true
        }
        (Step::Element(index), Value::List(list)) => list.try_set(*index, value.clone()).is_ok(),
        (Step::Element(index), Value::ByteArray(arr)) => match value {
            Value::Byte(v) if *index < arr.len() => {
                arr[*index] = *v;
                true
            }
            _ => false,
        },
        (Step::Element(index), Value::IntArray(arr)) => match value {
            Value::Int(v) if *index < arr.len() => {
                arr[*index] = *v;
                true
            }
            _ => false,
        },
        (Step::Element(index), Value::LongArray(arr)) => match value {
            Value::Long(v) if *index < arr.len() => {
                arr[*index] = *v;
                true
            }
            _ => false,
        },
        _ => false,
    }
}

fn delete_at(root: &mut Value, addr: &[Step]) -> bool {
    let (last, parents) = match addr.split_last() {
        Some(split) => split,
        None => return false,
    };

    let mut node = root;
    for step in parents {
        node = match step_into(node, step) {
            Some(next) => next,
            None => return false,
        };
    }

    match (last, node) {
        (Step::Key(key), Value::Compound(compound)) => compound.remove(key).is_some(),
        (Step::Element(index), Value::List(list)) => {
            if *index < list.len() {
                list.remove(*index);
                true
            } else {
                false
            }
        }
        (Step::Element(index), Value::ByteArray(arr)) => {
            if *index < arr.len() {
                arr.remove(*index);
                true
            } else {
                false
            }
        }
        (Step::Element(index), Value::IntArray(arr)) => {
            if *index < arr.len() {
                arr.remove(*index);
                true
            } else {
                false
            }
        }
        (Step::Element(index), Value::LongArray(arr)) => {
            if *index < arr.len() {
                arr.remove(*index);
                true
            } else {
                false
            }
        }
        _ => false,
    }
}
