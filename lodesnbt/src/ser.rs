//! Serializing [`Value`] trees to their sNBT literal form.

use lodenbt::{Compound, List, Value};

/// How much whitespace the output carries.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Style<'a> {
    /// No whitespace inside structural punctuation.
    Compact,
    /// A single space after `:` and `,`.
    Default,
    /// Every compound, list and array entry on its own line, one more
    /// copy of the indent string per nesting level.
    Pretty(&'a str),
}

pub(crate) fn to_string(value: &Value, style: Style<'_>) -> String {
    let mut serializer = Serializer {
        out: String::new(),
        comma: match style {
            Style::Compact => ",",
            _ => ", ",
        },
        colon: match style {
            Style::Compact => ":",
            _ => ": ",
        },
        semicolon: match style {
            Style::Compact => ";",
            _ => "; ",
        },
        indentation: match style {
            Style::Pretty(indent) => Some(indent.to_owned()),
            _ => None,
        },
        indent: String::new(),
    };
    serializer.serialize(value);
    serializer.out
}

/// Compound keys that match this shape don't need quotes.
fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'+' | b'-'))
}

struct Serializer {
    out: String,
    comma: &'static str,
    colon: &'static str,
    semicolon: &'static str,
    indentation: Option<String>,
    indent: String,
}

impl Serializer {
    fn serialize(&mut self, value: &Value) {
        match value {
            Value::Byte(v) => self.integer(*v, "b"),
            Value::Short(v) => self.integer(*v, "s"),
            Value::Int(v) => self.integer(*v, ""),
            Value::Long(v) => self.integer(*v, "L"),
            Value::Float(v) => self.float(*v, "f"),
            Value::Double(v) => self.double(*v),
            Value::String(s) => self.string(s),
            Value::ByteArray(arr) => self.array("B", arr.iter().map(|v| format_int(*v, "B"))),
            Value::IntArray(arr) => self.array("I", arr.iter().map(|v| format_int(*v, ""))),
            Value::LongArray(arr) => self.array("L", arr.iter().map(|v| format_int(*v, "L"))),
            Value::List(list) => self.list(list),
            Value::Compound(compound) => self.compound(compound),
        }
    }

    fn integer<V: itoa::Integer>(&mut self, v: V, suffix: &str) {
        let mut buffer = itoa::Buffer::new();
        self.out.push_str(buffer.format(v));
        self.out.push_str(suffix);
    }

    fn float(&mut self, v: f32, suffix: &str) {
        let mut buffer = ryu::Buffer::new();
        self.out.push_str(buffer.format(v));
        self.out.push_str(suffix);
    }

    fn double(&mut self, v: f64) {
        let mut buffer = ryu::Buffer::new();
        self.out.push_str(buffer.format(v));
        self.out.push('d');
    }

    /// Quote and escape a string, preferring double quotes and switching
    /// to single quotes when that avoids escaping.
    fn string(&mut self, s: &str) {
        let quote = if s.contains('"') && !s.contains('\'') {
            '\''
        } else {
            '"'
        };

        self.out.push(quote);
        for c in s.chars() {
            if c == quote || c == '\\' {
                self.out.push('\\');
            }
            self.out.push(c);
        }
        self.out.push(quote);
    }

    fn array<I: Iterator<Item = String>>(&mut self, prefix: &str, elements: I) {
        let elements: Vec<String> = elements.collect();

        self.out.push('[');
        self.out.push_str(prefix);
        if elements.is_empty() {
            self.out.push(';');
            self.out.push(']');
            return;
        }
        if self.indentation.is_some() {
            self.out.push(';');
        } else {
            self.out.push_str(self.semicolon);
        }

        self.sequence(elements.len(), |s, i| s.out.push_str(&elements[i]));
    }

    fn list(&mut self, list: &List) {
        self.out.push('[');
        if list.is_empty() {
            self.out.push(']');
            return;
        }
        self.sequence(list.len(), |s, i| {
            // list elements always exist for i < len
            if let Some(item) = list.get(i) {
                s.serialize(item);
            }
        });
    }

    fn compound(&mut self, compound: &Compound) {
        self.out.push('{');
        if compound.is_empty() {
            self.out.push('}');
            return;
        }

        let entries: Vec<(&str, &Value)> = compound.iter().collect();
        self.sequence_with(entries.len(), '}', |s, i| {
            let (key, value) = entries[i];
            if is_bare_key(key) {
                s.out.push_str(key);
            } else {
                s.string(key);
            }
            s.out.push_str(s.colon);
            s.serialize(value);
        });
    }

    /// Emit `n` comma-separated entries followed by `]`.
    fn sequence(&mut self, n: usize, emit: impl Fn(&mut Self, usize)) {
        self.sequence_with(n, ']', emit);
    }

    /// Emit `n` comma-separated entries followed by the closing character,
    /// expanding one entry per line when pretty-printing.
    fn sequence_with(&mut self, n: usize, close: char, emit: impl Fn(&mut Self, usize)) {
        match self.indentation.clone() {
            Some(step) => {
                let outer = self.indent.clone();
                self.indent.push_str(&step);

                for i in 0..n {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.out.push('\n');
                    self.out.push_str(&self.indent);
                    emit(self, i);
                }

                self.indent = outer;
                self.out.push('\n');
                self.out.push_str(&self.indent);
                self.out.push(close);
            }
            None => {
                for i in 0..n {
                    if i > 0 {
                        self.out.push_str(self.comma);
                    }
                    emit(self, i);
                }
                self.out.push(close);
            }
        }
    }
}

fn format_int<V: itoa::Integer>(v: V, suffix: &str) -> String {
    let mut buffer = itoa::Buffer::new();
    format!("{}{}", buffer.format(v), suffix)
}
