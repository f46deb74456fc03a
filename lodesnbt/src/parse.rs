//! Recursive-descent parsing of sNBT literals into [`Value`] trees.
//!
//! There is no token stream: the parser walks the input directly, leaning
//! on the [`scalar`][`crate::scalar`] lexers for leaf tokens, and tracks
//! line and column for error reporting as it goes.

use lodenbt::{Compound, List, Value};

use crate::error::{Error, Result};
use crate::scalar;

/// Nesting bound for compounds, lists and arrays. The parser recurses, so
/// adversarial input must not be allowed to nest without limit.
const MAX_DEPTH: u32 = 512;

pub(crate) fn from_str(input: &str) -> Result<Value> {
    let mut parser = Parser::new(input);
    let value = parser.parse_value()?;

    parser.skip_whitespace();
    if !parser.rest.is_empty() {
        return Err(parser.error_here("expected end of input"));
    }

    Ok(value)
}

/// Parse one value from the start of `input`, returning the number of
/// bytes consumed. Used by path parsing, which embeds compound filters in
/// a larger expression.
pub(crate) fn parse_prefix(input: &str) -> Result<(Value, usize)> {
    let mut parser = Parser::new(input);
    let value = parser.parse_value()?;
    Ok((value, input.len() - parser.rest.len()))
}

struct Parser<'a> {
    rest: &'a str,
    line: u32,
    col: u32,
    depth: u32,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            rest: input,
            line: 1,
            col: 1,
            depth: 0,
        }
    }

    fn error_here(&self, msg: impl Into<String>) -> Error {
        Error::syntax(self.line, self.col, msg)
    }

    /// Position of the byte at `offset` from the cursor, for errors that
    /// point into a token.
    fn position_at(&self, offset: usize) -> (u32, u32) {
        let mut line = self.line;
        let mut col = self.col;
        for c in self.rest[..offset].chars() {
            if c == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    fn advance(&mut self, n: usize) {
        let (line, col) = self.position_at(n);
        self.line = line;
        self.col = col;
        self.rest = &self.rest[n..];
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest.trim_start();
        let n = self.rest.len() - trimmed.len();
        if n > 0 {
            self.advance(n);
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.rest.starts_with(c) {
            self.advance(c.len_utf8());
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error_here(match self.peek() {
                Some(found) => format!("expected '{}' but got '{}'", c, found),
                None => format!("expected '{}' but input ended", c),
            }))
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            Err(self.error_here(format!("nesting exceeds {} levels", MAX_DEPTH)))
        } else {
            Ok(())
        }
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error_here("unexpected end of input")),
            Some('{') => self.parse_compound(),
            Some('[') => self.parse_bracketed(),
            Some('"') | Some('\'') => Ok(Value::String(self.parse_quoted()?)),
            Some(_) => self.parse_bare(),
        }
    }

    fn parse_quoted(&mut self) -> Result<String> {
        match scalar::quoted_string(self.rest) {
            Ok((consumed, s)) => {
                self.advance(consumed);
                Ok(s)
            }
            Err((offset, msg)) => {
                let (line, col) = self.position_at(offset);
                Err(Error::syntax(line, col, msg))
            }
        }
    }

    fn parse_bare(&mut self) -> Result<Value> {
        let token = match scalar::bare_token(self.rest) {
            Ok((_, token)) => token,
            Err(_) => {
                return Err(match self.peek() {
                    Some(c) => self.error_here(format!("unexpected character '{}'", c)),
                    None => self.error_here("unexpected end of input"),
                });
            }
        };

        let (line, col) = (self.line, self.col);
        self.advance(token.len());

        classify(token).map_err(|msg| Error::numeric_range(line, col, msg))
    }

    fn parse_compound(&mut self) -> Result<Value> {
        self.expect('{')?;
        self.enter()?;

        let mut compound = Compound::new();
        loop {
            self.skip_whitespace();
            if self.eat('}') {
                break;
            }

            let key = match self.peek() {
                Some('"') | Some('\'') => self.parse_quoted()?,
                _ => match scalar::bare_token(self.rest) {
                    Ok((_, token)) => {
                        let token = token.to_owned();
                        self.advance(token.len());
                        token
                    }
                    Err(_) => return Err(self.error_here("expected a compound key")),
                },
            };

            self.skip_whitespace();
            self.expect(':')?;
            let value = self.parse_value()?;
            compound.insert(key, value);

            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            if self.eat('}') {
                break;
            }
            return Err(self.error_here("expected ',' or '}'"));
        }

        self.leave();
        Ok(Value::Compound(compound))
    }

    fn parse_bracketed(&mut self) -> Result<Value> {
        self.expect('[')?;
        self.enter()?;

        let value = if self.rest.starts_with("B;") {
            self.advance(2);
            Value::ByteArray(self.parse_array_elements("byte", "b", i8::MIN as i64, i8::MAX as i64)?
                .into_iter()
                .map(|v| v as i8)
                .collect())
        } else if self.rest.starts_with("I;") {
            self.advance(2);
            Value::IntArray(self.parse_array_elements("int", "", i32::MIN as i64, i32::MAX as i64)?
                .into_iter()
                .map(|v| v as i32)
                .collect())
        } else if self.rest.starts_with("L;") {
            self.advance(2);
            Value::LongArray(self.parse_array_elements("long", "l", i64::MIN, i64::MAX)?)
        } else {
            self.parse_list()?
        };

        self.leave();
        Ok(value)
    }

    /// The elements of `[B; …]`, `[I; …]` or `[L; …]`. Each must be an
    /// integer literal whose suffix matches the array type or is absent.
    fn parse_array_elements(
        &mut self,
        kind: &str,
        suffix: &str,
        min: i64,
        max: i64,
    ) -> Result<Vec<i64>> {
        let mut elements = Vec::new();
        loop {
            self.skip_whitespace();
            if self.eat(']') {
                break;
            }

            let token = match scalar::bare_token(self.rest) {
                Ok((_, token)) => token,
                Err(_) => {
                    return Err(self.error_here(format!("expected a {} array element", kind)))
                }
            };
            let (line, col) = (self.line, self.col);
            self.advance(token.len());

            let body = token
                .strip_suffix(suffix)
                .or_else(|| token.strip_suffix(&suffix.to_uppercase()))
                .filter(|_| !suffix.is_empty())
                .unwrap_or(token);

            if !scalar::is_integer(body) {
                return Err(Error::syntax(
                    line,
                    col,
                    format!("invalid {} array element {:?}", kind, token),
                ));
            }

            let value = body
                .parse::<i64>()
                .ok()
                .filter(|v| (min..=max).contains(v))
                .ok_or_else(|| {
                    Error::numeric_range(
                        line,
                        col,
                        format!("{} is out of range for a {}", body, kind),
                    )
                })?;
            elements.push(value);

            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            if self.eat(']') {
                break;
            }
            return Err(self.error_here("expected ',' or ']'"));
        }
        Ok(elements)
    }

    fn parse_list(&mut self) -> Result<Value> {
        let mut list = List::new();
        loop {
            self.skip_whitespace();
            if self.eat(']') {
                break;
            }

            let (line, col) = (self.line, self.col);
            let value = self.parse_value()?;
            let found = value.tag();
            list.try_push(value)
                .map_err(|_| Error::heterogeneous(line, col, list.element_tag(), found))?;

            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            if self.eat(']') {
                break;
            }
            return Err(self.error_here("expected ',' or ']'"));
        }
        Ok(Value::List(list))
    }
}

/// Decide what a bare token means.
///
/// Tokens that look numeric become the matching tag, with `true` and
/// `false` aliased to bytes. A token that would be a number but carries an
/// impossible suffix reverts to a plain string; an explicit integer suffix
/// whose value does not fit is a range error.
fn classify(token: &str) -> std::result::Result<Value, String> {
    if token.eq_ignore_ascii_case("true") {
        return Ok(Value::Byte(1));
    }
    if token.eq_ignore_ascii_case("false") {
        return Ok(Value::Byte(0));
    }

    if token.len() >= 2 {
        let (body, suffix) = token.split_at(token.len() - 1);
        match suffix {
            "b" | "B" if scalar::is_integer(body) => {
                return int_in_range(body, i8::MIN as i64, i8::MAX as i64, "byte")
                    .map(|v| Value::Byte(v as i8));
            }
            "s" | "S" if scalar::is_integer(body) => {
                return int_in_range(body, i16::MIN as i64, i16::MAX as i64, "short")
                    .map(|v| Value::Short(v as i16));
            }
            "l" | "L" if scalar::is_integer(body) => {
                return int_in_range(body, i64::MIN, i64::MAX, "long").map(Value::Long);
            }
            "f" | "F" if scalar::is_integer(body) || scalar::is_float(body) => {
                // parsing cannot fail once the body shape is validated
                return Ok(body
                    .parse::<f32>()
                    .map(Value::Float)
                    .unwrap_or(Value::Float(f32::NAN)));
            }
            "d" | "D" if scalar::is_integer(body) || scalar::is_float(body) => {
                return Ok(body
                    .parse::<f64>()
                    .map(Value::Double)
                    .unwrap_or(Value::Double(f64::NAN)));
            }
            _ => {}
        }
    }

    if scalar::is_integer(token) {
        return Ok(match token.parse::<i64>() {
            Ok(v) => match i32::try_from(v) {
                Ok(v) => Value::Int(v),
                Err(_) => Value::Long(v),
            },
            // Wider than a long and unsuffixed: plain string.
            Err(_) => Value::String(token.to_owned()),
        });
    }

    if scalar::is_float(token) {
        if let Ok(v) = token.parse::<f64>() {
            return Ok(Value::Double(v));
        }
    }

    Ok(Value::String(token.to_owned()))
}

fn int_in_range(body: &str, min: i64, max: i64, kind: &str) -> std::result::Result<i64, String> {
    body.parse::<i64>()
        .ok()
        .filter(|v| (min..=max).contains(v))
        .ok_or_else(|| format!("{} is out of range for a {}", body, kind))
}
