//! Leaf-level lexing: unquoted tokens, the shapes of numeric literal
//! bodies, and quoted strings with their escapes.

use nom::{
    branch::alt,
    bytes::complete::{is_a, tag},
    character::complete::{alphanumeric1, char, digit0, digit1, one_of},
    combinator::{opt, recognize},
    multi::many1,
    sequence::{pair, tuple},
    IResult,
};

/// An unquoted run of identifier characters. Numbers lex as bare tokens
/// too; classification happens afterwards.
pub(crate) fn bare_token(input: &str) -> IResult<&str, &str> {
    recognize(many1(alt((alphanumeric1, is_a("_-.+")))))(input)
}

/// A single 0, or a non-zero digit followed by more digits, with an
/// optional sign. Leading zeros are not integers.
fn integer(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(one_of("+-")),
        alt((recognize(pair(one_of("123456789"), digit0)), tag("0"))),
    )))(input)
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(input)
}

/// A decimal literal that is not a plain integer: it carries a dot, an
/// exponent, or both.
fn float(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(one_of("+-")),
        alt((
            recognize(pair(
                alt((
                    recognize(tuple((digit1, char('.'), digit0))),
                    recognize(pair(char('.'), digit1)),
                )),
                opt(exponent),
            )),
            recognize(pair(digit1, exponent)),
        )),
    )))(input)
}

pub(crate) fn is_integer(token: &str) -> bool {
    matches!(integer(token), Ok(("", _)))
}

pub(crate) fn is_float(token: &str) -> bool {
    matches!(float(token), Ok(("", _)))
}

/// Parse a quoted string at the start of `input`.
///
/// Returns the number of bytes consumed including both quotes, and the
/// unescaped contents. Double quotes admit `\\`, `\"` and `\n`; single
/// quotes admit `\'` in place of `\"`. On failure the offset of the
/// offending byte is returned alongside a message.
pub(crate) fn quoted_string(input: &str) -> Result<(usize, String), (usize, String)> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, c @ ('"' | '\''))) => c,
        _ => return Err((0, "expected a quoted string".to_owned())),
    };

    let mut out = String::new();
    let mut escaped = false;
    for (at, c) in chars {
        if escaped {
            match c {
                '\\' => out.push('\\'),
                'n' => out.push('\n'),
                c if c == quote => out.push(c),
                other => {
                    return Err((at - 1, format!("invalid escape sequence \"\\{}\"", other)))
                }
            }
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Ok((at + c.len_utf8(), out));
        } else {
            out.push(c);
        }
    }

    Err((input.len(), "unterminated string".to_owned()))
}
