//! Modified UTF-8, the CESU-8 variant Java uses for NBT strings. U+0000 is
//! encoded as 0xC0 0x80 and supplementary planes as surrogate pairs.

use std::borrow::Cow;

/// Decode a modified UTF-8 byte sequence.
///
/// Plain UTF-8 input is accepted as well. Invalid sequences are replaced
/// with U+FFFD rather than failing, so decoding never errors.
pub(crate) fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match cesu8::from_java_cesu8(bytes) {
        Ok(s) => s,
        // Not modified UTF-8. from_utf8_lossy borrows when the input turns
        // out to be plain UTF-8 and substitutes U+FFFD otherwise.
        Err(_) => String::from_utf8_lossy(bytes),
    }
}

/// Encode a string as modified UTF-8. Borrows when no re-encoding is
/// needed.
pub(crate) fn encode(s: &str) -> Cow<'_, [u8]> {
    cesu8::to_java_cesu8(s)
}
