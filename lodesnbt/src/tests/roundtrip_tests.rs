//! Cross-cutting laws: text -> tree -> binary -> tree -> text.

use lodenbt::scan::scan;
use lodenbt::write::to_bytes;
use lodenbt::{Endian, Tag, Value};

use crate::{from_str, to_string_compact};

fn rescan(bytes: &[u8], order: Endian) -> Value {
    let mut stack = vec![0u32; 512];
    let index = scan(bytes, &mut stack, order).unwrap();
    let (_, value) = index.unpack_root().unwrap();
    value
}

#[test]
fn snbt_to_binary_and_back() {
    let tree = from_str(r#"{foo: [1, 2, 3], bar: "Hello, world!"}"#).unwrap();

    for order in [Endian::Big, Endian::Little] {
        let bytes = to_bytes(&tree, order).unwrap();
        assert_eq!(rescan(&bytes, order), tree);
    }
}

#[test]
fn list_payload_is_seventeen_bytes() {
    // [1, 2, 3] as a list of ints: subtype byte, length, three payloads.
    let tree = from_str(r#"{foo: [1, 2, 3], bar: "Hello, world!"}"#).unwrap();
    let bytes = to_bytes(&tree, Endian::Big).unwrap();

    let mut stack = vec![0u32; 512];
    let index = scan(&bytes, &mut stack, Endian::Big).unwrap();

    let foo = index.desc(1).unwrap();
    assert_eq!(foo.tag, Tag::List as u8);
    assert_eq!(index.name(1).unwrap(), "foo");
    assert_eq!(5 + foo.children as usize * 4, 17);
}

#[test]
fn wide_value_coverage() {
    let literal = concat!(
        "{bytes: [B; -128b, 127b], shorts: [32767s, -32768s], ",
        "longs: [L; -9223372036854775808l, 9223372036854775807l], ",
        "floats: [1.5f, -0.25f], strings: [\"a\", \"with \\\"quotes\\\"\"], ",
        "nested: {list: [{x: 1}, {}], empty: []}, flag: true}"
    );
    let tree = from_str(literal).unwrap();

    for order in [Endian::Big, Endian::Little] {
        let bytes = to_bytes(&tree, order).unwrap();
        assert_eq!(rescan(&bytes, order), tree);
    }

    // Text canonicalization is idempotent across the whole trip.
    let canonical = to_string_compact(&tree);
    assert_eq!(to_string_compact(&from_str(&canonical).unwrap()), canonical);
}

#[test]
fn non_ascii_strings_survive_the_binary_trip() {
    let tree = from_str(r#"{s: "HELLO WORLD THIS IS A TEST STRING ÅÄÖ!"}"#).unwrap();

    let bytes = to_bytes(&tree, Endian::Big).unwrap();
    assert_eq!(rescan(&bytes, Endian::Big), tree);
}

#[test]
fn supplementary_plane_strings_use_surrogates() {
    // Outside the BMP: encoded as a CESU-8 surrogate pair on disk.
    let tree = Value::String("sparkles \u{1F700} end".to_owned());
    let bytes = to_bytes(&tree, Endian::Big).unwrap();
    assert_eq!(rescan(&bytes, Endian::Big), tree);
}
