use super::Builder;
use crate::scan::scan;
use crate::{Endian, List, Tag, Value};

fn unpack_big(data: &[u8]) -> (String, Value) {
    let mut stack = vec![0u32; 256];
    let index = scan(data, &mut stack, Endian::Big).unwrap();
    index.unpack_root().unwrap()
}

#[test]
fn scalars() {
    let payload = Builder::new()
        .start_compound("")
        .byte("b", -1)
        .short("s", 300)
        .int("i", 12345)
        .long("l", 1 << 40)
        .float("f", 0.5)
        .double("d", 0.25)
        .end_compound()
        .build();
    let (name, root) = unpack_big(&payload);

    assert_eq!(name, "");
    let root = root.as_compound().unwrap();
    assert_eq!(root.get("b"), Some(&Value::Byte(-1)));
    assert_eq!(root.get("s"), Some(&Value::Short(300)));
    assert_eq!(root.get("i"), Some(&Value::Int(12345)));
    assert_eq!(root.get("l"), Some(&Value::Long(1 << 40)));
    assert_eq!(root.get("f"), Some(&Value::Float(0.5)));
    assert_eq!(root.get("d"), Some(&Value::Double(0.25)));
}

#[test]
fn long_array() {
    let payload = Builder::new().long_array("x", &[1, 2, 3]).build();
    let (name, value) = unpack_big(&payload);

    assert_eq!(name, "x");
    assert_eq!(value, Value::LongArray(vec![1, 2, 3]));
}

#[test]
fn arrays() {
    let payload = Builder::new()
        .start_compound("")
        .byte_array("bytes", &[-1, 0, 1])
        .int_array("ints", &[i32::MIN, i32::MAX])
        .end_compound()
        .build();
    let (_, root) = unpack_big(&payload);
    let root = root.as_compound().unwrap();

    assert_eq!(root.get("bytes"), Some(&Value::ByteArray(vec![-1, 0, 1])));
    assert_eq!(
        root.get("ints"),
        Some(&Value::IntArray(vec![i32::MIN, i32::MAX]))
    );
}

#[test]
fn numeric_list() {
    let payload = Builder::new()
        .start_list("nums", Tag::Short, 3)
        .short_payload(1)
        .short_payload(-2)
        .short_payload(3)
        .build();
    let (_, value) = unpack_big(&payload);

    let expected = List::from_values([Value::Short(1), Value::Short(-2), Value::Short(3)]).unwrap();
    assert_eq!(value, Value::List(expected));
}

#[test]
fn list_of_strings() {
    let payload = Builder::new()
        .start_list("l", Tag::String, 2)
        .string_payload("hello")
        .string_payload("world")
        .build();
    let (_, value) = unpack_big(&payload);

    let expected = List::from_values([
        Value::String("hello".to_owned()),
        Value::String("world".to_owned()),
    ])
    .unwrap();
    assert_eq!(value, Value::List(expected));
}

#[test]
fn list_of_compounds() {
    let payload = Builder::new()
        .start_list("l", Tag::Compound, 2)
        .start_anon_compound()
        .int("x", 1)
        .end_anon_compound()
        .start_anon_compound()
        .int("x", 2)
        .end_anon_compound()
        .build();
    let (_, value) = unpack_big(&payload);

    let list = value.as_list().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(
        list.get(1).unwrap().as_compound().unwrap().get("x"),
        Some(&Value::Int(2))
    );
}

#[test]
fn both_orders_give_the_same_tree() {
    let big = Builder::new()
        .start_compound("root")
        .int("a", 123456)
        .long_array("l", &[7, 8])
        .end_compound()
        .build();
    let little = Builder::little()
        .start_compound("root")
        .int("a", 123456)
        .long_array("l", &[7, 8])
        .end_compound()
        .build();

    let mut stack = vec![0u32; 256];
    let big_tree = scan(&big, &mut stack, Endian::Big)
        .unwrap()
        .unpack_root()
        .unwrap();
    let little_tree = scan(&little, &mut stack, Endian::Little)
        .unwrap()
        .unpack_root()
        .unwrap();

    assert_eq!(big_tree, little_tree);
}

#[test]
fn unpack_by_index_matches_full_tree() {
    let payload = Builder::new()
        .start_compound("")
        .int("a", 1)
        .start_compound("inner")
        .int("b", 2)
        .end_compound()
        .end_compound()
        .build();
    let mut stack = vec![0u32; 256];
    let index = scan(&payload, &mut stack, Endian::Big).unwrap();

    let (_, root) = index.unpack_root().unwrap();
    let inner_from_root = root.as_compound().unwrap().get("inner").unwrap();

    // Descriptor 2 is the inner compound; unpacking it on demand yields
    // the same subtree the full materialization contains.
    let inner_direct = index.unpack(2).unwrap();
    assert_eq!(&inner_direct, inner_from_root);
}

#[test]
fn modified_utf8_null_round_trips() {
    let payload = Builder::new().string("s", "a\0b").build();
    let (_, value) = unpack_big(&payload);
    assert_eq!(value, Value::String("a\0b".to_owned()));
}

#[test]
fn invalid_string_bytes_are_replaced() {
    let payload = Builder::new()
        .tag(Tag::String)
        .name("s")
        .u16_payload(1)
        .raw_bytes(&[0xff])
        .build();
    let (_, value) = unpack_big(&payload);
    assert_eq!(value, Value::String("\u{fffd}".to_owned()));
}

#[test]
fn duplicate_names_last_wins() {
    let payload = Builder::new()
        .start_compound("")
        .int("a", 1)
        .int("a", 2)
        .end_compound()
        .build();
    let (_, root) = unpack_big(&payload);
    let root = root.as_compound().unwrap();

    assert_eq!(root.len(), 1);
    assert_eq!(root.get("a"), Some(&Value::Int(2)));
}

#[test]
fn empty_list_keeps_no_elements() {
    let payload = Builder::new()
        .tag(Tag::List)
        .name("e")
        .tag(Tag::End)
        .int_payload(5)
        .build();
    let (_, value) = unpack_big(&payload);

    let list = value.as_list().unwrap();
    assert!(list.is_empty());
    assert_eq!(list.element_tag(), Tag::End);
}

#[test]
fn root_name_is_preserved() {
    let payload = Builder::new()
        .start_compound("hello world")
        .end_compound()
        .build();
    let (name, _) = unpack_big(&payload);
    assert_eq!(name, "hello world");
}

#[test]
fn compound_entries_keep_document_order() {
    let payload = Builder::new()
        .start_compound("")
        .int("z", 1)
        .int("a", 2)
        .int("m", 3)
        .end_compound()
        .build();
    let (_, root) = unpack_big(&payload);
    let keys: Vec<_> = root.as_compound().unwrap().keys().map(String::from).collect();
    assert_eq!(keys, ["z", "a", "m"]);
}
