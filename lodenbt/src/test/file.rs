use std::io::Write;

use flate2::write::{GzEncoder, ZlibEncoder};

use super::Builder;
use crate::error::ErrorKind;
use crate::file::{Compression, NbtFile};
use crate::{Compound, Endian, Value};

fn sample_bytes() -> Vec<u8> {
    Builder::new()
        .start_compound("root")
        .int("counter", 7)
        .string("msg", "hi")
        .end_compound()
        .build()
}

#[test]
fn parse_raw_bytes() {
    let file = NbtFile::from_bytes(&sample_bytes(), None, None).unwrap();

    assert_eq!(file.root_name(), "root");
    assert_eq!(file.compression(), Compression::None);
    assert_eq!(file.order(), Endian::Big);
    assert_eq!(file.root().get("counter"), Some(&Value::Int(7)));
}

#[test]
fn round_trip_bytes() {
    let file = NbtFile::from_bytes(&sample_bytes(), None, None).unwrap();
    let out = file.to_bytes().unwrap();
    assert_eq!(out, sample_bytes());
}

#[test]
fn gzip_detection_and_round_trip() {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&sample_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();

    let file = NbtFile::from_bytes(&compressed, None, None).unwrap();
    assert_eq!(file.compression(), Compression::Gzip);
    assert_eq!(file.root().get("counter"), Some(&Value::Int(7)));

    // Round-trips through the same framing.
    let out = file.to_bytes().unwrap();
    let back = NbtFile::from_bytes(&out, None, None).unwrap();
    assert_eq!(back, file);
}

#[test]
fn zlib_detection() {
    let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&sample_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();

    let file = NbtFile::from_bytes(&compressed, None, None).unwrap();
    assert_eq!(file.compression(), Compression::Zlib);
}

#[test]
fn little_endian_is_detected_by_retry() {
    let bytes = Builder::little()
        .start_compound("root")
        .int("a", 1)
        .end_compound()
        .build();

    let file = NbtFile::from_bytes(&bytes, None, None).unwrap();
    assert_eq!(file.order(), Endian::Little);
    assert_eq!(file.root().get("a"), Some(&Value::Int(1)));
}

#[test]
fn declared_order_does_not_retry() {
    let bytes = Builder::little()
        .start_compound("root")
        .int("a", 1)
        .end_compound()
        .build();

    let err = NbtFile::from_bytes(&bytes, None, Some(Endian::Big)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
}

#[test]
fn root_must_be_a_compound() {
    let bytes = Builder::new().int("a", 1).build();
    let err = NbtFile::from_bytes(&bytes, None, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoRootCompound);
}

#[test]
fn empty_root_name_is_preserved() {
    let bytes = Builder::new().start_compound("").end_compound().build();
    let file = NbtFile::from_bytes(&bytes, None, None).unwrap();
    assert_eq!(file.root_name(), "");
    assert_eq!(file.to_bytes().unwrap(), bytes);
}

#[test]
fn save_and_edit_on_disk() {
    let dir = std::env::temp_dir().join(format!("lodenbt-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("counter.nbt");

    let mut root = Compound::new();
    root.insert("counter", Value::Int(0));
    let mut file = NbtFile::new(root);
    file.set_compression(Compression::Gzip);
    file.save_as(&path).unwrap();

    NbtFile::edit(&path, |file| {
        let counter = file.root_mut().get_mut("counter").unwrap();
        *counter = Value::Int(1);
        Ok(())
    })
    .unwrap();

    let back = NbtFile::load(&path).unwrap();
    assert_eq!(back.root().get("counter"), Some(&Value::Int(1)));
    assert_eq!(back.compression(), Compression::Gzip);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn failed_edit_leaves_the_file_alone() {
    let dir = std::env::temp_dir().join(format!("lodenbt-test-edit-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("data.nbt");

    let mut root = Compound::new();
    root.insert("value", Value::Int(5));
    let mut file = NbtFile::new(root);
    file.save_as(&path).unwrap();

    let result = NbtFile::edit(&path, |file| {
        file.root_mut().insert("value", Value::Int(9));
        Err(crate::error::Error::bespoke("change of heart"))
    });
    assert!(result.is_err());

    let back = NbtFile::load(&path).unwrap();
    assert_eq!(back.root().get("value"), Some(&Value::Int(5)));

    std::fs::remove_dir_all(&dir).unwrap();
}
