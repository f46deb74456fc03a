use lodenbt::{Compound, Value};

use crate::from_str;
use crate::path::{Accessor, Path, PathError};

fn keys(path: &Path) -> Vec<String> {
    path.accessors()
        .iter()
        .map(|a| match a {
            Accessor::Name(key) => key.clone(),
            other => panic!("expected a name accessor, got {:?}", other),
        })
        .collect()
}

#[test]
fn named_key_parsing() {
    assert!(Path::parse("").unwrap().accessors().is_empty());
    assert_eq!(keys(&Path::parse("hello").unwrap()), ["hello"]);
    assert_eq!(
        keys(&Path::parse("hello.world").unwrap()),
        ["hello", "world"]
    );
    assert_eq!(
        keys(&Path::parse("with.trailing.dot.").unwrap()),
        ["with", "trailing", "dot"]
    );
    assert_eq!(
        keys(&Path::parse(r#"using."quoted.keys""#).unwrap()),
        ["using", "quoted.keys"]
    );
    assert_eq!(
        keys(&Path::parse(r#""escape \"quotes\""."in.quoted".key"#).unwrap()),
        [r#"escape "quotes""#, "in.quoted", "key"]
    );
    assert_eq!(
        keys(&Path::parse("...with..redundant..dots").unwrap()),
        ["with", "redundant", "dots"]
    );
}

#[test]
fn bracket_accessors() {
    let path = Path::parse("a[]").unwrap();
    assert_eq!(
        path.accessors(),
        &[
            Accessor::Name("a".to_owned()),
            Accessor::AllElements,
        ]
    );

    let path = Path::parse("a[3].b[-1]").unwrap();
    assert_eq!(
        path.accessors(),
        &[
            Accessor::Name("a".to_owned()),
            Accessor::Index(3),
            Accessor::Name("b".to_owned()),
            Accessor::Index(-1),
        ]
    );
}

#[test]
fn bracketed_filter_selects_all_elements_first() {
    let path = Path::parse("a[{b: 1}]").unwrap();
    assert_eq!(path.accessors().len(), 3);
    assert_eq!(path.accessors()[1], Accessor::AllElements);
    assert!(matches!(path.accessors()[2], Accessor::Filter(_)));
}

#[test]
fn consecutive_filters_merge() {
    let path = Path::parse("{a: 1}{b: 2}").unwrap();
    assert_eq!(path.accessors().len(), 1);
    match &path.accessors()[0] {
        Accessor::Filter(filter) => {
            assert_eq!(filter.get("a"), Some(&Value::Int(1)));
            assert_eq!(filter.get("b"), Some(&Value::Int(2)));
        }
        other => panic!("expected a filter, got {:?}", other),
    }
}

#[test]
fn filter_after_index_is_rejected() {
    let err = Path::parse("a[0]{b: 1}").unwrap_err();
    let _: PathError = err;

    // But a filter after [] is fine.
    assert!(Path::parse("a[]{b: 1}").is_ok());
}

#[test]
fn display_round_trips() {
    for expr in [
        "a.b.c",
        "a[0].b",
        "a[]",
        "a[-2]",
        r#""quoted key".inner"#,
        "{a:1}.b",
        "a[{b:1b}].c",
        "a{x:1}.b",
        "[0].a",
    ] {
        let path = Path::parse(expr).unwrap();
        let shown = path.to_string();
        assert_eq!(Path::parse(&shown).unwrap(), path, "through {:?}", shown);
        assert_eq!(shown, expr);
    }
}

#[test]
fn concat_behaves_like_parsing_the_joined_expression() {
    let a = Path::parse("foo[]").unwrap();
    let b = Path::parse("bar{x: 1}").unwrap();
    let joined = a.concat(&b).unwrap();
    assert_eq!(joined, Path::parse("foo[].bar{x: 1}").unwrap());

    // The empty path is the identity.
    let p = Path::parse("a.b").unwrap();
    assert_eq!(Path::new().concat(&p).unwrap(), p);
    assert_eq!(p.concat(&Path::new()).unwrap(), p);
}

fn demo_tree() -> Value {
    from_str(
        r#"{foo: [{a: 1, b: {c: 42}}, {a: 2, b: {c: 0}}], bar: "Hello, world!", arr: [L; 10l, 20l]}"#,
    )
    .unwrap()
}

#[test]
fn get_all_named_and_indexed() {
    let tree = from_str("{a: [{b: {c: 42}}]}").unwrap();
    let path = Path::parse("a[0].b.c").unwrap();
    assert_eq!(path.get_all(&tree), vec![Value::Int(42)]);
}

#[test]
fn get_all_over_every_element() {
    let tree = demo_tree();
    let path = Path::parse("foo[].a").unwrap();
    assert_eq!(path.get_all(&tree), vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn get_all_through_filters() {
    let tree = demo_tree();

    let path = Path::parse("foo[{a: 1}].b.c").unwrap();
    assert_eq!(path.get_all(&tree), vec![Value::Int(42)]);

    // Numeric filters need the exact tag type.
    let path = Path::parse("foo[{a: 1b}].b.c").unwrap();
    assert_eq!(path.get_all(&tree), Vec::<Value>::new());

    // An empty filter matches every compound.
    let path = Path::parse("foo[{}].a").unwrap();
    assert_eq!(path.get_all(&tree), vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn root_filters() {
    let tree = demo_tree();

    let path = Path::parse(r#"{bar: "Hello, world!"}.foo[0].a"#).unwrap();
    assert_eq!(path.get_all(&tree), vec![Value::Int(1)]);

    let path = Path::parse(r#"{bar: "goodbye"}.foo[0].a"#).unwrap();
    assert_eq!(path.get_all(&tree), Vec::<Value>::new());
}

#[test]
fn negative_indices_count_from_the_back() {
    let tree = demo_tree();
    assert_eq!(
        Path::parse("foo[-1].a").unwrap().get_all(&tree),
        vec![Value::Int(2)]
    );
    assert_eq!(
        Path::parse("foo[-3].a").unwrap().get_all(&tree),
        Vec::<Value>::new()
    );
}

#[test]
fn array_elements_are_addressable() {
    let tree = demo_tree();
    assert_eq!(
        Path::parse("arr[1]").unwrap().get_all(&tree),
        vec![Value::Long(20)]
    );
    assert_eq!(
        Path::parse("arr[]").unwrap().get_all(&tree),
        vec![Value::Long(10), Value::Long(20)]
    );
}

#[test]
fn inapplicable_accessors_select_nothing() {
    let tree = demo_tree();
    assert_eq!(
        Path::parse("bar[0]").unwrap().get_all(&tree),
        Vec::<Value>::new()
    );
    assert_eq!(
        Path::parse("missing.key").unwrap().get_all(&tree),
        Vec::<Value>::new()
    );
    assert_eq!(
        Path::parse("foo.a").unwrap().get_all(&tree),
        Vec::<Value>::new()
    );
}

#[test]
fn composition_law() {
    let tree = demo_tree();
    let p1 = Path::parse("foo[]").unwrap();
    let p2 = Path::parse("b.c").unwrap();

    let composed = p1.concat(&p2).unwrap().get_all(&tree);
    let flat: Vec<Value> = p1
        .get_all(&tree)
        .iter()
        .flat_map(|node| p2.get_all(node))
        .collect();
    assert_eq!(composed, flat);
}

#[test]
fn set_all_replaces_every_match() {
    let mut tree = demo_tree();
    let path = Path::parse("foo[].a").unwrap();

    let count = path.set_all(&mut tree, &Value::Int(99));
    assert_eq!(count, 2);
    assert_eq!(
        path.get_all(&tree),
        vec![Value::Int(99), Value::Int(99)]
    );

    let expected = from_str(
        r#"{foo: [{a: 99, b: {c: 42}}, {a: 99, b: {c: 0}}], bar: "Hello, world!", arr: [L; 10l, 20l]}"#,
    )
    .unwrap();
    assert_eq!(tree, expected);
}

#[test]
fn set_all_with_trailing_filter_picks_parents() {
    let mut tree = demo_tree();
    // Replace only the b compounds whose c is 0.
    let path = Path::parse("foo[].b{c: 0}").unwrap();
    let count = path.set_all(&mut tree, &from_str("{c: 1}").unwrap());
    assert_eq!(count, 1);

    assert_eq!(
        Path::parse("foo[].b.c").unwrap().get_all(&tree),
        vec![Value::Int(42), Value::Int(1)]
    );
}

#[test]
fn set_all_on_missing_branches_is_a_no_op() {
    let mut tree = demo_tree();
    let before = tree.clone();
    let count = Path::parse("foo[].missing.deep").unwrap().set_all(&mut tree, &Value::Int(1));
    assert_eq!(count, 0);
    assert_eq!(tree, before);
}

#[test]
fn set_array_elements() {
    let mut tree = demo_tree();
    let count = Path::parse("arr[0]").unwrap().set_all(&mut tree, &Value::Long(11));
    assert_eq!(count, 1);
    assert_eq!(
        tree.as_compound().unwrap().get("arr"),
        Some(&Value::LongArray(vec![11, 20]))
    );

    // A mismatched element type mutates nothing.
    let count = Path::parse("arr[0]").unwrap().set_all(&mut tree, &Value::Int(1));
    assert_eq!(count, 0);
}

#[test]
fn delete_all_removes_keys_and_elements() {
    let mut tree = demo_tree();
    let path = Path::parse("foo[].b{c: 0}").unwrap();
    let count = path.delete_all(&mut tree);
    assert_eq!(count, 1);

    let expected = from_str(
        r#"{foo: [{a: 1, b: {c: 42}}, {a: 2}], bar: "Hello, world!", arr: [L; 10l, 20l]}"#,
    )
    .unwrap();
    assert_eq!(tree, expected);
}

#[test]
fn delete_all_handles_shifting_indices() {
    let mut tree = from_str("{l: [1, 2, 3], arr: [I; 9, 8, 7]}").unwrap();

    let count = Path::parse("l[]").unwrap().delete_all(&mut tree);
    assert_eq!(count, 3);
    assert!(tree.as_compound().unwrap().get("l").unwrap().as_list().unwrap().is_empty());

    let count = Path::parse("arr[]").unwrap().delete_all(&mut tree);
    assert_eq!(count, 3);
    assert_eq!(
        tree.as_compound().unwrap().get("arr"),
        Some(&Value::IntArray(vec![]))
    );
}

#[test]
fn delete_then_get_is_empty() {
    let mut tree = demo_tree();
    let path = Path::parse("foo[].a").unwrap();
    path.delete_all(&mut tree);
    assert_eq!(path.get_all(&tree), Vec::<Value>::new());
}

#[test]
fn find_searches_pre_order() {
    let tree = demo_tree();

    let path = Path::parse("c").unwrap();
    assert_eq!(path.find(&tree), Some(Value::Int(42)));

    let path = Path::parse("a").unwrap();
    assert_eq!(path.find(&tree), Some(Value::Int(1)));

    let path = Path::parse("nope").unwrap();
    assert_eq!(path.find(&tree), None);
}

#[test]
fn builders_match_parsing() {
    let mut filter = Compound::new();
    filter.insert("x", Value::Int(1));

    let built = Path::new()
        .key("foo")
        .all()
        .filter(filter)
        .unwrap()
        .key("bar")
        .index(-1);
    assert_eq!(built, Path::parse("foo[{x: 1}].bar[-1]").unwrap());
}
