use dawg::{Dict, Error, Set, Value};

#[test]
fn rejects_empty_keys() {
    let err = Set::build(vec![Vec::new()], false).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn rejects_null_byte_in_key() {
    let err = Set::build(vec![b"foo\x00bar".to_vec(), b"bar".to_vec()], false).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn rejects_duplicate_keys() {
    let err = Set::build(vec![b"bar".to_vec(), b"bar".to_vec()], false).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn rejects_unsorted_input_under_sorted_true() {
    let err = Set::build(vec![b"foo".to_vec(), b"bar".to_vec()], true).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn sorted_iterable_builds_successfully() {
    let set = Set::build(
        vec![b"bar".to_vec(), b"foo".to_vec(), b"foobar".to_vec()],
        true,
    )
    .unwrap();
    assert!(set.contains(b"bar"));
    assert!(set.contains(b"foo"));
}

#[test]
fn empty_dictionary_has_no_members() {
    let set = Set::build(Vec::new(), false).unwrap();
    assert!(!set.contains(b"anything"));
    assert_eq!(set.keys(b"").count(), 0);
}

#[test]
fn utf8_byte_order_not_unicode_collation() {
    // A single katakana char (U+FF72, encodes to 3 UTF-8 bytes starting 0xEF)
    // sorts after a 4-byte supplementary-plane char (starting 0xF0) only by
    // raw byte value, which happens to disagree with Unicode codepoint
    // ordering for this particular pair. Building with `sorted = true` using
    // the UTF-8 byte order (not char/codepoint order) must succeed.
    let key1 = "\u{ff72}\u{ff9c}".as_bytes().to_vec();
    let key2 = "\u{10345}\u{1033f}".as_bytes().to_vec();
    assert!(key1 < key2);
    let set = Set::build(vec![key1, key2], true).unwrap();
    assert_eq!(set.keys(b"").count(), 2);
}

#[test]
fn dict_build_attaches_values() {
    let dict = Dict::build(vec![(b"f".to_vec(), Value::from(1u32))], false).unwrap();
    assert_eq!(u64::try_from(&dict.get(b"f").unwrap()).unwrap(), 1);
}
