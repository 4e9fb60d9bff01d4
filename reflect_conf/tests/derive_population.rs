//! End-to-end population of derived records.
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface configuration mistakes"
)]

use std::collections::{HashMap, HashSet};

use num_complex::{Complex32, Complex64};
use reflect_conf::{ReflectConf, ReflectConfError, SourceMap};
use rstest::rstest;

fn source(pairs: &[(&str, &str)]) -> SourceMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

#[derive(Debug, Default, ReflectConf)]
struct Layered {
    #[reflect_conf(transformer = "direct", conf = "tString", default = "abc")]
    string: String,
    #[reflect_conf(transformer = "diSlice", conf = "tSlice", default = "1.2|3.4|5.6|7.8")]
    slice: Vec<f32>,
    #[reflect_conf(transformer = "diMapStruct", conf = "tMap1")]
    members: HashSet<u32>,
    #[reflect_conf(transformer = "confMapIntString", conf = "tMap2", default = "1:a|2:b|3:c")]
    names: HashMap<i64, String>,
    #[reflect_conf(transformer = "direct", conf = "tBool")]
    flag: bool,
    #[reflect_conf(transformer = "timeDuration", conf = "tTimeStamp", default = "-12h")]
    stamp: i64,
}

#[rstest]
fn layered_sources_resolve_by_priority() {
    let highest = source(&[("tString", "xyz"), ("tBool", "t"), ("tTimeStamp", "-20h")]);
    let middle = source(&[("tMap1", "7|8|9"), ("tMap2", "7:x|8:y|9:z")]);
    let lowest = source(&[("tString", "opq"), ("tMap1", "1|2|3"), ("tTimeStamp", "-18h")]);

    let mut record = Layered::default();
    let before = chrono::Utc::now().timestamp();
    record
        .populate_from(true, [highest, middle, lowest])
        .expect("valid sources");
    let after = chrono::Utc::now().timestamp();

    assert_eq!(record.string, "xyz");
    assert_eq!(record.slice, vec![1.2, 3.4, 5.6, 7.8]);
    assert_eq!(record.members, HashSet::from([7, 8, 9]));
    assert_eq!(
        record.names,
        HashMap::from([(7, "x".to_owned()), (8, "y".to_owned()), (9, "z".to_owned())])
    );
    assert!(record.flag);
    let twenty_hours = 20 * 60 * 60;
    assert!((before - twenty_hours..=after - twenty_hours).contains(&record.stamp));
}

#[derive(Debug, Default, PartialEq, ReflectConf)]
struct Scalars {
    #[reflect_conf(transformer = "direct", conf = "f1")]
    f1: String,
    #[reflect_conf(transformer = "direct", conf = "f2")]
    f2: bool,
    #[reflect_conf(transformer = "direct", conf = "f3")]
    f3: isize,
    #[reflect_conf(transformer = "direct", conf = "f4")]
    f4: i8,
    #[reflect_conf(transformer = "direct", conf = "f5")]
    f5: i16,
    #[reflect_conf(transformer = "direct", conf = "f6")]
    f6: i32,
    #[reflect_conf(transformer = "direct", conf = "f7")]
    f7: i64,
    #[reflect_conf(transformer = "direct", conf = "f8")]
    f8: usize,
    #[reflect_conf(transformer = "direct", conf = "f9")]
    f9: u8,
    #[reflect_conf(transformer = "direct", conf = "f10")]
    f10: u16,
    #[reflect_conf(transformer = "direct", conf = "f11")]
    f11: u32,
    #[reflect_conf(transformer = "direct", conf = "f12")]
    f12: u64,
    #[reflect_conf(transformer = "direct", conf = "f13")]
    f13: f32,
    #[reflect_conf(transformer = "direct", conf = "f14")]
    f14: f64,
    #[reflect_conf(transformer = "direct", conf = "f15")]
    f15: Complex32,
    #[reflect_conf(transformer = "direct", conf = "f16")]
    f16: Complex64,
}

#[rstest]
fn direct_rule_covers_every_scalar_kind() {
    let conf = source(&[
        ("f1", "1"),
        ("f2", "1"),
        ("f3", "3"),
        ("f4", "4"),
        ("f5", "5"),
        ("f6", "6"),
        ("f7", "7"),
        ("f8", "8"),
        ("f9", "9"),
        ("f10", "10"),
        ("f11", "11"),
        ("f12", "12"),
        ("f13", "13"),
        ("f14", "14"),
        ("f15", "1+5i"),
        ("f16", "(1+6i)"),
    ]);
    let mut record = Scalars::default();
    record.populate_from(true, [conf]).expect("valid scalars");

    assert_eq!(
        record,
        Scalars {
            f1: "1".to_owned(),
            f2: true,
            f3: 3,
            f4: 4,
            f5: 5,
            f6: 6,
            f7: 7,
            f8: 8,
            f9: 9,
            f10: 10,
            f11: 11,
            f12: 12,
            f13: 13.0,
            f14: 14.0,
            f15: Complex32::new(1.0, 5.0),
            f16: Complex64::new(1.0, 6.0),
        }
    );
}

#[derive(Debug, Default, PartialEq, ReflectConf)]
struct Sequences {
    #[reflect_conf(transformer = "diSlice", conf = "strings")]
    strings: Vec<String>,
    #[reflect_conf(transformer = "diSliceComma", conf = "small")]
    small: Vec<i8>,
    #[reflect_conf(transformer = "diSliceSemicolon", conf = "wide")]
    wide: Vec<u64>,
    #[reflect_conf(transformer = "diSliceColon", conf = "complex")]
    complex: Vec<Complex64>,
    #[reflect_conf(transformer = "diMapStructComma", conf = "tags")]
    tags: HashSet<String>,
}

#[rstest]
fn sequence_and_set_rules_use_their_separator() {
    let conf = source(&[
        ("strings", "1|2|3"),
        ("small", "4,x,6"),
        ("wide", "12;13;14"),
        ("complex", "1+6i:1+7i"),
        ("tags", "a,b,a"),
    ]);
    let mut record = Sequences::default();
    record.populate_from(false, [conf]).expect("valid sequences");

    assert_eq!(
        record,
        Sequences {
            strings: vec!["1".to_owned(), "2".to_owned(), "3".to_owned()],
            small: vec![4, 6],
            wide: vec![12, 13, 14],
            complex: vec![Complex64::new(1.0, 6.0), Complex64::new(1.0, 7.0)],
            tags: HashSet::from(["a".to_owned(), "b".to_owned()]),
        }
    );
}

#[derive(Debug, Default, ReflectConf)]
struct FixedShapes {
    #[reflect_conf(transformer = "confMapIntString", conf = "f6")]
    names: HashMap<i64, String>,
    #[reflect_conf(transformer = "confMapIntUintMap", conf = "f7")]
    nested: HashMap<i64, HashSet<u64>>,
    #[reflect_conf(transformer = "confMapIntStrings", conf = "f8")]
    lists: HashMap<i64, Vec<String>>,
    #[reflect_conf(transformer = "confMapStringFloat", conf = "f9")]
    weights: HashMap<String, f32>,
}

#[rstest]
fn fixed_shape_rules_fill_maps() {
    let conf = source(&[
        ("f6", "1:a|2:b"),
        ("f7", "1:2|3|4;2:2|3|4"),
        ("f8", "1:a;b|2:c"),
        ("f9", "x:0.5|y:bad|z:2"),
    ]);
    let mut record = FixedShapes::default();
    record.populate_from(true, [conf]).expect("valid maps");

    assert_eq!(
        record.names,
        HashMap::from([(1, "a".to_owned()), (2, "b".to_owned())])
    );
    let members = HashSet::from([2, 3, 4]);
    assert_eq!(
        record.nested,
        HashMap::from([(1, members.clone()), (2, members)])
    );
    assert_eq!(
        record.lists.get(&1),
        Some(&vec!["a".to_owned(), "b".to_owned()])
    );
    assert_eq!(record.weights.len(), 2);
    assert_eq!(record.weights.get("z"), Some(&2.0));
}

#[derive(Debug, Default, ReflectConf)]
struct RawTags {
    #[reflect_conf(tag = r#"transformer:"direct"  conf:"port|PORT"   default:"8080" "#)]
    port: u16,
    #[reflect_conf(tag = r#"conf:"ignored""#)]
    no_rule: u16,
    #[reflect_conf(tag = r#"transformer:"direct" conf:"greeting" default:"say \"hi\"""#)]
    greeting: String,
    untagged: u16,
}

#[rstest]
fn raw_tags_are_parsed_at_population_time() {
    let conf = source(&[("PORT", "9000"), ("ignored", "5"), ("untagged", "6")]);
    let mut record = RawTags::default();
    record.populate_from(true, [conf]).expect("valid tags");

    assert_eq!(record.port, 9000);
    assert_eq!(record.no_rule, 0);
    assert_eq!(record.greeting, r#"say "hi""#);
    assert_eq!(record.untagged, 0);
}

#[derive(Debug, Default, ReflectConf)]
struct Mismatched {
    #[reflect_conf(transformer = "direct", conf = "ok")]
    ok: u8,
    #[reflect_conf(transformer = "diSlice", conf = "wrong")]
    wrong: u8,
    #[reflect_conf(transformer = "direct", conf = "later")]
    later: u8,
}

#[rstest]
fn first_error_aborts_the_call() {
    let conf = source(&[("ok", "1"), ("wrong", "2|3"), ("later", "4")]);
    let mut record = Mismatched::default();
    let err = record
        .populate_from(false, [conf])
        .expect_err("slice rule on a scalar");

    assert!(matches!(err, ReflectConfError::Resolve { .. }), "{err}");
    assert_eq!(err.context().record, "Mismatched");
    assert_eq!(err.context().field, "wrong");
    assert_eq!(record.ok, 1);
    assert_eq!(record.later, 0);
}

#[rstest]
fn fields_without_values_are_untouched() {
    let mut record = Mismatched {
        ok: 7,
        wrong: 8,
        later: 9,
    };
    record
        .populate_from(true, [source(&[("ok", "   ")])])
        .expect("nothing to convert");
    assert_eq!((record.ok, record.wrong, record.later), (7, 8, 9));
}
