use proptest::prelude::*;
use tagged_union::{cast, cast_mut, check, construct, tagged_union, CastError, Tagged};

#[tagged_union]
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Bool(bool),
    Int(i32),
    Text(String),
    Pair { left: i32, right: i32 },
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::Int),
        ".*".prop_map(Value::Text),
        (any::<i32>(), any::<i32>()).prop_map(|(left, right)| Value::Pair(Pair { left, right })),
    ]
}

proptest! {
    #[test]
    fn constructed_tag_is_the_only_one_that_checks(value in value_strategy()) {
        let active = value.tag();
        for tag in ValueTag::ALL {
            prop_assert_eq!(value.check(tag), tag == active);
        }
        prop_assert_eq!(
            [value.is_bool(), value.is_int(), value.is_text(), value.is_pair()]
                .into_iter()
                .filter(|is| *is)
                .count(),
            1
        );
    }

    #[test]
    fn int_round_trip(i in any::<i32>()) {
        let value: Value = construct(i);
        prop_assert!(check::<i32, _>(&value));
        prop_assert_eq!(cast::<i32, _>(&value), Ok(&i));
        prop_assert_eq!(value.as_int(), Some(&i));
        prop_assert_eq!(value.into_int(), Ok(i));
    }

    #[test]
    fn text_round_trip(s in ".*") {
        let value = Value::from(s.clone());
        prop_assert_eq!(value.expect_text(), &s);
        prop_assert!(!check::<bool, _>(&value));
        prop_assert_eq!(String::try_from(value), Ok(s));
    }
}

#[test]
fn cast_under_wrong_tag_is_absent() {
    let value = Value::Int(7);
    assert_eq!(value.as_bool(), None);
    assert_eq!(value.as_text(), None);
    assert_eq!(value.as_pair(), None);
    assert_eq!(
        cast::<bool, _>(&value),
        Err(CastError {
            union: "Value",
            expected: "Bool",
            actual: "Int",
        })
    );
}

#[test]
fn cast_error_message() {
    let err = cast::<Pair, _>(&Value::Bool(true)).unwrap_err();
    assert_eq!(err.to_string(), "`Value` holds `Bool`, not `Pair`");
}

#[test]
#[should_panic(expected = "`Value` holds `Text`, not `Int`")]
fn expect_under_wrong_tag_panics() {
    let mut value = Value::Text("seven".to_owned());
    *value.expect_int_mut() += 1;
}

#[test]
fn cast_mut_writes_through() {
    let mut value = Value::Pair(Pair { left: 1, right: 2 });
    cast_mut::<Pair, _>(&mut value).unwrap().right = 20;
    value.as_pair_mut().unwrap().left = 10;
    assert_eq!(value, Value::Pair(Pair { left: 10, right: 20 }));
    assert!(cast_mut::<i32, _>(&mut value).is_err());
    assert!(value.as_int_mut().is_none());
}

#[test]
fn into_gives_the_union_back_on_mismatch() {
    let value = Value::Bool(false);
    let value = value.into_text().unwrap_err();
    assert_eq!(value, Value::Bool(false));
    assert_eq!(i32::try_from(value.clone()), Err(value));
}

#[test]
fn generic_code_over_tagged() {
    fn describe<U: Tagged>(value: &U) -> String {
        use tagged_union::TagSet;
        let tag = value.tag();
        format!("{}#{}:{}", U::NAME, tag.index(), tag.name())
    }

    assert_eq!(describe(&Value::Int(3)), "Value#1:Int");
    assert_eq!(describe(&Value::Pair(Pair { left: 0, right: 0 })), "Value#3:Pair");
    assert!(Tagged::check(&Value::Bool(true), ValueTag::Bool));
}

mod measure {
    use tagged_union::tagged_union;

    /// The same payload type under several tags: no conversions for `f64`.
    #[tagged_union]
    #[derive(Debug, PartialEq)]
    pub enum Measure {
        Meters(f64),
        Feet(f64),
        Label(String),
    }
}

#[test]
fn repeated_payload_type_is_reached_per_tag() {
    use measure::Measure;

    let meters = Measure::Meters(2.0);
    let feet = Measure::Feet(2.0);
    assert_eq!(meters.as_meters(), Some(&2.0));
    assert_eq!(meters.as_feet(), None);
    assert_eq!(feet.as_feet(), Some(&2.0));
    assert_ne!(meters, feet);
    assert!(check::<String, _>(&Measure::from("m".to_owned())));
}

mod tok {
    use tagged_union::tagged_union;

    #[tagged_union]
    #[derive(Debug)]
    pub enum Tok {
        r#Type(u8),
        Word(String),
    }
}

#[test]
fn raw_tag_names_drop_the_prefix() {
    use tok::{Tok, TokTag};

    assert_eq!(TokTag::r#Type.name(), "Type");
    assert_eq!(TokTag::Type.to_string(), "Type");
    assert!(Tok::Type(1).is_type());
    let alias: tok::TokType = 2;
    assert_eq!(Tok::from(alias).as_type(), Some(&2));
}

#[test]
#[should_panic(expected = "`Tok` holds `Word`, not `Type`")]
fn raw_tag_name_in_panic_message() {
    tok::Tok::Word("w".to_owned()).expect_type();
}
