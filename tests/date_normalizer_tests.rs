use bandwatch::DashError;
use bandwatch::core::{is_date_key, normalize_date_key, parse_date_key};
use chrono::NaiveDate;
use proptest::prelude::*;

#[test]
fn canonical_keys_are_returned_unchanged() {
    assert_eq!(normalize_date_key("2024-01-05").expect("key"), "2024-01-05");
    // Shape-only short circuit: no calendar validation, no timezone shift.
    assert_eq!(normalize_date_key("2024-13-45").expect("key"), "2024-13-45");
}

#[test]
fn iso_datetimes_normalize_in_utc() {
    assert_eq!(
        normalize_date_key("2024-01-05T14:30:00Z").expect("rfc3339"),
        "2024-01-05"
    );
    assert_eq!(
        normalize_date_key("2024-01-05T23:30:00-05:00").expect("offset"),
        "2024-01-06"
    );
    assert_eq!(
        normalize_date_key("2024-01-05T09:30:00.000").expect("naive"),
        "2024-01-05"
    );
}

#[test]
fn locale_and_js_date_strings_normalize() {
    assert_eq!(normalize_date_key("01/05/2024").expect("us"), "2024-01-05");
    assert_eq!(normalize_date_key("1/5/2024").expect("us short"), "2024-01-05");
    assert_eq!(
        normalize_date_key("1/5/2024, 9:30:00 AM").expect("locale datetime"),
        "2024-01-05"
    );
    assert_eq!(
        normalize_date_key("Fri, 05 Jan 2024 00:00:00 GMT").expect("utc string"),
        "2024-01-05"
    );
    assert_eq!(
        normalize_date_key("Fri Jan 05 2024").expect("date string"),
        "2024-01-05"
    );
    assert_eq!(
        normalize_date_key("January 5, 2024").expect("long month"),
        "2024-01-05"
    );
}

#[test]
fn js_to_string_offset_shifts_into_utc_day() {
    assert_eq!(
        normalize_date_key("Fri Jan 05 2024 21:00:00 GMT-0500 (Eastern Standard Time)")
            .expect("evening in new york"),
        "2024-01-06"
    );
    assert_eq!(
        normalize_date_key("Sat Jan 06 2024 01:00:00 GMT+0900 (Japan Standard Time)")
            .expect("early in tokyo"),
        "2024-01-05"
    );
    assert_eq!(
        normalize_date_key("Fri Jan 05 2024 09:30:00 GMT+0000 (Coordinated Universal Time)")
            .expect("utc"),
        "2024-01-05"
    );
    assert_eq!(
        normalize_date_key("Fri Jan 05 2024 21:00:00 GMT-0500").expect("no zone name"),
        "2024-01-06"
    );
}

#[test]
fn epoch_millis_normalize() {
    assert_eq!(
        normalize_date_key("1704412800000").expect("epoch"),
        "2024-01-05"
    );
}

#[test]
fn padded_keys_are_trimmed() {
    assert_eq!(normalize_date_key(" 2024-01-05 ").expect("trim"), "2024-01-05");
}

#[test]
fn unparseable_input_is_an_error() {
    for input in ["", "not a date", "2024/99/99", "yesterday"] {
        assert_eq!(
            normalize_date_key(input),
            Err(DashError::InvalidDate(input.to_owned())),
            "{input:?}"
        );
    }
}

#[test]
fn parse_date_key_returns_calendar_date() {
    assert_eq!(
        parse_date_key("2024-02-29").expect("leap"),
        NaiveDate::from_ymd_opt(2024, 2, 29).expect("date")
    );
    assert!(parse_date_key("2023-02-29").is_err());
}

proptest! {
    #[test]
    fn normalization_is_idempotent_for_keys(y in 1900u32..2100, m in 1u32..=12, d in 1u32..=28) {
        let key = format!("{y:04}-{m:02}-{d:02}");
        prop_assert!(is_date_key(&key));
        let once = normalize_date_key(&key).expect("key");
        prop_assert_eq!(&once, &key);
        prop_assert_eq!(normalize_date_key(&once).expect("again"), key);
    }
}
