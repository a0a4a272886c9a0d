mod common;

use bandwatch::core::EventIndex;
use bandwatch::extensions::{MarkerPosition, place_event_markers};
use bandwatch::render::{LOWER_EVENT_COLOR, SeriesStyle, UPPER_EVENT_COLOR};
use common::{five_points, hug, summary_with, touch};

#[test]
fn markers_anchor_to_the_touched_band() {
    let mut summary = summary_with(five_points());
    summary
        .window_5
        .upper_touch_pullbacks
        .push(touch("2024-01-03", 111.0));
    summary
        .window_10
        .lower_touch_bounces
        .push(touch("2024-01-04", 89.0));

    let index = EventIndex::extract(&summary).expect("extract");
    let markers = place_event_markers(&index, &summary.price_series, SeriesStyle::default());

    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].date, "2024-01-03");
    assert_eq!(markers[0].position, MarkerPosition::AboveBar);
    assert_eq!(markers[0].price, 110.0);
    assert_eq!(markers[0].text, "T5");
    assert_eq!(markers[0].color, UPPER_EVENT_COLOR);

    assert_eq!(markers[1].position, MarkerPosition::BelowBar);
    assert_eq!(markers[1].price, 90.0);
    assert_eq!(markers[1].text, "T10");
    assert_eq!(markers[1].color, LOWER_EVENT_COLOR);
}

#[test]
fn hugs_sort_ahead_of_touches_on_the_same_date() {
    let mut summary = summary_with(five_points());
    summary
        .window_5
        .lower_touch_bounces
        .push(touch("2024-01-05", 90.0));
    summary
        .window_10
        .lower_hug_bounces
        .push(hug("2024-01-02", "2024-01-05", 90.5, 91.0));

    let index = EventIndex::extract(&summary).expect("extract");
    let markers = place_event_markers(&index, &summary.price_series, SeriesStyle::default());

    let texts: Vec<_> = markers.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["H10", "T5"]);
    assert!(markers[0].priority > markers[1].priority);
}

#[test]
fn events_off_the_series_fall_back_to_event_price() {
    let mut summary = summary_with(five_points());
    summary
        .window_5
        .upper_touch_pullbacks
        .push(touch("2023-12-29", 118.25));

    let index = EventIndex::extract(&summary).expect("extract");
    let markers = place_event_markers(&index, &summary.price_series, SeriesStyle::default());

    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].price, 118.25);
}

#[test]
fn marker_ids_are_unique() {
    let mut summary = summary_with(five_points());
    for window in [&mut summary.window_5, &mut summary.window_10] {
        window.upper_touch_pullbacks.push(touch("2024-01-03", 110.0));
        window.lower_touch_bounces.push(touch("2024-01-03", 90.0));
        window
            .upper_hug_pullbacks
            .push(hug("2024-01-02", "2024-01-03", 109.0, 110.0));
    }

    let index = EventIndex::extract(&summary).expect("extract");
    let markers = place_event_markers(&index, &summary.price_series, SeriesStyle::default());
    let mut ids: Vec<_> = markers.iter().map(|m| m.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 6);
}
