use std::hint::black_box;
use std::sync::Arc;

use bandwatch::StockView;
use bandwatch::core::{
    EventIndex, HugEvent, PricePoint, TickerSummary, TouchEvent, normalize_date_key,
};
use bandwatch::interaction::InteractionController;
use bandwatch::render::SeriesStyle;
use chrono::{Days, NaiveDate};
use criterion::{Criterion, criterion_group, criterion_main};

fn synthetic_summary(sessions: usize) -> TickerSummary {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid start date");
    let mut summary = TickerSummary {
        symbol: "BENCH".to_owned(),
        ..TickerSummary::default()
    };

    for i in 0..sessions {
        let date = start
            .checked_add_days(Days::new(i as u64))
            .expect("valid generated date")
            .format("%Y-%m-%d")
            .to_string();
        let close = 100.0 + (i as f64 * 0.37).sin() * 8.0;
        let touching = i % 11 == 0;
        let hugging = i % 17 == 0;
        summary.price_series.push(
            PricePoint::new(date.clone(), close)
                .with_bands(close + 6.0, close - 6.0)
                .with_touch(touching)
                .with_hug(hugging),
        );

        let window = if i % 2 == 0 {
            &mut summary.window_5
        } else {
            &mut summary.window_10
        };
        if touching {
            window.lower_touch_bounces.push(TouchEvent {
                touch_date: format!("{date}T00:00:00Z"),
                touch_price: close - 6.0,
                peak_price: Some(close + 2.0),
                trough_price: None,
                trading_days: Some(3),
                bounce_dollars: None,
                drop_dollars: None,
            });
        }
        if hugging && i >= 4 {
            window.upper_hug_pullbacks.push(HugEvent {
                hug_start_date: summary.price_series[i - 4].date.clone(),
                hug_end_date: date,
                hug_start_price: close + 5.5,
                hug_end_price: close + 5.8,
                peak_price: None,
                trough_price: Some(close - 3.0),
                peak_date: None,
                trough_date: None,
                trading_days: Some(5),
                bounce_dollars: None,
                drop_dollars: Some(-8.8),
            });
        }
    }
    summary
}

fn bench_normalize_mixed_dates(c: &mut Criterion) {
    let inputs = [
        "2024-01-05",
        "2024-01-05T14:30:00Z",
        "01/05/2024",
        "Fri, 05 Jan 2024 00:00:00 GMT",
        "1704412800000",
    ];
    c.bench_function("normalize_mixed_dates", |b| {
        b.iter(|| {
            for input in inputs {
                let _ = normalize_date_key(black_box(input)).expect("normalize");
            }
        })
    });
}

fn bench_extract_events_5y(c: &mut Criterion) {
    let summary = synthetic_summary(1_260);
    c.bench_function("extract_events_5y", |b| {
        b.iter(|| {
            let _ = EventIndex::extract(black_box(&summary)).expect("extract");
        })
    });
}

fn bench_stock_view_5y(c: &mut Criterion) {
    let summary = Arc::new(synthetic_summary(1_260));
    c.bench_function("stock_view_5y", |b| {
        b.iter(|| {
            let _ = StockView::build(Arc::clone(black_box(&summary)), SeriesStyle::default())
                .expect("view");
        })
    });
}

fn bench_hover_sweep(c: &mut Criterion) {
    let summary = synthetic_summary(1_260);
    let mut controller =
        InteractionController::new(summary.price_series, 1_920.0).expect("controller");
    controller.set_hover_callback(|hover| {
        let _ = black_box(hover);
    });

    c.bench_function("hover_sweep_1920px", |b| {
        b.iter(|| {
            for x in 0..1_920 {
                controller.pointer_move(black_box(x as f64));
            }
            controller.pointer_leave();
        })
    });
}

criterion_group!(
    benches,
    bench_normalize_mixed_dates,
    bench_extract_events_5y,
    bench_stock_view_5y,
    bench_hover_sweep
);
criterion_main!(benches);
