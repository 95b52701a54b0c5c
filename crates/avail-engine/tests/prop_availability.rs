//! Property-based tests for date normalization, range status and window search.
//!
//! These check invariants that must hold for any period list, including lists
//! with heavily overlapping and nested periods.

use avail_engine::gaps::next_window_of;
use avail_engine::{
    next_available_window, normalize_date, range_status, AvailabilityPeriod, Registry, Status,
    UnitAvailability,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Available),
        Just(Status::Pending),
        Just(Status::Hold),
        Just(Status::Sold),
    ]
}

/// A day in 2026, as an offset from Jan 1.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..365).prop_map(|offset| base() + Duration::days(offset))
}

fn arb_period() -> impl Strategy<Value = AvailabilityPeriod> {
    (arb_date(), 0i64..90, arb_status())
        .prop_map(|(start, len, status)| AvailabilityPeriod::new(start, start + Duration::days(len), status))
}

fn arb_periods() -> impl Strategy<Value = Vec<AvailabilityPeriod>> {
    prop::collection::vec(arb_period(), 0..12)
}

/// Valid dates rendered in one of several accepted layouts.
fn arb_date_text() -> impl Strategy<Value = String> {
    (1000i32..=9999, 1u32..=12, 1u32..=28, 0usize..4).prop_map(|(y, m, d, layout)| match layout {
        0 => format!("{:04}-{:02}-{:02}", y, m, d),
        1 => format!("{}/{}/{:04}", m, d, y),
        2 => format!("{:04}/{}/{}", y, m, d),
        _ => format!("{:04}-{:02}-{:02}T08:00:00Z", y, m, d),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

fn registry_with(periods: Vec<AvailabilityPeriod>) -> Registry {
    [UnitAvailability {
        unit_id: "U".to_string(),
        periods,
        last_updated: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }]
    .into_iter()
    .collect()
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Normalization is idempotent
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn normalize_is_idempotent(text in arb_date_text()) {
        let once = normalize_date(&text);
        prop_assert!(once.is_some(), "valid date rejected: {}", text);
        let twice = once.as_deref().and_then(normalize_date);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalize_never_panics_on_arbitrary_text(text in ".{0,24}") {
        let once = normalize_date(&text);
        let twice = once.as_deref().and_then(normalize_date);
        prop_assert_eq!(once, twice);
    }
}

// ---------------------------------------------------------------------------
// Property 2: Range status is the maximum severity of overlapping periods
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn any_overlapping_sold_period_forces_sold(
        periods in arb_periods(),
        sold in arb_period(),
        query_start in arb_date(),
        query_len in 0i64..60,
    ) {
        let query_end = query_start + Duration::days(query_len);
        let sold = AvailabilityPeriod { status: Status::Sold, ..sold };
        let overlaps = sold.overlaps(query_start, query_end);

        let mut all = periods;
        all.push(sold);
        let registry = registry_with(all);

        let status = range_status(&registry, "U", query_start, query_end);
        if overlaps {
            prop_assert_eq!(status, Status::Sold);
        }
    }

    #[test]
    fn range_status_is_never_below_any_overlapping_period(
        periods in arb_periods(),
        query_start in arb_date(),
        query_len in 0i64..60,
    ) {
        let query_end = query_start + Duration::days(query_len);
        let registry = registry_with(periods.clone());
        let status = range_status(&registry, "U", query_start, query_end);

        for p in periods.iter().filter(|p| p.overlaps(query_start, query_end)) {
            prop_assert!(status >= p.status);
        }
        if status != Status::Available {
            prop_assert!(periods
                .iter()
                .any(|p| p.status == status && p.overlaps(query_start, query_end)));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: The next window is free of blocking periods and as early as possible
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn window_never_overlaps_a_blocking_period(
        periods in arb_periods(),
        search_from in arb_date(),
        days in 1u32..40,
    ) {
        let registry = registry_with(periods.clone());
        let window = next_window_of(&registry, "U", search_from, days).unwrap();

        prop_assert!(window.start_date >= search_from);
        prop_assert_eq!(
            (window.end_date - window.start_date).num_days(),
            i64::from(days) - 1
        );
        for p in periods.iter().filter(|p| p.status.is_blocking()) {
            prop_assert!(
                !p.overlaps(window.start_date, window.end_date),
                "window {:?} overlaps {:?}",
                window,
                p
            );
        }
    }

    #[test]
    fn no_earlier_start_would_have_fit(
        periods in arb_periods(),
        search_from in arb_date(),
    ) {
        let registry = registry_with(periods.clone());
        let window = next_available_window(&registry, "U", search_from).unwrap();

        let mut day = search_from;
        while day < window.start_date {
            let end = day + Duration::days(27);
            let blocked = periods
                .iter()
                .any(|p| p.status.is_blocking() && p.overlaps(day, end));
            prop_assert!(blocked, "a window starting {} was free", day);
            day += Duration::days(1);
        }
    }

    #[test]
    fn nested_blocking_periods_do_not_rewind_the_cursor(
        outer_start in arb_date(),
        outer_len in 40i64..120,
        inner_offset in 0i64..30,
        inner_len in 0i64..10,
        inner_status in prop_oneof![Just(Status::Sold), Just(Status::Hold)],
    ) {
        let outer_end = outer_start + Duration::days(outer_len);
        let inner_start = outer_start + Duration::days(inner_offset);
        let registry = registry_with(vec![
            AvailabilityPeriod::new(inner_start, inner_start + Duration::days(inner_len), inner_status),
            AvailabilityPeriod::new(outer_start, outer_end, Status::Sold),
        ]);

        let window = next_available_window(&registry, "U", outer_start).unwrap();

        prop_assert_eq!(window.start_date, outer_end + Duration::days(1));
    }
}
