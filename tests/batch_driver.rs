use eclipsis::eclipse::batch::{round_to, RecordStatus};
use eclipsis::eclipse::{run_batch, EclipseOutcome, EstimatorConfig, GeoPoint};
use eclipsis::eclipsis_errors::{EclipsisError, ErrorKind};
use hifitime::Unit;

mod common;
use common::{reference_epoch, window, ScriptedProvider};

/// Closest approach `10 × longitude` seconds after the reference epoch, no
/// contact north of 60°, Sun below the horizon south of -60°.
fn longitude_driven_provider() -> ScriptedProvider {
    ScriptedProvider::new(|observer, dt| {
        let shift = 10.0 * observer.longitude.into_inner();
        let d_min = if observer.latitude.into_inner() > 60.0 {
            0.03
        } else {
            0.0
        };
        (d_min * d_min + (2e-6 * (dt - shift)).powi(2)).sqrt()
    })
    .with_sun_altitude(|observer| {
        if observer.latitude.into_inner() < -60.0 {
            -20.0
        } else {
            30.0
        }
    })
}

fn points() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(40.4, -3.7),
        GeoPoint::new(64.1, -21.9),
        GeoPoint::new(-75.0, 120.0),
        GeoPoint::new(120.0, 0.0),
        GeoPoint::new(10.0, 150.0),
        GeoPoint::new(0.0, 181.0),
    ]
}

#[test]
fn outcomes_follow_input_order() {
    let provider = longitude_driven_provider();
    let window = window(60, 1000);
    let config = EstimatorConfig::default().with_horizon_gating(true);

    let points = points();
    let report = run_batch(&provider, &points, &window, &config, 4);

    assert_eq!(report.len(), points.len());
    for (outcome, point) in report.outcomes().iter().zip(&points) {
        assert_eq!(outcome.point, *point);
    }

    // maximum shifted by 10 s per degree of longitude
    for index in [0, 4] {
        let outcome = &report.outcomes()[index];
        let estimate = outcome.result.as_ref().unwrap().estimate().unwrap();
        let expected = reference_epoch() + 10.0 * outcome.point.longitude * Unit::Second;
        assert!((estimate.time_of_maximum - expected).abs() <= estimate.time_resolution);
        assert!(estimate.magnitude > 0.9);
    }

    assert!(matches!(
        report.outcomes()[1].result,
        Ok(EclipseOutcome::Visible(e)) if e.magnitude == 0.0
    ));
    assert_eq!(report.outcomes()[2].result, Ok(EclipseOutcome::NotVisible));
}

#[test]
fn failures_are_collected_without_stopping_the_batch() {
    let provider = longitude_driven_provider();
    let window = window(60, 200);
    let report = run_batch(&provider, &points(), &window, &EstimatorConfig::default(), 4);

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 2);
    assert_eq!(*failures[0].0, GeoPoint::new(120.0, 0.0));
    assert_eq!(*failures[0].1, EclipsisError::InvalidLatitude(120.0));
    assert_eq!(*failures[1].0, GeoPoint::new(0.0, 181.0));
    assert_eq!(*failures[1].1, EclipsisError::InvalidLongitude(181.0));

    let summary = report.summary();
    assert_eq!(summary.total, 6);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.rejected, 2);
    // the horizon gate is off: the southern observer is visible
    assert_eq!(summary.visible, 4);
    assert_eq!(summary.eclipsed, 3);
    assert_eq!(summary.not_visible, 0);

    let table = report
        .failures_table()
        .expect("two failed observers")
        .to_string();
    assert!(table.contains("invalid input"));
    assert!(table.contains("181"));
}

#[test]
fn records_round_magnitudes_and_format_times() {
    let provider = longitude_driven_provider();
    let window = window(60, 1000);
    let config = EstimatorConfig::default().with_horizon_gating(true);
    let report = run_batch(&provider, &points(), &window, &config, 2);

    let records = report.records();
    assert_eq!(records.len(), 6);

    let madrid = &records[0];
    assert_eq!((madrid.lat, madrid.long), (40.4, -3.7));
    assert_eq!(madrid.status, RecordStatus::Visible);
    let time = madrid.max_time_utc.as_deref().unwrap();
    assert!(time.starts_with("2026-08-12T1"), "{time}");
    assert!(time.ends_with('Z'));
    assert_eq!(time.len(), "2026-08-12T17:59:23.123Z".len());
    let raw = report.outcomes()[0].result.as_ref().unwrap().magnitude();
    assert_eq!(madrid.magnitude, Some(round_to(raw, 2)));

    assert_eq!(records[2].status, RecordStatus::NotVisible);
    assert_eq!(records[2].max_time_utc, None);
    assert_eq!(records[2].magnitude, Some(0.0));

    assert_eq!(records[3].status, RecordStatus::Failed(ErrorKind::InvalidInput));
    assert_eq!(records[3].magnitude, None);

    let table = report.results_table().to_string();
    for header in ["lat", "long", "max_time_utc", "magnitude", "status"] {
        assert!(table.contains(header));
    }
    assert!(table.contains("not visible"));
}

#[test]
fn oversized_decimals_keep_the_raw_magnitude() {
    let provider = longitude_driven_provider();
    let window = window(60, 200);
    let report = run_batch(&provider, &points()[..1], &window, &EstimatorConfig::default(), 400);

    let raw = report.outcomes()[0].result.as_ref().unwrap().magnitude();
    let magnitude = report.records()[0].magnitude.unwrap();
    assert!((0.0..=1.0).contains(&magnitude));
    assert_eq!(magnitude, raw);
}

#[test]
fn empty_batch() {
    let provider = ScriptedProvider::fixed(0.0);
    let report = run_batch(&provider, &[], &window(60, 10), &EstimatorConfig::default(), 4);

    assert!(report.is_empty());
    assert_eq!(report.failures().count(), 0);
    assert!(report.failures_table().is_none());
    assert_eq!(report.summary().total, 0);
}
