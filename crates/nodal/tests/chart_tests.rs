mod common;

use chrono::NaiveDate;
use chrono_tz::Tz;
use common::{london, StubEphemeris};
use nodal::chart::{ChartCalculator, ChartOptions, ChartResponse, Sign};
use nodal::ephemeris::{HouseSystem, NodeConvention};
use nodal::time::{BirthMoment, ZoneSource};
use nodal::ChartError;
use std::sync::Arc;

fn moment() -> BirthMoment {
    let local = NaiveDate::from_ymd_opt(1990, 6, 15)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap();
    BirthMoment::new(local, "Europe/London".parse::<Tz>().unwrap(), ZoneSource::Resolved)
}

fn calculator(stub: StubEphemeris) -> ChartCalculator {
    ChartCalculator::new(Arc::new(stub), ChartOptions::default())
}

#[test]
fn test_compute_chart_placements() {
    let chart = calculator(StubEphemeris::with_equal_houses(195.0))
        .compute_chart(&moment(), &london())
        .unwrap();

    assert_eq!(chart.sun.sign, Sign::Gemini);
    assert!((chart.sun.degree_in_sign - 24.2).abs() < 1e-9);
    assert_eq!(chart.moon.sign, Sign::Aquarius);
    assert_eq!(chart.rising.sign, Sign::Libra);
    assert_eq!(chart.rising.house, None);

    // true node at 312.4: Aquarius, houses start at 195 -> house 4 spans [285, 315)
    assert_eq!(chart.north_node.sign, Sign::Aquarius);
    assert_eq!(chart.north_node.house, Some(4));
    assert_eq!(chart.south_node.sign, Sign::Leo);
    assert_eq!(chart.south_node.degree_in_sign, chart.north_node.degree_in_sign);
    assert_eq!(chart.south_node.house, Some(10));
}

#[test]
fn test_node_convention_is_selectable() {
    let calc = calculator(StubEphemeris::with_equal_houses(195.0));
    let true_chart = calc
        .compute_chart_with(&moment(), &london(), NodeConvention::True, HouseSystem::Placidus)
        .unwrap();
    let mean_chart = calc
        .compute_chart_with(&moment(), &london(), NodeConvention::Mean, HouseSystem::Placidus)
        .unwrap();

    assert_eq!(true_chart.node_convention, NodeConvention::True);
    assert_eq!(mean_chart.node_convention, NodeConvention::Mean);
    assert!((true_chart.north_node.longitude - 312.4).abs() < 1e-9);
    assert!((mean_chart.north_node.longitude - 313.9).abs() < 1e-9);
    // 313.9 sits in house 4 too; 315 is the next cusp
    assert_eq!(mean_chart.north_node.house, Some(4));
}

#[test]
fn test_south_node_is_antipodal_for_every_sign() {
    for index in 0..12 {
        let mut stub = StubEphemeris::with_equal_houses(0.0);
        stub.true_node = index as f64 * 30.0 + 11.0;
        let chart = calculator(stub).compute_chart(&moment(), &london()).unwrap();

        assert_eq!(chart.north_node.sign.index(), index);
        assert_eq!(chart.south_node.sign.index(), (index + 6) % 12);
        let north_house = chart.north_node.house.unwrap();
        assert_eq!(chart.south_node.house, Some(((north_house + 6 - 1) % 12) + 1));
    }
}

#[test]
fn test_wrapping_twelfth_house() {
    let mut stub = StubEphemeris::with_equal_houses(10.0);
    // cusp[11] = 340 > cusp[0] = 10
    for (node, want) in [(345.0, 12), (3.0, 12), (10.0, 1), (339.0, 11)] {
        stub.true_node = node;
        let chart = calculator(stub.clone()).compute_chart(&moment(), &london()).unwrap();
        assert_eq!(chart.north_node.house, Some(want), "node at {node}");
    }
}

#[test]
fn test_missing_cusps_leave_both_node_houses_undefined() {
    let mut stub = StubEphemeris::with_equal_houses(0.0);
    stub.cusps.clear();
    let chart = calculator(stub).compute_chart(&moment(), &london()).unwrap();

    assert_eq!(chart.north_node.house, None);
    assert_eq!(chart.south_node.house, None);
    assert_eq!(chart.sun.house, None);

    let response = ChartResponse::from(&chart);
    let json = serde_json::to_value(&response).unwrap();
    assert!(json["north_node"]["house"].is_null());
    assert!(json["south_node"]["house"].is_null());
}

#[test]
fn test_degenerate_cusps_leave_house_undefined() {
    let mut stub = StubEphemeris::with_equal_houses(0.0);
    stub.cusps = vec![0.0; 12];
    let chart = calculator(stub).compute_chart(&moment(), &london()).unwrap();
    assert_eq!(chart.north_node.house, None);
    assert_eq!(chart.south_node.house, None);
}

#[test]
fn test_ephemeris_failure_propagates() {
    let mut stub = StubEphemeris::with_equal_houses(0.0);
    stub.fail_houses = true;
    let err = calculator(stub).compute_chart(&moment(), &london()).unwrap_err();
    assert!(matches!(err, ChartError::EphemerisComputation(_)));
    assert!(err.to_string().contains("polar latitude"));
}

#[test]
fn test_compute_chart_is_deterministic() {
    let calc = calculator(StubEphemeris::with_equal_houses(123.456));
    let first = calc.compute_chart(&moment(), &london()).unwrap();
    let second = calc.compute_chart(&moment(), &london()).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&ChartResponse::from(&first)).unwrap(),
        serde_json::to_string(&ChartResponse::from(&second)).unwrap()
    );
}

#[test]
fn test_unnormalized_longitudes_are_reduced() {
    let mut stub = StubEphemeris::with_equal_houses(0.0);
    stub.sun = 84.2 + 720.0;
    stub.moon = -59.3;
    stub.true_node = 312.4 - 360.0;
    let chart = calculator(stub).compute_chart(&moment(), &london()).unwrap();

    assert_eq!(chart.sun.sign, Sign::Gemini);
    assert_eq!(chart.moon.sign, Sign::Aquarius);
    assert_eq!(chart.north_node.sign, Sign::Aquarius);
    for placement in [chart.sun, chart.moon, chart.rising, chart.north_node, chart.south_node] {
        assert!(placement.degree_in_sign >= 0.0 && placement.degree_in_sign < 30.0);
    }
}

#[test]
fn test_response_shape() {
    let chart = calculator(StubEphemeris::with_equal_houses(195.0))
        .compute_chart(&moment(), &london())
        .unwrap();
    let json = serde_json::to_value(ChartResponse::from(&chart)).unwrap();

    assert_eq!(json["sun_sign"], "Gemini");
    assert_eq!(json["moon_sign"], "Aquarius");
    assert_eq!(json["rising_sign"], "Libra");
    assert_eq!(json["north_node"]["sign"], "Aquarius");
    assert_eq!(json["north_node"]["degree"], 12.4);
    assert_eq!(json["north_node"]["house"], 4);
    assert_eq!(json["south_node"]["sign"], "Leo");
    assert_eq!(json["south_node"]["degree"], 12.4);
    assert_eq!(json["south_node"]["house"], 10);
}
