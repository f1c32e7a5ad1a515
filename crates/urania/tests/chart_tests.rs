use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use std::sync::Arc;
use urania::aspects::AspectPoint;
use urania::houses::{HouseAssigner, HouseSystemFailure};
use urania::western::ZodiacPosition;
use urania::{
    calculate_chart, BirthInput, Body, ChartConfig, ChartEngine, ChartError, ChartResult,
    FixedEphemeris, HouseSystem, NodeMode, ZodiacSign,
};

fn new_york(latitude: f64) -> BirthInput {
    let local = NaiveDate::from_ymd_opt(1990, 4, 15)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap();
    let edt = FixedOffset::west_opt(4 * 3600).unwrap();
    BirthInput::from_local(local, edt, latitude, -74.0060, Some("New York".to_string())).unwrap()
}

fn placidus() -> ChartConfig {
    ChartConfig {
        house_system: HouseSystem::Placidus,
        ..Default::default()
    }
}

#[test]
fn test_new_york_1990_placidus() {
    let chart = calculate_chart(&new_york(40.7128), &placidus()).unwrap();
    assert_eq!(chart.body(Body::Sun).unwrap().sign(), ZodiacSign::Aries);
    assert_eq!(chart.cusps().len(), 12);
    assert_eq!(chart.house_system_used(), HouseSystem::Placidus);
    assert!(!chart.fallback_occurred());
    assert!(chart.fallback().is_none());
    assert_eq!(chart.solar_set().sun_sign, ZodiacSign::Aries);
    assert_eq!(chart.ephemeris(), "analytic");
}

#[test]
fn test_lat_80_falls_back_to_equal() {
    let chart = calculate_chart(&new_york(80.0), &placidus()).unwrap();
    assert_eq!(chart.house_system_requested(), HouseSystem::Placidus);
    assert_eq!(chart.house_system_used(), HouseSystem::Equal);
    assert!(chart.fallback_occurred());
    let fallback = chart.fallback().unwrap();
    assert!(matches!(fallback.reason, HouseSystemFailure::PolarLatitude { .. }));
    assert_eq!(chart.cusps().len(), 12);
    for (i, cusp) in chart.cusps().iter().enumerate() {
        assert_eq!(cusp.number as usize, i + 1);
    }
}

#[test]
fn test_year_outside_range_is_rejected() {
    let instant = Utc.with_ymd_and_hms(1500, 6, 1, 12, 0, 0).unwrap();
    let input = BirthInput::new(instant, 40.7128, -74.006, None).unwrap();
    match calculate_chart(&input, &ChartConfig::default()) {
        Err(ChartError::EphemerisRangeExceeded { instant: got, .. }) => assert_eq!(got, instant),
        other => panic!("expected range error, got {:?}", other.map(|c| c.cusps().len())),
    }
}

#[test]
fn test_invalid_coordinates_are_rejected() {
    let instant = Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap();
    assert!(matches!(
        BirthInput::new(instant, 91.0, 0.0, None),
        Err(ChartError::InvalidBirthInput { .. })
    ));
    assert!(matches!(
        BirthInput::new(instant, 0.0, -180.5, None),
        Err(ChartError::InvalidBirthInput { .. })
    ));
}

fn assert_chart_invariants(chart: &ChartResult) {
    let cusps: [f64; 12] = chart
        .cusp_longitudes()
        .try_into()
        .expect("twelve cusps");
    let assigner = HouseAssigner::new(&cusps);
    for body in chart.bodies() {
        assert!((0.0..360.0).contains(&body.longitude));
        assert_eq!(body.is_retrograde, body.speed < 0.0, "{}", body.body);
        assert_eq!(body.sign().index(), (body.longitude / 30.0).floor() as usize % 12);
        let p = body.position;
        let rebuilt = p.sign.start_longitude()
            + p.degree as f64
            + p.minute as f64 / 60.0
            + p.second as f64 / 3600.0;
        assert!((rebuilt - body.longitude).abs() <= 1.0 / 3600.0 + 1e-9);
        assert_eq!(body.house, assigner.house_of(body.longitude));
    }
    for (i, a) in chart.aspects().iter().enumerate() {
        assert!(a.first < a.second);
        assert!(a.orb.abs() <= a.max_orb + 1e-12);
        for b in &chart.aspects()[i + 1..] {
            assert!((a.first, a.second) != (b.first, b.second));
        }
    }
}

#[test]
fn test_invariants_across_dates_and_systems() {
    let places = [(40.7128, -74.006), (-33.87, 151.21), (64.14, -21.94), (0.0, 0.0)];
    let instants = [
        Utc.with_ymd_and_hms(1850, 2, 3, 4, 5, 6).unwrap(),
        Utc.with_ymd_and_hms(1969, 7, 20, 20, 17, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap(),
    ];
    for system in HouseSystem::all() {
        for (lat, lon) in places {
            for instant in instants {
                let input = BirthInput::new(instant, lat, lon, None).unwrap();
                let config = ChartConfig {
                    house_system: system,
                    include_angles_in_aspects: true,
                    include_minor_aspects: true,
                    ..Default::default()
                };
                let chart = calculate_chart(&input, &config).unwrap();
                assert_chart_invariants(&chart);
            }
        }
    }
}

#[test]
fn test_node_options_control_bodies() {
    let input = new_york(40.7128);
    let none = ChartConfig {
        include_nodes: NodeMode::None,
        include_chiron: false,
        include_lilith: false,
        ..Default::default()
    };
    let chart = calculate_chart(&input, &none).unwrap();
    assert_eq!(chart.bodies().len(), 10);
    assert!(chart.body(Body::SouthNode).is_none());

    let chart = calculate_chart(&input, &ChartConfig::default()).unwrap();
    let north = chart.body(Body::MeanNode).unwrap();
    let south = chart.body(Body::SouthNode).unwrap();
    let expected = (north.longitude + 180.0) % 360.0;
    assert!((south.longitude - expected).abs() < 1e-9);
    assert_eq!(south.speed, north.speed);
}

#[test]
fn test_solar_set_counts_hard_sun_aspects() {
    // Sun at 10 Aries; Moon square, Mars opposite, Venus trine
    let eph = FixedEphemeris::new()
        .with_body(Body::Sun, 10.0, 0.98)
        .with_body(Body::Moon, 100.0, 13.0)
        .with_body(Body::Mercury, 25.0, 1.4)
        .with_body(Body::Venus, 130.0, 1.2)
        .with_body(Body::Mars, 190.0, 0.6)
        .with_body(Body::Jupiter, 45.0, 0.2)
        .with_body(Body::Saturn, 295.0, 0.05)
        .with_body(Body::Uranus, 305.0, 0.03)
        .with_body(Body::Neptune, 245.0, 0.01)
        .with_body(Body::Pluto, 226.0, -0.02);
    let engine = ChartEngine::new(Arc::new(eph));
    let config = ChartConfig {
        house_system: HouseSystem::WholeSign,
        include_chiron: false,
        include_lilith: false,
        include_nodes: NodeMode::None,
        ..Default::default()
    };
    let chart = engine.calculate(&new_york(40.7128), &config).unwrap();
    let solar = chart.solar_set();
    assert_eq!(solar.sun_sign, ZodiacSign::Aries);
    assert_eq!(solar.aspect_summary.squares, 1);
    assert_eq!(solar.aspect_summary.oppositions, 1);
    assert_eq!(solar.aspect_summary.total, 2);
    assert!(solar
        .hard_aspects
        .iter()
        .all(|a| a.involves(AspectPoint::Body(Body::Sun))));

    let fifth = chart.cusp(5).unwrap().sign();
    assert_eq!(solar.fifth_house_sign, fifth);
    assert_eq!(
        solar.interpretation_key,
        format!("Aries_{}_2", fifth.name())
    );
    assert!(solar.sun_position.starts_with("10°00'00\" Aries in house "));
}

#[test]
fn test_chart_round_trips_through_json() {
    let chart = calculate_chart(&new_york(40.7128), &ChartConfig::default()).unwrap();
    let json = chart.to_json().unwrap();
    assert!(json.contains("\"house_system_used\": \"placidus\""));
    let back: ChartResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.bodies().len(), chart.bodies().len());
    assert_eq!(back.solar_set().interpretation_key, chart.solar_set().interpretation_key);
    assert_eq!(back.aspects().len(), chart.aspects().len());
    for (a, b) in back.cusp_longitudes().iter().zip(chart.cusp_longitudes()) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn test_formatted_position() {
    let p = ZodiacPosition::from_longitude(15.0 + 32.0 / 60.0 + 45.0 / 3600.0);
    assert_eq!(p.formatted(), "15°32'45\" Aries");
}
