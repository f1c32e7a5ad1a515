use chrono::{TimeZone, Utc};
use urania::ephemeris::time::signed_delta;
use urania::ephemeris::GeoLocation;
use urania::houses::{
    arc_forward, HouseAssigner, HouseFrame, HouseSystem, HouseSystemCalculator,
    HouseSystemFailure,
};

const OBLIQUITY: f64 = 23.4393;

fn frames() -> Vec<HouseFrame> {
    let mut frames = Vec::new();
    for lat in [-60.0, -35.5, -10.0, 0.0, 12.3, 40.7128, 51.5, 64.0] {
        for step in 0..24 {
            frames.push(HouseFrame::new(step as f64 * 15.0 + 3.7, lat, OBLIQUITY));
        }
    }
    frames
}

#[test]
fn test_every_system_is_defined_below_the_polar_circle() {
    let calc = HouseSystemCalculator::new();
    for frame in frames() {
        for system in HouseSystem::all() {
            let result = calc.compute(system, &frame);
            assert!(
                result.cusps.iter().all(|c| c.is_finite() && (0.0..360.0).contains(c)),
                "{} at {:?}",
                system,
                frame
            );
            assert!(urania::houses::systems::is_ordered(&result.cusps));
        }
    }
}

#[test]
fn test_quadrant_systems_anchor_on_the_angles() {
    let calc = HouseSystemCalculator::new();
    for frame in frames() {
        for system in [
            HouseSystem::Placidus,
            HouseSystem::Koch,
            HouseSystem::Campanus,
            HouseSystem::Regiomontanus,
            HouseSystem::Porphyry,
            HouseSystem::Topocentric,
            HouseSystem::Alcabitius,
        ] {
            let result = calc.compute(system, &frame);
            if result.fallback_occurred() {
                continue;
            }
            let asc_err = signed_delta(result.cusps[0], frame.ascendant()).abs();
            let mc_err = signed_delta(result.cusps[9], frame.midheaven()).abs();
            assert!(asc_err < 1e-6, "{} asc off by {}", system, asc_err);
            assert!(mc_err < 1e-6, "{} mc off by {}", system, mc_err);
        }
    }
}

#[test]
fn test_placidus_at_lat_80_falls_back_to_equal() {
    let calc = HouseSystemCalculator::new();
    let frame = HouseFrame::new(123.0, 80.0, OBLIQUITY);
    let result = calc.compute(HouseSystem::Placidus, &frame);
    assert_eq!(result.system_used, HouseSystem::Equal);
    let fallback = result.fallback.as_ref().unwrap();
    assert_eq!(fallback.requested, HouseSystem::Placidus);
    assert!(matches!(fallback.reason, HouseSystemFailure::PolarLatitude { .. }));
    for i in 0..12 {
        let expected = frame.ascendant() + 30.0 * i as f64;
        assert!(signed_delta(expected, result.cusps[i]).abs() < 1e-9);
    }
}

#[test]
fn test_polar_failure_for_every_time_based_system() {
    let calc = HouseSystemCalculator::new();
    let frame = HouseFrame::new(40.0, -75.0, OBLIQUITY);
    for system in HouseSystem::all() {
        let result = calc.compute(system, &frame);
        if system.is_time_based() {
            assert!(result.fallback_occurred(), "{}", system);
        }
        assert_eq!(result.cusps.len(), 12);
    }
}

#[test]
fn test_whole_sign_cusps_start_signs() {
    let calc = HouseSystemCalculator::new();
    let frame = HouseFrame::new(200.0, 33.0, OBLIQUITY);
    let result = calc.compute(HouseSystem::WholeSign, &frame);
    let first = (frame.ascendant() / 30.0).floor() * 30.0;
    assert_eq!(result.cusps[0], first);
    for c in result.cusps {
        assert_eq!(c % 30.0, 0.0);
    }
}

#[test]
fn test_assignment_partitions_the_circle() {
    let calc = HouseSystemCalculator::new();
    for frame in frames().into_iter().step_by(7) {
        for system in HouseSystem::all() {
            let cusps = calc.compute(system, &frame).cusps;
            let assigner = HouseAssigner::new(&cusps);
            let mut lon = 0.0;
            while lon < 360.0 {
                let house = assigner.house_of(lon);
                assert!((1..=12).contains(&house));
                let start = cusps[house as usize - 1];
                let end = cusps[house as usize % 12];
                // lon lies in [start, end)
                assert!(arc_forward(start, lon) < arc_forward(start, end) || arc_forward(start, end) == 0.0);
                lon += 0.37;
            }
            for (i, cusp) in cusps.iter().enumerate() {
                assert_eq!(assigner.house_of(*cusp), i as u8 + 1);
            }
        }
    }
}

#[test]
fn test_frame_for_new_york_is_temperate() {
    let instant = Utc.with_ymd_and_hms(1990, 4, 15, 18, 30, 0).unwrap();
    let frame = HouseFrame::at(instant, GeoLocation { lat: 40.7128, lon: -74.006 });
    assert!(!frame.is_polar());
    assert!((frame.obliquity - 23.44).abs() < 0.01);
    let result = HouseSystemCalculator::new().compute(HouseSystem::Placidus, &frame);
    assert!(!result.fallback_occurred());
}

#[test]
fn test_parse_house_system_names() {
    assert_eq!("placidus".parse::<HouseSystem>().unwrap(), HouseSystem::Placidus);
    assert_eq!("whole-sign".parse::<HouseSystem>().unwrap(), HouseSystem::WholeSign);
    let err = "vedic".parse::<HouseSystem>().unwrap_err();
    assert!(err.to_string().contains("placidus"));
}
