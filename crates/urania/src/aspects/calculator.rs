use log::trace;

use crate::aspects::types::{Aspect, AspectPointPosition, AspectSettings, AspectType, PairCategory};
use crate::ephemeris::time::signed_delta;

/// Pairwise aspect detection.
///
/// Every unordered pair yields at most one aspect. When two types both fit,
/// the one with the smaller |orb| wins, and on an exact tie the type with the
/// smaller exact angle.
#[derive(Debug, Clone, Default)]
pub struct AspectDetector {
    settings: AspectSettings,
}

impl AspectDetector {
    pub fn new(settings: AspectSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AspectSettings {
        &self.settings
    }

    /// Aspects among all pairs of `points`, ordered by (first, second).
    pub fn detect(&self, points: &[AspectPointPosition]) -> Vec<Aspect> {
        let mut sorted: Vec<AspectPointPosition> = points.to_vec();
        sorted.sort_by(|a, b| a.point.cmp(&b.point));
        sorted.dedup_by(|a, b| a.point == b.point);

        let mut aspects = Vec::new();
        for i in 0..sorted.len() {
            for j in (i + 1)..sorted.len() {
                if let Some(aspect) = self.calculate_aspect(&sorted[i], &sorted[j]) {
                    aspects.push(aspect);
                }
            }
        }
        trace!("{} aspects among {} points", aspects.len(), sorted.len());
        aspects
    }

    /// Aspect between two points, oriented so `first < second`.
    pub fn calculate_aspect(&self, a: &AspectPointPosition, b: &AspectPointPosition) -> Option<Aspect> {
        if a.point == b.point {
            return None;
        }
        let (a, b) = if a.point < b.point { (a, b) } else { (b, a) };

        // a - b in (-180, 180]
        let delta = signed_delta(b.longitude, a.longitude);
        let separation = delta.abs();
        let category = PairCategory::of(a.point, b.point);

        let mut best: Option<(AspectType, f64, f64)> = None;
        for aspect_type in self.settings.enabled_types() {
            let max_orb = self.settings.max_orb(aspect_type, category);
            let orb = separation - aspect_type.angle();
            if orb.abs() > max_orb {
                continue;
            }
            match best {
                Some((_, best_orb, _)) if best_orb.abs() <= orb.abs() => {}
                _ => best = Some((aspect_type, orb, max_orb)),
            }
        }

        let (aspect_type, orb, max_orb) = best?;
        Some(Aspect {
            first: a.point,
            second: b.point,
            aspect_type,
            category,
            separation,
            orb,
            max_orb,
            is_applying: is_applying(delta, orb, a.speed - b.speed),
        })
    }
}

/// Applying when |orb| is shrinking: the separation moves towards the exact
/// angle. Exact aspects and pairs without relative motion are separating.
fn is_applying(delta: f64, orb: f64, relative_speed: f64) -> bool {
    let separation_rate = if delta < 0.0 {
        -relative_speed
    } else {
        relative_speed
    };
    orb * separation_rate < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::types::{AngleKind, AspectPoint};
    use crate::ephemeris::types::Body;

    fn pos(body: Body, longitude: f64, speed: f64) -> AspectPointPosition {
        AspectPointPosition {
            point: AspectPoint::Body(body),
            longitude,
            speed,
        }
    }

    #[test]
    fn test_trine_across_zero_aries() {
        let detector = AspectDetector::default();
        let aspect = detector
            .calculate_aspect(&pos(Body::Venus, 355.0, 1.2), &pos(Body::Mars, 117.0, 0.6))
            .unwrap();
        assert_eq!(aspect.aspect_type, AspectType::Trine);
        assert!((aspect.separation - 122.0).abs() < 1e-9);
        assert!((aspect.orb - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_orientation_is_canonical() {
        let detector = AspectDetector::default();
        let ab = detector
            .calculate_aspect(&pos(Body::Mars, 10.0, 0.5), &pos(Body::Sun, 100.0, 1.0))
            .unwrap();
        let ba = detector
            .calculate_aspect(&pos(Body::Sun, 100.0, 1.0), &pos(Body::Mars, 10.0, 0.5))
            .unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.first, AspectPoint::Body(Body::Sun));
    }

    #[test]
    fn test_applying_conjunction() {
        // Moon behind the Sun and faster: closing in
        let detector = AspectDetector::default();
        let aspect = detector
            .calculate_aspect(&pos(Body::Sun, 20.0, 1.0), &pos(Body::Moon, 15.0, 13.0))
            .unwrap();
        assert_eq!(aspect.aspect_type, AspectType::Conjunction);
        assert!(aspect.is_applying);

        let aspect = detector
            .calculate_aspect(&pos(Body::Sun, 20.0, 1.0), &pos(Body::Moon, 25.0, 13.0))
            .unwrap();
        assert!(!aspect.is_applying);
    }

    #[test]
    fn test_applying_opposition_below_exact() {
        // Separation 176 and widening towards 180
        let detector = AspectDetector::default();
        let aspect = detector
            .calculate_aspect(&pos(Body::Sun, 0.0, 1.0), &pos(Body::Mars, 184.0, 0.5))
            .unwrap();
        assert_eq!(aspect.aspect_type, AspectType::Opposition);
        assert!((aspect.orb + 4.0).abs() < 1e-9);
        assert!(aspect.is_applying);

        // Separation 176 and narrowing away from 180
        let aspect = detector
            .calculate_aspect(&pos(Body::Sun, 0.0, 1.0), &pos(Body::Mars, 176.0, 0.5))
            .unwrap();
        assert!(!aspect.is_applying);
    }

    #[test]
    fn test_stationary_pair_is_separating() {
        let detector = AspectDetector::default();
        let aspect = detector
            .calculate_aspect(&pos(Body::Jupiter, 10.0, 0.1), &pos(Body::Saturn, 100.0, 0.1))
            .unwrap();
        assert_eq!(aspect.aspect_type, AspectType::Square);
        assert!(!aspect.is_applying);
    }

    #[test]
    fn test_overlapping_orbs_keep_closest_type() {
        let mut settings = AspectSettings::default();
        settings.orb_overrides.insert(AspectType::Sextile, 20.0);
        settings.orb_overrides.insert(AspectType::Square, 20.0);
        let detector = AspectDetector::new(settings);
        let aspect = detector
            .calculate_aspect(&pos(Body::Venus, 0.0, 1.0), &pos(Body::Mars, 80.0, 0.5))
            .unwrap();
        assert_eq!(aspect.aspect_type, AspectType::Square);

        // Exactly midway: the smaller exact angle wins
        let aspect = detector
            .calculate_aspect(&pos(Body::Venus, 0.0, 1.0), &pos(Body::Mars, 75.0, 0.5))
            .unwrap();
        assert_eq!(aspect.aspect_type, AspectType::Sextile);
    }

    #[test]
    fn test_outer_pair_orb_shrinks() {
        let detector = AspectDetector::default();
        // 6.5 from a square: inside 7, outside 7 * 0.75
        assert!(detector
            .calculate_aspect(&pos(Body::Uranus, 0.0, 0.01), &pos(Body::Neptune, 96.5, 0.01))
            .is_none());
        assert!(detector
            .calculate_aspect(&pos(Body::Mars, 0.0, 0.5), &pos(Body::Neptune, 96.5, 0.01))
            .is_some());
    }

    #[test]
    fn test_detect_one_record_per_pair() {
        let mut settings = AspectSettings {
            include_minor: true,
            ..Default::default()
        };
        for t in AspectType::ALL {
            settings.orb_overrides.insert(t, 30.0);
        }
        let detector = AspectDetector::new(settings);
        let points = vec![
            pos(Body::Sun, 0.0, 1.0),
            pos(Body::Moon, 52.0, 13.0),
            pos(Body::Mercury, 101.0, 1.5),
            AspectPointPosition {
                point: AspectPoint::Angle(AngleKind::Ascendant),
                longitude: 170.0,
                speed: 360.0,
            },
        ];
        let aspects = detector.detect(&points);
        let mut pairs: Vec<_> = aspects.iter().map(|a| (a.first, a.second)).collect();
        let before = pairs.len();
        pairs.dedup();
        assert_eq!(before, pairs.len());
        assert!(aspects.iter().all(|a| a.first < a.second));
    }
}
