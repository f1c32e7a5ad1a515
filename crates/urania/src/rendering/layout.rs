//! Wheel geometry: ring radii and glyph placement.

use crate::ephemeris::time::normalize_degrees;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingKind {
    Signs,
    Houses,
    Bodies,
    Aspects,
}

/// A ring as fractions of the wheel radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingDefinition {
    pub kind: RingKind,
    pub radius_inner: f32,
    pub radius_outer: f32,
}

const RINGS: [RingDefinition; 4] = [
    RingDefinition {
        kind: RingKind::Signs,
        radius_inner: 0.85,
        radius_outer: 1.0,
    },
    RingDefinition {
        kind: RingKind::Houses,
        radius_inner: 0.76,
        radius_outer: 0.85,
    },
    RingDefinition {
        kind: RingKind::Bodies,
        radius_inner: 0.5,
        radius_outer: 0.76,
    },
    RingDefinition {
        kind: RingKind::Aspects,
        radius_inner: 0.0,
        radius_outer: 0.5,
    },
];

/// Concentric rings from the outside in, scaled to a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelLayout {
    pub radius: f32,
    pub rings: Vec<RingDefinition>,
}

impl WheelLayout {
    pub fn for_canvas(size: f32) -> Self {
        Self {
            radius: (size / 2.0 - 20.0).max(1.0),
            rings: RINGS.to_vec(),
        }
    }

    pub fn ring(&self, kind: RingKind) -> RingDefinition {
        self.rings
            .iter()
            .copied()
            .find(|r| r.kind == kind)
            .unwrap_or(RINGS[0])
    }

    pub fn inner(&self, kind: RingKind) -> f32 {
        self.radius * self.ring(kind).radius_inner
    }

    pub fn outer(&self, kind: RingKind) -> f32 {
        self.radius * self.ring(kind).radius_outer
    }

    pub fn at(&self, kind: RingKind, fraction_of_ring: f32) -> f32 {
        let ring = self.ring(kind);
        self.radius * (ring.radius_inner + (ring.radius_outer - ring.radius_inner) * fraction_of_ring)
    }
}

/// Screen angle (counter-clockwise from east) for an ecliptic longitude,
/// with the Ascendant fixed at 9 o'clock.
pub fn screen_angle(longitude: f64, ascendant: f64) -> f64 {
    normalize_degrees(180.0 + longitude - ascendant)
}

/// Display longitudes that keep glyphs at least `min_gap` apart.
///
/// Output is index-aligned with `longitudes`. Crowded runs are pushed
/// forward and then recentred on their true positions, never overlapping
/// the previous run. The result depends only on the input values.
pub fn spread_longitudes(longitudes: &[f64], min_gap: f64) -> Vec<f64> {
    let n = longitudes.len();
    if n < 2 {
        return longitudes.iter().map(|l| normalize_degrees(*l)).collect();
    }
    let gap = min_gap.min(360.0 / n as f64).max(0.0);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|a, b| {
        normalize_degrees(longitudes[*a])
            .total_cmp(&normalize_degrees(longitudes[*b]))
            .then(a.cmp(b))
    });

    // Start right after the widest empty arc so no run straddles the seam
    let mut start = 0;
    let mut widest = -1.0;
    for i in 0..n {
        let here = normalize_degrees(longitudes[order[i]]);
        let next = normalize_degrees(longitudes[order[(i + 1) % n]]);
        let arc = if i + 1 == n { next + 360.0 - here } else { next - here };
        if arc > widest {
            widest = arc;
            start = (i + 1) % n;
        }
    }
    order.rotate_left(start);

    let base = normalize_degrees(longitudes[order[0]]);
    let unwrapped: Vec<f64> = order
        .iter()
        .map(|i| base + normalize_degrees(longitudes[*i] - base))
        .collect();

    // Forward pass, recording runs of glyphs that touch
    let mut display = unwrapped.clone();
    let mut runs: Vec<(usize, usize)> = vec![(0, 0)];
    for k in 1..n {
        if display[k] < display[k - 1] + gap {
            display[k] = display[k - 1] + gap;
            if let Some(run) = runs.last_mut() {
                run.1 = k;
            }
        } else {
            runs.push((k, k));
        }
    }

    let mut floor = f64::NEG_INFINITY;
    for (first, last) in runs {
        let count = (last - first + 1) as f64;
        let true_mean: f64 = unwrapped[first..=last].iter().sum::<f64>() / count;
        let shown_mean: f64 = display[first..=last].iter().sum::<f64>() / count;
        let shift = (true_mean - shown_mean).max(floor - display[first]).min(0.0);
        for d in &mut display[first..=last] {
            *d += shift;
        }
        floor = display[last] + gap;
    }

    let mut out = vec![0.0; n];
    for (k, i) in order.iter().enumerate() {
        out[*i] = normalize_degrees(display[k]);
    }
    out
}
