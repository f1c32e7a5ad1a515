use crate::ephemeris::time::normalize_degrees;
use crate::houses::angles::arc_forward;

/// Maps longitudes onto the houses delimited by a cusp set.
///
/// House `n` covers `[cusp_n, cusp_n+1)` in the direction of increasing
/// longitude. A longitude equal to a cusp belongs to the house that starts
/// there. Every longitude maps to exactly one house.
#[derive(Debug, Clone, Copy)]
pub struct HouseAssigner<'a> {
    cusps: &'a [f64; 12],
}

impl<'a> HouseAssigner<'a> {
    pub fn new(cusps: &'a [f64; 12]) -> Self {
        Self { cusps }
    }

    /// House number in 1..=12.
    pub fn house_of(&self, longitude: f64) -> u8 {
        let lon = normalize_degrees(longitude);
        let mut best = 0usize;
        let mut best_key = (f64::INFINITY, true);
        for i in 0..12 {
            let offset = arc_forward(self.cusps[i], lon);
            // An empty house cannot contain anything; prefer its successor.
            let empty = arc_forward(self.cusps[i], self.cusps[(i + 1) % 12]) == 0.0;
            let key = (offset, empty);
            if key.0 < best_key.0 || (key.0 == best_key.0 && !key.1 && best_key.1) {
                best = i;
                best_key = key;
            }
        }
        best as u8 + 1
    }
}
