//! Sign rulers for Western astrology.
//!
//! Maps zodiac signs to their planetary rulers (traditional and modern).

use crate::ephemeris::types::Body;
use crate::western::signs::ZodiacSign;

// Aries .. Pisces
const TRADITIONAL_RULERS: [Body; 12] = [
    Body::Mars,
    Body::Venus,
    Body::Mercury,
    Body::Moon,
    Body::Sun,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Saturn,
    Body::Jupiter,
];

const MODERN_RULERS: [Body; 12] = [
    Body::Mars,
    Body::Venus,
    Body::Mercury,
    Body::Moon,
    Body::Sun,
    Body::Mercury,
    Body::Venus,
    Body::Pluto,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
];

/// Get sign ruler; `modern` swaps in the outer planets for Scorpio,
/// Aquarius and Pisces.
pub fn sign_ruler(sign: ZodiacSign, modern: bool) -> Body {
    if modern {
        MODERN_RULERS[sign.index()]
    } else {
        TRADITIONAL_RULERS[sign.index()]
    }
}

/// Signs a body rules under either scheme.
pub fn ruled_signs(body: Body) -> Vec<ZodiacSign> {
    ZodiacSign::ALL
        .iter()
        .copied()
        .filter(|sign| {
            TRADITIONAL_RULERS[sign.index()] == body || MODERN_RULERS[sign.index()] == body
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_ruler_traditional() {
        assert_eq!(sign_ruler(ZodiacSign::Aries, false), Body::Mars);
        assert_eq!(sign_ruler(ZodiacSign::Cancer, false), Body::Moon);
        assert_eq!(sign_ruler(ZodiacSign::Leo, false), Body::Sun);
        assert_eq!(sign_ruler(ZodiacSign::Scorpio, false), Body::Mars);
    }

    #[test]
    fn test_sign_ruler_modern() {
        assert_eq!(sign_ruler(ZodiacSign::Scorpio, true), Body::Pluto);
        assert_eq!(sign_ruler(ZodiacSign::Aquarius, true), Body::Uranus);
        assert_eq!(sign_ruler(ZodiacSign::Pisces, true), Body::Neptune);
    }

    #[test]
    fn test_ruled_signs_merge_schemes() {
        assert_eq!(
            ruled_signs(Body::Mars),
            vec![ZodiacSign::Aries, ZodiacSign::Scorpio]
        );
        assert_eq!(
            ruled_signs(Body::Saturn),
            vec![ZodiacSign::Capricorn, ZodiacSign::Aquarius]
        );
        assert!(ruled_signs(Body::Chiron).is_empty());
    }
}
