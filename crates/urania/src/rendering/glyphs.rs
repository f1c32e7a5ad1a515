use std::str::FromStr;

use crate::aspects::types::{AngleKind, AspectPoint};
use crate::ephemeris::types::Body;
use crate::western::signs::ZodiacSign;

/// Marker drawn next to retrograde bodies.
pub const RETROGRADE_MARKER: &str = "℞";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    Body(Body),
    Sign(ZodiacSign),
    Angle(AngleKind),
    Descendant,
    ImumCoeli,
}

const BODY_GLYPHS: &[(Body, &str)] = &[
    (Body::Sun, "☉"),
    (Body::Moon, "☽"),
    (Body::Mercury, "☿"),
    (Body::Venus, "♀"),
    (Body::Mars, "♂"),
    (Body::Jupiter, "♃"),
    (Body::Saturn, "♄"),
    (Body::Uranus, "♅"),
    (Body::Neptune, "♆"),
    (Body::Pluto, "♇"),
    (Body::Chiron, "⚷"),
    (Body::Lilith, "⚸"),
    (Body::MeanNode, "☊"),
    (Body::TrueNode, "☊"),
    (Body::SouthNode, "☋"),
];

const SIGN_GLYPHS: [&str; 12] = ["♈", "♉", "♊", "♋", "♌", "♍", "♎", "♏", "♐", "♑", "♒", "♓"];

impl Glyph {
    /// Text drawn for this glyph.
    pub fn symbol(&self) -> &'static str {
        match self {
            Glyph::Body(body) => BODY_GLYPHS
                .iter()
                .find(|(b, _)| b == body)
                .map(|(_, g)| *g)
                .unwrap_or("?"),
            Glyph::Sign(sign) => SIGN_GLYPHS[sign.index()],
            Glyph::Angle(AngleKind::Ascendant) => "AC",
            Glyph::Angle(AngleKind::Midheaven) => "MC",
            Glyph::Descendant => "DC",
            Glyph::ImumCoeli => "IC",
        }
    }
}

impl From<Body> for Glyph {
    fn from(body: Body) -> Self {
        Glyph::Body(body)
    }
}

impl From<ZodiacSign> for Glyph {
    fn from(sign: ZodiacSign) -> Self {
        Glyph::Sign(sign)
    }
}

impl From<AspectPoint> for Glyph {
    fn from(point: AspectPoint) -> Self {
        match point {
            AspectPoint::Body(body) => Glyph::Body(body),
            AspectPoint::Angle(kind) => Glyph::Angle(kind),
        }
    }
}

impl FromStr for Glyph {
    type Err = ();

    /// Accepts display names ("Sun", "Mean Node", "Aries") and angle
    /// abbreviations ("As", "Mc", "Ds", "Ic").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "As" => return Ok(Glyph::Angle(AngleKind::Ascendant)),
            "Mc" => return Ok(Glyph::Angle(AngleKind::Midheaven)),
            "Ds" => return Ok(Glyph::Descendant),
            "Ic" => return Ok(Glyph::ImumCoeli),
            _ => {}
        }
        if let Some((body, _)) = BODY_GLYPHS.iter().find(|(b, _)| b.name().eq_ignore_ascii_case(s)) {
            return Ok(Glyph::Body(*body));
        }
        ZodiacSign::ALL
            .iter()
            .find(|sign| sign.name().eq_ignore_ascii_case(s))
            .map(|sign| Glyph::Sign(*sign))
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_body_has_a_symbol() {
        for (body, _) in BODY_GLYPHS {
            assert_ne!(Glyph::Body(*body).symbol(), "?");
        }
        assert_eq!(Glyph::from(Body::Sun).symbol(), "☉");
        assert_eq!(Glyph::from(ZodiacSign::Pisces).symbol(), "♓");
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("Mars".parse::<Glyph>(), Ok(Glyph::Body(Body::Mars)));
        assert_eq!("mean node".parse::<Glyph>(), Ok(Glyph::Body(Body::MeanNode)));
        assert_eq!("Leo".parse::<Glyph>(), Ok(Glyph::Sign(ZodiacSign::Leo)));
        assert_eq!("Mc".parse::<Glyph>(), Ok(Glyph::Angle(AngleKind::Midheaven)));
        assert!("Vulcan".parse::<Glyph>().is_err());
    }
}
