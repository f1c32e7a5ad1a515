use crate::aspects::types::{AngleKind, AspectPoint};
use crate::chart::types::ChartResult;
use crate::houses::arc_forward;
use crate::rendering::glyphs::{Glyph, RETROGRADE_MARKER};
use crate::rendering::layout::{screen_angle, spread_longitudes, RingKind, WheelLayout};
use crate::rendering::primitives::{Point, Shape, Stroke, TextAnchor};
use crate::rendering::spec::{ChartSpec, Layer};
use crate::rendering::visual_config::{RenderSettings, VisualConfig};
use crate::western::signs::ZodiacSign;

/// Builds a [`ChartSpec`] from a chart.
///
/// Reads only positional data and the input label, so equal charts always
/// produce equal specs regardless of when they were calculated.
#[derive(Debug, Clone)]
pub struct ChartSpecGenerator {
    settings: RenderSettings,
    visual: VisualConfig,
}

impl ChartSpecGenerator {
    pub fn new(settings: RenderSettings) -> Self {
        let visual = VisualConfig::for_theme(settings.theme);
        Self { settings, visual }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn generate(&self, chart: &ChartResult) -> ChartSpec {
        let size = self.settings.size;
        let mut spec = ChartSpec::new(size, size);
        spec.background_color = self.visual.background_color;
        spec.font_family = self.visual.font_family.clone();

        let layout = WheelLayout::for_canvas(size);
        let asc = chart.angles().ascendant.longitude;

        if self.settings.show_title {
            spec.title = Some(title(chart));
        }

        spec.layers.push(self.sign_layer(&layout, spec.center, asc));
        spec.layers.push(self.house_layer(chart, &layout, spec.center, asc));
        spec.layers.push(self.angle_layer(chart, &layout, spec.center, asc));
        if self.settings.show_aspect_lines {
            spec.layers.push(self.aspect_layer(chart, &layout, spec.center, asc));
        }
        spec.layers.push(self.body_layer(chart, &layout, spec.center, asc));
        spec
    }

    fn stroke(&self) -> Stroke {
        Stroke::solid(self.visual.stroke_color, self.visual.stroke_width)
    }

    fn text(&self, position: Point, content: String, size: f32, class: &str) -> Shape {
        Shape::Text {
            position,
            content,
            size,
            color: self.visual.text_color,
            anchor: TextAnchor::Middle,
            class: Some(class.to_string()),
        }
    }

    fn sign_layer(&self, layout: &WheelLayout, center: Point, asc: f64) -> Layer {
        let mut layer = Layer::new("signs");
        let inner = layout.inner(RingKind::Signs);
        let outer = layout.outer(RingKind::Signs);
        let glyph_radius = layout.at(RingKind::Signs, 0.5);

        for sign in ZodiacSign::ALL {
            let start = sign.start_longitude();
            layer.shapes.push(Shape::Sector {
                center,
                radius_inner: inner,
                radius_outer: outer,
                start_angle: screen_angle(start, asc),
                end_angle: screen_angle(start + 30.0, asc),
                fill: self.visual.sign_color(sign),
                stroke: Some(self.stroke()),
            });
            layer.shapes.push(self.text(
                center.polar(screen_angle(start + 15.0, asc), glyph_radius),
                Glyph::from(sign).symbol().to_string(),
                self.visual.sign_glyph_size,
                "sign",
            ));
        }
        layer
    }

    fn house_layer(&self, chart: &ChartResult, layout: &WheelLayout, center: Point, asc: f64) -> Layer {
        let mut layer = Layer::new("houses");
        let inner = layout.inner(RingKind::Houses);
        let aspect_edge = layout.outer(RingKind::Aspects);
        for radius in [inner, aspect_edge] {
            layer.shapes.push(Shape::Circle {
                center,
                radius,
                fill: None,
                stroke: Some(self.stroke()),
            });
        }

        let cusps = chart.cusp_longitudes();
        let number_radius = layout.at(RingKind::Houses, 0.5);
        let degree_radius = layout.at(RingKind::Bodies, 0.92);
        for (i, lon) in cusps.iter().enumerate() {
            let next = cusps[(i + 1) % cusps.len()];
            let angle = screen_angle(*lon, asc);
            layer.shapes.push(Shape::Line {
                from: center.polar(angle, aspect_edge),
                to: center.polar(angle, layout.outer(RingKind::Houses)),
                stroke: self.stroke(),
            });

            let middle = lon + arc_forward(*lon, next) / 2.0;
            layer.shapes.push(self.text(
                center.polar(screen_angle(middle, asc), number_radius),
                (i + 1).to_string(),
                self.visual.label_size,
                "house-number",
            ));

            if self.settings.show_cusp_degrees {
                if let Some(cusp) = chart.cusps().get(i) {
                    layer.shapes.push(self.text(
                        center.polar(angle + 2.5, degree_radius),
                        format!("{}°{}", cusp.position.degree, Glyph::from(cusp.sign()).symbol()),
                        self.visual.label_size,
                        "cusp-degree",
                    ));
                }
            }
        }
        layer
    }

    fn angle_layer(&self, chart: &ChartResult, layout: &WheelLayout, center: Point, asc: f64) -> Layer {
        let mut layer = Layer::new("angles");
        let angles = chart.angles();
        let stroke = Stroke::solid(self.visual.stroke_color, self.visual.angle_stroke_width);
        let label_radius = layout.radius + 12.0;
        let marks = [
            (angles.ascendant.longitude, Glyph::Angle(AngleKind::Ascendant)),
            (angles.midheaven.longitude, Glyph::Angle(AngleKind::Midheaven)),
            (angles.descendant.longitude, Glyph::Descendant),
            (angles.imum_coeli.longitude, Glyph::ImumCoeli),
        ];
        for (lon, glyph) in marks {
            let angle = screen_angle(lon, asc);
            layer.shapes.push(Shape::Line {
                from: center.polar(angle, layout.outer(RingKind::Aspects)),
                to: center.polar(angle, layout.radius),
                stroke: stroke.clone(),
            });
            layer.shapes.push(self.text(
                center.polar(angle, label_radius),
                glyph.symbol().to_string(),
                self.visual.label_size,
                "angle",
            ));
        }
        layer
    }

    fn aspect_layer(&self, chart: &ChartResult, layout: &WheelLayout, center: Point, asc: f64) -> Layer {
        let mut layer = Layer::new("aspects");
        let radius = layout.outer(RingKind::Aspects);
        let longitude_of = |point: AspectPoint| -> Option<f64> {
            match point {
                AspectPoint::Body(body) => chart.body(body).map(|b| b.longitude),
                AspectPoint::Angle(AngleKind::Ascendant) => Some(chart.angles().ascendant.longitude),
                AspectPoint::Angle(AngleKind::Midheaven) => Some(chart.angles().midheaven.longitude),
            }
        };

        for aspect in chart.aspects() {
            let (Some(a), Some(b)) = (longitude_of(aspect.first), longitude_of(aspect.second)) else {
                continue;
            };
            // Conjunctions have no visible chord
            if aspect.aspect_type.angle() == 0.0 {
                continue;
            }
            let (color, style) = self.visual.aspect_style(aspect.quality());
            layer.shapes.push(Shape::Line {
                from: center.polar(screen_angle(a, asc), radius),
                to: center.polar(screen_angle(b, asc), radius),
                stroke: Stroke {
                    color,
                    width: self.visual.aspect_stroke_width,
                    style,
                },
            });
        }
        layer
    }

    fn body_layer(&self, chart: &ChartResult, layout: &WheelLayout, center: Point, asc: f64) -> Layer {
        let mut layer = Layer::new("bodies");
        let bodies = chart.bodies();
        let longitudes: Vec<f64> = bodies.iter().map(|b| b.longitude).collect();
        let display = spread_longitudes(&longitudes, self.settings.min_glyph_separation);

        let tick_outer = layout.inner(RingKind::Houses);
        let glyph_radius = layout.at(RingKind::Bodies, 0.62);
        let label_radius = layout.at(RingKind::Bodies, 0.3);

        for (body, shown) in bodies.iter().zip(display) {
            let true_angle = screen_angle(body.longitude, asc);
            let shown_angle = screen_angle(shown, asc);
            layer.shapes.push(Shape::Line {
                from: center.polar(true_angle, tick_outer - 8.0),
                to: center.polar(true_angle, tick_outer),
                stroke: Stroke::solid(self.visual.body_color(body.body), self.visual.stroke_width),
            });
            layer.shapes.push(Shape::Text {
                position: center.polar(shown_angle, glyph_radius),
                content: Glyph::from(body.body).symbol().to_string(),
                size: self.visual.glyph_size,
                color: self.visual.body_color(body.body),
                anchor: TextAnchor::Middle,
                class: Some("body".to_string()),
            });

            let mut label = format!("{}°{:02}'", body.position.degree, body.position.minute);
            if body.is_retrograde {
                label.push_str(RETROGRADE_MARKER);
            }
            layer.shapes.push(self.text(
                center.polar(shown_angle, label_radius),
                label,
                self.visual.label_size,
                "body-degree",
            ));
        }
        layer
    }
}

impl Default for ChartSpecGenerator {
    fn default() -> Self {
        Self::new(RenderSettings::default())
    }
}

fn title(chart: &ChartResult) -> String {
    let input = chart.input();
    let when = input.instant().format("%Y-%m-%d %H:%M UTC");
    match input.label() {
        Some(label) => format!("{} | {}", label, when),
        None => format!("Natal chart | {}", when),
    }
}
