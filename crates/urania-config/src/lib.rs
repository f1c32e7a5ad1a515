use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use urania::aspects::AspectType;
use urania::rendering::{RenderSettings, Theme};
use urania::{ChartConfig, HouseSystem, NodeMode};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "URANIA_CONFIG";

/// Everything the front ends need from `urania.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct UraniaSettings {
    pub chart: ChartConfig,
    pub render: RenderSettings,
    pub output_dir: PathBuf,
}

impl Default for UraniaSettings {
    fn default() -> Self {
        Self {
            chart: ChartConfig::default(),
            render: RenderSettings::default(),
            output_dir: PathBuf::from("out"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ChartToml {
    house_system: String,
    include_chiron: bool,
    include_lilith: bool,
    include_nodes: String,
    language: String,
    include_minor_aspects: bool,
    include_angles_in_aspects: bool,
    time_budget_ms: Option<u64>,
    max_orb_overrides: HashMap<String, f64>,
}

impl Default for ChartToml {
    fn default() -> Self {
        let base = ChartConfig::default();
        Self {
            house_system: base.house_system.name().to_string(),
            include_chiron: base.include_chiron,
            include_lilith: base.include_lilith,
            include_nodes: "mean".to_string(),
            language: base.language,
            include_minor_aspects: base.include_minor_aspects,
            include_angles_in_aspects: base.include_angles_in_aspects,
            time_budget_ms: None,
            max_orb_overrides: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RenderToml {
    size: f32,
    theme: String,
    show_aspect_lines: bool,
    show_cusp_degrees: bool,
    show_title: bool,
    min_glyph_separation: f64,
}

impl Default for RenderToml {
    fn default() -> Self {
        let base = RenderSettings::default();
        Self {
            size: base.size,
            theme: "dark".to_string(),
            show_aspect_lines: base.show_aspect_lines,
            show_cusp_degrees: base.show_cusp_degrees,
            show_title: base.show_title,
            min_glyph_separation: base.min_glyph_separation,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct OutputToml {
    dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    chart: ChartToml,
    #[serde(default)]
    render: RenderToml,
    #[serde(default)]
    output: OutputToml,
}

/// Candidate locations for `urania.toml`, relative to the working directory.
const DEFAULT_PATHS: [&str; 2] = ["configs/urania.toml", "../../configs/urania.toml"];

/// Read the config text from `explicit`, `URANIA_CONFIG`, or the default paths.
/// `Ok(None)` when no file was given and none of the defaults exist.
pub fn read_config_text(explicit: Option<&Path>) -> anyhow::Result<Option<String>> {
    let requested = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    if let Some(path) = requested {
        let text = fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Could not read config {}: {e}", path.display()))?;
        return Ok(Some(text));
    }
    for p in &DEFAULT_PATHS {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok(Some(c));
        }
    }
    Ok(None)
}

/// Load settings, falling back to defaults when no config file exists.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<UraniaSettings> {
    match read_config_text(explicit)? {
        Some(text) => parse_settings(&text),
        None => Ok(UraniaSettings::default()),
    }
}

pub fn parse_settings(text: &str) -> anyhow::Result<UraniaSettings> {
    let root: RootConfigToml =
        toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse urania.toml: {e}"))?;
    let RootConfigToml { chart, render, output } = root;

    let chart = chart_config(chart)?;
    chart
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid [chart] section: {e}"))?;

    let theme = match render.theme.to_lowercase().as_str() {
        "dark" => Theme::Dark,
        "light" => Theme::Light,
        other => anyhow::bail!("render.theme must be 'dark' or 'light', got '{}'", other),
    };
    if !(render.size.is_finite() && render.size >= 100.0) {
        anyhow::bail!("render.size must be at least 100, got {}", render.size);
    }
    if !(render.min_glyph_separation.is_finite() && render.min_glyph_separation >= 0.0) {
        anyhow::bail!(
            "render.min_glyph_separation must be non-negative, got {}",
            render.min_glyph_separation
        );
    }

    Ok(UraniaSettings {
        chart,
        render: RenderSettings {
            size: render.size,
            theme,
            show_aspect_lines: render.show_aspect_lines,
            show_cusp_degrees: render.show_cusp_degrees,
            show_title: render.show_title,
            min_glyph_separation: render.min_glyph_separation,
        },
        output_dir: output.dir.unwrap_or_else(|| PathBuf::from("out")),
    })
}

fn chart_config(toml: ChartToml) -> anyhow::Result<ChartConfig> {
    let house_system: HouseSystem = toml
        .house_system
        .parse()
        .map_err(|e| anyhow::anyhow!("chart.house_system: {e}"))?;
    let include_nodes = match toml.include_nodes.to_lowercase().as_str() {
        "none" => NodeMode::None,
        "mean" => NodeMode::Mean,
        "true" => NodeMode::True,
        other => anyhow::bail!("chart.include_nodes must be none, mean or true, got '{}'", other),
    };

    let mut max_orb_overrides = BTreeMap::new();
    for (name, orb) in toml.max_orb_overrides {
        let aspect_type = AspectType::from_name(&name).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown aspect '{}' in chart.max_orb_overrides. Valid aspects: {:?}",
                name,
                AspectType::names()
            )
        })?;
        max_orb_overrides.insert(aspect_type, orb);
    }

    Ok(ChartConfig {
        house_system,
        include_chiron: toml.include_chiron,
        include_lilith: toml.include_lilith,
        include_nodes,
        language: toml.language,
        max_orb_overrides,
        include_minor_aspects: toml.include_minor_aspects,
        include_angles_in_aspects: toml.include_angles_in_aspects,
        time_budget: toml.time_budget_ms.map(Duration::from_millis),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings, UraniaSettings::default());
    }

    #[test]
    fn test_full_config() {
        let text = r#"
            [chart]
            house_system = "whole-sign"
            include_chiron = false
            include_nodes = "true"
            language = "pt-BR"
            include_minor_aspects = true
            time_budget_ms = 250

            [chart.max_orb_overrides]
            square = 5.0
            quincunx = 1.5

            [render]
            size = 1000
            theme = "light"
            show_aspect_lines = false

            [output]
            dir = "charts"
        "#;
        let settings = parse_settings(text).unwrap();
        assert_eq!(settings.chart.house_system, HouseSystem::WholeSign);
        assert!(!settings.chart.include_chiron);
        assert!(settings.chart.include_lilith);
        assert_eq!(settings.chart.include_nodes, NodeMode::True);
        assert_eq!(settings.chart.max_orb_overrides.get(&AspectType::Square), Some(&5.0));
        assert_eq!(settings.chart.max_orb_overrides.get(&AspectType::Quincunx), Some(&1.5));
        assert_eq!(settings.chart.time_budget, Some(Duration::from_millis(250)));
        assert_eq!(settings.render.size, 1000.0);
        assert_eq!(settings.render.theme, Theme::Light);
        assert!(!settings.render.show_aspect_lines);
        assert!(settings.render.show_title);
        assert_eq!(settings.output_dir, PathBuf::from("charts"));
    }

    #[test]
    fn test_unknown_house_system_lists_valid_names() {
        let err = parse_settings("[chart]\nhouse_system = \"vedic\"\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("vedic"));
        assert!(message.contains("placidus"));
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(parse_settings("[chart]\ninclude_nodes = \"both\"\n").is_err());
        assert!(parse_settings("[chart.max_orb_overrides]\nsquare = 45.0\n").is_err());
        assert!(parse_settings("[chart.max_orb_overrides]\nbiquintile = 1.0\n").is_err());
        assert!(parse_settings("[render]\ntheme = \"neon\"\n").is_err());
        assert!(parse_settings("[render]\nsize = 10\n").is_err());
        assert!(parse_settings("[chart]\nlanguage = \"english\"\n").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = Path::new("/nonexistent/urania.toml");
        assert!(load_settings(Some(path)).is_err());
    }
}
