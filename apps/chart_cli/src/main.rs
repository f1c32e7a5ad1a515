use anyhow::Context;
use chrono::{DateTime, FixedOffset, Utc};
use clap::Parser;
use log::info;
use std::fs;
use std::path::PathBuf;

use urania::rendering::ChartRenderer;
use urania::{BirthInput, ChartEngine, HouseSystem, SolarSet};

#[derive(Parser, Debug)]
#[command(author, version, about = "Calculate and render a natal chart")]
struct Args {
    /// Birth time with its UTC offset, e.g. 1990-04-15T14:30:00-04:00
    #[arg(long)]
    date: String,

    /// Latitude in degrees, north positive
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Overrides chart.house_system from the config file
    #[arg(long)]
    house_system: Option<HouseSystem>,

    #[arg(long)]
    label: Option<String>,

    /// Config file (default: $URANIA_CONFIG or configs/urania.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides output.dir from the config file
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn parse_instant(text: &str) -> anyhow::Result<DateTime<Utc>> {
    let local: DateTime<FixedOffset> = DateTime::parse_from_rfc3339(text)
        .with_context(|| format!("--date must be RFC 3339 with an offset, got '{}'", text))?;
    Ok(local.with_timezone(&Utc))
}

fn print_solar_set(solar: &SolarSet) {
    println!("Sun:         {}", solar.sun_position);
    println!("Fifth house: {}", solar.fifth_house_sign);
    println!(
        "Hard aspects to the Sun: {} ({} squares, {} oppositions)",
        solar.aspect_summary.total, solar.aspect_summary.squares, solar.aspect_summary.oppositions
    );
    for aspect in &solar.hard_aspects {
        println!(
            "  {} {} {} (orb {:+.2})",
            aspect.first.name(),
            aspect.aspect_type.symbol(),
            aspect.second.name(),
            aspect.orb
        );
    }
    println!("Key:         {}", solar.interpretation_key);
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = urania_config::load_settings(args.config.as_deref())?;
    if let Some(system) = args.house_system {
        settings.chart.house_system = system;
    }
    let out_dir = args.out_dir.unwrap_or(settings.output_dir);

    let input = BirthInput::new(parse_instant(&args.date)?, args.lat, args.lon, args.label)?;
    let chart = ChartEngine::default().calculate(&input, &settings.chart)?;
    if let Some(fallback) = chart.fallback() {
        eprintln!(
            "warning: {} houses unavailable ({}), using {}",
            fallback.requested,
            fallback.reason,
            chart.house_system_used()
        );
    }

    let rendered = ChartRenderer::new(settings.render).render(&chart);
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let files = [
        ("chart.json", chart.to_json()?),
        ("chart.svg", rendered.svg.clone()),
        ("chart.html", rendered.html.clone()),
    ];
    for (name, contents) in &files {
        let path = out_dir.join(name);
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    info!("Wrote chart {} to {}", rendered.content_hash, out_dir.display());

    print_solar_set(chart.solar_set());
    println!("SVG sha256:  {}", rendered.content_hash);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instant_applies_offset() {
        let instant = parse_instant("1990-04-15T14:30:00-04:00").unwrap();
        assert_eq!(instant.to_rfc3339(), "1990-04-15T18:30:00+00:00");
        assert!(parse_instant("1990-04-15 14:30").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "urania-chart",
            "--date",
            "1990-04-15T14:30:00-04:00",
            "--lat",
            "40.7128",
            "--lon",
            "-74.006",
            "--house-system",
            "koch",
        ])
        .unwrap();
        assert_eq!(args.lon, -74.006);
        assert_eq!(args.house_system, Some(HouseSystem::Koch));
    }
}
