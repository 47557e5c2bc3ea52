//! # Route Daylight Entry Point
//!
//! Classifies an instant (default: now) for the configured observer and lists
//! that UTC date's twilight, sunrise and sunset times. Human-readable output
//! goes to stdout; `--json` prints a machine-readable report instead. Logs go
//! to stderr and follow `RUST_LOG` (default `info`).


use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use daylight_lib::config::Config;
use daylight_lib::events::{event_datetime, format_instant, DayEvents, TimeReference};
use daylight_lib::{DaylightState, SunEventKind};
use serde::Serialize;
use std::env;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: route-daylight [--config <path>] [--lat <deg>] [--lon <deg>] \
                     [--at <RFC3339>] [--lmt] [--json]";

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
pub struct Args {
    pub config: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub at: Option<DateTime<Utc>>,
    pub reference: TimeReference,
    pub json: bool,
    pub help: bool,
}

impl Args {
    /// Parse arguments (without the program name).
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut parsed = Args::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => parsed.config = Some(next_value(&mut args, "--config")?),
                "--lat" => {
                    let v = next_value(&mut args, "--lat")?;
                    parsed.lat = Some(v.parse().with_context(|| format!("bad latitude: {v}"))?);
                }
                "--lon" => {
                    let v = next_value(&mut args, "--lon")?;
                    parsed.lon = Some(v.parse().with_context(|| format!("bad longitude: {v}"))?);
                }
                "--at" => {
                    let v = next_value(&mut args, "--at")?;
                    let at = DateTime::parse_from_rfc3339(&v)
                        .with_context(|| format!("bad RFC 3339 instant: {v}"))?;
                    parsed.at = Some(at.with_timezone(&Utc));
                }
                "--lmt" => parsed.reference = TimeReference::Lmt,
                "--json" => parsed.json = true,
                "-h" | "--help" => parsed.help = true,
                other => bail!("unknown argument: {other}\n{USAGE}"),
            }
        }

        Ok(parsed)
    }
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> anyhow::Result<String> {
    args.next().with_context(|| format!("{flag} needs a value\n{USAGE}"))
}

/// One solved event as shown in the report.
#[derive(Debug, Serialize)]
pub struct ReportEvent {
    pub kind: SunEventKind,
    pub hours_utc: f64,
    pub time: String,
}

/// Everything printed for one run.
#[derive(Debug, Serialize)]
pub struct Report {
    pub observer: String,
    pub latitude: f64,
    pub longitude: f64,
    pub at: DateTime<Utc>,
    pub time: String,
    pub state: DaylightState,
    pub label: &'static str,
    pub events: Vec<ReportEvent>,
}

/// Classify `at` and solve the day's events for the configured observer.
pub fn build_report(config: &Config, at: DateTime<Utc>, reference: TimeReference) -> Report {
    let classifier = config.classifier();
    let (lat, lon) = (config.observer.latitude, config.observer.longitude);
    let state = classifier.classify(lat, lon, at);

    let events = match DayEvents::for_date(lat, lon, at.date_naive(), &classifier) {
        Ok(day) => day
            .events
            .iter()
            .map(|e| ReportEvent {
                kind: e.kind,
                hours_utc: e.hours_utc,
                time: format_instant(event_datetime(day.date, e.hours_utc), reference, lon),
            })
            .collect(),
        Err(err) => {
            warn!(%err, "no sun events for this position/date");
            Vec::new()
        }
    };

    Report {
        observer: config.observer.name.clone(),
        latitude: lat,
        longitude: lon,
        at,
        time: format_instant(at, reference, lon),
        state,
        label: state.label(),
        events,
    }
}

/// Plain-text rendering of a report.
pub fn render_text(report: &Report) -> String {
    let mut out = format!(
        "{} ({:.4}, {:.4})\n{}   ({})\n",
        report.observer, report.latitude, report.longitude, report.time, report.label
    );
    for event in &report.events {
        out.push_str(&format!("  {:<10}{}\n", event.kind.label(), event.time));
    }
    out
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse(env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    if let Some(lat) = args.lat {
        config.observer.latitude = lat;
    }
    if let Some(lon) = args.lon {
        config.observer.longitude = lon;
    }

    let at = args.at.unwrap_or_else(Utc::now);
    let report = build_report(&config, at, args.reference);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }

    Ok(())
}
