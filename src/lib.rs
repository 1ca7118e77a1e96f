pub mod features;
pub mod geo;
pub mod model;
pub mod output;
pub mod risk;
pub mod stats;

use anyhow::{bail, Context, Result};
use chrono::{Duration, Utc};
use clap::{value_parser, Arg, ArgAction, Command};
use features::Enricher;
use geo::ReferencePoint;
use log::{info, warn};
use model::RawRecord;
use rayon::prelude::*;
use stats::{aggregate_fleet, FleetSummary};
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub paths: Vec<String>,
    pub output_dir: PathBuf,
    pub reference: ReferencePoint,
    pub recency_hours: i64,
}

pub fn get_arg() -> Result<Config> {
    let matches = Command::new("port-ais")
        .version("0.1")
        .about("enrich port AIS exports [csv] and summarise each vessel")
        .arg(
            Arg::new("paths")
                .short('f')
                .long("file-path")
                .action(ArgAction::Append)
                .required(true)
                .help("AIS csv file to process"),
        )
        .arg(
            Arg::new("output_dir")
                .short('o')
                .long("output-dir")
                .default_value("output")
                .help("directory for enriched and per-vessel csv files"),
        )
        .arg(
            Arg::new("port_lon")
                .long("port-lon")
                .value_parser(value_parser!(f64))
                .default_value("129.0")
                .allow_negative_numbers(true)
                .help("reference port longitude"),
        )
        .arg(
            Arg::new("port_lat")
                .long("port-lat")
                .value_parser(value_parser!(f64))
                .default_value("35.1")
                .allow_negative_numbers(true)
                .help("reference port latitude"),
        )
        .arg(
            Arg::new("recency_hours")
                .long("recency-hours")
                .value_parser(value_parser!(i64))
                .default_value("24")
                .help("reports younger than this are flagged recent"),
        )
        .get_matches();

    let paths = matches
        .get_many::<String>("paths")
        .unwrap_or_default()
        .cloned()
        .collect::<Vec<String>>();
    let output_dir = matches
        .get_one::<String>("output_dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("output"));
    let defaults = ReferencePoint::default();
    let reference = ReferencePoint {
        lon: matches.get_one::<f64>("port_lon").copied().unwrap_or(defaults.lon),
        lat: matches.get_one::<f64>("port_lat").copied().unwrap_or(defaults.lat),
    };
    let recency_hours = matches.get_one::<i64>("recency_hours").copied().unwrap_or(24);

    Ok(Config {
        paths,
        output_dir,
        reference,
        recency_hours,
    })
}

pub fn run(config: Config) -> Result<()> {
    info!("config is {:?}", config);

    check_distinct_stems(&config.paths)?;
    let window = Duration::try_hours(config.recency_hours)
        .with_context(|| format!("recency window of {} hours out of range", config.recency_hours))?;

    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("failed to create {}", config.output_dir.display()))?;

    let enricher = Enricher::new(config.reference, Utc::now(), window);

    // every file is attempted before the first failure is reported
    let results: Vec<Result<FileReport>> = config
        .paths
        .par_iter()
        .map(|x| process_file(x, &config.output_dir, &enricher))
        .collect();

    results.into_iter().map(|r| r.map(|_| ())).collect()
}

fn output_stem(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("ais")
}

/// Output files are named after the input stem, so two inputs sharing one
/// would write over each other.
fn check_distinct_stems(paths: &[String]) -> Result<()> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for path in paths {
        if let Some(first) = seen.insert(output_stem(path), path) {
            bail!("{} and {} would write the same output files", first, path);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub enriched: PathBuf,
    pub vessels: PathBuf,
    pub skipped: usize,
    pub summary: FleetSummary,
    pub vessel_count: usize,
}

pub fn read_records(path: &str) -> Result<(Vec<RawRecord>, usize)> {
    let file = File::open(path).with_context(|| format!("failed to open file {}", path))?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();
    let mut skipped = 0;

    for result in rdr.deserialize::<RawRecord>() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                // skip this one.
                warn!("{}: skipping unreadable row: {}", path, e);
                skipped += 1;
            }
        }
    }

    Ok((records, skipped))
}

pub fn process_file(path: &str, output_dir: &Path, enricher: &Enricher) -> Result<FileReport> {
    let (records, skipped) = read_records(path)?;

    let enriched = enricher.enrich_all(records);
    let vessels = aggregate_fleet(&enriched);
    let summary = FleetSummary::from_records(&enriched);

    let stem = output_stem(path);
    let enriched_path = output_dir.join(format!("{}.enriched.csv", stem));
    let vessels_path = output_dir.join(format!("{}.vessels.csv", stem));

    output::write_enriched(&enriched_path, &enriched)?;
    output::write_vessels(&vessels_path, &vessels)?;

    info!(
        "{} has {} records enriched ({} skipped), {} vessels, {} in port, {} moving, {} high risk",
        path,
        summary.records,
        skipped,
        vessels.len(),
        summary.in_port,
        summary.moving,
        summary.risk(model::RiskLevel::High),
    );

    Ok(FileReport {
        enriched: enriched_path,
        vessels: vessels_path,
        skipped,
        vessel_count: vessels.len(),
        summary,
    })
}
