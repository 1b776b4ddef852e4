/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::path::PathBuf;
use anyhow::{anyhow, Result};
use chrono::TimeDelta;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use odin_czml::{datetime::{parse_datetime, utc_now_secs}, load_config, load_tle_records, CatalogConfig, SatelliteCatalog};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "create a CZML document for CesiumJS from a TLE file (2/3 line text or GP JSON)")]
pub struct Args {
    /// RON catalog config (start/end time, colors, names etc.)
    #[arg(short,long)]
    pub config: Option<PathBuf>,

    /// start datetime spec, e.g. 2025-03-17T00:00:00Z (default: now)
    #[arg(short,long)]
    pub start: Option<String>,

    /// end datetime spec (default: start + hours)
    #[arg(short,long)]
    pub end: Option<String>,

    /// window length in hours if there is no end
    #[arg(long)]
    pub hours: Option<i64>,

    /// clock multiplier of the document
    #[arg(short,long)]
    pub multiplier: Option<u32>,

    /// seed for default satellite colors
    #[arg(long)]
    pub seed: Option<u64>,

    /// skip satellites that cannot be processed
    #[arg(short,long)]
    pub ignore_bad_tles: bool,

    /// show satellites without image as colored points
    #[arg(long)]
    pub points: bool,

    /// output file (default: stdout)
    #[arg(short,long)]
    pub output: Option<PathBuf>,

    /// TLE input file
    pub tle_file: PathBuf,
}

fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .with_writer( std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config: CatalogConfig = match &args.config {
        Some(path) => load_config( path)?,
        None => CatalogConfig::default()
    };

    if let Some(spec) = &args.start {
        config.start_time = Some( parse_datetime( spec).ok_or( anyhow!("invalid start datetime spec {}", spec))?);
    }
    if let Some(spec) = &args.end {
        config.end_time = Some( parse_datetime( spec).ok_or( anyhow!("invalid end datetime spec {}", spec))?);
    } else if let Some(hours) = args.hours {
        let start = *config.start_time.get_or_insert_with( utc_now_secs);
        config.end_time = Some( start + TimeDelta::hours(hours));
    }
    if args.multiplier.is_some() { config.speed_multiplier = args.multiplier; }
    if args.seed.is_some() { config.seed = args.seed; }
    if args.ignore_bad_tles { config.ignore_bad_tles = true; }
    if args.points { config.use_default_image = false; }

    let tles = load_tle_records( &args.tle_file)?;
    if tles.is_empty() {
        return Err( anyhow!("no element sets in {:?}", args.tle_file))
    }

    let mut catalog = SatelliteCatalog::new( &tles, &config)?;

    match &args.output {
        Some(path) => {
            let n = catalog.write_czml( path)?;
            eprintln!("wrote {} satellites to {:?}", n, path);
        }
        None => {
            println!("{}", catalog.to_czml()?.to_json_pretty()?);
        }
    }

    Ok(())
}
