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

use std::{collections::BTreeMap, fs::{self, File}, io::BufWriter, path::{Path, PathBuf}};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use crate::{
    color::{ColorGenerator, Rgba},
    czml::{Clock, ClockRange, ClockStep, CzmlDocument, CzmlPacket, CzmlSink, CzmlStreamWriter},
    datetime::{interval_string, iso_string, to_utc, utc_now_secs},
    errors::{config_error, window_error, OdinCzmlError, Result},
    satellite::{Satellite, SatelliteOptions, DEFAULT_WINDOW_HOURS},
};

pub const DEFAULT_SPEED_MULTIPLIER: u32 = 60;
pub const DEFAULT_SEED: u64 = 0;

fn default_true ()->bool { true }

/// catalog configuration. Per-satellite lists are optional but if present they have to have one entry
/// (which can be None) for each element set
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub speed_multiplier: Option<u32>,

    /// seed for the default colors of satellites that don't have an explicit one
    #[serde(default)]
    pub seed: Option<u64>,

    /// skip satellites that cannot be created instead of failing the whole catalog
    #[serde(default)]
    pub ignore_bad_tles: bool,

    /// if false, satellites without image are shown as colored points
    #[serde(default="default_true")]
    pub use_default_image: bool,

    #[serde(default)]
    pub names: Option<Vec<Option<String>>>,

    #[serde(default)]
    pub descriptions: Option<Vec<Option<String>>>,

    #[serde(default)]
    pub colors: Option<Vec<Option<Vec<i64>>>>,

    #[serde(default)]
    pub images: Option<Vec<Option<String>>>,

    #[serde(default)]
    pub marker_scales: Option<Vec<Option<f64>>>,
}

impl Default for CatalogConfig {
    fn default()->Self {
        CatalogConfig {
            start_time: None, end_time: None, speed_multiplier: None, seed: None,
            ignore_bad_tles: false, use_default_image: true,
            names: None, descriptions: None, colors: None, images: None, marker_scales: None
        }
    }
}

/// the collection of satellites that make up a CZML document, together with the document wide settings
#[derive(Debug)]
pub struct SatelliteCatalog {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    speed_multiplier: u32,
    ignore_bad_tles: bool,
    use_default_image: bool,
    colors: ColorGenerator,
    satellites: BTreeMap<u32,Satellite>,
    rejected: Vec<OdinCzmlError>,
}

impl SatelliteCatalog {

    /// create a catalog from a list of 2- or 3-line element sets. List lengths are checked before any satellite
    /// is created, satellites are then created in input order (which determines default colors)
    pub fn new<S: AsRef<str>> (tles: &[Vec<S>], config: &CatalogConfig)->Result<Self> {
        let n = tles.len();
        check_list( n, &config.names, "names")?;
        check_list( n, &config.descriptions, "descriptions")?;
        check_list( n, &config.colors, "colors")?;
        check_list( n, &config.images, "images")?;
        check_list( n, &config.marker_scales, "marker_scales")?;

        let mut catalog = Self::empty( config)?;

        for (i,tle) in tles.iter().enumerate() {
            let opts = SatelliteOptions {
                name: nth( &config.names, i),
                description: nth( &config.descriptions, i),
                color: nth( &config.colors, i),
                image: nth( &config.images, i),
                marker_scale: nth( &config.marker_scales, i),
                ..catalog.satellite_options()
            };
            let label = opts.name.clone()
                .or_else( || if tle.len() == 3 { Some( tle[0].as_ref().trim().to_string()) } else { None })
                .unwrap_or_else( || format!("#{i}"));

            match Satellite::new( tle, opts, &mut catalog.colors) {
                Ok(sat) => { catalog.add_satellite( sat); }
                Err(e) => {
                    let e = e.for_satellite( i, label);
                    if catalog.ignore_bad_tles {
                        warn!("ignoring {e}");
                        catalog.rejected.push( e);
                    } else {
                        return Err(e)
                    }
                }
            }
        }

        info!("created catalog with {} satellites ({} rejected)", catalog.len(), catalog.rejected.len());
        Ok(catalog)
    }

    /// create a catalog from already created satellites, which get the time window of the catalog
    pub fn from_satellites (satellites: Vec<Satellite>, config: &CatalogConfig)->Result<Self> {
        let mut catalog = Self::empty( config)?;
        for mut sat in satellites {
            sat.set_time_window( catalog.start_time, catalog.end_time)?;
            catalog.add_satellite( sat);
        }
        Ok(catalog)
    }

    fn empty (config: &CatalogConfig)->Result<Self> {
        let speed_multiplier = config.speed_multiplier.unwrap_or( DEFAULT_SPEED_MULTIPLIER);
        check_speed_multiplier( speed_multiplier)?;

        let start_time = config.start_time.unwrap_or_else( utc_now_secs);
        let end_time = config.end_time.unwrap_or_else( || start_time + TimeDelta::hours( DEFAULT_WINDOW_HOURS));
        if end_time < start_time {
            return Err( window_error!("catalog end {} before start {}", end_time, start_time))
        }

        Ok( SatelliteCatalog {
            start_time, end_time, speed_multiplier,
            ignore_bad_tles: config.ignore_bad_tles,
            use_default_image: config.use_default_image,
            colors: ColorGenerator::new( config.seed.unwrap_or( DEFAULT_SEED)),
            satellites: BTreeMap::new(),
            rejected: Vec::new()
        })
    }

    /// the catalog wide defaults for new satellites
    fn satellite_options (&self)->SatelliteOptions {
        SatelliteOptions {
            use_default_image: self.use_default_image,
            start_time: Some( self.start_time),
            end_time: Some( self.end_time),
            ..SatelliteOptions::default()
        }
    }

    //--- satellite bookkeeping

    /// add (or replace) a satellite. Returns the satellite previously stored under the same id
    pub fn add_satellite (&mut self, sat: Satellite)->Option<Satellite> {
        self.satellites.insert( sat.id(), sat)
    }

    /// create a satellite from TLE lines with the catalog time window and color generator, and add it
    pub fn add_tle<S: AsRef<str>> (&mut self, tle: &[S], opts: SatelliteOptions)->Result<u32> {
        let opts = SatelliteOptions {
            start_time: opts.start_time.or( Some( self.start_time)),
            end_time: opts.end_time.or( Some( self.end_time)),
            ..opts
        };
        let sat = Satellite::new( tle, opts, &mut self.colors)?;
        let id = sat.id();
        self.add_satellite( sat);
        Ok(id)
    }

    pub fn get_satellite (&self, id: u32)->Option<&Satellite> {
        self.satellites.get( &id)
    }

    pub fn get_satellite_mut (&mut self, id: u32)->Option<&mut Satellite> {
        self.satellites.get_mut( &id)
    }

    pub fn find_satellite (&self, name: &str)->Option<&Satellite> {
        self.satellites.values().find( |sat| sat.name() == name)
    }

    pub fn remove_satellite (&mut self, id: u32)->Option<Satellite> {
        self.satellites.remove( &id)
    }

    pub fn satellites (&self)->impl Iterator<Item=&Satellite> {
        self.satellites.values()
    }

    pub fn ids (&self)->Vec<u32> {
        self.satellites.keys().copied().collect()
    }

    pub fn len (&self)->usize { self.satellites.len() }

    pub fn is_empty (&self)->bool { self.satellites.is_empty() }

    /// the satellite errors that were ignored during construction
    pub fn rejected (&self)->&[OdinCzmlError] { &self.rejected }

    //--- document settings

    pub fn start_time (&self)->&DateTime<Utc> { &self.start_time }

    pub fn end_time (&self)->&DateTime<Utc> { &self.end_time }

    pub fn speed_multiplier (&self)->u32 { self.speed_multiplier }

    pub fn seed (&self)->u64 { self.colors.seed() }

    pub fn interval (&self)->String { interval_string( &self.start_time, &self.end_time) }

    /// set the document time window (normalized to UTC), which also applies to all satellites
    pub fn set_start_end_time<Tz: TimeZone> (&mut self, start_time: DateTime<Tz>, end_time: DateTime<Tz>)->Result<()> {
        let start_time = to_utc( start_time);
        let end_time = to_utc( end_time);
        if end_time < start_time {
            return Err( window_error!("catalog end {} before start {}", end_time, start_time))
        }

        for sat in self.satellites.values_mut() {
            sat.set_time_window( start_time, end_time)?;
        }
        self.start_time = start_time;
        self.end_time = end_time;
        Ok(())
    }

    pub fn set_speed_multiplier (&mut self, speed_multiplier: u32)->Result<()> {
        check_speed_multiplier( speed_multiplier)?;
        self.speed_multiplier = speed_multiplier;
        Ok(())
    }

    /// re-seed the default color generator. This only affects satellites that are created afterwards
    pub fn set_seed (&mut self, seed: u64) {
        self.colors = ColorGenerator::new( seed);
    }

    pub fn next_default_color (&mut self)->Rgba {
        self.colors.next_color()
    }

    //--- document assembly

    pub fn clock (&self)->Clock {
        Clock {
            interval: self.interval(),
            current_time: iso_string( &self.start_time),
            multiplier: self.speed_multiplier,
            range: ClockRange::LoopStop,
            step: ClockStep::SystemClockMultiplier,
        }
    }

    /// write the document packet followed by one packet per satellite into the sink. Returns the number of
    /// satellite packets. Satellites whose artifacts cannot be built either fail the whole document or are
    /// skipped if the catalog ignores bad TLEs
    pub fn write_czml_to<K: CzmlSink> (&mut self, sink: &mut K)->Result<usize> {
        let availability = self.interval();
        sink.add_packet( CzmlPacket::document( self.clock()))?;

        let mut n_packets = 0;
        for (id,sat) in self.satellites.iter_mut() {
            match sat.build_packet( availability.clone()) {
                Ok(packet) => {
                    sink.add_packet( packet)?;
                    n_packets += 1;
                }
                Err(e) => {
                    let e = OdinCzmlError::ArtifactsFailed { id: *id, source: Box::new(e) };
                    if self.ignore_bad_tles {
                        warn!("skipping {e}");
                    } else {
                        return Err(e)
                    }
                }
            }
        }

        info!("assembled CZML for {} of {} satellites", n_packets, self.satellites.len());
        Ok(n_packets)
    }

    pub fn to_czml (&mut self)->Result<CzmlDocument> {
        let mut doc = CzmlDocument::new();
        self.write_czml_to( &mut doc)?;
        Ok(doc)
    }

    pub fn to_czml_string (&mut self)->Result<String> {
        self.to_czml()?.to_json()
    }

    /// stream the document into a file. Packets go into a sibling "<path>.tmp" file that is only renamed to
    /// `path` if the whole document was written, i.e. a failed document never replaces an existing file
    pub fn write_czml<P: AsRef<Path>> (&mut self, path: P)->Result<usize> {
        let path = path.as_ref();
        let tmp_path = tmp_path_for( path);

        match self.write_czml_file( &tmp_path) {
            Ok(n) => {
                fs::rename( &tmp_path, path)?;
                Ok(n)
            }
            Err(e) => {
                let _ = fs::remove_file( &tmp_path);
                Err(e)
            }
        }
    }

    fn write_czml_file (&mut self, path: &Path)->Result<usize> {
        let file = File::create( path)?;
        let mut writer = CzmlStreamWriter::new( BufWriter::new( file));
        let n = self.write_czml_to( &mut writer)?;
        writer.finish()?;
        Ok(n)
    }
}

fn tmp_path_for (path: &Path)->PathBuf {
    let mut p = path.as_os_str().to_os_string();
    p.push(".tmp");
    PathBuf::from(p)
}

fn check_list<T> (n_tles: usize, list: &Option<Vec<T>>, list_name: &str)->Result<()> {
    match list {
        Some(list) if list.len() != n_tles => {
            Err( OdinCzmlError::InputLengthMismatch( format!("number of elements in {} is {} and doesn't match number of TLEs: {}", list_name, list.len(), n_tles)))
        }
        _ => Ok(())
    }
}

fn check_speed_multiplier (speed_multiplier: u32)->Result<()> {
    if speed_multiplier < 1 {
        Err( config_error!("speed multiplier has to be at least 1: {}", speed_multiplier))
    } else {
        Ok(())
    }
}

fn nth<T: Clone> (list: &Option<Vec<Option<T>>>, i: usize)->Option<T> {
    list.as_ref().and_then( |list| list.get(i)).and_then( |e| e.clone())
}
