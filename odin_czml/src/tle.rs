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

use std::{fmt, ops::Range, sync::LazyLock};
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::errors::{elements_error, tle_error, Result};

/// column span of the NORAD catalog number in line 2
pub const CATALOG_NUMBER_COLS: Range<usize> = 2..7;

/// column span of the mean motion (revs per day) in line 2
pub const MEAN_MOTION_COLS: Range<usize> = 52..63;

/// upper bound for mean motion (revs per day). 20 revs/day is a 72 min period, which is already below the
/// period of an orbit at ground level (~84 min)
pub const MAX_MEAN_MOTION: f64 = 20.0;

/// regex to extract TLE lines from space-track.org / celestrak GP JSON responses - we don't need to parse
/// the whole JSON structure since we only need the TLE lines
pub static TLE_LINES_RE: LazyLock<Regex> = LazyLock::new(||
    Regex::new( r#""TLE_LINE0": *"(.+?)",\s*"TLE_LINE1": *"(.+?)",\s*"TLE_LINE2": *"(.+?)""#).unwrap()
);

/// a parsed two line element set. If the input had a name line it is kept separately
/// since it is not part of the orbital elements
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct ElementSet {
    pub line1: String,
    pub line2: String,
    pub name: Option<String>,
    pub catalog_number: u32,
}

impl ElementSet {

    /// parse 2 (line1,line2) or 3 (name,line1,line2) lines
    pub fn parse<S: AsRef<str>> (lines: &[S])->Result<Self> {
        let (name, line1, line2) = match lines {
            [l1, l2] => (None, l1.as_ref(), l2.as_ref()),
            [l0, l1, l2] => (normalized_name( l0.as_ref()), l1.as_ref(), l2.as_ref()),
            _ => return Err( tle_error!("element set has {} lines, expected 2 or 3 (first containing name is optional)", lines.len()))
        };

        let line1 = line1.trim_end().to_string();
        let line2 = line2.trim_end().to_string();
        let catalog_number = parse_catalog_number( &line2)?;

        Ok( ElementSet { line1, line2, name, catalog_number } )
    }

    /// mean motion in revolutions per day
    pub fn mean_motion (&self)->Result<f64> {
        let field = self.line2.get( MEAN_MOTION_COLS)
            .ok_or( elements_error!("line 2 of {} too short for mean motion field", self.catalog_number))?;

        let mean_motion: f64 = field.trim().parse()
            .map_err( |_| elements_error!("non-numeric mean motion '{}' for {}", field.trim(), self.catalog_number))?;

        if !mean_motion.is_finite() || mean_motion <= 0.0 {
            return Err( elements_error!("mean motion {} of {} has to be positive", mean_motion, self.catalog_number))
        }
        if mean_motion > MAX_MEAN_MOTION {
            return Err( elements_error!("mean motion {} of {} exceeds {} revs/day", mean_motion, self.catalog_number, MAX_MEAN_MOTION))
        }

        Ok(mean_motion)
    }

    /// orbital period in minutes derived from the mean motion field
    pub fn period_minutes (&self)->Result<f64> {
        let mean_motion = self.mean_motion()?;
        Ok( (24.0 / mean_motion) * 60.0 )
    }

    /// resolve what we display for this element set: explicit name > name line > catalog number
    pub fn display_name (&self, name_override: Option<&str>)->String {
        if let Some(name) = name_override {
            name.to_string()
        } else if let Some(name) = &self.name {
            name.clone()
        } else {
            self.catalog_number.to_string()
        }
    }
}

impl fmt::Display for ElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name { writeln!(f, "{name}")?; }
        writeln!(f, "{}", self.line1)?;
        write!(f, "{}", self.line2)
    }
}

fn parse_catalog_number (line2: &str)->Result<u32> {
    let field = line2.get( CATALOG_NUMBER_COLS)
        .ok_or( tle_error!("line 2 too short for catalog number: '{}'", line2))?;

    field.trim().parse::<u32>()
        .map_err( |_| tle_error!("non-numeric catalog number '{}'", field))
}

/// celestrak 3le files prefix names with "0 "
fn normalized_name (line0: &str)->Option<String> {
    let name = line0.trim();
    let name = name.strip_prefix("0 ").unwrap_or(name).trim();
    if name.is_empty() { None } else { Some(name.to_string()) }
}

/// split text with consecutive 2- or 3-line element sets into records. Blank lines are ignored, a record ends
/// with its line 2. Lines that do not end up in a complete record are returned as a trailing (invalid) record
/// so that callers can report them
pub fn split_tle_records (text: &str)->Vec<Vec<String>> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::with_capacity(3);

    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() { continue }

        current.push( line.to_string());
        if line.starts_with("2 ") {
            records.push( std::mem::take( &mut current));
        }
    }

    if !current.is_empty() {
        records.push( current);
    }

    records
}

/// extract (line0,line1,line2) triples from GP JSON responses
pub fn parse_tle_lines (input: &str)->Vec<(String,String,String)> {
    TLE_LINES_RE.captures_iter(input).map(|caps| {
        ( caps[1].to_string(), caps[2].to_string(), caps[3].to_string() )
    }).collect::<Vec<(String,String,String)>>()
}

/// the GP JSON triples as element set records
pub fn tle_records_from_json (input: &str)->Vec<Vec<String>> {
    parse_tle_lines(input).into_iter().map( |(l0,l1,l2)| vec![l0,l1,l2]).collect()
}
