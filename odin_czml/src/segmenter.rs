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

//! orbit aligned segmentation of a time window.
//!
//! The path of a satellite is rendered with a lead (ahead of the satellite) and a trail (behind it) time.
//! To always show exactly one revolution we split the window into segments that each span one orbital
//! period, and let lead shrink from a full period to zero while trail grows from zero to a full period.
//! Since the window is normally not a multiple of the period the first segment only covers the leftover.
//!
//! Segment boundaries are accumulated (each end is the previous end plus one period), not recomputed from
//! the window start. For long windows this accumulates microsecond rounding, which we keep so that
//! documents stay comparable with those of other generators.

use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::{
    czml::IntervalNumber,
    datetime::{interval_string, iso_string, minutes_delta, whole_minutes_between},
    errors::{elements_error, window_error, Result}
};

/// two (offset_secs,value_secs) keyframes that are linearly interpolated by the viewer
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct Keyframes(pub [(f64,f64);2]);

impl Keyframes {
    pub fn lead (period_secs: f64)->Self { Keyframes([(0.0, period_secs), (period_secs, 0.0)]) }

    pub fn trail (period_secs: f64)->Self { Keyframes([(0.0, 0.0), (period_secs, period_secs)]) }

    /// linear interpolation between (and clamped to) the keyframes
    pub fn value_at (&self, t: f64)->f64 {
        let [(t0,v0),(t1,v1)] = self.0;
        if t <= t0 || t1 <= t0 {
            v0
        } else if t >= t1 {
            v1
        } else {
            v0 + (v1 - v0) * (t - t0) / (t1 - t0)
        }
    }

    /// the CZML "number" representation [t0,v0,t1,v1]
    pub fn to_flat_vec (&self)->Vec<f64> {
        let [(t0,v0),(t1,v1)] = self.0;
        vec![t0,v0,t1,v1]
    }
}

impl Serialize for Keyframes {
    fn serialize<S: serde::Serializer> (&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        let [(t0,v0),(t1,v1)] = self.0;
        [t0,v0,t1,v1].serialize(s)
    }
}

/// how a window [start,end] is divided for a given period
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct SegmentLayout {
    pub minutes_in_sim: i64,
    pub period_minutes: f64,
    pub leftover_minutes: f64,
    pub full_orbits: usize,
}

impl SegmentLayout {
    pub fn new (start: &DateTime<Utc>, end: &DateTime<Utc>, period_minutes: f64)->Result<Self> {
        if !period_minutes.is_finite() || period_minutes <= 0.0 {
            return Err( elements_error!("orbital period has to be positive: {}", period_minutes))
        }
        if end < start {
            return Err( window_error!("end {} before start {}", end, start))
        }

        let minutes_in_sim = whole_minutes_between( start, end);
        let minutes = minutes_in_sim as f64;
        let leftover_minutes = minutes % period_minutes;
        let full_orbits = (minutes / period_minutes).floor() as usize;

        Ok( SegmentLayout { minutes_in_sim, period_minutes, leftover_minutes, full_orbits } )
    }

    pub fn period_secs (&self)->f64 { self.period_minutes * 60.0 }

    pub fn n_segments (&self)->usize { self.full_orbits + 1 }
}

/// one orbit aligned sub-interval of the window with its lead and trail keyframes (relative to start)
#[derive(Debug,Clone,PartialEq)]
pub struct OrbitSegment {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub lead: Keyframes,
    pub trail: Keyframes,
}

impl OrbitSegment {
    pub fn epoch (&self)->&DateTime<Utc> { &self.start }

    pub fn interval (&self)->String { interval_string( &self.start, &self.end) }

    pub fn is_empty (&self)->bool { self.start == self.end }

    pub fn lead_interval (&self)->IntervalNumber {
        IntervalNumber { interval: self.interval(), epoch: iso_string(&self.start), number: self.lead }
    }

    pub fn trail_interval (&self)->IntervalNumber {
        IntervalNumber { interval: self.interval(), epoch: iso_string(&self.start), number: self.trail }
    }
}

/// the orbit segments for window [start,end] in chronological order. The first one covers the leftover
/// minutes (which can be zero if the window is a multiple of the period), all others one period each
pub fn orbit_segments (start: &DateTime<Utc>, end: &DateTime<Utc>, period_minutes: f64)->Result<Vec<OrbitSegment>> {
    let layout = SegmentLayout::new( start, end, period_minutes)?;
    let period_secs = layout.period_secs();
    let period = minutes_delta( period_minutes);

    let mut segments: Vec<OrbitSegment> = Vec::with_capacity( layout.n_segments());
    let mut sp_start = *start;
    let mut sp_end = sp_start + minutes_delta( layout.leftover_minutes);

    for _ in 0..layout.n_segments() {
        segments.push( OrbitSegment {
            start: sp_start,
            end: sp_end,
            lead: Keyframes::lead( period_secs),
            trail: Keyframes::trail( period_secs)
        });

        sp_start = sp_end;
        sp_end = sp_start + period;
    }

    Ok(segments)
}

/// CZML leadTime and trailTime interval lists
pub fn lead_trail_times (start: &DateTime<Utc>, end: &DateTime<Utc>, period_minutes: f64)->Result<(Vec<IntervalNumber>,Vec<IntervalNumber>)> {
    let segments = orbit_segments( start, end, period_minutes)?;
    let lead = segments.iter().map( OrbitSegment::lead_interval).collect();
    let trail = segments.iter().map( OrbitSegment::trail_interval).collect();
    Ok( (lead,trail) )
}

pub fn lead_times (start: &DateTime<Utc>, end: &DateTime<Utc>, period_minutes: f64)->Result<Vec<IntervalNumber>> {
    Ok( orbit_segments( start, end, period_minutes)?.iter().map( OrbitSegment::lead_interval).collect() )
}

pub fn trail_times (start: &DateTime<Utc>, end: &DateTime<Utc>, period_minutes: f64)->Result<Vec<IntervalNumber>> {
    Ok( orbit_segments( start, end, period_minutes)?.iter().map( OrbitSegment::trail_interval).collect() )
}
