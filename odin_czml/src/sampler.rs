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

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer, ser::SerializeSeq};
use crate::{datetime::{secs_delta, seconds_between}, errors::{propagation_error, window_error, Result}, propagator::Propagator};

pub const DEFAULT_STEP_SECS: f64 = 300.0;

/// number of samples we add past the naive count so that the curve extends beyond the end time.
/// Viewers might display slightly beyond the window, and the mean motion of a TLE is just that - mean
pub const TRAILING_SAMPLES: usize = 5;

/// a regular time series trajectory relative to an epoch. Offsets are in seconds, coordinates in meters
#[derive(Debug,Clone,PartialEq)]
pub struct SampledTrajectory {
    epoch: DateTime<Utc>,
    step_secs: f64,
    samples: Vec<(f64,f64,f64,f64)>,
}

impl SampledTrajectory {
    pub fn epoch (&self)->&DateTime<Utc> { &self.epoch }

    pub fn step_secs (&self)->f64 { self.step_secs }

    pub fn len (&self)->usize { self.samples.len() }

    pub fn is_empty (&self)->bool { self.samples.is_empty() }

    pub fn samples (&self)->&[(f64,f64,f64,f64)] { &self.samples }

    /// the flat [t0,x0,y0,z0, t1,x1,...] buffer as used by CZML cartesian positions
    pub fn to_flat_vec (&self)->Vec<f64> {
        let mut v: Vec<f64> = Vec::with_capacity( self.samples.len() * 4);
        for &(t,x,y,z) in &self.samples {
            v.push(t); v.push(x); v.push(y); v.push(z);
        }
        v
    }
}

/// serializes as the flat buffer without creating it first
impl Serialize for SampledTrajectory {
    fn serialize<S: Serializer> (&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq( Some(self.samples.len() * 4))?;
        for (t,x,y,z) in &self.samples {
            seq.serialize_element(t)?;
            seq.serialize_element(x)?;
            seq.serialize_element(y)?;
            seq.serialize_element(z)?;
        }
        seq.end()
    }
}

/// the number of samples for given window and step (see TRAILING_SAMPLES)
pub fn sample_count (start: &DateTime<Utc>, end: &DateTime<Utc>, step_secs: f64)->Result<usize> {
    if !(step_secs > 0.0) || !step_secs.is_finite() {
        return Err( window_error!("sample step has to be positive: {}", step_secs))
    }
    let window_secs = seconds_between( start, end);
    if window_secs < 0.0 {
        return Err( window_error!("end {} before start {}", end, start))
    }

    Ok( (window_secs / step_secs).floor() as usize + TRAILING_SAMPLES )
}

/// propagate the window [start,end] with a fixed step. Positions are converted from km to meters.
/// This either returns the whole trajectory or fails
pub fn sample_positions (propagator: &mut dyn Propagator, start: &DateTime<Utc>, end: &DateTime<Utc>, step_secs: f64)->Result<SampledTrajectory> {
    let n = sample_count( start, end, step_secs)?;

    let offsets: Vec<f64> = (0..n).map( |i| (i as f64) * step_secs).collect();
    let times: Vec<DateTime<Utc>> = offsets.iter().map( |dt| *start + secs_delta(*dt)).collect();

    let ps = propagator.propagate_km( &times)?;
    if ps.len() != n {
        return Err( propagation_error!("expected {} positions, got {}", n, ps.len()))
    }

    let samples = offsets.iter().zip( ps.iter())
        .map( |(t,p)| (*t, p[0] * 1000.0, p[1] * 1000.0, p[2] * 1000.0))
        .collect();

    Ok( SampledTrajectory { epoch: *start, step_secs, samples } )
}
