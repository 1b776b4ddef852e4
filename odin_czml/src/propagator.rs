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

use std::fmt;
use chrono::{DateTime, TimeZone, Utc};
use satkit::{Instant, TLE, sgp4::{sgp4, SGP4Error}};
use crate::{errors::{propagation_error, tle_error, Result}, tle::ElementSet};

/// the position source for a satellite. Implementations return inertial (TEME) positions in kilometers,
/// one for each requested instant. A failure for any instant fails the whole request
pub trait Propagator: fmt::Debug + Send {
    fn propagate_km (&mut self, times: &[DateTime<Utc>])->Result<Vec<[f64;3]>>;
}

pub fn instant_from_datetime<Z> (dt: &DateTime<Z>)->Instant where Z: TimeZone {
    Instant::from_unixtime( dt.timestamp_micros() as f64 / 1_000_000.0)
}

/// SGP4 propagation of a TLE through satkit
#[derive(Debug,Clone)]
pub struct SatkitPropagator {
    tle: TLE,
}

impl SatkitPropagator {
    pub fn new (es: &ElementSet)->Result<Self> {
        let tle = TLE::load_2line( &es.line1, &es.line2)
            .map_err(|e| tle_error!("2 line Satkit TLE import of {} failed {:?}", es.catalog_number, e))?;
        Ok( SatkitPropagator { tle } )
    }

    pub fn tle (&self)->&TLE { &self.tle }
}

impl Propagator for SatkitPropagator {
    fn propagate_km (&mut self, times: &[DateTime<Utc>])->Result<Vec<[f64;3]>> {
        if times.is_empty() { return Ok( Vec::new() ) }

        let tvec: Vec<Instant> = times.iter().map( instant_from_datetime).collect();

        // batch propagation is considerably faster than single steps. Note this mutates the TLE, hence the clone
        let (pteme, _vteme, errs) = sgp4( &mut self.tle.clone(), &tvec);

        if let Some(i) = errs.iter().position( |e| *e != SGP4Error::SGP4Success) {
            return Err( propagation_error!("SGP4 failed for satellite {} at {}: {:?}", self.tle.sat_num, times[i], errs[i]))
        }

        let mut ps: Vec<[f64;3]> = Vec::with_capacity( times.len());
        for i in 0..times.len() {
            // satkit positions are in meters
            let p = [ pteme[(0,i)] / 1000.0, pteme[(1,i)] / 1000.0, pteme[(2,i)] / 1000.0 ];
            if p.iter().any( |c| !c.is_finite()) {
                return Err( propagation_error!("non-finite position for satellite {} at {}", self.tle.sat_num, times[i]))
            }
            ps.push(p);
        }

        Ok(ps)
    }
}

/// a propagator backed by a plain function of time, e.g. an analytic orbit or a recorded ephemeris
pub struct FnPropagator<F> where F: FnMut(&DateTime<Utc>)->Result<[f64;3]> + Send {
    f: F
}

impl<F> FnPropagator<F> where F: FnMut(&DateTime<Utc>)->Result<[f64;3]> + Send {
    pub fn new (f: F)->Self { FnPropagator { f } }
}

impl<F> fmt::Debug for FnPropagator<F> where F: FnMut(&DateTime<Utc>)->Result<[f64;3]> + Send {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FnPropagator")
    }
}

impl<F> Propagator for FnPropagator<F> where F: FnMut(&DateTime<Utc>)->Result<[f64;3]> + Send {
    fn propagate_km (&mut self, times: &[DateTime<Utc>])->Result<Vec<[f64;3]>> {
        times.iter().map( |t| (self.f)(t)).collect()
    }
}
