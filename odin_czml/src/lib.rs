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

//! create CZML documents for CesiumJS from satellite two line element sets (TLEs).
//!
//! Each satellite gets a sampled SGP4 trajectory and an orbit path whose lead and trail times always
//! cover one revolution. Use like so:
//! ```no_run
//!     use odin_czml::{SatelliteCatalog, CatalogConfig};
//!     let tles = vec![ vec![
//!         "NOAA 21",
//!         "1 54234U 22150A   25076.92835707  .00000366  00000-0  19403-3 0  9994",
//!         "2 54234  98.7204  17.0432 0002710  72.7407 287.4066 14.19556514121811"
//!     ]];
//!     let mut catalog = SatelliteCatalog::new( &tles, &CatalogConfig::default()).unwrap();
//!     let czml = catalog.to_czml_string().unwrap();
//! ```

use std::path::Path;
use serde::de::DeserializeOwned;

pub mod errors;
use errors::Result;

pub mod datetime;
pub mod tle;
pub mod color;
pub mod propagator;
pub mod sampler;
pub mod segmenter;
pub mod czml;
pub mod satellite;
pub mod catalog;

pub use catalog::{SatelliteCatalog, CatalogConfig};
pub use satellite::{Satellite, SatelliteOptions};
pub use tle::ElementSet;
pub use color::{Rgba, ColorGenerator};
pub use errors::OdinCzmlError;

/// load a RON config file
pub fn load_config<T: DeserializeOwned, P: AsRef<Path>> (path: P)->Result<T> {
    let text = std::fs::read_to_string( path.as_ref())?;
    Ok( ron::from_str( &text)? )
}

/// read element set records from a file, which is either plain 2/3 line TLE text or a GP JSON response
pub fn load_tle_records<P: AsRef<Path>> (path: P)->Result<Vec<Vec<String>>> {
    let text = std::fs::read_to_string( path.as_ref())?;
    if text.trim_start().starts_with('[') || text.trim_start().starts_with('{') {
        Ok( tle::tle_records_from_json( &text) )
    } else {
        Ok( tle::split_tle_records( &text) )
    }
}
