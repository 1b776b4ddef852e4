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

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OdinCzmlError>;

#[derive(Error,Debug)]
pub enum OdinCzmlError {

    #[error("malformed element set: {0}")]
    MalformedElementSet( String ),

    #[error("invalid color: {0}")]
    InvalidColor( String ),

    #[error("invalid orbital elements: {0}")]
    InvalidOrbitalElements( String ),

    #[error("propagation failed: {0}")]
    PropagationFailure( String ),

    #[error("input length mismatch: {0}")]
    InputLengthMismatch( String ),

    #[error("invalid time window: {0}")]
    InvalidTimeWindow( String ),

    #[error("invalid config: {0}")]
    InvalidConfig( String ),

    /// wraps the error of a single satellite so that we know which input entry was the culprit
    #[error("satellite {index} ({name}) failed: {source}")]
    SatelliteFailed { index: usize, name: String, source: Box<OdinCzmlError> },

    /// artifacts of an already created satellite could not be built
    #[error("artifacts for satellite {id} failed: {source}")]
    ArtifactsFailed { id: u32, source: Box<OdinCzmlError> },

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("RON error {0}")]
    RonError( #[from] ron::error::SpannedError),

    #[error("JSON error {0}")]
    JsonError( #[from] serde_json::Error),
}

impl OdinCzmlError {
    /// the innermost error, skipping over satellite context wrappers
    pub fn root_cause (&self)->&OdinCzmlError {
        match self {
            OdinCzmlError::SatelliteFailed { source, .. } => source.root_cause(),
            OdinCzmlError::ArtifactsFailed { source, .. } => source.root_cause(),
            _ => self
        }
    }

    pub fn for_satellite (self, index: usize, name: impl ToString)->OdinCzmlError {
        OdinCzmlError::SatelliteFailed { index, name: name.to_string(), source: Box::new(self) }
    }
}

macro_rules! tle_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinCzmlError::MalformedElementSet( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use tle_error;

macro_rules! elements_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinCzmlError::InvalidOrbitalElements( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use elements_error;

macro_rules! color_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinCzmlError::InvalidColor( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use color_error;

macro_rules! propagation_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinCzmlError::PropagationFailure( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use propagation_error;

macro_rules! window_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinCzmlError::InvalidTimeWindow( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use window_error;

macro_rules! config_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinCzmlError::InvalidConfig( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use config_error;
