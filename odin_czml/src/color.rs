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
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use crate::errors::{color_error, Result};

/// CZML color, serialized as [r,g,b,a]
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub struct Rgba(pub [u8;4]);

impl Rgba {
    pub const BLACK: Rgba = Rgba([0,0,0,255]);
    pub const WHITE: Rgba = Rgba([255,255,255,255]);

    pub fn new (r: u8, g: u8, b: u8, a: u8)->Self { Rgba([r,g,b,a]) }

    pub fn opaque (r: u8, g: u8, b: u8)->Self { Rgba([r,g,b,255]) }

    /// validate a user provided color spec with 3 (alpha defaults to 255) or 4 components
    pub fn from_components (cs: &[i64])->Result<Self> {
        if cs.len() != 3 && cs.len() != 4 {
            return Err( color_error!("color has {} components, expected 3 or 4 (last one being optional alpha)", cs.len()))
        }

        let mut rgba = [255u8;4];
        for (i,c) in cs.iter().enumerate() {
            rgba[i] = u8::try_from(*c)
                .map_err( |_| color_error!("color value {} is not supported, expected value between 0 and 255", c))?;
        }

        Ok( Rgba(rgba) )
    }

    pub fn r (&self)->u8 { self.0[0] }
    pub fn g (&self)->u8 { self.0[1] }
    pub fn b (&self)->u8 { self.0[2] }
    pub fn a (&self)->u8 { self.0[3] }
}

impl TryFrom<&[i64]> for Rgba {
    type Error = crate::errors::OdinCzmlError;

    fn try_from (cs: &[i64])->Result<Self> {
        Rgba::from_components(cs)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

/// the seeded source of default colors. Each catalog owns one, and draws happen in satellite
/// creation order, i.e. default colors are a function of (seed, position in input)
#[derive(Debug,Clone)]
pub struct ColorGenerator {
    seed: u64,
    rng: StdRng,
}

impl ColorGenerator {
    pub fn new (seed: u64)->Self {
        ColorGenerator { seed, rng: StdRng::seed_from_u64(seed) }
    }

    pub fn seed (&self)->u64 { self.seed }

    /// three independent component draws, alpha is always opaque
    pub fn next_color (&mut self)->Rgba {
        let r: u8 = self.rng.random_range(0..=255);
        let g: u8 = self.rng.random_range(0..=255);
        let b: u8 = self.rng.random_range(0..=255);
        Rgba::opaque( r, g, b)
    }

    /// the validated color if one was specified, otherwise the next generated one.
    /// Note the generator only advances if there is no explicit color
    pub fn resolve (&mut self, color: Option<&[i64]>)->Result<Rgba> {
        match color {
            Some(cs) => Rgba::from_components(cs),
            None => Ok( self.next_color() )
        }
    }
}

impl Default for ColorGenerator {
    fn default()->Self { ColorGenerator::new(0) }
}
