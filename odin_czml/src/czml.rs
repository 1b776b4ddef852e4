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

//! the subset of CZML (see https://github.com/AnalyticalGraphicsInc/czml-writer/wiki/CZML-Guide) we need
//! to display satellite orbits in Cesium. Only properties we actually set are serialized

use std::io::Write;
use serde::Serialize;
use crate::{color::Rgba, errors::Result, sampler::SampledTrajectory, segmenter::Keyframes};

pub const CZML_VERSION: &str = "1.0";
pub const DOCUMENT_ID: &str = "document";

#[derive(Debug,Clone,Copy,PartialEq,Serialize)]
#[serde(rename_all="SCREAMING_SNAKE_CASE")]
pub enum ClockRange { Unbounded, Clamped, LoopStop }

#[derive(Debug,Clone,Copy,PartialEq,Serialize)]
#[serde(rename_all="SCREAMING_SNAKE_CASE")]
pub enum ClockStep { TickDependent, SystemClockMultiplier, SystemClock }

#[derive(Debug,Clone,PartialEq,Serialize)]
#[serde(rename_all="camelCase")]
pub struct Clock {
    pub interval: String,
    pub current_time: String,
    pub multiplier: u32,
    pub range: ClockRange,
    pub step: ClockStep,
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize)]
pub struct ColorValue {
    pub rgba: Rgba
}

impl From<Rgba> for ColorValue {
    fn from (rgba: Rgba)->Self { ColorValue { rgba } }
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize)]
pub struct Cartesian2 {
    pub cartesian2: [f64;2]
}

#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct Billboard {
    pub image: String,
    pub scale: f64,
    pub show: bool,
}

#[derive(Debug,Clone,PartialEq,Serialize)]
#[serde(rename_all="camelCase")]
pub struct Point {
    pub color: ColorValue,
    pub pixel_size: f64,
    pub outline_color: ColorValue,
    pub outline_width: f64,
    pub show: bool,
}

/// a satellite is either displayed as an image or as a colored dot
#[derive(Debug,Clone,PartialEq)]
pub enum Marker {
    Billboard(Billboard),
    Point(Point),
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize)]
#[serde(rename_all="SCREAMING_SNAKE_CASE")]
pub enum HorizontalOrigin { Left, Center, Right }

#[derive(Debug,Clone,Copy,PartialEq,Serialize)]
#[serde(rename_all="SCREAMING_SNAKE_CASE")]
pub enum VerticalOrigin { Top, Center, Baseline, Bottom }

#[derive(Debug,Clone,Copy,PartialEq,Serialize)]
#[serde(rename_all="SCREAMING_SNAKE_CASE")]
pub enum LabelStyle { Fill, Outline, FillAndOutline }

#[derive(Debug,Clone,PartialEq,Serialize)]
#[serde(rename_all="camelCase")]
pub struct Label {
    pub text: String,
    pub show: bool,
    pub fill_color: ColorValue,
    pub font: String,
    pub horizontal_origin: HorizontalOrigin,
    pub vertical_origin: VerticalOrigin,
    pub outline_color: ColorValue,
    pub outline_width: f64,
    pub pixel_offset: Cartesian2,
    pub style: LabelStyle,
}

#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct BooleanInterval {
    pub interval: String,
    pub boolean: bool,
}

/// a time varying number given as keyframes relative to an epoch, valid within an interval
#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct IntervalNumber {
    pub interval: String,
    pub epoch: String,
    pub number: Keyframes,
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize)]
#[serde(rename_all="camelCase")]
pub struct SolidColor {
    pub color: ColorValue
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize)]
#[serde(rename_all="camelCase")]
pub struct Material {
    pub solid_color: SolidColor
}

impl From<Rgba> for Material {
    fn from (rgba: Rgba)->Self { Material { solid_color: SolidColor { color: rgba.into() } } }
}

#[derive(Debug,Clone,PartialEq,Serialize)]
#[serde(rename_all="camelCase")]
pub struct Path {
    pub show: Vec<BooleanInterval>,
    pub width: f64,
    pub material: Material,
    pub resolution: f64,
    pub lead_time: Vec<IntervalNumber>,
    pub trail_time: Vec<IntervalNumber>,
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize)]
#[serde(rename_all="SCREAMING_SNAKE_CASE")]
pub enum InterpolationAlgorithm { Linear, Lagrange, Hermite }

#[derive(Debug,Clone,Copy,PartialEq,Serialize)]
#[serde(rename_all="SCREAMING_SNAKE_CASE")]
pub enum ReferenceFrame { Fixed, Inertial }

#[derive(Debug,Clone,PartialEq,Serialize)]
#[serde(rename_all="camelCase")]
pub struct Position {
    pub interpolation_algorithm: InterpolationAlgorithm,
    pub interpolation_degree: u32,
    pub reference_frame: ReferenceFrame,
    pub epoch: String,
    pub cartesian: SampledTrajectory,
}

/// one entry of a CZML document
#[derive(Debug,Clone,PartialEq,Default,Serialize)]
pub struct CzmlPacket {
    pub id: String,

    #[serde(skip_serializing_if="Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if="Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if="Option::is_none")]
    pub clock: Option<Clock>,

    #[serde(skip_serializing_if="Option::is_none")]
    pub availability: Option<String>,

    #[serde(skip_serializing_if="Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if="Option::is_none")]
    pub billboard: Option<Billboard>,

    #[serde(skip_serializing_if="Option::is_none")]
    pub point: Option<Point>,

    #[serde(skip_serializing_if="Option::is_none")]
    pub label: Option<Label>,

    #[serde(skip_serializing_if="Option::is_none")]
    pub path: Option<Path>,

    #[serde(skip_serializing_if="Option::is_none")]
    pub position: Option<Position>,
}

impl CzmlPacket {
    pub fn new (id: impl ToString)->Self {
        CzmlPacket { id: id.to_string(), ..Default::default() }
    }

    /// the mandatory first packet of each document
    pub fn document (clock: Clock)->Self {
        CzmlPacket { id: DOCUMENT_ID.to_string(), version: Some(CZML_VERSION.to_string()), clock: Some(clock), ..Default::default() }
    }

    pub fn set_marker (&mut self, marker: Marker) {
        match marker {
            Marker::Billboard(b) => { self.billboard = Some(b); self.point = None; }
            Marker::Point(p) => { self.point = Some(p); self.billboard = None; }
        }
    }
}

/// where assembled packets go. The document packet is always the first one added
pub trait CzmlSink {
    fn add_packet (&mut self, packet: CzmlPacket)->Result<()>;
}

/// an in-memory CZML document
#[derive(Debug,Clone,PartialEq,Default,Serialize)]
#[serde(transparent)]
pub struct CzmlDocument {
    packets: Vec<CzmlPacket>
}

impl CzmlDocument {
    pub fn new ()->Self { CzmlDocument { packets: Vec::new() } }

    pub fn push (&mut self, packet: CzmlPacket) { self.packets.push( packet) }

    pub fn packets (&self)->&[CzmlPacket] { &self.packets }

    pub fn len (&self)->usize { self.packets.len() }

    pub fn is_empty (&self)->bool { self.packets.is_empty() }

    pub fn get_packet (&self, id: &str)->Option<&CzmlPacket> {
        self.packets.iter().find( |p| p.id == id)
    }

    pub fn to_json (&self)->Result<String> {
        Ok( serde_json::to_string( &self.packets)? )
    }

    pub fn to_json_pretty (&self)->Result<String> {
        Ok( serde_json::to_string_pretty( &self.packets)? )
    }

    pub fn to_value (&self)->Result<serde_json::Value> {
        Ok( serde_json::to_value( &self.packets)? )
    }
}

impl CzmlSink for CzmlDocument {
    fn add_packet (&mut self, packet: CzmlPacket)->Result<()> {
        self.push( packet);
        Ok(())
    }
}

/// a sink that streams packets as a JSON array into a writer so that we don't have to keep large
/// position buffers of all satellites in memory. Call `finish()` to close the array
pub struct CzmlStreamWriter<W: Write> {
    writer: W,
    n_packets: usize,
}

impl<W: Write> CzmlStreamWriter<W> {
    pub fn new (writer: W)->Self {
        CzmlStreamWriter { writer, n_packets: 0 }
    }

    pub fn n_packets (&self)->usize { self.n_packets }

    pub fn finish (mut self)->Result<W> {
        if self.n_packets == 0 {
            self.writer.write_all( b"[")?;
        }
        self.writer.write_all( b"]")?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> CzmlSink for CzmlStreamWriter<W> {
    fn add_packet (&mut self, packet: CzmlPacket)->Result<()> {
        let sep: &[u8] = if self.n_packets == 0 { b"[" } else { b"," };
        self.writer.write_all( sep)?;
        serde_json::to_writer( &mut self.writer, &packet)?;
        self.n_packets += 1;
        Ok(())
    }
}
