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

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;
use crate::{
    color::{ColorGenerator, Rgba},
    czml::{
        Billboard, BooleanInterval, Cartesian2, CzmlPacket, HorizontalOrigin, InterpolationAlgorithm, IntervalNumber,
        Label, LabelStyle, Marker, Path, Point, Position, ReferenceFrame, VerticalOrigin
    },
    datetime::{interval_string, iso_string, utc_now_secs},
    errors::{window_error, Result},
    propagator::{Propagator, SatkitPropagator},
    sampler::{sample_positions, DEFAULT_STEP_SECS},
    segmenter::lead_trail_times,
    tle::ElementSet,
};

/// 16x16 satellite icon
pub const DEFAULT_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAABAAAAAQCAYAAAAf8/9hAAAAAXNSR0IArs4c6QAAAARnQU1BAACxjwv8YQUAAAAJcEhZcwAADsMAAA7DAcdvqGQAAADJSURBVDhPnZHRDcMgEEMZjVEYpaNklIzSEfLfD4qNnXAJSFWfhO7w2Zc0Tf9QG2rXrEzSUeZLOGm47WoH95x3Hl3jEgilvDgsOQUTqsNl68ezEwn1vae6lceSEEYvvWNT/Rxc4CXQNGadho1NXoJ+9iaqc2xi2xbt23PJCDIB6TQjOC6Bho/sDy3fBQT8PrVhibU7yBFcEPaRxOoeTwbwByCOYf9VGp1BYI1BA+EeHhmfzKbBoJEQwn1yzUZtyspIQUha85MpkNIXB7GizqDEECsAAAAASUVORK5CYII=";

pub const DEFAULT_MARKER_SCALE: f64 = 1.5;
pub const DEFAULT_POINT_SIZE: f64 = 10.0;
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// how the current satellite position is shown
#[derive(Debug,Clone,PartialEq)]
pub enum MarkerStyle {
    Image { image: String, scale: f64 },
    Point { pixel_size: f64 },
}

#[derive(Debug,Clone,PartialEq)]
pub struct LabelOptions {
    pub fill_color: Option<Rgba>, // satellite color if not set
    pub font: String,
    pub horizontal_origin: HorizontalOrigin,
    pub vertical_origin: VerticalOrigin,
    pub outline_color: Rgba,
    pub outline_width: f64,
    pub pixel_offset: [f64;2],
    pub style: LabelStyle,
}

impl Default for LabelOptions {
    fn default()->Self {
        LabelOptions {
            fill_color: None,
            font: "11pt Lucida Console".to_string(),
            horizontal_origin: HorizontalOrigin::Left,
            vertical_origin: VerticalOrigin::Center,
            outline_color: Rgba::BLACK,
            outline_width: 2.0,
            pixel_offset: [12.0, 0.0],
            style: LabelStyle::FillAndOutline,
        }
    }
}

#[derive(Debug,Clone,PartialEq)]
pub struct PathOptions {
    pub width: f64,
    pub resolution: f64,
    pub material_color: Option<Rgba>, // satellite color if not set
    pub lead_times: Option<Vec<IntervalNumber>>, // computed from orbit segments if not set
    pub trail_times: Option<Vec<IntervalNumber>>,
}

impl Default for PathOptions {
    fn default()->Self {
        PathOptions { width: 1.0, resolution: 120.0, material_color: None, lead_times: None, trail_times: None }
    }
}

#[derive(Debug,Clone,PartialEq)]
pub struct PositionOptions {
    pub step_secs: f64,
    pub interpolation_algorithm: InterpolationAlgorithm,
    pub interpolation_degree: u32,
    pub reference_frame: ReferenceFrame,
}

impl Default for PositionOptions {
    fn default()->Self {
        PositionOptions {
            step_secs: DEFAULT_STEP_SECS,
            interpolation_algorithm: InterpolationAlgorithm::Lagrange,
            interpolation_degree: 5,
            reference_frame: ReferenceFrame::Inertial,
        }
    }
}

/// the optional per-satellite input. Everything that is None gets defaulted when the satellite is created
#[derive(Debug,Clone,PartialEq)]
pub struct SatelliteOptions {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<Vec<i64>>,
    pub image: Option<String>,
    pub marker_scale: Option<f64>,
    pub use_default_image: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub show_marker: bool,
    pub show_label: bool,
    pub show_path: bool,
}

impl Default for SatelliteOptions {
    fn default()->Self {
        SatelliteOptions {
            name: None, description: None, color: None, image: None, marker_scale: None,
            use_default_image: true,
            start_time: None, end_time: None,
            show_marker: true, show_label: true, show_path: true
        }
    }
}

/// a single satellite of a catalog. This owns the element set, the derived orbital period and the
/// CZML artifacts that are built on demand and then cached until a rebuild is requested
#[derive(Debug)]
pub struct Satellite {
    id: u32,
    name: String,
    description: String,
    color: Rgba,
    marker_style: MarkerStyle,
    show_marker: bool,
    show_label: bool,
    show_path: bool,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,

    element_set: ElementSet,
    period_minutes: f64,
    propagator: Box<dyn Propagator>,

    label_options: LabelOptions,
    path_options: PathOptions,
    position_options: PositionOptions,

    marker: Option<Marker>,
    label: Option<Label>,
    path: Option<Path>,
    position: Option<Position>,
}

impl Satellite {

    /// create a satellite from 2 or 3 TLE lines, drawing a default color from `colors` if none is specified
    pub fn new<S: AsRef<str>> (tle: &[S], opts: SatelliteOptions, colors: &mut ColorGenerator)->Result<Self> {
        let element_set = ElementSet::parse( tle)?;
        let color = colors.resolve( opts.color.as_deref())?;
        element_set.period_minutes()?; // reject invalid mean motion before SGP4 sees it
        let propagator = SatkitPropagator::new( &element_set)?;
        Self::with_propagator( element_set, color, opts, Box::new(propagator))
    }

    /// create a satellite with an explicit color and position source
    pub fn with_propagator (element_set: ElementSet, color: Rgba, opts: SatelliteOptions, propagator: Box<dyn Propagator>)->Result<Self> {
        let period_minutes = element_set.period_minutes()?;

        let id = element_set.catalog_number;
        let name = element_set.display_name( opts.name.as_deref());
        let description = opts.description.unwrap_or_else( || format!("Orbit of Satellite: {name}"));

        let marker_scale = opts.marker_scale.unwrap_or( DEFAULT_MARKER_SCALE);
        let marker_style = match opts.image {
            Some(image) => MarkerStyle::Image { image, scale: marker_scale },
            None if opts.use_default_image => MarkerStyle::Image { image: DEFAULT_IMAGE.to_string(), scale: marker_scale },
            None => MarkerStyle::Point { pixel_size: DEFAULT_POINT_SIZE }
        };

        let start_time = opts.start_time.unwrap_or_else( utc_now_secs);
        let end_time = opts.end_time.unwrap_or_else( || start_time + TimeDelta::hours( DEFAULT_WINDOW_HOURS));
        if end_time < start_time {
            return Err( window_error!("end {} before start {} for satellite {}", end_time, start_time, id))
        }

        Ok( Satellite {
            id, name, description, color, marker_style,
            show_marker: opts.show_marker, show_label: opts.show_label, show_path: opts.show_path,
            start_time, end_time,
            element_set, period_minutes, propagator,
            label_options: LabelOptions::default(),
            path_options: PathOptions::default(),
            position_options: PositionOptions::default(),
            marker: None, label: None, path: None, position: None
        })
    }

    pub fn id (&self)->u32 { self.id }
    pub fn name (&self)->&str { &self.name }
    pub fn description (&self)->&str { &self.description }
    pub fn color (&self)->Rgba { self.color }
    pub fn marker_style (&self)->&MarkerStyle { &self.marker_style }
    pub fn element_set (&self)->&ElementSet { &self.element_set }
    pub fn period_minutes (&self)->f64 { self.period_minutes }
    pub fn start_time (&self)->&DateTime<Utc> { &self.start_time }
    pub fn end_time (&self)->&DateTime<Utc> { &self.end_time }

    pub fn is_marker_built (&self)->bool { self.marker.is_some() }
    pub fn is_label_built (&self)->bool { self.label.is_some() }
    pub fn is_path_built (&self)->bool { self.path.is_some() }
    pub fn is_position_built (&self)->bool { self.position.is_some() }

    pub fn interval (&self)->String { interval_string( &self.start_time, &self.end_time) }

    /// change the time window. Artifacts that depend on it are dropped and rebuilt on the next request
    pub fn set_time_window (&mut self, start_time: DateTime<Utc>, end_time: DateTime<Utc>)->Result<()> {
        if end_time < start_time {
            return Err( window_error!("end {} before start {} for satellite {}", end_time, start_time, self.id))
        }
        if start_time != self.start_time || end_time != self.end_time {
            self.start_time = start_time;
            self.end_time = end_time;
            self.path = None;
            self.position = None;
        }
        Ok(())
    }

    pub fn set_propagator (&mut self, propagator: Box<dyn Propagator>) {
        self.propagator = propagator;
        self.position = None;
    }

    pub fn set_marker_style (&mut self, marker_style: MarkerStyle) {
        self.marker_style = marker_style;
        self.marker = None;
    }

    pub fn set_label_options (&mut self, opts: LabelOptions) {
        self.label_options = opts;
        self.label = None;
    }

    pub fn set_path_options (&mut self, opts: PathOptions) {
        self.path_options = opts;
        self.path = None;
    }

    pub fn set_position_options (&mut self, opts: PositionOptions) {
        self.position_options = opts;
        self.position = None;
    }

    //--- the artifacts

    pub fn build_marker (&mut self, rebuild: bool)->&Marker {
        let marker = match self.marker.take() {
            Some(marker) if !rebuild => marker,
            _ => self.create_marker()
        };
        &*self.marker.insert( marker)
    }

    fn create_marker (&self)->Marker {
        match &self.marker_style {
            MarkerStyle::Image { image, scale } => {
                Marker::Billboard( Billboard { image: image.clone(), scale: *scale, show: self.show_marker })
            }
            MarkerStyle::Point { pixel_size } => {
                Marker::Point( Point {
                    color: self.color.into(),
                    pixel_size: *pixel_size,
                    outline_color: Rgba::WHITE.into(),
                    outline_width: 1.0,
                    show: self.show_marker
                })
            }
        }
    }

    pub fn build_label (&mut self, rebuild: bool)->&Label {
        let label = match self.label.take() {
            Some(label) if !rebuild => label,
            _ => self.create_label()
        };
        &*self.label.insert( label)
    }

    fn create_label (&self)->Label {
        let opts = &self.label_options;
        Label {
            text: self.name.clone(),
            show: self.show_label,
            fill_color: opts.fill_color.unwrap_or( self.color).into(),
            font: opts.font.clone(),
            horizontal_origin: opts.horizontal_origin,
            vertical_origin: opts.vertical_origin,
            outline_color: opts.outline_color.into(),
            outline_width: opts.outline_width,
            pixel_offset: Cartesian2 { cartesian2: opts.pixel_offset },
            style: opts.style,
        }
    }

    pub fn build_path (&mut self, rebuild: bool)->Result<&Path> {
        let path = match self.path.take() {
            Some(path) if !rebuild => path,
            cached => match self.create_path() {
                Ok(path) => path,
                Err(e) => { self.path = cached; return Err(e) } // keep what we had
            }
        };
        Ok( &*self.path.insert( path) )
    }

    fn create_path (&self)->Result<Path> {
        let opts = &self.path_options;

        let (lead_time, trail_time) = match (&opts.lead_times, &opts.trail_times) {
            (Some(lead), Some(trail)) => (lead.clone(), trail.clone()),
            (lead, trail) => {
                let (computed_lead, computed_trail) = lead_trail_times( &self.start_time, &self.end_time, self.period_minutes)?;
                (lead.clone().unwrap_or( computed_lead), trail.clone().unwrap_or( computed_trail))
            }
        };
        debug!("satellite {} path with {} orbit segments", self.id, lead_time.len());

        Ok( Path {
            show: vec![ BooleanInterval { interval: self.interval(), boolean: self.show_path } ],
            width: opts.width,
            material: opts.material_color.unwrap_or( self.color).into(),
            resolution: opts.resolution,
            lead_time,
            trail_time,
        })
    }

    pub fn build_position (&mut self, rebuild: bool)->Result<&Position> {
        let position = match self.position.take() {
            Some(position) if !rebuild => position,
            cached => match self.create_position() {
                Ok(position) => position,
                Err(e) => { self.position = cached; return Err(e) } // keep what we had
            }
        };
        Ok( &*self.position.insert( position) )
    }

    fn create_position (&mut self)->Result<Position> {
        let opts = &self.position_options;
        let trajectory = sample_positions( self.propagator.as_mut(), &self.start_time, &self.end_time, opts.step_secs)?;
        debug!("satellite {} sampled {} positions", self.id, trajectory.len());

        Ok( Position {
            interpolation_algorithm: opts.interpolation_algorithm,
            interpolation_degree: opts.interpolation_degree,
            reference_frame: opts.reference_frame,
            epoch: iso_string( &self.start_time),
            cartesian: trajectory,
        })
    }

    /// build (or re-use) all artifacts and assemble them into the CZML packet for this satellite
    pub fn build_packet (&mut self, availability: String)->Result<CzmlPacket> {
        let mut packet = CzmlPacket::new( self.id);
        packet.name = Some( self.name.clone());
        packet.availability = Some( availability);
        packet.description = Some( self.description.clone());

        packet.position = Some( self.build_position(false)?.clone());
        packet.path = Some( self.build_path(false)?.clone());
        packet.label = Some( self.build_label(false).clone());
        packet.set_marker( self.build_marker(false).clone());

        Ok(packet)
    }
}
