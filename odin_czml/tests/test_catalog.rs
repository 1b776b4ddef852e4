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

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
use odin_czml::{
    czml::{CzmlDocument, CzmlSink, CzmlStreamWriter, DOCUMENT_ID},
    errors::OdinCzmlError,
    load_config, load_tle_records,
    propagator::FnPropagator,
    satellite::SatelliteOptions,
    CatalogConfig, ColorGenerator, ElementSet, Rgba, Satellite, SatelliteCatalog
};

/* #region test-data *************************************************************/

const NOAA21: [&str;3] = [
    "NOAA 21",
    "1 54234U 22150A   25076.92835707  .00000366  00000-0  19403-3 0  9994",
    "2 54234  98.7204  17.0432 0002710  72.7407 287.4066 14.19556514121811"
];

const ISS: [&str;3] = [
    "ISS (ZARYA)",
    "1 25544U 22150A   25076.92835707  .00000366  00000-0  19403-3 0  9996",
    "2 25544  51.6374 359.8318 0003980  21.8461 338.2703 15.49847584121811"
];

const SAT_43013: [&str;2] = [
    "1 43013U 22150A   25076.92835707  .00000366  00000-0  19403-3 0  9997",
    "2 43013  98.7204  17.0432 0002710  72.7407 287.4066 14.19535413121819"
];

const BAD_MM: [&str;2] = [
    "1 54234U 22150A   25076.92835707  .00000366  00000-0  19403-3 0  9994",
    "2 54234  98.7204  17.0432 0002710  72.7407 287.4066  0.00000000121810"
];

fn t0 ()->DateTime<Utc> {
    Utc.with_ymd_and_hms( 2025, 3, 17, 0, 0, 0).unwrap()
}

fn tles (sets: &[&[&str]])->Vec<Vec<String>> {
    sets.iter().map( |lines| lines.iter().map( |l| l.to_string()).collect()).collect()
}

fn config (hours: i64)->CatalogConfig {
    CatalogConfig {
        start_time: Some(t0()),
        end_time: Some(t0() + TimeDelta::hours(hours)),
        seed: Some(42),
        ..CatalogConfig::default()
    }
}

/// NOAA 21 with a propagator that always works and 43013 with one that never does
fn good_and_bad_satellites ()->Vec<Satellite> {
    let good = FnPropagator::new( |_t: &DateTime<Utc>| Ok( [7200.0, 0.0, 0.0] ));
    let bad = FnPropagator::new( |t: &DateTime<Utc>| Err( OdinCzmlError::PropagationFailure( format!("decayed before {t}"))));

    let es_good = ElementSet::parse( &NOAA21).unwrap();
    let es_bad = ElementSet::parse( &SAT_43013).unwrap();
    vec![
        Satellite::with_propagator( es_good, Rgba::WHITE, SatelliteOptions::default(), Box::new(good)).unwrap(),
        Satellite::with_propagator( es_bad, Rgba::BLACK, SatelliteOptions::default(), Box::new(bad)).unwrap(),
    ]
}

/* #endregion test-data */

#[test]
fn test_create_catalog () {
    let cat = SatelliteCatalog::new( &tles( &[&NOAA21, &ISS, &SAT_43013]), &config(24)).unwrap();
    for sat in cat.satellites() {
        println!("{:6} {:12} {} {:.2} min", sat.id(), sat.name(), sat.color(), sat.period_minutes());
    }

    assert_eq!( cat.len(), 3);
    assert_eq!( cat.ids(), vec![25544, 43013, 54234]); // ordered by catalog number
    assert_eq!( cat.speed_multiplier(), 60);
    assert_eq!( cat.seed(), 42);
    assert!( cat.rejected().is_empty());

    assert_eq!( cat.get_satellite(43013).unwrap().name(), "43013");
    assert_eq!( cat.find_satellite("ISS (ZARYA)").unwrap().id(), 25544);
    assert_eq!( cat.get_satellite(54234).unwrap().end_time(), &(t0() + TimeDelta::hours(24)));

    // colors are drawn in input order
    let mut colors = ColorGenerator::new(42);
    assert_eq!( cat.get_satellite(54234).unwrap().color(), colors.next_color());
    assert_eq!( cat.get_satellite(25544).unwrap().color(), colors.next_color());
    assert_eq!( cat.get_satellite(43013).unwrap().color(), colors.next_color());
}

#[test]
fn test_deterministic_colors () {
    let input = tles( &[&NOAA21, &ISS]);
    let a = SatelliteCatalog::new( &input, &config(24)).unwrap();
    let b = SatelliteCatalog::new( &input, &config(24)).unwrap();
    for id in a.ids() {
        assert_eq!( a.get_satellite(id).unwrap().color(), b.get_satellite(id).unwrap().color());
    }

    // default colors depend on the input position, not on the satellite
    let reversed = SatelliteCatalog::new( &tles( &[&ISS, &NOAA21]), &config(24)).unwrap();
    assert_eq!( a.get_satellite(54234).unwrap().color(), reversed.get_satellite(25544).unwrap().color());
    assert_eq!( a.get_satellite(25544).unwrap().color(), reversed.get_satellite(54234).unwrap().color());
}

#[test]
fn test_list_length_mismatch () {
    let input = tles( &[&NOAA21, &ISS, &SAT_43013, &BAD_MM]);
    let cfg = CatalogConfig {
        names: Some( vec![ Some("A".to_string()), None, None ]),
        ..config(24)
    };
    let res = SatelliteCatalog::new( &input, &cfg);
    println!("{res:?}");
    assert!( matches!( res, Err(OdinCzmlError::InputLengthMismatch(_))));

    let cfg = CatalogConfig { colors: Some( vec![None; 5]), ..config(24) };
    assert!( matches!( SatelliteCatalog::new( &input, &cfg), Err(OdinCzmlError::InputLengthMismatch(_))));
}

#[test]
fn test_per_satellite_lists () {
    let cfg = CatalogConfig {
        names: Some( vec![ Some("NOAA-21".to_string()), None ]),
        descriptions: Some( vec![ None, Some("crewed".to_string()) ]),
        colors: Some( vec![ None, Some( vec![255,0,0]) ]),
        images: Some( vec![ Some("noaa.png".to_string()), None ]),
        marker_scales: Some( vec![ Some(2.0), None ]),
        ..config(24)
    };
    let cat = SatelliteCatalog::new( &tles( &[&NOAA21, &ISS]), &cfg).unwrap();

    let noaa = cat.get_satellite(54234).unwrap();
    assert_eq!( noaa.name(), "NOAA-21");
    assert_eq!( noaa.description(), "Orbit of Satellite: NOAA-21");
    assert_eq!( noaa.color(), ColorGenerator::new(42).next_color());

    let iss = cat.get_satellite(25544).unwrap();
    assert_eq!( iss.name(), "ISS (ZARYA)");
    assert_eq!( iss.description(), "crewed");
    assert_eq!( iss.color(), Rgba::opaque(255,0,0));
}

#[test]
fn test_bad_tles () {
    let input = tles( &[&NOAA21, &BAD_MM, &ISS]);

    let res = SatelliteCatalog::new( &input, &config(24));
    println!("{res:?}");
    match res {
        Err(e @ OdinCzmlError::SatelliteFailed{ index, .. }) => {
            assert_eq!( index, 1);
            assert!( matches!( e.root_cause(), OdinCzmlError::InvalidOrbitalElements(_)));
        }
        other => panic!("expected satellite failure, got {other:?}")
    }

    let cfg = CatalogConfig { ignore_bad_tles: true, ..config(24) };
    let cat = SatelliteCatalog::new( &input, &cfg).unwrap();
    assert_eq!( cat.ids(), vec![25544, 54234]);
    assert_eq!( cat.rejected().len(), 1);
    assert!( matches!( &cat.rejected()[0], OdinCzmlError::SatelliteFailed{ index: 1, .. }));

    let cfg = CatalogConfig { ignore_bad_tles: true, ..config(24) };
    let cat = SatelliteCatalog::new( &tles( &[&NOAA21[2..]]), &cfg).unwrap(); // lone line 2
    assert!( cat.is_empty());
    assert!( matches!( cat.rejected()[0].root_cause(), OdinCzmlError::MalformedElementSet(_)));
}

#[test]
fn test_add_replace_remove () {
    let mut cat = SatelliteCatalog::new( &tles( &[&NOAA21]), &config(12)).unwrap();

    let id = cat.add_tle( &ISS, SatelliteOptions::default()).unwrap();
    assert_eq!( id, 25544);
    assert_eq!( cat.len(), 2);
    assert_eq!( cat.get_satellite(id).unwrap().end_time(), &(t0() + TimeDelta::hours(12))); // catalog window

    // re-adding the same catalog number replaces the satellite
    let opts = SatelliteOptions { name: Some("ISS".to_string()), ..SatelliteOptions::default() };
    cat.add_tle( &ISS, opts).unwrap();
    assert_eq!( cat.len(), 2);
    assert_eq!( cat.get_satellite(25544).unwrap().name(), "ISS");

    let removed = cat.remove_satellite(54234).unwrap();
    assert_eq!( removed.name(), "NOAA 21");
    assert_eq!( cat.ids(), vec![25544]);
    assert!( cat.remove_satellite(54234).is_none());

    let replaced = cat.add_satellite( removed);
    assert!( replaced.is_none());
    assert_eq!( cat.len(), 2);
}

#[test]
fn test_document_settings () {
    let cfg = CatalogConfig { speed_multiplier: Some(0), ..config(24) };
    assert!( matches!( SatelliteCatalog::new( &tles( &[&NOAA21]), &cfg), Err(OdinCzmlError::InvalidConfig(_))));

    let cfg = CatalogConfig { start_time: Some(t0()), end_time: Some(t0() - TimeDelta::hours(1)), ..config(24) };
    assert!( matches!( SatelliteCatalog::new( &tles( &[&NOAA21]), &cfg), Err(OdinCzmlError::InvalidTimeWindow(_))));

    let mut cat = SatelliteCatalog::new( &tles( &[&NOAA21]), &config(24)).unwrap();
    assert!( matches!( cat.set_speed_multiplier(0), Err(OdinCzmlError::InvalidConfig(_))));
    cat.set_speed_multiplier(120).unwrap();

    let clock = serde_json::to_value( cat.clock()).unwrap();
    println!("{clock}");
    assert_eq!( clock["interval"], "2025-03-17T00:00:00+00:00/2025-03-18T00:00:00+00:00");
    assert_eq!( clock["currentTime"], "2025-03-17T00:00:00+00:00");
    assert_eq!( clock["multiplier"], 120);
    assert_eq!( clock["range"], "LOOP_STOP");
    assert_eq!( clock["step"], "SYSTEM_CLOCK_MULTIPLIER");
}

#[test]
fn test_set_start_end_time () {
    let mut cat = SatelliteCatalog::new( &tles( &[&NOAA21, &ISS]), &config(2)).unwrap();
    cat.get_satellite_mut(54234).unwrap().build_path(false).unwrap();
    assert!( cat.get_satellite(54234).unwrap().is_path_built());

    // a non-UTC zone is normalized
    let pdt = FixedOffset::west_opt( 7 * 3600).unwrap();
    let start = pdt.with_ymd_and_hms( 2025, 3, 17, 5, 0, 0).unwrap();
    cat.set_start_end_time( start, start + TimeDelta::hours(6)).unwrap();

    assert_eq!( cat.start_time(), &Utc.with_ymd_and_hms( 2025, 3, 17, 12, 0, 0).unwrap());
    assert_eq!( cat.clock().current_time, "2025-03-17T12:00:00+00:00");

    let noaa = cat.get_satellite(54234).unwrap();
    assert!( !noaa.is_path_built());
    assert_eq!( noaa.start_time(), cat.start_time());
    assert_eq!( noaa.end_time(), cat.end_time());

    assert!( matches!( cat.set_start_end_time( start, start - TimeDelta::hours(1)), Err(OdinCzmlError::InvalidTimeWindow(_))));
    assert_eq!( cat.end_time(), &Utc.with_ymd_and_hms( 2025, 3, 17, 18, 0, 0).unwrap()); // unchanged
}

#[test]
fn test_czml_document () {
    let mut cat = SatelliteCatalog::new( &tles( &[&NOAA21, &ISS]), &config(6)).unwrap();
    let doc = cat.to_czml().unwrap();

    assert_eq!( doc.len(), 3);
    let packets = doc.packets();
    assert_eq!( packets[0].id, DOCUMENT_ID);
    assert_eq!( packets[0].version.as_deref(), Some("1.0"));
    assert!( packets[0].clock.is_some());
    assert_eq!( packets[1].id, "25544");
    assert_eq!( packets[2].id, "54234");

    let noaa = doc.get_packet("54234").unwrap();
    assert_eq!( noaa.name.as_deref(), Some("NOAA 21"));
    assert_eq!( noaa.availability.as_deref(), Some("2025-03-17T00:00:00+00:00/2025-03-17T06:00:00+00:00"));
    assert_eq!( noaa.position.as_ref().unwrap().cartesian.len(), 72 + 5);

    let v = doc.to_value().unwrap();
    let json = doc.to_json().unwrap();
    println!("{}...", &json[..300]);
    assert_eq!( v[0], serde_json::json!({
        "id": "document",
        "version": "1.0",
        "clock": {
            "interval": "2025-03-17T00:00:00+00:00/2025-03-17T06:00:00+00:00",
            "currentTime": "2025-03-17T00:00:00+00:00",
            "multiplier": 60,
            "range": "LOOP_STOP",
            "step": "SYSTEM_CLOCK_MULTIPLIER"
        }
    }));

    // artifacts are cached, a second document is identical
    assert_eq!( cat.to_czml_string().unwrap(), json);
}

#[test]
fn test_stream_writer () {
    let mut cat = SatelliteCatalog::new( &tles( &[&NOAA21, &SAT_43013]), &config(3)).unwrap();

    let mut writer = CzmlStreamWriter::new( Vec::<u8>::new());
    let n = cat.write_czml_to( &mut writer).unwrap();
    assert_eq!( n, 2);
    assert_eq!( writer.n_packets(), 3);
    let streamed = String::from_utf8( writer.finish().unwrap()).unwrap();

    assert_eq!( streamed, cat.to_czml_string().unwrap());

    let path = std::env::temp_dir().join("odin_czml_test_stream.czml");
    assert_eq!( cat.write_czml( &path).unwrap(), 2);
    let text = std::fs::read_to_string( &path).unwrap();
    let _ = std::fs::remove_file( &path);
    assert_eq!( text, streamed);

    let empty = CzmlStreamWriter::new( Vec::<u8>::new()).finish().unwrap();
    assert_eq!( empty, b"[]");

    let mut one = CzmlStreamWriter::new( Vec::<u8>::new());
    one.add_packet( odin_czml::czml::CzmlPacket::new("x")).unwrap();
    assert_eq!( String::from_utf8( one.finish().unwrap()).unwrap(), r#"[{"id":"x"}]"#);
}

#[test]
fn test_config_files () {
    let config: CatalogConfig = load_config( "configs/catalog.ron").unwrap();
    println!("{config:?}");
    assert_eq!( config.seed, Some(42));
    assert_eq!( config.start_time, Some(t0()));

    let records = load_tle_records( "configs/noaa.tle").unwrap();
    assert_eq!( records.len(), 2);

    let cat = SatelliteCatalog::new( &records, &config).unwrap();
    assert_eq!( cat.get_satellite(54234).unwrap().name(), "NOAA-21");
    assert_eq!( cat.get_satellite(54234).unwrap().color(), Rgba::opaque(255,128,0));
    assert_eq!( cat.get_satellite(25544).unwrap().name(), "ISS (ZARYA)");
}

#[test]
fn test_assembly_failure_policy () {
    // satellites get the catalog window
    let mut cat = SatelliteCatalog::from_satellites( good_and_bad_satellites(), &config(3)).unwrap();
    assert_eq!( cat.ids(), vec![43013, 54234]);
    assert_eq!( cat.get_satellite(54234).unwrap().start_time(), &t0());
    assert_eq!( cat.get_satellite(43013).unwrap().end_time(), &(t0() + TimeDelta::hours(3)));

    let mut doc = CzmlDocument::new();
    let res = cat.write_czml_to( &mut doc);
    println!("{res:?}");
    match res {
        Err(e @ OdinCzmlError::ArtifactsFailed{ id, .. }) => {
            assert_eq!( id, 43013);
            assert!( matches!( e.root_cause(), OdinCzmlError::PropagationFailure(_)));
        }
        other => panic!("expected artifact failure, got {other:?}")
    }

    let cfg = CatalogConfig { ignore_bad_tles: true, ..config(3) };
    let mut cat = SatelliteCatalog::from_satellites( good_and_bad_satellites(), &cfg).unwrap();
    let mut doc = CzmlDocument::new();
    let n = cat.write_czml_to( &mut doc).unwrap();

    assert_eq!( n, 1);
    assert_eq!( doc.len(), 2);
    assert_eq!( doc.packets()[0].id, DOCUMENT_ID);
    assert_eq!( doc.packets()[1].id, "54234");
    assert!( doc.get_packet("43013").is_none());
}

#[test]
fn test_failed_write_leaves_no_file () {
    let path = std::env::temp_dir().join("odin_czml_test_failed.czml");
    let tmp_path = std::env::temp_dir().join("odin_czml_test_failed.czml.tmp");
    let _ = std::fs::remove_file( &path);

    let mut cat = SatelliteCatalog::from_satellites( good_and_bad_satellites(), &config(3)).unwrap();
    let res = cat.write_czml( &path);
    println!("{res:?}");
    assert!( matches!( res, Err(OdinCzmlError::ArtifactsFailed{ id: 43013, .. })));
    assert!( !path.exists());
    assert!( !tmp_path.exists());

    // a previous document is not clobbered by a failed one
    let mut good = SatelliteCatalog::new( &tles( &[&NOAA21]), &config(1)).unwrap();
    assert_eq!( good.write_czml( &path).unwrap(), 1);
    let previous = std::fs::read_to_string( &path).unwrap();

    assert!( cat.write_czml( &path).is_err());
    let text = std::fs::read_to_string( &path).unwrap();
    let _ = std::fs::remove_file( &path);

    assert_eq!( text, previous);
    assert!( serde_json::from_str::<serde_json::Value>( &text).is_ok());
    assert!( !tmp_path.exists());
}
