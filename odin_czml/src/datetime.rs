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

/// time helpers for CZML intervals and epochs

use chrono::{DateTime, SecondsFormat, TimeDelta, TimeZone, Utc};

/// ISO-8601 representation as used in CZML epochs, e.g. "2025-03-17T00:00:00+00:00".
/// Sub-second digits are only added if the instant has them
pub fn iso_string (dt: &DateTime<Utc>)->String {
    dt.to_rfc3339_opts( SecondsFormat::AutoSi, false)
}

/// CZML interval spec "❬start❭/❬end❭"
pub fn interval_string (start: &DateTime<Utc>, end: &DateTime<Utc>)->String {
    format!("{}/{}", iso_string(start), iso_string(end))
}

/// fractional minutes as a TimeDelta with whole microsecond resolution (rounded).
/// Segment boundaries are accumulated from these so we keep the rounding in one place
pub fn minutes_delta (minutes: f64)->TimeDelta {
    TimeDelta::microseconds( (minutes * 60_000_000.0).round() as i64)
}

#[inline]
pub fn secs_delta (secs: f64)->TimeDelta {
    TimeDelta::microseconds( (secs * 1_000_000.0).round() as i64)
}

/// fractional seconds between two instants (negative if end is before start)
pub fn seconds_between (start: &DateTime<Utc>, end: &DateTime<Utc>)->f64 {
    let d = *end - *start;
    match d.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => d.num_milliseconds() as f64 / 1000.0
    }
}

/// whole minutes between two instants, truncated towards zero
pub fn whole_minutes_between (start: &DateTime<Utc>, end: &DateTime<Utc>)->i64 {
    (seconds_between( start, end) / 60.0).trunc() as i64
}

/// normalize any timezone aware instant to UTC
#[inline]
pub fn to_utc<Tz: TimeZone> (dt: DateTime<Tz>)->DateTime<Utc> {
    dt.with_timezone(&Utc)
}

/// parse RFC 3339 / ISO-8601 datetime specs such as "2025-03-17T12:00:00Z"
pub fn parse_datetime (s: &str)->Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .or_else( |_| DateTime::parse_from_str(s, "%+"))
        .map( |dt| dt.to_utc())
        .ok()
}

/// the wall clock, truncated to whole seconds so that generated documents have short epochs
pub fn utc_now_secs ()->DateTime<Utc> {
    let now = Utc::now();
    DateTime::<Utc>::from_timestamp( now.timestamp(), 0).unwrap_or(now)
}
