// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Time related utils.

use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, Utc};

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Date format: "2015-01-11"
pub const DATE: &str = "%Y-%m-%d";

/// Time format for ISO 8601 in UTC: "2015-01-11T07:20:04Z"
pub const ISO8601: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into unix seconds: "1421000404"
pub fn format_unix_timestamp(t: DateTime) -> String {
    t.timestamp().to_string()
}

/// Format date into "2015-01-11".
pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE).to_string()
}

/// Format time into ISO 8601 with a literal `Z`: "2015-01-11T07:20:04Z"
pub fn format_iso8601(t: DateTime) -> String {
    t.format(ISO8601).to_string()
}

/// Parse "2015-01-11" into a date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE).map_err(|e| {
        Error::invalid_argument(format!("invalid date {s:?}, expected YYYY-MM-DD"))
            .with_source(e)
    })
}

/// Parse "2015-01-11T07:20:04Z" into time.
pub fn parse_iso8601(s: &str) -> Result<DateTime> {
    NaiveDateTime::parse_from_str(s, ISO8601)
        .map(|t| t.and_utc())
        .map_err(|e| {
            Error::invalid_argument(format!(
                "invalid timestamp {s:?}, expected YYYY-MM-DDTHH:MM:SSZ"
            ))
            .with_source(e)
        })
}
