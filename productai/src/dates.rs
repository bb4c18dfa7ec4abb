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

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use productai_core::time::{format_date, format_iso8601, parse_date, parse_iso8601, DateTime};
use productai_core::Result;

/// Date encoding expected by the target endpoint.
///
/// The batch api has been served with both encodings across versions. They
/// are different protocol variants: pick the one the server expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFormat {
    /// `YYYY-MM-DD`
    #[default]
    Date,
    /// `YYYY-MM-DDTHH:MM:SSZ`
    Iso8601,
}

/// A date bound given by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    /// Text that must already be in the expected format.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Point in time, treated as UTC.
    DateTime(DateTime),
}

impl From<&str> for DateInput {
    fn from(s: &str) -> Self {
        DateInput::Text(s.to_string())
    }
}

impl From<String> for DateInput {
    fn from(s: String) -> Self {
        DateInput::Text(s)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(d: NaiveDate) -> Self {
        DateInput::Date(d)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(t: NaiveDateTime) -> Self {
        DateInput::DateTime(t.and_utc())
    }
}

impl From<DateTime> for DateInput {
    fn from(t: DateTime) -> Self {
        DateInput::DateTime(t)
    }
}

/// Render a date bound in `format`.
///
/// Text is checked strictly against `format` and returned unchanged. Dates
/// rendered as ISO 8601 use midnight UTC, times rendered as dates drop the
/// time of day.
pub fn date_str(input: impl Into<DateInput>, format: DateFormat) -> Result<String> {
    match (input.into(), format) {
        (DateInput::Text(s), DateFormat::Date) => parse_date(&s).map(|_| s),
        (DateInput::Text(s), DateFormat::Iso8601) => parse_iso8601(&s).map(|_| s),
        (DateInput::Date(d), DateFormat::Date) => Ok(format_date(d)),
        (DateInput::Date(d), DateFormat::Iso8601) => {
            Ok(format_iso8601(d.and_time(NaiveTime::default()).and_utc()))
        }
        (DateInput::DateTime(t), DateFormat::Date) => Ok(format_date(t.date_naive())),
        (DateInput::DateTime(t), DateFormat::Iso8601) => Ok(format_iso8601(t)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use productai_core::ErrorKind;
    use test_case::test_case;

    #[test]
    fn test_date_str() {
        assert_eq!(
            date_str("2015-01-11", DateFormat::Date).expect("must be valid"),
            "2015-01-11"
        );

        let d = NaiveDate::from_ymd_opt(2015, 1, 11).unwrap();
        assert_eq!(date_str(d, DateFormat::Date).unwrap(), "2015-01-11");

        let t = NaiveDate::from_ymd_opt(2017, 2, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(date_str(t, DateFormat::Date).unwrap(), "2017-02-10");
    }

    #[test_case("asdfasdf"; "garbage")]
    #[test_case("not-a-date"; "dashes")]
    #[test_case("2015-13-01"; "bad month")]
    #[test_case("2015-01-11T00:00:00Z"; "iso where date expected")]
    #[test_case(""; "empty")]
    fn test_date_str_rejects_malformed(input: &str) {
        let err = date_str(input, DateFormat::Date).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_date_str_iso8601() {
        assert_eq!(
            date_str("2020-01-01T08:00:00Z", DateFormat::Iso8601).unwrap(),
            "2020-01-01T08:00:00Z"
        );
        assert_eq!(
            date_str(
                NaiveDate::from_ymd_opt(2017, 2, 10).unwrap(),
                DateFormat::Iso8601
            )
            .unwrap(),
            "2017-02-10T00:00:00Z"
        );
        assert_eq!(
            date_str(
                Utc.with_ymd_and_hms(2017, 2, 10, 13, 4, 5).unwrap(),
                DateFormat::Iso8601
            )
            .unwrap(),
            "2017-02-10T13:04:05Z"
        );

        let err = date_str("2020-01-01", DateFormat::Iso8601).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
