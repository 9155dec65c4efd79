use chrono::{DateTime, Utc};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, hex_digit0, u32 as uint},
    combinator::{all_consuming, map, map_res, opt, rest, value},
    number::complete::double,
    sequence::{delimited, preceded, terminated},
    IResult, Parser,
};

use crate::error::DumpError;
use crate::field::{RawEvent, SampleField};
use crate::recorded::{DiveHeader, RecordedDive};
use crate::units::{Duration, Length, Temperature};

#[derive(Clone, Debug, PartialEq)]
enum Line {
    DiveInfo,
    Date(DateTime<Utc>),
    DiveTime(Duration),
    MaxDepth(Length),
    BeginSample,
    EndSample,
    Field(SampleField),
}

/// Read a text dump back into a replayable dive.
pub fn parse_dump(input: &str) -> Result<RecordedDive, DumpError> {
    let mut start = None;
    let mut duration = None;
    let mut max_depth = None;
    let mut fields = Vec::new();
    let mut seen_any = false;

    for (index, raw) in input.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        seen_any = true;

        // Keep trailing spaces: an empty vendor payload ends in "]: ".
        let text = raw.trim_start().trim_end_matches('\r');
        let (_, parsed) = all_consuming(parse_line)
            .parse(text)
            .map_err(|_| DumpError::Syntax {
                line: index + 1,
                message: format!("unrecognized line '{}'", text.trim_end()),
            })?;

        match parsed {
            Line::Date(datetime) => start = Some(datetime),
            Line::DiveTime(d) => duration = Some(d),
            Line::MaxDepth(l) => max_depth = Some(l),
            Line::Field(field) => fields.push(field),
            Line::DiveInfo | Line::BeginSample | Line::EndSample => {}
        }
    }

    if !seen_any {
        return Err(DumpError::Empty);
    }

    let header = DiveHeader {
        start: start.ok_or(DumpError::MissingHeader("Date"))?,
        duration: duration.ok_or(DumpError::MissingHeader("Dive time"))?,
        max_depth: max_depth.ok_or(DumpError::MissingHeader("Max Depth"))?,
    };
    Ok(RecordedDive::with_fields(header, fields))
}

fn parse_line(input: &str) -> IResult<&str, Line> {
    alt((
        parse_header_line,
        value(Line::BeginSample, tag("Begin Sample")),
        value(Line::EndSample, tag("End Sample")),
        map(parse_field, Line::Field),
    ))
    .parse(input)
}

fn parse_header_line(input: &str) -> IResult<&str, Line> {
    alt((
        value(Line::DiveInfo, tag("Dive info:")),
        map(preceded(tag("Date: "), parse_datetime), Line::Date),
        map(preceded(tag("Dive time: "), parse_duration), Line::DiveTime),
        map(preceded(tag("Max Depth: "), parse_length), Line::MaxDepth),
    ))
    .parse(input)
}

fn parse_field(input: &str) -> IResult<&str, SampleField> {
    alt((
        map(preceded(tag("Time: "), parse_duration), SampleField::Time),
        map(preceded(tag("Depth: "), parse_length), SampleField::Depth),
        map(
            preceded(tag("Temperature: "), parse_temperature),
            SampleField::Temperature,
        ),
        map(
            (delimited(tag("Pressure ["), uint, tag("]: ")), double),
            |(tank, bar)| SampleField::Pressure { tank, bar },
        ),
        map(parse_event, SampleField::Event),
        map(preceded(tag("RBT: "), uint), SampleField::Rbt),
        map(preceded(tag("Heart Beat: "), uint), SampleField::HeartBeat),
        map(preceded(tag("Bearing: "), uint), SampleField::Bearing),
        map(
            (
                delimited(tag("Vendor ["), uint, tag("]: ")),
                map_res(hex_digit0, decode_hex),
            ),
            |(kind, data)| SampleField::Vendor { kind, data },
        ),
    ))
    .parse(input)
}

fn parse_event(input: &str) -> IResult<&str, RawEvent> {
    map(
        (
            preceded(tag("Event: [ type: "), uint),
            preceded(tag(" time: "), parse_duration),
            preceded(tag(" flags: "), uint),
            delimited(tag(" value: "), uint, tag(" ]")),
        ),
        |(code, time, flags, value)| RawEvent {
            code,
            time,
            flags,
            value,
        },
    )
    .parse(input)
}

/// `1h2m3s`, `2m0s`, `30s` or `-1m30s`.
fn parse_duration(input: &str) -> IResult<&str, Duration> {
    map(
        (
            opt(char('-')),
            opt(terminated(double, char('h'))),
            opt(terminated(double, char('m'))),
            terminated(double, char('s')),
        ),
        |(negative, hours, minutes, seconds)| {
            let total = hours.unwrap_or(0.0) * 3600.0 + minutes.unwrap_or(0.0) * 60.0 + seconds;
            Duration::from_seconds(if negative.is_some() { -total } else { total })
        },
    )
    .parse(input)
}

fn parse_length(input: &str) -> IResult<&str, Length> {
    map(terminated(double, char('m')), Length::from_metres).parse(input)
}

fn parse_temperature(input: &str) -> IResult<&str, Temperature> {
    map(terminated(double, char('C')), Temperature::from_celsius).parse(input)
}

fn parse_datetime(input: &str) -> IResult<&str, DateTime<Utc>> {
    map_res(rest, |text: &str| {
        DateTime::parse_from_rfc3339(text.trim_end()).map(|d| d.with_timezone(&Utc))
    })
    .parse(input)
}

fn decode_hex(digits: &str) -> Result<Vec<u8>, String> {
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in '{}'", digits));
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|e| e.to_string()))
        .collect()
}
