//! Foreign-language surface exported through uniffi.

use chrono::DateTime;
use log::debug;

use crate::config::ExportConfig;
use crate::dump::parse_dump;
use crate::error::ExportError;
use crate::export::export_uddf_string;
use crate::field::{RawEvent, SampleField};
use crate::recorded::{DiveHeader, RecordedDive};
use crate::units::{Duration, Length, Temperature};

/// Dive summary as reported by a host-side decoder.
#[derive(Clone, Debug, PartialEq, uniffi::Record)]
pub struct DiveHeaderInput {
    pub start_time_unix: i64,
    pub duration_sec: f64,
    pub max_depth_m: f64,
}

/// One decoded sample field, in SI units.
#[derive(Clone, Debug, PartialEq, uniffi::Enum)]
pub enum SampleFieldInput {
    Time { seconds: f64 },
    Depth { metres: f64 },
    Temperature { celsius: f64 },
    Pressure { tank: u32, bar: f64 },
    Event { code: u32, time_sec: f64, flags: u32, value: u32 },
    Rbt { minutes: u32 },
    HeartBeat { bpm: u32 },
    Bearing { degrees: u32 },
    Vendor { kind: u32, data: Vec<u8> },
}

impl TryFrom<DiveHeaderInput> for DiveHeader {
    type Error = ExportError;

    fn try_from(input: DiveHeaderInput) -> Result<Self, Self::Error> {
        let start = DateTime::from_timestamp(input.start_time_unix, 0).ok_or_else(|| {
            ExportError::InvalidInput(format!(
                "start time {} is out of range",
                input.start_time_unix
            ))
        })?;
        Ok(DiveHeader {
            start,
            duration: Duration::from_seconds(input.duration_sec),
            max_depth: Length::from_metres(input.max_depth_m),
        })
    }
}

impl From<SampleFieldInput> for SampleField {
    fn from(input: SampleFieldInput) -> Self {
        match input {
            SampleFieldInput::Time { seconds } => SampleField::Time(Duration::from_seconds(seconds)),
            SampleFieldInput::Depth { metres } => SampleField::Depth(Length::from_metres(metres)),
            SampleFieldInput::Temperature { celsius } => {
                SampleField::Temperature(Temperature::from_celsius(celsius))
            }
            SampleFieldInput::Pressure { tank, bar } => SampleField::Pressure { tank, bar },
            SampleFieldInput::Event {
                code,
                time_sec,
                flags,
                value,
            } => SampleField::Event(RawEvent {
                code,
                time: Duration::from_seconds(time_sec),
                flags,
                value,
            }),
            SampleFieldInput::Rbt { minutes } => SampleField::Rbt(minutes),
            SampleFieldInput::HeartBeat { bpm } => SampleField::HeartBeat(bpm),
            SampleFieldInput::Bearing { degrees } => SampleField::Bearing(degrees),
            SampleFieldInput::Vendor { kind, data } => SampleField::Vendor { kind, data },
        }
    }
}

/// Convert a decoded dive into a UDDF document using the default configuration.
#[uniffi::export]
pub fn export_dive_uddf(
    header: DiveHeaderInput,
    fields: Vec<SampleFieldInput>,
) -> Result<String, ExportError> {
    debug!("exporting {} sample fields over ffi", fields.len());
    let mut dive = RecordedDive::with_fields(
        header.try_into()?,
        fields.into_iter().map(SampleField::from).collect(),
    );
    export_uddf_string(&mut dive, &ExportConfig::default())
}

/// Replay a text sample dump and convert it into a UDDF document.
#[uniffi::export]
pub fn convert_dump_to_uddf(dump: String) -> Result<String, ExportError> {
    let mut dive = parse_dump(&dump)?;
    export_uddf_string(&mut dive, &ExportConfig::default())
}
