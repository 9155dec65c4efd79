use chrono::{DateTime, Utc};

use crate::error::{DecodeError, ExportError};
use crate::field::{RawEvent, SampleField};
use crate::parser::DiveParser;
use crate::units::{Duration, Length, Temperature};

/// Summary fields of a recorded dive.
#[derive(Clone, Debug, PartialEq)]
pub struct DiveHeader {
    pub start: DateTime<Utc>,
    pub duration: Duration,
    pub max_depth: Length,
}

/// Which accessor of a [`RecordedDive`] should report a decoder failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailingField {
    DiveTime,
    MaxDepth,
    DateTime,
    Samples,
}

/// A dive held entirely in memory, replayed through [`DiveParser`].
#[derive(Clone, Debug)]
pub struct RecordedDive {
    pub header: DiveHeader,
    pub fields: Vec<SampleField>,
    failure: Option<(FailingField, DecodeError)>,
}

impl RecordedDive {
    pub fn new(header: DiveHeader) -> Self {
        Self {
            header,
            fields: Vec::new(),
            failure: None,
        }
    }

    pub fn with_fields(header: DiveHeader, fields: Vec<SampleField>) -> Self {
        Self {
            header,
            fields,
            failure: None,
        }
    }

    /// Make `field` fail with `error`, as a misbehaving decoder would.
    pub fn failing(mut self, field: FailingField, error: DecodeError) -> Self {
        self.failure = Some((field, error));
        self
    }

    pub fn push(&mut self, field: SampleField) -> &mut Self {
        self.fields.push(field);
        self
    }

    /// Append a full sample: time, depth and optionally temperature.
    pub fn sample(&mut self, seconds: f64, metres: f64, celsius: Option<f64>) -> &mut Self {
        self.push(SampleField::Time(Duration::from_seconds(seconds)));
        self.push(SampleField::Depth(Length::from_metres(metres)));
        if let Some(c) = celsius {
            self.push(SampleField::Temperature(Temperature::from_celsius(c)));
        }
        self
    }

    pub fn event(&mut self, event: RawEvent) -> &mut Self {
        self.push(SampleField::Event(event))
    }

    fn check(&self, field: FailingField) -> Result<(), DecodeError> {
        match &self.failure {
            Some((failing, error)) if *failing == field => Err(error.clone()),
            _ => Ok(()),
        }
    }
}

impl DiveParser for RecordedDive {
    fn dive_time(&self) -> Result<Duration, DecodeError> {
        self.check(FailingField::DiveTime)?;
        Ok(self.header.duration)
    }

    fn max_depth(&self) -> Result<Length, DecodeError> {
        self.check(FailingField::MaxDepth)?;
        Ok(self.header.max_depth)
    }

    fn datetime(&self) -> Result<DateTime<Utc>, DecodeError> {
        self.check(FailingField::DateTime)?;
        Ok(self.header.start)
    }

    fn for_each_sample<F>(&mut self, mut callback: F) -> Result<(), ExportError>
    where
        F: FnMut(SampleField) -> Result<(), ExportError>,
    {
        self.check(FailingField::Samples)?;
        for field in &self.fields {
            callback(field.clone())?;
        }
        Ok(())
    }
}
