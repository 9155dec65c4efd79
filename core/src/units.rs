//! Physical quantities reported by dive computers.
//!
//! Each type stores a single canonical unit (seconds, metres, degrees
//! Celsius) and converts on the way in and out.

use std::fmt;

/// One foot in metres.
const FOOT_M: f64 = 0.3048;

/// Offset between the Celsius and Kelvin scales.
const KELVIN_OFFSET: f64 = 273.15;

/// A span of time, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Duration(f64);

impl Duration {
    pub fn from_seconds(seconds: f64) -> Self {
        Duration(seconds)
    }

    pub fn from_minutes(minutes: f64) -> Self {
        Duration(minutes * 60.0)
    }

    pub fn from_hours(hours: f64) -> Self {
        Duration(hours * 3600.0)
    }

    pub fn seconds(&self) -> f64 {
        self.0
    }

    pub fn minutes(&self) -> f64 {
        self.0 / 60.0
    }

    pub fn hours(&self) -> f64 {
        self.0 / 3600.0
    }
}

impl fmt::Display for Duration {
    /// Formats as `1h2m3s`, omitting leading zero components. Negative
    /// durations carry a single leading `-`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0.0 {
            f.write_str("-")?;
        }
        let total = self.0.abs();
        let hours = (total / 3600.0).trunc();
        let minutes = (total / 60.0).trunc() - hours * 60.0;
        let seconds = total - (hours * 60.0 + minutes) * 60.0;

        if hours > 0.0 {
            write!(f, "{}h", hours)?;
        }
        if hours > 0.0 || minutes > 0.0 {
            write!(f, "{}m", minutes)?;
        }
        write!(f, "{}s", seconds)
    }
}

/// A depth or distance, in metres.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Length(f64);

impl Length {
    pub fn from_metres(metres: f64) -> Self {
        Length(metres)
    }

    pub fn from_feet(feet: f64) -> Self {
        Length(feet * FOOT_M)
    }

    pub fn metres(&self) -> f64 {
        self.0
    }

    pub fn feet(&self) -> f64 {
        self.0 / FOOT_M
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

/// A water temperature, in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Temperature(f64);

impl Temperature {
    pub fn from_celsius(celsius: f64) -> Self {
        Temperature(celsius)
    }

    pub fn from_kelvin(kelvin: f64) -> Self {
        Temperature(kelvin - KELVIN_OFFSET)
    }

    pub fn celsius(&self) -> f64 {
        self.0
    }

    pub fn kelvin(&self) -> f64 {
        self.0 + KELVIN_OFFSET
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}C", self.0)
    }
}
