//! Field-level notifications delivered by a dive decoder.

use crate::units::{Duration, Length, Temperature};

/// One field of a dive sample, as pushed by the decoder.
///
/// A [`SampleField::Time`] always starts a new instant; every other field
/// belongs to the most recent time.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleField {
    Time(Duration),
    Depth(Length),
    Pressure { tank: u32, bar: f64 },
    Temperature(Temperature),
    Event(RawEvent),
    /// Remaining bottom time, in minutes.
    Rbt(u32),
    HeartBeat(u32),
    /// Compass bearing, in degrees.
    Bearing(u32),
    Vendor { kind: u32, data: Vec<u8> },
}

/// A discrete event as reported by the decoder, before its code is checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawEvent {
    pub code: u32,
    pub time: Duration,
    pub flags: u32,
    pub value: u32,
}

/// Discrete event kinds, numbered as in libdivecomputer's
/// `parser_sample_event_t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    None,
    DecoStop,
    Rbt,
    Ascent,
    Ceiling,
    Workload,
    Transmitter,
    Violation,
    Bookmark,
    Surface,
    SafetyStop,
    GasChange,
    SafetyStopVoluntary,
    SafetyStopMandatory,
    DeepStop,
    CeilingSafetyStop,
    Unknown,
    DiveTime,
    MaxDepth,
    Olf,
    Po2,
    AirTime,
    Rgbm,
    Heading,
    TissueLevel,
    GasChange2,
}

impl EventType {
    const ALL: [EventType; 26] = [
        EventType::None,
        EventType::DecoStop,
        EventType::Rbt,
        EventType::Ascent,
        EventType::Ceiling,
        EventType::Workload,
        EventType::Transmitter,
        EventType::Violation,
        EventType::Bookmark,
        EventType::Surface,
        EventType::SafetyStop,
        EventType::GasChange,
        EventType::SafetyStopVoluntary,
        EventType::SafetyStopMandatory,
        EventType::DeepStop,
        EventType::CeilingSafetyStop,
        EventType::Unknown,
        EventType::DiveTime,
        EventType::MaxDepth,
        EventType::Olf,
        EventType::Po2,
        EventType::AirTime,
        EventType::Rgbm,
        EventType::Heading,
        EventType::TissueLevel,
        EventType::GasChange2,
    ];

    /// Look up an event code; `None` when it is outside the known range.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn code(&self) -> u32 {
        *self as u32
    }

    pub fn name(&self) -> &'static str {
        match self {
            EventType::None => "none",
            EventType::DecoStop => "decostop",
            EventType::Rbt => "rbt",
            EventType::Ascent => "ascent",
            EventType::Ceiling => "ceiling",
            EventType::Workload => "workload",
            EventType::Transmitter => "transmitter",
            EventType::Violation => "violation",
            EventType::Bookmark => "bookmark",
            EventType::Surface => "surface",
            EventType::SafetyStop => "safetystop",
            EventType::GasChange => "gaschange",
            EventType::SafetyStopVoluntary => "safetystop_voluntary",
            EventType::SafetyStopMandatory => "safetystop_mandatory",
            EventType::DeepStop => "deepstop",
            EventType::CeilingSafetyStop => "ceiling_safetystop",
            EventType::Unknown => "unknown",
            EventType::DiveTime => "divetime",
            EventType::MaxDepth => "maxdepth",
            EventType::Olf => "olf",
            EventType::Po2 => "po2",
            EventType::AirTime => "airtime",
            EventType::Rgbm => "rgbm",
            EventType::Heading => "heading",
            EventType::TissueLevel => "tissuelevel",
            EventType::GasChange2 => "gaschange2",
        }
    }
}

/// A discrete event whose code has been recognized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleEvent {
    pub kind: EventType,
    pub time: Duration,
    pub flags: u32,
    pub value: u32,
}

impl SampleEvent {
    pub fn new(kind: EventType, time: Duration) -> Self {
        SampleEvent {
            kind,
            time,
            flags: 0,
            value: 0,
        }
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }
}

impl TryFrom<RawEvent> for SampleEvent {
    type Error = u32;

    /// Fails with the offending code when it is not a known event type.
    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let kind = EventType::from_code(raw.code).ok_or(raw.code)?;
        Ok(SampleEvent {
            kind,
            time: raw.time,
            flags: raw.flags,
            value: raw.value,
        })
    }
}

impl From<SampleEvent> for RawEvent {
    fn from(event: SampleEvent) -> Self {
        RawEvent {
            code: event.kind.code(),
            time: event.time,
            flags: event.flags,
            value: event.value,
        }
    }
}
