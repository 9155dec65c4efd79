use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::units::{Duration, Length, Temperature};
use crate::value::ValidValue;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DiveId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RepetitionGroupId(pub String);

impl DiveId {
    pub fn from_start(start: &DateTime<Utc>) -> Self {
        DiveId(format!("dive-{}", start.timestamp()))
    }
}

impl RepetitionGroupId {
    pub fn from_start(start: &DateTime<Utc>) -> Self {
        RepetitionGroupId(format!("rg-{}", start.timestamp()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlarmType {
    Ascent,
    Breath,
    Deco,
    Error,
    LinkLost,
    Microbubbles,
    Rbt,
    SkinCooling,
    Surface,
}

impl AlarmType {
    pub fn uddf_name(&self) -> &'static str {
        match self {
            AlarmType::Ascent => "ascent",
            AlarmType::Breath => "breath",
            AlarmType::Deco => "deco",
            AlarmType::Error => "error",
            AlarmType::LinkLost => "link",
            AlarmType::Microbubbles => "microbubbles",
            AlarmType::Rbt => "rbt",
            AlarmType::SkinCooling => "skincooling",
            AlarmType::Surface => "surface",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Alarm {
    pub kind: AlarmType,
    pub value: ValidValue<f64>,
    pub tank_ref: ValidValue<String>,
}

impl Alarm {
    pub fn new(kind: AlarmType) -> Self {
        Alarm {
            kind,
            value: ValidValue::Absent,
            tank_ref: ValidValue::Absent,
        }
    }
}

/// Dive-level alarm summary. Ordered so it can key a set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GlobalAlarm {
    AscentWarningTooLong,
    SosMode,
    WorkTooHard,
}

impl GlobalAlarm {
    pub fn uddf_name(&self) -> &'static str {
        match self {
            GlobalAlarm::AscentWarningTooLong => "ascent-warning-too-long",
            GlobalAlarm::SosMode => "sos-mode",
            GlobalAlarm::WorkTooHard => "work-too-hard",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub dive_time: Duration,
    pub depth: Length,
    /// Compass heading in degrees.
    pub heading: ValidValue<f64>,
    pub temperature: ValidValue<Temperature>,
    pub alarms: Vec<Alarm>,
}

impl Waypoint {
    pub fn new(dive_time: Duration, depth: Length) -> Self {
        Waypoint {
            dive_time,
            depth,
            heading: ValidValue::Absent,
            temperature: ValidValue::Absent,
            alarms: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InformationBeforeDive {
    pub datetime: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InformationAfterDive {
    pub dive_duration: Duration,
    pub greatest_depth: Length,
    pub highest_po2: ValidValue<f64>,
    pub lowest_temperature: ValidValue<Temperature>,
    pub global_alarms: BTreeSet<GlobalAlarm>,
}

impl InformationAfterDive {
    pub fn new(dive_duration: Duration, greatest_depth: Length) -> Self {
        InformationAfterDive {
            dive_duration,
            greatest_depth,
            highest_po2: ValidValue::Absent,
            lowest_temperature: ValidValue::Absent,
            global_alarms: BTreeSet::new(),
        }
    }

    /// Lower the running minimum if `temperature` is colder.
    pub fn observe_temperature(&mut self, temperature: Temperature) {
        match self.lowest_temperature {
            ValidValue::Absent => self.lowest_temperature.set(temperature),
            ValidValue::Present(lowest) if temperature < lowest => {
                self.lowest_temperature.set(temperature)
            }
            _ => {}
        }
    }

    /// Returns false if the alarm had already been recorded for this dive.
    pub fn raise(&mut self, alarm: GlobalAlarm) -> bool {
        self.global_alarms.insert(alarm)
    }
}

/// Raw dive computer data. Not populated yet; serialized as an empty element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApplicationData;

#[derive(Clone, Debug, PartialEq)]
pub struct Dive {
    pub id: DiveId,
    pub before: InformationBeforeDive,
    pub after: InformationAfterDive,
    pub application_data: ApplicationData,
    pub waypoints: Vec<Waypoint>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RepetitionGroup {
    pub id: RepetitionGroupId,
    pub dives: Vec<Dive>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Manufacturer {
    pub id: String,
    pub name: String,
    pub contact: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Generator {
    pub name: String,
    pub kind: String,
    pub manufacturer: Manufacturer,
    pub version: String,
    pub datetime: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileData {
    pub repetition_groups: Vec<RepetitionGroup>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UddfDocument {
    pub version: String,
    pub generator: Generator,
    pub profile_data: ProfileData,
}
