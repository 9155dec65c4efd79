pub mod builder;
pub mod config;
pub mod dump;
pub mod error;
pub mod export;
pub mod ffi;
pub mod field;
pub mod models;
pub mod parser;
pub mod projection;
pub mod recorded;
pub mod sample;
pub mod units;
pub mod value;
pub mod xml;

uniffi::setup_scaffolding!();

pub use builder::{DiveHandle, UddfBuilder};
pub use config::{ExportConfig, GeneratorConfig, ManufacturerConfig};
pub use error::{ConfigError, DecodeError, DumpError, ExportError, InvalidValueError, XmlError};
pub use export::{export_uddf, export_uddf_string};
pub use ffi::{convert_dump_to_uddf, export_dive_uddf, DiveHeaderInput, SampleFieldInput};
pub use field::{EventType, RawEvent, SampleEvent, SampleField};
pub use models::{
    Alarm, AlarmType, ApplicationData, Dive, DiveId, Generator, GlobalAlarm, InformationAfterDive,
    InformationBeforeDive, Manufacturer, ProfileData, RepetitionGroup, RepetitionGroupId,
    UddfDocument, Waypoint,
};
pub use parser::DiveParser;
pub use recorded::{DiveHeader, FailingField, RecordedDive};
pub use sample::{Sample, SampleAccumulator, TankPressure};
pub use units::{Duration, Length, Temperature};
pub use value::ValidValue;
pub use xml::{ElementGuard, XmlWriter};
