//! Assembly of a [`UddfDocument`] from finalized samples.

use std::io::Write;

use log::debug;

use crate::config::ExportConfig;
use crate::error::{ExportError, XmlError};
use crate::field::{EventType, SampleEvent};
use crate::models::{
    Alarm, AlarmType, ApplicationData, Dive, DiveId, Generator, GlobalAlarm,
    InformationAfterDive, InformationBeforeDive, Manufacturer, ProfileData, RepetitionGroup,
    RepetitionGroupId, UddfDocument, Waypoint,
};
use crate::parser::DiveParser;
use crate::projection::ToXml;
use crate::sample::Sample;
use crate::value::ValidValue;
use crate::xml::XmlWriter;

/// Position of a dive inside the document being built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiveHandle {
    pub group: usize,
    pub dive: usize,
}

/// What a discrete event contributes to the document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct EventMapping {
    alarm: Option<AlarmType>,
    global: Option<GlobalAlarm>,
}

impl EventMapping {
    fn alarm(kind: AlarmType) -> Self {
        EventMapping {
            alarm: Some(kind),
            global: None,
        }
    }

    fn with_global(mut self, global: GlobalAlarm) -> Self {
        self.global = Some(global);
        self
    }
}

fn map_event(kind: EventType) -> EventMapping {
    match kind {
        EventType::Ascent => {
            EventMapping::alarm(AlarmType::Ascent).with_global(GlobalAlarm::AscentWarningTooLong)
        }
        EventType::DecoStop
        | EventType::Ceiling
        | EventType::DeepStop
        | EventType::CeilingSafetyStop => EventMapping::alarm(AlarmType::Deco),
        EventType::Rbt => EventMapping::alarm(AlarmType::Rbt),
        EventType::Workload => {
            EventMapping::alarm(AlarmType::Breath).with_global(GlobalAlarm::WorkTooHard)
        }
        EventType::Transmitter => EventMapping::alarm(AlarmType::LinkLost),
        EventType::Violation => {
            EventMapping::alarm(AlarmType::Error).with_global(GlobalAlarm::SosMode)
        }
        EventType::Rgbm => EventMapping::alarm(AlarmType::Microbubbles),
        EventType::Surface => EventMapping::alarm(AlarmType::Surface),
        _ => EventMapping::default(),
    }
}

/// Owns the document for one conversion and feeds it sample by sample.
#[derive(Debug)]
pub struct UddfBuilder {
    document: UddfDocument,
    current: DiveHandle,
}

impl UddfBuilder {
    /// Read the dive summary from `parser` and set up a single-dive document.
    pub fn new<P: DiveParser>(parser: &P, config: &ExportConfig) -> Result<Self, ExportError> {
        let start = parser.datetime()?;
        let duration = parser.dive_time()?;
        let max_depth = parser.max_depth()?;

        let dive = Dive {
            id: DiveId::from_start(&start),
            before: InformationBeforeDive { datetime: start },
            after: InformationAfterDive::new(duration, max_depth),
            application_data: ApplicationData,
            waypoints: Vec::new(),
        };
        let group = RepetitionGroup {
            id: RepetitionGroupId::from_start(&start),
            dives: vec![dive],
        };

        let document = UddfDocument {
            version: config.uddf_version.clone(),
            generator: Generator {
                name: config.generator.name.clone(),
                kind: config.generator.kind.clone(),
                manufacturer: Manufacturer {
                    id: config.manufacturer.id.clone(),
                    name: config.manufacturer.name.clone(),
                    contact: config.manufacturer.contact.clone(),
                },
                version: config.generator.version.clone(),
                datetime: config.generation_time(),
            },
            profile_data: ProfileData {
                repetition_groups: vec![group],
            },
        };

        Ok(UddfBuilder {
            document,
            current: DiveHandle { group: 0, dive: 0 },
        })
    }

    pub fn document(&self) -> &UddfDocument {
        &self.document
    }

    pub fn current_dive(&self) -> &Dive {
        &self.document.profile_data.repetition_groups[self.current.group].dives[self.current.dive]
    }

    fn current_dive_mut(&mut self) -> &mut Dive {
        &mut self.document.profile_data.repetition_groups[self.current.group].dives
            [self.current.dive]
    }

    /// Append a waypoint for `sample`, then apply the events it carries.
    pub fn add_sample(&mut self, sample: Sample) -> Result<(), ExportError> {
        // Events reported before the first time field have no waypoint to attach to.
        let time = sample.time.into_inner().map_err(|_| match sample.events.first() {
            Some(event) => ExportError::NoCurrentWaypoint(event.time.seconds()),
            None => ExportError::IncompleteSample("time"),
        })?;
        let depth = sample
            .depth
            .into_inner()
            .map_err(|_| ExportError::IncompleteSample("depth"))?;

        let mut waypoint = Waypoint::new(time, depth);
        if let ValidValue::Present(degrees) = sample.bearing {
            waypoint.heading.set(f64::from(degrees));
        }

        let dive = self.current_dive_mut();
        if let ValidValue::Present(temperature) = sample.temperature {
            waypoint.temperature.set(temperature);
            dive.after.observe_temperature(temperature);
        }
        dive.waypoints.push(waypoint);

        for event in &sample.events {
            self.add_event(event)?;
        }
        Ok(())
    }

    /// Attach `event` to the most recent waypoint.
    pub fn add_event(&mut self, event: &SampleEvent) -> Result<(), ExportError> {
        let dive = self.current_dive_mut();
        let waypoint = dive
            .waypoints
            .last_mut()
            .ok_or(ExportError::NoCurrentWaypoint(event.time.seconds()))?;

        if event.kind == EventType::Heading {
            waypoint.heading.set(f64::from(event.value));
            return Ok(());
        }

        let mapping = map_event(event.kind);
        if let Some(kind) = mapping.alarm {
            let mut alarm = Alarm::new(kind);
            if kind == AlarmType::Rbt {
                alarm.value.set(f64::from(event.value));
            }
            waypoint.alarms.push(alarm);
        }
        if let Some(global) = mapping.global {
            if !dive.after.raise(global) {
                debug!("global alarm {} already recorded", global.uddf_name());
            }
        }
        if mapping == EventMapping::default() {
            debug!("no UDDF mapping for event '{}'", event.kind.name());
        }
        Ok(())
    }

    /// Project the finished document as XML into `out`.
    pub fn write_to<W: Write>(&self, out: W) -> Result<W, XmlError> {
        let mut writer = XmlWriter::new(out);
        writer.start_document()?;
        self.document.to_xml(&mut writer)?;
        writer.end_document()?;
        Ok(writer.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::recorded::{DiveHeader, FailingField, RecordedDive};
    use crate::units::{Duration, Length, Temperature};
    use chrono::{TimeZone, Utc};

    fn parser() -> RecordedDive {
        RecordedDive::new(DiveHeader {
            start: Utc.with_ymd_and_hms(2011, 5, 1, 10, 0, 0).unwrap(),
            duration: Duration::from_seconds(60.0),
            max_depth: Length::from_metres(10.0),
        })
    }

    fn builder() -> UddfBuilder {
        UddfBuilder::new(&parser(), &ExportConfig::default()).unwrap()
    }

    fn sample(t: f64, d: f64) -> Sample {
        Sample::at(Duration::from_seconds(t)).with_depth(Length::from_metres(d))
    }

    #[test]
    fn test_single_group_single_dive() {
        let b = builder();
        let groups = &b.document().profile_data.repetition_groups;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id.0, "rg-1304244000");
        assert_eq!(groups[0].dives.len(), 1);

        let dive = b.current_dive();
        assert_eq!(dive.id.0, "dive-1304244000");
        assert_eq!(dive.after.dive_duration, Duration::from_seconds(60.0));
        assert_eq!(dive.after.greatest_depth, Length::from_metres(10.0));
    }

    #[test]
    fn test_decode_error_propagates() {
        let failing = parser().failing(FailingField::DateTime, DecodeError::Unsupported);
        let err = UddfBuilder::new(&failing, &ExportConfig::default()).unwrap_err();
        assert!(matches!(err, ExportError::Decode(DecodeError::Unsupported)));
    }

    #[test]
    fn test_samples_become_waypoints() {
        let mut b = builder();
        b.add_sample(sample(0.0, 0.0)).unwrap();
        b.add_sample(sample(30.0, 10.0).with_temperature(Temperature::from_celsius(18.0)))
            .unwrap();
        b.add_sample(sample(60.0, 5.0)).unwrap();

        let dive = b.current_dive();
        let times: Vec<f64> = dive.waypoints.iter().map(|w| w.dive_time.seconds()).collect();
        assert_eq!(times, vec![0.0, 30.0, 60.0]);
        assert!(dive.waypoints[1].temperature.is_present());
        assert!(!dive.waypoints[2].temperature.is_present());
        assert_eq!(
            dive.after.lowest_temperature,
            ValidValue::new(Temperature::from_celsius(18.0))
        );
    }

    #[test]
    fn test_incomplete_sample_rejected() {
        let mut b = builder();
        let no_depth = Sample::at(Duration::from_seconds(0.0));
        assert!(matches!(
            b.add_sample(no_depth),
            Err(ExportError::IncompleteSample("depth"))
        ));

        let no_time = Sample::default().with_depth(Length::from_metres(1.0));
        assert!(matches!(
            b.add_sample(no_time),
            Err(ExportError::IncompleteSample("time"))
        ));
        assert!(b.current_dive().waypoints.is_empty());
    }

    #[test]
    fn test_event_before_waypoint() {
        let mut b = builder();
        let event = SampleEvent::new(EventType::Ascent, Duration::from_seconds(5.0));
        assert!(matches!(
            b.add_event(&event),
            Err(ExportError::NoCurrentWaypoint(_))
        ));
    }

    #[test]
    fn test_untimed_sample_with_event_has_no_waypoint() {
        let mut b = builder();
        let untimed = Sample::default()
            .with_depth(Length::from_metres(1.0))
            .with_event(SampleEvent::new(EventType::Ascent, Duration::from_seconds(5.0)));
        assert!(matches!(
            b.add_sample(untimed),
            Err(ExportError::NoCurrentWaypoint(t)) if t == 5.0
        ));
        assert!(b.current_dive().waypoints.is_empty());
    }

    #[test]
    fn test_ascent_alarm_and_global_dedup() {
        let mut b = builder();
        let ascent = |t| SampleEvent::new(EventType::Ascent, Duration::from_seconds(t));

        b.add_sample(sample(0.0, 0.0)).unwrap();
        b.add_sample(sample(30.0, 10.0).with_event(ascent(30.0))).unwrap();
        b.add_sample(sample(60.0, 5.0)).unwrap();
        b.add_event(&ascent(60.0)).unwrap();

        let dive = b.current_dive();
        assert!(dive.waypoints[0].alarms.is_empty());
        assert_eq!(dive.waypoints[1].alarms, vec![Alarm::new(AlarmType::Ascent)]);
        assert_eq!(dive.waypoints[2].alarms.len(), 1);
        assert_eq!(dive.after.global_alarms.len(), 1);
        assert!(dive
            .after
            .global_alarms
            .contains(&GlobalAlarm::AscentWarningTooLong));
    }

    #[test]
    fn test_rbt_alarm_value_and_heading() {
        let mut b = builder();
        let mut s = sample(10.0, 4.0)
            .with_event(SampleEvent::new(EventType::Rbt, Duration::from_seconds(10.0)).with_value(7));
        s.bearing.set(180);
        b.add_sample(s).unwrap();
        b.add_event(
            &SampleEvent::new(EventType::Heading, Duration::from_seconds(10.0)).with_value(90),
        )
        .unwrap();

        let wp = &b.current_dive().waypoints[0];
        assert_eq!(wp.alarms[0].kind, AlarmType::Rbt);
        assert_eq!(wp.alarms[0].value, ValidValue::new(7.0));
        assert_eq!(wp.heading, ValidValue::new(90.0));
    }

    #[test]
    fn test_unmapped_event_is_ignored() {
        let mut b = builder();
        b.add_sample(sample(0.0, 0.0).with_event(SampleEvent::new(
            EventType::Bookmark,
            Duration::from_seconds(0.0),
        )))
        .unwrap();
        let dive = b.current_dive();
        assert!(dive.waypoints[0].alarms.is_empty());
        assert!(dive.after.global_alarms.is_empty());
    }

    #[test]
    fn test_event_mapping_table() {
        assert_eq!(map_event(EventType::Ceiling).alarm, Some(AlarmType::Deco));
        assert_eq!(
            map_event(EventType::Violation).global,
            Some(GlobalAlarm::SosMode)
        );
        assert_eq!(
            map_event(EventType::Workload),
            EventMapping {
                alarm: Some(AlarmType::Breath),
                global: Some(GlobalAlarm::WorkTooHard)
            }
        );
        assert_eq!(map_event(EventType::GasChange), EventMapping::default());
    }
}
