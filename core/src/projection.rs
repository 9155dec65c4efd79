//! Serialization rules from the document model to UDDF elements.

use std::io::Write;

use crate::error::XmlError;
use crate::models::{
    Alarm, ApplicationData, Dive, Generator, InformationAfterDive, InformationBeforeDive,
    Manufacturer, ProfileData, RepetitionGroup, UddfDocument, Waypoint,
};
use crate::value::ValidValue;
use crate::xml::XmlWriter;

/// A document node that knows its own element layout.
pub trait ToXml {
    fn to_xml<W: Write>(&self, out: &mut XmlWriter<W>) -> Result<(), XmlError>;
}

impl ToXml for Alarm {
    fn to_xml<W: Write>(&self, out: &mut XmlWriter<W>) -> Result<(), XmlError> {
        let mut e = out.element("alarm")?;
        if let ValidValue::Present(value) = &self.value {
            e.attribute("level", value)?;
        }
        if let ValidValue::Present(tank_ref) = &self.tank_ref {
            e.attribute("tankref", tank_ref)?;
        }
        e.text(self.kind.uddf_name())?;
        e.close()
    }
}

impl ToXml for Waypoint {
    fn to_xml<W: Write>(&self, out: &mut XmlWriter<W>) -> Result<(), XmlError> {
        let mut e = out.element("waypoint")?;
        e.simple_text_element("divetime", self.dive_time.seconds())?;
        e.simple_text_element("depth", self.depth.metres())?;
        if let ValidValue::Present(heading) = self.heading {
            e.simple_text_element("heading", heading)?;
        }
        if let ValidValue::Present(temperature) = self.temperature {
            e.simple_text_element("temperature", temperature.kelvin())?;
        }
        for alarm in &self.alarms {
            alarm.to_xml(&mut *e)?;
        }
        e.close()
    }
}

impl ToXml for InformationBeforeDive {
    fn to_xml<W: Write>(&self, out: &mut XmlWriter<W>) -> Result<(), XmlError> {
        let mut e = out.element("informationbeforedive")?;
        e.start_element("datetime")?;
        e.text_datetime(&self.datetime)?;
        e.end_element()?;
        e.close()
    }
}

impl ToXml for InformationAfterDive {
    fn to_xml<W: Write>(&self, out: &mut XmlWriter<W>) -> Result<(), XmlError> {
        let mut e = out.element("informationafterdive")?;
        e.simple_text_element("diveduration", self.dive_duration.seconds())?;
        e.simple_text_element("greatestdepth", self.greatest_depth.metres())?;
        if let ValidValue::Present(po2) = self.highest_po2 {
            e.simple_text_element("highestpo2", po2)?;
        }
        if let ValidValue::Present(lowest) = self.lowest_temperature {
            e.simple_text_element("lowesttemperature", lowest.kelvin())?;
        }
        if !self.global_alarms.is_empty() {
            let mut given = e.element("globalalarmsgiven")?;
            for alarm in &self.global_alarms {
                given.simple_text_element("globalalarm", alarm.uddf_name())?;
            }
            given.close()?;
        }
        e.close()
    }
}

impl ToXml for ApplicationData {
    fn to_xml<W: Write>(&self, out: &mut XmlWriter<W>) -> Result<(), XmlError> {
        out.element("applicationdata")?.close()
    }
}

impl ToXml for Dive {
    fn to_xml<W: Write>(&self, out: &mut XmlWriter<W>) -> Result<(), XmlError> {
        let mut e = out.element("dive")?;
        e.attribute("id", &self.id.0)?;
        self.before.to_xml(&mut *e)?;
        self.after.to_xml(&mut *e)?;
        self.application_data.to_xml(&mut *e)?;
        for waypoint in &self.waypoints {
            waypoint.to_xml(&mut *e)?;
        }
        e.close()
    }
}

impl ToXml for RepetitionGroup {
    fn to_xml<W: Write>(&self, out: &mut XmlWriter<W>) -> Result<(), XmlError> {
        let mut e = out.element("repetitiongroup")?;
        e.attribute("id", &self.id.0)?;
        for dive in &self.dives {
            dive.to_xml(&mut *e)?;
        }
        e.close()
    }
}

impl ToXml for ProfileData {
    fn to_xml<W: Write>(&self, out: &mut XmlWriter<W>) -> Result<(), XmlError> {
        let mut e = out.element("profiledata")?;
        for group in &self.repetition_groups {
            group.to_xml(&mut *e)?;
        }
        e.close()
    }
}

impl ToXml for Manufacturer {
    fn to_xml<W: Write>(&self, out: &mut XmlWriter<W>) -> Result<(), XmlError> {
        let mut e = out.element("manufacturer")?;
        e.attribute("id", &self.id)?;
        e.simple_text_element("name", &self.name)?;
        if !self.contact.is_empty() {
            let mut contact = e.element("contact")?;
            contact.simple_text_element("email", &self.contact)?;
            contact.close()?;
        }
        e.close()
    }
}

impl ToXml for Generator {
    fn to_xml<W: Write>(&self, out: &mut XmlWriter<W>) -> Result<(), XmlError> {
        let mut e = out.element("generator")?;
        e.simple_text_element("name", &self.name)?;
        self.manufacturer.to_xml(&mut *e)?;
        e.simple_text_element("version", &self.version)?;
        e.start_element("datetime")?;
        e.text_datetime(&self.datetime)?;
        e.end_element()?;
        e.simple_text_element("type", &self.kind)?;
        e.close()
    }
}

impl ToXml for UddfDocument {
    fn to_xml<W: Write>(&self, out: &mut XmlWriter<W>) -> Result<(), XmlError> {
        let mut e = out.element("uddf")?;
        e.attribute("version", &self.version)?;
        self.generator.to_xml(&mut *e)?;
        self.profile_data.to_xml(&mut *e)?;
        e.close()
    }
}
