//! Coalescing of field-level notifications into complete samples.
//!
//! The decoder reports one field at a time. A time field marks the start of a
//! new instant, so the accumulator keeps a single in-progress [`Sample`] and
//! hands it back whenever the next time field (or the final flush) arrives.

use log::{debug, warn};

use crate::field::{SampleEvent, SampleField};
use crate::units::{Duration, Length, Temperature};
use crate::value::ValidValue;

/// Cylinder pressure reading attached to a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankPressure {
    pub tank: u32,
    pub bar: f64,
}

/// One instant of the dive profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    pub time: ValidValue<Duration>,
    pub depth: ValidValue<Length>,
    pub temperature: ValidValue<Temperature>,
    pub bearing: ValidValue<u32>,
    pub rbt: ValidValue<u32>,
    pub heartbeat: ValidValue<u32>,
    pub pressures: Vec<TankPressure>,
    pub events: Vec<SampleEvent>,
}

impl Sample {
    pub fn at(time: Duration) -> Self {
        Sample {
            time: ValidValue::new(time),
            ..Default::default()
        }
    }

    pub fn with_depth(mut self, depth: Length) -> Self {
        self.depth.set(depth);
        self
    }

    pub fn with_temperature(mut self, temperature: Temperature) -> Self {
        self.temperature.set(temperature);
        self
    }

    pub fn with_event(mut self, event: SampleEvent) -> Self {
        self.events.push(event);
        self
    }
}

/// Turns a stream of [`SampleField`]s into complete [`Sample`]s.
///
/// Idle until the first field arrives, then accumulating until the sample is
/// finalized by a new time field or by [`flush`](Self::flush). Callers must
/// flush once the decoder is done, or the last sample is lost.
#[derive(Debug, Default)]
pub struct SampleAccumulator {
    current: Option<Sample>,
    finalized: usize,
}

impl SampleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_accumulating(&self) -> bool {
        self.current.is_some()
    }

    /// Number of samples handed out so far.
    pub fn finalized_count(&self) -> usize {
        self.finalized
    }

    /// Feed one field. Returns the previous sample when `field` starts a new one.
    pub fn push(&mut self, field: SampleField) -> Option<Sample> {
        match field {
            SampleField::Time(time) => return self.begin(time),
            SampleField::Depth(depth) => self.current_mut().depth.set(depth),
            SampleField::Temperature(temperature) => {
                self.current_mut().temperature.set(temperature)
            }
            SampleField::Pressure { tank, bar } => {
                self.current_mut().pressures.push(TankPressure { tank, bar })
            }
            SampleField::Event(raw) => match SampleEvent::try_from(raw) {
                Ok(event) => self.current_mut().events.push(event),
                Err(code) => warn!("skipping event with unknown code {}", code),
            },
            SampleField::Rbt(minutes) => self.current_mut().rbt.set(minutes),
            SampleField::HeartBeat(bpm) => self.current_mut().heartbeat.set(bpm),
            SampleField::Bearing(degrees) => self.current_mut().bearing.set(degrees),
            SampleField::Vendor { kind, data } => {
                debug!("dropping {} bytes of vendor data (type {})", data.len(), kind)
            }
        }
        None
    }

    fn begin(&mut self, time: Duration) -> Option<Sample> {
        let finished = self.flush();
        if let Some(prev) = finished.as_ref().and_then(|s| s.time.as_option()) {
            if time <= *prev {
                warn!("sample time {} does not advance past {}", time, prev);
            }
        }
        self.current = Some(Sample::at(time));
        finished
    }

    fn current_mut(&mut self) -> &mut Sample {
        self.current.get_or_insert_with(Sample::default)
    }

    /// Finalize the in-progress sample, if any. Safe to call repeatedly.
    pub fn flush(&mut self) -> Option<Sample> {
        let sample = self.current.take()?;
        self.finalized += 1;
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{EventType, RawEvent};
    use proptest::prelude::*;

    fn time(s: f64) -> SampleField {
        SampleField::Time(Duration::from_seconds(s))
    }

    fn depth(m: f64) -> SampleField {
        SampleField::Depth(Length::from_metres(m))
    }

    #[test]
    fn test_time_boundaries() {
        let mut acc = SampleAccumulator::new();
        assert!(!acc.is_accumulating());

        assert_eq!(acc.push(time(0.0)), None);
        assert!(acc.is_accumulating());
        assert_eq!(acc.push(depth(0.0)), None);

        let first = acc.push(time(30.0)).unwrap();
        assert_eq!(first, Sample::at(Duration::from_seconds(0.0)).with_depth(Length::from_metres(0.0)));

        acc.push(depth(10.0));
        acc.push(SampleField::Temperature(Temperature::from_celsius(18.0)));
        let second = acc.flush().unwrap();
        assert_eq!(second.depth, ValidValue::new(Length::from_metres(10.0)));
        assert_eq!(
            second.temperature,
            ValidValue::new(Temperature::from_celsius(18.0))
        );
        assert!(!acc.is_accumulating());
        assert_eq!(acc.finalized_count(), 2);
    }

    #[test]
    fn test_flush_is_idempotent() {
        let mut acc = SampleAccumulator::new();
        assert_eq!(acc.flush(), None);

        acc.push(time(5.0));
        assert!(acc.flush().is_some());
        assert_eq!(acc.flush(), None);
        assert_eq!(acc.finalized_count(), 1);
    }

    #[test]
    fn test_field_before_time_starts_sample() {
        let mut acc = SampleAccumulator::new();
        acc.push(depth(3.0));
        let sample = acc.flush().unwrap();
        assert!(!sample.time.is_present());
        assert!(sample.depth.is_present());
    }

    #[test]
    fn test_unknown_event_code_is_skipped() {
        let mut acc = SampleAccumulator::new();
        acc.push(time(10.0));
        acc.push(SampleField::Event(RawEvent {
            code: 200,
            time: Duration::from_seconds(10.0),
            flags: 0,
            value: 0,
        }));
        acc.push(SampleField::Event(RawEvent {
            code: EventType::Ascent.code(),
            time: Duration::from_seconds(10.0),
            flags: 0,
            value: 0,
        }));
        let sample = acc.flush().unwrap();
        assert_eq!(sample.events.len(), 1);
        assert_eq!(sample.events[0].kind, EventType::Ascent);
    }

    #[test]
    fn test_auxiliary_fields() {
        let mut acc = SampleAccumulator::new();
        acc.push(time(20.0));
        acc.push(SampleField::Pressure { tank: 0, bar: 200.0 });
        acc.push(SampleField::Pressure { tank: 1, bar: 180.0 });
        acc.push(SampleField::Bearing(270));
        acc.push(SampleField::Rbt(42));
        acc.push(SampleField::HeartBeat(88));
        acc.push(SampleField::Vendor {
            kind: 1,
            data: vec![0xde, 0xad],
        });
        let sample = acc.flush().unwrap();
        assert_eq!(sample.pressures.len(), 2);
        assert_eq!(sample.bearing, ValidValue::new(270));
        assert_eq!(sample.rbt, ValidValue::new(42));
        assert_eq!(sample.heartbeat, ValidValue::new(88));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Time,
        Depth(u8),
        Temp(i8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Time),
            any::<u8>().prop_map(Op::Depth),
            any::<i8>().prop_map(Op::Temp),
        ]
    }

    proptest! {
        #[test]
        fn prop_one_sample_per_time_boundary(ops in prop::collection::vec(op(), 0..64)) {
            let mut acc = SampleAccumulator::new();
            let mut samples = Vec::new();
            // Fields delivered since the last boundary, replayed into an expected sample.
            let mut expected: Vec<Sample> = Vec::new();
            let mut t = 0.0;

            for op in &ops {
                let field = match op {
                    Op::Time => {
                        t += 1.0;
                        expected.push(Sample::at(Duration::from_seconds(t)));
                        time(t)
                    }
                    Op::Depth(d) => {
                        if expected.is_empty() {
                            expected.push(Sample::default());
                        }
                        let last = expected.last_mut().unwrap();
                        last.depth.set(Length::from_metres(*d as f64));
                        depth(*d as f64)
                    }
                    Op::Temp(c) => {
                        if expected.is_empty() {
                            expected.push(Sample::default());
                        }
                        let last = expected.last_mut().unwrap();
                        last.temperature.set(Temperature::from_celsius(*c as f64));
                        SampleField::Temperature(Temperature::from_celsius(*c as f64))
                    }
                };
                samples.extend(acc.push(field));
            }
            samples.extend(acc.flush());

            let boundaries = ops.iter().filter(|op| matches!(op, Op::Time)).count();
            let leading = usize::from(!matches!(ops.first(), None | Some(Op::Time)));
            prop_assert_eq!(samples.len(), boundaries + leading);
            prop_assert_eq!(acc.finalized_count(), samples.len());
            prop_assert_eq!(samples, expected);
        }
    }
}
