//! Interface to the external dive decoder.

use chrono::{DateTime, Utc};

use crate::error::{DecodeError, ExportError};
use crate::field::SampleField;
use crate::units::{Duration, Length};

/// A decoder positioned at one dive.
///
/// Summary fields are pulled once; samples are pushed field by field into the
/// callback given to [`for_each_sample`](Self::for_each_sample). The caller is
/// responsible for flushing the last sample once it returns.
pub trait DiveParser {
    fn dive_time(&self) -> Result<Duration, DecodeError>;
    fn max_depth(&self) -> Result<Length, DecodeError>;
    fn datetime(&self) -> Result<DateTime<Utc>, DecodeError>;

    /// Deliver every sample field in order. Stops at the first callback error.
    fn for_each_sample<F>(&mut self, callback: F) -> Result<(), ExportError>
    where
        F: FnMut(SampleField) -> Result<(), ExportError>;
}
