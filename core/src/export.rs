//! End-to-end conversion of one decoded dive into a UDDF document.

use std::io::Write;

use log::info;

use crate::builder::UddfBuilder;
use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::parser::DiveParser;
use crate::sample::SampleAccumulator;

/// Convert the dive `parser` is positioned at and write it to `out`.
///
/// The whole sample stream is consumed before anything is written, so a
/// decoder failure or malformed sample leaves `out` untouched.
pub fn export_uddf<P, W>(parser: &mut P, config: &ExportConfig, out: W) -> Result<W, ExportError>
where
    P: DiveParser,
    W: Write,
{
    let mut builder = UddfBuilder::new(parser, config)?;
    let mut accumulator = SampleAccumulator::new();

    parser.for_each_sample(|field| match accumulator.push(field) {
        Some(sample) => builder.add_sample(sample),
        None => Ok(()),
    })?;
    if let Some(sample) = accumulator.flush() {
        builder.add_sample(sample)?;
    }

    let dive = builder.current_dive();
    info!(
        "exporting {} with {} waypoints and {} global alarms",
        dive.id.0,
        dive.waypoints.len(),
        dive.after.global_alarms.len()
    );

    Ok(builder.write_to(out)?)
}

/// Like [`export_uddf`], returning the document as a string.
pub fn export_uddf_string<P: DiveParser>(
    parser: &mut P,
    config: &ExportConfig,
) -> Result<String, ExportError> {
    let bytes = export_uddf(parser, config, Vec::new())?;
    String::from_utf8(bytes)
        .map_err(|e| ExportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
