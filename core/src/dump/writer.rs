use std::io::Write;

use crate::error::ExportError;
use crate::field::SampleField;
use crate::parser::DiveParser;
use crate::xml::format_datetime;

/// Write everything `parser` decodes as a text dump.
pub fn write_dump<P, W>(parser: &mut P, out: &mut W) -> Result<(), ExportError>
where
    P: DiveParser,
    W: Write,
{
    let start = parser.datetime()?;
    let duration = parser.dive_time()?;
    let max_depth = parser.max_depth()?;

    writeln!(out, "Dive info:")?;
    writeln!(out, "  Date: {}", format_datetime(&start))?;
    writeln!(out, "  Dive time: {}", duration)?;
    writeln!(out, "  Max Depth: {}", max_depth)?;

    let mut in_sample = false;
    parser.for_each_sample(|field| {
        if let SampleField::Time(_) = field {
            if in_sample {
                writeln!(out, "End Sample")?;
            }
            writeln!(out, "Begin Sample")?;
            in_sample = true;
        }
        write_field(out, &field)?;
        Ok(())
    })?;
    if in_sample {
        writeln!(out, "End Sample")?;
    }
    out.flush()?;
    Ok(())
}

fn write_field<W: Write>(out: &mut W, field: &SampleField) -> std::io::Result<()> {
    match field {
        SampleField::Time(time) => writeln!(out, "  Time: {}", time),
        SampleField::Depth(depth) => writeln!(out, "  Depth: {}", depth),
        SampleField::Pressure { tank, bar } => writeln!(out, "  Pressure [{}]: {}", tank, bar),
        SampleField::Temperature(temperature) => writeln!(out, "  Temperature: {}", temperature),
        SampleField::Event(event) => writeln!(
            out,
            "  Event: [ type: {} time: {} flags: {} value: {} ]",
            event.code, event.time, event.flags, event.value
        ),
        SampleField::Rbt(minutes) => writeln!(out, "  RBT: {}", minutes),
        SampleField::HeartBeat(bpm) => writeln!(out, "  Heart Beat: {}", bpm),
        SampleField::Bearing(degrees) => writeln!(out, "  Bearing: {}", degrees),
        SampleField::Vendor { kind, data } => {
            let hex: String = data.iter().map(|b| format!("{:02x}", b)).collect();
            writeln!(out, "  Vendor [{}]: {}", kind, hex)
        }
    }
}
