//! Plain-text sample dumps.
//!
//! A dump lists the dive summary followed by every decoded field, one per
//! line, grouped into samples. It is meant for inspecting what a decoder
//! produced and for replaying captured dives through the exporter.
//!
//! # Format
//!
//! ```text
//! Dive info:
//!   Date: 2011-05-01T10:00:00Z
//!   Dive time: 1m0s
//!   Max Depth: 10m
//! Begin Sample
//!   Time: 30s
//!   Depth: 10m
//!   Temperature: 18C
//!   Pressure [0]: 200
//!   Event: [ type: 3 time: 30s flags: 0 value: 0 ]
//!   RBT: 12
//!   Heart Beat: 80
//!   Bearing: 270
//!   Vendor [1]: dead
//! End Sample
//! ```
//!
//! Only `Time` lines delimit samples when reading; the `Begin`/`End` markers
//! are informational.
//!
//! # Example
//!
//! ```
//! use divelog_uddf::dump::parse_dump;
//! use divelog_uddf::{export_uddf_string, ExportConfig};
//!
//! let text = "Dive info:\n  Date: 2011-05-01T10:00:00Z\n  Dive time: 1m0s\n  Max Depth: 10m\n\
//!             Begin Sample\n  Time: 0s\n  Depth: 0m\nEnd Sample\n";
//! let mut dive = parse_dump(text).expect("dump should parse");
//! let xml = export_uddf_string(&mut dive, &ExportConfig::default()).expect("export");
//! assert!(xml.contains("<dive id=\"dive-1304244000\">"));
//! ```

pub mod parser;
pub mod writer;

pub use parser::parse_dump;
pub use writer::write_dump;
