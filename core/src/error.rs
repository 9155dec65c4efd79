use thiserror::Error;

/// Returned when an absent [`ValidValue`](crate::value::ValidValue) is read.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("attempted to read an absent value")]
pub struct InvalidValueError;

/// Misuse of the streaming XML writer, or a failure of its sink.
#[derive(Error, Debug)]
pub enum XmlError {
    #[error("document already started")]
    DocumentAlreadyStarted,

    #[error("document not started")]
    DocumentNotStarted,

    #[error("document already ended")]
    DocumentEnded,

    #[error("no open element")]
    NoOpenElement,

    #[error("attribute '{attribute}' written after content of <{element}>")]
    AttributeAfterContent { element: String, attribute: String },

    #[error("document ended with {0} unclosed element(s)")]
    UnclosedElements(usize),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by the external dive decoder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unsupported feature")]
    Unsupported,

    #[error("type mismatch")]
    TypeMismatch,

    #[error("memory allocation failed")]
    Memory,

    #[error("decoder error: {0}")]
    Other(String),
}

/// Error type for a dive-to-UDDF conversion.
#[derive(Error, Debug, uniffi::Error)]
#[uniffi(flat_error)]
pub enum ExportError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error("sample is missing its {0}")]
    IncompleteSample(&'static str),

    #[error("event at {0}s arrived before any waypoint")]
    NoCurrentWaypoint(f64),

    #[error(transparent)]
    Dump(#[from] DumpError),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Error reading a text sample dump.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DumpError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("dump is missing the '{0}' header field")]
    MissingHeader(&'static str),

    #[error("empty dump")]
    Empty,
}

/// Error loading an [`ExportConfig`](crate::config::ExportConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}
