use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    #[error("start")]
    Start,
    #[error("end")]
    End,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Time value must not be empty.")]
    TimeEmpty,
    #[error("Invalid time '{value}'. Expected ISO-8601, e.g. 2023-06-01T10:15:30Z.")]
    InvalidTime { value: String },
    #[error("Speed must not be empty.")]
    SpeedEmpty,
    #[error(
        "Invalid speed '{value}'. Use a positive number of seconds or one of hours, days, weeks, months, years."
    )]
    InvalidSpeed { value: String },
    #[error("Speed '{value}' must be > 0.")]
    SpeedNotPositive { value: String },
    #[error("Invalid range '{value}'. Expected 'start/end'.")]
    InvalidRangeFormat { value: String },
    #[error("Range {bound} is missing.")]
    RangeBoundMissing { bound: RangeBound },
    #[error("Range start {start} is after range end {end}.")]
    RangeStartAfterEnd { start: String, end: String },
    #[error("Invalid layer '{value}'. Expected 'NAME=URL'.")]
    InvalidLayerFormat { value: String },
    #[error("Layer '{name}' has an invalid URL '{value}': {source}")]
    InvalidLayerUrl {
        name: String,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unknown layer type '{value}'. Use WMSTime, WMS, Tile, or Vector.")]
    UnknownLayerKind { value: String },
    #[error("Invalid tick count '{value}'. Expected an integer >= 1.")]
    InvalidTicks { value: String },
    #[error("Invalid boolean value '{value}'.")]
    InvalidBoolean { value: String },
    #[error("Time format must not be empty.")]
    TimeFormatEmpty,
    #[error("Unterminated literal in time format '{value}'.")]
    UnterminatedFormatLiteral { value: String },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
