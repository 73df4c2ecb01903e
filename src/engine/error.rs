use chrono::NaiveDateTime;

#[derive(Debug)]
pub enum EngineError {
    /// Availability submission spanning more than one calendar date.
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    LimitExceeded(&'static str),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidRange { start, end } => {
                write!(f, "start and end must be on the same date: {start} .. {end}")
            }
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
