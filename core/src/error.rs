use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShuffleError {
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {field} = {value} (allowed {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min:   i64,
        max:   i64,
    },

    #[error("Invalid distribution '{name}': {reason}")]
    InvalidDistribution { name: &'static str, reason: String },

    #[error("Invalid score weight '{name}': {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ShuffleResult<T> = Result<T, ShuffleError>;
