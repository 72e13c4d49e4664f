//! Domain error types.

/// Top-level error type for dipbuyer.
#[derive(Debug, thiserror::Error)]
pub enum DipbuyerError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {code} on {exchange}")]
    NoData { code: String, exchange: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&DipbuyerError> for std::process::ExitCode {
    fn from(err: &DipbuyerError) -> Self {
        let code: u8 = match err {
            DipbuyerError::Io(_) => 1,
            DipbuyerError::ConfigParse { .. }
            | DipbuyerError::ConfigMissing { .. }
            | DipbuyerError::ConfigInvalid { .. } => 2,
            DipbuyerError::Data { .. } => 3,
            DipbuyerError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
