//! Domain error types.

/// Top-level error type for stockdash.
#[derive(Debug, thiserror::Error)]
pub enum StockdashError {
    #[error("missing column {column}: compute the indicator before evaluating this rule")]
    MissingColumn { column: String },

    #[error("invalid strategy name '{name}': {reason}")]
    NameFormat { name: String, reason: String },

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

    #[error("no data for {code}")]
    NoData { code: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StockdashError> for std::process::ExitCode {
    fn from(err: &StockdashError) -> Self {
        let code: u8 = match err {
            StockdashError::Io(_) => 1,
            StockdashError::ConfigParse { .. }
            | StockdashError::ConfigMissing { .. }
            | StockdashError::ConfigInvalid { .. } => 2,
            StockdashError::Data { .. } | StockdashError::NoData { .. } => 3,
            StockdashError::NameFormat { .. } | StockdashError::MissingColumn { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
