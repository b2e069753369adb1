//! Domain error types.

/// A parse error with position information for strategy text parsing.
#[derive(Debug, Clone, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        let caret = " ".repeat(self.position) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// Top-level error type for stratsim.
#[derive(Debug, thiserror::Error)]
pub enum StratsimError {
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

    #[error(transparent)]
    RuleParse(#[from] ParseError),

    #[error("invalid strategy: {reason}")]
    StrategyInvalid { reason: String },

    #[error("empty price series")]
    NoData,

    #[error("insufficient data: have {bars} bars, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StratsimError> for std::process::ExitCode {
    fn from(err: &StratsimError) -> Self {
        let code: u8 = match err {
            StratsimError::Io(_) => 1,
            StratsimError::ConfigParse { .. }
            | StratsimError::ConfigMissing { .. }
            | StratsimError::ConfigInvalid { .. } => 2,
            StratsimError::DataSource { .. } => 3,
            StratsimError::RuleParse(_) | StratsimError::StrategyInvalid { .. } => 4,
            StratsimError::NoData | StratsimError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
