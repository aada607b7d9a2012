use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (bad capture index, duplicate category, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// A rule pattern does not compile.
    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },
    /// An input file or directory could not be read.
    #[error("cannot read {path}: {message}")]
    Read { path: String, message: String },
    /// The documentation summary is not valid JSON or has the wrong shape.
    #[error("cannot parse documentation summary {path}: {message}")]
    DocsParse { path: String, message: String },
    /// A category refers to a list the documentation summary does not have.
    #[error("documentation summary has no list named '{0}'")]
    MissingDocList(String),
}

impl ReconError {
    pub fn read(path: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        Self::Read {
            path: path.to_string(),
            message: err.to_string(),
        }
    }

    /// True for failures to obtain or parse an input (as opposed to config problems).
    pub fn is_read_error(&self) -> bool {
        matches!(
            self,
            Self::Read { .. } | Self::DocsParse { .. } | Self::MissingDocList(_)
        )
    }
}
