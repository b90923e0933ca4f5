#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("pattern must start with '/'")]
    MissingLeadingSlash,

    #[error("invalid pattern at {pos}: {msg}")]
    InvalidPattern { pos: usize, msg: &'static str },

    #[error("invalid capture expression: {0}")]
    Regex(#[from] regex::Error),

    #[error("fast router does not support method filters yet")]
    FastMethodFilter,

    #[error("fast router only accepts plain paths, no pattern syntax")]
    FastNotLiteral,

    #[error("controller has no routes")]
    EmptyController,
}

impl RouterError {
    pub(crate) fn invalid(pos: usize, msg: &'static str) -> Self {
        Self::InvalidPattern { pos, msg }
    }
}
