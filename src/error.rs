use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("could not convert '{0}' to a number")]
    InvalidNumber(String),

    #[error("invalid date '{0}', expected DD-MM-YYYY")]
    InvalidDate(String),

    #[error("{0}")]
    InvalidChoice(String),

    #[error("could not decode answer: {0}")]
    Undecodable(String),

    #[error("pricing error: {0}")]
    Pricing(String),

    #[error("input stream closed")]
    EndOfInput,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CalcResult<T> = Result<T, CalcError>;

impl CalcError {
    pub fn pricing(msg: impl Into<String>) -> Self {
        Self::Pricing(msg.into())
    }

    pub fn choice(msg: impl Into<String>) -> Self {
        Self::InvalidChoice(msg.into())
    }

    /// Console failures end the session; everything else restarts the prompts.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::EndOfInput | Self::Io(_))
    }
}
