use std::fmt;

/// Errors returned by the CSIDH key and exchange operations.
#[derive(Debug)]
pub enum CsidhError {
    /// A byte buffer passed to a decoder had the wrong length.
    InvalidLength { expected: usize, actual: usize },
    /// A public key failed the range, singular-curve or supersingularity check.
    InvalidPublicKey,
    /// The random source failed to produce bytes.
    Rng(rand_core::Error),
    /// A rejection-sampling loop ran past its configured bound.
    IterationLimit(&'static str),
}

impl fmt::Display for CsidhError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsidhError::InvalidLength { expected, actual } => {
                write!(f, "invalid input length: expected {expected} bytes, got {actual}")
            }
            CsidhError::InvalidPublicKey => write!(f, "public key failed validation"),
            CsidhError::Rng(e) => write!(f, "random source failure: {e}"),
            CsidhError::IterationLimit(what) => write!(f, "iteration limit reached during {what}"),
        }
    }
}

impl std::error::Error for CsidhError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CsidhError::Rng(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rand_core::Error> for CsidhError {
    fn from(e: rand_core::Error) -> Self {
        CsidhError::Rng(e)
    }
}
