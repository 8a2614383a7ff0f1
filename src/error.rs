use thiserror::Error;

/// Malformed or unencodable hash string input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid symbol {byte:#04x} at offset {offset}")]
    InvalidSymbol { byte: u8, offset: usize },

    #[error("hash data is truncated")]
    Truncated,

    #[error("hash contains an empty key")]
    EmptyKey,

    #[error("invalid number in field '{field}'")]
    InvalidNumber { field: &'static str },

    #[error("field '{field}' contains the delimiter and cannot be encoded")]
    UnencodableByte { field: &'static str },

    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("unsupported hash tag '{0}'")]
    UnsupportedTag(String),
}

/// Rejected cost parameters or derivation resources.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CostError {
    #[error("invalid work factor N={0}: must be a power of two greater than 1")]
    InvalidWorkFactor(u64),

    #[error("r and p must be nonzero with r * p < 2^30 (got r={r}, p={p})")]
    InvalidBlockParallel { r: u32, p: u32 },

    #[error("invalid derived key length {0}")]
    InvalidOutputLength(usize),

    #[error("derivation needs more memory than available")]
    ResourceExhausted,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Cost(#[from] CostError),
}

impl Error {
    /// Process exit status for this error. Never 0 or 1.
    pub fn code(&self) -> u8 {
        match self {
            Error::Format(e) => match e {
                FormatError::InvalidSymbol { .. } => 10,
                FormatError::Truncated => 11,
                FormatError::EmptyKey => 12,
                FormatError::InvalidNumber { .. } => 13,
                FormatError::UnencodableByte { .. } => 14,
                FormatError::FieldCount { .. } => 15,
                FormatError::UnsupportedTag(_) => 16,
            },
            Error::Cost(e) => match e {
                CostError::InvalidWorkFactor(_) => 20,
                CostError::InvalidBlockParallel { .. } => 21,
                CostError::InvalidOutputLength(_) => 22,
                CostError::ResourceExhausted => 23,
            },
        }
    }
}
