//! Hash string formats.
//!
//! A hash string carries scrypt cost parameters, the salt and the derived key.
//! Two encodings exist:
//! - [`HashFormat::Base91`]: a packed binary record written as base91 text
//! - [`HashFormat::Crypt`]: `$7$N$r$p$salt$key` with base64 payloads

use std::fmt;

use crate::crypto::CostParams;
use crate::error::FormatError;

pub mod base91;
pub mod crypt;
pub mod packed;

/// Selects the textual representation of a hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashFormat {
    #[default]
    Base91,
    Crypt,
}

impl HashFormat {
    /// Picks the format of `hash` from its prefix.
    ///
    /// Strings starting with the crypt prefix `$7$` are crypt-style, anything
    /// else is treated as base91. Base91 text may itself begin with `$7$`, so
    /// callers that know the format should pass it explicitly.
    pub fn detect(hash: &str) -> Self {
        if hash.starts_with(crypt::PREFIX) {
            HashFormat::Crypt
        } else {
            HashFormat::Base91
        }
    }
}

impl fmt::Display for HashFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashFormat::Base91 => write!(f, "base91"),
            HashFormat::Crypt => write!(f, "crypt"),
        }
    }
}

/// Cost parameters, salt and derived key of one hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashParts {
    params: CostParams,
    salt: Vec<u8>,
    key: Vec<u8>,
}

impl HashParts {
    pub fn new(params: CostParams, salt: Vec<u8>, key: Vec<u8>) -> Self {
        Self { params, salt, key }
    }

    /// Returns the cost parameters used for derivation.
    pub fn params(&self) -> &CostParams {
        &self.params
    }

    /// Returns the salt used for derivation.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Returns the derived key.
    pub fn key(&self) -> &[u8] {
        &self.key
    }
}

/// A decoded hash, tagged with the format it came from or will be written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedHash {
    Base91(HashParts),
    Crypt(HashParts),
}

impl EncodedHash {
    pub fn new(format: HashFormat, parts: HashParts) -> Self {
        match format {
            HashFormat::Base91 => EncodedHash::Base91(parts),
            HashFormat::Crypt => EncodedHash::Crypt(parts),
        }
    }

    /// Parses `hash` with the codec for `format`.
    ///
    /// # Errors
    ///
    /// Returns the codec's `FormatError` unchanged.
    pub fn parse(hash: &str, format: HashFormat) -> Result<Self, FormatError> {
        let parts = match format {
            HashFormat::Base91 => base91::parse(hash)?,
            HashFormat::Crypt => crypt::parse(hash)?,
        };
        Ok(Self::new(format, parts))
    }

    /// Serializes the hash in its own format.
    ///
    /// # Errors
    ///
    /// Returns an error if the parts cannot be represented in the format.
    pub fn encode(&self) -> Result<String, FormatError> {
        match self {
            EncodedHash::Base91(parts) => {
                Ok(base91::to_string(parts.params(), parts.salt(), parts.key()))
            }
            EncodedHash::Crypt(parts) => {
                crypt::to_string(parts.params(), parts.salt(), parts.key())
            }
        }
    }

    pub fn format(&self) -> HashFormat {
        match self {
            EncodedHash::Base91(_) => HashFormat::Base91,
            EncodedHash::Crypt(_) => HashFormat::Crypt,
        }
    }

    pub fn parts(&self) -> &HashParts {
        match self {
            EncodedHash::Base91(parts) | EncodedHash::Crypt(parts) => parts,
        }
    }

    pub fn into_parts(self) -> HashParts {
        match self {
            EncodedHash::Base91(parts) | EncodedHash::Crypt(parts) => parts,
        }
    }
}
