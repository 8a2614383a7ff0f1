//! Password verification against an encoded hash.

use std::fmt;

use log::debug;
use subtle::ConstantTimeEq;

use crate::crypto::KeyDerivation;
use crate::error::Error;
use crate::format::{EncodedHash, HashFormat};

/// Outcome of a well-formed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Success,
    Failure,
}

impl Verification {
    pub fn is_success(self) -> bool {
        self == Verification::Success
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verification::Success => write!(f, "success"),
            Verification::Failure => write!(f, "failure"),
        }
    }
}

/// Checks `password` against `hash` written in `format`.
///
/// The key embedded in the hash fixes the derivation output length. A wrong
/// password yields `Ok(Verification::Failure)`; only unparsable hashes and
/// rejected cost parameters are errors.
///
/// # Errors
///
/// Returns `Error::Format` if the hash cannot be parsed and `Error::Cost` if
/// the derivation rejects its parameters.
pub fn verify<K>(
    kdf: &K,
    password: &[u8],
    hash: &str,
    format: HashFormat,
) -> Result<Verification, Error>
where
    K: KeyDerivation + ?Sized,
{
    let parsed = EncodedHash::parse(hash, format)?;
    let parts = parsed.parts();
    let expected = parts.key();

    debug!("verifying {format} hash with {} byte key", expected.len());

    let derived = kdf.derive(password, parts.salt(), parts.params(), expected.len())?;

    Ok(compare(&derived, expected))
}

/// Like [`verify`], with the format picked by [`HashFormat::detect`].
///
/// # Errors
///
/// Same as [`verify`].
pub fn verify_detect<K>(kdf: &K, password: &[u8], hash: &str) -> Result<Verification, Error>
where
    K: KeyDerivation + ?Sized,
{
    verify(kdf, password, hash, HashFormat::detect(hash))
}

/// Equal length and content, without early exit on the first differing byte.
fn compare(derived: &[u8], expected: &[u8]) -> Verification {
    if derived.len() == expected.len() && bool::from(derived.ct_eq(expected)) {
        Verification::Success
    } else {
        Verification::Failure
    }
}
