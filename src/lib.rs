//! Encode and verify scrypt password hashes.
//!
//! A hash string bundles the scrypt cost parameters, the salt and the derived
//! key. [`hash_password`] produces one, [`verify`] checks a password against it.

pub mod base91;
pub mod crypto;
mod error;
pub mod format;
pub mod logging;
mod verify;

pub use crate::crypto::{CostParams, KeyDerivation, Scrypt};
pub use crate::error::{CostError, Error, FormatError};
pub use crate::format::{EncodedHash, HashFormat, HashParts};
pub use crate::verify::{Verification, verify, verify_detect};

use log::debug;

/// Derives a `key_len` byte key and encodes it with its parameters and salt.
///
/// # Errors
///
/// Returns `Error::Cost` if derivation rejects the parameters or length and
/// `Error::Format` if the result cannot be written in `format`.
pub fn hash_password<K>(
    kdf: &K,
    password: &[u8],
    salt: &[u8],
    params: CostParams,
    key_len: usize,
    format: HashFormat,
) -> Result<String, Error>
where
    K: KeyDerivation + ?Sized,
{
    let key = kdf.derive(password, salt, &params, key_len)?;
    debug!("encoding {key_len} byte key as {format}");

    let hash = EncodedHash::new(format, HashParts::new(params, salt.to_vec(), key.to_vec()));
    Ok(hash.encode()?)
}
