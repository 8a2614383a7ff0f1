//! Key derivation primitives.
//!
//! Wraps scrypt behind the [`KeyDerivation`] trait and provides salt generation.

pub mod kdf;
pub mod salt;

pub use kdf::{CostParams, DEFAULT_MEMORY_LIMIT, KeyDerivation, Scrypt};
pub use salt::generate_salt;

/// Default salt length (16 bytes / 128 bits).
pub const SALT_LEN: usize = 16;
/// Default derived key length (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
