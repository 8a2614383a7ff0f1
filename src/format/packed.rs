//! Packed binary record behind the base91 hash format.
//!
//! ```text
//! N (8) | r (4) | p (4) | SALT_LEN (4) | SALT (SALT_LEN) | KEY (remaining bytes)
//! ```
//! All integers are little-endian. The key length is implicit: it is always the
//! derivation output length, so it never needs to be stored.

use super::HashParts;
use crate::crypto::CostParams;
use crate::error::FormatError;

const N_LEN: usize = 8;
const R_LEN: usize = 4;
const P_LEN: usize = 4;
const SALT_LEN_LEN: usize = 4;

/// Fixed header length preceding the salt.
pub const HEADER_LEN: usize = N_LEN + R_LEN + P_LEN + SALT_LEN_LEN;

/// Packs cost parameters, salt and key into one buffer.
///
/// # Panics
///
/// Panics if `salt` is longer than `u32::MAX` bytes.
pub fn pack(params: &CostParams, salt: &[u8], key: &[u8]) -> Vec<u8> {
    let salt_len = u32::try_from(salt.len()).expect("salt longer than u32::MAX bytes");

    let mut buf = Vec::with_capacity(HEADER_LEN + salt.len() + key.len());

    buf.extend_from_slice(&params.n().to_le_bytes());
    buf.extend_from_slice(&params.r().to_le_bytes());
    buf.extend_from_slice(&params.p().to_le_bytes());
    buf.extend_from_slice(&salt_len.to_le_bytes());

    buf.extend_from_slice(salt);
    buf.extend_from_slice(key);

    buf
}

/// Unpacks a buffer produced by [`pack`].
///
/// # Errors
///
/// Returns an error if:
/// - the buffer is shorter than the header or the announced salt (`Truncated`)
/// - no bytes are left for the key (`EmptyKey`)
pub fn unpack(data: &[u8]) -> Result<HashParts, FormatError> {
    if data.len() < HEADER_LEN {
        return Err(FormatError::Truncated);
    }

    let (n, rest) = data.split_at(N_LEN);
    let (r, rest) = rest.split_at(R_LEN);
    let (p, rest) = rest.split_at(P_LEN);
    let (salt_len, rest) = rest.split_at(SALT_LEN_LEN);

    let n = u64::from_le_bytes(n.try_into().map_err(|_| FormatError::Truncated)?);
    let r = u32::from_le_bytes(r.try_into().map_err(|_| FormatError::Truncated)?);
    let p = u32::from_le_bytes(p.try_into().map_err(|_| FormatError::Truncated)?);
    let salt_len = u32::from_le_bytes(salt_len.try_into().map_err(|_| FormatError::Truncated)?);

    let salt_len = usize::try_from(salt_len).map_err(|_| FormatError::Truncated)?;
    if rest.len() < salt_len {
        return Err(FormatError::Truncated);
    }

    let (salt, key) = rest.split_at(salt_len);
    if key.is_empty() {
        return Err(FormatError::EmptyKey);
    }

    Ok(HashParts::new(
        CostParams::new(n, r, p),
        salt.to_vec(),
        key.to_vec(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let params = CostParams::new(16384, 8, 1);
        let bytes = pack(&params, b"NaCl", &[7u8; 32]);

        assert_eq!(bytes.len(), HEADER_LEN + 4 + 32);

        let parsed = unpack(&bytes).unwrap();
        assert_eq!(*parsed.params(), params);
        assert_eq!(parsed.salt(), b"NaCl");
        assert_eq!(parsed.key(), &[7u8; 32]);
    }

    #[test]
    fn layout_is_little_endian() {
        let bytes = pack(&CostParams::new(0x0102_0304_0506_0708, 0x0a0b_0c0d, 0x1112_1314), b"s", b"k");

        assert_eq!(&bytes[..8], &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[8..12], &[0x0d, 0x0c, 0x0b, 0x0a]);
        assert_eq!(&bytes[12..16], &[0x14, 0x13, 0x12, 0x11]);
        assert_eq!(&bytes[16..20], &[1, 0, 0, 0]);
        assert_eq!(&bytes[20..], b"sk");
    }

    #[test]
    fn empty_salt_is_legal() {
        let parsed = unpack(&pack(&CostParams::new(16, 1, 1), b"", b"key")).unwrap();
        assert!(parsed.salt().is_empty());
        assert_eq!(parsed.key(), b"key");
    }

    #[test]
    fn invalid_params_are_preserved() {
        let params = CostParams::new(3, 0, u32::MAX);
        let parsed = unpack(&pack(&params, b"salt", b"key")).unwrap();
        assert_eq!(*parsed.params(), params);
    }

    #[test]
    fn header_too_short_fails() {
        assert_eq!(unpack(&[0u8; 15]), Err(FormatError::Truncated));
        assert_eq!(unpack(&[0u8; HEADER_LEN - 1]), Err(FormatError::Truncated));
        assert_eq!(unpack(&[]), Err(FormatError::Truncated));
    }

    #[test]
    fn salt_longer_than_data_fails() {
        let mut bytes = pack(&CostParams::new(16, 1, 1), b"salt", b"key");
        bytes[16..20].copy_from_slice(&100u32.to_le_bytes());
        assert_eq!(unpack(&bytes), Err(FormatError::Truncated));
    }

    #[test]
    fn missing_key_fails() {
        let bytes = pack(&CostParams::new(16, 1, 1), b"salt", b"");
        assert_eq!(unpack(&bytes), Err(FormatError::EmptyKey));
        assert_eq!(unpack(&[0u8; HEADER_LEN]), Err(FormatError::EmptyKey));
    }
}
