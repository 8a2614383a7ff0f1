//! Base91 hash strings: the packed record encoded as base91 text.

use super::{HashParts, packed};
use crate::crypto::CostParams;
use crate::error::FormatError;

/// Encodes cost parameters, salt and key as a single base91 string.
pub fn to_string(params: &CostParams, salt: &[u8], key: &[u8]) -> String {
    crate::base91::encode(&packed::pack(params, salt, key))
}

/// Parses a base91 hash string.
///
/// # Errors
///
/// Returns the base91 decoding error or the record unpacking error unchanged.
pub fn parse(hash: &str) -> Result<HashParts, FormatError> {
    let data = crate::base91::decode(hash)?;
    packed::unpack(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{KeyDerivation, Scrypt};

    #[test]
    fn scrypt_vector_roundtrip() {
        let params = CostParams::new(16, 1, 1);
        let key = Scrypt::new().derive(b"", b"", &params, 64).unwrap();

        let hash = to_string(&params, b"", &key);
        let parsed = parse(&hash).unwrap();

        assert_eq!(*parsed.params(), params);
        assert!(parsed.salt().is_empty());
        assert_eq!(parsed.key(), key.as_slice());
        assert_eq!(parsed.key()[..4], [0x77, 0xd6, 0x57, 0x62]);
    }

    #[test]
    fn output_is_single_printable_token() {
        let hash = to_string(&CostParams::default(), &[0u8, 255, 32, 9], &[0xff; 32]);
        assert!(hash.bytes().all(|c| c.is_ascii_graphic()));
        assert!(!hash.contains(['"', '\'', '\\']));
    }

    #[test]
    fn invalid_symbol_surfaces_unchanged() {
        let mut hash = to_string(&CostParams::default(), b"salt", &[1u8; 32]);
        hash.insert(3, '\\');
        assert_eq!(
            parse(&hash),
            Err(FormatError::InvalidSymbol {
                byte: b'\\',
                offset: 3
            })
        );
    }

    #[test]
    fn truncated_record_surfaces_unchanged() {
        let hash = crate::base91::encode(&[0u8; 10]);
        assert_eq!(parse(&hash), Err(FormatError::Truncated));
    }

    #[test]
    fn empty_string_is_truncated() {
        assert_eq!(parse(""), Err(FormatError::Truncated));
    }
}
