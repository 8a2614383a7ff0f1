//! Crypt-style hash strings.
//!
//! ```text
//! $7$<N>$<r>$<p>$<salt>$<key>
//! ```
//! [`CryptRecord`] handles the field layout and treats salt and key as opaque
//! payloads. It does not escape: a payload containing `$` cannot be encoded.
//! The hash functions on top carry salt and key as unpadded base64, which
//! never contains the delimiter.

use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD_NO_PAD};

use super::HashParts;
use crate::crypto::CostParams;
use crate::error::FormatError;

pub const DELIMITER: u8 = b'$';
/// Tag identifying scrypt hashes.
pub const TAG: &str = "7";
pub const PREFIX: &str = "$7$";

/// Number of fields after the leading delimiter.
const FIELD_COUNT: usize = 6;

/// base64 padding, never written to payloads.
const PAD: u8 = b'=';

/// One delimiter-separated crypt record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptRecord {
    tag: Vec<u8>,
    params: CostParams,
    salt: Vec<u8>,
    key: Vec<u8>,
}

impl CryptRecord {
    pub fn new(tag: impl Into<Vec<u8>>, params: CostParams, salt: Vec<u8>, key: Vec<u8>) -> Self {
        Self {
            tag: tag.into(),
            params,
            salt,
            key,
        }
    }

    pub fn tag(&self) -> &[u8] {
        &self.tag
    }

    pub fn params(&self) -> &CostParams {
        &self.params
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Joins the fields with the delimiter.
    ///
    /// # Errors
    ///
    /// Returns `UnencodableByte` if the tag, salt or key contains the delimiter.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        for (field, value) in [("tag", &self.tag), ("salt", &self.salt), ("key", &self.key)] {
            if value.contains(&DELIMITER) {
                return Err(FormatError::UnencodableByte { field });
            }
        }

        let numbers = format!(
            "{}${}${}",
            self.params.n(),
            self.params.r(),
            self.params.p()
        );

        let payload_len = self.tag.len() + numbers.len() + self.salt.len() + self.key.len();
        let mut buf = Vec::with_capacity(FIELD_COUNT + payload_len);
        buf.push(DELIMITER);
        buf.extend_from_slice(&self.tag);
        buf.push(DELIMITER);
        buf.extend_from_slice(numbers.as_bytes());
        buf.push(DELIMITER);
        buf.extend_from_slice(&self.salt);
        buf.push(DELIMITER);
        buf.extend_from_slice(&self.key);

        Ok(buf)
    }

    /// Splits a record into its fields.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the record does not start with the delimiter or has the wrong number of
    ///   fields after it (`found` is 0 without a leading delimiter)
    /// - `N`, `r` or `p` is not a canonical decimal number in range
    /// - the key field is empty
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        // fields after the leading delimiter; none without one
        let fields: Vec<&[u8]> = match data.split_first() {
            Some((&DELIMITER, rest)) => rest.split(|b| *b == DELIMITER).collect(),
            _ => Vec::new(),
        };

        let &[tag, n, r, p, salt, key] = fields.as_slice() else {
            return Err(FormatError::FieldCount {
                expected: FIELD_COUNT,
                found: fields.len(),
            });
        };

        let n = parse_decimal::<u64>(n, "N")?;
        let r = parse_decimal::<u32>(r, "r")?;
        let p = parse_decimal::<u32>(p, "p")?;

        if key.is_empty() {
            return Err(FormatError::EmptyKey);
        }

        Ok(Self::new(
            tag,
            CostParams::new(n, r, p),
            salt.to_vec(),
            key.to_vec(),
        ))
    }
}

/// Strict unsigned decimal: digits only, no sign, no redundant leading zero.
fn parse_decimal<T: FromStr>(field: &[u8], name: &'static str) -> Result<T, FormatError> {
    let invalid = FormatError::InvalidNumber { field: name };

    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return Err(invalid);
    }
    if field.len() > 1 && field[0] == b'0' {
        return Err(invalid);
    }

    std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(invalid)
}

/// Encodes cost parameters, salt and key as a `$7$` crypt string.
///
/// # Errors
///
/// Propagates `CryptRecord::to_bytes` errors; base64 payloads never trigger them.
pub fn to_string(params: &CostParams, salt: &[u8], key: &[u8]) -> Result<String, FormatError> {
    let record = CryptRecord::new(
        TAG,
        *params,
        STANDARD_NO_PAD.encode(salt).into_bytes(),
        STANDARD_NO_PAD.encode(key).into_bytes(),
    );
    record_to_string(&record)
}

/// Encodes a record whose fields are all text.
fn record_to_string(record: &CryptRecord) -> Result<String, FormatError> {
    let bytes = record.to_bytes()?;
    String::from_utf8(bytes).map_err(|_| FormatError::UnencodableByte { field: "tag" })
}

/// Parses a `$7$` crypt string.
///
/// # Errors
///
/// Returns an error if the record is malformed, the tag is not `7`, or a
/// payload is not valid base64.
pub fn parse(hash: &str) -> Result<HashParts, FormatError> {
    let record = CryptRecord::parse(hash.as_bytes())?;

    if record.tag() != TAG.as_bytes() {
        return Err(FormatError::UnsupportedTag(
            String::from_utf8_lossy(record.tag()).into_owned(),
        ));
    }

    let salt = decode_payload(record.salt(), hash, FIELD_COUNT - 2)?;
    let key = decode_payload(record.key(), hash, FIELD_COUNT - 1)?;

    Ok(HashParts::new(*record.params(), salt, key))
}

fn decode_payload(payload: &[u8], hash: &str, field_index: usize) -> Result<Vec<u8>, FormatError> {
    STANDARD_NO_PAD.decode(payload).map_err(|e| {
        let start = field_start(hash.as_bytes(), field_index);
        match e {
            base64::DecodeError::InvalidByte(offset, byte)
            | base64::DecodeError::InvalidLastSymbol(offset, byte) => FormatError::InvalidSymbol {
                byte,
                offset: start + offset,
            },
            base64::DecodeError::InvalidPadding => FormatError::InvalidSymbol {
                byte: PAD,
                offset: start + payload.iter().position(|b| *b == PAD).unwrap_or(payload.len()),
            },
            _ => FormatError::Truncated,
        }
    })
}

/// Byte offset of field `index` (0 = tag) in a record with a leading delimiter.
fn field_start(record: &[u8], index: usize) -> usize {
    record
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == DELIMITER)
        .nth(index)
        .map_or(0, |(i, _)| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_fields_parse_exactly() {
        let record = CryptRecord::parse(b"$7$1024$8$16$NaCl$derived").unwrap();

        assert_eq!(record.tag(), b"7");
        assert_eq!(record.params().n(), 1024);
        assert_eq!(record.params().r(), 8);
        assert_eq!(record.params().p(), 16);
        assert_eq!(record.salt(), b"NaCl");
        assert_eq!(record.key(), b"derived");
    }

    #[test]
    fn record_roundtrip() {
        let record = CryptRecord::new(
            "7",
            CostParams::new(16384, 8, 1),
            vec![0x00, 0x7f, 0xff],
            vec![0x01, 0x23, 0x45, 0x67],
        );
        let bytes = record.to_bytes().unwrap();
        assert_eq!(CryptRecord::parse(&bytes).unwrap(), record);
    }

    #[test]
    fn record_with_empty_salt_roundtrip() {
        let record = CryptRecord::new("7", CostParams::new(16, 1, 1), Vec::new(), b"k".to_vec());
        let bytes = record.to_bytes().unwrap();
        assert_eq!(bytes, b"$7$16$1$1$$k");
        assert_eq!(CryptRecord::parse(&bytes).unwrap(), record);
    }

    #[test]
    fn delimiter_in_payload_is_unencodable() {
        let salt = CryptRecord::new("7", CostParams::default(), b"a$b".to_vec(), b"k".to_vec());
        assert_eq!(
            salt.to_bytes(),
            Err(FormatError::UnencodableByte { field: "salt" })
        );

        let key = CryptRecord::new("7", CostParams::default(), b"s".to_vec(), b"$".to_vec());
        assert_eq!(
            key.to_bytes(),
            Err(FormatError::UnencodableByte { field: "key" })
        );
    }

    #[test]
    fn wrong_field_count_fails() {
        assert_eq!(
            CryptRecord::parse(b"$7$1024$8$16$salt"),
            Err(FormatError::FieldCount {
                expected: 6,
                found: 5
            })
        );
        assert_eq!(
            CryptRecord::parse(b"$7$1024$8$16$salt$key$extra"),
            Err(FormatError::FieldCount {
                expected: 6,
                found: 7
            })
        );
        for no_leading in [&b"7$1024$8$16$salt$key"[..], b"x$7$1024$8$16$salt$key", b""] {
            assert_eq!(
                CryptRecord::parse(no_leading),
                Err(FormatError::FieldCount {
                    expected: 6,
                    found: 0
                })
            );
        }
    }

    #[test]
    fn extra_fields_counted_after_leading_delimiter() {
        assert_eq!(
            CryptRecord::parse(b"$x$7$1024$8$16$salt$key"),
            Err(FormatError::FieldCount {
                expected: 6,
                found: 7
            })
        );
    }

    #[test]
    fn strict_numbers() {
        for bad in [
            &b"$7$+1024$8$16$s$k"[..],
            b"$7$-1024$8$16$s$k",
            b"$7$1024 $8$16$s$k",
            b"$7$$8$16$s$k",
            b"$7$01024$8$16$s$k",
            b"$7$1024$8x$16$s$k",
            b"$7$1024$8$4294967296$s$k",
            b"$7$18446744073709551616$8$16$s$k",
        ] {
            assert!(
                matches!(
                    CryptRecord::parse(bad),
                    Err(FormatError::InvalidNumber { .. })
                ),
                "{}",
                String::from_utf8_lossy(bad)
            );
        }

        let zero = CryptRecord::parse(b"$7$0$0$0$s$k").unwrap();
        assert_eq!(*zero.params(), CostParams::new(0, 0, 0));
    }

    #[test]
    fn invalid_number_names_field() {
        assert_eq!(
            CryptRecord::parse(b"$7$1024$8$p$s$k"),
            Err(FormatError::InvalidNumber { field: "p" })
        );
    }

    #[test]
    fn empty_key_fails() {
        assert_eq!(
            CryptRecord::parse(b"$7$1024$8$16$salt$"),
            Err(FormatError::EmptyKey)
        );
    }

    #[test]
    fn hash_roundtrip_with_binary_payloads() {
        let params = CostParams::new(1024, 8, 16);
        let salt = b"$$binary$$\x00\xff".to_vec();
        let key = vec![b'$'; 32];

        let hash = to_string(&params, &salt, &key).unwrap();
        assert!(hash.starts_with("$7$1024$8$16$"));

        let parts = parse(&hash).unwrap();
        assert_eq!(*parts.params(), params);
        assert_eq!(parts.salt(), salt.as_slice());
        assert_eq!(parts.key(), key.as_slice());
    }

    #[test]
    fn hash_known_string() {
        let hash = to_string(&CostParams::new(1024, 8, 16), b"NaCl", b"key").unwrap();
        assert_eq!(hash, "$7$1024$8$16$TmFDbA$a2V5");
        assert_eq!(parse(&hash).unwrap().salt(), b"NaCl");
    }

    #[test]
    fn hash_rejects_other_tags() {
        assert_eq!(
            parse("$2a$1024$8$16$TmFDbA$a2V5"),
            Err(FormatError::UnsupportedTag("2a".to_string()))
        );
    }

    #[test]
    fn hash_rejects_padding() {
        assert_eq!(
            parse("$7$1024$8$16$TQ==$a2V5"),
            Err(FormatError::InvalidSymbol {
                byte: b'=',
                offset: 15
            })
        );
    }

    #[test]
    fn hash_rejects_dangling_base64_symbol() {
        assert_eq!(parse("$7$1024$8$16$TmFDb$a2V5"), Err(FormatError::Truncated));
    }

    #[test]
    fn non_ascii_tag_is_unencodable() {
        let record = CryptRecord::new(
            vec![0xff],
            CostParams::new(16, 1, 1),
            b"s".to_vec(),
            b"k".to_vec(),
        );
        assert_eq!(
            record_to_string(&record),
            Err(FormatError::UnencodableByte { field: "tag" })
        );
    }

    #[test]
    fn hash_rejects_invalid_base64() {
        let err = parse("$7$1024$8$16$TmFD!A$a2V5").unwrap_err();
        assert_eq!(
            err,
            FormatError::InvalidSymbol {
                byte: b'!',
                offset: 17
            }
        );
    }
}
