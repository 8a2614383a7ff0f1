//! Base91 binary-to-text transcoding.
//!
//! Alphabet: the printable ASCII characters except space, `"`, `'` and `\`.
//! ```text
//! A-Z a-z 0-9 ! # $ % & ( ) * + , - . / : ; < = > ? @ [ ] ^ _ ` { | } ~
//! ```
//! Input bytes feed a little-endian bit queue. Every 13 or 14 bits become a
//! value below 91 * 91 that is written as two symbols, low digit first.

use crate::error::FormatError;

const ALPHABET: &[u8; 91] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!#$%&()*+,-./:;<=>?@[]^_`{|}~";

const INVALID: u8 = 0xff;

static DECODE: [u8; 256] = decode_table();

const fn decode_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

fn symbol(index: u32) -> char {
    char::from(ALPHABET[index as usize])
}

/// Encodes `data` as base91 text. Empty input yields an empty string.
pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 16 / 13 + 2);
    let mut queue: u32 = 0;
    let mut bits: u32 = 0;

    for &byte in data {
        queue |= u32::from(byte) << bits;
        bits += 8;

        if bits > 13 {
            let mut value = queue & 0x1fff;
            if value > 88 {
                queue >>= 13;
                bits -= 13;
            } else {
                value = queue & 0x3fff;
                queue >>= 14;
                bits -= 14;
            }
            out.push(symbol(value % 91));
            out.push(symbol(value / 91));
        }
    }

    if bits > 0 {
        out.push(symbol(queue % 91));
        if bits > 7 || queue > 90 {
            out.push(symbol(queue / 91));
        }
    }

    out
}

/// Decodes base91 `text` back into bytes.
///
/// # Errors
///
/// Returns an error if:
/// - a character is not part of the alphabet (`InvalidSymbol`)
/// - the text ends in a lone symbol that no encoder flush produces (`Truncated`)
pub fn decode(text: &str) -> Result<Vec<u8>, FormatError> {
    let input = text.as_bytes();
    let mut out = Vec::with_capacity(input.len() * 14 / 16 + 1);
    let mut queue: u32 = 0;
    let mut bits: u32 = 0;
    let mut pending: Option<u32> = None;

    for (offset, &byte) in input.iter().enumerate() {
        let digit = DECODE[usize::from(byte)];
        if digit == INVALID {
            return Err(FormatError::InvalidSymbol { byte, offset });
        }
        let digit = u32::from(digit);

        match pending.take() {
            None => pending = Some(digit),
            Some(low) => {
                let value = low + digit * 91;
                queue |= value << bits;
                bits += if value & 0x1fff > 88 { 13 } else { 14 };
                while bits > 7 {
                    out.push((queue & 0xff) as u8);
                    queue >>= 8;
                    bits -= 8;
                }
            }
        }
    }

    // a lone final symbol completes the partial byte already in the queue
    if let Some(value) = pending {
        if bits == 0 || value >> (8 - bits) != 0 {
            return Err(FormatError::Truncated);
        }
        out.push(((queue | value << bits) & 0xff) as u8);
    }

    Ok(out)
}
