//! Text encoding for keys.
//!
//! ```text
//! public key: base32( prefix(1) ‖ ed25519 public key(32) ‖ crc16(2) )
//! seed:       base32( seed prefix + class prefix(2) ‖ ed25519 seed(32) ‖ crc16(2) )
//! ```
//!
//! Base32 uses the RFC 4648 alphabet without padding. The checksum is
//! CRC-16/XMODEM over everything that precedes it, stored little-endian.

use crate::{KeyClass, KeyError, SEED_LENGTH};

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Prefix byte of every seed (renders as `S`).
pub const SEED_PREFIX: u8 = 18 << 3;

/// Encode bytes as unpadded RFC 4648 base32.
#[must_use]
pub fn base32_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits = 0u32;

    for &byte in data {
        buffer = (buffer << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
        buffer &= (1 << bits) - 1;
    }

    if bits > 0 {
        out.push(ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }

    out
}

/// Decode unpadded RFC 4648 base32. Returns `None` on characters outside the
/// alphabet or on non-zero trailing bits.
#[must_use]
pub fn base32_decode(text: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits = 0u32;

    for ch in text.bytes() {
        let value = match ch {
            b'A'..=b'Z' => ch - b'A',
            b'2'..=b'7' => ch - b'2' + 26,
            _ => return None,
        };
        buffer = (buffer << 5) | u32::from(value);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push(((buffer >> bits) & 0xff) as u8);
            buffer &= (1 << bits) - 1;
        }
    }

    if buffer != 0 {
        return None;
    }

    Some(out)
}

/// CRC-16/XMODEM (polynomial 0x1021, initial value 0).
#[must_use]
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

fn with_checksum(mut raw: Vec<u8>) -> String {
    let crc = crc16(&raw);
    raw.extend_from_slice(&crc.to_le_bytes());
    base32_encode(&raw)
}

/// Decode base32 text and strip a verified CRC-16 trailer.
fn without_checksum(text: &str) -> Option<Vec<u8>> {
    let mut raw = base32_decode(text)?;
    if raw.len() < 3 {
        return None;
    }
    let split = raw.len() - 2;
    let expected = u16::from_le_bytes([raw[split], raw[split + 1]]);
    raw.truncate(split);
    (crc16(&raw) == expected).then_some(raw)
}

/// Encode a public key of the given class.
#[must_use]
pub fn encode_public(class: KeyClass, key: &[u8; 32]) -> String {
    let mut raw = Vec::with_capacity(35);
    raw.push(class.prefix());
    raw.extend_from_slice(key);
    with_checksum(raw)
}

/// Decode an encoded public key into its class and raw key bytes.
///
/// # Errors
///
/// Returns [`KeyError::InvalidPublicKey`] on malformed text or checksum
/// mismatch and [`KeyError::UnknownKeyClass`] on a prefix of another key kind.
pub fn decode_public(text: &str) -> Result<(KeyClass, [u8; 32]), KeyError> {
    let raw = without_checksum(text).ok_or(KeyError::InvalidPublicKey("bad encoding or checksum"))?;
    let (&prefix, key) = raw
        .split_first()
        .ok_or(KeyError::InvalidPublicKey("empty key"))?;
    if prefix & 0xf8 == SEED_PREFIX {
        return Err(KeyError::InvalidPublicKey("value is a seed"));
    }
    let class = KeyClass::from_prefix(prefix)?;
    let key: [u8; 32] = key
        .try_into()
        .map_err(|_| KeyError::InvalidPublicKey("wrong key length"))?;
    Ok((class, key))
}

/// Encode a raw ed25519 seed of the given class.
#[must_use]
pub fn encode_seed(class: KeyClass, seed: &[u8; SEED_LENGTH]) -> String {
    let prefix = class.prefix();
    let mut raw = Vec::with_capacity(SEED_LENGTH + 4);
    raw.push(SEED_PREFIX | (prefix >> 5));
    raw.push((prefix & 0x1f) << 3);
    raw.extend_from_slice(seed);
    with_checksum(raw)
}

/// Decode an encoded seed into its class and raw seed bytes.
///
/// # Errors
///
/// Returns [`KeyError::InvalidSeed`] on malformed text, checksum mismatch or a
/// missing seed prefix, and [`KeyError::UnknownKeyClass`] on a class prefix
/// other than Operator, Account or User.
pub fn decode_seed(text: &str) -> Result<(KeyClass, [u8; SEED_LENGTH]), KeyError> {
    let raw = without_checksum(text).ok_or(KeyError::InvalidSeed("bad encoding or checksum"))?;
    if raw.len() != SEED_LENGTH + 2 {
        return Err(KeyError::InvalidSeed("wrong seed length"));
    }
    if raw[0] & 0xf8 != SEED_PREFIX {
        return Err(KeyError::InvalidSeed("missing seed prefix"));
    }
    let prefix = ((raw[0] & 0x07) << 5) | ((raw[1] & 0xf8) >> 3);
    let class = KeyClass::from_prefix(prefix)?;
    let mut seed = [0u8; SEED_LENGTH];
    seed.copy_from_slice(&raw[2..]);
    Ok((class, seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_matches_rfc4648_vectors() {
        assert_eq!(base32_encode(b""), "");
        assert_eq!(base32_encode(b"f"), "MY");
        assert_eq!(base32_encode(b"fo"), "MZXQ");
        assert_eq!(base32_encode(b"foo"), "MZXW6");
        assert_eq!(base32_encode(b"foob"), "MZXW6YQ");
        assert_eq!(base32_encode(b"fooba"), "MZXW6YTB");
        assert_eq!(base32_encode(b"foobar"), "MZXW6YTBOI");
        assert_eq!(base32_decode("MZXW6YTBOI").unwrap(), b"foobar");
    }

    #[test]
    fn it_rejects_lowercase_and_padding() {
        assert!(base32_decode("mzxw6").is_none());
        assert!(base32_decode("MY======").is_none());
    }

    #[test]
    fn it_computes_xmodem_checksum() {
        assert_eq!(crc16(b"123456789"), 0x31c3);
    }

    #[test]
    fn it_renders_class_letters() {
        let key = [7u8; 32];
        assert!(encode_public(KeyClass::Operator, &key).starts_with('O'));
        assert!(encode_public(KeyClass::Account, &key).starts_with('A'));
        assert!(encode_public(KeyClass::User, &key).starts_with('U'));
        assert!(encode_seed(KeyClass::Operator, &key).starts_with("SO"));
        assert!(encode_seed(KeyClass::Account, &key).starts_with("SA"));
        assert!(encode_seed(KeyClass::User, &key).starts_with("SU"));
    }

    #[test]
    fn it_detects_a_flipped_character() {
        let encoded = encode_public(KeyClass::Account, &[1u8; 32]);
        let mut chars: Vec<char> = encoded.chars().collect();
        chars[10] = if chars[10] == 'B' { 'C' } else { 'B' };
        let tampered: String = chars.into_iter().collect();
        assert!(matches!(
            decode_public(&tampered),
            Err(KeyError::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn it_refuses_a_seed_as_public_key() {
        let seed = encode_seed(KeyClass::User, &[3u8; 32]);
        assert!(decode_public(&seed).is_err());
        let public = encode_public(KeyClass::User, &[3u8; 32]);
        assert!(matches!(decode_seed(&public), Err(KeyError::InvalidSeed(_))));
    }
}
