//! CEP-57 checksummed hex.
//!
//! The checksum lives in the letter case of the hex digits: the blake2b-256
//! hash of the raw bytes is read bit by bit (least significant bit first,
//! cycling), and each alphabetic digit is uppercased when its bit is set.
//! Digits `0-9` consume no bits.
//!
//! A string whose letters are all lowercase or all uppercase carries no
//! checksum and is accepted as plain hex.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

use crate::limits::CHECKSUM_MAX_BYTES;

type Blake2b256 = Blake2b<U32>;

/// Result of checking the case-embedded checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumStatus {
    /// Mixed case and the checksum matches.
    Valid,
    /// Single-case string, or longer than the checksummed range.
    Absent,
    /// Mixed case and the checksum does not match.
    Invalid,
}

/// Decoded bytes together with the checksum verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub bytes: Vec<u8>,
    pub status: ChecksumStatus,
}

impl Decoded {
    /// True unless the checksum was present and wrong.
    pub fn is_valid(&self) -> bool {
        self.status != ChecksumStatus::Invalid
    }
}

/// Returns the 32-byte blake2b digest of `data`.
pub fn blake2b256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let hash = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&hash);
    out
}

/// Encodes `input` as checksummed hex.
pub fn encode(input: &[u8]) -> String {
    let plain = hex::encode(input);
    if input.len() > CHECKSUM_MAX_BYTES {
        return plain;
    }

    let hash = blake2b256(input);
    let mut hash_bits = hash
        .iter()
        .cycle()
        .flat_map(|&byte| (0..8u32).map(move |i| (byte >> i) & 1 == 1));

    plain
        .chars()
        .map(|c| {
            if c.is_ascii_alphabetic() && hash_bits.next().unwrap_or(false) {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

/// Decodes hex text and verifies its checksum when one is present.
pub fn decode(text: &str) -> Result<Decoded, hex::FromHexError> {
    let bytes = hex::decode(text)?;
    if bytes.len() > CHECKSUM_MAX_BYTES || is_same_case(text) {
        return Ok(Decoded {
            bytes,
            status: ChecksumStatus::Absent,
        });
    }

    let status = if encode(&bytes) == text {
        ChecksumStatus::Valid
    } else {
        ChecksumStatus::Invalid
    };
    Ok(Decoded { bytes, status })
}

fn is_same_case(text: &str) -> bool {
    text.chars().all(|c| !c.is_ascii_uppercase()) || text.chars().all(|c| !c.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn flip_case(c: char) -> char {
        if c.is_ascii_uppercase() {
            c.to_ascii_lowercase()
        } else {
            c.to_ascii_uppercase()
        }
    }

    #[test]
    fn test_digits_only_has_no_letters() {
        let encoded = encode(&[0x12, 0x34, 0x56]);
        assert_eq!(encoded, "123456");
    }

    #[test]
    fn test_known_vectors() {
        let counting: Vec<u8> = (0u8..32).collect();
        let encoded = encode(&counting);
        assert_eq!(encoded, "000102030405060708090A0B0c0D0e0f101112131415161718191A1B1C1D1E1F");
        assert_eq!(decode(&encoded).unwrap().status, ChecksumStatus::Valid);

        // Reading the hash most significant bit first would give
        // "ABabaBAbAbAbabAbabABABAbABababAb...".
        assert_eq!(
            encode(&[0xAB; 32]),
            "aBAbabABaBabaBaBaBABABabaBababABAbabAbaBabAbAbaBAbABababABabABAB"
        );
    }

    #[test]
    fn test_single_case_is_absent() {
        let lower = decode("abcdef0123").unwrap();
        assert_eq!(lower.status, ChecksumStatus::Absent);
        assert_eq!(lower.bytes, vec![0xab, 0xcd, 0xef, 0x01, 0x23]);

        let upper = decode("ABCDEF0123").unwrap();
        assert_eq!(upper.status, ChecksumStatus::Absent);
        assert!(upper.is_valid());
    }

    #[test]
    fn test_flipped_letter_is_invalid() {
        // 64 letters: the encoding is mixed case with overwhelming likelihood.
        let bytes = [0xAB; 32];
        let encoded = encode(&bytes);
        assert!(!is_same_case(&encoded));

        let mut chars: Vec<char> = encoded.chars().collect();
        chars[0] = flip_case(chars[0]);
        let tampered: String = chars.into_iter().collect();

        let decoded = decode(&tampered).unwrap();
        assert_eq!(decoded.status, ChecksumStatus::Invalid);
        assert!(!decoded.is_valid());
    }

    #[test]
    fn test_long_input_is_plain_hex() {
        let bytes = vec![0xEF; CHECKSUM_MAX_BYTES + 1];
        let encoded = encode(&bytes);
        assert_eq!(encoded, hex::encode(&bytes));
        assert_eq!(decode(&encoded).unwrap().status, ChecksumStatus::Absent);
    }

    #[test]
    fn test_invalid_hex() {
        assert!(decode("zz").is_err());
        assert!(decode("abc").is_err());
    }

    #[test]
    fn test_blake2b256_empty() {
        // Known digest of the empty input.
        assert_eq!(
            hex::encode(blake2b256(&[])),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
    }

    proptest! {
        #[test]
        fn prop_encode_decode_valid(bytes in proptest::collection::vec(any::<u8>(), 0..=CHECKSUM_MAX_BYTES)) {
            let encoded = encode(&bytes);
            prop_assert_eq!(encoded.to_ascii_lowercase(), hex::encode(&bytes));
            let decoded = decode(&encoded).unwrap();
            prop_assert!(decoded.is_valid());
            prop_assert_eq!(decoded.bytes, bytes);
        }
    }
}
