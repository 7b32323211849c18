//! Account public keys.

use std::fmt;
use std::str::FromStr;

use crate::error::KeyError;
use crate::model::key::AccountHash;
use crate::util::checksum::{self, ChecksumStatus};

const ED25519_TAG: u8 = 1;
const SECP256K1_TAG: u8 = 2;
const ED25519_LENGTH: usize = 32;
const SECP256K1_LENGTH: usize = 33;

/// A public key, tagged with its signature algorithm.
///
/// Textual form: two hex digits of algorithm tag (`01` or `02`) followed by
/// the checksummed hex of the raw key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PublicKey {
    Ed25519([u8; ED25519_LENGTH]),
    Secp256k1([u8; SECP256K1_LENGTH]),
}

impl PublicKey {
    pub fn tag(&self) -> u8 {
        match self {
            PublicKey::Ed25519(_) => ED25519_TAG,
            PublicKey::Secp256k1(_) => SECP256K1_TAG,
        }
    }

    /// Lowercase algorithm name, as used in account-hash derivation.
    pub fn algorithm_name(&self) -> &'static str {
        match self {
            PublicKey::Ed25519(_) => "ed25519",
            PublicKey::Secp256k1(_) => "secp256k1",
        }
    }

    /// Returns the raw key without the tag.
    pub fn raw(&self) -> &[u8] {
        match self {
            PublicKey::Ed25519(raw) => raw,
            PublicKey::Secp256k1(raw) => raw,
        }
    }

    /// Serializes as tag byte + raw key.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.raw().len());
        out.push(self.tag());
        out.extend_from_slice(self.raw());
        out
    }

    /// Parses tag byte + raw key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let (&tag, raw) = bytes.split_first().ok_or(KeyError::InvalidLength {
            context: "public key",
            expected: 1 + ED25519_LENGTH,
            found: 0,
        })?;
        let wrong_length = |expected| KeyError::InvalidLength {
            context: "public key",
            expected,
            found: raw.len(),
        };
        match tag {
            ED25519_TAG => raw
                .try_into()
                .map(PublicKey::Ed25519)
                .map_err(|_| wrong_length(ED25519_LENGTH)),
            SECP256K1_TAG => raw
                .try_into()
                .map(PublicKey::Secp256k1)
                .map_err(|_| wrong_length(SECP256K1_LENGTH)),
            _ => Err(KeyError::UnknownTag {
                context: "public key",
                tag,
            }),
        }
    }

    /// Derives the account hash: blake2b-256 over the algorithm name, a zero
    /// separator and the raw key.
    pub fn to_account_hash(&self) -> AccountHash {
        let name = self.algorithm_name().as_bytes();
        let mut preimage = Vec::with_capacity(name.len() + 1 + self.raw().len());
        preimage.extend_from_slice(name);
        preimage.push(0);
        preimage.extend_from_slice(self.raw());
        AccountHash(checksum::blake2b256(&preimage))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{}", self.tag(), checksum::encode(self.raw()))
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason| KeyError::MalformedAddress {
            key: s.to_string(),
            reason,
        };
        if s.len() < 2 || !s.is_ascii() {
            return Err(malformed("public key is too short"));
        }
        let (tag_hex, body) = s.split_at(2);
        let tag = u8::from_str_radix(tag_hex, 16).map_err(|_| malformed("public key tag is not hex"))?;

        let decoded = checksum::decode(body).map_err(|_| malformed("public key is not valid hex"))?;
        if decoded.status == ChecksumStatus::Invalid {
            return Err(KeyError::ChecksumMismatch { key: s.to_string() });
        }

        let mut bytes = Vec::with_capacity(1 + decoded.bytes.len());
        bytes.push(tag);
        bytes.extend_from_slice(&decoded.bytes);
        PublicKey::from_bytes(&bytes).map_err(|err| match err {
            KeyError::UnknownTag { .. } => malformed("unknown public key algorithm"),
            _ => malformed("public key has the wrong length"),
        })
    }
}

crate::model::serde_helper::impl_string_serde!(PublicKey);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_string_form() {
        let key = PublicKey::Ed25519([0x5a; 32]);
        let s = key.to_string();
        assert!(s.starts_with("01"));
        assert_eq!(s.len(), 2 + 64);
        assert_eq!(s.parse::<PublicKey>().unwrap(), key);

        let secp = PublicKey::Secp256k1([0x03; 33]);
        let s = secp.to_string();
        assert!(s.starts_with("02"));
        assert_eq!(s.parse::<PublicKey>().unwrap(), secp);
    }

    #[test]
    fn test_lowercase_accepted() {
        let lower = format!("01{}", "ab".repeat(32));
        assert_eq!(lower.parse::<PublicKey>().unwrap(), PublicKey::Ed25519([0xab; 32]));
    }

    #[test]
    fn test_invalid_forms() {
        let cases = vec![
            String::new(),
            "0".to_string(),
            "03".to_string(),
            format!("03{}", "ab".repeat(32)), // unknown algorithm
            format!("01{}", "ab".repeat(31)), // short key
            format!("zz{}", "ab".repeat(32)),
        ];
        for bad in cases {
            assert_eq!(bad.parse::<PublicKey>().unwrap_err().kind(), ErrorKind::MalformedAddress, "{:?}", bad);
        }
    }

    #[test]
    fn test_bytes() {
        let key = PublicKey::Secp256k1([9; 33]);
        let bytes = key.to_bytes();
        assert_eq!(bytes[0], 2);
        assert_eq!(bytes.len(), 34);
        assert_eq!(PublicKey::from_bytes(&bytes).unwrap(), key);
        assert!(PublicKey::from_bytes(&bytes[..20]).is_err());
    }

    #[test]
    fn test_account_hash_derivation() {
        let key = PublicKey::Ed25519([1; 32]);
        let mut preimage = b"ed25519\0".to_vec();
        preimage.extend_from_slice(&[1; 32]);
        assert_eq!(key.to_account_hash(), AccountHash(checksum::blake2b256(&preimage)));
        assert_ne!(key.to_account_hash(), PublicKey::Ed25519([2; 32]).to_account_hash());
    }

    #[test]
    fn test_serde_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(PublicKey::Ed25519([7; 32]), 1u8);
        let json = serde_json::to_string(&map).unwrap();
        let back: std::collections::BTreeMap<PublicKey, u8> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
