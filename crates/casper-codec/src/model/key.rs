//! Global-state keys: typed, checksum-validated addresses into ledger state.
//!
//! Every key has a textual form `prefix + checksummed-hex(body)`, with a
//! `-NNN` access-rights suffix for URefs and a decimal era id for `era-`
//! keys, and a binary form `tag byte + body`.

use std::fmt;
use std::str::FromStr;

use crate::codec::primitives::Reader;
use crate::error::KeyError;
use crate::limits::{ACCESS_RIGHTS_DIGITS, KEY_HASH_HEX_LENGTH, KEY_HASH_LENGTH, UREF_SERIALIZED_LENGTH};
use crate::util::checksum::{self, ChecksumStatus};

/// Key variant discriminant, equal to the binary tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeyIdentifier {
    Account = 0,
    Hash = 1,
    URef = 2,
    Transfer = 3,
    DeployInfo = 4,
    EraInfo = 5,
    Balance = 6,
    Bid = 7,
    Withdraw = 8,
    Dictionary = 9,
    Unbond = 12,
}

impl KeyIdentifier {
    /// All supported identifiers.
    pub const ALL: [KeyIdentifier; 11] = [
        KeyIdentifier::Account,
        KeyIdentifier::Hash,
        KeyIdentifier::URef,
        KeyIdentifier::Transfer,
        KeyIdentifier::DeployInfo,
        KeyIdentifier::EraInfo,
        KeyIdentifier::Balance,
        KeyIdentifier::Bid,
        KeyIdentifier::Withdraw,
        KeyIdentifier::Dictionary,
        KeyIdentifier::Unbond,
    ];

    /// Creates a KeyIdentifier from its tag byte.
    pub fn from_u8(v: u8) -> Option<KeyIdentifier> {
        Self::ALL.into_iter().find(|id| *id as u8 == v)
    }

    /// Returns the textual prefix, including the trailing `-`.
    pub fn prefix(self) -> &'static str {
        match self {
            KeyIdentifier::Account => "account-hash-",
            KeyIdentifier::Hash => "hash-",
            KeyIdentifier::URef => "uref-",
            KeyIdentifier::Transfer => "transfer-",
            KeyIdentifier::DeployInfo => "deploy-",
            KeyIdentifier::EraInfo => "era-",
            KeyIdentifier::Balance => "balance-",
            KeyIdentifier::Bid => "bid-",
            KeyIdentifier::Withdraw => "withdraw-",
            KeyIdentifier::Dictionary => "dictionary-",
            KeyIdentifier::Unbond => "unbond-",
        }
    }

    /// Finds the identifier whose prefix starts `s`.
    pub fn from_prefixed(s: &str) -> Option<KeyIdentifier> {
        // No prefix is a prefix of another, so the first match is the only one.
        Self::ALL.into_iter().find(|id| s.starts_with(id.prefix()))
    }
}

// =============================================================================
// ACCESS RIGHTS
// =============================================================================

/// Access rights attached to a URef.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum AccessRights {
    None = 0,
    Read = 1,
    Write = 2,
    ReadWrite = 3,
    Add = 4,
    ReadAdd = 5,
    AddWrite = 6,
    ReadAddWrite = 7,
}

impl AccessRights {
    /// Creates AccessRights from its numeric value.
    pub fn from_u8(v: u8) -> Option<AccessRights> {
        match v {
            0 => Some(AccessRights::None),
            1 => Some(AccessRights::Read),
            2 => Some(AccessRights::Write),
            3 => Some(AccessRights::ReadWrite),
            4 => Some(AccessRights::Add),
            5 => Some(AccessRights::ReadAdd),
            6 => Some(AccessRights::AddWrite),
            7 => Some(AccessRights::ReadAddWrite),
            _ => None,
        }
    }

    pub fn is_readable(self) -> bool {
        self as u8 & 1 != 0
    }

    pub fn is_writeable(self) -> bool {
        self as u8 & 2 != 0
    }

    pub fn is_addable(self) -> bool {
        self as u8 & 4 != 0
    }
}

impl fmt::Display for AccessRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", *self as u8)
    }
}

// =============================================================================
// HASH BODIES
// =============================================================================

fn malformed(key: &str, reason: &'static str) -> KeyError {
    KeyError::MalformedAddress {
        key: key.to_string(),
        reason,
    }
}

/// Decodes a 64-character checksummed hex body.
fn parse_hash_body(body: &str, key: &str) -> Result<[u8; KEY_HASH_LENGTH], KeyError> {
    if body.len() != KEY_HASH_HEX_LENGTH {
        return Err(malformed(key, "key body must be 64 hex characters"));
    }
    let decoded = checksum::decode(body).map_err(|_| malformed(key, "key body is not valid hex"))?;
    if decoded.status == ChecksumStatus::Invalid {
        return Err(KeyError::ChecksumMismatch {
            key: key.to_string(),
        });
    }
    let mut raw = [0u8; KEY_HASH_LENGTH];
    raw.copy_from_slice(&decoded.bytes);
    Ok(raw)
}

pub(crate) fn hash_from_slice(bytes: &[u8], context: &'static str) -> Result<[u8; KEY_HASH_LENGTH], KeyError> {
    <[u8; KEY_HASH_LENGTH]>::try_from(bytes).map_err(|_| KeyError::InvalidLength {
        context,
        expected: KEY_HASH_LENGTH,
        found: bytes.len(),
    })
}

// =============================================================================
// ACCOUNT HASH
// =============================================================================

/// The 32-byte hash identifying an account (`account-hash-...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountHash(pub [u8; KEY_HASH_LENGTH]);

impl AccountHash {
    pub fn as_bytes(&self) -> &[u8; KEY_HASH_LENGTH] {
        &self.0
    }
}

impl fmt::Display for AccountHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", KeyIdentifier::Account.prefix(), checksum::encode(&self.0))
    }
}

impl FromStr for AccountHash {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix(KeyIdentifier::Account.prefix())
            .ok_or_else(|| malformed(s, "account hash must start with \"account-hash-\""))?;
        Ok(AccountHash(parse_hash_body(body, s)?))
    }
}

// =============================================================================
// UREF
// =============================================================================

/// An unforgeable reference: a 32-byte address plus access rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct URef {
    address: [u8; KEY_HASH_LENGTH],
    access_rights: AccessRights,
}

impl URef {
    /// Creates a URef from its raw address and access rights.
    pub fn new(address: [u8; KEY_HASH_LENGTH], access_rights: AccessRights) -> Self {
        Self {
            address,
            access_rights,
        }
    }

    /// Returns the raw 32-byte address.
    pub fn address(&self) -> &[u8; KEY_HASH_LENGTH] {
        &self.address
    }

    pub fn access_rights(&self) -> AccessRights {
        self.access_rights
    }

    /// Returns a copy with different access rights.
    pub fn with_access_rights(self, access_rights: AccessRights) -> Self {
        Self {
            access_rights,
            ..self
        }
    }

    /// Serializes as 32 address bytes followed by the access-rights byte.
    pub fn to_bytes(&self) -> [u8; UREF_SERIALIZED_LENGTH] {
        let mut out = [0u8; UREF_SERIALIZED_LENGTH];
        out[..KEY_HASH_LENGTH].copy_from_slice(&self.address);
        out[KEY_HASH_LENGTH] = self.access_rights as u8;
        out
    }

    /// Parses the 33-byte serialized form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != UREF_SERIALIZED_LENGTH {
            return Err(KeyError::InvalidLength {
                context: "uref",
                expected: UREF_SERIALIZED_LENGTH,
                found: bytes.len(),
            });
        }
        let address = hash_from_slice(&bytes[..KEY_HASH_LENGTH], "uref")?;
        let rights = bytes[KEY_HASH_LENGTH];
        let access_rights = AccessRights::from_u8(rights).ok_or(KeyError::UnknownTag {
            context: "access rights",
            tag: rights,
        })?;
        Ok(URef::new(address, access_rights))
    }
}

impl fmt::Display for URef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}-{}",
            KeyIdentifier::URef.prefix(),
            checksum::encode(&self.address),
            self.access_rights
        )
    }
}

impl FromStr for URef {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(KeyIdentifier::URef.prefix())
            .ok_or_else(|| malformed(s, "uref must start with \"uref-\""))?;

        let parts: Vec<&str> = rest.split('-').collect();
        if parts.len() != 2 {
            return Err(malformed(s, "uref must end with an access rights suffix"));
        }
        if parts[0].len() != KEY_HASH_HEX_LENGTH {
            return Err(malformed(s, "uref must contain a 32 byte value"));
        }
        if parts[1].len() != ACCESS_RIGHTS_DIGITS || !parts[1].bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed(s, "uref must contain a 3 digit access rights suffix"));
        }

        let address = parse_hash_body(parts[0], s)?;
        let access_rights = parts[1]
            .parse::<u8>()
            .ok()
            .and_then(AccessRights::from_u8)
            .ok_or_else(|| malformed(s, "uref access rights out of range"))?;

        Ok(URef::new(address, access_rights))
    }
}

// =============================================================================
// GLOBAL STATE KEY
// =============================================================================

/// A key into global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GlobalStateKey {
    Account(AccountHash),
    Hash([u8; KEY_HASH_LENGTH]),
    URef(URef),
    Transfer([u8; KEY_HASH_LENGTH]),
    DeployInfo([u8; KEY_HASH_LENGTH]),
    EraInfo(u64),
    Balance([u8; KEY_HASH_LENGTH]),
    Bid([u8; KEY_HASH_LENGTH]),
    Withdraw([u8; KEY_HASH_LENGTH]),
    Dictionary([u8; KEY_HASH_LENGTH]),
    Unbond([u8; KEY_HASH_LENGTH]),
}

impl GlobalStateKey {
    /// Returns the variant discriminant.
    pub fn identifier(&self) -> KeyIdentifier {
        match self {
            GlobalStateKey::Account(_) => KeyIdentifier::Account,
            GlobalStateKey::Hash(_) => KeyIdentifier::Hash,
            GlobalStateKey::URef(_) => KeyIdentifier::URef,
            GlobalStateKey::Transfer(_) => KeyIdentifier::Transfer,
            GlobalStateKey::DeployInfo(_) => KeyIdentifier::DeployInfo,
            GlobalStateKey::EraInfo(_) => KeyIdentifier::EraInfo,
            GlobalStateKey::Balance(_) => KeyIdentifier::Balance,
            GlobalStateKey::Bid(_) => KeyIdentifier::Bid,
            GlobalStateKey::Withdraw(_) => KeyIdentifier::Withdraw,
            GlobalStateKey::Dictionary(_) => KeyIdentifier::Dictionary,
            GlobalStateKey::Unbond(_) => KeyIdentifier::Unbond,
        }
    }

    /// Builds a hash-bodied key. Returns `None` for URef and EraInfo, which
    /// carry more than a hash.
    pub fn from_hash(identifier: KeyIdentifier, raw: [u8; KEY_HASH_LENGTH]) -> Option<Self> {
        Some(match identifier {
            KeyIdentifier::Account => GlobalStateKey::Account(AccountHash(raw)),
            KeyIdentifier::Hash => GlobalStateKey::Hash(raw),
            KeyIdentifier::Transfer => GlobalStateKey::Transfer(raw),
            KeyIdentifier::DeployInfo => GlobalStateKey::DeployInfo(raw),
            KeyIdentifier::Balance => GlobalStateKey::Balance(raw),
            KeyIdentifier::Bid => GlobalStateKey::Bid(raw),
            KeyIdentifier::Withdraw => GlobalStateKey::Withdraw(raw),
            KeyIdentifier::Dictionary => GlobalStateKey::Dictionary(raw),
            KeyIdentifier::Unbond => GlobalStateKey::Unbond(raw),
            KeyIdentifier::URef | KeyIdentifier::EraInfo => return None,
        })
    }

    /// Returns the 32-byte body of a hash-bodied key (the address for URefs).
    pub fn raw_hash(&self) -> Option<&[u8; KEY_HASH_LENGTH]> {
        match self {
            GlobalStateKey::Account(hash) => Some(&hash.0),
            GlobalStateKey::URef(uref) => Some(uref.address()),
            GlobalStateKey::EraInfo(_) => None,
            GlobalStateKey::Hash(raw)
            | GlobalStateKey::Transfer(raw)
            | GlobalStateKey::DeployInfo(raw)
            | GlobalStateKey::Balance(raw)
            | GlobalStateKey::Bid(raw)
            | GlobalStateKey::Withdraw(raw)
            | GlobalStateKey::Dictionary(raw)
            | GlobalStateKey::Unbond(raw) => Some(raw),
        }
    }

    /// Serializes as tag byte + body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + UREF_SERIALIZED_LENGTH);
        out.push(self.identifier() as u8);
        match self {
            GlobalStateKey::URef(uref) => out.extend_from_slice(&uref.to_bytes()),
            GlobalStateKey::EraInfo(era) => out.extend_from_slice(&era.to_le_bytes()),
            other => {
                if let Some(raw) = other.raw_hash() {
                    out.extend_from_slice(raw);
                }
            }
        }
        out
    }

    /// Parses the binary form produced by [`GlobalStateKey::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let (&tag, body) = bytes.split_first().ok_or(KeyError::InvalidLength {
            context: "key",
            expected: 1,
            found: 0,
        })?;
        let identifier = KeyIdentifier::from_u8(tag).ok_or(KeyError::UnknownTag { context: "key", tag })?;
        match identifier {
            KeyIdentifier::URef => Ok(GlobalStateKey::URef(URef::from_bytes(body)?)),
            KeyIdentifier::EraInfo => {
                let mut reader = Reader::new(body);
                let era = reader.read_u64("era id").ok().filter(|_| reader.is_empty()).ok_or(
                    KeyError::InvalidLength {
                        context: "era info key",
                        expected: 8,
                        found: body.len(),
                    },
                )?;
                Ok(GlobalStateKey::EraInfo(era))
            }
            hashed => {
                let raw = hash_from_slice(body, "key")?;
                GlobalStateKey::from_hash(hashed, raw).ok_or(KeyError::UnknownTag { context: "key", tag })
            }
        }
    }
}

impl fmt::Display for GlobalStateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobalStateKey::Account(hash) => fmt::Display::fmt(hash, f),
            GlobalStateKey::URef(uref) => fmt::Display::fmt(uref, f),
            GlobalStateKey::EraInfo(era) => write!(f, "{}{}", KeyIdentifier::EraInfo.prefix(), era),
            other => {
                let raw = other.raw_hash().ok_or(fmt::Error)?;
                write!(f, "{}{}", other.identifier().prefix(), checksum::encode(raw))
            }
        }
    }
}

impl FromStr for GlobalStateKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let identifier = KeyIdentifier::from_prefixed(s).ok_or_else(|| malformed(s, "unknown key prefix"))?;
        let body = &s[identifier.prefix().len()..];

        match identifier {
            KeyIdentifier::URef => Ok(GlobalStateKey::URef(s.parse()?)),
            KeyIdentifier::EraInfo => {
                if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(malformed(s, "era key must end with a decimal era id"));
                }
                let era = body.parse().map_err(|_| malformed(s, "era id out of range"))?;
                Ok(GlobalStateKey::EraInfo(era))
            }
            hashed => {
                let raw = parse_hash_body(body, s)?;
                GlobalStateKey::from_hash(hashed, raw).ok_or_else(|| malformed(s, "unknown key prefix"))
            }
        }
    }
}

impl From<URef> for GlobalStateKey {
    fn from(uref: URef) -> Self {
        GlobalStateKey::URef(uref)
    }
}

impl From<AccountHash> for GlobalStateKey {
    fn from(hash: AccountHash) -> Self {
        GlobalStateKey::Account(hash)
    }
}

crate::model::serde_helper::impl_string_serde!(AccountHash, URef, GlobalStateKey);
