//! Wire constants and decoder bounds.

/// Length of a hash-like key body (account hash, contract hash, URef address, ...).
pub const KEY_HASH_LENGTH: usize = 32;

/// Number of hex characters in the textual form of a 32-byte key body.
pub const KEY_HASH_HEX_LENGTH: usize = KEY_HASH_LENGTH * 2;

/// Number of decimal digits in a URef access-rights suffix.
pub const ACCESS_RIGHTS_DIGITS: usize = 3;

/// Length of a serialized URef (address + access-rights byte).
pub const UREF_SERIALIZED_LENGTH: usize = KEY_HASH_LENGTH + 1;

/// Inputs up to this many bytes get a case-embedded checksum; longer ones are
/// encoded as plain lowercase hex.
pub const CHECKSUM_MAX_BYTES: usize = 75;

/// Largest value representable by the 4-byte length prefix.
pub const MAX_PREFIXED_LEN: usize = u32::MAX as usize;

/// Maximum number of fields accepted when decoding a calltable.
pub const MAX_CALLTABLE_FIELDS: usize = u16::MAX as usize + 1;

/// Default transaction time-to-live: 30 minutes.
pub const DEFAULT_TTL_MILLIS: u64 = 1_800_000;

// Outer payload calltable indices.
pub const INITIATOR_ADDR_FIELD_INDEX: u16 = 0;
pub const TIMESTAMP_FIELD_INDEX: u16 = 1;
pub const TTL_FIELD_INDEX: u16 = 2;
pub const CHAIN_NAME_FIELD_INDEX: u16 = 3;
pub const PRICING_MODE_FIELD_INDEX: u16 = 4;
pub const FIELDS_FIELD_INDEX: u16 = 5;
