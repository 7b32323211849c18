//! Encoding and decoding core for Casper network clients.
//!
//! This crate converts transaction payloads to the calltable binary wire
//! format a node accepts, and reads the JSON documents a node returns
//! (execution transforms, payload projections, global-state keys) into
//! typed values.
//!
//! # Quick Start
//!
//! ```rust
//! use casper_codec::codec::{decode_transform, encode_payload};
//! use casper_codec::model::{CLValue, PayloadBuilder, PublicKey, TransformKind};
//!
//! let payload = PayloadBuilder::new(PublicKey::Ed25519([1u8; 32]), "casper-test")
//!     .arg("id", CLValue::u64(7))
//!     .build();
//! let bytes = encode_payload(&payload).unwrap();
//! assert_eq!(&bytes[..4], &6i32.to_le_bytes());
//!
//! let doc = serde_json::json!({
//!     "key": format!("uref-{}-007", "0a".repeat(32)),
//!     "transform": {"AddInt32": 42},
//! });
//! let transform = decode_transform(&doc).unwrap();
//! assert_eq!(transform.kind, TransformKind::AddInt32(42));
//! ```
//!
//! # Modules
//!
//! - [`model`]: keys, values, payloads, records and transforms
//! - [`codec`]: calltable envelope, payload and transform codecs
//! - [`util`]: checksummed hex, timestamps and durations
//! - [`error`]: error types
//! - [`limits`]: wire constants and decoder bounds
//!
//! # Logging
//!
//! Diagnostics are emitted through `tracing`; install a subscriber to see
//! them. Lenient payload decoding logs every `fields` key it skips.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod util;

// Re-export commonly used types at crate root
pub use codec::{
    decode_payload_json, decode_transform, encode_payload, encode_payload_json, encode_transform, Calltable,
    CalltableBuilder, DecodeOptions,
};
pub use error::{DecodeError, EncodeError, ErrorKind, KeyError};
pub use model::{
    AccessRights, GlobalStateKey, KeyIdentifier, PayloadBuilder, PublicKey, Transform, TransformKind,
    TransformType, TransactionV1Payload, URef,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
