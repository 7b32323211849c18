//! Binary and JSON encoding/decoding.
//!
//! - [`primitives`]: little-endian writer and bounds-checked reader
//! - [`calltable`]: the field-indexed binary envelope
//! - [`payload`]: transaction payload codecs
//! - [`transform`]: execution transform codec

pub mod calltable;
pub mod payload;
pub mod primitives;
pub mod transform;

pub use calltable::{Calltable, CalltableBuilder, CalltableField};
pub use payload::{
    decode_payload_fields_json, decode_payload_json, decode_payload_json_str, decode_payload_json_with_options,
    encode_payload, encode_payload_fields_json, encode_payload_json, DecodeOptions,
};
pub use primitives::{Reader, Writer};
pub use transform::{decode_transform, decode_transform_str, decode_transforms, encode_transform};
