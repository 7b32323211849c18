//! Binary and JSON codecs for transaction payloads.
//!
//! Binary layout (a calltable):
//!
//! ```text
//! 0: initiator address    3: chain name (length-prefixed UTF-8)
//! 1: timestamp (u64 LE)   4: pricing mode
//! 2: ttl (u64 LE)         5: fields sub-map (calltable: 0 args, 1 target,
//!                            2 entry point, 3 scheduling)
//! ```
//!
//! The JSON projection carries the same data with `fields` as an object of
//! hex strings keyed by decimal index. Reading it back yields a payload whose
//! body is [`PayloadBody::Fields`]: the sub-map is kept as serialized bytes,
//! so re-encoding is byte-identical but typed access to the runtime args,
//! target, entry point and scheduling is unavailable.

use serde_json::{Map, Value as JsonValue};
use tracing::{trace, warn};

use crate::codec::calltable::CalltableBuilder;
use crate::error::{DecodeError, EncodeError};
use crate::limits::{
    CHAIN_NAME_FIELD_INDEX, FIELDS_FIELD_INDEX, INITIATOR_ADDR_FIELD_INDEX, PRICING_MODE_FIELD_INDEX,
    TIMESTAMP_FIELD_INDEX, TTL_FIELD_INDEX,
};
use crate::model::payload::{PayloadBody, PayloadFieldKey, PayloadFields, TransactionV1Payload};
use crate::model::transaction::{InitiatorAddr, PricingMode, ToBytes};
use crate::util::datetime::{format_timestamp, parse_timestamp, MAX_TIMESTAMP_MILLIS};
use crate::util::duration::{format_ttl, parse_ttl};

// =============================================================================
// OPTIONS
// =============================================================================

/// Options for decoding payload JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Reject `fields` keys that are not one of the four known indices.
    ///
    /// When disabled (the default), such keys are skipped and logged.
    pub strict: bool,
}

impl DecodeOptions {
    /// Creates default (lenient) decoding options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates strict decoding options.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

// =============================================================================
// BINARY
// =============================================================================

/// Encodes a payload to its calltable bytes.
pub fn encode_payload(payload: &TransactionV1Payload) -> Result<Vec<u8>, EncodeError> {
    let fields = payload.fields()?;
    trace!(
        chain_name = %payload.chain_name,
        fields = fields.len(),
        "encoding transaction payload"
    );

    CalltableBuilder::new()
        .add_field(INITIATOR_ADDR_FIELD_INDEX, payload.initiator_addr.to_bytes()?)?
        .add_field(TIMESTAMP_FIELD_INDEX, payload.timestamp.to_le_bytes().to_vec())?
        .add_field(TTL_FIELD_INDEX, payload.ttl.to_le_bytes().to_vec())?
        .add_written(CHAIN_NAME_FIELD_INDEX, |w| w.write_string(&payload.chain_name))?
        .add_field(PRICING_MODE_FIELD_INDEX, payload.pricing_mode.to_bytes()?)?
        .add_field(FIELDS_FIELD_INDEX, fields.to_bytes()?)?
        .build()
        .to_bytes()
}

impl ToBytes for TransactionV1Payload {
    fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        encode_payload(self)
    }
}

// =============================================================================
// JSON
// =============================================================================

/// Projects the `fields` sub-map to JSON. Absent keys are omitted.
pub fn encode_payload_fields_json(fields: &PayloadFields) -> JsonValue {
    let map: Map<String, JsonValue> = fields
        .entries()
        .map(|(key, value)| (key.index().to_string(), JsonValue::String(hex::encode(value))))
        .collect();
    JsonValue::Object(map)
}

/// Projects a payload to JSON.
pub fn encode_payload_json(payload: &TransactionV1Payload) -> Result<JsonValue, EncodeError> {
    let fields = payload.fields()?;
    let timestamp = format_timestamp(payload.timestamp).map_err(|e| EncodeError::TimestampOutOfRange {
        millis: e.millis,
        max: MAX_TIMESTAMP_MILLIS,
    })?;

    let mut map = Map::new();
    map.insert("initiator_addr".to_string(), to_json(&payload.initiator_addr, "initiator_addr")?);
    map.insert("timestamp".to_string(), JsonValue::String(timestamp));
    map.insert("ttl".to_string(), JsonValue::String(format_ttl(payload.ttl)));
    map.insert("pricing_mode".to_string(), to_json(&payload.pricing_mode, "pricing_mode")?);
    map.insert("chain_name".to_string(), JsonValue::String(payload.chain_name.clone()));
    map.insert("fields".to_string(), encode_payload_fields_json(&fields));
    Ok(JsonValue::Object(map))
}

fn to_json<T: serde::Serialize>(value: &T, field: &'static str) -> Result<JsonValue, EncodeError> {
    serde_json::to_value(value).map_err(|e| EncodeError::Json {
        field,
        message: e.to_string(),
    })
}

/// Reads the `fields` sub-map from its JSON projection.
pub fn decode_payload_fields_json(value: &JsonValue, options: DecodeOptions) -> Result<PayloadFields, DecodeError> {
    let object = value
        .as_object()
        .ok_or_else(|| DecodeError::payload("fields", "expected an object"))?;

    let mut entries = Vec::with_capacity(object.len());
    for (raw_key, raw_value) in object {
        let canonical = !options.strict || (!raw_key.is_empty() && raw_key.bytes().all(|b| b.is_ascii_digit()));
        let parsed = raw_key.parse::<u16>().ok().filter(|_| canonical);
        let Some(key) = parsed.and_then(PayloadFieldKey::from_index) else {
            if options.strict {
                return Err(DecodeError::UnknownFieldKey { key: raw_key.clone() });
            }
            warn!(key = %raw_key, "skipping unrecognized payload field key");
            continue;
        };
        let field = format!("fields.{}", raw_key);
        let text = raw_value
            .as_str()
            .ok_or_else(|| DecodeError::payload(field.clone(), "expected a hex string"))?;
        let bytes = hex::decode(text).map_err(|e| DecodeError::payload(field, e))?;
        entries.push((key, bytes));
    }

    // Distinct map keys can name the same index ("1" and "01").
    PayloadFields::from_raw(entries).map_err(|e| match e {
        EncodeError::DuplicateField { index } => DecodeError::DuplicateField { index },
        other => DecodeError::payload("fields", other),
    })
}

/// Decodes a payload from its JSON projection with default options.
pub fn decode_payload_json(value: &JsonValue) -> Result<TransactionV1Payload, DecodeError> {
    decode_payload_json_with_options(value, DecodeOptions::default())
}

/// Decodes a payload from its JSON projection.
pub fn decode_payload_json_with_options(
    value: &JsonValue,
    options: DecodeOptions,
) -> Result<TransactionV1Payload, DecodeError> {
    let object = value
        .as_object()
        .ok_or_else(|| DecodeError::payload("payload", "expected an object"))?;

    let initiator_addr: InitiatorAddr = from_json(required(object, "initiator_addr")?, "initiator_addr")?;

    let timestamp = required_str(object, "timestamp")?;
    let timestamp = parse_timestamp(timestamp).map_err(|e| DecodeError::payload("timestamp", e))?;

    let ttl = required_str(object, "ttl")?;
    let ttl = parse_ttl(ttl).map_err(|e| DecodeError::payload("ttl", e))?;

    let pricing_mode: PricingMode = from_json(required(object, "pricing_mode")?, "pricing_mode")?;
    let chain_name = required_str(object, "chain_name")?.to_string();

    let fields = match object.get("fields") {
        Some(fields) => decode_payload_fields_json(fields, options)?,
        None => PayloadFields::default(),
    };

    Ok(TransactionV1Payload {
        initiator_addr,
        timestamp,
        ttl,
        pricing_mode,
        chain_name,
        body: PayloadBody::Fields(fields),
    })
}

/// Parses JSON text and decodes the payload it contains.
pub fn decode_payload_json_str(text: &str, options: DecodeOptions) -> Result<TransactionV1Payload, DecodeError> {
    let value: JsonValue = serde_json::from_str(text).map_err(|e| DecodeError::Json {
        context: "transaction payload",
        message: e.to_string(),
    })?;
    decode_payload_json_with_options(&value, options)
}

fn required<'a>(object: &'a Map<String, JsonValue>, field: &'static str) -> Result<&'a JsonValue, DecodeError> {
    object
        .get(field)
        .ok_or_else(|| DecodeError::payload(field, "missing"))
}

fn required_str<'a>(object: &'a Map<String, JsonValue>, field: &'static str) -> Result<&'a str, DecodeError> {
    required(object, field)?
        .as_str()
        .ok_or_else(|| DecodeError::payload(field, "expected a string"))
}

fn from_json<T: serde::de::DeserializeOwned>(value: &JsonValue, field: &'static str) -> Result<T, DecodeError> {
    T::deserialize(value).map_err(|e| DecodeError::payload(field, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::calltable::Calltable;
    use crate::error::ErrorKind;
    use crate::model::builder::PayloadBuilder;
    use crate::model::cl_value::CLValue;
    use crate::model::public_key::PublicKey;
    use crate::model::transaction::{TransactionEntryPoint, TransactionScheduling, TransactionTarget};
    use primitive_types::U512;
    use serde_json::json;

    const MAY_FIRST_NOON: u64 = 1_714_564_800_000;

    fn sample_payload() -> TransactionV1Payload {
        PayloadBuilder::new(PublicKey::Ed25519([0x11; 32]), "casper-net-1")
            .timestamp(MAY_FIRST_NOON)
            .ttl(1_800_000)
            .pricing_mode(PricingMode::PaymentLimited {
                payment_amount: 100_000_000,
                gas_price_tolerance: 1,
                standard_payment: true,
            })
            .arg("target", CLValue::public_key(PublicKey::Ed25519([0x22; 32])))
            .arg("amount", CLValue::u512(U512::from(2_500_000_000u64)))
            .arg("id", CLValue::u64(7))
            .target(TransactionTarget::Native)
            .entry_point(TransactionEntryPoint::Transfer)
            .scheduling(TransactionScheduling::Standard)
            .build()
    }

    #[test]
    fn test_binary_layout() {
        let payload = sample_payload();
        let bytes = encode_payload(&payload).unwrap();
        let table = Calltable::from_bytes(&bytes).unwrap();

        assert_eq!(&bytes[..4], &6i32.to_le_bytes());
        assert_eq!(table.indices().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(table.get(0), Some(payload.initiator_addr.to_bytes().unwrap().as_slice()));
        assert_eq!(table.get(1), Some(&MAY_FIRST_NOON.to_le_bytes()[..]));
        assert_eq!(table.get(2), Some(&1_800_000u64.to_le_bytes()[..]));

        let mut chain_name = 12u32.to_le_bytes().to_vec();
        chain_name.extend_from_slice(b"casper-net-1");
        assert_eq!(table.get(3), Some(chain_name.as_slice()));
        assert_eq!(table.get(4), Some(payload.pricing_mode.to_bytes().unwrap().as_slice()));

        let fields = Calltable::from_bytes(table.get(5).unwrap()).unwrap();
        assert_eq!(fields.indices().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(&fields.get(0).unwrap()[..4], &3i32.to_le_bytes());
        assert_eq!(fields.get(1), Some(TransactionTarget::Native.to_bytes().unwrap().as_slice()));
        assert_eq!(fields.get(2), Some(TransactionEntryPoint::Transfer.to_bytes().unwrap().as_slice()));
    }

    #[test]
    fn test_json_projection() {
        let json = encode_payload_json(&sample_payload()).unwrap();
        assert_eq!(json["timestamp"], "2024-05-01T12:00:00.000Z");
        assert_eq!(json["ttl"], "30m");
        assert_eq!(json["chain_name"], "casper-net-1");
        assert_eq!(json["pricing_mode"]["PaymentLimited"]["payment_amount"], 100_000_000);
        assert_eq!(
            json["initiator_addr"]["PublicKey"],
            PublicKey::Ed25519([0x11; 32]).to_string()
        );

        let fields = json["fields"].as_object().unwrap();
        let keys: Vec<_> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["0", "1", "2", "3"]);
        assert!(fields.values().all(|v| v.as_str().is_some_and(|s| hex::decode(s).is_ok())));
    }

    #[test]
    fn test_fields_projection_omits_absent_keys() {
        let fields = PayloadFields::from_raw([(PayloadFieldKey::Target, vec![0xab]), (PayloadFieldKey::Scheduling, vec![])])
            .unwrap();
        assert_eq!(encode_payload_fields_json(&fields), json!({"1": "ab", "3": ""}));
        assert_eq!(encode_payload_fields_json(&PayloadFields::default()), json!({}));
    }

    #[test]
    fn test_json_roundtrip_keeps_scalars_and_drops_typed_access() {
        let original = sample_payload();
        let json = encode_payload_json(&original).unwrap();
        let decoded = decode_payload_json(&json).unwrap();

        assert_eq!(decoded.initiator_addr, original.initiator_addr);
        assert_eq!(decoded.timestamp, original.timestamp);
        assert_eq!(decoded.ttl, original.ttl);
        assert_eq!(decoded.pricing_mode, original.pricing_mode);
        assert_eq!(decoded.chain_name, original.chain_name);

        // Runtime args, target, entry point and scheduling stay serialized.
        assert!(!decoded.is_typed());
        assert_eq!(
            decoded.runtime_args().unwrap_err().kind(),
            ErrorKind::UnsupportedOperation
        );
        assert_eq!(decoded.target().unwrap_err().kind(), ErrorKind::UnsupportedOperation);
        assert_eq!(decoded.entry_point().unwrap_err().kind(), ErrorKind::UnsupportedOperation);
        assert_eq!(decoded.scheduling().unwrap_err().kind(), ErrorKind::UnsupportedOperation);

        // Nothing is lost on the wire.
        assert_eq!(encode_payload(&decoded).unwrap(), encode_payload(&original).unwrap());
        assert_eq!(encode_payload_json(&decoded).unwrap(), json);
    }

    #[test]
    fn test_lenient_skips_unknown_keys() {
        let mut json = encode_payload_json(&sample_payload()).unwrap();
        json["fields"]["x"] = json!("ff");
        json["fields"]["7"] = json!("ff");

        let decoded = decode_payload_json_with_options(&json, DecodeOptions::new()).unwrap();
        let PayloadBody::Fields(fields) = &decoded.body else {
            panic!("expected serialized fields");
        };
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn test_strict_rejects_unknown_keys() {
        for bad in ["x", "7", "-1"] {
            let mut json = encode_payload_json(&sample_payload()).unwrap();
            json["fields"][bad] = json!("ff");
            let err = decode_payload_json_with_options(&json, DecodeOptions::strict()).unwrap_err();
            assert_eq!(err, DecodeError::UnknownFieldKey { key: bad.to_string() });
        }

        let json = encode_payload_json(&sample_payload()).unwrap();
        assert!(decode_payload_json_with_options(&json, DecodeOptions::new().with_strict(true)).is_ok());
    }

    #[test]
    fn test_strict_requires_plain_digits() {
        for raw in ["+1", " 1"] {
            let err = decode_payload_fields_json(&json!({ raw: "00" }), DecodeOptions::strict()).unwrap_err();
            assert_eq!(err, DecodeError::UnknownFieldKey { key: raw.to_string() });
        }

        let lenient = decode_payload_fields_json(&json!({"+1": "00"}), DecodeOptions::new()).unwrap();
        assert_eq!(lenient.len(), 1);
        let strict = decode_payload_fields_json(&json!({"1": "00"}), DecodeOptions::strict()).unwrap();
        assert_eq!(strict.get(PayloadFieldKey::Target), Some(&[0x00][..]));
    }

    #[test]
    fn test_timestamp_past_year_9999_is_rejected() {
        let mut payload = sample_payload();
        payload.timestamp = 253_402_300_799_999;
        let json = encode_payload_json(&payload).unwrap();
        assert_eq!(json["timestamp"], "9999-12-31T23:59:59.999Z");
        assert_eq!(decode_payload_json(&json).unwrap().timestamp, 253_402_300_799_999);

        for millis in [253_402_300_800_000, u64::MAX] {
            payload.timestamp = millis;
            let err = encode_payload_json(&payload).unwrap_err();
            assert_eq!(err, EncodeError::TimestampOutOfRange { millis, max: MAX_TIMESTAMP_MILLIS });
            // The binary form has no such limit.
            assert!(encode_payload(&payload).is_ok());
        }
    }

    #[test]
    fn test_equivalent_keys_collide() {
        let err = decode_payload_fields_json(&json!({"1": "00", "01": "00"}), DecodeOptions::new()).unwrap_err();
        assert_eq!(err, DecodeError::DuplicateField { index: 1 });
    }

    #[test]
    fn test_missing_fields_is_empty() {
        let mut json = encode_payload_json(&sample_payload()).unwrap();
        json.as_object_mut().unwrap().remove("fields");
        let decoded = decode_payload_json(&json).unwrap();
        assert_eq!(decoded.body, PayloadBody::Fields(PayloadFields::default()));
    }

    #[test]
    fn test_shape_errors() {
        let good = encode_payload_json(&sample_payload()).unwrap();

        let with = |field: &str, value: JsonValue| {
            let mut json = good.clone();
            json[field] = value;
            decode_payload_json(&json).unwrap_err()
        };

        assert!(matches!(decode_payload_json(&json!([])).unwrap_err(), DecodeError::Payload { .. }));
        assert!(matches!(with("timestamp", json!("yesterday")), DecodeError::Payload { field, .. } if field == "timestamp"));
        assert!(matches!(with("ttl", json!(30)), DecodeError::Payload { field, .. } if field == "ttl"));
        assert!(matches!(with("chain_name", json!(null)), DecodeError::Payload { field, .. } if field == "chain_name"));
        assert!(matches!(with("pricing_mode", json!({"Free": {}})), DecodeError::Payload { field, .. } if field == "pricing_mode"));
        assert!(matches!(with("fields", json!({"0": "zz"})), DecodeError::Payload { field, .. } if field == "fields.0"));
        assert!(matches!(with("fields", json!({"0": 1})), DecodeError::Payload { field, .. } if field == "fields.0"));

        let mut missing = good.clone();
        missing.as_object_mut().unwrap().remove("initiator_addr");
        let err = decode_payload_json(&missing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PayloadDecode);
    }

    #[test]
    fn test_decode_str() {
        let text = serde_json::to_string(&encode_payload_json(&sample_payload()).unwrap()).unwrap();
        let decoded = decode_payload_json_str(&text, DecodeOptions::default()).unwrap();
        assert_eq!(decoded.chain_name, "casper-net-1");

        assert!(matches!(
            decode_payload_json_str("{not json", DecodeOptions::default()),
            Err(DecodeError::Json { .. })
        ));
    }
}
