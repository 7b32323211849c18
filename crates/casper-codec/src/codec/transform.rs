//! JSON codec for execution transforms.
//!
//! ```text
//! {"key": "<global state key>", "transform": "<Unit>" | {"<Discriminant>": <payload>}}
//! ```
//!
//! Unit discriminants appear as bare strings; every other discriminant is a
//! single-property object whose value is decoded according to its name.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::error::{DecodeError, EncodeError};
use crate::model::key::GlobalStateKey;
use crate::model::serde_helper::{parse_decimal, DecimalInt};
use crate::model::transform::{Transform, TransformKind, TransformType};

/// Decodes one transform document.
pub fn decode_transform(value: &JsonValue) -> Result<Transform, DecodeError> {
    let object = value
        .as_object()
        .ok_or_else(|| DecodeError::payload("transform document", "expected an object"))?;

    let key = object
        .get("key")
        .ok_or(DecodeError::IncompleteTransform { missing: "key" })?;
    let transform = object
        .get("transform")
        .ok_or(DecodeError::IncompleteTransform { missing: "transform" })?;

    let key: GlobalStateKey = key
        .as_str()
        .ok_or_else(|| DecodeError::payload("key", "expected a string"))?
        .parse()
        .map_err(|source| DecodeError::InvalidKey { field: "key", source })?;

    let kind = match transform {
        JsonValue::String(name) => {
            let transform_type = lookup(name)?;
            TransformKind::unit(transform_type)
                .ok_or_else(|| DecodeError::payload(transform_type.name(), "discriminant requires a payload"))?
        }
        JsonValue::Object(map) => {
            let mut entries = map.iter();
            let (Some((name, payload)), None) = (entries.next(), entries.next()) else {
                return Err(DecodeError::payload(
                    "transform",
                    format!("expected exactly one discriminant, found {}", map.len()),
                ));
            };
            decode_kind(lookup(name)?, payload)?
        }
        _ => return Err(DecodeError::payload("transform", "expected a string or an object")),
    };

    Ok(Transform { key, kind })
}

/// Parses JSON text and decodes the transform it contains.
pub fn decode_transform_str(text: &str) -> Result<Transform, DecodeError> {
    let value: JsonValue = serde_json::from_str(text).map_err(|e| DecodeError::Json {
        context: "transform",
        message: e.to_string(),
    })?;
    decode_transform(&value)
}

/// Decodes an array of transform documents, in order.
pub fn decode_transforms(value: &JsonValue) -> Result<Vec<Transform>, DecodeError> {
    value
        .as_array()
        .ok_or_else(|| DecodeError::payload("transforms", "expected an array"))?
        .iter()
        .map(decode_transform)
        .collect()
}

fn lookup(name: &str) -> Result<TransformType, DecodeError> {
    TransformType::from_name(name).ok_or_else(|| DecodeError::UnknownDiscriminant { name: name.to_string() })
}

fn decode_kind(transform_type: TransformType, payload: &JsonValue) -> Result<TransformKind, DecodeError> {
    let field = transform_type.name();
    let kind = match transform_type {
        TransformType::Identity
        | TransformType::WriteContractWasm
        | TransformType::WriteContract
        | TransformType::WriteContractPackage => {
            debug!(discriminant = field, "ignoring payload of unit transform");
            TransformKind::unit(transform_type)
                .ok_or_else(|| DecodeError::payload(field, "discriminant carries no payload"))?
        }
        TransformType::WriteCLValue => TransformKind::WriteCLValue(from_json(payload, field)?),
        TransformType::WriteAccount => {
            let key = as_str(payload, field)?
                .parse()
                .map_err(|source| DecodeError::InvalidKey { field: "WriteAccount", source })?;
            TransformKind::WriteAccount(key)
        }
        TransformType::WriteDeployInfo => TransformKind::WriteDeployInfo(from_json(payload, field)?),
        TransformType::WriteEraInfo => TransformKind::WriteEraInfo(from_json(payload, field)?),
        TransformType::WriteTransfer => TransformKind::WriteTransfer(from_json(payload, field)?),
        TransformType::WriteBid => TransformKind::WriteBid(Box::new(from_json(payload, field)?)),
        TransformType::WriteWithdraw => TransformKind::WriteWithdraw(from_json(payload, field)?),
        TransformType::WriteUnbonding => TransformKind::WriteUnbonding(from_json(payload, field)?),
        TransformType::AddInt32 => {
            let value = payload
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| DecodeError::payload(field, "expected a 32-bit signed integer"))?;
            TransformKind::AddInt32(value)
        }
        TransformType::AddUInt64 => {
            let value = payload
                .as_u64()
                .ok_or_else(|| DecodeError::payload(field, "expected a 64-bit unsigned integer"))?;
            TransformKind::AddUInt64(value)
        }
        TransformType::AddUInt128 => TransformKind::AddUInt128(big_uint(payload, field)?),
        TransformType::AddUInt256 => TransformKind::AddUInt256(big_uint(payload, field)?),
        TransformType::AddUInt512 => TransformKind::AddUInt512(big_uint(payload, field)?),
        TransformType::AddKeys => TransformKind::AddKeys(from_json(payload, field)?),
        TransformType::Failure => TransformKind::Failure(as_str(payload, field)?.to_string()),
    };
    Ok(kind)
}

fn as_str<'a>(payload: &'a JsonValue, field: &'static str) -> Result<&'a str, DecodeError> {
    payload
        .as_str()
        .ok_or_else(|| DecodeError::payload(field, "expected a string"))
}

fn big_uint<T: DecimalInt>(payload: &JsonValue, field: &'static str) -> Result<T, DecodeError> {
    let text = as_str(payload, field)?;
    parse_decimal(text).ok_or_else(|| DecodeError::payload(field, format!("invalid decimal integer {:?}", text)))
}

fn from_json<T: DeserializeOwned>(payload: &JsonValue, field: &'static str) -> Result<T, DecodeError> {
    T::deserialize(payload).map_err(|e| DecodeError::payload(field, e))
}

/// Renders a transform as the document [`decode_transform`] reads.
pub fn encode_transform(transform: &Transform) -> Result<JsonValue, EncodeError> {
    let transform_type = transform.transform_type();
    let name = transform_type.name();

    let payload = match &transform.kind {
        TransformKind::Identity
        | TransformKind::WriteContractWasm
        | TransformKind::WriteContract
        | TransformKind::WriteContractPackage => None,
        TransformKind::WriteCLValue(value) => Some(to_json(value, name)?),
        TransformKind::WriteAccount(key) => Some(JsonValue::String(key.to_string())),
        TransformKind::WriteDeployInfo(info) => Some(to_json(info, name)?),
        TransformKind::WriteEraInfo(info) => Some(to_json(info, name)?),
        TransformKind::WriteTransfer(transfer) => Some(to_json(transfer, name)?),
        TransformKind::WriteBid(bid) => Some(to_json(bid, name)?),
        TransformKind::WriteWithdraw(purses) | TransformKind::WriteUnbonding(purses) => Some(to_json(purses, name)?),
        TransformKind::AddInt32(v) => Some(JsonValue::from(*v)),
        TransformKind::AddUInt64(v) => Some(JsonValue::from(*v)),
        TransformKind::AddUInt128(v) => Some(JsonValue::String(v.to_string())),
        TransformKind::AddUInt256(v) => Some(JsonValue::String(v.to_string())),
        TransformKind::AddUInt512(v) => Some(JsonValue::String(v.to_string())),
        TransformKind::AddKeys(keys) => Some(to_json(keys, name)?),
        TransformKind::Failure(message) => Some(JsonValue::String(message.clone())),
    };

    let transform_value = match payload {
        None => JsonValue::String(name.to_string()),
        Some(payload) => {
            let mut map = Map::with_capacity(1);
            map.insert(name.to_string(), payload);
            JsonValue::Object(map)
        }
    };

    let mut document = Map::with_capacity(2);
    document.insert("key".to_string(), JsonValue::String(transform.key.to_string()));
    document.insert("transform".to_string(), transform_value);
    Ok(JsonValue::Object(document))
}

fn to_json<T: serde::Serialize>(value: &T, field: &'static str) -> Result<JsonValue, EncodeError> {
    serde_json::to_value(value).map_err(|e| EncodeError::Json {
        field,
        message: e.to_string(),
    })
}
