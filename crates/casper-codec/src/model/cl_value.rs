//! Typed contract values and named arguments.
//!
//! A `CLValue` pairs its serialized bytes with the type needed to interpret
//! them. JSON form: `{"cl_type": ..., "bytes": "<hex>", "parsed": ...}`.

use primitive_types::{U128, U256, U512};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::codec::primitives::Writer;
use crate::error::EncodeError;
use crate::model::key::{GlobalStateKey, URef};
use crate::model::public_key::PublicKey;

/// The type of a `CLValue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CLType {
    Bool,
    I32,
    I64,
    U8,
    U32,
    U64,
    U128,
    U256,
    U512,
    Unit,
    String,
    Key,
    URef,
    Option(Box<CLType>),
    List(Box<CLType>),
    ByteArray(u32),
    Result { ok: Box<CLType>, err: Box<CLType> },
    Map { key: Box<CLType>, value: Box<CLType> },
    Tuple1([Box<CLType>; 1]),
    Tuple2([Box<CLType>; 2]),
    Tuple3([Box<CLType>; 3]),
    Any,
    PublicKey,
}

impl CLType {
    /// Wire tag of this type.
    pub fn tag(&self) -> u8 {
        match self {
            CLType::Bool => 0,
            CLType::I32 => 1,
            CLType::I64 => 2,
            CLType::U8 => 3,
            CLType::U32 => 4,
            CLType::U64 => 5,
            CLType::U128 => 6,
            CLType::U256 => 7,
            CLType::U512 => 8,
            CLType::Unit => 9,
            CLType::String => 10,
            CLType::Key => 11,
            CLType::URef => 12,
            CLType::Option(_) => 13,
            CLType::List(_) => 14,
            CLType::ByteArray(_) => 15,
            CLType::Result { .. } => 16,
            CLType::Map { .. } => 17,
            CLType::Tuple1(_) => 18,
            CLType::Tuple2(_) => 19,
            CLType::Tuple3(_) => 20,
            CLType::Any => 21,
            CLType::PublicKey => 22,
        }
    }

    /// Appends the tag and any nested types.
    pub fn write_to(&self, writer: &mut Writer) {
        writer.write_byte(self.tag());
        match self {
            CLType::Option(inner) | CLType::List(inner) => inner.write_to(writer),
            CLType::ByteArray(len) => writer.write_u32(*len),
            CLType::Result { ok, err } => {
                ok.write_to(writer);
                err.write_to(writer);
            }
            CLType::Map { key, value } => {
                key.write_to(writer);
                value.write_to(writer);
            }
            CLType::Tuple1(items) => items.iter().for_each(|t| t.write_to(writer)),
            CLType::Tuple2(items) => items.iter().for_each(|t| t.write_to(writer)),
            CLType::Tuple3(items) => items.iter().for_each(|t| t.write_to(writer)),
            _ => {}
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = Writer::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }
}

/// A serialized value with its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CLValue {
    pub cl_type: CLType,
    #[serde(with = "hex")]
    pub bytes: Vec<u8>,
    /// Human-readable rendering; informational only.
    #[serde(default)]
    pub parsed: JsonValue,
}

/// Length byte followed by the little-endian bytes with trailing zeros removed.
fn big_uint_bytes(le: &[u8]) -> Vec<u8> {
    let used = le.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let mut out = Vec::with_capacity(1 + used);
    out.push(used as u8);
    out.extend_from_slice(&le[..used]);
    out
}

macro_rules! big_uint_constructor {
    ($name:ident, $ty:ty, $width:expr, $cl_type:expr) => {
        pub fn $name(value: $ty) -> Self {
            let mut le = [0u8; $width];
            value.to_little_endian(&mut le);
            Self::new($cl_type, big_uint_bytes(&le), JsonValue::String(value.to_string()))
        }
    };
}

impl CLValue {
    pub fn new(cl_type: CLType, bytes: Vec<u8>, parsed: JsonValue) -> Self {
        Self {
            cl_type,
            bytes,
            parsed,
        }
    }

    pub fn bool(value: bool) -> Self {
        Self::new(CLType::Bool, vec![value as u8], value.into())
    }

    pub fn i32(value: i32) -> Self {
        Self::new(CLType::I32, value.to_le_bytes().to_vec(), value.into())
    }

    pub fn i64(value: i64) -> Self {
        Self::new(CLType::I64, value.to_le_bytes().to_vec(), value.into())
    }

    pub fn u8(value: u8) -> Self {
        Self::new(CLType::U8, vec![value], value.into())
    }

    pub fn u32(value: u32) -> Self {
        Self::new(CLType::U32, value.to_le_bytes().to_vec(), value.into())
    }

    pub fn u64(value: u64) -> Self {
        Self::new(CLType::U64, value.to_le_bytes().to_vec(), value.into())
    }

    big_uint_constructor!(u128, U128, 16, CLType::U128);
    big_uint_constructor!(u256, U256, 32, CLType::U256);
    big_uint_constructor!(u512, U512, 64, CLType::U512);

    pub fn unit() -> Self {
        Self::new(CLType::Unit, Vec::new(), JsonValue::Null)
    }

    /// A UTF-8 string, length-prefixed.
    pub fn string(value: impl Into<String>) -> Result<Self, EncodeError> {
        let value = value.into();
        let mut writer = Writer::with_capacity(4 + value.len());
        writer.write_string(&value)?;
        Ok(Self::new(CLType::String, writer.into_bytes(), JsonValue::String(value)))
    }

    pub fn key(key: GlobalStateKey) -> Self {
        Self::new(CLType::Key, key.to_bytes(), JsonValue::String(key.to_string()))
    }

    pub fn uref(uref: URef) -> Self {
        Self::new(CLType::URef, uref.to_bytes().to_vec(), JsonValue::String(uref.to_string()))
    }

    pub fn public_key(key: PublicKey) -> Self {
        Self::new(CLType::PublicKey, key.to_bytes(), JsonValue::String(key.to_string()))
    }

    /// A fixed-length byte array.
    pub fn byte_array(bytes: Vec<u8>) -> Result<Self, EncodeError> {
        let len = u32::try_from(bytes.len()).map_err(|_| EncodeError::LengthExceedsLimit {
            field: "byte array",
            len: bytes.len(),
            max: u32::MAX as usize,
        })?;
        let parsed = JsonValue::String(hex::encode(&bytes));
        Ok(Self::new(CLType::ByteArray(len), bytes, parsed))
    }

    /// Length-prefixed value bytes followed by the type bytes.
    pub fn write_to(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.write_bytes_prefixed(&self.bytes)?;
        self.cl_type.write_to(writer);
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut writer = Writer::new();
        self.write_to(&mut writer)?;
        Ok(writer.into_bytes())
    }
}

/// A runtime argument: a name bound to a `CLValue`.
///
/// JSON form is the pair `["name", {cl value}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, CLValue)", into = "(String, CLValue)")]
pub struct NamedArg {
    pub name: String,
    pub value: CLValue,
}

impl NamedArg {
    pub fn new(name: impl Into<String>, value: CLValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Length-prefixed name followed by the value encoding.
    pub fn write_to(&self, writer: &mut Writer) -> Result<(), EncodeError> {
        writer.write_string(&self.name)?;
        self.value.write_to(writer)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut writer = Writer::new();
        self.write_to(&mut writer)?;
        Ok(writer.into_bytes())
    }
}

impl From<(String, CLValue)> for NamedArg {
    fn from((name, value): (String, CLValue)) -> Self {
        NamedArg { name, value }
    }
}

impl From<NamedArg> for (String, CLValue) {
    fn from(arg: NamedArg) -> Self {
        (arg.name, arg.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::key::AccessRights;

    #[test]
    fn test_scalar_bytes() {
        assert_eq!(CLValue::u64(5).to_bytes().unwrap(), [8, 0, 0, 0, 5, 0, 0, 0, 0, 0, 0, 0, 5]);
        assert_eq!(CLValue::bool(true).to_bytes().unwrap(), [1, 0, 0, 0, 1, 0]);
        assert_eq!(CLValue::unit().to_bytes().unwrap(), [0, 0, 0, 0, 9]);
        assert_eq!(
            CLValue::string("ab").unwrap().to_bytes().unwrap(),
            [6, 0, 0, 0, 2, 0, 0, 0, b'a', b'b', 10]
        );
    }

    #[test]
    fn test_u512_minimal_encoding() {
        assert_eq!(CLValue::u512(U512::zero()).bytes, [0]);
        assert_eq!(CLValue::u512(U512::from(256u32)).bytes, [2, 0, 1]);
        let motes = CLValue::u512(U512::from(2_500_000_000u64));
        assert_eq!(motes.bytes, [4, 0x00, 0xf9, 0x02, 0x95]);
        assert_eq!(motes.parsed, "2500000000");
    }

    #[test]
    fn test_nested_type_bytes() {
        let ty = CLType::Map {
            key: Box::new(CLType::String),
            value: Box::new(CLType::Option(Box::new(CLType::U8))),
        };
        assert_eq!(ty.to_bytes(), [17, 10, 13, 3]);
        assert_eq!(CLType::ByteArray(32).to_bytes(), [15, 32, 0, 0, 0]);
        assert_eq!(
            CLType::Tuple2([Box::new(CLType::Bool), Box::new(CLType::Key)]).to_bytes(),
            [19, 0, 11]
        );
    }

    #[test]
    fn test_uref_value() {
        let value = CLValue::uref(URef::new([1; 32], AccessRights::ReadAddWrite));
        assert_eq!(value.bytes.len(), 33);
        assert_eq!(value.bytes[32], 7);
        assert_eq!(value.cl_type.tag(), 12);
    }

    #[test]
    fn test_named_arg_bytes() {
        let arg = NamedArg::new("id", CLValue::u8(3));
        assert_eq!(
            arg.to_bytes().unwrap(),
            [2, 0, 0, 0, b'i', b'd', 1, 0, 0, 0, 3, 3]
        );
    }

    #[test]
    fn test_json_forms() {
        let value: CLValue = serde_json::from_value(serde_json::json!({
            "cl_type": {"List": "U8"},
            "bytes": "020000000102",
            "parsed": [1, 2]
        }))
        .unwrap();
        assert_eq!(value.cl_type, CLType::List(Box::new(CLType::U8)));
        assert_eq!(value.bytes, [2, 0, 0, 0, 1, 2]);

        let arg = NamedArg::new("amount", CLValue::u512(U512::from(10u8)));
        let json = serde_json::to_value(&arg).unwrap();
        assert_eq!(json[0], "amount");
        assert_eq!(json[1]["cl_type"], "U512");
        assert_eq!(json[1]["bytes"], "010a");
        let back: NamedArg = serde_json::from_value(json).unwrap();
        assert_eq!(back, arg);

        let ty: CLType = serde_json::from_value(serde_json::json!({"ByteArray": 32})).unwrap();
        assert_eq!(ty, CLType::ByteArray(32));
    }
}
