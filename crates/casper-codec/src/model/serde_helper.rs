//! Serde adapters for textual wire forms.

/// Implements `Serialize`/`Deserialize` through `Display`/`FromStr`.
macro_rules! impl_string_serde {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl serde::Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    serializer.collect_str(self)
                }
            }

            impl<'de> serde::Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
                    s.parse().map_err(serde::de::Error::custom)
                }
            }
        )+
    };
}

pub(crate) use impl_string_serde;

/// Unsigned big integers that can be read from decimal text.
pub trait DecimalInt: Sized + std::fmt::Display {
    fn from_decimal(s: &str) -> Option<Self>;
}

macro_rules! impl_decimal_int {
    ($($ty:ty),+) => {
        $(
            impl DecimalInt for $ty {
                fn from_decimal(s: &str) -> Option<Self> {
                    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                        return None;
                    }
                    <$ty>::from_dec_str(s).ok()
                }
            }
        )+
    };
}

impl_decimal_int!(primitive_types::U128, primitive_types::U256, primitive_types::U512);

/// Parses a decimal string into a big integer.
pub fn parse_decimal<T: DecimalInt>(s: &str) -> Option<T> {
    T::from_decimal(s)
}

/// `#[serde(with = "decimal")]`: big integers as decimal strings.
pub mod decimal {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::DecimalInt;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: DecimalInt,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: DecimalInt,
        D: Deserializer<'de>,
    {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        T::from_decimal(&s).ok_or_else(|| de::Error::custom(format!("invalid decimal integer {:?}", s)))
    }
}

/// `#[serde(with = "option_decimal_list")]` for optional lists of big integers.
pub mod option_decimal_list {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::DecimalInt;

    pub fn serialize<T, S>(value: &Option<Vec<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: DecimalInt,
        S: Serializer,
    {
        match value {
            Some(list) => serializer.collect_seq(list.iter().map(|v| v.to_string())),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        T: DecimalInt,
        D: Deserializer<'de>,
    {
        let Some(list) = Option::<Vec<String>>::deserialize(deserializer)? else {
            return Ok(None);
        };
        list.iter()
            .map(|s| T::from_decimal(s).ok_or_else(|| de::Error::custom(format!("invalid decimal integer {:?}", s))))
            .collect::<Result<Vec<T>, D::Error>>()
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::{U128, U512};

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Amount {
        #[serde(with = "decimal")]
        value: U512,
        #[serde(with = "option_decimal_list", default)]
        locked: Option<Vec<U128>>,
    }

    #[test]
    fn test_decimal_strings() {
        let amount: Amount = serde_json::from_str(r#"{"value":"1000000000000000000000","locked":["1","2"]}"#).unwrap();
        assert_eq!(amount.value, U512::from_dec_str("1000000000000000000000").unwrap());
        assert_eq!(amount.locked, Some(vec![U128::from(1u8), U128::from(2u8)]));

        let json = serde_json::to_value(&amount).unwrap();
        assert_eq!(json["value"], "1000000000000000000000");
        assert_eq!(json["locked"][1], "2");
    }

    #[test]
    fn test_decimal_rejects_non_digits() {
        assert!(parse_decimal::<U512>("").is_none());
        assert!(parse_decimal::<U512>("-1").is_none());
        assert!(parse_decimal::<U512>("0x10").is_none());
        assert!(serde_json::from_str::<Amount>(r#"{"value":"12a"}"#).is_err());
        assert!(serde_json::from_str::<Amount>(r#"{"value":12}"#).is_err());
    }

    #[test]
    fn test_decimal_overflow() {
        let too_big = "1".repeat(40);
        assert!(parse_decimal::<U128>(&too_big).is_none());
        assert!(parse_decimal::<U512>(&too_big).is_some());
    }
}
