//! Serde implementations for [`AttributeValue`].
//!
//! The JSON wire shape is a single-key object tagged with the type
//! descriptor: `{"S": "hello"}`, `{"N": "42"}`, `{"NULL": true}`. Binary
//! payloads are base64-encoded.

use crate::value::AttributeValue;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use indexmap::IndexMap;
use serde::de::{self, MapAccess};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const WIRE_TAGS: &[&str] = &["S", "N", "B", "SS", "NS", "BS", "BOOL", "NULL", "L", "M"];

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::Null => map.serialize_entry("NULL", &true)?,
            Self::S(value) => map.serialize_entry("S", value)?,
            Self::N(value) => map.serialize_entry("N", value)?,
            Self::Bool(value) => map.serialize_entry("BOOL", value)?,
            Self::B(value) => map.serialize_entry("B", &STANDARD.encode(value))?,
            Self::Ss(values) => map.serialize_entry("SS", values)?,
            Self::Ns(values) => map.serialize_entry("NS", values)?,
            Self::Bs(values) => {
                let encoded: Vec<String> =
                    values.iter().map(|value| STANDARD.encode(value)).collect();
                map.serialize_entry("BS", &encoded)?;
            }
            Self::L(values) => map.serialize_entry("L", values)?,
            Self::M(values) => map.serialize_entry("M", values)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(WireVisitor)
    }
}

struct WireVisitor;

impl<'de> de::Visitor<'de> for WireVisitor {
    type Value = AttributeValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an attribute value object with exactly one type key")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
        let Some(tag) = map.next_key::<String>()? else {
            return Err(de::Error::custom(
                "attribute value must have exactly one type key",
            ));
        };

        let value = match tag.as_str() {
            "NULL" => {
                let _: bool = map.next_value()?;
                AttributeValue::Null
            }
            "S" => AttributeValue::S(map.next_value()?),
            "N" => AttributeValue::N(map.next_value()?),
            "BOOL" => AttributeValue::Bool(map.next_value()?),
            "B" => {
                let encoded: String = map.next_value()?;
                let decoded = STANDARD.decode(&encoded).map_err(de::Error::custom)?;
                AttributeValue::B(Bytes::from(decoded))
            }
            "SS" => AttributeValue::Ss(map.next_value()?),
            "NS" => AttributeValue::Ns(map.next_value()?),
            "BS" => {
                let encoded: Vec<String> = map.next_value()?;
                let decoded: Result<Vec<Bytes>, _> = encoded
                    .iter()
                    .map(|value| STANDARD.decode(value).map(Bytes::from))
                    .collect();
                AttributeValue::Bs(decoded.map_err(de::Error::custom)?)
            }
            "L" => AttributeValue::L(map.next_value()?),
            "M" => AttributeValue::M(map.next_value::<IndexMap<String, AttributeValue>>()?),
            other => return Err(de::Error::unknown_field(other, WIRE_TAGS)),
        };

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::null(AttributeValue::null(), r#"{"NULL":true}"#)]
    #[case::string(AttributeValue::string("hello"), r#"{"S":"hello"}"#)]
    #[case::number(AttributeValue::number("42").unwrap(), r#"{"N":"42"}"#)]
    #[case::boolean(AttributeValue::boolean(true), r#"{"BOOL":true}"#)]
    #[case::binary(
        AttributeValue::binary(Bytes::from_static(b"test data")),
        r#"{"B":"dGVzdCBkYXRh"}"#
    )]
    #[case::string_set(
        AttributeValue::string_set(vec!["a".to_string(), "b".to_string()]).unwrap(),
        r#"{"SS":["a","b"]}"#
    )]
    #[case::number_set(
        AttributeValue::number_set(vec!["1".to_string(), "2".to_string()]).unwrap(),
        r#"{"NS":["1","2"]}"#
    )]
    #[case::list(
        AttributeValue::list(vec![
            AttributeValue::string("a"),
            AttributeValue::number("1").unwrap(),
        ]),
        r#"{"L":[{"S":"a"},{"N":"1"}]}"#
    )]
    #[case::map(
        AttributeValue::map(IndexMap::from([
            ("key".to_string(), AttributeValue::string("value")),
        ])),
        r#"{"M":{"key":{"S":"value"}}}"#
    )]
    fn test_wire_shape(#[case] value: AttributeValue, #[case] expected: &str) {
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, expected);
        let deserialized: AttributeValue = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, value);
    }

    #[test]
    fn test_binary_set_roundtrip() {
        let value = AttributeValue::binary_set(vec![
            Bytes::from_static(b"one"),
            Bytes::from_static(b"two"),
        ])
        .unwrap();
        let json = serde_json::to_string(&value).unwrap();
        let deserialized: AttributeValue = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, value);
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let result: Result<AttributeValue, _> = serde_json::from_str(r#"{"X":"oops"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_map_order_preserved() {
        let json = r#"{"M":{"z":{"N":"1"},"a":{"N":"2"}}}"#;
        let value: AttributeValue = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = value.as_m().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z".to_string(), "a".to_string()]);
    }
}
