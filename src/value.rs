//! The attribute-value model shared by converters and expressions.
//!
//! [`AttributeValue`] is a closed tagged union covering every value shape
//! DynamoDB accepts. Exactly one variant is active at a time, and collection
//! variants hold only well-formed inner values: the checked constructors
//! reject non-numeric text in number shapes and empty sets.

/// Visitor contract for exhaustive traversal of attribute values.
pub mod visitor;

/// Serde implementations producing the DynamoDB JSON wire shape.
mod wire;

use crate::error::{Error, Result};
use crate::value::visitor::ValueVisitor;

use bytes::Bytes;
use indexmap::IndexMap;
use std::fmt;

/// One attribute value in the DynamoDB data model.
///
/// Numbers are decimal text to preserve arbitrary precision; sets are
/// non-empty and homogeneous. The explicit [`AttributeValue::Null`] variant
/// distinguishes "attribute is the null value" from "attribute absent",
/// which matters for partial updates.
///
/// ```rust
/// use dynamodb_mapper::value::AttributeValue;
///
/// let value = AttributeValue::number("42").unwrap();
/// assert_eq!(value.as_n(), Some("42"));
/// assert!(AttributeValue::number("forty-two").is_err());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AttributeValue {
    /// The explicit null value.
    Null,
    /// String value.
    S(String),
    /// Number value (decimal text, arbitrary precision).
    N(String),
    /// Boolean value.
    Bool(bool),
    /// Binary value.
    B(Bytes),
    /// String set (non-empty).
    Ss(Vec<String>),
    /// Number set (non-empty, decimal text).
    Ns(Vec<String>),
    /// Binary set (non-empty).
    Bs(Vec<Bytes>),
    /// List of attribute values.
    L(Vec<AttributeValue>),
    /// Map of string keys to attribute values.
    M(IndexMap<String, AttributeValue>),
}

impl AttributeValue {
    /// The explicit null value.
    pub fn null() -> Self {
        Self::Null
    }

    /// A string value.
    pub fn string(value: impl Into<String>) -> Self {
        Self::S(value.into())
    }

    /// A number value; fails unless `value` is well-formed decimal text.
    pub fn number(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if !is_number_text(&value) {
            return Err(Error::MalformedValue {
                type_descriptor: "N",
                message: format!("'{value}' is not decimal number text"),
            });
        }
        Ok(Self::N(value))
    }

    /// A boolean value.
    pub fn boolean(value: bool) -> Self {
        Self::Bool(value)
    }

    /// A binary value.
    pub fn binary(value: impl Into<Bytes>) -> Self {
        Self::B(value.into())
    }

    /// A string set; fails when `values` is empty.
    pub fn string_set(values: Vec<String>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::MalformedValue {
                type_descriptor: "SS",
                message: "sets must contain at least one element".to_string(),
            });
        }
        Ok(Self::Ss(values))
    }

    /// A number set; fails when `values` is empty or any element is not
    /// well-formed decimal text.
    pub fn number_set(values: Vec<String>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::MalformedValue {
                type_descriptor: "NS",
                message: "sets must contain at least one element".to_string(),
            });
        }
        if let Some(value) = values.iter().find(|value| !is_number_text(value)) {
            return Err(Error::MalformedValue {
                type_descriptor: "NS",
                message: format!("'{value}' is not decimal number text"),
            });
        }
        Ok(Self::Ns(values))
    }

    /// A binary set; fails when `values` is empty.
    pub fn binary_set(values: Vec<Bytes>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::MalformedValue {
                type_descriptor: "BS",
                message: "sets must contain at least one element".to_string(),
            });
        }
        Ok(Self::Bs(values))
    }

    /// A list of attribute values.
    pub fn list(values: Vec<AttributeValue>) -> Self {
        Self::L(values)
    }

    /// A map of string keys to attribute values.
    pub fn map(values: IndexMap<String, AttributeValue>) -> Self {
        Self::M(values)
    }

    /// Returns `true` if this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if this is a string value.
    pub fn is_s(&self) -> bool {
        matches!(self, Self::S(_))
    }

    /// Returns `true` if this is a number value.
    pub fn is_n(&self) -> bool {
        matches!(self, Self::N(_))
    }

    /// Returns `true` if this is a boolean value.
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Returns `true` if this is a binary value.
    pub fn is_b(&self) -> bool {
        matches!(self, Self::B(_))
    }

    /// Returns `true` if this is a set of any element shape.
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Ss(_) | Self::Ns(_) | Self::Bs(_))
    }

    /// Returns `true` if this is a list value.
    pub fn is_l(&self) -> bool {
        matches!(self, Self::L(_))
    }

    /// Returns `true` if this is a map value.
    pub fn is_m(&self) -> bool {
        matches!(self, Self::M(_))
    }

    /// Returns the string if this is an `S` variant.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the number text if this is an `N` variant.
    pub fn as_n(&self) -> Option<&str> {
        match self {
            Self::N(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Bool` variant.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the bytes if this is a `B` variant.
    pub fn as_b(&self) -> Option<&Bytes> {
        match self {
            Self::B(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the list if this is an `L` variant.
    pub fn as_l(&self) -> Option<&[AttributeValue]> {
        match self {
            Self::L(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the map if this is an `M` variant.
    pub fn as_m(&self) -> Option<&IndexMap<String, AttributeValue>> {
        match self {
            Self::M(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the wire tag of the active variant (`"S"`, `"N"`, …).
    pub fn type_descriptor(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::Bool(_) => "BOOL",
            Self::B(_) => "B",
            Self::Ss(_) => "SS",
            Self::Ns(_) => "NS",
            Self::Bs(_) => "BS",
            Self::L(_) => "L",
            Self::M(_) => "M",
        }
    }

    /// Dispatches this value to exactly one method of `visitor`.
    ///
    /// A visitor implements only the variants it cares about; every other
    /// variant reaches [`ValueVisitor::default_visit`], which fails naming
    /// the unhandled shape.
    pub fn convert<V: ValueVisitor>(self, visitor: &mut V) -> Result<V::Output> {
        match self {
            Self::Null => visitor.visit_null(),
            Self::S(value) => visitor.visit_s(value),
            Self::N(value) => visitor.visit_n(value),
            Self::Bool(value) => visitor.visit_bool(value),
            Self::B(value) => visitor.visit_b(value),
            Self::Ss(values) => visitor.visit_ss(values),
            Self::Ns(values) => visitor.visit_ns(values),
            Self::Bs(values) => visitor.visit_bs(values),
            Self::L(values) => visitor.visit_l(values),
            Self::M(values) => visitor.visit_m(values),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "{{NULL}}"),
            Self::S(value) => write!(f, "{{S: {value}}}"),
            Self::N(value) => write!(f, "{{N: {value}}}"),
            Self::Bool(value) => write!(f, "{{BOOL: {value}}}"),
            Self::B(value) => write!(f, "{{B: {} bytes}}", value.len()),
            Self::Ss(values) => write!(f, "{{SS: {values:?}}}"),
            Self::Ns(values) => write!(f, "{{NS: {values:?}}}"),
            Self::Bs(values) => write!(f, "{{BS: {} items}}", values.len()),
            Self::L(values) => write!(f, "{{L: {} items}}", values.len()),
            Self::M(values) => write!(f, "{{M: {} keys}}", values.len()),
        }
    }
}

/// Decimal number text: optional sign, digits with an optional fractional
/// part, optional exponent.
fn is_number_text(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };
    let all_digits = |text: &str| !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit());
    let mantissa_valid = match mantissa.split_once('.') {
        Some((integer, fraction)) => {
            (integer.is_empty() || all_digits(integer))
                && (fraction.is_empty() || all_digits(fraction))
                && !(integer.is_empty() && fraction.is_empty())
        }
        None => all_digits(mantissa),
    };
    let exponent_valid = match exponent {
        Some(exponent) => all_digits(exponent.strip_prefix(['+', '-']).unwrap_or(exponent)),
        None => true,
    };
    mantissa_valid && exponent_valid
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::integer("42", true)]
    #[case::negative("-42", true)]
    #[case::positive_sign("+42", true)]
    #[case::fraction("3.25", true)]
    #[case::trailing_dot("1.", true)]
    #[case::leading_dot(".5", true)]
    #[case::exponent("1e10", true)]
    #[case::signed_exponent("1.5E-3", true)]
    #[case::empty("", false)]
    #[case::bare_dot(".", false)]
    #[case::bare_sign("-", false)]
    #[case::words("forty-two", false)]
    #[case::hex("0x10", false)]
    #[case::empty_exponent("1e", false)]
    #[case::double_sign("--1", false)]
    fn test_number_text(#[case] text: &str, #[case] valid: bool) {
        assert_eq!(is_number_text(text), valid);
    }

    #[rstest]
    #[case::null(AttributeValue::null(), "NULL")]
    #[case::string(AttributeValue::string("a"), "S")]
    #[case::number(AttributeValue::number("1").unwrap(), "N")]
    #[case::boolean(AttributeValue::boolean(true), "BOOL")]
    #[case::binary(AttributeValue::binary(Bytes::from_static(b"a")), "B")]
    #[case::string_set(AttributeValue::string_set(vec!["a".to_string()]).unwrap(), "SS")]
    #[case::number_set(AttributeValue::number_set(vec!["1".to_string()]).unwrap(), "NS")]
    #[case::binary_set(
        AttributeValue::binary_set(vec![Bytes::from_static(b"a")]).unwrap(),
        "BS"
    )]
    #[case::list(AttributeValue::list(vec![AttributeValue::string("a")]), "L")]
    #[case::map(
        AttributeValue::map(IndexMap::from([
            ("a".to_string(), AttributeValue::string("b")),
        ])),
        "M"
    )]
    fn test_type_descriptor(#[case] value: AttributeValue, #[case] expected: &str) {
        assert_eq!(value.type_descriptor(), expected);
    }

    #[rstest]
    #[case::string_set(AttributeValue::string_set(vec![]))]
    #[case::number_set(AttributeValue::number_set(vec![]))]
    #[case::binary_set(AttributeValue::binary_set(vec![]))]
    fn test_empty_sets_rejected(#[case] result: Result<AttributeValue>) {
        assert!(matches!(result, Err(Error::MalformedValue { .. })));
    }

    #[test]
    fn test_number_set_rejects_non_numeric_element() {
        let result = AttributeValue::number_set(vec!["1".to_string(), "two".to_string()]);
        assert!(matches!(
            result,
            Err(Error::MalformedValue {
                type_descriptor: "NS",
                ..
            })
        ));
    }

    #[test]
    fn test_accessors_match_active_variant() {
        let value = AttributeValue::string("hello");
        assert!(value.is_s());
        assert_eq!(value.as_s(), Some("hello"));
        assert_eq!(value.as_n(), None);
        assert!(!value.is_set());
    }
}
