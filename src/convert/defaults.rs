//! Built-in converters for the standard wire shapes.
//!
//! Each converter serves one exact type descriptor and uses a
//! [`ValueVisitor`] to decompose attribute values on the read side, so an
//! unexpected shape fails with an error naming both the shape and the
//! converter. [`ListConverter`] and [`MapConverter`] compose an element
//! converter to cover the nested shapes.

use crate::convert::Converter;
use crate::error::{Error, Result};
use crate::token::TypeToken;
use crate::value::AttributeValue;
use crate::value::visitor::ValueVisitor;

use bytes::Bytes;
use indexmap::IndexMap;

/// Converter between [`String`] and the `S` shape.
#[derive(Clone, Copy, Debug)]
pub struct StringConverter;

impl Converter<String> for StringConverter {
    fn token(&self) -> TypeToken {
        TypeToken::of::<String>()
    }

    fn to_attribute_value(&self, value: &String) -> Result<AttributeValue> {
        Ok(AttributeValue::string(value.clone()))
    }

    fn from_attribute_value(&self, value: AttributeValue) -> Result<String> {
        struct Visitor;

        impl ValueVisitor for Visitor {
            type Output = String;

            fn converter_name(&self) -> Option<&str> {
                Some("StringConverter")
            }

            fn visit_s(&mut self, value: String) -> Result<String> {
                Ok(value)
            }
        }

        value.convert(&mut Visitor)
    }
}

/// Converter between [`i64`] and the `N` shape.
#[derive(Clone, Copy, Debug)]
pub struct I64Converter;

impl Converter<i64> for I64Converter {
    fn token(&self) -> TypeToken {
        TypeToken::of::<i64>()
    }

    fn to_attribute_value(&self, value: &i64) -> Result<AttributeValue> {
        Ok(AttributeValue::N(value.to_string()))
    }

    fn from_attribute_value(&self, value: AttributeValue) -> Result<i64> {
        struct Visitor;

        impl ValueVisitor for Visitor {
            type Output = i64;

            fn converter_name(&self) -> Option<&str> {
                Some("I64Converter")
            }

            fn visit_n(&mut self, value: String) -> Result<i64> {
                parse_number(&value)
            }
        }

        value.convert(&mut Visitor)
    }
}

/// Converter between [`f64`] and the `N` shape.
#[derive(Clone, Copy, Debug)]
pub struct F64Converter;

impl Converter<f64> for F64Converter {
    fn token(&self) -> TypeToken {
        TypeToken::of::<f64>()
    }

    fn to_attribute_value(&self, value: &f64) -> Result<AttributeValue> {
        Ok(AttributeValue::N(value.to_string()))
    }

    fn from_attribute_value(&self, value: AttributeValue) -> Result<f64> {
        struct Visitor;

        impl ValueVisitor for Visitor {
            type Output = f64;

            fn converter_name(&self) -> Option<&str> {
                Some("F64Converter")
            }

            fn visit_n(&mut self, value: String) -> Result<f64> {
                parse_number(&value)
            }
        }

        value.convert(&mut Visitor)
    }
}

/// Converter between [`bool`] and the `BOOL` shape.
#[derive(Clone, Copy, Debug)]
pub struct BoolConverter;

impl Converter<bool> for BoolConverter {
    fn token(&self) -> TypeToken {
        TypeToken::of::<bool>()
    }

    fn to_attribute_value(&self, value: &bool) -> Result<AttributeValue> {
        Ok(AttributeValue::boolean(*value))
    }

    fn from_attribute_value(&self, value: AttributeValue) -> Result<bool> {
        struct Visitor;

        impl ValueVisitor for Visitor {
            type Output = bool;

            fn converter_name(&self) -> Option<&str> {
                Some("BoolConverter")
            }

            fn visit_bool(&mut self, value: bool) -> Result<bool> {
                Ok(value)
            }
        }

        value.convert(&mut Visitor)
    }
}

/// Converter between [`Bytes`] and the `B` shape.
#[derive(Clone, Copy, Debug)]
pub struct BinaryConverter;

impl Converter<Bytes> for BinaryConverter {
    fn token(&self) -> TypeToken {
        TypeToken::of::<Bytes>()
    }

    fn to_attribute_value(&self, value: &Bytes) -> Result<AttributeValue> {
        Ok(AttributeValue::binary(value.clone()))
    }

    fn from_attribute_value(&self, value: AttributeValue) -> Result<Bytes> {
        struct Visitor;

        impl ValueVisitor for Visitor {
            type Output = Bytes;

            fn converter_name(&self) -> Option<&str> {
                Some("BinaryConverter")
            }

            fn visit_b(&mut self, value: Bytes) -> Result<Bytes> {
                Ok(value)
            }
        }

        value.convert(&mut Visitor)
    }
}

/// Converter between the unit type and the `NULL` shape.
#[derive(Clone, Copy, Debug)]
pub struct NullConverter;

impl Converter<()> for NullConverter {
    fn token(&self) -> TypeToken {
        TypeToken::of::<()>()
    }

    fn to_attribute_value(&self, _value: &()) -> Result<AttributeValue> {
        Ok(AttributeValue::null())
    }

    fn from_attribute_value(&self, value: AttributeValue) -> Result<()> {
        struct Visitor;

        impl ValueVisitor for Visitor {
            type Output = ();

            fn converter_name(&self) -> Option<&str> {
                Some("NullConverter")
            }

            fn visit_null(&mut self) -> Result<()> {
                Ok(())
            }
        }

        value.convert(&mut Visitor)
    }
}

/// Converter between `Vec<String>` and the `SS` shape.
#[derive(Clone, Copy, Debug)]
pub struct StringSetConverter;

impl Converter<Vec<String>> for StringSetConverter {
    fn token(&self) -> TypeToken {
        TypeToken::set_of(TypeToken::of::<String>())
    }

    fn to_attribute_value(&self, value: &Vec<String>) -> Result<AttributeValue> {
        AttributeValue::string_set(value.clone())
    }

    fn from_attribute_value(&self, value: AttributeValue) -> Result<Vec<String>> {
        struct Visitor;

        impl ValueVisitor for Visitor {
            type Output = Vec<String>;

            fn converter_name(&self) -> Option<&str> {
                Some("StringSetConverter")
            }

            fn visit_ss(&mut self, values: Vec<String>) -> Result<Vec<String>> {
                Ok(values)
            }
        }

        value.convert(&mut Visitor)
    }
}

/// Converter between `Vec<i64>` and the `NS` shape.
#[derive(Clone, Copy, Debug)]
pub struct NumberSetConverter;

impl Converter<Vec<i64>> for NumberSetConverter {
    fn token(&self) -> TypeToken {
        TypeToken::set_of(TypeToken::of::<i64>())
    }

    fn to_attribute_value(&self, value: &Vec<i64>) -> Result<AttributeValue> {
        AttributeValue::number_set(value.iter().map(i64::to_string).collect())
    }

    fn from_attribute_value(&self, value: AttributeValue) -> Result<Vec<i64>> {
        struct Visitor;

        impl ValueVisitor for Visitor {
            type Output = Vec<i64>;

            fn converter_name(&self) -> Option<&str> {
                Some("NumberSetConverter")
            }

            fn visit_ns(&mut self, values: Vec<String>) -> Result<Vec<i64>> {
                values.iter().map(|value| parse_number(value)).collect()
            }
        }

        value.convert(&mut Visitor)
    }
}

/// Converter between `Vec<Bytes>` and the `BS` shape.
#[derive(Clone, Copy, Debug)]
pub struct BinarySetConverter;

impl Converter<Vec<Bytes>> for BinarySetConverter {
    fn token(&self) -> TypeToken {
        TypeToken::set_of(TypeToken::of::<Bytes>())
    }

    fn to_attribute_value(&self, value: &Vec<Bytes>) -> Result<AttributeValue> {
        AttributeValue::binary_set(value.clone())
    }

    fn from_attribute_value(&self, value: AttributeValue) -> Result<Vec<Bytes>> {
        struct Visitor;

        impl ValueVisitor for Visitor {
            type Output = Vec<Bytes>;

            fn converter_name(&self) -> Option<&str> {
                Some("BinarySetConverter")
            }

            fn visit_bs(&mut self, values: Vec<Bytes>) -> Result<Vec<Bytes>> {
                Ok(values)
            }
        }

        value.convert(&mut Visitor)
    }
}

/// Converter between `Vec<T>` and the `L` shape, composing an element
/// converter.
///
/// ```rust
/// use dynamodb_mapper::convert::Converter;
/// use dynamodb_mapper::convert::defaults::{I64Converter, ListConverter};
///
/// let converter = ListConverter::new(I64Converter);
/// let value = converter.to_attribute_value(&vec![1, 2]).unwrap();
/// let restored: Vec<i64> = converter.from_attribute_value(value).unwrap();
/// assert_eq!(restored, vec![1, 2]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ListConverter<C> {
    element: C,
}

impl<C> ListConverter<C> {
    /// A list converter delegating elements to `element`.
    pub fn new(element: C) -> Self {
        Self { element }
    }
}

impl<T, C> Converter<Vec<T>> for ListConverter<C>
where
    T: 'static,
    C: Converter<T>,
{
    fn token(&self) -> TypeToken {
        TypeToken::list_of(self.element.token())
    }

    fn to_attribute_value(&self, value: &Vec<T>) -> Result<AttributeValue> {
        let values = value
            .iter()
            .map(|element| self.element.to_attribute_value(element))
            .collect::<Result<Vec<_>>>()?;
        Ok(AttributeValue::list(values))
    }

    fn from_attribute_value(&self, value: AttributeValue) -> Result<Vec<T>> {
        struct Visitor;

        impl ValueVisitor for Visitor {
            type Output = Vec<AttributeValue>;

            fn converter_name(&self) -> Option<&str> {
                Some("ListConverter")
            }

            fn visit_l(&mut self, values: Vec<AttributeValue>) -> Result<Vec<AttributeValue>> {
                Ok(values)
            }
        }

        let values = value.convert(&mut Visitor)?;
        values
            .into_iter()
            .map(|element| self.element.from_attribute_value(element))
            .collect()
    }
}

/// Converter between `IndexMap<String, T>` and the `M` shape, composing an
/// element converter for the values.
#[derive(Clone, Copy, Debug)]
pub struct MapConverter<C> {
    element: C,
}

impl<C> MapConverter<C> {
    /// A map converter delegating values to `element`.
    pub fn new(element: C) -> Self {
        Self { element }
    }
}

impl<T, C> Converter<IndexMap<String, T>> for MapConverter<C>
where
    T: 'static,
    C: Converter<T>,
{
    fn token(&self) -> TypeToken {
        TypeToken::map_of(TypeToken::of::<String>(), self.element.token())
    }

    fn to_attribute_value(&self, value: &IndexMap<String, T>) -> Result<AttributeValue> {
        let values = value
            .iter()
            .map(|(key, element)| {
                self.element
                    .to_attribute_value(element)
                    .map(|element| (key.clone(), element))
            })
            .collect::<Result<IndexMap<_, _>>>()?;
        Ok(AttributeValue::map(values))
    }

    fn from_attribute_value(&self, value: AttributeValue) -> Result<IndexMap<String, T>> {
        struct Visitor;

        impl ValueVisitor for Visitor {
            type Output = IndexMap<String, AttributeValue>;

            fn converter_name(&self) -> Option<&str> {
                Some("MapConverter")
            }

            fn visit_m(
                &mut self,
                values: IndexMap<String, AttributeValue>,
            ) -> Result<IndexMap<String, AttributeValue>> {
                Ok(values)
            }
        }

        let values = value.convert(&mut Visitor)?;
        values
            .into_iter()
            .map(|(key, element)| {
                self.element
                    .from_attribute_value(element)
                    .map(|element| (key, element))
            })
            .collect()
    }
}

/// Parses decimal number text into a concrete numeric type.
fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T> {
    value.parse().map_err(|_| Error::MalformedValue {
        type_descriptor: "N",
        message: format!("cannot parse '{value}' as a number"),
    })
}
