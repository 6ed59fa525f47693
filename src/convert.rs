//! Bidirectional converters between application types and attribute values.
//!
//! A [`Converter`] maps exactly one application type to and from
//! [`AttributeValue`]; a [`PolymorphicConverter`] covers a whole family of
//! types sharing a raw shape (or every type, as a catch-all). Converters are
//! registered in a [`registry::ConverterRegistry`] and resolved by
//! [`crate::token::TypeToken`].

/// Built-in converters for the standard wire shapes.
pub mod defaults;

/// Converter registration, scoping, and precedence resolution.
pub mod registry;

use crate::error::Result;
use crate::token::{RawType, TypeToken};
use crate::value::AttributeValue;

use std::any::Any;

/// A bidirectional mapping between one application type and
/// [`AttributeValue`].
///
/// `token` declares the exact type descriptor the converter serves; the
/// registry keys exact lookups on it. Converters are pure: both directions
/// are deterministic functions of their input.
pub trait Converter<T>: Send + Sync {
    /// The type descriptor this converter is registered under.
    fn token(&self) -> TypeToken;

    /// Serializes an application value into an attribute value.
    fn to_attribute_value(&self, value: &T) -> Result<AttributeValue>;

    /// Deserializes an attribute value back into an application value.
    fn from_attribute_value(&self, value: AttributeValue) -> Result<T>;
}

/// A converter covering a family of types rather than one exact descriptor.
///
/// The family is selected by raw shape: a polymorphic converter declaring
/// `Some(raw)` matches every parameterization of that raw type, and one
/// declaring `None` is a catch-all matching any requested type. Application
/// values cross this boundary type-erased; implementations downcast and fail
/// with a typed error on a mismatch.
pub trait PolymorphicConverter: Send + Sync {
    /// The raw shape this converter covers, or `None` for a catch-all.
    fn raw_type(&self) -> Option<RawType>;

    /// Serializes a type-erased application value into an attribute value.
    fn to_attribute_value(&self, value: &dyn Any) -> Result<AttributeValue>;

    /// Deserializes an attribute value into a type-erased application value.
    ///
    /// `token` is the full descriptor the caller requested, so an
    /// implementation can recurse into type arguments.
    fn from_attribute_value(&self, value: AttributeValue, token: &TypeToken)
    -> Result<Box<dyn Any>>;
}
