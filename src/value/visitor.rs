use crate::error::{Error, Result};
use crate::value::AttributeValue;

use bytes::Bytes;
use indexmap::IndexMap;

/// Dispatch contract over the [`AttributeValue`] tagged union.
///
/// [`AttributeValue::convert`] calls exactly one method per value, chosen by
/// the active variant. Implementors override only the variants they handle;
/// every other variant falls through to [`ValueVisitor::default_visit`],
/// which fails loudly naming the unhandled shape and, when
/// [`ValueVisitor::converter_name`] is provided, the converter that invoked
/// the visitor. This turns silent mis-conversions into diagnosable errors.
///
/// ```rust
/// use dynamodb_mapper::error::Result;
/// use dynamodb_mapper::value::AttributeValue;
/// use dynamodb_mapper::value::visitor::ValueVisitor;
///
/// struct Uppercase;
///
/// impl ValueVisitor for Uppercase {
///     type Output = String;
///
///     fn visit_s(&mut self, value: String) -> Result<String> {
///         Ok(value.to_uppercase())
///     }
/// }
///
/// let converted = AttributeValue::string("hello").convert(&mut Uppercase).unwrap();
/// assert_eq!(converted, "HELLO");
/// assert!(AttributeValue::boolean(true).convert(&mut Uppercase).is_err());
/// ```
pub trait ValueVisitor {
    /// The value produced by a successful visit.
    type Output;

    /// The converter on whose behalf this visitor runs, for diagnostics.
    fn converter_name(&self) -> Option<&str> {
        None
    }

    /// Fallback for variants the visitor does not implement.
    fn default_visit(&mut self, type_descriptor: &'static str) -> Result<Self::Output> {
        Err(Error::unconverted(type_descriptor, self.converter_name()))
    }

    /// Visits the null value.
    fn visit_null(&mut self) -> Result<Self::Output> {
        self.default_visit("NULL")
    }

    /// Visits a string value.
    fn visit_s(&mut self, _value: String) -> Result<Self::Output> {
        self.default_visit("S")
    }

    /// Visits a number value (decimal text).
    fn visit_n(&mut self, _value: String) -> Result<Self::Output> {
        self.default_visit("N")
    }

    /// Visits a boolean value.
    fn visit_bool(&mut self, _value: bool) -> Result<Self::Output> {
        self.default_visit("BOOL")
    }

    /// Visits a binary value.
    fn visit_b(&mut self, _value: Bytes) -> Result<Self::Output> {
        self.default_visit("B")
    }

    /// Visits a string set.
    fn visit_ss(&mut self, _values: Vec<String>) -> Result<Self::Output> {
        self.default_visit("SS")
    }

    /// Visits a number set.
    fn visit_ns(&mut self, _values: Vec<String>) -> Result<Self::Output> {
        self.default_visit("NS")
    }

    /// Visits a binary set.
    fn visit_bs(&mut self, _values: Vec<Bytes>) -> Result<Self::Output> {
        self.default_visit("BS")
    }

    /// Visits a list of attribute values.
    fn visit_l(&mut self, _values: Vec<AttributeValue>) -> Result<Self::Output> {
        self.default_visit("L")
    }

    /// Visits a map of attribute values.
    fn visit_m(&mut self, _values: IndexMap<String, AttributeValue>) -> Result<Self::Output> {
        self.default_visit("M")
    }
}
