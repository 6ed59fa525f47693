//! Error types for conversion and expression building.
//!
//! Every error here is deterministic and input-dependent: it is raised at the
//! call that detects it (token construction, converter resolution, action
//! construction, expression compilation) and identifies the offending type or
//! attribute name. The crate never recovers internally; recovery belongs to
//! the caller.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error raised by conversion and expression building.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A type descriptor was constructed with an unsupported shape.
    #[error("unsupported type shape for '{type_name}': {reason}")]
    UnsupportedType {
        /// The name of the offending type.
        type_name: String,
        /// Why the shape cannot be used as a registry key.
        reason: String,
    },

    /// No converter is registered for the requested type in any scope.
    #[error("no converter registered for type '{type_name}'")]
    ConverterNotFound {
        /// The rendered type descriptor that failed to resolve.
        type_name: String,
    },

    /// A visitor received a value shape it does not handle.
    #[error(
        "attribute value of type '{type_descriptor}' cannot be converted{}",
        converter_suffix(.converter)
    )]
    UnconvertedValue {
        /// The wire tag of the unhandled variant.
        type_descriptor: &'static str,
        /// The converter that invoked the visitor, when known.
        converter: Option<String>,
    },

    /// A resolved converter was used with a value of the wrong concrete type.
    #[error("value does not have the expected type '{expected}'")]
    ValueMismatch {
        /// The concrete type the converter expected.
        expected: String,
    },

    /// An attribute value was constructed with an ill-formed payload.
    #[error("malformed '{type_descriptor}' value: {message}")]
    MalformedValue {
        /// The wire tag of the variant being constructed.
        type_descriptor: &'static str,
        /// Why the payload is rejected.
        message: String,
    },

    /// Two update actions target the same attribute in one expression.
    #[error("conflicting update actions target attribute '{attribute}'")]
    UpdateConflict {
        /// The attribute targeted more than once.
        attribute: String,
    },

    /// One placeholder token was bound to two different names or values.
    #[error("placeholder '{placeholder}' is bound to conflicting definitions")]
    PlaceholderCollision {
        /// The colliding placeholder token.
        placeholder: String,
    },
}

fn converter_suffix(converter: &Option<String>) -> String {
    match converter {
        Some(name) => format!(" by {name}"),
        None => String::new(),
    }
}

impl Error {
    /// Error for a value shape a visitor does not handle.
    pub(crate) fn unconverted(
        type_descriptor: &'static str,
        converter: Option<&str>,
    ) -> Self {
        Self::UnconvertedValue {
            type_descriptor,
            converter: converter.map(str::to_owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconverted_value_names_converter() {
        let error = Error::unconverted("SS", Some("I64Converter"));
        assert_eq!(
            error.to_string(),
            "attribute value of type 'SS' cannot be converted by I64Converter",
        );
    }

    #[test]
    fn test_unconverted_value_without_converter() {
        let error = Error::unconverted("M", None);
        assert_eq!(
            error.to_string(),
            "attribute value of type 'M' cannot be converted",
        );
    }

    #[test]
    fn test_update_conflict_names_attribute() {
        let error = Error::UpdateConflict {
            attribute: "x".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "conflicting update actions target attribute 'x'",
        );
    }
}
