//! Placeholder tokens and the compiled expression form.
//!
//! Attribute names may contain characters (or reserved words) that are not
//! legal directly inside an expression string, so expressions reference them
//! through synthetic placeholder tokens resolved by the name and value
//! tables attached to the request. Tokens are derived deterministically from
//! the attribute name: the same attribute always produces the same token.

use crate::value::AttributeValue;

use indexmap::IndexMap;

/// Prefix of every generated name placeholder.
const NAME_TOKEN_PREFIX: &str = "#AMZN_MAPPED_";

/// Prefix of every generated value placeholder.
const VALUE_TOKEN_PREFIX: &str = ":AMZN_MAPPED_";

/// Maps an attribute name onto characters legal in a placeholder identifier.
///
/// Every character that is not ASCII alphanumeric or `_` becomes `_`. The
/// mapping is total and deterministic, so repeated attributes produce
/// identical tokens across actions.
pub fn clean_attribute_name(attribute_name: &str) -> String {
    attribute_name
        .chars()
        .map(|character| {
            if character.is_ascii_alphanumeric() || character == '_' {
                character
            } else {
                '_'
            }
        })
        .collect()
}

/// The name placeholder for an attribute, e.g. `#AMZN_MAPPED_count`.
pub fn name_token(attribute_name: &str) -> String {
    format!("{NAME_TOKEN_PREFIX}{}", clean_attribute_name(attribute_name))
}

/// The value placeholder for an attribute, e.g. `:AMZN_MAPPED_count`.
pub fn value_token(attribute_name: &str) -> String {
    format!(
        "{VALUE_TOKEN_PREFIX}{}",
        clean_attribute_name(attribute_name)
    )
}

/// The name placeholder for one element of a list attribute,
/// e.g. `#AMZN_MAPPED_tags[3]`.
pub fn indexed_name_token(attribute_name: &str, index: usize) -> String {
    format!("{}[{index}]", name_token(attribute_name))
}

/// A compiled expression: the expression string plus the placeholder tables
/// it references.
///
/// This form is terminal. Recombining two compiled expressions is
/// unsupported because placeholder collisions cannot be re-validated once
/// the actions are collapsed into a flat string; merge at the
/// [`crate::update::UpdateExpression`] level instead.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Expression {
    /// The expression string with placeholder tokens substituted in.
    pub expression: String,
    /// Mapping from name placeholder to real attribute name.
    pub expression_attribute_names: IndexMap<String, String>,
    /// Mapping from value placeholder to attribute value.
    pub expression_attribute_values: IndexMap<String, AttributeValue>,
}
