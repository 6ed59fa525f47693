use crate::error::{Error, Result};
use crate::expression;
use crate::value::AttributeValue;

use indexmap::IndexMap;

/// How a SET action treats an existing attribute.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum WriteBehavior {
    /// Overwrite any existing value.
    #[default]
    AlwaysOverwrite,
    /// Assign the value only if the attribute does not already exist.
    WriteIfNotExists,
}

/// One atomic mutation intent against a single attribute.
///
/// Every action produces only its own expression fragment plus the name and
/// value placeholders that fragment references; joining fragments with the
/// clause separator and prefixing the clause keyword is the compiler's job.
/// Placeholders are derived deterministically from the attribute name, so
/// identical attributes produce identical tokens across actions and
/// collisions become detectable at compile time.
pub trait UpdateAction {
    /// The real name of the attribute this action mutates.
    fn attribute_name(&self) -> &str;

    /// This action's own expression fragment.
    fn action_expression(&self) -> &str;

    /// Name placeholders referenced by the fragment.
    fn expression_names(&self) -> &IndexMap<String, String>;

    /// Value placeholders referenced by the fragment (empty for REMOVE).
    fn expression_values(&self) -> &IndexMap<String, AttributeValue>;
}

/// Assigns a value to an attribute.
///
/// ```rust
/// use dynamodb_mapper::update::action::{SetAction, UpdateAction, WriteBehavior};
/// use dynamodb_mapper::value::AttributeValue;
///
/// let action = SetAction::new(
///     "count",
///     AttributeValue::number("5").unwrap(),
///     WriteBehavior::AlwaysOverwrite,
/// );
/// assert_eq!(
///     action.action_expression(),
///     "#AMZN_MAPPED_count = :AMZN_MAPPED_count",
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SetAction {
    attribute_name: String,
    action_expression: String,
    expression_names: IndexMap<String, String>,
    expression_values: IndexMap<String, AttributeValue>,
}

impl SetAction {
    /// A SET action for `attribute_name`.
    pub fn new(
        attribute_name: impl Into<String>,
        value: AttributeValue,
        behavior: WriteBehavior,
    ) -> Self {
        let attribute_name = attribute_name.into();
        let name = expression::name_token(&attribute_name);
        let value_placeholder = expression::value_token(&attribute_name);
        let action_expression = match behavior {
            WriteBehavior::AlwaysOverwrite => format!("{name} = {value_placeholder}"),
            WriteBehavior::WriteIfNotExists => {
                format!("{name} = if_not_exists({name}, {value_placeholder})")
            }
        };
        Self {
            expression_names: IndexMap::from([(name, attribute_name.clone())]),
            expression_values: IndexMap::from([(value_placeholder, value)]),
            attribute_name,
            action_expression,
        }
    }
}

impl UpdateAction for SetAction {
    fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    fn action_expression(&self) -> &str {
        &self.action_expression
    }

    fn expression_names(&self) -> &IndexMap<String, String> {
        &self.expression_names
    }

    fn expression_values(&self) -> &IndexMap<String, AttributeValue> {
        &self.expression_values
    }
}

/// Removes an attribute from the item.
#[derive(Clone, Debug, PartialEq)]
pub struct RemoveAction {
    attribute_name: String,
    action_expression: String,
    expression_names: IndexMap<String, String>,
    expression_values: IndexMap<String, AttributeValue>,
}

impl RemoveAction {
    /// A REMOVE action for `attribute_name`.
    pub fn new(attribute_name: impl Into<String>) -> Self {
        let attribute_name = attribute_name.into();
        let name = expression::name_token(&attribute_name);
        Self {
            action_expression: name.clone(),
            expression_names: IndexMap::from([(name, attribute_name.clone())]),
            expression_values: IndexMap::new(),
            attribute_name,
        }
    }
}

impl UpdateAction for RemoveAction {
    fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    fn action_expression(&self) -> &str {
        &self.action_expression
    }

    fn expression_names(&self) -> &IndexMap<String, String> {
        &self.expression_names
    }

    fn expression_values(&self) -> &IndexMap<String, AttributeValue> {
        &self.expression_values
    }
}

/// Adds a numeric delta to an attribute, or unions elements into a stored
/// set.
#[derive(Clone, Debug, PartialEq)]
pub struct AddAction {
    attribute_name: String,
    action_expression: String,
    expression_names: IndexMap<String, String>,
    expression_values: IndexMap<String, AttributeValue>,
}

impl AddAction {
    /// An ADD action for `attribute_name`; `delta` must be a number or a
    /// set.
    pub fn new(attribute_name: impl Into<String>, delta: AttributeValue) -> Result<Self> {
        let attribute_name = attribute_name.into();
        if !delta.is_n() && !delta.is_set() {
            return Err(Error::MalformedValue {
                type_descriptor: delta.type_descriptor(),
                message: format!(
                    "ADD delta for attribute '{attribute_name}' must be a number or a set"
                ),
            });
        }
        let name = expression::name_token(&attribute_name);
        let value_placeholder = expression::value_token(&attribute_name);
        Ok(Self {
            action_expression: format!("{name} {value_placeholder}"),
            expression_names: IndexMap::from([(name, attribute_name.clone())]),
            expression_values: IndexMap::from([(value_placeholder, delta)]),
            attribute_name,
        })
    }
}

impl UpdateAction for AddAction {
    fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    fn action_expression(&self) -> &str {
        &self.action_expression
    }

    fn expression_names(&self) -> &IndexMap<String, String> {
        &self.expression_names
    }

    fn expression_values(&self) -> &IndexMap<String, AttributeValue> {
        &self.expression_values
    }
}

/// Deletes elements from a stored set attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct DeleteAction {
    attribute_name: String,
    action_expression: String,
    expression_names: IndexMap<String, String>,
    expression_values: IndexMap<String, AttributeValue>,
}

impl DeleteAction {
    /// A DELETE action for `attribute_name`; `elements` must be a set.
    pub fn new(attribute_name: impl Into<String>, elements: AttributeValue) -> Result<Self> {
        let attribute_name = attribute_name.into();
        if !elements.is_set() {
            return Err(Error::MalformedValue {
                type_descriptor: elements.type_descriptor(),
                message: format!(
                    "DELETE elements for attribute '{attribute_name}' must be a set"
                ),
            });
        }
        let name = expression::name_token(&attribute_name);
        let value_placeholder = expression::value_token(&attribute_name);
        Ok(Self {
            action_expression: format!("{name} {value_placeholder}"),
            expression_names: IndexMap::from([(name, attribute_name.clone())]),
            expression_values: IndexMap::from([(value_placeholder, elements)]),
            attribute_name,
        })
    }
}

impl UpdateAction for DeleteAction {
    fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    fn action_expression(&self) -> &str {
        &self.action_expression
    }

    fn expression_names(&self) -> &IndexMap<String, String> {
        &self.expression_names
    }

    fn expression_values(&self) -> &IndexMap<String, AttributeValue> {
        &self.expression_values
    }
}
