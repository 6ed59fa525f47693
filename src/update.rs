//! Update-expression aggregation and compilation.
//!
//! An [`UpdateExpression`] accumulates typed mutation intents (SET, REMOVE,
//! ADD, DELETE) and compiles them into one conflict-checked
//! [`Expression`]: the clause strings joined in wire order plus the merged
//! name and value placeholder tables.

/// The SET / REMOVE / ADD / DELETE action value objects.
pub mod action;

use crate::error::{Error, Result};
use crate::expression::Expression;
use crate::update::action::{AddAction, DeleteAction, RemoveAction, SetAction, UpdateAction};
use crate::value::AttributeValue;

use indexmap::IndexMap;
use std::collections;

/// Separator between action fragments of the same clause.
const ACTION_SEPARATOR: &str = ", ";

/// Separator between clauses of the final expression.
const CLAUSE_SEPARATOR: &str = " ";

/// The accumulated update actions for one update call.
///
/// Build it with struct-literal syntax or the chainable `add_*` methods, then
/// compile it once with [`UpdateExpression::to_expression`] (or `try_into`).
/// Validation happens at compile time, not at accumulation time: the same
/// attribute must not be the target of more than one action across all four
/// sets. Two expressions can be combined with [`UpdateExpression::merge`]
/// before compilation; compiled [`Expression`]s are terminal and cannot be
/// recombined.
///
/// The builder-style methods mutate owned state and are single-threaded;
/// compilation itself is a pure function, so independent expressions may be
/// compiled concurrently.
///
/// ```rust
/// use dynamodb_mapper::update::UpdateExpression;
/// use dynamodb_mapper::update::action::{RemoveAction, SetAction, WriteBehavior};
/// use dynamodb_mapper::value::AttributeValue;
///
/// let update = UpdateExpression::new()
///     .add_set_action(SetAction::new(
///         "count",
///         AttributeValue::number("5").unwrap(),
///         WriteBehavior::AlwaysOverwrite,
///     ))
///     .add_remove_action(RemoveAction::new("stale"));
/// let expression = update.to_expression().unwrap();
/// assert_eq!(
///     expression.expression,
///     "REMOVE #AMZN_MAPPED_stale SET #AMZN_MAPPED_count = :AMZN_MAPPED_count",
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateExpression {
    /// REMOVE actions.
    pub remove_actions: Vec<RemoveAction>,
    /// SET actions.
    pub set_actions: Vec<SetAction>,
    /// DELETE actions.
    pub delete_actions: Vec<DeleteAction>,
    /// ADD actions.
    pub add_actions: Vec<AddAction>,
}

impl UpdateExpression {
    /// An empty update expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a REMOVE action.
    pub fn add_remove_action(mut self, action: RemoveAction) -> Self {
        self.remove_actions.push(action);
        self
    }

    /// Appends a SET action.
    pub fn add_set_action(mut self, action: SetAction) -> Self {
        self.set_actions.push(action);
        self
    }

    /// Appends a DELETE action.
    pub fn add_delete_action(mut self, action: DeleteAction) -> Self {
        self.delete_actions.push(action);
        self
    }

    /// Appends an ADD action.
    pub fn add_add_action(mut self, action: AddAction) -> Self {
        self.add_actions.push(action);
        self
    }

    /// Combines two update expressions before compilation.
    ///
    /// The action sets are concatenated; any conflict between them surfaces
    /// when the combined expression is compiled.
    pub fn merge(mut self, other: UpdateExpression) -> Self {
        self.remove_actions.extend(other.remove_actions);
        self.set_actions.extend(other.set_actions);
        self.delete_actions.extend(other.delete_actions);
        self.add_actions.extend(other.add_actions);
        self
    }

    /// Compiles the accumulated actions into a single expression.
    ///
    /// Clauses appear in the fixed order REMOVE, SET, DELETE, ADD. Fails
    /// with an attribute-conflict error when one attribute is targeted by
    /// more than one action, and with a placeholder-collision error when one
    /// placeholder token would carry two different bindings. Both are caller
    /// configuration errors and are never retried.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.compile_update_expression", err)
    )]
    pub fn to_expression(self) -> Result<Expression> {
        let mut compiler = Compiler::default();
        compiler.compile_clause("REMOVE", &self.remove_actions)?;
        compiler.compile_clause("SET", &self.set_actions)?;
        compiler.compile_clause("DELETE", &self.delete_actions)?;
        compiler.compile_clause("ADD", &self.add_actions)?;
        Ok(Expression {
            expression: compiler.clauses.join(CLAUSE_SEPARATOR),
            expression_attribute_names: compiler.expression_attribute_names,
            expression_attribute_values: compiler.expression_attribute_values,
        })
    }
}

impl TryFrom<UpdateExpression> for Expression {
    type Error = Error;

    fn try_from(update_expression: UpdateExpression) -> Result<Self> {
        update_expression.to_expression()
    }
}

/// Single-pass accumulation state for one compilation.
#[derive(Default)]
struct Compiler {
    clauses: Vec<String>,
    targeted_attributes: collections::HashSet<String>,
    expression_attribute_names: IndexMap<String, String>,
    expression_attribute_values: IndexMap<String, AttributeValue>,
}

impl Compiler {
    fn compile_clause<A: UpdateAction>(&mut self, keyword: &str, actions: &[A]) -> Result<()> {
        if actions.is_empty() {
            return Ok(());
        }
        let mut fragments = Vec::with_capacity(actions.len());
        for action in actions {
            self.merge_action(action)?;
            fragments.push(action.action_expression());
        }
        self.clauses
            .push(format!("{keyword} {}", fragments.join(ACTION_SEPARATOR)));
        Ok(())
    }

    fn merge_action<A: UpdateAction>(&mut self, action: &A) -> Result<()> {
        if !self
            .targeted_attributes
            .insert(action.attribute_name().to_string())
        {
            return Err(Error::UpdateConflict {
                attribute: action.attribute_name().to_string(),
            });
        }
        for (placeholder, attribute_name) in action.expression_names() {
            match self.expression_attribute_names.get(placeholder) {
                Some(existing) if existing != attribute_name => {
                    return Err(Error::PlaceholderCollision {
                        placeholder: placeholder.clone(),
                    });
                }
                _ => {
                    self.expression_attribute_names
                        .insert(placeholder.clone(), attribute_name.clone());
                }
            }
        }
        for (placeholder, value) in action.expression_values() {
            match self.expression_attribute_values.get(placeholder) {
                Some(existing) if existing != value => {
                    return Err(Error::PlaceholderCollision {
                        placeholder: placeholder.clone(),
                    });
                }
                _ => {
                    self.expression_attribute_values
                        .insert(placeholder.clone(), value.clone());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::update::action::WriteBehavior;

    use rstest::rstest;

    #[rstest]
    #[case::set_only(
        UpdateExpression::new().add_set_action(SetAction::new(
            "name",
            AttributeValue::string("Jane"),
            WriteBehavior::AlwaysOverwrite,
        )),
        Expression {
            expression: "SET #AMZN_MAPPED_name = :AMZN_MAPPED_name".to_string(),
            expression_attribute_names: IndexMap::from([
                ("#AMZN_MAPPED_name".to_string(), "name".to_string()),
            ]),
            expression_attribute_values: IndexMap::from([
                (":AMZN_MAPPED_name".to_string(), AttributeValue::string("Jane")),
            ]),
        }
    )]
    #[case::set_if_not_exists(
        UpdateExpression::new().add_set_action(SetAction::new(
            "count",
            AttributeValue::number("0").unwrap(),
            WriteBehavior::WriteIfNotExists,
        )),
        Expression {
            expression:
                "SET #AMZN_MAPPED_count = if_not_exists(#AMZN_MAPPED_count, :AMZN_MAPPED_count)"
                    .to_string(),
            expression_attribute_names: IndexMap::from([
                ("#AMZN_MAPPED_count".to_string(), "count".to_string()),
            ]),
            expression_attribute_values: IndexMap::from([
                (
                    ":AMZN_MAPPED_count".to_string(),
                    AttributeValue::number("0").unwrap(),
                ),
            ]),
        }
    )]
    #[case::remove_multiple(
        UpdateExpression::new()
            .add_remove_action(RemoveAction::new("first"))
            .add_remove_action(RemoveAction::new("second")),
        Expression {
            expression: "REMOVE #AMZN_MAPPED_first, #AMZN_MAPPED_second".to_string(),
            expression_attribute_names: IndexMap::from([
                ("#AMZN_MAPPED_first".to_string(), "first".to_string()),
                ("#AMZN_MAPPED_second".to_string(), "second".to_string()),
            ]),
            ..Default::default()
        }
    )]
    #[case::remove_and_set(
        UpdateExpression::new()
            .add_set_action(SetAction::new(
                "count",
                AttributeValue::number("5").unwrap(),
                WriteBehavior::AlwaysOverwrite,
            ))
            .add_remove_action(RemoveAction::new("stale")),
        Expression {
            expression:
                "REMOVE #AMZN_MAPPED_stale SET #AMZN_MAPPED_count = :AMZN_MAPPED_count"
                    .to_string(),
            expression_attribute_names: IndexMap::from([
                ("#AMZN_MAPPED_stale".to_string(), "stale".to_string()),
                ("#AMZN_MAPPED_count".to_string(), "count".to_string()),
            ]),
            expression_attribute_values: IndexMap::from([
                (
                    ":AMZN_MAPPED_count".to_string(),
                    AttributeValue::number("5").unwrap(),
                ),
            ]),
        }
    )]
    #[case::all_four_clauses(
        UpdateExpression::new()
            .add_set_action(SetAction::new(
                "name",
                AttributeValue::string("Jane"),
                WriteBehavior::AlwaysOverwrite,
            ))
            .add_remove_action(RemoveAction::new("stale"))
            .add_delete_action(
                DeleteAction::new(
                    "tags",
                    AttributeValue::string_set(vec!["old".to_string()]).unwrap(),
                )
                .unwrap(),
            )
            .add_add_action(
                AddAction::new("tally", AttributeValue::number("1").unwrap()).unwrap(),
            ),
        Expression {
            expression: "REMOVE #AMZN_MAPPED_stale \
                SET #AMZN_MAPPED_name = :AMZN_MAPPED_name \
                DELETE #AMZN_MAPPED_tags :AMZN_MAPPED_tags \
                ADD #AMZN_MAPPED_tally :AMZN_MAPPED_tally"
                .to_string(),
            expression_attribute_names: IndexMap::from([
                ("#AMZN_MAPPED_stale".to_string(), "stale".to_string()),
                ("#AMZN_MAPPED_name".to_string(), "name".to_string()),
                ("#AMZN_MAPPED_tags".to_string(), "tags".to_string()),
                ("#AMZN_MAPPED_tally".to_string(), "tally".to_string()),
            ]),
            expression_attribute_values: IndexMap::from([
                (
                    ":AMZN_MAPPED_name".to_string(),
                    AttributeValue::string("Jane"),
                ),
                (
                    ":AMZN_MAPPED_tags".to_string(),
                    AttributeValue::string_set(vec!["old".to_string()]).unwrap(),
                ),
                (
                    ":AMZN_MAPPED_tally".to_string(),
                    AttributeValue::number("1").unwrap(),
                ),
            ]),
        }
    )]
    #[case::empty(
        UpdateExpression::new(),
        Expression::default()
    )]
    fn test_compile(#[case] update_expression: UpdateExpression, #[case] expected: Expression) {
        let actual: Expression = update_expression.try_into().unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_set_and_remove_on_same_attribute_conflict() {
        let update = UpdateExpression::new()
            .add_set_action(SetAction::new(
                "x",
                AttributeValue::string("v1"),
                WriteBehavior::AlwaysOverwrite,
            ))
            .add_remove_action(RemoveAction::new("x"));
        let error = update.to_expression().unwrap_err();
        assert!(matches!(
            error,
            Error::UpdateConflict { ref attribute } if attribute == "x"
        ));
    }

    #[test]
    fn test_two_set_actions_on_same_attribute_conflict() {
        let update = UpdateExpression::new()
            .add_set_action(SetAction::new(
                "x",
                AttributeValue::string("v1"),
                WriteBehavior::AlwaysOverwrite,
            ))
            .add_set_action(SetAction::new(
                "x",
                AttributeValue::string("v2"),
                WriteBehavior::AlwaysOverwrite,
            ));
        let error = update.to_expression().unwrap_err();
        assert!(matches!(
            error,
            Error::UpdateConflict { ref attribute } if attribute == "x"
        ));
    }

    #[test]
    fn test_distinct_attributes_with_colliding_tokens_rejected() {
        // "a.b" and "a-b" clean to the same placeholder but name different
        // attributes.
        let update = UpdateExpression::new()
            .add_remove_action(RemoveAction::new("a.b"))
            .add_remove_action(RemoveAction::new("a-b"));
        let error = update.to_expression().unwrap_err();
        assert!(matches!(
            error,
            Error::PlaceholderCollision { ref placeholder }
                if placeholder == "#AMZN_MAPPED_a_b"
        ));
    }

    #[test]
    fn test_merge_combines_action_sets() {
        let first = UpdateExpression::new().add_remove_action(RemoveAction::new("stale"));
        let second = UpdateExpression::new().add_set_action(SetAction::new(
            "count",
            AttributeValue::number("5").unwrap(),
            WriteBehavior::AlwaysOverwrite,
        ));
        let expression = first.merge(second).to_expression().unwrap();
        assert_eq!(
            expression.expression,
            "REMOVE #AMZN_MAPPED_stale SET #AMZN_MAPPED_count = :AMZN_MAPPED_count",
        );
    }

    #[test]
    fn test_merge_surfaces_cross_expression_conflicts_at_compile() {
        let first = UpdateExpression::new().add_remove_action(RemoveAction::new("x"));
        let second = UpdateExpression::new().add_add_action(
            AddAction::new("x", AttributeValue::number("1").unwrap()).unwrap(),
        );
        let error = first.merge(second).to_expression().unwrap_err();
        assert!(matches!(
            error,
            Error::UpdateConflict { ref attribute } if attribute == "x"
        ));
    }
}
