#![deny(missing_docs)]
#![deny(warnings)]

//! # DynamoDB Mapper
//!
//! An attribute-value conversion and update-expression engine for Amazon
//! DynamoDB mappers.
//!
//! ## Overview
//!
//! This library is the core a table-level CRUD layer builds on:
//! - A closed [`value::AttributeValue`] tagged union covering every value
//!   shape DynamoDB accepts, traversed exhaustively through
//!   [`value::visitor::ValueVisitor`]
//! - Reified [`token::TypeToken`] descriptors keying converter lookups on
//!   exact generic shape
//! - A [`convert::registry::ConverterRegistry`] resolving a converter across
//!   call, client, and default scopes with deterministic precedence
//! - An [`update::UpdateExpression`] compiler turning SET / REMOVE / ADD /
//!   DELETE intents into one conflict-checked expression string plus its
//!   name and value placeholder tables
//!
//! ## Quick Example
//!
//! Instead of manually building DynamoDB expression strings and managing
//! placeholders, accumulate typed actions and compile them once:
//!
//! ```rust
//! use dynamodb_mapper::convert::registry::ConverterRegistry;
//! use dynamodb_mapper::token::TypeToken;
//! use dynamodb_mapper::update::UpdateExpression;
//! use dynamodb_mapper::update::action::{RemoveAction, SetAction, WriteBehavior};
//!
//! # fn example() -> dynamodb_mapper::error::Result<()> {
//! // Resolve a converter for the application type and serialize the value.
//! let registry = ConverterRegistry::with_defaults().build();
//! let converter = registry.resolve(&TypeToken::of::<i64>())?;
//! let count = converter.to_attribute_value(&5_i64)?;
//!
//! // Accumulate typed actions and compile - no expression strings needed!
//! let update = UpdateExpression::new()
//!     .add_set_action(SetAction::new("count", count, WriteBehavior::AlwaysOverwrite))
//!     .add_remove_action(RemoveAction::new("stale"));
//! let expression = update.to_expression()?;
//! assert_eq!(
//!     expression.expression,
//!     "REMOVE #AMZN_MAPPED_stale SET #AMZN_MAPPED_count = :AMZN_MAPPED_count",
//! );
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`mod@value`] - The attribute-value tagged union and its visitor
//! - [`mod@token`] - Reified type descriptors used as registry keys
//! - [`mod@convert`] - Converter traits, registry, and built-in converters
//! - [`mod@update`] - Update actions and the expression compiler
//! - [`mod@expression`] - Placeholder tokens and the compiled expression form
//! - [`mod@error`] - The error taxonomy shared by all of the above

/// Converter traits, scoped registration, and precedence resolution.
pub mod convert;

/// Error types for conversion and expression building.
pub mod error;

/// Placeholder tokens and the compiled expression form.
pub mod expression;

/// Reified type descriptors used as converter registry keys.
pub mod token;

/// Update actions and the update-expression compiler.
pub mod update;

/// The attribute-value model and its visitor.
pub mod value;
