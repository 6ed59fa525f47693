use crate::convert::{Converter, PolymorphicConverter, defaults};
use crate::error::{Error, Result};
use crate::token::TypeToken;
use crate::value::AttributeValue;

use std::any::{self, Any};
use std::fmt;
use std::sync::Arc;

/// The configuration level at which a converter is registered.
///
/// Scopes form a fixed priority order: call-scoped converters shadow
/// client-scoped ones, which shadow the defaults. Within one scope, exact
/// converters are preferred over polymorphic ones, and within the same kind
/// the most recently registered converter wins, mirroring "last
/// configuration wins" semantics without mutation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scope {
    /// Registered for a single request.
    Call,
    /// Registered on a client instance.
    Client,
    /// Registered as a library-wide default.
    Default,
}

type ToAttributeValue = Box<dyn Fn(&dyn Any) -> Result<AttributeValue> + Send + Sync>;
type FromAttributeValue = Box<dyn Fn(AttributeValue) -> Result<Box<dyn Any>> + Send + Sync>;

/// A type-erased exact-type converter entry.
struct ExactEntry {
    token: TypeToken,
    to_attribute_value: ToAttributeValue,
    from_attribute_value: FromAttributeValue,
}

/// Insertion-ordered converter lists for one scope.
#[derive(Default)]
struct ScopeEntries {
    exact: Vec<ExactEntry>,
    polymorphic: Vec<Arc<dyn PolymorphicConverter>>,
}

/// Builds a [`ConverterRegistry`].
///
/// The builder is the only mutable phase of a registry's life. It is a
/// single-writer, single-threaded object: registering converters from
/// multiple threads concurrently is a precondition violation. `build`
/// freezes the accumulated entries into an immutable registry.
#[derive(Default)]
pub struct ConverterRegistryBuilder {
    call: ScopeEntries,
    client: ScopeEntries,
    default: ScopeEntries,
}

impl ConverterRegistryBuilder {
    /// Registers an exact-type converter at the given scope.
    pub fn exact<T, C>(mut self, scope: Scope, converter: C) -> Self
    where
        T: 'static,
        C: Converter<T> + 'static,
    {
        let converter = Arc::new(converter);
        let token = converter.token();
        let to_converter = Arc::clone(&converter);
        let to_attribute_value: ToAttributeValue = Box::new(move |value: &dyn Any| {
            let value = value.downcast_ref::<T>().ok_or_else(|| Error::ValueMismatch {
                expected: any::type_name::<T>().to_string(),
            })?;
            to_converter.to_attribute_value(value)
        });
        let from_attribute_value: FromAttributeValue =
            Box::new(move |value: AttributeValue| {
                converter
                    .from_attribute_value(value)
                    .map(|value| Box::new(value) as Box<dyn Any>)
            });
        self.scope_mut(scope).exact.push(ExactEntry {
            token,
            to_attribute_value,
            from_attribute_value,
        });
        self
    }

    /// Registers a polymorphic converter at the given scope.
    pub fn polymorphic(
        mut self,
        scope: Scope,
        converter: impl PolymorphicConverter + 'static,
    ) -> Self {
        self.scope_mut(scope).polymorphic.push(Arc::new(converter));
        self
    }

    /// Freezes the accumulated entries into an immutable registry.
    pub fn build(self) -> ConverterRegistry {
        ConverterRegistry {
            call: self.call,
            client: self.client,
            default: self.default,
        }
    }

    fn scope_mut(&mut self, scope: Scope) -> &mut ScopeEntries {
        match scope {
            Scope::Call => &mut self.call,
            Scope::Client => &mut self.client,
            Scope::Default => &mut self.default,
        }
    }
}

impl fmt::Debug for ConverterRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistryBuilder")
            .field("call", &entry_counts(&self.call))
            .field("client", &entry_counts(&self.client))
            .field("default", &entry_counts(&self.default))
            .finish()
    }
}

/// An immutable registry of converters across the three scopes.
///
/// Once built, a registry is a frozen snapshot: `resolve` is a pure function
/// over the entry lists and is safe for unlimited concurrent use without
/// locking.
///
/// ```rust
/// use dynamodb_mapper::convert::registry::ConverterRegistry;
/// use dynamodb_mapper::token::TypeToken;
///
/// let registry = ConverterRegistry::with_defaults().build();
/// let converter = registry.resolve(&TypeToken::of::<i64>()).unwrap();
/// let value = converter.to_attribute_value(&5_i64).unwrap();
/// assert_eq!(value.as_n(), Some("5"));
/// ```
pub struct ConverterRegistry {
    call: ScopeEntries,
    client: ScopeEntries,
    default: ScopeEntries,
}

impl ConverterRegistry {
    /// An empty registry builder.
    pub fn builder() -> ConverterRegistryBuilder {
        ConverterRegistryBuilder::default()
    }

    /// A registry builder pre-populated with the built-in converters at
    /// default scope.
    pub fn with_defaults() -> ConverterRegistryBuilder {
        ConverterRegistryBuilder::default()
            .exact(Scope::Default, defaults::StringConverter)
            .exact(Scope::Default, defaults::I64Converter)
            .exact(Scope::Default, defaults::F64Converter)
            .exact(Scope::Default, defaults::BoolConverter)
            .exact(Scope::Default, defaults::BinaryConverter)
            .exact(Scope::Default, defaults::NullConverter)
            .exact(Scope::Default, defaults::StringSetConverter)
            .exact(Scope::Default, defaults::NumberSetConverter)
            .exact(Scope::Default, defaults::BinarySetConverter)
    }

    /// Resolves the converter for `token`.
    ///
    /// Scopes are walked call, client, default; within each scope, exact
    /// entries are scanned most-recently-registered first, then polymorphic
    /// entries most-recently-registered first, keeping the first whose raw
    /// shape matches or which is a catch-all. Recency beats declaration
    /// specificity within the polymorphic kind. Fails when no scope yields a
    /// match.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_mapper.resolve", skip(self), err)
    )]
    pub fn resolve(&self, token: &TypeToken) -> Result<ResolvedConverter<'_>> {
        for scope in [&self.call, &self.client, &self.default] {
            for entry in scope.exact.iter().rev() {
                if entry.token == *token {
                    return Ok(ResolvedConverter {
                        kind: ResolvedKind::Exact(entry),
                        token: token.clone(),
                    });
                }
            }
            for converter in scope.polymorphic.iter().rev() {
                let matches = match converter.raw_type() {
                    Some(raw) => raw == token.raw_type(),
                    None => true,
                };
                if matches {
                    return Ok(ResolvedConverter {
                        kind: ResolvedKind::Polymorphic(converter),
                        token: token.clone(),
                    });
                }
            }
        }
        Err(Error::ConverterNotFound {
            type_name: token.to_string(),
        })
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("call", &entry_counts(&self.call))
            .field("client", &entry_counts(&self.client))
            .field("default", &entry_counts(&self.default))
            .finish()
    }
}

fn entry_counts(entries: &ScopeEntries) -> (usize, usize) {
    (entries.exact.len(), entries.polymorphic.len())
}

enum ResolvedKind<'a> {
    Exact(&'a ExactEntry),
    Polymorphic(&'a Arc<dyn PolymorphicConverter>),
}

/// A converter resolved for one requested type.
///
/// Values cross the erased registry boundary through these typed methods,
/// which fail with a typed error when the concrete type does not match the
/// converter's expectation.
pub struct ResolvedConverter<'a> {
    kind: ResolvedKind<'a>,
    token: TypeToken,
}

impl ResolvedConverter<'_> {
    /// Serializes an application value through the resolved converter.
    pub fn to_attribute_value<T: 'static>(&self, value: &T) -> Result<AttributeValue> {
        match &self.kind {
            ResolvedKind::Exact(entry) => (entry.to_attribute_value)(value),
            ResolvedKind::Polymorphic(converter) => converter.to_attribute_value(value),
        }
    }

    /// Deserializes an attribute value through the resolved converter.
    pub fn from_attribute_value<T: 'static>(&self, value: AttributeValue) -> Result<T> {
        let converted = match &self.kind {
            ResolvedKind::Exact(entry) => (entry.from_attribute_value)(value)?,
            ResolvedKind::Polymorphic(converter) => {
                converter.from_attribute_value(value, &self.token)?
            }
        };
        converted
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| Error::ValueMismatch {
                expected: any::type_name::<T>().to_string(),
            })
    }
}

impl fmt::Debug for ResolvedConverter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConverter")
            .field("token", &self.token)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::token::RawType;

    /// Exact converter prefixing strings, to make resolution observable.
    struct TaggedStringConverter(&'static str);

    impl Converter<String> for TaggedStringConverter {
        fn token(&self) -> TypeToken {
            TypeToken::of::<String>()
        }

        fn to_attribute_value(&self, value: &String) -> Result<AttributeValue> {
            Ok(AttributeValue::string(format!("{}:{value}", self.0)))
        }

        fn from_attribute_value(&self, value: AttributeValue) -> Result<String> {
            defaults::StringConverter.from_attribute_value(value)
        }
    }

    /// Polymorphic converter stamping its tag, optionally scoped to a raw.
    struct TaggedPolymorphicConverter {
        tag: &'static str,
        raw: Option<RawType>,
    }

    impl PolymorphicConverter for TaggedPolymorphicConverter {
        fn raw_type(&self) -> Option<RawType> {
            self.raw
        }

        fn to_attribute_value(&self, _value: &dyn Any) -> Result<AttributeValue> {
            Ok(AttributeValue::string(self.tag))
        }

        fn from_attribute_value(
            &self,
            _value: AttributeValue,
            _token: &TypeToken,
        ) -> Result<Box<dyn Any>> {
            Ok(Box::new(self.tag.to_string()))
        }
    }

    fn resolve_to_string(registry: &ConverterRegistry, token: &TypeToken) -> String {
        let converter = registry.resolve(token).unwrap();
        let value = converter
            .to_attribute_value(&"value".to_string())
            .unwrap();
        value.as_s().unwrap().to_string()
    }

    #[test]
    fn test_exact_beats_polymorphic_within_scope() {
        let registry = ConverterRegistry::builder()
            .polymorphic(
                Scope::Default,
                TaggedPolymorphicConverter {
                    tag: "catch-all",
                    raw: None,
                },
            )
            .exact(Scope::Default, TaggedStringConverter("exact"))
            .build();
        assert_eq!(
            resolve_to_string(&registry, &TypeToken::of::<String>()),
            "exact:value",
        );
    }

    #[test]
    fn test_higher_scope_beats_lower_scope_regardless_of_registration_order() {
        // The default-scope catch-all is registered after the client-scope
        // exact converter, but scope priority wins.
        let registry = ConverterRegistry::builder()
            .exact(Scope::Client, TaggedStringConverter("client"))
            .polymorphic(
                Scope::Default,
                TaggedPolymorphicConverter {
                    tag: "catch-all",
                    raw: None,
                },
            )
            .build();
        assert_eq!(
            resolve_to_string(&registry, &TypeToken::of::<String>()),
            "client:value",
        );
    }

    #[test]
    fn test_most_recently_registered_exact_wins() {
        let registry = ConverterRegistry::builder()
            .exact(Scope::Default, TaggedStringConverter("first"))
            .exact(Scope::Default, TaggedStringConverter("second"))
            .build();
        assert_eq!(
            resolve_to_string(&registry, &TypeToken::of::<String>()),
            "second:value",
        );
    }

    #[test]
    fn test_recency_beats_specificity_among_polymorphic() {
        // A broad catch-all registered last shadows the narrower raw-typed
        // converter registered earlier in the same scope.
        let registry = ConverterRegistry::builder()
            .polymorphic(
                Scope::Default,
                TaggedPolymorphicConverter {
                    tag: "narrow",
                    raw: Some(RawType::list()),
                },
            )
            .polymorphic(
                Scope::Default,
                TaggedPolymorphicConverter {
                    tag: "broad",
                    raw: None,
                },
            )
            .build();
        let converter = registry
            .resolve(&TypeToken::list_of(TypeToken::of::<i64>()))
            .unwrap();
        let value = converter.to_attribute_value(&Vec::<i64>::new()).unwrap();
        assert_eq!(value.as_s(), Some("broad"));
    }

    #[test]
    fn test_raw_scoped_polymorphic_skipped_for_other_raw() {
        let registry = ConverterRegistry::builder()
            .polymorphic(
                Scope::Default,
                TaggedPolymorphicConverter {
                    tag: "lists-only",
                    raw: Some(RawType::list()),
                },
            )
            .build();
        let result = registry.resolve(&TypeToken::of::<String>());
        assert!(matches!(result, Err(Error::ConverterNotFound { .. })));
    }

    #[test]
    fn test_no_converter_error_names_type() {
        let registry = ConverterRegistry::builder().build();
        let error = registry
            .resolve(&TypeToken::list_of(TypeToken::of::<bool>()))
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "no converter registered for type 'List<bool>'",
        );
    }

    #[test]
    fn test_resolved_converter_rejects_wrong_concrete_type() {
        let registry = ConverterRegistry::with_defaults().build();
        let converter = registry.resolve(&TypeToken::of::<String>()).unwrap();
        let result = converter.to_attribute_value(&5_i64);
        assert!(matches!(result, Err(Error::ValueMismatch { .. })));
    }

    #[test]
    fn test_registry_shared_across_threads() {
        let registry = std::sync::Arc::new(ConverterRegistry::with_defaults().build());
        let handles: Vec<_> = (0..4_i64)
            .map(|index| {
                let registry = std::sync::Arc::clone(&registry);
                std::thread::spawn(move || {
                    let converter = registry.resolve(&TypeToken::of::<i64>()).unwrap();
                    let value = converter.to_attribute_value(&index).unwrap();
                    value.as_n().unwrap().to_string()
                })
            })
            .collect();
        for (index, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), index.to_string());
        }
    }
}
