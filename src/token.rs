//! Type descriptors used as converter registry keys.
//!
//! A [`TypeToken`] reifies a parameterized type as an explicit value: the raw
//! type identity plus an ordered sequence of argument tokens, recursively.
//! Converter lookups are keyed on this exact shape, so a converter registered
//! for "list of `i64`" is distinct from one registered for "list of `String`".

use crate::error::{Error, Result};

use std::{any, fmt};

/// Marker for the list container shape.
struct ListShape;

/// Marker for the set container shape.
struct SetShape;

/// Marker for the map container shape.
struct MapShape;

/// Identity of a non-parameterized type.
///
/// Two raw types are equal iff they identify the same Rust type; the captured
/// name is diagnostic only.
///
/// ```rust
/// use dynamodb_mapper::token;
///
/// assert_eq!(token::RawType::of::<i64>(), token::RawType::of::<i64>());
/// assert_ne!(token::RawType::of::<i64>(), token::RawType::of::<u64>());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct RawType {
    id: any::TypeId,
    name: &'static str,
}

impl RawType {
    /// The raw type identifying `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: any::TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    /// The reserved raw type for the list container shape.
    pub fn list() -> Self {
        Self {
            id: any::TypeId::of::<ListShape>(),
            name: "List",
        }
    }

    /// The reserved raw type for the set container shape.
    pub fn set() -> Self {
        Self {
            id: any::TypeId::of::<SetShape>(),
            name: "Set",
        }
    }

    /// The reserved raw type for the map container shape.
    pub fn map() -> Self {
        Self {
            id: any::TypeId::of::<MapShape>(),
            name: "Map",
        }
    }

    /// The diagnostic name of this raw type.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for RawType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RawType {}

impl std::hash::Hash for RawType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A reified type descriptor: raw type plus ordered type arguments.
///
/// Tokens are immutable, structurally comparable, and cheap to clone, so they
/// work as registry keys without interning.
///
/// ```rust
/// use dynamodb_mapper::token::TypeToken;
///
/// let token = TypeToken::list_of(TypeToken::of::<i64>());
/// assert_eq!(token, TypeToken::list_of(TypeToken::of::<i64>()));
/// assert_ne!(token, TypeToken::list_of(TypeToken::of::<String>()));
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TypeToken {
    raw: RawType,
    args: Vec<TypeToken>,
}

impl TypeToken {
    /// Token for the non-parameterized type `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            raw: RawType::of::<T>(),
            args: Vec::new(),
        }
    }

    /// Token for a list whose elements are described by `element`.
    pub fn list_of(element: TypeToken) -> Self {
        Self {
            raw: RawType::list(),
            args: vec![element],
        }
    }

    /// Token for a set whose elements are described by `element`.
    pub fn set_of(element: TypeToken) -> Self {
        Self {
            raw: RawType::set(),
            args: vec![element],
        }
    }

    /// Token for a map with the given key and value descriptors.
    pub fn map_of(key: TypeToken, value: TypeToken) -> Self {
        Self {
            raw: RawType::map(),
            args: vec![key, value],
        }
    }

    /// Token for an arbitrary parameterized shape.
    ///
    /// Fails when `args` is empty (a parameterized token must carry at least
    /// one argument; use [`TypeToken::of`] for leaves) or when `raw` is one of
    /// the reserved container shapes with the wrong arity.
    pub fn parameterized(raw: RawType, args: Vec<TypeToken>) -> Result<Self> {
        if args.is_empty() {
            return Err(Error::UnsupportedType {
                type_name: raw.name().to_string(),
                reason: "parameterized token requires at least one type argument".to_string(),
            });
        }
        let expected = if raw == RawType::list() || raw == RawType::set() {
            Some(1)
        } else if raw == RawType::map() {
            Some(2)
        } else {
            None
        };
        if let Some(expected) = expected
            && args.len() != expected
        {
            return Err(Error::UnsupportedType {
                type_name: raw.name().to_string(),
                reason: format!(
                    "expected {} type argument(s), got {}",
                    expected,
                    args.len()
                ),
            });
        }
        Ok(Self { raw, args })
    }

    /// The raw type of this token.
    pub fn raw_type(&self) -> RawType {
        self.raw
    }

    /// The ordered type arguments of this token (empty for leaves).
    pub fn type_arguments(&self) -> &[TypeToken] {
        &self.args
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw.name())?;
        if let Some((first, rest)) = self.args.split_first() {
            write!(f, "<{first}")?;
            for arg in rest {
                write!(f, ", {arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}
