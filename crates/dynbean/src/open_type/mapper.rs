// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Native type token to open type resolution.
//!
//! The mapper keeps a concurrent witness table keyed by `TypeId`. Scalars and
//! their `Option<_>` forms are present from the start; applications register
//! witnesses for their own types (typically a record type produced by a
//! `RecordWriter`).

use super::{OpenType, OpenTyped, OpenValue};
use crate::error::{Error, Result};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};
use std::time::SystemTime;

/// Runtime token for a native type.
#[derive(Clone, Copy)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    /// Token for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Native type name, as reported by `std::any::type_name`.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeToken({})", self.name)
    }
}

/// Resolved open type of a native type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    pub open_type: OpenType,
    /// Native type accepts null (`Option<T>`).
    pub nullable: bool,
    /// Native type name.
    pub original_type: String,
}

/// Resolves native type tokens to open types.
pub struct TypeMapper {
    witnesses: DashMap<TypeId, Witness>,
    erased: HashSet<TypeId>,
}

impl TypeMapper {
    /// Create a mapper pre-populated with every scalar witness.
    pub fn new() -> Self {
        let mapper = Self {
            witnesses: DashMap::new(),
            erased: [
                TypeId::of::<OpenValue>(),
                TypeId::of::<Option<OpenValue>>(),
                TypeId::of::<Box<dyn Any + Send + Sync>>(),
                TypeId::of::<Box<dyn Any>>(),
                TypeId::of::<Arc<dyn Any + Send + Sync>>(),
            ]
            .into_iter()
            .collect(),
        };
        mapper.add_typed::<bool>();
        mapper.add_typed::<char>();
        mapper.add_typed::<i8>();
        mapper.add_typed::<i16>();
        mapper.add_typed::<i32>();
        mapper.add_typed::<i64>();
        mapper.add_typed::<u8>();
        mapper.add_typed::<u16>();
        mapper.add_typed::<u32>();
        mapper.add_typed::<u64>();
        mapper.add_typed::<f32>();
        mapper.add_typed::<f64>();
        mapper.add_typed::<String>();
        mapper.add_typed::<&'static str>();
        mapper.add_typed::<SystemTime>();
        mapper.insert(TypeToken::of::<()>(), <()>::open_type(), false);
        mapper
    }

    /// Process-wide shared mapper.
    pub fn global() -> &'static TypeMapper {
        static GLOBAL: OnceLock<TypeMapper> = OnceLock::new();
        GLOBAL.get_or_init(TypeMapper::new)
    }

    fn add_typed<T: OpenTyped + 'static>(&self) {
        self.insert(TypeToken::of::<T>(), T::open_type(), false);
        self.insert(TypeToken::of::<Option<T>>(), T::open_type(), true);
    }

    fn insert(&self, token: TypeToken, open_type: OpenType, nullable: bool) {
        self.witnesses.insert(
            token.id(),
            Witness {
                open_type,
                nullable,
                original_type: token.name().to_string(),
            },
        );
    }

    /// Register a witness for `T` (and `Option<T>`, as nullable).
    ///
    /// A later registration for the same type replaces the earlier one.
    pub fn register<T: 'static>(&self, open_type: OpenType) {
        log::debug!(
            "[TypeMapper::register] {} -> {}",
            std::any::type_name::<T>(),
            open_type
        );
        self.insert(TypeToken::of::<T>(), open_type.clone(), false);
        self.insert(TypeToken::of::<Option<T>>(), open_type, true);
    }

    /// Resolve a token to its witness.
    ///
    /// # Errors
    ///
    /// `TypeInference` for erased markers (`OpenValue`, `Box<dyn Any>`),
    /// `UnsupportedType` when no witness exists.
    pub fn resolve(&self, token: &TypeToken) -> Result<Witness> {
        if self.erased.contains(&token.id()) {
            return Err(Error::TypeInference {
                type_name: token.name().to_string(),
            });
        }
        self.witnesses
            .get(&token.id())
            .map(|w| w.value().clone())
            .ok_or_else(|| Error::UnsupportedType {
                type_name: token.name().to_string(),
            })
    }

    /// Resolve the open type of `T`.
    pub fn infer<T: ?Sized + 'static>(&self) -> Result<OpenType> {
        self.resolve(&TypeToken::of::<T>()).map(|w| w.open_type)
    }

    /// Check if a witness exists for the token.
    pub fn contains(&self, token: &TypeToken) -> bool {
        self.witnesses.contains_key(&token.id())
    }

    /// Number of registered witnesses.
    pub fn len(&self) -> usize {
        self.witnesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.witnesses.is_empty()
    }
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMapper")
            .field("witnesses", &self.witnesses.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_type::{FieldType, RecordType};

    struct Point;

    #[test]
    fn scalars_are_prepopulated() {
        let mapper = TypeMapper::new();
        assert_eq!(mapper.infer::<i32>().ok(), Some(OpenType::I32));
        assert_eq!(mapper.infer::<&'static str>().ok(), Some(OpenType::STRING));
        assert_eq!(mapper.infer::<()>().ok(), Some(OpenType::VOID));

        let w = mapper
            .resolve(&TypeToken::of::<Option<i64>>())
            .expect("witness");
        assert_eq!(w.open_type, OpenType::I64);
        assert!(w.nullable);
    }

    #[test]
    fn erased_values_fail_inference() {
        let mapper = TypeMapper::new();
        assert!(matches!(
            mapper.infer::<OpenValue>(),
            Err(Error::TypeInference { .. })
        ));
        assert!(matches!(
            mapper.infer::<Box<dyn Any + Send + Sync>>(),
            Err(Error::TypeInference { .. })
        ));
    }

    #[test]
    fn unknown_types_are_unsupported() {
        let mapper = TypeMapper::new();
        assert!(matches!(
            mapper.infer::<Point>(),
            Err(Error::UnsupportedType { .. })
        ));
        assert!(matches!(
            mapper.infer::<Vec<i32>>(),
            Err(Error::UnsupportedType { .. })
        ));
    }

    #[test]
    fn register_adds_plain_and_optional() {
        let mapper = TypeMapper::new();
        let record = OpenType::Record(Arc::new(
            RecordType::new("Point", "", vec![FieldType::new("x", OpenType::I32)])
                .expect("record"),
        ));
        mapper.register::<Point>(record.clone());
        assert_eq!(mapper.infer::<Point>().ok(), Some(record.clone()));
        let w = mapper
            .resolve(&TypeToken::of::<Option<Point>>())
            .expect("optional witness");
        assert!(w.nullable);
        assert_eq!(w.open_type, record);
    }

    #[test]
    fn resolution_is_idempotent() {
        let mapper = TypeMapper::global();
        let a = mapper.infer::<u16>().ok();
        let b = mapper.infer::<u16>().ok();
        assert_eq!(a, b);
    }
}
