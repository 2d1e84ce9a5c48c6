// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Attribute descriptors and their builder.

use super::bean::PropertySource;
use crate::descriptor::{Descriptor, DescriptorBuilder};
use crate::error::{BoxError, Error, Result};
use crate::notification::AttributeChange;
use crate::open_type::{
    FromOpenValue, IntoOpenValue, OpenType, OpenValue, TypeMapper, TypeToken, Witness,
};
use crate::registry::AttributeInfo;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

/// Type-erased attribute getter.
pub type Getter = Arc<dyn Fn() -> std::result::Result<OpenValue, BoxError> + Send + Sync>;

/// Type-erased attribute setter.
pub type Setter = Arc<dyn Fn(OpenValue) -> std::result::Result<(), BoxError> + Send + Sync>;

/// What happens when a null is written into a non-nullable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullPolicy {
    /// Fail with `Error::NullValue`.
    #[default]
    Reject,
    /// Substitute the type's default value (`0`, `false`, `""`, epoch).
    Default,
}

impl NullPolicy {
    /// Apply the policy to `value` for a slot of type `open_type`.
    pub(crate) fn coerce(
        self,
        slot: &str,
        open_type: &OpenType,
        nullable: bool,
        value: OpenValue,
    ) -> Result<OpenValue> {
        if !value.is_null() || nullable {
            return Ok(value);
        }
        match self {
            Self::Reject => Err(Error::NullValue {
                slot: slot.to_string(),
            }),
            Self::Default => match open_type.default_value() {
                OpenValue::Null => Err(Error::NullValue {
                    slot: slot.to_string(),
                }),
                default => Ok(default),
            },
        }
    }
}

/// Wrap a typed getter closure.
pub(crate) fn typed_getter<T, F>(f: F) -> Getter
where
    F: Fn() -> T + Send + Sync + 'static,
    T: IntoOpenValue + 'static,
{
    Arc::new(move || -> std::result::Result<OpenValue, BoxError> { Ok(f().into_open_value()) })
}

/// Wrap a fallible typed getter closure.
pub(crate) fn typed_try_getter<T, E, F>(f: F) -> Getter
where
    F: Fn() -> std::result::Result<T, E> + Send + Sync + 'static,
    T: IntoOpenValue + 'static,
    E: Into<BoxError> + 'static,
{
    Arc::new(move || -> std::result::Result<OpenValue, BoxError> {
        f().map(IntoOpenValue::into_open_value).map_err(Into::into)
    })
}

/// Wrap a typed setter closure.
pub(crate) fn typed_setter<T, F>(f: F) -> Setter
where
    F: Fn(T) + Send + Sync + 'static,
    T: FromOpenValue + 'static,
{
    Arc::new(move |value: OpenValue| -> std::result::Result<(), BoxError> {
        f(T::from_open_value(&value)?);
        Ok(())
    })
}

/// Wrap a fallible typed setter closure.
pub(crate) fn typed_try_setter<T, E, F>(f: F) -> Setter
where
    F: Fn(T) -> std::result::Result<(), E> + Send + Sync + 'static,
    T: FromOpenValue + 'static,
    E: Into<BoxError> + 'static,
{
    Arc::new(move |value: OpenValue| -> std::result::Result<(), BoxError> {
        f(T::from_open_value(&value)?).map_err(Into::into)
    })
}

/// A named, typed attribute bound to accessor closures.
pub struct AttributeDescriptor {
    name: String,
    description: String,
    open_type: OpenType,
    original_type: String,
    nullable: bool,
    null_policy: NullPolicy,
    getter: Option<Getter>,
    setter: Option<Setter>,
    descriptor: Descriptor,
    sequence: AtomicU64,
}

impl AttributeDescriptor {
    /// Start building an attribute.
    pub fn builder(name: impl Into<String>) -> AttributeBuilder {
        AttributeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn open_type(&self) -> &OpenType {
        &self.open_type
    }

    /// Native type name the attribute was declared with.
    pub fn original_type(&self) -> &str {
        &self.original_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn null_policy(&self) -> NullPolicy {
        self.null_policy
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// `true` when a getter is bound.
    pub fn is_readable(&self) -> bool {
        self.getter.is_some()
    }

    /// `true` when a setter is bound.
    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Read the current value.
    pub fn get(&self) -> Result<OpenValue> {
        let getter = self
            .getter
            .as_ref()
            .ok_or_else(|| Error::AttributeNotReadable(self.name.clone()))?;
        getter().map_err(|source| Error::Accessor {
            attribute: self.name.clone(),
            source,
        })
    }

    /// Write a new value.
    ///
    /// When both a getter and a setter are bound, exactly one
    /// `AttributeChange` carrying the pre-mutation value is passed to `sink`
    /// after the setter succeeds.
    pub fn set(&self, value: OpenValue, sink: &dyn Fn(AttributeChange)) -> Result<()> {
        let setter = self
            .setter
            .as_ref()
            .ok_or_else(|| Error::ReadOnlyAttribute(self.name.clone()))?;

        let value = self
            .null_policy
            .coerce(&self.name, &self.open_type, self.nullable, value)?;
        if !self.open_type.is_value(&value) {
            return Err(Error::TypeMismatch {
                expected: self.open_type.type_tag().to_string(),
                got: value.type_tag().to_string(),
            });
        }

        let old_value = match &self.getter {
            Some(_) => Some(self.get()?),
            None => None,
        };

        setter(value.clone()).map_err(|source| Error::Accessor {
            attribute: self.name.clone(),
            source,
        })?;

        if let Some(old_value) = old_value {
            let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
            sink(AttributeChange {
                attribute_name: self.name.clone(),
                attribute_type: self.open_type.type_tag().to_string(),
                old_value,
                new_value: value,
                sequence,
                timestamp: SystemTime::now(),
            });
        }
        Ok(())
    }

    /// Schema entry for this attribute.
    pub fn info(&self) -> AttributeInfo {
        AttributeInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            open_type: self.open_type.clone(),
            original_type: self.original_type.clone(),
            readable: self.is_readable(),
            writable: self.is_writable(),
            nullable: self.nullable,
            descriptor: self.descriptor.clone(),
        }
    }
}

impl fmt::Debug for AttributeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeDescriptor")
            .field("name", &self.name)
            .field("open_type", &self.open_type)
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .field("nullable", &self.nullable)
            .finish()
    }
}

/// Builder for `AttributeDescriptor`.
///
/// Methods chain infallibly; the first problem is reported by `build()`.
///
/// # Example
///
/// ```rust
/// use dynbean::attribute::AttributeDescriptor;
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use std::sync::Arc;
///
/// let age = Arc::new(AtomicI32::new(12));
/// let (r, w) = (age.clone(), age.clone());
/// let attribute = AttributeDescriptor::builder("age")
///     .description("Age in years")
///     .getter(move || r.load(Ordering::SeqCst))
///     .setter(move |v: i32| w.store(v, Ordering::SeqCst))
///     .build()
///     .unwrap();
/// assert_eq!(attribute.open_type().type_tag(), "i32");
/// ```
pub struct AttributeBuilder {
    name: String,
    description: Option<String>,
    open_type: Option<OpenType>,
    original_type: Option<String>,
    nullable: Option<bool>,
    null_policy: NullPolicy,
    getter: Option<Getter>,
    setter: Option<Setter>,
    getter_token: Option<TypeToken>,
    setter_token: Option<TypeToken>,
    descriptor: DescriptorBuilder,
    pending: Option<Error>,
}

impl AttributeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            open_type: None,
            original_type: None,
            nullable: None,
            null_policy: NullPolicy::default(),
            getter: None,
            setter: None,
            getter_token: None,
            setter_token: None,
            descriptor: DescriptorBuilder::default(),
            pending: None,
        }
    }

    fn defer(&mut self, err: Error) {
        if self.pending.is_none() {
            log::debug!("[AttributeBuilder] {}: {}", self.name, err);
            self.pending = Some(err);
        }
    }

    /// Description (defaults to the name).
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Explicit open type; disables inference.
    pub fn open_type(mut self, open_type: OpenType) -> Self {
        self.open_type = Some(open_type);
        self
    }

    /// Native type name reported in the schema.
    pub fn original_type(mut self, name: impl Into<String>) -> Self {
        self.original_type = Some(name.into());
        self
    }

    /// Override nullability.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn null_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }

    /// Merge descriptor fields.
    pub fn descriptor(mut self, descriptor: &Descriptor) -> Self {
        self.descriptor = self.descriptor.descriptor(descriptor);
        self
    }

    /// Typed getter; the open type is inferred from `T`.
    pub fn getter<T, F>(mut self, f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: IntoOpenValue + 'static,
    {
        self.getter = Some(typed_getter(f));
        self.getter_token = Some(TypeToken::of::<T>());
        self
    }

    /// Fallible typed getter.
    pub fn try_getter<T, E, F>(mut self, f: F) -> Self
    where
        F: Fn() -> std::result::Result<T, E> + Send + Sync + 'static,
        T: IntoOpenValue + 'static,
        E: Into<BoxError> + 'static,
    {
        self.getter = Some(typed_try_getter(f));
        self.getter_token = Some(TypeToken::of::<T>());
        self
    }

    /// Typed setter; the open type is inferred from `T`.
    pub fn setter<T, F>(mut self, f: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
        T: FromOpenValue + 'static,
    {
        self.setter = Some(typed_setter(f));
        self.setter_token = Some(TypeToken::of::<T>());
        self
    }

    /// Fallible typed setter.
    pub fn try_setter<T, E, F>(mut self, f: F) -> Self
    where
        F: Fn(T) -> std::result::Result<(), E> + Send + Sync + 'static,
        T: FromOpenValue + 'static,
        E: Into<BoxError> + 'static,
    {
        self.setter = Some(typed_try_setter(f));
        self.setter_token = Some(TypeToken::of::<T>());
        self
    }

    /// Erased getter; requires an explicit `open_type`.
    pub fn raw_getter(mut self, getter: Getter) -> Self {
        self.getter = Some(getter);
        self.getter_token = Some(TypeToken::of::<OpenValue>());
        self
    }

    /// Erased setter; requires an explicit `open_type`.
    pub fn raw_setter(mut self, setter: Setter) -> Self {
        self.setter = Some(setter);
        self.setter_token = Some(TypeToken::of::<OpenValue>());
        self
    }

    /// Bind accessors of a bean-convention property.
    pub fn bean_property<S>(mut self, source: Arc<S>, property: &str) -> Self
    where
        S: PropertySource + 'static,
    {
        match source.property(property) {
            Some(accessors) => {
                if let Some(getter) = accessors.getter {
                    self.getter = Some(getter);
                    self.getter_token = accessors.token;
                }
                if let Some(setter) = accessors.setter {
                    self.setter = Some(setter);
                    self.setter_token = accessors.token;
                }
                if self.open_type.is_none() {
                    self.open_type = accessors.open_type;
                }
                if self.original_type.is_none() {
                    self.original_type = accessors.original_type;
                }
            }
            None => {
                let err = Error::InvalidDescriptor(format!(
                    "no property {} on source for attribute {}",
                    property, self.name
                ));
                self.defer(err);
            }
        }
        self
    }

    fn resolve_type(&self, mapper: &TypeMapper) -> Result<(OpenType, bool, String)> {
        let getter = self.getter_token.map(|t| (t, mapper.resolve(&t)));
        let setter = self.setter_token.map(|t| (t, mapper.resolve(&t)));

        if let Some(open_type) = &self.open_type {
            let nullable = [&getter, &setter]
                .into_iter()
                .flatten()
                .any(|(_, w)| w.as_ref().is_ok_and(|w| w.nullable));
            let original = [&getter, &setter]
                .into_iter()
                .flatten()
                .find_map(|(_, w)| w.as_ref().ok().map(|w| w.original_type.clone()))
                .unwrap_or_else(|| open_type.type_tag().to_string());
            return Ok((open_type.clone(), nullable, original));
        }

        let getter = getter.map(|(_, w)| w).transpose()?;
        let setter = setter.map(|(_, w)| w).transpose()?;
        let witness: Witness = match (getter, setter) {
            (Some(g), Some(s)) => {
                if g.open_type != s.open_type {
                    return Err(Error::InvalidDescriptor(format!(
                        "attribute {} getter type {} differs from setter type {}",
                        self.name, g.open_type, s.open_type
                    )));
                }
                // The setter decides what may be written, including null.
                s
            }
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => {
                return Err(Error::TypeInference {
                    type_name: self.name.clone(),
                })
            }
        };
        Ok((witness.open_type, witness.nullable, witness.original_type))
    }

    /// Build with the process-wide `TypeMapper`.
    pub fn build(self) -> Result<AttributeDescriptor> {
        self.build_with(TypeMapper::global())
    }

    /// Build, resolving inferred types through `mapper`.
    pub fn build_with(mut self, mapper: &TypeMapper) -> Result<AttributeDescriptor> {
        if let Some(err) = self.pending.take() {
            return Err(err);
        }
        if self.name.is_empty() {
            return Err(Error::InvalidDescriptor("attribute name is empty".into()));
        }
        if self.getter.is_none() && self.setter.is_none() {
            return Err(Error::InvalidDescriptor(format!(
                "attribute {} has neither getter nor setter",
                self.name
            )));
        }

        let (open_type, inferred_nullable, inferred_original) = self.resolve_type(mapper)?;
        let nullable = self.nullable.unwrap_or(inferred_nullable);
        let original_type = self.original_type.unwrap_or(inferred_original);
        let descriptor = self
            .descriptor
            .open_type(&open_type)
            .original_type(original_type.clone())
            .build();

        log::debug!(
            "[AttributeBuilder::build] {} : {} (r={}, w={})",
            self.name,
            open_type,
            self.getter.is_some(),
            self.setter.is_some()
        );

        Ok(AttributeDescriptor {
            description: self.description.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            open_type,
            original_type,
            nullable,
            null_policy: self.null_policy,
            getter: self.getter,
            setter: self.setter,
            descriptor,
            sequence: AtomicU64::new(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn age_attribute() -> (Arc<Mutex<i32>>, AttributeDescriptor) {
        let age = Arc::new(Mutex::new(12));
        let (r, w) = (age.clone(), age.clone());
        let attr = AttributeDescriptor::builder("age")
            .getter(move || *r.lock())
            .setter(move |v: i32| *w.lock() = v)
            .build()
            .expect("valid attribute");
        (age, attr)
    }

    #[test]
    fn set_then_get_emits_one_change() {
        let (_, attr) = age_attribute();
        let changes = Mutex::new(Vec::new());
        attr.set(OpenValue::I32(21), &|c| changes.lock().push(c))
            .expect("set");
        assert_eq!(attr.get().ok(), Some(OpenValue::I32(21)));

        let changes = changes.into_inner();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old_value, OpenValue::I32(12));
        assert_eq!(changes[0].new_value, OpenValue::I32(21));
        assert_eq!(changes[0].sequence, 1);
        assert_eq!(changes[0].attribute_type, "i32");
    }

    #[test]
    fn read_only_set_fails() {
        let attr = AttributeDescriptor::builder("uptime")
            .getter(|| 42u64)
            .build()
            .expect("valid attribute");
        let err = attr.set(OpenValue::U64(1), &|_| {}).unwrap_err();
        assert!(matches!(err, Error::ReadOnlyAttribute(name) if name == "uptime"));
        assert!(attr.is_readable());
        assert!(!attr.is_writable());
    }

    #[test]
    fn write_only_get_fails_and_set_is_silent() {
        let store = Arc::new(Mutex::new(String::new()));
        let w = store.clone();
        let attr = AttributeDescriptor::builder("password")
            .setter(move |v: String| *w.lock() = v)
            .build()
            .expect("valid attribute");
        assert!(matches!(attr.get(), Err(Error::AttributeNotReadable(_))));

        let emitted = Mutex::new(0);
        attr.set(OpenValue::String("s3cret".into()), &|_| *emitted.lock() += 1)
            .expect("set");
        assert_eq!(*store.lock(), "s3cret");
        assert_eq!(*emitted.lock(), 0);
    }

    #[test]
    fn null_policy_governs_plain_slots() {
        let (age, attr) = age_attribute();
        assert!(matches!(
            attr.set(OpenValue::Null, &|_| {}),
            Err(Error::NullValue { .. })
        ));

        let w = age.clone();
        let coercing = AttributeDescriptor::builder("age")
            .setter(move |v: i32| *w.lock() = v)
            .null_policy(NullPolicy::Default)
            .build()
            .expect("valid attribute");
        coercing.set(OpenValue::Null, &|_| {}).expect("coerced");
        assert_eq!(*age.lock(), 0);
    }

    #[test]
    fn optional_slots_accept_null() {
        let store: Arc<Mutex<Option<i32>>> = Arc::new(Mutex::new(Some(1)));
        let (r, w) = (store.clone(), store.clone());
        let attr = AttributeDescriptor::builder("limit")
            .getter(move || *r.lock())
            .setter(move |v: Option<i32>| *w.lock() = v)
            .build()
            .expect("valid attribute");
        assert!(attr.is_nullable());
        assert_eq!(attr.open_type(), &OpenType::I32);
        attr.set(OpenValue::Null, &|_| {}).expect("null accepted");
        assert_eq!(*store.lock(), None);
        assert_eq!(attr.get().ok(), Some(OpenValue::Null));
    }

    #[test]
    fn type_mismatch_rejected_before_setter() {
        let (age, attr) = age_attribute();
        let err = attr
            .set(OpenValue::String("old".into()), &|_| {})
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert_eq!(*age.lock(), 12);
    }

    #[test]
    fn accessor_failures_propagate() {
        let attr = AttributeDescriptor::builder("flaky")
            .try_getter(|| -> std::result::Result<i32, String> { Err("disk gone".into()) })
            .build()
            .expect("valid attribute");
        match attr.get() {
            Err(Error::Accessor { attribute, source }) => {
                assert_eq!(attribute, "flaky");
                assert_eq!(source.to_string(), "disk gone");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn build_errors() {
        assert!(matches!(
            AttributeDescriptor::builder("empty").build(),
            Err(Error::InvalidDescriptor(_))
        ));
        assert!(matches!(
            AttributeDescriptor::builder("erased")
                .raw_getter(Arc::new(|| -> std::result::Result<OpenValue, BoxError> {
                    Ok(OpenValue::I32(1))
                }))
                .build(),
            Err(Error::TypeInference { .. })
        ));
        assert!(matches!(
            AttributeDescriptor::builder("mixed")
                .getter(|| 1i32)
                .setter(|_: String| {})
                .build(),
            Err(Error::InvalidDescriptor(_))
        ));
        assert!(matches!(
            AttributeDescriptor::builder("vec")
                .getter(|| OpenValue::Null)
                .build(),
            Err(Error::TypeInference { .. })
        ));
    }

    #[test]
    fn explicit_type_accepts_erased_getter() {
        let attr = AttributeDescriptor::builder("erased")
            .raw_getter(Arc::new(|| -> std::result::Result<OpenValue, BoxError> {
                Ok(OpenValue::I64(7))
            }))
            .open_type(OpenType::I64)
            .build()
            .expect("explicit type");
        assert_eq!(attr.get().ok(), Some(OpenValue::I64(7)));
        assert_eq!(attr.descriptor().open_type(), Some(&OpenType::I64));
        assert_eq!(attr.description(), "erased");
    }
}
