// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bean-convention property discovery.
//!
//! A `PropertySource` resolves a property name to a getter/setter pair, the
//! way a component would expose `name()` / `set_name()` accessors. The
//! resulting accessors can back an attribute through
//! `AttributeBuilder::bean_property`.

use super::descriptor::{
    typed_getter, typed_setter, typed_try_getter, typed_try_setter, Getter, Setter,
};
use crate::error::BoxError;
use crate::open_type::{FromOpenValue, IntoOpenValue, OpenType, TypeToken};
use std::fmt;
use std::sync::Arc;

/// Accessors resolved for one property.
#[derive(Clone, Default)]
pub struct PropertyAccessors {
    pub(crate) getter: Option<Getter>,
    pub(crate) setter: Option<Setter>,
    pub(crate) token: Option<TypeToken>,
    pub(crate) open_type: Option<OpenType>,
    pub(crate) original_type: Option<String>,
}

impl PropertyAccessors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed getter.
    pub fn getter<T, F>(mut self, f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: IntoOpenValue + 'static,
    {
        self.getter = Some(typed_getter(f));
        self.token = Some(TypeToken::of::<T>());
        self
    }

    /// Fallible typed getter.
    pub fn try_getter<T, E, F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        T: IntoOpenValue + 'static,
        E: Into<BoxError> + 'static,
    {
        self.getter = Some(typed_try_getter(f));
        self.token = Some(TypeToken::of::<T>());
        self
    }

    /// Typed setter.
    pub fn setter<T, F>(mut self, f: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
        T: FromOpenValue + 'static,
    {
        self.setter = Some(typed_setter(f));
        self.token = Some(TypeToken::of::<T>());
        self
    }

    /// Fallible typed setter.
    pub fn try_setter<T, E, F>(mut self, f: F) -> Self
    where
        F: Fn(T) -> Result<(), E> + Send + Sync + 'static,
        T: FromOpenValue + 'static,
        E: Into<BoxError> + 'static,
    {
        self.setter = Some(typed_try_setter(f));
        self.token = Some(TypeToken::of::<T>());
        self
    }

    /// Explicit open type, for sources that hand out erased accessors.
    pub fn open_type(mut self, open_type: OpenType) -> Self {
        self.open_type = Some(open_type);
        self
    }

    pub fn original_type(mut self, name: impl Into<String>) -> Self {
        self.original_type = Some(name.into());
        self
    }

    pub fn is_readable(&self) -> bool {
        self.getter.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }
}

impl fmt::Debug for PropertyAccessors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyAccessors")
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .field("token", &self.token)
            .finish()
    }
}

/// Resolves property names to accessors.
pub trait PropertySource: Send + Sync {
    /// Accessors for `name`, or `None` when the property does not exist.
    fn property(self: Arc<Self>, name: &str) -> Option<PropertyAccessors>;

    /// Names of every property, for discovery tools.
    fn property_names(&self) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeDescriptor;
    use crate::open_type::OpenValue;
    use parking_lot::Mutex;

    struct Person {
        name: Mutex<String>,
        age: Mutex<i32>,
    }

    impl PropertySource for Person {
        fn property(self: Arc<Self>, name: &str) -> Option<PropertyAccessors> {
            let (r, w) = (self.clone(), self);
            match name {
                "name" => Some(
                    PropertyAccessors::new()
                        .getter(move || r.name.lock().clone())
                        .setter(move |v: String| *w.name.lock() = v),
                ),
                "age" => Some(PropertyAccessors::new().getter(move || *r.age.lock())),
                _ => None,
            }
        }

        fn property_names(&self) -> Vec<String> {
            vec!["name".into(), "age".into()]
        }
    }

    fn person() -> Arc<Person> {
        Arc::new(Person {
            name: Mutex::new("Ada".into()),
            age: Mutex::new(36),
        })
    }

    #[test]
    fn bean_property_binds_accessors() {
        let p = person();
        let attr = AttributeDescriptor::builder("name")
            .bean_property(p.clone(), "name")
            .build()
            .expect("bean attribute");
        assert!(attr.is_readable() && attr.is_writable());
        attr.set(OpenValue::String("Grace".into()), &|_| {})
            .expect("set");
        assert_eq!(*p.name.lock(), "Grace");
    }

    #[test]
    fn read_only_bean_property() {
        let attr = AttributeDescriptor::builder("age")
            .bean_property(person(), "age")
            .build()
            .expect("bean attribute");
        assert_eq!(attr.get().ok(), Some(OpenValue::I32(36)));
        assert!(!attr.is_writable());
    }

    #[test]
    fn missing_property_fails_build() {
        let result = AttributeDescriptor::builder("height")
            .bean_property(person(), "height")
            .build();
        assert!(result.is_err());
        assert_eq!(person().property_names().len(), 2);
    }
}
