// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor metadata attached to registries, attributes, operations,
//! parameters and notifications.

use crate::config::fields;
use crate::open_type::{OpenType, OpenValue};
use std::collections::BTreeMap;
use std::time::Duration;

/// A descriptor field value.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorValue {
    /// Single value (string, number, bool, ...).
    Value(OpenValue),
    /// List of values (legal values, exception names).
    Values(Vec<OpenValue>),
    /// Open type (the `openType` field).
    Type(OpenType),
}

impl DescriptorValue {
    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(v) => v.as_str(),
            _ => None,
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Value(v) => v.as_bool(),
            _ => None,
        }
    }

    /// Try to get as single value.
    pub fn as_value(&self) -> Option<&OpenValue> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as value list.
    pub fn as_values(&self) -> Option<&[OpenValue]> {
        match self {
            Self::Values(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as open type.
    pub fn as_open_type(&self) -> Option<&OpenType> {
        match self {
            Self::Type(t) => Some(t),
            _ => None,
        }
    }
}

/// Ordered, string-keyed metadata map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Descriptor {
    fields: BTreeMap<String, DescriptorValue>,
}

impl Descriptor {
    /// Empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> DescriptorBuilder {
        DescriptorBuilder::default()
    }

    /// Field value by name.
    pub fn field(&self, name: &str) -> Option<&DescriptorValue> {
        self.fields.get(name)
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// `(name, value)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DescriptorValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set a field, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: DescriptorValue) {
        self.fields.insert(name.into(), value);
    }

    /// Copy every field of `other` into this descriptor (other wins).
    pub fn merge(&mut self, other: &Descriptor) {
        for (k, v) in &other.fields {
            self.fields.insert(k.clone(), v.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convenience: the `openType` field.
    pub fn open_type(&self) -> Option<&OpenType> {
        self.field(fields::OPEN_TYPE)
            .and_then(DescriptorValue::as_open_type)
    }

    /// Convenience: the `originalType` field.
    pub fn original_type(&self) -> Option<&str> {
        self.field(fields::ORIGINAL_TYPE)
            .and_then(DescriptorValue::as_str)
    }

    /// Convenience: the `immutableInfo` field (false when absent).
    pub fn immutable_info(&self) -> bool {
        self.field(fields::IMMUTABLE_INFO)
            .and_then(DescriptorValue::as_bool)
            .unwrap_or(false)
    }
}

/// Fluent builder for descriptors.
///
/// # Example
///
/// ```rust
/// use dynbean::descriptor::Descriptor;
///
/// let descriptor = Descriptor::builder()
///     .units("ms")
///     .min_value(0i64)
///     .max_value(10_000i64)
///     .metric_type("gauge")
///     .build();
/// assert_eq!(descriptor.field("units").and_then(|v| v.as_str()), Some("ms"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DescriptorBuilder {
    descriptor: Descriptor,
}

impl DescriptorBuilder {
    fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.descriptor
            .set(name, DescriptorValue::Value(OpenValue::String(value.into())));
        self
    }

    fn flag(mut self, name: &str, value: bool) -> Self {
        self.descriptor
            .set(name, DescriptorValue::Value(OpenValue::Bool(value)));
        self
    }

    /// Arbitrary field.
    pub fn field(mut self, name: impl Into<String>, value: DescriptorValue) -> Self {
        self.descriptor.set(name, value);
        self
    }

    /// Merge every field of an existing descriptor.
    pub fn descriptor(mut self, other: &Descriptor) -> Self {
        self.descriptor.merge(other);
        self
    }

    pub fn default_value(mut self, value: impl Into<OpenValue>) -> Self {
        self.descriptor
            .set(fields::DEFAULT_VALUE, DescriptorValue::Value(value.into()));
        self
    }

    pub fn min_value(mut self, value: impl Into<OpenValue>) -> Self {
        self.descriptor
            .set(fields::MIN_VALUE, DescriptorValue::Value(value.into()));
        self
    }

    pub fn max_value(mut self, value: impl Into<OpenValue>) -> Self {
        self.descriptor
            .set(fields::MAX_VALUE, DescriptorValue::Value(value.into()));
        self
    }

    pub fn legal_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<OpenValue>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.descriptor
            .set(fields::LEGAL_VALUES, DescriptorValue::Values(values));
        self
    }

    pub fn exceptions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = names
            .into_iter()
            .map(|s| OpenValue::String(s.into()))
            .collect();
        self.descriptor
            .set(fields::EXCEPTIONS, DescriptorValue::Values(values));
        self
    }

    /// Deprecation note, e.g. `"1.2 use foo instead"`.
    pub fn deprecated(self, note: impl Into<String>) -> Self {
        self.text(fields::DEPRECATED, note)
    }

    pub fn description_resource_bundle(self, base_name: impl Into<String>) -> Self {
        self.text(fields::DESCRIPTION_RESOURCE_BUNDLE_BASE_NAME, base_name)
    }

    pub fn description_resource_key(self, key: impl Into<String>) -> Self {
        self.text(fields::DESCRIPTION_RESOURCE_KEY, key)
    }

    pub fn display_name(self, name: impl Into<String>) -> Self {
        self.text(fields::DISPLAY_NAME, name)
    }

    pub fn enabled(self, enabled: bool) -> Self {
        self.flag(fields::ENABLED, enabled)
    }

    pub fn immutable_info(self, immutable: bool) -> Self {
        self.flag(fields::IMMUTABLE_INFO, immutable)
    }

    pub fn info_timeout(mut self, timeout: Duration) -> Self {
        let millis = i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX);
        self.descriptor
            .set(fields::INFO_TIMEOUT, DescriptorValue::Value(OpenValue::I64(millis)));
        self
    }

    pub fn interface_class_name(self, name: impl Into<String>) -> Self {
        self.text(fields::INTERFACE_CLASS_NAME, name)
    }

    pub fn locale(self, locale: impl Into<String>) -> Self {
        self.text(fields::LOCALE, locale)
    }

    /// Metric type, e.g. `"counter"` or `"gauge"`.
    pub fn metric_type(self, metric_type: impl Into<String>) -> Self {
        self.text(fields::METRIC_TYPE, metric_type)
    }

    /// Notification severity, 0 (unknown) to 6 (normal).
    pub fn severity(mut self, severity: u8) -> Self {
        self.descriptor.set(
            fields::SEVERITY,
            DescriptorValue::Value(OpenValue::I32(i32::from(severity.min(6)))),
        );
        self
    }

    pub fn since(self, version: impl Into<String>) -> Self {
        self.text(fields::SINCE, version)
    }

    pub fn units(self, units: impl Into<String>) -> Self {
        self.text(fields::UNITS, units)
    }

    pub(crate) fn open_type(mut self, open_type: &OpenType) -> Self {
        self.descriptor
            .set(fields::OPEN_TYPE, DescriptorValue::Type(open_type.clone()));
        self
    }

    pub(crate) fn original_type(self, name: impl Into<String>) -> Self {
        self.text(fields::ORIGINAL_TYPE, name)
    }

    pub fn build(self) -> Descriptor {
        self.descriptor
    }
}
