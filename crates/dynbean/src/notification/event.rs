// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Notification events and notification descriptors.

use crate::config::{
    ATTRIBUTE_CHANGE_DESCRIPTION, ATTRIBUTE_CHANGE_NOTIFICATION, ATTRIBUTE_CHANGE_TYPE,
};
use crate::descriptor::Descriptor;
use crate::open_type::OpenValue;
use std::time::SystemTime;

/// Payload of an attribute change notification.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeChange {
    pub attribute_name: String,
    /// Type tag of the attribute.
    pub attribute_type: String,
    /// Value before the setter ran (`Null` for write-only reads).
    pub old_value: OpenValue,
    pub new_value: OpenValue,
    /// Per-attribute change sequence, starting at 1.
    pub sequence: u64,
    pub timestamp: SystemTime,
}

/// A notification delivered to subscribed listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    kind: String,
    source: String,
    sequence: u64,
    timestamp: SystemTime,
    message: String,
    user_data: Option<OpenValue>,
    change: Option<AttributeChange>,
}

impl Notification {
    /// Create a notification stamped with the current time.
    pub fn new(
        kind: impl Into<String>,
        source: impl Into<String>,
        sequence: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            source: source.into(),
            sequence,
            timestamp: SystemTime::now(),
            message: message.into(),
            user_data: None,
            change: None,
        }
    }

    /// Attribute change notification for `source`.
    pub fn attribute_change(source: impl Into<String>, change: AttributeChange) -> Self {
        let message = format!(
            "{} changed from {} to {}",
            change.attribute_name, change.old_value, change.new_value
        );
        Self {
            kind: ATTRIBUTE_CHANGE_TYPE.to_string(),
            source: source.into(),
            sequence: change.sequence,
            timestamp: change.timestamp,
            message,
            user_data: None,
            change: Some(change),
        }
    }

    pub fn with_user_data(mut self, data: impl Into<OpenValue>) -> Self {
        self.user_data = Some(data.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Notification type, e.g. `"attribute.change"`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn user_data(&self) -> Option<&OpenValue> {
        self.user_data.as_ref()
    }

    /// Change payload, present on attribute change notifications.
    pub fn change(&self) -> Option<&AttributeChange> {
        self.change.as_ref()
    }

    pub(crate) fn set_source_if_empty(&mut self, source: &str) {
        if self.source.is_empty() {
            self.source = source.to_string();
        }
    }
}

/// Describes a notification a registry may emit.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDescriptor {
    name: String,
    types: Vec<String>,
    description: String,
    descriptor: Descriptor,
}

impl NotificationDescriptor {
    pub fn new<I, S>(name: impl Into<String>, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        Self {
            description: name.clone(),
            name,
            types: types.into_iter().map(Into::into).collect(),
            descriptor: Descriptor::new(),
        }
    }

    /// Descriptor for attribute change notifications.
    pub fn attribute_change() -> Self {
        Self::new(ATTRIBUTE_CHANGE_NOTIFICATION, [ATTRIBUTE_CHANGE_TYPE])
            .with_description(ATTRIBUTE_CHANGE_DESCRIPTION)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_descriptor(mut self, descriptor: Descriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_change_message() {
        let change = AttributeChange {
            attribute_name: "age".into(),
            attribute_type: "i32".into(),
            old_value: OpenValue::I32(12),
            new_value: OpenValue::I32(21),
            sequence: 1,
            timestamp: SystemTime::now(),
        };
        let n = Notification::attribute_change("Person", change);
        assert_eq!(n.kind(), ATTRIBUTE_CHANGE_TYPE);
        assert_eq!(n.message(), "age changed from 12 to 21");
        assert_eq!(n.sequence(), 1);
        assert_eq!(n.change().map(|c| &c.new_value), Some(&OpenValue::I32(21)));
    }

    #[test]
    fn attribute_change_descriptor() {
        let d = NotificationDescriptor::attribute_change();
        assert_eq!(d.types(), &[ATTRIBUTE_CHANGE_TYPE.to_string()]);
        assert_eq!(d.description(), ATTRIBUTE_CHANGE_DESCRIPTION);
    }
}
