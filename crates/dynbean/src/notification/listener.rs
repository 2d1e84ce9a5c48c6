// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Notification Listener Traits
//!
//! Listeners receive notifications published by a registry. Filters decide,
//! per subscription, which notifications reach the listener.
//!
//! # Usage
//!
//! ```ignore
//! use dynbean::notification::{Notification, NotificationListener, Handback};
//! use std::sync::Arc;
//!
//! struct AuditLog;
//!
//! impl NotificationListener for AuditLog {
//!     fn handle_notification(&self, n: &Notification, _handback: Option<&Handback>) {
//!         log::info!("{}: {}", n.kind(), n.message());
//!     }
//! }
//!
//! registry.subscribe(Arc::new(AuditLog), None, None);
//! ```
//!
//! # Thread Safety
//!
//! Listeners and filters are called from the registry's notification
//! workers. They must be `Send + Sync` and should not block. A panicking
//! listener is logged and does not affect other listeners.

use super::Notification;
use crate::config::ATTRIBUTE_CHANGE_TYPE;
use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;

/// Opaque object handed back to the listener with every notification.
pub type Handback = Arc<dyn Any + Send + Sync>;

/// Receives notifications.
pub trait NotificationListener: Send + Sync {
    fn handle_notification(&self, notification: &Notification, handback: Option<&Handback>);
}

impl<F> NotificationListener for F
where
    F: Fn(&Notification, Option<&Handback>) + Send + Sync,
{
    fn handle_notification(&self, notification: &Notification, handback: Option<&Handback>) {
        self(notification, handback)
    }
}

/// Decides whether a notification is delivered to a subscription.
pub trait NotificationFilter: Send + Sync {
    fn is_enabled(&self, notification: &Notification) -> bool;
}

impl<F> NotificationFilter for F
where
    F: Fn(&Notification) -> bool + Send + Sync,
{
    fn is_enabled(&self, notification: &Notification) -> bool {
        self(notification)
    }
}

/// Passes notifications whose type starts with an enabled prefix.
#[derive(Debug, Clone, Default)]
pub struct NotificationTypeFilter {
    prefixes: Vec<String>,
}

impl NotificationTypeFilter {
    /// Filter with no enabled types (passes nothing).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable_type(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        if !self.prefixes.contains(&prefix) {
            self.prefixes.push(prefix);
        }
    }

    pub fn disable_type(&mut self, prefix: &str) {
        self.prefixes.retain(|p| p != prefix);
    }

    pub fn disable_all_types(&mut self) {
        self.prefixes.clear();
    }

    pub fn enabled_types(&self) -> &[String] {
        &self.prefixes
    }
}

impl NotificationFilter for NotificationTypeFilter {
    fn is_enabled(&self, notification: &Notification) -> bool {
        self.prefixes
            .iter()
            .any(|p| notification.kind().starts_with(p.as_str()))
    }
}

/// Passes attribute change notifications for enabled attribute names.
#[derive(Debug, Clone, Default)]
pub struct AttributeChangeFilter {
    names: HashSet<String>,
}

impl AttributeChangeFilter {
    /// Filter with no enabled attributes (passes nothing).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable_attribute(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn disable_attribute(&mut self, name: &str) {
        self.names.remove(name);
    }

    pub fn disable_all_attributes(&mut self) {
        self.names.clear();
    }

    /// Enabled attribute names, sorted.
    pub fn enabled_attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl NotificationFilter for AttributeChangeFilter {
    fn is_enabled(&self, notification: &Notification) -> bool {
        if notification.kind() != ATTRIBUTE_CHANGE_TYPE {
            return false;
        }
        notification
            .change()
            .is_some_and(|c| self.names.contains(&c.attribute_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::AttributeChange;
    use crate::open_type::OpenValue;
    use std::time::SystemTime;

    fn change(name: &str) -> Notification {
        Notification::attribute_change(
            "src",
            AttributeChange {
                attribute_name: name.into(),
                attribute_type: "i32".into(),
                old_value: OpenValue::I32(1),
                new_value: OpenValue::I32(2),
                sequence: 1,
                timestamp: SystemTime::now(),
            },
        )
    }

    #[test]
    fn type_filter_matches_prefix() {
        let mut filter = NotificationTypeFilter::new();
        assert!(!filter.is_enabled(&change("a")));
        filter.enable_type("attribute.");
        assert!(filter.is_enabled(&change("a")));
        assert!(!filter.is_enabled(&Notification::new("job.done", "src", 1, "")));
        filter.disable_type("attribute.");
        assert!(filter.enabled_types().is_empty());
    }

    #[test]
    fn attribute_filter_matches_names() {
        let mut filter = AttributeChangeFilter::new();
        filter.enable_attribute("age");
        assert!(filter.is_enabled(&change("age")));
        assert!(!filter.is_enabled(&change("name")));
        assert!(!filter.is_enabled(&Notification::new("job.done", "src", 1, "")));
        assert_eq!(filter.enabled_attributes(), vec!["age"]);
    }

    #[test]
    fn closures_are_filters() {
        let only_seq_one = |n: &Notification| n.sequence() == 1;
        assert!(only_seq_one.is_enabled(&change("x")));
    }
}
