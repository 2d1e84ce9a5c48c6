// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Management Registry
//!
//! The aggregate exposed to management tooling: a frozen set of attributes,
//! operations and notification descriptors, plus the notifier delivering
//! attribute changes and application events.
//!
//! # Lifecycle
//!
//! ```text
//! ManagementRegistry::builder()   (unbuilt, accumulates descriptors)
//!        |
//!     build()  ---- error ----> no registry
//!        |
//!        v
//! ManagementRegistry              (immutable schema, Send + Sync)
//! ```
//!
//! Once built, the descriptor maps never change; get/set/invoke may be
//! called concurrently from any thread. Notification delivery runs on the
//! registry's executor and never blocks the caller.

mod builder;
mod info;

pub use builder::ManagementRegistryBuilder;
pub use info::{Attribute, AttributeInfo, OperationInfo, RegistryInfo};

use crate::attribute::AttributeRegistry;
use crate::error::{Error, Result};
use crate::notification::{
    ChangeNotifier, Handback, Notification, NotificationFilter, NotificationListener,
    SubscriptionId,
};
use crate::open_type::OpenValue;
use crate::operation::OperationRegistry;
use std::fmt;
use std::sync::Arc;

/// A built, immutable management registry.
pub struct ManagementRegistry {
    info: RegistryInfo,
    attributes: AttributeRegistry,
    operations: OperationRegistry,
    notifier: ChangeNotifier,
}

impl ManagementRegistry {
    pub fn builder() -> ManagementRegistryBuilder {
        ManagementRegistryBuilder::new()
    }

    pub fn class_name(&self) -> &str {
        &self.info.class_name
    }

    /// Full schema manifest.
    pub fn schema(&self) -> &RegistryInfo {
        &self.info
    }

    // =======================================================================
    // Attributes
    // =======================================================================

    /// Current value of attribute `name`.
    pub fn get_value(&self, name: &str) -> Result<OpenValue> {
        self.attributes
            .find(name)
            .ok_or_else(|| Error::AttributeNotFound(name.to_string()))?
            .get()
    }

    /// Write attribute `name`, publishing the resulting change notification.
    pub fn set_value(&self, name: &str, value: OpenValue) -> Result<()> {
        let attribute = self
            .attributes
            .find(name)
            .ok_or_else(|| Error::AttributeNotFound(name.to_string()))?;
        attribute.set(value, &|change| {
            self.notifier
                .publish(Notification::attribute_change(self.class_name(), change));
        })
    }

    /// Read several attributes; unreadable, failing or null ones are omitted.
    pub fn get_bulk(&self, names: &[&str]) -> Vec<Attribute> {
        names
            .iter()
            .filter_map(|name| match self.get_value(name) {
                Ok(value) if value.is_null() => {
                    log::debug!("[ManagementRegistry::get_bulk] {} skipped: null", name);
                    None
                }
                Ok(value) => Some(Attribute {
                    name: (*name).to_string(),
                    value,
                }),
                Err(err) => {
                    log::debug!("[ManagementRegistry::get_bulk] {} skipped: {}", name, err);
                    None
                }
            })
            .collect()
    }

    /// Write several attributes; returns those actually written.
    pub fn set_bulk(&self, attributes: Vec<Attribute>) -> Vec<Attribute> {
        attributes
            .into_iter()
            .filter(|attr| match self.set_value(&attr.name, attr.value.clone()) {
                Ok(()) => true,
                Err(err) => {
                    log::debug!(
                        "[ManagementRegistry::set_bulk] {} skipped: {}",
                        attr.name,
                        err
                    );
                    false
                }
            })
            .collect()
    }

    // =======================================================================
    // Operations
    // =======================================================================

    /// Invoke the overload of `name` whose parameter type tags equal
    /// `signature`.
    pub fn invoke_operation(
        &self,
        name: &str,
        args: &[OpenValue],
        signature: &[&str],
    ) -> Result<OpenValue> {
        let signature: Vec<String> = signature.iter().map(|s| (*s).to_string()).collect();
        self.operations
            .invoke(self.class_name(), name, args, &signature, &self.notifier)
    }

    // =======================================================================
    // Notifications
    // =======================================================================

    pub fn subscribe(
        &self,
        listener: Arc<dyn NotificationListener>,
        filter: Option<Arc<dyn NotificationFilter>>,
        handback: Option<Handback>,
    ) -> SubscriptionId {
        self.notifier.subscribe(listener, filter, handback)
    }

    /// Remove one subscription.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        self.notifier.unsubscribe(id)
    }

    /// Remove every subscription of `listener`.
    pub fn unsubscribe_listener(&self, listener: &Arc<dyn NotificationListener>) -> Result<usize> {
        self.notifier.unsubscribe_listener(listener)
    }

    /// Deliver `notification` to every subscriber; returns immediately.
    pub fn publish(&self, notification: Notification) {
        self.notifier.publish(notification);
    }

    /// Publish an application event of type `kind` sourced at this registry.
    /// Returns its sequence number.
    pub fn send_notification(&self, kind: &str, message: impl Into<String>) -> u64 {
        let sequence = self.notifier.next_sequence();
        self.notifier.publish(Notification::new(
            kind,
            self.class_name(),
            sequence,
            message,
        ));
        sequence
    }

    /// Next registry-wide notification sequence number.
    pub fn next_sequence(&self) -> u64 {
        self.notifier.next_sequence()
    }

    pub fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }

    /// Stop notification delivery, draining queued notifications.
    ///
    /// Called implicitly when the registry owns its executor and is dropped.
    pub fn shutdown(&self) {
        log::debug!("[ManagementRegistry::shutdown] {}", self.class_name());
        self.notifier.shutdown();
    }
}

impl fmt::Debug for ManagementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagementRegistry")
            .field("class_name", &self.info.class_name)
            .field("attributes", &self.attributes.len())
            .field("operations", &self.operations.len())
            .field("notifier", &self.notifier)
            .finish()
    }
}
