// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Management Agent
//!
//! Name-addressable registration point for built registries. Tooling talks
//! to the agent in the loosely-typed form: attribute names, positional
//! argument lists and signature tag lists, all resolved against the
//! registry registered under an `ObjectName`.
//!
//! # Usage
//!
//! ```rust
//! use dynbean::agent::{ManagementAgent, ObjectName};
//! use dynbean::open_type::OpenValue;
//! use dynbean::registry::ManagementRegistry;
//!
//! let agent = ManagementAgent::new("app");
//! let registry = ManagementRegistry::builder()
//!     .read_only_attribute("uptime", "Seconds since start", || 42_u64)
//!     .build()
//!     .unwrap();
//! let name = ObjectName::parse("app:type=Server").unwrap();
//! agent.register(name.clone(), registry).unwrap();
//!
//! assert_eq!(agent.get_attribute(&name, "uptime").unwrap(), OpenValue::U64(42));
//! ```

mod object_name;

pub use object_name::ObjectName;

use crate::error::{Error, Result};
use crate::notification::{Handback, NotificationFilter, NotificationListener, SubscriptionId};
use crate::open_type::OpenValue;
use crate::registry::{Attribute, ManagementRegistry, RegistryInfo};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Default domain of the process-wide agent.
pub const PLATFORM_DOMAIN: &str = "dynbean";

/// Registers registries under unique names and dispatches to them.
pub struct ManagementAgent {
    default_domain: String,
    registries: DashMap<ObjectName, Arc<ManagementRegistry>>,
}

impl ManagementAgent {
    pub fn new(default_domain: impl Into<String>) -> Self {
        Self {
            default_domain: default_domain.into(),
            registries: DashMap::new(),
        }
    }

    /// Process-wide agent, created on first use.
    pub fn platform() -> &'static ManagementAgent {
        static PLATFORM: OnceLock<ManagementAgent> = OnceLock::new();
        PLATFORM.get_or_init(|| {
            log::debug!("[ManagementAgent::platform] created");
            ManagementAgent::new(PLATFORM_DOMAIN)
        })
    }

    pub fn default_domain(&self) -> &str {
        &self.default_domain
    }

    /// Register `registry` under `name`.
    ///
    /// # Errors
    ///
    /// `AlreadyRegistered` if `name` is taken.
    pub fn register(
        &self,
        name: ObjectName,
        registry: impl Into<Arc<ManagementRegistry>>,
    ) -> Result<ObjectName> {
        match self.registries.entry(name.clone()) {
            Entry::Occupied(_) => {
                log::debug!("[ManagementAgent::register] {} already registered", name);
                Err(Error::AlreadyRegistered(name.to_string()))
            }
            Entry::Vacant(slot) => {
                slot.insert(registry.into());
                log::info!("[ManagementAgent::register] {}", name);
                Ok(name)
            }
        }
    }

    /// Remove the registry registered under `name` and hand it back.
    pub fn unregister(&self, name: &ObjectName) -> Result<Arc<ManagementRegistry>> {
        let (_, registry) = self
            .registries
            .remove(name)
            .ok_or_else(|| Error::InstanceNotFound(name.to_string()))?;
        log::info!("[ManagementAgent::unregister] {}", name);
        Ok(registry)
    }

    pub fn is_registered(&self, name: &ObjectName) -> bool {
        self.registries.contains_key(name)
    }

    /// Registry registered under `name`.
    pub fn registry(&self, name: &ObjectName) -> Result<Arc<ManagementRegistry>> {
        // Clone out so no map shard stays locked while user closures run.
        self.registries
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::InstanceNotFound(name.to_string()))
    }

    pub fn get_attribute(&self, name: &ObjectName, attribute: &str) -> Result<OpenValue> {
        self.registry(name)?.get_value(attribute)
    }

    /// Read several attributes; failing ones are omitted.
    pub fn get_attributes(&self, name: &ObjectName, attributes: &[&str]) -> Result<Vec<Attribute>> {
        Ok(self.registry(name)?.get_bulk(attributes))
    }

    pub fn set_attribute(&self, name: &ObjectName, attribute: Attribute) -> Result<()> {
        self.registry(name)?.set_value(&attribute.name, attribute.value)
    }

    /// Write several attributes; returns those actually written.
    pub fn set_attributes(
        &self,
        name: &ObjectName,
        attributes: Vec<Attribute>,
    ) -> Result<Vec<Attribute>> {
        Ok(self.registry(name)?.set_bulk(attributes))
    }

    pub fn invoke(
        &self,
        name: &ObjectName,
        operation: &str,
        params: &[OpenValue],
        signature: &[&str],
    ) -> Result<OpenValue> {
        self.registry(name)?
            .invoke_operation(operation, params, signature)
    }

    /// Schema of the registry registered under `name`.
    pub fn info(&self, name: &ObjectName) -> Result<RegistryInfo> {
        Ok(self.registry(name)?.schema().clone())
    }

    pub fn add_notification_listener(
        &self,
        name: &ObjectName,
        listener: Arc<dyn NotificationListener>,
        filter: Option<Arc<dyn NotificationFilter>>,
        handback: Option<Handback>,
    ) -> Result<SubscriptionId> {
        Ok(self.registry(name)?.subscribe(listener, filter, handback))
    }

    /// Remove every subscription of `listener` on `name`.
    pub fn remove_notification_listener(
        &self,
        name: &ObjectName,
        listener: &Arc<dyn NotificationListener>,
    ) -> Result<usize> {
        self.registry(name)?.unsubscribe_listener(listener)
    }

    /// Registered names, optionally restricted to `domain`, sorted.
    pub fn query_names(&self, domain: Option<&str>) -> Vec<ObjectName> {
        let mut names: Vec<ObjectName> = self
            .registries
            .iter()
            .filter(|entry| domain.is_none() || domain == Some(entry.key().domain()))
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Number of registered registries.
    pub fn count(&self) -> usize {
        self.registries.len()
    }
}

impl Default for ManagementAgent {
    fn default() -> Self {
        Self::new(PLATFORM_DOMAIN)
    }
}

impl fmt::Debug for ManagementAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagementAgent")
            .field("default_domain", &self.default_domain)
            .field("registered", &self.count())
            .finish()
    }
}
