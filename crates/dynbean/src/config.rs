// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! dynbean Global Configuration
//!
//! Compile-time constants shared by every module, plus the runtime
//! `RegistryConfig` consumed by `ManagementRegistryBuilder`.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: notification type names, descriptor field names,
//!   worker pool defaults
//! - **Level 2 (Dynamic)**: `RegistryConfig`, optionally loaded from YAML
//!   (`config-loaders` feature)
//!
//! # Example
//!
//! ```ignore
//! use dynbean::config::*;
//!
//! let config = RegistryConfig::default()
//!     .with_workers(4)
//!     .with_null_policy(NullPolicy::Default);
//! let registry = ManagementRegistry::builder().config(config).build()?;
//! ```

#[cfg(feature = "config-loaders")]
pub mod loader;

use crate::attribute::NullPolicy;
use crate::error::{Error, Result};

// =======================================================================
// Notification types
// =======================================================================

/// Type of the notification emitted when an attribute value changes.
pub const ATTRIBUTE_CHANGE_TYPE: &str = "attribute.change";

/// Name of the notification descriptor for attribute change events.
pub const ATTRIBUTE_CHANGE_NOTIFICATION: &str = "AttributeChangeNotification";

/// Description of the attribute change notification descriptor.
pub const ATTRIBUTE_CHANGE_DESCRIPTION: &str =
    "This notification is emitted when an attribute value changes";

// =======================================================================
// Registry defaults
// =======================================================================

/// Class name reported by a registry that did not set one.
pub const DEFAULT_CLASS_NAME: &str = "ManagementRegistry";

/// Default number of notification worker threads.
pub const DEFAULT_NOTIFIER_WORKERS: usize = 2;

/// Upper bound on notification worker threads.
pub const MAX_NOTIFIER_WORKERS: usize = 64;

/// Default notification worker thread name prefix (`<prefix>-<n>`).
pub const DEFAULT_NOTIFIER_THREAD_NAME: &str = "dynbean-notify";

/// Prefix of generated parameter names (`p0`, `p1`, ...).
pub const DEFAULT_PARAM_PREFIX: &str = "p";

// =======================================================================
// Descriptor field names
// =======================================================================

/// Well-known descriptor field names.
pub mod fields {
    pub const OPEN_TYPE: &str = "openType";
    pub const ORIGINAL_TYPE: &str = "originalType";
    pub const DEFAULT_VALUE: &str = "defaultValue";
    pub const DEPRECATED: &str = "deprecated";
    pub const DESCRIPTION_RESOURCE_BUNDLE_BASE_NAME: &str = "descriptionResourceBundleBaseName";
    pub const DESCRIPTION_RESOURCE_KEY: &str = "descriptionResourceKey";
    pub const DISPLAY_NAME: &str = "displayName";
    pub const ENABLED: &str = "enabled";
    pub const EXCEPTIONS: &str = "exceptions";
    pub const IMMUTABLE_INFO: &str = "immutableInfo";
    pub const INFO_TIMEOUT: &str = "infoTimeout";
    pub const INTERFACE_CLASS_NAME: &str = "interfaceClassName";
    pub const LEGAL_VALUES: &str = "legalValues";
    pub const LOCALE: &str = "locale";
    pub const MAX_VALUE: &str = "maxValue";
    pub const METRIC_TYPE: &str = "metricType";
    pub const MIN_VALUE: &str = "minValue";
    pub const SEVERITY: &str = "severity";
    pub const SINCE: &str = "since";
    pub const UNITS: &str = "units";
}

// =======================================================================
// Runtime configuration
// =======================================================================

/// Notification delivery settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Worker threads of the default pool.
    pub workers: usize,
    /// Worker thread name prefix.
    pub thread_name: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_NOTIFIER_WORKERS,
            thread_name: DEFAULT_NOTIFIER_THREAD_NAME.to_string(),
        }
    }
}

impl NotifierConfig {
    /// Check the settings.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 || self.workers > MAX_NOTIFIER_WORKERS {
            return Err(Error::Config(format!(
                "notifier workers must be in 1..={}, got {}",
                MAX_NOTIFIER_WORKERS, self.workers
            )));
        }
        if self.thread_name.is_empty() {
            return Err(Error::Config("notifier thread name is empty".into()));
        }
        Ok(())
    }
}

/// Registry-wide settings applied by `ManagementRegistryBuilder`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistryConfig {
    pub notifier: NotifierConfig,
    /// Null policy of attributes built through the registry builder's
    /// convenience methods.
    pub null_policy: NullPolicy,
    /// Mark the registry's metadata as immutable.
    pub immutable_info: bool,
}

impl RegistryConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.notifier.workers = workers;
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.notifier.thread_name = name.into();
        self
    }

    pub fn with_null_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }

    pub fn with_immutable_info(mut self, immutable: bool) -> Self {
        self.immutable_info = immutable;
        self
    }

    /// Check the settings.
    pub fn validate(&self) -> Result<()> {
        self.notifier.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RegistryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.notifier.workers, DEFAULT_NOTIFIER_WORKERS);
        assert_eq!(config.null_policy, NullPolicy::Reject);
    }

    #[test]
    fn zero_workers_rejected() {
        let err = RegistryConfig::default().with_workers(0).validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn builders_chain() {
        let config = RegistryConfig::default()
            .with_workers(4)
            .with_thread_name("mgmt")
            .with_null_policy(NullPolicy::Default)
            .with_immutable_info(true);
        assert_eq!(config.notifier.workers, 4);
        assert_eq!(config.notifier.thread_name, "mgmt");
        assert!(config.immutable_info);
    }
}
