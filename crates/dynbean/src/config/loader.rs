// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! YAML registry configuration loader.
//!
//! # Example YAML
//!
//! ```yaml
//! # registry.yaml
//! notifier:
//!   workers: 4
//!   thread_name: mgmt-notify
//! null_policy: DEFAULT
//! immutable_info: true
//! ```
//!
//! Every key is optional; missing keys keep their `RegistryConfig::default()`
//! value.

use super::RegistryConfig;
use crate::attribute::NullPolicy;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// YAML registry configuration loader.
pub struct ConfigLoader;

/// Root YAML document structure.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct YamlRegistryDocument {
    /// Notification delivery settings.
    pub notifier: Option<YamlNotifier>,

    /// Null policy: REJECT or DEFAULT
    pub null_policy: Option<String>,

    /// Mark registry metadata immutable.
    pub immutable_info: Option<bool>,
}

/// Notifier section.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct YamlNotifier {
    /// Worker thread count.
    pub workers: Option<usize>,

    /// Worker thread name prefix.
    pub thread_name: Option<String>,
}

impl ConfigLoader {
    /// Load and validate a registry configuration file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<RegistryConfig> {
        let path = path.as_ref();
        log::debug!("[ConfigLoader::load_from_file] {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parse and validate a registry configuration document.
    pub fn parse_yaml(yaml_content: &str) -> Result<RegistryConfig> {
        let doc: YamlRegistryDocument = if yaml_content.trim().is_empty() {
            YamlRegistryDocument::default()
        } else {
            serde_yaml::from_str(yaml_content)
                .map_err(|e| Error::Config(format!("Failed to parse YAML: {}", e)))?
        };
        Self::document_to_config(&doc)
    }

    /// Convert a parsed document, filling gaps with defaults.
    pub fn document_to_config(doc: &YamlRegistryDocument) -> Result<RegistryConfig> {
        let mut config = RegistryConfig::default();

        if let Some(notifier) = &doc.notifier {
            if let Some(workers) = notifier.workers {
                config.notifier.workers = workers;
            }
            if let Some(name) = &notifier.thread_name {
                config.notifier.thread_name = name.clone();
            }
        }

        if let Some(policy) = &doc.null_policy {
            config.null_policy = match policy.to_uppercase().as_str() {
                "REJECT" => NullPolicy::Reject,
                "DEFAULT" => NullPolicy::Default,
                other => return Err(Error::Config(format!("Invalid null policy: {}", other))),
            };
        }

        if let Some(immutable) = doc.immutable_info {
            config.immutable_info = immutable;
        }

        config.validate()?;
        Ok(config)
    }
}
