// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Name-keyed attribute table.

use super::AttributeDescriptor;
use crate::registry::AttributeInfo;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Attributes keyed by name, in name order.
#[derive(Debug, Default, Clone)]
pub struct AttributeRegistry {
    attributes: BTreeMap<String, Arc<AttributeDescriptor>>,
}

impl AttributeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute. A later attribute with the same name replaces the
    /// earlier one, which is returned.
    pub fn add(&mut self, attribute: AttributeDescriptor) -> Option<Arc<AttributeDescriptor>> {
        let replaced = self
            .attributes
            .insert(attribute.name().to_string(), Arc::new(attribute));
        if let Some(old) = &replaced {
            log::debug!("[AttributeRegistry::add] {} replaced", old.name());
        }
        replaced
    }

    pub fn find(&self, name: &str) -> Option<&Arc<AttributeDescriptor>> {
        self.attributes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<AttributeDescriptor>> {
        self.attributes.values()
    }

    /// Schema entries, in name order.
    pub fn infos(&self) -> Vec<AttributeInfo> {
        self.attributes.values().map(|a| a.info()).collect()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
