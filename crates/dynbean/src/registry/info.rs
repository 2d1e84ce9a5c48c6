// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema manifest of a registry.

use crate::descriptor::Descriptor;
use crate::notification::NotificationDescriptor;
use crate::open_type::{OpenType, OpenValue};
use crate::operation::{Impact, ParameterDescriptor};
use std::fmt;

/// Schema entry of one attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeInfo {
    pub name: String,
    pub description: String,
    pub open_type: OpenType,
    /// Native type name the attribute was declared with.
    pub original_type: String,
    pub readable: bool,
    pub writable: bool,
    pub nullable: bool,
    pub descriptor: Descriptor,
}

/// Schema entry of one operation overload.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationInfo {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: OpenType,
    pub original_return_type: String,
    pub impact: Impact,
    pub descriptor: Descriptor,
}

impl OperationInfo {
    /// Parameter type tags, in order.
    pub fn signature(&self) -> Vec<String> {
        self.parameters
            .iter()
            .map(|p| p.type_tag().to_string())
            .collect()
    }
}

impl fmt::Display for OperationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| format!("{}: {}", p.name(), p.type_tag()))
            .collect();
        write!(
            f,
            "{}({}) -> {}",
            self.name,
            params.join(", "),
            self.return_type
        )
    }
}

/// Full manifest of a built registry.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryInfo {
    pub class_name: String,
    pub description: String,
    /// Ordered by name.
    pub attributes: Vec<AttributeInfo>,
    /// Ordered by name, then signature.
    pub operations: Vec<OperationInfo>,
    pub notifications: Vec<NotificationDescriptor>,
    pub descriptor: Descriptor,
}

impl RegistryInfo {
    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Every overload named `name`.
    pub fn operations_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a OperationInfo> {
        self.operations.iter().filter(move |o| o.name == name)
    }

    pub fn notification(&self, name: &str) -> Option<&NotificationDescriptor> {
        self.notifications.iter().find(|n| n.name() == name)
    }
}

/// A named attribute value, the unit of bulk get/set.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: OpenValue,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<OpenValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}
