// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Attributes: named, typed, optionally readable/writable properties.

mod bean;
mod descriptor;
mod registry;

pub use bean::{PropertyAccessors, PropertySource};
pub use descriptor::{AttributeBuilder, AttributeDescriptor, Getter, NullPolicy, Setter};
pub use registry::AttributeRegistry;
