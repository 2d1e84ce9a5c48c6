// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # dynbean - Dynamic Management Registries
//!
//! Expose a running component to management tooling without a compile-time
//! interface: attributes bound to getter/setter closures, overloaded
//! operations bound to plain functions, and notifications delivered
//! asynchronously to subscribed listeners. Every value crossing the boundary
//! is an open value (scalar, record or table) described by an open type.
//!
//! ## Quick Start
//!
//! ```rust
//! use dynbean::{ManagementRegistry, OpenValue, Result};
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let age = Arc::new(AtomicI32::new(12));
//!     let (r, w) = (age.clone(), age.clone());
//!
//!     let registry = ManagementRegistry::builder()
//!         .class_name("Person")
//!         .attribute(
//!             "age",
//!             "Age in years",
//!             move || r.load(Ordering::SeqCst),
//!             move |v: i32| w.store(v, Ordering::SeqCst),
//!         )
//!         .operation(
//!             "concatenate",
//!             "Join two strings",
//!             &["arg1", "arg2"],
//!             |a: String, b: String| format!("{}{}", a, b),
//!         )
//!         .attribute_change_notifications()
//!         .build()?;
//!
//!     registry.set_value("age", OpenValue::I32(21))?;
//!     let joined = registry.invoke_operation(
//!         "concatenate",
//!         &["a".into(), "b".into()],
//!         &["string", "string"],
//!     )?;
//!     assert_eq!(joined, OpenValue::from("ab"));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                    ManagementAgent (ObjectName -> registry)          |
//! +---------------------------------------------------------------------+
//! |                        ManagementRegistry                           |
//! |   AttributeRegistry | OperationRegistry | ChangeNotifier            |
//! +---------------------------------------------------------------------+
//! |   AttributeDescriptor | OperationDescriptor | RecordWriter/TableWriter|
//! +---------------------------------------------------------------------+
//! |          Open types: OpenType, OpenValue, TypeMapper                |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`registry`] - The aggregate and its builder (start here)
//! - [`attribute`] - Attribute descriptors, null policy, bean properties
//! - [`operation`] - Operation descriptors, overloads, late binding
//! - [`writer`] - Record and table projections of native items
//! - [`notification`] - Events, listeners, filters, executors
//! - [`open_type`] - Open type taxonomy and native conversions
//! - [`agent`] - Name-addressable registration point
//! - [`config`] - Constants and runtime configuration

/// Name-addressable registration of registries.
pub mod agent;
/// Attributes bound to accessor closures.
pub mod attribute;
/// Global configuration (constants, runtime config, YAML loader).
pub mod config;
/// Descriptor metadata attached to every schema element.
pub mod descriptor;
/// Crate error type.
pub mod error;
/// Notification events, listeners, filters and delivery.
pub mod notification;
/// Open type taxonomy: scalars, records, tables.
pub mod open_type;
/// Operations bound to functions or late-bound methods.
pub mod operation;
/// The management registry aggregate.
pub mod registry;
/// Record and table writers.
pub mod writer;

pub use agent::{ManagementAgent, ObjectName};
pub use attribute::{AttributeDescriptor, NullPolicy, PropertySource};
pub use config::RegistryConfig;
pub use descriptor::Descriptor;
pub use error::{BoxError, Error, Result};
pub use notification::{Notification, NotificationListener};
pub use open_type::{OpenType, OpenValue, RecordValue, TableValue, TypeMapper};
pub use operation::{Impact, MethodTable, OperationDescriptor, ParameterDescriptor};
pub use registry::{Attribute, ManagementRegistry, RegistryInfo};
pub use writer::{RecordWriter, TableWriter};

/// dynbean version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
