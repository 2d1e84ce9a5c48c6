// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for registry construction and dispatch.

use std::fmt;

/// Boxed error returned by user-supplied accessors, extractors and invokers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for dynbean operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or dispatching against a management registry.
///
/// Build-time variants (type resolution, schema, late binding) abort registry
/// construction. Call-time variants are scoped to the single call that raised
/// them.
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Build-time Errors
    // ========================================================================
    /// Type could not be recovered from an erased value (e.g. a getter
    /// returning `OpenValue`). Supply the open type explicitly.
    TypeInference { type_name: String },
    /// Native type has no open type mapping.
    UnsupportedType { type_name: String },
    /// Record or table schema is malformed (duplicate fields, bad index...).
    InvalidSchema(String),
    /// Attribute/operation descriptor is incomplete or inconsistent.
    InvalidDescriptor(String),
    /// Late-bound target has no method with the requested name and signature.
    NoSuchOperation { name: String, signature: Vec<String> },
    /// Late-bound target has several methods matching name and signature.
    AmbiguousOperation {
        name: String,
        signature: Vec<String>,
        matches: usize,
    },

    // ========================================================================
    // Writer Errors
    // ========================================================================
    /// Two table rows share the same index projection.
    DuplicateKey { table: String, key: String },
    /// A record field extractor failed.
    FieldExtraction {
        record: String,
        field: String,
        source: BoxError,
    },

    // ========================================================================
    // Dispatch Errors
    // ========================================================================
    /// No attribute registered under this name.
    AttributeNotFound(String),
    /// No operation registered under this name and signature.
    OperationNotFound {
        name: String,
        signature: Vec<String>,
        /// `true` when the name exists with a different signature.
        name_known: bool,
    },
    /// Bound invoker failed while executing.
    Invocation { operation: String, source: BoxError },
    /// Argument list does not fit the operation's parameters.
    InvalidArgument {
        operation: String,
        index: Option<usize>,
        reason: String,
    },

    // ========================================================================
    // Attribute Access Errors
    // ========================================================================
    /// Getter or setter failed.
    Accessor { attribute: String, source: BoxError },
    /// Attribute has no getter.
    AttributeNotReadable(String),
    /// Attribute has no setter.
    ReadOnlyAttribute(String),
    /// Null written into a non-nullable slot whose policy rejects nulls.
    NullValue { slot: String },
    /// Value does not conform to the expected open type.
    TypeMismatch { expected: String, got: String },

    // ========================================================================
    // Notification / Agent Errors
    // ========================================================================
    /// Subscription id or listener is not registered.
    ListenerNotFound,
    /// Object name already bound in the management agent.
    AlreadyRegistered(String),
    /// Object name not bound in the management agent.
    InstanceNotFound(String),
    /// Object name could not be parsed.
    MalformedObjectName { name: String, reason: String },

    // ========================================================================
    // Other Errors
    // ========================================================================
    /// Configuration is invalid or could not be parsed.
    Config(String),
    /// I/O error with underlying cause.
    Io(std::io::Error),
}

impl Error {
    /// Returns `true` for errors that can only happen while building.
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            Self::TypeInference { .. }
                | Self::UnsupportedType { .. }
                | Self::InvalidSchema(_)
                | Self::InvalidDescriptor(_)
                | Self::NoSuchOperation { .. }
                | Self::AmbiguousOperation { .. }
        )
    }
}

impl fmt::Display for Error {
    // @audit-ok: Simple pattern matching - error message dispatch table
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Build-time
            Self::TypeInference { type_name } => write!(
                f,
                "Cannot infer open type from {} (supply the type explicitly)",
                type_name
            ),
            Self::UnsupportedType { type_name } => {
                write!(f, "Unsupported type: {} has no open type mapping", type_name)
            }
            Self::InvalidSchema(msg) => write!(f, "Invalid schema: {}", msg),
            Self::InvalidDescriptor(msg) => write!(f, "Invalid descriptor: {}", msg),
            Self::NoSuchOperation { name, signature } => write!(
                f,
                "No method {}({}) on target",
                name,
                signature.join(",")
            ),
            Self::AmbiguousOperation {
                name,
                signature,
                matches,
            } => write!(
                f,
                "Ambiguous method {}({}): {} candidates",
                name,
                signature.join(","),
                matches
            ),
            // Writers
            Self::DuplicateKey { table, key } => {
                write!(f, "Duplicate index key {} in table {}", key, table)
            }
            Self::FieldExtraction {
                record,
                field,
                source,
            } => write!(
                f,
                "Failed to extract field {} of record {}: {}",
                field, record, source
            ),
            // Dispatch
            Self::AttributeNotFound(name) => write!(f, "Attribute {} not found", name),
            Self::OperationNotFound {
                name,
                signature,
                name_known,
            } => {
                if *name_known {
                    write!(
                        f,
                        "Operation {} exists but not with signature ({})",
                        name,
                        signature.join(",")
                    )
                } else {
                    write!(
                        f,
                        "No operation named {} (requested signature ({}))",
                        name,
                        signature.join(",")
                    )
                }
            }
            Self::Invocation { operation, source } => {
                write!(f, "Operation {} failed: {}", operation, source)
            }
            Self::InvalidArgument {
                operation,
                index,
                reason,
            } => match index {
                Some(i) => write!(f, "Invalid argument {} for {}: {}", i, operation, reason),
                None => write!(f, "Invalid arguments for {}: {}", operation, reason),
            },
            // Attribute access
            Self::Accessor { attribute, source } => {
                write!(f, "Accessor for attribute {} failed: {}", attribute, source)
            }
            Self::AttributeNotReadable(name) => write!(f, "Attribute {} is not readable", name),
            Self::ReadOnlyAttribute(name) => write!(f, "Attribute {} is read-only", name),
            Self::NullValue { slot } => write!(f, "Null value not allowed for {}", slot),
            Self::TypeMismatch { expected, got } => {
                write!(f, "Type mismatch: expected {}, got {}", expected, got)
            }
            // Notification / agent
            Self::ListenerNotFound => write!(f, "Listener not found"),
            Self::AlreadyRegistered(name) => write!(f, "Instance already registered: {}", name),
            Self::InstanceNotFound(name) => write!(f, "Instance not found: {}", name),
            Self::MalformedObjectName { name, reason } => {
                write!(f, "Malformed object name '{}': {}", name, reason)
            }
            // Other
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FieldExtraction { source, .. }
            | Self::Invocation { source, .. }
            | Self::Accessor { source, .. } => Some(source.as_ref()),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
