// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scalar kinds of the open type taxonomy.

use super::OpenValue;
use std::time::UNIX_EPOCH;

/// Scalar kinds representable by the open type taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Void,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Timestamp,
}

impl PrimitiveKind {
    /// Every scalar kind, in declaration order.
    pub const ALL: [PrimitiveKind; 15] = [
        Self::Void,
        Self::Bool,
        Self::Char,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::String,
        Self::Timestamp,
    ];

    /// Canonical type tag used in dispatch signatures.
    pub fn type_tag(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "string",
            Self::Timestamp => "timestamp",
        }
    }

    /// Parse a canonical type tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.type_tag() == tag)
    }

    /// Value substituted for a null under `NullPolicy::Default`.
    pub fn default_value(self) -> OpenValue {
        match self {
            Self::Void => OpenValue::Void,
            Self::Bool => OpenValue::Bool(false),
            Self::Char => OpenValue::Char('\0'),
            Self::I8 => OpenValue::I8(0),
            Self::I16 => OpenValue::I16(0),
            Self::I32 => OpenValue::I32(0),
            Self::I64 => OpenValue::I64(0),
            Self::U8 => OpenValue::U8(0),
            Self::U16 => OpenValue::U16(0),
            Self::U32 => OpenValue::U32(0),
            Self::U64 => OpenValue::U64(0),
            Self::F32 => OpenValue::F32(0.0),
            Self::F64 => OpenValue::F64(0.0),
            Self::String => OpenValue::String(String::new()),
            Self::Timestamp => OpenValue::Timestamp(UNIX_EPOCH),
        }
    }

    /// Check if this is a numeric kind.
    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            Self::Void | Self::Bool | Self::Char | Self::String | Self::Timestamp
        )
    }
}
