// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversions between native Rust values and open values.

use super::{OpenType, OpenValue, PrimitiveKind, RecordValue, TableValue};
use crate::error::{Error, Result};
use std::time::SystemTime;

/// Convert a native value into an open value.
pub trait IntoOpenValue {
    fn into_open_value(self) -> OpenValue;
}

/// Convert an open value back into a native value.
pub trait FromOpenValue: Sized {
    /// # Errors
    ///
    /// `NullValue` for a null into a non-optional type, `TypeMismatch` for
    /// any other non-conforming value.
    fn from_open_value(value: &OpenValue) -> Result<Self>;
}

/// Native types whose open type is known statically.
pub trait OpenTyped {
    /// Open type of the native type.
    fn open_type() -> OpenType;

    /// `true` for types that accept null (`Option<T>`).
    fn nullable() -> bool {
        false
    }
}

fn mismatch(expected: &str, got: &OpenValue) -> Error {
    if got.is_null() {
        Error::NullValue {
            slot: expected.to_string(),
        }
    } else {
        Error::TypeMismatch {
            expected: expected.to_string(),
            got: got.type_tag().to_string(),
        }
    }
}

macro_rules! impl_scalar {
    ($($ty:ty => $variant:ident, $kind:ident);* $(;)?) => {
        $(
            impl IntoOpenValue for $ty {
                fn into_open_value(self) -> OpenValue {
                    OpenValue::$variant(self)
                }
            }

            impl FromOpenValue for $ty {
                fn from_open_value(value: &OpenValue) -> Result<Self> {
                    match value {
                        OpenValue::$variant(v) => Ok(v.clone()),
                        other => Err(mismatch(PrimitiveKind::$kind.type_tag(), other)),
                    }
                }
            }

            impl OpenTyped for $ty {
                fn open_type() -> OpenType {
                    OpenType::Primitive(PrimitiveKind::$kind)
                }
            }
        )*
    };
}

impl_scalar! {
    bool => Bool, Bool;
    char => Char, Char;
    i8 => I8, I8;
    i16 => I16, I16;
    i32 => I32, I32;
    i64 => I64, I64;
    u8 => U8, U8;
    u16 => U16, U16;
    u32 => U32, U32;
    u64 => U64, U64;
    f32 => F32, F32;
    f64 => F64, F64;
    String => String, String;
    SystemTime => Timestamp, Timestamp;
}

impl IntoOpenValue for &str {
    fn into_open_value(self) -> OpenValue {
        OpenValue::String(self.to_string())
    }
}

impl OpenTyped for &str {
    fn open_type() -> OpenType {
        OpenType::STRING
    }
}

impl IntoOpenValue for () {
    fn into_open_value(self) -> OpenValue {
        OpenValue::Void
    }
}

impl FromOpenValue for () {
    fn from_open_value(value: &OpenValue) -> Result<Self> {
        match value {
            OpenValue::Void | OpenValue::Null => Ok(()),
            other => Err(mismatch("void", other)),
        }
    }
}

impl OpenTyped for () {
    fn open_type() -> OpenType {
        OpenType::VOID
    }
}

impl<T: IntoOpenValue> IntoOpenValue for Option<T> {
    fn into_open_value(self) -> OpenValue {
        match self {
            Some(v) => v.into_open_value(),
            None => OpenValue::Null,
        }
    }
}

impl<T: FromOpenValue> FromOpenValue for Option<T> {
    fn from_open_value(value: &OpenValue) -> Result<Self> {
        match value {
            OpenValue::Null => Ok(None),
            other => T::from_open_value(other).map(Some),
        }
    }
}

impl<T: OpenTyped> OpenTyped for Option<T> {
    fn open_type() -> OpenType {
        T::open_type()
    }

    fn nullable() -> bool {
        true
    }
}

// Erased values pass through unchanged.
impl IntoOpenValue for OpenValue {
    fn into_open_value(self) -> OpenValue {
        self
    }
}

impl FromOpenValue for OpenValue {
    fn from_open_value(value: &OpenValue) -> Result<Self> {
        Ok(value.clone())
    }
}

impl IntoOpenValue for RecordValue {
    fn into_open_value(self) -> OpenValue {
        OpenValue::Record(self)
    }
}

impl FromOpenValue for RecordValue {
    fn from_open_value(value: &OpenValue) -> Result<Self> {
        match value {
            OpenValue::Record(r) => Ok(r.clone()),
            other => Err(mismatch("record", other)),
        }
    }
}

impl IntoOpenValue for TableValue {
    fn into_open_value(self) -> OpenValue {
        OpenValue::Table(self)
    }
}

impl FromOpenValue for TableValue {
    fn from_open_value(value: &OpenValue) -> Result<Self> {
        match value {
            OpenValue::Table(t) => Ok(t.clone()),
            other => Err(mismatch("table", other)),
        }
    }
}

impl From<bool> for OpenValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for OpenValue {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<i64> for OpenValue {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<u64> for OpenValue {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<f64> for OpenValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<String> for OpenValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for OpenValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<RecordValue> for OpenValue {
    fn from(v: RecordValue) -> Self {
        Self::Record(v)
    }
}

impl From<TableValue> for OpenValue {
    fn from(v: TableValue) -> Self {
        Self::Table(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_shares_type_with_inner() {
        assert_eq!(<Option<i32>>::open_type(), i32::open_type());
        assert!(<Option<i32>>::nullable());
        assert!(!i32::nullable());
    }

    #[test]
    fn null_into_plain_scalar_is_null_error() {
        let err = i32::from_open_value(&OpenValue::Null).unwrap_err();
        assert!(matches!(err, Error::NullValue { .. }));
        assert_eq!(<Option<i32>>::from_open_value(&OpenValue::Null).ok(), Some(None));
    }

    #[test]
    fn wrong_kind_is_mismatch() {
        let err = String::from_open_value(&OpenValue::I32(4)).unwrap_err();
        match err {
            Error::TypeMismatch { expected, got } => {
                assert_eq!(expected, "string");
                assert_eq!(got, "i32");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn scalars_convert() {
        assert_eq!("ab".into_open_value(), OpenValue::String("ab".into()));
        assert_eq!(().into_open_value(), OpenValue::Void);
        assert_eq!(Some(3u8).into_open_value(), OpenValue::U8(3));
        assert_eq!(u16::from_open_value(&OpenValue::U16(9)).ok(), Some(9));
    }
}
