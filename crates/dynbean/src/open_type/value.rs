// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Open values: scalars, records and tables.

use super::{OpenType, PrimitiveKind, RecordType, TableType};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A value of the open type taxonomy.
///
/// Equality and hashing are total (floats compare by bit pattern), so any
/// value can be part of a table index key.
#[derive(Debug, Clone)]
pub enum OpenValue {
    Null,
    Void,

    // Primitives
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Timestamp(SystemTime),

    // Composites
    Record(RecordValue),
    Table(TableValue),
}

impl OpenValue {
    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Scalar kind of this value (`None` for null and composites).
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        let kind = match self {
            Self::Void => PrimitiveKind::Void,
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::Char(_) => PrimitiveKind::Char,
            Self::I8(_) => PrimitiveKind::I8,
            Self::I16(_) => PrimitiveKind::I16,
            Self::I32(_) => PrimitiveKind::I32,
            Self::I64(_) => PrimitiveKind::I64,
            Self::U8(_) => PrimitiveKind::U8,
            Self::U16(_) => PrimitiveKind::U16,
            Self::U32(_) => PrimitiveKind::U32,
            Self::U64(_) => PrimitiveKind::U64,
            Self::F32(_) => PrimitiveKind::F32,
            Self::F64(_) => PrimitiveKind::F64,
            Self::String(_) => PrimitiveKind::String,
            Self::Timestamp(_) => PrimitiveKind::Timestamp,
            Self::Null | Self::Record(_) | Self::Table(_) => return None,
        };
        Some(kind)
    }

    /// Type tag of the value, `"null"` for null.
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Null => "null",
            Self::Record(r) => r.record_type().name(),
            Self::Table(t) => t.table_type().name(),
            other => other.primitive_kind().map_or("null", PrimitiveKind::type_tag),
        }
    }

    /// Open type of the value (`None` for null).
    pub fn open_type(&self) -> Option<OpenType> {
        match self {
            Self::Null => None,
            Self::Record(r) => Some(OpenType::Record(Arc::clone(r.record_type()))),
            Self::Table(t) => Some(OpenType::Table(Arc::clone(t.table_type()))),
            other => other.primitive_kind().map(OpenType::Primitive),
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i32.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as record.
    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Self::Record(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as table.
    pub fn as_table(&self) -> Option<&TableValue> {
        match self {
            Self::Table(v) => Some(v),
            _ => None,
        }
    }
}

impl PartialEq for OpenValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) | (Self::Void, Self::Void) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a.to_bits() == b.to_bits(),
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Table(a), Self::Table(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for OpenValue {}

impl Hash for OpenValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null | Self::Void => {}
            Self::Bool(v) => v.hash(state),
            Self::Char(v) => v.hash(state),
            Self::I8(v) => v.hash(state),
            Self::I16(v) => v.hash(state),
            Self::I32(v) => v.hash(state),
            Self::I64(v) => v.hash(state),
            Self::U8(v) => v.hash(state),
            Self::U16(v) => v.hash(state),
            Self::U32(v) => v.hash(state),
            Self::U64(v) => v.hash(state),
            Self::F32(v) => v.to_bits().hash(state),
            Self::F64(v) => v.to_bits().hash(state),
            Self::String(v) => v.hash(state),
            Self::Timestamp(v) => v.hash(state),
            Self::Record(v) => v.hash(state),
            Self::Table(v) => v.hash(state),
        }
    }
}

impl fmt::Display for OpenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Void => f.write_str("void"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Char(v) => write!(f, "{}", v),
            Self::I8(v) => write!(f, "{}", v),
            Self::I16(v) => write!(f, "{}", v),
            Self::I32(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::U8(v) => write!(f, "{}", v),
            Self::U16(v) => write!(f, "{}", v),
            Self::U32(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
            Self::F32(v) => write!(f, "{}", v),
            Self::F64(v) => write!(f, "{}", v),
            Self::String(v) => f.write_str(v),
            Self::Timestamp(v) => match v.duration_since(UNIX_EPOCH) {
                Ok(d) => write!(f, "{}ms", d.as_millis()),
                Err(_) => f.write_str("before-epoch"),
            },
            Self::Record(v) => write!(f, "{}", v),
            Self::Table(v) => write!(f, "{}[{} rows]", v.table_type().name(), v.len()),
        }
    }
}

/// Positional record value matching its `RecordType` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordValue {
    record_type: Arc<RecordType>,
    values: Vec<OpenValue>,
}

impl RecordValue {
    /// Create a record value from positional field values.
    ///
    /// # Errors
    ///
    /// `InvalidSchema` on a field count mismatch, `TypeMismatch` when a
    /// value does not conform to its field type.
    pub fn new(record_type: Arc<RecordType>, values: Vec<OpenValue>) -> Result<Self> {
        if values.len() != record_type.len() {
            return Err(Error::InvalidSchema(format!(
                "record {} expects {} values, got {}",
                record_type.name(),
                record_type.len(),
                values.len()
            )));
        }
        for (field, value) in record_type.fields().iter().zip(&values) {
            if !field.open_type.is_value(value) {
                return Err(Error::TypeMismatch {
                    expected: field.open_type.type_tag().to_string(),
                    got: value.type_tag().to_string(),
                });
            }
        }
        Ok(Self {
            record_type,
            values,
        })
    }

    /// Create a record value from `(name, value)` pairs, in any order.
    pub fn from_named<I, K>(record_type: Arc<RecordType>, items: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, OpenValue)>,
        K: AsRef<str>,
    {
        let mut slots: Vec<Option<OpenValue>> = vec![None; record_type.len()];
        for (name, value) in items {
            let name = name.as_ref();
            let pos = record_type.field_index(name).ok_or_else(|| {
                Error::InvalidSchema(format!(
                    "record {} has no field {}",
                    record_type.name(),
                    name
                ))
            })?;
            slots[pos] = Some(value);
        }
        let mut values = Vec::with_capacity(slots.len());
        for (slot, field) in slots.into_iter().zip(record_type.fields()) {
            match slot {
                Some(v) => values.push(v),
                None => {
                    return Err(Error::InvalidSchema(format!(
                        "record {} is missing field {}",
                        record_type.name(),
                        field.name
                    )))
                }
            }
        }
        Self::new(record_type, values)
    }

    /// Assemble without validation; callers already checked conformance.
    pub(crate) fn from_parts(record_type: Arc<RecordType>, values: Vec<OpenValue>) -> Self {
        Self {
            record_type,
            values,
        }
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    /// Value of a named field.
    pub fn get(&self, name: &str) -> Option<&OpenValue> {
        self.record_type
            .field_index(name)
            .and_then(|i| self.values.get(i))
    }

    /// Field values in schema order.
    pub fn values(&self) -> &[OpenValue] {
        &self.values
    }

    /// Field names in schema order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.record_type.field_names()
    }

    /// `(name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OpenValue)> {
        self.record_type.field_names().zip(self.values.iter())
    }

    fn index_key(&self, positions: &[usize]) -> IndexKey {
        IndexKey(positions.iter().map(|&i| self.values[i].clone()).collect())
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.record_type.name())?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        f.write_str("}")
    }
}

/// Projection of a row onto its table's index fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey(pub Vec<OpenValue>);

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", v)?;
        }
        f.write_str(")")
    }
}

/// Table of records keyed by their index projection.
///
/// Row iteration order is unspecified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableValue {
    table_type: Arc<TableType>,
    rows: HashMap<IndexKey, RecordValue>,
}

impl TableValue {
    /// Create an empty table.
    pub fn new(table_type: Arc<TableType>) -> Self {
        Self {
            table_type,
            rows: HashMap::new(),
        }
    }

    pub fn table_type(&self) -> &Arc<TableType> {
        &self.table_type
    }

    /// Insert a row.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` if the row is not of the table's row type,
    /// `DuplicateKey` if a row with the same index projection exists.
    pub fn put(&mut self, row: RecordValue) -> Result<()> {
        if row.record_type() != self.table_type.row_type() {
            return Err(Error::TypeMismatch {
                expected: self.table_type.row_type().name().to_string(),
                got: row.record_type().name().to_string(),
            });
        }
        let key = row.index_key(self.table_type.index_positions());
        if self.rows.contains_key(&key) {
            return Err(Error::DuplicateKey {
                table: self.table_type.name().to_string(),
                key: key.to_string(),
            });
        }
        self.rows.insert(key, row);
        Ok(())
    }

    /// Look up a row by its index values.
    pub fn get(&self, key: &[OpenValue]) -> Option<&RecordValue> {
        self.rows.get(&IndexKey(key.to_vec()))
    }

    /// Check if a row with this index exists.
    pub fn contains_key(&self, key: &[OpenValue]) -> bool {
        self.rows.contains_key(&IndexKey(key.to_vec()))
    }

    /// Rows, in unspecified order.
    pub fn rows(&self) -> impl Iterator<Item = &RecordValue> {
        self.rows.values()
    }

    /// Index keys, in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &IndexKey> {
        self.rows.keys()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Hash for TableValue {
    // Order-independent: only the type and the row count contribute.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.table_type.hash(state);
        self.rows.len().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_type::FieldType;

    fn address() -> Arc<RecordType> {
        Arc::new(
            RecordType::new(
                "Address",
                "Street address",
                vec![
                    FieldType::new("city", OpenType::STRING),
                    FieldType::new("state", OpenType::STRING),
                ],
            )
            .expect("valid record"),
        )
    }

    fn row(city: &str, state: &str) -> RecordValue {
        RecordValue::new(
            address(),
            vec![
                OpenValue::String(city.into()),
                OpenValue::String(state.into()),
            ],
        )
        .expect("valid row")
    }

    #[test]
    fn float_equality_is_total() {
        assert_eq!(OpenValue::F64(f64::NAN), OpenValue::F64(f64::NAN));
        assert_ne!(OpenValue::F64(0.0), OpenValue::F64(-0.0));
        assert_ne!(OpenValue::I32(1), OpenValue::I64(1));
    }

    #[test]
    fn record_field_access() {
        let r = row("Boston", "MA");
        assert_eq!(r.get("city").and_then(|v| v.as_str()), Some("Boston"));
        assert_eq!(r.field_names().collect::<Vec<_>>(), vec!["city", "state"]);
        assert_eq!(r.to_string(), "Address{city: Boston, state: MA}");
    }

    #[test]
    fn record_checks_arity_and_types() {
        let err = RecordValue::new(address(), vec![OpenValue::String("x".into())]).unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(_)));

        let err = RecordValue::new(
            address(),
            vec![OpenValue::I32(1), OpenValue::String("MA".into())],
        )
        .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn record_from_named_reorders() {
        let r = RecordValue::from_named(
            address(),
            [
                ("state", OpenValue::String("MA".into())),
                ("city", OpenValue::String("Boston".into())),
            ],
        )
        .expect("named record");
        assert_eq!(r, row("Boston", "MA"));

        let missing =
            RecordValue::from_named(address(), [("city", OpenValue::String("Boston".into()))]);
        assert!(missing.is_err());
    }

    #[test]
    fn table_rejects_duplicate_index() {
        let table_type = Arc::new(
            TableType::new("Addresses", "", address(), vec!["city".into()]).expect("table"),
        );
        let mut table = TableValue::new(table_type);
        table.put(row("Boston", "MA")).expect("first");
        table.put(row("Portland", "OR")).expect("second");
        let err = table.put(row("Boston", "NY")).unwrap_err();
        match err {
            Error::DuplicateKey { table, key } => {
                assert_eq!(table, "Addresses");
                assert_eq!(key, "(Boston)");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(table.len(), 2);
        assert!(table.contains_key(&[OpenValue::String("Portland".into())]));
    }
}
