// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Open type descriptors: scalars, records and tables.

use super::{OpenValue, PrimitiveKind};
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A type in the open taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OpenType {
    /// Scalar type.
    Primitive(PrimitiveKind),
    /// Fixed-schema record.
    Record(Arc<RecordType>),
    /// Indexed table of records.
    Table(Arc<TableType>),
}

impl OpenType {
    pub const VOID: OpenType = OpenType::Primitive(PrimitiveKind::Void);
    pub const BOOL: OpenType = OpenType::Primitive(PrimitiveKind::Bool);
    pub const CHAR: OpenType = OpenType::Primitive(PrimitiveKind::Char);
    pub const I8: OpenType = OpenType::Primitive(PrimitiveKind::I8);
    pub const I16: OpenType = OpenType::Primitive(PrimitiveKind::I16);
    pub const I32: OpenType = OpenType::Primitive(PrimitiveKind::I32);
    pub const I64: OpenType = OpenType::Primitive(PrimitiveKind::I64);
    pub const U8: OpenType = OpenType::Primitive(PrimitiveKind::U8);
    pub const U16: OpenType = OpenType::Primitive(PrimitiveKind::U16);
    pub const U32: OpenType = OpenType::Primitive(PrimitiveKind::U32);
    pub const U64: OpenType = OpenType::Primitive(PrimitiveKind::U64);
    pub const F32: OpenType = OpenType::Primitive(PrimitiveKind::F32);
    pub const F64: OpenType = OpenType::Primitive(PrimitiveKind::F64);
    pub const STRING: OpenType = OpenType::Primitive(PrimitiveKind::String);
    pub const TIMESTAMP: OpenType = OpenType::Primitive(PrimitiveKind::Timestamp);

    /// Type tag used in dispatch signatures.
    ///
    /// Scalars use their canonical tag, records and tables their type name.
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Primitive(kind) => kind.type_tag(),
            Self::Record(record) => record.name(),
            Self::Table(table) => table.name(),
        }
    }

    /// Human readable description.
    pub fn description(&self) -> &str {
        match self {
            Self::Primitive(kind) => kind.type_tag(),
            Self::Record(record) => record.description(),
            Self::Table(table) => table.description(),
        }
    }

    /// Scalar kind, if this is a scalar type.
    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Record type, if this is a record.
    pub fn as_record(&self) -> Option<&Arc<RecordType>> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Table type, if this is a table.
    pub fn as_table(&self) -> Option<&Arc<TableType>> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Check if this is the void type.
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Primitive(PrimitiveKind::Void))
    }

    /// Check whether `value` conforms to this type.
    ///
    /// `Null` conforms to every type; nullability is enforced by the slot
    /// that receives the value.
    pub fn is_value(&self, value: &OpenValue) -> bool {
        if value.is_null() {
            return true;
        }
        match (self, value) {
            (Self::Primitive(kind), v) => v.primitive_kind() == Some(*kind),
            (Self::Record(record), OpenValue::Record(v)) => v.record_type() == record,
            (Self::Table(table), OpenValue::Table(v)) => v.table_type() == table,
            _ => false,
        }
    }

    /// Default value for a null under `NullPolicy::Default`.
    ///
    /// Composite types have no default and stay null.
    pub fn default_value(&self) -> OpenValue {
        match self {
            Self::Primitive(kind) => kind.default_value(),
            _ => OpenValue::Null,
        }
    }
}

impl From<PrimitiveKind> for OpenType {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

impl fmt::Display for OpenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// A named field of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldType {
    /// Field name.
    pub name: String,
    /// Field description.
    pub description: String,
    /// Field type.
    pub open_type: OpenType,
}

impl FieldType {
    /// Create a field; the description defaults to the name.
    pub fn new(name: impl Into<String>, open_type: OpenType) -> Self {
        let name = name.into();
        Self {
            description: name.clone(),
            name,
            open_type,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Fixed-schema record type with ordered, uniquely named fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordType {
    name: String,
    description: String,
    fields: Vec<FieldType>,
}

impl RecordType {
    /// Create a record type.
    ///
    /// # Errors
    ///
    /// `InvalidSchema` when the name is empty, there are no fields, or two
    /// fields share a name.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        fields: Vec<FieldType>,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidSchema("record type name is empty".into()));
        }
        if fields.is_empty() {
            return Err(Error::InvalidSchema(format!(
                "record type {} has no fields",
                name
            )));
        }
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if field.name.is_empty() {
                return Err(Error::InvalidSchema(format!(
                    "record type {} has a field with an empty name",
                    name
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "record type {} has duplicate field {}",
                    name, field.name
                )));
            }
        }
        Ok(Self {
            name,
            description: description.into(),
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldType] {
        &self.fields
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Position of a field.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldType> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always `false` for a valid record type.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Table type: rows of a single record type, keyed by index fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableType {
    name: String,
    description: String,
    row_type: Arc<RecordType>,
    index_names: Vec<String>,
    index_positions: Vec<usize>,
}

impl TableType {
    /// Create a table type.
    ///
    /// # Errors
    ///
    /// `InvalidSchema` when the name is empty or the index names are empty,
    /// repeated, or not fields of the row type.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        row_type: Arc<RecordType>,
        index_names: Vec<String>,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidSchema("table type name is empty".into()));
        }
        if index_names.is_empty() {
            return Err(Error::InvalidSchema(format!(
                "table type {} has no index fields",
                name
            )));
        }
        let mut index_positions = Vec::with_capacity(index_names.len());
        for index in &index_names {
            let pos = row_type.field_index(index).ok_or_else(|| {
                Error::InvalidSchema(format!(
                    "index field {} of table {} is not a field of {}",
                    index,
                    name,
                    row_type.name()
                ))
            })?;
            if index_positions.contains(&pos) {
                return Err(Error::InvalidSchema(format!(
                    "index field {} of table {} is repeated",
                    index, name
                )));
            }
            index_positions.push(pos);
        }
        Ok(Self {
            name,
            description: description.into(),
            row_type,
            index_names,
            index_positions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Record type of every row.
    pub fn row_type(&self) -> &Arc<RecordType> {
        &self.row_type
    }

    /// Index field names, in key order.
    pub fn index_names(&self) -> &[String] {
        &self.index_names
    }

    pub(crate) fn index_positions(&self) -> &[usize] {
        &self.index_positions
    }
}
