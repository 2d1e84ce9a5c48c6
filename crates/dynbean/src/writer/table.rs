// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Projection of item collections onto indexed tables.

use super::RecordWriter;
use crate::error::{Error, Result};
use crate::open_type::{OpenType, TableType, TableValue};
use std::fmt;
use std::sync::Arc;

/// Projects a collection of `I` onto a table keyed by index fields.
pub struct TableWriter<I> {
    table_type: Arc<TableType>,
    record_writer: RecordWriter<I>,
}

impl<I> Clone for TableWriter<I> {
    fn clone(&self) -> Self {
        Self {
            table_type: Arc::clone(&self.table_type),
            record_writer: self.record_writer.clone(),
        }
    }
}

impl<I> fmt::Debug for TableWriter<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableWriter")
            .field("table_type", &self.table_type.name())
            .field("index", &self.table_type.index_names())
            .finish()
    }
}

impl<I: 'static> TableWriter<I> {
    /// Start building a writer for table type `name`.
    pub fn builder(name: impl Into<String>) -> TableWriterBuilder<I> {
        TableWriterBuilder::new(name)
    }

    pub fn table_type(&self) -> &Arc<TableType> {
        &self.table_type
    }

    /// Open type of the produced tables.
    pub fn open_type(&self) -> OpenType {
        OpenType::Table(Arc::clone(&self.table_type))
    }

    /// Project every item and insert it keyed by its index projection.
    ///
    /// # Errors
    ///
    /// `FieldExtraction` from the record writer, `DuplicateKey` when two
    /// items share an index projection.
    pub fn apply<'a, It>(&self, items: It) -> Result<TableValue>
    where
        It: IntoIterator<Item = &'a I>,
        I: 'a,
    {
        let mut table = TableValue::new(Arc::clone(&self.table_type));
        for item in items {
            let row = self.record_writer.apply(item)?;
            table.put(row).map_err(|err| {
                log::debug!("[TableWriter::apply] {}: {}", self.table_type.name(), err);
                err
            })?;
        }
        Ok(table)
    }
}

/// Builder for `TableWriter`.
///
/// # Example
///
/// ```rust
/// use dynbean::writer::{RecordWriter, TableWriter};
///
/// struct Office {
///     city: String,
///     staff: u32,
/// }
///
/// let rows = RecordWriter::<Office>::builder("Office")
///     .field("city", |o: &Office| o.city.clone())
///     .field("staff", |o: &Office| o.staff)
///     .build()
///     .unwrap();
/// let writer = TableWriter::builder("Offices")
///     .index_name("city")
///     .record_writer(rows)
///     .build()
///     .unwrap();
///
/// let offices = vec![
///     Office { city: "Boston".into(), staff: 12 },
///     Office { city: "Denver".into(), staff: 4 },
/// ];
/// assert_eq!(writer.apply(&offices).unwrap().len(), 2);
/// ```
pub struct TableWriterBuilder<I> {
    name: String,
    description: Option<String>,
    index_names: Vec<String>,
    record_writer: Option<RecordWriter<I>>,
}

impl<I: 'static> TableWriterBuilder<I> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            index_names: Vec::new(),
            record_writer: None,
        }
    }

    /// Table type description (defaults to the name).
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append one index field.
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.index_names.push(name.into());
        self
    }

    /// Append several index fields, in key order.
    pub fn index_names<It, S>(mut self, names: It) -> Self
    where
        It: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Writer producing each row.
    pub fn record_writer(mut self, writer: RecordWriter<I>) -> Self {
        self.record_writer = Some(writer);
        self
    }

    pub fn build(self) -> Result<TableWriter<I>> {
        let record_writer = self.record_writer.ok_or_else(|| {
            Error::InvalidSchema(format!("table type {} has no record writer", self.name))
        })?;
        let description = self.description.unwrap_or_else(|| self.name.clone());
        let table_type = TableType::new(
            self.name,
            description,
            Arc::clone(record_writer.record_type()),
            self.index_names,
        )?;
        log::debug!(
            "[TableWriterBuilder::build] {} indexed by {:?}",
            table_type.name(),
            table_type.index_names()
        );
        Ok(TableWriter {
            table_type: Arc::new(table_type),
            record_writer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open_type::OpenValue;

    struct Address {
        city: &'static str,
        state: &'static str,
    }

    fn writer() -> TableWriter<Address> {
        let rows = RecordWriter::<Address>::builder("Address")
            .field("city", |a: &Address| a.city.to_string())
            .field("state", |a: &Address| a.state.to_string())
            .build()
            .expect("valid record writer");
        TableWriter::builder("Addresses")
            .description("Known addresses")
            .index_name("city")
            .record_writer(rows)
            .build()
            .expect("valid table writer")
    }

    #[test]
    fn distinct_keys_fill_table() {
        let items = [
            Address {
                city: "Boston",
                state: "MA",
            },
            Address {
                city: "Denver",
                state: "CO",
            },
        ];
        let table = writer().apply(&items).expect("apply");
        assert_eq!(table.len(), 2);
        let denver = table.get(&[OpenValue::from("Denver")]).expect("row");
        assert_eq!(denver.get("state"), Some(&OpenValue::from("CO")));
    }

    #[test]
    fn repeated_key_is_duplicate() {
        let items = [
            Address {
                city: "Boston",
                state: "MA",
            },
            Address {
                city: "Denver",
                state: "CO",
            },
            Address {
                city: "Boston",
                state: "NY",
            },
        ];
        match writer().apply(&items) {
            Err(Error::DuplicateKey { table, key }) => {
                assert_eq!(table, "Addresses");
                assert_eq!(key, "(Boston)");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn index_must_name_a_field() {
        let rows = RecordWriter::<Address>::builder("Address")
            .field("city", |a: &Address| a.city.to_string())
            .build()
            .expect("valid record writer");
        let err = TableWriter::builder("Addresses")
            .index_name("zip")
            .record_writer(rows.clone())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(_)));

        let err = TableWriter::builder("Addresses")
            .record_writer(rows)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(_)));

        let err = TableWriter::<Address>::builder("Addresses")
            .index_name("city")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(_)));
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let items: Vec<Address> = Vec::new();
        assert!(writer().apply(&items).expect("apply").is_empty());
    }
}
