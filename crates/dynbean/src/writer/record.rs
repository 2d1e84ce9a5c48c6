// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Projection of native items onto records.

use super::TableWriter;
use crate::error::{BoxError, Error, Result};
use crate::open_type::{
    FieldType, IntoOpenValue, OpenType, OpenValue, RecordType, RecordValue, TypeMapper, TypeToken,
};
use std::fmt;
use std::sync::Arc;

type Extractor<I> = Arc<dyn Fn(&I) -> std::result::Result<OpenValue, BoxError> + Send + Sync>;

/// Projects `&I` onto a record of a fixed schema.
///
/// Fields are evaluated in declaration order; the first failing extractor
/// aborts the whole projection.
pub struct RecordWriter<I> {
    record_type: Arc<RecordType>,
    extractors: Vec<Extractor<I>>,
}

impl<I> Clone for RecordWriter<I> {
    fn clone(&self) -> Self {
        Self {
            record_type: Arc::clone(&self.record_type),
            extractors: self.extractors.clone(),
        }
    }
}

impl<I> fmt::Debug for RecordWriter<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordWriter")
            .field("record_type", &self.record_type.name())
            .field("fields", &self.record_type.field_names().collect::<Vec<_>>())
            .finish()
    }
}

impl<I: 'static> RecordWriter<I> {
    /// Start building a writer for record type `name`.
    pub fn builder(name: impl Into<String>) -> RecordWriterBuilder<I> {
        RecordWriterBuilder::new(name)
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    /// Open type of the produced records.
    pub fn open_type(&self) -> OpenType {
        OpenType::Record(Arc::clone(&self.record_type))
    }

    /// Project `item` onto a record.
    ///
    /// # Errors
    ///
    /// `FieldExtraction` naming the first field whose extractor failed or
    /// produced a value outside the field's type.
    pub fn apply(&self, item: &I) -> Result<RecordValue> {
        let mut values = Vec::with_capacity(self.extractors.len());
        for (field, extract) in self.record_type.fields().iter().zip(&self.extractors) {
            let value = extract(item).map_err(|source| self.extraction_error(field, source))?;
            if !field.open_type.is_value(&value) {
                let mismatch = Error::TypeMismatch {
                    expected: field.open_type.type_tag().to_string(),
                    got: value.type_tag().to_string(),
                };
                return Err(self.extraction_error(field, Box::new(mismatch)));
            }
            values.push(value);
        }
        Ok(RecordValue::from_parts(Arc::clone(&self.record_type), values))
    }

    fn extraction_error(&self, field: &FieldType, source: BoxError) -> Error {
        log::debug!(
            "[RecordWriter::apply] {}.{}: {}",
            self.record_type.name(),
            field.name,
            source
        );
        Error::FieldExtraction {
            record: self.record_type.name().to_string(),
            field: field.name.clone(),
            source,
        }
    }
}

struct PendingField<I> {
    name: String,
    description: Option<String>,
    open_type: Option<OpenType>,
    token: Option<TypeToken>,
    extractor: Extractor<I>,
}

/// Builder for `RecordWriter`.
///
/// # Example
///
/// ```rust
/// use dynbean::writer::RecordWriter;
///
/// struct Address {
///     city: String,
///     state: String,
/// }
///
/// let writer = RecordWriter::<Address>::builder("Address")
///     .description("Street address")
///     .field("city", |a: &Address| a.city.clone())
///     .field("state", |a: &Address| a.state.clone())
///     .build()
///     .unwrap();
///
/// let boston = Address { city: "Boston".into(), state: "MA".into() };
/// let record = writer.apply(&boston).unwrap();
/// assert_eq!(record.to_string(), "Address{city: Boston, state: MA}");
/// ```
pub struct RecordWriterBuilder<I> {
    name: String,
    description: Option<String>,
    fields: Vec<PendingField<I>>,
    pending: Option<Error>,
}

impl<I: 'static> RecordWriterBuilder<I> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            pending: None,
        }
    }

    /// Record type description (defaults to the name).
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Describe the most recently added field.
    pub fn field_description(mut self, description: impl Into<String>) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.description = Some(description.into());
        }
        self
    }

    /// Scalar field whose type is inferred from `T`.
    pub fn field<T, F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&I) -> T + Send + Sync + 'static,
        T: IntoOpenValue + 'static,
    {
        self.fields.push(PendingField {
            name: name.into(),
            description: None,
            open_type: None,
            token: Some(TypeToken::of::<T>()),
            extractor: Arc::new(
                move |item: &I| -> std::result::Result<OpenValue, BoxError> {
                    Ok(f(item).into_open_value())
                },
            ),
        });
        self
    }

    /// Field whose extractor may fail.
    pub fn try_field<T, E, F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&I) -> std::result::Result<T, E> + Send + Sync + 'static,
        T: IntoOpenValue + 'static,
        E: Into<BoxError> + 'static,
    {
        self.fields.push(PendingField {
            name: name.into(),
            description: None,
            open_type: None,
            token: Some(TypeToken::of::<T>()),
            extractor: Arc::new(
                move |item: &I| -> std::result::Result<OpenValue, BoxError> {
                    f(item).map(IntoOpenValue::into_open_value).map_err(Into::into)
                },
            ),
        });
        self
    }

    /// Field of an explicit type with a raw extractor.
    pub fn field_with_type<F>(mut self, name: impl Into<String>, open_type: OpenType, f: F) -> Self
    where
        F: Fn(&I) -> OpenValue + Send + Sync + 'static,
    {
        self.fields.push(PendingField {
            name: name.into(),
            description: None,
            open_type: Some(open_type),
            token: None,
            extractor: Arc::new(
                move |item: &I| -> std::result::Result<OpenValue, BoxError> { Ok(f(item)) },
            ),
        });
        self
    }

    /// Nested record field: `map` selects the nested item, `writer` projects it.
    pub fn record_field<N, M>(
        mut self,
        name: impl Into<String>,
        map: M,
        writer: RecordWriter<N>,
    ) -> Self
    where
        M: Fn(&I) -> N + Send + Sync + 'static,
        N: 'static,
    {
        let open_type = writer.open_type();
        self.fields.push(PendingField {
            name: name.into(),
            description: None,
            open_type: Some(open_type),
            token: None,
            extractor: Arc::new(
                move |item: &I| -> std::result::Result<OpenValue, BoxError> {
                    let record = writer.apply(&map(item))?;
                    Ok(OpenValue::Record(record))
                },
            ),
        });
        self
    }

    /// Nested table field: `map` yields the rows, `writer` indexes them.
    pub fn table_field<N, C, M>(
        mut self,
        name: impl Into<String>,
        map: M,
        writer: TableWriter<N>,
    ) -> Self
    where
        M: Fn(&I) -> C + Send + Sync + 'static,
        C: IntoIterator<Item = N>,
        N: 'static,
    {
        let open_type = writer.open_type();
        self.fields.push(PendingField {
            name: name.into(),
            description: None,
            open_type: Some(open_type),
            token: None,
            extractor: Arc::new(
                move |item: &I| -> std::result::Result<OpenValue, BoxError> {
                    let rows: Vec<N> = map(item).into_iter().collect();
                    let table = writer.apply(&rows)?;
                    Ok(OpenValue::Table(table))
                },
            ),
        });
        self
    }

    /// Build with the process-wide `TypeMapper`.
    pub fn build(self) -> Result<RecordWriter<I>> {
        self.build_with(TypeMapper::global())
    }

    /// Build, resolving inferred field types through `mapper`.
    pub fn build_with(mut self, mapper: &TypeMapper) -> Result<RecordWriter<I>> {
        if let Some(err) = self.pending.take() {
            return Err(err);
        }

        let mut field_types = Vec::with_capacity(self.fields.len());
        let mut extractors = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            let open_type = match (field.open_type, field.token) {
                (Some(open_type), _) => open_type,
                (None, Some(token)) => mapper.resolve(&token)?.open_type,
                (None, None) => {
                    return Err(Error::TypeInference {
                        type_name: field.name,
                    })
                }
            };
            let mut field_type = FieldType::new(field.name, open_type);
            if let Some(description) = field.description {
                field_type = field_type.with_description(description);
            }
            field_types.push(field_type);
            extractors.push(field.extractor);
        }

        let description = self.description.unwrap_or_else(|| self.name.clone());
        let record_type = Arc::new(RecordType::new(self.name, description, field_types)?);
        log::debug!(
            "[RecordWriterBuilder::build] {} with {} fields",
            record_type.name(),
            record_type.len()
        );
        Ok(RecordWriter {
            record_type,
            extractors,
        })
    }
}
