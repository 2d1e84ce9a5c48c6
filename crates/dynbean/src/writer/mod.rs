// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Writers: projections of native items onto open records and tables.
//!
//! A `RecordWriter` pairs a record schema with one extractor per field. A
//! `TableWriter` wraps a record writer and keys each produced row by its
//! index fields.

mod record;
mod table;

pub use record::{RecordWriter, RecordWriterBuilder};
pub use table::{TableWriter, TableWriterBuilder};
