// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Open Types
//!
//! The constrained value taxonomy every managed value is reconciled against:
//! scalars, fixed-schema records and indexed tables of records.
//!
//! # Features
//!
//! - **OpenType**: runtime type description (scalar, record, table)
//! - **OpenValue**: type-erased value container with total equality
//! - **TypeMapper**: native type token to open type resolution
//! - **Conversions**: `IntoOpenValue` / `FromOpenValue` for native values
//!
//! # Example
//!
//! ```rust
//! use dynbean::open_type::{FieldType, OpenType, OpenValue, RecordType, RecordValue};
//! use std::sync::Arc;
//!
//! let address = Arc::new(
//!     RecordType::new(
//!         "Address",
//!         "Street address",
//!         vec![
//!             FieldType::new("city", OpenType::STRING),
//!             FieldType::new("state", OpenType::STRING),
//!         ],
//!     )
//!     .unwrap(),
//! );
//! let value = RecordValue::new(address, vec!["Boston".into(), "MA".into()]).unwrap();
//! assert_eq!(value.get("state"), Some(&OpenValue::String("MA".into())));
//! ```

mod convert;
mod kind;
mod mapper;
mod types;
mod value;

pub use convert::{FromOpenValue, IntoOpenValue, OpenTyped};
pub use kind::PrimitiveKind;
pub use mapper::{TypeMapper, TypeToken, Witness};
pub use types::{FieldType, OpenType, RecordType, TableType};
pub use value::{IndexKey, OpenValue, RecordValue, TableValue};
