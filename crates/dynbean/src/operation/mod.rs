// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Operations: named, typed, overloadable invocable actions.
//!
//! An operation is keyed by its name and the ordered type tags of its
//! parameters, so `add(i32)` and `add(i64)` coexist in one registry.

mod descriptor;
mod invoker;
mod method;
mod parameter;
mod registry;

pub use descriptor::{
    Impact, NotificationFactory, OperationBuilder, OperationDescriptor, SignatureKey,
};
pub use invoker::{IntoOperation, IntoTryOperation, InvokeError, Invoker};
pub use method::{MethodBinding, MethodTable};
pub use parameter::ParameterDescriptor;
pub use registry::OperationRegistry;
