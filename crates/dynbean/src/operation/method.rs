// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Late-bound dispatch against a target's method table.
//!
//! A target lists its invocable methods as `MethodBinding`s. The operation
//! builder scans that list once, at build time, for the single method that
//! matches a name and an exact parameter type list.

use super::invoker::{erase, erase_try, IntoOperation, IntoTryOperation, Invoker};
use crate::error::{Error, Result};
use crate::open_type::{OpenType, TypeMapper, TypeToken, Witness};
use std::fmt;
use std::sync::Arc;

/// One invocable method of a target.
#[derive(Clone)]
pub struct MethodBinding {
    name: String,
    parameter_types: Vec<OpenType>,
    parameter_witnesses: Vec<Witness>,
    return_type: OpenType,
    original_return_type: String,
    invoker: Invoker,
}

impl MethodBinding {
    /// Binding with explicit types around an erased invoker.
    pub fn new(
        name: impl Into<String>,
        parameter_types: Vec<OpenType>,
        return_type: OpenType,
        invoker: Invoker,
    ) -> Self {
        let parameter_witnesses = parameter_types
            .iter()
            .map(|t| Witness {
                open_type: t.clone(),
                nullable: false,
                original_type: t.type_tag().to_string(),
            })
            .collect();
        Self {
            name: name.into(),
            original_return_type: return_type.type_tag().to_string(),
            parameter_types,
            parameter_witnesses,
            return_type,
            invoker,
        }
    }

    /// Binding for a plain function, types resolved by the global mapper.
    pub fn from_fn<Args, R, F>(name: impl Into<String>, f: F) -> Result<Self>
    where
        F: IntoOperation<Args, R>,
    {
        let (params, ret, invoker) = erase(f);
        Self::from_tokens(name.into(), &params, ret, invoker, TypeMapper::global())
    }

    /// Binding for a fallible function.
    pub fn from_try_fn<Args, R, E, F>(name: impl Into<String>, f: F) -> Result<Self>
    where
        F: IntoTryOperation<Args, R, E>,
    {
        let (params, ret, invoker) = erase_try(f);
        Self::from_tokens(name.into(), &params, ret, invoker, TypeMapper::global())
    }

    fn from_tokens(
        name: String,
        params: &[TypeToken],
        ret: TypeToken,
        invoker: Invoker,
        mapper: &TypeMapper,
    ) -> Result<Self> {
        let parameter_witnesses = params
            .iter()
            .map(|t| mapper.resolve(t))
            .collect::<Result<Vec<_>>>()?;
        let ret = mapper.resolve(&ret)?;
        Ok(Self {
            name,
            parameter_types: parameter_witnesses
                .iter()
                .map(|w| w.open_type.clone())
                .collect(),
            parameter_witnesses,
            return_type: ret.open_type,
            original_return_type: ret.original_type,
            invoker,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameter_types(&self) -> &[OpenType] {
        &self.parameter_types
    }

    pub fn return_type(&self) -> &OpenType {
        &self.return_type
    }

    pub(crate) fn parameter_witnesses(&self) -> &[Witness] {
        &self.parameter_witnesses
    }

    pub(crate) fn original_return_type(&self) -> &str {
        &self.original_return_type
    }

    pub(crate) fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    fn matches(&self, name: &str, parameter_types: &[&OpenType]) -> bool {
        self.name == name
            && self.parameter_types.len() == parameter_types.len()
            && self
                .parameter_types
                .iter()
                .zip(parameter_types)
                .all(|(a, b)| a == *b)
    }
}

impl fmt::Debug for MethodBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.parameter_types.iter().map(OpenType::type_tag).collect();
        write!(f, "{}({}) -> {}", self.name, params.join(","), self.return_type)
    }
}

/// A target whose methods can be bound by name and signature.
pub trait MethodTable: Send + Sync + 'static {
    /// Every invocable method. Bindings typically capture a clone of `self`.
    fn methods(self: Arc<Self>) -> Vec<MethodBinding>;
}

/// Find the single method matching `name` and `parameter_types` exactly.
pub(crate) fn resolve_method<T>(
    target: Arc<T>,
    name: &str,
    parameter_types: &[&OpenType],
) -> Result<MethodBinding>
where
    T: MethodTable + ?Sized,
{
    let mut candidates: Vec<MethodBinding> = target
        .methods()
        .into_iter()
        .filter(|m| m.matches(name, parameter_types))
        .collect();
    let signature = || {
        parameter_types
            .iter()
            .map(|t| t.type_tag().to_string())
            .collect::<Vec<_>>()
    };
    match candidates.len() {
        0 => Err(Error::NoSuchOperation {
            name: name.to_string(),
            signature: signature(),
        }),
        1 => candidates.pop().ok_or_else(|| Error::NoSuchOperation {
            name: name.to_string(),
            signature: signature(),
        }),
        n => Err(Error::AmbiguousOperation {
            name: name.to_string(),
            signature: signature(),
            matches: n,
        }),
    }
}
