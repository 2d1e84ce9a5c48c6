// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Operation parameters.

use crate::attribute::NullPolicy;
use crate::descriptor::{Descriptor, DescriptorBuilder};
use crate::error::Result;
use crate::open_type::{OpenType, OpenValue, TypeMapper, Witness};

/// A named, typed operation parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    name: String,
    description: String,
    open_type: OpenType,
    original_type: String,
    nullable: bool,
    null_policy: NullPolicy,
    descriptor: Descriptor,
}

impl ParameterDescriptor {
    /// Parameter of an explicit open type.
    pub fn new(name: impl Into<String>, open_type: OpenType) -> Self {
        let name = name.into();
        let original_type = open_type.type_tag().to_string();
        Self {
            description: name.clone(),
            name,
            open_type,
            original_type,
            nullable: false,
            null_policy: NullPolicy::default(),
            descriptor: Descriptor::new(),
        }
    }

    /// Parameter whose type is resolved from `T` by the global mapper.
    pub fn of<T: 'static>(name: impl Into<String>) -> Result<Self> {
        let witness = TypeMapper::global().resolve(&crate::open_type::TypeToken::of::<T>())?;
        Ok(Self::from_witness(name, witness))
    }

    pub(crate) fn from_witness(name: impl Into<String>, witness: Witness) -> Self {
        let mut param = Self::new(name, witness.open_type);
        param.original_type = witness.original_type;
        param.nullable = witness.nullable;
        param
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_original_type(mut self, name: impl Into<String>) -> Self {
        self.original_type = name.into();
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_null_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }

    pub fn with_descriptor(mut self, descriptor: Descriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn open_type(&self) -> &OpenType {
        &self.open_type
    }

    pub fn original_type(&self) -> &str {
        &self.original_type
    }

    /// Signature tag of the parameter.
    pub fn type_tag(&self) -> &str {
        self.open_type.type_tag()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn null_policy(&self) -> NullPolicy {
        self.null_policy
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Apply the null policy to an incoming argument.
    pub(crate) fn coerce(&self, value: OpenValue) -> Result<OpenValue> {
        self.null_policy
            .coerce(&self.name, &self.open_type, self.nullable, value)
    }

    /// Stamp `openType` / `originalType` into the descriptor.
    pub(crate) fn finish(mut self) -> Self {
        self.descriptor = DescriptorBuilder::default()
            .descriptor(&self.descriptor)
            .open_type(&self.open_type)
            .original_type(self.original_type.clone())
            .build();
        self
    }
}
