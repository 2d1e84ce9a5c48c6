// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Operation descriptors and their builder.

use super::invoker::{erase, erase_try, IntoOperation, IntoTryOperation, InvokeError, Invoker};
use super::method::{resolve_method, MethodBinding, MethodTable};
use super::parameter::ParameterDescriptor;
use crate::attribute::NullPolicy;
use crate::config::DEFAULT_PARAM_PREFIX;
use crate::descriptor::{Descriptor, DescriptorBuilder};
use crate::error::{Error, Result};
use crate::notification::Notification;
use crate::open_type::{OpenType, OpenValue, TypeMapper, TypeToken};
use crate::registry::OperationInfo;
use std::fmt;
use std::sync::Arc;

/// Effect of an operation on the managed component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Impact {
    /// Read-only, returns information.
    Info,
    /// Changes state, returns nothing of interest.
    Action,
    /// Changes state and returns information.
    ActionInfo,
    #[default]
    Unknown,
}

impl Impact {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Action => "ACTION",
            Self::ActionInfo => "ACTION_INFO",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatch key of an operation: name plus ordered parameter type tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignatureKey {
    name: String,
    signature: Vec<String>,
}

impl SignatureKey {
    pub fn new<I, S>(name: impl Into<String>, signature: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            signature: signature.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &[String] {
        &self.signature
    }
}

impl fmt::Display for SignatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.signature.join(","))
    }
}

/// Builds the notification published after a successful invocation.
///
/// Arguments are the notification source, a fresh sequence number and the
/// operation's result.
pub type NotificationFactory =
    Arc<dyn Fn(&str, u64, &OpenValue) -> Notification + Send + Sync>;

/// A named, typed operation bound to an invoker.
pub struct OperationDescriptor {
    name: String,
    description: String,
    parameters: Vec<ParameterDescriptor>,
    return_type: OpenType,
    original_return_type: String,
    impact: Impact,
    descriptor: Descriptor,
    invoker: Invoker,
    notification: Option<NotificationFactory>,
}

impl OperationDescriptor {
    /// Start building an operation.
    pub fn builder(name: impl Into<String>) -> OperationBuilder {
        OperationBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub fn return_type(&self) -> &OpenType {
        &self.return_type
    }

    pub fn original_return_type(&self) -> &str {
        &self.original_return_type
    }

    pub fn impact(&self) -> Impact {
        self.impact
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Parameter type tags, in order.
    pub fn signature(&self) -> Vec<String> {
        self.parameters
            .iter()
            .map(|p| p.type_tag().to_string())
            .collect()
    }

    /// Dispatch key of this operation.
    pub fn key(&self) -> SignatureKey {
        SignatureKey::new(self.name.clone(), self.signature())
    }

    /// `true` when a completion notification is bound.
    pub fn has_completion_notification(&self) -> bool {
        self.notification.is_some()
    }

    /// Invoke with positional arguments.
    ///
    /// Arguments are checked against the parameter list before the invoker
    /// runs; each null goes through the parameter's null policy.
    pub fn invoke(&self, args: &[OpenValue]) -> Result<OpenValue> {
        if args.len() != self.parameters.len() {
            return Err(Error::InvalidArgument {
                operation: self.name.clone(),
                index: None,
                reason: format!(
                    "expected {} arguments, got {}",
                    self.parameters.len(),
                    args.len()
                ),
            });
        }

        let mut coerced = Vec::with_capacity(args.len());
        for (index, (param, arg)) in self.parameters.iter().zip(args).enumerate() {
            let value = param
                .coerce(arg.clone())
                .map_err(|e| self.invalid_argument(index, e.to_string()))?;
            if !param.open_type().is_value(&value) {
                return Err(self.invalid_argument(
                    index,
                    format!(
                        "{} expects {}, got {}",
                        param.name(),
                        param.type_tag(),
                        value.type_tag()
                    ),
                ));
            }
            coerced.push(value);
        }

        (self.invoker)(&coerced).map_err(|e| match e {
            InvokeError::Arity { expected, got } => Error::InvalidArgument {
                operation: self.name.clone(),
                index: None,
                reason: format!("expected {} arguments, got {}", expected, got),
            },
            InvokeError::Argument { index, reason } => self.invalid_argument(index, reason),
            InvokeError::Failed(source) => Error::Invocation {
                operation: self.name.clone(),
                source,
            },
        })
    }

    fn invalid_argument(&self, index: usize, reason: String) -> Error {
        Error::InvalidArgument {
            operation: self.name.clone(),
            index: Some(index),
            reason,
        }
    }

    /// Build the completion notification, if a factory is bound.
    pub(crate) fn completion_notification(
        &self,
        source: &str,
        sequence: u64,
        result: &OpenValue,
    ) -> Option<Notification> {
        self.notification
            .as_ref()
            .map(|factory| factory(source, sequence, result))
    }

    /// Schema entry for this operation.
    pub fn info(&self) -> OperationInfo {
        OperationInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.parameters.clone(),
            return_type: self.return_type.clone(),
            original_return_type: self.original_return_type.clone(),
            impact: self.impact,
            descriptor: self.descriptor.clone(),
        }
    }
}

impl fmt::Debug for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("key", &self.key().to_string())
            .field("return_type", &self.return_type)
            .field("impact", &self.impact)
            .finish()
    }
}

enum Body {
    Unbound,
    Function {
        parameters: Vec<TypeToken>,
        returns: TypeToken,
        invoker: Invoker,
    },
    Method(MethodBinding),
    Raw(Invoker),
}

/// Builder for `OperationDescriptor`.
///
/// The body is bound in one of three ways:
///
/// - `function` / `try_function`: a plain closure, types inferred;
/// - `method`: late binding against a `MethodTable`, resolved immediately;
/// - `invoker`: an erased invoker plus explicit `parameters` and `returns`.
///
/// # Example
///
/// ```rust
/// use dynbean::operation::OperationDescriptor;
/// use dynbean::open_type::OpenValue;
///
/// let op = OperationDescriptor::builder("concatenate")
///     .function(|a: String, b: String| format!("{}{}", a, b))
///     .param_names(["arg1", "arg2"])
///     .build()
///     .unwrap();
/// let out = op.invoke(&[OpenValue::from("a"), OpenValue::from("b")]).unwrap();
/// assert_eq!(out, OpenValue::from("ab"));
/// ```
pub struct OperationBuilder {
    name: String,
    description: Option<String>,
    parameters: Option<Vec<ParameterDescriptor>>,
    param_names: Option<Vec<String>>,
    returns: Option<OpenType>,
    original_return_type: Option<String>,
    impact: Impact,
    null_policy: NullPolicy,
    descriptor: DescriptorBuilder,
    notification: Option<NotificationFactory>,
    body: Body,
    pending: Option<Error>,
}

impl OperationBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: None,
            param_names: None,
            returns: None,
            original_return_type: None,
            impact: Impact::default(),
            null_policy: NullPolicy::default(),
            descriptor: DescriptorBuilder::default(),
            notification: None,
            body: Body::Unbound,
            pending: None,
        }
    }

    fn defer(&mut self, err: Error) {
        if self.pending.is_none() {
            log::debug!("[OperationBuilder] {}: {}", self.name, err);
            self.pending = Some(err);
        }
    }

    /// Bind a plain function of up to six arguments.
    pub fn function<Args, R, F>(mut self, f: F) -> Self
    where
        F: IntoOperation<Args, R>,
    {
        let (parameters, returns, invoker) = erase(f);
        self.body = Body::Function {
            parameters,
            returns,
            invoker,
        };
        self
    }

    /// Bind a fallible function; its error surfaces as `Error::Invocation`.
    pub fn try_function<Args, R, E, F>(mut self, f: F) -> Self
    where
        F: IntoTryOperation<Args, R, E>,
    {
        let (parameters, returns, invoker) = erase_try(f);
        self.body = Body::Function {
            parameters,
            returns,
            invoker,
        };
        self
    }

    /// Bind the method of `target` named `method_name` whose parameter types
    /// equal those of `parameters`.
    ///
    /// Resolution happens here; a missing or ambiguous method fails `build()`.
    pub fn method<T>(
        mut self,
        target: Arc<T>,
        method_name: &str,
        parameters: Vec<ParameterDescriptor>,
    ) -> Self
    where
        T: MethodTable + ?Sized,
    {
        let types: Vec<&OpenType> = parameters.iter().map(ParameterDescriptor::open_type).collect();
        match resolve_method(target, method_name, &types) {
            Ok(binding) => {
                self.body = Body::Method(binding);
                self.parameters = Some(parameters);
            }
            Err(err) => self.defer(err),
        }
        self
    }

    /// Bind an erased invoker. Requires `parameters`; the return type
    /// defaults to `void`.
    pub fn invoker(mut self, invoker: Invoker) -> Self {
        self.body = Body::Raw(invoker);
        self
    }

    /// Explicit parameter list, replacing inferred parameters.
    pub fn parameters(mut self, parameters: Vec<ParameterDescriptor>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Names for inferred parameters, in order.
    pub fn param_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.param_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Explicit return type.
    pub fn returns(mut self, open_type: OpenType) -> Self {
        self.returns = Some(open_type);
        self
    }

    pub fn original_return_type(mut self, name: impl Into<String>) -> Self {
        self.original_return_type = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn impact(mut self, impact: Impact) -> Self {
        self.impact = impact;
        self
    }

    /// Null policy of inferred parameters.
    pub fn null_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }

    /// Merge descriptor fields.
    pub fn descriptor(mut self, descriptor: &Descriptor) -> Self {
        self.descriptor = self.descriptor.descriptor(descriptor);
        self
    }

    /// Publish a notification after every successful invocation.
    pub fn completion_notification<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str, u64, &OpenValue) -> Notification + Send + Sync + 'static,
    {
        self.notification = Some(Arc::new(factory));
        self
    }

    /// Build with the process-wide `TypeMapper`.
    pub fn build(self) -> Result<OperationDescriptor> {
        self.build_with(TypeMapper::global())
    }

    /// Build, resolving inferred types through `mapper`.
    pub fn build_with(mut self, mapper: &TypeMapper) -> Result<OperationDescriptor> {
        if let Some(err) = self.pending.take() {
            return Err(err);
        }
        if self.name.is_empty() {
            return Err(Error::InvalidDescriptor("operation name is empty".into()));
        }

        let body = std::mem::replace(&mut self.body, Body::Unbound);
        let (parameters, return_type, original_return_type, invoker) = match body {
            Body::Unbound => {
                return Err(Error::InvalidDescriptor(format!(
                    "operation {} has no bound function",
                    self.name
                )))
            }
            Body::Function {
                parameters,
                returns,
                invoker,
            } => {
                let witnesses = parameters
                    .iter()
                    .map(|t| mapper.resolve(t))
                    .collect::<Result<Vec<_>>>()?;
                let returns = mapper.resolve(&returns)?;
                let params = self.function_parameters(witnesses)?;
                (params, returns.open_type, returns.original_type, invoker)
            }
            Body::Method(binding) => {
                let params = self.parameters.take().unwrap_or_else(|| {
                    binding
                        .parameter_witnesses()
                        .iter()
                        .enumerate()
                        .map(|(i, w)| {
                            ParameterDescriptor::from_witness(default_param_name(i), w.clone())
                        })
                        .collect()
                });
                (
                    params,
                    binding.return_type().clone(),
                    binding.original_return_type().to_string(),
                    binding.invoker().clone(),
                )
            }
            Body::Raw(invoker) => {
                let params = self.parameters.take().ok_or_else(|| {
                    Error::InvalidDescriptor(format!(
                        "operation {} binds an erased invoker without parameters",
                        self.name
                    ))
                })?;
                let returns = self.returns.clone().unwrap_or(OpenType::VOID);
                let original = returns.type_tag().to_string();
                (params, returns, original, invoker)
            }
        };

        let return_type = match self.returns.take() {
            Some(explicit) if explicit != return_type => {
                return Err(Error::InvalidDescriptor(format!(
                    "operation {} declares return type {} but its function returns {}",
                    self.name, explicit, return_type
                )))
            }
            _ => return_type,
        };
        let original_return_type = self
            .original_return_type
            .take()
            .unwrap_or(original_return_type);

        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = parameters.iter().find(|p| !seen.insert(p.name())) {
            return Err(Error::InvalidDescriptor(format!(
                "operation {} has duplicate parameter {}",
                self.name,
                dup.name()
            )));
        }
        let parameters: Vec<ParameterDescriptor> =
            parameters.into_iter().map(ParameterDescriptor::finish).collect();

        let descriptor = self
            .descriptor
            .open_type(&return_type)
            .original_type(original_return_type.clone())
            .build();

        let operation = OperationDescriptor {
            description: self.description.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            parameters,
            return_type,
            original_return_type,
            impact: self.impact,
            descriptor,
            invoker,
            notification: self.notification,
        };
        log::debug!(
            "[OperationBuilder::build] {} -> {}",
            operation.key(),
            operation.return_type
        );
        Ok(operation)
    }

    fn function_parameters(
        &mut self,
        witnesses: Vec<crate::open_type::Witness>,
    ) -> Result<Vec<ParameterDescriptor>> {
        let arity = witnesses.len();

        if let Some(explicit) = self.parameters.take() {
            if explicit.len() != arity {
                return Err(Error::InvalidDescriptor(format!(
                    "operation {} declares {} parameters but its function takes {}",
                    self.name,
                    explicit.len(),
                    arity
                )));
            }
            for (index, (param, witness)) in explicit.iter().zip(&witnesses).enumerate() {
                if param.open_type() != &witness.open_type {
                    return Err(Error::InvalidDescriptor(format!(
                        "operation {} parameter {} is declared {} but the function takes {}",
                        self.name, index, param.open_type(), witness.open_type
                    )));
                }
            }
            return Ok(explicit);
        }

        let names = match self.param_names.take() {
            Some(names) if names.len() != arity => {
                return Err(Error::InvalidDescriptor(format!(
                    "operation {} has {} parameter names for {} parameters",
                    self.name,
                    names.len(),
                    arity
                )))
            }
            Some(names) => names,
            None => (0..arity).map(default_param_name).collect(),
        };

        let policy = self.null_policy;
        Ok(names
            .into_iter()
            .zip(witnesses)
            .map(|(name, witness)| {
                ParameterDescriptor::from_witness(name, witness).with_null_policy(policy)
            })
            .collect())
    }
}

fn default_param_name(index: usize) -> String {
    format!("{}{}", DEFAULT_PARAM_PREFIX, index)
}
