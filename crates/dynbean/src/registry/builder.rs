// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Builder for `ManagementRegistry`.

use super::{ManagementRegistry, RegistryInfo};
use crate::attribute::{AttributeBuilder, AttributeDescriptor, AttributeRegistry, PropertySource};
use crate::config::{RegistryConfig, DEFAULT_CLASS_NAME};
use crate::descriptor::{Descriptor, DescriptorBuilder};
use crate::error::{BoxError, Result};
use crate::notification::{ChangeNotifier, Executor, NotificationDescriptor, WorkerPool};
use crate::open_type::{FromOpenValue, IntoOpenValue, OpenValue, TypeMapper};
use crate::operation::{
    IntoOperation, IntoTryOperation, MethodTable, OperationBuilder, OperationDescriptor,
    OperationRegistry, ParameterDescriptor,
};
use crate::writer::{RecordWriter, TableWriter};
use std::sync::Arc;

enum PendingAttribute {
    Builder(AttributeBuilder),
    Built(AttributeDescriptor),
}

enum PendingOperation {
    Builder(Box<OperationBuilder>),
    Built(OperationDescriptor),
}

/// Accumulates attributes, operations and notifications, then freezes them
/// into an immutable `ManagementRegistry`.
///
/// Every method chains infallibly. Descriptors added through the convenience
/// methods are built by `build()`, which reports the first error and yields
/// no registry at all in that case.
///
/// # Example
///
/// ```rust
/// use dynbean::open_type::OpenValue;
/// use dynbean::registry::ManagementRegistry;
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use std::sync::Arc;
///
/// let age = Arc::new(AtomicI32::new(12));
/// let (r, w) = (age.clone(), age.clone());
/// let registry = ManagementRegistry::builder()
///     .class_name("Person")
///     .attribute(
///         "age",
///         "Age in years",
///         move || r.load(Ordering::SeqCst),
///         move |v: i32| w.store(v, Ordering::SeqCst),
///     )
///     .operation(
///         "greet",
///         "Say hello",
///         &["name"],
///         |name: String| format!("hello {}", name),
///     )
///     .build()
///     .unwrap();
///
/// registry.set_value("age", OpenValue::I32(21)).unwrap();
/// assert_eq!(registry.get_value("age").unwrap(), OpenValue::I32(21));
/// ```
pub struct ManagementRegistryBuilder {
    class_name: Option<String>,
    description: Option<String>,
    descriptor: DescriptorBuilder,
    immutable_info: bool,
    attributes: Vec<PendingAttribute>,
    operations: Vec<PendingOperation>,
    notifications: Vec<NotificationDescriptor>,
    executor: Option<Arc<dyn Executor>>,
    config: RegistryConfig,
    mapper: Option<Arc<TypeMapper>>,
}

impl Default for ManagementRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ManagementRegistryBuilder {
    pub fn new() -> Self {
        Self {
            class_name: None,
            description: None,
            descriptor: DescriptorBuilder::default(),
            immutable_info: false,
            attributes: Vec::new(),
            operations: Vec::new(),
            notifications: Vec::new(),
            executor: None,
            config: RegistryConfig::default(),
            mapper: None,
        }
    }

    /// Class name reported in the schema and used as notification source.
    pub fn class_name(mut self, name: impl Into<String>) -> Self {
        self.class_name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Merge registry-level descriptor fields.
    pub fn descriptor(mut self, descriptor: &Descriptor) -> Self {
        self.descriptor = self.descriptor.descriptor(descriptor);
        self
    }

    /// Mark the schema as immutable for the registry's lifetime.
    pub fn immutable_info(mut self) -> Self {
        self.immutable_info = true;
        self
    }

    /// Runtime settings (worker pool size, default null policy).
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Deliver notifications on `executor` instead of a private worker pool.
    pub fn executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Resolve inferred types through `mapper` instead of the global one.
    pub fn type_mapper(mut self, mapper: Arc<TypeMapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    // =======================================================================
    // Attributes
    // =======================================================================

    /// Read/write attribute.
    pub fn attribute<T, G, S>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        getter: G,
        setter: S,
    ) -> Self
    where
        G: Fn() -> T + Send + Sync + 'static,
        S: Fn(T) + Send + Sync + 'static,
        T: IntoOpenValue + FromOpenValue + 'static,
    {
        let builder = AttributeDescriptor::builder(name)
            .description(description)
            .getter(getter)
            .setter(setter);
        self.attribute_builder(builder)
    }

    pub fn read_only_attribute<T, G>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        getter: G,
    ) -> Self
    where
        G: Fn() -> T + Send + Sync + 'static,
        T: IntoOpenValue + 'static,
    {
        let builder = AttributeDescriptor::builder(name)
            .description(description)
            .getter(getter);
        self.attribute_builder(builder)
    }

    pub fn write_only_attribute<T, S>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        setter: S,
    ) -> Self
    where
        S: Fn(T) + Send + Sync + 'static,
        T: FromOpenValue + 'static,
    {
        let builder = AttributeDescriptor::builder(name)
            .description(description)
            .setter(setter);
        self.attribute_builder(builder)
    }

    /// Read-only attribute whose value is `getter()` projected by `writer`.
    pub fn record_attribute<I, G>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        getter: G,
        writer: RecordWriter<I>,
    ) -> Self
    where
        G: Fn() -> I + Send + Sync + 'static,
        I: 'static,
    {
        let open_type = writer.open_type();
        let builder = AttributeDescriptor::builder(name)
            .description(description)
            .open_type(open_type)
            .raw_getter(Arc::new(
                move || -> std::result::Result<OpenValue, BoxError> {
                    Ok(OpenValue::Record(writer.apply(&getter())?))
                },
            ));
        self.attribute_builder(builder)
    }

    /// Read-only attribute whose rows are `getter()` indexed by `writer`.
    pub fn table_attribute<I, C, G>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        getter: G,
        writer: TableWriter<I>,
    ) -> Self
    where
        G: Fn() -> C + Send + Sync + 'static,
        C: IntoIterator<Item = I>,
        I: 'static,
    {
        let open_type = writer.open_type();
        let builder = AttributeDescriptor::builder(name)
            .description(description)
            .open_type(open_type)
            .raw_getter(Arc::new(
                move || -> std::result::Result<OpenValue, BoxError> {
                    let rows: Vec<I> = getter().into_iter().collect();
                    Ok(OpenValue::Table(writer.apply(&rows)?))
                },
            ));
        self.attribute_builder(builder)
    }

    /// Attribute bound to the property `name` of a bean-convention source.
    pub fn bean_attribute<S>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        source: Arc<S>,
    ) -> Self
    where
        S: PropertySource + 'static,
    {
        let name = name.into();
        let builder = AttributeDescriptor::builder(name.clone())
            .description(description)
            .bean_property(source, &name);
        self.attribute_builder(builder)
    }

    fn attribute_builder(mut self, builder: AttributeBuilder) -> Self {
        self.attributes.push(PendingAttribute::Builder(builder));
        self
    }

    /// Add a fully built attribute.
    pub fn with_attribute(mut self, attribute: AttributeDescriptor) -> Self {
        self.attributes.push(PendingAttribute::Built(attribute));
        self
    }

    // =======================================================================
    // Operations
    // =======================================================================

    /// Operation bound to a plain function.
    ///
    /// `param_names` names the parameters in order; an empty slice keeps the
    /// generated names (`p0`, `p1`, ...).
    pub fn operation<Args, R, F>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        param_names: &[&str],
        f: F,
    ) -> Self
    where
        F: IntoOperation<Args, R>,
    {
        let builder = OperationDescriptor::builder(name)
            .description(description)
            .function(f);
        self.operation_builder(with_param_names(builder, param_names))
    }

    /// Operation bound to a fallible function.
    pub fn try_operation<Args, R, E, F>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        param_names: &[&str],
        f: F,
    ) -> Self
    where
        F: IntoTryOperation<Args, R, E>,
    {
        let builder = OperationDescriptor::builder(name)
            .description(description)
            .try_function(f);
        self.operation_builder(with_param_names(builder, param_names))
    }

    /// Operation late-bound to the method `method_name` of `target`.
    pub fn method_operation<T>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        target: Arc<T>,
        method_name: &str,
        parameters: Vec<ParameterDescriptor>,
    ) -> Self
    where
        T: MethodTable + ?Sized,
    {
        let builder = OperationDescriptor::builder(name)
            .description(description)
            .method(target, method_name, parameters);
        self.operation_builder(builder)
    }

    fn operation_builder(mut self, builder: OperationBuilder) -> Self {
        self.operations.push(PendingOperation::Builder(Box::new(builder)));
        self
    }

    /// Add a fully built operation.
    pub fn with_operation(mut self, operation: OperationDescriptor) -> Self {
        self.operations.push(PendingOperation::Built(operation));
        self
    }

    // =======================================================================
    // Notifications
    // =======================================================================

    /// Declare a notification the registry may emit.
    pub fn notification<I, S>(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        types: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notifications
            .push(NotificationDescriptor::new(name, types).with_description(description));
        self
    }

    pub fn with_notification(mut self, notification: NotificationDescriptor) -> Self {
        self.notifications.push(notification);
        self
    }

    /// Declare the attribute change notification in the schema.
    pub fn attribute_change_notifications(mut self) -> Self {
        let descriptor = NotificationDescriptor::attribute_change();
        if !self.notifications.iter().any(|n| n.name() == descriptor.name()) {
            self.notifications.push(descriptor);
        }
        self
    }

    // =======================================================================
    // Build
    // =======================================================================

    /// Freeze into a registry.
    ///
    /// # Errors
    ///
    /// The first configuration, type or descriptor error; no registry is
    /// produced in that case.
    pub fn build(self) -> Result<ManagementRegistry> {
        self.config.validate()?;
        let mapper: &TypeMapper = self.mapper.as_deref().unwrap_or_else(|| TypeMapper::global());
        let policy = self.config.null_policy;

        let mut attributes = AttributeRegistry::new();
        for pending in self.attributes {
            let attribute = match pending {
                PendingAttribute::Builder(builder) => {
                    builder.null_policy(policy).build_with(mapper)?
                }
                PendingAttribute::Built(attribute) => attribute,
            };
            attributes.add(attribute);
        }

        let mut operations = OperationRegistry::new();
        for pending in self.operations {
            let operation = match pending {
                PendingOperation::Builder(builder) => {
                    (*builder).null_policy(policy).build_with(mapper)?
                }
                PendingOperation::Built(operation) => operation,
            };
            operations.add(operation);
        }

        let class_name = self
            .class_name
            .unwrap_or_else(|| DEFAULT_CLASS_NAME.to_string());
        let description = self.description.unwrap_or_else(|| class_name.clone());
        let mut descriptor = self.descriptor;
        if self.immutable_info || self.config.immutable_info {
            descriptor = descriptor.immutable_info(true);
        }

        let executor: Arc<dyn Executor> = match self.executor {
            Some(executor) => executor,
            None => Arc::new(WorkerPool::with_config(&self.config.notifier)?),
        };

        let info = RegistryInfo {
            class_name: class_name.clone(),
            description,
            attributes: attributes.infos(),
            operations: operations.infos(),
            notifications: self.notifications,
            descriptor: descriptor.build(),
        };
        log::info!(
            "[ManagementRegistryBuilder::build] {} with {} attributes, {} operations",
            class_name,
            attributes.len(),
            operations.len()
        );

        Ok(ManagementRegistry {
            notifier: ChangeNotifier::new(class_name, executor),
            info,
            attributes,
            operations,
        })
    }
}

fn with_param_names(builder: OperationBuilder, names: &[&str]) -> OperationBuilder {
    if names.is_empty() {
        builder
    } else {
        builder.param_names(names.iter().copied())
    }
}
