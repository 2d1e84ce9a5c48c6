// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry of operations keyed by name and signature.

use super::descriptor::{OperationDescriptor, SignatureKey};
use crate::error::{Error, Result};
use crate::notification::ChangeNotifier;
use crate::open_type::OpenValue;
use crate::registry::OperationInfo;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Operations of one registry, overloadable by signature.
#[derive(Debug, Default)]
pub struct OperationRegistry {
    operations: HashMap<SignatureKey, Arc<OperationDescriptor>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operation; returns the one it replaced, if any.
    pub fn add(&mut self, operation: OperationDescriptor) -> Option<Arc<OperationDescriptor>> {
        let key = operation.key();
        let previous = self.operations.insert(key.clone(), Arc::new(operation));
        if previous.is_some() {
            log::debug!("[OperationRegistry::add] {} replaced", key);
        }
        previous
    }

    /// Look up by exact name and signature.
    pub fn find(&self, name: &str, signature: &[String]) -> Option<&Arc<OperationDescriptor>> {
        self.operations
            .get(&SignatureKey::new(name, signature.iter().cloned()))
    }

    /// `true` if any overload is named `name`.
    pub fn contains_name(&self, name: &str) -> bool {
        self.operations.keys().any(|k| k.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<OperationDescriptor>> {
        self.operations.values()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Schema entries ordered by name, then signature.
    pub fn infos(&self) -> Vec<OperationInfo> {
        let mut keys: Vec<&SignatureKey> = self.operations.keys().collect();
        keys.sort();
        keys.into_iter()
            .filter_map(|k| self.operations.get(k))
            .map(|op| op.info())
            .collect()
    }

    /// Invoke the operation matching `name` and `signature`.
    ///
    /// On success a bound completion notification is published through
    /// `notifier`; a failure while building it is logged and does not
    /// affect the result.
    pub fn invoke(
        &self,
        source: &str,
        name: &str,
        args: &[OpenValue],
        signature: &[String],
        notifier: &ChangeNotifier,
    ) -> Result<OpenValue> {
        let operation = self.find(name, signature).ok_or_else(|| {
            let err = Error::OperationNotFound {
                name: name.to_string(),
                signature: signature.to_vec(),
                name_known: self.contains_name(name),
            };
            log::debug!("[OperationRegistry::invoke] {}", err);
            err
        })?;

        let result = operation.invoke(args).map_err(|err| {
            log::debug!("[OperationRegistry::invoke] {} failed: {}", operation.key(), err);
            err
        })?;

        if operation.has_completion_notification() {
            let sequence = notifier.next_sequence();
            let built = catch_unwind(AssertUnwindSafe(|| {
                operation.completion_notification(source, sequence, &result)
            }));
            match built {
                Ok(Some(notification)) => notifier.publish(notification),
                Ok(None) => {}
                Err(_) => log::warn!(
                    "[OperationRegistry::invoke] notification factory of {} panicked",
                    operation.key()
                ),
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{InlineExecutor, Notification};
    use parking_lot::Mutex;

    fn registry() -> OperationRegistry {
        let mut registry = OperationRegistry::new();
        registry.add(
            OperationDescriptor::builder("concatenate")
                .function(|a: String, b: String| format!("{}{}", a, b))
                .param_names(["arg1", "arg2"])
                .build()
                .expect("valid"),
        );
        registry.add(
            OperationDescriptor::builder("concatenate")
                .function(|a: String, b: String, c: String| format!("{}{}{}", a, b, c))
                .build()
                .expect("valid"),
        );
        registry
    }

    fn notifier() -> ChangeNotifier {
        ChangeNotifier::new("test", Arc::new(InlineExecutor))
    }

    fn sig(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn overloads_dispatch_by_signature() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        let two = registry
            .invoke(
                "test",
                "concatenate",
                &[OpenValue::from("a"), OpenValue::from("b")],
                &sig(&["string", "string"]),
                &notifier(),
            )
            .expect("invoke");
        assert_eq!(two, OpenValue::from("ab"));
    }

    #[test]
    fn wrong_signature_is_not_found_with_known_name() {
        let err = registry()
            .invoke(
                "test",
                "concatenate",
                &[OpenValue::I32(1)],
                &sig(&["i32"]),
                &notifier(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::OperationNotFound {
                name_known: true,
                ..
            }
        ));

        let err = registry()
            .invoke("test", "split", &[], &[], &notifier())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::OperationNotFound {
                name_known: false,
                ..
            }
        ));
    }

    #[test]
    fn infos_are_ordered() {
        let infos = registry().infos();
        let sigs: Vec<usize> = infos.iter().map(|i| i.parameters.len()).collect();
        assert_eq!(sigs, vec![2, 3]);
    }

    #[test]
    fn completion_notification_is_published() {
        let mut registry = OperationRegistry::new();
        registry.add(
            OperationDescriptor::builder("restart")
                .function(|| true)
                .completion_notification(|source, seq, result| {
                    Notification::new("service.restarted", source, seq, format!("ok={}", result))
                })
                .build()
                .expect("valid"),
        );
        let notifier = notifier();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        notifier.subscribe(
            Arc::new(move |n: &Notification, _: Option<&crate::notification::Handback>| {
                sink.lock().push(n.clone())
            }),
            None,
            None,
        );
        registry
            .invoke("svc", "restart", &[], &[], &notifier)
            .expect("invoke");
        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind(), "service.restarted");
        assert_eq!(seen[0].source(), "svc");
        assert_eq!(seen[0].message(), "ok=true");
    }

    #[test]
    fn panicking_factory_does_not_fail_call() {
        let mut registry = OperationRegistry::new();
        registry.add(
            OperationDescriptor::builder("ping")
                .function(|| 1_i32)
                .completion_notification(|_, _, _| panic!("factory exploded"))
                .build()
                .expect("valid"),
        );
        let out = registry
            .invoke("svc", "ping", &[], &[], &notifier())
            .expect("call succeeds");
        assert_eq!(out, OpenValue::I32(1));
    }
}
