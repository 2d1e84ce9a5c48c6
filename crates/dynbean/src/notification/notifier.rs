// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Publish/subscribe delivery of registry notifications.
//!
//! The subscriber list is copy-on-write (`ArcSwap`): `publish` takes a
//! snapshot without locking, subscribe/unsubscribe swap in a new list.

use super::{Executor, Handback, Notification, NotificationFilter, NotificationListener};
use crate::error::{Error, Result};
use arc_swap::ArcSwap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies one subscription of a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

struct Subscription {
    id: SubscriptionId,
    listener: Arc<dyn NotificationListener>,
    filter: Option<Arc<dyn NotificationFilter>>,
    handback: Option<Handback>,
}

impl Subscription {
    fn deliver(&self, notification: &Notification) {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let enabled = match &self.filter {
                Some(filter) => filter.is_enabled(notification),
                None => true,
            };
            if enabled {
                self.listener
                    .handle_notification(notification, self.handback.as_ref());
            }
        }));
        if outcome.is_err() {
            log::warn!(
                "[ChangeNotifier::deliver] listener {} panicked on {} #{}",
                self.id,
                notification.kind(),
                notification.sequence()
            );
        }
    }
}

fn same_listener(a: &Arc<dyn NotificationListener>, b: &Arc<dyn NotificationListener>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a).cast::<()>(),
        Arc::as_ptr(b).cast::<()>(),
    )
}

/// Fan-out of notifications to subscribed listeners over an executor.
pub struct ChangeNotifier {
    source: String,
    subscriptions: ArcSwap<Vec<Arc<Subscription>>>,
    next_id: AtomicU64,
    sequence: AtomicU64,
    executor: Arc<dyn Executor>,
}

impl ChangeNotifier {
    /// Create a notifier for `source` delivering on `executor`.
    pub fn new(source: impl Into<String>, executor: Arc<dyn Executor>) -> Self {
        Self {
            source: source.into(),
            subscriptions: ArcSwap::from_pointee(Vec::new()),
            next_id: AtomicU64::new(1),
            sequence: AtomicU64::new(0),
            executor,
        }
    }

    /// Source name stamped on notifications without one.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Add a subscription. The same listener may subscribe several times.
    pub fn subscribe(
        &self,
        listener: Arc<dyn NotificationListener>,
        filter: Option<Arc<dyn NotificationFilter>>,
        handback: Option<Handback>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let subscription = Arc::new(Subscription {
            id,
            listener,
            filter,
            handback,
        });
        self.subscriptions.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(Arc::clone(&subscription));
            next
        });
        log::debug!("[ChangeNotifier::subscribe] {} on {}", id, self.source);
        id
    }

    /// Remove one subscription.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<()> {
        let removed = self.remove_where(|s| s.id == id);
        if removed == 0 {
            return Err(Error::ListenerNotFound);
        }
        log::debug!("[ChangeNotifier::unsubscribe] {} on {}", id, self.source);
        Ok(())
    }

    /// Remove every subscription of `listener`; returns how many were removed.
    pub fn unsubscribe_listener(&self, listener: &Arc<dyn NotificationListener>) -> Result<usize> {
        let removed = self.remove_where(|s| same_listener(&s.listener, listener));
        if removed == 0 {
            return Err(Error::ListenerNotFound);
        }
        Ok(removed)
    }

    fn remove_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&Subscription) -> bool,
    {
        let previous = self.subscriptions.rcu(|current| {
            current
                .iter()
                .filter(|s| !predicate(s))
                .cloned()
                .collect::<Vec<_>>()
        });
        previous.iter().filter(|s| predicate(s)).count()
    }

    /// Next notification sequence number, starting at 1.
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Fire-and-forget delivery to every current subscription.
    pub fn publish(&self, mut notification: Notification) {
        notification.set_source_if_empty(&self.source);
        let snapshot = self.subscriptions.load_full();
        if snapshot.is_empty() {
            return;
        }
        let notification = Arc::new(notification);
        for subscription in snapshot.iter() {
            let subscription = Arc::clone(subscription);
            let notification = Arc::clone(&notification);
            self.executor.execute(
                subscription.id.as_u64(),
                Box::new(move || subscription.deliver(&notification)),
            );
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.load().len()
    }

    /// Shut down the underlying executor.
    pub fn shutdown(&self) {
        self.executor.shutdown();
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("source", &self.source)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::InlineExecutor;
    use parking_lot::Mutex;

    fn notifier() -> ChangeNotifier {
        ChangeNotifier::new("test", Arc::new(InlineExecutor))
    }

    fn recorder() -> (Arc<Mutex<Vec<u64>>>, Arc<dyn NotificationListener>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let listener: Arc<dyn NotificationListener> =
            Arc::new(move |n: &Notification, _: Option<&Handback>| sink.lock().push(n.sequence()));
        (seen, listener)
    }

    #[test]
    fn publish_reaches_subscribers() {
        let notifier = notifier();
        let (seen, listener) = recorder();
        notifier.subscribe(listener, None, None);
        notifier.publish(Notification::new("x", "", 5, ""));
        assert_eq!(*seen.lock(), vec![5]);
    }

    #[test]
    fn filter_blocks_delivery() {
        let notifier = notifier();
        let (seen, listener) = recorder();
        let filter: Arc<dyn NotificationFilter> = Arc::new(|n: &Notification| n.kind() == "keep");
        notifier.subscribe(listener, Some(filter), None);
        notifier.publish(Notification::new("drop", "", 1, ""));
        notifier.publish(Notification::new("keep", "", 2, ""));
        assert_eq!(*seen.lock(), vec![2]);
    }

    #[test]
    fn panicking_listener_is_isolated() {
        let notifier = notifier();
        let bad: Arc<dyn NotificationListener> =
            Arc::new(|_: &Notification, _: Option<&Handback>| panic!("listener bug"));
        let (seen, good) = recorder();
        notifier.subscribe(bad, None, None);
        notifier.subscribe(good, None, None);
        notifier.publish(Notification::new("x", "", 9, ""));
        assert_eq!(*seen.lock(), vec![9]);
    }

    #[test]
    fn unsubscribe_by_id_and_listener() {
        let notifier = notifier();
        let (seen, listener) = recorder();
        let first = notifier.subscribe(listener.clone(), None, None);
        notifier.subscribe(listener.clone(), None, None);
        assert_eq!(notifier.subscriber_count(), 2);

        notifier.unsubscribe(first).expect("known id");
        assert!(matches!(
            notifier.unsubscribe(first),
            Err(Error::ListenerNotFound)
        ));
        assert_eq!(notifier.unsubscribe_listener(&listener).ok(), Some(1));
        assert!(notifier.unsubscribe_listener(&listener).is_err());

        notifier.publish(Notification::new("x", "", 1, ""));
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn source_is_stamped() {
        let notifier = notifier();
        let sources = Arc::new(Mutex::new(Vec::new()));
        let sink = sources.clone();
        notifier.subscribe(
            Arc::new(move |n: &Notification, _: Option<&Handback>| {
                sink.lock().push(n.source().to_string())
            }),
            None,
            None,
        );
        notifier.publish(Notification::new("x", "", 1, ""));
        notifier.publish(Notification::new("x", "other", 2, ""));
        assert_eq!(*sources.lock(), vec!["test".to_string(), "other".to_string()]);
        assert_eq!(notifier.next_sequence(), 1);
        assert_eq!(notifier.next_sequence(), 2);
    }
}
