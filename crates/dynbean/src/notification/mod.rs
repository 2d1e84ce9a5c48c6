// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Notifications: events, listeners, filters and asynchronous delivery.

mod event;
mod executor;
mod listener;
mod notifier;

pub use event::{AttributeChange, Notification, NotificationDescriptor};
pub use executor::{Executor, InlineExecutor, Task, WorkerPool};
pub use listener::{
    AttributeChangeFilter, Handback, NotificationFilter, NotificationListener,
    NotificationTypeFilter,
};
pub use notifier::{ChangeNotifier, SubscriptionId};
