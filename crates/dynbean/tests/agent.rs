// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure

//! Name-addressed access through the management agent.

use dynbean::notification::{Handback, InlineExecutor, Notification, NotificationListener};
use dynbean::open_type::OpenValue;
use dynbean::registry::Attribute;
use dynbean::{Error, ManagementAgent, ManagementRegistry, ObjectName};
use parking_lot::Mutex;
use std::sync::Arc;

struct Cache {
    capacity: Mutex<u32>,
    entries: Mutex<Vec<String>>,
}

fn cache_registry(cache: &Arc<Cache>) -> ManagementRegistry {
    let (cr, cw, size, clear) = (cache.clone(), cache.clone(), cache.clone(), cache.clone());
    ManagementRegistry::builder()
        .class_name("Cache")
        .executor(Arc::new(InlineExecutor))
        .attribute(
            "capacity",
            "Maximum entries",
            move || *cr.capacity.lock(),
            move |v: u32| *cw.capacity.lock() = v,
        )
        .read_only_attribute("size", "Current entries", move || size.entries.lock().len() as u64)
        .operation("clear", "Drop every entry", &[], move || {
            let mut entries = clear.entries.lock();
            let dropped = entries.len() as u64;
            entries.clear();
            dropped
        })
        .attribute_change_notifications()
        .build()
        .expect("valid registry")
}

fn cache() -> Arc<Cache> {
    Arc::new(Cache {
        capacity: Mutex::new(128),
        entries: Mutex::new(vec!["a".into(), "b".into()]),
    })
}

#[test]
fn register_and_dispatch_by_name() {
    let agent = ManagementAgent::new("app");
    let cache = cache();
    let name = agent
        .register(
            ObjectName::parse("app:type=Cache,name=users").expect("name"),
            cache_registry(&cache),
        )
        .expect("register");

    // Lookups use canonical equality, whatever the key order.
    let reordered: ObjectName = "app:name=users,type=Cache".parse().expect("name");
    assert!(agent.is_registered(&reordered));

    assert_eq!(
        agent.get_attribute(&reordered, "capacity").expect("get"),
        OpenValue::U32(128)
    );
    agent
        .set_attribute(&name, Attribute::new("capacity", OpenValue::U32(256)))
        .expect("set");
    assert_eq!(*cache.capacity.lock(), 256);

    let got = agent
        .get_attributes(&name, &["capacity", "size", "missing"])
        .expect("bulk get");
    assert_eq!(
        got,
        vec![
            Attribute::new("capacity", OpenValue::U32(256)),
            Attribute::new("size", OpenValue::U64(2)),
        ]
    );

    let dropped = agent.invoke(&name, "clear", &[], &[]).expect("invoke");
    assert_eq!(dropped, OpenValue::U64(2));
    assert_eq!(
        agent.get_attribute(&name, "size").expect("get"),
        OpenValue::U64(0)
    );

    let info = agent.info(&name).expect("info");
    assert_eq!(info.class_name, "Cache");
    assert!(info.attribute("capacity").is_some());
}

#[test]
fn listeners_through_agent() {
    let agent = ManagementAgent::new("app");
    let cache = cache();
    let name = ObjectName::new("app", [("type", "Cache")]).expect("name");
    agent
        .register(name.clone(), cache_registry(&cache))
        .expect("register");

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let listener: Arc<dyn NotificationListener> =
        Arc::new(move |n: &Notification, _: Option<&Handback>| sink.lock().push(n.clone()));
    agent
        .add_notification_listener(&name, listener.clone(), None, None)
        .expect("subscribe");

    let written = agent
        .set_attributes(
            &name,
            vec![
                Attribute::new("capacity", OpenValue::U32(64)),
                Attribute::new("size", OpenValue::U64(9)),
            ],
        )
        .expect("bulk set");
    assert_eq!(written.len(), 1);
    assert_eq!(seen.lock().len(), 1);

    assert_eq!(
        agent
            .remove_notification_listener(&name, &listener)
            .expect("remove"),
        1
    );
    assert!(matches!(
        agent.remove_notification_listener(&name, &listener),
        Err(Error::ListenerNotFound)
    ));
}

#[test]
fn unregister_returns_registry() {
    let agent = ManagementAgent::default();
    let name: ObjectName = "dynbean:type=Cache".parse().expect("name");
    agent
        .register(name.clone(), Arc::new(cache_registry(&cache())))
        .expect("register");
    assert!(matches!(
        agent.register(name.clone(), cache_registry(&cache())),
        Err(Error::AlreadyRegistered(_))
    ));

    let registry = agent.unregister(&name).expect("unregister");
    assert_eq!(registry.class_name(), "Cache");
    assert!(!agent.is_registered(&name));
    assert!(matches!(
        agent.invoke(&name, "clear", &[], &[]),
        Err(Error::InstanceNotFound(_))
    ));
}

#[test]
fn concurrent_access_from_many_threads() {
    let agent = Arc::new(ManagementAgent::new("app"));
    let cache = cache();
    let name = ObjectName::parse("app:type=Cache").expect("name");
    agent
        .register(name.clone(), cache_registry(&cache))
        .expect("register");

    let handles: Vec<_> = (0..8_u32)
        .map(|i| {
            let agent = agent.clone();
            let name = name.clone();
            std::thread::spawn(move || {
                for j in 0..50_u32 {
                    agent
                        .set_attribute(&name, Attribute::new("capacity", OpenValue::U32(i * 100 + j)))
                        .expect("set");
                    agent.get_attribute(&name, "capacity").expect("get");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread");
    }
    assert!(*cache.capacity.lock() < 800);
}
