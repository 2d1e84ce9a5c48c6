// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::items_after_statements)] // Test helpers

//! Attribute access through a built registry.

use dynbean::attribute::{AttributeDescriptor, Getter, PropertyAccessors};
use dynbean::notification::{Handback, InlineExecutor, Notification};
use dynbean::open_type::{OpenType, OpenValue};
use dynbean::writer::{RecordWriter, TableWriter};
use dynbean::{Error, ManagementRegistry, NullPolicy, PropertySource, RegistryConfig};
use parking_lot::Mutex;
use std::sync::Arc;

fn collector() -> (Arc<Mutex<Vec<Notification>>>, Arc<dyn dynbean::NotificationListener>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let listener: Arc<dyn dynbean::NotificationListener> =
        Arc::new(move |n: &Notification, _: Option<&Handback>| sink.lock().push(n.clone()));
    (seen, listener)
}

#[test]
fn age_change_emits_one_notification() {
    let age = Arc::new(Mutex::new(12_i32));
    let (r, w) = (age.clone(), age.clone());
    let registry = ManagementRegistry::builder()
        .class_name("Person")
        .executor(Arc::new(InlineExecutor))
        .attribute("age", "Age in years", move || *r.lock(), move |v: i32| *w.lock() = v)
        .attribute_change_notifications()
        .build()
        .expect("valid registry");

    let (seen, listener) = collector();
    registry.subscribe(listener, None, None);

    assert_eq!(registry.get_value("age").expect("get"), OpenValue::I32(12));
    registry.set_value("age", OpenValue::I32(21)).expect("set");
    assert_eq!(*age.lock(), 21);

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    let change = seen[0].change().expect("attribute change");
    assert_eq!(change.attribute_name, "age");
    assert_eq!(change.attribute_type, "i32");
    assert_eq!(change.old_value, OpenValue::I32(12));
    assert_eq!(change.new_value, OpenValue::I32(21));
    assert_eq!(seen[0].kind(), dynbean::config::ATTRIBUTE_CHANGE_TYPE);
}

#[test]
fn read_only_and_write_only() {
    let sink = Arc::new(Mutex::new(String::new()));
    let w = sink.clone();
    let registry = ManagementRegistry::builder()
        .executor(Arc::new(InlineExecutor))
        .read_only_attribute("version", "Build version", || "1.2.3".to_string())
        .write_only_attribute("password", "Secret", move |v: String| *w.lock() = v)
        .build()
        .expect("valid registry");

    assert!(matches!(
        registry.set_value("version", OpenValue::from("2.0")),
        Err(Error::ReadOnlyAttribute(_))
    ));
    assert!(matches!(
        registry.get_value("password"),
        Err(Error::AttributeNotReadable(_))
    ));

    // Write-only attributes have no old value, so nothing is published.
    let (seen, listener) = collector();
    registry.subscribe(listener, None, None);
    registry
        .set_value("password", OpenValue::from("hunter2"))
        .expect("set");
    assert_eq!(*sink.lock(), "hunter2");
    assert!(seen.lock().is_empty());

    let info = registry.schema().attribute("password").expect("info");
    assert!(info.writable && !info.readable);
}

#[test]
fn null_policy_from_config() {
    let value = Arc::new(Mutex::new(7_i32));
    let build = |policy: NullPolicy| {
        let (r, w) = (value.clone(), value.clone());
        ManagementRegistry::builder()
            .executor(Arc::new(InlineExecutor))
            .config(RegistryConfig::default().with_null_policy(policy))
            .attribute("count", "Count", move || *r.lock(), move |v: i32| *w.lock() = v)
            .build()
            .expect("valid registry")
    };

    let rejecting = build(NullPolicy::Reject);
    assert!(matches!(
        rejecting.set_value("count", OpenValue::Null),
        Err(Error::NullValue { .. })
    ));
    assert_eq!(*value.lock(), 7);

    let defaulting = build(NullPolicy::Default);
    defaulting.set_value("count", OpenValue::Null).expect("null coerced");
    assert_eq!(*value.lock(), 0);
}

#[test]
fn optional_attribute_accepts_null() {
    let nickname = Arc::new(Mutex::new(Some("Bob".to_string())));
    let (r, w) = (nickname.clone(), nickname.clone());
    let registry = ManagementRegistry::builder()
        .executor(Arc::new(InlineExecutor))
        .attribute("nickname", "Nickname", move || r.lock().clone(), move |v: Option<String>| {
            *w.lock() = v;
        })
        .build()
        .expect("valid registry");

    assert!(registry.schema().attribute("nickname").expect("info").nullable);
    registry.set_value("nickname", OpenValue::Null).expect("set null");
    assert_eq!(*nickname.lock(), None);
    assert_eq!(registry.get_value("nickname").expect("get"), OpenValue::Null);
}

#[test]
fn type_mismatch_rejected() {
    let registry = ManagementRegistry::builder()
        .executor(Arc::new(InlineExecutor))
        .attribute("level", "Level", || 3_i32, |_: i32| {})
        .build()
        .expect("valid registry");
    assert!(matches!(
        registry.set_value("level", OpenValue::from("high")),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn erased_getter_needs_explicit_type() {
    let getter: Getter =
        Arc::new(|| -> Result<OpenValue, dynbean::BoxError> { Ok(OpenValue::I64(1)) });

    let err = AttributeDescriptor::builder("raw")
        .raw_getter(getter.clone())
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::TypeInference { .. }));
    assert!(err.is_build_error());

    let attr = AttributeDescriptor::builder("raw")
        .open_type(OpenType::I64)
        .raw_getter(getter)
        .build()
        .expect("typed raw attribute");
    let registry = ManagementRegistry::builder()
        .executor(Arc::new(InlineExecutor))
        .with_attribute(attr)
        .build()
        .expect("valid registry");
    assert_eq!(registry.get_value("raw").expect("get"), OpenValue::I64(1));
}

#[test]
fn accessor_failure_is_scoped_to_call() {
    let registry = ManagementRegistry::builder()
        .executor(Arc::new(InlineExecutor))
        .with_attribute(
            AttributeDescriptor::builder("flaky")
                .try_getter(|| -> Result<i32, String> { Err("sensor offline".into()) })
                .build()
                .expect("attribute"),
        )
        .read_only_attribute("stable", "Stable", || 1_i32)
        .build()
        .expect("valid registry");

    match registry.get_value("flaky") {
        Err(Error::Accessor { attribute, source }) => {
            assert_eq!(attribute, "flaky");
            assert_eq!(source.to_string(), "sensor offline");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(registry.get_value("stable").expect("get"), OpenValue::I32(1));
}

struct Settings {
    host: Mutex<String>,
    port: Mutex<u16>,
}

impl PropertySource for Settings {
    fn property(self: Arc<Self>, name: &str) -> Option<PropertyAccessors> {
        let (r, w) = (self.clone(), self);
        match name {
            "host" => Some(
                PropertyAccessors::new()
                    .getter(move || r.host.lock().clone())
                    .setter(move |v: String| *w.host.lock() = v),
            ),
            "port" => Some(PropertyAccessors::new().getter(move || *r.port.lock())),
            _ => None,
        }
    }
}

#[test]
fn bean_attributes() {
    let settings = Arc::new(Settings {
        host: Mutex::new("localhost".into()),
        port: Mutex::new(8080),
    });
    let registry = ManagementRegistry::builder()
        .executor(Arc::new(InlineExecutor))
        .bean_attribute("host", "Bind host", settings.clone())
        .bean_attribute("port", "Bind port", settings.clone())
        .build()
        .expect("valid registry");

    registry
        .set_value("host", OpenValue::from("0.0.0.0"))
        .expect("set host");
    assert_eq!(*settings.host.lock(), "0.0.0.0");
    assert_eq!(registry.get_value("port").expect("get"), OpenValue::U16(8080));
    assert!(matches!(
        registry.set_value("port", OpenValue::U16(1)),
        Err(Error::ReadOnlyAttribute(_))
    ));

    let err = ManagementRegistry::builder()
        .executor(Arc::new(InlineExecutor))
        .bean_attribute("missing", "No such property", settings)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidDescriptor(_)));
}

#[derive(Clone)]
struct Member {
    name: String,
    role: String,
}

#[test]
fn record_and_table_attributes() {
    let members = Arc::new(Mutex::new(vec![
        Member {
            name: "ada".into(),
            role: "lead".into(),
        },
        Member {
            name: "linus".into(),
            role: "dev".into(),
        },
    ]));
    let row = RecordWriter::builder("Member")
        .field("name", |m: &Member| m.name.clone())
        .field("role", |m: &Member| m.role.clone())
        .build()
        .expect("record writer");
    let table = TableWriter::builder("Members")
        .index_name("name")
        .record_writer(row.clone())
        .build()
        .expect("table writer");

    let (lead, all) = (members.clone(), members.clone());
    let registry = ManagementRegistry::builder()
        .executor(Arc::new(InlineExecutor))
        .record_attribute("lead", "Team lead", move || lead.lock()[0].clone(), row)
        .table_attribute("members", "Team members", move || all.lock().clone(), table)
        .build()
        .expect("valid registry");

    let lead = registry.get_value("lead").expect("lead");
    let lead = lead.as_record().expect("record");
    assert_eq!(lead.get("role"), Some(&OpenValue::from("lead")));

    members.lock().push(Member {
        name: "grace".into(),
        role: "dev".into(),
    });
    let all = registry.get_value("members").expect("members");
    assert_eq!(all.as_table().expect("table").len(), 3);

    let info = registry.schema().attribute("members").expect("info");
    assert_eq!(info.open_type.type_tag(), "Members");
    assert!(!info.writable);

    // A duplicate key surfaces as an accessor failure of this read only.
    members.lock().push(Member {
        name: "ada".into(),
        role: "dev".into(),
    });
    assert!(matches!(
        registry.get_value("members"),
        Err(Error::Accessor { .. })
    ));
    assert!(registry.get_value("lead").is_ok());
}
