// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure

/// Person Registry Example
///
/// Demonstrates:
/// - Read/write and record attributes
/// - Overloaded operations invoked by signature
/// - Attribute change notifications on the worker pool
/// - Registration with the process-wide agent
use dynbean::notification::{Handback, Notification};
use dynbean::open_type::OpenValue;
use dynbean::writer::RecordWriter;
use dynbean::{ManagementAgent, ManagementRegistry, ObjectName};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
struct Address {
    city: String,
    state: String,
}

struct Person {
    age: Mutex<i32>,
    address: Mutex<Address>,
}

fn main() -> dynbean::Result<()> {
    let person = Arc::new(Person {
        age: Mutex::new(12),
        address: Mutex::new(Address {
            city: "Boston".into(),
            state: "MA".into(),
        }),
    });

    let address = RecordWriter::builder("Address")
        .field("city", |a: &Address| a.city.clone())
        .field("state", |a: &Address| a.state.clone())
        .build()?;

    let (r, w, home) = (person.clone(), person.clone(), person.clone());
    let registry = ManagementRegistry::builder()
        .class_name("Person")
        .description("A person under management")
        .attribute("age", "Age in years", move || *r.age.lock(), move |v: i32| {
            *w.age.lock() = v;
        })
        .record_attribute("address", "Home address", move || home.address.lock().clone(), address)
        .operation(
            "concatenate",
            "Join two strings",
            &["arg1", "arg2"],
            |a: String, b: String| format!("{}{}", a, b),
        )
        .attribute_change_notifications()
        .build()?;

    let (tx, rx) = crossbeam::channel::unbounded();
    registry.subscribe(
        Arc::new(move |n: &Notification, _: Option<&Handback>| {
            let _ = tx.send(n.message().to_string());
        }),
        None,
        None,
    );

    let agent = ManagementAgent::platform();
    let name = agent.register(ObjectName::parse("dynbean:type=Person,name=alice")?, registry)?;
    println!("registered {}", name);

    agent.set_attribute(&name, dynbean::Attribute::new("age", 21))?;
    println!("age = {}", agent.get_attribute(&name, "age")?);
    println!("address = {}", agent.get_attribute(&name, "address")?);

    let joined = agent.invoke(
        &name,
        "concatenate",
        &[OpenValue::from("a"), OpenValue::from("b")],
        &["string", "string"],
    )?;
    println!("concatenate(a, b) = {}", joined);

    if let Ok(message) = rx.recv_timeout(Duration::from_secs(1)) {
        println!("notification: {}", message);
    }

    for info in &agent.info(&name)?.operations {
        println!("operation {}", info);
    }

    agent.unregister(&name)?;
    Ok(())
}
