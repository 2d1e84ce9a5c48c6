// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registration names of the form `domain:key=value[,key=value]*`.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

const RESERVED: [char; 4] = [':', ',', '=', '*'];

/// Name under which a registry is registered with an agent.
///
/// Two names are equal when their canonical forms are equal: same domain and
/// same key properties, whatever their order.
///
/// ```rust
/// use dynbean::agent::ObjectName;
///
/// let name = ObjectName::parse("app:type=Cache,name=users").unwrap();
/// assert_eq!(name.domain(), "app");
/// assert_eq!(name.key_property("name"), Some("users"));
/// assert_eq!(name.canonical_name(), "app:name=users,type=Cache");
/// assert_eq!(name, ObjectName::parse("app:name=users,type=Cache").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct ObjectName {
    domain: String,
    properties: Vec<(String, String)>,
    canonical: String,
}

impl ObjectName {
    /// Parse `domain:key=value[,key=value]*`.
    ///
    /// # Errors
    ///
    /// `MalformedObjectName` when the domain separator is missing, there is
    /// no key property, a key or value is empty or contains a reserved
    /// character, or a key repeats.
    pub fn parse(name: &str) -> Result<Self> {
        let malformed = |reason: &str| Error::MalformedObjectName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let (domain, list) = name
            .split_once(':')
            .ok_or_else(|| malformed("missing domain separator ':'"))?;
        if domain.is_empty() {
            return Err(malformed("empty domain"));
        }
        if domain.contains(&RESERVED[..]) {
            return Err(malformed("domain contains a reserved character"));
        }
        if list.is_empty() {
            return Err(malformed("no key properties"));
        }

        let mut properties: Vec<(String, String)> = Vec::new();
        for pair in list.split(',') {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| malformed("key property without '='"))?;
            if key.is_empty() || value.is_empty() {
                return Err(malformed("empty key or value"));
            }
            if key.contains(&RESERVED[..]) || value.contains(&RESERVED[..]) {
                return Err(malformed("key property contains a reserved character"));
            }
            if properties.iter().any(|(k, _)| k == key) {
                return Err(malformed("duplicate key"));
            }
            properties.push((key.to_string(), value.to_string()));
        }
        Ok(Self::from_parts(domain.to_string(), properties))
    }

    /// Build from a domain and key properties.
    pub fn new<I, K, V>(domain: &str, properties: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let list: Vec<String> = properties
            .into_iter()
            .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
            .collect();
        Self::parse(&format!("{}:{}", domain, list.join(",")))
    }

    fn from_parts(domain: String, properties: Vec<(String, String)>) -> Self {
        let mut sorted: Vec<&(String, String)> = properties.iter().collect();
        sorted.sort();
        let list: Vec<String> = sorted.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        let canonical = format!("{}:{}", domain, list.join(","));
        Self {
            domain,
            properties,
            canonical,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Value of key property `key`.
    pub fn key_property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Key properties in declaration order.
    pub fn key_properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Domain plus key properties sorted by key.
    pub fn canonical_name(&self) -> &str {
        &self.canonical
    }
}

impl PartialEq for ObjectName {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for ObjectName {}

impl Hash for ObjectName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for ObjectName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ObjectName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.domain)?;
        for (i, (k, v)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        Ok(())
    }
}

impl FromStr for ObjectName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
