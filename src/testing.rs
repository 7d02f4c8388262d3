//! In-memory bus used by unit tests.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::bus::{BusKind, Connector, PropertyValue, Transport};

/// Scripted bus: objects are introspection XML keyed by service and path.
#[derive(Clone, Default)]
pub struct MockBus {
    names: Vec<String>,
    owned: HashSet<String>,
    objects: HashMap<(String, String), String>,
    properties: HashMap<(String, String, String), Vec<(String, PropertyValue)>>,
    introspect_calls: Rc<Cell<usize>>,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a name that currently has an owner.
    pub fn with_service(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self.owned.insert(name.to_string());
        self
    }

    /// Register a name that is listed but has no owner.
    pub fn with_unowned_name(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self
    }

    pub fn with_object(mut self, service: &str, path: &str, xml: &str) -> Self {
        self.objects
            .insert((service.to_string(), path.to_string()), xml.to_string());
        self
    }

    pub fn with_property(
        mut self,
        service: &str,
        path: &str,
        interface: &str,
        name: &str,
        value: PropertyValue,
    ) -> Self {
        self.properties
            .entry((service.to_string(), path.to_string(), interface.to_string()))
            .or_default()
            .push((name.to_string(), value));
        self
    }

    pub fn introspect_calls(&self) -> usize {
        self.introspect_calls.get()
    }
}

impl Transport for MockBus {
    fn unique_name(&self) -> Option<String> {
        Some(":1.7".to_string())
    }

    fn list_names(&self) -> zbus::Result<Vec<String>> {
        Ok(self.names.clone())
    }

    fn name_has_owner(&self, name: &str) -> zbus::Result<bool> {
        Ok(self.owned.contains(name))
    }

    fn introspect(&self, service: &str, path: &str) -> zbus::Result<String> {
        self.introspect_calls.set(self.introspect_calls.get() + 1);
        self.objects
            .get(&(service.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| zbus::Error::Failure(format!("no object {} on {}", path, service)))
    }

    fn get_property(
        &self,
        service: &str,
        path: &str,
        interface: &str,
        name: &str,
    ) -> zbus::Result<PropertyValue> {
        self.get_all_properties(service, path, interface)?
            .into_iter()
            .find(|(prop, _)| prop == name)
            .map(|(_, value)| value)
            .ok_or_else(|| zbus::Error::Failure(format!("no property {}", name)))
    }

    fn get_all_properties(
        &self,
        service: &str,
        path: &str,
        interface: &str,
    ) -> zbus::Result<Vec<(String, PropertyValue)>> {
        self.properties
            .get(&(service.to_string(), path.to_string(), interface.to_string()))
            .cloned()
            .ok_or_else(|| zbus::Error::Failure(format!("no interface {}", interface)))
    }
}

/// Hands out clones of a [`MockBus`], or fails every connect.
pub struct MockConnector {
    pub bus: Option<MockBus>,
}

impl Connector for MockConnector {
    fn connect(&self, _kind: &BusKind) -> zbus::Result<Box<dyn Transport>> {
        match &self.bus {
            Some(bus) => Ok(Box::new(bus.clone())),
            None => Err(zbus::Error::Failure("connection refused".to_string())),
        }
    }
}

/// Object at `/` with the standard interfaces and a single child `foo`,
/// and `/foo` with `Introspectable` plus `com.example.Foo`.
pub fn example_bus() -> MockBus {
    MockBus::new()
        .with_service("com.example.Svc")
        .with_service("org.freedesktop.DBus")
        .with_unowned_name("com.example.Gone")
        .with_unowned_name(":1.7")
        .with_object(
            "com.example.Svc",
            "/",
            r#"<node>
                 <interface name="org.freedesktop.DBus.Introspectable"/>
                 <interface name="org.freedesktop.DBus.Peer"/>
                 <node name="foo"/>
                 <node name="empty"/>
               </node>"#,
        )
        .with_object(
            "com.example.Svc",
            "/foo",
            r#"<node>
                 <interface name="org.freedesktop.DBus.Introspectable"/>
                 <interface name="com.example.Foo">
                   <method name="Frob"><arg name="x" type="s" direction="in"/></method>
                   <method name="Reset"/>
                   <property name="Mode" type="s" access="readwrite"/>
                   <property name="Count" type="u" access="read"/>
                 </interface>
               </node>"#,
        )
        .with_object("com.example.Svc", "/empty", "<node/>")
        .with_property(
            "com.example.Svc",
            "/foo",
            "com.example.Foo",
            "Mode",
            PropertyValue::Text("fast".into()),
        )
        .with_property(
            "com.example.Svc",
            "/foo",
            "com.example.Foo",
            "Count",
            PropertyValue::Other("3".into()),
        )
}
