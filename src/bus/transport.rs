//! zbus-backed transport.

use tracing::{debug, info};
use zbus::blocking::{connection::Builder, fdo::DBusProxy, Connection, Proxy};
use zbus::names::BusName;
use zbus::zvariant::{OwnedValue, Value};

use super::{BusKind, Connector, PropertyValue, Transport};

const INTROSPECTABLE: &str = "org.freedesktop.DBus.Introspectable";
const PROPERTIES: &str = "org.freedesktop.DBus.Properties";

/// Opens real bus connections with zbus.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZbusConnector;

impl Connector for ZbusConnector {
    fn connect(&self, kind: &BusKind) -> zbus::Result<Box<dyn Transport>> {
        let connection = match kind {
            BusKind::Session => Connection::session()?,
            BusKind::System => Connection::system()?,
            BusKind::Other(address) => Builder::address(address.as_str())?.build()?,
            BusKind::None => return Err(zbus::Error::Failure("no bus selected".to_string())),
        };

        info!("Connected to {}", kind);
        Ok(Box::new(ZbusTransport { connection }))
    }
}

/// Blocking D-Bus connection.
pub struct ZbusTransport {
    connection: Connection,
}

impl ZbusTransport {
    fn proxy<'a>(&'a self, service: &'a str, path: &'a str, interface: &'a str) -> zbus::Result<Proxy<'a>> {
        Proxy::new(&self.connection, service, path, interface)
    }
}

impl Transport for ZbusTransport {
    fn unique_name(&self) -> Option<String> {
        self.connection.unique_name().map(|name| name.to_string())
    }

    fn list_names(&self) -> zbus::Result<Vec<String>> {
        let proxy = DBusProxy::new(&self.connection)?;
        let names = proxy.list_names()?;
        debug!("ListNames returned {} names", names.len());
        Ok(names.into_iter().map(|name| name.to_string()).collect())
    }

    fn name_has_owner(&self, name: &str) -> zbus::Result<bool> {
        let proxy = DBusProxy::new(&self.connection)?;
        let name = BusName::try_from(name)?;
        Ok(proxy.name_has_owner(name)?)
    }

    fn introspect(&self, service: &str, path: &str) -> zbus::Result<String> {
        debug!("Introspect {} {}", service, path);
        self.proxy(service, path, INTROSPECTABLE)?.call("Introspect", &())
    }

    fn get_property(
        &self,
        service: &str,
        path: &str,
        interface: &str,
        name: &str,
    ) -> zbus::Result<PropertyValue> {
        let value: OwnedValue = self
            .proxy(service, path, PROPERTIES)?
            .call("Get", &(interface, name))?;
        Ok(property_value(&value))
    }

    fn get_all_properties(
        &self,
        service: &str,
        path: &str,
        interface: &str,
    ) -> zbus::Result<Vec<(String, PropertyValue)>> {
        let values: std::collections::HashMap<String, OwnedValue> = self
            .proxy(service, path, PROPERTIES)?
            .call("GetAll", &(interface,))?;
        Ok(values
            .into_iter()
            .map(|(name, value)| (name, property_value(&value)))
            .collect())
    }
}

fn property_value(value: &Value<'_>) -> PropertyValue {
    match value {
        Value::Str(s) => PropertyValue::Text(s.as_str().to_string()),
        other => PropertyValue::Other(other.to_string()),
    }
}
