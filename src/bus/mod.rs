//! Bus access for the navigator.
//!
//! The navigator never talks to zbus directly. Everything it needs from the
//! bus goes through the [`Transport`] trait, and connections are opened by a
//! [`Connector`]. This keeps the navigation logic testable against an
//! in-memory bus.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   Transport    ┌───────────────┐     D-Bus     ┌─────────┐
//! │ NavigationContext│───────────────>│ ZbusTransport │──────────────>│ service │
//! └──────────────────┘                └───────────────┘               └─────────┘
//!          ^ connect(kind)                    ^
//!          └──────── Connector ───────────────┘
//! ```
//!
//! All calls are blocking. There is exactly one request in flight at a time.

mod transport;

pub use transport::{ZbusConnector, ZbusTransport};

use std::fmt;

/// Which bus the session is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BusKind {
    #[default]
    None,
    Session,
    System,
    /// A bus reached through an explicit address, e.g. `unix:path=/run/bus`.
    Other(String),
}

impl BusKind {
    /// Parse a `connect` argument.
    ///
    /// Accepts `session`/`e`, `system`/`y`, or a D-Bus address (anything
    /// containing `:` and `=`). Returns `None` for unrecognized tokens.
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "session" | "e" => Some(Self::Session),
            "system" | "y" => Some(Self::System),
            addr if addr.contains(':') && addr.contains('=') => Some(Self::Other(addr.to_string())),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for BusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "not connected"),
            Self::Session => write!(f, "session bus"),
            Self::System => write!(f, "system bus"),
            Self::Other(address) => write!(f, "other bus ({})", address),
        }
    }
}

/// A property value read from the bus.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// The variant carried a string.
    Text(String),
    /// Any other variant, rendered in its textual form.
    Other(String),
}

/// Blocking operations the navigator needs from a bus connection.
pub trait Transport {
    /// Unique connection name assigned by the bus daemon, if any.
    fn unique_name(&self) -> Option<String>;

    /// All names currently registered on the bus, including unique `:x.y` names.
    fn list_names(&self) -> zbus::Result<Vec<String>>;

    /// Whether `name` currently has an owner.
    fn name_has_owner(&self, name: &str) -> zbus::Result<bool>;

    /// Raw `org.freedesktop.DBus.Introspectable.Introspect` reply.
    fn introspect(&self, service: &str, path: &str) -> zbus::Result<String>;

    /// `org.freedesktop.DBus.Properties.Get`.
    fn get_property(
        &self,
        service: &str,
        path: &str,
        interface: &str,
        name: &str,
    ) -> zbus::Result<PropertyValue>;

    /// `org.freedesktop.DBus.Properties.GetAll`, in no particular order.
    fn get_all_properties(
        &self,
        service: &str,
        path: &str,
        interface: &str,
    ) -> zbus::Result<Vec<(String, PropertyValue)>>;
}

/// Opens bus connections.
pub trait Connector {
    fn connect(&self, kind: &BusKind) -> zbus::Result<Box<dyn Transport>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_kind_from_arg() {
        assert_eq!(BusKind::from_arg("session"), Some(BusKind::Session));
        assert_eq!(BusKind::from_arg("e"), Some(BusKind::Session));
        assert_eq!(BusKind::from_arg("system"), Some(BusKind::System));
        assert_eq!(BusKind::from_arg("y"), Some(BusKind::System));
        assert_eq!(
            BusKind::from_arg("unix:path=/run/bus"),
            Some(BusKind::Other("unix:path=/run/bus".into()))
        );
        assert_eq!(BusKind::from_arg("starship"), None);
    }

    #[test]
    fn test_bus_kind_display() {
        assert_eq!(BusKind::None.to_string(), "not connected");
        assert_eq!(BusKind::Session.to_string(), "session bus");
        assert_eq!(BusKind::System.to_string(), "system bus");
        assert!(!BusKind::None.is_connected());
        assert!(BusKind::System.is_connected());
    }
}
