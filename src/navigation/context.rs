//! Session state: which bus, service, path and interface the shell is at.

use std::mem;

use tracing::{debug, info};

use super::path::resolve_path;
use super::select::{auto_select, Selection};
use crate::bus::{BusKind, Connector, PropertyValue, Transport};
use crate::error::NavError;
use crate::introspect::{fetch_description, is_valid_service_name, Interface, ObjectDescription};

/// Result of a successful `cd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdOutcome {
    pub path: String,
    pub selection: Selection,
}

/// Mutable navigation state of one shell session.
///
/// Every method either succeeds and applies its whole transition, or fails
/// and leaves the context untouched.
pub struct NavigationContext {
    kind: BusKind,
    bus: Option<Box<dyn Transport>>,
    service: String,
    path: String,
    previous_path: String,
    interface: String,
}

impl Default for NavigationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationContext {
    pub fn new() -> Self {
        Self {
            kind: BusKind::None,
            bus: None,
            service: String::new(),
            path: "/".to_string(),
            previous_path: "/".to_string(),
            interface: String::new(),
        }
    }

    pub fn kind(&self) -> &BusKind {
        &self.kind
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn previous_path(&self) -> &str {
        &self.previous_path
    }

    /// Selected interface, empty when none is selected.
    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn bus(&self) -> Option<&dyn Transport> {
        self.bus.as_deref()
    }

    fn require_bus(&self) -> Result<&dyn Transport, NavError> {
        self.bus().ok_or(NavError::NotConnected)
    }

    fn require_interface(&self) -> Result<&str, NavError> {
        if self.interface.is_empty() {
            return Err(NavError::NoInterfaceSelected);
        }
        Ok(&self.interface)
    }

    /// Open a connection to `kind` and start over at `/` with no service.
    pub fn connect(&mut self, kind: BusKind, connector: &dyn Connector) -> Result<(), NavError> {
        let bus = connector.connect(&kind).map_err(NavError::Connect)?;
        self.attach(kind, bus);
        Ok(())
    }

    /// Install an already open connection. Resets service, paths and interface.
    pub fn attach(&mut self, kind: BusKind, bus: Box<dyn Transport>) {
        info!("Attached to {}", kind);
        self.kind = kind;
        self.bus = Some(bus);
        self.service.clear();
        self.path = "/".to_string();
        self.previous_path = "/".to_string();
        self.interface.clear();
    }

    /// Well-known names on the bus; unique `:x.y` names are left out.
    pub fn list_services(&self) -> Result<Vec<String>, NavError> {
        let names = self.require_bus()?.list_names()?;
        Ok(names
            .into_iter()
            .filter(|name| !name.starts_with(':'))
            .collect())
    }

    /// Switch to another service and go back to `/`.
    ///
    /// The interface selection is left alone; the next `cd` reconciles it.
    pub fn select_service(&mut self, name: &str) -> Result<(), NavError> {
        let bus = self.require_bus()?;

        if !is_valid_service_name(name) {
            return Err(NavError::InvalidServiceName(name.to_string()));
        }
        if !bus.name_has_owner(name)? {
            return Err(NavError::NoOwner(name.to_string()));
        }

        info!("Service changed: {:?} -> {:?}", self.service, name);
        self.service = name.to_string();
        self.path = "/".to_string();
        Ok(())
    }

    /// Introspect `path` on the current service.
    pub fn fetch(&self, path: &str) -> Result<ObjectDescription, NavError> {
        fetch_description(self.bus(), &self.service, path)
    }

    /// Introspect the current path.
    pub fn describe(&self) -> Result<ObjectDescription, NavError> {
        self.fetch(&self.path)
    }

    /// Navigate to the object named by `args`, then auto-select an interface.
    ///
    /// A node with neither interfaces nor children counts as nonexistent.
    pub fn change_directory<S: AsRef<str>>(&mut self, args: &[S]) -> Result<CdOutcome, NavError> {
        let path = resolve_path(&self.path, &self.previous_path, &self.service, args)?;
        let desc = self.fetch(&path)?;

        if desc.is_empty() {
            return Err(NavError::NodeEmpty(path));
        }

        self.previous_path = mem::replace(&mut self.path, path);
        debug!("cd {} -> {}", self.previous_path, self.path);

        let selection = auto_select(&self.interface, &desc);
        match &selection {
            Selection::Kept => {}
            Selection::Selected(name) => {
                info!("Auto-selected interface {}", name);
                self.interface = name.clone();
            }
            Selection::Cleared => self.interface.clear(),
        }

        Ok(CdOutcome {
            path: self.path.clone(),
            selection,
        })
    }

    /// Select an interface offered by the object at the current path.
    pub fn select_interface(&mut self, name: &str) -> Result<(), NavError> {
        let desc = self.describe()?;
        if desc.interface(name).is_none() {
            return Err(NavError::InvalidInterface(name.to_string()));
        }
        self.interface = name.to_string();
        Ok(())
    }

    /// Fresh description of the selected interface at the current path.
    pub fn selected_interface(&self) -> Result<Interface, NavError> {
        let name = self.require_interface()?;
        self.describe()?
            .interfaces
            .into_iter()
            .find(|ifc| ifc.name == name)
            .ok_or_else(|| NavError::InvalidInterface(name.to_string()))
    }

    /// Read one property of the selected interface.
    pub fn get_property(&self, name: &str) -> Result<PropertyValue, NavError> {
        let bus = self.require_bus()?;
        let interface = self.require_interface()?;
        Ok(bus.get_property(&self.service, &self.path, interface, name)?)
    }

    /// Read every property of the selected interface, sorted by name.
    pub fn get_all_properties(&self) -> Result<Vec<(String, PropertyValue)>, NavError> {
        let bus = self.require_bus()?;
        let interface = self.require_interface()?;
        let mut props = bus.get_all_properties(&self.service, &self.path, interface)?;
        props.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(props)
    }
}
