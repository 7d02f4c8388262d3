//! Remote object introspection.
//!
//! [`fetch_description`] asks a service to describe the object at a path and
//! parses the reply into an [`ObjectDescription`]. Nothing is cached: every
//! call is one round trip.

mod model;
mod parse;

pub use model::{
    is_standard_interface, synthesize_arg_names, Access, Argument, Direction, Interface, Method,
    ObjectDescription, Property, Signal, STANDARD_INTERFACES,
};
pub use parse::{parse_description, ParseError};

use tracing::debug;

use crate::bus::Transport;
use crate::error::NavError;

/// A service name is usable only if it has at least two non-empty dot-separated segments.
pub fn is_valid_service_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').count() >= 2 && name.split('.').all(|part| !part.is_empty())
}

/// Introspect `path` on `service` and parse the result.
pub fn fetch_description(
    bus: Option<&dyn Transport>,
    service: &str,
    path: &str,
) -> Result<ObjectDescription, NavError> {
    let bus = bus.ok_or(NavError::NotConnected)?;

    if !is_valid_service_name(service) {
        return Err(NavError::InvalidServiceName(service.to_string()));
    }

    let xml = bus
        .introspect(service, path)
        .map_err(NavError::IntrospectionFailed)?;
    let desc = parse_description(&xml)?;

    debug!(
        "{} {}: {} interfaces, {} children",
        service,
        path,
        desc.interfaces.len(),
        desc.children.len()
    );
    Ok(desc)
}
