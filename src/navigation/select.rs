//! Interface auto-selection after a successful `cd`.

use crate::introspect::{is_standard_interface, ObjectDescription};

/// Outcome of [`auto_select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The current selection is still offered by the new object.
    Kept,
    /// A new interface was picked.
    Selected(String),
    /// Only standard interfaces (or none) are available.
    Cleared,
}

/// Pick the interface to work with at a freshly entered object.
///
/// Keeps `current` if the object still has it, otherwise takes the first
/// interface that is not one of the bus infrastructure interfaces.
pub fn auto_select(current: &str, desc: &ObjectDescription) -> Selection {
    if !current.is_empty() && desc.interface(current).is_some() {
        return Selection::Kept;
    }

    desc.interfaces
        .iter()
        .find(|ifc| !is_standard_interface(&ifc.name))
        .map(|ifc| Selection::Selected(ifc.name.clone()))
        .unwrap_or(Selection::Cleared)
}
