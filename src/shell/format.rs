//! Text rendering for shell output.

use std::fmt::Write;

use crate::bus::PropertyValue;
use crate::introspect::{Argument, Interface, ObjectDescription};

pub const HELP_TYPES: &str = "\
Base Types:
bool b
byte y
int16 n uint16 q
int32 i uint32 u
int64 x uint64 t
double d
string s
objectPath o
signature g
unixFd h
variant v

as -> array of string
a{ss} -> dict of string to string
(is) -> struct of int32 and string
";

fn join_args<'a>(args: impl Iterator<Item = &'a Argument>) -> String {
    args.map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Interfaces and children at one path, one per line.
///
/// The selected interface is marked with `*`, children end in `/`.
pub fn format_listing(desc: &ObjectDescription, selected: &str) -> String {
    let mut out = String::new();
    for ifc in &desc.interfaces {
        let marker = if ifc.name == selected { "*" } else { "" };
        let _ = writeln!(out, "{}{}", ifc.name, marker);
    }
    for child in &desc.children {
        let _ = writeln!(out, "{}/", child);
    }
    out
}

/// Full description of one interface.
pub fn format_interface(ifc: &Interface) -> String {
    let mut out = format!("interface: {}\n", ifc.name);

    if !ifc.methods.is_empty() {
        out.push_str(" methods:\n");
        for method in &ifc.methods {
            let _ = writeln!(
                out,
                "  {}({}) -> ({})",
                method.name,
                join_args(method.inputs()),
                join_args(method.outputs())
            );
        }
    }

    if !ifc.properties.is_empty() {
        out.push_str(" properties:\n");
        for prop in &ifc.properties {
            let _ = writeln!(out, "  {} {} {}", prop.name, prop.type_signature, prop.access);
        }
    }

    if !ifc.signals.is_empty() {
        out.push_str(" signals:\n");
        for signal in &ifc.signals {
            let _ = writeln!(out, "  {}({})", signal.name, join_args(signal.args.iter()));
        }
    }

    out
}

/// Reformat `text` as indented JSON if it parses as JSON, else return it unchanged.
pub fn pretty_json(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| text.to_string())
}

pub fn format_value(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Text(text) => pretty_json(text),
        PropertyValue::Other(rendered) => rendered.clone(),
    }
}
