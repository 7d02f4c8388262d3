//! Object description types.
//!
//! Every sequence keeps the order in which the bus reported it.

use std::fmt;

/// Standard interfaces present on nearly every object.
pub const STANDARD_INTERFACES: [&str; 3] = [
    "org.freedesktop.DBus.Introspectable",
    "org.freedesktop.DBus.Properties",
    "org.freedesktop.DBus.Peer",
];

/// Whether `name` is one of the bus infrastructure interfaces.
pub fn is_standard_interface(name: &str) -> bool {
    STANDARD_INTERFACES.contains(&name)
}

/// Parsed introspection result for one object path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectDescription {
    pub interfaces: Vec<Interface>,
    /// Immediate child segments, without slashes.
    pub children: Vec<String>,
}

impl ObjectDescription {
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|ifc| ifc.name == name)
    }

    pub fn interface_names(&self) -> Vec<String> {
        self.interfaces.iter().map(|ifc| ifc.name.clone()).collect()
    }

    /// A node with neither interfaces nor children does not exist for navigation purposes.
    pub fn is_empty(&self) -> bool {
        self.interfaces.len() + self.children.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interface {
    pub name: String,
    pub methods: Vec<Method>,
    pub properties: Vec<Property>,
    pub signals: Vec<Signal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub args: Vec<Argument>,
}

impl Method {
    pub fn inputs(&self) -> impl Iterator<Item = &Argument> {
        self.args
            .iter()
            .filter(|arg| arg.direction == Some(Direction::In))
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Argument> {
        self.args
            .iter()
            .filter(|arg| arg.direction == Some(Direction::Out))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub name: String,
    pub args: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub type_signature: String,
    pub access: Access,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Empty when the bus omitted it and no name has been synthesized yet.
    pub name: String,
    pub type_signature: String,
    /// Always `Some` for method arguments, `None` for signal arguments.
    pub direction: Option<Direction>,
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.type_signature)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
    ReadWrite,
}

impl Access {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "read" => Some(Self::Read),
            "write" => Some(Self::Write),
            "readwrite" => Some(Self::ReadWrite),
            _ => None,
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::ReadWrite => "readwrite",
        };
        f.write_str(s)
    }
}

/// Name every argument `arg<index>` when the list's first argument is unnamed.
///
/// Idempotent: once named, the first argument no longer triggers synthesis.
pub fn synthesize_arg_names(args: &mut [Argument]) {
    if args.first().is_some_and(|arg| arg.name.is_empty()) {
        for (idx, arg) in args.iter_mut().enumerate() {
            arg.name = format!("arg{}", idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg(name: &str, ty: &str) -> Argument {
        Argument {
            name: name.to_string(),
            type_signature: ty.to_string(),
            direction: Some(Direction::In),
        }
    }

    #[test]
    fn test_synthesize_unnamed_args() {
        let mut args = vec![arg("", "s"), arg("", "u"), arg("", "as")];
        synthesize_arg_names(&mut args);
        let names: Vec<_> = args.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["arg0", "arg1", "arg2"]);
        assert_eq!(args[2].type_signature, "as");
    }

    #[test]
    fn test_synthesize_keeps_named_args() {
        let mut args = vec![arg("uri", "s"), arg("", "u")];
        synthesize_arg_names(&mut args);
        assert_eq!(args[0].name, "uri");
        assert_eq!(args[1].name, "");
    }

    #[test]
    fn test_synthesize_is_idempotent() {
        let mut args = vec![arg("", "s"), arg("", "u")];
        synthesize_arg_names(&mut args);
        synthesize_arg_names(&mut args);
        assert_eq!(args[0].name, "arg0");
        assert_eq!(args[1].name, "arg1");
    }

    #[test]
    fn test_synthesize_empty_list() {
        let mut args: Vec<Argument> = Vec::new();
        synthesize_arg_names(&mut args);
        assert!(args.is_empty());
    }

    #[test]
    fn test_standard_interfaces() {
        assert!(is_standard_interface("org.freedesktop.DBus.Peer"));
        assert!(is_standard_interface("org.freedesktop.DBus.Properties"));
        assert!(!is_standard_interface("org.freedesktop.DBus"));
        assert!(!is_standard_interface("com.example.Custom"));
    }

    #[test]
    fn test_empty_node() {
        let mut desc = ObjectDescription::default();
        assert!(desc.is_empty());
        desc.children.push("child".into());
        assert!(!desc.is_empty());
    }
}
