//! Introspection XML parser.
//!
//! Follows the `org.freedesktop.DBus.Introspectable` document format:
//!
//! ```xml
//! <node>
//!   <interface name="com.example.Foo">
//!     <method name="Frob">
//!       <arg name="x" type="s" direction="in"/>
//!     </method>
//!     <property name="Mode" type="u" access="readwrite"/>
//!     <signal name="Changed"><arg type="b"/></signal>
//!   </interface>
//!   <node name="child"/>
//! </node>
//! ```
//!
//! Unknown elements and attributes are skipped. A document either parses
//! completely or not at all.

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

use super::model::{
    synthesize_arg_names, Access, Argument, Direction, Interface, Method, ObjectDescription,
    Property, Signal,
};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("<{element}> is missing the `{attr}` attribute")]
    MissingAttribute {
        element: &'static str,
        attr: &'static str,
    },

    #[error("unknown property access `{0}`")]
    InvalidAccess(String),

    #[error("unknown argument direction `{0}`")]
    InvalidDirection(String),

    #[error("document has no root <node> element")]
    NoRoot,

    #[error("document ended inside <{0}>")]
    UnexpectedEof(&'static str),
}

type Result<T> = std::result::Result<T, ParseError>;

/// Parse an introspection document into an [`ObjectDescription`].
pub fn parse_description(xml: &str) -> Result<ObjectDescription> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"node" => return parse_node(&mut reader),
            Event::Empty(e) if e.name().as_ref() == b"node" => {
                return Ok(ObjectDescription::default())
            }
            Event::Start(_) | Event::Empty(_) | Event::Eof => return Err(ParseError::NoRoot),
            _ => {}
        }
    }
}

/// Next element event at the current nesting level.
///
/// Returns `None` when the enclosing element closes, and the element plus
/// whether it has a body otherwise.
fn next_element<'a>(
    reader: &mut Reader<&'a [u8]>,
    inside: &'static str,
) -> Result<Option<(BytesStart<'a>, bool)>> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => return Ok(Some((e, true))),
            Event::Empty(e) => return Ok(Some((e, false))),
            Event::End(_) => return Ok(None),
            Event::Eof => return Err(ParseError::UnexpectedEof(inside)),
            _ => {}
        }
    }
}

fn skip(reader: &mut Reader<&[u8]>, e: &BytesStart<'_>, has_body: bool) -> Result<()> {
    if has_body {
        reader.read_to_end(e.name())?;
    }
    Ok(())
}

fn parse_node(reader: &mut Reader<&[u8]>) -> Result<ObjectDescription> {
    let mut desc = ObjectDescription::default();

    while let Some((e, has_body)) = next_element(reader, "node")? {
        match e.name().as_ref() {
            b"interface" => {
                let name = required(&e, "interface", "name")?;
                let interface = if has_body {
                    parse_interface(reader, name)?
                } else {
                    Interface {
                        name,
                        ..Default::default()
                    }
                };
                desc.interfaces.push(interface);
            }
            b"node" => {
                desc.children.push(required(&e, "node", "name")?);
                // Children are introspected separately; nested detail is ignored.
                skip(reader, &e, has_body)?;
            }
            _ => skip(reader, &e, has_body)?,
        }
    }

    Ok(desc)
}

fn parse_interface(reader: &mut Reader<&[u8]>, name: String) -> Result<Interface> {
    let mut interface = Interface {
        name,
        ..Default::default()
    };

    while let Some((e, has_body)) = next_element(reader, "interface")? {
        match e.name().as_ref() {
            b"method" => {
                let name = required(&e, "method", "name")?;
                let args = if has_body {
                    parse_args(reader, "method", Some(Direction::In))?
                } else {
                    Vec::new()
                };
                interface.methods.push(Method { name, args });
            }
            b"signal" => {
                let name = required(&e, "signal", "name")?;
                let args = if has_body {
                    parse_args(reader, "signal", None)?
                } else {
                    Vec::new()
                };
                interface.signals.push(Signal { name, args });
            }
            b"property" => {
                let access = required(&e, "property", "access")?;
                interface.properties.push(Property {
                    name: required(&e, "property", "name")?,
                    type_signature: required(&e, "property", "type")?,
                    access: Access::parse(&access).ok_or(ParseError::InvalidAccess(access))?,
                });
                skip(reader, &e, has_body)?;
            }
            _ => skip(reader, &e, has_body)?,
        }
    }

    Ok(interface)
}

/// Parse the `<arg>` list of a method (`default_direction = Some(In)`) or
/// signal (`None`, direction is not recorded).
fn parse_args(
    reader: &mut Reader<&[u8]>,
    inside: &'static str,
    default_direction: Option<Direction>,
) -> Result<Vec<Argument>> {
    let mut args = Vec::new();

    while let Some((e, has_body)) = next_element(reader, inside)? {
        if e.name().as_ref() == b"arg" {
            let direction = match (default_direction, attribute(&e, b"direction")?) {
                (None, _) => None,
                (Some(default), None) => Some(default),
                (Some(_), Some(dir)) => {
                    Some(Direction::parse(&dir).ok_or(ParseError::InvalidDirection(dir))?)
                }
            };
            args.push(Argument {
                name: attribute(&e, b"name")?.unwrap_or_default(),
                type_signature: required(&e, "arg", "type")?,
                direction,
            });
        }
        skip(reader, &e, has_body)?;
    }

    synthesize_arg_names(&mut args);
    Ok(args)
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn required(e: &BytesStart<'_>, element: &'static str, attr: &'static str) -> Result<String> {
    attribute(e, attr.as_bytes())?.ok_or(ParseError::MissingAttribute { element, attr })
}
