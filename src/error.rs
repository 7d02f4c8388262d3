//! Errors reported by navigation commands.
//!
//! None of these are fatal: the shell prints them and the navigation state
//! stays exactly as it was before the command.

use thiserror::Error;

use crate::introspect::ParseError;

#[derive(Error, Debug)]
pub enum NavError {
    #[error("not connected to a bus")]
    NotConnected,

    #[error("failed to connect: {0}")]
    Connect(#[source] zbus::Error),

    #[error("service name {0:?} is invalid")]
    InvalidServiceName(String),

    #[error("name {0:?} has no owner")]
    NoOwner(String),

    #[error("introspection failed: {0}")]
    IntrospectionFailed(#[source] zbus::Error),

    #[error("malformed introspection reply: {0}")]
    MalformedReply(#[from] ParseError),

    #[error("cd target is not a valid path: {0:?}")]
    InvalidPath(String),

    #[error("invalid interface: {0}")]
    InvalidInterface(String),

    #[error("failed to cd to {0}: no interfaces or children")]
    NodeEmpty(String),

    #[error("no interface selected")]
    NoInterfaceSelected,

    #[error("bus call failed: {0}")]
    Bus(#[from] zbus::Error),
}
