//! busnav library exports for the binary, integration tests and fuzzing.

pub mod bus;
pub mod completion;
pub mod config;
pub mod error;
pub mod introspect;
pub mod invoke;
pub mod navigation;
pub mod panic_handler;
pub mod shell;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::NavError;
pub use introspect::{parse_description, ObjectDescription};
pub use navigation::{resolve_path, NavigationContext};
