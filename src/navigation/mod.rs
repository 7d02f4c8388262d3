//! Navigation through a service's object tree.

mod context;
mod path;
mod select;

pub use context::{CdOutcome, NavigationContext};
pub use path::{clean_path, is_valid_object_path, join_path, resolve_path, PREVIOUS, SERVICE};
pub use select::{auto_select, Selection};
