//! Fuzz target for introspection XML parsing.
//!
//! Ensures that hostile introspection replies don't cause panics, and that
//! synthesized argument names are always complete.

#![no_main]

use busnav::parse_description;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(desc) = parse_description(s) {
            for ifc in &desc.interfaces {
                for method in &ifc.methods {
                    if let Some(first) = method.args.first() {
                        assert!(!first.name.is_empty());
                    }
                }
            }
        }
    }
});
