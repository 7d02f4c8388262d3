//! Fuzz target for `cd` path resolution.
//!
//! Every accepted path must be normalized: absolute, no empty, `.` or `..`
//! segments, and no trailing slash except for the root.

#![no_main]

use arbitrary::Arbitrary;
use busnav::resolve_path;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    previous: String,
    service: String,
    args: Vec<String>,
}

fuzz_target!(|input: Input| {
    if let Ok(path) = resolve_path("/", &input.previous, &input.service, &input.args) {
        assert!(path.starts_with('/'));
        assert!(path == "/" || !path.ends_with('/'));
        assert!(path
            .split('/')
            .skip(1)
            .all(|s| path == "/" || (!s.is_empty() && s != "." && s != "..")));
    }
});
