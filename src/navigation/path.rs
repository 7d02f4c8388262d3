//! Resolution of `cd` arguments into object paths.

use zbus::zvariant::ObjectPath;

use crate::error::NavError;

/// Token that resolves to the previous path.
pub const PREVIOUS: &str = "-";
/// Token that resolves to the service name spelled as a path.
pub const SERVICE: &str = "$";

/// Resolve `cd` arguments against the current navigation state.
///
/// In priority order:
/// 1. `-` is the previous path.
/// 2. `$` is the service name with `.` replaced by `/` (`com.example.Foo` is `/com/example/Foo`).
/// 3. A single token starting with `/` is taken as an absolute path.
/// 4. Anything else is joined onto `current` segment by segment.
///
/// The candidate is then cleaned and must be a valid object path.
pub fn resolve_path<S: AsRef<str>>(
    current: &str,
    previous: &str,
    service: &str,
    args: &[S],
) -> Result<String, NavError> {
    let candidate = match args {
        [arg] if arg.as_ref() == PREVIOUS => previous.to_string(),
        [arg] if arg.as_ref() == SERVICE => service_path(service),
        [arg] if arg.as_ref().starts_with('/') => arg.as_ref().to_string(),
        _ => join_path(current, args),
    };

    if !candidate.starts_with('/') {
        return Err(NavError::InvalidPath(candidate));
    }

    let cleaned = clean_path(&candidate);
    if !is_valid_object_path(&cleaned) {
        return Err(NavError::InvalidPath(candidate));
    }
    Ok(cleaned)
}

/// `/com/example/Foo` for `com.example.Foo`; empty when there is no service.
fn service_path(service: &str) -> String {
    if service.is_empty() {
        return String::new();
    }
    format!("/{}", service.replace('.', "/"))
}

/// Append every argument to `base` as path segments.
pub fn join_path<S: AsRef<str>>(base: &str, args: &[S]) -> String {
    let mut path = base.to_string();
    for arg in args {
        path.push('/');
        path.push_str(arg.as_ref());
    }
    path
}

/// Lexically normalize an absolute path.
///
/// Collapses repeated separators, drops `.` segments and resolves `..`
/// against the preceding segment. `..` at the root stays at the root.
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Whether `path` is a well-formed D-Bus object path.
pub fn is_valid_object_path(path: &str) -> bool {
    ObjectPath::try_from(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(current: &str, args: &[&str]) -> Result<String, NavError> {
        resolve_path(current, "/prev", "com.example.Foo", args)
    }

    #[test]
    fn test_relative_segments() {
        assert_eq!(resolve("/", &["foo"]).unwrap(), "/foo");
        assert_eq!(resolve("/a", &["b", "c"]).unwrap(), "/a/b/c");
        assert_eq!(resolve("/a/b", &[".."]).unwrap(), "/a");
        assert_eq!(resolve("/a/b", &["../c"]).unwrap(), "/a/c");
        assert_eq!(resolve("/a", &["./b/"]).unwrap(), "/a/b");
        assert_eq!(resolve("/a", &["b//c"]).unwrap(), "/a/b/c");
    }

    #[test]
    fn test_dotdot_stops_at_root() {
        assert_eq!(resolve("/", &[".."]).unwrap(), "/");
        assert_eq!(resolve("/a", &["..", "..", ".."]).unwrap(), "/");
    }

    #[test]
    fn test_no_args_stays_put() {
        assert_eq!(resolve("/a/b", &[]).unwrap(), "/a/b");
    }

    #[test]
    fn test_absolute_override() {
        assert_eq!(resolve("/a/b", &["/x/y"]).unwrap(), "/x/y");
        assert_eq!(resolve("/a/b", &["/x//y/"]).unwrap(), "/x/y");
        assert_eq!(resolve("/a/b", &["/"]).unwrap(), "/");
    }

    #[test]
    fn test_absolute_only_for_single_token() {
        assert_eq!(resolve("/a", &["b", "/c"]).unwrap(), "/a/b/c");
    }

    #[test]
    fn test_previous_path() {
        for current in ["/", "/a", "/a/b/c"] {
            assert_eq!(
                resolve_path(current, "/some/where", "", &["-"]).unwrap(),
                "/some/where"
            );
        }
    }

    #[test]
    fn test_service_as_path() {
        assert_eq!(
            resolve_path("/", "/", "com.example.Foo", &["$"]).unwrap(),
            "/com/example/Foo"
        );
        assert_eq!(resolve_path("/x", "/", "a.b.c.d", &["$"]).unwrap(), "/a/b/c/d");
    }

    #[test]
    fn test_service_as_path_without_service() {
        let err = resolve_path("/", "/", "", &["$"]).unwrap_err();
        assert!(matches!(err, NavError::InvalidPath(_)));
    }

    #[test]
    fn test_service_as_path_with_invalid_chars() {
        assert!(resolve_path("/", "/", "org.example.my-app", &["$"]).is_err());
    }

    #[test]
    fn test_invalid_segments() {
        assert!(resolve("/", &["foo-bar"]).is_err());
        assert!(resolve("/", &["/ünïcode"]).is_err());
        assert!(resolve("/", &["a b"]).is_err());
    }

    #[test]
    fn test_results_are_normalized() {
        let cases: &[(&str, &[&str])] = &[
            ("/", &["a", ".", "b", "..", "c"]),
            ("/x/y", &["..", "..", "z", "."]),
            ("/x", &["a/./b/../c"]),
        ];
        for (current, args) in cases {
            let path = resolve(current, args).unwrap();
            assert!(path.starts_with('/'));
            assert!(!path.contains("//"));
            assert!(path == "/" || !path.ends_with('/'));
            assert!(path.split('/').all(|s| s != "." && s != ".."));
        }
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path("//"), "/");
        assert_eq!(clean_path("/a/../../b"), "/b");
        assert_eq!(clean_path("/a/b/"), "/a/b");
    }
}
