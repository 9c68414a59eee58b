#![forbid(unsafe_code)]

use path_absolutize::Absolutize;
use std::ops::Deref;
use std::path::Path;

// ***************************************************************************
// GENERAL PUBLIC FUNCTIONS
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_absolute_path:
// ---------------------------------------------------------------------------
/** Replace tilde (~) and environment variable values in a path name and
 * then construct the absolute path name.  Unlike canonicalize, absolutize
 * does not require that the file exist, so the result is usable for paths
 * that have yet to be created.
 *
 * On any expansion error the original path is returned unchanged.
 */
pub fn get_absolute_path(path: &str) -> String {
    expand_path(path).unwrap_or_else(|| path.to_owned())
}

// ---------------------------------------------------------------------------
// expand_path:
// ---------------------------------------------------------------------------
fn expand_path(path: &str) -> Option<String> {
    // Replace ~ and environment variable values if possible.
    let expanded = shellexpand::full(path).ok()?;

    // Convert to an absolute path if necessary.
    let absolute = Path::new(expanded.deref()).absolutize().ok()?;
    Some(absolute.to_str()?.to_owned())
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::get_absolute_path;

    #[test]
    fn absolute_paths_pass_through() {
        assert_eq!(get_absolute_path("/tmp/home_server.toml"), "/tmp/home_server.toml");
    }

    #[test]
    fn relative_paths_become_absolute() {
        let p = get_absolute_path("home_server.toml");
        assert!(p.starts_with('/'));
        assert!(p.ends_with("home_server.toml"));
    }

    #[test]
    fn tilde_is_expanded() {
        let p = get_absolute_path("~/.home_server/home_server.toml");
        assert!(!p.starts_with('~'));
        assert!(p.ends_with("/.home_server/home_server.toml"));
    }
}
