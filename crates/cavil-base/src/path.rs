//! File path normalization for diagnostic rendering.
//!
//! Diagnostics must render a stable, platform-independent path no matter
//! which separators the analyzed project's file list used. `simplify_path`
//! collapses `.`/`..` segments and normalizes separators to `/`, without
//! touching the filesystem — it is pure string surgery, matching
//! cppcheck's `Path::simplifyPath`.

/// Rewrites backslashes to forward slashes.
pub fn from_native_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Rewrites forward slashes to the platform's native separator.
pub fn to_native_separators(path: &str) -> String {
    if cfg!(windows) {
        path.replace('/', "\\")
    } else {
        path.to_string()
    }
}

/// Collapses redundant separators, `./` segments, and resolvable `X/../`
/// segments without touching the filesystem.
///
/// This deliberately mirrors cppcheck's `Path::simplifyPath` textual
/// surgery rather than a generic path-normalization algorithm: a bare
/// leading `./` (no following slash inside the pattern) is left alone, and
/// a trailing `..` with nothing after it is left alone too, because both
/// only collapse as part of a `/./` or `X/../` substring with a closing
/// slash. A leading run of `../` segments has nothing to resolve against
/// and is kept literally.
pub fn simplify_path(path: &str) -> String {
    let mut s = from_native_separators(path);

    collapse_repeating(&mut s, "//", "/");
    collapse_repeating(&mut s, "/./", "/");

    loop {
        let Some(pos) = s.find("/../") else { break };
        let before = &s[..pos];
        let seg_start = before.rfind('/').map(|i| i + 1).unwrap_or(0);
        let segment = &before[seg_start..pos];
        if segment.is_empty() || segment == ".." {
            break;
        }
        let mut collapsed = String::with_capacity(s.len());
        collapsed.push_str(&s[..seg_start]);
        collapsed.push_str(&s[pos + "/../".len()..]);
        s = collapsed;
    }

    if s.is_empty() {
        ".".to_string()
    } else {
        s
    }
}

fn collapse_repeating(s: &mut String, pattern: &str, replacement: &str) {
    loop {
        let replaced = s.replace(pattern, replacement);
        if replaced == *s {
            break;
        }
        *s = replaced;
    }
}
