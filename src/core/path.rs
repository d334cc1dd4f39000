//! Path and repository URL normalization.
//!
//! Everything here is display/comparison advice: functions never fail, and
//! input that cannot be interpreted comes back unchanged.

use url::Url;

const URL_SCHEMES: [&str; 5] = ["file", "http", "https", "svn", "svn+ssh"];

/// Canonical `/`-separated form of a local path.
///
/// Separators are unified, `.` segments dropped and `..` resolved lexically.
/// A relative path keeps its leading `..` segments. Roots (`/`, `C:/`) keep
/// their trailing separator, everything else loses it.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return path.to_string();
    }

    let unified = trimmed.replace('\\', "/");
    let (prefix, rest) = split_root(&unified);

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // `..` above a root stays at the root
                _ if !prefix.is_empty() => {}
                _ => segments.push(".."),
            },
            s => segments.push(s),
        }
    }

    let body = segments.join("/");
    if prefix.is_empty() && body.is_empty() {
        ".".to_string()
    } else {
        format!("{}{}", prefix, body)
    }
}

/// Split off `/`, `//server/`, or `C:/` style roots.
fn split_root(path: &str) -> (String, &str) {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic() {
        let drive = (bytes[0] as char).to_ascii_uppercase();
        let rest = &path[2..];
        if rest.starts_with('/') {
            return (format!("{}:/", drive), rest);
        }
        return (format!("{}:", drive), rest);
    }
    if let Some(rest) = path.strip_prefix("//") {
        // UNC share: keep the server as part of the root
        if let Some((server, tail)) = rest.split_once('/') {
            if !server.is_empty() {
                return (format!("//{}/", server), tail);
            }
        }
    }
    if path.starts_with('/') {
        return ("/".to_string(), path);
    }
    (String::new(), path)
}

/// Canonical form of a repository URL: lowercase scheme and host, no
/// trailing slash. Anything `url` cannot parse is returned unchanged.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    match Url::parse(trimmed) {
        Ok(parsed) => {
            let text = parsed.as_str();
            let stripped = text.trim_end_matches('/');
            // keep `file:///` and bare hosts intact
            if stripped.ends_with(':') || stripped.ends_with("//") {
                text.to_string()
            } else {
                stripped.to_string()
            }
        }
        Err(_) => url.to_string(),
    }
}

/// Case-insensitive URL comparison that ignores trailing slashes.
pub fn urls_equal(a: &str, b: &str) -> bool {
    let left = normalize_url(a);
    let right = normalize_url(b);
    left.trim_end_matches('/').eq_ignore_ascii_case(right.trim_end_matches('/'))
}

pub fn paths_equal(a: &str, b: &str) -> bool {
    let left = normalize_path(a);
    let right = normalize_path(b);
    if cfg!(windows) {
        left.eq_ignore_ascii_case(&right)
    } else {
        left == right
    }
}

fn is_absolute(normalized: &str) -> bool {
    !split_root(normalized).0.is_empty()
}

/// Whether `path` lies inside the working copy rooted at `root`.
///
/// Relative paths are taken relative to `root`; one that starts with `..`
/// is never inside.
pub fn is_path_inside(path: &str, root: &str) -> bool {
    relative_segments(path, root).is_some()
}

/// `path` expressed relative to `root`, or `path` unchanged when it is not
/// inside `root`.
pub fn relative_to(path: &str, root: &str) -> String {
    match relative_segments(path, root) {
        Some(rel) if rel.is_empty() => ".".to_string(),
        Some(rel) => rel,
        None => path.to_string(),
    }
}

fn relative_segments(path: &str, root: &str) -> Option<String> {
    let path = normalize_path(path);
    let root = normalize_path(root);

    if !is_absolute(&path) {
        if path == ".." || path.starts_with("../") {
            return None;
        }
        return Some(if path == "." { String::new() } else { path });
    }

    let (p, r) = if cfg!(windows) {
        (path.to_ascii_lowercase(), root.to_ascii_lowercase())
    } else {
        (path.clone(), root.clone())
    };

    if p == r {
        return Some(String::new());
    }
    let base = if r.ends_with('/') { r.clone() } else { format!("{}/", r) };
    if p.starts_with(&base) {
        Some(path[base.len()..].to_string())
    } else {
        None
    }
}

/// True for `file://`, `http(s)://`, `svn://` and `svn+tunnel://` URLs.
/// Windows drive paths (`C:\...`) are not URLs even though they parse as such.
pub fn is_repository_url(candidate: &str) -> bool {
    match Url::parse(candidate.trim()) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            URL_SCHEMES.contains(&scheme) || scheme.starts_with("svn+")
        }
        Err(_) => false,
    }
}

/// Append a relative segment to a repository URL with exactly one `/`.
pub fn join_url(base: &str, segment: &str) -> String {
    let segment = segment.trim_start_matches('/');
    if segment.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), segment)
}

/// Percent-decoded URL for display.
pub fn display_url(url: &str) -> String {
    match urlencoding::decode(url) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => url.to_string(),
    }
}

/// Last segment of a path or URL.
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}
