//! Path normalization.
//!
//! Store keys are absolute, `/`-separated and free of `.`, `..` and empty
//! segments. Root is `"/"`. Every lookup goes through [`normalize`] first.

/// Resolve `path` against `base` into a normalized absolute path.
///
/// Absolute inputs ignore `base`. `..` pops the last retained segment and is
/// a no-op at root, so the result never escapes `/`.
pub fn normalize(path: &str, base: &str) -> String {
    let raw = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("{base}/{path}")
    };

    let mut parts: Vec<&str> = Vec::new();
    for component in raw.split('/') {
        match component {
            "" | "." => {},
            ".." => {
                parts.pop();
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

/// Return the parent of a normalized path. The parent of root is root.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &path[..i],
    }
}

/// Iterate the strict ancestors of a normalized path, nearest first,
/// ending at root. Root itself has no ancestors.
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    let mut current = Some(path);
    std::iter::from_fn(move || {
        let p = current?;
        if p == "/" {
            current = None;
            return None;
        }
        let up = parent(p);
        current = Some(up);
        Some(up)
    })
}

/// Join a directory and a child name.
pub fn join(dir: &str, name: &str) -> String {
    if dir == "/" {
        format!("/{name}")
    } else {
        format!("{dir}/{name}")
    }
}
