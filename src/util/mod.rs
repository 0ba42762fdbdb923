/// Normalize a page path for use as a node identifier: collapse duplicate
/// slashes and strip a trailing slash (the root `/` stays as-is).
pub(crate) fn normalize_page_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;

    for c in path.trim().chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(c);
    }

    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }

    if out.is_empty() {
        "/".to_string()
    } else {
        out
    }
}
