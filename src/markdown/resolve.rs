//! Relative URL resolution against a document's directory.

/// Whether `url` must be left untouched.
pub fn is_absolute(url: &str) -> bool {
    url.starts_with('/') || url.starts_with('#') || ::url::Url::parse(url).is_ok()
}

/// Resolve `url` against `base_dir` (e.g. `content/projects`).
///
/// Absolute URLs are returned unchanged. `.` segments are skipped and `..`
/// pops one directory; popping past the root is a no-op.
pub fn resolve(url: &str, base_dir: &str) -> String {
    if is_absolute(url) || base_dir.is_empty() {
        return url.to_string();
    }

    let mut parts: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in url.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative() {
        assert_eq!(resolve("img/a.png", "content/projects"), "content/projects/img/a.png");
        assert_eq!(resolve("./a.png", "content"), "content/a.png");
        assert_eq!(resolve("../shared/b.svg", "content/projects"), "content/shared/b.svg");
    }

    #[test]
    fn test_absolute_untouched() {
        assert_eq!(resolve("https://x.io/a.png", "content"), "https://x.io/a.png");
        assert_eq!(resolve("/static/a.png", "content"), "/static/a.png");
        assert_eq!(resolve("data:image/png;base64,AA", "content"), "data:image/png;base64,AA");
    }

    #[test]
    fn test_pop_past_root() {
        assert_eq!(resolve("../../../a.png", "content"), "a.png");
    }

    #[test]
    fn test_no_base() {
        assert_eq!(resolve("a/b.png", ""), "a/b.png");
    }
}
