//! Reference resolution and normalization, RFC 3986 sections 5.2 and 6.2.2.

use super::{Reference, compose};
use tracing::trace;

/// Transforms `relative` into a target reference using `base`.
///
/// A relative reference carrying its own scheme is returned verbatim. Excess `..`
/// segments above the root of an absolute path are dropped, while those above a
/// relative base path are kept.
pub(super) fn resolve(base: &Reference, relative: &Reference) -> Reference {
    if relative.is_absolute() {
        return Reference::parse(relative.as_str());
    }

    let relative_path = relative.path().unwrap_or("");

    let (authority, path, query) = if let Some(authority) = relative.authority() {
        (Some(authority), remove_dot_segments(relative_path), relative.query())
    } else if relative_path.is_empty() {
        (base.authority(), base.path().unwrap_or("").to_owned(), relative.query().or(base.query()))
    } else if relative_path.starts_with('/') {
        (base.authority(), remove_dot_segments(relative_path), relative.query())
    } else {
        (base.authority(), remove_dot_segments(&merge(base, relative_path)), relative.query())
    };

    let resolved = compose(base.scheme(), authority, &path, query, relative.fragment());
    trace!(base = base.as_str(), relative = relative.as_str(), resolved = resolved.as_str(), "resolved reference");
    Reference::parse(resolved)
}

/// Appends `relative_path` to every segment of the base path but the last.
fn merge(base: &Reference, relative_path: &str) -> String {
    let base_path = base.path().unwrap_or("");

    if base.authority().is_some() && base_path.is_empty() {
        return format!("/{relative_path}");
    }

    match base_path.rfind('/') {
        Some(index) => format!("{}{relative_path}", &base_path[..=index]),
        None => relative_path.to_owned(),
    }
}

/// Interprets and removes the `.` and `..` segments of a path.
///
/// For an absolute path a `..` without a preceding segment is dropped; for a relative
/// path it is kept so that `a/../../b` becomes `../b`.
pub(super) fn remove_dot_segments(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }

    let absolute = path.starts_with('/');
    let body = if absolute { &path[1..] } else { path };
    let segments: Vec<&str> = body.split('/').collect();
    let last = segments.len() - 1;

    let mut output: Vec<&str> = Vec::with_capacity(segments.len());
    let mut trailing_slash = false;

    for (index, segment) in segments.into_iter().enumerate() {
        match segment {
            "." => trailing_slash = index == last,
            ".." => {
                if output.last().is_some_and(|previous| *previous != "..") {
                    output.pop();
                } else if !absolute {
                    output.push("..");
                }
                trailing_slash = index == last;
            }
            segment => {
                output.push(segment);
                trailing_slash = false;
            }
        }
    }

    let mut result = String::with_capacity(path.len());
    if absolute {
        result.push('/');
    }
    result.push_str(&output.join("/"));
    if trailing_slash && !output.is_empty() {
        result.push('/');
    }
    result
}

pub(super) fn normalize(reference: &mut Reference) {
    if let Some(path) = reference.path() {
        let normalized = remove_dot_segments(path);
        if normalized != path {
            reference.set_path(Some(&normalized));
        }
    }

    if let Some(scheme) = reference.scheme().filter(|scheme| scheme.bytes().any(|b| b.is_ascii_uppercase())) {
        let lower = scheme.to_ascii_lowercase();
        reference.set_scheme(Some(&lower));
    }

    if let Some(host_name) = reference.host_name().filter(|host| host.bytes().any(|b| b.is_ascii_uppercase())) {
        let lower = host_name.to_ascii_lowercase();
        reference.set_host_name(&lower);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://a/b/c/d;p?q";

    fn check(cases: &[(&str, &str)]) {
        let base = Reference::parse(BASE);
        for (relative, expected) in cases {
            assert_eq!(base.resolve(relative).as_str(), *expected, "resolving {relative:?}");
        }
    }

    #[test]
    fn normal_examples() {
        check(&[
            ("g:h", "g:h"),
            ("g", "http://a/b/c/g"),
            ("./g", "http://a/b/c/g"),
            ("g/", "http://a/b/c/g/"),
            ("/g", "http://a/g"),
            ("//g", "http://g"),
            ("?y", "http://a/b/c/d;p?y"),
            ("g?y", "http://a/b/c/g?y"),
            ("#s", "http://a/b/c/d;p?q#s"),
            ("g#s", "http://a/b/c/g#s"),
            ("g?y#s", "http://a/b/c/g?y#s"),
            (";x", "http://a/b/c/;x"),
            ("g;x", "http://a/b/c/g;x"),
            ("g;x?y#s", "http://a/b/c/g;x?y#s"),
            ("", "http://a/b/c/d;p?q"),
            (".", "http://a/b/c/"),
            ("./", "http://a/b/c/"),
            ("..", "http://a/b/"),
            ("../", "http://a/b/"),
            ("../g", "http://a/b/g"),
            ("../..", "http://a/"),
            ("../../", "http://a/"),
            ("../../g", "http://a/g"),
        ]);
    }

    #[test]
    fn abnormal_examples() {
        check(&[
            ("../../../g", "http://a/g"),
            ("../../../../g", "http://a/g"),
            ("/./g", "http://a/g"),
            ("/../g", "http://a/g"),
            ("g.", "http://a/b/c/g."),
            (".g", "http://a/b/c/.g"),
            ("g..", "http://a/b/c/g.."),
            ("..g", "http://a/b/c/..g"),
            ("./../g", "http://a/b/g"),
            ("./g/.", "http://a/b/c/g/"),
            ("g/./h", "http://a/b/c/g/h"),
            ("g/../h", "http://a/b/c/h"),
            ("g;x=1/./y", "http://a/b/c/g;x=1/y"),
            ("g;x=1/../y", "http://a/b/c/y"),
            ("g?y/./x", "http://a/b/c/g?y/./x"),
            ("g?y/../x", "http://a/b/c/g?y/../x"),
            ("g#s/./x", "http://a/b/c/g#s/./x"),
            ("g#s/../x", "http://a/b/c/g#s/../x"),
            ("http:g", "http:g"),
        ]);
    }

    #[test]
    fn empty_reference_drops_base_fragment() {
        let base = Reference::parse("http://a/b?q#f");
        assert_eq!(base.resolve("").as_str(), "http://a/b?q");
    }

    #[test]
    fn base_without_path() {
        let base = Reference::parse("http://a");
        assert_eq!(base.resolve("g").as_str(), "http://a/g");
        assert_eq!(base.resolve("?x").as_str(), "http://a?x");
    }

    #[test]
    fn relative_base_keeps_leading_parents() {
        let base = Reference::parse("a/b");
        assert_eq!(base.resolve("../../c").as_str(), "../c");
        assert_eq!(base.resolve("g").as_str(), "a/g");
    }

    #[test]
    fn remove_dots() {
        assert_eq!(remove_dot_segments("/a/b/c/./../../g"), "/a/g");
        assert_eq!(remove_dot_segments("mid/content=5/../6"), "mid/6");
        assert_eq!(remove_dot_segments("/.."), "/");
        assert_eq!(remove_dot_segments("/a//.."), "/a/");
        assert_eq!(remove_dot_segments("../a/./b"), "../a/b");
        assert_eq!(remove_dot_segments(""), "");
    }

    #[test]
    fn normalize_lowers_scheme_and_host() {
        let mut reference = Reference::parse("HTTP://User@Example.COM:8080/a/../b/./c?Q#F");
        reference.normalize();
        assert_eq!(reference.as_str(), "http://User@example.com:8080/b/c?Q#F");
    }
}
