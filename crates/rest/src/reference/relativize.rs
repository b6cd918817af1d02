//! The inverse of resolution: expressing a reference relatively to a base.

use super::Reference;
use tracing::trace;

pub(super) fn relativize(target: &Reference, base: &Reference) -> Reference {
    if !is_absolute_hierarchical(target) || !is_absolute_hierarchical(base) {
        return Reference::parse(target.as_str());
    }

    let same_scheme = target.scheme().zip(base.scheme()).is_some_and(|(left, right)| left.eq_ignore_ascii_case(right));
    if !same_scheme || target.authority() != base.authority() {
        return Reference::parse(target.as_str());
    }

    let target_path = target.path().unwrap_or("");
    let base_path = base.path().unwrap_or("");

    let relative = if target_path == base_path {
        same_path(target, base)
    } else if let Some(network_path) = network_path(target) {
        network_path
    } else {
        // an empty path under an authority resolves like `/`
        let base_path = if base_path.is_empty() && base.authority().is_some() { "/" } else { base_path };
        let mut relative = relative_path(target_path, base_path);
        append_components(&mut relative, target.query(), target.fragment());
        relative
    };

    trace!(base = base.as_str(), target = target.as_str(), relative = relative.as_str(), "relativized reference");
    Reference::parse(relative)
}

fn is_absolute_hierarchical(reference: &Reference) -> bool {
    reference.is_absolute() && reference.is_hierarchical()
}

/// Both paths are equal, only the query and fragment may need to be expressed.
fn same_path(target: &Reference, base: &Reference) -> String {
    let fragment = target.fragment().filter(|fragment| Some(*fragment) != base.fragment());

    if target.query() == base.query() {
        return match fragment {
            None => ".".to_owned(),
            Some(fragment) => format!("#{fragment}"),
        };
    }

    if let Some(network_path) = network_path(target) {
        return network_path;
    }

    let mut relative = match target.query() {
        // an empty path inherits the base query, so the query must be spelled out
        Some(_) => String::new(),
        // a non-empty path drops the base query
        None => match target.last_segment() {
            None | Some("") => ".".to_owned(),
            Some(segment) => with_dot_prefix(segment),
        },
    };
    append_components(&mut relative, target.query(), fragment);
    relative
}

/// A path reference always resolves to a non-empty path below an authority, so an
/// empty target path is only reachable through `//authority`.
fn network_path(target: &Reference) -> Option<String> {
    let authority = target.authority().filter(|_| target.path().unwrap_or("").is_empty())?;
    let mut relative = format!("//{authority}");
    append_components(&mut relative, target.query(), target.fragment());
    Some(relative)
}

/// Climbs out of the base directory with `..` segments, then descends into the target.
fn relative_path(target_path: &str, base_path: &str) -> String {
    let base_directory = &base_path[..base_path.rfind('/').map_or(0, |index| index + 1)];

    let mut common = 0;
    for (index, (left, right)) in base_directory.bytes().zip(target_path.bytes()).enumerate() {
        if left != right {
            break;
        }
        if left == b'/' {
            common = index + 1;
        }
    }

    let parents = base_directory[common..].matches('/').count();
    let tail = &target_path[common..];

    let mut relative = vec![".."; parents].join("/");
    if !tail.is_empty() {
        if relative.is_empty() {
            relative = with_dot_prefix(tail);
        } else {
            relative.push('/');
            relative.push_str(tail);
        }
    }

    if relative.is_empty() { ".".to_owned() } else { relative }
}

/// Prefixes `./` when the first segment would otherwise be read as a scheme or an authority.
fn with_dot_prefix(path: &str) -> String {
    let first_segment = path.split('/').next().unwrap_or("");
    if first_segment.contains(':') || path.starts_with('/') { format!("./{path}") } else { path.to_owned() }
}

fn append_components(relative: &mut String, query: Option<&str>, fragment: Option<&str>) {
    if let Some(query) = query {
        relative.push('?');
        relative.push_str(query);
    }
    if let Some(fragment) = fragment {
        relative.push('#');
        relative.push_str(fragment);
    }
}
