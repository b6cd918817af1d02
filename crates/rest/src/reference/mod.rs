//! URI references as defined by RFC 3986.
//!
//! A [`Reference`] is backed by a single string plus the byte offsets of its scheme,
//! query and fragment separators. The offsets are derived from the string on every
//! construction and every mutation, so the accessors always reflect the current value.
//!
//! ```text
//! URI reference        = absolute-reference | relative-reference
//! absolute-reference   = scheme ":" scheme-specific-part [ "#" fragment ]
//! scheme-specific-part = hierarchical-part [ "?" query ] | opaque-part
//! hierarchical-part    = "//" authority path-abempty | path-absolute | path-rootless | path-empty
//! authority            = [ user-info "@" ] host-name [ ":" host-port ]
//! relative-reference   = relative-part [ "?" query ] [ "#" fragment ]
//! ```
//!
//! Parsing never fails: a string that does not look like a URI is kept verbatim and the
//! accessors simply return `None` for the components they cannot find. Percent-encoding
//! is not applied implicitly, see [`encode`] and [`decode`].
//!
//! # Example
//!
//! ```
//! use micro_rest::reference::Reference;
//!
//! let base = Reference::parse("http://a/b/c/d;p?q");
//! assert_eq!(base.resolve("../g").as_str(), "http://a/b/g");
//! assert_eq!(base.authority(), Some("a"));
//! assert_eq!(base.query(), Some("q"));
//! ```

mod encoding;
mod relativize;
mod resolve;

pub use encoding::decode;
pub use encoding::encode;

use serde::de::DeserializeOwned;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// A mutable URI reference, see the [module documentation](self).
#[derive(Debug, Clone)]
pub struct Reference {
    uri: String,
    indexes: Indexes,
    base: Option<Arc<Reference>>,
}

/// Byte offsets of the separators inside the backing string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Indexes {
    scheme: Option<usize>,
    query: Option<usize>,
    fragment: Option<usize>,
}

impl Indexes {
    fn of(uri: &str) -> Self {
        let fragment = uri.find('#');
        let before_fragment = &uri[..fragment.unwrap_or(uri.len())];
        let query = before_fragment.find('?');

        let scheme = uri
            .find([':', '/', '?', '#'])
            .filter(|&index| uri.as_bytes()[index] == b':' && is_valid_scheme(&uri[..index]));

        Self { scheme, query, fragment }
    }
}

fn is_valid_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

impl Reference {
    /// Parses a URI reference, keeping the input verbatim.
    pub fn parse(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let indexes = Indexes::of(&uri);
        Self { uri, indexes, base: None }
    }

    /// Creates a reference that remembers the base it is relative to.
    ///
    /// Use [`Reference::target_ref`] to obtain the resolved absolute reference.
    pub fn with_base(base: Reference, relative: impl Into<String>) -> Self {
        let mut reference = Self::parse(relative);
        reference.base = Some(Arc::new(base));
        reference
    }

    /// Builds an absolute hierarchical reference from its parts.
    ///
    /// Default ports (ftp 21, http 80, https 443) are left out of the authority.
    pub fn from_parts(
        scheme: &str,
        host_name: &str,
        host_port: Option<u16>,
        path: Option<&str>,
        query: Option<&str>,
        fragment: Option<&str>,
    ) -> Self {
        let mut authority = host_name.to_owned();
        if let Some(port) = host_port.filter(|port| default_port(scheme) != Some(*port)) {
            authority.push(':');
            authority.push_str(&port.to_string());
        }

        let path = path.map(|path| if path.is_empty() || path.starts_with('/') { path.to_owned() } else { format!("/{path}") });

        Self::parse(compose(Some(scheme), Some(&authority), path.as_deref().unwrap_or(""), query, fragment))
    }

    /// The backing string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// The base reference used to resolve this reference, if any.
    pub fn base_ref(&self) -> Option<&Reference> {
        self.base.as_deref()
    }

    /// Sets or removes the base reference.
    pub fn set_base_ref(&mut self, base: Option<Reference>) {
        self.base = base.map(Arc::new);
    }

    /// The scheme component, without the trailing `:`.
    pub fn scheme(&self) -> Option<&str> {
        self.indexes.scheme.map(|index| &self.uri[..index])
    }

    /// Everything between the scheme separator and the fragment separator.
    pub fn scheme_specific_part(&self) -> Option<&str> {
        self.indexes.scheme.map(|index| &self.uri[index + 1..self.fragment_boundary()])
    }

    /// The part of a relative reference that precedes the query and fragment.
    pub fn relative_part(&self) -> Option<&str> {
        match self.indexes.scheme {
            Some(_) => None,
            None => Some(&self.uri[..self.hierarchical_end()]),
        }
    }

    /// The scheme specific part less the query, or the relative part of a relative reference.
    pub fn hierarchical_part(&self) -> &str {
        &self.uri[self.hierarchical_start()..self.hierarchical_end()]
    }

    /// The authority component, present only when the hierarchical part starts with `//`.
    pub fn authority(&self) -> Option<&str> {
        if !self.is_hierarchical() {
            return None;
        }

        let part = self.hierarchical_part().strip_prefix("//")?;
        match part.find('/') {
            Some(index) => Some(&part[..index]),
            None => Some(part),
        }
    }

    /// The user info inside the authority, before the `@`.
    pub fn user_info(&self) -> Option<&str> {
        let authority = self.authority()?;
        authority.rfind('@').map(|index| &authority[..index])
    }

    /// The host name inside the authority, without user info and port.
    pub fn host_name(&self) -> Option<&str> {
        let authority = self.authority()?;
        let host_and_port = authority.rfind('@').map_or(authority, |index| &authority[index + 1..]);
        Some(&host_and_port[..port_separator(host_and_port).unwrap_or(host_and_port.len())])
    }

    /// The explicit port inside the authority; `None` when absent or not a valid port number.
    pub fn host_port(&self) -> Option<u16> {
        let authority = self.authority()?;
        let host_and_port = authority.rfind('@').map_or(authority, |index| &authority[index + 1..]);
        let separator = port_separator(host_and_port)?;
        host_and_port[separator + 1..].parse().ok()
    }

    /// The scheme followed by `://` and the authority, e.g. `http://localhost:8080`.
    pub fn host_identifier(&self) -> Option<String> {
        Some(format!("{}://{}", self.scheme()?, self.authority()?))
    }

    /// The path component of a hierarchical reference; `None` for opaque references.
    ///
    /// A reference with an authority and no path has an empty path.
    pub fn path(&self) -> Option<&str> {
        if !self.is_hierarchical() {
            return None;
        }

        let part = self.hierarchical_part();
        match part.strip_prefix("//") {
            Some(rest) => Some(rest.find('/').map_or("", |index| &rest[index..])),
            None => Some(part),
        }
    }

    /// The query component, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.indexes.query.map(|index| &self.uri[index + 1..self.fragment_boundary()])
    }

    /// Deserializes the query component as an `application/x-www-form-urlencoded` form.
    ///
    /// A missing query deserializes like an empty form.
    pub fn query_as<T: DeserializeOwned>(&self) -> Result<T, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(self.query().unwrap_or(""))
    }

    /// The fragment identifier, without the leading `#`.
    pub fn fragment(&self) -> Option<&str> {
        self.indexes.fragment.map(|index| &self.uri[index + 1..])
    }

    /// The reference without its fragment.
    pub fn identifier(&self) -> &str {
        &self.uri[..self.fragment_boundary()]
    }

    /// The segments of the path.
    ///
    /// The leading `/` of an absolute path does not produce a segment, so both `/a/b`
    /// and `a/b` yield `["a", "b"]`, while `/a/b/` yields `["a", "b", ""]`.
    pub fn segments(&self) -> Vec<&str> {
        match self.path() {
            None | Some("") => Vec::new(),
            Some(path) => path.strip_prefix('/').unwrap_or(path).split('/').collect(),
        }
    }

    /// The text after the last `/` of the path.
    pub fn last_segment(&self) -> Option<&str> {
        let path = self.path()?;
        path.rfind('/').map(|index| &path[index + 1..])
    }

    /// True when the reference has a scheme.
    #[inline]
    pub fn is_absolute(&self) -> bool {
        self.indexes.scheme.is_some()
    }

    #[inline]
    pub fn is_relative(&self) -> bool {
        !self.is_absolute()
    }

    /// True for relative references and for absolute references whose scheme specific
    /// part starts with `/`.
    pub fn is_hierarchical(&self) -> bool {
        self.scheme_specific_part().is_none_or(|part| part.starts_with('/'))
    }

    /// True for absolute references that are not hierarchical, e.g. `mailto:a@b`.
    pub fn is_opaque(&self) -> bool {
        !self.is_hierarchical()
    }

    /// Replaces the scheme. `None` turns the reference into a relative one.
    pub fn set_scheme(&mut self, scheme: Option<&str>) {
        let rest = match self.indexes.scheme {
            Some(index) => &self.uri[index + 1..],
            None => self.uri.as_str(),
        };

        let uri = match scheme {
            Some(scheme) => format!("{scheme}:{rest}"),
            None => rest.to_owned(),
        };
        self.replace(uri);
    }

    /// Replaces the authority, keeping the current path, query and fragment.
    pub fn set_authority(&mut self, authority: Option<&str>) {
        let path = self.path().unwrap_or("").to_owned();
        let path = match authority {
            Some(_) if !path.is_empty() && !path.starts_with('/') => format!("/{path}"),
            _ => path,
        };
        self.replace_hierarchical_part(authority.map(ToOwned::to_owned).as_deref(), &path);
    }

    /// Replaces the host name, keeping user info and port.
    pub fn set_host_name(&mut self, host_name: &str) {
        let authority = build_authority(self.user_info(), host_name, self.host_port());
        self.set_authority(Some(&authority));
    }

    /// Replaces or removes the explicit port.
    pub fn set_host_port(&mut self, host_port: Option<u16>) {
        let host_name = self.host_name().unwrap_or("").to_owned();
        let authority = build_authority(self.user_info(), &host_name, host_port);
        self.set_authority(Some(&authority));
    }

    /// Replaces the path, keeping the authority, query and fragment.
    ///
    /// When an authority is present, a path not starting with `/` gets one.
    pub fn set_path(&mut self, path: Option<&str>) {
        let authority = self.authority().map(ToOwned::to_owned);
        let path = path.unwrap_or("");
        let path = match authority {
            Some(_) if !path.is_empty() && !path.starts_with('/') => format!("/{path}"),
            _ => path.to_owned(),
        };
        self.replace_hierarchical_part(authority.as_deref(), &path);
    }

    /// Replaces the path with the given segments, preserving whether it was absolute.
    pub fn set_segments<S: AsRef<str>>(&mut self, segments: &[S]) {
        let absolute = self.authority().is_some() || self.path().is_some_and(|path| path.starts_with('/'));
        let joined = segments.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("/");
        let path = if absolute { format!("/{joined}") } else { joined };
        self.set_path(Some(&path));
    }

    /// Replaces or removes the query component.
    pub fn set_query(&mut self, query: Option<&str>) {
        let mut uri = self.uri[..self.hierarchical_end()].to_owned();
        if let Some(query) = query {
            uri.push('?');
            uri.push_str(query);
        }
        uri.push_str(&self.uri[self.fragment_boundary()..]);
        self.replace(uri);
    }

    /// Replaces or removes the fragment identifier.
    pub fn set_fragment(&mut self, fragment: Option<&str>) {
        let mut uri = self.identifier().to_owned();
        if let Some(fragment) = fragment {
            uri.push('#');
            uri.push_str(fragment);
        }
        self.replace(uri);
    }

    /// Resolves `relative` against this reference, see [`Reference::resolve_ref`].
    pub fn resolve(&self, relative: &str) -> Reference {
        self.resolve_ref(&Reference::parse(relative))
    }

    /// Resolves `relative` against this reference following RFC 3986 section 5.2.
    pub fn resolve_ref(&self, relative: &Reference) -> Reference {
        resolve::resolve(self, relative)
    }

    /// Resolves this reference against its base, if it has one and is relative.
    pub fn target_ref(&self) -> Reference {
        match (&self.base, self.is_relative()) {
            (Some(base), true) => base.target_ref().resolve_ref(self),
            _ => Reference::parse(self.uri.clone()),
        }
    }

    /// Expresses this reference relatively to `base`.
    ///
    /// Both references must be absolute, hierarchical and share scheme and authority,
    /// otherwise an unchanged copy of this reference is returned.
    pub fn relativize(&self, base: &Reference) -> Reference {
        relativize::relativize(self, base)
    }

    /// Removes dot segments from the path and lower-cases scheme and host name.
    pub fn normalize(&mut self) {
        resolve::normalize(self);
    }

    /// True when both references resolve to the same normalized target.
    pub fn is_equivalent_to(&self, other: &Reference) -> bool {
        let mut this = self.target_ref();
        let mut other = other.target_ref();
        this.normalize();
        other.normalize();
        this == other
    }

    /// The part of the target reference that follows the base identifier.
    ///
    /// A trailing `/` of the base stays in the remaining part, so with base
    /// `http://host/` the target `http://host/a` leaves `/a`. Without a base, or when
    /// the target does not lie under the base, this is the path followed by the query,
    /// if any.
    pub fn remaining_part(&self) -> String {
        if let Some(rest) = self.base_remainder() {
            return rest;
        }

        let target = self.target_ref();
        let mut remaining = target.path().unwrap_or("").to_owned();
        if let Some(query) = target.query() {
            remaining.push('?');
            remaining.push_str(query);
        }
        remaining
    }

    /// The part of the target reference that follows the base identifier, or `None`
    /// without a base or when the target does not lie under it.
    ///
    /// The base must end on a segment boundary of the target: base `/api` covers
    /// `/api`, `/api/users` and `/api?q` but not `/apiary`.
    pub fn base_remainder(&self) -> Option<String> {
        let base = self.base.as_ref()?.target_ref();
        let target = self.target_ref();

        let prefix = base.identifier().trim_end_matches('/');
        let rest = target.identifier().strip_prefix(prefix)?;
        let on_boundary = rest.is_empty() || rest.starts_with('/') || rest.starts_with('?');
        on_boundary.then(|| rest.to_owned())
    }

    fn replace(&mut self, uri: String) {
        self.indexes = Indexes::of(&uri);
        self.uri = uri;
    }

    fn replace_hierarchical_part(&mut self, authority: Option<&str>, path: &str) {
        let mut uri = self.uri[..self.hierarchical_start()].to_owned();
        if let Some(authority) = authority {
            uri.push_str("//");
            uri.push_str(authority);
        }
        uri.push_str(path);
        uri.push_str(&self.uri[self.hierarchical_end()..]);
        self.replace(uri);
    }

    fn hierarchical_start(&self) -> usize {
        self.indexes.scheme.map_or(0, |index| index + 1)
    }

    fn hierarchical_end(&self) -> usize {
        self.indexes.query.unwrap_or_else(|| self.fragment_boundary())
    }

    fn fragment_boundary(&self) -> usize {
        self.indexes.fragment.unwrap_or(self.uri.len())
    }
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme.to_ascii_lowercase().as_str() {
        "ftp" => Some(21),
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}

/// Index of the `:` separating host and port, skipping IPv6 literals.
fn port_separator(host_and_port: &str) -> Option<usize> {
    let search_from = host_and_port.rfind(']').unwrap_or(0);
    host_and_port[search_from..].rfind(':').map(|index| index + search_from)
}

fn build_authority(user_info: Option<&str>, host_name: &str, host_port: Option<u16>) -> String {
    let mut authority = String::new();
    if let Some(user_info) = user_info {
        authority.push_str(user_info);
        authority.push('@');
    }
    authority.push_str(host_name);
    if let Some(port) = host_port {
        authority.push(':');
        authority.push_str(&port.to_string());
    }
    authority
}

/// Recomposes a reference from its components, RFC 3986 section 5.3.
pub(crate) fn compose(
    scheme: Option<&str>,
    authority: Option<&str>,
    path: &str,
    query: Option<&str>,
    fragment: Option<&str>,
) -> String {
    let mut uri = String::with_capacity(path.len() + 16);
    if let Some(scheme) = scheme {
        uri.push_str(scheme);
        uri.push(':');
    }
    if let Some(authority) = authority {
        uri.push_str("//");
        uri.push_str(authority);
    }
    uri.push_str(path);
    if let Some(query) = query {
        uri.push('?');
        uri.push_str(query);
    }
    if let Some(fragment) = fragment {
        uri.push('#');
        uri.push_str(fragment);
    }
    uri
}

/// Resolves `relative` against `base` and returns the resulting string.
pub fn resolve(base: &str, relative: &str) -> String {
    Reference::parse(base).resolve(relative).uri
}

/// Expresses `target` relatively to `base` and returns the resulting string.
pub fn relativize(base: &str, target: &str) -> String {
    Reference::parse(target).relativize(&Reference::parse(base)).uri
}

impl PartialEq for Reference {
    /// Strict, character to character equality. The base reference is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for Reference {}

impl Hash for Reference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl FromStr for Reference {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Reference {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for Reference {
    fn from(value: String) -> Self {
        Self::parse(value)
    }
}

impl AsRef<str> for Reference {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn parse_absolute() {
        let reference = Reference::parse("http://user@www.example.com:8080/a/b?x=1&y=2#frag");

        assert!(reference.is_absolute());
        assert!(reference.is_hierarchical());
        assert_eq!(reference.scheme(), Some("http"));
        assert_eq!(reference.scheme_specific_part(), Some("//user@www.example.com:8080/a/b?x=1&y=2"));
        assert_eq!(reference.hierarchical_part(), "//user@www.example.com:8080/a/b");
        assert_eq!(reference.authority(), Some("user@www.example.com:8080"));
        assert_eq!(reference.user_info(), Some("user"));
        assert_eq!(reference.host_name(), Some("www.example.com"));
        assert_eq!(reference.host_port(), Some(8080));
        assert_eq!(reference.host_identifier().as_deref(), Some("http://user@www.example.com:8080"));
        assert_eq!(reference.path(), Some("/a/b"));
        assert_eq!(reference.query(), Some("x=1&y=2"));
        assert_eq!(reference.fragment(), Some("frag"));
        assert_eq!(reference.identifier(), "http://user@www.example.com:8080/a/b?x=1&y=2");
        assert_eq!(reference.relative_part(), None);
    }

    #[test]
    fn parse_relative() {
        let reference = Reference::parse("../c/d?q#f");

        assert!(reference.is_relative());
        assert!(reference.is_hierarchical());
        assert_eq!(reference.scheme(), None);
        assert_eq!(reference.authority(), None);
        assert_eq!(reference.relative_part(), Some("../c/d"));
        assert_eq!(reference.path(), Some("../c/d"));
        assert_eq!(reference.query(), Some("q"));
        assert_eq!(reference.fragment(), Some("f"));
    }

    #[test]
    fn parse_opaque() {
        let reference = Reference::parse("mailto:someone@example.com");

        assert!(reference.is_absolute());
        assert!(reference.is_opaque());
        assert_eq!(reference.scheme_specific_part(), Some("someone@example.com"));
        assert_eq!(reference.path(), None);
        assert_eq!(reference.authority(), None);
        assert!(reference.segments().is_empty());
    }

    #[test]
    fn parse_keeps_unparsable_input() {
        let reference = Reference::parse("::not a uri::");
        assert_eq!(reference.as_str(), "::not a uri::");
        assert_eq!(reference.scheme(), None);
        assert_eq!(reference.query(), None);
        assert_eq!(reference.fragment(), None);

        let reference = Reference::parse("");
        assert_eq!(reference.path(), Some(""));
        assert_eq!(reference.authority(), None);
    }

    #[test]
    fn colon_after_slash_is_not_a_scheme() {
        let reference = Reference::parse("a/b:c");
        assert_eq!(reference.scheme(), None);
        assert_eq!(reference.path(), Some("a/b:c"));

        let reference = Reference::parse("1abc:def");
        assert_eq!(reference.scheme(), None);
    }

    #[test]
    fn question_mark_in_fragment_is_not_a_query() {
        let reference = Reference::parse("http://a/b#c?d");
        assert_eq!(reference.query(), None);
        assert_eq!(reference.fragment(), Some("c?d"));
        assert_eq!(reference.path(), Some("/b"));
    }

    #[test]
    fn authority_without_path() {
        let reference = Reference::parse("http://example.com?q");
        assert_eq!(reference.authority(), Some("example.com"));
        assert_eq!(reference.path(), Some(""));
        assert_eq!(reference.query(), Some("q"));
    }

    #[test]
    fn ipv6_host() {
        let reference = Reference::parse("http://[::1]:8080/index");
        assert_eq!(reference.host_name(), Some("[::1]"));
        assert_eq!(reference.host_port(), Some(8080));

        let reference = Reference::parse("http://[::1]/index");
        assert_eq!(reference.host_name(), Some("[::1]"));
        assert_eq!(reference.host_port(), None);
    }

    #[test]
    fn segments() {
        assert_eq!(Reference::parse("/a/b/c").segments(), vec!["a", "b", "c"]);
        assert_eq!(Reference::parse("/a/b/c/").segments(), vec!["a", "b", "c", ""]);
        assert_eq!(Reference::parse("a/b").segments(), vec!["a", "b"]);
        assert_eq!(Reference::parse("http://host/x/y?q").segments(), vec!["x", "y"]);
        assert_eq!(Reference::parse("http://host/x/y").last_segment(), Some("y"));
        assert_eq!(Reference::parse("http://host/x/").last_segment(), Some(""));
    }

    #[test]
    fn from_parts_skips_default_port() {
        let reference = Reference::from_parts("http", "localhost", Some(80), Some("/a"), Some("b=1"), None);
        assert_eq!(reference.as_str(), "http://localhost/a?b=1");

        let reference = Reference::from_parts("https", "localhost", Some(8443), Some("a"), None, Some("top"));
        assert_eq!(reference.as_str(), "https://localhost:8443/a#top");
    }

    #[test]
    fn setters_recompute_offsets() {
        let mut reference = Reference::parse("http://a/b/c?q#f");

        reference.set_query(Some("x=1"));
        assert_eq!(reference.as_str(), "http://a/b/c?x=1#f");
        assert_eq!(reference.query(), Some("x=1"));
        assert_eq!(reference.fragment(), Some("f"));

        reference.set_fragment(None);
        assert_eq!(reference.as_str(), "http://a/b/c?x=1");
        assert_eq!(reference.fragment(), None);

        reference.set_path(Some("d/e"));
        assert_eq!(reference.as_str(), "http://a/d/e?x=1");
        assert_eq!(reference.path(), Some("/d/e"));

        reference.set_authority(Some("example.org:81"));
        assert_eq!(reference.as_str(), "http://example.org:81/d/e?x=1");
        assert_eq!(reference.host_port(), Some(81));

        reference.set_host_port(None);
        assert_eq!(reference.as_str(), "http://example.org/d/e?x=1");

        reference.set_host_name("www.example.org");
        assert_eq!(reference.host_name(), Some("www.example.org"));

        reference.set_scheme(Some("https"));
        assert_eq!(reference.as_str(), "https://www.example.org/d/e?x=1");

        reference.set_query(None);
        reference.set_fragment(Some("top"));
        assert_eq!(reference.as_str(), "https://www.example.org/d/e#top");
        assert_eq!(reference.query(), None);

        reference.set_scheme(None);
        assert_eq!(reference.as_str(), "//www.example.org/d/e#top");
        assert!(reference.is_relative());
        assert_eq!(reference.authority(), Some("www.example.org"));
    }

    #[test]
    fn set_segments_keeps_absolute_path() {
        let mut reference = Reference::parse("http://a/b/c");
        reference.set_segments(&["x", "y", "z"]);
        assert_eq!(reference.as_str(), "http://a/x/y/z");

        let mut reference = Reference::parse("b/c");
        reference.set_segments(&["x"]);
        assert_eq!(reference.as_str(), "x");
    }

    #[test]
    fn target_ref_uses_base() {
        let base = Reference::parse("http://a/b/c/d;p?q");
        let reference = Reference::with_base(base, "../g");

        assert_eq!(reference.as_str(), "../g");
        assert_eq!(reference.base_ref().map(Reference::as_str), Some("http://a/b/c/d;p?q"));
        assert_eq!(reference.target_ref().as_str(), "http://a/b/g");

        let absolute = Reference::with_base(Reference::parse("http://x/"), "http://a/b");
        assert_eq!(absolute.target_ref().as_str(), "http://a/b");
    }

    #[test]
    fn equivalence() {
        let first = Reference::parse("HTTP://Example.com/a/./b/../c");
        let second = Reference::parse("http://example.com/a/c");
        assert_ne!(first, second);
        assert!(first.is_equivalent_to(&second));
    }

    #[test]
    fn remaining_part() {
        let base = Reference::parse("http://localhost:8080/api");
        let reference = Reference::with_base(base.clone(), "http://localhost:8080/api/invoices/42?full=true#top");
        assert_eq!(reference.remaining_part(), "/invoices/42?full=true");

        let outside = Reference::with_base(base, "http://elsewhere/x?y");
        assert_eq!(outside.remaining_part(), "/x?y");

        assert_eq!(Reference::parse("http://a/b/c").remaining_part(), "/b/c");
    }

    #[test]
    fn remaining_part_keeps_the_slash_of_the_base() {
        let base = Reference::parse("http://localhost/");
        let reference = Reference::with_base(base.clone(), "http://localhost/invoices/42");
        assert_eq!(reference.remaining_part(), "/invoices/42");

        let reference = Reference::with_base(base, "http://localhost/");
        assert_eq!(reference.remaining_part(), "/");

        let base = Reference::parse("http://localhost/shop/");
        let reference = Reference::with_base(base, "http://localhost/shop/cart?id=1");
        assert_eq!(reference.remaining_part(), "/cart?id=1");
    }

    #[test]
    fn base_remainder_stops_at_segment_boundaries() {
        let base = Reference::parse("http://example.com/api");

        let reference = Reference::with_base(base.clone(), "http://example.com/api");
        assert_eq!(reference.base_remainder().as_deref(), Some(""));

        let reference = Reference::with_base(base.clone(), "http://example.com/api?page=2");
        assert_eq!(reference.base_remainder().as_deref(), Some("?page=2"));

        let reference = Reference::with_base(base, "http://example.com/apiary");
        assert_eq!(reference.base_remainder(), None);
        assert_eq!(reference.remaining_part(), "/apiary");

        assert_eq!(Reference::parse("http://example.com/api").base_remainder(), None);
    }

    #[test]
    fn query_as_form() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Paging {
            page: u32,
            size: u32,
        }

        let reference = Reference::parse("http://a/items?page=2&size=20");
        let paging: Paging = reference.query_as().unwrap();
        assert_eq!(paging, Paging { page: 2, size: 20 });

        let reference = Reference::parse("http://a/items?page=two");
        assert!(reference.query_as::<Paging>().is_err());
    }

    #[test]
    fn free_functions() {
        assert_eq!(resolve("http://a/b/c/d;p?q", "./g"), "http://a/b/c/g");
        assert_eq!(relativize("http://a/b/c/d", "http://a/b/e/f"), "../e/f");
    }
}
