//! The request as seen by a resource: the resolved reference, the route bindings and
//! the client preferences read from the headers.

use http::{HeaderMap, Method};
use micro_rest::negotiation::PreferenceSet;
use micro_rest::reference::Reference;
use micro_rest::template::MatchResult;
use std::time::SystemTime;

#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    headers: HeaderMap,
    reference: Reference,
    bindings: MatchResult,
    preferences: PreferenceSet,
    if_modified_since: Option<SystemTime>,
}

impl RequestContext {
    pub fn new(method: Method, headers: HeaderMap, reference: Reference, bindings: MatchResult) -> Self {
        Self {
            method,
            headers,
            reference,
            bindings,
            preferences: PreferenceSet::default(),
            if_modified_since: None,
        }
    }

    #[must_use]
    pub fn with_preferences(mut self, preferences: PreferenceSet) -> Self {
        self.preferences = preferences;
        self
    }

    #[must_use]
    pub fn with_if_modified_since(mut self, if_modified_since: Option<SystemTime>) -> Self {
        self.if_modified_since = if_modified_since;
        self
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The resource reference, resolved against the application base and remembering it.
    #[inline]
    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    /// Template variables bound by the selected route.
    #[inline]
    pub fn bindings(&self) -> &MatchResult {
        &self.bindings
    }

    /// Value of the template variable `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.bindings.get(name)
    }

    #[inline]
    pub fn preferences(&self) -> &PreferenceSet {
        &self.preferences
    }

    #[inline]
    pub fn if_modified_since(&self) -> Option<SystemTime> {
        self.if_modified_since
    }
}
