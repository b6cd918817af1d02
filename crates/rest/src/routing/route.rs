use crate::template::{MatchResult, Template};
use std::fmt;
use tracing::trace;

/// Stable handle of a route attached to a [`RouteTable`](super::RouteTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(pub(crate) u64);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A compiled template paired with the target it leads to.
#[derive(Debug)]
pub struct Route<T> {
    id: RouteId,
    template: Template,
    target: T,
}

impl<T> Route<T> {
    pub(crate) fn new(id: RouteId, template: Template, target: T) -> Self {
        Self { id, template, target }
    }

    #[inline]
    pub fn id(&self) -> RouteId {
        self.id
    }

    #[inline]
    pub fn template(&self) -> &Template {
        &self.template
    }

    #[inline]
    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    /// Scores `input` within `[0, 1]`.
    ///
    /// A template matching the whole input scores 1, a template matching only a prefix
    /// scores between `required_score` and 1 in proportion to the matched length, and a
    /// template that does not match scores 0.
    pub fn score(&self, input: &str, required_score: f64) -> f64 {
        self.evaluate(input, required_score).map_or(0.0, |(score, _)| score)
    }

    pub(crate) fn evaluate(&self, input: &str, required_score: f64) -> Option<(f64, MatchResult)> {
        let matched = self.template.matches(input)?;

        let score = if input.is_empty() {
            1.0
        } else {
            #[allow(clippy::cast_precision_loss, reason = "inputs are far shorter than 2^52 bytes")]
            let ratio = matched.matched_len() as f64 / input.len() as f64;
            required_score + (1.0 - required_score) * ratio
        };

        trace!(route = %self.id, pattern = self.template.pattern(), input, score, "scored route");
        Some((score, matched))
    }
}
