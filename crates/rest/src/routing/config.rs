use crate::template::MatchingMode;
use serde::Deserialize;

/// How a route table picks one route among those scoring at least the required score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// The highest score, the earliest registered route on ties.
    Best,
    /// The first eligible route in registration order.
    #[default]
    First,
    /// The last eligible route in registration order.
    Last,
    /// Round robin: the first eligible route after the one previously selected.
    Next,
    /// Any eligible route, uniformly.
    Random,
}

/// Settings of a [`RouteTable`](super::RouteTable).
///
/// Missing fields take their default values, so a partial document deserializes:
///
/// ```
/// use micro_rest::routing::{RouterConfig, RoutingMode};
///
/// let config: RouterConfig = serde_json::from_str(r#"{ "mode": "best" }"#).unwrap();
/// assert_eq!(config.mode, RoutingMode::Best);
/// assert_eq!(config.required_score, 0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub mode: RoutingMode,
    /// Minimum score, within `[0, 1]`, a route needs to be selected.
    pub required_score: f64,
    /// Matching mode of templates attached by pattern.
    pub default_matching_mode: MatchingMode,
    pub case_sensitive: bool,
    /// Whether the query takes part in matching references.
    pub matching_query: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            mode: RoutingMode::First,
            required_score: 0.5,
            default_matching_mode: MatchingMode::Equals,
            case_sensitive: true,
            matching_query: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config: RouterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RouterConfig::default());
    }

    #[test]
    fn every_field() {
        let config: RouterConfig = serde_json::from_str(
            r#"{
                "mode": "next",
                "required_score": 0.8,
                "default_matching_mode": "starts_with",
                "case_sensitive": false,
                "matching_query": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.mode, RoutingMode::Next);
        assert!((config.required_score - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.default_matching_mode, MatchingMode::StartsWith);
        assert!(!config.case_sensitive);
        assert!(config.matching_query);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(serde_json::from_str::<RouterConfig>(r#"{ "mode": "fastest" }"#).is_err());
    }
}
