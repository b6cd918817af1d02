use crate::routing::RouteId;
use crate::template::TemplateError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("invalid route template: {0}")]
    InvalidTemplate(#[from] TemplateError),

    #[error("required score {score} is not within [0, 1]")]
    InvalidRequiredScore { score: f64 },

    #[error("no route is attached with id {id}")]
    UnknownRoute { id: RouteId },
}

impl RouteError {
    pub(crate) fn invalid_required_score(score: f64) -> Self {
        Self::InvalidRequiredScore { score }
    }

    pub(crate) fn unknown_route(id: RouteId) -> Self {
        Self::UnknownRoute { id }
    }
}
