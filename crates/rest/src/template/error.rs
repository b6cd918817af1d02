use thiserror::Error;

/// Errors detected while compiling a URI template. Matching itself never fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unclosed variable starting at {position} in pattern '{pattern}'")]
    UnclosedVariable { pattern: String, position: usize },

    #[error("unexpected '}}' at {position} in pattern '{pattern}'")]
    UnexpectedClosingBrace { pattern: String, position: usize },

    #[error("empty variable at {position} in pattern '{pattern}'")]
    EmptyVariable { pattern: String, position: usize },

    #[error("nested variable at {position} in pattern '{pattern}'")]
    NestedVariable { pattern: String, position: usize },

    #[error("invalid character {character:?} at {position} inside a variable of pattern '{pattern}'")]
    InvalidVariableChar { pattern: String, position: usize, character: char },

    #[error("variables '{first}' and '{second}' are not separated by a literal in pattern '{pattern}'")]
    AdjacentVariables { pattern: String, first: String, second: String },

    #[error("variable '{name}' is declared more than once in pattern '{pattern}'")]
    DuplicateVariable { pattern: String, name: String },
}

impl TemplateError {
    pub(crate) fn unclosed_variable<S: ToString>(pattern: S, position: usize) -> Self {
        Self::UnclosedVariable { pattern: pattern.to_string(), position }
    }

    pub(crate) fn unexpected_closing_brace<S: ToString>(pattern: S, position: usize) -> Self {
        Self::UnexpectedClosingBrace { pattern: pattern.to_string(), position }
    }

    pub(crate) fn empty_variable<S: ToString>(pattern: S, position: usize) -> Self {
        Self::EmptyVariable { pattern: pattern.to_string(), position }
    }

    pub(crate) fn nested_variable<S: ToString>(pattern: S, position: usize) -> Self {
        Self::NestedVariable { pattern: pattern.to_string(), position }
    }

    pub(crate) fn invalid_variable_char<S: ToString>(pattern: S, position: usize, character: char) -> Self {
        Self::InvalidVariableChar { pattern: pattern.to_string(), position, character }
    }

    pub(crate) fn adjacent_variables<S: ToString>(pattern: S, first: S, second: S) -> Self {
        Self::AdjacentVariables { pattern: pattern.to_string(), first: first.to_string(), second: second.to_string() }
    }

    pub(crate) fn duplicate_variable<S: ToString>(pattern: S, name: S) -> Self {
        Self::DuplicateVariable { pattern: pattern.to_string(), name: name.to_string() }
    }
}
