//! URI templates: patterns made of literals and `{name}` variables.
//!
//! A [`Template`] is compiled once, then used both to match incoming strings
//! (extracting variable bindings) and to format strings back from values.
//!
//! ```
//! use micro_rest::template::Template;
//!
//! let template = Template::compile("/invoices/{id}").unwrap();
//! let result = template.matches("/invoices/42").unwrap();
//! assert_eq!(result.get("id"), Some("42"));
//! assert!(template.matches("/invoices/").is_none());
//! ```

mod error;
mod variable;

pub use error::TemplateError;
pub use variable::Variable;
pub use variable::VariableKind;

use crate::reference::{decode, encode};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::hash::BuildHasher;
use std::mem;
use tracing::{debug, trace};
use variable::is_unreserved;

/// Captured extents and the `(token, position)` pairs known not to match.
struct MatchState {
    captures: Vec<(usize, usize)>,
    failed: HashSet<(usize, usize)>,
}

impl MatchState {
    fn new(variables: usize) -> Self {
        Self { captures: Vec::with_capacity(variables), failed: HashSet::new() }
    }
}

/// How much of the input a template has to consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    /// The whole input.
    #[default]
    Equals,
    /// Any prefix of the input.
    StartsWith,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    /// Index into the declared variables.
    Variable(usize),
}

/// A compiled URI template.
#[derive(Debug, Clone)]
pub struct Template {
    pattern: String,
    tokens: Vec<Token>,
    variables: Vec<(String, Variable)>,
    matching_mode: MatchingMode,
    case_sensitive: bool,
}

/// Configures a [`Template`] before compiling it.
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    pattern: String,
    matching_mode: MatchingMode,
    case_sensitive: bool,
    default_variable: Variable,
    variables: HashMap<String, Variable>,
}

impl TemplateBuilder {
    fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            matching_mode: MatchingMode::default(),
            case_sensitive: true,
            default_variable: Variable::default(),
            variables: HashMap::new(),
        }
    }

    pub fn matching_mode(mut self, matching_mode: MatchingMode) -> Self {
        self.matching_mode = matching_mode;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Describes every variable that has no dedicated description.
    pub fn default_variable(mut self, variable: Variable) -> Self {
        self.default_variable = variable;
        self
    }

    pub fn variable(mut self, name: impl Into<String>, variable: Variable) -> Self {
        self.variables.insert(name.into(), variable);
        self
    }

    pub fn compile(self) -> Result<Template, TemplateError> {
        let pattern = self.pattern;
        let mut tokens = Vec::new();
        let mut variables: Vec<(String, Variable)> = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.char_indices();

        while let Some((position, c)) = chars.next() {
            match c {
                '{' => {
                    let name = read_variable_name(&pattern, position, &mut chars)?;

                    if !literal.is_empty() {
                        tokens.push(Token::Literal(mem::take(&mut literal)));
                    } else if let Some(Token::Variable(previous)) = tokens.last() {
                        return Err(TemplateError::adjacent_variables(
                            pattern.as_str(),
                            variables[*previous].0.as_str(),
                            name.as_str(),
                        ));
                    }

                    if variables.iter().any(|(declared, _)| *declared == name) {
                        return Err(TemplateError::duplicate_variable(pattern.as_str(), name.as_str()));
                    }

                    let variable = self.variables.get(&name).unwrap_or(&self.default_variable).clone();
                    tokens.push(Token::Variable(variables.len()));
                    variables.push((name, variable));
                }
                '}' => return Err(TemplateError::unexpected_closing_brace(pattern.as_str(), position)),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        debug!(pattern = pattern.as_str(), tokens = tokens.len(), variables = variables.len(), "compiled template");

        Ok(Template {
            pattern,
            tokens,
            variables,
            matching_mode: self.matching_mode,
            case_sensitive: self.case_sensitive,
        })
    }
}

/// Reads a variable name up to its closing brace; `start` is the position of the opening one.
fn read_variable_name(
    pattern: &str,
    start: usize,
    chars: &mut impl Iterator<Item = (usize, char)>,
) -> Result<String, TemplateError> {
    let mut name = String::new();

    for (position, c) in chars {
        match c {
            '}' if name.is_empty() => return Err(TemplateError::empty_variable(pattern, start)),
            '}' => return Ok(name),
            '{' => return Err(TemplateError::nested_variable(pattern, position)),
            c if is_unreserved(c) => name.push(c),
            c => return Err(TemplateError::invalid_variable_char(pattern, position, c)),
        }
    }

    Err(TemplateError::unclosed_variable(pattern, start))
}

impl Template {
    pub fn builder(pattern: impl Into<String>) -> TemplateBuilder {
        TemplateBuilder::new(pattern)
    }

    /// Compiles a case-sensitive template in [`MatchingMode::Equals`] mode, every
    /// variable being a required URI segment.
    pub fn compile(pattern: impl Into<String>) -> Result<Self, TemplateError> {
        Self::builder(pattern).compile()
    }

    #[inline]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[inline]
    pub fn matching_mode(&self) -> MatchingMode {
        self.matching_mode
    }

    #[inline]
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Variable names in declaration order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|(name, _)| name.as_str())
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|(declared, _)| declared == name).map(|(_, variable)| variable)
    }

    /// Attempts to match `input`, returning the variable bindings and the length of
    /// the matched prefix.
    pub fn matches(&self, input: &str) -> Option<MatchResult> {
        let mut state = MatchState::new(self.variables.len());
        let matched_len = self.match_from(input, 0, 0, &mut state)?;
        let captures = state.captures;

        let bindings: Vec<(String, String)> = captures
            .into_iter()
            .zip(&self.variables)
            .map(|((start, end), (name, variable))| {
                let value = &input[start..end];
                let value = if variable.is_decoding_on_parse() { decode(value) } else { value.to_owned() };
                (name.clone(), value)
            })
            .collect();

        trace!(pattern = self.pattern.as_str(), input, matched_len, bindings = ?bindings, "template matched");
        Some(MatchResult { bindings, matched_len })
    }

    /// Length of the prefix of `input` matched by this template.
    pub fn match_len(&self, input: &str) -> Option<usize> {
        self.match_from(input, 0, 0, &mut MatchState::new(self.variables.len()))
    }

    /// Aligns the tokens from `index` on with the input from `position` on.
    ///
    /// Non-trailing variables try each of their extents in turn. A token position that
    /// failed once fails again whatever was captured before it, so failures are
    /// remembered and the search stays polynomial in the input length.
    fn match_from(&self, input: &str, index: usize, position: usize, state: &mut MatchState) -> Option<usize> {
        let Some(token) = self.tokens.get(index) else {
            return match self.matching_mode {
                MatchingMode::Equals => (position == input.len()).then_some(position),
                MatchingMode::StartsWith => Some(position),
            };
        };

        match token {
            Token::Literal(literal) => {
                let end = position + literal.len();
                let candidate = input.get(position..end)?;
                let equal =
                    if self.case_sensitive { candidate == literal } else { candidate.eq_ignore_ascii_case(literal) };
                if !equal {
                    return None;
                }
                self.match_from(input, index + 1, end, state)
            }
            Token::Variable(variable_index) => {
                let extents = self.variables[*variable_index].1.extents(input, position);

                if index + 1 == self.tokens.len() {
                    let end = *extents.last()?;
                    if self.matching_mode == MatchingMode::Equals && end != input.len() {
                        return None;
                    }
                    state.captures.push((position, end));
                    return Some(end);
                }

                for end in extents {
                    if state.failed.contains(&(index + 1, end)) {
                        continue;
                    }
                    state.captures.push((position, end));
                    if let Some(matched) = self.match_from(input, index + 1, end, state) {
                        return Some(matched);
                    }
                    state.captures.pop();
                    state.failed.insert((index + 1, end));
                }
                None
            }
        }
    }

    /// Substitutes every variable with its value, or with its default value when absent.
    pub fn format<V: AsRef<str>, S: BuildHasher>(&self, values: &HashMap<String, V, S>) -> String {
        self.format_with(|name| values.get(name).map(|value| value.as_ref().to_owned()))
    }

    /// Like [`Template::format`], asking `resolve` for each variable value.
    pub fn format_with<F>(&self, mut resolve: F) -> String
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut formatted = String::with_capacity(self.pattern.len());

        for token in &self.tokens {
            match token {
                Token::Literal(literal) => formatted.push_str(literal),
                Token::Variable(index) => {
                    let (name, variable) = &self.variables[*index];
                    let value = resolve(name).unwrap_or_else(|| variable.default_value().to_owned());
                    if variable.is_encoding_on_format() {
                        formatted.push_str(&encode(&value));
                    } else {
                        formatted.push_str(&value);
                    }
                }
            }
        }

        formatted
    }
}

/// Bindings extracted by a successful match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchResult {
    bindings: Vec<(String, String)>,
    matched_len: usize,
}

impl MatchResult {
    /// The bindings in variable declaration order.
    pub fn bindings(&self) -> &[(String, String)] {
        &self.bindings
    }

    pub fn into_bindings(self) -> Vec<(String, String)> {
        self.bindings
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.iter().find(|(bound, _)| bound == name).map(|(_, value)| value.as_str())
    }

    #[inline]
    pub fn matched_len(&self) -> usize {
        self.matched_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_only() {
        let template = Template::compile("/users").unwrap();
        assert_eq!(template.matches("/users").unwrap().matched_len(), 6);
        assert!(template.matches("/users/").is_none());
        assert!(template.matches("/Users").is_none());
        assert!(template.matches("/use").is_none());
    }

    #[test]
    fn many_unbounded_variables_fail_fast() {
        let template =
            Template::builder("{a}x{b}x{c}x{d}x{e}y").default_variable(Variable::new(VariableKind::All)).compile().unwrap();

        let input = format!("{}z", "x".repeat(200));
        assert!(template.matches(&input).is_none());

        let result = template.matches("axbxcxdxxey").unwrap();
        assert_eq!(result.get("a"), Some("a"));
        assert_eq!(result.get("d"), Some("d"));
        assert_eq!(result.get("e"), Some("xe"));
    }

    #[test]
    fn invoice_id() {
        let template = Template::compile("/invoices/{id}").unwrap();

        let result = template.matches("/invoices/42").unwrap();
        assert_eq!(result.bindings(), &[("id".to_owned(), "42".to_owned())]);
        assert_eq!(result.matched_len(), 12);

        assert!(template.matches("/invoices/").is_none());
        assert!(template.matches("/invoices/42/lines").is_none());
    }

    #[test]
    fn several_variables_in_declaration_order() {
        let template = Template::compile("/users/{user}/orders/{order}").unwrap();
        let result = template.matches("/users/ada/orders/7").unwrap();

        assert_eq!(template.variable_names().collect::<Vec<_>>(), vec!["user", "order"]);
        assert_eq!(
            result.into_bindings(),
            vec![("user".to_owned(), "ada".to_owned()), ("order".to_owned(), "7".to_owned())]
        );
    }

    #[test]
    fn non_trailing_variable_backtracks() {
        let template = Template::compile("/{name}.{ext}").unwrap();

        let result = template.matches("/archive.tar.gz").unwrap();
        assert_eq!(result.get("name"), Some("archive"));
        assert_eq!(result.get("ext"), Some("tar.gz"));

        let template = Template::builder("/{name}.gz").default_variable(Variable::new(VariableKind::All)).compile().unwrap();
        assert_eq!(template.matches("/archive.tar.gz").unwrap().get("name"), Some("archive.tar"));
    }

    #[test]
    fn starts_with_reports_prefix() {
        let template = Template::builder("/files/{name}").matching_mode(MatchingMode::StartsWith).compile().unwrap();

        let result = template.matches("/files/readme/raw").unwrap();
        assert_eq!(result.get("name"), Some("readme"));
        assert_eq!(result.matched_len(), 13);
        assert_eq!(template.match_len("/files/x"), Some(8));
        assert_eq!(template.match_len("/other"), None);
    }

    #[test]
    fn case_insensitive_literals() {
        let template = Template::builder("/Users/{id}").case_sensitive(false).compile().unwrap();
        assert_eq!(template.matches("/USERS/Ada").unwrap().get("id"), Some("Ada"));
    }

    #[test]
    fn variable_kinds() {
        let template = Template::builder("/items/{id}").variable("id", Variable::new(VariableKind::Digit)).compile().unwrap();
        assert!(template.matches("/items/12").is_some());
        assert!(template.matches("/items/ab").is_none());

        let template = Template::builder("/static/{path}").variable("path", Variable::new(VariableKind::UriPath)).compile().unwrap();
        assert_eq!(template.matches("/static/css/site.css").unwrap().get("path"), Some("css/site.css"));
    }

    #[test]
    fn optional_variable() {
        let template =
            Template::builder("/search{query}").variable("query", Variable::new(VariableKind::UriQuery).optional()).compile().unwrap();
        assert_eq!(template.matches("/search").unwrap().get("query"), Some(""));
        assert_eq!(template.matches("/search?q=rust").unwrap().get("query"), Some("?q=rust"));
    }

    #[test]
    fn decode_on_parse() {
        let template =
            Template::builder("/tags/{tag}").variable("tag", Variable::default().decoding_on_parse()).compile().unwrap();
        assert_eq!(template.matches("/tags/hello%20world").unwrap().get("tag"), Some("hello world"));

        let raw = Template::compile("/tags/{tag}").unwrap();
        assert_eq!(raw.matches("/tags/hello%20world").unwrap().get("tag"), Some("hello%20world"));
    }

    #[test]
    fn non_ascii_input_never_splits_characters() {
        let template = Template::compile("/é/{id}").unwrap();
        assert!(template.matches("/e/1").is_none());
        assert_eq!(template.matches("/é/1").unwrap().get("id"), Some("1"));

        let template = Template::compile("/ab").unwrap();
        assert!(template.matches("/aé").is_none());
    }

    #[test]
    fn format_values() {
        let template = Template::builder("/users/{user}/files/{file}")
            .variable("file", Variable::default().with_default("index").encoding_on_format())
            .compile()
            .unwrap();

        let mut values = HashMap::new();
        values.insert("user".to_owned(), "ada");
        assert_eq!(template.format(&values), "/users/ada/files/index");

        values.insert("file".to_owned(), "my notes");
        assert_eq!(template.format(&values), "/users/ada/files/my%20notes");

        let formatted = template.format_with(|name| Some(name.to_uppercase()));
        assert_eq!(formatted, "/users/USER/files/FILE");
    }

    #[test]
    fn compile_errors() {
        assert_eq!(
            Template::compile("/a/{id").unwrap_err(),
            TemplateError::UnclosedVariable { pattern: "/a/{id".to_owned(), position: 3 }
        );
        assert_eq!(
            Template::compile("/a/}").unwrap_err(),
            TemplateError::UnexpectedClosingBrace { pattern: "/a/}".to_owned(), position: 3 }
        );
        assert_eq!(
            Template::compile("/a/{}").unwrap_err(),
            TemplateError::EmptyVariable { pattern: "/a/{}".to_owned(), position: 3 }
        );
        assert_eq!(
            Template::compile("/{a{b}}").unwrap_err(),
            TemplateError::NestedVariable { pattern: "/{a{b}}".to_owned(), position: 3 }
        );
        assert_eq!(
            Template::compile("/{a b}").unwrap_err(),
            TemplateError::InvalidVariableChar { pattern: "/{a b}".to_owned(), position: 3, character: ' ' }
        );
        assert_eq!(
            Template::compile("/{a}{b}").unwrap_err(),
            TemplateError::AdjacentVariables { pattern: "/{a}{b}".to_owned(), first: "a".to_owned(), second: "b".to_owned() }
        );
        assert_eq!(
            Template::compile("/{a}/{a}").unwrap_err(),
            TemplateError::DuplicateVariable { pattern: "/{a}/{a}".to_owned(), name: "a".to_owned() }
        );
    }

    #[test]
    fn empty_pattern() {
        let equals = Template::compile("").unwrap();
        assert!(equals.matches("").is_some());
        assert!(equals.matches("/a").is_none());

        let prefix = Template::builder("").matching_mode(MatchingMode::StartsWith).compile().unwrap();
        assert_eq!(prefix.match_len("/anything"), Some(0));
    }
}
