//! Template variables and the character classes they accept.

use serde::Deserialize;

/// The set of characters a template variable may match.
///
/// The URI classes follow the RFC 3986 grammar and accept percent-encoded triplets
/// (`%2F`) as a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    /// Any character.
    All,
    Alpha,
    Digit,
    AlphaDigit,
    /// Letters, digits and `_`.
    Word,
    /// Reserved and unreserved URI characters.
    UriAll,
    UriUnreserved,
    /// A single path segment (`pchar`), stops at `/`.
    #[default]
    UriSegment,
    /// Path segments and their `/` separators.
    UriPath,
    UriQuery,
    /// A query parameter name or value, stops at `&` and `=`.
    UriQueryParam,
    UriFragment,
    /// An HTTP token, stops at separators.
    Token,
}

impl VariableKind {
    /// Byte length of the character (or percent-encoded triplet) starting `rest`, if accepted.
    pub(crate) fn unit_len(self, rest: &str) -> Option<usize> {
        let first = rest.chars().next()?;

        if first == '%' && self.accepts_pct_encoded() {
            let bytes = rest.as_bytes();
            return (bytes.len() >= 3 && bytes[1].is_ascii_hexdigit() && bytes[2].is_ascii_hexdigit()).then_some(3);
        }

        self.accepts(first).then(|| first.len_utf8())
    }

    fn accepts_pct_encoded(self) -> bool {
        matches!(
            self,
            Self::UriAll | Self::UriSegment | Self::UriPath | Self::UriQuery | Self::UriQueryParam | Self::UriFragment
        )
    }

    fn accepts(self, c: char) -> bool {
        match self {
            Self::All => true,
            Self::Alpha => c.is_ascii_alphabetic(),
            Self::Digit => c.is_ascii_digit(),
            Self::AlphaDigit => c.is_ascii_alphanumeric(),
            Self::Word => c.is_ascii_alphanumeric() || c == '_',
            Self::UriAll => is_unreserved(c) || is_gen_delim(c) || is_sub_delim(c),
            Self::UriUnreserved => is_unreserved(c),
            Self::UriSegment => is_pchar(c),
            Self::UriPath => is_pchar(c) || c == '/',
            Self::UriQuery | Self::UriFragment => is_pchar(c) || c == '/' || c == '?',
            Self::UriQueryParam => {
                is_unreserved(c) || matches!(c, '!' | '$' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | ':' | '@' | '/' | '?')
            }
            Self::Token => !c.is_ascii_control() && !is_http_separator(c),
        }
    }
}

pub(crate) fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

fn is_gen_delim(c: char) -> bool {
    matches!(c, ':' | '/' | '?' | '#' | '[' | ']' | '@')
}

fn is_sub_delim(c: char) -> bool {
    matches!(c, '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '=')
}

fn is_pchar(c: char) -> bool {
    is_unreserved(c) || is_sub_delim(c) || c == ':' || c == '@'
}

fn is_http_separator(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | '<' | '>' | '@' | ',' | ';' | ':' | '\\' | '"' | '/' | '[' | ']' | '?' | '=' | '{' | '}' | ' ' | '\t'
    )
}

/// Describes how a named template variable is matched and formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    kind: VariableKind,
    required: bool,
    default_value: String,
    decode_on_parse: bool,
    encode_on_format: bool,
}

impl Default for Variable {
    fn default() -> Self {
        Self::new(VariableKind::default())
    }
}

impl Variable {
    /// A required variable of the given kind.
    pub fn new(kind: VariableKind) -> Self {
        Self { kind, required: true, default_value: String::new(), decode_on_parse: false, encode_on_format: false }
    }

    /// Allows the variable to match an empty string.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Value used by formatting when no value is supplied.
    #[must_use]
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = default_value.into();
        self
    }

    /// Percent-decodes matched values.
    #[must_use]
    pub fn decoding_on_parse(mut self) -> Self {
        self.decode_on_parse = true;
        self
    }

    /// Percent-encodes formatted values.
    #[must_use]
    pub fn encoding_on_format(mut self) -> Self {
        self.encode_on_format = true;
        self
    }

    #[inline]
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    #[inline]
    pub fn is_decoding_on_parse(&self) -> bool {
        self.decode_on_parse
    }

    #[inline]
    pub fn is_encoding_on_format(&self) -> bool {
        self.encode_on_format
    }

    /// End offsets, in increasing order, of every extent this variable can match from `start`.
    pub(crate) fn extents(&self, input: &str, start: usize) -> Vec<usize> {
        let mut ends = if self.required { Vec::new() } else { vec![start] };
        let mut cursor = start;
        while let Some(len) = self.kind.unit_len(&input[cursor..]) {
            cursor += len;
            ends.push(cursor);
        }
        ends
    }
}
