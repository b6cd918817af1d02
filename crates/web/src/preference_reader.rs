//! Reading client preferences from the `Accept` family of headers.
//!
//! Every element of a header is a range optionally followed by parameters, the `q`
//! parameter giving its quality:
//!
//! ```text
//! Accept: text/html, application/json;q=0.9, */*;q=0.1
//! Accept-Language: fr-CH, fr;q=0.9, en;q=0.8, *;q=0.5
//! ```
//!
//! The `parse_*_range` functions are strict and report malformed elements, while the
//! list readers log and skip them so that one bad element does not discard a header.

use crate::PreferenceError;
use http::header::{ACCEPT, ACCEPT_CHARSET, ACCEPT_ENCODING, ACCEPT_LANGUAGE};
use http::{HeaderMap, HeaderName};
use micro_rest::negotiation::{CharacterSet, Encoding, Language, Preference, PreferenceSet};
use mime::Mime;
use tracing::warn;

/// Reads the preferences stated by `Accept`, `Accept-Language`, `Accept-Charset` and
/// `Accept-Encoding`. A missing header leaves its axis empty, accepting anything.
pub fn read_preferences(headers: &HeaderMap) -> PreferenceSet {
    let mut preferences = PreferenceSet::new();
    preferences.set_media_types(read_header(headers, &ACCEPT, parse_media_range));
    preferences.set_languages(read_header(headers, &ACCEPT_LANGUAGE, parse_language_range));
    preferences.set_character_sets(read_header(headers, &ACCEPT_CHARSET, parse_character_set_range));
    preferences.set_encodings(read_header(headers, &ACCEPT_ENCODING, parse_encoding_range));
    preferences
}

fn read_header<M>(
    headers: &HeaderMap,
    name: &HeaderName,
    parse: fn(&str) -> Result<Preference<M>, PreferenceError>,
) -> Vec<Preference<M>> {
    let mut preferences = Vec::new();
    for value in headers.get_all(name) {
        match value.to_str() {
            Ok(value) => preferences.extend(parse_list(value, parse)),
            Err(error) => warn!(header = %name, %error, "skipped preference header with opaque bytes"),
        }
    }
    preferences
}

pub fn parse_media_ranges(value: &str) -> Vec<Preference<Mime>> {
    parse_list(value, parse_media_range)
}

pub fn parse_languages(value: &str) -> Vec<Preference<Language>> {
    parse_list(value, parse_language_range)
}

pub fn parse_character_sets(value: &str) -> Vec<Preference<CharacterSet>> {
    parse_list(value, parse_character_set_range)
}

pub fn parse_encodings(value: &str) -> Vec<Preference<Encoding>> {
    parse_list(value, parse_encoding_range)
}

fn parse_list<M>(value: &str, parse: fn(&str) -> Result<Preference<M>, PreferenceError>) -> Vec<Preference<M>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match parse(token) {
            Ok(preference) => Some(preference),
            Err(error) => {
                warn!(%error, "skipped malformed preference");
                None
            }
        })
        .collect()
}

/// Parses a media range such as `text/html;level=1;q=0.7`. A lone `*` stands for `*/*`.
pub fn parse_media_range(token: &str) -> Result<Preference<Mime>, PreferenceError> {
    let (range, quality) = split_quality(token)?;
    if range == "*" {
        return Ok(Preference::new(mime::STAR_STAR, quality));
    }
    range
        .parse::<Mime>()
        .ok()
        .map(|media_type| Preference::new(media_type, quality))
        .ok_or_else(|| PreferenceError::invalid_media_range(token))
}

/// Parses a language range such as `en-US;q=0.8`.
pub fn parse_language_range(token: &str) -> Result<Preference<Language>, PreferenceError> {
    let (range, quality) = split_quality(token)?;
    let valid = range == "*"
        || range.split('-').all(|tag| (1..=8).contains(&tag.len()) && tag.bytes().all(|b| b.is_ascii_alphanumeric()));
    if !valid {
        return Err(PreferenceError::invalid_range(token));
    }
    Ok(Preference::new(Language::new(range), quality))
}

/// Parses a character set range such as `utf-8;q=0.7`.
pub fn parse_character_set_range(token: &str) -> Result<Preference<CharacterSet>, PreferenceError> {
    let (range, quality) = split_token_range(token)?;
    Ok(Preference::new(CharacterSet::new(range), quality))
}

/// Parses a content coding range such as `gzip;q=1.0`.
pub fn parse_encoding_range(token: &str) -> Result<Preference<Encoding>, PreferenceError> {
    let (range, quality) = split_token_range(token)?;
    Ok(Preference::new(Encoding::new(range), quality))
}

fn split_token_range(token: &str) -> Result<(String, f32), PreferenceError> {
    let (range, quality) = split_quality(token)?;
    if range.is_empty() || !range.bytes().all(is_token_byte) {
        return Err(PreferenceError::invalid_range(token));
    }
    Ok((range, quality))
}

fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&byte)
}

/// Splits `range;name=value;q=0.5;extension` into the range with its parameters and
/// the quality. Parameters following the quality are extensions and are dropped.
fn split_quality(token: &str) -> Result<(String, f32), PreferenceError> {
    let mut parts = token.split(';').map(str::trim);
    let mut range = parts.next().unwrap_or_default().to_owned();
    let mut quality = 1.0;

    for part in parts {
        let (name, value) = part.split_once('=').unwrap_or((part, ""));
        if name.trim().eq_ignore_ascii_case("q") {
            quality = quality_value(value.trim()).ok_or_else(|| PreferenceError::invalid_quality(token))?;
            break;
        }
        if !part.is_empty() {
            range.push_str("; ");
            range.push_str(part);
        }
    }

    Ok((range, quality))
}

/// Parses a quality value: `0` to `1` with at most three decimals.
pub fn parse_quality(value: &str) -> Result<f32, PreferenceError> {
    quality_value(value).ok_or_else(|| PreferenceError::invalid_quality(value))
}

fn quality_value(value: &str) -> Option<f32> {
    let valid = match value.as_bytes() {
        [b'0' | b'1'] => true,
        [b'0', b'.', decimals @ ..] => decimals.len() <= 3 && decimals.iter().all(u8::is_ascii_digit),
        [b'1', b'.', decimals @ ..] => decimals.len() <= 3 && decimals.iter().all(|b| *b == b'0'),
        _ => false,
    };
    if !valid {
        return None;
    }
    value.trim_end_matches('.').parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn qualities<M: ToString>(preferences: &[Preference<M>]) -> Vec<(String, f32)> {
        preferences.iter().map(|p| (p.metadata().to_string(), p.quality())).collect()
    }

    #[test]
    fn quality_values() {
        assert_eq!(parse_quality("0"), Ok(0.0));
        assert_eq!(parse_quality("1"), Ok(1.0));
        assert_eq!(parse_quality("0.5"), Ok(0.5));
        assert_eq!(parse_quality("0.125"), Ok(0.125));
        assert_eq!(parse_quality("1.000"), Ok(1.0));
        assert_eq!(parse_quality("0."), Ok(0.0));
        assert!(parse_quality("0.1234").is_err());
        assert!(parse_quality("1.5").is_err());
        assert!(parse_quality("2").is_err());
        assert!(parse_quality("-0.5").is_err());
        assert!(parse_quality("").is_err());
        assert_eq!(parse_quality("x"), Err(PreferenceError::InvalidQuality { token: "x".to_owned() }));
    }

    #[test]
    fn media_ranges() {
        let ranges = parse_media_ranges("text/html, application/json;q=0.9, */*;q=0.1");
        assert_eq!(
            qualities(&ranges),
            vec![("text/html".to_owned(), 1.0), ("application/json".to_owned(), 0.9), ("*/*".to_owned(), 0.1)]
        );
    }

    #[test]
    fn media_range_parameters() {
        let preference = parse_media_range("text/html; level=1; q=0.7; ext=x").unwrap();
        assert_eq!(preference.metadata().get_param("level").map(|value| value.as_str()), Some("1"));
        assert_eq!(preference.metadata().get_param("ext"), None);
        assert!((preference.quality() - 0.7).abs() < f32::EPSILON);

        assert_eq!(parse_media_range("*").unwrap().metadata(), &mime::STAR_STAR);
    }

    #[test]
    fn malformed_elements_are_skipped() {
        let ranges = parse_media_ranges("text/html;q=2, nonsense, , application/json");
        assert_eq!(qualities(&ranges), vec![("application/json".to_owned(), 1.0)]);

        assert_eq!(
            parse_media_range("nonsense"),
            Err(PreferenceError::InvalidMediaRange { token: "nonsense".to_owned() })
        );
        assert_eq!(
            parse_media_range("text/html;q=high"),
            Err(PreferenceError::InvalidQuality { token: "text/html;q=high".to_owned() })
        );
    }

    #[test]
    fn languages() {
        let languages = parse_languages("fr-CH, fr;q=0.9, en;q=0.8, *;q=0.5, not a tag");
        assert_eq!(
            qualities(&languages),
            vec![("fr-CH".to_owned(), 1.0), ("fr".to_owned(), 0.9), ("en".to_owned(), 0.8), ("*".to_owned(), 0.5)]
        );
        assert!(parse_language_range("toolongsubtag-x").is_err());
    }

    #[test]
    fn character_sets_and_encodings() {
        assert_eq!(
            qualities(&parse_character_sets("utf-8, iso-8859-1;q=0.5")),
            vec![("utf-8".to_owned(), 1.0), ("iso-8859-1".to_owned(), 0.5)]
        );
        assert_eq!(
            qualities(&parse_encodings("gzip, br;q=1.0, identity;q=0, *;q=0.1")),
            vec![("gzip".to_owned(), 1.0), ("br".to_owned(), 1.0), ("identity".to_owned(), 0.0), ("*".to_owned(), 0.1)]
        );
        assert!(parse_encoding_range("gz ip").is_err());
        assert!(parse_encoding_range(";q=1").is_err());
    }

    #[test]
    fn read_all_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.append(ACCEPT, HeaderValue::from_static("text/html;q=0.5"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("de"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        let preferences = read_preferences(&headers);
        assert_eq!(preferences.media_types().len(), 2);
        assert_eq!(preferences.languages()[0].metadata(), &Language::GERMAN);
        assert!(preferences.character_sets().is_empty());
        assert_eq!(preferences.encodings()[0].metadata(), &Encoding::GZIP);
    }

    #[test]
    fn opaque_header_is_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_bytes(b"text/\xffhtml").unwrap());
        assert!(read_preferences(&headers).media_types().is_empty());
    }
}
