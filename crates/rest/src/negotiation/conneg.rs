//! Selection of the preferred variant.

use crate::negotiation::{Encoding, Language, Preference, PreferenceSet, Variant};
use mime::Mime;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace};

/// Quality credited to a variant whose language is only accepted as the fallback language.
const FALLBACK_LANGUAGE_QUALITY: f32 = 0.1;

/// Outcome of a negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Negotiated<V> {
    /// The preferred variant, to be sent.
    Found(V),
    /// There was no variant to choose from.
    NotFound,
    /// No variant is compatible with the client preferences.
    NotAcceptable,
    /// The preferred variant was not modified since the date given by the client.
    NotModified(V),
}

impl<V> Negotiated<V> {
    /// The selected variant, whether it has to be sent or not.
    pub fn variant(&self) -> Option<&V> {
        match self {
            Self::Found(variant) | Self::NotModified(variant) => Some(variant),
            Self::NotFound | Self::NotAcceptable => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Negotiates the variant to send among `variants`.
///
/// Empty `variants` gives [`Negotiated::NotFound`], no compatible variant gives
/// [`Negotiated::NotAcceptable`]. When `if_modified_since` is given and the preferred
/// variant has a modification date that is not strictly after it, at the second
/// precision of HTTP dates, the outcome is [`Negotiated::NotModified`].
pub fn negotiate<'a, V: AsRef<Variant>>(
    variants: &'a [V],
    preferences: &PreferenceSet,
    fallback_language: Option<&Language>,
    if_modified_since: Option<SystemTime>,
) -> Negotiated<&'a V> {
    if variants.is_empty() {
        debug!("no variant to negotiate");
        return Negotiated::NotFound;
    }

    let Some(selected) = select_variant(variants, preferences, fallback_language) else {
        debug!(variants = variants.len(), "no acceptable variant");
        return Negotiated::NotAcceptable;
    };

    let modified = match (selected.as_ref().modification_date(), if_modified_since) {
        (Some(modification_date), Some(since)) => unix_seconds(modification_date) > unix_seconds(since),
        _ => true,
    };

    if modified {
        debug!(variant = ?selected.as_ref(), "negotiated variant");
        Negotiated::Found(selected)
    } else {
        debug!(variant = ?selected.as_ref(), "negotiated variant not modified");
        Negotiated::NotModified(selected)
    }
}

/// Selects the preferred variant, or `None` when none is compatible with `preferences`.
///
/// For each variant the best scoring language range and the best scoring media range
/// are looked up, the variant quality being ten times the quality of the former plus
/// the quality of the latter. The first variant of the highest quality wins.
pub fn select_variant<'a, V: AsRef<Variant>>(
    variants: &'a [V],
    preferences: &PreferenceSet,
    fallback_language: Option<&Language>,
) -> Option<&'a V> {
    let all_languages = [Preference::from(Language::ALL)];
    let all_media_types = [Preference::from(mime::STAR_STAR)];
    let languages = or_all(preferences.languages(), &all_languages);
    let media_types = or_all(preferences.media_types(), &all_media_types);

    let mut best: Option<(&V, f32)> = None;

    for candidate in variants {
        let variant = candidate.as_ref();

        let Some(quality) = variant_quality(variant, languages, media_types, preferences, fallback_language) else {
            trace!(variant = ?variant, "incompatible variant");
            continue;
        };
        trace!(variant = ?variant, quality, "compatible variant");

        if best.is_none_or(|(_, best_quality)| quality > best_quality) {
            best = Some((candidate, quality));
        }
    }

    best.map(|(variant, _)| variant)
}

fn or_all<'a, M>(preferences: &'a [Preference<M>], all: &'a [Preference<M>]) -> &'a [Preference<M>] {
    if preferences.is_empty() { all } else { preferences }
}

fn variant_quality(
    variant: &Variant,
    languages: &[Preference<Language>],
    media_types: &[Preference<Mime>],
    preferences: &PreferenceSet,
    fallback_language: Option<&Language>,
) -> Option<f32> {
    let language_quality = match variant.language() {
        None => 0.0,
        Some(language) => match best_preference(languages, |range| language.score(range)) {
            Some(preference) => preference.quality() * 10.0,
            None if fallback_language == Some(language) => FALLBACK_LANGUAGE_QUALITY * 10.0,
            None => return None,
        },
    };

    let media_quality = match variant.media_type() {
        None => 0.0,
        Some(media_type) => best_preference(media_types, |range| media_score(media_type, range))?.quality(),
    };

    if !accepts_character_set(variant, preferences) || !accepts_encoding(variant, preferences) {
        return None;
    }

    Some(language_quality + media_quality)
}

/// The first preference reaching the highest compatibility score.
fn best_preference<M, F>(preferences: &[Preference<M>], score: F) -> Option<&Preference<M>>
where
    F: Fn(&M) -> Option<f64>,
{
    let mut best: Option<(&Preference<M>, f64)> = None;
    for preference in preferences {
        if let Some(current) = score(preference.metadata())
            && best.is_none_or(|(_, best_score)| current > best_score)
        {
            best = Some((preference, current));
        }
    }
    best.map(|(preference, _)| preference)
}

/// Compatibility score of a variant media type with a media range, if compatible.
///
/// An equal type counts 1000, an equal subtype 100, and every parameter of the variant
/// repeated by the range adds 1. A `*` type is only valid in the `*/*` range.
fn media_score(media_type: &Mime, range: &Mime) -> Option<f64> {
    let mut score = 0.0;

    if range.type_() == media_type.type_() {
        score += 1000.0;
    } else if range.type_() != mime::STAR || range.subtype() != mime::STAR {
        return None;
    }

    if range.subtype() == media_type.subtype() {
        score += 100.0;
    } else if range.subtype() != mime::STAR {
        return None;
    }

    for (name, value) in media_type.params() {
        if range.get_param(name).is_some_and(|expected| expected.as_str() == value.as_str()) {
            score += 1.0;
        }
    }

    Some(score)
}

fn accepts_character_set(variant: &Variant, preferences: &PreferenceSet) -> bool {
    let accepted = preferences.character_sets();
    variant
        .character_set()
        .is_none_or(|character_set| accepted.is_empty() || accepted.iter().any(|p| p.metadata().includes(character_set)))
}

fn accepts_encoding(variant: &Variant, preferences: &PreferenceSet) -> bool {
    let accepted = preferences.encodings();
    variant.encoding().filter(|encoding| **encoding != Encoding::IDENTITY).is_none_or(|encoding| {
        accepted.is_empty() || accepted.iter().any(|p| p.metadata().includes(encoding))
    })
}

fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_secs())
}
