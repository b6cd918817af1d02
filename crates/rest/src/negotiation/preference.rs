use crate::negotiation::{CharacterSet, Encoding, Language};
use mime::Mime;
use tracing::warn;

/// A client-stated weight for a metadata value or range.
#[derive(Debug, Clone, PartialEq)]
pub struct Preference<M> {
    metadata: M,
    quality: f32,
}

impl<M> Preference<M> {
    /// A preference of the given quality, clamped into `[0, 1]`. `NaN` counts as 0.
    pub fn new(metadata: M, quality: f32) -> Self {
        let clamped = if quality.is_nan() { 0.0 } else { quality.clamp(0.0, 1.0) };
        if clamped.to_bits() != quality.to_bits() {
            warn!(quality, clamped, "preference quality out of range");
        }
        Self { metadata, quality: clamped }
    }

    #[inline]
    pub fn metadata(&self) -> &M {
        &self.metadata
    }

    #[inline]
    pub fn quality(&self) -> f32 {
        self.quality
    }
}

impl<M> From<M> for Preference<M> {
    fn from(metadata: M) -> Self {
        Self { metadata, quality: 1.0 }
    }
}

/// The preferences of a client on every negotiated axis.
///
/// An empty list accepts anything on its axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceSet {
    media_types: Vec<Preference<Mime>>,
    languages: Vec<Preference<Language>>,
    character_sets: Vec<Preference<CharacterSet>>,
    encodings: Vec<Preference<Encoding>>,
}

impl PreferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_media_type(mut self, media_type: Mime, quality: f32) -> Self {
        self.media_types.push(Preference::new(media_type, quality));
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: Language, quality: f32) -> Self {
        self.languages.push(Preference::new(language, quality));
        self
    }

    #[must_use]
    pub fn with_character_set(mut self, character_set: CharacterSet, quality: f32) -> Self {
        self.character_sets.push(Preference::new(character_set, quality));
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding, quality: f32) -> Self {
        self.encodings.push(Preference::new(encoding, quality));
        self
    }

    pub fn set_media_types(&mut self, media_types: Vec<Preference<Mime>>) {
        self.media_types = media_types;
    }

    pub fn set_languages(&mut self, languages: Vec<Preference<Language>>) {
        self.languages = languages;
    }

    pub fn set_character_sets(&mut self, character_sets: Vec<Preference<CharacterSet>>) {
        self.character_sets = character_sets;
    }

    pub fn set_encodings(&mut self, encodings: Vec<Preference<Encoding>>) {
        self.encodings = encodings;
    }

    pub fn media_types(&self) -> &[Preference<Mime>] {
        &self.media_types
    }

    pub fn languages(&self) -> &[Preference<Language>] {
        &self.languages
    }

    pub fn character_sets(&self) -> &[Preference<CharacterSet>] {
        &self.character_sets
    }

    pub fn encodings(&self) -> &[Preference<Encoding>] {
        &self.encodings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_is_clamped() {
        assert!((Preference::new(Language::FRENCH, 1.5).quality() - 1.0).abs() < f32::EPSILON);
        assert!(Preference::new(Language::FRENCH, -0.2).quality().abs() < f32::EPSILON);
        assert!(Preference::new(Language::FRENCH, f32::NAN).quality().abs() < f32::EPSILON);
        assert!((Preference::new(Language::FRENCH, 0.3).quality() - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn default_quality_is_one() {
        let preference = Preference::from(mime::TEXT_HTML);
        assert_eq!(preference.metadata(), &mime::TEXT_HTML);
        assert!((preference.quality() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn builder_keeps_order() {
        let preferences = PreferenceSet::new()
            .with_media_type(mime::TEXT_HTML, 1.0)
            .with_media_type(mime::STAR_STAR, 0.1)
            .with_language(Language::FRENCH, 1.0)
            .with_encoding(Encoding::GZIP, 0.5);

        let media_types: Vec<_> = preferences.media_types().iter().map(|p| p.metadata().essence_str().to_owned()).collect();
        assert_eq!(media_types, vec!["text/html", "*/*"]);
        assert_eq!(preferences.languages().len(), 1);
        assert!(preferences.character_sets().is_empty());
        assert_eq!(preferences.encodings()[0].metadata(), &Encoding::GZIP);
    }
}
