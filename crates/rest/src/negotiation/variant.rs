use crate::negotiation::{CharacterSet, Encoding, Language};
use mime::Mime;
use std::time::SystemTime;

/// Metadata describing one candidate representation of a resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variant {
    media_type: Option<Mime>,
    language: Option<Language>,
    character_set: Option<CharacterSet>,
    encoding: Option<Encoding>,
    modification_date: Option<SystemTime>,
    size: Option<u64>,
}

impl Variant {
    /// A variant without any metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// A variant of the given media type.
    pub fn of(media_type: Mime) -> Self {
        Self::new().with_media_type(media_type)
    }

    #[must_use]
    pub fn with_media_type(mut self, media_type: Mime) -> Self {
        self.media_type = Some(media_type);
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    #[must_use]
    pub fn with_character_set(mut self, character_set: CharacterSet) -> Self {
        self.character_set = Some(character_set);
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    #[must_use]
    pub fn with_modification_date(mut self, modification_date: SystemTime) -> Self {
        self.modification_date = Some(modification_date);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn media_type(&self) -> Option<&Mime> {
        self.media_type.as_ref()
    }

    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref()
    }

    pub fn character_set(&self) -> Option<&CharacterSet> {
        self.character_set.as_ref()
    }

    pub fn encoding(&self) -> Option<&Encoding> {
        self.encoding.as_ref()
    }

    pub fn modification_date(&self) -> Option<SystemTime> {
        self.modification_date
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }
}

impl AsRef<Variant> for Variant {
    fn as_ref(&self) -> &Variant {
        self
    }
}
