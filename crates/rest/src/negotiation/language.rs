use super::metadata::metadata_name;

metadata_name!(
    /// A language tag such as `en-US`: a primary tag followed by sub-tags.
    Language
);

impl Language {
    pub const ENGLISH: Language = Language::from_static("en");
    pub const ENGLISH_US: Language = Language::from_static("en-US");
    pub const ENGLISH_GB: Language = Language::from_static("en-GB");
    pub const FRENCH: Language = Language::from_static("fr");
    pub const FRENCH_FRANCE: Language = Language::from_static("fr-FR");
    pub const GERMAN: Language = Language::from_static("de");
    pub const SPANISH: Language = Language::from_static("es");
    pub const ITALIAN: Language = Language::from_static("it");

    pub fn primary_tag(&self) -> &str {
        self.as_str().split('-').next().unwrap_or_default()
    }

    pub fn sub_tags(&self) -> impl Iterator<Item = &str> {
        self.as_str().split('-').skip(1)
    }

    pub fn has_sub_tags(&self) -> bool {
        self.as_str().contains('-')
    }

    /// Compatibility score of this variant language with a preferred language range, if compatible.
    ///
    /// An equal primary tag counts 100 and the `*` range counts 1. Sub-tags are then
    /// compared position by position, the i-th equal one adding `10^(1-i)`; any
    /// difference makes the languages incompatible. When neither side has sub-tags 10
    /// is added.
    pub(crate) fn score(&self, range: &Language) -> Option<f64> {
        let mut score = if self.primary_tag().eq_ignore_ascii_case(range.primary_tag()) {
            100.0
        } else if range.primary_tag() == "*" && !range.has_sub_tags() {
            1.0
        } else {
            return None;
        };

        if !range.has_sub_tags() || !self.has_sub_tags() {
            if !range.has_sub_tags() && !self.has_sub_tags() {
                score += 10.0;
            }
            return Some(score);
        }

        for (index, (left, right)) in (0i32..).zip(self.sub_tags().zip(range.sub_tags())) {
            if !left.eq_ignore_ascii_case(right) {
                return None;
            }
            score += 10f64.powi(1 - index);
        }
        Some(score)
    }
}
