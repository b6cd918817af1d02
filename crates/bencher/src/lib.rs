//! Inputs shared by the benchmarks.

use micro_rest::negotiation::{CharacterSet, Encoding, Language, PreferenceSet, Variant};
use micro_rest::routing::{RouteTable, RouterConfig, RoutingMode};

/// Base of the RFC 3986 resolution examples.
pub const BASE: &str = "http://a/b/c/d;p?q";

/// Relative references taken from the RFC 3986 resolution examples.
pub static RELATIVE_REFERENCES: &[&str] = &[
    "g:h", "g", "./g", "g/", "/g", "//g", "?y", "g?y", "#s", "g#s", "g?y#s", ";x", "g;x", "", ".", "./", "..", "../",
    "../g", "../..", "../../", "../../g", "../../../g", "/./g", "g/./h", "g/../h", "g;x=1/../y", "g?y/../x",
];

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup) -> Self {
        Self { name, group }
    }

    pub fn small(name: &'static str) -> Self {
        Self::new(name, TestGroup::Small)
    }

    pub fn normal(name: &'static str) -> Self {
        Self::new(name, TestGroup::Normal)
    }

    pub fn large(name: &'static str) -> Self {
        Self::new(name, TestGroup::Large)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    /// A table of `size` resource families, each with a collection and an item route.
    ///
    /// # Panics
    ///
    /// Panics if a generated pattern fails to compile.
    pub fn route_table(&self, mode: RoutingMode) -> RouteTable<usize> {
        let config = RouterConfig { mode, ..RouterConfig::default() };
        let mut table = RouteTable::new(config).expect("default required score is valid");
        for index in 0..self.group.size() {
            table.attach(&format!("/resources{index}"), index * 2).expect("pattern should compile");
            table.attach(&format!("/resources{index}/{{id}}/details"), index * 2 + 1).expect("pattern should compile");
        }
        table
    }

    /// The item path of the last resource family, the worst case of a scan.
    pub fn last_item_path(&self) -> String {
        format!("/resources{}/42/details", self.group.size() - 1)
    }

    /// `size` variants spread over languages, media types and encodings.
    pub fn variants(&self) -> Vec<Variant> {
        let languages = [Language::ENGLISH, Language::ENGLISH_US, Language::FRENCH, Language::GERMAN, Language::SPANISH];
        let media_types = [mime::TEXT_HTML, mime::APPLICATION_JSON, mime::TEXT_PLAIN, mime::TEXT_XML];
        let encodings = [Encoding::IDENTITY, Encoding::GZIP, Encoding::BROTLI];

        (0..self.group.size())
            .map(|index| {
                Variant::of(media_types[index % media_types.len()].clone())
                    .with_language(languages[index % languages.len()].clone())
                    .with_encoding(encodings[index % encodings.len()].clone())
                    .with_character_set(CharacterSet::UTF_8)
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}

impl TestGroup {
    pub fn size(self) -> usize {
        match self {
            Self::Small => 4,
            Self::Normal => 32,
            Self::Large => 256,
        }
    }
}

/// Preferences as sent by a typical browser.
///
/// # Panics
///
/// Never in practice, the media types are literals.
pub fn browser_preferences() -> PreferenceSet {
    PreferenceSet::new()
        .with_media_type(mime::TEXT_HTML, 1.0)
        .with_media_type("application/xhtml+xml".parse().expect("valid media type"), 1.0)
        .with_media_type("application/xml".parse().expect("valid media type"), 0.9)
        .with_media_type(mime::STAR_STAR, 0.8)
        .with_language(Language::FRENCH_FRANCE, 1.0)
        .with_language(Language::FRENCH, 0.9)
        .with_language(Language::ENGLISH_US, 0.8)
        .with_language(Language::ENGLISH, 0.7)
        .with_encoding(Encoding::GZIP, 1.0)
        .with_encoding(Encoding::DEFLATE, 1.0)
        .with_encoding(Encoding::BROTLI, 1.0)
}
