//! Case-insensitive metadata names: character sets and encodings.

/// Declares a metadata type wrapping a case-insensitive name, `*` being the wildcard.
macro_rules! metadata_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(std::borrow::Cow<'static, str>);

        impl $name {
            /// The `*` wildcard, accepting any value.
            pub const ALL: $name = $name::from_static("*");

            pub fn new(name: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                Self(name.into())
            }

            pub const fn from_static(name: &'static str) -> Self {
                Self(std::borrow::Cow::Borrowed(name))
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[inline]
            pub fn is_wildcard(&self) -> bool {
                self.0 == "*"
            }

            /// Whether `self`, taken as a preference, accepts `other`.
            pub fn includes(&self, other: &$name) -> bool {
                self.is_wildcard() || self == other
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.0.eq_ignore_ascii_case(&other.0)
            }
        }

        impl Eq for $name {}

        impl std::hash::Hash for $name {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                for byte in self.0.bytes() {
                    state.write_u8(byte.to_ascii_lowercase());
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::new(s.trim().to_owned()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

pub(crate) use metadata_name;

metadata_name!(
    /// A character set name such as `UTF-8`.
    CharacterSet
);

impl CharacterSet {
    pub const UTF_8: CharacterSet = CharacterSet::from_static("UTF-8");
    pub const UTF_16: CharacterSet = CharacterSet::from_static("UTF-16");
    pub const ISO_8859_1: CharacterSet = CharacterSet::from_static("ISO-8859-1");
    pub const US_ASCII: CharacterSet = CharacterSet::from_static("US-ASCII");
}

metadata_name!(
    /// A content coding such as `gzip`.
    Encoding
);

impl Encoding {
    /// No transformation, always acceptable.
    pub const IDENTITY: Encoding = Encoding::from_static("identity");
    pub const GZIP: Encoding = Encoding::from_static("gzip");
    pub const DEFLATE: Encoding = Encoding::from_static("deflate");
    pub const BROTLI: Encoding = Encoding::from_static("br");
    pub const ZSTD: Encoding = Encoding::from_static("zstd");
    pub const COMPRESS: Encoding = Encoding::from_static("compress");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_ignore_case() {
        assert_eq!(CharacterSet::new("utf-8"), CharacterSet::UTF_8);
        assert_eq!("GZIP".parse::<Encoding>().unwrap(), Encoding::GZIP);

        let set: HashSet<_> = [CharacterSet::UTF_8, CharacterSet::new("Utf-8")].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn wildcard_includes_everything() {
        assert!(Encoding::ALL.includes(&Encoding::GZIP));
        assert!(Encoding::GZIP.includes(&Encoding::new("gzip")));
        assert!(!Encoding::GZIP.includes(&Encoding::BROTLI));
        assert!(!Encoding::GZIP.includes(&Encoding::ALL));
    }

    #[test]
    fn display_keeps_original_case() {
        assert_eq!(CharacterSet::ISO_8859_1.to_string(), "ISO-8859-1");
        assert_eq!(" br ".parse::<Encoding>().unwrap().as_str(), "br");
    }
}
