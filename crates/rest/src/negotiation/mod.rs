//! Content negotiation: choosing the variant of a resource that best fits the
//! preferences of a client.
//!
//! ```
//! use micro_rest::negotiation::{negotiate, Language, Negotiated, PreferenceSet, Variant};
//!
//! let variants = [
//!     Variant::of(mime::TEXT_HTML).with_language(Language::ENGLISH),
//!     Variant::of(mime::TEXT_HTML).with_language(Language::FRENCH),
//! ];
//! let preferences = PreferenceSet::new().with_language(Language::FRENCH, 1.0).with_language(Language::ENGLISH, 0.5);
//!
//! assert_eq!(negotiate(&variants, &preferences, None, None), Negotiated::Found(&variants[1]));
//! ```

mod conneg;
mod language;
mod metadata;
mod preference;
mod variant;

pub use conneg::Negotiated;
pub use conneg::negotiate;
pub use conneg::select_variant;
pub use language::Language;
pub use metadata::CharacterSet;
pub use metadata::Encoding;
pub use preference::Preference;
pub use preference::PreferenceSet;
pub use variant::Variant;

pub use mime::Mime;
