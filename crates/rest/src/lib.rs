//! Building blocks of REST request processing.
//!
//! - [`reference`]: parsing, resolving and relativizing URI references.
//! - [`template`]: URI templates matching inputs and extracting variables.
//! - [`routing`]: route tables scoring inputs and selecting a target.
//! - [`negotiation`]: selecting the variant of a resource preferred by a client.
//!
//! Everything here is synchronous and free of I/O. The only state shared between
//! calls is the round robin cursor of [`routing::RoutingMode::Next`].

pub mod negotiation;
pub mod reference;
pub mod routing;
pub mod template;

pub use negotiation::Negotiated;
pub use negotiation::PreferenceSet;
pub use negotiation::Variant;
pub use negotiation::negotiate;
pub use reference::Reference;
pub use reference::relativize;
pub use reference::resolve;
pub use routing::RouteTable;
pub use routing::RouterConfig;
pub use routing::RoutingMode;
pub use template::Template;
