//! HTTP adapter for [`micro_rest`]: reads the request headers into preferences and
//! conditions, runs routing and content negotiation, and maps the outcome to an
//! [`http::Response`].
//!
//! ```
//! use http::{Request, StatusCode};
//! use micro_rest::negotiation::{Language, Variant};
//! use micro_rest_web::Application;
//!
//! let application = Application::builder()
//!     .route("/greetings/{name}", vec![
//!         Variant::of(mime::TEXT_PLAIN).with_language(Language::ENGLISH),
//!         Variant::of(mime::TEXT_PLAIN).with_language(Language::FRENCH),
//!     ])
//!     .build()
//!     .unwrap();
//!
//! let request = Request::get("/greetings/ada").header("accept-language", "fr").body(()).unwrap();
//! let response = application.handle(&request);
//!
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(response.headers()["content-language"], "fr");
//! ```

mod application;
mod error;
mod request;
mod resource;

pub mod conditions;
pub mod preference_reader;

pub use application::Application;
pub use application::ApplicationBuilder;
pub use error::ApplicationError;
pub use error::PreferenceError;
pub use request::RequestContext;
pub use resource::FnResource;
pub use resource::Resource;
pub use resource::resource_fn;

#[cfg(test)]
pub(crate) use resource::MockResource;
