//! The request processing chain: resolution of the request URI against the
//! application base, dispatch to a resource, then negotiation of its variants.

use crate::conditions::{format_http_date, if_modified_since};
use crate::preference_reader::read_preferences;
use crate::{ApplicationError, RequestContext, Resource};
use http::header::{CONTENT_ENCODING, CONTENT_LANGUAGE, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, VARY};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Response, StatusCode};
use micro_rest::negotiation::{Encoding, Language, Negotiated, Variant, negotiate};
use micro_rest::reference::Reference;
use micro_rest::routing::{RouteTable, RouterConfig};
use std::fmt;
use tracing::{debug, warn};

type BoxedResource = Box<dyn Resource>;

const DEFAULT_BASE: &str = "http://localhost/";

/// Routes requests to resources and answers with the negotiated variant.
///
/// The response body is the selected [`Variant`]; producing its bytes is left to the
/// caller. The status tells what happened:
///
/// - `404 Not Found` when no route matches or the resource has no variant,
/// - `406 Not Acceptable` when no variant fits the client preferences,
/// - `304 Not Modified` when the variant did not change since `If-Modified-Since`,
/// - `200 OK` with the representation headers otherwise.
pub struct Application {
    base: Reference,
    fallback_language: Option<Language>,
    routes: RouteTable<BoxedResource>,
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("base", &self.base.as_str())
            .field("fallback_language", &self.fallback_language)
            .field("routes", &self.routes.len())
            .finish()
    }
}

impl Application {
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    #[inline]
    pub fn base(&self) -> &Reference {
        &self.base
    }

    #[inline]
    pub fn routes(&self) -> &RouteTable<BoxedResource> {
        &self.routes
    }

    pub fn handle(&self, request: &Request<()>) -> Response<Option<Variant>> {
        let resolved = self.base.resolve(&request.uri().to_string());
        let reference = Reference::with_base(self.base.clone(), resolved.as_str());

        if reference.base_remainder().is_none() {
            debug!(method = %request.method(), uri = %request.uri(), base = self.base.as_str(), "request outside the base");
            return status_response(StatusCode::NOT_FOUND);
        }

        let Some(route) = self.routes.dispatch_ref(&reference) else {
            debug!(method = %request.method(), uri = %request.uri(), "no route for request");
            return status_response(StatusCode::NOT_FOUND);
        };

        let headers = request.headers();
        let conditional = *request.method() == Method::GET || *request.method() == Method::HEAD;
        let context = RequestContext::new(request.method().clone(), headers.clone(), reference, route.bindings().clone())
            .with_preferences(read_preferences(headers))
            .with_if_modified_since(if conditional { if_modified_since(headers) } else { None });

        let variants = route.target().variants(&context);
        let negotiated =
            negotiate(&variants, context.preferences(), self.fallback_language.as_ref(), context.if_modified_since());

        let response = match negotiated {
            Negotiated::NotFound => status_response(StatusCode::NOT_FOUND),
            Negotiated::NotAcceptable => status_response(StatusCode::NOT_ACCEPTABLE),
            Negotiated::NotModified(variant) => {
                let mut response = status_response(StatusCode::NOT_MODIFIED);
                insert_validators(response.headers_mut(), variant);
                insert_vary(response.headers_mut(), &variants);
                response
            }
            Negotiated::Found(variant) => {
                let mut response = Response::new(Some(variant.clone()));
                insert_representation_headers(response.headers_mut(), variant);
                insert_vary(response.headers_mut(), &variants);
                response
            }
        };

        debug!(
            method = %request.method(),
            uri = %request.uri(),
            route = %route.id(),
            status = %response.status(),
            "handled request"
        );
        response
    }
}

fn status_response(status: StatusCode) -> Response<Option<Variant>> {
    let mut response = Response::new(None);
    *response.status_mut() = status;
    response
}

fn insert_representation_headers(headers: &mut HeaderMap, variant: &Variant) {
    if let Some(media_type) = variant.media_type() {
        let content_type = match variant.character_set() {
            Some(character_set) if media_type.get_param(mime::CHARSET).is_none() => {
                format!("{media_type}; charset={character_set}")
            }
            _ => media_type.to_string(),
        };
        insert(headers, CONTENT_TYPE, content_type);
    }

    if let Some(language) = variant.language() {
        insert(headers, CONTENT_LANGUAGE, language.to_string());
    }

    if let Some(encoding) = variant.encoding().filter(|encoding| **encoding != Encoding::IDENTITY) {
        insert(headers, CONTENT_ENCODING, encoding.to_string());
    }

    if let Some(size) = variant.size() {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(size));
    }

    insert_validators(headers, variant);
}

fn insert_validators(headers: &mut HeaderMap, variant: &Variant) {
    if let Some(modification_date) = variant.modification_date() {
        insert(headers, LAST_MODIFIED, format_http_date(modification_date));
    }
}

/// Lists the request headers whose axis differs between the variants.
fn insert_vary(headers: &mut HeaderMap, variants: &[Variant]) {
    let mut dimensions = Vec::new();
    if differs(variants, Variant::media_type) {
        dimensions.push("Accept");
    }
    if differs(variants, Variant::language) {
        dimensions.push("Accept-Language");
    }
    if differs(variants, Variant::character_set) {
        dimensions.push("Accept-Charset");
    }
    if differs(variants, Variant::encoding) {
        dimensions.push("Accept-Encoding");
    }

    if !dimensions.is_empty() {
        insert(headers, VARY, dimensions.join(", "));
    }
}

fn differs<T: PartialEq>(variants: &[Variant], field: impl Fn(&Variant) -> Option<&T>) -> bool {
    variants.windows(2).any(|pair| field(&pair[0]) != field(&pair[1]))
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: String) {
    match HeaderValue::try_from(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(error) => warn!(header = %name, %error, "skipped header with an invalid value"),
    }
}

/// Assembles an [`Application`].
pub struct ApplicationBuilder {
    base: String,
    fallback_language: Option<Language>,
    config: RouterConfig,
    routes: Vec<(String, BoxedResource)>,
    default_route: Option<BoxedResource>,
}

impl fmt::Debug for ApplicationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationBuilder")
            .field("base", &self.base)
            .field("fallback_language", &self.fallback_language)
            .field("config", &self.config)
            .field("routes", &self.routes.iter().map(|(pattern, _)| pattern).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ApplicationBuilder {
    fn new() -> Self {
        Self {
            base: DEFAULT_BASE.to_owned(),
            fallback_language: None,
            config: RouterConfig::default(),
            routes: Vec::new(),
            default_route: None,
        }
    }

    /// The absolute reference request URIs are resolved against, `http://localhost/` by
    /// default. Routes match the part of the resolved reference that follows it.
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    /// Language accepted when the client preferences reject every variant language.
    pub fn fallback_language(mut self, language: Language) -> Self {
        self.fallback_language = Some(language);
        self
    }

    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn route<R: Resource + 'static>(mut self, pattern: impl Into<String>, resource: R) -> Self {
        self.routes.push((pattern.into(), Box::new(resource)));
        self
    }

    /// Resource serving the requests no route matches.
    pub fn default_route<R: Resource + 'static>(mut self, resource: R) -> Self {
        self.default_route = Some(Box::new(resource));
        self
    }

    pub fn build(self) -> Result<Application, ApplicationError> {
        let base = Reference::parse(self.base);
        if !base.is_absolute() {
            return Err(ApplicationError::RelativeBase { base: base.to_string() });
        }

        let mut routes = RouteTable::builder().config(self.config);
        for (pattern, resource) in self.routes {
            routes = routes.route(pattern, resource);
        }
        if let Some(resource) = self.default_route {
            routes = routes.default_route(resource);
        }

        Ok(Application { base, fallback_language: self.fallback_language, routes: routes.build()? })
    }
}
