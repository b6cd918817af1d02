use http::header::{ACCEPT, ACCEPT_LANGUAGE, IF_MODIFIED_SINCE};
use http::Request;
use micro_rest::negotiation::{Language, Variant};
use micro_rest::routing::{RouterConfig, RoutingMode};
use micro_rest_web::{Application, RequestContext, resource_fn};
use std::time::{Duration, UNIX_EPOCH};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

fn invoice(context: &RequestContext) -> Vec<Variant> {
    let id: u64 = context.param("id").and_then(|id| id.parse().ok()).unwrap_or_default();
    let modified = UNIX_EPOCH + Duration::from_secs(1_700_000_000 + id);

    vec![
        Variant::of(mime::TEXT_HTML).with_language(Language::ENGLISH).with_modification_date(modified),
        Variant::of(mime::TEXT_HTML).with_language(Language::FRENCH).with_modification_date(modified),
        Variant::of(mime::APPLICATION_JSON).with_modification_date(modified),
    ]
}

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let application = Application::builder()
        .base("http://127.0.0.1:8080/shop")
        .fallback_language(Language::ENGLISH)
        .config(RouterConfig { mode: RoutingMode::Best, ..RouterConfig::default() })
        .route("/invoices/{id}", resource_fn(invoice))
        .build()
        .expect("application should be valid");

    let requests = [
        Request::get("/shop/invoices/1").header(ACCEPT, "application/json").body(()),
        Request::get("/shop/invoices/2").header(ACCEPT_LANGUAGE, "fr-CH, fr;q=0.9").body(()),
        Request::get("/shop/invoices/3").header(ACCEPT_LANGUAGE, "ja").header(ACCEPT, "text/html").body(()),
        Request::get("/shop/invoices/4").header(ACCEPT, "image/png").body(()),
        Request::get("/shop/invoices/5").header(IF_MODIFIED_SINCE, "Tue, 14 Nov 2023 22:13:25 GMT").body(()),
        Request::get("/shop/orders/1").body(()),
    ];

    for request in requests {
        let request = request.expect("request should be valid");
        let response = application.handle(&request);
        info!(uri = %request.uri(), status = %response.status(), headers = ?response.headers(), "response");
    }
}
