/* src/server/adapter/axum/src/lib.rs */

mod error;
mod extract;
mod middleware;

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use localeroute::RoutingEngine;

pub use error::AxumError;
pub use extract::{Locale, Localizer};
pub use middleware::{LOCALE_HEADER, locale_routing};

/// Re-export the routing core for convenience
pub use localeroute;

/// Extension trait that puts locale routing in front of an Axum router.
pub trait IntoLocaleRouter {
  fn with_locale_routing(self, engine: impl Into<Arc<RoutingEngine>>) -> Router;
}

impl IntoLocaleRouter for Router {
  fn with_locale_routing(self, engine: impl Into<Arc<RoutingEngine>>) -> Router {
    // `Router::layer` runs after route matching; nesting as a fallback lets rewrites pick the route
    Router::new().fallback_service(self).layer(from_fn_with_state(engine.into(), locale_routing))
  }
}

#[cfg(test)]
mod tests {
  use axum::body::Body;
  use axum::http::{Request, StatusCode, header};
  use axum::routing::get;
  use localeroute::{ExternalPathname, LocalePrefixMode, RoutingConfig};
  use tower::ServiceExt;

  use super::*;

  fn engine() -> RoutingEngine {
    let mut config = RoutingConfig::new(vec!["en".into(), "de".into()], "en");
    config.locale_prefix.mode = LocalePrefixMode::AsNeeded;
    config.matcher.exclude = vec!["/api".into()];
    config.pathnames.push(
      "/about",
      ExternalPathname::PerLocale(
        [("en".to_string(), "/about".to_string()), ("de".to_string(), "/ueber-uns".to_string())]
          .into_iter()
          .collect(),
      ),
    );
    RoutingEngine::new(config).unwrap()
  }

  fn app() -> Router {
    Router::new()
      .route("/", get(|Locale(ctx): Locale| async move { format!("home:{}", ctx.locale()) }))
      .route("/about", get(|Locale(ctx): Locale| async move { format!("about:{}", ctx.locale()) }))
      .route(
        "/switch",
        get(|l: Localizer| async move {
          let en = l.path_for("/about", &localeroute::Params::new(), "en").unwrap();
          let de = l.path_for("/about", &localeroute::Params::new(), "de").unwrap();
          format!("{en} {de}")
        }),
      )
      .route("/api/health", get(|| async { "ok" }))
      .with_locale_routing(engine())
  }

  fn get_request(uri: &str) -> axum::http::request::Builder {
    Request::builder().uri(uri).header(header::HOST, "example.com")
  }

  async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  #[tokio::test]
  async fn redirects_to_negotiated_locale() {
    let request = get_request("/about?ref=1")
      .header(header::ACCEPT_LANGUAGE, "de-DE, en;q=0.5")
      .body(Body::empty())
      .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/de/ueber-uns?ref=1");
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("locale=de; Path=/"), "{cookie}");
  }

  #[tokio::test]
  async fn rewrites_localized_path_to_internal_route() {
    let request = get_request("/de/ueber-uns").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let link = response.headers()[header::LINK].to_str().unwrap().to_string();
    let en = r#"<http://example.com/about>; rel="alternate"; hreflang="en""#;
    assert!(link.contains(en), "{link}");
    assert!(link.contains(r#"hreflang="x-default""#), "{link}");
    assert_eq!(body_text(response).await, "about:de");
  }

  #[tokio::test]
  async fn default_locale_is_served_unprefixed() {
    let request = get_request("/").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::SET_COOKIE));
    assert_eq!(body_text(response).await, "home:en");
  }

  #[tokio::test]
  async fn unicode_pathname_redirect_resolves_when_followed() {
    let mut config = RoutingConfig::new(vec!["en".into(), "de".into()], "en");
    config.locale_prefix.mode = LocalePrefixMode::AsNeeded;
    config.pathnames.push(
      "/about",
      ExternalPathname::PerLocale(
        [("en".to_string(), "/about".to_string()), ("de".to_string(), "/über-uns".to_string())]
          .into_iter()
          .collect(),
      ),
    );
    let app = Router::new()
      .route("/about", get(|Locale(ctx): Locale| async move { format!("about:{}", ctx.locale()) }))
      .with_locale_routing(RoutingEngine::new(config).unwrap());

    let request = get_request("/de/about").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert_eq!(location, "/de/%C3%BCber-uns");

    let request = get_request(&location).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "about:de");
  }

  #[tokio::test]
  async fn excluded_paths_pass_through_untouched() {
    let request = get_request("/api/health").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key(header::SET_COOKIE));
    assert!(!response.headers().contains_key(header::LINK));
    assert_eq!(body_text(response).await, "ok");
  }

  #[tokio::test]
  async fn localizer_builds_switcher_links() {
    let request = get_request("/de/switch").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(body_text(response).await, "/about /de/ueber-uns");
  }

  #[tokio::test]
  async fn extractor_without_middleware_is_rejected() {
    let router: Router =
      Router::new().route("/", get(|Locale(ctx): Locale| async move { ctx.locale().to_string() }));
    let request = get_request("/").body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["code"], "MISSING_LOCALE_CONTEXT");
  }
}
