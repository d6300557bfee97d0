/* src/server/adapter/axum/src/middleware.rs */

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{ACCEPT_LANGUAGE, COOKIE, HOST, LINK, LOCATION, SET_COOKIE};
use axum::http::uri::{Authority, PathAndQuery};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use localeroute::{RouteRequest, RoutingDecision, RoutingEngine};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Request header carrying the resolved locale to downstream handlers.
pub const LOCALE_HEADER: &str = "x-localeroute-locale";

const FORWARDED_HOST: &str = "x-forwarded-host";
const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Escaped in paths and `Location` targets; non-ASCII is always escaped.
const PATH: &AsciiSet =
  &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`').add(b'{').add(b'}');

/// Scheme and host the request arrived on, stored for extractors.
#[derive(Debug, Clone)]
pub(crate) struct RequestOrigin {
  pub scheme: String,
  pub host: String,
}

/// Run the engine on every request.
///
/// Redirects short-circuit; rewrites replace the URI before the inner router
/// matches and attach `LocaleContext` plus the engine as request extensions.
pub async fn locale_routing(
  State(engine): State<Arc<RoutingEngine>>,
  mut request: Request,
  next: Next,
) -> Response {
  let route_request = to_route_request(&request);
  let outcome = engine.route(&route_request);
  let link = outcome.link_header();
  let set_cookie = outcome.cookie.as_ref().map(localeroute::CookieWrite::to_header_value);

  let mut response = match outcome.decision {
    RoutingDecision::PassThrough => return next.run(request).await,
    RoutingDecision::Redirect { to, status } => redirect(&to, status),
    RoutingDecision::Rewrite { internal_path } => {
      match rewrite_uri(request.uri(), engine.base_path(), &internal_path) {
        Ok(uri) => *request.uri_mut() = uri,
        Err(err) => tracing::warn!(%err, %internal_path, "keeping original uri"),
      }
      if let Some(context) = outcome.context {
        if let Ok(value) = HeaderValue::from_str(context.locale()) {
          request.headers_mut().insert(HeaderName::from_static(LOCALE_HEADER), value);
        }
        request.extensions_mut().insert(context);
      }
      request.extensions_mut().insert(RequestOrigin {
        scheme: route_request.effective_scheme().to_string(),
        host: route_request.effective_host().to_string(),
      });
      request.extensions_mut().insert(engine);
      next.run(request).await
    }
  };

  let headers = response.headers_mut();
  if let Some(value) = set_cookie.and_then(|v| header_value(&v)) {
    headers.append(SET_COOKIE, value);
  }
  if let Some(value) = link.and_then(|v| header_value(&v)) {
    headers.append(LINK, value);
  }
  response
}

fn to_route_request(request: &Request) -> RouteRequest {
  let headers = request.headers();
  let uri = request.uri();
  let host = header_str(headers, HOST.as_str())
    .or_else(|| uri.authority().map(Authority::as_str))
    .unwrap_or_default();

  let scheme = uri.scheme_str().unwrap_or("http");
  let mut route = RouteRequest::new(host, uri.path()).with_scheme(scheme);
  if let Some(query) = uri.query() {
    route = route.with_query(query);
  }
  for value in headers.get_all(COOKIE) {
    if let Ok(raw) = value.to_str() {
      route = route.with_cookie_header(raw);
    }
  }
  if let Some(accept) = header_str(headers, ACCEPT_LANGUAGE.as_str()) {
    route = route.with_accept_language(accept);
  }
  if let Some(forwarded) = header_str(headers, FORWARDED_HOST) {
    route = route.with_forwarded_host(forwarded);
  }
  if let Some(proto) = header_str(headers, FORWARDED_PROTO) {
    route = route.with_forwarded_proto(proto);
  }
  route
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
  headers.get(name).and_then(|v| v.to_str().ok())
}

fn redirect(to: &str, status: u16) -> Response {
  let status = StatusCode::from_u16(status).unwrap_or(StatusCode::TEMPORARY_REDIRECT);
  match HeaderValue::from_str(&utf8_percent_encode(to, PATH).to_string()) {
    Ok(location) => (status, [(LOCATION, location)]).into_response(),
    Err(_) => {
      tracing::error!(to, "redirect target is not a valid header value");
      StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
  }
}

fn rewrite_uri(
  original: &Uri,
  base_path: &str,
  internal_path: &str,
) -> Result<Uri, axum::http::Error> {
  let mut target = utf8_percent_encode(&format!("{base_path}{internal_path}"), PATH).to_string();
  if let Some(query) = original.query() {
    target.push('?');
    target.push_str(query);
  }
  let mut parts = original.clone().into_parts();
  parts.path_and_query = Some(PathAndQuery::try_from(target)?);
  Ok(Uri::from_parts(parts)?)
}

/// Header value with control and non-ASCII bytes escaped; configured pathnames may be Unicode.
fn header_value(raw: &str) -> Option<HeaderValue> {
  HeaderValue::from_str(&utf8_percent_encode(raw, CONTROLS).to_string()).ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn header_values_escape_only_non_ascii() {
    let link = header_value(r#"</de/über>; rel="alternate""#).unwrap();
    assert_eq!(link, r#"</de/%C3%BCber>; rel="alternate""#);
    assert_eq!(header_value("locale=de; Path=/").unwrap(), "locale=de; Path=/");
  }

  #[test]
  fn redirect_location_is_percent_encoded() {
    let response = redirect("/de/über uns?x=%20", 307);
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[LOCATION], "/de/%C3%BCber%20uns?x=%20");
  }

  #[test]
  fn rewrite_escapes_decoded_segments() {
    let uri: Uri = "/de/%C3%BCber-uns".parse().unwrap();
    let rewritten = rewrite_uri(&uri, "", "/über uns/a%2Fb").unwrap();
    assert_eq!(rewritten.path(), "/%C3%BCber%20uns/a%2Fb");
  }

  #[test]
  fn rewrite_keeps_query_and_applies_base() {
    let uri: Uri = "/shop/de/cart?step=2".parse().unwrap();
    let rewritten = rewrite_uri(&uri, "/shop", "/cart").unwrap();
    assert_eq!(rewritten.path(), "/shop/cart");
    assert_eq!(rewritten.query(), Some("step=2"));
  }

  #[test]
  fn route_request_reads_headers() {
    let request = Request::builder()
      .uri("/de/x?y=1")
      .header(HOST, "example.com")
      .header(COOKIE, "a=1; locale=de")
      .header(ACCEPT_LANGUAGE, "fr")
      .header(FORWARDED_PROTO, "https")
      .body(axum::body::Body::empty())
      .unwrap();
    let route = to_route_request(&request);
    assert_eq!(route.effective_host(), "example.com");
    assert_eq!(route.effective_scheme(), "https");
    assert_eq!(route.query.as_deref(), Some("y=1"));
    assert_eq!(route.cookie("locale"), Some("de"));
    assert_eq!(route.accept_language.as_deref(), Some("fr"));
  }
}
