/* src/cli/core/src/inspect.rs */

use anyhow::{Context, Result};
use localeroute::{
  Origin, ParamValue, Params, RouteOutcome, RouteRequest, RoutingDecision, RoutingEngine,
};
use url::Url;

use crate::ui;

/// Request shape for `localeroute route`.
pub struct RouteArgs {
  pub url: String,
  pub cookie: Option<String>,
  pub accept_language: Option<String>,
  pub json: bool,
}

/// Parse `https://host/path?query` into a request; scheme and host are optional.
pub fn parse_target(target: &str) -> Result<RouteRequest> {
  let absolute = if target.starts_with('/') {
    format!("http://localhost{target}")
  } else if target.contains("://") {
    target.to_string()
  } else {
    format!("http://{target}")
  };
  let url = Url::parse(&absolute).with_context(|| format!("invalid url {target}"))?;
  let host = url.host_str().with_context(|| format!("missing host in {target}"))?;
  let host = match url.port() {
    Some(port) => format!("{host}:{port}"),
    None => host.to_string(),
  };

  let mut request = RouteRequest::new(host, url.path()).with_scheme(url.scheme());
  if let Some(query) = url.query() {
    request = request.with_query(query);
  }
  Ok(request)
}

pub fn run_route(engine: &RoutingEngine, args: RouteArgs) -> Result<()> {
  let mut request = parse_target(&args.url)?;
  if let Some(cookie) = args.cookie.as_deref() {
    request = request.with_cookie_header(cookie);
  }
  if let Some(accept) = args.accept_language {
    request = request.with_accept_language(accept);
  }

  let outcome = engine.route(&request);
  if args.json {
    let json = serde_json::to_string_pretty(&outcome).context("failed to serialize outcome")?;
    println!("{json}");
    return Ok(());
  }
  print_outcome(&request, &outcome);
  Ok(())
}

fn print_outcome(request: &RouteRequest, outcome: &RouteOutcome) {
  ui::arrow(&format!("{}{}", request.effective_host(), request.path));
  match &outcome.decision {
    RoutingDecision::Redirect { to, status } => {
      ui::ok(&format!("redirect {status} {}", ui::highlight(to)));
    }
    RoutingDecision::Rewrite { internal_path } => {
      ui::ok(&format!("rewrite {}", ui::highlight(internal_path)));
    }
    RoutingDecision::PassThrough => ui::ok("pass through"),
  }
  if let Some(context) = &outcome.context {
    ui::field("locale", &format!("{} ({})", context.locale(), context.source().as_str()));
    if let Some(template) = &context.route().internal_template {
      ui::field("template", template);
    }
    if let Some(domain) = context.domain() {
      ui::field("domain", domain);
    }
  }
  if let Some(cookie) = &outcome.cookie {
    ui::field("cookie", &cookie.to_header_value());
  }
  for link in &outcome.alternate_links {
    ui::field("alternate", &format!("{:<10}{}", link.hreflang, link.href));
  }
}

/// `name=value` for a single segment, `name=a/b/c` for a catch-all.
pub fn parse_param(raw: &str) -> Result<(String, ParamValue), String> {
  let (name, value) =
    raw.split_once('=').ok_or_else(|| format!("expected name=value, got {raw}"))?;
  if name.is_empty() {
    return Err(format!("empty parameter name in {raw}"));
  }
  let value = if value.contains('/') {
    ParamValue::Many(value.split('/').filter(|s| !s.is_empty()).map(str::to_string).collect())
  } else {
    ParamValue::Single(value.to_string())
  };
  Ok((name.to_string(), value))
}

pub fn run_links(
  engine: &RoutingEngine,
  internal: &str,
  params: Vec<(String, ParamValue)>,
  host: &str,
  scheme: &str,
) -> Result<()> {
  let params: Params = params.into_iter().collect();
  let origin = Origin { scheme, host };
  let links = engine.alternate_links(internal, &params, origin)?;
  if links.is_empty() {
    ui::fail(&format!("no alternates for {internal}"));
    return Ok(());
  }
  ui::arrow(&format!("alternates for {}", ui::highlight(internal)));
  for link in &links {
    ui::field(&link.hreflang, &link.href);
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn target_with_scheme_host_and_query() {
    let req = parse_target("https://example.com/de/about?x=1").unwrap();
    assert_eq!(req.effective_scheme(), "https");
    assert_eq!(req.effective_host(), "example.com");
    assert_eq!(req.path, "/de/about");
    assert_eq!(req.query.as_deref(), Some("x=1"));
  }

  #[test]
  fn bare_path_defaults_to_localhost() {
    let req = parse_target("/about").unwrap();
    assert_eq!(req.effective_host(), "localhost");
    assert_eq!(req.path, "/about");

    let req = parse_target("example.com").unwrap();
    assert_eq!(req.effective_host(), "example.com");
    assert_eq!(req.path, "/");
  }

  #[test]
  fn target_keeps_port_and_encoded_path() {
    let req = parse_target("localhost:3000/de/über-uns").unwrap();
    assert_eq!(req.effective_host(), "localhost:3000");
    assert_eq!(req.effective_scheme(), "http");
    assert_eq!(req.path, "/de/%C3%BCber-uns");
  }

  #[test]
  fn target_without_host_is_rejected() {
    assert!(parse_target("https://").is_err());
    assert!(parse_target("http://exa mple.com/").is_err());
  }

  #[test]
  fn params_accept_catch_all_values() {
    assert_eq!(
      parse_param("slug=hello").unwrap(),
      ("slug".into(), ParamValue::Single("hello".into()))
    );
    assert_eq!(
      parse_param("rest=a/b").unwrap(),
      ("rest".into(), ParamValue::Many(vec!["a".into(), "b".into()]))
    );
    assert!(parse_param("novalue").is_err());
    assert!(parse_param("=x").is_err());
  }
}
