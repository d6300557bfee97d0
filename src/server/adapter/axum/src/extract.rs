/* src/server/adapter/axum/src/extract.rs */

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use localeroute::{AlternateLink, LocaleContext, Origin, Params, RoutingEngine};

use crate::error::AxumError;
use crate::middleware::RequestOrigin;

/// Resolved locale for the current request.
///
/// ```ignore
/// async fn page(Locale(ctx): Locale) -> String {
///   format!("hello in {}", ctx.locale())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Locale(pub LocaleContext);

impl<S> FromRequestParts<S> for Locale
where
  S: Send + Sync,
{
  type Rejection = AxumError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parts.extensions.get::<LocaleContext>().cloned().map(Self).ok_or(AxumError::MissingContext)
  }
}

/// Locale context plus the engine, for building localized hrefs in handlers.
#[derive(Debug, Clone)]
pub struct Localizer {
  engine: Arc<RoutingEngine>,
  context: LocaleContext,
  origin: RequestOrigin,
}

impl Localizer {
  pub fn context(&self) -> &LocaleContext {
    &self.context
  }

  pub fn locale(&self) -> &str {
    self.context.locale()
  }

  /// Href for `internal` in `locale`; absolute when another domain serves it.
  pub fn path_for(
    &self,
    internal: &str,
    params: &Params,
    locale: &str,
  ) -> Result<String, AxumError> {
    Ok(self.engine.localized_path(internal, params, locale, self.origin())?)
  }

  /// Href for the current page in another locale.
  pub fn switch_to(&self, locale: &str) -> Result<String, AxumError> {
    let route = self.context.route();
    self.path_for(route.link_template(), &route.params, locale)
  }

  /// `hreflang` alternates of the current page.
  pub fn alternates(&self) -> Result<Vec<AlternateLink>, AxumError> {
    let route = self.context.route();
    Ok(self.engine.alternate_links(route.link_template(), &route.params, self.origin())?)
  }

  fn origin(&self) -> Origin<'_> {
    Origin { scheme: &self.origin.scheme, host: &self.origin.host }
  }
}

impl<S> FromRequestParts<S> for Localizer
where
  S: Send + Sync,
{
  type Rejection = AxumError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    let ext = &parts.extensions;
    let engine = ext.get::<Arc<RoutingEngine>>();
    match (engine, ext.get::<LocaleContext>(), ext.get::<RequestOrigin>()) {
      (Some(engine), Some(context), Some(origin)) => Ok(Self {
        engine: Arc::clone(engine),
        context: context.clone(),
        origin: origin.clone(),
      }),
      _ => Err(AxumError::MissingContext),
    }
  }
}
