/* src/server/core/rust/src/errors.rs */

use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration problems, detected once when the engine is built.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("locales must not be empty")]
  EmptyLocales,

  #[error("locale \"{0}\" is listed more than once")]
  DuplicateLocale(String),

  #[error("locale identifier must not be empty")]
  EmptyLocale,

  #[error("default locale \"{default}\" is not in locales {locales:?}")]
  UnknownDefaultLocale { default: String, locales: Vec<String> },

  #[error("domain host must not be empty")]
  EmptyDomainHost,

  #[error("domain \"{0}\" is configured more than once")]
  DuplicateDomain(String),

  #[error("domain \"{host}\" lists locale \"{locale}\" which is not in locales")]
  UnknownDomainLocale { host: String, locale: String },

  #[error("domain \"{host}\" default locale \"{default}\" is not in its locale subset")]
  DomainDefaultNotSupported { host: String, default: String },

  #[error("locale prefix configured for unknown locale \"{0}\"")]
  UnknownPrefixLocale(String),

  #[error("locale prefix \"{prefix}\" for \"{locale}\" must start with '/' and name a segment")]
  InvalidPrefix { locale: String, prefix: String },

  #[error("locale prefix \"{0}\" is shared by more than one locale")]
  DuplicatePrefix(String),

  #[error("base path \"{0}\" must start with '/' and must not end with '/'")]
  InvalidBasePath(String),

  #[error("invalid pathname template \"{template}\": {source}")]
  InvalidTemplate {
    template: String,
    #[source]
    source: TemplateError,
  },

  #[error("internal template \"{0}\" is declared more than once")]
  DuplicateTemplate(String),

  #[error("pathname \"{internal}\" maps unknown locale \"{locale}\"")]
  UnknownPathnameLocale { internal: String, locale: String },

  #[error(
    "template \"{external}\" for locale \"{locale}\" must use the parameters of \"{internal}\""
  )]
  ParameterMismatch { internal: String, external: String, locale: String },

  #[error("failed to parse routing config: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Reasons a single pathname template is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
  #[error("must start with '/'")]
  MissingLeadingSlash,

  #[error("empty segment")]
  EmptySegment,

  #[error("malformed parameter segment \"{0}\"")]
  MalformedParameter(String),

  #[error("parameter \"{0}\" appears more than once")]
  DuplicateParameter(String),

  #[error("catch-all \"{0}\" must be the final segment")]
  CatchAllNotLast(String),
}

/// A dynamic segment had no value when turning an internal path into an external one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing parameter \"{param}\" for pathname template \"{template}\"")]
pub struct MissingParameterError {
  pub template: String,
  pub param: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn config_error_messages_name_the_value() {
    let err = ConfigError::UnknownDefaultLocale {
      default: "fr".into(),
      locales: vec!["en".into(), "de".into()],
    };
    assert_eq!(err.to_string(), r#"default locale "fr" is not in locales ["en", "de"]"#);

    let err =
      ConfigError::DomainDefaultNotSupported { host: "us.x.com".into(), default: "fr".into() };
    assert!(err.to_string().contains("us.x.com"));
  }

  #[test]
  fn template_error_is_source() {
    use std::error::Error as _;
    let err = ConfigError::InvalidTemplate {
      template: "/a/[...rest]/b".into(),
      source: TemplateError::CatchAllNotLast("rest".into()),
    };
    assert_eq!(err.source().map(ToString::to_string).as_deref(), Some(
      "catch-all \"rest\" must be the final segment"
    ));
  }

  #[test]
  fn missing_parameter_display() {
    let err = MissingParameterError { template: "/news/[slug]".into(), param: "slug".into() };
    assert_eq!(err.to_string(), r#"missing parameter "slug" for pathname template "/news/[slug]""#);
  }
}
