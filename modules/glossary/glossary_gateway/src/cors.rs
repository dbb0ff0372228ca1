use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsConfig;

/// One CORS allow-list as configured: `["*"]` or explicit entries.
#[derive(Debug, PartialEq)]
enum Allowed<T> {
    Everything,
    Only(Vec<T>),
}

impl<T> Allowed<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    fn parse(what: &str, entries: &[String]) -> anyhow::Result<Self> {
        if entries.iter().any(|e| e == "*") {
            return Ok(Self::Everything);
        }
        entries
            .iter()
            .map(|e| {
                e.parse::<T>()
                    .with_context(|| format!("invalid CORS {what} {e:?}"))
            })
            .collect::<anyhow::Result<Vec<T>>>()
            .map(Self::Only)
    }
}

/// Build a CORS layer from config.
///
/// An empty list leaves that part of the layer unset.
///
/// # Errors
/// Fails on an entry that is not a valid origin, method or header name, and
/// on `allowed_origins = ["*"]` together with `allow_credentials = true`,
/// which browsers refuse.
pub fn build_cors_layer(cfg: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let origins = Allowed::<HeaderValue>::parse("origin", &cfg.allowed_origins)?;
    let methods = Allowed::<Method>::parse("method", &cfg.allowed_methods)?;
    let headers = Allowed::<HeaderName>::parse("header", &cfg.allowed_headers)?;

    if origins == Allowed::Everything && cfg.allow_credentials {
        anyhow::bail!(
            "CORS misconfiguration: allowed_origins=['*'] cannot be combined with allow_credentials=true"
        );
    }

    let mut layer = CorsLayer::new();
    layer = match origins {
        Allowed::Everything => layer.allow_origin(Any),
        Allowed::Only(list) if list.is_empty() => layer,
        Allowed::Only(list) => layer.allow_origin(list),
    };
    layer = match methods {
        Allowed::Everything => layer.allow_methods(Any),
        Allowed::Only(list) if list.is_empty() => layer,
        Allowed::Only(list) => layer.allow_methods(list),
    };
    layer = match headers {
        Allowed::Everything => layer.allow_headers(Any),
        Allowed::Only(list) if list.is_empty() => layer,
        Allowed::Only(list) => layer.allow_headers(list),
    };

    if cfg.allow_credentials {
        layer = layer.allow_credentials(true);
    }
    if cfg.max_age_seconds > 0 {
        layer = layer.max_age(Duration::from_secs(cfg.max_age_seconds));
    }

    Ok(layer)
}
