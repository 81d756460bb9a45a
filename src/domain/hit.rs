//! Hit decomposition from the referring page.

use thiserror::Error;
use url::Url;

/// Errors produced while decomposing an inbound hit.
#[derive(Debug, Error)]
pub enum HitError {
    /// The callback name or the referring-page URL is empty.
    ///
    /// A precondition violation: the request is rejected before any store
    /// access happens.
    #[error("missing jsonpCallback or referrer")]
    MissingCallback,

    /// The referring-page URL could not be parsed as an absolute URL with a host.
    #[error("invalid referrer URL: {0}")]
    InvalidReferrer(String),
}

/// One inbound beacon request, decomposed into its metric coordinates.
///
/// A hit is ephemeral: it is created per request, drives one aggregation
/// round, and is never persisted.
///
/// - `site` is the referrer's hostname with scheme and port stripped
/// - `path` is the referrer's path, identifying the page within the site
/// - `visitor` is the client identity (IP address) used for unique-visitor
///   set membership
/// - `callback` is the caller-supplied JSONP callback name
#[derive(Debug, Clone)]
pub struct Hit {
    pub site: String,
    pub path: String,
    pub visitor: String,
    pub callback: String,
}

impl Hit {
    /// Decomposes a request into a [`Hit`].
    ///
    /// # Errors
    ///
    /// Returns [`HitError::MissingCallback`] if `callback` or `referrer` is
    /// empty, and [`HitError::InvalidReferrer`] if the referrer is not an
    /// absolute URL with a hostname. No side effects in either case.
    pub fn from_request(referrer: &str, callback: &str, visitor: String) -> Result<Self, HitError> {
        if callback.is_empty() || referrer.is_empty() {
            return Err(HitError::MissingCallback);
        }

        let url = Url::parse(referrer).map_err(|e| HitError::InvalidReferrer(e.to_string()))?;

        let site = url
            .host_str()
            .ok_or_else(|| HitError::InvalidReferrer(format!("no host in '{referrer}'")))?
            .to_string();

        Ok(Self {
            site,
            path: url.path().to_string(),
            visitor,
            callback: callback.to_string(),
        })
    }
}
