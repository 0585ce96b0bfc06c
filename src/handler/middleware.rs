//! Attaches a cookie store to every request.
//!
//! The store is flushed onto the response after the handler returns and
//! before the caller serializes any header, which makes this the single
//! place queued cookies can reach the wire.

use crate::config::config;
use crate::cookies::{CookieError, SecureDetector, TransportPolicy};
use crate::handler::context::RequestContext;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;

/// Runs `next` with a fresh [`RequestContext`] using the configured trust
/// policy, then flushes the context's cookies into the response.
pub fn with_cookies<F>(req: &HttpRequest, next: F) -> Result<HttpResponse, CookieError>
where
    F: FnOnce(&mut RequestContext<'_>) -> HttpResponse,
{
    with_cookies_using(req, TransportPolicy::from_config(config()), next)
}

/// Same as [`with_cookies`] with an explicit secure-connection detector.
pub fn with_cookies_using<D, F>(
    req: &HttpRequest,
    detector: D,
    next: F,
) -> Result<HttpResponse, CookieError>
where
    D: SecureDetector,
    F: FnOnce(&mut RequestContext<'_, D>) -> HttpResponse,
{
    let mut ctx = RequestContext::new(req, detector);
    let mut res = next(&mut ctx);
    ctx.into_cookies().flush(&mut res)?;
    Ok(res)
}
