use crate::cookies::{CookieStore, SecureDetector, TransportPolicy};
use crate::http::request::HttpRequest;

/// Request-scoped state handed to handlers.
pub struct RequestContext<'r, D = TransportPolicy> {
    request: &'r HttpRequest,
    cookies: CookieStore<'r, D>,
}

impl<'r, D: SecureDetector> RequestContext<'r, D> {
    pub fn new(request: &'r HttpRequest, detector: D) -> Self {
        Self {
            request,
            cookies: CookieStore::new(request, detector),
        }
    }

    pub fn request(&self) -> &'r HttpRequest {
        self.request
    }

    pub fn cookies(&self) -> &CookieStore<'r, D> {
        &self.cookies
    }

    pub fn cookies_mut(&mut self) -> &mut CookieStore<'r, D> {
        &mut self.cookies
    }

    pub(crate) fn into_cookies(self) -> CookieStore<'r, D> {
        self.cookies
    }
}
