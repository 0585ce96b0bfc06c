use cookie::SameSite;
use time::{Duration, OffsetDateTime};

/// Attributes attached to an outgoing cookie.
///
/// The store never interprets these except for `secure`; they are handed to
/// [`codec::serialize`](crate::cookies::codec::serialize) as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CookieOptions {
    pub expires: Option<OffsetDateTime>,
    pub max_age: Option<Duration>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<SameSite>,
}

impl CookieOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that make a client drop the cookie immediately.
    pub fn expired() -> Self {
        Self::new().expires(OffsetDateTime::UNIX_EPOCH)
    }

    pub fn expires(mut self, expires: OffsetDateTime) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Only send the cookie over encrypted connections.
    ///
    /// This is `false` by default.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Hide the cookie from client-side scripts.
    ///
    /// This is `false` by default.
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }
}
