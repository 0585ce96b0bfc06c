use crate::http::HttpMethod;
use crate::http::headers::HttpHeaders;

/// Common HTTP request headers
/// This enum defines the set of headers that can be explicitly set on an
/// [`HttpRequest`] through its safe wrapper API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestHeader {
    Host,
    ContentLength,
    ContentType,
    Cookie,
    ForwardedProto,
}

impl RequestHeader {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestHeader::Host => "Host",
            RequestHeader::ContentLength => "Content-Length",
            RequestHeader::ContentType => "Content-Type",
            RequestHeader::Cookie => "Cookie",
            RequestHeader::ForwardedProto => "X-Forwarded-Proto",
        }
    }
}

#[derive(Debug)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub uri: String,
    pub http_version: (u8, u8),

    // headers
    pub headers: HttpHeaders,
    pub body: Vec<u8>,

    /// Whether the connection carrying this request is TLS-encrypted.
    pub tls: bool,
}

impl HttpRequest {
    pub fn new() -> Self {
        Self {
            method: HttpMethod::Unknown,
            uri: String::new(),
            http_version: (0, 0),
            headers: HttpHeaders::new(),
            body: Vec::new(),
            tls: false,
        }
    }

    /// Sets a request header constrained to the allowed [`RequestHeader`] variants.
    ///
    /// This method acts as a safe wrapper around [`HttpHeaders::set_raw`],
    /// ensuring that only headers explicitly supported by [`RequestHeader`]
    /// can be added through this API.
    ///
    /// No validation is performed on the header value itself.
    pub fn set_header(&mut self, h: RequestHeader, value: &str) {
        self.headers.set_raw(h.as_str(), value);
    }

    pub fn header(&self, h: RequestHeader) -> Option<&str> {
        self.headers.get(h.as_str())
    }

    /// Adds a `Cookie` header line. Several lines are folded into one list
    /// separated by `; `, as a single header would carry them.
    pub fn add_cookie_header(&mut self, value: &str) {
        let folded = match self.header(RequestHeader::Cookie) {
            Some(prev) if !prev.is_empty() => format!("{prev}; {value}"),
            _ => value.to_string(),
        };
        self.set_header(RequestHeader::Cookie, &folded);
    }
}

impl Default for HttpRequest {
    fn default() -> Self {
        Self::new()
    }
}
