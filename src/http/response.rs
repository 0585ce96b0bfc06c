use crate::http::headers::{HeaderValue, HttpHeaders};
use crate::http::status::HttpStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseHeader {
    ContentLength,
    ContentType,
    Connection,
    Server,
    Date,
    SetCookie,
}

impl ResponseHeader {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseHeader::ContentType => "Content-Type",
            ResponseHeader::ContentLength => "Content-Length",
            ResponseHeader::Connection => "Connection",
            ResponseHeader::Server => "Server",
            ResponseHeader::Date => "Date",
            ResponseHeader::SetCookie => "Set-Cookie",
        }
    }
}

#[derive(Debug)]
pub struct HttpResponse {
    pub status: HttpStatus,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new() -> Self {
        Self {
            status: HttpStatus::Ok,
            headers: HttpHeaders::new(),
            body: Vec::new(),
        }
    }

    pub fn set_header(&mut self, h: ResponseHeader, value: &str) {
        self.headers.set_raw(h.as_str(), value);
    }

    /// Adds to a repeatable header such as `Set-Cookie` without dropping
    /// values written earlier.
    pub fn append_header(&mut self, h: ResponseHeader, value: impl Into<HeaderValue>) {
        self.headers.append(h.as_str(), value);
    }

    pub fn header(&self, h: ResponseHeader) -> Option<&HeaderValue> {
        self.headers.get_value(h.as_str())
    }

    /// Replaces the body and keeps `Content-Length` in sync.
    pub fn set_body(&mut self, body: Vec<u8>, content_type: &str) {
        self.set_header(ResponseHeader::ContentLength, &body.len().to_string());
        self.set_header(ResponseHeader::ContentType, content_type);
        self.body = body;
    }

    pub fn build_headers(&self) -> String {
        // HTTP/1.1 <status> <reason>\r\n
        // <header_name>: <header_value>\r\n
        // ...
        // \r\n
        format!(
            "HTTP/1.1 {} {}\r\n{}\r\n",
            self.status.code(),
            self.status.reason(),
            self.headers.stringify(),
        )
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}
