//! Incremental HTTP/1.x request parser.
//!
//! Bytes are fed as they arrive from the socket. The parser consumes the
//! request line, then header lines one at a time, then a `Content-Length`
//! delimited body. Only the headers known to [`RequestHeader`] are kept.

use thiserror::Error;

use crate::config::config;
use crate::http::request::*;
use crate::http::status::HttpStatus;
use crate::http::*;

const HTTP_METHOD_MAX_LEN: usize = 7;

#[derive(PartialEq, Debug)]
pub enum ParserOk {
    Incomplete,
    HeadersDone,
    Done,
}

// To keep parser logic separate from HTTP status codes,
// direct http error codes are not used here but mapped later.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParserError {
    #[error("malformed request")]
    Malformed,

    #[error("request head exceeds the configured limit")]
    HeadTooLarge,

    #[error("payload too large")]
    PayloadTooLarge,

    #[error("request uri too long")]
    UriTooLong,

    #[error("http version not supported")]
    HttpVersionNotSupported,
}

impl ParserError {
    pub fn into_http_status(self) -> HttpStatus {
        match self {
            ParserError::Malformed => HttpStatus::BadRequest,
            ParserError::HeadTooLarge => HttpStatus::BadRequest,
            ParserError::PayloadTooLarge => HttpStatus::PayloadTooLarge,
            ParserError::UriTooLong => HttpStatus::UriTooLong,
            ParserError::HttpVersionNotSupported => HttpStatus::HttpVersionNotSupported,
        }
    }
}

#[derive(PartialEq, PartialOrd, Debug)]
enum ParserState {
    RequestLine,
    Headers,
    Body,
    Done,
}

pub struct Parser {
    buf: Vec<u8>,
    head_len: usize,
    content_length: usize,
    state: ParserState,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(config().buffer_size),
            head_len: 0,
            content_length: 0,
            state: ParserState::RequestLine,
        }
    }

    /// Removes and returns the next CRLF-terminated line, without the CRLF.
    fn take_line(&mut self) -> Option<Vec<u8>> {
        let end = self.buf.windows(2).position(|w| w == b"\r\n")?;
        let mut line: Vec<u8> = self.buf.drain(..end + 2).collect();
        line.truncate(end);
        self.head_len += end + 2;
        Some(line)
    }

    fn parse_request_line(&mut self, line: &[u8], req: &mut HttpRequest) -> Result<(), ParserError> {
        // Request line: METHOD PATH HTTP/VERSION
        let parts: Vec<&[u8]> = line.split(|&b| b == b' ').collect();
        if parts.len() != 3 || parts[0].len() > HTTP_METHOD_MAX_LEN {
            return Err(ParserError::Malformed);
        }

        let method = std::str::from_utf8(parts[0]).map_err(|_| ParserError::Malformed)?;
        let method = match http_method_from_str(&method.to_uppercase()) {
            HttpMethod::Unknown => return Err(ParserError::Malformed),
            m => m,
        };

        let path = std::str::from_utf8(parts[1]).map_err(|_| ParserError::Malformed)?;
        if path.is_empty() {
            return Err(ParserError::Malformed);
        }
        if path.len() > config().max_path_size {
            return Err(ParserError::UriTooLong);
        }

        let version = std::str::from_utf8(parts[2]).map_err(|_| ParserError::Malformed)?;
        let (maj, min) = version
            .strip_prefix("HTTP/")
            .and_then(|v| v.split_once('.'))
            .and_then(|(maj, min)| Some((maj.parse::<u8>().ok()?, min.parse::<u8>().ok()?)))
            .ok_or(ParserError::Malformed)?;

        if !(maj == 1 && (min == 0 || min == 1)) {
            return Err(ParserError::HttpVersionNotSupported);
        }

        req.method = method;
        req.uri = path.to_string();
        req.http_version = (maj, min);
        Ok(())
    }

    fn parse_header_line(&mut self, line: &[u8], req: &mut HttpRequest) -> Result<(), ParserError> {
        let mut it = line.splitn(2, |&b| b == b':');
        let name = it.next().unwrap_or_default();
        let value = it.next().ok_or(ParserError::Malformed)?;

        let name = std::str::from_utf8(name).map_err(|_| ParserError::Malformed)?;
        let value = std::str::from_utf8(value).map_err(|_| ParserError::Malformed)?.trim();
        if name.is_empty() || name.trim() != name {
            return Err(ParserError::Malformed);
        }

        match name.to_lowercase().as_str() {
            "host" => req.set_header(RequestHeader::Host, value),
            "content-length" => {
                let content_len = value.parse::<usize>().map_err(|_| ParserError::Malformed)?;
                if content_len > config().max_body_size {
                    return Err(ParserError::PayloadTooLarge);
                }
                self.content_length = content_len;
                req.set_header(RequestHeader::ContentLength, value);
            }
            "content-type" => req.set_header(RequestHeader::ContentType, value),
            "cookie" => req.add_cookie_header(value),
            "x-forwarded-proto" => req.set_header(RequestHeader::ForwardedProto, value),
            _ => {}
        }
        Ok(())
    }

    fn parse_body(&mut self, req: &mut HttpRequest) -> ParserOk {
        let to_copy = std::cmp::min(self.buf.len(), self.content_length - req.body.len());
        req.body.extend(self.buf.drain(..to_copy));

        if req.body.len() == self.content_length {
            self.state = ParserState::Done;
            return ParserOk::Done;
        }

        ParserOk::Incomplete
    }

    /// Feeds newly read bytes to the parser. An empty slice lets the parser
    /// make progress on data it has already buffered.
    pub fn feed(&mut self, buf: &[u8], req: &mut HttpRequest) -> Result<ParserOk, ParserError> {
        self.buf.extend_from_slice(buf);

        // Iteratively parse request based on current state while data is available
        loop {
            if self.state < ParserState::Body
                && self.head_len + self.buf.len() > config().max_path_size + config().max_header_size
                && !self.buf.windows(2).any(|w| w == b"\r\n")
            {
                return Err(ParserError::HeadTooLarge);
            }

            match self.state {
                ParserState::RequestLine => {
                    let Some(line) = self.take_line() else {
                        return Ok(ParserOk::Incomplete);
                    };
                    self.parse_request_line(&line, req)?;
                    self.state = ParserState::Headers;
                }
                ParserState::Headers => {
                    let Some(line) = self.take_line() else {
                        return Ok(ParserOk::Incomplete);
                    };
                    if self.head_len > config().max_path_size + config().max_header_size {
                        return Err(ParserError::HeadTooLarge);
                    }
                    if !line.is_empty() {
                        self.parse_header_line(&line, req)?;
                        continue;
                    }

                    if req.header(RequestHeader::Host).is_none() {
                        return Err(ParserError::Malformed);
                    }

                    self.state = if self.content_length > 0 {
                        ParserState::Body
                    } else {
                        ParserState::Done
                    };
                    return Ok(ParserOk::HeadersDone);
                }
                ParserState::Body => return Ok(self.parse_body(req)),
                ParserState::Done => return Ok(ParserOk::Done),
            }
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
