use thiserror::Error;

use crate::config::config;
use crate::http::HttpMethod;
use crate::http::HttpVersion;
use crate::http::request::{HttpRequest, RequestHeader};
use crate::http::status::HttpStatus;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidatorError {
    #[error("invalid request")]
    Error,
    #[error("http version not supported")]
    HttpVersionNotSupported,
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("malformed header field")]
    MalformedHeaderField,
    #[error("missing content-length")]
    MissingContentLength,
    #[error("body not allowed for this method")]
    BodyNotAllowed,
    #[error("body required for this method")]
    MandatoryBody,
}

impl ValidatorError {
    pub fn into_http_status(self) -> HttpStatus {
        match self {
            ValidatorError::Error => HttpStatus::BadRequest,
            ValidatorError::HttpVersionNotSupported => HttpStatus::HttpVersionNotSupported,
            ValidatorError::PayloadTooLarge => HttpStatus::PayloadTooLarge,
            ValidatorError::MalformedHeaderField => HttpStatus::BadRequest,
            ValidatorError::MandatoryBody => HttpStatus::BadRequest,
            ValidatorError::BodyNotAllowed => HttpStatus::BadRequest,
            ValidatorError::MissingContentLength => HttpStatus::LengthRequired,
        }
    }
}

pub struct Validator;

impl Validator {
    fn validate_http_version(v: (u8, u8)) -> Result<(), ValidatorError> {
        match HttpVersion::from_pair(v) {
            Some(http_v) if http_v <= config().http_version => Ok(()),
            Some(_) => Err(ValidatorError::HttpVersionNotSupported),
            None => Err(ValidatorError::Error),
        }
    }

    fn validate_http_method(
        content_length: Option<usize>,
        method: &HttpMethod,
    ) -> Result<(), ValidatorError> {
        match method {
            HttpMethod::Get | HttpMethod::Head => match content_length {
                Some(n) if n > 0 => Err(ValidatorError::BodyNotAllowed),
                _ => Ok(()),
            },

            HttpMethod::Post | HttpMethod::Put => match content_length {
                None => Err(ValidatorError::MissingContentLength),
                Some(0) => Err(ValidatorError::MandatoryBody),
                Some(_) => Ok(()),
            },
            _ => Ok(()),
        }
    }

    pub fn validate_request(req: &HttpRequest) -> Result<(), ValidatorError> {
        Self::validate_http_version(req.http_version)?;

        let content_length = req
            .header(RequestHeader::ContentLength)
            .map(|v| v.parse::<usize>())
            .transpose()
            .map_err(|_| ValidatorError::MalformedHeaderField)?;

        Self::validate_http_method(content_length, &req.method)?;

        if content_length.is_some_and(|n| n > config().max_body_size) {
            return Err(ValidatorError::PayloadTooLarge);
        }

        Ok(())
    }
}
