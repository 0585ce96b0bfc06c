use serde::Deserialize;

pub mod headers;
pub mod merge;
pub mod parser;
pub mod request;
pub mod response;
pub mod status;
pub mod validator;

/// All existing HTTP versions
/// Use to validate HTTP version from request in [`validator`]
/// The max supported version is given in the server config (see [`http_version`](crate::config::ServerConfig::http_version))
#[derive(PartialEq, PartialOrd, Debug, Clone, Copy, Deserialize)]
pub enum HttpVersion {
    V0_9,
    V1_0,
    V1_1,
    V2_0,
    V3_0,
}

impl HttpVersion {
    /// Maps a (major, minor) tuple onto a known HTTP version
    pub fn from_pair(v: (u8, u8)) -> Option<HttpVersion> {
        match v {
            (0, 9) => Some(HttpVersion::V0_9),
            (1, 0) => Some(HttpVersion::V1_0),
            (1, 1) => Some(HttpVersion::V1_1),
            (2, 0) => Some(HttpVersion::V2_0),
            (3, 0) => Some(HttpVersion::V3_0),
            _ => None,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Unknown,
}

pub fn http_method_from_str(method: &str) -> HttpMethod {
    match method {
        "GET" => HttpMethod::Get,
        "HEAD" => HttpMethod::Head,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        "TRACE" => HttpMethod::Trace,
        "OPTIONS" => HttpMethod::Options,
        "CONNECT" => HttpMethod::Connect,
        _ => HttpMethod::Unknown,
    }
}
