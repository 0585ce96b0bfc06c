use crate::config::ServerConfig;
use crate::http::request::{HttpRequest, RequestHeader};

/// Decides whether the connection carrying a request counts as encrypted.
pub trait SecureDetector {
    fn is_secure(&self, req: &HttpRequest) -> bool;
}

impl<F> SecureDetector for F
where
    F: Fn(&HttpRequest) -> bool,
{
    fn is_secure(&self, req: &HttpRequest) -> bool {
        self(req)
    }
}

/// Default trust policy: the request arrived over TLS, or a trusted proxy
/// reports that the client used https.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportPolicy {
    pub trust_proxy: bool,
}

impl TransportPolicy {
    pub fn from_config(cfg: &ServerConfig) -> Self {
        Self {
            trust_proxy: cfg.trust_proxy,
        }
    }
}

impl SecureDetector for TransportPolicy {
    fn is_secure(&self, req: &HttpRequest) -> bool {
        if req.tls {
            return true;
        }
        if !self.trust_proxy {
            return false;
        }

        // The leftmost value is the protocol the client used to reach the first proxy.
        req.header(RequestHeader::ForwardedProto)
            .and_then(|v| v.split(',').next())
            .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"))
    }
}
