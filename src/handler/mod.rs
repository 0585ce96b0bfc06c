pub mod context;
pub mod middleware;
mod responses;
mod router;

use crate::cookies::CookieError;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use crate::http::status::HttpStatus;

/// Routes the request and finalizes its cookies onto the response.
///
/// An `Err` means the response must not be sent.
pub fn handle_request(req: &HttpRequest) -> Result<HttpResponse, CookieError> {
    middleware::with_cookies(req, router::route)
}

pub fn handle_error(err: HttpStatus) -> HttpResponse {
    responses::any_error(err)
}

/// Replacement for a response whose finalization failed.
pub fn aborted() -> HttpResponse {
    responses::internal_server_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::http::headers::HeaderValue;
    use crate::http::request::RequestHeader;
    use crate::http::response::ResponseHeader;

    fn get(uri: &str, cookie: Option<&str>) -> HttpRequest {
        let mut req = HttpRequest::new();
        req.method = HttpMethod::Get;
        req.uri = uri.to_string();
        req.http_version = (1, 1);
        if let Some(cookie) = cookie {
            req.set_header(RequestHeader::Cookie, cookie);
        }
        req
    }

    fn set_cookie(res: &HttpResponse) -> Vec<&str> {
        res.header(ResponseHeader::SetCookie)
            .map(|v| v.iter().collect())
            .unwrap_or_default()
    }

    #[test]
    fn first_visit_sets_counter() {
        let res = handle_request(&get("/", None)).unwrap();
        let cookies = set_cookie(&res);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("visits=1;"));
    }

    #[test]
    fn counter_increments_from_request_cookie() {
        let res = handle_request(&get("/", Some("visits=41"))).unwrap();
        assert!(set_cookie(&res)[0].starts_with("visits=42;"));
        assert!(String::from_utf8_lossy(&res.body).contains("Visit #42"));
    }

    #[test]
    fn logout_expires_counter() {
        let res = handle_request(&get("/logout", Some("visits=3"))).unwrap();
        let cookies = set_cookie(&res);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("visits=;"));
        assert!(cookies[0].contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn secure_route_over_plain_connection_fails() {
        assert!(handle_request(&get("/secure", None)).is_err());
    }

    #[test]
    fn secure_route_over_tls() {
        let mut req = get("/secure", None);
        req.tls = true;
        let res = handle_request(&req).unwrap();
        assert!(matches!(
            res.header(ResponseHeader::SetCookie),
            Some(HeaderValue::Single(v)) if v.starts_with("token=issued;") && v.contains("Secure")
        ));
    }

    #[test]
    fn unknown_path_has_no_cookies() {
        let res = handle_request(&get("/missing", None)).unwrap();
        assert_eq!(res.status, HttpStatus::NotFound);
        assert!(set_cookie(&res).is_empty());
    }
}
