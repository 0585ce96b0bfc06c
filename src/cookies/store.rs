use indexmap::IndexMap;

use crate::cookies::codec;
use crate::cookies::{CookieError, CookieOptions, SecureDetector, TransportPolicy};
use crate::http::headers::HeaderValue;
use crate::http::request::{HttpRequest, RequestHeader};
use crate::http::response::{HttpResponse, ResponseHeader};

/// A cookie mutation queued until the response headers are built.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub name: String,
    pub value: String,
    pub options: CookieOptions,
}

/// Per-request cookie store.
///
/// Reads go straight to the request's `Cookie` header. Writes are queued per
/// name, in the order names were first written, and only reach the response
/// when [`flush`](CookieStore::flush) consumes the store.
#[derive(Debug)]
pub struct CookieStore<'r, D = TransportPolicy> {
    request: &'r HttpRequest,
    detector: D,
    pending: IndexMap<String, Vec<PendingWrite>>,
}

impl<'r, D: SecureDetector> CookieStore<'r, D> {
    pub fn new(request: &'r HttpRequest, detector: D) -> Self {
        Self {
            request,
            detector,
            pending: IndexMap::new(),
        }
    }

    /// Value of cookie `name` as sent by the client.
    ///
    /// Cookies queued during this request are not visible here.
    pub fn get(&self, name: &str) -> Option<String> {
        let header = self.request.header(RequestHeader::Cookie)?;
        codec::parse(header).swap_remove(name)
    }

    /// Queues a cookie. With `overwrite`, every write queued so far for `name`
    /// is discarded; otherwise the write is added after them.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        options: CookieOptions,
        overwrite: bool,
    ) {
        let name = name.into();
        let write = PendingWrite {
            name: name.clone(),
            value: value.into(),
            options,
        };

        match self.pending.get_mut(&name) {
            Some(writes) if overwrite => {
                writes.clear();
                writes.push(write);
            }
            Some(writes) => writes.push(write),
            None => {
                self.pending.insert(name, vec![write]);
            }
        }
    }

    /// Shorthand for [`set`](Self::set) with default options, appending.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.set(name, value, CookieOptions::default(), false);
    }

    /// Replaces every queued write for `name` with one that expires the
    /// cookie on the client.
    pub fn unset(&mut self, name: impl Into<String>) {
        self.set(name, "", CookieOptions::expired(), true);
    }

    /// Queued writes in the order they will be emitted.
    pub fn pending(&self) -> impl Iterator<Item = &PendingWrite> {
        self.pending.values().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Serializes every queued write onto the response's `Set-Cookie` field.
    ///
    /// All writes are checked and serialized before the response is touched,
    /// so on error the response carries none of them.
    pub fn flush(self, res: &mut HttpResponse) -> Result<(), CookieError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let mut secure = None;
        let mut serialized = Vec::new();

        for write in self.pending.values().flatten() {
            if write.options.secure
                && !*secure.get_or_insert_with(|| self.detector.is_secure(self.request))
            {
                tracing::warn!(
                    cookie = %write.name,
                    uri = %self.request.uri,
                    "refusing to send secure cookie over unencrypted connection"
                );
                return Err(CookieError::SecureCookieViolation {
                    name: write.name.clone(),
                });
            }
            serialized.push(codec::serialize(&write.name, &write.value, &write.options)?);
        }

        tracing::debug!(count = serialized.len(), "flushing cookies");

        let value = match serialized.len() {
            1 => HeaderValue::Single(serialized.remove(0)),
            _ => HeaderValue::Multi(serialized),
        };
        res.append_header(ResponseHeader::SetCookie, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::CodecError;

    fn request(cookie: Option<&str>) -> HttpRequest {
        let mut req = HttpRequest::new();
        if let Some(cookie) = cookie {
            req.set_header(RequestHeader::Cookie, cookie);
        }
        req
    }

    fn insecure(_: &HttpRequest) -> bool {
        false
    }

    fn secure(_: &HttpRequest) -> bool {
        true
    }

    fn ser(name: &str, value: &str, options: &CookieOptions) -> String {
        codec::serialize(name, value, options).unwrap()
    }

    fn multi(vals: &[String]) -> HeaderValue {
        HeaderValue::Multi(vals.to_vec())
    }

    #[test]
    fn get_reads_request_header() {
        let req = request(Some("a=1; b=2"));
        let store = CookieStore::new(&req, insecure);
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert_eq!(store.get("b").as_deref(), Some("2"));
        assert_eq!(store.get("c"), None);
    }

    #[test]
    fn get_unquotes_and_keeps_raw_escapes() {
        let req = request(Some("q=\"x y\"; bad=%FF"));
        let store = CookieStore::new(&req, insecure);
        assert_eq!(store.get("q").as_deref(), Some("x y"));
        assert_eq!(store.get("bad").as_deref(), Some("%FF"));
    }

    #[test]
    fn get_without_header() {
        let req = request(None);
        let store = CookieStore::new(&req, insecure);
        assert_eq!(store.get("a"), None);
    }

    #[test]
    fn get_ignores_pending_writes() {
        let req = request(Some("a=1"));
        let mut store = CookieStore::new(&req, insecure);
        store.set_value("a", "2");
        store.set_value("z", "9");
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert_eq!(store.get("z"), None);
    }

    #[test]
    fn repeated_set_accumulates() {
        let req = request(None);
        let mut store = CookieStore::new(&req, insecure);
        store.set_value("x", "y");
        store.set_value("x", "z");

        let mut res = HttpResponse::new();
        store.flush(&mut res).unwrap();

        let none = CookieOptions::default();
        assert_eq!(
            res.header(ResponseHeader::SetCookie),
            Some(&multi(&[ser("x", "y", &none), ser("x", "z", &none)]))
        );
    }

    #[test]
    fn overwrite_keeps_only_last() {
        let req = request(None);
        let mut store = CookieStore::new(&req, insecure);
        store.set_value("x", "v1");
        store.set("x", "v2", CookieOptions::default(), true);

        let mut res = HttpResponse::new();
        store.flush(&mut res).unwrap();

        assert_eq!(
            res.header(ResponseHeader::SetCookie),
            Some(&HeaderValue::Single(ser("x", "v2", &CookieOptions::default())))
        );
    }

    #[test]
    fn unset_supersedes_prior_writes() {
        let req = request(None);
        let mut store = CookieStore::new(&req, insecure);
        store.set_value("x", "v1");
        store.set_value("x", "v2");
        store.unset("x");

        let pending: Vec<_> = store.pending().collect();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].value, "");
        assert_eq!(pending[0].options, CookieOptions::expired());

        let mut res = HttpResponse::new();
        store.flush(&mut res).unwrap();
        assert_eq!(
            res.header(ResponseHeader::SetCookie),
            Some(&HeaderValue::Single(ser("x", "", &CookieOptions::expired())))
        );
    }

    #[test]
    fn groups_flush_in_first_insertion_order() {
        let req = request(None);
        let mut store = CookieStore::new(&req, insecure);
        store.set_value("a", "1");
        store.set_value("b", "1");
        store.set_value("a", "2");
        store.set("b", "2", CookieOptions::default(), true);
        store.set_value("c", "1");

        let order: Vec<_> = store
            .pending()
            .map(|w| format!("{}={}", w.name, w.value))
            .collect();
        assert_eq!(order, ["a=1", "a=2", "b=2", "c=1"]);
    }

    #[test]
    fn flush_keeps_existing_set_cookie_values() {
        let req = request(None);
        let mut store = CookieStore::new(&req, insecure);
        store.set_value("b", "2");
        store.set_value("c", "3");

        let mut res = HttpResponse::new();
        res.append_header(ResponseHeader::SetCookie, "a=1");
        store.flush(&mut res).unwrap();

        assert_eq!(
            res.header(ResponseHeader::SetCookie),
            Some(&multi(&["a=1".to_string(), "b=2".to_string(), "c=3".to_string()]))
        );
    }

    #[test]
    fn empty_store_leaves_response_alone() {
        let req = request(None);
        let store = CookieStore::new(&req, insecure);
        assert!(store.is_empty());

        let mut res = HttpResponse::new();
        store.flush(&mut res).unwrap();
        assert!(res.header(ResponseHeader::SetCookie).is_none());
    }

    #[test]
    fn secure_cookie_over_secure_connection() {
        let req = request(None);
        let mut store = CookieStore::new(&req, secure);
        let options = CookieOptions::new().secure(true);
        store.set("s", "v", options.clone(), false);

        let mut res = HttpResponse::new();
        store.flush(&mut res).unwrap();
        assert_eq!(
            res.header(ResponseHeader::SetCookie),
            Some(&HeaderValue::Single(ser("s", "v", &options)))
        );
    }

    #[test]
    fn secure_violation_emits_nothing() {
        let req = request(None);
        let mut store = CookieStore::new(&req, insecure);
        store.set_value("before", "1");
        store.set("s", "v", CookieOptions::new().secure(true), false);
        store.set_value("after", "1");

        let mut res = HttpResponse::new();
        res.append_header(ResponseHeader::SetCookie, "existing=1");
        let err = store.flush(&mut res).unwrap_err();

        assert_eq!(err, CookieError::SecureCookieViolation { name: "s".into() });
        assert_eq!(
            res.header(ResponseHeader::SetCookie),
            Some(&HeaderValue::Single("existing=1".into()))
        );
    }

    #[test]
    fn codec_errors_propagate() {
        let req = request(None);
        let mut store = CookieStore::new(&req, insecure);
        store.set_value("ok", "1");
        store.set_value("bad name", "1");

        let mut res = HttpResponse::new();
        assert_eq!(
            store.flush(&mut res),
            Err(CookieError::Codec(CodecError::InvalidName("bad name".into())))
        );
        assert!(res.header(ResponseHeader::SetCookie).is_none());
    }
}
