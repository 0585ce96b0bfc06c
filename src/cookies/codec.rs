//! `Cookie` / `Set-Cookie` header codec built on the `cookie` crate.

use cookie::Cookie;
use indexmap::IndexMap;

use crate::cookies::{CodecError, CookieOptions};

/// Parses a `Cookie` request header into name/value pairs.
///
/// Values are percent-decoded and stripped of surrounding double quotes. A
/// value that does not decode is kept as sent. Pairs without a name are
/// skipped. When a name repeats, the last occurrence wins.
pub fn parse(header: &str) -> IndexMap<String, String> {
    let mut cookies = IndexMap::new();
    for segment in header.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let parsed = Cookie::parse_encoded(segment).or_else(|_| Cookie::parse(segment));
        match parsed {
            Ok(c) => {
                cookies.insert(c.name().to_string(), c.value_trimmed().to_string());
            }
            Err(err) => tracing::trace!(%err, segment, "skipping malformed cookie pair"),
        }
    }
    cookies
}

/// Serializes one cookie into a `Set-Cookie` header value.
pub fn serialize(name: &str, value: &str, options: &CookieOptions) -> Result<String, CodecError> {
    if !is_token(name) {
        return Err(CodecError::InvalidName(name.to_string()));
    }

    let mut builder = Cookie::build((name.to_string(), value.to_string()));

    if let Some(domain) = &options.domain {
        check_attribute("Domain", domain)?;
        builder = builder.domain(domain.clone());
    }
    if let Some(path) = &options.path {
        check_attribute("Path", path)?;
        builder = builder.path(path.clone());
    }
    if let Some(expires) = options.expires {
        builder = builder.expires(expires);
    }
    if let Some(max_age) = options.max_age {
        builder = builder.max_age(max_age);
    }
    if options.secure {
        builder = builder.secure(true);
    }
    if options.http_only {
        builder = builder.http_only(true);
    }
    if let Some(same_site) = options.same_site {
        builder = builder.same_site(same_site);
    }

    // Names are tokens and go out as given; only the value is encoded.
    let encoded = builder.build().encoded().to_string();
    let rest = encoded.split_once('=').map_or("", |(_, rest)| rest);
    Ok(format!("{name}={rest}"))
}

// RFC 7230 token
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

fn check_attribute(attribute: &'static str, value: &str) -> Result<(), CodecError> {
    if value.chars().any(|c| c.is_control() || c == ';') {
        return Err(CodecError::InvalidAttribute {
            attribute,
            value: value.to_string(),
        });
    }
    Ok(())
}
