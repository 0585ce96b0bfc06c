//! HTTP headers abstraction for [`HttpRequest`](crate::http::request::HttpRequest) and
//! [`HttpResponse`](crate::http::response::HttpResponse)
//!
//! This module provides a low-level abstraction for handling HTTP headers in
//! requests and responses. It supports setting, appending, retrieving, and
//! serializing headers.
//!
//! Headers are stored in an ordered map to preserve insertion order.
//! Names keep the case they were first written with but are looked up
//! case-insensitively. A field holds either a single value or an ordered list
//! of values; lists are serialized as one header line per value.
//!
//! This abstraction does not enforce any HTTP semantics or constraints.
//! Higher-level types such as [`HttpRequest`](crate::http::request::HttpRequest)
//! and [`HttpResponse`](crate::http::response::HttpResponse) are responsible for
//! applying their own rules by wrapping or constraining access to this structure.
//!
//! When required, header values can be validated by the
//! [`validator`](crate::http::validator) module.

use indexmap::IndexMap;

use crate::http::merge::merge;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Single(String),
    Multi(Vec<String>),
}

impl HeaderValue {
    /// First value of the field, if any.
    pub fn first(&self) -> Option<&str> {
        match self {
            HeaderValue::Single(v) => Some(v),
            HeaderValue::Multi(vals) => vals.first().map(String::as_str),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let vals: &[String] = match self {
            HeaderValue::Single(v) => std::slice::from_ref(v),
            HeaderValue::Multi(vals) => vals,
        };
        vals.iter().map(String::as_str)
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::Single(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::Single(value)
    }
}

impl From<Vec<String>> for HeaderValue {
    fn from(values: Vec<String>) -> Self {
        HeaderValue::Multi(values)
    }
}

#[derive(Debug, Default)]
pub struct HttpHeaders {
    headers: IndexMap<String, HeaderValue>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self {
            headers: IndexMap::new(),
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.headers
            .keys()
            .position(|k| k.eq_ignore_ascii_case(name))
    }

    /// Replaces the field with a single value.
    pub fn set_raw(&mut self, name: &str, value: &str) {
        match self.index_of(name).and_then(|i| self.headers.get_index_mut(i)) {
            Some((_, slot)) => *slot = HeaderValue::from(value),
            None => {
                self.headers.insert(name.to_string(), HeaderValue::from(value));
            }
        }
    }

    /// Merges `value` into the field, keeping any values already present
    /// and the field's position.
    pub fn append(&mut self, name: &str, value: impl Into<HeaderValue>) {
        let value = value.into();
        match self.index_of(name).and_then(|i| self.headers.get_index_mut(i)) {
            Some((_, slot)) => {
                let prev = std::mem::replace(slot, HeaderValue::Multi(Vec::new()));
                *slot = merge(Some(prev), value);
            }
            None => {
                self.headers.insert(name.to_string(), merge(None, value));
            }
        }
    }

    /// First value of the field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_value(name).and_then(HeaderValue::first)
    }

    pub fn get_value(&self, name: &str) -> Option<&HeaderValue> {
        self.index_of(name)
            .and_then(|i| self.headers.get_index(i))
            .map(|(_, v)| v)
    }

    pub fn stringify(&self) -> String {
        let mut result = String::new();
        for (name, value) in &self.headers {
            for v in value.iter() {
                result.push_str(&format!("{}: {}\r\n", name, v));
            }
        }
        result
    }
}
