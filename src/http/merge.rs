//! Merging of repeatable header fields.
//!
//! Some response headers (most notably `Set-Cookie`) cannot be folded into a
//! single comma-separated line and must be emitted once per value. A field
//! therefore holds either one value or an ordered list of values, and
//! appending to it must keep whatever was written earlier, in order.

use crate::http::headers::HeaderValue;

/// Merges `next` into the `existing` value of a header field.
///
/// - absent existing: `next` unchanged
/// - single + single: `[existing, next]`
/// - single + list: `[existing, next...]`
/// - list + single or list: `[existing..., next...]`
pub fn merge(existing: Option<HeaderValue>, next: HeaderValue) -> HeaderValue {
    match (existing, next) {
        (None, next) => next,
        (Some(HeaderValue::Single(prev)), HeaderValue::Single(val)) => {
            HeaderValue::Multi(vec![prev, val])
        }
        (Some(HeaderValue::Single(prev)), HeaderValue::Multi(vals)) => {
            let mut merged = Vec::with_capacity(vals.len() + 1);
            merged.push(prev);
            merged.extend(vals);
            HeaderValue::Multi(merged)
        }
        (Some(HeaderValue::Multi(mut prev)), HeaderValue::Single(val)) => {
            prev.push(val);
            HeaderValue::Multi(prev)
        }
        (Some(HeaderValue::Multi(mut prev)), HeaderValue::Multi(vals)) => {
            prev.extend(vals);
            HeaderValue::Multi(prev)
        }
    }
}
