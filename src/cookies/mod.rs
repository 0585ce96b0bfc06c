//! Request-scoped cookie handling.
//!
//! A [`CookieStore`] is created for every request. Handlers read incoming
//! cookies from it and queue outgoing ones; nothing touches the response
//! until the store is flushed, once, right before the response headers are
//! written. Cookies marked secure are refused unless the request arrived over
//! a connection the [`SecureDetector`] considers encrypted.

pub mod codec;
mod error;
mod options;
mod secure;
mod store;

pub use ::cookie::SameSite;
pub use error::{CodecError, CookieError};
pub use options::CookieOptions;
pub use secure::{SecureDetector, TransportPolicy};
pub use store::{CookieStore, PendingWrite};
