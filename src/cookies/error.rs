use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid cookie name `{0}`")]
    InvalidName(String),

    #[error("invalid cookie {attribute} `{value}`")]
    InvalidAttribute {
        attribute: &'static str,
        value: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CookieError {
    #[error("cannot send secure cookie `{name}` over unencrypted connection")]
    SecureCookieViolation { name: String },

    #[error(transparent)]
    Codec(#[from] CodecError),
}
