#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatus {
    Ok = 200,

    BadRequest = 400,
    NotFound = 404,
    MethodNotAllowed = 405,
    LengthRequired = 411,
    PayloadTooLarge = 413,
    UriTooLong = 414,

    InternalServerError = 500,
    HttpVersionNotSupported = 505,
}

impl HttpStatus {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn reason(self) -> &'static str {
        match self {
            HttpStatus::Ok => "OK",                                               // 200
            HttpStatus::BadRequest => "Bad Request",                              // 400
            HttpStatus::NotFound => "Not Found",                                  // 404
            HttpStatus::MethodNotAllowed => "Method Not Allowed",                 // 405
            HttpStatus::LengthRequired => "Length Required",                      // 411
            HttpStatus::PayloadTooLarge => "Payload Too Large",                   // 413
            HttpStatus::UriTooLong => "URI Too Long",                             // 414
            HttpStatus::InternalServerError => "Internal Server Error",           // 500
            HttpStatus::HttpVersionNotSupported => "HTTP Version Not Supported", // 505
        }
    }
}
