use crate::config::config;
use crate::http::response::HttpResponse;
use crate::http::status::HttpStatus;

fn html(status: HttpStatus, body: String) -> HttpResponse {
    let mut res = HttpResponse::new();
    res.status = status;
    res.set_body(body.into_bytes(), "text/html");
    res
}

pub fn welcome(visits: u64) -> HttpResponse {
    html(
        HttpStatus::Ok,
        format!(
            "<h1>Welcome to {}!</h1><p>Visit #{visits}</p>",
            config().server_name
        ),
    )
}

pub fn goodbye() -> HttpResponse {
    html(HttpStatus::Ok, "<h1>Goodbye!</h1>".to_string())
}

pub fn token_issued() -> HttpResponse {
    html(HttpStatus::Ok, "<h1>Token issued</h1>".to_string())
}

pub fn any_error(err: HttpStatus) -> HttpResponse {
    html(err, format!("<h1>{} {}</h1>", err.code(), err.reason()))
}

pub fn not_found() -> HttpResponse {
    any_error(HttpStatus::NotFound)
}

pub fn internal_server_error() -> HttpResponse {
    any_error(HttpStatus::InternalServerError)
}
