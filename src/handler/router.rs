use crate::cookies::{CookieOptions, SameSite};
use crate::handler::context::RequestContext;
use crate::handler::responses;
use crate::http::HttpMethod;
use crate::http::response::HttpResponse;
use crate::http::status::HttpStatus;

const VISITS_COOKIE: &str = "visits";
const TOKEN_COOKIE: &str = "token";

pub fn route(ctx: &mut RequestContext<'_>) -> HttpResponse {
    let req = ctx.request();
    match (&req.method, req.uri.as_str()) {
        (HttpMethod::Get, "/") => visit(ctx),
        (HttpMethod::Get, "/logout") => logout(ctx),
        (HttpMethod::Get, "/secure") => issue_token(ctx),

        (HttpMethod::Get, _) => responses::not_found(),
        _ => responses::any_error(HttpStatus::MethodNotAllowed),
    }
}

fn visit(ctx: &mut RequestContext<'_>) -> HttpResponse {
    let visits = ctx
        .cookies()
        .get(VISITS_COOKIE)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0)
        .saturating_add(1);

    let options = CookieOptions::new()
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    ctx.cookies_mut()
        .set(VISITS_COOKIE, visits.to_string(), options, true);

    responses::welcome(visits)
}

fn logout(ctx: &mut RequestContext<'_>) -> HttpResponse {
    ctx.cookies_mut().unset(VISITS_COOKIE);
    responses::goodbye()
}

// Refused at flush time unless the connection is secure.
fn issue_token(ctx: &mut RequestContext<'_>) -> HttpResponse {
    let options = CookieOptions::new()
        .path("/")
        .secure(true)
        .http_only(true)
        .same_site(SameSite::Strict);
    ctx.cookies_mut().set(TOKEN_COOKIE, "issued", options, true);
    responses::token_issued()
}
