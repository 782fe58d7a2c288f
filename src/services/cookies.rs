use tower_cookies::cookie::{time::Duration, SameSite};
use tower_cookies::{Cookie, Cookies};

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

fn auth_cookie(name: &'static str, value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(max_age)
        .build()
}

pub fn set_auth_cookies(
    cookies: &Cookies,
    access_token: String,
    refresh_token: String,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
    secure: bool,
) {
    cookies.add(auth_cookie(
        ACCESS_TOKEN_COOKIE,
        access_token,
        Duration::seconds(access_ttl.num_seconds()),
        secure,
    ));
    cookies.add(auth_cookie(
        REFRESH_TOKEN_COOKIE,
        refresh_token,
        Duration::seconds(refresh_ttl.num_seconds()),
        secure,
    ));
}

pub fn clear_auth_cookies(cookies: &Cookies, secure: bool) {
    for name in [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE] {
        cookies.add(auth_cookie(name, String::new(), Duration::ZERO, secure));
    }
}

pub fn read_cookie(cookies: &Cookies, name: &str) -> Option<String> {
    cookies
        .get(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
